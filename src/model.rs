//! Shared in-memory types for the editable schema graph.
//!
//! Everything here is a plain value type. Transforms never mutate a graph in
//! place; each serialize/compile pass produces a fresh snapshot.

use serde::{Deserialize, Serialize};

/// Primitive field types supported by the DSL subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeType {
    String,
    Boolean,
    Int,
    BigInt,
    Float,
    Decimal,
    Json,
    Bytes,
    DateTime,
}

/// All attribute types, in menu order.
pub const ATTRIBUTE_TYPES: [AttributeType; 9] = [
    AttributeType::String,
    AttributeType::Boolean,
    AttributeType::Int,
    AttributeType::BigInt,
    AttributeType::Float,
    AttributeType::Decimal,
    AttributeType::Json,
    AttributeType::Bytes,
    AttributeType::DateTime,
];

impl AttributeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Boolean => "Boolean",
            Self::Int => "Int",
            Self::BigInt => "BigInt",
            Self::Float => "Float",
            Self::Decimal => "Decimal",
            Self::Json => "Json",
            Self::Bytes => "Bytes",
            Self::DateTime => "DateTime",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "String" => Some(Self::String),
            "Boolean" => Some(Self::Boolean),
            "Int" => Some(Self::Int),
            "BigInt" => Some(Self::BigInt),
            "Float" => Some(Self::Float),
            "Decimal" => Some(Self::Decimal),
            "Json" => Some(Self::Json),
            "Bytes" => Some(Self::Bytes),
            "DateTime" => Some(Self::DateTime),
            _ => None,
        }
    }

    /// Types whose defaults are emitted as bare integer literals.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Int | Self::BigInt | Self::Float | Self::Decimal
        )
    }
}

/// Constraint bag attached to an attribute.
///
/// `list` and the optional marker are mutually exclusive in DSL emission: a
/// list attribute never carries `?`. `updated_at` is only meaningful on
/// `DateTime` attributes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConstraintSet {
    pub required: bool,
    pub unique: bool,
    pub list: bool,
    pub updated_at: bool,
    pub is_id: bool,
    pub default_value: Option<String>,
}

impl ConstraintSet {
    pub fn required() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }

    pub fn unique() -> Self {
        Self {
            unique: true,
            ..Self::default()
        }
    }

    pub fn list() -> Self {
        Self {
            list: true,
            ..Self::default()
        }
    }

    pub fn with_default(value: &str) -> Self {
        Self {
            default_value: Some(value.to_string()),
            ..Self::default()
        }
    }
}

/// One field of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type")]
    pub typ: AttributeType,
    #[serde(default)]
    pub constraint: ConstraintSet,
}

impl Attribute {
    pub fn new(name: &str, typ: AttributeType) -> Self {
        Self {
            name: name.to_string(),
            typ,
            constraint: ConstraintSet::default(),
        }
    }

    pub fn with_constraint(name: &str, typ: AttributeType, constraint: ConstraintSet) -> Self {
        Self {
            name: name.to_string(),
            typ,
            constraint,
        }
    }
}

/// Canvas coordinates, carried through storage for round-trip fidelity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A graph node representing one data model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    /// Free text; may be empty while the user is still typing.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: Point,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

/// Cardinality tag on a relation edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RelationKind {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
    /// Anything outside the four known values, carried verbatim.
    Other(String),
}

impl RelationKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::OneToOne => "1-1",
            Self::OneToMany => "1-m",
            Self::ManyToOne => "m-1",
            Self::ManyToMany => "m-n",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for RelationKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "1-1" => Self::OneToOne,
            "1-m" => Self::OneToMany,
            "m-1" => Self::ManyToOne,
            "m-n" => Self::ManyToMany,
            _ => Self::Other(s),
        }
    }
}

impl From<RelationKind> for String {
    fn from(kind: RelationKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A directed association between two entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: RelationKind,
}

/// A full graph snapshot as exchanged with the canvas.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

/// Pre-built User/Task starter schema.
pub fn example_graph() -> Graph {
    let user = Entity {
        id: "1".to_string(),
        name: "User".to_string(),
        position: Point { x: 375.0, y: 80.0 },
        attributes: vec![
            Attribute::with_constraint("email", AttributeType::String, ConstraintSet::unique()),
            Attribute::new("password", AttributeType::String),
            Attribute::new("createdAt", AttributeType::String),
        ],
    };
    let task = Entity {
        id: "2".to_string(),
        name: "Task".to_string(),
        position: Point { x: 875.0, y: 440.0 },
        attributes: vec![
            Attribute::new("description", AttributeType::String),
            Attribute::new("title", AttributeType::String),
            Attribute::new("sequence", AttributeType::Int),
        ],
    };
    let edge = Relation {
        id: "e1-2".to_string(),
        source: "1".to_string(),
        target: "2".to_string(),
        kind: RelationKind::OneToMany,
    };

    Graph {
        entities: vec![user, task],
        relations: vec![edge],
    }
}
