//! Normalized storage form of a schema.
//!
//! This is the persisted boundary: the same information as the graph, shaped
//! the way a document store keys it (a list of tagged constraint facts per
//! field instead of a flag bag). Wire names are camelCase.

use serde::{Deserialize, Serialize};

use crate::model::{AttributeType, Point};

/// The persisted document: what the validator accepts and the serializer
/// produces/consumes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDocument {
    #[serde(default)]
    pub models: Vec<StorageModel>,
    #[serde(default)]
    pub relations: Vec<StorageRelation>,
}

/// Storage counterpart of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageModel {
    pub node_id: String,
    pub name: String,
    #[serde(default)]
    pub position: Point,
    #[serde(default)]
    pub fields: Vec<StorageField>,
}

/// Storage counterpart of an attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageField {
    pub name: String,
    #[serde(rename = "type")]
    pub typ: AttributeType,
    pub is_optional: bool,
    pub is_list: bool,
    #[serde(default)]
    pub constraints: Vec<FieldConstraint>,
    #[serde(default)]
    pub default_value: Option<String>,
}

/// One tagged constraint fact on a storage field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FieldConstraint {
    Id,
    Unique,
    UpdatedAt,
    Default { value: String },
}

/// Storage counterpart of a relation edge. Endpoint ids are the entity node
/// ids carried verbatim; resolving them to storage-assigned identifiers
/// happens at the persistence boundary, outside this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageRelation {
    pub edge_id: String,
    pub source_node_id: String,
    pub target_node_id: String,
    pub relation_type: String,
}
