//! Forward compiler: graph (or storage form) → DSL text.

use std::collections::HashMap;

use serde::Serialize;

use crate::model::{Attribute, AttributeType, Graph, RelationKind};
use crate::serializer;
use crate::storage::SchemaDocument;

/// Fixed identity line opening every model body. Never duplicated or
/// overridden by user attributes.
pub const IDENTITY_FIELD: &str = "id String @id @default(auto()) @map(\"_id\") @db.ObjectId";

const HEADER: &str = "generator client {\n  provider = \"prisma-client-js\"\n}\n\ndatasource db {\n  provider = \"mongodb\"\n  url      = env(\"DATABASE_URL\")\n}\n";

/// A compiled document plus any skip-and-continue anomalies encountered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledSchema {
    #[serde(rename = "schema")]
    pub text: String,
    pub warnings: Vec<String>,
}

struct ModelBody {
    name: String,
    fields: Vec<String>,
}

/// Compile a graph snapshot to a single DSL document. Relations with an
/// unresolved endpoint are dropped and reported as warnings; unknown
/// relation kinds render as inline comments.
pub fn compile(graph: &Graph) -> CompiledSchema {
    let mut bodies: Vec<ModelBody> = Vec::with_capacity(graph.entities.len());
    let mut index: HashMap<&str, usize> = HashMap::new();

    for entity in &graph.entities {
        let raw = if entity.name.is_empty() {
            entity.id.as_str()
        } else {
            entity.name.as_str()
        };
        let mut fields = vec![IDENTITY_FIELD.to_string()];
        fields.extend(entity.attributes.iter().map(field_line));

        index.insert(entity.id.as_str(), bodies.len());
        bodies.push(ModelBody {
            name: capitalize(raw),
            fields,
        });
    }

    let mut warnings = Vec::new();

    for relation in &graph.relations {
        let (source, target) = match (
            index.get(relation.source.as_str()),
            index.get(relation.target.as_str()),
        ) {
            (Some(&s), Some(&t)) => (s, t),
            (None, _) => {
                warnings.push(format!(
                    "relation {}: source {} does not resolve to an entity; dropped",
                    relation.id, relation.source
                ));
                continue;
            }
            (_, None) => {
                warnings.push(format!(
                    "relation {}: target {} does not resolve to an entity; dropped",
                    relation.id, relation.target
                ));
                continue;
            }
        };

        expand_relation(&mut bodies, source, target, &relation.kind);
    }

    let mut text = String::from(HEADER);
    for body in &bodies {
        text.push('\n');
        text.push_str(&format!("model {} {{\n", body.name));
        for field in &body.fields {
            text.push_str("  ");
            text.push_str(field);
            text.push('\n');
        }
        text.push_str("}\n");
    }

    CompiledSchema { text, warnings }
}

/// Compile a storage-form document by routing it through the deserializer.
pub fn compile_document(doc: &SchemaDocument) -> CompiledSchema {
    compile(&serializer::deserialize(doc))
}

fn expand_relation(bodies: &mut [ModelBody], source: usize, target: usize, kind: &RelationKind) {
    let source_model = bodies[source].name.clone();
    let target_model = bodies[target].name.clone();

    match kind {
        RelationKind::OneToMany => {
            let list_field = format!(
                "{} {}[]",
                pluralize(&target_model.to_lowercase()),
                target_model
            );
            push_unique(&mut bodies[source].fields, list_field);

            // Foreign key plus relation field on the many side; the reference
            // side stays implicit under the document-database convention.
            let fk_name = format!("{}Id", uncapitalize(&source_model));
            let fk_field = format!("{fk_name} String");
            let relation_field = format!(
                "{} {} @relation(fields: [{}])",
                uncapitalize(&source_model),
                source_model,
                fk_name
            );
            push_unique(&mut bodies[target].fields, fk_field);
            push_unique(&mut bodies[target].fields, relation_field);
        }
        RelationKind::OneToOne => {
            let fk_field = format!("{}Id String?", uncapitalize(&target_model));
            let scalar_field = format!("{} {}?", uncapitalize(&target_model), target_model);
            push_unique(&mut bodies[source].fields, fk_field);
            push_unique(&mut bodies[source].fields, scalar_field);

            let inverse_field = format!("{} {}?", uncapitalize(&source_model), source_model);
            push_unique(&mut bodies[target].fields, inverse_field);
        }
        // m-1 and m-n both expand to symmetric list fields; the source kept
        // this simplification and it is reproduced as-is.
        RelationKind::ManyToOne | RelationKind::ManyToMany => {
            let source_side = format!(
                "{} {}[]",
                pluralize(&target_model.to_lowercase()),
                target_model
            );
            let target_side = format!(
                "{} {}[]",
                pluralize(&source_model.to_lowercase()),
                source_model
            );
            push_unique(&mut bodies[source].fields, source_side);
            push_unique(&mut bodies[target].fields, target_side);
        }
        RelationKind::Other(tag) => {
            let tag = if tag.is_empty() { "unknown" } else { tag };
            bodies[source]
                .fields
                .push(format!("// relation to {target_model} ({tag})"));
        }
    }
}

/// Append a generated field line unless an identical line is already present.
/// Keeps edge expansion idempotent.
fn push_unique(fields: &mut Vec<String>, line: String) {
    if !fields.contains(&line) {
        fields.push(line);
    }
}

fn field_line(attr: &Attribute) -> String {
    let c = &attr.constraint;
    let name = if attr.name.is_empty() {
        "field"
    } else {
        attr.name.as_str()
    };

    let mut typ = attr.typ.as_str().to_string();
    if c.list {
        typ.push_str("[]");
    }
    // Lists are never marked optional.
    let marker = if c.list || c.required { "" } else { "?" };

    let mut decorators: Vec<String> = Vec::new();
    if let Some(raw) = c.default_value.as_deref() {
        if let Some(decorator) = default_decorator(attr.typ, c.list, raw) {
            decorators.push(decorator);
        }
    }
    if c.unique {
        decorators.push("@unique".to_string());
    }
    if c.updated_at {
        decorators.push("@updatedAt".to_string());
    }
    if c.is_id {
        decorators.push("@db.ObjectId".to_string());
    }

    if decorators.is_empty() {
        format!("{name} {typ}{marker}")
    } else {
        format!("{name} {typ}{marker} {}", decorators.join(" "))
    }
}

/// Typed default-value emission. DateTime only supports `now()` through this
/// path; anything else on a scalar DateTime produces no decorator.
fn default_decorator(typ: AttributeType, is_list: bool, raw: &str) -> Option<String> {
    let dv = raw.trim();
    if dv.is_empty() {
        return None;
    }

    if dv == "now()" {
        Some("@default(now())".to_string())
    } else if !is_list
        && typ == AttributeType::Boolean
        && (dv.eq_ignore_ascii_case("true") || dv.eq_ignore_ascii_case("false"))
    {
        Some(format!("@default({})", dv.to_ascii_lowercase()))
    } else if !is_list && typ.is_numeric() && is_integer_literal(dv) {
        Some(format!("@default({dv})"))
    } else if is_list && dv.starts_with('[') && dv.ends_with(']') {
        Some(format!("@default({dv})"))
    } else if !(typ == AttributeType::DateTime && !is_list) {
        Some(format!("@default(\"{}\")", dv.replace('"', "\\\"")))
    } else {
        None
    }
}

fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Capitalized model name; empty input falls back to "Model".
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "Model".to_string(),
    }
}

/// Lower-cased leading character; empty input falls back to "model".
pub fn uncapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => "model".to_string(),
    }
}

/// Naive pluralization matching the emitted grammar subset.
pub fn pluralize(name: &str) -> String {
    if name.is_empty() {
        "items".to_string()
    } else if name.ends_with('s') {
        format!("{name}es")
    } else {
        format!("{name}s")
    }
}
