//! Graph ⇄ storage-form mapping, used for save/load/autosave.

use crate::model::{Attribute, ConstraintSet, Entity, Graph, Relation, RelationKind};
use crate::storage::{
    FieldConstraint, SchemaDocument, StorageField, StorageModel, StorageRelation,
};

/// Map a graph snapshot to the normalized storage form.
///
/// Relations are carried 1:1 with entity ids verbatim; resolving node ids to
/// storage-assigned identifiers is the persistence layer's job.
pub fn serialize(graph: &Graph) -> SchemaDocument {
    let models = graph
        .entities
        .iter()
        .map(|entity| StorageModel {
            node_id: entity.id.clone(),
            name: if entity.name.is_empty() {
                "Unnamed".to_string()
            } else {
                entity.name.clone()
            },
            position: entity.position,
            fields: entity.attributes.iter().map(serialize_field).collect(),
        })
        .collect();

    let relations = graph
        .relations
        .iter()
        .map(|relation| StorageRelation {
            edge_id: relation.id.clone(),
            source_node_id: relation.source.clone(),
            target_node_id: relation.target.clone(),
            relation_type: relation.kind.as_str().to_string(),
        })
        .collect();

    SchemaDocument { models, relations }
}

fn serialize_field(attr: &Attribute) -> StorageField {
    let c = &attr.constraint;

    // Constraint facts in priority order: id, unique, updatedAt, default.
    let mut constraints = Vec::new();
    if c.is_id {
        constraints.push(FieldConstraint::Id);
    }
    if c.unique {
        constraints.push(FieldConstraint::Unique);
    }
    if c.updated_at {
        constraints.push(FieldConstraint::UpdatedAt);
    }
    let default_value = c
        .default_value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(str::to_string);
    if let Some(value) = &default_value {
        constraints.push(FieldConstraint::Default {
            value: value.clone(),
        });
    }

    StorageField {
        name: attr.name.clone(),
        typ: attr.typ,
        is_optional: !c.required,
        is_list: c.list,
        constraints,
        default_value,
    }
}

/// Reconstruct a graph from the storage form.
///
/// This inverse is deliberately lossy: each field collapses to one constraint
/// discriminant, first match wins in priority order id > unique > updatedAt >
/// default, falling back to list, then required/optional. `defaultValue` and
/// `isList` survive regardless of which discriminant wins.
pub fn deserialize(doc: &SchemaDocument) -> Graph {
    let entities = doc
        .models
        .iter()
        .map(|model| Entity {
            id: model.node_id.clone(),
            name: model.name.clone(),
            position: model.position,
            attributes: model.fields.iter().map(deserialize_field).collect(),
        })
        .collect();

    let relations = doc
        .relations
        .iter()
        .map(|relation| Relation {
            id: relation.edge_id.clone(),
            source: relation.source_node_id.clone(),
            target: relation.target_node_id.clone(),
            kind: RelationKind::from(relation.relation_type.clone()),
        })
        .collect();

    Graph {
        entities,
        relations,
    }
}

fn deserialize_field(field: &StorageField) -> Attribute {
    let mut c = ConstraintSet {
        list: field.is_list,
        default_value: field.default_value.clone(),
        ..ConstraintSet::default()
    };

    if field.constraints.contains(&FieldConstraint::Id) {
        c.is_id = true;
    } else if field.constraints.contains(&FieldConstraint::Unique) {
        c.unique = true;
    } else if field.constraints.contains(&FieldConstraint::UpdatedAt) {
        c.updated_at = true;
    } else if let Some(FieldConstraint::Default { value }) = field
        .constraints
        .iter()
        .find(|fc| matches!(fc, FieldConstraint::Default { .. }))
    {
        c.default_value = Some(value.clone());
    } else if !field.is_list {
        c.required = !field.is_optional;
    }

    Attribute {
        name: field.name.clone(),
        typ: field.typ,
        constraint: c,
    }
}
