//! Structural validation of a storage-form document before persistence.

use std::collections::HashSet;

use thiserror::Error;

use crate::storage::SchemaDocument;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid model at index {index}: {reason}")]
    Model { index: usize, reason: &'static str },
    #[error("invalid relation at index {index}: {reason}")]
    Relation { index: usize, reason: &'static str },
}

/// Check a document for internal consistency. Model checks run first and
/// short-circuit before any relation is examined. The input is never mutated;
/// failures are reported, not thrown, so callers can surface a structured
/// rejection.
pub fn validate(doc: &SchemaDocument) -> Result<(), ValidationError> {
    for (index, model) in doc.models.iter().enumerate() {
        if model.node_id.is_empty() {
            return Err(ValidationError::Model {
                index,
                reason: "empty nodeId",
            });
        }
        if model.name.is_empty() {
            return Err(ValidationError::Model {
                index,
                reason: "empty name",
            });
        }
        if !model.position.x.is_finite() || !model.position.y.is_finite() {
            return Err(ValidationError::Model {
                index,
                reason: "non-finite position",
            });
        }
    }

    let node_ids: HashSet<&str> = doc.models.iter().map(|m| m.node_id.as_str()).collect();

    for (index, relation) in doc.relations.iter().enumerate() {
        if relation.edge_id.is_empty() {
            return Err(ValidationError::Relation {
                index,
                reason: "empty edgeId",
            });
        }
        if relation.relation_type.is_empty() {
            return Err(ValidationError::Relation {
                index,
                reason: "empty relationType",
            });
        }
        if !node_ids.contains(relation.source_node_id.as_str()) {
            return Err(ValidationError::Relation {
                index,
                reason: "unknown source model",
            });
        }
        if !node_ids.contains(relation.target_node_id.as_str()) {
            return Err(ValidationError::Relation {
                index,
                reason: "unknown target model",
            });
        }
    }

    Ok(())
}

/// Boolean form of [`validate`], for callers that only gate on the outcome.
pub fn is_valid(doc: &SchemaDocument) -> bool {
    validate(doc).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AttributeType, Point};
    use crate::storage::{StorageField, StorageModel, StorageRelation};

    fn model(node_id: &str, name: &str) -> StorageModel {
        StorageModel {
            node_id: node_id.to_string(),
            name: name.to_string(),
            position: Point { x: 0.0, y: 0.0 },
            fields: vec![StorageField {
                name: "title".to_string(),
                typ: AttributeType::String,
                is_optional: true,
                is_list: false,
                constraints: vec![],
                default_value: None,
            }],
        }
    }

    fn relation(edge_id: &str, source: &str, target: &str) -> StorageRelation {
        StorageRelation {
            edge_id: edge_id.to_string(),
            source_node_id: source.to_string(),
            target_node_id: target.to_string(),
            relation_type: "1-m".to_string(),
        }
    }

    #[test]
    fn test_empty_document_is_valid() {
        assert!(is_valid(&SchemaDocument::default()));
    }

    #[test]
    fn test_well_formed_document_is_valid() {
        let doc = SchemaDocument {
            models: vec![model("n1", "User"), model("n2", "Task")],
            relations: vec![relation("e1", "n1", "n2")],
        };
        assert_eq!(validate(&doc), Ok(()));
    }

    #[test]
    fn test_rejects_empty_node_id() {
        let doc = SchemaDocument {
            models: vec![model("", "User")],
            relations: vec![],
        };
        assert_eq!(
            validate(&doc),
            Err(ValidationError::Model {
                index: 0,
                reason: "empty nodeId"
            })
        );
    }

    #[test]
    fn test_rejects_empty_name() {
        let doc = SchemaDocument {
            models: vec![model("n1", "User"), model("n2", "")],
            relations: vec![],
        };
        assert_eq!(
            validate(&doc),
            Err(ValidationError::Model {
                index: 1,
                reason: "empty name"
            })
        );
    }

    #[test]
    fn test_rejects_non_finite_position() {
        let mut bad = model("n1", "User");
        bad.position.y = f64::NAN;
        let doc = SchemaDocument {
            models: vec![bad],
            relations: vec![],
        };
        assert!(!is_valid(&doc));
    }

    #[test]
    fn test_rejects_dangling_relation_reference() {
        let doc = SchemaDocument {
            models: vec![model("n1", "User")],
            relations: vec![relation("e1", "n1", "missing")],
        };
        assert_eq!(
            validate(&doc),
            Err(ValidationError::Relation {
                index: 0,
                reason: "unknown target model"
            })
        );
    }

    #[test]
    fn test_model_failure_reported_before_relation_failure() {
        let doc = SchemaDocument {
            models: vec![model("", "User")],
            relations: vec![relation("", "x", "y")],
        };
        assert!(matches!(
            validate(&doc),
            Err(ValidationError::Model { .. })
        ));
    }

    #[test]
    fn test_rejects_empty_relation_type() {
        let mut rel = relation("e1", "n1", "n1");
        rel.relation_type = String::new();
        let doc = SchemaDocument {
            models: vec![model("n1", "User")],
            relations: vec![rel],
        };
        assert_eq!(
            validate(&doc),
            Err(ValidationError::Relation {
                index: 0,
                reason: "empty relationType"
            })
        );
    }
}
