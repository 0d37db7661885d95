//! Reverse compiler: DSL text → graph.
//!
//! Best-effort, line-oriented scanner over the grammar subset the forward
//! compiler emits. Unparsable lines are skipped, never fatal; the only hard
//! failure is a document with no model blocks at all.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::layout;
use crate::model::{
    Attribute, AttributeType, ConstraintSet, Entity, Graph, Relation, RelationKind,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("no models found in schema text")]
    NoModels,
}

static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

static LINE_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"//[^\n]*").unwrap());

/// Non-greedy model-block matcher: name plus raw body.
static MODEL_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"model\s+([A-Za-z_][A-Za-z0-9_]*)\s*\{([^}]*)\}").unwrap());

/// `name type-token [rest]`, where the type token may carry `[]` and/or `?`.
static FIELD_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s+([A-Za-z_][A-Za-z0-9_]*(?:\[\])?\??)(?:\s+(.*))?$")
        .unwrap()
});

static DEFAULT_DECORATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@default\((.*)\)").unwrap());

#[derive(Debug)]
struct ParsedField {
    name: String,
    base: String,
    is_list: bool,
    is_optional: bool,
    rest: String,
}

#[derive(Debug)]
struct ParsedModel {
    name: String,
    fields: Vec<ParsedField>,
}

/// Parse DSL text into a graph snapshot with synthesized grid positions.
pub fn parse(text: &str) -> Result<Graph, ParseError> {
    let models = scan_models(text);
    if models.is_empty() {
        return Err(ParseError::NoModels);
    }

    let positions = layout::grid_positions(models.len());

    let entities: Vec<Entity> = models
        .iter()
        .zip(positions)
        .enumerate()
        .map(|(i, (model, position))| Entity {
            id: (i + 1).to_string(),
            name: model.name.clone(),
            position,
            attributes: model
                .fields
                .iter()
                .filter(|f| !is_identity_field(f))
                .filter_map(|f| recover_attribute(f, &models))
                .collect(),
        })
        .collect();

    let relations = infer_relations(&models, &entities);

    Ok(Graph {
        entities,
        relations,
    })
}

fn scan_models(text: &str) -> Vec<ParsedModel> {
    let stripped = BLOCK_COMMENT.replace_all(text, "");
    let stripped = LINE_COMMENT.replace_all(&stripped, "");

    MODEL_BLOCK
        .captures_iter(&stripped)
        .map(|caps| ParsedModel {
            name: caps[1].to_string(),
            fields: scan_body(&caps[2]),
        })
        .collect()
}

fn scan_body(body: &str) -> Vec<ParsedField> {
    body.lines()
        .map(str::trim)
        // Model-level attributes (@@index etc.) are not field lines.
        .filter(|line| !line.is_empty() && !line.starts_with("@@"))
        .filter_map(scan_field_line)
        .collect()
}

fn scan_field_line(line: &str) -> Option<ParsedField> {
    let caps = FIELD_LINE.captures(line)?;
    let token = &caps[2];
    let is_optional = token.ends_with('?');
    let stripped = token.trim_end_matches('?');
    let is_list = stripped.ends_with("[]");

    Some(ParsedField {
        name: caps[1].to_string(),
        base: stripped.trim_end_matches("[]").to_string(),
        is_list,
        is_optional,
        rest: caps.get(3).map_or(String::new(), |m| m.as_str().to_string()),
    })
}

/// The generated identity line is not re-imported; the forward compiler
/// always re-adds it, so keeping it would grow a shadow `id` attribute on
/// every round trip.
fn is_identity_field(field: &ParsedField) -> bool {
    field.name == "id" && field.rest.contains("@map(\"_id\")")
}

/// Rebuild a scalar attribute from a field line. Fields whose base type names
/// another recovered model feed relation inference instead; fields with an
/// unrecognized base type are dropped.
fn recover_attribute(field: &ParsedField, models: &[ParsedModel]) -> Option<Attribute> {
    if models.iter().any(|m| m.name == field.base) {
        return None;
    }
    let typ = AttributeType::from_str(&field.base)?;

    let constraint = ConstraintSet {
        required: !field.is_optional && !field.is_list,
        unique: field.rest.contains("@unique"),
        list: field.is_list,
        updated_at: field.rest.contains("@updatedAt"),
        is_id: field.rest.contains("@db.ObjectId"),
        default_value: recover_default(&field.rest),
    };

    Some(Attribute {
        name: field.name.clone(),
        typ,
        constraint,
    })
}

fn recover_default(rest: &str) -> Option<String> {
    let raw = DEFAULT_DECORATOR.captures(rest)?[1].to_string();
    // Quoted string defaults come back unquoted and unescaped.
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        Some(raw[1..raw.len() - 1].replace("\\\"", "\""))
    } else {
        Some(raw)
    }
}

/// One edge per unordered model pair: the first field whose base type names
/// another recovered model wins, so mutual relation fields do not produce
/// duplicate inverse edges. A list field infers `1-m`, a scalar `1-1`.
fn infer_relations(models: &[ParsedModel], entities: &[Entity]) -> Vec<Relation> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut relations = Vec::new();

    for (i, model) in models.iter().enumerate() {
        for field in &model.fields {
            let Some(j) = models
                .iter()
                .position(|other| other.name == field.base && other.name != model.name)
            else {
                continue;
            };

            let mut key = (model.name.clone(), models[j].name.clone());
            if key.0 > key.1 {
                key = (key.1, key.0);
            }
            if !seen.insert(key) {
                continue;
            }

            relations.push(Relation {
                id: format!("e{}-{}", i + 1, j + 1),
                source: entities[i].id.clone(),
                target: entities[j].id.clone(),
                kind: if field.is_list {
                    RelationKind::OneToMany
                } else {
                    RelationKind::OneToOne
                },
            });
        }
    }

    relations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler;
    use crate::model::example_graph;

    #[test]
    fn test_round_trip_canonical_subset() {
        let compiled = compiler::compile(&example_graph());
        let graph = parse(&compiled.text).unwrap();

        let names: Vec<&str> = graph.entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["User", "Task"]);
        assert_eq!(graph.relations.len(), 1);
        assert_eq!(graph.relations[0].kind, RelationKind::OneToMany);
        assert_eq!(graph.relations[0].source, graph.entities[0].id);
        assert_eq!(graph.relations[0].target, graph.entities[1].id);
    }

    #[test]
    fn test_recovers_field_shapes() {
        let text = r#"
            model User {
              id String @id @default(auto()) @map("_id") @db.ObjectId
              email String @unique
              nickname String?
              tags String[]
              visits Int @default(0)
              touchedAt DateTime @updatedAt
            }
        "#;
        let graph = parse(text).unwrap();
        let attrs = &graph.entities[0].attributes;

        // Identity line is not re-imported.
        assert!(attrs.iter().all(|a| a.name != "id"));

        let email = attrs.iter().find(|a| a.name == "email").unwrap();
        assert!(email.constraint.unique);
        assert!(email.constraint.required);

        let nickname = attrs.iter().find(|a| a.name == "nickname").unwrap();
        assert!(!nickname.constraint.required);

        let tags = attrs.iter().find(|a| a.name == "tags").unwrap();
        assert!(tags.constraint.list);
        assert!(!tags.constraint.required);

        let visits = attrs.iter().find(|a| a.name == "visits").unwrap();
        assert_eq!(visits.constraint.default_value.as_deref(), Some("0"));

        let touched = attrs.iter().find(|a| a.name == "touchedAt").unwrap();
        assert!(touched.constraint.updated_at);
    }

    #[test]
    fn test_quoted_default_unescaped() {
        let text = r#"
            model Post {
              label String @default("say \"hi\"")
            }
        "#;
        let graph = parse(text).unwrap();
        assert_eq!(
            graph.entities[0].attributes[0]
                .constraint
                .default_value
                .as_deref(),
            Some("say \"hi\"")
        );
    }

    #[test]
    fn test_tolerates_comments_and_noise() {
        let text = "
            /* header
               comment */
            generator client { provider = \"prisma-client-js\" }

            model User { // trailing comment
              name String?
              @@index([name])
              %%% not a field line %%%
            }
        ";
        let graph = parse(text).unwrap();
        assert_eq!(graph.entities.len(), 1);
        assert_eq!(graph.entities[0].attributes.len(), 1);
        assert_eq!(graph.entities[0].attributes[0].name, "name");
    }

    #[test]
    fn test_no_models_is_an_error() {
        assert_eq!(parse("just some text"), Err(ParseError::NoModels));
        assert_eq!(parse(""), Err(ParseError::NoModels));
    }

    #[test]
    fn test_mutual_relation_fields_deduped() {
        let text = "
            model User {
              tasks Task[]
            }
            model Task {
              user User
            }
        ";
        let graph = parse(text).unwrap();
        assert_eq!(graph.relations.len(), 1);
        assert_eq!(graph.relations[0].kind, RelationKind::OneToMany);
    }

    #[test]
    fn test_scalar_relation_field_infers_one_to_one() {
        let text = "
            model User {
              profile Profile?
            }
            model Profile {
              bio String?
            }
        ";
        let graph = parse(text).unwrap();
        assert_eq!(graph.relations.len(), 1);
        assert_eq!(graph.relations[0].kind, RelationKind::OneToOne);
    }

    #[test]
    fn test_grid_positions_assigned() {
        let text = "
            model A { x String? }
            model B { x String? }
            model C { x String? }
            model D { x String? }
            model E { x String? }
        ";
        let graph = parse(text).unwrap();
        assert_eq!(graph.entities.len(), 5);
        let expected = layout::grid_positions(5);
        for (entity, position) in graph.entities.iter().zip(expected) {
            assert_eq!(entity.position, position);
        }
    }

    #[test]
    fn test_relation_fields_not_kept_as_attributes() {
        let text = "
            model User {
              tasks Task[]
              name String?
            }
            model Task {
              title String?
            }
        ";
        let graph = parse(text).unwrap();
        let user_attrs: Vec<&str> = graph.entities[0]
            .attributes
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(user_attrs, vec!["name"]);
    }
}
