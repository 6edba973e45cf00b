//! Normalization and structural checks for blueprint schemas.

use indexmap::IndexMap;
use serde_json::Value;

use crate::config::Config;
use crate::json_schema::JsonSchema;
use crate::path::SchemaPath;

/// Fill in the structure every blueprint schema is expected to carry:
/// the root `$schema` keyword, a `properties` map on every object and an
/// `items` schema on every array.
pub fn normalize(schema: &mut JsonSchema, config: &Config) {
    schema
        .keywords
        .insert("$schema".to_string(), Value::String(config.schema_uri.clone()));
    normalize_node(schema, config);
}

fn normalize_node(node: &mut JsonSchema, config: &Config) {
    if node.is_object() {
        for child in node.properties.get_or_insert_with(IndexMap::new).values_mut() {
            normalize_node(child, config);
        }
    }
    if node.is_array() {
        let items = node
            .items
            .get_or_insert_with(|| Box::new(config.default_items.clone()));
        normalize_node(items, config);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructureIssueKind {
    #[error("`properties` on a non-object node")]
    UnexpectedProperties,
    #[error("`required` on a non-object node")]
    UnexpectedRequired,
    #[error("`items` on a non-array node")]
    UnexpectedItems,
    #[error("array without `items`")]
    MissingItems,
    #[error("required key `{0}` is not a property")]
    UnknownRequired(String),
    #[error("required key `{0}` is listed twice")]
    DuplicateRequired(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at `{path}`")]
pub struct StructureIssue {
    pub path: SchemaPath,
    pub kind: StructureIssueKind,
}

/// Collect every violation of the single-type dialect's structural rules.
pub fn check_structure(schema: &JsonSchema) -> Vec<StructureIssue> {
    let mut issues = Vec::new();
    check_node(schema, &SchemaPath::root(), &mut issues);
    issues
}

fn check_node(node: &JsonSchema, path: &SchemaPath, issues: &mut Vec<StructureIssue>) {
    let mut issue = |kind| {
        issues.push(StructureIssue {
            path: path.clone(),
            kind,
        })
    };

    if !node.is_object() {
        if node.properties.is_some() {
            issue(StructureIssueKind::UnexpectedProperties);
        }
        if node.required.is_some() {
            issue(StructureIssueKind::UnexpectedRequired);
        }
    }
    if node.is_array() {
        if node.items.is_none() {
            issue(StructureIssueKind::MissingItems);
        }
    } else if node.items.is_some() {
        issue(StructureIssueKind::UnexpectedItems);
    }

    if node.is_object() {
        let mut seen = Vec::new();
        for key in node.required.iter().flatten() {
            if node.property(key).is_none() {
                issue(StructureIssueKind::UnknownRequired(key.clone()));
            }
            if seen.contains(&key) {
                issue(StructureIssueKind::DuplicateRequired(key.clone()));
            }
            seen.push(key);
        }
    }

    if let Some(items) = node.items.as_deref() {
        check_node(items, path, issues);
    }
    for (key, child) in node.properties.iter().flatten() {
        check_node(child, &path.child(key.clone()), issues);
    }
}
