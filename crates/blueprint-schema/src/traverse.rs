//! Path resolution over schema trees.
//!
//! Walking a path steps through `properties` by key and through `items`
//! whenever the cursor sits on an array, so callers never spell out the
//! `items` hop. The read-only functions never touch the tree; the `_mut`
//! variant creates missing intermediate objects on the way down.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::error::{InvalidPathReason, SchemaError};
use crate::json_schema::JsonSchema;
use crate::path::SchemaPath;

/// One named child of an object schema.
///
/// `schema` is a snapshot, not a live reference into the tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaProperty {
    pub key: String,
    pub path: SchemaPath,
    pub schema: JsonSchema,
}

impl AsRef<SchemaPath> for SchemaProperty {
    fn as_ref(&self) -> &SchemaPath {
        &self.path
    }
}

pub fn is_expandable_type(schema: &JsonSchema) -> bool {
    schema.is_expandable()
}

/// An absent schema, an object without properties, or an array of empty items.
pub fn is_empty_schema(schema: Option<&JsonSchema>) -> bool {
    let Some(schema) = schema else {
        return true;
    };
    if schema.is_object() {
        return schema.properties.as_ref().is_none_or(IndexMap::is_empty);
    }
    if schema.is_array() {
        return is_empty_schema(schema.items.as_deref());
    }
    false
}

/// True if an array node sits strictly above the node at `path`.
pub fn has_array_ancestor(root: &JsonSchema, path: &SchemaPath) -> bool {
    let mut cursor = root;
    for segment in path.segments() {
        if cursor.is_array() {
            return true;
        }
        match cursor.property(segment) {
            Some(child) => cursor = child,
            None => return false,
        }
    }
    false
}

fn invalid(path: &SchemaPath, upto: usize, reason: InvalidPathReason) -> SchemaError {
    SchemaError::InvalidPath {
        path: SchemaPath(path.segments()[..upto].to_vec()),
        reason,
    }
}

/// Follow `items` until the cursor is no longer an array.
fn innermost_items<'a>(
    mut cursor: &'a JsonSchema,
    path: &SchemaPath,
    index: usize,
) -> Result<&'a JsonSchema, SchemaError> {
    while cursor.is_array() {
        cursor = cursor
            .items
            .as_deref()
            .ok_or_else(|| invalid(path, index, InvalidPathReason::Missing))?;
    }
    Ok(cursor)
}

fn step<'a>(
    cursor: &'a JsonSchema,
    path: &SchemaPath,
    index: usize,
) -> Result<&'a JsonSchema, SchemaError> {
    let cursor = innermost_items(cursor, path, index)?;
    if !cursor.is_object() {
        return Err(invalid(
            path,
            index,
            InvalidPathReason::NotExpandable(cursor.schema_type),
        ));
    }
    cursor
        .property(&path.segments()[index])
        .ok_or_else(|| invalid(path, index + 1, InvalidPathReason::Missing))
}

/// Resolve the node at `path`. With `flatten_array`, an array at the end of
/// the walk is replaced by its items schema.
pub fn schema_container<'a>(
    root: &'a JsonSchema,
    path: &SchemaPath,
    flatten_array: bool,
) -> Result<&'a JsonSchema, SchemaError> {
    let mut cursor = root;
    for index in 0..path.depth() {
        cursor = step(cursor, path, index)?;
    }
    if flatten_array {
        return innermost_items(cursor, path, path.depth());
    }
    Ok(cursor)
}

/// The node at `path` itself, arrays included.
pub fn schema_node<'a>(
    root: &'a JsonSchema,
    path: &SchemaPath,
) -> Result<&'a JsonSchema, SchemaError> {
    schema_container(root, path, false)
}

/// Follow `items` until the cursor is no longer an array, creating empty
/// object items where an array has none.
pub(crate) fn innermost_items_mut(mut cursor: &mut JsonSchema) -> &mut JsonSchema {
    while cursor.is_array() {
        cursor = cursor
            .items
            .get_or_insert_with(|| Box::new(JsonSchema::empty_object()))
            .as_mut();
    }
    cursor
}

/// Like [`schema_container`], but missing segments are created as empty
/// objects. An existing node that cannot hold properties still fails.
pub fn schema_container_mut<'a>(
    root: &'a mut JsonSchema,
    path: &SchemaPath,
    flatten_array: bool,
) -> Result<&'a mut JsonSchema, SchemaError> {
    let mut cursor = root;
    for (index, segment) in path.segments().iter().enumerate() {
        let container = innermost_items_mut(cursor);
        if !container.is_object() {
            return Err(invalid(
                path,
                index,
                InvalidPathReason::NotExpandable(container.schema_type),
            ));
        }
        cursor = container
            .properties
            .get_or_insert_with(IndexMap::new)
            .entry(segment.clone())
            .or_insert_with(JsonSchema::empty_object);
    }
    if flatten_array {
        return Ok(innermost_items_mut(cursor));
    }
    Ok(cursor)
}

/// The property addressed by `path`, or `None` if anything along the way is missing.
pub fn schema_property(root: &JsonSchema, path: &SchemaPath) -> Option<SchemaProperty> {
    let key = path.last()?;
    let parent = schema_container(root, &path.parent()?, true).ok()?;
    let schema = parent.property(key)?;
    Some(SchemaProperty {
        key: key.to_string(),
        path: path.clone(),
        schema: schema.clone(),
    })
}

/// Children of `schema`, required ones first in `required` order, then the
/// optional ones in insertion order. Arrays list their items' properties.
pub fn ordered_schema_properties(schema: &JsonSchema, prefix: &SchemaPath) -> Vec<SchemaProperty> {
    let mut schema = schema;
    while let Some(items) = schema.items.as_deref().filter(|_| schema.is_array()) {
        schema = items;
    }
    let Some(properties) = &schema.properties else {
        return Vec::new();
    };
    let required = schema.required.as_deref().unwrap_or_default();

    let view = |key: &String, child: &JsonSchema| SchemaProperty {
        key: key.clone(),
        path: prefix.child(key.clone()),
        schema: child.clone(),
    };

    let mut ordered: Vec<SchemaProperty> = required
        .iter()
        .filter_map(|key| properties.get_key_value(key))
        .map(|(key, child)| view(key, child))
        .collect();
    ordered.extend(
        properties
            .iter()
            .filter(|(key, _)| !required.contains(*key))
            .map(|(key, child)| view(key, child)),
    );
    ordered
}

/// Every path reachable from `root`, the root itself included as the empty path.
pub fn schema_paths(root: &JsonSchema) -> IndexSet<SchemaPath> {
    fn walk(node: &JsonSchema, path: SchemaPath, out: &mut IndexSet<SchemaPath>) {
        out.insert(path.clone());
        if let Some(items) = node.items.as_deref().filter(|_| node.is_array()) {
            walk(items, path, out);
            return;
        }
        if let Some(properties) = node.properties.as_ref().filter(|_| node.is_object()) {
            for (key, child) in properties {
                walk(child, path.child(key.clone()), out);
            }
        }
    }

    let mut out = IndexSet::new();
    walk(root, SchemaPath::root(), &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SchemaType;
    use serde_json::json;

    fn schema(value: serde_json::Value) -> JsonSchema {
        serde_json::from_value(value).unwrap()
    }

    fn nested() -> JsonSchema {
        schema(json!({
            "type": "object",
            "properties": {
                "user": {
                    "type": "object",
                    "properties": {
                        "name": {"type": "string"},
                        "age": {"type": "integer"}
                    },
                    "required": ["age", "name"]
                },
                "orders": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {"id": {"type": "number"}},
                        "required": ["id"]
                    }
                },
                "note": {"type": "string"}
            },
            "required": ["user"]
        }))
    }

    #[test]
    fn test_container_descends_through_items() {
        let root = nested();
        let path = SchemaPath::from_dotted("orders.id");
        let node = schema_node(&root, &path).unwrap();
        assert_eq!(node.schema_type, SchemaType::Number);
    }

    #[test]
    fn test_container_flattens_final_array() {
        let root = nested();
        let path = SchemaPath::from_dotted("orders");
        assert!(schema_container(&root, &path, false).unwrap().is_array());
        assert!(schema_container(&root, &path, true).unwrap().is_object());
    }

    #[test]
    fn test_container_rejects_scalar_descent() {
        let root = nested();
        let path = SchemaPath::from_dotted("note.inner");
        let err = schema_node(&root, &path).unwrap_err();
        assert_eq!(
            err,
            SchemaError::InvalidPath {
                path: SchemaPath::from_dotted("note"),
                reason: InvalidPathReason::NotExpandable(SchemaType::String),
            }
        );
    }

    #[test]
    fn test_container_reports_missing_segment() {
        let root = nested();
        let err = schema_node(&root, &SchemaPath::from_dotted("user.email")).unwrap_err();
        assert_eq!(
            err,
            SchemaError::InvalidPath {
                path: SchemaPath::from_dotted("user.email"),
                reason: InvalidPathReason::Missing,
            }
        );
    }

    #[test]
    fn test_container_mut_creates_intermediates() {
        let mut root = JsonSchema::empty_object();
        let path = SchemaPath::from_dotted("a.b");
        let container = schema_container_mut(&mut root, &path, true).unwrap();
        assert_eq!(container, &JsonSchema::empty_object());
        assert!(schema_node(&root, &path).is_ok());
        // Intermediates are not registered as required.
        assert_eq!(root.required, Some(vec![]));
    }

    #[test]
    fn test_container_mut_blocked_by_scalar() {
        let mut root = nested();
        let before = root.clone();
        let result = schema_container_mut(&mut root, &SchemaPath::from_dotted("note.x"), true);
        assert!(matches!(result, Err(SchemaError::InvalidPath { .. })));
        assert_eq!(root, before);
    }

    #[test]
    fn test_schema_property_view() {
        let root = nested();
        let prop = schema_property(&root, &SchemaPath::from_dotted("user.name")).unwrap();
        assert_eq!(prop.key, "name");
        assert_eq!(prop.path.to_string(), "user.name");
        assert_eq!(prop.schema.schema_type, SchemaType::String);

        assert!(schema_property(&root, &SchemaPath::from_dotted("user.missing")).is_none());
        assert!(schema_property(&root, &SchemaPath::root()).is_none());
    }

    #[test]
    fn test_ordered_properties_required_first() {
        let root = nested();
        let user = schema_node(&root, &SchemaPath::from_dotted("user")).unwrap();
        let keys: Vec<_> = ordered_schema_properties(user, &SchemaPath::from_dotted("user"))
            .into_iter()
            .map(|p| p.path.to_string())
            .collect();
        assert_eq!(keys, vec!["user.age", "user.name"]);

        let keys: Vec<_> = ordered_schema_properties(&root, &SchemaPath::root())
            .into_iter()
            .map(|p| p.key)
            .collect();
        assert_eq!(keys, vec!["user", "orders", "note"]);
    }

    #[test]
    fn test_ordered_properties_of_array_lists_items() {
        let root = nested();
        let orders = schema_node(&root, &SchemaPath::from_dotted("orders")).unwrap();
        let props = ordered_schema_properties(orders, &SchemaPath::from_dotted("orders"));
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].path.to_string(), "orders.id");
    }

    #[test]
    fn test_is_expandable_type() {
        assert!(is_expandable_type(&JsonSchema::empty_object()));
        assert!(is_expandable_type(&JsonSchema::empty_array()));
        assert!(!is_expandable_type(&JsonSchema::new(SchemaType::Null)));
    }

    #[test]
    fn test_is_empty_schema() {
        assert!(is_empty_schema(None));
        assert!(is_empty_schema(Some(&JsonSchema::empty_object())));
        assert!(is_empty_schema(Some(&JsonSchema::empty_array())));
        assert!(is_empty_schema(Some(&JsonSchema::new(SchemaType::Object))));
        assert!(!is_empty_schema(Some(&JsonSchema::new(SchemaType::String))));
        assert!(!is_empty_schema(Some(&nested())));
        assert!(!is_empty_schema(Some(&JsonSchema::array_of(
            JsonSchema::new(SchemaType::String)
        ))));
    }

    #[test]
    fn test_has_array_ancestor() {
        let root = nested();
        assert!(has_array_ancestor(&root, &SchemaPath::from_dotted("orders.id")));
        assert!(!has_array_ancestor(&root, &SchemaPath::from_dotted("orders")));
        assert!(!has_array_ancestor(&root, &SchemaPath::from_dotted("user.name")));
        assert!(!has_array_ancestor(&root, &SchemaPath::root()));

        let list = JsonSchema::array_of(
            JsonSchema::empty_object().with_property("id", JsonSchema::new(SchemaType::Number)),
        );
        assert!(has_array_ancestor(&list, &SchemaPath::from_dotted("id")));
        assert!(!has_array_ancestor(&list, &SchemaPath::root()));
    }

    #[test]
    fn test_schema_paths() {
        let paths: Vec<_> = schema_paths(&nested())
            .into_iter()
            .map(|p| p.to_string())
            .collect();
        assert_eq!(
            paths,
            vec!["", "user", "user.name", "user.age", "orders", "orders.id", "note"]
        );
    }

    #[test]
    fn test_nested_arrays_step_through_every_items_level() {
        let root = schema(json!({
            "type": "object",
            "properties": {
                "grid": {
                    "type": "array",
                    "items": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {"v": {"type": "number"}}
                        }
                    }
                }
            }
        }));
        let v = SchemaPath::from_dotted("grid.v");
        assert_eq!(
            schema_node(&root, &v).unwrap(),
            &JsonSchema::new(SchemaType::Number)
        );
        assert!(schema_property(&root, &v).is_some());
        assert!(schema_container(&root, &SchemaPath::from_dotted("grid"), true)
            .unwrap()
            .is_object());
        assert!(has_array_ancestor(&root, &v));

        let mut root = root;
        let container =
            schema_container_mut(&mut root, &SchemaPath::from_dotted("grid"), true).unwrap();
        assert!(container.is_object());
        assert!(container.property("v").is_some());
    }
}
