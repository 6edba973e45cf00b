//! Path-addressed editing of a single schema tree.
//!
//! [`SchemaBuilder`] owns the tree it edits. Every fallible operation runs on a
//! scratch copy that replaces the live tree only once the whole edit
//! succeeded, so an `Err` leaves the schema exactly as it was.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::config::Config;
use crate::error::{InvalidPathReason, SchemaError};
use crate::json_schema::{JsonSchema, SchemaType};
use crate::path::SchemaPath;
use crate::traverse::{
    SchemaProperty, ordered_schema_properties, schema_container, schema_container_mut,
    schema_node, schema_property,
};

/// A partial update for one property.
///
/// `schema` is merged shallowly onto the addressed node. A `null` value
/// deletes the field it names; any other value replaces it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SchemaPatch {
    pub key: Option<String>,
    pub schema: Map<String, Value>,
}

impl SchemaPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rename(key: impl Into<String>) -> Self {
        Self::new().key(key)
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.schema.insert(field.into(), value.into());
        self
    }

    pub fn set_type(self, schema_type: SchemaType) -> Self {
        self.set("type", schema_type.as_str())
    }

    pub fn clear(mut self, field: impl Into<String>) -> Self {
        self.schema.insert(field.into(), Value::Null);
        self
    }
}

#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    schema: JsonSchema,
    config: Config,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        let config = Config::default();
        Self {
            schema: JsonSchema::default_document(&config),
            config,
        }
    }
}

impl SchemaBuilder {
    /// Take ownership of `schema`. It is not validated.
    pub fn new(schema: JsonSchema) -> Self {
        Self::with_config(schema, Config::default())
    }

    pub fn with_config(schema: JsonSchema, config: Config) -> Self {
        Self { schema, config }
    }

    pub fn set_schema(&mut self, schema: JsonSchema) -> &mut Self {
        self.schema = schema;
        self
    }

    pub fn schema(&self) -> &JsonSchema {
        &self.schema
    }

    pub fn into_schema(self) -> JsonSchema {
        self.schema
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether a property resolves at `path`. The root is not a property.
    pub fn has_schema_property(&self, path: &SchemaPath) -> bool {
        schema_property(&self.schema, path).is_some()
    }

    pub fn property(&self, path: &SchemaPath) -> Option<SchemaProperty> {
        schema_property(&self.schema, path)
    }

    /// Children of the node at `path`, required first.
    pub fn ordered_properties(
        &self,
        path: &SchemaPath,
    ) -> Result<Vec<SchemaProperty>, SchemaError> {
        let node = schema_node(&self.schema, path)?;
        Ok(ordered_schema_properties(node, path))
    }

    fn transact<F>(&mut self, edit: F) -> Result<&mut Self, SchemaError>
    where
        F: FnOnce(&mut JsonSchema, &Config) -> Result<(), SchemaError>,
    {
        let mut scratch = self.schema.clone();
        edit(&mut scratch, &self.config)?;
        self.schema = scratch;
        Ok(self)
    }

    /// Insert `definition` at `path`, creating missing parents.
    ///
    /// The key is (re)placed in the parent's `required` right after the key
    /// named by `after`, or at the end when `after` is absent or unknown.
    pub fn add_property(
        &mut self,
        path: &SchemaPath,
        mut definition: JsonSchema,
        after: Option<&SchemaPath>,
    ) -> Result<&mut Self, SchemaError> {
        let (Some(key), Some(parent)) = (path.last(), path.parent()) else {
            return Err(SchemaError::RootNotAddressable);
        };
        debug!(%path, schema_type = %definition.schema_type, "add property");

        self.transact(|root, config| {
            let container = schema_container_mut(root, &parent, true)?;
            if !container.is_object() {
                return Err(SchemaError::InvalidPath {
                    path: parent.clone(),
                    reason: InvalidPathReason::NotExpandable(container.schema_type),
                });
            }
            if definition.is_array() && definition.items.is_none() {
                definition.items = Some(Box::new(config.default_items.clone()));
            }
            container
                .properties
                .get_or_insert_with(IndexMap::new)
                .insert(key.to_string(), definition);

            if config.require_added_properties {
                let required = container.required.get_or_insert_with(Vec::new);
                required.retain(|k| k != key);
                let slot = after
                    .and_then(SchemaPath::last)
                    .and_then(|after| required.iter().position(|k| k == after));
                match slot {
                    Some(index) => required.insert(index + 1, key.to_string()),
                    None => {
                        if after.is_some() {
                            trace!(%path, "`after` not found in required, appending");
                        }
                        required.push(key.to_string());
                    }
                }
            }
            Ok(())
        })
    }

    /// Rename and/or patch an existing property.
    ///
    /// An empty path patches the root unconditionally; the root has no key, so
    /// `patch.key` is ignored there.
    pub fn update_property(
        &mut self,
        property: &impl AsRef<SchemaPath>,
        patch: SchemaPatch,
    ) -> Result<&mut Self, SchemaError> {
        let path = property.as_ref();
        debug!(%path, key = ?patch.key, fields = patch.schema.len(), "update property");

        self.transact(|root, config| {
            let (Some(key), Some(parent)) = (path.last(), path.parent()) else {
                if patch.key.is_some() {
                    trace!("key ignored when patching the root");
                }
                return apply_patch(root, &patch.schema, config);
            };

            if schema_container(root, &parent, true)?.property(key).is_none() {
                return Err(SchemaError::PropertyNotFound { path: path.clone() });
            }
            let container = schema_container_mut(root, &parent, true)?;

            let key = match patch.key.as_deref() {
                Some(new_key) if new_key != key => {
                    rename_entry(container, path, key, new_key)?;
                    new_key
                }
                _ => key,
            };
            let node = container
                .property_mut(key)
                .ok_or_else(|| SchemaError::PropertyNotFound { path: path.clone() })?;
            apply_patch(node, &patch.schema, config)
        })
    }

    pub fn rename_property(
        &mut self,
        path: &SchemaPath,
        new_key: impl Into<String>,
    ) -> Result<&mut Self, SchemaError> {
        if path.is_root() {
            return Err(SchemaError::RootNotAddressable);
        }
        self.update_property(path, SchemaPatch::rename(new_key))
    }

    /// Delete the property at `path`. Unknown paths are ignored.
    pub fn remove_property(&mut self, path: &SchemaPath) -> &mut Self {
        let (Some(key), Some(parent)) = (path.last(), path.parent()) else {
            return self;
        };
        if !self.has_schema_property(path) {
            trace!(%path, "remove of unknown property ignored");
            return self;
        }
        debug!(%path, "remove property");

        if let Ok(container) = schema_container_mut(&mut self.schema, &parent, true) {
            if let Some(properties) = container.properties.as_mut() {
                properties.shift_remove(key);
            }
            if let Some(required) = container.required.as_mut() {
                required.retain(|k| k != key);
            }
        }
        self
    }
}

fn rename_entry(
    container: &mut JsonSchema,
    path: &SchemaPath,
    old_key: &str,
    new_key: &str,
) -> Result<(), SchemaError> {
    let properties = container
        .properties
        .as_mut()
        .ok_or_else(|| SchemaError::PropertyNotFound { path: path.clone() })?;
    if properties.contains_key(new_key) {
        return Err(SchemaError::DuplicateKey {
            path: path.clone(),
            key: new_key.to_string(),
        });
    }
    let (index, _, value) = properties
        .shift_remove_full(old_key)
        .ok_or_else(|| SchemaError::PropertyNotFound { path: path.clone() })?;
    properties.shift_insert(index, new_key.to_string(), value);

    if let Some(slot) = container
        .required
        .iter_mut()
        .flatten()
        .find(|k| k.as_str() == old_key)
    {
        *slot = new_key.to_string();
    }
    Ok(())
}

fn patch_value<T>(field: &str, value: &Value) -> Result<T, SchemaError>
where
    T: for<'de> Deserialize<'de>,
{
    T::deserialize(value).map_err(|e| SchemaError::InvalidPatch {
        field: field.to_string(),
        message: e.to_string(),
    })
}

fn patch_optional<T>(field: &str, value: &Value) -> Result<Option<T>, SchemaError>
where
    T: for<'de> Deserialize<'de>,
{
    if value.is_null() {
        return Ok(None);
    }
    patch_value(field, value).map(Some)
}

fn apply_patch(
    node: &mut JsonSchema,
    patch: &Map<String, Value>,
    config: &Config,
) -> Result<(), SchemaError> {
    let previous = node.schema_type;

    for (field, value) in patch {
        match field.as_str() {
            "type" => {
                if value.is_null() {
                    return Err(SchemaError::InvalidPatch {
                        field: field.clone(),
                        message: "type cannot be cleared".to_string(),
                    });
                }
                node.schema_type = patch_value(field, value)?;
            }
            "properties" => node.properties = patch_optional(field, value)?,
            "required" => node.required = patch_optional(field, value)?,
            "items" => node.items = patch_optional(field, value)?,
            _ if value.is_null() => {
                node.keywords.shift_remove(field);
            }
            _ => {
                node.keywords.insert(field.clone(), value.clone());
            }
        }
    }

    if node.schema_type != previous {
        trace!(from = %previous, to = %node.schema_type, "migrating children");
        migrate_children(node, previous, patch, config);
    }
    Ok(())
}

/// Bring `properties`/`required`/`items` in line with a new type. Fields the
/// patch set explicitly are left alone.
fn migrate_children(
    node: &mut JsonSchema,
    previous: SchemaType,
    patch: &Map<String, Value>,
    config: &Config,
) {
    let patched = |field: &str| patch.contains_key(field);

    match (previous, node.schema_type) {
        (SchemaType::Object, SchemaType::Array) => {
            let properties = node.properties.take().unwrap_or_default();
            let required = node.required.take().unwrap_or_default();
            if !patched("items") {
                node.items = Some(Box::new(JsonSchema {
                    properties: Some(properties),
                    required: Some(required),
                    ..JsonSchema::new(SchemaType::Object)
                }));
            }
        }
        (SchemaType::Array, SchemaType::Object) => {
            let (properties, required) = match node.items.take().map(|items| *items) {
                Some(items) if items.is_object() => (items.properties, items.required),
                _ => (None, None),
            };
            if !patched("properties") {
                node.properties = Some(properties.unwrap_or_default());
            }
            if !patched("required") {
                node.required = Some(required.unwrap_or_default());
            }
        }
        (_, SchemaType::Array) => {
            node.properties = None;
            node.required = None;
            if node.items.is_none() {
                node.items = Some(Box::new(config.default_items.clone()));
            }
        }
        (_, SchemaType::Object) => {
            node.items = None;
            node.properties.get_or_insert_with(IndexMap::new);
            node.required.get_or_insert_with(Vec::new);
        }
        _ => {
            node.properties = None;
            node.required = None;
            node.items = None;
        }
    }
}
