//! JSON Schema representation for the single-type dialect used by mapping blueprints.
//!
//! Every node carries exactly one `type`. Objects own an ordered `properties` map and
//! a `required` list, arrays own exactly one `items` schema. All remaining keywords
//! (`minimum`, `format`, `description`, `$schema`, ...) are kept verbatim in
//! [`JsonSchema::keywords`] and are never interpreted.

use core::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;

/// The primitive `type` of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Null,
}

impl SchemaType {
    /// Object and array nodes can hold children.
    pub fn is_expandable(self) -> bool {
        matches!(self, SchemaType::Object | SchemaType::Array)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SchemaType::String => "string",
            SchemaType::Number => "number",
            SchemaType::Integer => "integer",
            SchemaType::Boolean => "boolean",
            SchemaType::Object => "object",
            SchemaType::Array => "array",
            SchemaType::Null => "null",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of a JSON Schema tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonSchema {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, JsonSchema>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<JsonSchema>>,

    /// Opaque keywords, preserved in document order.
    #[serde(flatten)]
    pub keywords: IndexMap<String, Value>,
}

impl JsonSchema {
    /// A bare node of the given type with no children and no keywords.
    pub fn new(schema_type: SchemaType) -> Self {
        Self {
            schema_type,
            properties: None,
            required: None,
            items: None,
            keywords: IndexMap::new(),
        }
    }

    /// `{"type": "object", "properties": {}, "required": []}`
    pub fn empty_object() -> Self {
        Self {
            properties: Some(IndexMap::new()),
            required: Some(Vec::new()),
            ..Self::new(SchemaType::Object)
        }
    }

    /// An array whose items are an empty object.
    pub fn empty_array() -> Self {
        Self::array_of(Self::empty_object())
    }

    pub fn array_of(items: JsonSchema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::new(SchemaType::Array)
        }
    }

    /// The schema a freshly created blueprint starts with.
    pub fn default_document(config: &Config) -> Self {
        let mut schema = Self::empty_object();
        schema
            .keywords
            .insert("$schema".to_string(), Value::String(config.schema_uri.clone()));
        schema
    }

    pub fn is_object(&self) -> bool {
        self.schema_type == SchemaType::Object
    }

    pub fn is_array(&self) -> bool {
        self.schema_type == SchemaType::Array
    }

    pub fn is_expandable(&self) -> bool {
        self.schema_type.is_expandable()
    }

    /// Builder-style keyword setter, handy for fixtures.
    pub fn with_keyword(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keywords.insert(name.into(), value.into());
        self
    }

    /// Builder-style property setter. The property is appended to `required`.
    pub fn with_property(mut self, key: impl Into<String>, schema: JsonSchema) -> Self {
        let key = key.into();
        self.properties
            .get_or_insert_with(IndexMap::new)
            .insert(key.clone(), schema);
        let required = self.required.get_or_insert_with(Vec::new);
        if !required.contains(&key) {
            required.push(key);
        }
        self
    }

    pub fn property(&self, key: &str) -> Option<&JsonSchema> {
        self.properties.as_ref().and_then(|props| props.get(key))
    }

    pub fn property_mut(&mut self, key: &str) -> Option<&mut JsonSchema> {
        self.properties.as_mut().and_then(|props| props.get_mut(key))
    }

    pub fn is_required(&self, key: &str) -> bool {
        self.required
            .as_ref()
            .is_some_and(|required| required.iter().any(|r| r == key))
    }
}

impl From<JsonSchema> for Value {
    fn from(schema: JsonSchema) -> Self {
        // Every field serializes to plain JSON; this cannot fail.
        serde_json::to_value(schema).unwrap_or(Value::Null)
    }
}

impl TryFrom<Value> for JsonSchema {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        serde_json::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_simple_string_schema() {
        let schema: JsonSchema = serde_json::from_value(json!({"type": "string"})).unwrap();
        assert_eq!(schema, JsonSchema::new(SchemaType::String));
    }

    #[test]
    fn test_parse_keeps_keywords_in_order() {
        let schema: JsonSchema = serde_json::from_value(json!({
            "type": "number",
            "minimum": 0,
            "maximum": 10,
            "description": "score"
        }))
        .unwrap();
        let keys: Vec<_> = schema.keywords.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["minimum", "maximum", "description"]);
    }

    #[test]
    fn test_parse_nested_object() {
        let schema: JsonSchema = serde_json::from_value(json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "tags": {"type": "array", "items": {"type": "string"}}
            },
            "required": ["name"]
        }))
        .unwrap();
        assert!(schema.is_object());
        assert!(schema.is_required("name"));
        assert!(!schema.is_required("tags"));
        let tags = schema.property("tags").unwrap();
        assert_eq!(
            tags.items.as_deref(),
            Some(&JsonSchema::new(SchemaType::String))
        );
    }

    #[test]
    fn test_parse_rejects_missing_type() {
        let result: Result<JsonSchema, _> = serde_json::from_value(json!({"properties": {}}));
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_skips_absent_fields() {
        let value = Value::from(JsonSchema::new(SchemaType::Boolean));
        assert_eq!(value, json!({"type": "boolean"}));
    }

    #[test]
    fn test_serialize_empty_object() {
        let value = Value::from(JsonSchema::empty_object());
        assert_eq!(
            value,
            json!({"type": "object", "properties": {}, "required": []})
        );
    }

    #[test]
    fn test_default_document_has_schema_uri() {
        let value = Value::from(JsonSchema::default_document(&Config::default()));
        assert_eq!(
            value,
            json!({
                "type": "object",
                "properties": {},
                "required": [],
                "$schema": "http://json-schema.org/draft-07/schema#"
            })
        );
    }

    #[test]
    fn test_with_property_does_not_duplicate_required() {
        let schema = JsonSchema::empty_object()
            .with_property("a", JsonSchema::new(SchemaType::String))
            .with_property("a", JsonSchema::new(SchemaType::Number));
        assert_eq!(schema.required, Some(vec!["a".to_string()]));
        assert_eq!(
            schema.property("a").map(|p| p.schema_type),
            Some(SchemaType::Number)
        );
    }
}
