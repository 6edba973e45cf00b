use crate::json_schema::JsonSchema;

/// The `$schema` URI blueprint documents are normalized to.
pub const JSON_SCHEMA_DRAFT7_URI: &str = "http://json-schema.org/draft-07/schema#";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Written to the root `$schema` keyword by [`crate::normalize`].
    pub schema_uri: String,
    /// Whether `add_property` lists new properties in the parent's `required`.
    pub require_added_properties: bool,
    /// Items schema given to arrays that are created without one.
    pub default_items: JsonSchema,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_uri: JSON_SCHEMA_DRAFT7_URI.to_string(),
            require_added_properties: true,
            default_items: JsonSchema::empty_object(),
        }
    }
}
