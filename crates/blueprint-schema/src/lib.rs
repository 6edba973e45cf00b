#![doc = include_str!("../README.md")]

pub mod builder;
mod config;
mod error;
pub mod json_schema;
pub mod normalize;
pub mod path;
pub mod selector;
pub mod traverse;

pub use builder::{SchemaBuilder, SchemaPatch};
pub use config::{Config, JSON_SCHEMA_DRAFT7_URI};
pub use error::{InvalidPathReason, SchemaError, SelectionError};
pub use json_schema::{JsonSchema, SchemaType};
pub use normalize::{StructureIssue, StructureIssueKind, check_structure, normalize};
pub use path::SchemaPath;
pub use selector::{SchemaSelector, SessionState, SubSchemaSelection};
pub use traverse::SchemaProperty;
