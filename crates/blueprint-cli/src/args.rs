//! Shared argument definitions.

use blueprint_schema::{Config, JSON_SCHEMA_DRAFT7_URI};

/// Where the schema comes from and how results are printed.
///
/// Embedded in every command's Args using `#[command(flatten)]`.
#[derive(clap::Args, Clone)]
pub struct InputArgs {
    /// Path to the JSON schema (use - for stdin)
    pub file: String,

    /// Pretty print JSON output
    #[arg(short, long)]
    pub pretty: bool,
}

/// Settings that change how edits shape the schema.
#[derive(clap::Args, Clone)]
pub struct ConfigArgs {
    /// `$schema` URI written by normalization
    #[arg(long, default_value = JSON_SCHEMA_DRAFT7_URI)]
    pub schema_uri: String,

    /// Do not list added properties in the parent's `required`
    #[arg(long)]
    pub optional: bool,
}

impl ConfigArgs {
    pub fn to_config(&self) -> Config {
        Config {
            schema_uri: self.schema_uri.clone(),
            require_added_properties: !self.optional,
            ..Default::default()
        }
    }
}
