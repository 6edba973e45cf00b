use std::fs;
use std::io::{self, Read};

use anyhow::Context;
use blueprint_schema::{JsonSchema, SchemaPath, SchemaType};
use serde::Serialize;

/// Read input from file path or stdin.
/// - `"-"` reads from stdin
/// - anything else is a file path
pub fn read_input(file: &str) -> anyhow::Result<String> {
    if file == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Error reading from stdin")?;
        return Ok(buffer);
    }
    fs::read_to_string(file).with_context(|| format!("Error reading file {file}"))
}

/// Helper to get display path for error messages
pub fn display_path(file: &str) -> &str {
    if file == "-" { "<stdin>" } else { file }
}

pub fn read_schema(file: &str) -> anyhow::Result<JsonSchema> {
    let contents = read_input(file)?;
    serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a JSON schema", display_path(file)))
}

pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

/// Parse a dotted path argument. The empty string addresses the root.
pub fn parse_path(path: &str) -> Result<SchemaPath, std::convert::Infallible> {
    Ok(SchemaPath::from_dotted(path))
}

pub fn parse_schema_type(name: &str) -> Result<SchemaType, String> {
    serde_json::from_value(serde_json::Value::String(name.to_string()))
        .map_err(|_| format!("unknown type `{name}`"))
}
