//! JSON Schema shape check for protocol documents.
//!
//! Documents are checked against `assets/protocol.schema.json` before they are
//! decoded into typed sections. The schema pins types only; every field stays
//! optional.

use std::sync::OnceLock;

/// Embedded protocol schema (loaded at compile time).
const PROTOCOL_SCHEMA_JSON: &str = include_str!("../../assets/protocol.schema.json");

/// Compiled JSON Schema validator (initialized once, reused).
static COMPILED_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

fn get_validator() -> Result<&'static jsonschema::Validator, String> {
    let result = COMPILED_SCHEMA.get_or_init(|| {
        let schema_value: serde_json::Value = serde_json::from_str(PROTOCOL_SCHEMA_JSON)
            .map_err(|e| format!("Invalid schema JSON: {}", e))?;

        jsonschema::options()
            .build(&schema_value)
            .map_err(|e| format!("Failed to compile schema: {}", e))
    });

    result.as_ref().map_err(Clone::clone)
}

/// Outcome of a failed shape check.
#[derive(Debug)]
pub(crate) enum ShapeFailure {
    /// The embedded schema itself could not be compiled
    SchemaLoad(String),
    /// The document violates the schema; one message per violation
    Violations(Vec<String>),
}

/// Check a raw document against the protocol schema.
pub(crate) fn check_shape(document: &serde_json::Value) -> Result<(), ShapeFailure> {
    let validator = get_validator().map_err(ShapeFailure::SchemaLoad)?;

    let errors: Vec<String> = validator
        .iter_errors(document)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ShapeFailure::Violations(errors))
    }
}
