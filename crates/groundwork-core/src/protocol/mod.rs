//! Protocol document loading and section access.
//!
//! A protocol is read once per invocation and never mutated afterwards. The
//! raw mapping is kept next to the typed view so the document can be dumped
//! verbatim and sections can be handed out as plain mappings.

mod schema;
mod shape;

pub use schema::*;

use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::Location;
use shape::{check_shape, ShapeFailure};

/// Errors raised while loading a protocol document.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to read protocol file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Protocol document must be a mapping, found {0}")]
    NotAMapping(&'static str),

    #[error("Protocol document failed shape check: {}", .0.join("; "))]
    SchemaViolation(Vec<String>),

    #[error("Failed to load protocol schema: {0}")]
    SchemaLoad(String),

    #[error("Protocol document has an unexpected shape: {0}")]
    Shape(#[source] serde_json::Error),
}

/// A loaded protocol document.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolDocument {
    raw: Map<String, Value>,
    protocol: Protocol,
}

impl ProtocolDocument {
    /// Build a document from an already-parsed value.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        if !value.is_object() {
            return Err(DocumentError::NotAMapping(json_kind(&value)));
        }

        match check_shape(&value) {
            Ok(()) => {}
            Err(ShapeFailure::SchemaLoad(e)) => return Err(DocumentError::SchemaLoad(e)),
            Err(ShapeFailure::Violations(errors)) => {
                return Err(DocumentError::SchemaViolation(errors))
            }
        }

        let protocol = Protocol::deserialize(&value).map_err(DocumentError::Shape)?;
        let raw = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        Ok(Self { raw, protocol })
    }

    /// Parse a document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse a document from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Read a document from disk. `.yaml`/`.yml` files are parsed as YAML,
    /// anything else as JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), bytes = contents.len(), "Read protocol document");

        if is_yaml(path) {
            Self::from_yaml(&contents)
        } else {
            Self::from_json(&contents)
        }
    }

    /// Load the protocol file named by a workspace location.
    pub fn load(location: &Location) -> Result<Self, DocumentError> {
        Self::from_file(location.protocol_path())
    }

    /// Typed view of the document.
    pub fn protocol(&self) -> &Protocol {
        &self.protocol
    }

    /// The document exactly as it was read.
    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }

    /// `operational_protocol` as a raw mapping (empty if absent).
    pub fn operational_protocol(&self) -> Map<String, Value> {
        section(&self.raw, &["operational_protocol"])
    }

    /// `integrity_protocol` as a raw mapping (empty if absent).
    pub fn integrity_protocol(&self) -> Map<String, Value> {
        section(&self.raw, &["integrity_protocol"])
    }

    /// `output_schema` as a raw mapping (empty if absent).
    pub fn output_schema(&self) -> Map<String, Value> {
        section(&self.raw, &["output_schema"])
    }

    /// `operational_protocol.sourcing.data_sources` as a raw mapping (empty if absent).
    pub fn data_sources(&self) -> Map<String, Value> {
        section(
            &self.raw,
            &["operational_protocol", "sourcing", "data_sources"],
        )
    }
}

fn section(root: &Map<String, Value>, path: &[&str]) -> Map<String, Value> {
    let mut current = root;
    for key in path {
        match current.get(*key) {
            Some(Value::Object(next)) => current = next,
            _ => return Map::new(),
        }
    }
    current.clone()
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
        .unwrap_or(false)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
