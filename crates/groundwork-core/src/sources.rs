//! Data source directory.
//!
//! Resolves the local files a protocol declares as retrieval targets and
//! loads their contents. A missing or unreadable source never aborts the
//! load: it is replaced by a sentinel string describing the problem.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

use crate::protocol::Protocol;

/// Why a declared source could not be loaded.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("{0}")]
    Read(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A declared local source with its absolute path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSource {
    pub id: String,
    pub path: PathBuf,
    pub description: String,
}

/// What loading a source produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceContent {
    /// Parsed JSON or YAML
    Structured(Value),
    /// Any other file, as text
    Text(String),
    /// The resolved path does not exist
    Missing(PathBuf),
    /// The file exists but could not be read or parsed
    Unreadable { path: PathBuf, error: String },
}

impl SourceContent {
    /// True for the two sentinel variants.
    pub fn is_sentinel(&self) -> bool {
        matches!(self, SourceContent::Missing(_) | SourceContent::Unreadable { .. })
    }

    /// JSON form: parsed data as-is, text and sentinels as strings.
    pub fn to_value(&self) -> Value {
        match self {
            SourceContent::Structured(v) => v.clone(),
            SourceContent::Text(t) => Value::String(t.clone()),
            sentinel => Value::String(sentinel.to_string()),
        }
    }
}

impl fmt::Display for SourceContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceContent::Structured(v) => write!(f, "{}", v),
            SourceContent::Text(t) => f.write_str(t),
            SourceContent::Missing(path) => write!(f, "[missing: {}]", path.display()),
            SourceContent::Unreadable { path, error } => {
                write!(f, "[error reading {}: {}]", path.display(), error)
            }
        }
    }
}

impl Serialize for SourceContent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SourceContent::Structured(v) => v.serialize(serializer),
            SourceContent::Text(t) => serializer.serialize_str(t),
            sentinel => serializer.collect_str(sentinel),
        }
    }
}

/// One loaded source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedSource {
    pub id: String,
    pub content: SourceContent,
}

/// Everything the protocol says about where to retrieve data from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceSummary {
    /// The raw `data_sources` mapping
    pub data_sources: Map<String, Value>,
    pub local_paths_resolved: Vec<ResolvedSource>,
    pub retrieval_urls: Vec<String>,
}

/// Resolves and loads declared sources relative to a workspace root.
#[derive(Debug, Clone)]
pub struct SourceDirectory {
    root: PathBuf,
}

impl SourceDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Declared local sources with absolute paths, in declaration order.
    pub fn list_local_sources(&self, protocol: &Protocol) -> Vec<ResolvedSource> {
        protocol
            .data_sources()
            .local_paths
            .iter()
            .map(|entry| {
                let path = absolutize(&self.root.join(entry.path()));
                tracing::debug!(id = %entry.id(), path = %path.display(), "Resolved data source");
                ResolvedSource {
                    id: entry.id().to_string(),
                    path,
                    description: entry.description().to_string(),
                }
            })
            .collect()
    }

    /// Load every declared local source, in declaration order.
    pub fn load_local_sources(&self, protocol: &Protocol) -> Vec<LoadedSource> {
        self.list_local_sources(protocol)
            .into_iter()
            .map(|source| {
                let content = load_one(&source.path);
                LoadedSource {
                    id: source.id,
                    content,
                }
            })
            .collect()
    }

    /// Loaded sources as an ordered `id -> content` mapping.
    ///
    /// A repeated id keeps its first position and its last content.
    pub fn load_local_sources_map(&self, protocol: &Protocol) -> Map<String, Value> {
        self.load_local_sources(protocol)
            .into_iter()
            .map(|s| (s.id, s.content.to_value()))
            .collect()
    }

    /// Summary used by the `--sources` command.
    pub fn summarize(&self, protocol: &Protocol, raw_data_sources: Map<String, Value>) -> SourceSummary {
        SourceSummary {
            data_sources: raw_data_sources,
            local_paths_resolved: self.list_local_sources(protocol),
            retrieval_urls: retrieval_urls(protocol),
        }
    }
}

/// Remote retrieval targets, in declaration order.
pub fn retrieval_urls(protocol: &Protocol) -> Vec<String> {
    protocol.data_sources().retrieval_urls.clone()
}

fn load_one(path: &Path) -> SourceContent {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "Declared data source is missing");
        return SourceContent::Missing(path.to_path_buf());
    }

    match read_content(path) {
        Ok(content) => {
            tracing::debug!(path = %path.display(), "Loaded data source");
            content
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to load data source");
            SourceContent::Unreadable {
                path: path.to_path_buf(),
                error: e.to_string(),
            }
        }
    }
}

fn read_content(path: &Path) -> Result<SourceContent, SourceError> {
    let text = fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let content = match extension.as_deref() {
        Some("json") => SourceContent::Structured(serde_json::from_str(&text)?),
        Some("yaml") | Some("yml") => SourceContent::Structured(serde_yaml::from_str(&text)?),
        _ => SourceContent::Text(text),
    };
    Ok(content)
}

/// Canonical path when it exists; otherwise the joined path with `.` and
/// `..` folded lexically.
fn absolutize(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
