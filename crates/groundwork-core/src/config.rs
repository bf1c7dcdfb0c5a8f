//! Workspace location configuration.
//!
//! The protocol file and the data sources it declares live under a single
//! workspace root. Nothing in this crate reads ambient filesystem state; a
//! `Location` is always passed in explicitly.

use std::path::{Path, PathBuf};

/// Protocol file path relative to the workspace root.
pub const DEFAULT_PROTOCOL_PATH: &str = "protocol/protocol.json";

/// Where the protocol lives and what relative data-source paths resolve against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    root: PathBuf,
    protocol_path: Option<PathBuf>,
}

impl Location {
    /// A location rooted at `root`, using the default protocol path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            protocol_path: None,
        }
    }

    /// Override the protocol file. Relative paths resolve against the root.
    pub fn with_protocol_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.protocol_path = Some(path.into());
        self
    }

    /// Workspace root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolved protocol file path.
    pub fn protocol_path(&self) -> PathBuf {
        match &self.protocol_path {
            Some(p) => self.root.join(p),
            None => self.root.join(DEFAULT_PROTOCOL_PATH),
        }
    }

    /// Resolve a path under the root (absolute paths are returned unchanged).
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new(".")
    }
}
