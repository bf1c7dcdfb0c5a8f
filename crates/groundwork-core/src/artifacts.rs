//! Published artifacts.
//!
//! Builds the files served from a repository's `.well-known/` directory so
//! remote clients can fetch the same constraints the local tool derives.
//! Builders are pure; only [`write_artifact`] touches the filesystem.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constraints::{derive_constraints, GroundingResult};
use crate::protocol::Protocol;

/// Query the published constraints are derived for.
pub const CANONICAL_QUERY: &str = "Apply these grounding constraints to every query. Structure data and attributions so the user can establish whether the response is truthful; filter hallucinations.";

/// Published constraints, relative to the workspace root.
pub const GROUNDING_ARTIFACT_PATH: &str = ".well-known/grounding-constraints.json";

/// Published integrity metrics, relative to the workspace root.
pub const METRICS_ARTIFACT_PATH: &str = ".well-known/integrity/metrics.json";

const ARTIFACT_DESCRIPTION: &str = "Grounding constraints (logic route) for this repository. Structure data and attributions; the user establishes truthfulness. Includes data_sources (where the model must grab data from).";

const ARTIFACT_USAGE: &str = "Point your agent or provider at this URL so answers follow the same protocol as the repo.";

/// Sample values for disclosure fields that have no source in the document.
const SAMPLE_INTERVENTION_RATE: f64 = 2.3;
const SAMPLE_MEDIAN_TIME_TO_FIX: u64 = 45;
const SAMPLE_OPEN_AUDIT_CASES: u64 = 0;

/// Errors from writing artifacts.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode artifact: {0}")]
    Json(#[from] serde_json::Error),
}

/// Metadata block attached to the published constraints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArtifactMeta {
    pub description: String,
    pub usage: String,
}

/// The published constraints document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroundingArtifact {
    #[serde(flatten)]
    pub result: GroundingResult,

    #[serde(rename = "_meta")]
    pub meta: ArtifactMeta,
}

/// Constraints for [`CANONICAL_QUERY`] plus a metadata block.
///
/// The output depends only on `protocol`, so regenerating from an unchanged
/// document rewrites the same bytes.
pub fn grounding_artifact(protocol: &Protocol) -> GroundingArtifact {
    GroundingArtifact {
        result: derive_constraints(CANONICAL_QUERY, protocol),
        meta: ArtifactMeta {
            description: ARTIFACT_DESCRIPTION.to_string(),
            usage: ARTIFACT_USAGE.to_string(),
        },
    }
}

/// Sample integrity metrics keyed by the disclosure schema's field list.
///
/// Known fields are filled from the document or with fixed sample values;
/// unknown fields are `null`.
pub fn integrity_metrics(protocol: &Protocol) -> Map<String, Value> {
    let integrity = &protocol.integrity_protocol;

    integrity
        .disclosure_schema
        .fields
        .iter()
        .map(|field| {
            let value = match field.as_str() {
                "model_version" => integrity.version.clone(),
                "odds" => integrity.odds(),
                "intervention_rate_last_30_days" => Value::from(SAMPLE_INTERVENTION_RATE),
                "median_time_to_fix" => Value::from(SAMPLE_MEDIAN_TIME_TO_FIX),
                "open_audit_cases" => Value::from(SAMPLE_OPEN_AUDIT_CASES),
                _ => Value::Null,
            };
            (field.clone(), value)
        })
        .collect()
}

/// Write `artifact` as pretty JSON, creating parent directories.
pub fn write_artifact<T: Serialize>(path: &Path, artifact: &T) -> Result<(), ArtifactError> {
    let io_err = |source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut body = serde_json::to_string_pretty(artifact)?;
    body.push('\n');
    fs::write(path, body).map_err(io_err)?;

    tracing::info!(path = %path.display(), "Wrote artifact");
    Ok(())
}
