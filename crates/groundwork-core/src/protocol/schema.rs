//! Typed protocol schema.
//!
//! Every optional field of the governance document is declared here together
//! with its default, so consumers never restate fallback values. Missing
//! sections deserialize to their `Default` impl.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default `sourcing.requirement`.
pub const DEFAULT_SOURCING_REQUIREMENT: &str = "verifiable_sources";
/// Default `sourcing.grounding_technique`.
pub const DEFAULT_GROUNDING_TECHNIQUE: &str = "RAG";
/// Default `sourcing.citation_style`.
pub const DEFAULT_CITATION_STYLE: &str = "link_to_source";
/// Default `sourcing.data_sources.description`.
pub const DEFAULT_DATA_SOURCES_DESCRIPTION: &str =
    "Where to grab data from; functional retrieval targets.";
/// Default `boundaries.personalSpace`.
pub const DEFAULT_PERSONAL_SPACE: &str = "no_probe";
/// Default `boundaries.domain`.
pub const DEFAULT_BOUNDARY_DOMAIN: &str = "no_model";
/// Default `boundaries.focus`.
pub const DEFAULT_BOUNDARY_FOCUS: &str = "objective_only";
/// Default `identity.representation`.
pub const DEFAULT_REPRESENTATION: &str = "machine";
/// Default `integrity_protocol.version`.
pub const DEFAULT_INTEGRITY_VERSION: &str = "0.0.0";

fn default_requirement() -> String {
    DEFAULT_SOURCING_REQUIREMENT.to_string()
}

fn default_grounding_technique() -> String {
    DEFAULT_GROUNDING_TECHNIQUE.to_string()
}

fn default_citation_style() -> String {
    DEFAULT_CITATION_STYLE.to_string()
}

fn default_data_sources_description() -> String {
    DEFAULT_DATA_SOURCES_DESCRIPTION.to_string()
}

fn default_personal_space() -> String {
    DEFAULT_PERSONAL_SPACE.to_string()
}

fn default_boundary_domain() -> String {
    DEFAULT_BOUNDARY_DOMAIN.to_string()
}

fn default_boundary_focus() -> String {
    DEFAULT_BOUNDARY_FOCUS.to_string()
}

fn default_representation() -> String {
    DEFAULT_REPRESENTATION.to_string()
}

fn default_integrity_version() -> Value {
    Value::from(DEFAULT_INTEGRITY_VERSION)
}

fn default_odds() -> Value {
    Value::String(String::new())
}

/// The whole governance document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Protocol {
    /// Governance rules
    #[serde(default)]
    pub operational_protocol: OperationalProtocol,

    /// Versioning and disclosure metadata
    #[serde(default)]
    pub integrity_protocol: IntegrityProtocol,

    /// Output schema description, passed through uninterpreted
    #[serde(default)]
    pub output_schema: Value,
}

/// `operational_protocol` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OperationalProtocol {
    #[serde(default)]
    pub sourcing: Sourcing,

    #[serde(default, rename = "corePrinciples")]
    pub core_principles: CorePrinciples,

    #[serde(default)]
    pub boundaries: Boundaries,

    #[serde(default)]
    pub identity: Identity,

    #[serde(default)]
    pub vocabulary: Vocabulary,
}

/// `operational_protocol.sourcing`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sourcing {
    #[serde(default = "default_requirement")]
    pub requirement: String,

    #[serde(default)]
    pub domains: Vec<String>,

    #[serde(default = "default_grounding_technique")]
    pub grounding_technique: String,

    #[serde(default = "default_citation_style")]
    pub citation_style: String,

    #[serde(default)]
    pub data_sources: DataSources,
}

impl Default for Sourcing {
    fn default() -> Self {
        Self {
            requirement: default_requirement(),
            domains: Vec::new(),
            grounding_technique: default_grounding_technique(),
            citation_style: default_citation_style(),
            data_sources: DataSources::default(),
        }
    }
}

/// `operational_protocol.sourcing.data_sources`: retrieval targets.
///
/// Field order matches the order the deriver emits them in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataSources {
    #[serde(default = "default_data_sources_description")]
    pub description: String,

    /// Local files, in retrieval precedence order
    #[serde(default)]
    pub local_paths: Vec<LocalPath>,

    #[serde(default)]
    pub retrieval_urls: Vec<String>,

    #[serde(default)]
    pub allowed_origins: Vec<String>,

    #[serde(default)]
    pub retrieval_order: Vec<String>,
}

impl Default for DataSources {
    fn default() -> Self {
        Self {
            description: default_data_sources_description(),
            local_paths: Vec::new(),
            retrieval_urls: Vec::new(),
            allowed_origins: Vec::new(),
            retrieval_order: Vec::new(),
        }
    }
}

/// A declared local data source.
///
/// The entry is kept exactly as declared (key order and unknown keys
/// included) so it can be echoed back untouched. `id` is expected to be
/// unique within a document; nothing here enforces it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct LocalPath(Map<String, Value>);

impl LocalPath {
    pub fn id(&self) -> &str {
        self.str_field("id")
    }

    /// Path relative to the workspace root (absolute paths are kept as-is)
    pub fn path(&self) -> &str {
        self.str_field("path")
    }

    pub fn description(&self) -> &str {
        self.str_field("description")
    }

    /// The entry as declared.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    fn str_field(&self, key: &str) -> &str {
        self.0.get(key).and_then(Value::as_str).unwrap_or_default()
    }
}

impl From<Map<String, Value>> for LocalPath {
    fn from(entry: Map<String, Value>) -> Self {
        Self(entry)
    }
}

/// `operational_protocol.corePrinciples`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CorePrinciples {
    #[serde(default)]
    pub narrative: Narrative,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Narrative {
    #[serde(default)]
    pub injection_prevention: Vec<String>,
}

/// `operational_protocol.boundaries`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Boundaries {
    #[serde(default = "default_personal_space", rename = "personalSpace")]
    pub personal_space: String,

    #[serde(default = "default_boundary_domain")]
    pub domain: String,

    #[serde(default = "default_boundary_focus")]
    pub focus: String,

    #[serde(default)]
    pub rules: Vec<String>,

    #[serde(default)]
    pub ethical_considerations: Vec<String>,
}

impl Default for Boundaries {
    fn default() -> Self {
        Self {
            personal_space: default_personal_space(),
            domain: default_boundary_domain(),
            focus: default_boundary_focus(),
            rules: Vec::new(),
            ethical_considerations: Vec::new(),
        }
    }
}

/// `operational_protocol.identity`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Identity {
    #[serde(default = "default_representation")]
    pub representation: String,

    #[serde(default)]
    pub language: Language,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            representation: default_representation(),
            language: Language::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Language {
    /// Phrases a response should not use
    #[serde(default)]
    pub avoid: Vec<String>,
}

/// `operational_protocol.vocabulary`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Vocabulary {
    #[serde(default)]
    pub banned_terms: Vec<String>,
}

/// `integrity_protocol` section.
///
/// `version` and `operational_spec` are only echoed into metrics, so any
/// JSON value is accepted for them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntegrityProtocol {
    #[serde(default = "default_integrity_version")]
    pub version: Value,

    #[serde(default)]
    pub disclosure_schema: DisclosureSchema,

    #[serde(default)]
    pub operational_spec: Value,
}

impl Default for IntegrityProtocol {
    fn default() -> Self {
        Self {
            version: default_integrity_version(),
            disclosure_schema: DisclosureSchema::default(),
            operational_spec: Value::Null,
        }
    }
}

impl IntegrityProtocol {
    /// `operational_spec.odds`, or `""` when absent.
    pub fn odds(&self) -> Value {
        self.operational_spec
            .get("odds")
            .cloned()
            .unwrap_or_else(default_odds)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DisclosureSchema {
    /// Names of the metrics a disclosure must carry
    #[serde(default)]
    pub fields: Vec<String>,
}

impl Protocol {
    /// Banned vocabulary, in declaration order.
    pub fn banned_terms(&self) -> &[String] {
        &self.operational_protocol.vocabulary.banned_terms
    }

    /// Phrases to avoid, in declaration order.
    pub fn avoided_phrases(&self) -> &[String] {
        &self.operational_protocol.identity.language.avoid
    }

    /// Declared retrieval targets.
    pub fn data_sources(&self) -> &DataSources {
        &self.operational_protocol.sourcing.data_sources
    }
}
