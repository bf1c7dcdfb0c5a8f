//! # groundwork-core
//!
//! Deterministic grounding constraints from a governance protocol.
//!
//! This crate answers two questions for a loaded protocol document:
//! - How must a response to this query be sourced, cited and bounded?
//! - Does this candidate response use vocabulary the protocol rules out?
//!
//! ## Key Guarantees
//!
//! 1. **Pure**: [`derive_constraints`] and [`validate_response`] do no I/O
//! 2. **Deterministic**: Same input always produces same output
//! 3. **Additive documents**: Missing optional fields take declared defaults
//!    instead of failing
//! 4. **Describes, never enforces**: Output is advisory data for a caller
//!
//! ## Example
//!
//! ```rust,ignore
//! use groundwork_core::{derive_constraints, validate_response, Location, ProtocolDocument};
//!
//! let doc = ProtocolDocument::load(&Location::new("."))?;
//! let constraints = derive_constraints("What is the boiling point of water?", doc.protocol());
//! let report = validate_response("We guarantee it boils at 100C.", doc.protocol());
//!
//! if !report.valid {
//!     for v in &report.violations {
//!         println!("violation: {}", v.value());
//!     }
//! }
//! ```

pub mod artifacts;
pub mod config;
pub mod constraints;
pub mod legacy;
pub mod protocol;
pub mod sources;
pub mod validator;

// Re-export main types at crate root
pub use artifacts::{grounding_artifact, integrity_metrics, write_artifact, ArtifactError};
pub use config::Location;
pub use constraints::{derive_constraints, GroundingConstraints, GroundingResult};
pub use protocol::{DocumentError, Protocol, ProtocolDocument};
pub use sources::{SourceContent, SourceDirectory};
pub use validator::{validate_response, PassedCheck, ValidationReport, Violation};
