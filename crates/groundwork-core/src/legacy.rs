//! Legacy governed instruction set.
//!
//! A static configuration object kept for compatibility with older agents.
//! It is shipped verbatim and never interpreted; prefer protocol-driven
//! derivation.

use serde_json::Value;
use std::sync::OnceLock;

/// Embedded instruction set (loaded at compile time).
const GOVERNED_INSTRUCTION_SET_JSON: &str =
    include_str!("../assets/governed_instruction_set.json");

static PARSED: OnceLock<Result<Value, String>> = OnceLock::new();

/// The embedded instruction set as raw JSON text.
pub fn governed_instruction_set_json() -> &'static str {
    GOVERNED_INSTRUCTION_SET_JSON
}

/// The embedded instruction set, parsed once.
pub fn governed_instruction_set() -> Result<&'static Value, String> {
    PARSED
        .get_or_init(|| {
            serde_json::from_str(GOVERNED_INSTRUCTION_SET_JSON)
                .map_err(|e| format!("Invalid embedded instruction set: {}", e))
        })
        .as_ref()
        .map_err(Clone::clone)
}
