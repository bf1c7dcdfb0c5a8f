use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const PROTOCOL: &str = r#"{
  "operational_protocol": {
    "sourcing": {
      "requirement": "verifiable_sources",
      "domains": ["science"],
      "data_sources": {
        "local_paths": [
          {"id": "facts", "path": "data/facts.json", "description": "Reference facts"},
          {"id": "notes", "path": "data/notes.md", "description": "Working notes"},
          {"id": "gone", "path": "data/gone.txt", "description": "Never written"}
        ],
        "retrieval_urls": ["https://example.org/remote.json"]
      }
    },
    "identity": {"language": {"avoid": ["as an AI"]}},
    "vocabulary": {"banned_terms": ["guarantee"]}
  },
  "integrity_protocol": {
    "version": "3.0.0",
    "disclosure_schema": {"fields": ["model_version", "open_audit_cases", "custom"]}
  }
}"#;

pub struct TestEnv {
    _tmp: TempDir,
    pub root: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let root = tmp.path().to_path_buf();

        write(&root.join("protocol/protocol.json"), PROTOCOL);
        write(&root.join("data/facts.json"), r#"{"water_boils_c": 100}"#);
        write(&root.join("data/notes.md"), "boiling point at sea level");

        Self { _tmp: tmp, root }
    }

    /// A workspace with no protocol file.
    pub fn empty() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let root = tmp.path().to_path_buf();
        Self { _tmp: tmp, root }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("groundwork").expect("binary built");
        cmd.arg("--root")
            .arg(&self.root)
            .env_remove("GROUNDWORK_ROOT")
            .env_remove("GROUNDWORK_PROTOCOL")
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }
}

pub fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, contents).expect("write fixture");
}
