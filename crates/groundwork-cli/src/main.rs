//! groundwork CLI
//!
//! Derives grounding constraints from a protocol document and checks
//! candidate responses against its vocabulary rules. Output is JSON on
//! stdout; logs go to stderr (`RUST_LOG` controls the level).

use anyhow::Context;
use clap::{Args, Parser};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use groundwork_core::artifacts::{GROUNDING_ARTIFACT_PATH, METRICS_ARTIFACT_PATH};
use groundwork_core::{
    derive_constraints, grounding_artifact, integrity_metrics, legacy, validate_response,
    write_artifact, Location, ProtocolDocument, SourceDirectory,
};

/// Query used when no action flag is given.
const DEFAULT_QUERY: &str = "Any query: use this repository as the logical substrate; structure data and attributions so the user can establish whether the response is truthful.";

#[derive(Parser, Debug)]
#[command(name = "groundwork", version)]
#[command(about = "Grounding constraints from a governance protocol; you establish truthfulness.")]
struct Cli {
    /// Workspace root; data-source paths resolve against it
    #[arg(long, env = "GROUNDWORK_ROOT", default_value = ".")]
    root: PathBuf,

    /// Protocol file (default: <root>/protocol/protocol.json)
    #[arg(long, env = "GROUNDWORK_PROTOCOL")]
    protocol: Option<PathBuf>,

    #[command(flatten)]
    action: Action,
}

#[derive(Args, Debug)]
#[group(required = false, multiple = false)]
struct Action {
    /// Return the grounding constraints for this query
    #[arg(long, value_name = "Q")]
    query: Option<String>,

    /// Check a candidate response against the protocol vocabulary
    #[arg(long, value_name = "TEXT")]
    validate_response: Option<String>,

    /// Print the protocol document as loaded
    #[arg(long)]
    dump_protocol: bool,

    /// Print the legacy governed instruction set
    #[arg(long)]
    dump_governed: bool,

    /// Print where data must be retrieved from
    #[arg(long)]
    sources: bool,

    /// Load and print the contents of local data sources
    #[arg(long)]
    load_sources: bool,

    /// Regenerate .well-known/grounding-constraints.json under the root
    #[arg(long)]
    publish_constraints: bool,

    /// Regenerate .well-known/integrity/metrics.json under the root
    #[arg(long)]
    publish_metrics: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut location = Location::new(&cli.root);
    if let Some(path) = &cli.protocol {
        location = location.with_protocol_path(path);
    }

    let action = cli.action;

    if action.dump_governed {
        let set = legacy::governed_instruction_set().map_err(anyhow::Error::msg)?;
        return print_json(set);
    }

    let doc = load(&location)?;
    let protocol = doc.protocol();

    if let Some(query) = action.query {
        return print_json(&derive_constraints(&query, protocol));
    }

    if let Some(text) = action.validate_response {
        return print_json(&validate_response(&text, protocol));
    }

    if action.dump_protocol {
        return print_json(doc.raw());
    }

    let directory = SourceDirectory::new(location.root());

    if action.sources {
        return print_json(&directory.summarize(protocol, doc.data_sources()));
    }

    if action.load_sources {
        return print_json(&directory.load_local_sources_map(protocol));
    }

    if action.publish_constraints {
        let path = location.resolve(GROUNDING_ARTIFACT_PATH);
        write_artifact(&path, &grounding_artifact(protocol))?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    if action.publish_metrics {
        let path = location.resolve(METRICS_ARTIFACT_PATH);
        write_artifact(&path, &integrity_metrics(protocol))?;
        println!("Wrote sample metrics to {}", path.display());
        return Ok(());
    }

    print_json(&derive_constraints(DEFAULT_QUERY, protocol))
}

fn load(location: &Location) -> anyhow::Result<ProtocolDocument> {
    let path = location.protocol_path();
    let doc = ProtocolDocument::load(location)
        .with_context(|| format!("Failed to load protocol from {}", path.display()))?;
    tracing::debug!(path = %path.display(), "Loaded protocol");
    Ok(doc)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
