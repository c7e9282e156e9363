//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::schema::BindingField;

/// Top-level CLI parser for `propaudit`.
#[derive(Debug, Parser)]
#[command(
    name = "propaudit",
    version,
    about = "Canonicalize component schemas and audit them against the design registry"
)]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Merge a raw schema with overrides into the canonical schema.
    Canonicalize(CanonicalizeArgs),
    /// Audit a canonical schema against the design registry.
    Audit(AuditArgs),
    /// Canonicalize, then audit the result in one run.
    Check(CheckArgs),
}

/// Inputs for canonicalization.
#[derive(Debug, Args)]
pub struct CanonicalizeArgs {
    /// Raw schema JSON produced by the extractor.
    #[arg(long, value_name = "PATH")]
    pub raw: PathBuf,
    /// Override document (JSON). Omit to apply no overrides.
    #[arg(long, value_name = "PATH")]
    pub overrides: Option<PathBuf>,
    /// Where to write the canonical schema. Printed to stdout when omitted.
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

/// Options shared by every command that talks to the registry.
#[derive(Debug, Args)]
pub struct RemoteArgs {
    /// Manifest mapping component names to registry locations.
    #[arg(long, value_name = "PATH")]
    pub manifest: PathBuf,
    /// Write the JSON report here.
    #[arg(long, value_name = "PATH")]
    pub json_out: Option<PathBuf>,
    /// Write the Markdown report here.
    #[arg(long, value_name = "PATH")]
    pub markdown_out: Option<PathBuf>,
    /// Env var holding the registry token (overrides `PROPAUDIT_TOKEN_ENV`).
    #[arg(long, value_name = "VAR")]
    pub token_env: Option<String>,
    /// Binding fields allowed to be unreferenced by layers.
    #[arg(
        long,
        value_name = "FIELD",
        value_delimiter = ',',
        default_values_t = [BindingField::PropOnly, BindingField::VariantAxis]
    )]
    pub ghost_exempt: Vec<BindingField>,
}

/// Inputs for auditing an existing canonical schema.
#[derive(Debug, Args)]
pub struct AuditArgs {
    /// Canonical schema JSON.
    #[arg(long, value_name = "PATH")]
    pub schema: PathBuf,
    /// Registry and report options.
    #[command(flatten)]
    pub remote: RemoteArgs,
}

/// Inputs for the combined pipeline.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Canonicalization inputs.
    #[command(flatten)]
    pub canonicalize: CanonicalizeArgs,
    /// Registry and report options.
    #[command(flatten)]
    pub remote: RemoteArgs,
}
