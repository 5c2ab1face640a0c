use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use myco_core::species_import::DEFAULT_SKIP_LINES;

/// Top-level parser for the `myco` binary.
#[derive(Debug, Parser)]
#[command(name = "myco", version, about = "Operator tools for the Myco findings database")]
pub struct Cli {
    /// PostgreSQL connection string
    #[arg(long, global = true, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Import the species checklist into the taxonomy and catalogue
    ImportSpecies(ImportSpeciesArgs),

    /// List findings whose species no longer exists
    CheckOrphans,

    /// Record random demo findings for a user
    GenerateFindings(GenerateFindingsArgs),

    /// Promote a user to admin
    GrantAdmin(GrantAdminArgs),
}

#[derive(Debug, Args)]
pub struct ImportSpeciesArgs {
    /// Semicolon-separated checklist export
    #[arg(long)]
    pub file: PathBuf,

    /// Leading records to skip (header lines)
    #[arg(long, default_value_t = DEFAULT_SKIP_LINES)]
    pub skip_lines: usize,

    /// Delete all species and taxa before importing
    #[arg(long)]
    pub clear: bool,
}

#[derive(Debug, Args)]
pub struct GenerateFindingsArgs {
    /// Owner of the generated findings
    #[arg(long, default_value = "testuser")]
    pub username: String,

    /// Number of findings to create
    #[arg(long, default_value_t = 30)]
    pub count: u32,
}

#[derive(Debug, Args)]
pub struct GrantAdminArgs {
    /// Email address of the user to promote
    #[arg(long)]
    pub email: String,
}
