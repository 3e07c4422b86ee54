use clap::Parser;
use std::path::PathBuf;

/// Batch EPUB quality assessment tool
///
/// Walks a batch directory for EPUB files, runs each one through the
/// structural validator (epubcheck) and the schema-rule validator
/// (probatron), and reconciles both reports into a pass/fail verdict per
/// file plus a detail log.
#[derive(Parser, Debug, Clone)]
#[command(name = "validate-epub")]
#[command(about = "Batch-validate EPUB files with epubcheck and probatron")]
#[command(version)]
pub struct Cli {
    /// Directory tree to scan for EPUB files
    #[arg(help = "Batch directory to scan recursively")]
    pub batch_dir: PathBuf,

    /// Directory for logs and intermediate report artifacts
    #[arg(help = "Output directory (created if absent)")]
    pub out_dir: PathBuf,

    /// Schema reference: a profile role (master, access, target) or a
    /// schema file path
    #[arg(help = "Schema role from the profile, or a schema file path")]
    pub schema: String,

    /// Path to the tool configuration file (TOML or JSON)
    #[arg(short = 'c', long = "config", default_value = "config.toml")]
    pub config: PathBuf,

    /// Path to the profile file naming the master/access/target schemas
    #[arg(short = 'p', long = "profile")]
    pub profile: Option<PathBuf>,

    /// File extension to match (case-insensitive substring)
    #[arg(
        short = 'e',
        long = "extension",
        default_value = "epub",
        help = "Extension substring to match, e.g. 'epub'"
    )]
    pub extension: String,

    /// Per-validator-invocation timeout in seconds
    #[arg(long = "timeout", default_value = "300")]
    pub timeout: u64,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
