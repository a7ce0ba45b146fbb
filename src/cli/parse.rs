//! CLI parse: clap types for metarouter. No behavior; definitions only.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Metarouter CLI - inspect hash fragments and simulate shell routing
#[derive(Parser)]
#[command(name = "metarouter")]
#[command(about = "Micro frontend shell routing: hash codec and router simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Router configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a location hash into outlet routes
    Decode {
        /// Hash fragment, with or without the leading '#'
        hash: String,
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Encode outlet routes into a location hash
    Encode {
        /// Entries as outlet=route, e.g. outlet=televet/pets/0 side=chat
        #[arg(required = true)]
        entries: Vec<String>,
    },
    /// Run the shell router against an in-memory page and report the result
    Simulate {
        /// Initial location hash
        #[arg(long, default_value = "")]
        hash: String,
        /// Page origin
        #[arg(long, default_value = "http://localhost")]
        origin: String,
        /// Create every frame before navigating
        #[arg(long)]
        preload: bool,
        /// Navigate after init, as path or path/sub-route (repeatable)
        #[arg(long = "go")]
        go: Vec<String>,
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}
