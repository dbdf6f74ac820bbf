//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Streaming GEDCOM parser: incremental line-to-tree reconstruction
#[derive(Parser, Debug)]
#[command(name = "rsged")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug output (-d, -dd, -ddd)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Emit records as JSON, one tree per line, in input order
    Json {
        /// GEDCOM file (stdin if omitted)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,

        /// Pretty-print each record
        #[arg(short, long)]
        pretty: bool,
    },

    /// Show records as indented trees
    Tree {
        /// GEDCOM file (stdin if omitted)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Summarize record counts and nesting depth
    Stats {
        /// GEDCOM file (stdin if omitted)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Scan a directory for .ged files and report record counts
    Scan {
        /// Directory to search (default: cwd)
        #[arg(value_hint = ValueHint::DirPath)]
        dir: Option<PathBuf>,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
