use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "schema-grouper")]
#[command(about = "Group tabular files by header similarity", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory, group its files and optionally save the groups
    Scan {
        /// Directory to scan
        dir: PathBuf,
        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,
        /// Glob matched against file names
        #[arg(short, long)]
        pattern: Option<String>,
        /// Data rows sampled per file for type inference
        #[arg(long)]
        sample_rows: Option<usize>,
        /// Minimum Jaccard similarity for joining a group
        #[arg(short, long, conflicts_with = "exact")]
        threshold: Option<f64>,
        /// Group only files with identical header sets
        #[arg(long)]
        exact: bool,
        /// Write the groups to this JSON snapshot
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Load a snapshot and print its summary
    Show {
        snapshot: PathBuf,
    },
    /// Print the member paths of one group in a snapshot
    Files {
        snapshot: PathBuf,
        group: String,
    },
    /// Print the header similarity of two files
    Similarity {
        file_a: PathBuf,
        file_b: PathBuf,
    },
    /// Print configuration values
    PrintConfig,
}
