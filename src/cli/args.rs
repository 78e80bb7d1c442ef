//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Mine unit phrases that follow numbers in tagged sentences
#[derive(Parser, Debug)]
#[command(name = "unitminer")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Turn debugging information on (repeat for more: -dd, -ddd)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Run-specific config file, merged over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Grow the unit tree over corpus tables and write the mined units
    Mine {
        /// Corpus tables or directories containing *.tsv tables
        #[arg(required = true, value_hint = ValueHint::AnyPath)]
        inputs: Vec<PathBuf>,

        /// Table of every mined unit
        #[arg(long, default_value = "units.tsv", value_hint = ValueHint::FilePath)]
        units: PathBuf,

        /// Table of units passing the acceptance filter
        #[arg(long, default_value = "units_filtered.tsv", value_hint = ValueHint::FilePath)]
        filtered: PathBuf,

        /// Write a tree snapshot per growth round into this directory
        #[arg(long, value_hint = ValueHint::DirPath)]
        trace_dir: Option<PathBuf>,

        /// Support a group needs to become a tree node
        #[arg(long)]
        min_support: Option<usize>,

        /// Support a unit needs to be accepted
        #[arg(long)]
        min_count: Option<usize>,
    },

    /// Apply the acceptance filter to a previously mined table
    Filter {
        /// Mined units table
        #[arg(value_hint = ValueHint::FilePath)]
        units: PathBuf,

        /// Output table
        #[arg(value_hint = ValueHint::FilePath)]
        output: PathBuf,

        /// Support a unit needs to be accepted
        #[arg(long)]
        min_count: Option<usize>,
    },

    /// Grow the unit tree and print it
    Tree {
        /// Corpus tables or directories containing *.tsv tables
        #[arg(required = true, value_hint = ValueHint::AnyPath)]
        inputs: Vec<PathBuf>,

        /// Support a group needs to become a tree node
        #[arg(long)]
        min_support: Option<usize>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print a config template
    Template,

    /// Show config paths
    Path,
}
