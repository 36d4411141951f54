//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Inspect a club sponsor tree: hierarchy, search, year filter and auto-fit
#[derive(Parser, Debug)]
#[command(name = "clubtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Data file and expansion state shared by the tree-producing commands.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct TreeArgs {
    /// Member data file (default: `data_file` from settings)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Collapse the given member before rendering (repeatable)
    #[arg(long, value_name = "ID")]
    pub collapse: Vec<String>,

    /// Start from a fully collapsed tree
    #[arg(long)]
    pub collapse_all: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the visible hierarchy
    Tree {
        #[command(flatten)]
        tree: TreeArgs,
    },

    /// Highlight members matching a name, nickname or hometown
    Search {
        /// Case-insensitive substring
        query: String,
        #[command(flatten)]
        tree: TreeArgs,
    },

    /// Highlight members who attended a given year
    Year {
        /// Year (default: current year)
        year: Option<i32>,
        #[command(flatten)]
        tree: TreeArgs,
    },

    /// Print the transform that fits the visible tree into a viewport
    Fit {
        /// Viewport width in pixels
        #[arg(long, default_value_t = 1280.0)]
        width: f64,
        /// Viewport height in pixels
        #[arg(long, default_value_t = 800.0)]
        height: f64,
        #[command(flatten)]
        tree: TreeArgs,
    },

    /// Show one member's details
    Show {
        /// Member id
        id: String,
        /// Member data file (default: `data_file` from settings)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Print effective settings as TOML
    Config,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
