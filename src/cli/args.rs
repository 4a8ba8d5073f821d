//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

/// Replay a printed Maven dependency tree into an offline repository
#[derive(Parser, Debug)]
#[command(name = "mvn-offline")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity: -v info, -vv debug, -vvv trace
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Project directory, holds .mvn-offline.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options shared by commands that read a dependency tree report.
#[derive(Args, Debug, Clone, Default)]
pub struct ReportArgs {
    /// `mvn -B dependency:tree` output (default: <dir>/dep_tree.txt)
    #[arg(value_hint = ValueHint::FilePath)]
    pub report: Option<PathBuf>,

    /// Directory with copied libraries and poms
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    /// Line prefix that opens the tree, e.g. "[INFO] com.example:app:jar"
    #[arg(long)]
    pub root: Option<String>,

    /// Fail on tree lines without a branch marker
    #[arg(long)]
    pub strict: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install every dependency of the tree, parents first, then leftover poms
    Install {
        #[command(flatten)]
        report: ReportArgs,

        /// Install into this repository instead of Maven's default
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        repo: Option<PathBuf>,

        /// Print the install commands without running them
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Show the reconstructed dependency tree
    Tree {
        #[command(flatten)]
        report: ReportArgs,
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

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show config file locations
    Path,
    /// Print a commented config template
    Template,
}
