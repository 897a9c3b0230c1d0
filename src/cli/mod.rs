//! Command-line surface
//!
//! # Modules
//!
//! - [`context`]: Catalogs, advisory repository and applied record for one run
//! - [`commands`]: `list`, `dump`, `test`, `pretend` and `inject`

pub mod commands;
pub mod context;

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Overrides;
use crate::version::resolver::UpgradeStrategy;

pub use context::Context;

#[derive(Debug, Parser)]
#[command(name = "glsa-check")]
#[command(version, about = "Check the system against Gentoo Linux Security Advisories")]
pub struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/glsa-check/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Architecture keyword to check for
    #[arg(long, global = true)]
    pub arch: Option<String>,

    /// Directory holding the advisories
    #[arg(long, global = true)]
    pub glsa_dir: Option<PathBuf>,

    /// File recording applied advisories
    #[arg(long, global = true)]
    pub checkfile: Option<PathBuf>,

    /// Installed package database
    #[arg(long, global = true)]
    pub vdb_dir: Option<PathBuf>,

    /// Package repository listing available versions
    #[arg(long, global = true)]
    pub repo_dir: Option<PathBuf>,

    /// JSON list of installed package records, used instead of --vdb-dir
    #[arg(long, global = true)]
    pub installed_catalog: Option<PathBuf>,

    /// JSON list of available package records, used instead of --repo-dir
    #[arg(long, global = true)]
    pub available_catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List advisories and whether this system is affected
    List {
        /// Only show advisories affecting this system
        #[arg(long)]
        only_affected: bool,
        /// IDs, files, `all`, `new` or `affected`
        #[arg(default_value = "all")]
        targets: Vec<String>,
    },
    /// Show advisories in full
    Dump {
        #[arg(required = true)]
        targets: Vec<String>,
    },
    /// Print the IDs of advisories this system is affected by
    Test {
        #[arg(required = true)]
        targets: Vec<String>,
    },
    /// Show the upgrades that would fix each advisory
    Pretend {
        /// Upgrade to the latest version instead of the smallest fix
        #[arg(long)]
        latest: bool,
        #[arg(required = true)]
        targets: Vec<String>,
    },
    /// Mark advisories as applied
    Inject {
        #[arg(required = true)]
        targets: Vec<String>,
    },
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            glsa_dir: self.glsa_dir.clone(),
            arch: self.arch.clone(),
            checkfile: self.checkfile.clone(),
            vdb_dir: self.vdb_dir.clone(),
            repo_dir: self.repo_dir.clone(),
            installed_catalog: self.installed_catalog.clone(),
            available_catalog: self.available_catalog.clone(),
        }
    }
}

/// Run `command`, writing its report to `out`
pub fn run(ctx: &Context, command: &Command, out: &mut dyn Write) -> anyhow::Result<()> {
    match command {
        Command::List {
            only_affected,
            targets,
        } => commands::list(ctx, targets, *only_affected, out),
        Command::Dump { targets } => commands::dump(ctx, targets, out),
        Command::Test { targets } => commands::test(ctx, targets, out),
        Command::Pretend { latest, targets } => commands::pretend(
            ctx,
            targets,
            UpgradeStrategy::from_minimize(!latest),
            out,
        ),
        Command::Inject { targets } => commands::inject(ctx, targets, out),
    }
}
