pub mod commands;
pub mod context;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::deploy_config::DEFAULT_CONFIG_FILE;
use crate::core::services::version_bumper::BumpLevel;

/// Provision, configure and publish Cloudflare Pages projects.
#[derive(Parser, Debug)]
#[command(name = "pagesync", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Target environment: production, preview or development
    #[arg(long, global = true, env = "DEPLOYMENT_ENVIRONMENT")]
    pub env: Option<String>,

    /// Path to the deployment config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Show what would happen without changing anything
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the Pages project if it does not exist yet
    Init,

    /// Push environment variables and bindings to the project
    Sync,

    /// Deploy the build output with the platform CLI
    Publish,

    /// Manage the environment's database
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Manage the public object-storage bucket
    Bucket {
        #[command(subcommand)]
        action: BucketAction,
    },

    /// Show the resolved configuration for the environment
    Show,

    /// Bump the version string of the project manifest
    Bump {
        /// Version component to increment
        #[arg(value_enum)]
        level: BumpPart,
        /// Manifest to edit (default: VERSION_FILE from the config, or package.json)
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum DbAction {
    /// Create the database
    Create,
    /// Apply the schema file to the database
    Migrate,
    /// Create the database and apply the schema
    Provision,
}

#[derive(Subcommand, Debug)]
pub enum BucketAction {
    /// Create the bucket if missing and install its CORS rules
    Setup,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum BumpPart {
    Major,
    Minor,
    Patch,
}

impl From<BumpPart> for BumpLevel {
    fn from(part: BumpPart) -> Self {
        match part {
            BumpPart::Major => BumpLevel::Major,
            BumpPart::Minor => BumpLevel::Minor,
            BumpPart::Patch => BumpLevel::Patch,
        }
    }
}
