use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "score",
    about = "Generate a Compose Project from Score Workload Specs",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Prime, provision and convert one or more workloads into a Compose Project.
    Generate {
        /// Workload Spec YAML files, or directories of them (spec §6).
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Where to write the generated Compose Project.
        #[arg(short, long, default_value = "compose.yaml")]
        output: PathBuf,

        /// Directory holding state.yaml and provisioned file mounts.
        #[arg(long, default_value = ".score-state")]
        state_dir: PathBuf,

        /// Compose project name recorded in state.yaml.
        #[arg(long, default_value = "score-compose")]
        project_name: String,

        /// Require the running engine to satisfy a version constraint
        /// (e.g. ">=1.0.0") before doing anything else.
        #[arg(long)]
        require_version: Option<String>,
    },
}
