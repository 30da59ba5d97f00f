// ABOUTME: Command line interface: run a checklist, or build and launch the ckl container

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "ckl",
    version,
    about = "Work through a checklist in the terminal",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Path to checklist, e.g. lists/travel/full.ckl
    pub path_to_checklist: Option<PathBuf>,

    /// Delete saved sessions before opening the checklist
    #[arg(long)]
    pub clear_sessions: bool,

    /// Config file to use instead of ./ckl.toml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build or launch the ckl container image
    #[command(subcommand)]
    Image(ImageCommand),
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum ImageCommand {
    /// Build the image from the Dockerfile in the build context
    Build {
        /// Do not use the build cache
        #[arg(long)]
        no_cache: bool,
        /// Always pull the base image
        #[arg(long)]
        pull: bool,
        /// Image tag (defaults to the configured image name)
        #[arg(long, short)]
        tag: Option<String>,
        /// Build context directory
        #[arg(long, default_value = ".")]
        context: PathBuf,
    },
    /// Start a shell in a container with the current directory mounted
    Shell {
        /// Empty the sessions directory first
        #[arg(long)]
        clear_sessions: bool,
    },
    /// Run the image's default command, or ckl with the given arguments
    Run {
        /// Empty the sessions directory first
        #[arg(long)]
        clear_sessions: bool,
        /// Arguments passed to ckl inside the container
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}
