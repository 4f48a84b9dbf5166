//! CLI module for Trall.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Trall - a chat-style jukebox for a local audio catalog
///
/// Search a directory of audio files, pick a result interactively, and add
/// new files by streaming them from a direct URL.
/// The name "Trall" comes from the Norwegian word for humming a tune.
#[derive(Parser, Debug)]
#[command(name = "trall")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the catalog directory and write a default config
    Init,

    /// Search the catalog and pick a result to play
    Search {
        /// Regular expression matched against file names (without extension)
        pattern: String,
    },

    /// Stream a remote audio file into the catalog
    Upload {
        /// Direct URL of the audio file
        url: String,

        /// Base name for the stored file (default: <uploader>-<timestamp>)
        name: Option<String>,

        /// Identity to upload as (checked against the allow-list)
        #[arg(short, long, env = "USER")]
        uploader: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
