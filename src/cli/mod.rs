//! CLI entry point for Swarm.

pub mod repl;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Swarm multi-agent CLI
#[derive(Parser, Debug)]
#[command(name = "swarm", version, about = "Swarm: multi-agent orchestration demo")]
pub struct Cli {
    /// Path to a config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Chat with the English/Spanish handoff demo
    Chat(ChatArgs),
}

/// Arguments for the `chat` subcommand.
#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Model to use for every agent (overrides the agents' own models)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Stream responses as they arrive
    #[arg(long)]
    pub stream: bool,

    /// Maximum tool-executing turns per input
    #[arg(long)]
    pub max_turns: Option<usize>,

    /// Log per-turn diagnostics
    #[arg(short, long)]
    pub debug: bool,
}
