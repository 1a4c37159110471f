// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Linkstate CLI - link-state routing simulator

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use linkstate::commands::{self, render::Output, RunArgs};
use linkstate::config;
use linkstate::types::Mode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "linkstate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "LSR_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", global = true, value_parser = clap::builder::FalseyValueParser::new())]
    no_color: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct EngineArgs {
    /// Source router
    #[arg(short, long)]
    source: Option<String>,

    /// Engine mode (batch, incremental)
    #[arg(short, long)]
    mode: Option<Mode>,

    /// Ignore a link identical to one already loaded
    #[arg(long)]
    dedup: bool,
}

impl From<EngineArgs> for RunArgs {
    fn from(args: EngineArgs) -> Self {
        Self {
            source: args.source,
            mode: args.mode,
            dedup: args.dedup,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compute shortest paths from a source router
    Route {
        /// Topology file (.lsa)
        topology: PathBuf,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Print every router with its links
    Relations {
        /// Topology file (.lsa)
        topology: PathBuf,

        /// Output format (text, dot, lsa)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Ignore a link identical to one already loaded
        #[arg(long)]
        dedup: bool,
    },

    /// Apply a script of topology edits and recomputations
    Replay {
        /// Topology file (.lsa)
        topology: PathBuf,

        /// Script file
        script: PathBuf,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 if cli.quiet => tracing::Level::ERROR,
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = config::load(cli.config.as_deref())?;
    let output = Output {
        json: cli.json,
        color: config.color && !cli.no_color,
    };

    // Execute command
    match cli.command {
        Commands::Route { topology, engine } => {
            commands::route::run(&topology, &RunArgs::from(engine), &config, output)
        }
        Commands::Relations { topology, format, dedup } => {
            let options = RunArgs { dedup, ..RunArgs::default() }.load_options(&config);
            commands::relations::run(&topology, &format, options, output)
        }
        Commands::Replay { topology, script, engine } => {
            commands::replay::run(&topology, &script, &RunArgs::from(engine), &config, output)
        }
        Commands::Completions { shell } => {
            commands::completions::run(shell, &mut Cli::command())
        }
    }
}
