//! Zone Wreck CLI - Command-line interface for running games and resolving crosscuts.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// Zone Wreck - A deterministic zone invasion board game
#[derive(Parser, Debug)]
#[command(name = "zonewreck")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a game from a JSON list of decisions
    Run {
        /// Decision script (.json)
        #[arg(short, long, required = true)]
        script: PathBuf,

        /// Game config (.json, default: classic rules)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Show only the board at the start of this turn
        #[arg(short, long, conflicts_with_all = ["trace", "quiet"])]
        turn: Option<u32>,

        /// Show every decision with the board after it
        #[arg(long, conflicts_with = "quiet")]
        trace: bool,

        /// Suppress the final board
        #[arg(short, long)]
        quiet: bool,
    },

    /// Detect and resolve crosscuts in a binary grid
    Crosscut {
        /// Grid file (.json, square array of 0/1 rows)
        #[arg(required = true)]
        grid: PathBuf,

        /// Resolve for the player owning this value (0 or 1)
        #[arg(long)]
        stone: Option<u8>,

        /// Cell selections (.json list of {"row", "col"})
        #[arg(long, requires = "stone")]
        script: Option<PathBuf>,

        /// Swap limit (default: 4 x size^2)
        #[arg(long)]
        max_swaps: Option<usize>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },
}

fn main() -> ExitCode {
    zonewreck::logging::init();
    let args = Args::parse();

    let result = match args.command {
        Commands::Run {
            script,
            config,
            format,
            turn,
            trace,
            quiet,
        } => {
            let view = match (turn, trace, quiet) {
                (Some(turn), _, _) => cli::run::View::Turn(turn),
                (None, true, _) => cli::run::View::Trace,
                (None, false, true) => cli::run::View::Quiet,
                (None, false, false) => cli::run::View::Final,
            };
            cli::run::execute(&script, config.as_deref(), format, view)
        }

        Commands::Crosscut {
            grid,
            stone,
            script,
            max_swaps,
            format,
        } => cli::crosscut::execute(&grid, stone, script.as_deref(), max_swaps, format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
