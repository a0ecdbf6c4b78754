//! Run command implementation.

use std::path::Path;

use zonewreck::replay::{Recording, ReplayEngine};
use zonewreck::runner::DEFAULT_MAX_DECISIONS;
use zonewreck::{GameConfig, ScriptedSource, run_game};

use super::output::{JsonGameResult, format_text};
use super::{CliError, OutputFormat, read_file};

/// What to show besides the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum View {
    /// Final board (text only).
    Final,
    /// Only the board at the start of this turn.
    Turn(u32),
    /// Every decision with the board after it.
    Trace,
    /// Nothing but the result.
    Quiet,
}

/// Execute the run command.
///
/// The finished game is kept as an in-memory recording and stepped through
/// again for `View::Turn` and `View::Trace`.
///
/// # Errors
///
/// Returns an error if an input file is invalid or the script does not
/// finish the game.
pub(crate) fn execute(
    script: &Path,
    config: Option<&Path>,
    format: OutputFormat,
    view: View,
) -> Result<(), CliError> {
    let config = match config {
        Some(path) => GameConfig::load(path)
            .map_err(|e| CliError::new(format!("Invalid config {}: {e}", path.display())))?,
        None => GameConfig::default(),
    };

    let mut source = ScriptedSource::from_json(&read_file(script)?)
        .map_err(|e| CliError::new(format!("Invalid script {}: {e}", script.display())))?;

    if view != View::Quiet && format == OutputFormat::Text {
        println!(
            "Running {} decisions on a {size}x{size} board...",
            source.remaining(),
            size = config.board_size
        );
        println!();
    }

    let result = run_game(config, &mut source, DEFAULT_MAX_DECISIONS)?;
    let recording = Recording::from_result(config, &result);

    match view {
        View::Turn(turn) => return print_turn(recording, turn, format),
        View::Trace => match format {
            OutputFormat::Text => print_text_trace(&mut ReplayEngine::new(recording)?)?,
            OutputFormat::Json => return print_json_trace(&mut ReplayEngine::new(recording)?),
        },
        View::Final if format == OutputFormat::Text => {
            let mut engine = ReplayEngine::new(recording)?;
            engine.run_to_end()?;
            println!("{}", engine.render_ascii());
        }
        View::Final | View::Quiet => {}
    }

    match format {
        OutputFormat::Text => print!("{}", format_text(&result)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonGameResult::from_game_result(&result))?;
            println!("{json}");
        }
    }

    Ok(())
}

fn print_turn(recording: Recording, turn: u32, format: OutputFormat) -> Result<(), CliError> {
    let engine = ReplayEngine::new_at_turn(recording, turn)?;
    match format {
        OutputFormat::Text => println!("{}", engine.render_ascii()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(engine.session().game())?),
    }
    Ok(())
}

fn print_text_trace(engine: &mut ReplayEngine) -> Result<(), CliError> {
    println!("{}", engine.render_ascii());
    let decisions = engine.recording().decisions.clone();
    for (index, decision) in decisions.iter().enumerate() {
        engine.step_forward()?;
        println!("--- decision {index}: {} ---", serde_json::to_string(decision)?);
        println!("{}", engine.render_ascii());
    }
    Ok(())
}

fn print_json_trace(engine: &mut ReplayEngine) -> Result<(), CliError> {
    let events = engine.run_to_end()?;
    println!("{}", serde_json::to_string_pretty(&events)?);
    Ok(())
}
