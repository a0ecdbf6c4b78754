//! Crosscut command implementation.

use std::path::Path;

use serde::Serialize;
use zonewreck::crosscut::{
    Cell, Crosscut, Grid, ResolutionEnd, ResolutionRequest, Resolver, ResolverConfig, Stone,
    find_crosscuts, resolve_with,
};

use super::{CliError, OutputFormat, read_file};

/// JSON-serializable crosscut report.
#[derive(Debug, Serialize)]
struct JsonCrosscutReport<'a> {
    /// Crosscuts in the input grid.
    crosscuts: &'a [Crosscut],
    /// Resolution summary, when a stone was given.
    resolution: Option<JsonResolution>,
}

/// JSON-serializable resolution summary.
#[derive(Debug, Serialize)]
struct JsonResolution {
    /// Player value.
    stone: Stone,
    /// Swaps applied.
    swaps: usize,
    /// Why resolution stopped (null if the script ran out first).
    outcome: Option<ResolutionEnd>,
    /// Crosscuts left.
    remaining: usize,
    /// Final grid.
    grid: Grid,
}

/// Execute the crosscut command.
///
/// Without `stone`, only counts crosscuts. With it, resolves for that player:
/// cells come from `script` if given, otherwise the first offered option is
/// always taken.
///
/// # Errors
///
/// Returns an error if an input file is invalid.
pub(crate) fn execute(
    grid_path: &Path,
    stone: Option<u8>,
    script: Option<&Path>,
    max_swaps: Option<usize>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let grid: Grid = serde_json::from_str(&read_file(grid_path)?)
        .map_err(|e| CliError::new(format!("Invalid grid {}: {e}", grid_path.display())))?;
    let crosscuts = find_crosscuts(&grid);

    let resolution = match stone {
        None => None,
        Some(value) => {
            let stone = Stone::try_from(value)
                .map_err(|v| CliError::new(format!("Stone must be 0 or 1, got {v}")))?;
            let cells: Option<Vec<Cell>> = script
                .map(|path| -> Result<_, CliError> {
                    serde_json::from_str(&read_file(path)?).map_err(|e| {
                        CliError::new(format!("Invalid script {}: {e}", path.display()))
                    })
                })
                .transpose()?;
            Some(resolve(grid.clone(), stone, cells, ResolverConfig { max_swaps }))
        }
    };

    match format {
        OutputFormat::Text => {
            print!("{grid}");
            println!("Crosscuts: {}", crosscuts.len());
            for cut in &crosscuts {
                println!(
                    "  at {}: 0s {} {}  1s {} {}",
                    cut.origin, cut.zeros[0], cut.zeros[1], cut.ones[0], cut.ones[1]
                );
            }
            if let Some(res) = &resolution {
                println!();
                println!("Resolved for player {} in {} swaps", res.stone, res.swaps);
                match res.outcome {
                    Some(reason) => println!("Stopped: {reason}"),
                    None => println!("Stopped: script exhausted"),
                }
                print!("{}", res.grid);
                println!("Crosscuts remaining: {}", res.remaining);
            }
        }
        OutputFormat::Json => {
            let report = JsonCrosscutReport {
                crosscuts: &crosscuts,
                resolution,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn resolve(grid: Grid, stone: Stone, cells: Option<Vec<Cell>>, config: ResolverConfig) -> JsonResolution {
    let limit = config.swap_limit(grid.size()).saturating_mul(2).saturating_add(1);
    let resolver = Resolver::new(grid, stone, config);

    let resolver = match cells {
        Some(cells) => {
            let mut cells = cells.into_iter();
            resolve_with(resolver, |_| cells.next(), usize::MAX)
        }
        None => resolve_with(resolver, first_option, limit),
    };

    JsonResolution {
        stone,
        swaps: resolver.swaps(),
        outcome: resolver.outcome(),
        remaining: resolver.crosscuts().len(),
        grid: resolver.into_grid(),
    }
}

fn first_option(request: &ResolutionRequest) -> Option<Cell> {
    match request {
        ResolutionRequest::SelectStone { options }
        | ResolutionRequest::SelectPartner { options, .. } => options.first().copied(),
        ResolutionRequest::Finished { .. } => None,
    }
}
