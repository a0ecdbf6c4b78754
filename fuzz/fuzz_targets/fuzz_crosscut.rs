#![no_main]

//! Crosscut fuzzer.
//!
//! Builds arbitrary small grids, resolves them with fuzzer-chosen cells, and
//! checks that resolution stops within the swap limit and that every swap
//! only exchanges two stones.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use zonewreck::crosscut::{
    Cell, Grid, ResolutionRequest, Resolver, ResolverConfig, Stone, find_crosscuts,
    resolve_with,
};

/// Structured input for crosscut fuzzing.
#[derive(Arbitrary, Debug)]
struct CrosscutInput {
    /// Grid side (clamped to 1..=8).
    size: u8,
    /// Cell bits, read row-major.
    bits: Vec<bool>,
    /// Resolve for ones instead of zeros.
    player_one: bool,
    /// Option indices for each selection.
    picks: Vec<u8>,
}

fuzz_target!(|input: CrosscutInput| {
    let size = usize::from(input.size.clamp(1, 8));
    let rows: Vec<Vec<u8>> = (0..size)
        .map(|r| {
            (0..size)
                .map(|c| u8::from(input.bits.get(r * size + c).copied().unwrap_or(false)))
                .collect()
        })
        .collect();
    let Ok(grid) = Grid::from_rows(&rows) else {
        return;
    };

    let ones_before: usize = rows.iter().flatten().map(|&v| usize::from(v)).sum();
    for cut in find_crosscuts(&grid) {
        for cell in cut.zeros {
            assert_eq!(grid.get(cell), Some(Stone::Zero));
        }
        for cell in cut.ones {
            assert_eq!(grid.get(cell), Some(Stone::One));
        }
    }

    let player = if input.player_one { Stone::One } else { Stone::Zero };
    let limit = ResolverConfig::default().swap_limit(size);
    let mut picks = input.picks.iter().copied().cycle();
    let resolver = resolve_with(
        Resolver::new(grid, player, ResolverConfig::default()),
        |request: &ResolutionRequest| -> Option<Cell> {
            let options = match request {
                ResolutionRequest::SelectStone { options }
                | ResolutionRequest::SelectPartner { options, .. } => options,
                ResolutionRequest::Finished { .. } => return None,
            };
            let pick = usize::from(picks.next().unwrap_or(0));
            options.get(pick % options.len().max(1)).copied()
        },
        limit * 2 + 2,
    );

    assert!(resolver.swaps() <= limit);
    let ones_after: usize = resolver.grid().rows().iter().flatten().map(|&v| usize::from(v)).sum();
    assert_eq!(ones_before, ones_after, "swaps must preserve stone counts");
});
