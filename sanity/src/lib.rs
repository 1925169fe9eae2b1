pub use std::path::Path;
pub use firstfit::*;
pub use firstfit::algo::{internal_fragmentation, external_fragmentation};
pub use rand::{Rng, SeedableRng, rngs::StdRng};
pub use clap::Parser;
use anyhow::Context;

/// Everything that can be wrong with a [Run] that claims to
/// be the product of first-fit. Indices are 0-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("{processes} processes but {outcomes} allocation outcomes")]
    LengthMismatch { processes: usize, outcomes: usize },
    #[error("process {process} points at block {block}, but there are only {blocks} blocks")]
    NoSuchBlock { process: usize, block: usize, blocks: usize },
    #[error("process {process} ({size}) placed in block {block} which had only {remaining} left")]
    Overcommitted { process: usize, size: ByteSteps, block: usize, remaining: ByteSteps },
    #[error("process {process} placed in block {chosen}, but block {earlier} fit first")]
    NotFirst { process: usize, chosen: usize, earlier: usize },
    #[error("process {process} ({size}) left unallocated although block {block} had room")]
    MissedFit { process: usize, size: ByteSteps, block: usize },
    #[error("block {block}: recorded remaining {recorded}, replay gives {replayed}")]
    RemainingMismatch { block: usize, recorded: ByteSteps, replayed: ByteSteps },
    #[error("{used} units used across blocks, but allocated processes add up to {load}")]
    Conservation { used: Total, load: Total },
    #[error("internal fragmentation recorded as {recorded}, replay gives {replayed}")]
    InternalFrag { recorded: Total, replayed: Total },
    #[error("external fragmentation recorded as {recorded}, replay gives {replayed}")]
    ExternalFrag { recorded: Total, replayed: Total },
    #[error("two runs over the same input disagree")]
    Nondeterministic,
}

/// Replays `run` from its block capacities and checks every
/// recorded decision and figure against the replay.
///
/// The checks, in order:
/// - one outcome per process
/// - each placement names an existing block that had room at
///   the time, and no earlier block had room
/// - each unallocated process fit nowhere
/// - recorded leftovers equal the replayed ones
/// - used space equals the load of allocated processes
/// - both fragmentation totals
pub fn audit(run: &Run) -> Result<(), Violation> {
    if run.allocation.len() != run.processes.len() {
        return Err(Violation::LengthMismatch {
            processes:  run.processes.len(),
            outcomes:   run.allocation.len(),
        });
    }

    let mut replay: Vec<Block> = run.capacities()
        .into_iter()
        .map(Block::new)
        .collect();
    for (process, (size, placement)) in run.outcomes().enumerate() {
        let first = replay.iter().position(|b| b.fits(size));
        match (placement, first) {
            (Placement::Block(block), _) if block >= replay.len()   => {
                return Err(Violation::NoSuchBlock { process, block, blocks: replay.len() });
            },
            (Placement::Block(block), Some(earlier)) if earlier < block  => {
                return Err(Violation::NotFirst { process, chosen: block, earlier });
            },
            (Placement::Block(block), _)    => {
                if !replay[block].carve(size) {
                    return Err(Violation::Overcommitted {
                        process,
                        size,
                        block,
                        remaining:  replay[block].remaining(),
                    });
                }
            },
            (Placement::Unallocated, Some(block))   => {
                return Err(Violation::MissedFit { process, size, block });
            },
            (Placement::Unallocated, None)  => {},
        }
    }

    for (block, (rec, rep)) in run.blocks.iter().zip(&replay).enumerate() {
        if rec.remaining() != rep.remaining() {
            return Err(Violation::RemainingMismatch {
                block,
                recorded:   rec.remaining(),
                replayed:   rep.remaining(),
            });
        }
    }

    let used: Total = run.used_per_block()
        .into_iter()
        .map(|u| u as Total)
        .sum();
    let load = run.allocated_load();
    if used != load {
        return Err(Violation::Conservation { used, load });
    }

    let replayed = internal_fragmentation(&replay, &run.allocation);
    if replayed != run.internal_frag {
        return Err(Violation::InternalFrag { recorded: run.internal_frag, replayed });
    }
    let replayed = external_fragmentation(&replay);
    if replayed != run.external_frag {
        return Err(Violation::ExternalFrag { recorded: run.external_frag, replayed });
    }

    Ok(())
}

/// Runs first-fit twice over the same input, makes sure both runs
/// agree and that they pass the [audit].
pub fn check_instance(blocks: &[ByteSteps], processes: &[ByteSteps]) -> Result<Run, Violation> {
    let run = first_fit(blocks, processes);
    if run != first_fit(blocks, processes) {
        return Err(Violation::Nondeterministic);
    }
    audit(&run)?;

    Ok(run)
}

/// Bounds for [random_instance]. Sizes are drawn from `0..=max_size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    pub max_blocks:     usize,
    pub max_processes:  usize,
    pub max_size:       ByteSteps,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_blocks:     16,
            max_processes:  32,
            max_size:       1024,
        }
    }
}

/// Draws a random (blocks, processes) pair. Either list may come
/// out empty.
pub fn random_instance<R: Rng>(rng: &mut R, limits: &Limits) -> (Vec<ByteSteps>, Vec<ByteSteps>) {
    let mut draw = |n: usize| -> Vec<ByteSteps> {
        let len = rng.gen_range(0..=n);
        (0..len)
            .map(|_| rng.gen_range(0..=limits.max_size))
            .collect()
    };
    let blocks = draw(limits.max_blocks);
    let processes = draw(limits.max_processes);

    (blocks, processes)
}

/// Reads the runs saved in a JSON file, as left behind by
/// `firstfit run --format json` or `firstfit batch --format json`.
/// A file holding a single run yields one entry named after the file.
pub fn read_runs(path: &Path) -> anyhow::Result<IndexMap<String, Run>> {
    let text = std::fs::read_to_string(path)?;
    // Totals are u128, which serde's buffered (untagged) decoding
    // cannot carry. Try each shape directly instead.
    if let Ok(run) = serde_json::from_str::<Run>(&text) {
        let mut res = IndexMap::new();
        res.insert(path.display().to_string(), run);
        return Ok(res);
    }
    let runs: IndexMap<String, Run> = serde_json::from_str(&text)
        .with_context(|| format!("{} holds neither a run nor a batch of runs", path.display()))?;

    Ok(runs)
}
