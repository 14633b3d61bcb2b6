//! Parallel execution of whole claims across scoped threads.
//!
//! Each claim owns its generators and draws from an RNG seeded with its own
//! derived seed, so where a claim runs has no effect on what it produces.

use std::panic;

use crate::claim::Claim;
use crate::config::CheckConfig;
use crate::execution::{CheckObserver, run_claim};
use crate::rng::derive_seed;
use crate::statistics::ClaimSummary;

/// Configuration for parallel execution
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Number of threads to use for parallel execution
    pub num_threads: usize,
    /// Whether to enable parallel execution
    pub enabled: bool,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_threads: num_cpus::get(),
            enabled: true,
        }
    }
}

impl ParallelConfig {
    pub fn with_threads(num_threads: usize) -> Self {
        Self {
            num_threads,
            enabled: true,
        }
    }

    /// Run everything on the calling thread
    pub fn sequential() -> Self {
        Self {
            num_threads: 1,
            enabled: false,
        }
    }
}

/// Run `claims` with seeds derived from `seed` and return their summaries in
/// registration order.
pub(crate) fn run_parallel(
    claims: Vec<Claim>,
    config: &CheckConfig,
    seed: u64,
    observer: &dyn CheckObserver,
    parallel: &ParallelConfig,
) -> Vec<ClaimSummary> {
    let num_threads = parallel.num_threads.min(claims.len());
    if !parallel.enabled || num_threads <= 1 {
        return claims
            .into_iter()
            .enumerate()
            .map(|(index, mut claim)| {
                run_claim(&mut claim, config, derive_seed(seed, index), observer)
            })
            .collect();
    }

    // Round-robin so long and short claims spread evenly by position
    let mut batches: Vec<Vec<(usize, Claim)>> = (0..num_threads).map(|_| Vec::new()).collect();
    for (index, claim) in claims.into_iter().enumerate() {
        batches[index % num_threads].push((index, claim));
    }
    tracing::debug!(threads = num_threads, "running claims in parallel");

    let result = crossbeam::scope(|s| {
        let handles: Vec<_> = batches
            .into_iter()
            .map(|batch| {
                s.spawn(move |_| {
                    batch
                        .into_iter()
                        .map(|(index, mut claim)| {
                            let summary =
                                run_claim(&mut claim, config, derive_seed(seed, index), observer);
                            (index, summary)
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut summaries = Vec::new();
        for handle in handles {
            match handle.join() {
                Ok(batch) => summaries.extend(batch),
                Err(payload) => panic::resume_unwind(payload),
            }
        }
        summaries
    });

    let mut summaries = match result {
        Ok(summaries) => summaries,
        Err(payload) => panic::resume_unwind(payload),
    };
    summaries.sort_by_key(|(index, _)| *index);
    summaries.into_iter().map(|(_, summary)| summary).collect()
}
