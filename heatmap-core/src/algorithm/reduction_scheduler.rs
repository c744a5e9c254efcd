use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::PairwiseOverlayReducer;
use crate::{error::HeatmapError, model::WeightedIsochrone};

/// statistics describing a completed reduction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReductionSummary {
    /// number of isochrones handed to the scheduler
    pub inputs: usize,
    /// number of pairwise merges performed, always `inputs - 1`
    pub merges: usize,
    /// number of worker threads started. 0 when a single input was returned without
    /// starting any worker.
    pub workers: usize,
}

/// shared state of a reduction. membership is only read or changed while holding the lock.
struct ReductionPool {
    isochrones: Vec<WeightedIsochrone>,
    merges: usize,
    failure: Option<HeatmapError>,
}

impl ReductionPool {
    /// removes two isochrones, or None when fewer than two remain
    fn take_pair(&mut self) -> Option<(WeightedIsochrone, WeightedIsochrone)> {
        if self.isochrones.len() < 2 {
            return None;
        }
        let right = self.isochrones.pop()?;
        let left = self.isochrones.pop()?;
        Some((left, right))
    }

    fn put(&mut self, merged: WeightedIsochrone) {
        self.isochrones.push(merged);
        self.merges += 1;
    }

    /// records the first failure and discards all pending work
    fn fail(&mut self, error: HeatmapError) {
        if self.failure.is_none() {
            self.failure = Some(error);
        }
        self.isochrones.clear();
    }
}

/// reduces a collection of weighted isochrones to a single one using a pool of parallel
/// workers sharing a mutex-guarded stack.
///
/// each worker repeatedly takes two isochrones off the stack under the lock, merges them
/// outside the lock, and pushes the result back. every cycle shrinks the stack by one, so
/// M inputs always take exactly M-1 merges. which pairs are merged, and by which worker,
/// depends on thread scheduling: averaged times are the same for any order up to
/// floating-point rounding, while the band boundaries of the result may differ between runs.
pub struct ConcurrentReductionScheduler<'a> {
    reducer: PairwiseOverlayReducer<'a>,
    workers: usize,
}

impl<'a> ConcurrentReductionScheduler<'a> {
    /// creates a scheduler. when `workers` is None (or zero), uses the available
    /// hardware parallelism.
    pub fn new(reducer: PairwiseOverlayReducer<'a>, workers: Option<usize>) -> Self {
        let workers = workers
            .filter(|w| *w > 0)
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(NonZeroUsize::get)
                    .unwrap_or(1)
            });
        Self { reducer, workers }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// runs the reduction to completion.
    ///
    /// # Arguments
    ///
    /// * `isochrones` - the initial collection, consumed by the reduction
    ///
    /// # Returns
    ///
    /// the surviving isochrone and a summary of the run, or the first error raised by
    /// any merge, in which case no partial result is returned
    pub fn reduce(
        &self,
        isochrones: Vec<WeightedIsochrone>,
    ) -> Result<(WeightedIsochrone, ReductionSummary), HeatmapError> {
        let inputs = isochrones.len();
        if inputs == 0 {
            return Err(HeatmapError::EmptyInput);
        }
        if inputs == 1 {
            let summary = ReductionSummary {
                inputs,
                merges: 0,
                workers: 0,
            };
            return isochrones
                .into_iter()
                .next()
                .map(|iso| (iso, summary))
                .ok_or(HeatmapError::EmptyInput);
        }
        // at most floor(M/2) merges can ever run at the same time
        let workers = self.workers.min(inputs / 2).max(1);
        log::info!("reducing {inputs} isochrones with {workers} workers");

        let shared = Mutex::new(ReductionPool {
            isochrones,
            merges: 0,
            failure: None,
        });
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("heatmap-reduce-{i}"))
            .build()
            .map_err(|e| {
                HeatmapError::InternalError(format!("failure building reduction thread pool: {e}"))
            })?;
        thread_pool.scope(|scope| {
            for worker_id in 0..workers {
                let shared = &shared;
                scope.spawn(move |_| self.run_worker(worker_id, shared));
            }
        });

        let mut pool = shared.into_inner().unwrap_or_else(PoisonError::into_inner);
        if let Some(error) = pool.failure.take() {
            return Err(error);
        }
        let result = pool.isochrones.pop().ok_or_else(|| {
            HeatmapError::InternalError(String::from("reduction finished with no isochrone"))
        })?;
        if !pool.isochrones.is_empty() || pool.merges + 1 != inputs {
            return Err(HeatmapError::InternalError(format!(
                "reduction of {inputs} isochrones ended with {} remaining after {} merges",
                pool.isochrones.len() + 1,
                pool.merges
            )));
        }
        log::info!(
            "reduction finished after {} merges with {} bands",
            pool.merges,
            result.len()
        );
        let summary = ReductionSummary {
            inputs,
            merges: pool.merges,
            workers,
        };
        Ok((result, summary))
    }

    fn run_worker(&self, worker_id: usize, shared: &Mutex<ReductionPool>) {
        log::debug!("reduction worker {worker_id} started");
        let mut completed = 0;
        loop {
            let (left, right) = {
                let mut pool = lock(shared);
                if pool.failure.is_some() {
                    break;
                }
                match pool.take_pair() {
                    Some(pair) => pair,
                    None => break,
                }
            };

            let merged = self.reducer.merge(left, right);

            let mut pool = lock(shared);
            match merged {
                Ok(isochrone) => {
                    pool.put(isochrone);
                    completed += 1;
                }
                Err(e) => {
                    log::error!("reduction worker {worker_id} failed: {e}");
                    pool.fail(e);
                    break;
                }
            }
        }
        log::debug!("reduction worker {worker_id} exiting after {completed} merges");
    }
}

fn lock(shared: &Mutex<ReductionPool>) -> MutexGuard<'_, ReductionPool> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}
