//! Fork-join dispatch of scan workers and reduction of their grids.

use std::ops::Range;
use std::thread;

use crate::config::KernelConfig;
use crate::core::{AreaOfInterest, BinGeometry, ScanSet};
use crate::error::{Error, Result};
use crate::grid::{OutputGrid, RegionGrid};

use super::worker::ScanWorker;

/// Split `scan_count` scans into `workers` contiguous ranges.
///
/// Every range holds `scan_count / workers` scans except the last, which
/// also takes the remainder. With fewer scans than workers all but the last
/// range are empty.
pub fn partition(scan_count: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    let per_worker = scan_count / workers;

    (0..workers)
        .map(|i| {
            let start = i * per_worker;
            let end = if i == workers - 1 {
                scan_count
            } else {
                (i + 1) * per_worker
            };
            start..end
        })
        .collect()
}

/// Partitions scans across workers, runs them concurrently and merges the
/// per-worker grids.
///
/// Each call validates its inputs before allocating anything, spawns one
/// scoped thread per range and blocks until all of them are done. Worker
/// grids live only inside the call and are dropped on every exit path.
#[derive(Clone, Debug, Default)]
pub struct ParallelCoordinator {
    config: KernelConfig,
}

impl ParallelCoordinator {
    /// Create a coordinator with the given kernel configuration.
    pub fn new(config: KernelConfig) -> Self {
        Self { config }
    }

    /// Kernel configuration in use.
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Number of workers a call will dispatch.
    pub fn worker_count(&self) -> usize {
        self.config.worker_count()
    }

    /// Run every worker and return the merged (sums, hits) grid.
    pub fn accumulate(
        &self,
        scans: &ScanSet,
        bins: &BinGeometry,
        area: &AreaOfInterest,
        plane_z: f32,
    ) -> Result<RegionGrid> {
        let dims = area.dimensions_for(self.config.indexing)?;
        if !plane_z.is_finite() {
            return Err(Error::InvalidGeometry(format!(
                "plane z must be finite, got {plane_z}"
            )));
        }
        if scans.is_empty() {
            bins.validate_shape()?;
            log::warn!("Back-projecting an empty scan set; output will be all zeros");
        } else {
            bins.validate(scans.scan_length())?;
        }

        let workers = self.worker_count();
        let ranges = partition(scans.scan_count(), workers);
        log::debug!(
            "Back-projecting {} scans ({} bins each) onto {}x{} grid with {} workers",
            scans.scan_count(),
            scans.scan_length(),
            dims.width_pix,
            dims.length_pix,
            workers
        );

        let worker = ScanWorker::new(scans, *bins, *area, plane_z, dims, self.config.indexing);
        let partials = dispatch(&worker, ranges)?;

        let mut partials = partials.into_iter();
        let mut merged = partials.next().unwrap_or_else(|| RegionGrid::new(dims));
        for partial in partials {
            merged.merge(&partial);
        }

        log::trace!(
            "Merged {} contributions covering {} of {} cells",
            merged.total_hits(),
            merged.covered_cells(),
            dims.cell_count()
        );
        Ok(merged)
    }

    /// Back-project `scans` onto `area` at height `plane_z`.
    pub fn run(
        &self,
        scans: &ScanSet,
        bins: &BinGeometry,
        area: &AreaOfInterest,
        plane_z: f32,
    ) -> Result<OutputGrid> {
        let merged = self.accumulate(scans, bins, area, plane_z)?;
        Ok(OutputGrid::normalize(&merged))
    }
}

/// Spawn one scoped thread per range and collect their grids in range order.
fn dispatch(worker: &ScanWorker<'_>, ranges: Vec<Range<usize>>) -> Result<Vec<RegionGrid>> {
    thread::scope(|scope| -> Result<Vec<RegionGrid>> {
        let mut handles = Vec::with_capacity(ranges.len());
        for (id, range) in ranges.into_iter().enumerate() {
            let handle = thread::Builder::new()
                .name(format!("chitra-worker-{id}"))
                .spawn_scoped(scope, move || {
                    let scans = range.len();
                    let region = worker.accumulate(range);
                    log::trace!("Worker {} accumulated {} scans", id, scans);
                    region
                })
                .map_err(Error::WorkerSpawn)?;
            handles.push(handle);
        }

        handles
            .into_iter()
            .enumerate()
            .map(|(id, handle)| handle.join().map_err(|_| Error::WorkerPanicked(id)))
            .collect()
    })
}
