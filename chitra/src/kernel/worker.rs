//! Per-scan-range accumulation (the hot loop).
//!
//! For every scan in its range, a worker walks the full pixel grid, measures
//! the straight-line distance from the scan's sensor position to the pixel's
//! sample point, and adds the intensity of the matching range bin:
//!
//! ```text
//! dist = sqrt(dy² + dz² + dx²)        dz = sensor.z - plane z
//! bin  = floor((dist - start) / size) skipped when dist ∉ [start, end]
//! sums[cell] += scan[bin]; hits[cell] += 1
//! ```
//!
//! Workers only read the shared [`ScanSet`] and only write to the
//! [`RegionGrid`] they return, so any number of them can run at once
//! without synchronization.

use std::ops::Range;

use crate::config::PixelIndexing;
use crate::core::{AreaOfInterest, BinGeometry, GridDimensions, Position, ScanSet};
use crate::grid::RegionGrid;

/// Accumulates a contiguous range of scans into a private region grid.
#[derive(Debug)]
pub struct ScanWorker<'a> {
    scans: &'a ScanSet,
    bins: BinGeometry,
    area: AreaOfInterest,
    plane_z: f32,
    dims: GridDimensions,
    indexing: PixelIndexing,
    /// Pixel-centre x per column (direct indexing only).
    col_centers: Vec<f32>,
    /// Pixel-centre y per row (direct indexing only).
    row_centers: Vec<f32>,
}

impl<'a> ScanWorker<'a> {
    /// Create a worker over already validated inputs.
    pub fn new(
        scans: &'a ScanSet,
        bins: BinGeometry,
        area: AreaOfInterest,
        plane_z: f32,
        dims: GridDimensions,
        indexing: PixelIndexing,
    ) -> Self {
        let pix = area.pixel_size();
        let (col_centers, row_centers) = match indexing {
            PixelIndexing::Direct if !dims.is_empty() => (
                (0..dims.width_pix)
                    .map(|col| area.x + (col as f32 + 0.5) * pix)
                    .collect(),
                (0..dims.length_pix)
                    .map(|row| area.y + (row as f32 + 0.5) * pix)
                    .collect(),
            ),
            _ => (Vec::new(), Vec::new()),
        };

        Self {
            scans,
            bins,
            area,
            plane_z,
            dims,
            indexing,
            col_centers,
            row_centers,
        }
    }

    /// Grid shape this worker writes.
    pub fn dims(&self) -> GridDimensions {
        self.dims
    }

    /// Accumulate scans `range` into a freshly zeroed region grid.
    ///
    /// # Panics
    /// Panics if `range` reaches past the end of the scan set.
    pub fn accumulate(&self, range: Range<usize>) -> RegionGrid {
        let mut region = RegionGrid::new(self.dims);
        if self.dims.is_empty() {
            return region;
        }

        for index in range {
            let position = self.scans.position(index);
            let scan = self.scans.scan(index);
            match self.indexing {
                PixelIndexing::Direct => self.accumulate_direct(position, scan, &mut region),
                PixelIndexing::Legacy => self.accumulate_legacy(position, scan, &mut region),
            }
        }

        region
    }

    #[inline]
    fn lookup(&self, scan: &[i32], dist: f32) -> Option<i32> {
        let bin = self.bins.bin_for(dist)?;
        scan.get(bin).copied()
    }

    /// Pixel centres evaluated directly, stored at `row * width + col`.
    fn accumulate_direct(&self, position: Position, scan: &[i32], region: &mut RegionGrid) {
        let dz = position.z - self.plane_z;
        let dz2 = dz * dz;
        let width = self.dims.width_pix;

        for (row, &center_y) in self.row_centers.iter().enumerate() {
            let dy = position.y - center_y;
            let dy2 = dy * dy;
            let base = row * width;

            for (col, &center_x) in self.col_centers.iter().enumerate() {
                let dx = position.x - center_x;
                let dist = (dy2 + dz2 + dx * dx).sqrt();
                if let Some(value) = self.lookup(scan, dist) {
                    region.add(base + col, value);
                }
            }
        }
    }

    /// Pre-1.0 walk: offsets from the pixel's lower corner are
    /// stepped by subtracting the pixel size, and the running index is
    /// advanced before the store.
    fn accumulate_legacy(&self, position: Position, scan: &[i32], region: &mut RegionGrid) {
        let pix = self.area.pixel_size();
        let dz = position.z - self.plane_z;
        let dz2 = dz * dz;

        let mut pixel_index = 0usize;
        let mut dy = position.y - self.area.y;
        for _ in 0..self.dims.length_pix {
            let dy2 = dy * dy;
            dy -= pix;

            let mut dx = position.x - self.area.x;
            for _ in 0..self.dims.width_pix {
                let dist = (dy2 + dz2 + dx * dx).sqrt();
                dx -= pix;
                pixel_index += 1;

                if let Some(value) = self.lookup(scan, dist) {
                    // The last pixel of the grid maps one past the end
                    region.try_add(pixel_index, value);
                }
            }
        }
    }
}
