//! Per-worker accumulation buffers.

use crate::core::GridDimensions;

/// Summed intensities and hit counts over the output grid.
///
/// Each worker owns one `RegionGrid` while accumulating. Sums are kept as
/// `i64` so that many scans can be added without overflow, and all
/// arithmetic is exact: merging grids in any order gives the same totals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionGrid {
    sums: Vec<i64>,
    hits: Vec<u32>,
    dims: GridDimensions,
}

impl RegionGrid {
    /// Zeroed grid of the given shape.
    pub fn new(dims: GridDimensions) -> Self {
        let size = dims.cell_count();
        Self {
            sums: vec![0; size],
            hits: vec![0; size],
            dims,
        }
    }

    /// Grid shape.
    #[inline]
    pub fn dims(&self) -> GridDimensions {
        self.dims
    }

    /// Summed intensities, row-major.
    #[inline]
    pub fn sums(&self) -> &[i64] {
        &self.sums
    }

    /// Hit counts, row-major.
    #[inline]
    pub fn hits(&self) -> &[u32] {
        &self.hits
    }

    /// Add one bin value to cell `index`.
    #[inline]
    pub fn add(&mut self, index: usize, value: i32) {
        self.sums[index] += i64::from(value);
        self.hits[index] += 1;
    }

    /// Add one bin value to cell `index` if it exists.
    ///
    /// Returns `false` when the index is past the end of the grid.
    #[inline]
    pub fn try_add(&mut self, index: usize, value: i32) -> bool {
        match (self.sums.get_mut(index), self.hits.get_mut(index)) {
            (Some(sum), Some(hits)) => {
                *sum += i64::from(value);
                *hits += 1;
                true
            }
            _ => false,
        }
    }

    /// Element-wise sum of `other` into `self`.
    ///
    /// # Panics
    /// Panics if the two grids have different shapes.
    pub fn merge(&mut self, other: &RegionGrid) {
        assert_eq!(self.dims, other.dims, "cannot merge grids of different shape");
        for (sum, &other_sum) in self.sums.iter_mut().zip(&other.sums) {
            *sum += other_sum;
        }
        for (hits, &other_hits) in self.hits.iter_mut().zip(&other.hits) {
            *hits += other_hits;
        }
    }

    /// Total number of contributions across the grid.
    pub fn total_hits(&self) -> u64 {
        self.hits.iter().map(|&h| u64::from(h)).sum()
    }

    /// Number of cells that received at least one contribution.
    pub fn covered_cells(&self) -> usize {
        self.hits.iter().filter(|&&h| h > 0).count()
    }
}
