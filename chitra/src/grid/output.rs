//! Final averaged intensity grid.

use crate::core::GridDimensions;

use super::region::RegionGrid;

/// Row-major float grid, one averaged intensity per pixel.
///
/// Rows run along the length axis, columns along the width axis. Pixels
/// without any contribution hold `0.0`.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputGrid {
    data: Vec<f32>,
    dims: GridDimensions,
}

impl OutputGrid {
    /// Divide each cell's summed intensity by its hit count.
    ///
    /// Cells with zero hits become `0.0`. Each merged cell is read once.
    pub fn normalize(region: &RegionGrid) -> Self {
        let data = region
            .sums()
            .iter()
            .zip(region.hits())
            .map(|(&sum, &hits)| {
                if hits > 0 {
                    (sum as f64 / f64::from(hits)) as f32
                } else {
                    0.0
                }
            })
            .collect();

        Self {
            data,
            dims: region.dims(),
        }
    }

    /// Grid shape.
    #[inline]
    pub fn dims(&self) -> GridDimensions {
        self.dims
    }

    /// Value at (row, col), `None` outside the grid.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.dims.length_pix || col >= self.dims.width_pix {
            return None;
        }
        self.data.get(self.dims.index(row, col)).copied()
    }

    /// Row `row` as a slice.
    pub fn row(&self, row: usize) -> Option<&[f32]> {
        if row >= self.dims.length_pix {
            return None;
        }
        let begin = row * self.dims.width_pix;
        Some(&self.data[begin..begin + self.dims.width_pix])
    }

    /// Flat row-major values.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Take ownership of the flat row-major values.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Largest value in the grid (`0.0` for an empty grid).
    pub fn max_value(&self) -> f32 {
        self.data.iter().copied().fold(0.0, f32::max)
    }
}
