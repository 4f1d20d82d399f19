//! Range bin geometry.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Uniform partition of sensor range into bins.
///
/// Bin `k` covers distances `[start + k * size, start + (k + 1) * size)`.
/// Distances outside `[start, end]` have no bin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BinGeometry {
    /// Distance of the first bin's near edge.
    pub start: f32,
    /// Largest distance that still maps to a bin (inclusive).
    pub end: f32,
    /// Width of one bin.
    pub size: f32,
}

impl BinGeometry {
    /// Create a new bin geometry.
    pub fn new(start: f32, end: f32, size: f32) -> Self {
        Self { start, end, size }
    }

    /// Index of the bin reached at distance `end`.
    #[inline]
    pub fn max_bin(&self) -> usize {
        ((self.end - self.start) / self.size) as usize
    }

    /// Check that the bins form a usable partition, independent of any scan.
    pub fn validate_shape(&self) -> Result<()> {
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(Error::InvalidBinRange(format!(
                "bin size must be positive and finite, got {}",
                self.size
            )));
        }
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(Error::InvalidBinRange(format!(
                "bin range must be finite, got [{}, {}]",
                self.start, self.end
            )));
        }
        if self.end < self.start {
            return Err(Error::InvalidBinRange(format!(
                "bin end {} is before bin start {}",
                self.end, self.start
            )));
        }
        Ok(())
    }

    /// Check the geometry against the number of bins each scan carries.
    ///
    /// Every distance in `[start, end]` must land on a bin that exists,
    /// i.e. `floor((end - start) / size) < scan_length`.
    pub fn validate(&self, scan_length: usize) -> Result<()> {
        self.validate_shape()?;
        let max_bin = self.max_bin();
        if max_bin >= scan_length {
            return Err(Error::InvalidBinRange(format!(
                "range [{}, {}] at bin size {} reaches bin {} but scans hold {} bins",
                self.start, self.end, self.size, max_bin, scan_length
            )));
        }
        Ok(())
    }

    /// Bin index for a sensor-to-pixel distance, `None` outside `[start, end]`.
    #[inline]
    pub fn bin_for(&self, dist: f32) -> Option<usize> {
        // Written so NaN falls through to None
        if dist >= self.start && dist <= self.end {
            Some(((dist - self.start) / self.size) as usize)
        } else {
            None
        }
    }
}
