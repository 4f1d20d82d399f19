//! Conversion of log-scale returns into the linear intensities the kernel
//! accumulates.

use crate::core::ScanSet;
use crate::error::Result;

/// Linearise one log2-power sample.
///
/// Non-finite exponents count as 0 and therefore map to 1. The result is
/// truncated toward zero and saturates at `i32::MAX`.
#[inline]
pub fn linearize(value: f32) -> i32 {
    let exponent = if value.is_finite() { value } else { 0.0 };
    f64::from(exponent).exp2() as i32
}

/// Linearise a buffer of log2-power samples.
pub fn linearize_log_power(values: &[f32]) -> Vec<i32> {
    values.iter().map(|&v| linearize(v)).collect()
}

impl ScanSet {
    /// Build a scan set from log2-power samples and the flat
    /// `[x, y, z, heading]` position layout.
    pub fn from_log_power(
        values: &[f32],
        positions: &[f32],
        scan_count: usize,
        scan_length: usize,
    ) -> Result<Self> {
        Self::from_flat(linearize_log_power(values), positions, scan_count, scan_length)
    }
}
