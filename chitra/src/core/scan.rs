//! Scan and sensor pose input types.
//!
//! A [`ScanSet`] owns `scan_count` scans of `scan_length` integer intensities
//! laid out scan-major, plus one [`Position`] per scan matched by index.
//!
//! ```text
//! intensities: [s0b0 s0b1 .. s0bN | s1b0 s1b1 .. s1bN | ... ]
//! positions:   [  p0              |   p1              | ... ]
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of `f32` values per position in the flat boundary layout.
pub const POSITION_STRIDE: usize = 4;

/// Sensor pose at capture time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// World X
    pub x: f32,
    /// World Y
    pub y: f32,
    /// World Z (height)
    pub z: f32,
    /// Heading in radians. Not used by the distance computation.
    pub heading: f32,
}

impl Position {
    /// Create a new position
    pub fn new(x: f32, y: f32, z: f32, heading: f32) -> Self {
        Self { x, y, z, heading }
    }
}

/// Validated set of scans with their sensor positions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScanSet {
    intensities: Vec<i32>,
    positions: Vec<Position>,
    scan_length: usize,
}

impl ScanSet {
    /// Build from scan-major intensities and one position per scan.
    pub fn new(
        intensities: Vec<i32>,
        positions: Vec<Position>,
        scan_length: usize,
    ) -> Result<Self> {
        let scan_count = positions.len();
        if scan_count > 0 && scan_length == 0 {
            return Err(Error::InvalidInput(
                "scan length must be positive when scans are present".to_string(),
            ));
        }
        let expected = scan_count.checked_mul(scan_length).ok_or_else(|| {
            Error::InvalidInput(format!(
                "{scan_count} scans of {scan_length} bins overflow the address space"
            ))
        })?;
        if intensities.len() != expected {
            return Err(Error::InvalidInput(format!(
                "expected {} intensities ({} scans x {} bins), got {}",
                expected,
                scan_count,
                scan_length,
                intensities.len()
            )));
        }

        Ok(Self {
            intensities,
            positions,
            scan_length,
        })
    }

    /// Build from the flat boundary layout: `positions` holds
    /// `[x, y, z, heading]` per scan.
    pub fn from_flat(
        intensities: Vec<i32>,
        positions: &[f32],
        scan_count: usize,
        scan_length: usize,
    ) -> Result<Self> {
        if scan_count.checked_mul(POSITION_STRIDE) != Some(positions.len()) {
            return Err(Error::InvalidInput(format!(
                "expected {} position values per scan for {} scans, got {}",
                POSITION_STRIDE,
                scan_count,
                positions.len()
            )));
        }
        let positions = positions
            .chunks_exact(POSITION_STRIDE)
            .map(|chunk| Position::new(chunk[0], chunk[1], chunk[2], chunk[3]))
            .collect();
        Self::new(intensities, positions, scan_length)
    }

    /// Number of scans.
    #[inline]
    pub fn scan_count(&self) -> usize {
        self.positions.len()
    }

    /// Bins per scan.
    #[inline]
    pub fn scan_length(&self) -> usize {
        self.scan_length
    }

    /// Is the set empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Intensities of scan `index`.
    ///
    /// # Panics
    /// Panics if `index >= scan_count()`.
    #[inline]
    pub fn scan(&self, index: usize) -> &[i32] {
        let begin = index * self.scan_length;
        &self.intensities[begin..begin + self.scan_length]
    }

    /// Sensor position of scan `index`.
    #[inline]
    pub fn position(&self, index: usize) -> Position {
        self.positions[index]
    }

    /// All positions, one per scan.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Flat scan-major intensities.
    pub fn intensities(&self) -> &[i32] {
        &self.intensities
    }

    /// Iterate `(position, scan)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &[i32])> + '_ {
        self.positions
            .iter()
            .copied()
            .zip(self.intensities.chunks_exact(self.scan_length.max(1)))
    }

    /// Keep only the scans whose index satisfies `keep`.
    pub fn retain_indices<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(usize) -> bool,
    {
        let mut intensities = Vec::new();
        let mut positions = Vec::new();
        for index in 0..self.scan_count() {
            if keep(index) {
                intensities.extend_from_slice(self.scan(index));
                positions.push(self.positions[index]);
            }
        }
        Self {
            intensities,
            positions,
            scan_length: self.scan_length,
        }
    }
}
