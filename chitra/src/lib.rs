//! # Chitra
//!
//! Parallel back-projection of 1-D range scans onto a 2-D image plane.
//!
//! ## Overview
//!
//! Each scan is a row of intensities indexed by range bin, captured from a
//! known sensor position. For every pixel of an area of interest the kernel
//! measures the distance from the sensor to the pixel, looks up the bin that
//! distance falls in, and averages the intensities of every scan that reached
//! the pixel:
//!
//! - **Accumulate**: per pixel, sum of looked-up intensities and a hit count
//! - **Parallelize**: scans split into contiguous ranges, one worker per range
//! - **Merge**: per-worker grids summed element-wise
//! - **Normalize**: `sum / hits`, or 0 for pixels no scan reached
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chitra::{AreaOfInterest, BinGeometry, Backprojector, KernelConfig, ScanSet};
//!
//! let scans = ScanSet::from_flat(intensities, &positions, scan_count, scan_length)?;
//! let bins = BinGeometry::new(0.0, 4.0, 0.05);
//! let projector = Backprojector::new(scans, bins, KernelConfig::default())?;
//!
//! let area = AreaOfInterest::new(-1.0, -1.0, 2.0, 2.0, 100.0);
//! let image = projector.region(&area, 0.0)?;
//! println!("{}x{} pixels", image.dims().width_pix, image.dims().length_pix);
//! ```
//!
//! ## Coordinate System
//!
//! - X: width axis of the area (grid columns)
//! - Y: length axis of the area (grid rows, row-major output)
//! - Z: height; the imaged plane sits at a caller-chosen z

#![warn(missing_docs)]

// Geometry and input types
pub mod core;

// Accumulation and output grids
pub mod grid;

// Worker pool and hot loop
pub mod kernel;

// Unified configuration
pub mod config;

// Pose-binned scan de-duplication
pub mod reduction;

// Log-power linearisation
pub mod preprocessing;

// C ABI
pub mod ffi;

// Error types
pub mod error;

pub use crate::core::{
    AreaOfInterest, BinGeometry, GridDimensions, MAX_AXIS_PIXELS, Position, ScanSet,
    compute_dimensions,
};

pub use grid::{OutputGrid, RegionGrid};

pub use kernel::{ParallelCoordinator, ScanWorker, partition};

pub use config::{ChitraConfig, ConfigLoadError, KernelConfig, PixelIndexing};

pub use reduction::{ReductionConfig, ReductionStats, ScanReducer};

pub use error::{Error, Result};

/// Back-project `scans` onto `area` at height `plane_z` in one call.
pub fn compute_region(
    scans: &ScanSet,
    bins: &BinGeometry,
    area: &AreaOfInterest,
    plane_z: f32,
    config: &KernelConfig,
) -> Result<OutputGrid> {
    ParallelCoordinator::new(config.clone()).run(scans, bins, area, plane_z)
}

/// Scans and bin geometry bound once, back-projected onto any number of
/// areas.
#[derive(Clone, Debug)]
pub struct Backprojector {
    scans: ScanSet,
    bins: BinGeometry,
    coordinator: ParallelCoordinator,
}

impl Backprojector {
    /// Bind `scans` to `bins`, checking the bin range against the scan length.
    pub fn new(scans: ScanSet, bins: BinGeometry, config: KernelConfig) -> Result<Self> {
        if scans.is_empty() {
            bins.validate_shape()?;
        } else {
            bins.validate(scans.scan_length())?;
        }
        Ok(Self {
            scans,
            bins,
            coordinator: ParallelCoordinator::new(config),
        })
    }

    /// Bound scans.
    pub fn scans(&self) -> &ScanSet {
        &self.scans
    }

    /// Bound bin geometry.
    pub fn bins(&self) -> &BinGeometry {
        &self.bins
    }

    /// Kernel configuration in use.
    pub fn config(&self) -> &KernelConfig {
        self.coordinator.config()
    }

    /// Output grid shape for `area` under the configured indexing.
    pub fn dimensions(&self, area: &AreaOfInterest) -> Result<GridDimensions> {
        area.dimensions_for(self.config().indexing)
    }

    /// Averaged image of `area` at height `plane_z`.
    pub fn region(&self, area: &AreaOfInterest, plane_z: f32) -> Result<OutputGrid> {
        self.coordinator.run(&self.scans, &self.bins, area, plane_z)
    }

    /// Raw (sums, hits) grid of `area` at height `plane_z`.
    pub fn accumulate(&self, area: &AreaOfInterest, plane_z: f32) -> Result<RegionGrid> {
        self.coordinator.accumulate(&self.scans, &self.bins, area, plane_z)
    }

    /// A new projector over the scans that survive `reducer`.
    pub fn reduced(&self, reducer: &ScanReducer) -> (Self, ReductionStats) {
        let (scans, stats) = reducer.reduce(&self.scans);
        let projector = Self {
            scans,
            bins: self.bins,
            coordinator: self.coordinator.clone(),
        };
        (projector, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projector(config: KernelConfig) -> Backprojector {
        let scans = ScanSet::new(
            vec![10, 20, 30],
            vec![Position::new(0.5, 0.5, 0.0, 0.0)],
            3,
        )
        .unwrap();
        Backprojector::new(scans, BinGeometry::new(0.0, 2.0, 1.0), config).unwrap()
    }

    #[test]
    fn test_backprojector_rejects_bins_past_scan() {
        let scans = ScanSet::new(vec![1, 2], vec![Position::default()], 2).unwrap();
        let bins = BinGeometry::new(0.0, 5.0, 1.0);
        let err = Backprojector::new(scans, bins, KernelConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidBinRange(_)));
    }

    #[test]
    fn test_backprojector_multiple_areas() {
        let projector = projector(KernelConfig::with_workers(2));

        let small = AreaOfInterest::new(0.0, 0.0, 1.0, 1.0, 1.0);
        let image = projector.region(&small, 0.0).unwrap();
        assert_eq!(image.as_slice(), &[10.0]);

        let large = AreaOfInterest::new(0.0, 0.0, 2.0, 1.0, 1.0);
        assert_eq!(projector.dimensions(&large).unwrap(), GridDimensions::new(2, 1));
        let image = projector.region(&large, 0.0).unwrap();
        // Second pixel centre is 1.0 away, in bin 1
        assert_eq!(image.as_slice(), &[10.0, 20.0]);
    }

    #[test]
    fn test_compute_region_matches_backprojector() {
        let projector = projector(KernelConfig::default());
        let area = AreaOfInterest::new(-1.0, -1.0, 3.0, 3.0, 2.0);

        let direct = compute_region(
            projector.scans(),
            projector.bins(),
            &area,
            0.0,
            projector.config(),
        )
        .unwrap();
        assert_eq!(direct, projector.region(&area, 0.0).unwrap());
    }

    #[test]
    fn test_dimensions_follow_indexing() {
        let scans = ScanSet::new(vec![1], vec![Position::default()], 1).unwrap();
        let bins = BinGeometry::new(0.0, 0.5, 1.0);
        let area = AreaOfInterest::new(0.0, 0.0, 0.18, 0.18, 100.0);

        let direct = Backprojector::new(scans.clone(), bins, KernelConfig::default()).unwrap();
        assert_eq!(direct.dimensions(&area).unwrap(), GridDimensions::new(18, 18));

        let config = KernelConfig::default().indexing(PixelIndexing::Legacy);
        let legacy = Backprojector::new(scans, bins, config).unwrap();
        assert_eq!(legacy.dimensions(&area).unwrap(), GridDimensions::new(19, 19));
        assert_eq!(legacy.region(&area, 0.0).unwrap().dims(), GridDimensions::new(19, 19));
    }

    #[test]
    fn test_reduced_projector() {
        let pose = Position::new(0.5, 0.5, 0.0, 0.0);
        let scans = ScanSet::new(vec![4, 0, 8, 0], vec![pose, pose], 2).unwrap();
        let projector =
            Backprojector::new(scans, BinGeometry::new(0.0, 1.0, 1.0), KernelConfig::default())
                .unwrap();

        let (reduced, stats) = projector.reduced(&ScanReducer::default());
        assert_eq!(stats, ReductionStats { kept: 1, dropped: 1 });

        let area = AreaOfInterest::new(0.0, 0.0, 1.0, 1.0, 1.0);
        assert_eq!(projector.region(&area, 0.0).unwrap().as_slice(), &[6.0]);
        assert_eq!(reduced.region(&area, 0.0).unwrap().as_slice(), &[4.0]);
    }
}
