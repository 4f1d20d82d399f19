//! Pose-binned scan de-duplication.
//!
//! A sensor that lingers in one place fires many near-identical scans, which
//! then dominate the average of every pixel around it. The reducer bins each
//! scan's pose over (heading, x, y) and keeps a scan only while its bin holds
//! fewer than `limit_per_bin` kept scans.
//!
//! ```text
//! heading ∈ [0, 2π)          ─► bins_per_axis slots
//! x, y    ∈ [extent_min, extent_max) ─► bins_per_axis slots each
//! ```
//!
//! Scans whose x or y falls outside the extent (or is not finite) cannot be
//! binned and are always kept.

use std::collections::HashMap;
use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::core::{Position, ScanSet};
use crate::error::{Error, Result};

/// Configuration for [`ScanReducer`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReductionConfig {
    /// Slots per axis of the (heading, x, y) histogram.
    #[serde(default = "defaults::bins_per_axis")]
    pub bins_per_axis: usize,

    /// Lower bound of the binned x/y extent (world units).
    #[serde(default = "defaults::extent_min")]
    pub extent_min: f32,

    /// Upper bound of the binned x/y extent (world units).
    #[serde(default = "defaults::extent_max")]
    pub extent_max: f32,

    /// Scans kept per histogram slot.
    #[serde(default = "defaults::limit_per_bin")]
    pub limit_per_bin: u32,
}

impl Default for ReductionConfig {
    fn default() -> Self {
        Self {
            bins_per_axis: defaults::bins_per_axis(),
            extent_min: defaults::extent_min(),
            extent_max: defaults::extent_max(),
            limit_per_bin: defaults::limit_per_bin(),
        }
    }
}

/// Outcome of a reduction pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReductionStats {
    /// Scans kept
    pub kept: usize,
    /// Scans dropped as duplicates
    pub dropped: usize,
}

/// Drops scans captured from an already well-covered pose.
#[derive(Clone, Debug, Default)]
pub struct ScanReducer {
    config: ReductionConfig,
}

impl ScanReducer {
    /// Create a reducer, rejecting unusable histogram settings.
    pub fn new(config: ReductionConfig) -> Result<Self> {
        if config.bins_per_axis == 0 {
            return Err(Error::InvalidInput(
                "reduction needs at least one bin per axis".to_string(),
            ));
        }
        if !config.extent_min.is_finite()
            || !config.extent_max.is_finite()
            || config.extent_max <= config.extent_min
        {
            return Err(Error::InvalidInput(format!(
                "reduction extent [{}, {}) is empty",
                config.extent_min, config.extent_max
            )));
        }
        Ok(Self { config })
    }

    /// Reducer configuration.
    pub fn config(&self) -> &ReductionConfig {
        &self.config
    }

    /// Histogram slot of a pose, `None` when it lies outside the extent.
    fn slot(&self, position: &Position) -> Option<(usize, usize, usize)> {
        let n = self.config.bins_per_axis;
        let axis = |value: f32| -> Option<usize> {
            let span = self.config.extent_max - self.config.extent_min;
            let t = (value - self.config.extent_min) / span;
            if (0.0..1.0).contains(&t) {
                Some(((t * n as f32) as usize).min(n - 1))
            } else {
                None
            }
        };

        let x = axis(position.x)?;
        let y = axis(position.y)?;
        let heading = if position.heading.is_finite() {
            position.heading.rem_euclid(TAU)
        } else {
            0.0
        };
        let theta = ((heading / TAU * n as f32) as usize).min(n - 1);
        Some((theta, x, y))
    }

    /// Return the scans that survive de-duplication, in their original order.
    pub fn reduce(&self, scans: &ScanSet) -> (ScanSet, ReductionStats) {
        let mut counts: HashMap<(usize, usize, usize), u32> = HashMap::new();
        let mut stats = ReductionStats::default();

        let reduced = scans.retain_indices(|index| {
            let keep = match self.slot(&scans.position(index)) {
                Some(slot) => {
                    let count = counts.entry(slot).or_insert(0);
                    let keep = *count < self.config.limit_per_bin;
                    *count += 1;
                    keep
                }
                None => true,
            };
            if keep {
                stats.kept += 1;
            } else {
                stats.dropped += 1;
            }
            keep
        });

        log::debug!(
            "Scan reduction kept {} of {} scans ({} dropped)",
            stats.kept,
            scans.scan_count(),
            stats.dropped
        );
        (reduced, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scans_at(positions: &[Position]) -> ScanSet {
        let intensities = (0..positions.len() as i32).collect();
        ScanSet::new(intensities, positions.to_vec(), 1).unwrap()
    }

    #[test]
    fn test_drops_repeated_pose() {
        let pose = Position::new(1.0, 1.0, 0.5, 0.3);
        let scans = scans_at(&[pose, pose, pose]);

        let reducer = ScanReducer::new(ReductionConfig::default()).unwrap();
        let (reduced, stats) = reducer.reduce(&scans);

        assert_eq!(stats, ReductionStats { kept: 1, dropped: 2 });
        assert_eq!(reduced.scan_count(), 1);
        assert_eq!(reduced.scan(0), &[0]);
    }

    #[test]
    fn test_keeps_distinct_poses() {
        let scans = scans_at(&[
            Position::new(-4.0, 0.0, 0.0, 0.0),
            Position::new(0.0, 0.0, 0.0, 0.0),
            Position::new(4.0, 0.0, 0.0, 0.0),
            Position::new(4.0, 0.0, 0.0, 3.0),
        ]);

        let reducer = ScanReducer::new(ReductionConfig::default()).unwrap();
        let (reduced, stats) = reducer.reduce(&scans);

        assert_eq!(stats.dropped, 0);
        assert_eq!(reduced, scans);
    }

    #[test]
    fn test_heading_wraps() {
        let scans = scans_at(&[
            Position::new(0.0, 0.0, 0.0, 0.1),
            Position::new(0.0, 0.0, 0.0, 0.1 + TAU),
            Position::new(0.0, 0.0, 0.0, 0.1 - TAU),
        ]);

        let reducer = ScanReducer::new(ReductionConfig::default()).unwrap();
        let (_, stats) = reducer.reduce(&scans);
        assert_eq!(stats.kept, 1);
    }

    #[test]
    fn test_outside_extent_always_kept() {
        let far = Position::new(50.0, 0.0, 0.0, 0.0);
        let scans = scans_at(&[far, far, far]);

        let reducer = ScanReducer::new(ReductionConfig::default()).unwrap();
        let (_, stats) = reducer.reduce(&scans);
        assert_eq!(stats, ReductionStats { kept: 3, dropped: 0 });
    }

    #[test]
    fn test_limit_per_bin() {
        let pose = Position::new(2.0, -2.0, 0.0, 1.0);
        let scans = scans_at(&[pose; 5]);

        let config = ReductionConfig {
            limit_per_bin: 3,
            ..Default::default()
        };
        let reducer = ScanReducer::new(config).unwrap();
        let (reduced, stats) = reducer.reduce(&scans);
        assert_eq!(stats.kept, 3);
        assert_eq!(reduced.intensities(), &[0, 1, 2]);
    }

    #[test]
    fn test_rejects_bad_config() {
        let config = ReductionConfig {
            bins_per_axis: 0,
            ..Default::default()
        };
        assert!(ScanReducer::new(config).is_err());

        let config = ReductionConfig {
            extent_min: 1.0,
            extent_max: 1.0,
            ..Default::default()
        };
        assert!(ScanReducer::new(config).is_err());
    }
}
