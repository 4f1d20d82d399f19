//! Test utilities for Chitra.
//!
//! Builders for sensor trajectories and synthetic scans of point targets.

#![allow(dead_code)]

use std::f32::consts::TAU;

use chitra::{BinGeometry, Position, ScanSet};

/// Install a test logger once per binary.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Sensors evenly spaced on a circle around `(cx, cy)` at height `z`,
/// each heading toward the centre.
pub fn circle_trajectory(n: usize, cx: f32, cy: f32, radius: f32, z: f32) -> Vec<Position> {
    (0..n)
        .map(|i| {
            let angle = TAU * i as f32 / n as f32;
            Position::new(
                cx + radius * angle.cos(),
                cy + radius * angle.sin(),
                z,
                angle + std::f32::consts::PI,
            )
        })
        .collect()
}

/// Sensors on a straight line along +x starting at `(x0, y0)`.
pub fn straight_trajectory(n: usize, x0: f32, y0: f32, spacing: f32, z: f32) -> Vec<Position> {
    (0..n)
        .map(|i| Position::new(x0 + i as f32 * spacing, y0, z, 0.0))
        .collect()
}

/// Scans of a single point reflector at `(tx, ty, tz)`.
///
/// Each scan holds `background` everywhere except the bin containing the
/// sensor-to-target distance, which holds `peak`.
pub fn point_target_scans(
    positions: &[Position],
    bins: &BinGeometry,
    scan_length: usize,
    target: (f32, f32, f32),
    peak: i32,
    background: i32,
) -> ScanSet {
    let (tx, ty, tz) = target;
    let mut intensities = vec![background; positions.len() * scan_length];
    for (i, p) in positions.iter().enumerate() {
        let dist = ((p.x - tx).powi(2) + (p.y - ty).powi(2) + (p.z - tz).powi(2)).sqrt();
        if let Some(bin) = bins.bin_for(dist) {
            if bin < scan_length {
                intensities[i * scan_length + bin] = peak;
            }
        }
    }
    ScanSet::new(intensities, positions.to_vec(), scan_length).unwrap()
}

/// Scans where bin `k` of scan `i` holds `i * 1000 + k`.
pub fn ramp_scans(positions: &[Position], scan_length: usize) -> ScanSet {
    let intensities = (0..positions.len())
        .flat_map(|i| (0..scan_length).map(move |k| (i * 1000 + k) as i32))
        .collect();
    ScanSet::new(intensities, positions.to_vec(), scan_length).unwrap()
}

/// Flatten positions into the `[x, y, z, heading]` boundary layout.
pub fn flat_positions(positions: &[Position]) -> Vec<f32> {
    positions
        .iter()
        .flat_map(|p| [p.x, p.y, p.z, p.heading])
        .collect()
}
