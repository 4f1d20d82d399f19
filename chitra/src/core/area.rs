//! Area of interest and output grid shape.

use serde::{Deserialize, Serialize};

use crate::config::PixelIndexing;
use crate::error::{Error, Result};

/// Largest pixel count along one axis; the C interface reports counts as `i32`.
pub const MAX_AXIS_PIXELS: usize = i32::MAX as usize;

/// Bytes held per cell while accumulating (i64 sum + u32 hits).
const CELL_BYTES: usize = 12;

/// Number of pixels along each axis of the output grid.
///
/// Rows run along the length axis, columns along the width axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDimensions {
    /// Pixels along the width (x) axis, i.e. columns per row.
    pub width_pix: usize,
    /// Pixels along the length (y) axis, i.e. number of rows.
    pub length_pix: usize,
}

impl GridDimensions {
    /// Create from explicit pixel counts.
    #[inline]
    pub fn new(width_pix: usize, length_pix: usize) -> Self {
        Self {
            width_pix,
            length_pix,
        }
    }

    /// Total number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width_pix * self.length_pix
    }

    /// Row-major index of (row, col).
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.width_pix + col
    }

    /// Is the grid empty along either axis?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }
}

/// Rectangular region to back-project onto.
///
/// `(x, y)` is the minimum corner; the region extends `width` along +x and
/// `length` along +y. `resolution` is pixels per unit length.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AreaOfInterest {
    /// Minimum x of the region (world units).
    pub x: f32,
    /// Minimum y of the region (world units).
    pub y: f32,
    /// Extent along x.
    pub width: f32,
    /// Extent along y.
    pub length: f32,
    /// Pixels per world unit.
    pub resolution: f32,
}

impl AreaOfInterest {
    /// Create a new area of interest.
    pub fn new(x: f32, y: f32, width: f32, length: f32, resolution: f32) -> Self {
        Self {
            x,
            y,
            width,
            length,
            resolution,
        }
    }

    /// Side length of one pixel in world units.
    #[inline]
    pub fn pixel_size(&self) -> f32 {
        1.0 / self.resolution
    }

    /// Reject geometry that would divide by zero or produce a nonsense grid.
    pub fn validate(&self) -> Result<()> {
        if !self.resolution.is_finite() || self.resolution <= 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "resolution must be positive and finite, got {}",
                self.resolution
            )));
        }
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(Error::InvalidGeometry(format!(
                "origin must be finite, got ({}, {})",
                self.x, self.y
            )));
        }
        if !self.width.is_finite() || self.width < 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "width must be non-negative and finite, got {}",
                self.width
            )));
        }
        if !self.length.is_finite() || self.length < 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "length must be non-negative and finite, got {}",
                self.length
            )));
        }
        Ok(())
    }

    /// Pixel counts covering the area, rounded up to whole pixels.
    pub fn dimensions(&self) -> Result<GridDimensions> {
        self.validate()?;
        let width_pix = (self.width * self.resolution).ceil();
        let length_pix = (self.length * self.resolution).ceil();
        checked_dimensions(width_pix, length_pix)
    }

    /// Pixel counts as derived by the given indexing convention.
    ///
    /// [`PixelIndexing::Legacy`] divides each extent by an `f32` pixel size
    /// taken from `1.0 / resolution`, which can round up one pixel more than
    /// the direct product does (e.g. width 0.18 at resolution 100 gives 19
    /// columns instead of 18).
    pub fn dimensions_for(&self, indexing: PixelIndexing) -> Result<GridDimensions> {
        match indexing {
            PixelIndexing::Direct => self.dimensions(),
            PixelIndexing::Legacy => {
                self.validate()?;
                let pix = (1.0 / f64::from(self.resolution)) as f32;
                checked_dimensions((self.width / pix).ceil(), (self.length / pix).ceil())
            }
        }
    }
}

/// Convert rounded-up pixel counts, rejecting grids that cannot be stored.
fn checked_dimensions(width_pix: f32, length_pix: f32) -> Result<GridDimensions> {
    let limit = MAX_AXIS_PIXELS as f32;
    if width_pix >= limit || length_pix >= limit {
        return Err(Error::InvalidGeometry(format!(
            "grid of {width_pix} x {length_pix} pixels exceeds {MAX_AXIS_PIXELS} pixels per axis"
        )));
    }
    let dims = GridDimensions::new(width_pix as usize, length_pix as usize);
    let too_large = dims
        .width_pix
        .checked_mul(dims.length_pix)
        .and_then(|cells| cells.checked_mul(CELL_BYTES))
        .is_none_or(|bytes| bytes > isize::MAX as usize);
    if too_large {
        return Err(Error::InvalidGeometry(format!(
            "grid of {} x {} pixels is too large",
            dims.width_pix, dims.length_pix
        )));
    }
    Ok(dims)
}

/// Derive the output grid shape for an area of interest.
///
/// `x` and `y` are accepted for symmetry with the region call; they do not
/// affect the shape.
pub fn compute_dimensions(
    x: f32,
    y: f32,
    width: f32,
    length: f32,
    resolution: f32,
) -> Result<GridDimensions> {
    AreaOfInterest::new(x, y, width, length, resolution).dimensions()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_by_two() {
        let dims = compute_dimensions(0.0, 0.0, 2.0, 2.0, 1.0).unwrap();
        assert_eq!(dims, GridDimensions::new(2, 2));
        assert_eq!(dims.cell_count(), 4);
    }

    #[test]
    fn test_rounds_up_partial_pixels() {
        let dims = compute_dimensions(-5.0, -5.0, 2.5, 1.2, 2.0).unwrap();
        assert_eq!(dims.width_pix, 5);
        assert_eq!(dims.length_pix, 3);
    }

    #[test]
    fn test_matches_ceil_of_product() {
        for &(width, length, resolution) in &[
            (10.0f32, 10.0f32, 100.0f32),
            (3.0, 7.0, 4.0),
            (1.0, 0.5, 8.0),
            (6.25, 2.75, 2.0),
        ] {
            let dims = compute_dimensions(0.0, 0.0, width, length, resolution).unwrap();
            assert_eq!(dims.width_pix, (width * resolution).ceil() as usize);
            assert_eq!(dims.length_pix, (length * resolution).ceil() as usize);
        }
    }

    #[test]
    fn test_origin_does_not_change_shape() {
        let a = compute_dimensions(0.0, 0.0, 4.0, 3.0, 2.0).unwrap();
        let b = compute_dimensions(-100.0, 42.5, 4.0, 3.0, 2.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_non_positive_resolution() {
        assert!(matches!(
            compute_dimensions(0.0, 0.0, 1.0, 1.0, 0.0),
            Err(Error::InvalidGeometry(_))
        ));
        assert!(matches!(
            compute_dimensions(0.0, 0.0, 1.0, 1.0, -2.0),
            Err(Error::InvalidGeometry(_))
        ));
        assert!(matches!(
            compute_dimensions(0.0, 0.0, 1.0, 1.0, f32::NAN),
            Err(Error::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_rejects_negative_extent() {
        assert!(compute_dimensions(0.0, 0.0, -1.0, 1.0, 1.0).is_err());
        assert!(compute_dimensions(0.0, 0.0, 1.0, f32::INFINITY, 1.0).is_err());
    }

    #[test]
    fn test_zero_extent_is_empty() {
        let dims = compute_dimensions(0.0, 0.0, 0.0, 3.0, 1.0).unwrap();
        assert!(dims.is_empty());
    }

    #[test]
    fn test_legacy_shape_uses_reciprocal_pixel_size() {
        let area = AreaOfInterest::new(0.0, 0.0, 0.18, 0.09, 100.0);

        let direct = area.dimensions_for(PixelIndexing::Direct).unwrap();
        assert_eq!(direct, area.dimensions().unwrap());
        assert_eq!(direct, GridDimensions::new(18, 9));

        let legacy = area.dimensions_for(PixelIndexing::Legacy).unwrap();
        assert_eq!(legacy, GridDimensions::new(19, 10));
    }

    #[test]
    fn test_legacy_shape_agrees_on_exact_sizes() {
        let area = AreaOfInterest::new(0.0, 0.0, 3.0, 2.0, 1.0);
        assert_eq!(
            area.dimensions_for(PixelIndexing::Legacy).unwrap(),
            GridDimensions::new(3, 2)
        );
    }

    #[test]
    fn test_rejects_axis_past_limit_even_when_empty() {
        let area = AreaOfInterest::new(0.0, 0.0, 1.0e13, 0.0, 1.0);
        for indexing in [PixelIndexing::Direct, PixelIndexing::Legacy] {
            assert!(matches!(
                area.dimensions_for(indexing),
                Err(Error::InvalidGeometry(_))
            ));
        }
        assert!(matches!(
            compute_dimensions(0.0, 0.0, 0.0, 3.0e9, 1.0),
            Err(Error::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_rejects_grid_too_large_to_store() {
        assert!(matches!(
            compute_dimensions(0.0, 0.0, 2.0e9, 2.0e9, 1.0),
            Err(Error::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_row_major_index() {
        let dims = GridDimensions::new(4, 3);
        assert_eq!(dims.index(0, 0), 0);
        assert_eq!(dims.index(1, 0), 4);
        assert_eq!(dims.index(2, 3), 11);
    }
}
