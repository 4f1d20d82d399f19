//! Core types for the Chitra library.
//!
//! ## Coordinate System
//!
//! - **X-axis**: width axis of the area of interest (grid columns)
//! - **Y-axis**: length axis of the area of interest (grid rows)
//! - **Z-axis**: height; the imaged plane sits at a fixed z chosen per call
//!
//! ## Type Categories
//!
//! ### Geometry
//! - [`AreaOfInterest`]: region origin, extent and resolution
//! - [`GridDimensions`]: pixel counts derived from an area
//! - [`BinGeometry`]: uniform range bins of each scan
//!
//! ### Sensor Data
//! - [`Position`]: sensor pose (x, y, z, heading) at capture time
//! - [`ScanSet`]: scan-major intensities with one position per scan

mod area;
mod bins;
mod scan;

pub use area::{AreaOfInterest, GridDimensions, MAX_AXIS_PIXELS, compute_dimensions};
pub use bins::BinGeometry;
pub use scan::{POSITION_STRIDE, Position, ScanSet};
