//! Accumulation and output grids.
//!
//! ```text
//!   ScanWorker 0        ScanWorker 1   ...   ScanWorker N-1
//!  ┌────────────┐      ┌────────────┐       ┌────────────┐
//!  │ RegionGrid │      │ RegionGrid │       │ RegionGrid │   sums: i64, hits: u32
//!  └─────┬──────┘      └─────┬──────┘       └─────┬──────┘
//!        └──────────────┬────┴────────────────────┘
//!                       ▼  merge (element-wise sum)
//!                ┌────────────┐
//!                │ RegionGrid │
//!                └─────┬──────┘
//!                      ▼  normalize (sum / hits, 0 where hits == 0)
//!                ┌────────────┐
//!                │ OutputGrid │   f32, row-major
//!                └────────────┘
//! ```

mod output;
mod region;

pub use output::OutputGrid;
pub use region::RegionGrid;
