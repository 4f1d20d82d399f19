//! Back-projection kernel.
//!
//! ```text
//!  ScanSet ──┐
//!            ├─► ParallelCoordinator ──partition──► [0..k) [k..2k) ... [.. n)
//!  Area ─────┘          │                              │      │          │
//!                       │                         ScanWorker ScanWorker ScanWorker
//!                       │                              │      │          │
//!                       ◄──────── merge RegionGrids ───┴──────┴──────────┘
//!                       │
//!                       ▼
//!                  OutputGrid (normalized)
//! ```
//!
//! - [`ScanWorker`]: hot loop for one contiguous scan range
//! - [`ParallelCoordinator`]: worker count, partitioning, fork-join, merge
//! - [`partition`]: the scan range split used by the coordinator

mod coordinator;
mod worker;

pub use coordinator::{ParallelCoordinator, partition};
pub use worker::ScanWorker;
