//! Unified configuration loading for Chitra.
//!
//! Loads all configuration from a single TOML file with sensible defaults.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chitra::config::ChitraConfig;
//!
//! // Load from default path (configs/chitra.toml)
//! let config = ChitraConfig::load_default()?;
//!
//! // Or use built-in defaults (no file needed)
//! let config = ChitraConfig::default();
//! ```
//!
//! ## Configuration Sections
//!
//! | Section | Description |
//! |---------|-------------|
//! | [`KernelConfig`] | Worker count, reserved threads, pixel indexing |
//! | [`ReductionConfig`](crate::reduction::ReductionConfig) | Pose-binned scan de-duplication |
//!
//! ## Example TOML
//!
//! ```toml
//! [kernel]
//! workers = 4             # omit to use available cores - reserved_threads
//! reserved_threads = 2
//! indexing = "direct"     # or "legacy" for output identical to the pre-1.0 kernel
//!
//! [reduction]
//! bins_per_axis = 80
//! extent_min = -5.0
//! extent_max = 5.0
//! limit_per_bin = 1
//! ```

mod chitra;
pub(crate) mod defaults;
mod error;
mod kernel;

pub use chitra::{ChitraConfig, DEFAULT_CONFIG_PATH};
pub use error::ConfigLoadError;
pub use kernel::{KernelConfig, PixelIndexing};
