//! Kernel configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// How the hot loop maps a (row, col) pixel to a sample point and a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelIndexing {
    /// Sample at the pixel centre, store at `row * width_pix + col`.
    #[default]
    Direct,
    /// Match the pre-1.0 kernel bit-for-bit: size the grid from an `f32`
    /// pixel size (`ceil(width / (1 / resolution))`), sample at the pixel's
    /// lower corner and advance the running index before storing, which
    /// shifts every contribution one cell forward. The contribution of the
    /// very last pixel has no cell and is dropped.
    Legacy,
}

/// Worker pool and indexing settings for the back-projection kernel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KernelConfig {
    /// Explicit worker count. `None` derives it from the host's parallelism.
    #[serde(default)]
    pub workers: Option<usize>,

    /// Logical cores left to the caller when `workers` is unset.
    #[serde(default = "defaults::reserved_threads")]
    pub reserved_threads: usize,

    /// Pixel sampling/indexing convention.
    #[serde(default)]
    pub indexing: PixelIndexing,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            workers: None,
            reserved_threads: defaults::reserved_threads(),
            indexing: PixelIndexing::default(),
        }
    }
}

impl KernelConfig {
    /// Config with a fixed number of workers.
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers: Some(workers),
            ..Self::default()
        }
    }

    /// Builder-style override of the indexing convention.
    pub fn indexing(mut self, indexing: PixelIndexing) -> Self {
        self.indexing = indexing;
        self
    }

    /// Number of workers to dispatch, never less than one.
    pub fn worker_count(&self) -> usize {
        match self.workers {
            Some(n) => n.max(1),
            None => {
                let available = std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1);
                available.saturating_sub(self.reserved_threads).max(1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_count_floor() {
        let config = KernelConfig {
            workers: None,
            reserved_threads: usize::MAX,
            indexing: PixelIndexing::Direct,
        };
        assert_eq!(config.worker_count(), 1);
    }

    #[test]
    fn test_explicit_workers() {
        assert_eq!(KernelConfig::with_workers(6).worker_count(), 6);
        assert_eq!(KernelConfig::with_workers(0).worker_count(), 1);
    }

    #[test]
    fn test_indexing_serde_names() {
        let config: KernelConfig = toml::from_str("indexing = \"legacy\"").unwrap();
        assert_eq!(config.indexing, PixelIndexing::Legacy);
        assert_eq!(config.reserved_threads, 2);
        assert_eq!(config.workers, None);
    }
}
