//! Main ChitraConfig and loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::reduction::ReductionConfig;

use super::error::ConfigLoadError;
use super::kernel::KernelConfig;

/// Default config location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "configs/chitra.toml";

/// Full Chitra configuration loaded from TOML
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChitraConfig {
    /// Kernel settings
    #[serde(default)]
    pub kernel: KernelConfig,

    /// Scan reduction settings
    #[serde(default)]
    pub reduction: ReductionConfig,
}

impl ChitraConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Io(e.to_string()))?;
        Self::from_toml(&contents)
    }

    /// Load from the default config path, falling back to built-in defaults
    pub fn load_default() -> Result<Self, ConfigLoadError> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse from TOML string
    pub fn from_toml(contents: &str) -> Result<Self, ConfigLoadError> {
        toml::from_str(contents).map_err(|e| ConfigLoadError::Parse(e.to_string()))
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String, ConfigLoadError> {
        toml::to_string_pretty(self).map_err(|e| ConfigLoadError::Parse(e.to_string()))
    }
}
