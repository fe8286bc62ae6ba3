//! Platform configuration.
//!
//! ```toml
//! seed_fixtures = true
//!
//! [latency]
//! enabled = true
//! min_ms = 200
//! max_ms = 500
//! ```
//!
//! Every key is optional; missing keys take the defaults shown above.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::store::Latency;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Seed the stores from the bundled fixtures.
    pub seed_fixtures: bool,
    pub latency: LatencyConfig,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            seed_fixtures: true,
            latency: LatencyConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    pub enabled: bool,
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_ms: Latency::DEFAULT_MIN_MS,
            max_ms: Latency::DEFAULT_MAX_MS,
        }
    }
}

impl LatencyConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn to_latency(&self) -> Latency {
        if self.enabled {
            Latency::from_millis(self.min_ms, self.max_ms)
        } else {
            Latency::none()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("latency min_ms ({min_ms}) is greater than max_ms ({max_ms})")]
    InvalidLatency { min_ms: u64, max_ms: u64 },
}

impl PlatformConfig {
    /// Defaults with latency turned off; the usual choice in tests.
    pub fn instant() -> Self {
        Self {
            latency: LatencyConfig::disabled(),
            ..Self::default()
        }
    }

    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: PlatformConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&input)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let LatencyConfig { min_ms, max_ms, .. } = self.latency;
        if min_ms > max_ms {
            return Err(ConfigError::InvalidLatency { min_ms, max_ms });
        }
        Ok(())
    }
}
