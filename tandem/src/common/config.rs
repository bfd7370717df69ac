/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::common::ConfigError;

/// Configuration for the Tandem runtime
///
/// This struct contains all configurable values for the framework,
/// loaded from TOML files in XDG-compliant directories. Every section is
/// optional; missing sections and keys fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TandemConfig {
    /// Timeout configuration
    pub timeouts: TimeoutConfig,
    /// Behavior loop scheduling
    pub scheduling: SchedulingConfig,
    /// Default values configuration
    pub defaults: DefaultsConfig,
    /// Settings for the chatter agents
    pub chatter: ChatterConfig,
    /// Tracing and logging configuration
    pub tracing: TracingConfig,
}

/// Timeout-related configuration values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// How long `stop` waits for one agent's loops to settle, in milliseconds
    pub agent_shutdown_timeout_ms: u64,
    /// How long `shutdown_all` waits for every loop to settle, in milliseconds
    pub system_shutdown_timeout_ms: u64,
}

/// Behavior loop scheduling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
    /// Sleep between the end of one behavior tick and the start of the next, in milliseconds
    pub behavior_interval_ms: u64,
}

/// Default configuration values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Default agent name when none provided
    pub agent_name: String,
}

/// Settings for the chatter agents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatterConfig {
    /// Words a chatter samples from
    pub vocabulary: Vec<String>,
    /// Number of distinct words per generated message
    pub sample_size: usize,
    /// Substring that makes a received message worth recording
    pub marker: String,
}

/// Tracing and logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    /// Filter directive used when `RUST_LOG` is not set
    pub level: String,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            agent_shutdown_timeout_ms: 10_000,
            system_shutdown_timeout_ms: 30_000,
        }
    }
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            behavior_interval_ms: 2_000,
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            agent_name: "agent".to_string(),
        }
    }
}

impl Default for ChatterConfig {
    fn default() -> Self {
        let vocabulary = [
            "hello", "sun", "world", "space", "moon", "crypto", "sky", "ocean", "universe", "human",
        ];
        Self {
            vocabulary: vocabulary.iter().map(ToString::to_string).collect(),
            sample_size: 2,
            marker: "hello".to_string(),
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ChatterConfig {
    /// Checks that a message can always be generated from these settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an empty vocabulary, a zero sample
    /// size, a sample larger than the vocabulary, or an empty marker.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vocabulary.is_empty() {
            return Err(ConfigError::Invalid("chatter vocabulary is empty".into()));
        }
        if self.sample_size == 0 {
            return Err(ConfigError::Invalid("chatter sample_size must be at least 1".into()));
        }
        if self.sample_size > self.vocabulary.len() {
            return Err(ConfigError::Invalid(format!(
                "chatter sample_size {} exceeds vocabulary of {} words",
                self.sample_size,
                self.vocabulary.len()
            )));
        }
        if self.marker.is_empty() {
            return Err(ConfigError::Invalid("chatter marker is empty".into()));
        }
        Ok(())
    }
}

impl TandemConfig {
    /// Convert agent shutdown timeout to Duration
    #[must_use]
    pub const fn agent_shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.timeouts.agent_shutdown_timeout_ms)
    }

    /// Convert system shutdown timeout to Duration
    #[must_use]
    pub const fn system_shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.timeouts.system_shutdown_timeout_ms)
    }

    /// Convert the behavior interval to Duration
    #[must_use]
    pub const fn behavior_interval(&self) -> Duration {
        Duration::from_millis(self.scheduling.behavior_interval_ms)
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not valid TOML for this structure.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if its contents are malformed.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Load configuration from XDG-compliant locations
    ///
    /// Looks for `tandem/config.toml` under `$XDG_CONFIG_HOME` and then the XDG
    /// config directories.
    ///
    /// If no configuration file is found, returns the default configuration.
    /// If a configuration file exists but is malformed, logs an error and uses defaults.
    #[must_use]
    pub fn load() -> Self {
        let xdg_dirs = match xdg::BaseDirectories::with_prefix("tandem") {
            Ok(dirs) => dirs,
            Err(e) => {
                error!("Failed to initialize XDG directories: {}", e);
                return Self::default();
            }
        };

        let Some(path) = xdg_dirs.find_config_file("config.toml") else {
            info!("No configuration file found, using defaults");
            return Self::default();
        };

        info!("Loading configuration from: {}", path.display());
        match Self::load_from_path(&path) {
            Ok(config) => {
                info!("Successfully loaded configuration");
                config
            }
            Err(e) => {
                error!("Failed to load configuration file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
