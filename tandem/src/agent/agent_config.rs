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

use std::time::Duration;

use acton_ern::Ern;

use crate::common::AgentError;

/// The pause between behavior ticks when nothing else is configured.
pub const DEFAULT_BEHAVIOR_INTERVAL: Duration = Duration::from_secs(2);

/// Configuration parameters required to create an [`Agent`](crate::agent::Agent).
///
/// The agent's identity is an [`Ern`] built from its name. Because the
/// identifier carries a unique suffix, two agents created with the same name
/// are still distinct.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    id: Ern,
    behavior_interval: Duration,
}

impl AgentConfig {
    /// Creates a configuration for an agent named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidName`] if `name` cannot be used as the root
    /// of an `Ern`.
    pub fn new(name: impl Into<String>) -> Result<Self, AgentError> {
        let name = name.into();
        let id = Ern::with_root(name.as_str()).map_err(|error| AgentError::InvalidName {
            reason: error.to_string(),
            name,
        })?;
        Ok(Self {
            id,
            behavior_interval: DEFAULT_BEHAVIOR_INTERVAL,
        })
    }

    /// Sets the pause between the end of one behavior tick and the start of the next.
    #[must_use]
    pub const fn with_behavior_interval(mut self, interval: Duration) -> Self {
        self.behavior_interval = interval;
        self
    }

    /// Returns the identifier the agent will use.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> &Ern {
        &self.id
    }

    /// Returns the configured behavior interval.
    #[inline]
    #[must_use]
    pub const fn behavior_interval(&self) -> Duration {
        self.behavior_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_two_second_interval() {
        let config = AgentConfig::new("alpha").unwrap();
        assert_eq!(config.behavior_interval(), DEFAULT_BEHAVIOR_INTERVAL);
        assert!(config.id().root.as_str().starts_with("alpha"));
    }

    #[test]
    fn interval_can_be_overridden() {
        let config = AgentConfig::new("beta")
            .unwrap()
            .with_behavior_interval(Duration::from_millis(50));
        assert_eq!(config.behavior_interval(), Duration::from_millis(50));
    }
}
