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

use std::path::PathBuf;

use thiserror::Error;

use crate::agent::AgentState;
use crate::common::BoxError;
use crate::message::MessageType;

/// Errors surfaced by agents and the runtime.
///
/// [`AgentError::Cancelled`] is how both agent loops report an acknowledged
/// cancellation. It is an expected outcome, distinct from a failure, and should
/// be checked with [`AgentError::is_cancelled`] before treating an error as fatal.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The loop observed its cancellation token at a suspension point and exited.
    #[error("agent loop cancelled")]
    Cancelled,

    /// A message handler returned an error.
    #[error("handler for `{kind}` failed")]
    Handler {
        /// The message type whose handler failed.
        kind: MessageType,
        /// The error returned by the handler.
        #[source]
        source: BoxError,
    },

    /// A behavior returned an error, aborting the current tick.
    #[error("behavior #{index} failed")]
    Behavior {
        /// Registration index of the failing behavior.
        index: usize,
        /// The error returned by the behavior.
        #[source]
        source: BoxError,
    },

    /// An agent name could not be turned into an identifier.
    #[error("invalid agent name `{name}`: {reason}")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A lifecycle operation was requested from a state that does not allow it.
    #[error("cannot move agent from {from} to {to}")]
    InvalidTransition {
        /// The agent's current state.
        from: AgentState,
        /// The requested state.
        to: AgentState,
    },

    /// The runtime has been shut down and no longer starts agents.
    #[error("the runtime has been shut down")]
    RuntimeShutDown,

    /// The runtime was asked about an agent it did not create.
    #[error("agent `{0}` is not registered with this runtime")]
    NotRegistered(String),

    /// The configuration could not be used.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AgentError {
    /// Returns `true` for the cancellation acknowledgement.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Errors raised while reading or validating a [`TandemConfig`](crate::common::TandemConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {}", path.display())]
    Io {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this configuration.
    #[error("failed to parse configuration")]
    Parse(#[from] toml::de::Error),

    /// The values parse but cannot be used.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn cancellation_is_distinguishable() {
        assert!(AgentError::Cancelled.is_cancelled());
        let failure = AgentError::Handler {
            kind: MessageType::CUSTOM,
            source: anyhow::anyhow!("boom").into(),
        };
        assert!(!failure.is_cancelled());
    }

    #[test]
    fn handler_failure_keeps_its_source() {
        let failure = AgentError::Handler {
            kind: MessageType::CUSTOM,
            source: anyhow::anyhow!("boom").into(),
        };
        assert_eq!(failure.to_string(), "handler for `custom` failed");
        assert_eq!(failure.source().map(ToString::to_string).as_deref(), Some("boom"));
    }

    #[test]
    fn transition_error_names_both_states() {
        let error = AgentError::InvalidTransition {
            from: AgentState::Stopped,
            to: AgentState::Running,
        };
        assert_eq!(error.to_string(), "cannot move agent from stopped to running");
    }
}
