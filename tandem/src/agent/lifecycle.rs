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

use std::fmt;

use crate::common::AgentError;

/// Where an agent is in its lifecycle.
///
/// ```text
/// Unwired <-> Wired --start--> Running --cancel--> Cancelling --settle--> Stopped
///    ^                            |                                         |
///    |                            +----------------settle-------------------+
///    +------------------------- rewire -----------------------------------+
/// ```
///
/// There is no path from `Stopped` back to `Running` without rewiring first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AgentState {
    /// Constructed; the outbox is the agent's private mailbox.
    #[default]
    Unwired,
    /// The outbox points at another mailbox.
    Wired,
    /// Both loops have been started.
    Running,
    /// Cancellation was requested; in-flight work is finishing.
    Cancelling,
    /// Both loops have settled.
    Stopped,
}

impl AgentState {
    /// Returns `true` while loops may be executing.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Running | Self::Cancelling)
    }

    /// State after an outbox assignment.
    pub(crate) const fn on_wire(self, connected: bool) -> Self {
        match self {
            Self::Running | Self::Cancelling => self,
            _ if connected => Self::Wired,
            _ => Self::Unwired,
        }
    }

    /// State after both loops are spawned.
    pub(crate) fn on_start(self) -> Result<Self, AgentError> {
        match self {
            Self::Unwired | Self::Wired => Ok(Self::Running),
            from => Err(AgentError::InvalidTransition {
                from,
                to: Self::Running,
            }),
        }
    }

    /// State after a cancellation request. Idle agents are unaffected.
    pub(crate) const fn on_cancel(self) -> Self {
        match self {
            Self::Running => Self::Cancelling,
            other => other,
        }
    }

    /// State after both loops have been awaited.
    pub(crate) const fn on_settled(self) -> Self {
        match self {
            Self::Running | Self::Cancelling => Self::Stopped,
            other => other,
        }
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unwired => "unwired",
            Self::Wired => "wired",
            Self::Running => "running",
            Self::Cancelling => "cancelling",
            Self::Stopped => "stopped",
        };
        f.write_str(name)
    }
}
