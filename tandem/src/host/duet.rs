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

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::agent::{Agent, AgentState};
use crate::chatter::{Chatter, WordSampler};
use crate::common::{AgentError, AgentRuntime, MemorySink, TaskReport};
use crate::traits::EventSink;

/// Which of the host's run and stop actions are currently available.
///
/// Serializes as `{"startEnabled": bool, "stopEnabled": bool}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Controls {
    /// `run` may be called.
    pub start_enabled: bool,
    /// `stop` may be called.
    pub stop_enabled: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            start_enabled: true,
            stop_enabled: false,
        }
    }
}

/// Two chatter agents, `alpha` and `beta`, talking to each other.
///
/// `Duet` is the controller a UI would sit on: it starts and stops the pair,
/// tracks which controls are enabled and keeps the log of what the agents
/// reported.
#[derive(Debug)]
pub struct Duet {
    runtime: AgentRuntime,
    alpha: Agent,
    beta: Agent,
    log: Arc<MemorySink>,
    controls: Mutex<Controls>,
}

impl Duet {
    /// Creates the two agents on `runtime` with the runtime's chatter settings.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Config`] if the chatter settings are unusable.
    pub fn new(runtime: &AgentRuntime) -> Result<Self, AgentError> {
        Self::build(runtime, None)
    }

    /// Like [`new`](Self::new), with both chatters drawing words from `sampler`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Config`] if the chatter settings are unusable.
    pub fn with_sampler(runtime: &AgentRuntime, sampler: Arc<dyn WordSampler>) -> Result<Self, AgentError> {
        Self::build(runtime, Some(sampler))
    }

    fn build(runtime: &AgentRuntime, sampler: Option<Arc<dyn WordSampler>>) -> Result<Self, AgentError> {
        let log = Arc::new(MemorySink::new());
        let mut chatter = Chatter::new(runtime.config().chatter.clone(), log.clone())?;
        if let Some(sampler) = sampler {
            chatter = chatter.with_sampler(sampler);
        }

        let alpha = runtime.new_agent("alpha")?;
        let beta = runtime.new_agent("beta")?;
        chatter.install(&alpha);
        chatter.install(&beta);

        Ok(Self {
            runtime: runtime.clone(),
            alpha,
            beta,
            log,
            controls: Mutex::new(Controls::default()),
        })
    }

    /// Returns the first agent.
    #[must_use]
    pub const fn alpha(&self) -> &Agent {
        &self.alpha
    }

    /// Returns the second agent.
    #[must_use]
    pub const fn beta(&self) -> &Agent {
        &self.beta
    }

    /// Wires the agents to each other and starts both.
    ///
    /// Clears the log first and records what is being started. Either both
    /// agents end up running or neither does.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidTransition`] if the duet is already running
    /// or either agent is already active, or any error from starting the agents.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<(), AgentError> {
        {
            let mut controls = self.controls.lock();
            if !controls.start_enabled {
                return Err(AgentError::InvalidTransition {
                    from: self.alpha.state(),
                    to: AgentState::Running,
                });
            }
            controls.start_enabled = false;
        }

        match self.start_pair().await {
            Ok(()) => {
                *self.controls.lock() = Controls {
                    start_enabled: false,
                    stop_enabled: true,
                };
                info!("duet running");
                Ok(())
            }
            Err(error) => {
                *self.controls.lock() = Controls::default();
                Err(error)
            }
        }
    }

    async fn start_pair(&self) -> Result<(), AgentError> {
        for agent in [&self.alpha, &self.beta] {
            let state = agent.state();
            if state.is_active() {
                return Err(AgentError::InvalidTransition {
                    from: state,
                    to: AgentState::Running,
                });
            }
        }

        let chatter = &self.runtime.config().chatter;
        self.log.clear();
        self.log.record("Preparing the agents.");
        self.runtime.connect_bidirectional(&self.alpha, &self.beta)?;

        self.log.record("Starting the agents with:");
        self.log.record(&format!(
            "behaviour: to generate random {}-word messages.",
            chatter.sample_size
        ));
        self.log.record(&format!(
            "handler: to filter messages for the keyword '{}' and then print its content.",
            chatter.marker
        ));
        self.runtime.start(&self.alpha)?;
        if let Err(error) = self.runtime.start(&self.beta) {
            let reports = self.runtime.stop(&self.alpha).await;
            warn!(%error, tasks = reports.len(), "beta failed to start; alpha stopped");
            return Err(error);
        }
        Ok(())
    }

    /// Stops both agents and returns how their loops ended.
    ///
    /// Does nothing and returns no reports when the duet is not running.
    #[instrument(skip(self))]
    pub async fn stop(&self) -> Vec<TaskReport> {
        {
            let mut controls = self.controls.lock();
            if !controls.stop_enabled {
                return Vec::new();
            }
            controls.stop_enabled = false;
        }

        let mut reports = self.runtime.stop(&self.alpha).await;
        reports.extend(self.runtime.stop(&self.beta).await);

        self.log.record("All agents have been stopped.");
        self.log.clear();
        *self.controls.lock() = Controls::default();
        info!(tasks = reports.len(), "duet stopped");
        reports
    }

    /// Returns the current control availability.
    #[must_use]
    pub fn controls(&self) -> Controls {
        *self.controls.lock()
    }

    /// Returns the log lines recorded since the last run or stop.
    #[must_use]
    pub fn log(&self) -> Vec<String> {
        self.log.lines()
    }

    /// Returns the sink the agents record to.
    #[must_use]
    pub fn sink(&self) -> Arc<MemorySink> {
        self.log.clone()
    }
}
