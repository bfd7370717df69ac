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

use acton_ern::Ern;
use futures::future::join_all;
use tokio::time::Instant;
use tracing::{debug, info, instrument, trace};

use crate::agent::{Agent, AgentConfig, AgentState};
use crate::common::runtime_inner::{run_loop, AgentTask, RuntimeInner};
use crate::common::{AgentError, LoopKind, ShutdownReport, TandemConfig, TaskReport, Topology};

/// Represents the initialized and active Tandem runtime.
///
/// Obtained from [`TandemApp::launch`](crate::common::TandemApp::launch). The
/// runtime creates agents, owns the [`Topology`] between them, and starts and
/// stops their loops as tracked Tokio tasks.
///
/// `AgentRuntime` is a cheap handle; clones share the same runtime.
#[derive(Debug, Clone)]
pub struct AgentRuntime(pub(crate) Arc<RuntimeInner>);

impl AgentRuntime {
    pub(crate) fn new(config: TandemConfig) -> Self {
        Self(Arc::new(RuntimeInner::new(config)))
    }

    /// Returns the configuration the runtime was launched with.
    #[must_use]
    pub fn config(&self) -> &TandemConfig {
        &self.0.config
    }

    /// Creates and registers an agent named `name`, using the configured
    /// behavior interval.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidName`] if `name` is not a valid identifier root.
    pub fn new_agent(&self, name: impl Into<String>) -> Result<Agent, AgentError> {
        let config = AgentConfig::new(name)?.with_behavior_interval(self.0.config.behavior_interval());
        Ok(self.new_agent_with_config(config))
    }

    /// Creates and registers an agent with the configured default name.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidName`] if the configured default name is invalid.
    pub fn new_default_agent(&self) -> Result<Agent, AgentError> {
        self.new_agent(self.0.config.defaults.agent_name.clone())
    }

    /// Creates and registers an agent from an explicit configuration.
    #[must_use]
    pub fn new_agent_with_config(&self, config: AgentConfig) -> Agent {
        let agent = Agent::new(config);
        self.0.agents.insert(agent.id().clone(), agent.clone());
        debug!(agent = %agent.name(), "agent registered");
        agent
    }

    /// Returns the registered agent with identifier `id`.
    #[must_use]
    pub fn agent(&self, id: &Ern) -> Option<Agent> {
        self.0.agents.get(id).map(|entry| entry.value().clone())
    }

    /// Returns the number of registered agents.
    #[must_use]
    pub fn agent_count(&self) -> usize {
        self.0.agents.len()
    }

    /// Points `from`'s outbox at `to`'s inbox and records the edge.
    ///
    /// Returns the agent `from` was previously connected to.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::NotRegistered`] if either agent belongs to another runtime.
    pub fn connect(&self, from: &Agent, to: &Agent) -> Result<Option<Ern>, AgentError> {
        self.ensure_registered(from)?;
        self.ensure_registered(to)?;
        Ok(self.0.topology.lock().connect(from, to))
    }

    /// Connects `a` and `b` to each other.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::NotRegistered`] if either agent belongs to another runtime.
    pub fn connect_bidirectional(&self, a: &Agent, b: &Agent) -> Result<(), AgentError> {
        self.ensure_registered(a)?;
        self.ensure_registered(b)?;
        self.0.topology.lock().connect_bidirectional(a, b);
        Ok(())
    }

    /// Restores `from`'s private outbox.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::NotRegistered`] if the agent belongs to another runtime.
    pub fn disconnect(&self, from: &Agent) -> Result<Option<Ern>, AgentError> {
        self.ensure_registered(from)?;
        Ok(self.0.topology.lock().disconnect(from))
    }

    /// Returns a snapshot of the current topology.
    #[must_use]
    pub fn topology(&self) -> Topology {
        self.0.topology.lock().clone()
    }

    /// Spawns the agent's consume loop and behavior loop as two tasks.
    ///
    /// # Errors
    ///
    /// *   [`AgentError::NotRegistered`] if the agent belongs to another runtime.
    /// *   [`AgentError::RuntimeShutDown`] after [`shutdown_all`](Self::shutdown_all).
    /// *   [`AgentError::InvalidTransition`] if the agent is already running, or
    ///     stopped and not rewired since.
    #[instrument(skip(self, agent), fields(agent = %agent.name()))]
    pub fn start(&self, agent: &Agent) -> Result<(), AgentError> {
        self.ensure_registered(agent)?;
        if self.0.cancellation_token.is_cancelled() {
            return Err(AgentError::RuntimeShutDown);
        }
        agent.begin_run(&self.0.cancellation_token)?;

        let mut tasks = self.0.tasks.lock();
        for loop_kind in [LoopKind::Consume, LoopKind::Behaviors] {
            let handle = self.0.tracker.spawn(run_loop(agent.clone(), loop_kind));
            tasks.push(AgentTask {
                agent: agent.id().clone(),
                loop_kind,
                handle,
            });
        }
        trace!("agent loops spawned");
        Ok(())
    }

    /// Starts every registered agent that is unwired or wired.
    ///
    /// Running agents are left alone, as are stopped agents that have not
    /// been rewired.
    ///
    /// # Errors
    ///
    /// Stops at the first agent that cannot be started.
    pub fn start_all(&self) -> Result<(), AgentError> {
        let idle: Vec<Agent> = self
            .0
            .agents
            .iter()
            .map(|entry| entry.value().clone())
            .filter(|agent| matches!(agent.state(), AgentState::Unwired | AgentState::Wired))
            .collect();
        for agent in &idle {
            self.start(agent)?;
        }
        Ok(())
    }

    /// Cancels the agent's loops and waits for both to settle.
    ///
    /// Waits at most `timeouts.agent_shutdown_timeout_ms`; a loop still running
    /// then is aborted and reported as timed out. The agent ends `Stopped`.
    /// Loops that already ended on their own are reported as they ended.
    #[instrument(skip(self, agent), fields(agent = %agent.name()))]
    pub async fn stop(&self, agent: &Agent) -> Vec<TaskReport> {
        agent.cancel();
        let mine = {
            let mut tasks = self.0.tasks.lock();
            let (mine, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut *tasks)
                .into_iter()
                .partition(|task| task.agent == *agent.id());
            *tasks = rest;
            mine
        };
        let deadline = Instant::now() + self.0.config.agent_shutdown_timeout();
        let reports = join_all(mine.into_iter().map(|task| task.settle(deadline))).await;
        agent.mark_stopped();
        debug!(tasks = reports.len(), "agent stopped");
        reports
    }

    /// Cancels every agent and waits for all loops to settle.
    ///
    /// Waits at most `timeouts.system_shutdown_timeout_ms` overall. Afterwards
    /// the runtime refuses to start agents.
    #[instrument(skip(self))]
    pub async fn shutdown_all(&self) -> ShutdownReport {
        info!(agents = self.agent_count(), "shutting down");
        self.0.cancellation_token.cancel();
        for entry in self.0.agents.iter() {
            entry.value().mark_cancelling();
        }

        let tasks = std::mem::take(&mut *self.0.tasks.lock());
        let deadline = Instant::now() + self.0.config.system_shutdown_timeout();
        let reports = join_all(tasks.into_iter().map(|task| task.settle(deadline))).await;

        for entry in self.0.agents.iter() {
            entry.value().mark_stopped();
        }
        self.0.tracker.close();
        self.0.tracker.wait().await;

        let report = ShutdownReport::new(reports);
        info!(tasks = report.len(), clean = report.is_clean(), "shutdown complete");
        report
    }

    fn ensure_registered(&self, agent: &Agent) -> Result<(), AgentError> {
        if self.0.agents.contains_key(agent.id()) {
            Ok(())
        } else {
            Err(AgentError::NotRegistered(agent.id().to_string()))
        }
    }
}
