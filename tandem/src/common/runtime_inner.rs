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

use acton_ern::Ern;
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{error, trace, warn};

use crate::agent::Agent;
use crate::common::{LoopKind, TandemConfig, TaskOutcome, TaskReport, Topology};

/// Internal state structure for the Tandem runtime.
///
/// Holds the agent registry, the host-owned topology and every loop task
/// that has been started and not yet awaited.
#[derive(Debug)]
pub(crate) struct RuntimeInner {
    /// Runtime configuration.
    pub(crate) config: TandemConfig,

    /// Agents created by this runtime, keyed by their ERN.
    pub(crate) agents: DashMap<Ern, Agent>,

    /// Outbox-to-inbox edges between registered agents.
    pub(crate) topology: Mutex<Topology>,

    /// Loop tasks that have been spawned and not yet settled.
    pub(crate) tasks: Mutex<Vec<AgentTask>>,

    /// Parent of every agent's per-run token; cancelled by `shutdown_all`.
    pub(crate) cancellation_token: CancellationToken,

    /// Tracks every spawned loop task.
    pub(crate) tracker: TaskTracker,
}

impl RuntimeInner {
    pub(crate) fn new(config: TandemConfig) -> Self {
        Self {
            config,
            agents: DashMap::new(),
            topology: Mutex::new(Topology::new()),
            tasks: Mutex::new(Vec::new()),
            cancellation_token: CancellationToken::new(),
            tracker: TaskTracker::new(),
        }
    }
}

/// A spawned loop and what it belongs to.
#[derive(Debug)]
pub(crate) struct AgentTask {
    pub(crate) agent: Ern,
    pub(crate) loop_kind: LoopKind,
    pub(crate) handle: JoinHandle<TaskOutcome>,
}

impl AgentTask {
    /// Waits for the task until `deadline`, aborting it if it is still running then.
    pub(crate) async fn settle(self, deadline: Instant) -> TaskReport {
        let Self {
            agent,
            loop_kind,
            mut handle,
        } = self;
        let outcome = match tokio::time::timeout_at(deadline, &mut handle).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(join_error)) => outcome_of(join_error),
            Err(_) => {
                warn!(agent = %agent.root, %loop_kind, "loop did not settle before the deadline; aborting");
                handle.abort();
                TaskOutcome::TimedOut
            }
        };
        trace!(agent = %agent.root, %loop_kind, %outcome, "loop settled");
        TaskReport {
            agent,
            loop_kind,
            outcome,
        }
    }
}

/// Runs one of `agent`'s loops to its end and classifies how it ended.
pub(crate) async fn run_loop(agent: Agent, loop_kind: LoopKind) -> TaskOutcome {
    let result = match loop_kind {
        LoopKind::Consume => agent.consume_messages().await,
        LoopKind::Behaviors => agent.run_behaviors().await,
    };
    match result {
        Ok(never) => match never {},
        Err(error) if error.is_cancelled() => TaskOutcome::Cancelled,
        Err(error) => {
            error!(agent = %agent.name(), %loop_kind, error = ?error, "agent loop failed");
            TaskOutcome::Failed(error)
        }
    }
}

fn outcome_of(join_error: JoinError) -> TaskOutcome {
    if !join_error.is_panic() {
        return TaskOutcome::Aborted;
    }
    let payload = join_error.into_panic();
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    error!(%message, "agent loop panicked");
    TaskOutcome::Panicked(message)
}
