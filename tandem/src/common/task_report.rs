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

use acton_ern::Ern;

use crate::common::AgentError;

/// Which of an agent's two loops a task ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopKind {
    /// The inbox consume loop.
    Consume,
    /// The periodic behavior loop.
    Behaviors,
}

impl fmt::Display for LoopKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Consume => f.write_str("consume"),
            Self::Behaviors => f.write_str("behaviors"),
        }
    }
}

/// How a loop task ended.
#[derive(Debug)]
pub enum TaskOutcome {
    /// The loop acknowledged cancellation.
    Cancelled,
    /// A handler or behavior failed and ended the loop.
    Failed(AgentError),
    /// A handler or behavior panicked.
    Panicked(String),
    /// The loop did not settle before the shutdown deadline and was aborted.
    TimedOut,
    /// The task was aborted before it settled.
    Aborted,
}

impl TaskOutcome {
    /// Returns `true` for a clean cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => f.write_str("cancelled"),
            Self::Failed(error) => write!(f, "failed: {error}"),
            Self::Panicked(message) => write!(f, "panicked: {message}"),
            Self::TimedOut => f.write_str("timed out"),
            Self::Aborted => f.write_str("aborted"),
        }
    }
}

/// The settlement of one loop task.
#[derive(Debug)]
pub struct TaskReport {
    /// The agent the loop belonged to.
    pub agent: Ern,
    /// Which loop it was.
    pub loop_kind: LoopKind,
    /// How it ended.
    pub outcome: TaskOutcome,
}

impl fmt::Display for TaskReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} loop {}", self.agent.root, self.loop_kind, self.outcome)
    }
}

/// Every task report collected by a runtime-wide shutdown.
#[derive(Debug, Default)]
pub struct ShutdownReport {
    reports: Vec<TaskReport>,
}

impl ShutdownReport {
    pub(crate) const fn new(reports: Vec<TaskReport>) -> Self {
        Self { reports }
    }

    /// Returns `true` when every task settled by cancellation.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.reports.iter().all(|report| report.outcome.is_cancelled())
    }

    /// Returns the reports of tasks that did not settle by cancellation.
    #[must_use]
    pub fn failures(&self) -> Vec<&TaskReport> {
        self.reports
            .iter()
            .filter(|report| !report.outcome.is_cancelled())
            .collect()
    }

    /// Returns every report.
    #[must_use]
    pub fn reports(&self) -> &[TaskReport] {
        &self.reports
    }

    /// Returns the number of tasks that were awaited.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Returns `true` if no task was running.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}
