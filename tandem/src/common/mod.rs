//! Defines the runtime, configuration, errors and shared types of the framework.
//!
//! # Key Components
//!
//! *   [`TandemApp`]: The entry point that builds an [`AgentRuntime`].
//! *   [`AgentRuntime`]: Creates agents, owns the [`Topology`] between them, and
//!     starts and stops their loops, reporting how each loop ended.
//! *   [`TandemConfig`]: XDG-located TOML configuration.
//! *   [`AgentError`] and [`ConfigError`]: The typed errors surfaced to callers.
//! *   [`MemorySink`], [`TracingSink`] and [`FanoutSink`]: [`EventSink`](crate::traits::EventSink)
//!     implementations for hosts.
//!
//! Internal types and submodules handle the implementation details for these components.

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

// --- Public Re-exports ---
pub use agent_error::{AgentError, ConfigError};
pub use agent_runtime::AgentRuntime;
pub use config::{
    ChatterConfig, DefaultsConfig, SchedulingConfig, TandemConfig, TimeoutConfig, TracingConfig,
};
pub use event_log::{FanoutSink, LogEntry, MemorySink, TracingSink};
pub use tandem_app::TandemApp;
pub use task_report::{LoopKind, ShutdownReport, TaskOutcome, TaskReport};
pub use topology::{Edge, Topology};

// --- Crate-Internal Re-exports ---
pub use types::*;

// --- Submodules ---

/// Defines common internal type aliases.
mod types;

/// Defines the typed errors.
mod agent_error;
/// Defines the `AgentRuntime` for managing the system.
mod agent_runtime;
/// Defines the configuration system for the framework.
mod config;
/// Defines the in-memory and tracing event sinks.
mod event_log;
/// Defines the internal state (`RuntimeInner`) of the runtime.
mod runtime_inner;
/// Defines the `TandemApp` entry point for system initialization.
mod tandem_app;
/// Defines the per-loop and runtime-wide shutdown reports.
mod task_report;
/// Defines the host-owned communication graph.
mod topology;
