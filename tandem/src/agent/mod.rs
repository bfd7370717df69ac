//! Defines the agent and the pieces it is composed of.
//!
//! # Key Components
//!
//! *   [`Agent`]: Owns an inbox, a swappable outbox, a [`HandlerRegistry`] and a
//!     [`BehaviorSet`], and exposes the consume loop and the behavior loop.
//! *   [`AgentConfig`]: Name and behavior interval used to create an agent.
//! *   [`AgentState`]: The lifecycle an agent moves through, from unwired to stopped.
//! *   [`WeakAgent`]: A non-owning reference, used by behaviors that emit through
//!     their own agent.

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

pub use agent_config::{AgentConfig, DEFAULT_BEHAVIOR_INTERVAL};
pub use behavior_set::BehaviorSet;
pub use handler_registry::HandlerRegistry;
pub use lifecycle::AgentState;
pub use managed_agent::{Agent, WeakAgent};

/// Contains the `AgentConfig` struct for agent initialization.
mod agent_config;
/// Contains the ordered, periodic behavior list.
mod behavior_set;
/// Contains the type-to-handler dispatch table.
mod handler_registry;
/// Contains the lifecycle state machine.
mod lifecycle;
/// Contains the `Agent` handle and its two loops.
mod managed_agent;
