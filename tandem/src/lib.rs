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

#![forbid(unsafe_code)]
#![forbid(missing_docs)]

//! # Tandem
//!
//! A small in-process agent framework built on Tokio. Agents exchange typed
//! messages through FIFO mailboxes, dispatch them to registered handlers and
//! run periodic behaviors, all multiplexed on one cooperative scheduler.
//!
//! ## Key Concepts
//!
//! - **Mailbox**: an unbounded, order-preserving queue, shared by reference.
//! - **Agent**: owns an inbox, a swappable outbox, a handler registry and a
//!   behavior set; runs a consume loop and a behavior loop.
//! - **Topology**: host-owned directed edges that point one agent's outbox at
//!   another agent's inbox.
//! - **Runtime (`AgentRuntime`)**: creates agents, starts their loops as
//!   tracked tasks and reports how each loop ended on stop or shutdown.
//! - **Event sinks**: where handlers and behaviors report what a host should see.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tandem::prelude::*;
//!
//! #[tandem_main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = TandemApp::launch();
//!     let ping = runtime.new_agent("ping")?;
//!     let pong = runtime.new_agent("pong")?;
//!
//!     pong.register_message_handler("custom", |message: Message| async move {
//!         println!("pong got {message}");
//!         Ok(())
//!     });
//!     let speaker = ping.downgrade();
//!     ping.register_behavior(move || {
//!         let speaker = speaker.clone();
//!         async move {
//!             if let Some(agent) = speaker.upgrade() {
//!                 agent.emit(Message::new(MessageType::CUSTOM, "hello world"));
//!             }
//!             Ok(())
//!         }
//!     });
//!
//!     runtime.connect(&ping, &pong)?;
//!     runtime.start_all()?;
//!     tokio::time::sleep(std::time::Duration::from_secs(5)).await;
//!     runtime.shutdown_all().await;
//!     Ok(())
//! }
//! ```

/// Internal utilities and structures used throughout the framework.
pub(crate) mod common;

/// Defines the core agent structures and logic.
pub(crate) mod agent;

/// Defines messages and mailboxes.
pub(crate) mod message;

/// Defines core traits used throughout the framework.
pub(crate) mod traits;

/// Defines the chatter agent policy.
pub(crate) mod chatter;

/// Defines host-side controllers.
pub(crate) mod host;

/// A prelude module for conveniently importing the most commonly used items.
///
/// # Re-exports
///
/// ## Macros (from `tandem-macro`)
/// *   [`tandem_macro::tandem_main`]: Attribute macro that runs an async `main` on a Tokio runtime.
///
/// ## External Crates
/// *   [`acton_ern::Ern`](https://docs.rs/acton-ern): The identifier type of agents.
/// *   [`tokio`](https://docs.rs/tokio): The runtime the agents run on.
///
/// ## Core Types
/// *   [`crate::agent::Agent`], [`crate::agent::AgentConfig`], [`crate::agent::AgentState`]
/// *   [`crate::common::TandemApp`], [`crate::common::AgentRuntime`], [`crate::common::Topology`]
/// *   [`crate::message::Message`], [`crate::message::MessageType`], [`crate::message::Mailbox`]
/// *   [`crate::traits::EventSink`] and its implementations
/// *   [`crate::chatter::Chatter`] and [`crate::host::Duet`]
pub mod prelude {
    // Macros from tandem-macro
    pub use tandem_macro::tandem_main;

    // External crate re-exports
    pub use acton_ern::Ern;
    pub use tokio;

    // Core types
    pub use crate::agent::{
        Agent, AgentConfig, AgentState, BehaviorSet, HandlerRegistry, WeakAgent,
        DEFAULT_BEHAVIOR_INTERVAL,
    };
    pub use crate::chatter::{Chatter, RandomSampler, SeededSampler, WordSampler};
    pub use crate::common::{
        AgentError, AgentRuntime, BoxError, ChatterConfig, ConfigError, DefaultsConfig, Edge,
        FanoutSink, FutureBox, LogEntry, LoopKind, MemorySink, SchedulingConfig, ShutdownReport,
        TandemApp, TandemConfig, TaskOutcome, TaskReport, TimeoutConfig, Topology, TracingConfig,
        TracingSink,
    };
    pub use crate::host::{Controls, Duet};
    pub use crate::message::{Mailbox, Message, MessageType};
    pub use crate::traits::EventSink;
}
