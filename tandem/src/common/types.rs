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

//! Defines common internal type aliases used within `tandem`.
//!
//! Handlers and behaviors are stored type-erased so that any async closure can
//! be registered on an agent. These aliases keep the signatures readable.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::message::Message;

/// A boxed, thread-safe error used as the `source` of handler and behavior failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A pinned, boxed, dynamically dispatched future returned by handlers and behaviors.
///
/// Its output is an `anyhow::Result` so user code can use `?` freely; the
/// framework converts an `Err` into a typed [`AgentError`](crate::common::AgentError).
pub type FutureBox = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'static>>;

/// Crate-internal: a registered message handler, shared so that it can be cloned
/// out of the registry before being awaited.
pub(crate) type HandlerFn = Arc<dyn Fn(Message) -> FutureBox + Send + Sync + 'static>;

/// Crate-internal: a registered zero-argument behavior.
pub(crate) type BehaviorFn = Arc<dyn Fn() -> FutureBox + Send + Sync + 'static>;
