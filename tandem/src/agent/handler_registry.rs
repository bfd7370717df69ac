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

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::common::{AgentError, FutureBox, HandlerFn};
use crate::message::{Message, MessageType};

/// Maps each [`MessageType`] to at most one async handler.
///
/// Registration overwrites: the last handler registered for a type is the one
/// that runs. Messages whose type has no handler are dropped by
/// [`dispatch`](Self::dispatch) without error and without logging.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: RwLock<HashMap<MessageType, HandlerFn>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `kind`, replacing any earlier handler.
    ///
    /// Returns `true` when an earlier handler was replaced.
    pub fn register<F, Fut>(&self, kind: impl Into<MessageType>, handler: F) -> bool
    where
        F: Fn(Message) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let handler: HandlerFn = Arc::new(move |message: Message| -> FutureBox {
            Box::pin(handler(message))
        });
        self.handlers.write().insert(kind.into(), handler).is_some()
    }

    /// Returns `true` if a handler is registered for `kind`.
    #[must_use]
    pub fn contains(&self, kind: &MessageType) -> bool {
        self.handlers.read().contains_key(kind)
    }

    /// Returns the number of registered message types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.read().len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.read().is_empty()
    }

    /// Runs the handler registered for the message's type to completion.
    ///
    /// The lock is released before the handler is awaited, so handlers may
    /// register further handlers; those apply from the next dispatch on.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Handler`] if the handler fails. An unknown type
    /// is not an error.
    pub async fn dispatch(&self, message: Message) -> Result<(), AgentError> {
        let handler = self.handlers.read().get(message.kind()).cloned();
        let Some(handler) = handler else {
            return Ok(());
        };
        let kind = message.kind().clone();
        handler(message).await.map_err(|error| AgentError::Handler {
            kind,
            source: error.into(),
        })
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handlers = self.handlers.read();
        let mut kinds: Vec<_> = handlers.keys().map(MessageType::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("HandlerRegistry").field("kinds", &kinds).finish()
    }
}
