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

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Weak};
use std::time::Duration;

use acton_ern::Ern;
use parking_lot::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace};

use crate::agent::{AgentConfig, AgentState, BehaviorSet, HandlerRegistry};
use crate::common::AgentError;
use crate::message::{Mailbox, Message, MessageType};

/// An agent: an inbox, a swappable outbox, message handlers and periodic behaviors.
///
/// `Agent` is a handle. Clones share the same inner state, which is how the
/// consume loop and the behavior loop run as separate tasks against one agent.
///
/// # Loops
///
/// *   [`consume_messages`](Self::consume_messages) waits on the inbox and
///     dispatches each message, one at a time, in arrival order.
/// *   [`run_behaviors`](Self::run_behaviors) runs every behavior in order,
///     then sleeps for the configured interval.
///
/// Both loops only stop when cancelled (returning [`AgentError::Cancelled`])
/// or when a handler or behavior fails. Cancellation is observed only while a
/// loop is suspended, so a handler or behavior that has started always finishes.
///
/// # Outbox
///
/// A new agent's outbox is a private mailbox that nobody reads, so
/// [`emit`](Self::emit) is inert until the outbox is pointed at another
/// agent's inbox with [`set_outbox`](Self::set_outbox) (usually through a
/// [`Topology`](crate::common::Topology)).
#[derive(Clone)]
pub struct Agent {
    inner: Arc<AgentInner>,
}

/// A non-owning reference to an [`Agent`].
///
/// Behaviors that emit through their own agent capture a `WeakAgent` so the
/// agent does not keep itself alive.
#[derive(Clone, Debug)]
pub struct WeakAgent {
    inner: Weak<AgentInner>,
}

struct AgentInner {
    id: Ern,
    inbox: Mailbox,
    default_outbox: Mailbox,
    outbox: RwLock<Mailbox>,
    handlers: HandlerRegistry,
    behaviors: BehaviorSet,
    behavior_interval: Duration,
    state: Mutex<AgentState>,
    cancellation_token: Mutex<CancellationToken>,
}

impl Agent {
    /// Creates an unwired agent with no handlers and no behaviors.
    #[must_use]
    pub fn new(config: AgentConfig) -> Self {
        let default_outbox = Mailbox::new();
        Self {
            inner: Arc::new(AgentInner {
                id: config.id().clone(),
                inbox: Mailbox::new(),
                outbox: RwLock::new(default_outbox.clone()),
                default_outbox,
                handlers: HandlerRegistry::new(),
                behaviors: BehaviorSet::new(),
                behavior_interval: config.behavior_interval(),
                state: Mutex::new(AgentState::default()),
                cancellation_token: Mutex::new(CancellationToken::new()),
            }),
        }
    }

    /// Creates an agent named `name` with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidName`] if the name is not a valid identifier root.
    pub fn with_name(name: impl Into<String>) -> Result<Self, AgentError> {
        Ok(Self::new(AgentConfig::new(name)?))
    }

    /// Returns a reference to the agent's unique identifier (`Ern`).
    #[inline]
    #[must_use]
    pub fn id(&self) -> &Ern {
        &self.inner.id
    }

    /// Returns the root name segment of the agent's identifier.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        self.inner.id.root.as_str()
    }

    /// Returns a handle to the agent's inbox.
    #[must_use]
    pub fn inbox(&self) -> Mailbox {
        self.inner.inbox.clone()
    }

    /// Returns a handle to the mailbox `emit` currently writes to.
    #[must_use]
    pub fn outbox(&self) -> Mailbox {
        self.inner.outbox.read().clone()
    }

    /// Returns the private mailbox used as the outbox while unwired.
    #[must_use]
    pub fn default_outbox(&self) -> Mailbox {
        self.inner.default_outbox.clone()
    }

    /// Returns `true` when the outbox points somewhere other than the private mailbox.
    #[must_use]
    pub fn is_wired(&self) -> bool {
        !self.inner.outbox.read().same_as(&self.inner.default_outbox)
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> AgentState {
        *self.inner.state.lock()
    }

    /// Returns the configured pause between behavior ticks.
    #[must_use]
    pub fn behavior_interval(&self) -> Duration {
        self.inner.behavior_interval
    }

    /// Points the outbox at `outbox`; later emits go there.
    ///
    /// Allowed in every state. While the loops run the swap takes effect on
    /// the next emit and the state stays `Running`.
    pub fn set_outbox(&self, outbox: Mailbox) {
        let connected = !outbox.same_as(&self.inner.default_outbox);
        *self.inner.outbox.write() = outbox;
        let mut state = self.inner.state.lock();
        *state = state.on_wire(connected);
        debug!(agent = %self.name(), connected, state = %*state, "outbox assigned");
    }

    /// Points the outbox back at the private mailbox.
    pub fn reset_outbox(&self) {
        self.set_outbox(self.inner.default_outbox.clone());
    }

    /// Puts `message` on the current outbox.
    pub fn emit(&self, message: Message) {
        trace!(agent = %self.name(), kind = %message.kind(), "emit");
        self.inner.outbox.read().put(message);
    }

    /// Registers the handler for messages of type `kind`, replacing any earlier one.
    ///
    /// Registering while the agent runs is allowed; the handler applies from
    /// the next dispatched message.
    pub fn register_message_handler<F, Fut>(&self, kind: impl Into<MessageType>, handler: F) -> &Self
    where
        F: Fn(Message) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let kind = kind.into();
        let replaced = self.inner.handlers.register(kind.clone(), handler);
        debug!(agent = %self.name(), %kind, replaced, "message handler registered");
        self
    }

    /// Appends a behavior; it first runs on the next tick.
    pub fn register_behavior<F, Fut>(&self, behavior: F) -> &Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.inner.behaviors.register(behavior);
        debug!(agent = %self.name(), behaviors = self.inner.behaviors.len(), "behavior registered");
        self
    }

    /// Returns the number of message types with a handler.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.inner.handlers.len()
    }

    /// Returns the number of registered behaviors.
    #[must_use]
    pub fn behavior_count(&self) -> usize {
        self.inner.behaviors.len()
    }

    /// Dispatches one message to its handler, outside of the consume loop.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Handler`] if the handler fails.
    pub async fn dispatch(&self, message: Message) -> Result<(), AgentError> {
        self.inner.handlers.dispatch(message).await
    }

    /// Runs every behavior once, outside of the behavior loop.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Behavior`] for the first failing behavior.
    pub async fn run_tick(&self) -> Result<(), AgentError> {
        self.inner.behaviors.run_tick().await
    }

    /// Receives messages from the inbox and dispatches them, one at a time, forever.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Cancelled`] once the agent is cancelled while
    /// waiting on the inbox, or the first handler failure. A message that
    /// arrives together with the cancellation stays in the inbox.
    #[instrument(skip(self), fields(agent = %self.name()))]
    pub async fn consume_messages(&self) -> Result<Infallible, AgentError> {
        let cancellation_token = self.cancellation_token();
        loop {
            let message = tokio::select! {
                biased;
                () = cancellation_token.cancelled() => {
                    trace!("consume loop cancelled");
                    return Err(AgentError::Cancelled);
                }
                message = self.inner.inbox.get() => message,
            };
            trace!(kind = %message.kind(), "dispatching");
            self.inner.handlers.dispatch(message).await?;
        }
    }

    /// Runs the behaviors, then sleeps for the behavior interval, forever.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Cancelled`] once cancelled between ticks, or the
    /// first behavior failure.
    #[instrument(skip(self), fields(agent = %self.name()))]
    pub async fn run_behaviors(&self) -> Result<Infallible, AgentError> {
        let cancellation_token = self.cancellation_token();
        let outcome = self
            .inner
            .behaviors
            .run_forever(self.inner.behavior_interval, &cancellation_token)
            .await;
        if matches!(outcome, Err(AgentError::Cancelled)) {
            trace!("behavior loop cancelled");
        }
        outcome
    }

    /// Requests cancellation of both loops.
    ///
    /// Loops stop at their next suspension point; work already in progress
    /// finishes first.
    pub fn cancel(&self) {
        let mut state = self.inner.state.lock();
        *state = state.on_cancel();
        self.inner.cancellation_token.lock().cancel();
        debug!(agent = %self.name(), "cancellation requested");
    }

    /// Returns the token the loops currently watch.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.inner.cancellation_token.lock().clone()
    }

    /// Creates a [`WeakAgent`] pointing at this agent.
    #[must_use]
    pub fn downgrade(&self) -> WeakAgent {
        WeakAgent {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Moves to `Running` under a fresh child of `parent` and returns that token.
    pub(crate) fn begin_run(&self, parent: &CancellationToken) -> Result<CancellationToken, AgentError> {
        let mut state = self.inner.state.lock();
        let next = state.on_start()?;
        let token = parent.child_token();
        *self.inner.cancellation_token.lock() = token.clone();
        *state = next;
        Ok(token)
    }

    /// Records that both loops have settled.
    pub(crate) fn mark_stopped(&self) {
        let mut state = self.inner.state.lock();
        *state = state.on_settled();
    }

    /// Marks the agent as cancelling without touching its token, for when a
    /// parent token has already been cancelled.
    pub(crate) fn mark_cancelling(&self) {
        let mut state = self.inner.state.lock();
        *state = state.on_cancel();
    }
}

impl WeakAgent {
    /// Returns the agent if it is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Agent> {
        self.inner.upgrade().map(|inner| Agent { inner })
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.inner.id.to_string())
            .field("state", &self.state())
            .field("wired", &self.is_wired())
            .field("inbox", &self.inner.inbox)
            .field("handlers", &self.inner.handlers)
            .field("behaviors", &self.inner.behaviors)
            .finish_non_exhaustive()
    }
}
