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
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::common::{AgentError, BehaviorFn, FutureBox};

/// An ordered list of zero-argument async actions run once per tick.
///
/// Behaviors run in registration order, one at a time. There is no
/// deduplication and no removal.
#[derive(Default)]
pub struct BehaviorSet {
    behaviors: RwLock<Vec<BehaviorFn>>,
}

impl BehaviorSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a behavior.
    pub fn register<F, Fut>(&self, behavior: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let behavior: BehaviorFn = Arc::new(move || -> FutureBox { Box::pin(behavior()) });
        self.behaviors.write().push(behavior);
    }

    /// Returns the number of registered behaviors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.behaviors.read().len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.behaviors.read().is_empty()
    }

    /// Runs every behavior once, in order, each to completion.
    ///
    /// The list is read when the tick starts; behaviors registered during the
    /// tick first run on the next one.
    ///
    /// # Errors
    ///
    /// Stops at the first failing behavior and returns [`AgentError::Behavior`].
    pub async fn run_tick(&self) -> Result<(), AgentError> {
        let behaviors = self.behaviors.read().clone();
        for (index, behavior) in behaviors.iter().enumerate() {
            behavior()
                .await
                .map_err(|error| AgentError::Behavior {
                    index,
                    source: error.into(),
                })?;
        }
        Ok(())
    }

    /// Ticks, then sleeps for `interval`, forever.
    ///
    /// `cancellation` is honoured before a tick starts and during the sleep,
    /// never in the middle of a tick.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Cancelled`] once cancelled, or the first behavior failure.
    pub async fn run_forever(
        &self,
        interval: Duration,
        cancellation: &CancellationToken,
    ) -> Result<Infallible, AgentError> {
        loop {
            if cancellation.is_cancelled() {
                return Err(AgentError::Cancelled);
            }
            self.run_tick().await?;
            trace!(behaviors = self.len(), ?interval, "tick complete");
            tokio::select! {
                biased;
                () = cancellation.cancelled() => return Err(AgentError::Cancelled),
                () = tokio::time::sleep(interval) => {}
            }
        }
    }
}

impl fmt::Debug for BehaviorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorSet").field("len", &self.len()).finish()
    }
}
