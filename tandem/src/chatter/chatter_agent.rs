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

use tracing::trace;

use crate::agent::Agent;
use crate::chatter::{RandomSampler, WordSampler};
use crate::common::{ChatterConfig, ConfigError};
use crate::message::{Message, MessageType};
use crate::traits::EventSink;

/// The chatter policy: what a chatter agent says and what it reports hearing.
///
/// [`install`](Self::install) registers on an [`Agent`]:
///
/// *   a handler for [`MessageType::CUSTOM`] that records
///     `Received message: <message>` on the sink when the content contains the
///     marker, and otherwise does nothing;
/// *   a behavior that emits a `custom` message whose content is
///     `sample_size` distinct vocabulary words joined by single spaces.
#[derive(Debug, Clone)]
pub struct Chatter {
    config: Arc<ChatterConfig>,
    sampler: Arc<dyn WordSampler>,
    sink: Arc<dyn EventSink>,
}

impl Chatter {
    /// Creates a chatter that samples randomly and records to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the settings cannot produce a message.
    pub fn new(config: ChatterConfig, sink: Arc<dyn EventSink>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            sampler: Arc::new(RandomSampler),
            sink,
        })
    }

    /// Replaces the word sampler.
    #[must_use]
    pub fn with_sampler(mut self, sampler: Arc<dyn WordSampler>) -> Self {
        self.sampler = sampler;
        self
    }

    /// Returns the settings in use.
    #[must_use]
    pub fn config(&self) -> &ChatterConfig {
        &self.config
    }

    /// Builds the next outgoing message.
    #[must_use]
    pub fn compose_message(&self) -> Message {
        let words = self
            .sampler
            .sample(&self.config.vocabulary, self.config.sample_size);
        Message::new(MessageType::CUSTOM, words.join(" "))
    }

    /// Records `message` if its content contains the marker.
    ///
    /// Returns `true` when something was recorded.
    pub fn observe(&self, message: &Message) -> bool {
        if !message.content().contains(self.config.marker.as_str()) {
            return false;
        }
        self.sink.record(&format!("Received message: {message}"));
        true
    }

    /// Registers the chatter handler and behavior on `agent`.
    pub fn install(&self, agent: &Agent) {
        let listener = self.clone();
        agent.register_message_handler(MessageType::CUSTOM, move |message: Message| {
            let listener = listener.clone();
            async move {
                listener.observe(&message);
                Ok(())
            }
        });

        let speaker = self.clone();
        let weak = agent.downgrade();
        agent.register_behavior(move || {
            let speaker = speaker.clone();
            let weak = weak.clone();
            async move {
                if let Some(agent) = weak.upgrade() {
                    let message = speaker.compose_message();
                    trace!(agent = %agent.name(), content = message.content(), "chatter speaks");
                    agent.emit(message);
                }
                Ok(())
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::MemorySink;

    fn chatter(sink: &Arc<MemorySink>) -> Chatter {
        Chatter::new(ChatterConfig::default(), sink.clone()).unwrap()
    }

    #[test]
    fn composes_two_distinct_words() {
        let sink = Arc::new(MemorySink::new());
        let message = chatter(&sink).compose_message();
        assert_eq!(*message.kind(), MessageType::CUSTOM);
        let words: Vec<_> = message.content().split(' ').collect();
        assert_eq!(words.len(), 2);
        assert_ne!(words[0], words[1]);
    }

    #[test]
    fn records_only_marked_messages() {
        let sink = Arc::new(MemorySink::new());
        let chatter = chatter(&sink);

        assert!(!chatter.observe(&Message::new("custom", "sun moon")));
        assert!(sink.is_empty());

        assert!(chatter.observe(&Message::new("custom", "hello world")));
        let entries = sink.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "Received message: [custom] hello world");
    }

    #[test]
    fn rejects_invalid_settings() {
        let sink: Arc<dyn EventSink> = Arc::new(MemorySink::new());
        let config = ChatterConfig {
            sample_size: 0,
            ..ChatterConfig::default()
        };
        assert!(Chatter::new(config, sink).is_err());
    }

    #[tokio::test]
    async fn install_registers_one_handler_and_one_behavior() {
        let sink = Arc::new(MemorySink::new());
        let agent = Agent::with_name("chatty").unwrap();
        let peer = Agent::with_name("peer").unwrap();
        agent.set_outbox(peer.inbox());

        chatter(&sink).install(&agent);
        assert_eq!(agent.handler_count(), 1);
        assert_eq!(agent.behavior_count(), 1);

        agent.run_tick().await.unwrap();
        let sent = peer.inbox().try_get().unwrap();
        assert_eq!(sent.content().split(' ').count(), 2);

        agent.dispatch(Message::new("custom", "hello sky")).await.unwrap();
        assert_eq!(sink.len(), 1);
    }
}
