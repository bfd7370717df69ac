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

use serde::{Deserialize, Serialize};

use crate::message::MessageType;

/// A message exchanged between agents.
///
/// A message pairs a [`MessageType`] discriminator with its content. It is
/// immutable once built and has no identity beyond structural equality. A
/// message is consumed at most once: the receiving agent's consume loop takes
/// it out of the inbox and hands it, by value, to the matching handler.
///
/// Serialized, the discriminator field is named `type`:
///
/// ```text
/// { "type": "custom", "content": "hello world" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    kind: MessageType,
    content: String,
}

impl Message {
    /// Creates a message of the given type.
    #[must_use]
    pub fn new(kind: impl Into<MessageType>, content: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            content: content.into(),
        }
    }

    /// Returns the discriminator used for handler lookup.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> &MessageType {
        &self.kind
    }

    /// Returns the message content.
    #[inline]
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.content)
    }
}
