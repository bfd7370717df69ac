//! Defines the message model and the mailbox that carries it between agents.
//!
//! # Key Components
//!
//! *   [`MessageType`]: The open discriminator used to route a message to a handler.
//! *   [`Message`]: An immutable record of a discriminator plus textual content.
//! *   [`Mailbox`]: An unbounded, order-preserving queue shared by reference. The same
//!     type serves as an agent's inbox and, once wired, as another agent's outbox.

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
pub use mailbox::Mailbox;
pub use message_type::MessageType;
pub use typed_message::Message;

// --- Submodules ---

/// Defines [`Mailbox`].
mod mailbox;
/// Defines [`MessageType`].
mod message_type;
/// Defines [`Message`].
mod typed_message;
