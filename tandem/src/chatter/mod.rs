//! A concrete agent policy that exercises the framework end to end.
//!
//! A chatter agent handles `custom` messages by recording those that contain
//! a marker word, and on every behavior tick emits a message made of words
//! sampled from a small vocabulary.

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

pub use chatter_agent::Chatter;
pub use word_sampler::{RandomSampler, SeededSampler, WordSampler};

/// Defines [`Chatter`].
mod chatter_agent;
/// Defines the word sampling strategies.
mod word_sampler;
