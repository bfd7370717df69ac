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

use std::fmt::Debug;
use std::sync::Arc;

/// A destination for events that agents want a host to see.
///
/// Handlers and behaviors call [`record`](EventSink::record) as their visible
/// side effect. The core itself never records anything; which sink an agent
/// writes to is decided by whoever installs its handlers.
pub trait EventSink: Send + Sync + Debug {
    /// Records one line of text.
    fn record(&self, text: &str);
}

impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn record(&self, text: &str) {
        (**self).record(text);
    }
}
