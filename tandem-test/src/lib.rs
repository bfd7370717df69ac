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

//! Test support for Tandem agents.
//!
//! Provides the [`tandem_test`] attribute, which runs an `async` test body on a
//! fresh current-thread Tokio runtime, fails the test when any task on that
//! runtime panics, and optionally fails it when the body hangs:
//!
//! ```ignore
//! use tandem_test::prelude::*;
//!
//! #[tandem_test(timeout_ms = 5000)]
//! async fn agents_talk() -> anyhow::Result<()> {
//!     Ok(())
//! }
//! ```

pub use tandem_test_macro::tandem_test;

/// Commonly used test items.
pub mod prelude {
    pub use tandem_test_macro::tandem_test;
}

/// Crates referenced by the code `tandem_test` expands to.
#[doc(hidden)]
pub mod __private {
    pub use parking_lot;
    pub use tokio;
    pub use tracing;
}
