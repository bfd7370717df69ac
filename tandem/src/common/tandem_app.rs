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

use tracing::trace;

use crate::common::{AgentRuntime, TandemConfig};

/// Represents the entry point for initializing the Tandem runtime.
///
/// ```rust,ignore
/// use tandem::prelude::*;
///
/// #[tandem_main]
/// async fn main() -> anyhow::Result<()> {
///     let runtime = TandemApp::launch();
///     let agent = runtime.new_agent("worker")?;
///     runtime.start(&agent)?;
///     // ...
///     runtime.shutdown_all().await;
///     Ok(())
/// }
/// ```
#[derive(Default, Debug, Clone, Copy)]
pub struct TandemApp;

impl TandemApp {
    /// Initializes a runtime with the configuration found by [`TandemConfig::load`].
    #[must_use]
    pub fn launch() -> AgentRuntime {
        Self::launch_with_config(TandemConfig::load())
    }

    /// Initializes a runtime with an explicit configuration.
    #[must_use]
    pub fn launch_with_config(config: TandemConfig) -> AgentRuntime {
        trace!(?config, "launching runtime");
        AgentRuntime::new(config)
    }
}
