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

//! Two chatter agents talking to each other.
//!
//! ```text
//! cargo run --example duet          # until Ctrl-C
//! cargo run --example duet -- 10    # for ten seconds
//! ```
//!
//! Settings are read from `$XDG_CONFIG_HOME/tandem/config.toml`; `RUST_LOG`
//! overrides the configured tracing level.

use std::time::Duration;

use anyhow::Context;
use tandem::prelude::*;
use tracing_subscriber::EnvFilter;

#[tandem_main]
async fn main() -> anyhow::Result<()> {
    let config = TandemConfig::load();
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.tracing.level))
        .context("invalid tracing level in configuration")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let seconds = std::env::args()
        .nth(1)
        .map(|arg| arg.parse::<u64>())
        .transpose()
        .context("the optional argument is a number of seconds")?;

    let runtime = TandemApp::launch_with_config(config);
    let duet = Duet::new(&runtime)?;
    duet.run().await?;
    println!("{}", describe(&duet.controls()));
    for line in duet.log() {
        println!("{line}");
    }

    match seconds {
        Some(seconds) => ::tokio::time::sleep(Duration::from_secs(seconds)).await,
        None => ::tokio::signal::ctrl_c().await?,
    }

    println!("--- log ---");
    for line in duet.log() {
        println!("{line}");
    }

    for report in duet.stop().await {
        println!("{report}");
    }
    let shutdown = runtime.shutdown_all().await;
    if !shutdown.is_clean() {
        for failure in shutdown.failures() {
            eprintln!("{failure}");
        }
    }
    Ok(())
}

fn describe(controls: &Controls) -> String {
    format!(
        "controls: start_enabled={} stop_enabled={}",
        controls.start_enabled, controls.stop_enabled
    )
}
