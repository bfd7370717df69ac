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

use std::time::Duration;

use tandem::prelude::*;
use tandem_test::prelude::*;

use crate::setup::*;

mod setup;

const STARTUP_LINES: [&str; 4] = [
    "Preparing the agents.",
    "Starting the agents with:",
    "behaviour: to generate random 2-word messages.",
    "handler: to filter messages for the keyword 'hello' and then print its content.",
];

/// Running the duet wires the pair, starts it and flips the controls.
#[tandem_test(timeout_ms = 5000)]
async fn test_run_and_stop() -> anyhow::Result<()> {
    initialize_tracing();
    let runtime = TandemApp::launch_with_config(fast_config(20));
    let duet = Duet::with_sampler(&runtime, ScriptedSampler::new(&[&["hello", "sun"]]))?;
    assert_eq!(duet.controls(), Controls::default());
    assert!(duet.alpha().name().starts_with("alpha"));
    assert!(duet.beta().name().starts_with("beta"));

    duet.run().await?;
    assert_eq!(
        duet.controls(),
        Controls {
            start_enabled: false,
            stop_enabled: true
        }
    );
    assert_eq!(duet.alpha().state(), AgentState::Running);
    assert!(duet.alpha().outbox().same_as(&duet.beta().inbox()));
    assert!(duet.beta().outbox().same_as(&duet.alpha().inbox()));

    assert!(eventually(Duration::from_secs(2), || duet.log().len() >= 6).await);
    let recorded = texts(&duet.sink());
    assert_eq!(recorded[..4], STARTUP_LINES);
    assert!(recorded[4..]
        .iter()
        .all(|text| text.as_str() == "Received message: [custom] hello sun"));
    assert!(duet.log()[0].ends_with(" - Preparing the agents."));

    let reports = duet.stop().await;
    assert_eq!(reports.len(), 4);
    assert!(reports.iter().all(|report| report.outcome.is_cancelled()));
    assert!(duet.log().is_empty());
    assert_eq!(duet.controls(), Controls::default());
    assert_eq!(duet.beta().state(), AgentState::Stopped);
    Ok(())
}

/// Run is refused while running; stop is a no-op while stopped.
#[tandem_test(timeout_ms = 5000)]
async fn test_controls_guard_transitions() -> anyhow::Result<()> {
    initialize_tracing();
    let runtime = TandemApp::launch_with_config(fast_config(50));
    let duet = Duet::new(&runtime)?;

    assert!(duet.stop().await.is_empty());

    duet.run().await?;
    assert!(matches!(duet.run().await, Err(AgentError::InvalidTransition { .. })));
    assert_eq!(duet.stop().await.len(), 4);
    assert!(duet.stop().await.is_empty());

    duet.run().await?;
    assert_eq!(duet.alpha().state(), AgentState::Running);
    assert_eq!(texts(&duet.sink())[0], STARTUP_LINES[0]);

    let report = runtime.shutdown_all().await;
    assert!(report.is_clean());
    Ok(())
}

/// If one agent is already active, run starts neither and leaves the controls usable.
#[tandem_test(timeout_ms = 5000)]
async fn test_run_starts_both_or_neither() -> anyhow::Result<()> {
    initialize_tracing();
    let runtime = TandemApp::launch_with_config(fast_config(50));
    let duet = Duet::new(&runtime)?;
    runtime.start(duet.beta())?;

    let refused = duet.run().await;
    assert!(matches!(
        refused,
        Err(AgentError::InvalidTransition {
            from: AgentState::Running,
            ..
        })
    ));
    assert_eq!(duet.alpha().state(), AgentState::Unwired);
    assert_eq!(duet.controls(), Controls::default());
    assert!(duet.stop().await.is_empty());

    runtime.stop(duet.beta()).await;
    duet.run().await?;
    assert_eq!(duet.alpha().state(), AgentState::Running);
    assert_eq!(duet.beta().state(), AgentState::Running);
    assert_eq!(duet.stop().await.len(), 4);
    assert_eq!(duet.alpha().state(), AgentState::Stopped);
    Ok(())
}

/// Two overlapping stop requests stop the pair once.
#[tandem_test(timeout_ms = 5000)]
async fn test_concurrent_stops_stop_once() -> anyhow::Result<()> {
    initialize_tracing();
    let runtime = TandemApp::launch_with_config(fast_config(50));
    let duet = Duet::new(&runtime)?;
    duet.run().await?;

    let (first, second) = tokio::join!(duet.stop(), duet.stop());
    assert_eq!(first.len() + second.len(), 4);
    assert!(first.is_empty() || second.is_empty());
    assert_eq!(duet.controls(), Controls::default());
    Ok(())
}

/// Unmarked chatter never reaches the log.
#[tandem_test(timeout_ms = 5000)]
async fn test_unmarked_chatter_is_silent() -> anyhow::Result<()> {
    initialize_tracing();
    let runtime = TandemApp::launch_with_config(fast_config(10));
    let duet = Duet::with_sampler(&runtime, ScriptedSampler::new(&[&["moon", "sky"]]))?;
    duet.run().await?;

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(duet.log().len(), STARTUP_LINES.len());
    assert!(duet.sink().lines().iter().all(|line| !line.contains("Received")));

    duet.stop().await;
    Ok(())
}

/// Controls serialize with camel-cased field names.
#[test]
fn test_controls_serialization() {
    let rendered = toml::to_string(&Controls::default()).expect("serializable");
    assert!(rendered.contains("startEnabled = true"));
    assert!(rendered.contains("stopEnabled = false"));
}
