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
#![allow(dead_code)]

use std::sync::{Arc, Once};
use std::time::Duration;

use parking_lot::Mutex;
use tandem::prelude::*;
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

// Ensures tracing initialization happens only once across all tests.
static INIT: Once = Once::new();

/// Initializes the global tracing subscriber for tests.
///
/// Everything is written to `logs/tandem_tests.txt`; `std::sync::Once` keeps
/// repeated calls from different tests harmless.
pub fn initialize_tracing() {
    INIT.call_once(|| {
        std::fs::create_dir_all("logs").expect("could not create logs dir");

        let file_appender = RollingFileAppender::new(Rotation::NEVER, "logs", "tandem_tests.txt");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        // Leak the guard so the non-blocking writer is not dropped before process exit
        Box::leak(Box::new(guard));

        let filter = EnvFilter::new("trace")
            .add_directive("tandem=trace".parse().unwrap())
            .add_directive("tokio=info".parse().unwrap())
            .add_directive(tracing_subscriber::filter::LevelFilter::TRACE.into());

        let subscriber = FmtSubscriber::builder()
            .with_span_events(FmtSpan::NONE)
            .with_max_level(Level::TRACE)
            .compact()
            .with_line_number(true)
            .without_time()
            .with_target(true)
            .with_env_filter(filter)
            .with_writer(non_blocking)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .expect("setting default subscriber failed");
    });
}

/// A configuration with short intervals and deadlines, suited to tests.
pub fn fast_config(behavior_interval_ms: u64) -> TandemConfig {
    let mut config = TandemConfig::default();
    config.scheduling.behavior_interval_ms = behavior_interval_ms;
    config.timeouts.agent_shutdown_timeout_ms = 1_000;
    config.timeouts.system_shutdown_timeout_ms = 2_000;
    config
}

/// A shared, ordered record of what handlers and behaviors did.
pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

/// Waits until `condition` holds, polling every few milliseconds, for at most `limit`.
pub async fn eventually(limit: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + limit;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}

/// A sampler that returns scripted word lists in turn, repeating the last one.
#[derive(Debug)]
pub struct ScriptedSampler {
    script: Mutex<Vec<Vec<String>>>,
}

impl ScriptedSampler {
    pub fn new(script: &[&[&str]]) -> Arc<Self> {
        let mut script: Vec<Vec<String>> = script
            .iter()
            .map(|words| words.iter().map(ToString::to_string).collect())
            .collect();
        script.reverse();
        Arc::new(Self {
            script: Mutex::new(script),
        })
    }
}

impl WordSampler for ScriptedSampler {
    fn sample(&self, _vocabulary: &[String], amount: usize) -> Vec<String> {
        let mut script = self.script.lock();
        let words = if script.len() > 1 {
            script.pop().unwrap_or_default()
        } else {
            script.last().cloned().unwrap_or_default()
        };
        assert_eq!(words.len(), amount, "scripted sample has the wrong size");
        words
    }
}

/// Returns the recorded texts without their timestamps.
pub fn texts(sink: &MemorySink) -> Vec<String> {
    sink.entries().into_iter().map(|entry| entry.text).collect()
}
