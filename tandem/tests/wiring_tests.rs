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

/// Once A's outbox is B's inbox, what A emits is exactly what B reads.
#[tandem_test]
async fn test_emit_reaches_the_wired_inbox() -> anyhow::Result<()> {
    initialize_tracing();
    let runtime = TandemApp::launch_with_config(fast_config(50));
    let a = runtime.new_agent("a")?;
    let b = runtime.new_agent("b")?;
    assert_eq!(runtime.connect(&a, &b)?, None);
    assert!(a.outbox().same_as(&b.inbox()));
    assert_eq!(a.state(), AgentState::Wired);

    a.emit(Message::new(MessageType::CUSTOM, "hello world"));

    let received = b.inbox().get().await;
    assert_eq!(*received.kind(), MessageType::CUSTOM);
    assert_eq!(received.content(), "hello world");
    assert!(b.inbox().is_empty());
    assert!(a.default_outbox().is_empty());
    Ok(())
}

/// An unwired agent's output lands in its private default outbox only.
#[tandem_test]
async fn test_unwired_outbox_is_inert() -> anyhow::Result<()> {
    initialize_tracing();
    let runtime = TandemApp::launch_with_config(fast_config(50));
    let loner = runtime.new_agent("loner")?;
    let bystander = runtime.new_agent("bystander")?;
    assert!(!loner.is_wired());

    loner.emit(Message::new(MessageType::CUSTOM, "anyone?"));

    assert_eq!(loner.default_outbox().len(), 1);
    assert!(loner.inbox().is_empty());
    assert!(bystander.inbox().is_empty());
    Ok(())
}

/// Bidirectional wiring makes each agent's outbox the other's inbox.
#[tandem_test]
async fn test_bidirectional_topology() -> anyhow::Result<()> {
    initialize_tracing();
    let runtime = TandemApp::launch_with_config(fast_config(50));
    let left = runtime.new_agent("left")?;
    let right = runtime.new_agent("right")?;
    runtime.connect_bidirectional(&left, &right)?;

    assert!(left.outbox().same_as(&right.inbox()));
    assert!(right.outbox().same_as(&left.inbox()));

    let topology = runtime.topology();
    assert_eq!(topology.len(), 2);
    assert_eq!(topology.target_of(left.id()), Some(right.id()));
    assert_eq!(topology.target_of(right.id()), Some(left.id()));

    assert_eq!(runtime.disconnect(&left)?, Some(right.id().clone()));
    assert!(left.outbox().same_as(&left.default_outbox()));
    assert_eq!(left.state(), AgentState::Unwired);
    assert_eq!(runtime.topology().len(), 1);
    Ok(())
}

/// Swapping the outbox of a running agent redirects its next emission.
#[tandem_test(timeout_ms = 5000)]
async fn test_rewire_while_running() -> anyhow::Result<()> {
    initialize_tracing();
    let runtime = TandemApp::launch_with_config(fast_config(20));
    let speaker = runtime.new_agent("speaker")?;
    let first = runtime.new_agent("first")?;
    let second = runtime.new_agent("second")?;

    let weak = speaker.downgrade();
    speaker.register_behavior(move || {
        let weak = weak.clone();
        async move {
            if let Some(agent) = weak.upgrade() {
                agent.emit(Message::new("tick", "beat"));
            }
            Ok(())
        }
    });

    runtime.connect(&speaker, &first)?;
    runtime.start(&speaker)?;
    assert!(eventually(Duration::from_secs(2), || !first.inbox().is_empty()).await);

    assert_eq!(runtime.connect(&speaker, &second)?, Some(first.id().clone()));
    assert_eq!(speaker.state(), AgentState::Running);
    let settled = first.inbox().len();
    assert!(eventually(Duration::from_secs(2), || !second.inbox().is_empty()).await);
    assert_eq!(first.inbox().len(), settled);

    let report = runtime.shutdown_all().await;
    assert!(report.is_clean());
    Ok(())
}

/// The runtime refuses to wire agents it did not create.
#[tandem_test]
async fn test_foreign_agent_is_rejected() -> anyhow::Result<()> {
    initialize_tracing();
    let runtime = TandemApp::launch_with_config(fast_config(50));
    let local = runtime.new_agent("local")?;
    let stranger = Agent::with_name("stranger")?;

    let error = runtime.connect(&local, &stranger).expect_err("stranger is unknown");
    assert!(matches!(error, AgentError::NotRegistered(_)));
    assert!(matches!(runtime.start(&stranger), Err(AgentError::NotRegistered(_))));
    assert!(runtime.topology().is_empty());
    assert!(!local.is_wired());
    Ok(())
}

/// Registered agents can be looked up by their id.
#[tandem_test]
async fn test_agents_are_registered_by_id() -> anyhow::Result<()> {
    initialize_tracing();
    let runtime = TandemApp::launch_with_config(fast_config(50));
    let agent = runtime.new_agent("findable")?;
    let anonymous = runtime.new_default_agent()?;

    assert_eq!(runtime.agent_count(), 2);
    let found = runtime.agent(agent.id()).expect("registered");
    assert_eq!(found.id(), agent.id());
    assert!(found.name().starts_with("findable"));
    assert!(runtime.agent(anonymous.id()).is_some());
    Ok(())
}
