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

use std::collections::HashMap;
use std::fmt;

use acton_ern::Ern;
use tracing::debug;

use crate::agent::Agent;

/// A directed edge: `from`'s outbox delivers into `to`'s inbox.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    /// The emitting agent.
    pub from: Ern,
    /// The receiving agent.
    pub to: Ern,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from.root, self.to.root)
    }
}

/// The communication graph between agents, owned by the host.
///
/// Every agent has at most one outgoing edge, since it has one outbox.
/// Each change updates the agent's outbox and is logged, so the graph here
/// always matches where agents actually emit.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    edges: HashMap<Ern, Ern>,
}

impl Topology {
    /// Creates an empty topology.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Points `from`'s outbox at `to`'s inbox.
    ///
    /// Returns the previous target of `from`, if it had one.
    pub fn connect(&mut self, from: &Agent, to: &Agent) -> Option<Ern> {
        from.set_outbox(to.inbox());
        let previous = self.edges.insert(from.id().clone(), to.id().clone());
        debug!(from = %from.name(), to = %to.name(), replaced = previous.is_some(), "connected");
        previous
    }

    /// Connects `a` to `b` and `b` to `a`.
    pub fn connect_bidirectional(&mut self, a: &Agent, b: &Agent) {
        self.connect(a, b);
        self.connect(b, a);
    }

    /// Restores `from`'s private outbox and forgets its edge.
    ///
    /// Returns the target it was connected to, if any.
    pub fn disconnect(&mut self, from: &Agent) -> Option<Ern> {
        from.reset_outbox();
        let previous = self.edges.remove(from.id());
        debug!(from = %from.name(), was_connected = previous.is_some(), "disconnected");
        previous
    }

    /// Returns the agent `from` currently emits to.
    #[must_use]
    pub fn target_of(&self, from: &Ern) -> Option<&Ern> {
        self.edges.get(from)
    }

    /// Returns every edge.
    #[must_use]
    pub fn edges(&self) -> Vec<Edge> {
        self.edges
            .iter()
            .map(|(from, to)| Edge {
                from: from.clone(),
                to: to.clone(),
            })
            .collect()
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if no agent is connected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;

    #[test]
    fn connect_records_edge_and_wires_outbox() {
        let a = Agent::with_name("a").unwrap();
        let b = Agent::with_name("b").unwrap();
        let mut topology = Topology::new();

        assert_eq!(topology.connect(&a, &b), None);
        assert_eq!(topology.target_of(a.id()), Some(b.id()));
        assert!(a.outbox().same_as(&b.inbox()));
        assert_eq!(topology.len(), 1);
    }

    #[test]
    fn reconnecting_replaces_the_edge() {
        let a = Agent::with_name("a").unwrap();
        let b = Agent::with_name("b").unwrap();
        let c = Agent::with_name("c").unwrap();
        let mut topology = Topology::new();

        topology.connect(&a, &b);
        assert_eq!(topology.connect(&a, &c).as_ref(), Some(b.id()));
        assert_eq!(topology.len(), 1);

        a.emit(Message::new("custom", "to c"));
        assert!(b.inbox().is_empty());
        assert_eq!(c.inbox().len(), 1);
    }

    #[test]
    fn bidirectional_makes_two_edges() {
        let a = Agent::with_name("a").unwrap();
        let b = Agent::with_name("b").unwrap();
        let mut topology = Topology::new();

        topology.connect_bidirectional(&a, &b);
        let mut edges: Vec<_> = topology.edges().into_iter().map(|e| e.to_string()).collect();
        edges.sort();
        assert_eq!(edges.len(), 2);
        assert!(a.outbox().same_as(&b.inbox()));
        assert!(b.outbox().same_as(&a.inbox()));
    }

    #[test]
    fn disconnect_restores_the_private_outbox() {
        let a = Agent::with_name("a").unwrap();
        let b = Agent::with_name("b").unwrap();
        let mut topology = Topology::new();

        topology.connect(&a, &b);
        assert_eq!(topology.disconnect(&a).as_ref(), Some(b.id()));
        assert!(topology.is_empty());
        assert!(!a.is_wired());
        assert_eq!(topology.disconnect(&a), None);
    }
}
