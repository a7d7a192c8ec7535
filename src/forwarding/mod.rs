// Deltanet: Geometric Analysis of Network Forwarding and ACLs
// Copyright (C) 2026  Deltanet Developers
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! # The edge-labelled forwarding graph
//!
//! [`ForwardingGraph`] is the orchestrator of one analysis: it builds the extended graph from
//! the device set, turns every FIB entry and ACL line into a prioritized rule, inserts the
//! rules through the equivalence-class refinement algorithm, and answers reachability queries
//! over the result.
//!
//! Construction is sequential by design: every insertion reads and refines the shared partition,
//! and later insertions depend on the exact classes earlier ones produced. The rule list is
//! shuffled once with an injected seed before insertion, purely for KD-tree balance, and the
//! shuffle is deterministic so that two runs over the same input produce identical alpha-index
//! assignments.
//! Once built, the structure is immutable and queries only read it.

mod rule;
mod search;
pub(crate) mod table;

pub use rule::Rule;

use crate::error::Error;
use crate::geometry::{full_space, GeometricSpace, FIELD_DST_IP};
use crate::graph::{AclLinks, BuildError, GraphModel, NodeId};
use crate::model::{AclAction, Endpoint, Fib, FibEntry, Flow, Network};
use crate::query::{
    ActionFlags, FlowDisposition, Hop, ReachabilityAnswer, ReachabilityQuery,
};
use log::*;
use rand::prelude::*;
use search::Path;
use std::collections::HashSet;
use std::time::Instant;
use table::EcTable;

/// Seed of the deterministic rule shuffle used when none is injected explicitly.
pub const DEFAULT_SEED: u64 = 7;

/// An edge-labelled graph capturing the forwarding behavior of all packets.
///
/// Packets are sliced into equivalence classes that get refined as forwarding and ACL rules are
/// inserted. ACL entries are just forwarding rules that either forward to the special drop node
/// or onward toward the neighbor, which makes determining the cause of a packet drop a plain
/// graph question.
#[derive(Debug)]
pub struct ForwardingGraph {
    model: GraphModel,
    table: EcTable,
}

impl ForwardingGraph {
    /// Build the labelled graph from a device set and its computed FIB, using the default
    /// shuffle seed.
    pub fn new(net: &Network, fib: &Fib) -> Result<Self, Error> {
        Self::with_seed(net, fib, DEFAULT_SEED)
    }

    /// Build the labelled graph with an explicit shuffle seed. The seed only affects KD-tree
    /// balance; the resulting labels are semantically identical for every seed, and two builds
    /// with equal input and equal seed are bit-identical.
    pub fn with_seed(net: &Network, fib: &Fib, seed: u64) -> Result<Self, Error> {
        let start = Instant::now();
        let model = GraphModel::build(net)?;
        let mut table = EcTable::new(model.num_links());

        let mut rules = Vec::new();
        for (device, entries) in fib.devices() {
            let source = model
                .node_map
                .get(device)
                .copied()
                .ok_or_else(|| BuildError::UnknownDevice { device: device.clone() })?;
            for entry in entries {
                rules.push(Self::fib_rule(&model, device, source, entry)?);
            }
        }
        for &checkpoint in model.acl_map.values() {
            Self::acl_rules(&model, checkpoint, &mut rules);
        }

        // Deterministically shuffle the input to get a better balanced KD tree
        let mut rng = StdRng::seed_from_u64(seed);
        rules.shuffle(&mut rng);

        let num_rules = rules.len();
        for rule in rules {
            table.insert_rule(rule)?;
        }

        info!(
            "labelled graph built in {:?}: {} rules, {} equivalence classes",
            start.elapsed(),
            num_rules,
            table.num_classes()
        );
        Ok(Self { model, table })
    }

    /// Create a rule from a FIB entry: the link is the first hop out of the egress interface,
    /// and the priority is the prefix length.
    fn fib_rule(
        model: &GraphModel,
        device: &str,
        source: NodeId,
        entry: &FibEntry,
    ) -> Result<Rule, BuildError> {
        let link = model
            .link_map
            .get(&Endpoint::new(device, &entry.iface))
            .copied()
            .ok_or_else(|| BuildError::UnknownFibInterface {
                device: device.to_string(),
                iface: entry.iface.clone(),
            })?;
        let mut rect = full_space();
        let mut lo = *rect.low();
        let mut hi = *rect.high();
        let (start, end) = entry.prefix.range();
        lo[FIELD_DST_IP] = start;
        hi[FIELD_DST_IP] = end;
        rect.set_bounds(lo, hi);
        Ok(Rule::new(link, source, rect, entry.prefix.prefix_len() as u32))
    }

    /// Create the rules of one ACL checkpoint: one rule per rectangle per line, earlier lines
    /// outranking later ones, plus the trailing priority-0 implicit deny covering everything.
    fn acl_rules(model: &GraphModel, checkpoint: NodeId, rules: &mut Vec<Rule>) {
        let AclLinks { deny, permit } = model.acl_links[&checkpoint];
        let acl = model.graph[checkpoint].acl().unwrap();
        let count = acl.lines.len();
        for (pos, line) in acl.lines.iter().enumerate() {
            let priority = (count - pos) as u32;
            let link = match line.action {
                AclAction::Deny => deny,
                AclAction::Permit => match permit {
                    Some(link) => link,
                    None => {
                        // no chain ever enters this checkpoint, so permitted packets have
                        // nowhere to go; only its deny rules remain meaningful
                        warn!(
                            "checkpoint {} has no onward link, skipping permit line {}",
                            model.graph[checkpoint].name(),
                            line.name
                        );
                        continue;
                    }
                },
            };
            let space = GeometricSpace::from_acl(line);
            for rect in space.rectangles() {
                rules.push(Rule::new(link, checkpoint, rect.clone(), priority));
            }
        }
        rules.push(Rule::new(deny, checkpoint, full_space(), 0));
    }

    /// Answer a reachability query with one witness, or `None` when no equivalence class
    /// realizes any requested outcome ("no witness").
    ///
    /// Candidate classes are evaluated sequentially in discovery order. Queries only read the
    /// finished table, so evaluating classes in parallel would be sound, but a fixed sequential
    /// order keeps the reported witness reproducible.
    pub fn reachable(&self, query: &ReachabilityQuery) -> Option<ReachabilityAnswer> {
        let start = Instant::now();
        let flags = ActionFlags::from_actions(&query.actions);

        // unknown node names contribute nothing
        let sources: Vec<NodeId> =
            query.sources.iter().filter_map(|name| self.model.device_node(name)).collect();
        let sinks: HashSet<NodeId> =
            query.destinations.iter().filter_map(|name| self.model.device_node(name)).collect();
        if sources.is_empty() {
            debug!("query names no known source node: no witness");
            return None;
        }

        // pick out the relevant equivalence classes
        let space = GeometricSpace::from_header_space(&query.headers);
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for rect in space.rectangles() {
            for alpha in self.table.overlapping_classes(rect) {
                if seen.insert(alpha) {
                    if let Some(overlap) = rect.overlap(self.table.class(alpha)) {
                        candidates.push((alpha, overlap));
                    }
                }
            }
        }

        // check each class in turn; the first witness found is the answer
        for (alpha, overlap) in candidates {
            if let Some((path, disposition)) =
                search::search_class(&self.model, &self.table, alpha, &flags, &sources, &sinks)
            {
                debug!("query answered in {:?}: {}", start.elapsed(), disposition);
                let flow = GeometricSpace::example(&overlap);
                return Some(self.answer(path, disposition, flow));
            }
        }
        debug!(
            "query exhausted {} candidate classes in {:?}: no witness",
            seen.len(),
            start.elapsed()
        );
        None
    }

    /// Number of equivalence classes the inserted rules produced.
    pub fn num_classes(&self) -> usize {
        self.table.num_classes()
    }

    /// The underlying extended graph model.
    pub fn graph_model(&self) -> &GraphModel {
        &self.model
    }

    #[cfg(test)]
    pub(crate) fn table(&self) -> &EcTable {
        &self.table
    }

    /// Render a witness path into the answer handed to the caller.
    fn answer(&self, path: Path, disposition: FlowDisposition, flow: Flow) -> ReachabilityAnswer {
        let graph = &self.model.graph;
        let hops = path
            .links
            .iter()
            .map(|&link| {
                let (src, dst) = graph.edge_endpoints(link).unwrap();
                Hop {
                    node: graph[src].name().to_string(),
                    iface: graph[link].src_iface.clone(),
                    peer: graph[dst].name().to_string(),
                    peer_iface: graph[link].dst_iface.clone(),
                }
            })
            .collect();

        let note = match disposition {
            FlowDisposition::DeniedIn | FlowDisposition::DeniedOut => path
                .links
                .last()
                .map(|&link| graph.edge_endpoints(link).unwrap().0)
                .and_then(|checkpoint| graph[checkpoint].acl())
                .map(|acl| match acl.matched_line(&flow) {
                    Some(line) => format!("{}:{}", acl.name, line.name),
                    None => format!("{}:default deny", acl.name),
                }),
            _ => None,
        };

        ReachabilityAnswer {
            disposition,
            flow,
            src_node: graph[path.source].name().to_string(),
            dst_node: graph[path.destination].name().to_string(),
            hops,
            note,
        }
    }
}
