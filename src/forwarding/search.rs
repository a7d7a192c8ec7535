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

//! # Per-class reachability search
//!
//! Breadth-first search over the extended graph, restricted to the links labelled with one
//! equivalence class. The search stops at the first node realizing any of the query's requested
//! outcomes and reconstructs the witness path from its predecessor array. Paths are first-found,
//! not shortest; classes restrict link availability, so whichever satisfying node the BFS
//! reaches first wins.

use crate::forwarding::table::EcTable;
use crate::graph::{AclDirection, GraphModel, LinkId, NodeId, NULL_IFACE};
use crate::query::{ActionFlags, FlowDisposition};
use petgraph::visit::EdgeRef;
use std::collections::{HashSet, VecDeque};

/// A witness path: the links travelled, in order, plus the explicit end nodes (the link list is
/// empty when source and destination coincide).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Path {
    pub(crate) links: Vec<LinkId>,
    pub(crate) source: NodeId,
    pub(crate) destination: NodeId,
}

/// Check reachability of one equivalence class. Returns the first witness path realizing a
/// requested outcome, or `None` if the class realizes none of them.
pub(crate) fn search_class(
    model: &GraphModel,
    table: &EcTable,
    alpha: usize,
    flags: &ActionFlags,
    sources: &[NodeId],
    sinks: &HashSet<NodeId>,
) -> Option<(Path, FlowDisposition)> {
    let graph = &model.graph;
    let mut todo: VecDeque<NodeId> = sources.iter().copied().collect();
    let mut visited = vec![false; graph.node_count()];
    let mut predecessors: Vec<Option<LinkId>> = vec![None; graph.node_count()];

    while let Some(current) = todo.pop_front() {
        // packet accepted at a destination
        if flags.accept && sinks.contains(&current) {
            return Some((reconstruct(model, &predecessors, current, None), FlowDisposition::Accepted));
        }

        visited[current.index()] = true;
        let mut active_links = 0;
        for edge in graph.edges(current) {
            if !table.has_label(edge.id(), alpha) {
                continue;
            }
            active_links += 1;
            let neighbor = edge.target();
            // the packet is dropped here, figure out what went wrong
            if graph[neighbor].is_drop() {
                match graph[current].acl_direction() {
                    Some(AclDirection::In) if flags.acl_in || flags.acl => {
                        return Some((
                            reconstruct(model, &predecessors, current, Some(edge.id())),
                            FlowDisposition::DeniedIn,
                        ));
                    }
                    Some(AclDirection::Out) if flags.acl_out || flags.acl => {
                        return Some((
                            reconstruct(model, &predecessors, current, Some(edge.id())),
                            FlowDisposition::DeniedOut,
                        ));
                    }
                    _ => {}
                }
                if flags.null_route && graph[edge.id()].src_iface == NULL_IFACE {
                    return Some((
                        reconstruct(model, &predecessors, current, Some(edge.id())),
                        FlowDisposition::NullRouted,
                    ));
                }
            }
            if !visited[neighbor.index()] {
                predecessors[neighbor.index()] = Some(edge.id());
                todo.push_back(neighbor);
            }
        }
        // the node doesn't know how to forward the packet
        if active_links == 0 && (flags.no_route || flags.drop) {
            return Some((reconstruct(model, &predecessors, current, None), FlowDisposition::NoRoute));
        }
    }
    None
}

/// Walk the predecessor array back from `last` to a source. When the terminating hop into the
/// drop node is known (`drop_link`), it is appended so the path ends at the drop node itself.
fn reconstruct(
    model: &GraphModel,
    predecessors: &[Option<LinkId>],
    last: NodeId,
    drop_link: Option<LinkId>,
) -> Path {
    let graph = &model.graph;
    let mut links = Vec::new();
    let mut current = last;
    while let Some(link) = predecessors[current.index()] {
        links.push(link);
        current = graph.edge_endpoints(link).unwrap().0;
    }
    links.reverse();
    let mut destination = last;
    if let Some(link) = drop_link {
        links.push(link);
        destination = graph.edge_endpoints(link).unwrap().1;
    }
    Path { links, source: current, destination }
}
