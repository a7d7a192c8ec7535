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

#![deny(missing_docs, missing_debug_implementations)]

//! # Deltanet: Geometric Analysis of Network Forwarding and ACLs
//!
//! This is a library for answering reachability questions over a modeled network: "can a packet
//! matching header-space `H` travel from node-set `SRC` to node-set `DST`, and if not, why
//! (dropped by an ACL, no route, null-routed)?"
//!
//! The engine slices the space of all packet headers into a finite set of *equivalence classes*:
//! maximal regions of header space that behave identically with respect to every forwarding and
//! ACL rule inserted so far. Classes are represented as multidimensional hyperrectangles and get
//! refined (split) as rules are added. Every link of an extended forwarding graph is labelled
//! with the set of classes currently routed across it, so a reachability query reduces to a
//! breadth-first search per relevant class.
//!
//! ## Structure
//!
//! This library is structured in the following way:
//!
//! - **[`geometry`]**: Hyperrectangle arithmetic ([`HyperRectangle`](geometry::HyperRectangle)),
//!   conversion of ACL lines and header-space predicates into unions of rectangles
//!   ([`GeometricSpace`](geometry::GeometricSpace)), and a KD-tree spatial index
//!   ([`KdTree`](geometry::KdTree)) for overlap queries over the live classes.
//!
//! - **[`model`]**: The input surface produced by external collaborators: per-device
//!   configurations ([`Device`](model::Device), [`Acl`](model::Acl)), the network topology
//!   ([`Network`](model::Network)), the computed forwarding information base
//!   ([`Fib`](model::Fib)), header-space predicates ([`HeaderSpace`](model::HeaderSpace)), and
//!   concrete witness flows ([`Flow`](model::Flow)). Vendor-config parsing and FIB computation
//!   happen elsewhere; this crate only consumes their results.
//!
//! - **[`graph`]**: The extended forwarding graph. Nodes are devices, ACL checkpoints and a
//!   sentinel drop node; ACL checkpoints are spliced into the topology between a device and its
//!   peer so that every filter a packet must pass is an explicit, inspectable hop.
//!
//! - **[`forwarding`]**: The heart of the crate. [`ForwardingGraph`](forwarding::ForwardingGraph)
//!   builds the graph from the device set and FIB, inserts every forwarding and ACL rule through
//!   the equivalence-class refinement algorithm, and answers reachability queries.
//!
//! - **[`query`]**: Query and answer types: requested outcome flags
//!   ([`ForwardingAction`](query::ForwardingAction)), the resulting classification
//!   ([`FlowDisposition`](query::FlowDisposition)), and the witness path
//!   ([`ReachabilityAnswer`](query::ReachabilityAnswer)).
//!
//! - **[`example_networks`]**: Collection of prepared networks used to exercise the engine in
//!   tests and documentation.
//!
//! ## Usage
//!
//! ```
//! use deltanet::forwarding::ForwardingGraph;
//! use deltanet::query::{ForwardingAction, ReachabilityQuery};
//! use deltanet::model::HeaderSpace;
//! use deltanet::example_networks::SimpleNet;
//! use deltanet::Error;
//! use std::collections::BTreeSet;
//!
//! fn main() -> Result<(), Error> {
//!     // prepare the network and the FIB
//!     let (net, fib) = SimpleNet::build();
//!
//!     // build the edge-labelled forwarding graph
//!     let graph = ForwardingGraph::new(&net, &fib)?;
//!
//!     // ask whether r1 can reach r3 with any packet destined to 10.0.3.0/24
//!     let query = ReachabilityQuery {
//!         headers: HeaderSpace { dst_ips: vec!["10.0.3.0/24".parse().unwrap()], ..HeaderSpace::any() },
//!         actions: vec![ForwardingAction::Accept].into_iter().collect(),
//!         sources: vec!["r1".to_string()].into_iter().collect::<BTreeSet<_>>(),
//!         destinations: vec!["r3".to_string()].into_iter().collect::<BTreeSet<_>>(),
//!     };
//!
//!     if let Some(answer) = graph.reachable(&query) {
//!         println!("{}", answer);
//!     }
//!
//!     Ok(())
//! }
//! ```
// test modules
pub mod example_networks;
mod test;

mod error;
pub mod forwarding;
pub mod geometry;
pub mod graph;
pub mod model;
pub mod query;

pub use error::Error;
pub use forwarding::ForwardingGraph;
