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

//! # Extended forwarding graph
//!
//! Nodes are devices, ACL checkpoints, and one sentinel drop node. ACL checkpoints are spliced
//! into the topology between a device and its peer, so every filter a packet must pass is an
//! explicit graph hop: `device -> [outbound checkpoint] -> [inbound checkpoint] -> peer`. Every
//! checkpoint carries a deny link straight to the drop node, and every device carries a null
//! link to the drop node for null routes. Interfaces without a resolvable peer are wired to the
//! drop node as well.
//!
//! Node and link indices are dense and stable, which lets the search use plain arrays for
//! visited sets and predecessors, and lets the equivalence-class table keep one label bitset per
//! link index.

use crate::model::{Acl, Endpoint, Network};
use log::*;
use petgraph::graph::{EdgeIndex, Graph, NodeIndex};
use petgraph::Directed;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use thiserror::Error;

/// Dense identifier of a graph node
pub type NodeId = NodeIndex<u32>;
/// Dense identifier of a graph link
pub type LinkId = EdgeIndex<u32>;
/// The extended forwarding graph
pub type PacketGraph = Graph<GraphNode, GraphLink, Directed, u32>;

/// Interface name of null links: the hop label used when a packet is discarded by a null route
/// or leaves through an interface with no peer.
pub const NULL_IFACE: &str = "null_interface";
/// Name of the sentinel drop node
pub const DROP_NODE_NAME: &str = "(none)";
/// Hop label of a checkpoint's deny link. Distinct from [`NULL_IFACE`] so an ACL drop can never
/// be classified as a null route.
pub const DENY_LABEL: &str = "deny";

const ENTER_OUT: &str = "enter-outbound-acl";
const EXIT_OUT: &str = "exit-outbound-acl";
const ENTER_IN: &str = "enter-inbound-acl";
const EXIT_IN: &str = "exit-inbound-acl";

/// Direction of an ACL checkpoint relative to its device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AclDirection {
    /// The ACL filters packets entering the device
    In,
    /// The ACL filters packets leaving the device
    Out,
}

impl fmt::Display for AclDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::In => write!(f, "IN"),
            Self::Out => write!(f, "OUT"),
        }
    }
}

/// One node of the extended graph.
#[derive(Debug, Clone)]
pub enum GraphNode {
    /// A configured device
    Device {
        /// Hostname of the device
        name: String,
    },
    /// An ACL checkpoint, unique per (device, interface, direction, ACL)
    Acl {
        /// Unique checkpoint name
        name: String,
        /// Device the checkpoint belongs to
        device: String,
        /// Interface the ACL is attached to
        iface: String,
        /// Whether the checkpoint filters inbound or outbound traffic
        direction: AclDirection,
        /// The access list evaluated at this checkpoint
        acl: Acl,
    },
    /// The sentinel node all dropped packets are forwarded to
    Drop,
}

impl GraphNode {
    /// Printable name of the node.
    pub fn name(&self) -> &str {
        match self {
            Self::Device { name } => name,
            Self::Acl { name, .. } => name,
            Self::Drop => DROP_NODE_NAME,
        }
    }

    /// Returns true if this is the sentinel drop node.
    pub fn is_drop(&self) -> bool {
        matches!(self, Self::Drop)
    }

    /// The access list of a checkpoint node.
    pub fn acl(&self) -> Option<&Acl> {
        match self {
            Self::Acl { acl, .. } => Some(acl),
            _ => None,
        }
    }

    /// The direction of a checkpoint node.
    pub fn acl_direction(&self) -> Option<AclDirection> {
        match self {
            Self::Acl { direction, .. } => Some(*direction),
            _ => None,
        }
    }
}

/// One directed link of the extended graph, labelled with the hop names of both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphLink {
    /// Source-side interface or hop label
    pub src_iface: String,
    /// Target-side interface or hop label
    pub dst_iface: String,
}

impl GraphLink {
    fn new(src_iface: &str, dst_iface: &str) -> Self {
        Self { src_iface: src_iface.to_string(), dst_iface: dst_iface.to_string() }
    }
}

/// The two outgoing links of an ACL checkpoint.
#[derive(Debug, Clone, Copy)]
pub struct AclLinks {
    /// Link to the drop node, taken by denied packets
    pub deny: LinkId,
    /// Link onward to the next hop, taken by permitted packets. `None` if no chain ever enters
    /// this checkpoint, in which case its permit lines are unreachable.
    pub permit: Option<LinkId>,
}

/// Graph build errors: structural inconsistencies between the device set, topology and FIB.
#[derive(Error, Debug, PartialEq)]
pub enum BuildError {
    /// An interface references an ACL name its device does not define
    #[error("interface {device}[{iface}] references undefined ACL {acl}")]
    UndefinedAcl {
        /// Device with the dangling reference
        device: String,
        /// Interface carrying the filter
        iface: String,
        /// The undefined ACL name
        acl: String,
    },
    /// The FIB contains entries for a device absent from the network
    #[error("FIB references unknown device {device}")]
    UnknownDevice {
        /// The unknown hostname
        device: String,
    },
    /// A FIB entry names an egress interface its device does not have
    #[error("FIB entry on {device} references unknown interface {iface}")]
    UnknownFibInterface {
        /// Device the entry belongs to
        device: String,
        /// The unknown interface name
        iface: String,
    },
}

/// The assembled graph with its lookup tables.
#[derive(Debug, Clone)]
pub struct GraphModel {
    pub(crate) graph: PacketGraph,
    pub(crate) drop_node: NodeId,
    /// Device hostname to node
    pub(crate) node_map: BTreeMap<String, NodeId>,
    /// Checkpoint name to node
    pub(crate) acl_map: BTreeMap<String, NodeId>,
    /// (device, interface) to the first link of its chain; `(device, null_interface)` maps to
    /// the device's null link
    pub(crate) link_map: BTreeMap<Endpoint, LinkId>,
    /// Outgoing deny/permit links per checkpoint node
    pub(crate) acl_links: HashMap<NodeId, AclLinks>,
}

impl GraphModel {
    /// Build the extended graph from the device set and topology.
    pub fn build(net: &Network) -> Result<Self, BuildError> {
        let mut graph = PacketGraph::default();
        let mut node_map = BTreeMap::new();
        let mut acl_map = BTreeMap::new();

        let drop_node = graph.add_node(GraphNode::Drop);

        // device and checkpoint nodes
        for device in net.devices() {
            let node = graph.add_node(GraphNode::Device { name: device.hostname.clone() });
            node_map.insert(device.hostname.clone(), node);
            for iface in device.interfaces.values() {
                for &direction in &[AclDirection::Out, AclDirection::In] {
                    let filter = match direction {
                        AclDirection::Out => &iface.outgoing_filter,
                        AclDirection::In => &iface.incoming_filter,
                    };
                    if let Some(acl_name) = filter {
                        let acl = device.acls.get(acl_name).ok_or_else(|| {
                            BuildError::UndefinedAcl {
                                device: device.hostname.clone(),
                                iface: iface.name.clone(),
                                acl: acl_name.clone(),
                            }
                        })?;
                        let name =
                            checkpoint_name(&device.hostname, &iface.name, direction, acl_name);
                        let node = graph.add_node(GraphNode::Acl {
                            name: name.clone(),
                            device: device.hostname.clone(),
                            iface: iface.name.clone(),
                            direction,
                            acl: acl.clone(),
                        });
                        acl_map.insert(name, node);
                    }
                }
            }
        }

        // the first adjacency per sending endpoint wins; interfaces without one point at drop
        let mut edge_map: BTreeMap<Endpoint, Endpoint> = BTreeMap::new();
        for adj in net.adjacencies() {
            edge_map.entry(adj.from.clone()).or_insert_with(|| adj.to.clone());
        }
        for device in net.devices() {
            for iface in device.interfaces.values() {
                edge_map
                    .entry(Endpoint::new(&device.hostname, &iface.name))
                    .or_insert_with(|| Endpoint::new(DROP_NODE_NAME, NULL_IFACE));
            }
        }

        // deny links of every checkpoint
        let mut acl_links: HashMap<NodeId, AclLinks> = HashMap::new();
        for &node in acl_map.values() {
            let deny = graph.add_edge(node, drop_node, GraphLink::new(DENY_LABEL, DENY_LABEL));
            acl_links.insert(node, AclLinks { deny, permit: None });
        }

        // one null link per device, for null routes
        let mut link_map: BTreeMap<Endpoint, LinkId> = BTreeMap::new();
        for device in net.devices() {
            let src = node_map[&device.hostname];
            let link = graph.add_edge(src, drop_node, GraphLink::new(NULL_IFACE, NULL_IFACE));
            link_map.insert(Endpoint::new(&device.hostname, NULL_IFACE), link);
        }

        // splice the chains
        for (from, to) in edge_map.iter() {
            let src = match node_map.get(&from.device) {
                Some(src) => *src,
                None => continue,
            };
            let out_cp = net
                .device(&from.device)
                .and_then(|d| d.interfaces.get(&from.iface))
                .and_then(|i| i.outgoing_filter.as_ref())
                .map(|acl| acl_map[&checkpoint_name(&from.device, &from.iface, AclDirection::Out, acl)]);

            // an unresolvable peer device or interface means "no peer": wire to drop
            let resolved = net
                .device(&to.device)
                .and_then(|d| d.interfaces.get(&to.iface))
                .map(|iface| (node_map[&to.device], iface));
            let (peer, dst_iface, in_cp) = match resolved {
                Some((peer, iface)) => {
                    let in_cp = iface.incoming_filter.as_ref().map(|acl| {
                        acl_map[&checkpoint_name(&to.device, &to.iface, AclDirection::In, acl)]
                    });
                    (peer, to.iface.as_str(), in_cp)
                }
                None => (drop_node, NULL_IFACE, None),
            };

            match (out_cp, in_cp) {
                (Some(ocp), Some(icp)) => {
                    let l1 = graph.add_edge(src, ocp, GraphLink::new(&from.iface, ENTER_OUT));
                    link_map.insert(from.clone(), l1);
                    let l2 = graph.add_edge(ocp, icp, GraphLink::new(EXIT_OUT, ENTER_IN));
                    acl_links.get_mut(&ocp).unwrap().permit = Some(l2);
                    Self::ensure_permit(&mut graph, &mut acl_links, icp, peer, dst_iface);
                }
                (Some(ocp), None) => {
                    let l1 = graph.add_edge(src, ocp, GraphLink::new(&from.iface, ENTER_OUT));
                    link_map.insert(from.clone(), l1);
                    let l2 = graph.add_edge(ocp, peer, GraphLink::new(EXIT_OUT, dst_iface));
                    acl_links.get_mut(&ocp).unwrap().permit = Some(l2);
                }
                (None, Some(icp)) => {
                    let l1 = graph.add_edge(src, icp, GraphLink::new(&from.iface, ENTER_IN));
                    link_map.insert(from.clone(), l1);
                    Self::ensure_permit(&mut graph, &mut acl_links, icp, peer, dst_iface);
                }
                (None, None) => {
                    let link = graph.add_edge(src, peer, GraphLink::new(&from.iface, dst_iface));
                    link_map.insert(from.clone(), link);
                }
            }
        }

        debug!(
            "extended graph: {} nodes ({} devices, {} checkpoints), {} links",
            graph.node_count(),
            node_map.len(),
            acl_map.len(),
            graph.edge_count()
        );

        Ok(Self { graph, drop_node, node_map, acl_map, link_map, acl_links })
    }

    /// Create an inbound checkpoint's permit link on the first chain passing through it; later
    /// chains into the same checkpoint reuse it.
    fn ensure_permit(
        graph: &mut PacketGraph,
        acl_links: &mut HashMap<NodeId, AclLinks>,
        checkpoint: NodeId,
        peer: NodeId,
        dst_iface: &str,
    ) {
        let links = acl_links.get_mut(&checkpoint).unwrap();
        if links.permit.is_none() {
            links.permit = Some(graph.add_edge(checkpoint, peer, GraphLink::new(EXIT_IN, dst_iface)));
        }
    }

    /// The underlying graph.
    pub fn graph(&self) -> &PacketGraph {
        &self.graph
    }

    /// The sentinel drop node.
    pub fn drop_node(&self) -> NodeId {
        self.drop_node
    }

    /// Look up a device node by hostname.
    pub fn device_node(&self, hostname: &str) -> Option<NodeId> {
        self.node_map.get(hostname).copied()
    }

    /// Number of nodes, including checkpoints and the drop sentinel.
    pub fn num_nodes(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of links.
    pub fn num_links(&self) -> usize {
        self.graph.edge_count()
    }
}

/// Checkpoint names must be unique per (device, interface, direction, ACL) so that reusing the
/// same ACL on several interfaces cannot collide.
fn checkpoint_name(device: &str, iface: &str, direction: AclDirection, acl: &str) -> String {
    format!("ACL-{}-{}-{}-{}", direction, device, iface, acl)
}
