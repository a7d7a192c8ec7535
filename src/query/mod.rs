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

//! # Reachability queries and answers
//!
//! A query names a header space, the outcomes the caller is interested in, and source and
//! destination node sets. The answer is one witness: a concrete flow, the path it takes, and
//! the disposition classifying what happens to it. A query that no equivalence class satisfies
//! yields no answer at all, which is indistinguishable from "definitely unreachable": the
//! correct semantics for a sound engine.

use crate::model::{Flow, HeaderSpace};
use itertools::Itertools;
use std::collections::BTreeSet;
use std::fmt;

/// Outcome a reachability query asks about. A query may request several at once; the search
/// stops at the first path realizing any requested outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ForwardingAction {
    /// The packet arrives at a destination node
    Accept,
    /// The packet is dropped anywhere, for any reason
    Drop,
    /// The packet is dropped by any ACL
    DropAcl,
    /// The packet is dropped by an inbound ACL
    DropAclIn,
    /// The packet is dropped by an outbound ACL
    DropAclOut,
    /// The packet is discarded by a null route
    DropNullRoute,
    /// The packet reaches a node with no route for it
    DropNoRoute,
}

/// Requested outcome flags, unpacked for the search loop.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionFlags {
    pub accept: bool,
    pub drop: bool,
    pub acl: bool,
    pub acl_in: bool,
    pub acl_out: bool,
    pub null_route: bool,
    pub no_route: bool,
}

impl ActionFlags {
    pub(crate) fn from_actions(actions: &BTreeSet<ForwardingAction>) -> Self {
        let mut flags = Self::default();
        for action in actions {
            match action {
                ForwardingAction::Accept => flags.accept = true,
                ForwardingAction::Drop => flags.drop = true,
                ForwardingAction::DropAcl => flags.acl = true,
                ForwardingAction::DropAclIn => flags.acl_in = true,
                ForwardingAction::DropAclOut => flags.acl_out = true,
                ForwardingAction::DropNullRoute => flags.null_route = true,
                ForwardingAction::DropNoRoute => flags.no_route = true,
            }
        }
        flags
    }
}

/// Final classification of a witness flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowDisposition {
    /// The flow reaches a destination node
    Accepted,
    /// The flow is denied by an inbound ACL
    DeniedIn,
    /// The flow is denied by an outbound ACL
    DeniedOut,
    /// The flow is discarded by a null route
    NullRouted,
    /// The flow reaches a node that has no route for it
    NoRoute,
}

impl fmt::Display for FlowDisposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted => write!(f, "ACCEPTED"),
            Self::DeniedIn => write!(f, "DENIED_IN"),
            Self::DeniedOut => write!(f, "DENIED_OUT"),
            Self::NullRouted => write!(f, "NULL_ROUTED"),
            Self::NoRoute => write!(f, "NO_ROUTE"),
        }
    }
}

/// One reachability question.
#[derive(Debug, Clone, Default)]
pub struct ReachabilityQuery {
    /// The packets the question is about; defaults to every packet
    pub headers: HeaderSpace,
    /// The outcomes the caller is interested in
    pub actions: BTreeSet<ForwardingAction>,
    /// Hostnames the packet may start from. Unknown names contribute nothing.
    pub sources: BTreeSet<String>,
    /// Hostnames that count as a destination. Unknown names contribute nothing.
    pub destinations: BTreeSet<String>,
}

/// One hop of a witness path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hop {
    /// Name of the node the hop leaves
    pub node: String,
    /// Source-side interface or hop label
    pub iface: String,
    /// Name of the node the hop enters
    pub peer: String,
    /// Target-side interface or hop label
    pub peer_iface: String,
}

impl fmt::Display for Hop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}] -> {}[{}]", self.node, self.iface, self.peer, self.peer_iface)
    }
}

/// One witness satisfying a reachability query.
#[derive(Debug, Clone)]
pub struct ReachabilityAnswer {
    /// What happens to the witness flow
    pub disposition: FlowDisposition,
    /// A concrete flow realizing the disposition
    pub flow: Flow,
    /// Name of the node the flow starts at
    pub src_node: String,
    /// Name of the node the path ends at
    pub dst_node: String,
    /// The hops of the path, in travel order
    pub hops: Vec<Hop>,
    /// For denied dispositions, the ACL and line responsible
    pub note: Option<String>,
}

impl fmt::Display for ReachabilityAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} flow {}", self.disposition, self.flow)?;
        if let Some(note) = &self.note {
            write!(f, " ({})", note)?;
        }
        if self.hops.is_empty() {
            write!(f, " at {}", self.dst_node)
        } else {
            write!(f, ": {}", self.hops.iter().map(Hop::to_string).join(", "))
        }
    }
}
