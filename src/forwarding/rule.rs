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

//! # Forwarding rules
//!
//! A rule binds a header-space rectangle to a forwarding decision: packets in the rectangle
//! leave the rule's source node across the rule's link. FIB entries become rules whose priority
//! is the prefix length (longest prefix wins); ACL lines become rules whose priority is the
//! inverse of their position (earlier lines win), with a synthetic priority-0 implicit-deny rule
//! covering the full space.
//!
//! Rule bodies live in an arena owned by the equivalence-class table; everything else handles
//! the lightweight [`RuleRef`], whose total order makes the tie-break policy explicit: higher
//! priority wins, and among equal priorities the first-registered rule keeps precedence.

use crate::geometry::HyperRectangle;
use crate::graph::{LinkId, NodeId};
use std::cmp::Ordering;

/// Index of a rule in the arena. Also its registration sequence number: rules are appended and
/// never removed, so a smaller id means an earlier registration.
pub(crate) type RuleId = usize;

/// One forwarding or ACL rule.
#[derive(Debug, Clone)]
pub struct Rule {
    /// The link matching packets are forwarded across
    pub(crate) link: LinkId,
    /// The node the rule applies at (the link's source)
    pub(crate) source: NodeId,
    /// The header space the rule matches
    pub(crate) rect: HyperRectangle,
    /// Priority; higher wins
    pub(crate) priority: u32,
}

impl Rule {
    /// Create a new rule.
    pub(crate) fn new(link: LinkId, source: NodeId, rect: HyperRectangle, priority: u32) -> Self {
        Self { link, source, rect, priority }
    }

    /// The link the rule forwards across.
    pub fn link(&self) -> LinkId {
        self.link
    }

    /// The rule's priority.
    pub fn priority(&self) -> u32 {
        self.priority
    }
}

/// Reference to an arena rule, ordered for the per-(class, node) priority queues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RuleRef {
    pub(crate) priority: u32,
    pub(crate) id: RuleId,
}

impl Ord for RuleRef {
    fn cmp(&self, other: &Self) -> Ordering {
        // higher priority first; among equals, the earlier registration (smaller id) wins
        self.priority.cmp(&other.priority).then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for RuleRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
