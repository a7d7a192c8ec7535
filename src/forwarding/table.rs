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

//! # Equivalence-class table
//!
//! The authoritative mapping from class alpha index to rectangle, from (class, node) to the
//! priority-ordered set of competing rules at that node, and from link to the bitset of classes
//! currently routed across it.
//!
//! The table starts with a single class covering the full header space. Each rule insertion
//! refines the partition: classes the rule's rectangle cuts through are split, the piece inside
//! the rule's rectangle competes for the rule's source node, and the winning rule's link gets
//! the class bit set. Classes are never merged; the table only grows.

use crate::forwarding::rule::{Rule, RuleId, RuleRef};
use crate::geometry::{full_space, GeometryError, HyperRectangle, KdTree};
use crate::graph::{LinkId, NodeId};
use bitvec::prelude::*;
use log::*;
use std::collections::{BinaryHeap, HashMap};

/// The per-(class, node) rule sets of one class. Only nodes with at least one registered rule
/// have an entry.
type OwnerMap = HashMap<NodeId, BinaryHeap<RuleRef>>;

/// Equivalence-class table with its spatial index, owner maps and link labels.
#[derive(Debug)]
pub(crate) struct EcTable {
    /// Class rectangles, indexed by alpha
    ecs: Vec<HyperRectangle>,
    /// Spatial index over the live class rectangles
    index: KdTree,
    /// Per-class owner map, indexed by alpha
    owners: Vec<OwnerMap>,
    /// Per-link bitset of the classes routed across the link, indexed by dense link index
    labels: Vec<BitVec>,
    /// Rule arena; a rule's index doubles as its registration sequence number
    rules: Vec<Rule>,
}

impl EcTable {
    /// Create the table for a graph with `num_links` links. The partition starts as a single
    /// class covering the full header space, with alpha index 0.
    pub(crate) fn new(num_links: usize) -> Self {
        let mut full = full_space();
        full.set_alpha_index(0);
        let mut index = KdTree::new();
        index.insert(&full);
        Self {
            ecs: vec![full],
            index,
            owners: vec![OwnerMap::new()],
            labels: vec![BitVec::new(); num_links],
            rules: Vec::new(),
        }
    }

    /// Number of equivalence classes.
    pub(crate) fn num_classes(&self) -> usize {
        self.ecs.len()
    }

    /// The rectangle of one class.
    pub(crate) fn class(&self, alpha: usize) -> &HyperRectangle {
        &self.ecs[alpha]
    }

    /// All class rectangles, indexed by alpha.
    #[cfg(test)]
    pub(crate) fn classes(&self) -> &[HyperRectangle] {
        &self.ecs
    }

    /// One arena rule.
    #[cfg(test)]
    pub(crate) fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id]
    }

    /// Returns true if `link` currently routes class `alpha`.
    pub(crate) fn has_label(&self, link: LinkId, alpha: usize) -> bool {
        self.labels[link.index()].get(alpha).map(|bit| *bit).unwrap_or(false)
    }

    /// Alpha indices of all classes overlapping the rectangle, in index discovery order.
    pub(crate) fn overlapping_classes(&self, rect: &HyperRectangle) -> Vec<usize> {
        self.index.intersect(rect)
    }

    /// The class containing a fully bound header, if any. With a sound partition there is
    /// exactly one.
    #[cfg(test)]
    pub(crate) fn class_of(&self, point: &crate::geometry::Point) -> Option<usize> {
        let mut lo = *point;
        let mut hi = *point;
        for d in 0..lo.len() {
            hi[d] = lo[d] + 1;
        }
        let probe = HyperRectangle::new(lo, hi);
        self.index.intersect(&probe).into_iter().next()
    }

    /// The winning rule for a (class, node) pair, if any rule is registered there.
    pub(crate) fn winner(&self, alpha: usize, node: NodeId) -> Option<RuleRef> {
        self.owners[alpha].get(&node).and_then(|heap| heap.peek()).copied()
    }

    /// All rules registered for a (class, node) pair, in no particular order.
    #[cfg(test)]
    pub(crate) fn rules_at(&self, alpha: usize, node: NodeId) -> Vec<RuleRef> {
        self.owners[alpha]
            .get(&node)
            .map(|heap| heap.iter().copied().collect())
            .unwrap_or_default()
    }

    /// The nodes with registered rules for a class.
    #[cfg(test)]
    pub(crate) fn nodes_with_rules(&self, alpha: usize) -> Vec<NodeId> {
        self.owners[alpha].keys().copied().collect()
    }

    /// Insert one rule, refining the partition and updating the edge labels.
    ///
    /// 1. Find all classes overlapping the rule's rectangle.
    /// 2. Split every class the rectangle cuts through: the first piece reuses the class's
    ///    alpha index in place, every other piece becomes a new class. The piece equal to the
    ///    intersection joins the overlapping set.
    /// 3. New classes inherit a copy of their parent's owner map, and every inherited winner's
    ///    link is labelled for the new class, so the split preserves all existing routing
    ///    decisions for the unaffected region.
    /// 4. For every class in the overlapping set, the rule competes at its source node: it
    ///    takes the label over from the previous winner only if it strictly outranks it, and is
    ///    registered in the queue either way so it stays recoverable.
    pub(crate) fn insert_rule(&mut self, rule: Rule) -> Result<(), GeometryError> {
        let id: RuleId = self.rules.len();
        let rule_ref = RuleRef { priority: rule.priority, id };
        let hr = rule.rect.clone();

        let mut overlapping: Vec<usize> = Vec::new();
        // (parent, child) relations of this insertion's splits
        let mut delta: Vec<(usize, usize)> = Vec::new();

        for alpha in self.index.intersect(&hr) {
            let other = self.ecs[alpha].clone();
            let overlap = hr.overlap(&other).ok_or(GeometryError::MissingOverlap { alpha })?;
            match other.divide(&overlap) {
                None => overlapping.push(alpha),
                Some(pieces) => {
                    self.index.remove(&other);
                    let mut first = true;
                    for mut piece in pieces {
                        let piece_alpha = if first {
                            first = false;
                            self.ecs[alpha].set_bounds(*piece.low(), *piece.high());
                            alpha
                        } else {
                            let fresh = self.ecs.len();
                            piece.set_alpha_index(fresh);
                            self.ecs.push(piece);
                            self.owners.push(OwnerMap::new());
                            delta.push((alpha, fresh));
                            fresh
                        };
                        self.index.insert(&self.ecs[piece_alpha]);
                        if self.ecs[piece_alpha] == overlap {
                            overlapping.push(piece_alpha);
                        }
                    }
                }
            }
        }

        if !delta.is_empty() {
            trace!("rule {} created {} new classes ({} total)", id, delta.len(), self.ecs.len());
        }

        // new classes inherit their parent's rules and keep its routing decisions
        for (parent, child) in delta {
            let copied = self.owners[parent].clone();
            for heap in copied.values() {
                if let Some(winner) = heap.peek() {
                    let link = self.rules[winner.id].link;
                    self.set_label(link, child, true);
                }
            }
            self.owners[child] = copied;
        }

        // the rule competes at its source node over every class it fully covers
        for alpha in overlapping {
            let current = self.winner(alpha, rule.source);
            if current.map_or(true, |winner| winner < rule_ref) {
                self.set_label(rule.link, alpha, true);
                if let Some(winner) = current {
                    let old_link = self.rules[winner.id].link;
                    if old_link != rule.link {
                        self.set_label(old_link, alpha, false);
                    }
                }
            }
            self.owners[alpha].entry(rule.source).or_insert_with(BinaryHeap::new).push(rule_ref);
        }

        self.rules.push(rule);
        Ok(())
    }

    fn set_label(&mut self, link: LinkId, alpha: usize, on: bool) {
        let bits = &mut self.labels[link.index()];
        if bits.len() <= alpha {
            bits.resize(alpha + 1, false);
        }
        bits.set(alpha, on);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::FIELD_DST_IP;
    use crate::graph::{LinkId, NodeId};

    fn node(i: u32) -> NodeId {
        NodeId::new(i as usize)
    }

    fn link(i: u32) -> LinkId {
        LinkId::new(i as usize)
    }

    fn dst_rect(lo: u64, hi: u64) -> HyperRectangle {
        let mut rect = full_space();
        let mut new_lo = *rect.low();
        let mut new_hi = *rect.high();
        new_lo[FIELD_DST_IP] = lo;
        new_hi[FIELD_DST_IP] = hi;
        rect.set_bounds(new_lo, new_hi);
        rect
    }

    /// All live classes must tile the full space: disjoint, and their spans sum up.
    fn assert_partition(table: &EcTable) {
        for (i, a) in table.classes().iter().enumerate() {
            assert_eq!(a.alpha_index(), Some(i));
            assert!(!a.is_empty());
            for b in table.classes().iter().skip(i + 1) {
                assert!(!a.overlaps(b), "classes {:?} and {:?} overlap", a, b);
            }
        }
    }

    #[test]
    fn test_initial_table() {
        let table = EcTable::new(4);
        assert_eq!(table.num_classes(), 1);
        assert_eq!(table.class(0), &full_space());
    }

    #[test]
    fn test_single_rule_refines() {
        let mut table = EcTable::new(2);
        table.insert_rule(Rule::new(link(0), node(1), dst_rect(100, 200), 8)).unwrap();
        // the full space splits into below, above, and the covered region
        assert_eq!(table.num_classes(), 3);
        assert_partition(&table);
        // only the covered class routes across the link
        let covered = table.class_of(&dst_rect(100, 200).low_corner()).unwrap();
        assert!(table.has_label(link(0), covered));
        let below = table.class_of(&dst_rect(0, 1).low_corner()).unwrap();
        assert!(!table.has_label(link(0), below));
    }

    #[test]
    fn test_idempotent_insertion() {
        let mut table = EcTable::new(2);
        let rule = Rule::new(link(0), node(1), dst_rect(100, 200), 8);
        table.insert_rule(rule.clone()).unwrap();
        let classes_before: Vec<HyperRectangle> = table.classes().to_vec();
        let labels_before: Vec<bool> =
            (0..table.num_classes()).map(|a| table.has_label(link(0), a)).collect();

        table.insert_rule(rule).unwrap();
        // no new classes, no label flips
        assert_eq!(table.classes(), &classes_before[..]);
        let labels_after: Vec<bool> =
            (0..table.num_classes()).map(|a| table.has_label(link(0), a)).collect();
        assert_eq!(labels_after, labels_before);
        assert_partition(&table);
    }

    #[test]
    fn test_higher_priority_takes_over() {
        let mut table = EcTable::new(2);
        table.insert_rule(Rule::new(link(0), node(1), dst_rect(0, 1000), 8)).unwrap();
        table.insert_rule(Rule::new(link(1), node(1), dst_rect(0, 1000), 16)).unwrap();
        let alpha = table.class_of(&dst_rect(0, 1000).low_corner()).unwrap();
        assert!(!table.has_label(link(0), alpha));
        assert!(table.has_label(link(1), alpha));
        // the loser stays registered
        assert_eq!(table.rules_at(alpha, node(1)).len(), 2);
    }

    #[test]
    fn test_lower_priority_does_not_take_over() {
        let mut table = EcTable::new(2);
        table.insert_rule(Rule::new(link(1), node(1), dst_rect(0, 1000), 16)).unwrap();
        table.insert_rule(Rule::new(link(0), node(1), dst_rect(0, 1000), 8)).unwrap();
        let alpha = table.class_of(&dst_rect(0, 1000).low_corner()).unwrap();
        assert!(table.has_label(link(1), alpha));
        assert!(!table.has_label(link(0), alpha));
    }

    #[test]
    fn test_equal_priority_first_registered_wins() {
        let mut table = EcTable::new(2);
        table.insert_rule(Rule::new(link(0), node(1), dst_rect(0, 1000), 8)).unwrap();
        table.insert_rule(Rule::new(link(1), node(1), dst_rect(0, 1000), 8)).unwrap();
        let alpha = table.class_of(&dst_rect(0, 1000).low_corner()).unwrap();
        assert!(table.has_label(link(0), alpha));
        assert!(!table.has_label(link(1), alpha));
    }

    #[test]
    fn test_split_preserves_routing() {
        let mut table = EcTable::new(2);
        // a broad rule, then a narrower one cutting through its region
        table.insert_rule(Rule::new(link(0), node(1), dst_rect(0, 1000), 8)).unwrap();
        table.insert_rule(Rule::new(link(1), node(2), dst_rect(400, 600), 8)).unwrap();
        assert_partition(&table);
        // the region outside the narrow rule still routes across link 0
        let outside = table.class_of(&dst_rect(0, 1).low_corner()).unwrap();
        assert!(table.has_label(link(0), outside));
        assert!(!table.has_label(link(1), outside));
        // the region inside routes across both: the rules apply at different nodes
        let inside = table.class_of(&dst_rect(400, 401).low_corner()).unwrap();
        assert!(table.has_label(link(0), inside));
        assert!(table.has_label(link(1), inside));
    }

    #[test]
    fn test_winner_per_node() {
        let mut table = EcTable::new(3);
        table.insert_rule(Rule::new(link(0), node(1), dst_rect(0, 1000), 8)).unwrap();
        table.insert_rule(Rule::new(link(1), node(2), dst_rect(0, 1000), 24)).unwrap();
        let alpha = table.class_of(&dst_rect(500, 501).low_corner()).unwrap();
        assert_eq!(table.winner(alpha, node(1)).unwrap().priority, 8);
        assert_eq!(table.winner(alpha, node(2)).unwrap().priority, 24);
        assert_eq!(table.winner(alpha, node(3)), None);
    }
}
