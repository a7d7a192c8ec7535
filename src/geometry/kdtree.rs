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

//! # KD-tree spatial index
//!
//! Overlap search over the set of live equivalence-class rectangles. Nodes are stored in an
//! arena and keyed on the rectangle's low corner, with the discriminating dimension cycling with
//! depth. Removal is by tombstoning: a removed node keeps routing descents but no longer appears
//! in intersection results.
//!
//! Tree balance depends on insertion order, never correctness. The caller is expected to feed
//! rules in a deterministic shuffle to avoid pathological depth on sorted input.

use super::rectangle::HyperRectangle;
use super::space::NUM_FIELDS;

/// One arena slot of the tree.
#[derive(Debug, Clone)]
struct KdNode {
    rect: HyperRectangle,
    dim: usize,
    left: Option<usize>,
    right: Option<usize>,
    deleted: bool,
}

/// Spatial index over the live equivalence-class rectangles, identified by their alpha index.
#[derive(Debug, Clone, Default)]
pub struct KdTree {
    nodes: Vec<KdNode>,
    root: Option<usize>,
    live: usize,
}

impl KdTree {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (not removed) rectangles in the index.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns true if the index holds no live rectangle.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Insert a rectangle. The rectangle must be non-empty and carry an alpha index; a copy of
    /// it (bounds and alpha) is stored in the tree, so later in-place mutations of the caller's
    /// rectangle must be paired with [`remove`](Self::remove) and a re-insert.
    pub fn insert(&mut self, rect: &HyperRectangle) {
        debug_assert!(!rect.is_empty());
        debug_assert!(rect.alpha_index().is_some());
        let slot = self.nodes.len();
        self.live += 1;
        match self.root {
            None => {
                self.nodes.push(Self::leaf(rect.clone(), 0));
                self.root = Some(slot);
            }
            Some(mut current) => loop {
                let dim = self.nodes[current].dim;
                if rect.low()[dim] < self.nodes[current].rect.low()[dim] {
                    match self.nodes[current].left {
                        Some(child) => current = child,
                        None => {
                            self.nodes.push(Self::leaf(rect.clone(), (dim + 1) % NUM_FIELDS));
                            self.nodes[current].left = Some(slot);
                            break;
                        }
                    }
                } else {
                    match self.nodes[current].right {
                        Some(child) => current = child,
                        None => {
                            self.nodes.push(Self::leaf(rect.clone(), (dim + 1) % NUM_FIELDS));
                            self.nodes[current].right = Some(slot);
                            break;
                        }
                    }
                }
            },
        }
    }

    /// Remove a rectangle, identified by its alpha index and bounds. Returns true if it was
    /// present. The slot is tombstoned in place.
    pub fn remove(&mut self, rect: &HyperRectangle) -> bool {
        let alpha = rect.alpha_index();
        let mut current = self.root;
        while let Some(idx) = current {
            let node = &self.nodes[idx];
            if !node.deleted && node.rect.alpha_index() == alpha && node.rect == *rect {
                self.nodes[idx].deleted = true;
                self.live -= 1;
                return true;
            }
            let dim = node.dim;
            current = if rect.low()[dim] < node.rect.low()[dim] { node.left } else { node.right };
        }
        false
    }

    /// Find the alpha indices of all live rectangles overlapping the query rectangle. An empty
    /// query (zero width in some dimension) overlaps nothing.
    ///
    /// The descent is iterative over an explicit stack; only subtrees whose low bound in the
    /// discriminating dimension lies at or past the query's high bound can be pruned, since
    /// low-corner keying says nothing about how far a rectangle extends.
    pub fn intersect(&self, query: &HyperRectangle) -> Vec<usize> {
        let mut found = Vec::new();
        let mut stack = Vec::new();
        if let Some(root) = self.root {
            stack.push(root);
        }
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if !node.deleted && node.rect.overlaps(query) {
                found.push(node.rect.alpha_index().unwrap());
            }
            if let Some(left) = node.left {
                stack.push(left);
            }
            if let Some(right) = node.right {
                if node.rect.low()[node.dim] < query.high()[node.dim] {
                    stack.push(right);
                }
            }
        }
        found
    }

    fn leaf(rect: HyperRectangle, dim: usize) -> KdNode {
        KdNode { rect, dim, left: None, right: None, deleted: false }
    }
}
