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

//! # Hyperrectangles
//!
//! An axis-aligned box in the [`NUM_FIELDS`]-dimensional header space, with low bounds inclusive
//! and high bounds exclusive. The central primitive is [`HyperRectangle::divide`], which
//! partitions a rectangle into a known sub-rectangle plus complement slabs. Its correctness
//! (exact cover, no gaps, no double-covering) is the single most important invariant of the
//! whole engine.

use super::space::NUM_FIELDS;
use std::fmt;

/// A fully bound position in header space, one coordinate per header field.
pub type Point = [u64; NUM_FIELDS];

/// Axis-aligned box in the multi-dimensional header-field space.
///
/// Live equivalence classes additionally carry an *alpha index*: a unique, stable integer naming
/// the class. Rectangles created transiently (during ACL or query conversion, or as intersection
/// results) have no alpha index until they are registered as a class. Equality compares bounds
/// only, never the alpha index.
#[derive(Clone)]
pub struct HyperRectangle {
    /// Inclusive low bounds, one per field
    pub(crate) lo: [u64; NUM_FIELDS],
    /// Exclusive high bounds, one per field
    pub(crate) hi: [u64; NUM_FIELDS],
    /// Alpha index of the equivalence class this rectangle represents, if any
    alpha: Option<usize>,
}

impl PartialEq for HyperRectangle {
    fn eq(&self, other: &Self) -> bool {
        self.lo == other.lo && self.hi == other.hi
    }
}

impl Eq for HyperRectangle {}

impl fmt::Debug for HyperRectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HyperRectangle(")?;
        for d in 0..NUM_FIELDS {
            if d > 0 {
                write!(f, " ")?;
            }
            write!(f, "[{},{})", self.lo[d], self.hi[d])?;
        }
        match self.alpha {
            Some(a) => write!(f, " alpha {})", a),
            None => write!(f, ")"),
        }
    }
}

impl HyperRectangle {
    /// Create a new rectangle from its bound vectors. No alpha index is assigned.
    pub fn new(lo: [u64; NUM_FIELDS], hi: [u64; NUM_FIELDS]) -> Self {
        Self { lo, hi, alpha: None }
    }

    /// The alpha index of the equivalence class this rectangle represents, or `None` if the
    /// rectangle is transient.
    pub fn alpha_index(&self) -> Option<usize> {
        self.alpha
    }

    /// Assign the alpha index, registering this rectangle as an equivalence class.
    pub fn set_alpha_index(&mut self, alpha: usize) {
        self.alpha = Some(alpha);
    }

    /// Inclusive low bounds.
    pub fn low(&self) -> &[u64; NUM_FIELDS] {
        &self.lo
    }

    /// Exclusive high bounds.
    pub fn high(&self) -> &[u64; NUM_FIELDS] {
        &self.hi
    }

    /// Replace the bounds of this rectangle, keeping its alpha index. Used when the first piece
    /// of a split reuses the parent class in place.
    pub fn set_bounds(&mut self, lo: [u64; NUM_FIELDS], hi: [u64; NUM_FIELDS]) {
        self.lo = lo;
        self.hi = hi;
    }

    /// Returns true if the rectangle denotes the empty set (some dimension has no width). Empty
    /// rectangles must never enter the spatial index.
    pub fn is_empty(&self) -> bool {
        (0..NUM_FIELDS).any(|d| self.lo[d] >= self.hi[d])
    }

    /// Returns true if the two rectangles share at least one point.
    pub fn overlaps(&self, other: &Self) -> bool {
        (0..NUM_FIELDS).all(|d| self.lo[d].max(other.lo[d]) < self.hi[d].min(other.hi[d]))
    }

    /// Intersection of two rectangles, or `None` if they are disjoint in any dimension. The
    /// result never carries an alpha index and is never empty.
    pub fn overlap(&self, other: &Self) -> Option<Self> {
        let mut lo = [0u64; NUM_FIELDS];
        let mut hi = [0u64; NUM_FIELDS];
        for d in 0..NUM_FIELDS {
            lo[d] = self.lo[d].max(other.lo[d]);
            hi[d] = self.hi[d].min(other.hi[d]);
            if lo[d] >= hi[d] {
                return None;
            }
        }
        Some(Self::new(lo, hi))
    }

    /// Partition `self` by a known sub-rectangle.
    ///
    /// `overlap` must be fully contained in `self`. Returns `None` if `self == overlap` (there
    /// is nothing to split). Otherwise returns a disjoint cover of `self`: complement slabs
    /// carved dimension by dimension, followed by `overlap` itself as the final piece. The union
    /// of all returned pieces equals `self` exactly, no piece is empty, and the first piece
    /// never equals `self`.
    pub fn divide(&self, overlap: &Self) -> Option<Vec<Self>> {
        debug_assert!(self.contains_rect(overlap));
        if self == overlap {
            return None;
        }
        let mut pieces = Vec::new();
        let mut rem = self.clone();
        rem.alpha = None;
        for d in 0..NUM_FIELDS {
            if rem.lo[d] < overlap.lo[d] {
                let mut slab = rem.clone();
                slab.hi[d] = overlap.lo[d];
                pieces.push(slab);
                rem.lo[d] = overlap.lo[d];
            }
            if rem.hi[d] > overlap.hi[d] {
                let mut slab = rem.clone();
                slab.lo[d] = overlap.hi[d];
                pieces.push(slab);
                rem.hi[d] = overlap.hi[d];
            }
        }
        // what remains is exactly the overlap
        pieces.push(rem);
        Some(pieces)
    }

    /// Returns true if the point lies inside the rectangle.
    pub fn contains(&self, point: &Point) -> bool {
        (0..NUM_FIELDS).all(|d| self.lo[d] <= point[d] && point[d] < self.hi[d])
    }

    /// Returns true if `other` is fully contained in `self`.
    pub fn contains_rect(&self, other: &Self) -> bool {
        (0..NUM_FIELDS).all(|d| self.lo[d] <= other.lo[d] && other.hi[d] <= self.hi[d])
    }

    /// The smallest point of the rectangle, used as its deterministic representative.
    pub fn low_corner(&self) -> Point {
        self.lo
    }
}

#[cfg(test)]
mod test {
    use super::super::space;
    use super::*;
    use rand::prelude::*;

    fn boxed(ranges: &[(usize, u64, u64)]) -> HyperRectangle {
        let mut rect = space::full_space();
        for &(d, lo, hi) in ranges {
            rect.lo[d] = lo;
            rect.hi[d] = hi;
        }
        rect
    }

    fn volume(r: &HyperRectangle) -> u128 {
        (0..NUM_FIELDS).map(|d| (r.hi[d] - r.lo[d]) as u128).product()
    }

    #[test]
    fn test_overlap() {
        let a = boxed(&[(0, 0, 100)]);
        let b = boxed(&[(0, 50, 200)]);
        let o = a.overlap(&b).unwrap();
        assert_eq!(o.lo[0], 50);
        assert_eq!(o.hi[0], 100);
        assert_eq!(a.overlap(&boxed(&[(0, 100, 200)])), None);
    }

    #[test]
    fn test_divide_nothing_to_split() {
        let a = boxed(&[(0, 10, 20)]);
        let same = boxed(&[(0, 10, 20)]);
        assert_eq!(a.divide(&same), None);
    }

    #[test]
    fn test_divide_single_dimension() {
        let a = boxed(&[(0, 0, 100)]);
        let b = boxed(&[(0, 25, 75)]);
        let pieces = a.divide(&b).unwrap();
        assert_eq!(pieces.len(), 3);
        assert_ne!(pieces[0], a);
        assert_eq!(pieces.iter().filter(|p| **p == b).count(), 1);
        assert_eq!(*pieces.last().unwrap(), b);
    }

    #[test]
    fn test_divide_exact_partition() {
        let a = boxed(&[(0, 0, 64), (1, 0, 64), (2, 0, 64), (3, 0, 64)]);
        let b = boxed(&[(0, 8, 32), (1, 16, 48), (2, 0, 64), (3, 10, 11)]);
        let pieces = a.divide(&b).unwrap();
        // exactly one piece is the overlap itself
        assert_eq!(pieces.iter().filter(|p| **p == b).count(), 1);
        // pieces are contained, non-empty and pairwise disjoint
        for (i, p) in pieces.iter().enumerate() {
            assert!(!p.is_empty());
            assert!(a.contains_rect(p));
            for q in pieces.iter().skip(i + 1) {
                assert!(!p.overlaps(q), "{:?} overlaps {:?}", p, q);
            }
        }
        // together they cover all of `a`
        let total: u128 = pieces.iter().map(volume).sum();
        assert_eq!(total, volume(&a));
    }

    #[test]
    fn test_divide_random_partition() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let mut outer = space::full_space();
            let mut inner = space::full_space();
            // keep coordinates small so exact volumes fit into u128
            for d in 0..NUM_FIELDS {
                let max = 64.min(outer.hi[d]);
                let lo = rng.gen_range(0, max - 1);
                let hi = rng.gen_range(lo + 1, max);
                outer.lo[d] = lo;
                outer.hi[d] = hi;
                let ilo = rng.gen_range(lo, hi);
                let ihi = rng.gen_range(ilo + 1, hi + 1);
                inner.lo[d] = ilo;
                inner.hi[d] = ihi;
            }
            match outer.divide(&inner) {
                None => assert_eq!(outer, inner),
                Some(pieces) => {
                    assert_ne!(pieces[0], outer);
                    assert_eq!(pieces.iter().filter(|p| **p == inner).count(), 1);
                    for (i, p) in pieces.iter().enumerate() {
                        assert!(!p.is_empty());
                        assert!(outer.contains_rect(p));
                        for q in pieces.iter().skip(i + 1) {
                            assert!(!p.overlaps(q));
                        }
                    }
                    let total: u128 = pieces.iter().map(volume).sum();
                    assert_eq!(total, volume(&outer));
                }
            }
        }
    }

    #[test]
    fn test_contains_point() {
        let a = boxed(&[(0, 10, 20), (4, 6, 7)]);
        let mut p = a.low_corner();
        assert!(a.contains(&p));
        p[0] = 20;
        assert!(!a.contains(&p));
    }

    #[test]
    fn test_equality_ignores_alpha() {
        let a = boxed(&[(0, 10, 20)]);
        let mut b = boxed(&[(0, 10, 20)]);
        b.set_alpha_index(17);
        assert_eq!(a, b);
    }
}
