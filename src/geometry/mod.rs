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

//! # Geometric representation of packet header space
//!
//! A set of packet headers is represented symbolically as an axis-aligned box
//! ([`HyperRectangle`]) in a fixed-dimension integer space with one dimension per header field
//! (source/destination IP, ports, protocol, ICMP type/code, and one 0/1 dimension per TCP flag).
//! ACL lines and query predicates convert into unions of such boxes ([`GeometricSpace`]), and
//! the live equivalence classes are indexed for overlap search by a [`KdTree`].

mod kdtree;
mod rectangle;
mod space;

pub use kdtree::KdTree;
pub use rectangle::{HyperRectangle, Point};
pub use space::{
    full_space, GeometricSpace, FIELD_DST_IP, FIELD_DST_PORT, FIELD_ICMP_CODE, FIELD_ICMP_TYPE,
    FIELD_IP_PROTO, FIELD_SRC_IP, FIELD_SRC_PORT, FIELD_TCP_FLAGS, NUM_FIELDS,
};

use thiserror::Error;

/// Geometry Errors
///
/// Every variant indicates a violated invariant of the rectangle arithmetic. These are internal
/// consistency failures: once one occurs, two equivalence classes may silently describe
/// overlapping header spaces, so the caller must abort instead of continuing.
#[derive(Error, Debug, PartialEq)]
pub enum GeometryError {
    /// The spatial index reported an equivalence class as overlapping a rule rectangle, but the
    /// intersection of the two computed as empty.
    #[error("equivalence class {alpha} does not overlap the rule rectangle it was reported for")]
    MissingOverlap {
        /// Alpha index of the inconsistent equivalence class
        alpha: usize,
    },
}
