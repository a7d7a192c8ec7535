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

//! Module containing all error types

use crate::geometry::GeometryError;
use crate::graph::BuildError;
use thiserror::Error;

/// Main error type
///
/// Construction of the labelled graph is all-or-nothing: any error raised while building aborts
/// the build, and no partially refined equivalence-class table is ever exposed to queries.
/// Query-time conditions (unknown node names, predicates matching nothing) are *not* errors;
/// they yield a "no witness" answer instead.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// A geometric invariant was violated while refining the equivalence classes. This indicates
    /// a bug in the rectangle arithmetic and corrupts the partition for all later insertions,
    /// which is why it is fatal.
    #[error("Geometry Error: {0}")]
    GeometryError(#[from] GeometryError),
    /// The device set, topology and FIB are structurally inconsistent.
    #[error("Graph Build Error: {0}")]
    BuildError(#[from] BuildError),
}
