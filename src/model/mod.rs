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

//! # Input data model
//!
//! The surface this crate consumes from its external collaborators: a finalized per-device
//! configuration set ([`Network`], [`Device`], [`Acl`]), the computed forwarding information
//! base ([`Fib`]), and header-space predicates ([`HeaderSpace`]) shared between ACL lines and
//! reachability queries. Vendor-config parsing and route computation happen outside this crate.
//!
//! All collections are ordered (`BTreeMap`/`BTreeSet`/`Vec`), so iterating a model is
//! deterministic and the whole analysis is a pure function of the input and the shuffle seed.

mod config;
mod fib;
mod header_space;
mod types;

pub use config::{Acl, AclAction, AclLine, Adjacency, Device, Endpoint, Interface, Network};
pub use fib::{Fib, FibEntry};
pub use header_space::{Flow, HeaderSpace};
pub use types::{Ipv4Prefix, PrefixParseError, TcpFlags, TcpFlagsMatch, ValueRange};
