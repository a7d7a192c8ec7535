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

//! # Example Networks
//!
//! Collection of prepared networks with their FIBs, used to exercise the engine in tests and
//! documentation. Every fixture returns a `(Network, Fib)` pair ready to be handed to
//! [`ForwardingGraph::new`](crate::forwarding::ForwardingGraph::new).

mod dead_end_net;
mod firewall_net;
mod lpm_net;
mod simple_net;

pub use dead_end_net::DeadEndNet;
pub use firewall_net::FirewallNet;
pub use lpm_net::LpmNet;
pub use simple_net::SimpleNet;
