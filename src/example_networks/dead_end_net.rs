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

//! # Dead End Net

use crate::model::{Device, Fib, Interface, Network};

/// # Dead End Net
///
/// Two routers and plenty of ways to lose a packet:
///
/// ```text
/// r1 [eth0] ---- [eth0] r2
/// ```
///
/// `r1` null-routes `10.1.0.0/16`, has no route at all for `10.2.0.0/16`, and forwards
/// `10.3.0.0/16` to `r2`, which has no route for it either.
#[derive(Debug)]
pub struct DeadEndNet {}

impl DeadEndNet {
    /// Build the network and its FIB.
    pub fn build() -> (Network, Fib) {
        let mut net = Network::new();

        net.add_device(Device::new("r1").interface(Interface::new("eth0")));
        net.add_device(Device::new("r2").interface(Interface::new("eth0")));
        net.add_link("r1", "eth0", "r2", "eth0");

        let mut fib = Fib::new();
        fib.add_null_route("r1", "10.1.0.0/16".parse().unwrap());
        fib.add_entry("r1", "10.3.0.0/16".parse().unwrap(), "eth0");

        (net, fib)
    }
}
