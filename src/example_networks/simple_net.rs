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

//! # Simplenet

use crate::model::{Device, Fib, Interface, Network};

/// # Simplenet
///
/// Three routers in a chain, no filters:
///
/// ```text
/// r1 [eth1] ---- [eth0] r2 [eth1] ---- [eth0] r3
/// ```
///
/// `10.0.3.0/24` lives behind `r3` and `10.0.1.0/24` behind `r1`; every router forwards both
/// prefixes along the chain.
#[derive(Debug)]
pub struct SimpleNet {}

impl SimpleNet {
    /// Build the network and its FIB.
    pub fn build() -> (Network, Fib) {
        let mut net = Network::new();

        net.add_device(Device::new("r1").interface(Interface::new("eth1")));
        net.add_device(
            Device::new("r2").interface(Interface::new("eth0")).interface(Interface::new("eth1")),
        );
        net.add_device(Device::new("r3").interface(Interface::new("eth0")));

        net.add_link("r1", "eth1", "r2", "eth0");
        net.add_link("r2", "eth1", "r3", "eth0");

        let mut fib = Fib::new();
        fib.add_entry("r1", "10.0.3.0/24".parse().unwrap(), "eth1");
        fib.add_entry("r2", "10.0.3.0/24".parse().unwrap(), "eth1");
        fib.add_entry("r2", "10.0.1.0/24".parse().unwrap(), "eth0");
        fib.add_entry("r3", "10.0.1.0/24".parse().unwrap(), "eth0");

        (net, fib)
    }
}
