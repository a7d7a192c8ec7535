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

//! # LPM Net

use crate::model::{Device, Fib, Interface, Network};

/// # LPM Net
///
/// One router with two candidate egresses for overlapping prefixes:
///
/// ```text
///          [eth2] ---- [eth0] r2
/// r1
///          [eth3] ---- [eth0] r3
/// ```
///
/// `r1` forwards `10.0.0.0/8` toward `r2` and the more specific `10.0.0.0/16` toward `r3`, so a
/// packet for `10.0.5.5` must leave through `eth3` while `10.1.0.1` leaves through `eth2`.
#[derive(Debug)]
pub struct LpmNet {}

impl LpmNet {
    /// Build the network and its FIB.
    pub fn build() -> (Network, Fib) {
        let mut net = Network::new();

        net.add_device(
            Device::new("r1").interface(Interface::new("eth2")).interface(Interface::new("eth3")),
        );
        net.add_device(Device::new("r2").interface(Interface::new("eth0")));
        net.add_device(Device::new("r3").interface(Interface::new("eth0")));

        net.add_link("r1", "eth2", "r2", "eth0");
        net.add_link("r1", "eth3", "r3", "eth0");

        let mut fib = Fib::new();
        fib.add_entry("r1", "10.0.0.0/8".parse().unwrap(), "eth2");
        fib.add_entry("r1", "10.0.0.0/16".parse().unwrap(), "eth3");

        (net, fib)
    }
}
