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

//! # Firewallnet

use crate::model::{
    Acl, AclAction, Device, Fib, HeaderSpace, Interface, Network, ValueRange,
};

/// # Firewallnet
///
/// The [`SimpleNet`](super::SimpleNet) chain with `r2` acting as a firewall:
///
/// ```text
/// r1 [eth1] ---- [eth0] r2 [eth1] ---- [eth0] r3
///               FW inbound   EGRESS outbound
/// ```
///
/// The inbound ACL `FW` on `r2[eth0]` denies sources in `10.0.0.0/24` (line `block-lan`) and
/// permits everything else (line `allow-any`). The outbound ACL `EGRESS` on `r2[eth1]` denies
/// destination port 23 (line `no-telnet`) and permits the rest.
#[derive(Debug)]
pub struct FirewallNet {}

impl FirewallNet {
    /// Build the network and its FIB.
    pub fn build() -> (Network, Fib) {
        let mut net = Network::new();

        net.add_device(Device::new("r1").interface(Interface::new("eth1")));
        net.add_device(
            Device::new("r2")
                .interface(Interface::new("eth0").incoming_filter("FW"))
                .interface(Interface::new("eth1").outgoing_filter("EGRESS"))
                .acl(
                    Acl::new("FW")
                        .line(
                            "block-lan",
                            AclAction::Deny,
                            HeaderSpace {
                                src_ips: vec!["10.0.0.0/24".parse().unwrap()],
                                ..HeaderSpace::any()
                            },
                        )
                        .line("allow-any", AclAction::Permit, HeaderSpace::any()),
                )
                .acl(
                    Acl::new("EGRESS")
                        .line(
                            "no-telnet",
                            AclAction::Deny,
                            HeaderSpace {
                                dst_ports: vec![ValueRange::single(23)],
                                ..HeaderSpace::any()
                            },
                        )
                        .line("allow-any", AclAction::Permit, HeaderSpace::any()),
                ),
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
