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

//! # Device configuration and topology
//!
//! The finalized, vendor-independent device model this crate consumes: devices with named
//! interfaces, interfaces with optional inbound/outbound ACL references, the ACL definitions
//! themselves, and the set of adjacencies wiring (device, interface) pairs together.

use super::header_space::{Flow, HeaderSpace};
use std::collections::BTreeMap;
use std::fmt;

/// Action of an ACL line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AclAction {
    /// The packet may continue
    Permit,
    /// The packet is dropped
    Deny,
}

/// One line of an access list: a name (for reporting), an action, and the match predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct AclLine {
    /// Name of the line, surfaced in answers when the line denies a flow
    pub name: String,
    /// Whether matching packets pass or drop
    pub action: AclAction,
    /// The match predicate
    pub headers: HeaderSpace,
}

impl AclLine {
    /// Create a new line.
    pub fn new(name: &str, action: AclAction, headers: HeaderSpace) -> Self {
        Self { name: name.to_string(), action, headers }
    }
}

/// An ordered access list. Earlier lines take precedence; a packet matching no line is dropped
/// (implicit deny).
#[derive(Debug, Clone, PartialEq)]
pub struct Acl {
    /// Name of the access list
    pub name: String,
    /// The lines, in evaluation order
    pub lines: Vec<AclLine>,
}

impl Acl {
    /// Create an empty access list.
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), lines: Vec::new() }
    }

    /// Append a line and return self, for fixture-style construction.
    pub fn line(mut self, name: &str, action: AclAction, headers: HeaderSpace) -> Self {
        self.lines.push(AclLine::new(name, action, headers));
        self
    }

    /// First-match evaluation: the line a concrete flow matches, or `None` for the implicit
    /// deny.
    pub fn matched_line(&self, flow: &Flow) -> Option<&AclLine> {
        self.lines.iter().find(|line| line.headers.matches(flow))
    }
}

/// A device interface: its name plus optional references into the device's ACL table.
#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    /// Interface name, unique per device
    pub name: String,
    /// ACL applied to packets entering the device through this interface
    pub incoming_filter: Option<String>,
    /// ACL applied to packets leaving the device through this interface
    pub outgoing_filter: Option<String>,
}

impl Interface {
    /// Create an unfiltered interface.
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), incoming_filter: None, outgoing_filter: None }
    }

    /// Attach an inbound ACL reference and return self.
    pub fn incoming_filter(mut self, acl: &str) -> Self {
        self.incoming_filter = Some(acl.to_string());
        self
    }

    /// Attach an outbound ACL reference and return self.
    pub fn outgoing_filter(mut self, acl: &str) -> Self {
        self.outgoing_filter = Some(acl.to_string());
        self
    }
}

/// One configured device: hostname, interface map and ACL table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Device {
    /// Hostname, unique within the network
    pub hostname: String,
    /// Interfaces by name
    pub interfaces: BTreeMap<String, Interface>,
    /// ACL definitions by name
    pub acls: BTreeMap<String, Acl>,
}

impl Device {
    /// Create a device without interfaces.
    pub fn new(hostname: &str) -> Self {
        Self { hostname: hostname.to_string(), ..Default::default() }
    }

    /// Add an interface and return self.
    pub fn interface(mut self, iface: Interface) -> Self {
        self.interfaces.insert(iface.name.clone(), iface);
        self
    }

    /// Add an ACL definition and return self.
    pub fn acl(mut self, acl: Acl) -> Self {
        self.acls.insert(acl.name.clone(), acl);
        self
    }
}

/// One side of an adjacency: a (device, interface) pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Endpoint {
    /// Hostname of the device
    pub device: String,
    /// Interface name on that device
    pub iface: String,
}

impl Endpoint {
    /// Create a new endpoint.
    pub fn new(device: &str, iface: &str) -> Self {
        Self { device: device.to_string(), iface: iface.to_string() }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.device, self.iface)
    }
}

/// A directed adjacency between two endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjacency {
    /// The sending side
    pub from: Endpoint,
    /// The receiving side
    pub to: Endpoint,
}

/// The complete device set and topology of one analysis snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Network {
    devices: BTreeMap<String, Device>,
    adjacencies: Vec<Adjacency>,
}

impl Network {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a device to the network.
    pub fn add_device(&mut self, device: Device) {
        self.devices.insert(device.hostname.clone(), device);
    }

    /// Add a bidirectional link between two (device, interface) pairs.
    pub fn add_link(&mut self, device1: &str, iface1: &str, device2: &str, iface2: &str) {
        self.add_adjacency(Endpoint::new(device1, iface1), Endpoint::new(device2, iface2));
        self.add_adjacency(Endpoint::new(device2, iface2), Endpoint::new(device1, iface1));
    }

    /// Add a single directed adjacency.
    pub fn add_adjacency(&mut self, from: Endpoint, to: Endpoint) {
        self.adjacencies.push(Adjacency { from, to });
    }

    /// The devices of the network, in hostname order.
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    /// Look up a device by hostname.
    pub fn device(&self, hostname: &str) -> Option<&Device> {
        self.devices.get(hostname)
    }

    /// The directed adjacencies of the network, in insertion order.
    pub fn adjacencies(&self) -> &[Adjacency] {
        &self.adjacencies
    }
}
