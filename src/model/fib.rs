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

//! # Forwarding information base
//!
//! The concrete longest-prefix-match forwarding entries computed by the external routing layer.
//! This crate treats them as ground truth: each entry becomes one forwarding rule whose priority
//! is the prefix length.

use super::types::Ipv4Prefix;
use crate::graph::NULL_IFACE;
use std::collections::{BTreeMap, BTreeSet};

/// One FIB entry: packets destined to `prefix` leave through `iface`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FibEntry {
    /// Destination prefix
    pub prefix: Ipv4Prefix,
    /// Egress interface name; [`NULL_IFACE`] denotes a null route
    pub iface: String,
}

/// Per-device sets of FIB entries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fib {
    entries: BTreeMap<String, BTreeSet<FibEntry>>,
}

impl Fib {
    /// Create an empty FIB.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `device` forwards packets for `prefix` out of `iface`.
    pub fn add_entry(&mut self, device: &str, prefix: Ipv4Prefix, iface: &str) {
        self.entries
            .entry(device.to_string())
            .or_insert_with(BTreeSet::new)
            .insert(FibEntry { prefix, iface: iface.to_string() });
    }

    /// Record a null route: packets for `prefix` are discarded by `device`.
    pub fn add_null_route(&mut self, device: &str, prefix: Ipv4Prefix) {
        self.add_entry(device, prefix, NULL_IFACE);
    }

    /// Iterate over all devices and their entries, in hostname order.
    pub fn devices(&self) -> impl Iterator<Item = (&String, &BTreeSet<FibEntry>)> {
        self.entries.iter()
    }

    /// The entries of one device, if any.
    pub fn device_entries(&self, device: &str) -> Option<&BTreeSet<FibEntry>> {
        self.entries.get(device)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_entries_are_ordered() {
        let mut fib = Fib::new();
        fib.add_entry("r1", "10.0.0.0/16".parse().unwrap(), "eth1");
        fib.add_entry("r1", "10.0.0.0/8".parse().unwrap(), "eth0");
        fib.add_null_route("r1", "192.168.0.0/16".parse().unwrap());
        let entries: Vec<_> = fib.device_entries("r1").unwrap().iter().collect();
        assert_eq!(entries.len(), 3);
        // BTreeSet orders by (prefix, iface), so iteration is deterministic
        assert_eq!(entries[0].iface, "eth0");
        assert_eq!(entries[1].iface, "eth1");
        assert_eq!(entries[2].iface, NULL_IFACE);
    }
}
