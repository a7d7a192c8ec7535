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

//! # Header spaces and flows
//!
//! A [`HeaderSpace`] is a symbolic set of packet headers: per-field allowed values, with every
//! field defaulting to "any". It serves both as the match predicate of an ACL line and as the
//! packet predicate of a reachability query. A [`Flow`] is one fully bound header, used as the
//! concrete witness of an answer.

use super::types::{Ipv4Prefix, TcpFlags, TcpFlagsMatch, ValueRange};
use std::fmt;
use std::net::Ipv4Addr;

/// Symbolic set of packet headers. An empty field constrains nothing; a non-empty field
/// restricts the header to one of the listed values/ranges.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeaderSpace {
    /// Allowed source prefixes
    pub src_ips: Vec<Ipv4Prefix>,
    /// Allowed destination prefixes
    pub dst_ips: Vec<Ipv4Prefix>,
    /// Allowed source port ranges
    pub src_ports: Vec<ValueRange>,
    /// Allowed destination port ranges
    pub dst_ports: Vec<ValueRange>,
    /// Allowed IP protocol numbers
    pub ip_protocols: Vec<u8>,
    /// Allowed ICMP type ranges
    pub icmp_types: Vec<ValueRange>,
    /// Allowed ICMP code ranges
    pub icmp_codes: Vec<ValueRange>,
    /// Allowed TCP flag combinations (alternatives)
    pub tcp_flags: Vec<TcpFlagsMatch>,
}

impl HeaderSpace {
    /// The predicate matching every packet.
    pub fn any() -> Self {
        Self::default()
    }

    /// Evaluate the predicate directly against one concrete flow.
    pub fn matches(&self, flow: &Flow) -> bool {
        (self.src_ips.is_empty() || self.src_ips.iter().any(|p| p.contains(flow.src_ip)))
            && (self.dst_ips.is_empty()
                || self.dst_ips.iter().any(|p| p.contains(flow.dst_ip)))
            && (self.src_ports.is_empty()
                || self.src_ports.iter().any(|r| r.contains(flow.src_port as u64)))
            && (self.dst_ports.is_empty()
                || self.dst_ports.iter().any(|r| r.contains(flow.dst_port as u64)))
            && (self.ip_protocols.is_empty() || self.ip_protocols.contains(&flow.ip_protocol))
            && (self.icmp_types.is_empty()
                || self.icmp_types.iter().any(|r| r.contains(flow.icmp_type as u64)))
            && (self.icmp_codes.is_empty()
                || self.icmp_codes.iter().any(|r| r.contains(flow.icmp_code as u64)))
            && (self.tcp_flags.is_empty()
                || self.tcp_flags.iter().any(|m| m.matches(&flow.tcp_flags)))
    }
}

/// One concrete packet header, fully bound. Produced as the witness of a reachability answer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct Flow {
    pub src_ip: Ipv4Addr,
    pub dst_ip: Ipv4Addr,
    pub src_port: u16,
    pub dst_port: u16,
    pub ip_protocol: u8,
    pub icmp_type: u8,
    pub icmp_code: u8,
    pub tcp_flags: TcpFlags,
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} -> {}:{} proto {}",
            self.src_ip, self.src_port, self.dst_ip, self.dst_port, self.ip_protocol
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn flow() -> Flow {
        Flow {
            src_ip: Ipv4Addr::new(10, 0, 0, 5),
            dst_ip: Ipv4Addr::new(10, 0, 1, 9),
            src_port: 40000,
            dst_port: 80,
            ip_protocol: 6,
            icmp_type: 0,
            icmp_code: 0,
            tcp_flags: TcpFlags { syn: true, ..TcpFlags::default() },
        }
    }

    #[test]
    fn test_any_matches_everything() {
        assert!(HeaderSpace::any().matches(&flow()));
    }

    #[test]
    fn test_field_constraints() {
        let h = HeaderSpace {
            src_ips: vec!["10.0.0.0/24".parse().unwrap()],
            dst_ports: vec![ValueRange::new(80, 80)],
            ip_protocols: vec![6],
            ..HeaderSpace::any()
        };
        assert!(h.matches(&flow()));

        let other = HeaderSpace {
            src_ips: vec!["10.0.1.0/24".parse().unwrap()],
            ..HeaderSpace::any()
        };
        assert!(!other.matches(&flow()));
    }

    #[test]
    fn test_alternatives() {
        let h = HeaderSpace {
            dst_ports: vec![ValueRange::new(443, 443), ValueRange::new(80, 80)],
            ..HeaderSpace::any()
        };
        assert!(h.matches(&flow()));
    }
}
