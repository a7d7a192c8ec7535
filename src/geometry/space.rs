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

//! # Geometric spaces
//!
//! The field layout of the header space, and the conversion of ACL lines and header-space
//! predicates into unions of hyperrectangles. A [`GeometricSpace`] is such a union; an empty
//! union means "matches nothing".

use super::rectangle::HyperRectangle;
use crate::model::{AclLine, Flow, HeaderSpace, TcpFlags, TcpFlagsMatch};
use std::net::Ipv4Addr;

/// Destination IP address dimension
pub const FIELD_DST_IP: usize = 0;
/// Source IP address dimension
pub const FIELD_SRC_IP: usize = 1;
/// Destination transport port dimension
pub const FIELD_DST_PORT: usize = 2;
/// Source transport port dimension
pub const FIELD_SRC_PORT: usize = 3;
/// IP protocol number dimension
pub const FIELD_IP_PROTO: usize = 4;
/// ICMP type dimension
pub const FIELD_ICMP_TYPE: usize = 5;
/// ICMP code dimension
pub const FIELD_ICMP_CODE: usize = 6;
/// First of the eight TCP flag dimensions, in the order cwr, ece, urg, ack, psh, rst, syn, fin.
/// Each spans `{0, 1}`.
pub const FIELD_TCP_FLAGS: usize = 7;
/// Total number of dimensions of the header space
pub const NUM_FIELDS: usize = 15;

/// Exclusive upper bound of every dimension's domain
const FIELD_DOMAIN: [u64; NUM_FIELDS] = [
    1 << 32, // dst ip
    1 << 32, // src ip
    1 << 16, // dst port
    1 << 16, // src port
    1 << 8,  // ip protocol
    1 << 8,  // icmp type
    1 << 8,  // icmp code
    2,
    2,
    2,
    2,
    2,
    2,
    2,
    2,
];

/// The maximal rectangle: every dimension spans its full domain.
pub fn full_space() -> HyperRectangle {
    HyperRectangle::new([0u64; NUM_FIELDS], FIELD_DOMAIN)
}

/// A union of hyperrectangles, produced by converting an ACL line or a header-space predicate.
///
/// The rectangles need not be disjoint. An empty union signals that the predicate matches no
/// packet at all (for example, a port range with its bounds reversed).
#[derive(Debug, Clone, PartialEq)]
pub struct GeometricSpace {
    rects: Vec<HyperRectangle>,
}

impl GeometricSpace {
    /// The space covering every packet header.
    pub fn full() -> Self {
        Self { rects: vec![full_space()] }
    }

    /// The rectangles making up this space.
    pub fn rectangles(&self) -> &[HyperRectangle] {
        &self.rects
    }

    /// Returns true if the space matches no packet.
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Convert the match predicate of one ACL line into the space of headers it matches.
    pub fn from_acl(line: &AclLine) -> Self {
        Self::from_header_space(&line.headers)
    }

    /// Convert a header-space predicate into a union of rectangles. Every unconstrained field
    /// spans its full domain; a field constrained to an empty set of values empties the whole
    /// space.
    ///
    /// The expansion works dimension by dimension over an explicit work list: each constrained
    /// field multiplies the current rectangles by its allowed intervals.
    pub fn from_header_space(h: &HeaderSpace) -> Self {
        let mut rects = vec![full_space()];

        let dst_ips: Vec<(u64, u64)> = h.dst_ips.iter().map(|p| p.range()).collect();
        rects = expand_dim(rects, FIELD_DST_IP, &dst_ips);
        let src_ips: Vec<(u64, u64)> = h.src_ips.iter().map(|p| p.range()).collect();
        rects = expand_dim(rects, FIELD_SRC_IP, &src_ips);

        let dst_ports: Vec<(u64, u64)> = h.dst_ports.iter().map(|r| r.bounds()).collect();
        rects = expand_dim(rects, FIELD_DST_PORT, &dst_ports);
        let src_ports: Vec<(u64, u64)> = h.src_ports.iter().map(|r| r.bounds()).collect();
        rects = expand_dim(rects, FIELD_SRC_PORT, &src_ports);

        let protos: Vec<(u64, u64)> =
            h.ip_protocols.iter().map(|p| (*p as u64, *p as u64 + 1)).collect();
        rects = expand_dim(rects, FIELD_IP_PROTO, &protos);

        let icmp_types: Vec<(u64, u64)> = h.icmp_types.iter().map(|r| r.bounds()).collect();
        rects = expand_dim(rects, FIELD_ICMP_TYPE, &icmp_types);
        let icmp_codes: Vec<(u64, u64)> = h.icmp_codes.iter().map(|r| r.bounds()).collect();
        rects = expand_dim(rects, FIELD_ICMP_CODE, &icmp_codes);

        if !h.tcp_flags.is_empty() {
            rects = expand_tcp_flags(rects, &h.tcp_flags);
        }

        Self { rects }
    }

    /// Deterministically pick one representative flow out of a rectangle: the flow at its low
    /// corner. Used to synthesize the concrete witness of a reachability answer.
    pub fn example(rect: &HyperRectangle) -> Flow {
        let p = rect.low_corner();
        Flow {
            dst_ip: Ipv4Addr::from(p[FIELD_DST_IP] as u32),
            src_ip: Ipv4Addr::from(p[FIELD_SRC_IP] as u32),
            dst_port: p[FIELD_DST_PORT] as u16,
            src_port: p[FIELD_SRC_PORT] as u16,
            ip_protocol: p[FIELD_IP_PROTO] as u8,
            icmp_type: p[FIELD_ICMP_TYPE] as u8,
            icmp_code: p[FIELD_ICMP_CODE] as u8,
            tcp_flags: TcpFlags {
                cwr: p[FIELD_TCP_FLAGS] != 0,
                ece: p[FIELD_TCP_FLAGS + 1] != 0,
                urg: p[FIELD_TCP_FLAGS + 2] != 0,
                ack: p[FIELD_TCP_FLAGS + 3] != 0,
                psh: p[FIELD_TCP_FLAGS + 4] != 0,
                rst: p[FIELD_TCP_FLAGS + 5] != 0,
                syn: p[FIELD_TCP_FLAGS + 6] != 0,
                fin: p[FIELD_TCP_FLAGS + 7] != 0,
            },
        }
    }
}

/// Multiply the current rectangles by the allowed intervals of one dimension. An empty interval
/// list leaves the dimension unconstrained; intervals are clamped to the dimension's domain and
/// intervals that come out empty are skipped.
fn expand_dim(
    rects: Vec<HyperRectangle>,
    dim: usize,
    intervals: &[(u64, u64)],
) -> Vec<HyperRectangle> {
    if intervals.is_empty() {
        return rects;
    }
    let mut out = Vec::with_capacity(rects.len() * intervals.len());
    for rect in &rects {
        for &(lo, hi) in intervals {
            let lo = lo.max(rect.low()[dim]);
            let hi = hi.min(rect.high()[dim]);
            if lo >= hi {
                continue;
            }
            let mut piece = rect.clone();
            let mut new_lo = *piece.low();
            let mut new_hi = *piece.high();
            new_lo[dim] = lo;
            new_hi[dim] = hi;
            piece.set_bounds(new_lo, new_hi);
            out.push(piece);
        }
    }
    out
}

/// Multiply the current rectangles by the TCP flag alternatives. Each alternative pins the
/// flag dimensions it constrains to a single value and leaves the others free.
fn expand_tcp_flags(
    rects: Vec<HyperRectangle>,
    alternatives: &[TcpFlagsMatch],
) -> Vec<HyperRectangle> {
    let mut out = Vec::with_capacity(rects.len() * alternatives.len());
    for rect in &rects {
        for alt in alternatives {
            let mut new_lo = *rect.low();
            let mut new_hi = *rect.high();
            let flags = [
                alt.cwr, alt.ece, alt.urg, alt.ack, alt.psh, alt.rst, alt.syn, alt.fin,
            ];
            for (i, flag) in flags.iter().enumerate() {
                if let Some(value) = flag {
                    let v = *value as u64;
                    new_lo[FIELD_TCP_FLAGS + i] = v;
                    new_hi[FIELD_TCP_FLAGS + i] = v + 1;
                }
            }
            let mut piece = rect.clone();
            piece.set_bounds(new_lo, new_hi);
            out.push(piece);
        }
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{Ipv4Prefix, ValueRange};

    #[test]
    fn test_full_space_is_nonempty() {
        let full = full_space();
        assert!(!full.is_empty());
        assert_eq!(full.low()[FIELD_DST_IP], 0);
        assert_eq!(full.high()[FIELD_DST_IP], 1 << 32);
        assert_eq!(full.high()[FIELD_TCP_FLAGS + 7], 2);
    }

    #[test]
    fn test_single_prefix() {
        let h = HeaderSpace {
            dst_ips: vec!["10.0.0.0/8".parse::<Ipv4Prefix>().unwrap()],
            ..HeaderSpace::any()
        };
        let space = GeometricSpace::from_header_space(&h);
        assert_eq!(space.rectangles().len(), 1);
        let rect = &space.rectangles()[0];
        assert_eq!(rect.low()[FIELD_DST_IP], u64::from(u32::from(Ipv4Addr::new(10, 0, 0, 0))));
        assert_eq!(rect.high()[FIELD_DST_IP], u64::from(u32::from(Ipv4Addr::new(11, 0, 0, 0))));
        // unconstrained fields stay full
        assert_eq!(rect.low()[FIELD_SRC_IP], 0);
        assert_eq!(rect.high()[FIELD_SRC_IP], 1 << 32);
    }

    #[test]
    fn test_cross_product() {
        let h = HeaderSpace {
            dst_ips: vec![
                "10.0.0.0/24".parse::<Ipv4Prefix>().unwrap(),
                "10.0.1.0/24".parse::<Ipv4Prefix>().unwrap(),
            ],
            dst_ports: vec![ValueRange::new(80, 80), ValueRange::new(443, 443)],
            ip_protocols: vec![6],
            ..HeaderSpace::any()
        };
        let space = GeometricSpace::from_header_space(&h);
        assert_eq!(space.rectangles().len(), 4);
        for rect in space.rectangles() {
            assert_eq!(rect.low()[FIELD_IP_PROTO], 6);
            assert_eq!(rect.high()[FIELD_IP_PROTO], 7);
        }
    }

    #[test]
    fn test_impossible_predicate_is_empty() {
        let h = HeaderSpace {
            // an inverted range matches nothing
            dst_ports: vec![ValueRange::new(100, 50)],
            ..HeaderSpace::any()
        };
        let space = GeometricSpace::from_header_space(&h);
        assert!(space.is_empty());
    }

    #[test]
    fn test_tcp_flag_alternatives() {
        let h = HeaderSpace {
            tcp_flags: vec![
                TcpFlagsMatch { syn: Some(true), ack: Some(false), ..TcpFlagsMatch::any() },
                TcpFlagsMatch { rst: Some(true), ..TcpFlagsMatch::any() },
            ],
            ..HeaderSpace::any()
        };
        let space = GeometricSpace::from_header_space(&h);
        assert_eq!(space.rectangles().len(), 2);
        let syn = &space.rectangles()[0];
        assert_eq!(syn.low()[FIELD_TCP_FLAGS + 6], 1);
        assert_eq!(syn.high()[FIELD_TCP_FLAGS + 6], 2);
        assert_eq!(syn.low()[FIELD_TCP_FLAGS + 3], 0);
        assert_eq!(syn.high()[FIELD_TCP_FLAGS + 3], 1);
        // the second alternative leaves syn unconstrained
        let rst = &space.rectangles()[1];
        assert_eq!(rst.low()[FIELD_TCP_FLAGS + 6], 0);
        assert_eq!(rst.high()[FIELD_TCP_FLAGS + 6], 2);
    }

    #[test]
    fn test_example_flow() {
        let h = HeaderSpace {
            dst_ips: vec!["10.0.1.0/24".parse::<Ipv4Prefix>().unwrap()],
            dst_ports: vec![ValueRange::new(80, 80)],
            ip_protocols: vec![6],
            ..HeaderSpace::any()
        };
        let space = GeometricSpace::from_header_space(&h);
        let flow = GeometricSpace::example(&space.rectangles()[0]);
        assert_eq!(flow.dst_ip, Ipv4Addr::new(10, 0, 1, 0));
        assert_eq!(flow.dst_port, 80);
        assert_eq!(flow.ip_protocol, 6);
        assert!(h.matches(&flow));
    }
}
