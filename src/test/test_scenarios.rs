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

//! End-to-end reachability scenarios over the example networks.

use crate::example_networks::{DeadEndNet, FirewallNet, LpmNet, SimpleNet};
use crate::forwarding::ForwardingGraph;
use crate::graph::BuildError;
use crate::model::{HeaderSpace, ValueRange};
use crate::query::{FlowDisposition, ForwardingAction, ReachabilityQuery};
use crate::Error;
use lazy_static::lazy_static;
use maplit::btreeset;
use std::net::Ipv4Addr;

lazy_static! {
    static ref FIREWALL: ForwardingGraph = {
        let (net, fib) = FirewallNet::build();
        ForwardingGraph::new(&net, &fib).unwrap()
    };
    static ref DEAD_END: ForwardingGraph = {
        let (net, fib) = DeadEndNet::build();
        ForwardingGraph::new(&net, &fib).unwrap()
    };
}

fn query(
    src: &str,
    dst: &str,
    headers: HeaderSpace,
    actions: &[ForwardingAction],
) -> ReachabilityQuery {
    ReachabilityQuery {
        headers,
        actions: actions.iter().copied().collect(),
        sources: btreeset![src.to_string()],
        destinations: btreeset![dst.to_string()],
    }
}

fn to_prefix(headers: HeaderSpace, dst: &str) -> HeaderSpace {
    HeaderSpace { dst_ips: vec![dst.parse().unwrap()], ..headers }
}

#[test]
fn test_chain_accepted() {
    super::init_logger();
    let (net, fib) = SimpleNet::build();
    let graph = ForwardingGraph::new(&net, &fib).unwrap();

    let q = query("r1", "r3", to_prefix(HeaderSpace::any(), "10.0.3.0/24"), &[
        ForwardingAction::Accept,
    ]);
    let answer = graph.reachable(&q).unwrap();
    assert_eq!(answer.disposition, FlowDisposition::Accepted);
    assert_eq!(answer.src_node, "r1");
    assert_eq!(answer.dst_node, "r3");
    assert_eq!(answer.hops.len(), 2);
    assert_eq!(answer.hops[0].node, "r1");
    assert_eq!(answer.hops[0].iface, "eth1");
    assert_eq!(answer.hops[1].peer, "r3");
    assert_eq!(answer.flow.dst_ip, Ipv4Addr::new(10, 0, 3, 0));
    assert!(q.headers.matches(&answer.flow));
}

#[test]
fn test_source_is_destination() {
    super::init_logger();
    let (net, fib) = SimpleNet::build();
    let graph = ForwardingGraph::new(&net, &fib).unwrap();

    let q = query("r1", "r1", HeaderSpace::any(), &[ForwardingAction::Accept]);
    let answer = graph.reachable(&q).unwrap();
    assert_eq!(answer.disposition, FlowDisposition::Accepted);
    assert!(answer.hops.is_empty());
    assert_eq!(answer.src_node, "r1");
    assert_eq!(answer.dst_node, "r1");
}

#[test]
fn test_longest_prefix_wins() {
    super::init_logger();
    let (net, fib) = LpmNet::build();
    let graph = ForwardingGraph::new(&net, &fib).unwrap();

    // 10.0.5.5 falls into the /16 and must leave through eth3 toward r3
    let q = ReachabilityQuery {
        headers: to_prefix(HeaderSpace::any(), "10.0.5.5/32"),
        actions: btreeset![ForwardingAction::Accept],
        sources: btreeset!["r1".to_string()],
        destinations: btreeset!["r2".to_string(), "r3".to_string()],
    };
    let answer = graph.reachable(&q).unwrap();
    assert_eq!(answer.disposition, FlowDisposition::Accepted);
    assert_eq!(answer.dst_node, "r3");
    assert_eq!(answer.hops[0].iface, "eth3");

    // 10.1.0.1 only matches the /8 and must leave through eth2 toward r2
    let q = ReachabilityQuery {
        headers: to_prefix(HeaderSpace::any(), "10.1.0.1/32"),
        actions: btreeset![ForwardingAction::Accept],
        sources: btreeset!["r1".to_string()],
        destinations: btreeset!["r2".to_string(), "r3".to_string()],
    };
    let answer = graph.reachable(&q).unwrap();
    assert_eq!(answer.dst_node, "r2");
    assert_eq!(answer.hops[0].iface, "eth2");
}

#[test]
fn test_acl_denies_blocked_source() {
    super::init_logger();
    let denied_headers = HeaderSpace {
        src_ips: vec!["10.0.0.0/24".parse().unwrap()],
        ..to_prefix(HeaderSpace::any(), "10.0.3.0/24")
    };

    // asking only for ACCEPT yields no witness: the inbound ACL denies everything
    let q = query("r1", "r3", denied_headers.clone(), &[ForwardingAction::Accept]);
    assert!(FIREWALL.reachable(&q).is_none());

    // asking for the inbound ACL drop yields the path into the checkpoint and on to the
    // drop node, with the responsible line in the note
    let q = query("r1", "r3", denied_headers, &[ForwardingAction::DropAclIn]);
    let answer = FIREWALL.reachable(&q).unwrap();
    assert_eq!(answer.disposition, FlowDisposition::DeniedIn);
    assert_eq!(answer.src_node, "r1");
    assert_eq!(answer.dst_node, "(none)");
    assert_eq!(answer.hops.len(), 2);
    assert_eq!(answer.hops[0].peer, "ACL-IN-r2-eth0-FW");
    assert_eq!(answer.hops[1].iface, "deny");
    assert_eq!(answer.note.as_deref(), Some("FW:block-lan"));
    assert!(answer.flow.src_ip >= Ipv4Addr::new(10, 0, 0, 0));
    assert!(answer.flow.src_ip <= Ipv4Addr::new(10, 0, 0, 255));
}

#[test]
fn test_acl_ordering_permits_other_sources() {
    super::init_logger();
    let q = query(
        "r1",
        "r3",
        HeaderSpace {
            src_ips: vec!["11.0.0.0/24".parse().unwrap()],
            ..to_prefix(HeaderSpace::any(), "10.0.3.0/24")
        },
        &[ForwardingAction::Accept],
    );
    let answer = FIREWALL.reachable(&q).unwrap();
    assert_eq!(answer.disposition, FlowDisposition::Accepted);
    assert_eq!(answer.dst_node, "r3");
    assert!(q.headers.matches(&answer.flow));
    // the accepted class must avoid the telnet port denied by the outbound ACL
    assert_ne!(answer.flow.dst_port, 23);
    // the path passes both checkpoints explicitly
    assert_eq!(answer.hops.len(), 4);
    assert_eq!(answer.hops[1].node, "ACL-IN-r2-eth0-FW");
    assert_eq!(answer.hops[3].node, "ACL-OUT-r2-eth1-EGRESS");
}

#[test]
fn test_outbound_acl_denies_telnet() {
    super::init_logger();
    let q = query(
        "r1",
        "r3",
        HeaderSpace {
            src_ips: vec!["11.0.0.0/24".parse().unwrap()],
            dst_ports: vec![ValueRange::single(23)],
            ..to_prefix(HeaderSpace::any(), "10.0.3.0/24")
        },
        &[ForwardingAction::DropAclOut],
    );
    let answer = FIREWALL.reachable(&q).unwrap();
    assert_eq!(answer.disposition, FlowDisposition::DeniedOut);
    assert_eq!(answer.dst_node, "(none)");
    assert_eq!(answer.flow.dst_port, 23);
    assert_eq!(answer.note.as_deref(), Some("EGRESS:no-telnet"));
}

#[test]
fn test_any_acl_flag_catches_both_directions() {
    super::init_logger();
    let denied_in = query(
        "r1",
        "r3",
        HeaderSpace {
            src_ips: vec!["10.0.0.0/24".parse().unwrap()],
            ..to_prefix(HeaderSpace::any(), "10.0.3.0/24")
        },
        &[ForwardingAction::DropAcl],
    );
    assert_eq!(
        FIREWALL.reachable(&denied_in).unwrap().disposition,
        FlowDisposition::DeniedIn
    );

    let denied_out = query(
        "r1",
        "r3",
        HeaderSpace {
            src_ips: vec!["11.0.0.0/24".parse().unwrap()],
            dst_ports: vec![ValueRange::single(23)],
            ..to_prefix(HeaderSpace::any(), "10.0.3.0/24")
        },
        &[ForwardingAction::DropAcl],
    );
    assert_eq!(
        FIREWALL.reachable(&denied_out).unwrap().disposition,
        FlowDisposition::DeniedOut
    );
}

#[test]
fn test_null_route() {
    super::init_logger();
    // the null-routed prefix answers NULL_ROUTED when that flag is requested
    let q = query("r1", "r2", to_prefix(HeaderSpace::any(), "10.1.0.0/16"), &[
        ForwardingAction::DropNullRoute,
    ]);
    let answer = DEAD_END.reachable(&q).unwrap();
    assert_eq!(answer.disposition, FlowDisposition::NullRouted);
    assert_eq!(answer.hops.len(), 1);
    assert_eq!(answer.hops[0].iface, "null_interface");
    assert_eq!(answer.dst_node, "(none)");

    // it is invisible to an accept-only query
    let q = query("r1", "r2", to_prefix(HeaderSpace::any(), "10.1.0.0/16"), &[
        ForwardingAction::Accept,
    ]);
    assert!(DEAD_END.reachable(&q).is_none());
}

#[test]
fn test_no_route_at_source() {
    super::init_logger();
    // no FIB entry at all for this prefix: r1 itself has no way to forward
    let q = query("r1", "r2", to_prefix(HeaderSpace::any(), "10.2.0.0/16"), &[
        ForwardingAction::DropNoRoute,
    ]);
    let answer = DEAD_END.reachable(&q).unwrap();
    assert_eq!(answer.disposition, FlowDisposition::NoRoute);
    assert!(answer.hops.is_empty());
    assert_eq!(answer.dst_node, "r1");

    // requesting only a null-route drop finds nothing: no null route exists here
    let q = query("r1", "r2", to_prefix(HeaderSpace::any(), "10.2.0.0/16"), &[
        ForwardingAction::DropNullRoute,
    ]);
    assert!(DEAD_END.reachable(&q).is_none());
}

#[test]
fn test_no_route_downstream() {
    super::init_logger();
    // r1 forwards 10.3.0.0/16 to r2, which has no route for it
    let q = query("r1", "r3", to_prefix(HeaderSpace::any(), "10.3.0.0/16"), &[
        ForwardingAction::DropNoRoute,
    ]);
    let answer = DEAD_END.reachable(&q).unwrap();
    assert_eq!(answer.disposition, FlowDisposition::NoRoute);
    assert_eq!(answer.hops.len(), 1);
    assert_eq!(answer.dst_node, "r2");
}

#[test]
fn test_generic_drop_flag() {
    super::init_logger();
    let q = query("r1", "r2", to_prefix(HeaderSpace::any(), "10.2.0.0/16"), &[
        ForwardingAction::Drop,
    ]);
    let answer = DEAD_END.reachable(&q).unwrap();
    assert_eq!(answer.disposition, FlowDisposition::NoRoute);
}

#[test]
fn test_unknown_node_names() {
    super::init_logger();
    // an unknown source empties the source set: no witness, not an error
    let q = query("ghost", "r2", HeaderSpace::any(), &[ForwardingAction::Accept]);
    assert!(DEAD_END.reachable(&q).is_none());

    // an unknown destination can never be reached
    let q = query("r1", "ghost", HeaderSpace::any(), &[ForwardingAction::Accept]);
    assert!(DEAD_END.reachable(&q).is_none());
}

#[test]
fn test_impossible_header_space() {
    super::init_logger();
    let q = query(
        "r1",
        "r2",
        HeaderSpace { dst_ports: vec![ValueRange::new(100, 50)], ..HeaderSpace::any() },
        &[ForwardingAction::Accept],
    );
    assert!(DEAD_END.reachable(&q).is_none());
}

#[test]
fn test_fib_for_unknown_device_is_fatal() {
    super::init_logger();
    let (net, mut fib) = SimpleNet::build();
    fib.add_entry("ghost", "10.0.0.0/8".parse().unwrap(), "eth0");
    match ForwardingGraph::new(&net, &fib) {
        Err(Error::BuildError(BuildError::UnknownDevice { device })) => {
            assert_eq!(device, "ghost")
        }
        other => panic!("expected a build error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_fib_for_unknown_interface_is_fatal() {
    super::init_logger();
    let (net, mut fib) = SimpleNet::build();
    fib.add_entry("r1", "10.9.0.0/16".parse().unwrap(), "eth9");
    match ForwardingGraph::new(&net, &fib) {
        Err(Error::BuildError(BuildError::UnknownFibInterface { device, iface })) => {
            assert_eq!(device, "r1");
            assert_eq!(iface, "eth9");
        }
        other => panic!("expected a build error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_determinism_same_seed() {
    super::init_logger();
    let (net, fib) = FirewallNet::build();
    let first = ForwardingGraph::with_seed(&net, &fib, 7).unwrap();
    let second = ForwardingGraph::with_seed(&net, &fib, 7).unwrap();

    // identical alpha-index assignment
    assert_eq!(first.num_classes(), second.num_classes());
    assert_eq!(first.table().classes(), second.table().classes());

    // identical answers, witness included
    let q = query(
        "r1",
        "r3",
        HeaderSpace {
            src_ips: vec!["10.0.0.0/24".parse().unwrap()],
            ..to_prefix(HeaderSpace::any(), "10.0.3.0/24")
        },
        &[ForwardingAction::DropAclIn],
    );
    let a = first.reachable(&q).unwrap();
    let b = second.reachable(&q).unwrap();
    assert_eq!(a.disposition, b.disposition);
    assert_eq!(a.flow, b.flow);
    assert_eq!(a.hops, b.hops);
    assert_eq!(a.note, b.note);
}

#[test]
fn test_seed_does_not_change_semantics() {
    super::init_logger();
    let (net, fib) = FirewallNet::build();
    let first = ForwardingGraph::with_seed(&net, &fib, 7).unwrap();
    let second = ForwardingGraph::with_seed(&net, &fib, 99).unwrap();

    let accepted = query(
        "r1",
        "r3",
        HeaderSpace {
            src_ips: vec!["11.0.0.0/24".parse().unwrap()],
            ..to_prefix(HeaderSpace::any(), "10.0.3.0/24")
        },
        &[ForwardingAction::Accept],
    );
    let denied = query(
        "r1",
        "r3",
        HeaderSpace {
            src_ips: vec!["10.0.0.0/24".parse().unwrap()],
            ..to_prefix(HeaderSpace::any(), "10.0.3.0/24")
        },
        &[ForwardingAction::Accept, ForwardingAction::DropAclIn],
    );
    for graph in &[&first, &second] {
        assert_eq!(
            graph.reachable(&accepted).unwrap().disposition,
            FlowDisposition::Accepted
        );
        assert_eq!(graph.reachable(&denied).unwrap().disposition, FlowDisposition::DeniedIn);
    }
}
