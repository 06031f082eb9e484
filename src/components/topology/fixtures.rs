//! Small hand-built graphs shared by the unit tests.

use super::graph::TopologyGraph;
use super::types::{DeviceType, NodeAttributes, Status, TopologyData, TopologyLink, TopologyNode};

pub fn node(id: &str, kind: DeviceType, status: Status) -> TopologyNode {
	TopologyNode {
		id: id.to_string(),
		kind,
		label: id.to_string(),
		status,
		attrs: NodeAttributes::default(),
	}
}

pub fn link(source: &str, target: &str) -> TopologyLink {
	TopologyLink {
		source: source.to_string(),
		target: target.to_string(),
		medium: "fiber".to_string(),
		label: None,
	}
}

/// `R -> {A, B -> {b1, b2}}`
pub fn scenario() -> TopologyData {
	TopologyData {
		nodes: vec![
			node("R", DeviceType::MasterUnit, Status::Online),
			node("A", DeviceType::RemoteLow, Status::Online),
			node("B", DeviceType::ExpansionUnit, Status::Degraded),
			node("b1", DeviceType::RemoteMid, Status::Online),
			node("b2", DeviceType::RemoteHigh, Status::Offline),
		],
		links: vec![link("R", "A"), link("R", "B"), link("B", "b1"), link("B", "b2")],
	}
}

/// Ten nodes; `E1` has exactly three descendants.
///
/// ```text
/// M ── H1 ── E1 ── r1, r2, r3
///   │     └─ r5
///   └─ H2 ── r4, r6
/// ```
pub fn ten_nodes() -> TopologyData {
	use DeviceType::*;
	use Status::*;
	TopologyData {
		nodes: vec![
			node("M", MasterUnit, Online),
			node("H1", HeadEndUnit, Online),
			node("H2", HeadEndUnit, Offline),
			node("E1", ExpansionUnit, Degraded),
			node("r1", RemoteLow, Offline),
			node("r2", RemoteLow, Online),
			node("r3", RemoteMid, Offline),
			node("r4", RemoteHigh, Offline),
			node("r5", RemoteMid, Offline),
			node("r6", RemoteLow, Degraded),
		],
		links: vec![
			link("M", "H1"),
			link("M", "H2"),
			link("H1", "E1"),
			link("H1", "r5"),
			link("E1", "r1"),
			link("E1", "r2"),
			link("E1", "r3"),
			link("H2", "r4"),
			link("H2", "r6"),
		],
	}
}

pub fn graph(data: TopologyData) -> TopologyGraph {
	TopologyGraph::new(data).expect("fixture graph is valid")
}
