use std::collections::HashSet;

use log::debug;

use super::graph::TopologyGraph;
use super::types::{DeviceType, Status, TopologyNode};

/// Every node below `id`, depth-first in child order, excluding `id`.
pub fn descendants(graph: &TopologyGraph, id: &str) -> Vec<String> {
	let mut out = Vec::new();
	let mut stack: Vec<&String> = graph.children(id).iter().rev().collect();
	while let Some(next) = stack.pop() {
		out.push(next.clone());
		stack.extend(graph.children(next).iter().rev());
	}
	out
}

/// Union of the descendants of every collapsed node.
pub fn hidden_set(graph: &TopologyGraph, collapsed: &HashSet<String>) -> HashSet<String> {
	let mut hidden = HashSet::new();
	for id in collapsed {
		// Already covered by a collapsed ancestor.
		if hidden.contains(id) {
			continue;
		}
		hidden.extend(descendants(graph, id));
	}
	hidden
}

/// One filter dimension parsed from its select value.
#[derive(Clone, Debug, PartialEq)]
pub enum Criterion<T> {
	/// `"All"` or empty.
	Any,
	/// Only this value.
	Is(T),
	/// A value that names nothing; matches no node.
	Unknown(String),
}

impl<T> Default for Criterion<T> {
	fn default() -> Self {
		Criterion::Any
	}
}

impl<T: PartialEq> Criterion<T> {
	fn parse(value: &str, lookup: impl Fn(&str) -> Option<T>) -> Self {
		let value = value.trim();
		if value.is_empty() || value.eq_ignore_ascii_case("all") {
			return Criterion::Any;
		}
		match lookup(value) {
			Some(v) => Criterion::Is(v),
			None => {
				debug!("filter value {value:?} matches nothing");
				Criterion::Unknown(value.to_string())
			}
		}
	}

	fn accepts(&self, value: &T) -> bool {
		match self {
			Criterion::Any => true,
			Criterion::Is(v) => v == value,
			Criterion::Unknown(_) => false,
		}
	}
}

/// Search, status and type predicate applied to visible nodes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeFilter {
	search: String,
	status: Criterion<Status>,
	kind: Criterion<DeviceType>,
}

impl NodeFilter {
	/// Build from raw widget values.
	///
	/// The search text is trimmed and lowercased, so a query of only
	/// whitespace disables it. `status` and `kind` take `"All"`, a status name
	/// or a type label.
	pub fn new(search: &str, status: &str, kind: &str) -> Self {
		Self {
			search: search.trim().to_lowercase(),
			status: Criterion::parse(status, Status::from_name),
			kind: Criterion::parse(kind, DeviceType::from_label),
		}
	}

	/// True when every node passes.
	pub fn is_empty(&self) -> bool {
		self.search.is_empty() && self.status == Criterion::Any && self.kind == Criterion::Any
	}

	/// All three criteria hold for `node`.
	pub fn matches(&self, node: &TopologyNode) -> bool {
		self.matches_search(node) && self.status.accepts(&node.status) && self.kind.accepts(&node.kind)
	}

	fn matches_search(&self, node: &TopologyNode) -> bool {
		if self.search.is_empty() {
			return true;
		}
		let haystacks = [
			Some(node.label.as_str()),
			node.attrs.location.as_deref(),
			node.attrs.band.as_deref(),
			Some(node.kind.meta().description),
		];
		haystacks
			.into_iter()
			.flatten()
			.any(|h| h.to_lowercase().contains(&self.search))
	}
}

/// What survives collapse-hiding and filtering.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Visibility {
	/// Ids inside a collapsed subtree.
	pub hidden: HashSet<String>,
	/// Drawn nodes, in graph order.
	pub nodes: Vec<String>,
	/// Indices into the graph's link list.
	pub links: Vec<usize>,
	shown: HashSet<String>,
}

impl Visibility {
	/// Hide collapsed subtrees, then keep nodes passing `filter` and links
	/// whose ends both survived.
	pub fn compute(graph: &TopologyGraph, collapsed: &HashSet<String>, filter: &NodeFilter) -> Self {
		let hidden = hidden_set(graph, collapsed);
		let nodes: Vec<String> = graph
			.nodes()
			.iter()
			.filter(|n| !hidden.contains(&n.id) && filter.matches(n))
			.map(|n| n.id.clone())
			.collect();
		let shown: HashSet<String> = nodes.iter().cloned().collect();
		let links = graph
			.links()
			.iter()
			.enumerate()
			.filter(|(_, l)| shown.contains(&l.source) && shown.contains(&l.target))
			.map(|(i, _)| i)
			.collect();
		Self {
			hidden,
			nodes,
			links,
			shown,
		}
	}

	/// Whether `id` is drawn.
	pub fn is_shown(&self, id: &str) -> bool {
		self.shown.contains(id)
	}
}

#[cfg(test)]
mod tests {
	use std::collections::VecDeque;

	use super::*;
	use crate::components::topology::fixtures::{graph, scenario, ten_nodes};

	// Independent breadth-first reference straight off the link list.
	fn reference_descendants(graph: &TopologyGraph, id: &str) -> HashSet<String> {
		let mut out = HashSet::new();
		let mut queue = VecDeque::from([id.to_string()]);
		while let Some(cur) = queue.pop_front() {
			for l in graph.links().iter().filter(|l| l.source == cur) {
				if out.insert(l.target.clone()) {
					queue.push_back(l.target.clone());
				}
			}
		}
		out
	}

	fn set(ids: &[&str]) -> HashSet<String> {
		ids.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn descendants_are_depth_first_and_exclude_the_start() {
		let g = graph(ten_nodes());
		assert_eq!(descendants(&g, "H1"), ["E1", "r1", "r2", "r3", "r5"]);
		assert!(descendants(&g, "r4").is_empty());
	}

	#[test]
	fn hidden_matches_reference_traversal() {
		let g = graph(ten_nodes());
		for n in g.nodes() {
			let hidden = hidden_set(&g, &set(&[n.id.as_str()]));
			assert_eq!(hidden, reference_descendants(&g, &n.id), "collapsing {}", n.id);
		}
	}

	#[test]
	fn nested_collapses_union() {
		let g = graph(ten_nodes());
		let hidden = hidden_set(&g, &set(&["E1", "H1", "H2"]));
		assert_eq!(hidden, set(&["E1", "r1", "r2", "r3", "r5", "r4", "r6"]));
	}

	#[test]
	fn toggling_twice_restores_hidden() {
		let g = graph(ten_nodes());
		let mut collapsed = set(&["H2"]);
		let before = hidden_set(&g, &collapsed);
		collapsed.insert("E1".into());
		assert_ne!(hidden_set(&g, &collapsed), before);
		collapsed.remove("E1");
		assert_eq!(hidden_set(&g, &collapsed), before);
	}

	#[test]
	fn collapse_and_filter_intersect() {
		let g = graph(ten_nodes());
		let collapsed = set(&["E1"]);
		let vis = Visibility::compute(&g, &collapsed, &NodeFilter::new("", "offline", "All"));

		assert_eq!(vis.hidden.len(), 3);
		let remaining: Vec<_> = g.nodes().iter().filter(|n| !vis.hidden.contains(&n.id)).collect();
		assert_eq!(remaining.len(), 7);
		let expected = remaining.iter().filter(|n| n.status == Status::Offline).count();
		assert_eq!(vis.nodes.len(), expected);
		assert_eq!(vis.nodes, ["H2", "r4", "r5"]);
		// Only H2 -> r4 has both ends offline and visible.
		assert_eq!(vis.links.len(), 1);
		assert_eq!(g.links()[vis.links[0]].target, "r4");
	}

	#[test]
	fn unmatched_search_empties_the_scene_but_not_hidden() {
		let g = graph(ten_nodes());
		let collapsed = set(&["E1"]);
		let all = Visibility::compute(&g, &collapsed, &NodeFilter::default());
		let none = Visibility::compute(&g, &collapsed, &NodeFilter::new("zzz", "All", "All"));
		assert!(none.nodes.is_empty());
		assert!(none.links.is_empty());
		assert_eq!(none.hidden, all.hidden);
	}

	#[test]
	fn search_covers_label_location_band_and_description() {
		let mut data = scenario();
		data.nodes[1].attrs.location = Some("Level 3 East".into());
		data.nodes[3].attrs.band = Some("AWS-1700".into());
		let g = graph(data);
		let ids = |q: &str| Visibility::compute(&g, &HashSet::new(), &NodeFilter::new(q, "All", "All")).nodes;

		assert_eq!(ids("level 3"), ["A"]);
		assert_eq!(ids("aws"), ["b1"]);
		assert_eq!(ids("EXPANSION"), ["B"]);
		assert_eq!(ids("b2"), ["b2"]);
	}

	#[test]
	fn blank_search_matches_everything() {
		let g = graph(ten_nodes());
		let blank = NodeFilter::new("   ", "All", "All");
		assert!(blank.is_empty());
		assert_eq!(blank, NodeFilter::default());
		let vis = Visibility::compute(&g, &HashSet::new(), &blank);
		assert_eq!(vis.nodes.len(), g.len());

		let padded = Visibility::compute(&g, &HashSet::new(), &NodeFilter::new("  r6 ", "All", "All"));
		assert_eq!(padded.nodes, ["r6"]);
	}

	#[test]
	fn type_and_status_criteria() {
		let g = graph(ten_nodes());
		let none = HashSet::new();
		let heu = Visibility::compute(&g, &none, &NodeFilter::new("", "All", "HEU"));
		assert_eq!(heu.nodes, ["H1", "H2"]);
		let degraded_rl = Visibility::compute(&g, &none, &NodeFilter::new("", "Degraded", "ru-l"));
		assert_eq!(degraded_rl.nodes, ["r6"]);
		let bogus = Visibility::compute(&g, &none, &NodeFilter::new("", "rebooting", "All"));
		assert!(bogus.nodes.is_empty());
	}

	#[test]
	fn filtering_never_reveals_hidden_nodes() {
		let g = graph(ten_nodes());
		let vis = Visibility::compute(&g, &set(&["H1"]), &NodeFilter::new("r", "All", "All"));
		for id in &vis.nodes {
			assert!(!vis.hidden.contains(id));
		}
		assert!(!vis.is_shown("r1"));
	}
}
