use std::collections::HashMap;

use super::types::{TopologyLink, TopologyNode};

/// Parent/children maps derived from a node and link list.
///
/// Built in one pass over each list. Children keep link order, roots keep node
/// order. Links whose endpoints are unknown are skipped; [`super::TopologyGraph`]
/// rejects them before an index is ever built.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Adjacency {
	children: HashMap<String, Vec<String>>,
	parents: HashMap<String, Option<String>>,
	roots: Vec<String>,
}

impl Adjacency {
	/// Index `links` over `nodes`. Pure; the same input gives the same index.
	pub fn build(nodes: &[TopologyNode], links: &[TopologyLink]) -> Self {
		let mut children: HashMap<String, Vec<String>> = HashMap::with_capacity(nodes.len());
		let mut parents: HashMap<String, Option<String>> = HashMap::with_capacity(nodes.len());
		for node in nodes {
			children.insert(node.id.clone(), Vec::new());
			parents.insert(node.id.clone(), None);
		}

		for link in links {
			if !children.contains_key(&link.target) {
				continue;
			}
			let Some(kids) = children.get_mut(&link.source) else {
				continue;
			};
			kids.push(link.target.clone());
			// First parent wins; a second incoming link is a validation error.
			if let Some(slot) = parents.get_mut(&link.target).filter(|p| p.is_none()) {
				*slot = Some(link.source.clone());
			}
		}

		let roots = nodes
			.iter()
			.filter(|n| matches!(parents.get(&n.id), Some(None)))
			.map(|n| n.id.clone())
			.collect();

		Self {
			children,
			parents,
			roots,
		}
	}

	/// Ordered children of `id`, empty for leaves and unknown ids.
	pub fn children(&self, id: &str) -> &[String] {
		self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Parent of `id`, `None` for roots and unknown ids.
	pub fn parent(&self, id: &str) -> Option<&str> {
		self.parents.get(id).and_then(|p| p.as_deref())
	}

	/// Whether `id` has at least one child.
	pub fn has_children(&self, id: &str) -> bool {
		!self.children(id).is_empty()
	}

	/// Nodes with no incoming link, in node-list order.
	pub fn roots(&self) -> &[String] {
		&self.roots
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::topology::fixtures::{link, node, scenario};
	use crate::components::topology::types::{DeviceType, Status};

	#[test]
	fn roots_have_no_parent() {
		let data = scenario();
		let adj = Adjacency::build(&data.nodes, &data.links);
		assert_eq!(adj.roots(), ["R".to_string()]);
		for root in adj.roots() {
			assert_eq!(adj.parent(root), None);
		}
		assert_eq!(adj.parent("b1"), Some("B"));
		assert_eq!(adj.children("R"), ["A".to_string(), "B".to_string()]);
		assert!(adj.children("A").is_empty());
		assert!(adj.has_children("B"));
		assert!(!adj.has_children("missing"));
	}

	#[test]
	fn every_node_has_at_most_one_incoming_link() {
		let data = scenario();
		let adj = Adjacency::build(&data.nodes, &data.links);
		for n in &data.nodes {
			let incoming = data.links.iter().filter(|l| l.target == n.id).count();
			assert!(incoming <= 1);
			assert_eq!(adj.parent(&n.id).is_some(), incoming == 1);
		}
	}

	#[test]
	fn rebuilding_is_idempotent() {
		let data = scenario();
		let first = Adjacency::build(&data.nodes, &data.links);
		let second = Adjacency::build(&data.nodes, &data.links);
		assert_eq!(first, second);
	}

	#[test]
	fn roots_follow_node_order() {
		let nodes = vec![
			node("z", DeviceType::MasterUnit, Status::Online),
			node("a", DeviceType::MasterUnit, Status::Online),
			node("c", DeviceType::RemoteLow, Status::Online),
		];
		let links = vec![link("a", "c")];
		let adj = Adjacency::build(&nodes, &links);
		assert_eq!(adj.roots(), ["z".to_string(), "a".to_string()]);
	}
}
