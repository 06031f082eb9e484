use std::collections::{HashMap, HashSet};

use log::{info, warn};
use thiserror::Error;

use super::adjacency::Adjacency;
use super::types::{TopologyData, TopologyLink, TopologyNode};

/// Reasons a [`TopologyData`] cannot be turned into a [`TopologyGraph`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GraphError {
	/// Two nodes share an id.
	#[error("duplicate node id `{0}`")]
	DuplicateNode(String),
	/// A link points at a node that does not exist.
	#[error("link #{link} references unknown node `{id}`")]
	UnknownEndpoint {
		/// Index of the offending link.
		link: usize,
		/// The missing id.
		id: String,
	},
	/// A node has more than one incoming link.
	#[error("node `{node}` has two parents: `{first}` and `{second}`")]
	MultipleParents {
		/// The child.
		node: String,
		/// Parent from the earlier link.
		first: String,
		/// Parent from the later link.
		second: String,
	},
	/// A node cannot be reached from any root.
	#[error("node `{0}` is part of a cycle")]
	Cycle(String),
}

/// Validated, immutable equipment forest with its adjacency index.
#[derive(Clone, Debug)]
pub struct TopologyGraph {
	nodes: Vec<TopologyNode>,
	links: Vec<TopologyLink>,
	index: HashMap<String, usize>,
	adjacency: Adjacency,
}

impl TopologyGraph {
	/// Validate `data` and build its index.
	///
	/// Every node must have at most one parent, every link must name known
	/// nodes, and every node must be reachable from a root.
	pub fn new(data: TopologyData) -> Result<Self, GraphError> {
		let TopologyData { nodes, links } = data;

		let mut index = HashMap::with_capacity(nodes.len());
		for (i, node) in nodes.iter().enumerate() {
			if index.insert(node.id.clone(), i).is_some() {
				warn!("rejecting topology: duplicate node {}", node.id);
				return Err(GraphError::DuplicateNode(node.id.clone()));
			}
		}

		let mut parent_of: HashMap<&str, &str> = HashMap::with_capacity(links.len());
		for (i, link) in links.iter().enumerate() {
			for id in [&link.source, &link.target] {
				if !index.contains_key(id) {
					warn!("rejecting topology: link {} -> {} is dangling", link.source, link.target);
					return Err(GraphError::UnknownEndpoint {
						link: i,
						id: id.clone(),
					});
				}
			}
			if let Some(first) = parent_of.insert(&link.target, &link.source) {
				return Err(GraphError::MultipleParents {
					node: link.target.clone(),
					first: first.to_string(),
					second: link.source.clone(),
				});
			}
		}

		let adjacency = Adjacency::build(&nodes, &links);
		check_reachable(&nodes, &adjacency)?;

		info!("topology built: {} nodes, {} links", nodes.len(), links.len());
		Ok(Self {
			nodes,
			links,
			index,
			adjacency,
		})
	}

	/// Nodes in their original order.
	pub fn nodes(&self) -> &[TopologyNode] {
		&self.nodes
	}

	/// Links in their original order.
	pub fn links(&self) -> &[TopologyLink] {
		&self.links
	}

	/// Look up a node by id.
	pub fn node(&self, id: &str) -> Option<&TopologyNode> {
		self.index.get(id).map(|&i| &self.nodes[i])
	}

	/// The parent/children index.
	pub fn adjacency(&self) -> &Adjacency {
		&self.adjacency
	}

	/// Shorthand for [`Adjacency::children`].
	pub fn children(&self, id: &str) -> &[String] {
		self.adjacency.children(id)
	}

	/// Shorthand for [`Adjacency::has_children`].
	pub fn has_children(&self, id: &str) -> bool {
		self.adjacency.has_children(id)
	}

	/// Number of nodes.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// True for a graph without nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

// With at most one parent per node, any node missing from a walk down from the
// roots sits on a parent cycle.
fn check_reachable(nodes: &[TopologyNode], adjacency: &Adjacency) -> Result<(), GraphError> {
	let mut seen: HashSet<&str> = HashSet::with_capacity(nodes.len());
	let mut stack: Vec<&str> = adjacency.roots().iter().map(String::as_str).collect();
	while let Some(id) = stack.pop() {
		if seen.insert(id) {
			stack.extend(adjacency.children(id).iter().map(String::as_str));
		}
	}
	match nodes.iter().find(|n| !seen.contains(n.id.as_str())) {
		Some(n) => {
			warn!("rejecting topology: {} is unreachable from any root", n.id);
			Err(GraphError::Cycle(n.id.clone()))
		}
		None => Ok(()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::topology::fixtures::{link, node, scenario, ten_nodes};
	use crate::components::topology::types::{DeviceType, Status};

	#[test]
	fn accepts_a_forest() {
		let graph = TopologyGraph::new(ten_nodes()).unwrap();
		assert_eq!(graph.len(), 10);
		assert_eq!(graph.adjacency().roots(), ["M".to_string()]);
		assert_eq!(graph.node("E1").map(|n| n.status), Some(Status::Degraded));
		assert!(graph.node("nope").is_none());
	}

	#[test]
	fn rejects_duplicate_ids() {
		let mut data = scenario();
		data.nodes.push(node("A", DeviceType::RemoteLow, Status::Online));
		assert_eq!(
			TopologyGraph::new(data).unwrap_err(),
			GraphError::DuplicateNode("A".into())
		);
	}

	#[test]
	fn rejects_dangling_links() {
		let mut data = scenario();
		data.links.push(link("B", "ghost"));
		assert_eq!(
			TopologyGraph::new(data).unwrap_err(),
			GraphError::UnknownEndpoint {
				link: 4,
				id: "ghost".into()
			}
		);
	}

	#[test]
	fn rejects_second_parent() {
		let mut data = scenario();
		data.links.push(link("A", "b1"));
		assert_eq!(
			TopologyGraph::new(data).unwrap_err(),
			GraphError::MultipleParents {
				node: "b1".into(),
				first: "B".into(),
				second: "A".into()
			}
		);
	}

	#[test]
	fn rejects_cycles() {
		let mut data = scenario();
		data.nodes.push(node("x", DeviceType::ExpansionUnit, Status::Online));
		data.nodes.push(node("y", DeviceType::ExpansionUnit, Status::Online));
		data.links.push(link("x", "y"));
		data.links.push(link("y", "x"));
		assert!(matches!(TopologyGraph::new(data), Err(GraphError::Cycle(_))));
	}

	#[test]
	fn error_messages_name_the_offender() {
		let err = GraphError::UnknownEndpoint {
			link: 2,
			id: "ru-9".into(),
		};
		assert_eq!(err.to_string(), "link #2 references unknown node `ru-9`");
	}
}
