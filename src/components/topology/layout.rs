use std::collections::{HashMap, HashSet};

use super::config::ViewConfig;
use super::graph::TopologyGraph;

/// Graph- or screen-space coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate.
	pub y: f64,
}

impl Point {
	/// Point at `(x, y)`.
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean distance.
	pub fn distance(self, other: Point) -> f64 {
		((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
	}
}

/// Node positions for one collapse state. Nodes inside a collapsed subtree
/// have no entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
	positions: HashMap<String, Point>,
	depths: HashMap<String, usize>,
	extent: Point,
}

impl Layout {
	/// Tidy left-to-right tree layout.
	///
	/// Depth picks the column. Every leaf (or collapsed node) takes the next
	/// vertical slot from a shared cursor, and a parent sits midway between its
	/// first and last child, so sibling subtrees never overlap.
	pub fn compute(graph: &TopologyGraph, collapsed: &HashSet<String>, config: &ViewConfig) -> Self {
		let mut layout = Layout::default();
		let mut cursor = config.margin;
		for root in graph.adjacency().roots() {
			place(graph, root, 0, collapsed, config, &mut cursor, &mut layout);
		}
		layout
	}

	/// Center of `id`, if it was laid out.
	pub fn position(&self, id: &str) -> Option<Point> {
		self.positions.get(id).copied()
	}

	/// Tree depth of `id`, roots at 0.
	pub fn depth(&self, id: &str) -> Option<usize> {
		self.depths.get(id).copied()
	}

	/// Bottom-right corner of the laid-out area.
	pub fn extent(&self) -> Point {
		self.extent
	}

	/// Number of placed nodes.
	pub fn len(&self) -> usize {
		self.positions.len()
	}

	/// True when nothing was placed.
	pub fn is_empty(&self) -> bool {
		self.positions.is_empty()
	}
}

fn place(
	graph: &TopologyGraph,
	id: &str,
	depth: usize,
	collapsed: &HashSet<String>,
	config: &ViewConfig,
	cursor: &mut f64,
	layout: &mut Layout,
) -> f64 {
	let children = if collapsed.contains(id) {
		&[][..]
	} else {
		graph.children(id)
	};

	let y = if children.is_empty() {
		let y = *cursor;
		*cursor += config.y_gap;
		y
	} else {
		let (mut first, mut last) = (None, 0.0);
		for child in children {
			last = place(graph, child, depth + 1, collapsed, config, cursor, layout);
			first.get_or_insert(last);
		}
		(first.unwrap_or(last) + last) / 2.0
	};

	let x = depth as f64 * config.x_gap;
	layout.extent.x = layout.extent.x.max(x);
	layout.extent.y = layout.extent.y.max(y);
	layout.positions.insert(id.to_string(), Point::new(x, y));
	layout.depths.insert(id.to_string(), depth);
	y
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::topology::fixtures::{graph, scenario, ten_nodes};

	fn y(layout: &Layout, id: &str) -> f64 {
		layout.position(id).unwrap().y
	}

	#[test]
	fn parents_sit_between_their_children() {
		let g = graph(scenario());
		let layout = Layout::compute(&g, &HashSet::new(), &ViewConfig::default());

		assert!(y(&layout, "A") < y(&layout, "b1"));
		assert!(y(&layout, "b1") < y(&layout, "b2"));
		assert_eq!(y(&layout, "B"), (y(&layout, "b1") + y(&layout, "b2")) / 2.0);
		assert_eq!(y(&layout, "R"), (y(&layout, "A") + y(&layout, "B")) / 2.0);
	}

	#[test]
	fn columns_follow_depth() {
		let config = ViewConfig::default();
		let g = graph(scenario());
		let layout = Layout::compute(&g, &HashSet::new(), &config);
		assert_eq!(layout.position("R").unwrap().x, 0.0);
		assert_eq!(layout.position("B").unwrap().x, config.x_gap);
		assert_eq!(layout.position("b2").unwrap().x, 2.0 * config.x_gap);
		assert_eq!(layout.depth("b1"), Some(2));
	}

	#[test]
	fn leaves_take_consecutive_slots_from_the_margin() {
		let config = ViewConfig::default();
		let g = graph(scenario());
		let layout = Layout::compute(&g, &HashSet::new(), &config);
		assert_eq!(y(&layout, "A"), config.margin);
		assert_eq!(y(&layout, "b1"), config.margin + config.y_gap);
		assert_eq!(y(&layout, "b2"), config.margin + 2.0 * config.y_gap);
		assert_eq!(layout.extent(), Point::new(2.0 * config.x_gap, y(&layout, "b2")));
	}

	#[test]
	fn collapsed_nodes_are_laid_out_as_leaves() {
		let config = ViewConfig::default();
		let g = graph(scenario());
		let collapsed: HashSet<String> = ["B".to_string()].into();
		let layout = Layout::compute(&g, &collapsed, &config);

		assert_eq!(layout.len(), 3);
		assert!(layout.position("b1").is_none());
		assert_eq!(y(&layout, "B"), config.margin + config.y_gap);
	}

	#[test]
	fn layout_is_deterministic() {
		let g = graph(ten_nodes());
		let collapsed: HashSet<String> = ["H2".to_string()].into();
		let config = ViewConfig::default();
		let first = Layout::compute(&g, &collapsed, &config);
		let second = Layout::compute(&g, &collapsed, &config);
		assert_eq!(first, second);
		for n in g.nodes() {
			assert_eq!(first.position(&n.id), second.position(&n.id));
		}
	}

	#[test]
	fn sibling_subtrees_do_not_overlap() {
		let g = graph(ten_nodes());
		let layout = Layout::compute(&g, &HashSet::new(), &ViewConfig::default());
		let span = |ids: &[&str]| {
			let ys: Vec<f64> = ids.iter().map(|id| y(&layout, id)).collect();
			(
				ys.iter().cloned().fold(f64::INFINITY, f64::min),
				ys.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
			)
		};
		let (_, h1_max) = span(&["H1", "E1", "r1", "r2", "r3", "r5"]);
		let (h2_min, _) = span(&["H2", "r4", "r6"]);
		assert!(h1_max < h2_min);
	}
}
