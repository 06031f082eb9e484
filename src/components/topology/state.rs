use std::collections::{HashMap, HashSet};

use log::debug;

use super::config::{BADGE_OFFSET, BADGE_RADIUS, HIT_SLACK, LINK_HIT_WIDTH, ViewConfig};
use super::graph::TopologyGraph;
use super::layout::{Layout, Point};
use super::scene::{Glyph, LinkCurve};
use super::visibility::{self, NodeFilter, Visibility};

/// Pan offset and zoom scale applied to the whole scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	/// Horizontal translation in screen pixels.
	pub x: f64,
	/// Vertical translation in screen pixels.
	pub y: f64,
	/// Zoom scale.
	pub k: f64,
}

impl Default for Viewport {
	fn default() -> Self {
		Self { x: 0.0, y: 0.0, k: 1.0 }
	}
}

/// Background drag in progress.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	/// Primary button is held on the background.
	pub active: bool,
	/// Last pointer position in screen space.
	pub last_x: f64,
	/// Last pointer position in screen space.
	pub last_y: f64,
	/// Set once the current drag moved the view; swallows the trailing click.
	pub moved: bool,
}

/// What the pointer is over. At most one of the two is set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HoverState {
	/// Hovered node id.
	pub node: Option<String>,
	/// Index into the graph's link list.
	pub link: Option<usize>,
}

/// Interaction controller: the only owner of mutable view state.
///
/// Layout and visibility are cached and recomputed whenever the collapse set or
/// the filter changes. Every mutation raises a dirty flag which the frame loop
/// drains with [`TopologyState::take_dirty`].
pub struct TopologyState {
	graph: TopologyGraph,
	config: ViewConfig,
	viewport: Viewport,
	pan: PanState,
	hover: HoverState,
	collapsed: HashSet<String>,
	/// Remaining pulse time in milliseconds.
	pulsing: HashMap<String, f64>,
	filter: NodeFilter,
	layout: Layout,
	visibility: Visibility,
	/// Canvas size in pixels.
	pub width: f64,
	/// Canvas size in pixels.
	pub height: f64,
	dirty: bool,
}

impl TopologyState {
	/// Fully expanded, unfiltered state at the configured initial viewport.
	pub fn new(graph: TopologyGraph, config: ViewConfig, width: f64, height: f64) -> Self {
		let config = config.normalized();
		let collapsed = HashSet::new();
		let filter = NodeFilter::default();
		let layout = Layout::compute(&graph, &collapsed, &config);
		let visibility = Visibility::compute(&graph, &collapsed, &filter);
		Self {
			viewport: config.initial_viewport,
			graph,
			config,
			pan: PanState::default(),
			hover: HoverState::default(),
			collapsed,
			pulsing: HashMap::new(),
			filter,
			layout,
			visibility,
			width,
			height,
			dirty: true,
		}
	}

	/// The validated topology.
	pub fn graph(&self) -> &TopologyGraph {
		&self.graph
	}

	/// Normalized view settings.
	pub fn config(&self) -> &ViewConfig {
		&self.config
	}

	/// Positions for the current collapse set.
	pub fn layout(&self) -> &Layout {
		&self.layout
	}

	/// Drawn nodes and links for the current collapse set and filter.
	pub fn visibility(&self) -> &Visibility {
		&self.visibility
	}

	/// Current pan and zoom.
	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	/// Current hover target.
	pub fn hover(&self) -> &HoverState {
		&self.hover
	}

	/// Whether a background drag is in progress.
	pub fn is_panning(&self) -> bool {
		self.pan.active
	}

	/// Ids of collapsed nodes. Only ever holds nodes with children.
	pub fn collapsed(&self) -> &HashSet<String> {
		&self.collapsed
	}

	/// Whether `id` is collapsed.
	pub fn is_collapsed(&self, id: &str) -> bool {
		self.collapsed.contains(id)
	}

	/// Pulse progress from 0 (just toggled) to 1, or `None` when not pulsing.
	pub fn pulse_progress(&self, id: &str) -> Option<f64> {
		self.pulsing
			.get(id)
			.map(|remaining| (1.0 - remaining / self.config.pulse_ms).clamp(0.0, 1.0))
	}

	/// Invert the viewport transform.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Point {
		Point::new(
			(sx - self.viewport.x) / self.viewport.k,
			(sy - self.viewport.y) / self.viewport.k,
		)
	}

	/// Apply the viewport transform.
	pub fn graph_to_screen(&self, p: Point) -> Point {
		Point::new(
			p.x * self.viewport.k + self.viewport.x,
			p.y * self.viewport.k + self.viewport.y,
		)
	}

	/// Topmost drawn node under a screen point, badge included.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<String> {
		let p = self.screen_to_graph(sx, sy);
		self.visibility.nodes.iter().rev().find_map(|id| {
			let node = self.graph.node(id)?;
			let center = self.layout.position(id)?;
			let on_glyph = Glyph::for_type(node.kind).contains(center, p, HIT_SLACK);
			let on_badge = self.graph.has_children(id)
				&& badge_center(center).distance(p) <= BADGE_RADIUS + HIT_SLACK / 2.0;
			(on_glyph || on_badge).then(|| id.clone())
		})
	}

	/// Topmost drawn link whose curve passes within half the hit width.
	pub fn link_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let p = self.screen_to_graph(sx, sy);
		self.visibility.links.iter().rev().copied().find(|&i| {
			let link = &self.graph.links()[i];
			match (self.layout.position(&link.source), self.layout.position(&link.target)) {
				(Some(from), Some(to)) => {
					LinkCurve::between(from, to).distance_to(p) <= LINK_HIT_WIDTH / 2.0
				}
				_ => false,
			}
		})
	}

	/// Replace the hover target, raising the dirty flag only on change.
	pub fn set_hover(&mut self, node: Option<String>, link: Option<usize>) {
		let next = HoverState { node, link };
		if self.hover == next {
			return;
		}
		self.hover = next;
		self.dirty = true;
	}

	/// Primary-button press. Starts a pan unless it lands on a node.
	pub fn pointer_down(&mut self, sx: f64, sy: f64, button: i16) {
		self.pan.moved = false;
		if button != 0 || self.node_at_position(sx, sy).is_some() {
			return;
		}
		self.pan = PanState {
			active: true,
			last_x: sx,
			last_y: sy,
			moved: false,
		};
	}

	/// Pans while dragging, otherwise updates hover. Nodes win over links.
	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if self.pan.active {
			self.viewport.x += sx - self.pan.last_x;
			self.viewport.y += sy - self.pan.last_y;
			self.pan.last_x = sx;
			self.pan.last_y = sy;
			self.pan.moved = true;
			self.dirty = true;
			return;
		}
		let node = self.node_at_position(sx, sy);
		let link = match node {
			Some(_) => None,
			None => self.link_at_position(sx, sy),
		};
		self.set_hover(node, link);
	}

	/// Ends a pan.
	pub fn pointer_up(&mut self) {
		self.pan.active = false;
	}

	/// Ends a pan and clears hover.
	pub fn pointer_leave(&mut self) {
		self.pan.active = false;
		self.set_hover(None, None);
	}

	/// Click at a screen point; toggles the node under it. Returns whether
	/// anything changed.
	pub fn click(&mut self, sx: f64, sy: f64) -> bool {
		if std::mem::take(&mut self.pan.moved) {
			return false;
		}
		match self.node_at_position(sx, sy) {
			Some(id) => self.toggle_collapse(&id),
			None => false,
		}
	}

	/// Collapse or expand `id` and restart its pulse. Leaves are ignored.
	pub fn toggle_collapse(&mut self, id: &str) -> bool {
		if !self.graph.has_children(id) {
			return false;
		}
		if self.collapsed.remove(id) {
			debug!("expanded {id}");
		} else {
			self.collapsed.insert(id.to_string());
			debug!("collapsed {id}");
		}
		// Replacing the entry cancels any pulse still running for this node.
		self.pulsing.insert(id.to_string(), self.config.pulse_ms);
		self.refresh();
		true
	}

	/// Clear the collapse set.
	pub fn expand_all(&mut self) {
		if self.collapsed.is_empty() {
			return;
		}
		debug!("expanding {} collapsed nodes", self.collapsed.len());
		self.collapsed.clear();
		self.refresh();
	}

	/// One wheel step, zooming around the pointer. Scrolling up zooms in and
	/// down zooms out; an event with no vertical delta is ignored.
	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		if delta_y == 0.0 || delta_y.is_nan() {
			return;
		}
		let factor = if delta_y > 0.0 {
			self.config.zoom_out
		} else {
			self.config.zoom_in
		};
		let k = self.config.clamp_scale(self.viewport.k * factor);
		let ratio = k / self.viewport.k;
		self.viewport.x = sx - (sx - self.viewport.x) * ratio;
		self.viewport.y = sy - (sy - self.viewport.y) * ratio;
		self.viewport.k = k;
		self.dirty = true;
	}

	/// Jump to scale `k`, clamped, keeping the translation.
	pub fn zoom_to(&mut self, k: f64) {
		self.viewport.k = self.config.clamp_scale(k);
		self.dirty = true;
	}

	/// Restore the initial viewport.
	pub fn reset_view(&mut self) {
		self.viewport = self.config.initial_viewport;
		self.dirty = true;
	}

	/// Apply a new filter, recomputing visibility only on change.
	pub fn set_filter(&mut self, filter: NodeFilter) {
		if self.filter == filter {
			return;
		}
		debug!("filter changed: {filter:?}");
		self.filter = filter;
		self.refresh();
	}

	/// Advance pulse countdowns by `dt_ms`.
	pub fn tick(&mut self, dt_ms: f64) {
		if self.pulsing.is_empty() {
			return;
		}
		self.pulsing.retain(|_, remaining| {
			*remaining -= dt_ms;
			*remaining > 0.0
		});
		self.dirty = true;
	}

	/// Record a new canvas size.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.dirty = true;
	}

	/// Returns whether a redraw is due and clears the flag.
	pub fn take_dirty(&mut self) -> bool {
		std::mem::take(&mut self.dirty)
	}

	/// Number of nodes a collapsed badge stands for.
	pub fn hidden_below(&self, id: &str) -> usize {
		visibility::descendants(&self.graph, id).len()
	}

	fn refresh(&mut self) {
		self.layout = Layout::compute(&self.graph, &self.collapsed, &self.config);
		self.visibility = Visibility::compute(&self.graph, &self.collapsed, &self.filter);

		let node_gone = self
			.hover
			.node
			.as_deref()
			.is_some_and(|id| !self.visibility.is_shown(id));
		let link_gone = self
			.hover
			.link
			.is_some_and(|i| !self.visibility.links.contains(&i));
		if node_gone {
			self.hover.node = None;
		}
		if link_gone {
			self.hover.link = None;
		}
		self.dirty = true;
	}
}

/// Where the collapse badge of a node centered at `node` sits.
pub fn badge_center(node: Point) -> Point {
	Point::new(node.x + BADGE_OFFSET.0, node.y + BADGE_OFFSET.1)
}
