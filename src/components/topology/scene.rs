//! Backend-agnostic description of one frame.
//!
//! [`build`] turns controller state into plain shapes; a backend only has to
//! draw them. Nothing here mutates the model or the controller.

use super::config::{
	ACCENT, BADGE_RADIUS, BAR_HEIGHT, BAR_RADIUS, BAR_WIDTH, HEAD_END_SIZE, LINK_HIT_WIDTH,
	LINK_WIDTH,
};
use super::layout::Point;
use super::state::{TopologyState, Viewport, badge_center};
use super::types::{DeviceType, PowerClass, Status, Tier, TopologyLink, TopologyNode};

const CURVE_SAMPLES: usize = 24;

/// Device shape, sized in graph units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Glyph {
	/// Head-end units.
	Square {
		/// Side length.
		size: f64,
	},
	/// Distribution units.
	RoundedBar {
		/// Full width.
		width: f64,
		/// Full height.
		height: f64,
		/// Corner radius.
		radius: f64,
	},
	/// Remote units, radius by power class.
	Circle {
		/// Radius.
		radius: f64,
	},
}

impl Glyph {
	/// Shape for a device type, picked by tier and power class.
	pub fn for_type(kind: DeviceType) -> Self {
		let meta = kind.meta();
		match meta.tier {
			Tier::HeadEnd => Glyph::Square {
				size: HEAD_END_SIZE,
			},
			Tier::Distribution => Glyph::RoundedBar {
				width: BAR_WIDTH,
				height: BAR_HEIGHT,
				radius: BAR_RADIUS,
			},
			Tier::Remote => Glyph::Circle {
				radius: match meta.power {
					Some(PowerClass::High) => 10.0,
					Some(PowerClass::Mid) => 8.0,
					Some(PowerClass::Low) | None => 6.0,
				},
			},
		}
	}

	/// Half width and half height.
	pub fn half_extent(&self) -> (f64, f64) {
		match *self {
			Glyph::Square { size } => (size / 2.0, size / 2.0),
			Glyph::RoundedBar { width, height, .. } => (width / 2.0, height / 2.0),
			Glyph::Circle { radius } => (radius, radius),
		}
	}

	/// Whether `p` hits the glyph drawn at `center`, grown by `slack`.
	pub fn contains(&self, center: Point, p: Point, slack: f64) -> bool {
		match *self {
			Glyph::Circle { radius } => center.distance(p) <= radius + slack,
			_ => {
				let (hw, hh) = self.half_extent();
				(p.x - center.x).abs() <= hw + slack && (p.y - center.y).abs() <= hh + slack
			}
		}
	}
}

/// Cubic link curve, bending through the horizontal midpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkCurve {
	/// Start, at the parent.
	pub from: Point,
	/// First control point.
	pub c1: Point,
	/// Second control point.
	pub c2: Point,
	/// End, at the child.
	pub to: Point,
}

impl LinkCurve {
	/// Curve from a parent to a child.
	pub fn between(from: Point, to: Point) -> Self {
		let mx = (from.x + to.x) / 2.0;
		Self {
			from,
			c1: Point::new(mx, from.y),
			c2: Point::new(mx, to.y),
			to,
		}
	}

	/// Point at parameter `t` in `0..=1`.
	pub fn point_at(&self, t: f64) -> Point {
		let u = 1.0 - t;
		let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
		Point::new(
			a * self.from.x + b * self.c1.x + c * self.c2.x + d * self.to.x,
			a * self.from.y + b * self.c1.y + c * self.c2.y + d * self.to.y,
		)
	}

	/// Approximate distance from `p` to the curve, via a polyline.
	pub fn distance_to(&self, p: Point) -> f64 {
		let mut prev = self.from;
		let mut best = f64::INFINITY;
		for i in 1..=CURVE_SAMPLES {
			let next = self.point_at(i as f64 / CURVE_SAMPLES as f64);
			best = best.min(segment_distance(prev, next, p));
			prev = next;
		}
		best
	}
}

fn segment_distance(a: Point, b: Point, p: Point) -> f64 {
	let (dx, dy) = (b.x - a.x, b.y - a.y);
	let len2 = dx * dx + dy * dy;
	if len2 < 1e-12 {
		return a.distance(p);
	}
	let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0);
	Point::new(a.x + t * dx, a.y + t * dy).distance(p)
}

/// A link ready to stroke.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkShape {
	/// Index into the graph's link list.
	pub index: usize,
	/// Path in graph space.
	pub curve: LinkCurve,
	/// Worst endpoint status color, or the accent on hover.
	pub color: &'static str,
	/// Stroke width.
	pub width: f64,
	/// Width of the invisible pointer target.
	pub hit_width: f64,
	/// Non-fiber media are dashed.
	pub dashed: bool,
	/// Under the pointer.
	pub hovered: bool,
}

/// Collapse badge next to a parent node.
#[derive(Clone, Debug, PartialEq)]
pub struct Badge {
	/// Center in graph space.
	pub center: Point,
	/// Radius in graph space.
	pub radius: f64,
	/// Whether the owner is collapsed.
	pub collapsed: bool,
	/// `+n` when collapsed, `-` otherwise.
	pub text: String,
}

/// A node ready to fill.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeShape {
	/// Node id.
	pub id: String,
	/// Center in graph space.
	pub center: Point,
	/// Shape.
	pub glyph: Glyph,
	/// Type color.
	pub fill: &'static str,
	/// Text drawn under the glyph.
	pub label: String,
	/// Status marker center, top-right of the glyph.
	pub status_dot: Point,
	/// Status marker color.
	pub status_color: &'static str,
	/// Collapse badge, if shown.
	pub badge: Option<Badge>,
	/// Under the pointer.
	pub hovered: bool,
	/// Pulse progress in `0..=1`.
	pub pulse: Option<f64>,
}

/// Floating detail panel, anchored in screen space.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
	/// Top-left corner in screen space.
	pub anchor: Point,
	/// Bold first line.
	pub title: String,
	/// Label and value pairs.
	pub rows: Vec<(&'static str, String)>,
}

/// One device type in the legend.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
	/// Short label.
	pub label: &'static str,
	/// Long name.
	pub description: &'static str,
	/// Shape.
	pub glyph: Glyph,
	/// Type color.
	pub color: &'static str,
}

/// Fixed key of device types and statuses.
#[derive(Clone, Debug, PartialEq)]
pub struct Legend {
	/// Device types in declaration order.
	pub types: Vec<LegendEntry>,
	/// Status name and color pairs.
	pub statuses: Vec<(&'static str, &'static str)>,
}

impl Legend {
	/// Every device type and status.
	pub fn standard() -> Self {
		Self {
			types: DeviceType::ALL
				.into_iter()
				.map(|kind| {
					let meta = kind.meta();
					LegendEntry {
						label: meta.label,
						description: meta.description,
						glyph: Glyph::for_type(kind),
						color: meta.color,
					}
				})
				.collect(),
			statuses: Status::ALL.into_iter().map(|s| (s.as_str(), s.color())).collect(),
		}
	}
}

/// Everything one frame draws.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
	/// Canvas width in pixels.
	pub width: f64,
	/// Canvas height in pixels.
	pub height: f64,
	/// Transform from graph to screen space.
	pub viewport: Viewport,
	/// Visible links, drawn first.
	pub links: Vec<LinkShape>,
	/// Visible nodes, drawn over links.
	pub nodes: Vec<NodeShape>,
	/// Details of the hovered node or link.
	pub tooltip: Option<Tooltip>,
	/// Screen-space legend.
	pub legend: Legend,
}

/// Project controller state into a [`Scene`].
pub fn build(state: &TopologyState) -> Scene {
	let graph = state.graph();
	let layout = state.layout();
	let visibility = state.visibility();
	let hover = state.hover();

	let links = visibility
		.links
		.iter()
		.filter_map(|&index| {
			let link = &graph.links()[index];
			let from = layout.position(&link.source)?;
			let to = layout.position(&link.target)?;
			let worst = graph.node(&link.source)?.status.worst(graph.node(&link.target)?.status);
			let hovered = hover.link == Some(index);
			Some(LinkShape {
				index,
				curve: LinkCurve::between(from, to),
				color: if hovered { ACCENT } else { worst.color() },
				width: if hovered { LINK_WIDTH * 1.8 } else { LINK_WIDTH },
				hit_width: LINK_HIT_WIDTH,
				dashed: !link.medium.to_lowercase().contains("fiber"),
				hovered,
			})
		})
		.collect();

	let nodes = visibility
		.nodes
		.iter()
		.filter_map(|id| {
			let node = graph.node(id)?;
			let center = layout.position(id)?;
			Some(node_shape(state, node, center))
		})
		.collect();

	let tooltip = match (&hover.node, hover.link) {
		(Some(id), _) => node_tooltip(state, id),
		(None, Some(index)) => link_tooltip(state, index),
		(None, None) => None,
	};

	Scene {
		width: state.width,
		height: state.height,
		viewport: state.viewport(),
		links,
		nodes,
		tooltip,
		legend: Legend::standard(),
	}
}

fn node_shape(state: &TopologyState, node: &TopologyNode, center: Point) -> NodeShape {
	let glyph = Glyph::for_type(node.kind);
	let (hw, hh) = glyph.half_extent();
	let hovered = state.hover().node.as_deref() == Some(node.id.as_str());
	let collapsed = state.is_collapsed(&node.id);

	let badge = (state.graph().has_children(&node.id) && (collapsed || hovered)).then(|| Badge {
		center: badge_center(center),
		radius: BADGE_RADIUS,
		collapsed,
		text: if collapsed {
			format!("+{}", state.hidden_below(&node.id))
		} else {
			"-".to_string()
		},
	});

	NodeShape {
		id: node.id.clone(),
		center,
		glyph,
		fill: node.kind.meta().color,
		label: node.label.clone(),
		status_dot: Point::new(center.x + hw, center.y - hh),
		status_color: node.status.color(),
		badge,
		hovered,
		pulse: state.pulse_progress(&node.id),
	}
}

fn node_tooltip(state: &TopologyState, id: &str) -> Option<Tooltip> {
	let node = state.graph().node(id)?;
	let center = state.layout().position(id)?;
	let meta = node.kind.meta();
	let (hw, _) = Glyph::for_type(node.kind).half_extent();

	let mut rows = vec![
		("Type", format!("{} ({})", meta.description, meta.label)),
		("Family", meta.family.to_string()),
		("Status", node.status.to_string()),
	];
	let a = &node.attrs;
	let optional = [
		("Model", a.model.clone()),
		("Serial", a.serial.clone()),
		("Band", a.band.clone()),
		("Location", a.location.clone()),
		("Power", a.power.clone()),
		("MIMO", a.mimo.clone()),
		("Protocol", a.protocol.clone()),
		("Ports", a.ports.map(|p| p.to_string())),
		("Slots", a.slots.map(|s| s.to_string())),
	];
	rows.extend(optional.into_iter().filter_map(|(k, v)| v.map(|v| (k, v))));
	let children = state.graph().children(id).len();
	if children > 0 {
		rows.push(("Children", children.to_string()));
	}

	Some(Tooltip {
		anchor: state.graph_to_screen(Point::new(center.x + hw + 12.0, center.y)),
		title: node.label.clone(),
		rows,
	})
}

fn link_tooltip(state: &TopologyState, index: usize) -> Option<Tooltip> {
	let graph = state.graph();
	let link: &TopologyLink = graph.links().get(index)?;
	let from = state.layout().position(&link.source)?;
	let to = state.layout().position(&link.target)?;
	let source = graph.node(&link.source)?;
	let target = graph.node(&link.target)?;

	let mut rows = vec![
		("From", source.label.clone()),
		("To", target.label.clone()),
		("Medium", link.medium.clone()),
	];
	if let Some(label) = &link.label {
		rows.push(("Protocol", label.clone()));
	}
	Some(Tooltip {
		anchor: state.graph_to_screen(LinkCurve::between(from, to).point_at(0.5)),
		title: format!("{} \u{2192} {}", source.label, target.label),
		rows,
	})
}
