use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::config::{BACKGROUND, LABEL_COLOR, PANEL_FILL, PANEL_STROKE, STATUS_DOT_RADIUS};
use super::layout::Point;
use super::scene::{Badge, Glyph, Legend, LinkShape, NodeShape, Scene, Tooltip};

const FONT: &str = "sans-serif";
const ROW_HEIGHT: f64 = 16.0;
const CHAR_WIDTH: f64 = 6.6;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Draw one frame. Pure consumer of the scene.
pub fn render(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, scene.width, scene.height);
	ctx.save();
	let _ = ctx.translate(scene.viewport.x, scene.viewport.y);
	let _ = ctx.scale(scene.viewport.k, scene.viewport.k);
	for link in &scene.links {
		draw_link(link, scene.viewport.k, ctx);
	}
	for node in &scene.nodes {
		draw_node(node, scene.viewport.k, ctx);
	}
	ctx.restore();

	draw_legend(&scene.legend, scene.height, ctx);
	if let Some(tooltip) = &scene.tooltip {
		draw_tooltip(tooltip, scene.width, scene.height, ctx);
	}
}

fn draw_link(link: &LinkShape, k: f64, ctx: &CanvasRenderingContext2d) {
	let c = &link.curve;
	ctx.set_stroke_style_str(link.color);
	ctx.set_line_width(link.width / k.max(0.5));
	if link.dashed {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(6.0),
			&JsValue::from_f64(4.0),
		));
	}
	ctx.set_global_alpha(if link.hovered { 1.0 } else { 0.75 });
	ctx.begin_path();
	ctx.move_to(c.from.x, c.from.y);
	ctx.bezier_curve_to(c.c1.x, c.c1.y, c.c2.x, c.c2.y, c.to.x, c.to.y);
	ctx.stroke();
	ctx.set_global_alpha(1.0);
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_node(node: &NodeShape, k: f64, ctx: &CanvasRenderingContext2d) {
	let (x, y) = (node.center.x, node.center.y);
	let (hw, hh) = node.glyph.half_extent();

	if let Some(p) = node.pulse {
		let t = ease_out_cubic(p);
		let inner = hw.max(hh);
		let outer = inner * (1.5 + 1.5 * t);
		if let Ok(gradient) = ctx.create_radial_gradient(x, y, inner * 0.5, x, y, outer) {
			let alpha = 0.5 * (1.0 - t);
			let _ = gradient.add_color_stop(0.0, &format!("rgba(56, 189, 248, {})", alpha));
			let _ = gradient.add_color_stop(1.0, "rgba(56, 189, 248, 0)");
			ctx.begin_path();
			let _ = ctx.arc(x, y, outer, 0.0, 2.0 * PI);
			#[allow(deprecated)]
			ctx.set_fill_style_canvas_gradient(&gradient);
			ctx.fill();
		}
	}

	trace_glyph(node.glyph, node.center, ctx);
	ctx.set_fill_style_str(node.fill);
	ctx.fill();
	if node.hovered {
		ctx.set_stroke_style_str("white");
		ctx.set_line_width(1.5 / k);
		ctx.stroke();
	}

	ctx.begin_path();
	let _ = ctx.arc(node.status_dot.x, node.status_dot.y, STATUS_DOT_RADIUS, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(node.status_color);
	ctx.fill();
	ctx.set_stroke_style_str(BACKGROUND);
	ctx.set_line_width(1.0);
	ctx.stroke();

	ctx.set_fill_style_str(LABEL_COLOR);
	ctx.set_font(&format!("{}px {}", 11.0 / k.max(0.5), FONT));
	ctx.set_text_align("left");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(&node.label, x + hw + 6.0, y + hh + 9.0);

	if let Some(badge) = &node.badge {
		draw_badge(badge, ctx);
	}
}

fn trace_glyph(glyph: Glyph, center: Point, ctx: &CanvasRenderingContext2d) {
	let (x, y) = (center.x, center.y);
	ctx.begin_path();
	match glyph {
		Glyph::Square { size } => {
			ctx.rect(x - size / 2.0, y - size / 2.0, size, size);
		}
		Glyph::RoundedBar {
			width,
			height,
			radius,
		} => {
			let (l, t, r, b) = (x - width / 2.0, y - height / 2.0, x + width / 2.0, y + height / 2.0);
			ctx.move_to(l + radius, t);
			let _ = ctx.arc_to(r, t, r, b, radius);
			let _ = ctx.arc_to(r, b, l, b, radius);
			let _ = ctx.arc_to(l, b, l, t, radius);
			let _ = ctx.arc_to(l, t, r, t, radius);
			ctx.close_path();
		}
		Glyph::Circle { radius } => {
			let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		}
	}
}

fn draw_badge(badge: &Badge, ctx: &CanvasRenderingContext2d) {
	let Point { x, y } = badge.center;
	ctx.begin_path();
	let _ = ctx.arc(x, y, badge.radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(if badge.collapsed { "#38bdf8" } else { "#334155" });
	ctx.fill();
	ctx.set_fill_style_str("white");
	ctx.set_font(&format!("bold 9px {}", FONT));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(&badge.text, x, y + 0.5);
}

fn panel(x: f64, y: f64, w: f64, h: f64, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(PANEL_FILL);
	ctx.fill_rect(x, y, w, h);
	ctx.set_stroke_style_str(PANEL_STROKE);
	ctx.set_line_width(1.0);
	ctx.stroke_rect(x, y, w, h);
}

fn draw_tooltip(tooltip: &Tooltip, width: f64, height: f64, ctx: &CanvasRenderingContext2d) {
	let widest = tooltip
		.rows
		.iter()
		.map(|(k, v)| k.len() + v.chars().count() + 2)
		.chain(std::iter::once(tooltip.title.chars().count()))
		.max()
		.unwrap_or(0);
	let w = widest as f64 * CHAR_WIDTH + 20.0;
	let h = (tooltip.rows.len() + 1) as f64 * ROW_HEIGHT + 16.0;
	// Keep the panel on screen.
	let x = tooltip.anchor.x.min(width - w - 8.0).max(8.0);
	let y = (tooltip.anchor.y - h / 2.0).clamp(8.0, (height - h - 8.0).max(8.0));

	panel(x, y, w, h, ctx);
	ctx.set_text_align("left");
	ctx.set_text_baseline("top");
	ctx.set_fill_style_str("white");
	ctx.set_font(&format!("bold 12px {}", FONT));
	let _ = ctx.fill_text(&tooltip.title, x + 10.0, y + 8.0);
	ctx.set_font(&format!("11px {}", FONT));
	for (i, (key, value)) in tooltip.rows.iter().enumerate() {
		let row_y = y + 8.0 + (i + 1) as f64 * ROW_HEIGHT;
		ctx.set_fill_style_str("rgba(148, 163, 184, 1)");
		let _ = ctx.fill_text(key, x + 10.0, row_y);
		ctx.set_fill_style_str(LABEL_COLOR);
		let _ = ctx.fill_text(value, x + 10.0 + (key.len() + 2) as f64 * CHAR_WIDTH, row_y);
	}
}

fn draw_legend(legend: &Legend, height: f64, ctx: &CanvasRenderingContext2d) {
	let rows = legend.types.len() + legend.statuses.len();
	let (w, h) = (230.0, rows as f64 * ROW_HEIGHT + 16.0);
	let (x, y) = (12.0, height - h - 12.0);
	panel(x, y, w, h, ctx);

	ctx.set_font(&format!("11px {}", FONT));
	ctx.set_text_align("left");
	ctx.set_text_baseline("middle");
	for (i, entry) in legend.types.iter().enumerate() {
		let cy = y + 8.0 + (i as f64 + 0.5) * ROW_HEIGHT;
		let glyph = match entry.glyph {
			// Squeeze glyphs into the legend row.
			Glyph::RoundedBar { radius, .. } => Glyph::RoundedBar {
				width: 20.0,
				height: 8.0,
				radius: radius.min(3.0),
			},
			Glyph::Square { .. } => Glyph::Square { size: 10.0 },
			Glyph::Circle { radius } => Glyph::Circle {
				radius: radius * 0.6,
			},
		};
		trace_glyph(glyph, Point::new(x + 20.0, cy), ctx);
		ctx.set_fill_style_str(entry.color);
		ctx.fill();
		ctx.set_fill_style_str(LABEL_COLOR);
		let _ = ctx.fill_text(
			&format!("{}  {}", entry.label, entry.description),
			x + 38.0,
			cy,
		);
	}
	for (i, (name, color)) in legend.statuses.iter().enumerate() {
		let cy = y + 8.0 + ((legend.types.len() + i) as f64 + 0.5) * ROW_HEIGHT;
		ctx.begin_path();
		let _ = ctx.arc(x + 20.0, cy, STATUS_DOT_RADIUS + 1.0, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(color);
		ctx.fill();
		ctx.set_fill_style_str(LABEL_COLOR);
		let _ = ctx.fill_text(name, x + 38.0, cy);
	}
}
