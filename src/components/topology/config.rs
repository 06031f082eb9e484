use log::warn;

use super::state::Viewport;

/// Canvas clear color.
pub const BACKGROUND: &str = "#0f172a";
/// Hover highlight.
pub const ACCENT: &str = "#38bdf8";
/// Node label text.
pub const LABEL_COLOR: &str = "rgba(226, 232, 240, 0.9)";
/// Tooltip and legend background.
pub const PANEL_FILL: &str = "rgba(15, 23, 42, 0.92)";
/// Tooltip and legend border.
pub const PANEL_STROKE: &str = "rgba(148, 163, 184, 0.4)";

/// Stroke width of a link, doubled on hover.
pub const LINK_WIDTH: f64 = 1.6;
/// Width of the band around a link that counts as hovering it.
pub const LINK_HIT_WIDTH: f64 = 12.0;
/// Side of the head-end square.
pub const HEAD_END_SIZE: f64 = 18.0;
/// Distribution bar size.
pub const BAR_WIDTH: f64 = 34.0;
/// Distribution bar size.
pub const BAR_HEIGHT: f64 = 14.0;
/// Distribution bar corner radius.
pub const BAR_RADIUS: f64 = 4.0;
/// Radius of the status marker in the glyph's corner.
pub const STATUS_DOT_RADIUS: f64 = 3.5;
/// Radius of the collapse badge.
pub const BADGE_RADIUS: f64 = 8.0;
/// Badge center relative to the node center.
pub const BADGE_OFFSET: (f64, f64) = (26.0, -14.0);
/// Extra world-space slack around glyphs for pointer hits.
pub const HIT_SLACK: f64 = 4.0;

/// Tunables for layout, zoom and animation.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewConfig {
	/// Horizontal distance between tree levels.
	pub x_gap: f64,
	/// Vertical slot consumed by each leaf.
	pub y_gap: f64,
	/// First leaf slot.
	pub margin: f64,
	/// Smallest zoom scale.
	pub min_scale: f64,
	/// Largest zoom scale.
	pub max_scale: f64,
	/// Scale factor per wheel step towards the user.
	pub zoom_in: f64,
	/// Scale factor per wheel step away from the user.
	pub zoom_out: f64,
	/// Lifetime of a collapse/expand pulse.
	pub pulse_ms: f64,
	/// Scales offered as toolbar buttons.
	pub zoom_presets: Vec<f64>,
	/// Viewport restored by reset.
	pub initial_viewport: Viewport,
}

impl Default for ViewConfig {
	fn default() -> Self {
		Self {
			x_gap: 240.0,
			y_gap: 56.0,
			margin: 40.0,
			min_scale: 0.15,
			max_scale: 4.0,
			zoom_in: 1.1,
			zoom_out: 0.9,
			pulse_ms: 700.0,
			zoom_presets: vec![0.5, 1.0, 1.5, 2.0],
			initial_viewport: Viewport {
				x: 80.0,
				y: 0.0,
				k: 1.0,
			},
		}
	}
}

impl ViewConfig {
	/// Clamp `k` into `[min_scale, max_scale]`.
	///
	/// Expects a config that went through [`ViewConfig::normalized`].
	pub fn clamp_scale(&self, k: f64) -> f64 {
		k.clamp(self.min_scale, self.max_scale)
	}

	/// Repair scale bounds a caller may have passed in any order.
	///
	/// Non-finite or non-positive bounds fall back to the defaults and swapped
	/// bounds are reordered. The initial scale is then pulled into range.
	pub fn normalized(mut self) -> Self {
		let defaults = Self::default();
		let usable = |k: f64| k.is_finite() && k > 0.0;
		if !usable(self.min_scale) {
			warn!("invalid min_scale {}, using {}", self.min_scale, defaults.min_scale);
			self.min_scale = defaults.min_scale;
		}
		if !usable(self.max_scale) {
			warn!("invalid max_scale {}, using {}", self.max_scale, defaults.max_scale);
			self.max_scale = defaults.max_scale;
		}
		if self.min_scale > self.max_scale {
			warn!("scale bounds reversed: {} > {}", self.min_scale, self.max_scale);
			std::mem::swap(&mut self.min_scale, &mut self.max_scale);
		}
		let k = self.initial_viewport.k;
		self.initial_viewport.k = if k.is_finite() {
			self.clamp_scale(k)
		} else {
			1.0_f64.clamp(self.min_scale, self.max_scale)
		};
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_config_is_already_normal() {
		assert_eq!(ViewConfig::default().normalized(), ViewConfig::default());
	}

	#[test]
	fn reversed_bounds_are_swapped() {
		let config = ViewConfig {
			min_scale: 4.0,
			max_scale: 0.15,
			..Default::default()
		}
		.normalized();
		assert_eq!((config.min_scale, config.max_scale), (0.15, 4.0));
		assert_eq!(config.clamp_scale(10.0), 4.0);
	}

	#[test]
	fn bad_bounds_and_initial_scale_are_repaired() {
		let config = ViewConfig {
			min_scale: f64::NAN,
			max_scale: -2.0,
			initial_viewport: Viewport {
				x: 0.0,
				y: 0.0,
				k: 9.0,
			},
			..Default::default()
		}
		.normalized();
		assert_eq!((config.min_scale, config.max_scale), (0.15, 4.0));
		assert_eq!(config.initial_viewport.k, 4.0);

		let config = ViewConfig {
			min_scale: 2.0,
			initial_viewport: Viewport {
				x: 0.0,
				y: 0.0,
				k: f64::INFINITY,
			},
			..Default::default()
		}
		.normalized();
		assert_eq!(config.initial_viewport.k, 2.0);
	}
}
