use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::config::ViewConfig;
use super::graph::TopologyGraph;
use super::render;
use super::scene;
use super::state::TopologyState;
use super::visibility::NodeFilter;

type SharedState = Rc<RefCell<Option<TopologyState>>>;

fn canvas_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn with_state(state: &SharedState, f: impl FnOnce(&mut TopologyState)) {
	if let Some(ref mut s) = *state.borrow_mut() {
		f(s);
	}
}

/// Raised from `on_cleanup` once the component is gone; polled each frame.
#[derive(Clone, Default)]
struct UnmountFlag(Arc<AtomicBool>);

impl UnmountFlag {
	fn raise(&self) {
		self.0.store(true, Ordering::Relaxed);
	}

	fn is_raised(&self) -> bool {
		self.0.load(Ordering::Relaxed)
	}
}

/// Drops the controller once unmounted. Returns whether the loop should stop.
fn release_if_unmounted(flag: &UnmountFlag, state: &SharedState) -> bool {
	if !flag.is_raised() {
		return false;
	}
	state.borrow_mut().take();
	true
}

/// Pannable, zoomable, collapsible equipment tree drawn on a canvas.
///
/// The filter props are re-read reactively; the graph itself is fixed for
/// the lifetime of the component.
#[component]
pub fn TopologyCanvas(
	/// Validated topology to draw.
	graph: TopologyGraph,
	/// Free-text search over label, location, band and type.
	#[prop(into)]
	search: Signal<String>,
	/// `"All"` or a status name.
	#[prop(into)]
	status_filter: Signal<String>,
	/// `"All"` or a device type label.
	#[prop(into)]
	type_filter: Signal<String>,
	/// View settings, defaults when omitted.
	#[prop(optional)]
	config: Option<ViewConfig>,
	/// Size the canvas to the window and follow resizes.
	#[prop(default = false)]
	fullscreen: bool,
	/// Fixed width; the parent's width otherwise.
	#[prop(default = None)]
	width: Option<f64>,
	/// Fixed height; the parent's height otherwise.
	#[prop(default = None)]
	height: Option<f64>,
) -> impl IntoView {
	let config = config.unwrap_or_default();
	let presets = config.zoom_presets.clone();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let pending = Rc::new(RefCell::new(Some((graph, config))));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());
	let unmounted = UnmountFlag::default();
	on_cleanup({
		let unmounted = unmounted.clone();
		move || unmounted.raise()
	});

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let Some(window) = web_sys::window() else {
			return;
		};
		let Some((graph, config)) = pending.borrow_mut().take() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("canvas 2d context unavailable, topology not drawn");
			return;
		};

		let mut topology = TopologyState::new(graph, config, w, h);
		topology.set_filter(NodeFilter::new(
			&search.get_untracked(),
			&status_filter.get_untracked(),
			&type_filter.get_untracked(),
		));
		*state_init.borrow_mut() = Some(topology);

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				with_state(&state_resize, |s| s.resize(nw, nh));
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner, resize_inner) =
			(state_init.clone(), animate_init.clone(), resize_cb_init.clone());
		let unmounted = unmounted.clone();
		let mut last = js_sys::Date::now();
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if release_if_unmounted(&unmounted, &state_anim) {
				if let (Some(cb), Some(win)) = (resize_inner.borrow_mut().take(), web_sys::window()) {
					let _ = win.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
				// Drops this closure; wasm-bindgen defers the free until it returns.
				let _ = animate_inner.borrow_mut().take();
				debug!("topology canvas unmounted, frame loop stopped");
				return;
			}
			let now = js_sys::Date::now();
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(now - last);
				if s.take_dirty() {
					render::render(&scene::build(s), &ctx);
				}
			}
			last = now;
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_filter = state.clone();
	Effect::new(move |_| {
		let filter = NodeFilter::new(&search.get(), &status_filter.get(), &type_filter.get());
		with_state(&state_filter, |s| s.set_filter(filter));
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = canvas_point(&canvas, &ev);
		with_state(&state_md, |s| s.pointer_down(x, y, ev.button()));
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = canvas_point(&canvas, &ev);
		with_state(&state_mm, |s| {
			s.pointer_move(x, y);
			let cursor = if s.is_panning() {
				"grabbing"
			} else if s.hover().node.is_some() {
				"pointer"
			} else {
				"grab"
			};
			let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", cursor);
		});
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		with_state(&state_mu, |s| s.pointer_up());
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		with_state(&state_ml, |s| s.pointer_leave());
	};

	let state_cl = state.clone();
	let on_click = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = canvas_point(&canvas, &ev);
		with_state(&state_cl, |s| {
			s.click(x, y);
		});
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = canvas_point(&canvas, &ev);
		with_state(&state_wh, |s| s.wheel(x, y, ev.delta_y()));
	};

	let zoom_buttons = presets
		.into_iter()
		.map(|k| {
			let state_zoom = state.clone();
			view! {
				<button on:click=move |_| with_state(&state_zoom, |s| s.zoom_to(k))>
					{format!("{}%", (k * 100.0).round())}
				</button>
			}
		})
		.collect_view();

	let state_reset = state.clone();
	let state_expand = state.clone();

	view! {
		<div class="topology">
			<canvas
				node_ref=canvas_ref
				class="topology-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:click=on_click
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			<div class="topology-toolbar">
				{zoom_buttons}
				<button on:click=move |_| with_state(&state_reset, |s| s.reset_view())>"Reset"</button>
				<button on:click=move |_| {
					with_state(&state_expand, |s| s.expand_all())
				}>"Expand all"</button>
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::topology::fixtures::{graph, scenario};

	#[test]
	fn unmount_releases_the_controller() {
		let flag = UnmountFlag::default();
		let state: SharedState = Rc::new(RefCell::new(Some(TopologyState::new(
			graph(scenario()),
			ViewConfig::default(),
			800.0,
			600.0,
		))));

		assert!(!release_if_unmounted(&flag, &state));
		assert!(state.borrow().is_some());

		let cleanup = flag.clone();
		cleanup.raise();
		assert!(release_if_unmounted(&flag, &state));
		assert!(state.borrow().is_none());

		let mut touched = false;
		with_state(&state, |_| touched = true);
		assert!(!touched);
	}
}
