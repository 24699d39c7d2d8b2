//! Leptos component wrapping the constellation canvas.
//!
//! The component creates an HTML canvas sized to the window and wires up
//! mouse/wheel handlers for hovering, node dragging, panning and zooming. An
//! animation loop runs via `requestAnimationFrame`; each frame advances the
//! [`ConstellationState`] to the current wall-clock time and repaints.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::config::ConstellationConfig;
use super::render;
use super::state::ConstellationState;
use super::theme::Theme;
use super::tooltip::{DomTooltip, Tooltip};
use super::types::Group;

const WHEEL_ZOOM_OUT: f64 = 0.9;
const WHEEL_ZOOM_IN: f64 = 1.1;

/// Bundles the session state with its visual configuration.
struct ConstellationContext {
	state: ConstellationState,
	theme: Theme,
	tooltip: Option<DomTooltip>,
	tooltip_html: Option<String>,
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn viewport_size(window: &Window, height_ratio: f64) -> (f64, f64) {
	let w = window
		.inner_width()
		.ok()
		.and_then(|v| v.as_f64())
		.unwrap_or(800.0);
	let h = window
		.inner_height()
		.ok()
		.and_then(|v| v.as_f64())
		.unwrap_or(600.0);
	(w, h * height_ratio)
}

fn canvas_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Renders the KPI constellation on a canvas element.
///
/// The scene spans the full window width and a share of its height (see
/// [`ConstellationConfig::viewport_height_ratio`]) and follows window resizes.
/// Explicit `width`/`height` override automatic sizing. Moving the pointer
/// into the canvas pauses the drift; leaving it resumes.
#[component]
pub fn ConstellationCanvas(
	groups: Vec<Group>,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional)] config: Option<ConstellationConfig>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<ConstellationContext>>> = Rc::new(RefCell::new(None));
	let animate: FrameCallback = Rc::new(RefCell::new(None));
	let resize_cb: FrameCallback = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());
	let config = config.unwrap_or_default();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if context_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("kpi-constellation: no window, cannot start");
			return;
		};

		let ratio = config.viewport_height_ratio;
		let (auto_w, auto_h) = viewport_size(&window, ratio);
		let (w, h) = (width.unwrap_or(auto_w), height.unwrap_or(auto_h));
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("kpi-constellation: canvas has no 2d context");
			return;
		};

		let theme = Theme::default();
		let state = ConstellationState::new(
			&groups,
			w,
			h,
			js_sys::Date::now(),
			config.clone(),
			&theme,
		);
		info!(
			"kpi-constellation: started with {} nodes on a {w}x{h} canvas",
			state.simulation.nodes().len()
		);
		*context_init.borrow_mut() = Some(ConstellationContext {
			state,
			theme,
			tooltip: DomTooltip::new(),
			tooltip_html: None,
		});

		if width.is_none() || height.is_none() {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (auto_w, auto_h) = viewport_size(&win, ratio);
				let (nw, nh) = (width.unwrap_or(auto_w), height.unwrap_or(auto_h));
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.state.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let running = match *context_anim.borrow_mut() {
				Some(ref mut c) => {
					let running = c.state.advance(js_sys::Date::now());
					render::render(&c.state, &ctx, &c.theme);
					running
				}
				None => false,
			};
			if !running {
				return;
			}
			if let (Some(win), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = canvas_point(&canvas, &ev);
		if let Some(ref mut c) = *context_md.borrow_mut() {
			c.state.pointer_down(x, y);
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = canvas_point(&canvas, &ev);
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			if c.state.drag.node_idx.is_none() {
				if c.state.update_hover(x, y) {
					c.tooltip_html = c.state.hovered.and_then(|idx| c.state.tooltip_html(idx));
				}
				if let Some(ref tooltip) = c.tooltip {
					match c.tooltip_html {
						Some(ref html) => tooltip.show(html, ev.page_x() as f64, ev.page_y() as f64),
						None => tooltip.hide(),
					}
				}
			}
			c.state.pointer_move(x, y);
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			c.state.pointer_up();
		}
	};

	let context_me = context.clone();
	let on_mouseenter = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_me.borrow_mut() {
			c.state.set_paused(true);
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.set_paused(false);
			c.state.pointer_up();
			c.state.clear_hover();
			c.tooltip_html = None;
			if let Some(ref tooltip) = c.tooltip {
				tooltip.hide();
			}
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = canvas_point(&canvas, &ev);
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { WHEEL_ZOOM_OUT } else { WHEEL_ZOOM_IN };
			c.state.zoom_at(x, y, factor);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="kpi-constellation-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseenter=on_mouseenter
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
