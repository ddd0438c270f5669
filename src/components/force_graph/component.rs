use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render::CanvasSurface;
use super::simulation::LayoutConfig;
use super::state::ForceGraphState;
use super::types::{Edge, NodeId, PathEdge};

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

fn pointer_position(
	canvas_ref: NodeRef<leptos::html::Canvas>,
	ev: &MouseEvent,
) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Weighted graph drawn with a force-directed layout; links on `path` are highlighted.
///
/// New `edges` or `path` values restart the layout from scratch. The optional `alpha`
/// signal receives the layout temperature after every step.
#[component]
pub fn ForceGraphCanvas(
	/// Graph to draw.
	#[prop(into)]
	edges: Signal<Vec<Edge>>,
	/// Route to highlight; may be empty.
	#[prop(into)]
	path: Signal<Vec<PathEdge>>,
	/// Canvas width in pixels.
	#[prop(default = 600.0)]
	width: f64,
	/// Canvas height in pixels.
	#[prop(default = 400.0)]
	height: f64,
	/// Receives the layout temperature after every step.
	#[prop(optional)]
	alpha: Option<RwSignal<f64>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<ForceGraphState<NodeId>>> = Rc::new(RefCell::new(
		ForceGraphState::new(LayoutConfig::for_viewport(width, height)),
	));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	// Shared with `on_cleanup`, which needs `Send + Sync` captures.
	let alive = Arc::new(AtomicBool::new(true));
	let frame_id = Arc::new(AtomicI32::new(0));

	if let Some(alpha) = alpha {
		state
			.borrow_mut()
			.observe(move |frame| {
				let _ = alpha.try_set(frame.alpha);
			});
	}

	let state_data = state.clone();
	Effect::new(move |_| {
		let (edges, path) = (edges.get(), path.get());
		state_data.borrow_mut().update(&edges, &path);
	});

	let (state_init, animate_init, alive_init, frame_init) = (
		state.clone(),
		animate.clone(),
		alive.clone(),
		frame_id.clone(),
	);
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		canvas.set_width(width as u32);
		canvas.set_height(height as u32);
		let Some(ctx) = context_2d(&canvas) else {
			warn!("2d canvas context unavailable, graph will not be drawn");
			return;
		};
		let Some(window) = web_sys::window() else {
			return;
		};

		let (state_anim, alive_anim, frame_anim) =
			(state_init.clone(), alive_init.clone(), frame_init.clone());
		let animate_next = Rc::downgrade(&animate_init);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !alive_anim.load(Ordering::Relaxed) {
				return;
			}
			{
				let mut s = state_anim.borrow_mut();
				s.tick();
				let mut surface = CanvasSurface::new(&ctx, width, height, s.transform.clone());
				s.paint(&mut surface);
			}
			let Some(cell) = animate_next.upgrade() else {
				return;
			};
			if let (Some(cb), Some(window)) = (cell.borrow().as_ref(), web_sys::window()) {
				if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
					frame_anim.store(id, Ordering::Relaxed);
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				frame_init.store(id, Ordering::Relaxed);
			}
		}
	});

	let (alive_cleanup, frame_cleanup) = (alive.clone(), frame_id.clone());
	let state_cleanup = StoredValue::new_local(state.clone());
	on_cleanup(move || {
		alive_cleanup.store(false, Ordering::Relaxed);
		if let Some(window) = web_sys::window() {
			let _ = window.cancel_animation_frame(frame_cleanup.load(Ordering::Relaxed));
		}
		let _ = state_cleanup.try_with_value(|s| s.borrow_mut().dispose());
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some((x, y)) = pointer_position(canvas_ref, &ev) {
			state_md.borrow_mut().begin_pan(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some((x, y)) = pointer_position(canvas_ref, &ev) {
			state_mm.borrow_mut().pan_to(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		state_mu.borrow_mut().end_pan();
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		state_ml.borrow_mut().end_pan();
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some((x, y)) = pointer_position(canvas_ref, &ev) {
			state_wh.borrow_mut().zoom_at(x, y, ev.delta_y());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; margin: 0 auto; cursor: grab;"
		/>
	}
}
