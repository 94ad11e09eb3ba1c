use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, ResizeObserver, WheelEvent};

use super::frame::FrameLoop;
use super::interaction::{Dispatch, GraphEvent};
use super::layout::SimulationConfig;
use super::loader::FetchSequencer;
use super::render;
use super::state::{ForceGraphState, HoverCard};
use super::types::NodeDetail;
use super::viewport::WHEEL_ZOOM_STEP;
use crate::api::{GraphFilter, fetch_graph};
use crate::config::ApiConfig;
use crate::error::GraphError;

/// Longest frame charged against the layout cooldown, so a tab returning
/// from the background still gets its remaining ticks.
const MAX_FRAME_MS: f64 = 100.0;

/// Force-directed view of genres and documents.
///
/// Refetches whenever `genre_id` or `include_inactive` change; only the
/// newest response is ever applied. Clicking a document navigates to it.
/// Clicking a genre calls `on_genre_select`, or navigates to the filtered
/// document list when no callback is given.
#[component]
pub fn KnowledgeNetwork(
	#[prop(optional, into)] genre_id: Signal<Option<u32>>,
	#[prop(optional, into)] include_inactive: Signal<bool>,
	#[prop(optional, into)] on_genre_select: Option<Callback<Option<u32>>>,
) -> impl IntoView {
	let config = use_context::<ApiConfig>().unwrap_or_default();
	let navigate = use_navigate();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state = Rc::new(RefCell::new(ForceGraphState::new(
		SimulationConfig::default(),
		0.0,
		0.0,
	)));
	let frames = FrameLoop::<Closure<dyn FnMut()>>::default();
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let observer: Rc<RefCell<Option<ResizeObserver>>> = Rc::new(RefCell::new(None));
	let sequencer = FetchSequencer::default();

	let loading = RwSignal::new(true);
	let has_graph = RwSignal::new(false);
	let load_error = RwSignal::new(None::<GraphError>);
	let hover_card = RwSignal::new(None::<HoverCard>);
	let reload = RwSignal::new(0u32);

	let teardown = StoredValue::new_local((frames.clone(), resize_cb.clone(), observer.clone()));
	on_cleanup(move || {
		teardown.try_with_value(|(frames, resize_cb, observer)| {
			if let (Some(id), Some(window)) = (frames.stop(), web_sys::window()) {
				let _ = window.cancel_animation_frame(id);
			}
			if let Some(observer) = observer.borrow_mut().take() {
				observer.disconnect();
			}
			resize_cb.borrow_mut().take();
			debug!("knowledge network unmounted");
		});
	});

	let (state_fetch, frames_fetch) = (state.clone(), frames.clone());
	Effect::new(move |_| {
		reload.track();
		let filter = GraphFilter {
			genre_id: genre_id.get(),
			include_inactive: include_inactive.get(),
		};
		let ticket = sequencer.issue();
		let seq = ticket.seq();
		debug!("graph request #{seq} for {filter:?}");
		loading.set(true);

		let (config, state, frames) = (config.clone(), state_fetch.clone(), frames_fetch.clone());
		spawn_local(async move {
			let Some(result) = ticket.guard(fetch_graph(&config, &filter)).await else {
				debug!("discarding superseded graph response #{seq}");
				return;
			};
			if !frames.is_alive() {
				return;
			}
			match result {
				Ok(data) => {
					let seed = js_sys::Date::now() as u64;
					state.borrow_mut().load(data, filter.is_filtered(), seed);
					hover_card.set(None);
					has_graph.set(true);
					load_error.set(None);
				}
				Err(e) => {
					let class = if e.is_network() { "network" } else { "payload" };
					error!("failed to load network graph ({class}): {e}");
					load_error.set(Some(e));
				}
			}
			loading.set(false);
		});
	});

	let (state_init, frames_init) = (state.clone(), frames.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(ctx) = context_2d(&canvas) else {
			error!("canvas 2d context unavailable");
			return;
		};
		sync_size(&canvas, &state_init);

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb.borrow_mut() = Some(Closure::new(move || {
			sync_size(&canvas_resize, &state_resize);
		}));
		if let (Some(cb), Some(parent)) = (&*resize_cb.borrow(), canvas.parent_element()) {
			match ResizeObserver::new(cb.as_ref().unchecked_ref()) {
				Ok(obs) => {
					obs.observe(&parent);
					*observer.borrow_mut() = Some(obs);
				}
				Err(e) => error!("resize observer unavailable: {e:?}"),
			}
		}

		let (state_anim, frames_inner) = (state_init.clone(), frames_init.clone());
		let mut last_frame = js_sys::Date::now();
		frames_init.install(Closure::new(move || {
			if !frames_inner.is_alive() {
				return;
			}
			let now = js_sys::Date::now();
			let dt = (now - last_frame).clamp(0.0, MAX_FRAME_MS);
			last_frame = now;

			if let Ok(mut s) = state_anim.try_borrow_mut() {
				if s.tick(dt) {
					if let Err(e) = render::render(&s, &ctx) {
						debug!("{e}");
					}
				}
			}
			frames_inner.schedule(request_frame);
		}));
		frames_init.schedule(request_frame);
	});

	let dispatch = move |event: GraphEvent| {
		debug!("graph event {event:?}");
		match event.dispatch(on_genre_select.is_some()) {
			Dispatch::SelectGenre(genre_id) => {
				if let Some(cb) = on_genre_select {
					cb.run(genre_id);
				}
			}
			Dispatch::Navigate(route) => navigate(&route, Default::default()),
		}
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		state_md.borrow_mut().viewport.begin_pan(x, y);
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		let mut s = state_mm.borrow_mut();
		if s.viewport.pan.active {
			if s.viewport.drag_pan(x, y) {
				s.request_redraw();
			}
		} else if s.hover_at(x, y) {
			hover_card.set(s.hover_card());
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		let event = {
			let mut s = state_mu.borrow_mut();
			if s.viewport.end_pan() {
				s.click_at(x, y)
			} else {
				None
			}
		};
		if let Some(event) = event {
			dispatch(event);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		let mut s = state_ml.borrow_mut();
		s.viewport.end_pan();
		s.clear_hover();
		hover_card.set(None);
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		let factor = if ev.delta_y() > 0.0 {
			1.0 / WHEEL_ZOOM_STEP
		} else {
			WHEEL_ZOOM_STEP
		};
		let mut s = state_wh.borrow_mut();
		s.viewport.zoom_at(x, y, factor);
		s.request_redraw();
	};

	let state_zi = state.clone();
	let on_zoom_in = move |_: MouseEvent| {
		let mut s = state_zi.borrow_mut();
		s.viewport.zoom_in();
		s.request_redraw();
	};

	let state_zo = state.clone();
	let on_zoom_out = move |_: MouseEvent| {
		let mut s = state_zo.borrow_mut();
		s.viewport.zoom_out();
		s.request_redraw();
	};

	let state_fit = state.clone();
	let on_fit = move |_: MouseEvent| state_fit.borrow_mut().fit_to_view();

	view! {
		<div class="knowledge-network">
			<canvas
				node_ref=canvas_ref
				class="force-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>

			<div class="graph-controls">
				<button on:click=on_zoom_in title="Zoom in">"+"</button>
				<button on:click=on_zoom_out title="Zoom out">"-"</button>
				<button on:click=on_fit>"Fit to view"</button>
			</div>

			{move || hover_card.get().map(|card| view! { <HoverCardPanel card=card /> })}

			<Show when=move || loading.get() && !has_graph.get()>
				<div class="graph-overlay graph-loading">"Loading graph..."</div>
			</Show>
			<Show when=move || loading.get() && has_graph.get()>
				<div class="graph-updating">"Updating..."</div>
			</Show>

			{move || {
				load_error
					.get()
					.map(|e| {
						view! {
							<div class="graph-overlay graph-error">
								<p>{e.user_message()}</p>
								<button on:click=move |_| reload.update(|n| *n += 1)>"Retry"</button>
							</div>
						}
					})
			}}
		</div>
	}
}

#[component]
fn HoverCardPanel(card: HoverCard) -> impl IntoView {
	let detail = match card.detail {
		NodeDetail::Genre { document_count, .. } => view! {
			<div class="hover-card-detail">{format!("{document_count} documents")}</div>
		}
		.into_any(),
		NodeDetail::Document {
			view_count,
			helpful_count,
			..
		} => view! {
			<div class="hover-card-detail">
				<div>{format!("Views: {view_count}")}</div>
				<div>{format!("Helpful: {helpful_count}")}</div>
			</div>
		}
		.into_any(),
	};

	view! {
		<div class="hover-card">
			<div class="hover-card-title">{card.label}</div>
			{detail}
		</div>
	}
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

/// Size of the element the canvas fills.
fn container_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.unwrap_or((0.0, 0.0))
}

/// Match the canvas backing store and viewport to the container.
fn sync_size(canvas: &HtmlCanvasElement, state: &RefCell<ForceGraphState>) {
	let (w, h) = container_size(canvas);
	let Ok(mut s) = state.try_borrow_mut() else {
		return;
	};
	let vp = s.viewport.state();
	if w != vp.width || h != vp.height {
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		s.resize(w, h);
	}
}

fn pointer_position(
	canvas_ref: NodeRef<leptos::html::Canvas>,
	ev: &MouseEvent,
) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn request_frame(cb: &Closure<dyn FnMut()>) -> Option<i32> {
	web_sys::window()?
		.request_animation_frame(cb.as_ref().unchecked_ref())
		.ok()
}
