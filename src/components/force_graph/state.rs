use log::info;

use super::interaction::{GraphEvent, InteractionController};
use super::layout::{LayoutEngine, Point, SimulationConfig, StepOutcome};
use super::scale;
use super::types::{GraphData, GraphNode, NodeDetail};
use super::viewport::{Bounds, ViewportController};

/// Extra pick tolerance in screen pixels, so small nodes stay clickable.
pub const HIT_SLOP_PX: f64 = 3.0;

/// What the hover card shows for the node under the cursor.
#[derive(Clone, Debug, PartialEq)]
pub struct HoverCard {
	pub label: String,
	pub detail: NodeDetail,
}

/// Everything the canvas needs between frames: the current graph, its
/// layout, highlight state and camera.
pub struct ForceGraphState {
	pub data: GraphData,
	pub layout: LayoutEngine,
	pub interaction: InteractionController,
	pub viewport: ViewportController,
	filtered: bool,
	needs_redraw: bool,
}

impl ForceGraphState {
	pub fn new(config: SimulationConfig, width: f64, height: f64) -> Self {
		Self {
			data: GraphData::default(),
			layout: LayoutEngine::new(config),
			interaction: InteractionController::default(),
			viewport: ViewportController::new(width, height),
			filtered: false,
			needs_redraw: true,
		}
	}

	/// Swap in a freshly fetched graph. The camera is left alone.
	pub fn load(&mut self, data: GraphData, filtered: bool, seed: u64) {
		info!(
			"loading graph: {} nodes, {} links{}",
			data.nodes.len(),
			data.links.len(),
			if filtered { " (filtered)" } else { "" }
		);
		let (w, h) = (self.viewport.state().width, self.viewport.state().height);
		self.layout.load(&data, w, h, seed);
		self.data = data;
		self.filtered = filtered;
		self.interaction.reset();
		self.needs_redraw = true;
	}

	/// Advance one frame. Returns true when the canvas should be repainted.
	pub fn tick(&mut self, dt_ms: f64) -> bool {
		match self.layout.step(dt_ms) {
			StepOutcome::Stabilized => {
				let bounds = self.bounds();
				self.viewport.auto_fit(bounds, self.filtered);
				self.needs_redraw = false;
				true
			}
			StepOutcome::Moved => {
				self.needs_redraw = false;
				true
			}
			StepOutcome::Settled => std::mem::take(&mut self.needs_redraw),
		}
	}

	pub fn request_redraw(&mut self) {
		self.needs_redraw = true;
	}

	pub fn bounds(&self) -> Option<Bounds> {
		Bounds::of_circles(
			self.data
				.nodes
				.iter()
				.zip(self.layout.positions())
				.map(|(node, p)| (*p, scale::node_radius(node))),
		)
	}

	pub fn fit_to_view(&mut self) {
		let bounds = self.bounds();
		if self.viewport.fit_to_view(bounds) {
			self.needs_redraw = true;
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		if self.viewport.resize(width, height) {
			self.needs_redraw = true;
		}
	}

	/// Topmost node under a screen point, if any.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let g = self.viewport.screen_to_graph(sx, sy);
		let slop = HIT_SLOP_PX / self.viewport.zoom();
		self.data
			.nodes
			.iter()
			.zip(self.layout.positions())
			.enumerate()
			.rev()
			.find(|(_, (node, p))| {
				let r = scale::node_radius(node) + slop;
				(p.x - g.x).hypot(p.y - g.y) <= r
			})
			.map(|(i, _)| i)
	}

	/// Update highlighting for the node under the cursor. Returns whether the
	/// hover target changed.
	pub fn hover_at(&mut self, sx: f64, sy: f64) -> bool {
		let node_id = self
			.node_at_position(sx, sy)
			.map(|i| self.data.nodes[i].id.as_str());
		let changed = self.interaction.on_hover(&self.data, node_id);
		if changed {
			self.needs_redraw = true;
		}
		changed
	}

	pub fn clear_hover(&mut self) {
		if self.interaction.on_hover(&self.data, None) {
			self.needs_redraw = true;
		}
	}

	pub fn click_at(&self, sx: f64, sy: f64) -> Option<GraphEvent> {
		let i = self.node_at_position(sx, sy)?;
		self.interaction.on_click(&self.data, &self.data.nodes[i].id)
	}

	pub fn hovered_node(&self) -> Option<&GraphNode> {
		let id = self.interaction.highlight().selected_node_id.as_deref()?;
		self.data.node(id)
	}

	pub fn hover_card(&self) -> Option<HoverCard> {
		self.hovered_node().map(|node| HoverCard {
			label: node.label.clone(),
			detail: node.detail.clone(),
		})
	}

	/// Node positions paired with their nodes, for drawing.
	pub fn placed_nodes(&self) -> impl Iterator<Item = (&GraphNode, Point)> {
		self.data
			.nodes
			.iter()
			.zip(self.layout.positions().iter().copied())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::layout::LayoutPhase;
	use crate::components::force_graph::types::{GraphLink, LinkKind};

	fn graph(genre_id: u32) -> GraphData {
		GraphData {
			nodes: vec![
				GraphNode {
					id: format!("genre_{genre_id}"),
					label: "Ops".into(),
					detail: NodeDetail::Genre {
						genre_id,
						level: 1,
						document_count: 4,
					},
				},
				GraphNode {
					id: "doc_42".into(),
					label: "Runbook".into(),
					detail: NodeDetail::Document {
						document_id: 42,
						view_count: 10,
						helpful_count: 2,
					},
				},
			],
			links: vec![GraphLink {
				source: format!("genre_{genre_id}"),
				target: "doc_42".into(),
				kind: LinkKind::GenreDocument,
			}],
		}
	}

	fn settle(state: &mut ForceGraphState) {
		for _ in 0..500 {
			state.tick(16.0);
		}
	}

	fn screen_of(state: &ForceGraphState, id: &str) -> (f64, f64) {
		let i = state.data.nodes.iter().position(|n| n.id == id).unwrap();
		state.viewport.graph_to_screen(state.layout.positions()[i])
	}

	#[test]
	fn first_unfiltered_load_auto_fits() {
		let mut state = ForceGraphState::new(SimulationConfig::default(), 800.0, 600.0);
		state.load(graph(1), false, 11);
		settle(&mut state);
		assert_eq!(state.layout.phase(), LayoutPhase::Stabilized);
		assert!(state.viewport.state().has_auto_fitted);

		let expected = {
			let mut vp = ViewportController::new(800.0, 600.0);
			vp.fit_to_view(state.bounds());
			vp.state().clone()
		};
		assert_eq!(state.viewport.state().zoom, expected.zoom);
	}

	#[test]
	fn filtered_reload_preserves_camera() {
		let mut state = ForceGraphState::new(SimulationConfig::default(), 800.0, 600.0);
		state.load(graph(1), false, 11);
		settle(&mut state);

		state.viewport.zoom_at(100.0, 100.0, 2.0);
		let camera = state.viewport.state().clone();
		state.load(graph(7), true, 12);
		settle(&mut state);
		assert_eq!(state.viewport.state(), &camera);
	}

	#[test]
	fn resize_never_reseeds() {
		let mut state = ForceGraphState::new(SimulationConfig::default(), 800.0, 600.0);
		state.load(graph(1), false, 11);
		settle(&mut state);
		let positions = state.layout.positions().to_vec();
		state.resize(1200.0, 900.0);
		assert!(state.tick(16.0));
		assert_eq!(state.layout.positions(), positions.as_slice());
		assert_eq!(state.layout.phase(), LayoutPhase::Stabilized);
	}

	#[test]
	fn redraws_only_on_demand_after_stabilizing() {
		let mut state = ForceGraphState::new(SimulationConfig::default(), 800.0, 600.0);
		state.load(graph(1), false, 11);
		settle(&mut state);
		assert!(!state.tick(16.0));
		state.request_redraw();
		assert!(state.tick(16.0));
		assert!(!state.tick(16.0));
	}

	#[test]
	fn hover_and_click_hit_nodes_on_screen() {
		let mut state = ForceGraphState::new(SimulationConfig::default(), 800.0, 600.0);
		state.load(graph(7), false, 11);
		settle(&mut state);

		let (sx, sy) = screen_of(&state, "doc_42");
		assert!(state.hover_at(sx, sy));
		assert!(state.interaction.is_node_highlighted("genre_7"));
		let card = state.hover_card().unwrap();
		assert_eq!(card.label, "Runbook");

		assert_eq!(
			state.click_at(sx, sy),
			Some(GraphEvent::NavigateToDocument { document_id: 42 })
		);
		let (gx, gy) = screen_of(&state, "genre_7");
		assert_eq!(
			state.click_at(gx, gy),
			Some(GraphEvent::GenreSelected { genre_id: 7 })
		);

		state.clear_hover();
		assert!(state.hover_card().is_none());
		assert!(state.interaction.highlight().highlighted_node_ids.is_empty());
	}

	#[test]
	fn empty_space_hits_nothing() {
		let mut state = ForceGraphState::new(SimulationConfig::default(), 800.0, 600.0);
		state.load(graph(1), false, 11);
		settle(&mut state);
		let far = state.viewport.graph_to_screen(Point {
			x: 1.0e6,
			y: 1.0e6,
		});
		assert_eq!(state.node_at_position(far.0, far.1), None);
		assert_eq!(state.click_at(far.0, far.1), None);
	}

	#[test]
	fn reload_drops_stale_highlight() {
		let mut state = ForceGraphState::new(SimulationConfig::default(), 800.0, 600.0);
		state.load(graph(1), false, 11);
		settle(&mut state);
		let (sx, sy) = screen_of(&state, "doc_42");
		state.hover_at(sx, sy);
		state.load(graph(2), true, 12);
		assert!(!state.interaction.highlight().is_active());
	}
}
