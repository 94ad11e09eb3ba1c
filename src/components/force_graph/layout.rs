use std::collections::HashMap;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::{debug, info};

use super::types::GraphData;

const NODE_MASS: f32 = 2.0;
/// Per-pair force cap, so nodes seeded on top of each other do not fly apart.
const FORCE_MAX: f32 = 10.0;
/// Integrator step of one tick. Frame time only feeds the cooldown clock.
const TICK: f32 = 1.0;
/// Keeps seeded nodes apart even when the container has no size yet.
const MIN_SPREAD: f64 = 50.0;

/// Tuning knobs of the force simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
	/// Pairwise repulsion; negative values push nodes apart.
	pub charge_strength: f32,
	pub link_strength: f32,
	pub center_strength: f64,
	pub velocity_decay: f32,
	pub alpha_decay: f64,
	pub alpha_min: f64,
	pub warmup_ticks: u32,
	pub cooldown_ms: f64,
	/// Seeding square side as a fraction of `min(width, height)`.
	pub spread_factor: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			charge_strength: -100.0,
			link_strength: 0.05,
			center_strength: 0.05,
			velocity_decay: 0.4,
			alpha_decay: 0.0228,
			alpha_min: 0.001,
			warmup_ticks: 0,
			cooldown_ms: 2000.0,
			spread_factor: 0.35,
		}
	}
}

impl SimulationConfig {
	/// Force parameters at the given temperature. Charge and springs scale
	/// with `alpha`; damping does not.
	fn parameters(&self, alpha: f64) -> SimulationParameters {
		let alpha = alpha as f32;
		SimulationParameters {
			force_charge: -self.charge_strength * alpha,
			force_spring: self.link_strength * alpha,
			force_max: FORCE_MAX,
			node_speed: 1.0,
			damping_factor: 1.0 - self.velocity_decay,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutPhase {
	Idle,
	Seeding,
	Simulating,
	Stabilized,
}

/// What a single simulation step did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
	/// Nothing to simulate.
	Settled,
	/// Positions moved.
	Moved,
	/// Positions moved and the layout just converged. Reported once per graph.
	Stabilized,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

/// Deterministic seeding sequence, so layouts can be reproduced from a seed.
struct Lcg(u64);

impl Lcg {
	fn next_unit(&mut self) -> f64 {
		self.0 = (self.0 * 9301 + 49297) % 233280;
		self.0 as f64 / 233280.0
	}
}

/// Owns node positions. Everything else reads [`LayoutEngine::positions`].
pub struct LayoutEngine {
	config: SimulationConfig,
	graph: ForceGraph<usize, ()>,
	positions: Vec<Point>,
	phase: LayoutPhase,
	alpha: f64,
	elapsed_ms: f64,
	ticks: u32,
}

impl LayoutEngine {
	pub fn new(config: SimulationConfig) -> Self {
		let graph = ForceGraph::new(config.parameters(0.0));
		Self {
			config,
			graph,
			positions: Vec::new(),
			phase: LayoutPhase::Idle,
			alpha: 0.0,
			elapsed_ms: 0.0,
			ticks: 0,
		}
	}

	/// Replace the simulated graph. Prior positions are discarded and the old
	/// simulation is dropped with them.
	pub fn load(&mut self, data: &GraphData, width: f64, height: f64, seed: u64) {
		self.phase = LayoutPhase::Seeding;
		self.graph = ForceGraph::new(self.config.parameters(1.0));
		self.positions = Vec::with_capacity(data.nodes.len());

		let spread = (width.min(height) * self.config.spread_factor).max(MIN_SPREAD);
		let mut rng = Lcg(seed % 233280);
		let mut id_to_idx: HashMap<&str, DefaultNodeIdx> = HashMap::new();

		for (i, node) in data.nodes.iter().enumerate() {
			let (x, y) = (
				(rng.next_unit() - 0.5) * spread,
				(rng.next_unit() - 0.5) * spread,
			);
			let idx = self.graph.add_node(NodeData {
				x: x as f32,
				y: y as f32,
				mass: NODE_MASS,
				is_anchor: false,
				user_data: i,
			});
			id_to_idx.insert(node.id.as_str(), idx);
			self.positions.push(Point { x, y });
		}

		for link in &data.links {
			if let (Some(&src), Some(&tgt)) = (
				id_to_idx.get(link.source.as_str()),
				id_to_idx.get(link.target.as_str()),
			) {
				self.graph.add_edge(src, tgt, EdgeData::default());
			}
		}

		self.alpha = 1.0;
		self.elapsed_ms = 0.0;
		self.ticks = 0;
		self.phase = LayoutPhase::Simulating;
		debug!(
			"layout seeded {} nodes within {:.0} units",
			data.nodes.len(),
			spread
		);

		for _ in 0..self.config.warmup_ticks {
			self.integrate();
		}
	}

	/// Run one tick and charge `dt_ms` against the cooldown.
	pub fn step(&mut self, dt_ms: f64) -> StepOutcome {
		if self.phase != LayoutPhase::Simulating {
			return StepOutcome::Settled;
		}
		self.elapsed_ms += dt_ms;
		self.integrate();

		if self.alpha < self.config.alpha_min || self.elapsed_ms >= self.config.cooldown_ms {
			self.phase = LayoutPhase::Stabilized;
			info!(
				"layout stabilized after {} ticks ({:.0} ms, alpha {:.4})",
				self.ticks, self.elapsed_ms, self.alpha
			);
			return StepOutcome::Stabilized;
		}
		StepOutcome::Moved
	}

	fn integrate(&mut self) {
		self.alpha += (0.0 - self.alpha) * self.config.alpha_decay;
		self.ticks += 1;

		self.graph.parameters = self.config.parameters(self.alpha);
		self.graph.update(TICK);
		self.apply_centering();
		self.snapshot();
	}

	/// Shift the whole layout so its mean drifts toward the origin.
	fn apply_centering(&mut self) {
		let (mut sx, mut sy, mut n) = (0.0_f64, 0.0_f64, 0usize);
		self.graph.visit_nodes(|node| {
			sx += node.x() as f64;
			sy += node.y() as f64;
			n += 1;
		});
		if n == 0 {
			return;
		}
		let strength = self.config.center_strength;
		let (dx, dy) = (
			(sx / n as f64 * strength) as f32,
			(sy / n as f64 * strength) as f32,
		);
		self.graph.visit_nodes_mut(|node| {
			node.data.x -= dx;
			node.data.y -= dy;
		});
	}

	fn snapshot(&mut self) {
		let positions = &mut self.positions;
		self.graph.visit_nodes(|node| {
			let (x, y) = (node.x() as f64, node.y() as f64);
			// A non-finite step keeps the last good position.
			if x.is_finite() && y.is_finite() {
				if let Some(p) = positions.get_mut(node.data.user_data) {
					*p = Point { x, y };
				}
			}
		});
	}

	/// Positions indexed like the loaded `GraphData::nodes`.
	pub fn positions(&self) -> &[Point] {
		&self.positions
	}

	#[cfg(test)]
	pub fn phase(&self) -> LayoutPhase {
		self.phase
	}

	#[cfg(test)]
	pub fn alpha(&self) -> f64 {
		self.alpha
	}
}
