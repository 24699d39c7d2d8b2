//! Force simulation driving the constellation layout.
//!
//! Follows d3-force conventions: each step relaxes `alpha` toward its target,
//! applies the link, charge, collision and centering forces to node
//! velocities, then integrates. Unlike a layout that is meant to converge,
//! the defaults use zero alpha decay, so the simulation never cools down.
//!
//! Charge is computed exactly over all node pairs, which is quadratic per
//! step. That matches the small datasets this view is meant for.

use std::collections::HashMap;
use std::f64::consts::PI;

use log::{info, warn};
use rand::Rng;
use rand::rngs::StdRng;

use super::graph::{Edge, Graph, Node};

/// Configuration for the force simulation.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
	/// Rest length of links.
	pub link_distance: f64,
	/// Link stiffness.
	pub link_strength: f64,
	/// Mean repulsion strength (negative repels).
	pub charge_base: f64,
	/// Amplitude of the per-node repulsion oscillation.
	pub charge_amplitude: f64,
	/// Wall-clock divisor (ms) of the repulsion oscillation.
	pub charge_period_ms: f64,
	/// Distances below this are clamped when computing charge.
	pub charge_distance_min: f64,
	/// Collision radius of every node.
	pub collision_radius: f64,
	/// Fraction of the overlap corrected per step.
	pub collision_strength: f64,
	/// How strongly the centroid is moved onto the center.
	pub center_strength: f64,
	/// Fraction of velocity lost per step.
	pub velocity_decay: f64,
	/// Starting alpha.
	pub alpha: f64,
	/// The simulation stops once alpha drops below this.
	pub alpha_min: f64,
	/// Rate at which alpha approaches its target.
	pub alpha_decay: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			link_distance: 130.0,
			link_strength: 0.07,
			charge_base: -90.0,
			charge_amplitude: 10.0,
			charge_period_ms: 4000.0,
			charge_distance_min: 1.0,
			collision_radius: 15.0,
			collision_strength: 1.0,
			center_strength: 1.0,
			velocity_decay: 0.08,
			alpha: 1.0,
			alpha_min: 0.001,
			alpha_decay: 0.0,
		}
	}
}

/// A resolved edge: node indices plus the d3 degree bias.
#[derive(Debug, Clone, Copy)]
struct Link {
	source: usize,
	target: usize,
	/// Share of the correction applied to the target.
	bias: f64,
}

/// Iterative force solver over the constellation nodes.
pub struct Simulation {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	links: Vec<Link>,
	strengths: Vec<f64>,
	config: SimulationConfig,
	alpha: f64,
	alpha_target: f64,
	center: (f64, f64),
	running: bool,
	rng: StdRng,
	node_id_to_index: HashMap<String, usize>,
}

impl Simulation {
	/// Create a simulation for `graph`, centered on `center`.
	///
	/// Nodes are laid out on a phyllotaxis spiral around the center. Charge
	/// strengths are computed for wall-clock time `now_ms`. `rng` is only used
	/// to separate coincident points.
	pub fn new(
		graph: Graph,
		center: (f64, f64),
		config: SimulationConfig,
		now_ms: f64,
		rng: StdRng,
	) -> Self {
		let Graph { mut nodes, edges } = graph;

		let initial_angle = PI * (3.0 - 5.0_f64.sqrt());
		for (i, node) in nodes.iter_mut().enumerate() {
			let radius = 10.0 * (0.5 + i as f64).sqrt();
			let angle = i as f64 * initial_angle;
			node.x = center.0 + radius * angle.cos();
			node.y = center.1 + radius * angle.sin();
		}

		let node_id_to_index: HashMap<String, usize> = nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.clone(), i))
			.collect();

		let resolved: Vec<(usize, usize)> = edges
			.iter()
			.filter_map(|e| {
				let source = node_id_to_index.get(&e.source)?;
				let target = node_id_to_index.get(&e.target)?;
				Some((*source, *target))
			})
			.collect();

		let mut degree = vec![0usize; nodes.len()];
		for &(source, target) in &resolved {
			degree[source] += 1;
			degree[target] += 1;
		}
		let links = resolved
			.into_iter()
			.map(|(source, target)| Link {
				source,
				target,
				bias: degree[source] as f64 / (degree[source] + degree[target]) as f64,
			})
			.collect();

		info!(
			"kpi-constellation: simulation ready with {} nodes, {} links",
			nodes.len(),
			edges.len()
		);

		let mut sim = Self {
			strengths: vec![0.0; nodes.len()],
			nodes,
			edges,
			links,
			alpha: config.alpha,
			alpha_target: 0.0,
			config,
			center,
			running: true,
			rng,
			node_id_to_index,
		};
		sim.recompute_charge(now_ms);
		sim
	}

	/// All nodes, indexed by creation order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Mutable access for velocity perturbation.
	pub fn nodes_mut(&mut self) -> &mut [Node] {
		&mut self.nodes
	}

	/// Edges as built, including any whose endpoints could not be resolved.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Resolved `(source, target)` node indices, one per drawable edge.
	pub fn link_endpoints(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
		self.links.iter().map(|l| (l.source, l.target))
	}

	/// Index of the node with the given id.
	pub fn node_index(&self, id: &str) -> Option<usize> {
		self.node_id_to_index.get(id).copied()
	}

	/// Current repulsion strength of each node.
	pub fn charge_strengths(&self) -> &[f64] {
		&self.strengths
	}

	/// Active configuration.
	pub fn config(&self) -> &SimulationConfig {
		&self.config
	}

	/// Current alpha.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// The value alpha relaxes toward.
	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// Set the value alpha relaxes toward.
	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	/// Whether [`Simulation::step`] does any work.
	pub fn is_running(&self) -> bool {
		self.running
	}

	/// Resume stepping after the simulation stopped.
	pub fn restart(&mut self) {
		self.running = true;
	}

	/// Stop stepping until [`Simulation::restart`].
	pub fn stop(&mut self) {
		self.running = false;
	}

	/// Point the centering force at a new viewport center.
	pub fn set_center(&mut self, x: f64, y: f64) {
		self.center = (x, y);
	}

	/// Recompute every node's repulsion strength for wall-clock time `now_ms`.
	///
	/// Each node oscillates independently, phase-offset by its index.
	pub fn recompute_charge(&mut self, now_ms: f64) {
		let SimulationConfig {
			charge_base,
			charge_amplitude,
			charge_period_ms,
			..
		} = self.config;
		for (i, strength) in self.strengths.iter_mut().enumerate() {
			*strength = charge_base + charge_amplitude * (now_ms / charge_period_ms + i as f64).sin();
		}
	}

	/// Hold node `index` at `(x, y)`. Returns false for unknown nodes.
	pub fn pin(&mut self, index: usize, x: f64, y: f64) -> bool {
		match self.nodes.get_mut(index) {
			Some(node) => {
				node.pinned = Some((x, y));
				true
			}
			None => false,
		}
	}

	/// Release node `index`. Returns false if it was not pinned.
	pub fn unpin(&mut self, index: usize) -> bool {
		self.nodes
			.get_mut(index)
			.and_then(|node| node.pinned.take())
			.is_some()
	}

	/// Sum of squared node velocities.
	pub fn kinetic_energy(&self) -> f64 {
		self.nodes.iter().map(|n| n.vx * n.vx + n.vy * n.vy).sum()
	}

	/// Run one simulation step. Returns false if the simulation is stopped.
	pub fn step(&mut self) -> bool {
		if !self.running {
			return false;
		}

		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;

		if !self.nodes.is_empty() {
			self.apply_link_force();
			self.apply_charge_force();
			self.apply_collision_force();
			self.apply_center_force();
			self.integrate();
		}

		if self.alpha < self.config.alpha_min {
			self.running = false;
		}
		true
	}

	/// Pull linked nodes toward the rest length.
	fn apply_link_force(&mut self) {
		let alpha = self.alpha;
		let SimulationConfig {
			link_distance,
			link_strength,
			..
		} = self.config;

		for link in &self.links {
			let (s, t) = (&self.nodes[link.source], &self.nodes[link.target]);
			let mut dx = t.x + t.vx - s.x - s.vx;
			let mut dy = t.y + t.vy - s.y - s.vy;
			if dx == 0.0 {
				dx = jiggle(&mut self.rng);
			}
			if dy == 0.0 {
				dy = jiggle(&mut self.rng);
			}

			let dist = (dx * dx + dy * dy).sqrt();
			let l = (dist - link_distance) / dist * alpha * link_strength;
			dx *= l;
			dy *= l;

			let target = &mut self.nodes[link.target];
			target.vx -= dx * link.bias;
			target.vy -= dy * link.bias;
			let source = &mut self.nodes[link.source];
			source.vx += dx * (1.0 - link.bias);
			source.vy += dy * (1.0 - link.bias);
		}
	}

	/// Pairwise repulsion using each node's current strength.
	fn apply_charge_force(&mut self) {
		let alpha = self.alpha;
		let min_sq = self.config.charge_distance_min * self.config.charge_distance_min;
		let n = self.nodes.len();

		let mut deltas = vec![(0.0, 0.0); n];
		for i in 0..n {
			for j in 0..n {
				if i == j {
					continue;
				}
				let mut dx = self.nodes[j].x - self.nodes[i].x;
				let mut dy = self.nodes[j].y - self.nodes[i].y;
				let mut l = dx * dx + dy * dy;
				if dx == 0.0 {
					dx = jiggle(&mut self.rng);
					l += dx * dx;
				}
				if dy == 0.0 {
					dy = jiggle(&mut self.rng);
					l += dy * dy;
				}
				if l < min_sq {
					l = (min_sq * l).sqrt();
				}
				let w = self.strengths[j] * alpha / l;
				deltas[i].0 += dx * w;
				deltas[i].1 += dy * w;
			}
		}

		for (node, (dvx, dvy)) in self.nodes.iter_mut().zip(deltas) {
			node.vx += dvx;
			node.vy += dvy;
		}
	}

	/// Push apart nodes closer than twice the collision radius.
	fn apply_collision_force(&mut self) {
		let r = self.config.collision_radius * 2.0;
		let r_sq = r * r;
		let strength = self.config.collision_strength;
		// Equal radii split the correction evenly.
		let share = 0.5;
		let n = self.nodes.len();

		for i in 0..n {
			let xi = self.nodes[i].x + self.nodes[i].vx;
			let yi = self.nodes[i].y + self.nodes[i].vy;
			for j in (i + 1)..n {
				let other = &self.nodes[j];
				let mut dx = xi - (other.x + other.vx);
				let mut dy = yi - (other.y + other.vy);
				let mut l = dx * dx + dy * dy;
				if l >= r_sq {
					continue;
				}
				if dx == 0.0 {
					dx = jiggle(&mut self.rng);
					l += dx * dx;
				}
				if dy == 0.0 {
					dy = jiggle(&mut self.rng);
					l += dy * dy;
				}
				let dist = l.sqrt();
				let k = (r - dist) / dist * strength;
				dx *= k;
				dy *= k;

				self.nodes[i].vx += dx * share;
				self.nodes[i].vy += dy * share;
				self.nodes[j].vx -= dx * (1.0 - share);
				self.nodes[j].vy -= dy * (1.0 - share);
			}
		}
	}

	/// Translate all nodes so the centroid moves onto the center.
	fn apply_center_force(&mut self) {
		let n = self.nodes.len() as f64;
		let (sx, sy) = self
			.nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let shift_x = (sx / n - self.center.0) * self.config.center_strength;
		let shift_y = (sy / n - self.center.1) * self.config.center_strength;
		for node in &mut self.nodes {
			node.x -= shift_x;
			node.y -= shift_y;
		}
	}

	fn integrate(&mut self) {
		let retain = 1.0 - self.config.velocity_decay;
		for node in &mut self.nodes {
			match node.pinned {
				Some((fx, fy)) => {
					node.x = fx;
					node.y = fy;
					node.vx = 0.0;
					node.vy = 0.0;
				}
				None => {
					node.vx *= retain;
					node.vy *= retain;
					node.x += node.vx;
					node.y += node.vy;
				}
			}

			if !(node.x.is_finite() && node.y.is_finite()) {
				warn!(
					"kpi-constellation: node {} reached a non-finite position, recentering",
					node.id
				);
				node.x = self.center.0;
				node.y = self.center.1;
				node.vx = 0.0;
				node.vy = 0.0;
			}
		}
	}
}

/// Tiny random offset used to separate coincident points.
fn jiggle(rng: &mut StdRng) -> f64 {
	(rng.r#gen::<f64>() - 0.5) * 1e-6
}
