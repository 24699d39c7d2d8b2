//! Projection of simulation positions onto the visual surface.
//!
//! Runs once per unpaused tick, strictly after integration. It owns no state:
//! everything it writes is derived from the simulation and the tick counter.

use super::simulation::Simulation;
use super::theme::Theme;

const RADIUS_BASE: f64 = 10.0;
const RADIUS_PULSE: f64 = 1.5;
const RADIUS_PULSE_PERIOD: f64 = 90.0;

/// Per-node and per-edge attribute setters of the drawing surface.
pub trait Surface {
	/// Place node `index` at `(x, y)` with the given radius.
	fn set_node(&mut self, index: usize, x: f64, y: f64, radius: f64);
	/// Place edge `index` between two points.
	fn set_edge(&mut self, index: usize, from: (f64, f64), to: (f64, f64));
}

/// Cosmetic radius pulse, phase-offset per node.
pub fn pulse_radius(tick: u64, index: usize) -> f64 {
	RADIUS_BASE + RADIUS_PULSE * (tick as f64 / RADIUS_PULSE_PERIOD + index as f64).sin()
}

/// Write current node and edge positions into `surface`.
pub fn sync<S: Surface + ?Sized>(sim: &Simulation, tick: u64, surface: &mut S) {
	let nodes = sim.nodes();
	for (i, (source, target)) in sim.link_endpoints().enumerate() {
		let (s, t) = (&nodes[source], &nodes[target]);
		surface.set_edge(i, (s.x, s.y), (t.x, t.y));
	}
	for node in nodes {
		surface.set_node(node.index, node.x, node.y, pulse_radius(tick, node.index));
	}
}

/// Visual attributes of one node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeVisual {
	/// Center.
	pub x: f64,
	/// Center.
	pub y: f64,
	/// Circle radius.
	pub radius: f64,
	/// CSS fill color from the group palette.
	pub fill: String,
}

/// Visual attributes of one edge.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeVisual {
	/// Source end.
	pub from: (f64, f64),
	/// Target end.
	pub to: (f64, f64),
}

/// The retained scene the canvas painter draws every animation frame.
#[derive(Clone, Debug, Default)]
pub struct SceneFrame {
	/// One entry per simulation node.
	pub nodes: Vec<NodeVisual>,
	/// One entry per resolved link.
	pub edges: Vec<EdgeVisual>,
}

impl SceneFrame {
	/// A frame mirroring the simulation's current positions, colored by group.
	pub fn new(sim: &Simulation, theme: &Theme) -> Self {
		let positions = sim.nodes();
		Self {
			nodes: positions
				.iter()
				.map(|n| NodeVisual {
					x: n.x,
					y: n.y,
					radius: theme.node.initial_radius,
					fill: theme.palette.get(n.group_index).to_css(),
				})
				.collect(),
			edges: sim
				.link_endpoints()
				.map(|(s, t)| EdgeVisual {
					from: (positions[s].x, positions[s].y),
					to: (positions[t].x, positions[t].y),
				})
				.collect(),
		}
	}

	/// Topmost node whose circle contains `(x, y)`, in world coordinates.
	pub fn node_at(&self, x: f64, y: f64) -> Option<usize> {
		self.nodes.iter().rposition(|n| {
			let (dx, dy) = (n.x - x, n.y - y);
			dx * dx + dy * dy <= n.radius * n.radius
		})
	}
}

impl Surface for SceneFrame {
	fn set_node(&mut self, index: usize, x: f64, y: f64, radius: f64) {
		if let Some(node) = self.nodes.get_mut(index) {
			node.x = x;
			node.y = y;
			node.radius = radius;
		}
	}

	fn set_edge(&mut self, index: usize, from: (f64, f64), to: (f64, f64)) {
		if let Some(edge) = self.edges.get_mut(index) {
			edge.from = from;
			edge.to = to;
		}
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;
	use crate::components::constellation::graph::{GraphConfig, build_graph};
	use crate::components::constellation::simulation::SimulationConfig;
	use crate::components::constellation::types::Group;

	fn make_sim() -> Simulation {
		let mut rng = StdRng::seed_from_u64(3);
		let graph = build_graph(
			&[Group::new("A", ["x", "y", "z"]), Group::new("B", ["w"])],
			&GraphConfig::default(),
			&mut rng,
		);
		Simulation::new(graph, (300.0, 300.0), SimulationConfig::default(), 0.0, rng)
	}

	#[test]
	fn pulse_stays_within_band() {
		for tick in [0, 1, 45, 90, 1000, 123_456] {
			for index in 0..8 {
				let r = pulse_radius(tick, index);
				assert!((8.5..=11.5).contains(&r), "radius {r}");
			}
		}
		assert_eq!(pulse_radius(0, 0), 10.0);
	}

	#[test]
	fn frame_starts_with_initial_radius_and_group_colors() {
		let sim = make_sim();
		let theme = Theme::default();
		let frame = SceneFrame::new(&sim, &theme);

		assert_eq!(frame.nodes.len(), 4);
		assert_eq!(frame.edges.len(), sim.link_endpoints().count());
		assert!(frame.nodes.iter().all(|n| n.radius == 12.0));
		assert_eq!(frame.nodes[0].fill, "#1f77b4");
		assert_eq!(frame.nodes[3].fill, "#ff7f0e");
	}

	#[test]
	fn sync_copies_positions_and_pulse() {
		let mut sim = make_sim();
		let mut frame = SceneFrame::new(&sim, &Theme::default());
		for _ in 0..5 {
			sim.step();
		}

		sync(&sim, 7, &mut frame);

		for (visual, node) in frame.nodes.iter().zip(sim.nodes()) {
			assert_eq!((visual.x, visual.y), (node.x, node.y));
			assert_eq!(visual.radius, pulse_radius(7, node.index));
		}
		for (edge, (s, t)) in frame.edges.iter().zip(sim.link_endpoints()) {
			assert_eq!(edge.from, (sim.nodes()[s].x, sim.nodes()[s].y));
			assert_eq!(edge.to, (sim.nodes()[t].x, sim.nodes()[t].y));
		}
	}

	#[test]
	fn hit_test_uses_current_radius() {
		let sim = make_sim();
		let mut frame = SceneFrame::new(&sim, &Theme::default());
		frame.set_node(0, 0.0, 0.0, 10.0);
		frame.set_node(1, 1000.0, 1000.0, 10.0);

		assert_eq!(frame.node_at(5.0, 5.0), Some(0));
		assert_eq!(frame.node_at(1000.0, 1009.0), Some(1));
		assert_eq!(frame.node_at(500.0, 500.0), None);
	}

	#[test]
	fn out_of_range_writes_are_ignored() {
		let sim = make_sim();
		let mut frame = SceneFrame::new(&sim, &Theme::default());
		let before = frame.nodes.clone();
		frame.set_node(99, 1.0, 2.0, 3.0);
		frame.set_edge(99, (0.0, 0.0), (1.0, 1.0));
		assert_eq!(frame.nodes, before);
	}
}
