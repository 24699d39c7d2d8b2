//! Node and edge model, and construction of the constellation graph from groups.
//!
//! Every (group, item) pair becomes one [`Node`]. Items within a group are
//! fully meshed in both directions; nodes of different groups are linked
//! sparsely at random.
//!
//! Inter-group candidates are every unordered pair of nodes, so construction is
//! quadratic in the node count. That is fine for dashboard-sized datasets and
//! is the scaling limit of this builder.

use std::f64::consts::TAU;
use std::ops::Range;

use rand::Rng;

use super::types::Group;

/// Tunables for graph construction.
#[derive(Clone, Debug)]
pub struct GraphConfig {
	/// Chance that any pair of nodes from different groups is linked.
	pub inter_group_probability: f64,
	/// Range the per-node orbit radius is drawn from.
	pub orbit_radius: Range<f64>,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			inter_group_probability: 0.2,
			orbit_radius: 20.0..60.0,
		}
	}
}

/// One KPI of one group, with its simulation state.
#[derive(Clone, Debug)]
pub struct Node {
	/// `"<group>:<item>"`, unique across the graph and used as the edge join key.
	pub id: String,
	/// Name of the owning group.
	pub group: String,
	/// Position of the owning group in the dataset. Drives the palette color.
	pub group_index: usize,
	/// Creation order. Phase-offsets the periodic animations and the charge.
	pub index: usize,
	/// Position, owned by the simulation.
	pub x: f64,
	/// Position, owned by the simulation.
	pub y: f64,
	/// Velocity accumulator.
	pub vx: f64,
	/// Velocity accumulator.
	pub vy: f64,
	/// Starting phase of this node's personal orbit.
	pub angle: f64,
	/// Radius of this node's personal orbit.
	pub orbit_radius: f64,
	/// Fixed position while the node is held by a drag gesture.
	pub pinned: Option<(f64, f64)>,
}

impl Node {
	/// The item label, i.e. the id without its group prefix.
	pub fn label(&self) -> &str {
		self.id
			.strip_prefix(self.group.as_str())
			.and_then(|rest| rest.strip_prefix(':'))
			.unwrap_or(&self.id)
	}

	/// Whether a drag gesture currently holds this node.
	pub fn is_pinned(&self) -> bool {
		self.pinned.is_some()
	}
}

/// Which rule produced an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeKind {
	/// Ordered pair of distinct items in the same group.
	IntraGroup,
	/// Randomly selected pair of items from different groups.
	InterGroup,
}

/// A link between two nodes, referenced by id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
	/// Rule that produced this edge.
	pub kind: EdgeKind,
}

/// Nodes and edges ready to hand to the simulation.
#[derive(Clone, Debug, Default)]
pub struct Graph {
	/// Nodes in creation order (`nodes[i].index == i`).
	pub nodes: Vec<Node>,
	/// Intra-group edges first, then inter-group edges.
	pub edges: Vec<Edge>,
}

/// Compose a node id from its group name and item label.
pub fn node_id(group: &str, item: &str) -> String {
	format!("{group}:{item}")
}

/// Build the constellation graph for `groups`.
///
/// Edges are derived from the same traversal that creates the nodes, so every
/// edge endpoint names an existing node.
pub fn build_graph<R: Rng + ?Sized>(groups: &[Group], config: &GraphConfig, rng: &mut R) -> Graph {
	let mut nodes = Vec::with_capacity(groups.iter().map(|g| g.items.len()).sum());

	for (group_index, group) in groups.iter().enumerate() {
		for item in &group.items {
			let orbit_radius = if config.orbit_radius.is_empty() {
				config.orbit_radius.start
			} else {
				rng.gen_range(config.orbit_radius.clone())
			};
			nodes.push(Node {
				id: node_id(&group.name, item),
				group: group.name.clone(),
				group_index,
				index: nodes.len(),
				x: 0.0,
				y: 0.0,
				vx: 0.0,
				vy: 0.0,
				angle: rng.gen_range(0.0..TAU),
				orbit_radius,
				pinned: None,
			});
		}
	}

	let mut edges = Vec::new();

	// Dense mesh, both directions of every pair.
	let mut offset = 0;
	for group in groups {
		let members = &nodes[offset..offset + group.items.len()];
		for source in members {
			for target in members {
				if source.index != target.index {
					edges.push(Edge {
						source: source.id.clone(),
						target: target.id.clone(),
						kind: EdgeKind::IntraGroup,
					});
				}
			}
		}
		offset += group.items.len();
	}

	for (i, a) in nodes.iter().enumerate() {
		for b in &nodes[i + 1..] {
			if a.group_index != b.group_index && rng.r#gen::<f64>() < config.inter_group_probability {
				edges.push(Edge {
					source: a.id.clone(),
					target: b.id.clone(),
					kind: EdgeKind::InterGroup,
				});
			}
		}
	}

	Graph { nodes, edges }
}
