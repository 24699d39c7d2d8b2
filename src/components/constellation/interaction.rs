//! Pointer interaction layered over the running simulation.
//!
//! Each node is either free or held by a drag gesture. Holding a node pins it
//! in the simulation; the first active gesture raises the alpha target and the
//! last one to finish lowers it again. Hovering the scene pauses animation.
//!
//! Events that do not match the current state (a move or end for a node that
//! is not being dragged) are ignored rather than treated as faults.

use std::collections::HashSet;

use log::{debug, warn};

use super::simulation::Simulation;

/// Alpha targets used while dragging.
#[derive(Clone, Debug)]
pub struct InteractionConfig {
	/// Alpha target while at least one node is being dragged.
	pub drag_alpha_target: f64,
	/// Alpha target once every drag has ended.
	pub rest_alpha_target: f64,
}

impl Default for InteractionConfig {
	fn default() -> Self {
		Self {
			drag_alpha_target: 0.3,
			rest_alpha_target: 0.0,
		}
	}
}

/// Translates drag and hover gestures into simulation state changes.
#[derive(Clone, Debug, Default)]
pub struct InteractionController {
	config: InteractionConfig,
	paused: bool,
	dragging: HashSet<usize>,
}

impl InteractionController {
	/// A controller with no active gestures.
	pub fn new(config: InteractionConfig) -> Self {
		Self {
			config,
			..Self::default()
		}
	}

	/// Whether per-tick animation is paused.
	pub fn is_paused(&self) -> bool {
		self.paused
	}

	/// Pause on pointer-enter, resume on pointer-leave.
	pub fn set_paused(&mut self, paused: bool) {
		self.paused = paused;
	}

	/// Whether node `index` is held by a drag gesture.
	pub fn is_dragging(&self, index: usize) -> bool {
		self.dragging.contains(&index)
	}

	/// Number of drag gestures in progress.
	pub fn active_drags(&self) -> usize {
		self.dragging.len()
	}

	/// Start dragging node `index`, pinning it where it currently is.
	pub fn drag_start(&mut self, sim: &mut Simulation, index: usize) -> bool {
		let Some(node) = sim.nodes().get(index) else {
			warn!("kpi-constellation: drag start on unknown node {index}");
			return false;
		};
		if self.dragging.contains(&index) {
			return false;
		}
		let (x, y) = (node.x, node.y);

		if self.dragging.is_empty() {
			sim.set_alpha_target(self.config.drag_alpha_target);
			sim.restart();
		}
		self.dragging.insert(index);
		sim.pin(index, x, y);
		debug!("kpi-constellation: drag start on {}", sim.nodes()[index].id);
		true
	}

	/// Move the pinned position of a dragged node.
	pub fn drag_move(&mut self, sim: &mut Simulation, index: usize, x: f64, y: f64) -> bool {
		if !self.dragging.contains(&index) {
			return false;
		}
		sim.pin(index, x, y)
	}

	/// Release a dragged node back to free integration.
	pub fn drag_end(&mut self, sim: &mut Simulation, index: usize) -> bool {
		if !self.dragging.remove(&index) {
			warn!("kpi-constellation: drag end for node {index} that was not being dragged");
			return false;
		}
		if self.dragging.is_empty() {
			sim.set_alpha_target(self.config.rest_alpha_target);
		}
		sim.unpin(index);
		debug!("kpi-constellation: drag end on node {index}");
		true
	}
}
