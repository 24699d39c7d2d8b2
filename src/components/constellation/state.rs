//! Constellation state and interaction tracking.
//!
//! [`ConstellationState`] is the single context object for one page session.
//! It owns the simulation, the perturbation field, the interaction controller
//! and the retained scene, plus the pan/zoom transform and pointer gesture
//! bookkeeping. The animation-frame pump calls [`ConstellationState::advance`]
//! with the current wall-clock time; everything else is driven by pointer
//! events on the same thread.

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use super::config::ConstellationConfig;
use super::graph::build_graph;
use super::interaction::InteractionController;
use super::perturbation::PerturbationField;
use super::scheduler::Cadence;
use super::simulation::Simulation;
use super::sync::{SceneFrame, sync};
use super::theme::Theme;
use super::tooltip::node_tooltip_html;
use super::types::Group;

/// Pan and zoom transform applied to the entire scene.
#[derive(Clone, Debug)]
pub struct ViewTransform {
	/// Horizontal translation in screen pixels.
	pub x: f64,
	/// Vertical translation in screen pixels.
	pub y: f64,
	/// Zoom factor (1.0 = 100%).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self { x: 0.0, y: 0.0, k: 1.0 }
	}
}

/// Tracks an in-progress node drag.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	/// Dragged node, if a drag is in progress.
	pub node_idx: Option<usize>,
	/// Pointer position where the drag started, in screen pixels.
	pub start_x: f64,
	/// Pointer position where the drag started, in screen pixels.
	pub start_y: f64,
	/// Node position when the drag started, in world units.
	pub node_start_x: f64,
	/// Node position when the drag started, in world units.
	pub node_start_y: f64,
}

/// Tracks an in-progress background pan.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	/// Whether a pan is in progress.
	pub active: bool,
	/// Pointer position where the pan started.
	pub start_x: f64,
	/// Pointer position where the pan started.
	pub start_y: f64,
	/// Transform translation when the pan started.
	pub transform_start_x: f64,
	/// Transform translation when the pan started.
	pub transform_start_y: f64,
}

/// Core constellation state for one page session.
pub struct ConstellationState {
	/// Force solver and node/edge collections.
	pub simulation: Simulation,
	/// Per-tick velocity bias.
	pub field: PerturbationField,
	/// Pause flag and drag pins.
	pub interaction: InteractionController,
	/// Retained visuals, refreshed by RenderSync.
	pub frame: SceneFrame,
	/// Pan and zoom.
	pub transform: ViewTransform,
	/// Node drag in progress.
	pub drag: DragState,
	/// Background pan in progress.
	pub pan: PanState,
	/// Node under the pointer.
	pub hovered: Option<usize>,
	/// Viewport width.
	pub width: f64,
	/// Viewport height.
	pub height: f64,
	config: ConstellationConfig,
	energize: Cadence,
	tick: u64,
	stopped: bool,
}

impl ConstellationState {
	/// Build the graph for `groups` and start a simulation at wall-clock `now_ms`.
	pub fn new(
		groups: &[Group],
		width: f64,
		height: f64,
		now_ms: f64,
		config: ConstellationConfig,
		theme: &Theme,
	) -> Self {
		Self::with_rng(groups, width, height, now_ms, config, theme, StdRng::from_entropy())
	}

	/// Same as [`ConstellationState::new`], drawing all randomness from `rng`.
	pub fn with_rng(
		groups: &[Group],
		width: f64,
		height: f64,
		now_ms: f64,
		config: ConstellationConfig,
		theme: &Theme,
		mut rng: StdRng,
	) -> Self {
		let graph = build_graph(groups, &config.graph, &mut rng);
		let solver_rng = StdRng::seed_from_u64(rng.next_u64());
		let simulation = Simulation::new(
			graph,
			(width / 2.0, height / 2.0),
			config.simulation.clone(),
			now_ms,
			solver_rng,
		);
		let frame = SceneFrame::new(&simulation, theme);

		Self {
			simulation,
			field: PerturbationField::new(config.perturbation.clone()),
			interaction: InteractionController::new(config.interaction.clone()),
			frame,
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			hovered: None,
			width,
			height,
			energize: Cadence::new(config.energize_interval_ms, now_ms),
			config,
			tick: 0,
			stopped: false,
		}
	}

	/// Unpaused ticks so far.
	pub fn tick_count(&self) -> u64 {
		self.tick
	}

	/// Active configuration.
	pub fn config(&self) -> &ConstellationConfig {
		&self.config
	}

	/// Run everything due at `now_ms`: the re-energize pulse if its period
	/// elapsed, then one frame. Returns false once stopped.
	pub fn advance(&mut self, now_ms: f64) -> bool {
		if self.stopped {
			return false;
		}
		if self.energize.poll(now_ms) {
			self.energize(now_ms);
		}
		self.frame_tick();
		true
	}

	/// Recompute charge and lift the alpha target. Skipped while paused.
	pub fn energize(&mut self, now_ms: f64) {
		if self.interaction.is_paused() {
			return;
		}
		self.simulation.recompute_charge(now_ms);
		self.simulation
			.set_alpha_target(self.config.energize_alpha_target);
		self.simulation.restart();
		debug!(
			"kpi-constellation: re-energized at tick {} (alpha {:.3})",
			self.tick,
			self.simulation.alpha()
		);
	}

	/// One animation frame.
	///
	/// The solver always steps. Unless paused, the tick counter advances, the
	/// perturbation is applied before integration and the scene is synced
	/// after it.
	pub fn frame_tick(&mut self) {
		if self.interaction.is_paused() {
			self.simulation.step();
			return;
		}
		self.tick += 1;
		self.field.apply(self.simulation.nodes_mut(), self.tick);
		self.simulation.step();
		sync(&self.simulation, self.tick, &mut self.frame);
	}

	/// Stop the pump. Further [`ConstellationState::advance`] calls do nothing.
	pub fn stop(&mut self) {
		self.stopped = true;
		self.simulation.stop();
	}

	/// Whether [`ConstellationState::stop`] was called.
	pub fn is_stopped(&self) -> bool {
		self.stopped
	}

	/// Pause on pointer-enter, resume on pointer-leave.
	pub fn set_paused(&mut self, paused: bool) {
		self.interaction.set_paused(paused);
	}

	/// Convert screen pixels to world coordinates.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Node drawn under screen position `(sx, sy)`.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		self.frame.node_at(gx, gy)
	}

	/// Track the node under screen position `(sx, sy)`. Returns true when the
	/// hovered node changed.
	pub fn update_hover(&mut self, sx: f64, sy: f64) -> bool {
		let hovered = self.node_at_position(sx, sy);
		let changed = hovered != self.hovered;
		self.hovered = hovered;
		changed
	}

	/// Forget the hovered node.
	pub fn clear_hover(&mut self) {
		self.hovered = None;
	}

	/// Tooltip body for node `index`.
	pub fn tooltip_html(&self, index: usize) -> Option<String> {
		let node = self.simulation.nodes().get(index)?;
		match node_tooltip_html(node) {
			Ok(html) => Some(html),
			Err(e) => {
				warn!("kpi-constellation: tooltip for {} failed to render: {e}", node.id);
				None
			}
		}
	}

	/// Pointer pressed: start dragging the node under it, or start panning.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		if let Some(idx) = self.node_at_position(sx, sy) {
			let node = &self.simulation.nodes()[idx];
			self.drag = DragState {
				node_idx: Some(idx),
				start_x: sx,
				start_y: sy,
				node_start_x: node.x,
				node_start_y: node.y,
			};
			self.interaction.drag_start(&mut self.simulation, idx);
		} else {
			self.pan = PanState {
				active: true,
				start_x: sx,
				start_y: sy,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			};
		}
	}

	/// Pointer moved: update the dragged node's pin or the pan offset.
	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if let Some(idx) = self.drag.node_idx {
			let (dx, dy) = (
				(sx - self.drag.start_x) / self.transform.k,
				(sy - self.drag.start_y) / self.transform.k,
			);
			let (nx, ny) = (self.drag.node_start_x + dx, self.drag.node_start_y + dy);
			self.interaction.drag_move(&mut self.simulation, idx, nx, ny);
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
		}
	}

	/// Pointer released or left the scene: end any drag or pan.
	pub fn pointer_up(&mut self) {
		if let Some(idx) = self.drag.node_idx.take() {
			self.interaction.drag_end(&mut self.simulation, idx);
		}
		self.pan.active = false;
	}

	/// Zoom about screen position `(sx, sy)` by `factor`, within the zoom extent.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let (min_k, max_k) = self.config.zoom_extent;
		let new_k = (self.transform.k * factor).clamp(min_k, max_k);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Follow a viewport resize.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.simulation.set_center(width / 2.0, height / 2.0);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn make_state(seed: u64) -> ConstellationState {
		ConstellationState::with_rng(
			&[
				Group::new("Finance", ["Revenue", "Margin", "Cash"]),
				Group::new("Ops", ["Uptime", "Latency"]),
			],
			800.0,
			600.0,
			0.0,
			ConstellationConfig::default(),
			&Theme::default(),
			StdRng::seed_from_u64(seed),
		)
	}

	fn positions(state: &ConstellationState) -> Vec<(f64, f64)> {
		state.simulation.nodes().iter().map(|n| (n.x, n.y)).collect()
	}

	#[test]
	fn advance_counts_ticks_and_syncs_frame() {
		let mut state = make_state(1);
		for frame in 1..=10 {
			assert!(state.advance(frame as f64 * 16.0));
		}
		assert_eq!(state.tick_count(), 10);
		for (visual, node) in state.frame.nodes.iter().zip(state.simulation.nodes()) {
			assert_eq!((visual.x, visual.y), (node.x, node.y));
		}
	}

	#[test]
	fn paused_frames_skip_tick_and_sync() {
		let mut state = make_state(2);
		state.advance(16.0);
		let frozen = state.frame.nodes.clone();

		state.set_paused(true);
		for frame in 2..20 {
			state.advance(frame as f64 * 16.0);
		}

		assert_eq!(state.tick_count(), 1);
		assert_eq!(state.frame.nodes, frozen);
		// The solver keeps running underneath.
		let visible: Vec<_> = frozen.iter().map(|n| (n.x, n.y)).collect();
		assert_ne!(positions(&state), visible);
	}

	#[test]
	fn paused_frame_is_a_bare_solver_step() {
		let mut paused = make_state(13);
		let mut bare = make_state(13);
		let mut drifting = make_state(13);

		paused.set_paused(true);
		paused.advance(16.0);
		bare.simulation.step();
		drifting.advance(16.0);

		let velocities = |s: &ConstellationState| -> Vec<(f64, f64)> {
			s.simulation.nodes().iter().map(|n| (n.vx, n.vy)).collect()
		};
		assert_eq!(velocities(&paused), velocities(&bare));
		assert_eq!(positions(&paused), positions(&bare));
		assert_ne!(velocities(&drifting), velocities(&bare));
	}

	#[test]
	fn hover_reports_changes_only() {
		let mut state = make_state(14);
		let idx = state.simulation.nodes().len() - 1;
		let (x, y) = (state.frame.nodes[idx].x, state.frame.nodes[idx].y);

		assert!(state.update_hover(x, y));
		assert_eq!(state.hovered, Some(idx));
		assert!(!state.update_hover(x + 1.0, y));
		assert!(state.update_hover(-500.0, -500.0));
		assert_eq!(state.hovered, None);

		state.update_hover(x, y);
		state.clear_hover();
		assert_eq!(state.hovered, None);
	}

	#[test]
	fn energize_pulse_recomputes_charge_on_cadence() {
		let mut state = make_state(3);
		let initial = state.simulation.charge_strengths().to_vec();

		state.advance(2000.0);
		assert_eq!(state.simulation.charge_strengths(), initial.as_slice());
		assert_eq!(state.simulation.alpha_target(), 0.0);

		state.advance(2800.0);
		assert_ne!(state.simulation.charge_strengths(), initial.as_slice());
		assert_eq!(state.simulation.alpha_target(), 0.04);
	}

	#[test]
	fn energize_is_skipped_while_paused() {
		let mut state = make_state(4);
		let initial = state.simulation.charge_strengths().to_vec();
		state.set_paused(true);
		state.advance(3000.0);
		assert_eq!(state.simulation.charge_strengths(), initial.as_slice());
		assert_eq!(state.simulation.alpha_target(), 0.0);
	}

	#[test]
	fn stop_halts_the_pump() {
		let mut state = make_state(5);
		state.advance(16.0);
		state.stop();
		let before = positions(&state);

		assert!(!state.advance(32.0));
		assert!(state.is_stopped());
		assert_eq!(state.tick_count(), 1);
		assert_eq!(positions(&state), before);
	}

	#[test]
	fn pointer_drag_pins_node_under_pointer() {
		let mut state = make_state(6);
		state.advance(16.0);
		let target = state.frame.nodes[2].clone();

		state.pointer_down(target.x, target.y);
		let idx = state.drag.node_idx.expect("pointer should hit a node");
		assert!(state.interaction.is_dragging(idx));
		assert_eq!(state.simulation.alpha_target(), 0.3);

		state.pointer_move(target.x + 40.0, target.y - 25.0);
		let node = &state.simulation.nodes()[idx];
		let expected = (node.pinned.unwrap().0, node.pinned.unwrap().1);
		for frame in 2..30 {
			state.advance(frame as f64 * 16.0);
			let node = &state.simulation.nodes()[idx];
			assert_eq!((node.x, node.y), expected);
		}

		state.pointer_up();
		assert!(state.simulation.nodes()[idx].pinned.is_none());
		assert_eq!(state.simulation.alpha_target(), 0.0);
		assert!(state.drag.node_idx.is_none());
	}

	#[test]
	fn drag_offset_respects_zoom() {
		let mut state = make_state(7);
		state.transform.k = 2.0;
		// The last node is drawn on top, so a click on its center always hits it.
		let idx = state.simulation.nodes().len() - 1;
		let node = state.simulation.nodes()[idx].clone();
		let (sx, sy) = (node.x * 2.0, node.y * 2.0);

		state.pointer_down(sx, sy);
		assert_eq!(state.drag.node_idx, Some(idx));
		state.pointer_move(sx + 20.0, sy);
		let (px, py) = state.simulation.nodes()[idx].pinned.unwrap();
		assert!((px - (node.x + 10.0)).abs() < 1e-9);
		assert!((py - node.y).abs() < 1e-9);
	}

	#[test]
	fn background_drag_pans() {
		let mut state = make_state(8);
		state.pointer_down(5.0, 5.0);
		assert!(state.drag.node_idx.is_none());
		state.pointer_move(25.0, 15.0);
		assert_eq!((state.transform.x, state.transform.y), (20.0, 10.0));
		state.pointer_up();
		state.pointer_move(100.0, 100.0);
		assert_eq!((state.transform.x, state.transform.y), (20.0, 10.0));
	}

	#[test]
	fn zoom_is_clamped_to_extent() {
		let mut state = make_state(9);
		for _ in 0..50 {
			state.zoom_at(400.0, 300.0, 1.1);
		}
		assert_eq!(state.transform.k, 3.0);
		for _ in 0..100 {
			state.zoom_at(400.0, 300.0, 0.9);
		}
		assert_eq!(state.transform.k, 0.5);
	}

	#[test]
	fn zoom_keeps_point_under_cursor() {
		let mut state = make_state(10);
		let before = state.screen_to_graph(300.0, 200.0);
		state.zoom_at(300.0, 200.0, 1.5);
		let after = state.screen_to_graph(300.0, 200.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn resize_moves_centering_target() {
		let mut state = make_state(11);
		state.resize(2000.0, 1000.0);
		for frame in 1..=5 {
			state.advance(frame as f64 * 16.0);
		}
		let n = state.simulation.nodes().len() as f64;
		let cx = state.simulation.nodes().iter().map(|n| n.x).sum::<f64>() / n;
		assert!((cx - 1000.0).abs() < 50.0, "centroid x {cx}");
	}

	#[test]
	fn tooltip_for_known_node_only() {
		let state = make_state(12);
		assert_eq!(
			state.tooltip_html(3).as_deref(),
			Some("<strong>Uptime</strong><br><small>Ops</small>")
		);
		assert_eq!(state.tooltip_html(42), None);
	}
}
