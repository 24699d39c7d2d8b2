//! Per-tick velocity bias that keeps the constellation in motion.
//!
//! Every node gets a small swirl nudge plus a pull along its personal
//! elliptical orbit. The strength of the orbital pull is the chaos factor,
//! which depends on the active [`Regime`].

use super::graph::Node;

/// Perturbation parameter set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Regime {
	/// Gentle drift with a constant chaos factor.
	#[default]
	Cosmic,
	/// High-energy regime whose chaos factor grows with the tick count.
	///
	/// Nothing in the page switches to this regime; it is only reachable by
	/// constructing a field with [`PerturbationField::with_regime`].
	Storm,
}

/// Tunables for the perturbation field.
#[derive(Clone, Debug)]
pub struct PerturbationConfig {
	/// Magnitude of the swirl nudge.
	pub swirl_amplitude: f64,
	/// Ticks per radian of swirl rotation.
	pub swirl_period: f64,
	/// Orbit angular speed in radians per tick.
	pub orbit_speed: f64,
	/// Chaos factor in the [`Regime::Cosmic`] regime.
	pub cosmic_chaos: f64,
	/// Chaos growth per tick in the [`Regime::Storm`] regime.
	pub storm_growth: f64,
	/// Amplitude of the storm chaos wobble.
	pub storm_wobble: f64,
	/// Ticks per radian of the storm chaos wobble.
	pub storm_wobble_period: f64,
}

impl Default for PerturbationConfig {
	fn default() -> Self {
		Self {
			swirl_amplitude: 0.03,
			swirl_period: 60.0,
			orbit_speed: 0.003,
			cosmic_chaos: 0.004,
			storm_growth: 1.5,
			storm_wobble: 0.5,
			storm_wobble_period: 20.0,
		}
	}
}

/// Injects swirl and orbital velocity into nodes each tick.
#[derive(Clone, Debug, Default)]
pub struct PerturbationField {
	config: PerturbationConfig,
	regime: Regime,
}

impl PerturbationField {
	/// A field in the default regime.
	pub fn new(config: PerturbationConfig) -> Self {
		Self {
			config,
			regime: Regime::default(),
		}
	}

	/// The same field, running in `regime`.
	pub fn with_regime(self, regime: Regime) -> Self {
		Self { regime, ..self }
	}

	/// Active regime.
	pub fn regime(&self) -> Regime {
		self.regime
	}

	/// Scale applied to the orbital displacement at `tick`.
	pub fn chaos_factor(&self, tick: u64) -> f64 {
		match self.regime {
			Regime::Cosmic => self.config.cosmic_chaos,
			Regime::Storm => {
				let t = tick as f64;
				self.config.storm_growth * t
					+ self.config.storm_wobble * (t / self.config.storm_wobble_period).sin()
			}
		}
	}

	/// Velocity bias for `node` at `tick`.
	pub fn bias(&self, node: &Node, tick: u64) -> (f64, f64) {
		let t = tick as f64;
		let phase = t / self.config.swirl_period + node.index as f64;
		let swirl = (
			self.config.swirl_amplitude * phase.sin(),
			self.config.swirl_amplitude * phase.cos(),
		);

		let theta = node.angle + t * self.config.orbit_speed;
		let orbit = (theta.cos() * node.orbit_radius, theta.sin() * node.orbit_radius);

		let chaos = self.chaos_factor(tick);
		(swirl.0 + chaos * orbit.0, swirl.1 + chaos * orbit.1)
	}

	/// Add this tick's bias to every node's velocity. Positions are untouched.
	pub fn apply(&self, nodes: &mut [Node], tick: u64) {
		for node in nodes {
			let (bx, by) = self.bias(node, tick);
			node.vx += bx;
			node.vy += by;
		}
	}
}

#[cfg(test)]
mod tests {
	use std::f64::consts::FRAC_PI_2;

	use super::*;

	fn node(index: usize, angle: f64, orbit_radius: f64) -> Node {
		Node {
			id: format!("G:{index}"),
			group: "G".into(),
			group_index: 0,
			index,
			x: 5.0,
			y: 7.0,
			vx: 0.0,
			vy: 0.0,
			angle,
			orbit_radius,
			pinned: None,
		}
	}

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-12
	}

	#[test]
	fn default_regime_is_cosmic() {
		let field = PerturbationField::default();
		assert_eq!(field.regime(), Regime::Cosmic);
		assert_eq!(field.chaos_factor(0), 0.004);
		assert_eq!(field.chaos_factor(10_000), 0.004);
	}

	#[test]
	fn storm_chaos_scales_with_tick() {
		let field = PerturbationField::default().with_regime(Regime::Storm);
		assert_eq!(field.regime(), Regime::Storm);
		assert!(close(field.chaos_factor(0), 0.0));
		assert!(close(field.chaos_factor(40), 60.0 + 0.5 * 2.0_f64.sin()));
		assert!(field.chaos_factor(1000) > field.chaos_factor(100));
	}

	#[test]
	fn bias_at_tick_zero() {
		let field = PerturbationField::default();
		let (bx, by) = field.bias(&node(0, 0.0, 50.0), 0);
		// Swirl (0, 0.03) plus orbit 0.004 * (50, 0).
		assert!(close(bx, 0.2));
		assert!(close(by, 0.03));
	}

	#[test]
	fn swirl_is_phase_offset_by_index() {
		let field = PerturbationField::default();
		let (ax, ay) = field.bias(&node(0, 0.0, 0.0), 0);
		let (bx, by) = field.bias(&node(1, 0.0, 0.0), 0);
		assert!(close(ax, 0.0) && close(ay, 0.03));
		assert!(close(bx, 0.03 * 1.0_f64.sin()));
		assert!(close(by, 0.03 * 1.0_f64.cos()));
		assert!(close((bx * bx + by * by).sqrt(), 0.03));
	}

	#[test]
	fn orbit_advances_with_tick() {
		let field = PerturbationField::default();
		let n = node(0, FRAC_PI_2, 40.0);
		let (_, early) = field.bias(&n, 0);
		// A quarter turn later the orbit points along -x instead of +y.
		let quarter = (FRAC_PI_2 / 0.003).round() as u64;
		let (late_x, _) = field.bias(&n, quarter);
		assert!(early > 0.1);
		assert!(late_x < -0.1);
	}

	#[test]
	fn apply_changes_velocity_only() {
		let field = PerturbationField::default();
		let mut nodes = vec![node(0, 1.0, 30.0), node(1, 2.0, 45.0)];
		field.apply(&mut nodes, 12);
		for n in &nodes {
			assert_eq!((n.x, n.y), (5.0, 7.0));
			let (bx, by) = field.bias(n, 12);
			assert!(close(n.vx, bx) && close(n.vy, by));
		}
	}
}
