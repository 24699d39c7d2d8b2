//! Tunables for the whole constellation, grouped by component.

use super::graph::GraphConfig;
use super::interaction::InteractionConfig;
use super::loader::DEFAULT_DATA_URL;
use super::perturbation::PerturbationConfig;
use super::simulation::SimulationConfig;

/// Complete constellation configuration.
#[derive(Clone, Debug)]
pub struct ConstellationConfig {
	/// Where the grouped-KPI document is fetched from.
	pub data_url: String,
	/// Graph construction.
	pub graph: GraphConfig,
	/// Force solver.
	pub simulation: SimulationConfig,
	/// Swirl and orbital drift.
	pub perturbation: PerturbationConfig,
	/// Drag alpha targets.
	pub interaction: InteractionConfig,
	/// Period of the re-energize pulse.
	pub energize_interval_ms: f64,
	/// Alpha target set by each re-energize pulse.
	pub energize_alpha_target: f64,
	/// Allowed zoom factors, `(min, max)`.
	pub zoom_extent: (f64, f64),
	/// Share of the window height the scene occupies.
	pub viewport_height_ratio: f64,
}

impl Default for ConstellationConfig {
	fn default() -> Self {
		Self {
			data_url: DEFAULT_DATA_URL.to_string(),
			graph: GraphConfig::default(),
			simulation: SimulationConfig::default(),
			perturbation: PerturbationConfig::default(),
			interaction: InteractionConfig::default(),
			energize_interval_ms: 2800.0,
			energize_alpha_target: 0.04,
			zoom_extent: (0.5, 3.0),
			viewport_height_ratio: 0.85,
		}
	}
}
