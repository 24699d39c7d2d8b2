//! Animated force-directed constellation of grouped KPIs.
//!
//! Renders every KPI as a node on an HTML canvas with:
//! - Dense links within each group and sparse random links across groups
//! - A force simulation that never settles, kept moving by orbital drift,
//!   swirl noise and a periodic re-energize pulse
//! - Drag-to-pin, pause-on-hover, pan and zoom
//! - Tooltips naming the hovered KPI and its group
//!
//! # Example
//!
//! ```ignore
//! use kpi_constellation::{ConstellationCanvas, Group};
//!
//! let groups = vec![
//!     Group::new("Finance", ["Revenue", "Margin"]),
//!     Group::new("Ops", ["Uptime"]),
//! ];
//!
//! view! { <ConstellationCanvas groups=groups /> }
//! ```

mod component;
pub mod config;
pub mod graph;
pub mod interaction;
pub mod loader;
pub mod perturbation;
mod render;
pub mod scheduler;
pub mod simulation;
pub mod state;
pub mod sync;
pub mod theme;
pub mod tooltip;
mod types;

pub use component::ConstellationCanvas;
pub use config::ConstellationConfig;
pub use graph::{Edge, EdgeKind, Graph, GraphConfig, Node, build_graph};
pub use interaction::InteractionController;
pub use loader::{LoadError, fetch_groups, parse_groups};
pub use perturbation::{PerturbationField, Regime};
pub use simulation::{Simulation, SimulationConfig};
pub use state::ConstellationState;
pub use sync::{SceneFrame, Surface};
pub use theme::Theme;
pub use tooltip::Tooltip;
pub use types::Group;
