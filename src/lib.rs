//! kpi-constellation: Animated force-directed constellation of grouped KPIs.
//!
//! This crate provides a WASM-based canvas visualization that lays out KPIs as
//! a perpetually drifting node graph, with drag-to-pin, pause-on-hover,
//! pan/zoom and tooltips.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_meta::*;
use log::{Level, error, info};

// Only referenced to enable its `js` backend for `rand` on wasm32.
use getrandom as _;

pub mod components;

pub use components::constellation::{
	ConstellationCanvas, ConstellationConfig, ConstellationState, Group, LoadError, fetch_groups,
	parse_groups,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("kpi-constellation: logging initialized");
}

/// Main application component.
/// Fetches the grouped-KPI document once and renders the constellation.
///
/// A failed load leaves the page without a visualization; the error is only
/// logged.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = ConstellationConfig::default();
	let groups: RwSignal<Option<Vec<Group>>> = RwSignal::new(None);

	let url = config.data_url.clone();
	spawn_local(async move {
		match fetch_groups(&url).await {
			Ok(loaded) => groups.set(Some(loaded)),
			Err(e) => error!("kpi-constellation: failed to load {url}: {e}"),
		}
	});

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="KPI Constellation" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="constellation">
			{move || {
				groups
					.get()
					.map(|loaded| {
						view! { <ConstellationCanvas groups=loaded config=config.clone() /> }
					})
			}}
		</div>
	}
}
