//! Dataset retrieval.
//!
//! The dataset is fetched once when the page boots. Failures propagate to the
//! caller untouched: there is no retry and no partial-data fallback.

use log::info;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::types::Group;

/// Default location of the grouped-KPI document, relative to the page.
pub const DEFAULT_DATA_URL: &str = "./data/kpis.json";

/// Reasons the dataset could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
	/// Not running inside a browser window.
	#[error("no browser window available")]
	NoWindow,
	/// The request itself failed (network error, CORS, aborted).
	#[error("request for {url} failed: {message}")]
	Network {
		/// Requested URL.
		url: String,
		/// Debug rendering of the JavaScript error value.
		message: String,
	},
	/// The server answered with a non-success status.
	#[error("request for {url} returned HTTP {status}")]
	Status {
		/// Requested URL.
		url: String,
		/// HTTP status code.
		status: u16,
	},
	/// The body was not a valid grouped-KPI document.
	#[error("malformed dataset: {0}")]
	Parse(#[from] serde_json::Error),
}

/// Parse a grouped-KPI JSON document.
pub fn parse_groups(json: &str) -> Result<Vec<Group>, LoadError> {
	Ok(serde_json::from_str(json)?)
}

/// Fetch and parse the grouped-KPI document at `url`.
pub async fn fetch_groups(url: &str) -> Result<Vec<Group>, LoadError> {
	let window = web_sys::window().ok_or(LoadError::NoWindow)?;

	let response: Response = JsFuture::from(window.fetch_with_str(url))
		.await
		.and_then(|value| value.dyn_into())
		.map_err(|e| network_error(url, e))?;

	if !response.ok() {
		return Err(LoadError::Status {
			url: url.to_string(),
			status: response.status(),
		});
	}

	let body = response.text().map_err(|e| network_error(url, e))?;
	let text = JsFuture::from(body)
		.await
		.map_err(|e| network_error(url, e))?
		.as_string()
		.unwrap_or_default();

	let groups = parse_groups(&text)?;
	info!(
		"kpi-constellation: loaded {} groups ({} kpis) from {}",
		groups.len(),
		groups.iter().map(|g| g.items.len()).sum::<usize>(),
		url
	);
	Ok(groups)
}

fn network_error(url: &str, err: JsValue) -> LoadError {
	LoadError::Network {
		url: url.to_string(),
		message: format!("{err:?}"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_grouped_document() {
		let groups = parse_groups(
			r#"[
				{ "group": "Finance", "kpis": ["Revenue", "Margin"] },
				{ "group": "Ops", "kpis": ["Uptime"] }
			]"#,
		)
		.unwrap();

		assert_eq!(
			groups,
			vec![
				Group::new("Finance", ["Revenue", "Margin"]),
				Group::new("Ops", ["Uptime"]),
			]
		);
	}

	#[test]
	fn keeps_document_order() {
		let groups = parse_groups(r#"[{ "group": "G", "kpis": ["c", "a", "b"] }]"#).unwrap();
		assert_eq!(groups[0].items, vec!["c", "a", "b"]);
	}

	#[test]
	fn empty_document_is_valid() {
		assert!(parse_groups("[]").unwrap().is_empty());
	}

	#[test]
	fn malformed_json_is_a_parse_error() {
		let err = parse_groups("{ not json").unwrap_err();
		assert!(matches!(err, LoadError::Parse(_)));
	}

	#[test]
	fn missing_field_is_a_parse_error() {
		let err = parse_groups(r#"[{ "group": "G" }]"#).unwrap_err();
		assert!(matches!(err, LoadError::Parse(_)));
		assert!(err.to_string().starts_with("malformed dataset"));
	}
}
