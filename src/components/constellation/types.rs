//! Dataset structures for input to the constellation component.

use serde::Deserialize;

/// A named group of KPI labels, as read from the dataset document.
///
/// The document is a JSON array of `{ "group": ..., "kpis": [...] }` objects.
/// Groups are read once at load time and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Group {
	/// Group name. Every node built from this group is prefixed with it.
	#[serde(rename = "group")]
	pub name: String,
	/// KPI labels in document order.
	#[serde(rename = "kpis")]
	pub items: Vec<String>,
}

impl Group {
	/// Build a group from a name and its item labels.
	pub fn new<I, S>(name: impl Into<String>, items: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			name: name.into(),
			items: items.into_iter().map(Into::into).collect(),
		}
	}
}
