//! Hover tooltip.

use askama::Template;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use super::graph::Node;

/// Offset of the tooltip from the pointer, in pixels.
const POINTER_OFFSET: f64 = 10.0;

/// Something that can show HTML near a page coordinate.
pub trait Tooltip {
	/// Show `html` at page coordinates `(x, y)`.
	fn show(&self, html: &str, x: f64, y: f64);
	/// Hide the tooltip.
	fn hide(&self);
}

/// Tooltip body for a node: the item in bold over its group name.
#[derive(Template)]
#[template(
	source = "<strong>{{ label }}</strong><br><small>{{ group }}</small>",
	ext = "html"
)]
struct NodeTooltip<'a> {
	label: &'a str,
	group: &'a str,
}

/// Render the tooltip body for `node`, HTML-escaping its label and group.
pub fn node_tooltip_html(node: &Node) -> askama::Result<String> {
	NodeTooltip {
		label: node.label(),
		group: &node.group,
	}
	.render()
}

/// Absolutely positioned `<div>` appended to the document body.
pub struct DomTooltip {
	element: HtmlElement,
}

impl DomTooltip {
	/// Create the hidden tooltip element. Returns `None` outside a browser.
	pub fn new() -> Option<Self> {
		let document = web_sys::window()?.document()?;
		let element: HtmlElement = document.create_element("div").ok()?.dyn_into().ok()?;

		let style = element.style();
		for (property, value) in [
			("position", "absolute"),
			("pointer-events", "none"),
			("padding", "8px 12px"),
			("background", "rgba(0, 0, 0, 0.8)"),
			("color", "#fff"),
			("border-radius", "6px"),
			("font-size", "14px"),
			("visibility", "hidden"),
			("z-index", "9999"),
		] {
			let _ = style.set_property(property, value);
		}

		document.body()?.append_child(&element).ok()?;
		Some(Self { element })
	}
}

impl Tooltip for DomTooltip {
	fn show(&self, html: &str, x: f64, y: f64) {
		self.element.set_inner_html(html);
		let style = self.element.style();
		let _ = style.set_property("left", &format!("{}px", x + POINTER_OFFSET));
		let _ = style.set_property("top", &format!("{}px", y + POINTER_OFFSET));
		let _ = style.set_property("visibility", "visible");
	}

	fn hide(&self) {
		let _ = self.element.style().set_property("visibility", "hidden");
	}
}

impl Drop for DomTooltip {
	fn drop(&mut self) {
		self.element.remove();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str, group: &str) -> Node {
		Node {
			id: id.into(),
			group: group.into(),
			group_index: 0,
			index: 0,
			x: 0.0,
			y: 0.0,
			vx: 0.0,
			vy: 0.0,
			angle: 0.0,
			orbit_radius: 20.0,
			pinned: None,
		}
	}

	#[test]
	fn shows_item_over_group() {
		let html = node_tooltip_html(&node("Finance:Revenue", "Finance")).unwrap();
		assert_eq!(html, "<strong>Revenue</strong><br><small>Finance</small>");
	}

	#[test]
	fn escapes_markup() {
		let html = node_tooltip_html(&node("R&D:<b>Spend</b>", "R&D")).unwrap();
		assert_eq!(
			html,
			"<strong>&lt;b&gt;Spend&lt;/b&gt;</strong><br><small>R&amp;D</small>"
		);
	}
}
