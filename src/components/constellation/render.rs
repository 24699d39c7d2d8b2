//! Canvas rendering for the constellation.
//!
//! Paints the retained [`SceneFrame`] every animation frame, even while the
//! simulation is paused, so pan and zoom stay responsive. Passes:
//! 1. Background (screen space)
//! 2. Edges, then nodes with their outlines (world space)

use std::f64::consts::TAU;

use web_sys::CanvasRenderingContext2d;

use super::state::ConstellationState;
use super::theme::Theme;

/// Renders the complete scene to the canvas.
pub fn render(state: &ConstellationState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_edges(state, ctx, theme);
	draw_nodes(state, ctx, theme);

	ctx.restore();
}

fn draw_edges(state: &ConstellationState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	ctx.set_stroke_style_str(&theme.edge.color.to_css());
	ctx.set_line_width(theme.edge.width);

	ctx.begin_path();
	for edge in &state.frame.edges {
		ctx.move_to(edge.from.0, edge.from.1);
		ctx.line_to(edge.to.0, edge.to.1);
	}
	ctx.stroke();
}

fn draw_nodes(state: &ConstellationState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let border = theme.node.border_color.to_css();

	for node in &state.frame.nodes {
		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, node.radius.max(0.0), 0.0, TAU);
		ctx.set_fill_style_str(&node.fill);
		ctx.fill();

		if theme.node.border_width > 0.0 {
			ctx.set_stroke_style_str(&border);
			ctx.set_line_width(theme.node.border_width);
			ctx.stroke();
		}
	}
}
