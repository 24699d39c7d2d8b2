//! Visual theming for the constellation.
//!
//! Provides the group palette and the stroke styles for nodes and edges.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Opacity in `[0, 1]`.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Same color with a different opacity.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// CSS color string, hex when opaque.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Qualitative palette indexed by group position.
#[derive(Clone, Debug)]
pub struct NodePalette {
	/// Colors in index order.
	pub colors: Vec<Color>,
}

impl NodePalette {
	/// The ten-color `schemeCategory10` palette.
	pub fn category10() -> Self {
		Self {
			colors: vec![
				Color::rgb(0x1f, 0x77, 0xb4), // Blue
				Color::rgb(0xff, 0x7f, 0x0e), // Orange
				Color::rgb(0x2c, 0xa0, 0x2c), // Green
				Color::rgb(0xd6, 0x27, 0x28), // Red
				Color::rgb(0x94, 0x67, 0xbd), // Purple
				Color::rgb(0x8c, 0x56, 0x4b), // Brown
				Color::rgb(0xe3, 0x77, 0xc2), // Pink
				Color::rgb(0x7f, 0x7f, 0x7f), // Gray
				Color::rgb(0xbc, 0xbd, 0x22), // Olive
				Color::rgb(0x17, 0xbe, 0xcf), // Cyan
			],
		}
	}

	/// Color for group `index`, wrapping past the end of the palette.
	pub fn get(&self, index: usize) -> Color {
		self.colors[index % self.colors.len()]
	}
}

/// Edge stroke style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Stroke color, opacity included.
	pub color: Color,
	/// Stroke width in world units.
	pub width: f64,
}

/// Node stroke style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Outline color.
	pub border_color: Color,
	/// Outline width in world units.
	pub border_width: f64,
	/// Radius before the first sync.
	pub initial_radius: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Canvas fill behind the scene.
	pub background: Color,
	/// Edge stroke.
	pub edge: EdgeStyle,
	/// Node outline.
	pub node: NodeStyle,
	/// Group colors.
	pub palette: NodePalette,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: Color::rgb(255, 255, 255),
			edge: EdgeStyle {
				color: Color::rgb(0xaa, 0xaa, 0xaa).with_alpha(0.4),
				width: 1.5,
			},
			node: NodeStyle {
				border_color: Color::rgb(255, 255, 255),
				border_width: 1.5,
				initial_radius: 12.0,
			},
			palette: NodePalette::category10(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn palette_wraps() {
		let palette = NodePalette::category10();
		assert_eq!(palette.get(0), palette.get(10));
		assert_eq!(palette.get(3).to_css(), "#d62728");
	}

	#[test]
	fn translucent_colors_use_rgba() {
		assert_eq!(Theme::default().edge.color.to_css(), "rgba(170, 170, 170, 0.4)");
	}
}
