//! Metro map styling: one fixed colour and dash pattern per pathway type.
//!
//! Colour lives only on the lines. Stations are neutral and distinguished by
//! shape (circle = artist, square = genre, small circle = track).

use super::types::{NodeType, PathwayType};

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red.
	pub r: u8,
	/// Green.
	pub g: u8,
	/// Blue.
	pub b: u8,
	/// Alpha, 0 to 1.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Same color with another alpha.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// CSS hex (opaque) or `rgba()` string.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// How a line is stroked.
///
/// Solid lines are lineage, dashed lines are peers, dotted lines are
/// categorical.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DashPattern {
	/// Continuous stroke.
	Solid,
	/// Long dashes.
	Dashed,
	/// Dots.
	Dotted,
}

impl DashPattern {
	/// `(dash, gap)` lengths in pixels; `None` for a solid stroke.
	pub const fn segments(self) -> Option<(f64, f64)> {
		match self {
			DashPattern::Solid => None,
			DashPattern::Dashed => Some((8.0, 4.0)),
			DashPattern::Dotted => Some((3.0, 3.0)),
		}
	}

	/// SVG `stroke-dasharray` value.
	pub const fn dash_array(self) -> &'static str {
		match self {
			DashPattern::Solid => "0",
			DashPattern::Dashed => "8 4",
			DashPattern::Dotted => "3 3",
		}
	}
}

/// Stroke settings for one metro line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouteStyle {
	/// Stroke color.
	pub color: Color,
	/// Stroke pattern.
	pub dash: DashPattern,
	/// Legend caption, e.g. "INFLUENCED BY".
	pub label: &'static str,
	/// Stroke width in pixels.
	pub width: f64,
	/// Stroke opacity.
	pub opacity: f64,
}

const ROUTE_WIDTH: f64 = 2.5;
const ROUTE_OPACITY: f64 = 0.85;

impl PathwayType {
	/// The fixed line style for this relationship type.
	pub const fn style(self) -> RouteStyle {
		let (color, dash, label) = match self {
			PathwayType::Influences => (Color::rgb(30, 136, 229), DashPattern::Solid, "INFLUENCED BY"),
			PathwayType::Legacy => (Color::rgb(255, 179, 0), DashPattern::Solid, "INFLUENCED"),
			PathwayType::Collaborators => (Color::rgb(251, 140, 0), DashPattern::Dashed, "COLLABORATOR"),
			PathwayType::Contemporaries => {
				(Color::rgb(38, 166, 154), DashPattern::Dashed, "CONTEMPORARY")
			}
			PathwayType::GenreConnections => (Color::rgb(236, 64, 122), DashPattern::Dotted, "GENRE"),
		};
		RouteStyle {
			color,
			dash,
			label,
			width: ROUTE_WIDTH,
			opacity: ROUTE_OPACITY,
		}
	}
}

/// Station marker shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StationShape {
	/// Artist station.
	Circle,
	/// Genre station.
	Square,
	/// Track station.
	SmallCircle,
}

impl NodeType {
	/// Marker shape of stations of this type.
	pub const fn station_shape(self) -> StationShape {
		match self {
			NodeType::Artist => StationShape::Circle,
			NodeType::Genre => StationShape::Square,
			NodeType::Track => StationShape::SmallCircle,
		}
	}

	/// Fill colour of the station marker.
	pub const fn station_color(self) -> Color {
		match self {
			NodeType::Track => Color::rgb(189, 189, 189),
			NodeType::Artist | NodeType::Genre => Color::rgb(224, 224, 224),
		}
	}
}

/// Map legend entries, one per line, in legend order.
pub fn legend() -> impl Iterator<Item = (PathwayType, RouteStyle)> {
	PathwayType::ALL.into_iter().map(|p| (p, p.style()))
}
