//! Tunable parameters for layout, routing and station geometry.
//!
//! Every struct has a `Default` matching the shipped look, and deserializes
//! with `#[serde(default)]` so a host can override a handful of fields from a
//! JSON blob without restating the rest.
//!
//! # Units
//!
//! All lengths are layout-space pixels. The renderer applies its own pan/zoom
//! transform on top; nothing here depends on zoom.

use std::time::Duration;

use serde::Deserialize;

/// Parameters of the ring seeding and force-directed refinement.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
	/// Distance between successive BFS rings.
	pub ring_spacing: f64,
	/// Ideal edge length of the force model. Repulsion is `ideal² / d`,
	/// attraction is `d² / ideal`.
	pub ideal_length: f64,
	/// Hard cap on refinement iterations.
	pub max_iterations: usize,
	/// Wall-clock budget for refinement, in milliseconds. `None` disables the
	/// budget, making the result a pure function of the input.
	pub time_budget_ms: Option<u64>,
	/// Distance floor used wherever a distance ends up in a denominator.
	pub min_distance: f64,
	/// Nodes closer than this to an unrelated edge are pushed off it.
	pub edge_clearance: f64,
	/// Push strength per unit of clearance violation.
	pub edge_push: f64,
	/// Starting cap on per-iteration node displacement.
	pub initial_temperature: f64,
	/// Multiplier applied to the temperature after every iteration.
	pub cooling: f64,
	/// Spacing along the x-axis for graphs too small for the force model.
	pub trivial_spacing: f64,
	/// Side of the square, centered on the origin, that unreachable nodes are
	/// scattered in.
	pub scatter_box: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			ring_spacing: 250.0,
			ideal_length: 220.0,
			max_iterations: 300,
			time_budget_ms: Some(200),
			min_distance: 0.1,
			edge_clearance: 60.0,
			edge_push: 1.5,
			initial_temperature: 400.0,
			cooling: 0.97,
			trivial_spacing: 200.0,
			scatter_box: 400.0,
		}
	}
}

impl LayoutConfig {
	/// Same parameters without the wall-clock budget.
	pub fn unbounded(self) -> Self {
		Self {
			time_budget_ms: None,
			..self
		}
	}

	/// The refinement budget as a `Duration`, if any.
	pub fn time_budget(&self) -> Option<Duration> {
		self.time_budget_ms.map(Duration::from_millis)
	}
}

/// Thresholds of the metro bend rule.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouteConfig {
	/// Endpoints closer than this on either axis are treated as aligned.
	pub straight_tolerance: f64,
	/// Relative difference between |dx| and |dy| still drawn as a diagonal.
	pub diagonal_ratio: f64,
	/// Absolute floor for the diagonal tolerance.
	pub diagonal_min: f64,
}

impl Default for RouteConfig {
	fn default() -> Self {
		Self {
			straight_tolerance: 1.0,
			diagonal_ratio: 0.05,
			diagonal_min: 5.0,
		}
	}
}

/// Station marker sizing and line spacing.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StationConfig {
	/// Base marker size of an artist station.
	pub artist_size: f64,
	/// Base marker size of a genre station.
	pub genre_size: f64,
	/// Base marker size of a track station.
	pub track_size: f64,
	/// Size added per connection beyond the first two.
	pub growth_per_connection: f64,
	/// Cap on the number of growth steps.
	pub max_growth_steps: usize,
	/// Gap between parallel lines leaving the same side of a station.
	pub line_spacing: f64,
	/// Parallel lines spread over at most this fraction of the station side.
	pub max_span_ratio: f64,
}

impl Default for StationConfig {
	fn default() -> Self {
		Self {
			artist_size: 14.0,
			genre_size: 14.0,
			track_size: 8.0,
			growth_per_connection: 2.0,
			max_growth_steps: 5,
			line_spacing: 8.0,
			max_span_ratio: 0.7,
		}
	}
}

/// Complete configuration for the journey engine.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct JourneyConfig {
	/// Ring seeding and force model.
	pub layout: LayoutConfig,
	/// Metro bend thresholds.
	pub route: RouteConfig,
	/// Station sizing and line spacing.
	pub station: StationConfig,
}

impl JourneyConfig {
	/// Parse a (possibly partial) JSON override.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}
}
