//! Station geometry: marker sizes and where each line attaches.
//!
//! A line leaves a station from one of four sides, picked by the direction to
//! the other endpoint. When several lines share a side they are spread along
//! that border, sorted by the other endpoint's cross-axis position so they do
//! not cross on the way out, and the station stretches into a capsule wide
//! enough to hold them, like an interchange on a subway map.

use std::collections::HashMap;
use std::f64::consts::FRAC_PI_4;

use super::config::StationConfig;
use super::types::{EdgeId, Graph, Node, NodeId, NodeType, Position};

/// Border of a station a line leaves from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
	/// Upper border.
	Top,
	/// Lower border.
	Bottom,
	/// Left border.
	Left,
	/// Right border.
	Right,
}

impl Side {
	const ALL: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];

	fn index(self) -> usize {
		match self {
			Side::Top => 0,
			Side::Bottom => 1,
			Side::Left => 2,
			Side::Right => 3,
		}
	}

	fn is_horizontal(self) -> bool {
		matches!(self, Side::Top | Side::Bottom)
	}
}

/// Sides a line uses at its source and target, from the source→target angle.
pub fn classify(from: Position, to: Position) -> (Side, Side) {
	let angle = (to.y - from.y).atan2(to.x - from.x);
	let abs = angle.abs();
	if abs > 3.0 * FRAC_PI_4 {
		(Side::Left, Side::Right)
	} else if abs < FRAC_PI_4 {
		(Side::Right, Side::Left)
	} else if angle < 0.0 {
		(Side::Top, Side::Bottom)
	} else {
		(Side::Bottom, Side::Top)
	}
}

/// Station marker bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StationSize {
	/// Horizontal extent.
	pub width: f64,
	/// Vertical extent.
	pub height: f64,
}

/// Offset from a node's position to where a line attaches.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Anchor {
	/// Horizontal offset.
	pub dx: f64,
	/// Vertical offset.
	pub dy: f64,
}

/// Attachment offsets for both ends of an edge.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EdgeAnchors {
	/// Where the line leaves the source.
	pub source: Anchor,
	/// Where the line reaches the target.
	pub target: Anchor,
}

struct SideRef<'a> {
	edge: &'a EdgeId,
	is_source: bool,
	other: Position,
}

/// Sizes and anchors for every station and line of a laid-out graph.
#[derive(Clone, Debug, Default)]
pub struct StationGeometry {
	sizes: HashMap<NodeId, StationSize>,
	anchors: HashMap<EdgeId, EdgeAnchors>,
	connections: HashMap<NodeId, usize>,
}

impl StationGeometry {
	/// Sizes and anchors for every node and edge of `graph`.
	pub fn compute(graph: &Graph, config: &StationConfig) -> Self {
		let by_id: HashMap<&NodeId, &Node> = graph.nodes.iter().map(|n| (&n.id, n)).collect();
		let mut connections: HashMap<NodeId, usize> = HashMap::new();
		let mut sides: HashMap<&NodeId, [Vec<SideRef<'_>>; 4]> = HashMap::new();

		for edge in &graph.edges {
			*connections.entry(edge.source.clone()).or_default() += 1;
			*connections.entry(edge.target.clone()).or_default() += 1;

			let (Some(src), Some(tgt)) = (by_id.get(&edge.source), by_id.get(&edge.target)) else {
				continue;
			};
			let (src_side, tgt_side) = classify(src.position, tgt.position);
			sides.entry(&src.id).or_default()[src_side.index()].push(SideRef {
				edge: &edge.id,
				is_source: true,
				other: tgt.position,
			});
			sides.entry(&tgt.id).or_default()[tgt_side.index()].push(SideRef {
				edge: &edge.id,
				is_source: false,
				other: src.position,
			});
		}

		let mut sizes = HashMap::with_capacity(graph.nodes.len());
		let mut anchors: HashMap<EdgeId, EdgeAnchors> = HashMap::with_capacity(graph.edges.len());

		for node in &graph.nodes {
			let base = base_size(node.data.node_type, config);
			let conns = connections.get(&node.id).copied().unwrap_or(0);
			let steps = conns.saturating_sub(2).min(config.max_growth_steps);
			let size = base + steps as f64 * config.growth_per_connection;

			let Some(node_sides) = sides.get_mut(&node.id) else {
				sizes.insert(
					node.id.clone(),
					StationSize {
						width: size,
						height: size,
					},
				);
				continue;
			};

			let count = |s: Side| node_sides[s.index()].len();
			let spread = |lines: usize| {
				if lines > 1 {
					(lines - 1) as f64 * config.line_spacing + size
				} else {
					size
				}
			};
			// Lines stacked on top/bottom need width, on left/right need height.
			let station = StationSize {
				width: spread(count(Side::Top).max(count(Side::Bottom))).max(size),
				height: spread(count(Side::Left).max(count(Side::Right))).max(size),
			};
			sizes.insert(node.id.clone(), station);

			for side in Side::ALL {
				let refs = &mut node_sides[side.index()];
				if refs.is_empty() {
					continue;
				}
				let horizontal = side.is_horizontal();
				refs.sort_by(|a, b| {
					let (ka, kb) = if horizontal {
						(a.other.x, b.other.x)
					} else {
						(a.other.y, b.other.y)
					};
					ka.total_cmp(&kb)
				});

				let n = refs.len();
				let max_dim = if horizontal { station.width } else { station.height };
				let span = (config.line_spacing * (n - 1) as f64).min(max_dim * config.max_span_ratio);
				for (i, r) in refs.iter().enumerate() {
					let t = if n <= 1 {
						0.0
					} else {
						-span / 2.0 + span * i as f64 / (n - 1) as f64
					};
					let anchor = match side {
						Side::Top => Anchor { dx: t, dy: -station.height / 2.0 },
						Side::Bottom => Anchor { dx: t, dy: station.height / 2.0 },
						Side::Left => Anchor { dx: -station.width / 2.0, dy: t },
						Side::Right => Anchor { dx: station.width / 2.0, dy: t },
					};
					let entry = anchors.entry(r.edge.clone()).or_default();
					if r.is_source {
						entry.source = anchor;
					} else {
						entry.target = anchor;
					}
				}
			}
		}

		Self {
			sizes,
			anchors,
			connections,
		}
	}

	/// Marker size of `id`; `None` for ids not in the graph.
	pub fn size(&self, id: &NodeId) -> Option<StationSize> {
		self.sizes.get(id).copied()
	}

	/// Attachment offsets for `edge`. Zero for unknown edges.
	pub fn anchors(&self, edge: &EdgeId) -> EdgeAnchors {
		self.anchors.get(edge).copied().unwrap_or_default()
	}

	/// Number of lines touching `id`.
	pub fn connection_count(&self, id: &NodeId) -> usize {
		self.connections.get(id).copied().unwrap_or(0)
	}
}

fn base_size(node_type: NodeType, config: &StationConfig) -> f64 {
	match node_type {
		NodeType::Artist => config.artist_size,
		NodeType::Genre => config.genre_size,
		NodeType::Track => config.track_size,
	}
}
