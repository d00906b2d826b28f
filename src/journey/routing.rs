//! Metro-style edge routing.
//!
//! Every rendered segment runs at a multiple of 45°. Endpoints that are
//! already aligned get a straight line, near-diagonal pairs get one diagonal,
//! and everything else gets exactly one bend: a 45° run covering the shorter
//! axis, then a straight run for the remainder.

use std::fmt::Write as _;

use super::config::RouteConfig;
use super::station::StationGeometry;
use super::theme::RouteStyle;
use super::types::{EdgeId, Graph, Node, NodeId, Position};

/// Which rule produced a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteShape {
	/// Endpoints aligned horizontally or vertically.
	Straight,
	/// Endpoints (nearly) on a 45° line.
	Diagonal,
	/// One 45° segment followed by one axis-aligned segment.
	Bent,
}

/// Polyline for one edge, from source anchor to target anchor.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
	/// Rule that produced the points.
	pub shape: RouteShape,
	/// Polyline from source anchor to target anchor.
	pub points: Vec<Position>,
}

impl Route {
	/// Consecutive point pairs.
	pub fn segments(&self) -> impl Iterator<Item = (Position, Position)> + '_ {
		self.points.windows(2).map(|w| (w[0], w[1]))
	}

	/// SVG path data, e.g. `M 0 0 L 30 30 L 100 30`.
	pub fn svg_path(&self) -> String {
		let mut path = String::new();
		for (i, p) in self.points.iter().enumerate() {
			if i > 0 {
				path.push(' ');
			}
			let cmd = if i == 0 { 'M' } else { 'L' };
			let _ = write!(path, "{} {} {}", cmd, p.x, p.y);
		}
		path
	}
}

/// Applies the metro bend rule.
#[derive(Clone, Debug, Default)]
pub struct EdgeRouter {
	config: RouteConfig,
}

impl EdgeRouter {
	/// Router with custom thresholds.
	pub fn new(config: RouteConfig) -> Self {
		Self { config }
	}

	/// Route between two resolved (anchor-adjusted) endpoints.
	pub fn route(&self, from: Position, to: Position) -> Route {
		let (dx, dy) = (to.x - from.x, to.y - from.y);
		let (adx, ady) = (dx.abs(), dy.abs());
		let straight = |shape| Route {
			shape,
			points: vec![from, to],
		};

		if adx < self.config.straight_tolerance || ady < self.config.straight_tolerance {
			return straight(RouteShape::Straight);
		}

		let minor = adx.min(ady);
		let tolerance = self.config.diagonal_min.max(minor * self.config.diagonal_ratio);
		if (adx - ady).abs() < tolerance {
			return straight(RouteShape::Diagonal);
		}

		let (sx, sy) = (dx.signum(), dy.signum());
		let bend = if adx >= ady {
			Position::new(from.x + sx * minor, to.y)
		} else {
			Position::new(to.x, from.y + sy * minor)
		};
		Route {
			shape: RouteShape::Bent,
			points: vec![from, bend, to],
		}
	}
}

/// A fully resolved edge, ready for a renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct RoutedEdge {
	/// Id of the routed edge.
	pub id: EdgeId,
	/// Source node.
	pub source: NodeId,
	/// Target node.
	pub target: NodeId,
	/// Geometry of the line.
	pub route: Route,
	/// Stroke of the line.
	pub style: RouteStyle,
}

/// Route every edge of a laid-out graph, attaching each end at its station
/// anchor. Edges whose endpoints are missing are skipped.
pub fn route_graph(graph: &Graph, stations: &StationGeometry, router: &EdgeRouter) -> Vec<RoutedEdge> {
	let find = |id: &NodeId| graph.nodes.iter().find(|n| n.id == *id);
	graph
		.edges
		.iter()
		.filter_map(|edge| {
			let (src, tgt): (&Node, &Node) = (find(&edge.source)?, find(&edge.target)?);
			let anchors = stations.anchors(&edge.id);
			let from = src.position.offset(anchors.source.dx, anchors.source.dy);
			let to = tgt.position.offset(anchors.target.dx, anchors.target.dy);
			Some(RoutedEdge {
				id: edge.id.clone(),
				source: edge.source.clone(),
				target: edge.target.clone(),
				route: router.route(from, to),
				style: edge.data.pathway_type.style(),
			})
		})
		.collect()
}
