//! Graph data structures shared by the builder, merger, layout and router.
//!
//! Field names serialize in camelCase so stored journeys and provider payloads
//! keep the shape the rest of the application already speaks.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a journey node stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
	/// A performing artist. Rendered as a circular station.
	Artist,
	/// A single track. Rendered as a small station.
	Track,
	/// A genre. Rendered as a square station.
	Genre,
}

impl NodeType {
	/// Wire name used in node ids and payloads.
	pub const fn as_str(self) -> &'static str {
		match self {
			NodeType::Artist => "artist",
			NodeType::Track => "track",
			NodeType::Genre => "genre",
		}
	}
}

impl fmt::Display for NodeType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Relationship category proposed by the pathway provider.
///
/// Each category is one "metro line": it always renders with the same colour
/// and dash pattern (see [`super::theme::RouteStyle`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathwayType {
	/// Who influenced the clicked node.
	Influences,
	/// Who the clicked node influenced.
	Legacy,
	/// Direct collaborators.
	Collaborators,
	/// Peers from the same era or scene.
	Contemporaries,
	/// Related genres.
	GenreConnections,
}

impl PathwayType {
	/// Every pathway type, in legend order.
	pub const ALL: [PathwayType; 5] = [
		PathwayType::Influences,
		PathwayType::Legacy,
		PathwayType::Collaborators,
		PathwayType::Contemporaries,
		PathwayType::GenreConnections,
	];

	/// Wire name used in edge ids and payloads.
	pub const fn as_str(self) -> &'static str {
		match self {
			PathwayType::Influences => "influences",
			PathwayType::Legacy => "legacy",
			PathwayType::Collaborators => "collaborators",
			PathwayType::Contemporaries => "contemporaries",
			PathwayType::GenreConnections => "genre_connections",
		}
	}
}

impl fmt::Display for PathwayType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Payload carried by every node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
	/// Kind of entity.
	pub node_type: NodeType,
	/// Catalogue identifier (e.g. a Spotify id). Unique per `node_type`.
	pub node_id: String,
	/// Display name.
	pub node_name: String,
	/// Short blurb from the provider.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Tracks that represent the entity.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub representative_track_titles: Option<Vec<String>>,
	/// Pathway that introduced this node. `None` for a journey's start node.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pathway_type: Option<PathwayType>,
	/// Set when the entity is in the visit history.
	#[serde(default)]
	pub is_visited: bool,
	/// Set when the entity is the latest visit.
	#[serde(default)]
	pub is_current: bool,
}

impl NodeData {
	/// Minimal node payload with no optional fields set.
	pub fn new(node_type: NodeType, node_id: impl Into<String>, node_name: impl Into<String>) -> Self {
		Self {
			node_type,
			node_id: node_id.into(),
			node_name: node_name.into(),
			description: None,
			representative_track_titles: None,
			pathway_type: None,
			is_visited: false,
			is_current: false,
		}
	}

	/// True when both payloads refer to the same catalogue entity.
	pub fn same_entity(&self, other: &NodeData) -> bool {
		self.node_type == other.node_type && self.node_id == other.node_id
	}
}

/// Whether a node id names a journey origin or an expansion node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
	/// The origin of a subgraph (and of the journey, for the root).
	Center,
	/// Any node introduced by an expansion.
	Node,
}

impl NodeKind {
	const fn prefix(self) -> &'static str {
		match self {
			NodeKind::Center => "center",
			NodeKind::Node => "node",
		}
	}
}

/// Graph-wide node identifier, `kind:nodeType:nodeId`.
///
/// Id equality is the only identity test in the graph, which is what lets two
/// pathways mentioning the same artist collapse onto one node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
	/// Derive the id for an entity of the given kind.
	pub fn new(kind: NodeKind, node_type: NodeType, node_id: &str) -> Self {
		Self(format!("{}:{}:{}", kind.prefix(), node_type, node_id))
	}

	/// Id of the center node for `data`.
	pub fn center(data: &NodeData) -> Self {
		Self::new(NodeKind::Center, data.node_type, &data.node_id)
	}

	/// Id of an expansion node for `data`.
	pub fn node(data: &NodeData) -> Self {
		Self::new(NodeKind::Node, data.node_type, &data.node_id)
	}

	/// Wrap an already formatted id (e.g. one loaded from storage).
	pub fn from_raw(raw: impl Into<String>) -> Self {
		Self(raw.into())
	}

	/// Raw id string.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Whether this is the journey's origin node.
	pub fn is_center(&self) -> bool {
		self.0.starts_with("center:")
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Edge identifier, `e:<source>-><target>:<pathwayType>`.
///
/// The pathway type is part of the id: rediscovering the same relationship is
/// deduplicated, but two relationship kinds between one pair coexist.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
	/// Id of the `pathway_type` edge from `source` to `target`.
	pub fn new(source: &NodeId, target: &NodeId, pathway_type: PathwayType) -> Self {
		Self(format!("e:{}->{}:{}", source, target, pathway_type))
	}

	/// Raw id string.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for EdgeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// A point in layout space (pixels, y grows downward).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
	/// Horizontal coordinate, growing east.
	pub x: f64,
	/// Vertical coordinate, growing south.
	pub y: f64,
}

impl Position {
	/// The layout origin, where the root sits.
	pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

	/// Point at `(x, y)`.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Point moved by `(dx, dy)`.
	pub fn offset(self, dx: f64, dy: f64) -> Self {
		Self::new(self.x + dx, self.y + dy)
	}
}

/// A positioned node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
	/// Unique id.
	pub id: NodeId,
	/// Layout position.
	pub position: Position,
	/// Entity shown by the node.
	pub data: NodeData,
}

/// Per-edge payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
	/// Relationship shown by the edge.
	pub pathway_type: PathwayType,
}

/// A directed relationship. Layout treats it as undirected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
	/// Unique id.
	pub id: EdgeId,
	/// Node the edge starts at.
	pub source: NodeId,
	/// Node the edge ends at.
	pub target: NodeId,
	/// Edge payload.
	pub data: EdgeData,
}

impl Edge {
	/// Create an edge, deriving its id from the endpoints and pathway.
	pub fn new(source: NodeId, target: NodeId, pathway_type: PathwayType) -> Self {
		Self {
			id: EdgeId::new(&source, &target, pathway_type),
			source,
			target,
			data: EdgeData { pathway_type },
		}
	}

	/// Whether `id` is either endpoint.
	pub fn touches(&self, id: &NodeId) -> bool {
		self.source == *id || self.target == *id
	}
}

/// Which way an edge runs relative to the node being inspected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
	/// The inspected node is the edge source.
	To,
	/// The inspected node is the edge target.
	From,
}

/// One line touching a node, as shown in a station's detail panel.
#[derive(Clone, Debug, PartialEq)]
pub struct Connection<'a> {
	/// Node at the other end.
	pub other: &'a Node,
	/// Relationship of the edge.
	pub pathway_type: PathwayType,
	/// Whether the edge leaves or enters the queried node.
	pub direction: Direction,
}

/// Complete graph: nodes and edges in insertion order.
///
/// Order matters: the layout's ring placement follows it, so it is kept stable
/// across merges.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
	/// Nodes in merge order.
	#[serde(default)]
	pub nodes: Vec<Node>,
	/// Edges in merge order.
	#[serde(default)]
	pub edges: Vec<Edge>,
}

impl Graph {
	/// Graph holding a single center node at the origin.
	pub fn seeded(center: &NodeData) -> Self {
		Self {
			nodes: vec![Node {
				id: NodeId::center(center),
				position: Position::ORIGIN,
				data: center.clone(),
			}],
			edges: Vec::new(),
		}
	}

	/// Whether the graph has no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Node with `id`, if present.
	pub fn node(&self, id: &NodeId) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == *id)
	}

	/// Whether a node with `id` is present.
	pub fn contains(&self, id: &NodeId) -> bool {
		self.nodes.iter().any(|n| n.id == *id)
	}

	/// Node ids in graph order. This is the tie-break order the layout uses.
	pub fn node_order(&self) -> Vec<NodeId> {
		self.nodes.iter().map(|n| n.id.clone()).collect()
	}

	/// Ids of `id` and every node sharing an edge with it.
	pub fn neighborhood(&self, id: &NodeId) -> Vec<NodeId> {
		let mut ids = vec![id.clone()];
		for edge in &self.edges {
			let other = if edge.source == *id {
				&edge.target
			} else if edge.target == *id {
				&edge.source
			} else {
				continue;
			};
			if !ids.contains(other) {
				ids.push(other.clone());
			}
		}
		ids
	}

	/// Every edge touching `id`, resolved to the node at its other end.
	/// Edges whose other endpoint is missing are skipped.
	pub fn connections(&self, id: &NodeId) -> Vec<Connection<'_>> {
		self.edges
			.iter()
			.filter(|e| e.touches(id))
			.filter_map(|e| {
				let (other, direction) = if e.source == *id {
					(&e.target, Direction::To)
				} else {
					(&e.source, Direction::From)
				};
				self.node(other).map(|other| Connection {
					other,
					pathway_type: e.data.pathway_type,
					direction,
				})
			})
			.collect()
	}
}
