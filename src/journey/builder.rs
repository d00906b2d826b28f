//! Turns one pathway provider response into a hub-and-spoke subgraph.

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::JourneyError;
use super::types::{Edge, Node, NodeData, NodeId, PathwayType, Position};

/// Radius of the placeholder ring children are dropped on. The layout engine
/// overwrites these positions.
const PLACEHOLDER_RADIUS: f64 = 250.0;

/// One relationship category and the nodes proposed for it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pathway {
	/// Relationship category of every node in this pathway.
	#[serde(rename = "type")]
	pub kind: PathwayType,
	/// Human title, e.g. "Roots".
	#[serde(default)]
	pub title: String,
	/// Proposed nodes.
	#[serde(default)]
	pub nodes: Vec<NodeData>,
}

/// Provider result. Usually holds three to five pathways.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PathwayResponse {
	/// Proposed pathways, in provider order.
	#[serde(default)]
	pub pathways: Vec<Pathway>,
}

impl PathwayResponse {
	/// Decode a provider payload, keeping whatever is well formed.
	///
	/// A missing `pathways` array yields an empty response. Pathways with an
	/// unknown type and nodes missing their type, id or name are dropped one
	/// by one rather than failing the whole payload.
	pub fn from_value(value: &Value) -> Self {
		let Some(raw_pathways) = value.get("pathways").and_then(Value::as_array) else {
			warn!("pathway response has no `pathways` array, treating as empty");
			return Self::default();
		};

		let pathways = raw_pathways
			.iter()
			.filter_map(|raw| {
				let kind = match raw.get("type").cloned().map(serde_json::from_value::<PathwayType>) {
					Some(Ok(kind)) => kind,
					_ => {
						warn!("skipping pathway with missing or unknown type: {:?}", raw.get("type"));
						return None;
					}
				};
				let title = raw
					.get("title")
					.and_then(Value::as_str)
					.unwrap_or_default()
					.to_string();
				let nodes = raw
					.get("nodes")
					.and_then(Value::as_array)
					.map(|nodes| {
						nodes
							.iter()
							.filter_map(|n| match serde_json::from_value::<NodeData>(n.clone()) {
								Ok(data) => Some(data),
								Err(e) => {
									warn!("skipping malformed {} node: {}", kind, e);
									None
								}
							})
							.collect()
					})
					.unwrap_or_default();
				Some(Pathway { kind, title, nodes })
			})
			.collect();

		Self { pathways }
	}

	/// Decode a provider payload from JSON text.
	///
	/// Only text that is not JSON at all is an error; shape problems degrade
	/// as in [`PathwayResponse::from_value`].
	pub fn from_json(text: &str) -> Result<Self, JourneyError> {
		let value: Value = serde_json::from_str(text)?;
		Ok(Self::from_value(&value))
	}

	/// Total number of proposed nodes across all pathways.
	pub fn node_count(&self) -> usize {
		self.pathways.iter().map(|p| p.nodes.len()).sum()
	}
}

/// Result of one expansion: a center node plus one spoke per proposed node.
#[derive(Clone, Debug, PartialEq)]
pub struct Subgraph {
	/// Center node first, then one node per proposed entry.
	pub nodes: Vec<Node>,
	/// One spoke per child, from the center.
	pub edges: Vec<Edge>,
	/// Id of the hub node.
	pub center_id: NodeId,
}

impl Subgraph {
	/// Re-root the spokes on `clicked`, the id the expanded node already has in
	/// the accumulated graph.
	///
	/// The builder always names its hub `center:…`; when the clicked node is an
	/// expansion node its graph id is `node:…`, so edges must be rewritten
	/// before merging or they would hang off a phantom center.
	pub fn attach_to(mut self, clicked: &NodeId) -> Self {
		if self.center_id == *clicked {
			return self;
		}
		for edge in &mut self.edges {
			if edge.source == self.center_id {
				*edge = Edge::new(clicked.clone(), edge.target.clone(), edge.data.pathway_type);
			}
		}
		for node in &mut self.nodes {
			if node.id == self.center_id {
				node.id = clicked.clone();
			}
		}
		self.center_id = clicked.clone();
		self
	}
}

/// Build the hub-and-spoke subgraph for `center` from a provider response.
///
/// Duplicate entries within the response are kept; the merger collapses them.
pub fn build_subgraph(center: &NodeData, response: &PathwayResponse) -> Subgraph {
	let center_id = NodeId::center(center);
	let mut nodes = vec![Node {
		id: center_id.clone(),
		position: Position::ORIGIN,
		data: center.clone(),
	}];
	let mut edges = Vec::with_capacity(response.node_count());

	let mut i = 0usize;
	for pathway in &response.pathways {
		for proposed in &pathway.nodes {
			i += 1;
			let id = NodeId::node(proposed);
			nodes.push(Node {
				id: id.clone(),
				position: Position::new(
					PLACEHOLDER_RADIUS * (i as f64).cos(),
					PLACEHOLDER_RADIUS * (i as f64).sin(),
				),
				data: NodeData {
					pathway_type: Some(pathway.kind),
					is_visited: false,
					is_current: false,
					..proposed.clone()
				},
			});
			edges.push(Edge::new(center_id.clone(), id, pathway.kind));
		}
	}

	Subgraph {
		nodes,
		edges,
		center_id,
	}
}
