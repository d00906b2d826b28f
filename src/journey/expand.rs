//! One expansion cycle around a clicked node.
//!
//! Ask the provider for pathways, build the hub-and-spoke subgraph, merge it
//! into the journey, lay the whole graph out again and hand the host what it
//! needs to draw.

use log::{debug, info};
use rand::Rng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::builder::{PathwayResponse, build_subgraph};
use super::config::{JourneyConfig, RouteConfig, StationConfig};
use super::error::JourneyError;
use super::layout::{LayoutEngine, LayoutStats};
use super::merge::merge_graph;
use super::routing::{EdgeRouter, RoutedEdge, route_graph};
use super::state::JourneyState;
use super::station::StationGeometry;
use super::types::{Graph, NodeData, NodeId, NodeType};

/// A node already on the journey, as the provider sees it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviousNode {
	/// Display name of the node.
	pub name: String,
}

/// What the provider knows about the journey so far.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
	/// Every visited node, oldest first.
	#[serde(default)]
	pub previous_nodes: Vec<PreviousNode>,
}

/// What the pathway provider is asked about.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathwayRequest {
	/// Type of the clicked node.
	pub node_type: NodeType,
	/// Catalogue id of the clicked node.
	pub node_id: String,
	/// Display name of the clicked node.
	pub node_name: String,
	/// Journey history.
	#[serde(default)]
	pub context: RequestContext,
}

impl PathwayRequest {
	/// Request for `node`, with the journey so far as context.
	pub fn new(node: &NodeData, visited: &[NodeData]) -> Self {
		Self {
			node_type: node.node_type,
			node_id: node.node_id.clone(),
			node_name: node.node_name.clone(),
			context: RequestContext {
				previous_nodes: visited
					.iter()
					.map(|v| PreviousNode {
						name: v.node_name.clone(),
					})
					.collect(),
			},
		}
	}
}

/// Source of related nodes, usually a remote model behind an HTTP call.
///
/// The raw payload is returned untouched; shape problems are absorbed by
/// [`PathwayResponse::from_value`]. Only transport failures are errors.
pub trait PathwayProvider {
	/// Fetch the raw pathway payload for `request`.
	fn generate_pathways(&self, request: &PathwayRequest) -> Result<Value, JourneyError>;
}

impl<F> PathwayProvider for F
where
	F: Fn(&PathwayRequest) -> Result<Value, JourneyError>,
{
	fn generate_pathways(&self, request: &PathwayRequest) -> Result<Value, JourneyError> {
		self(request)
	}
}

/// Outcome of one expansion.
#[derive(Clone, Debug, PartialEq)]
pub struct Expansion {
	/// The expanded node.
	pub clicked: NodeId,
	/// Nodes new to the journey graph.
	pub added_nodes: usize,
	/// Edges new to the journey graph.
	pub added_edges: usize,
	/// The clicked node and its direct neighbours; the host fits the viewport
	/// to these.
	pub focus: Vec<NodeId>,
	/// Bookkeeping of the relayout.
	pub layout: LayoutStats,
}

/// A journey ready to draw: decorated nodes, station markers and routed lines.
#[derive(Clone, Debug)]
pub struct RenderedJourney {
	/// Graph with visit decoration applied.
	pub graph: Graph,
	/// Station sizes and line anchors.
	pub stations: StationGeometry,
	/// One routed line per edge.
	pub edges: Vec<RoutedEdge>,
}

/// Drives expansions and rendering for journeys owned by the caller.
pub struct JourneyEngine<R = SmallRng> {
	layout: LayoutEngine<R>,
	router: EdgeRouter,
	station: StationConfig,
}

impl JourneyEngine<SmallRng> {
	/// Engine seeded from the clock.
	pub fn new(config: JourneyConfig) -> Self {
		Self::with_layout(LayoutEngine::new(config.layout), config.route, config.station)
	}

	/// Engine whose layouts are fully reproducible.
	pub fn seeded(config: JourneyConfig, seed: u64) -> Self {
		Self::with_layout(
			LayoutEngine::seeded(config.layout, seed),
			config.route,
			config.station,
		)
	}
}

impl Default for JourneyEngine<SmallRng> {
	fn default() -> Self {
		Self::new(JourneyConfig::default())
	}
}

impl<R: Rng> JourneyEngine<R> {
	/// Engine around an existing layout engine.
	pub fn with_layout(layout: LayoutEngine<R>, route: RouteConfig, station: StationConfig) -> Self {
		Self {
			layout,
			router: EdgeRouter::new(route),
			station,
		}
	}

	/// Expand `clicked` with pathways fetched from `provider`.
	///
	/// The visit is recorded before the provider is called, so a failed fetch
	/// still shows up in the history. Provider errors leave the graph untouched.
	pub fn expand_with<P: PathwayProvider + ?Sized>(
		&mut self,
		state: &mut JourneyState,
		clicked: &NodeId,
		provider: &P,
	) -> Result<Expansion, JourneyError> {
		let node = clicked_node(state, clicked)?;
		let request = PathwayRequest::new(&node, state.visited());
		state.visit_node(&node);
		let payload = provider.generate_pathways(&request)?;
		let response = PathwayResponse::from_value(&payload);
		self.merge_response(state, clicked, &node, &response)
	}

	/// Expand `clicked` with an already decoded response.
	pub fn expand(
		&mut self,
		state: &mut JourneyState,
		clicked: &NodeId,
		response: &PathwayResponse,
	) -> Result<Expansion, JourneyError> {
		let node = clicked_node(state, clicked)?;
		state.visit_node(&node);
		self.merge_response(state, clicked, &node, response)
	}

	/// Lay the current graph out again, e.g. after restoring a journey.
	pub fn relayout(&mut self, state: &mut JourneyState) -> Result<LayoutStats, JourneyError> {
		let root = state.root_id().ok_or(JourneyError::NoJourney)?;
		let (graph, stats) = self.positioned(state.graph(), &root);
		state.set_graph(graph);
		Ok(stats)
	}

	/// Station geometry and routed lines for the journey as it stands.
	pub fn render(&self, state: &JourneyState) -> RenderedJourney {
		let graph = state.decorated_graph();
		let stations = StationGeometry::compute(&graph, &self.station);
		let edges = route_graph(&graph, &stations, &self.router);
		debug!("rendered {} stations, {} lines", graph.nodes.len(), edges.len());
		RenderedJourney {
			graph,
			stations,
			edges,
		}
	}

	fn merge_response(
		&mut self,
		state: &mut JourneyState,
		clicked: &NodeId,
		node: &NodeData,
		response: &PathwayResponse,
	) -> Result<Expansion, JourneyError> {
		let root = state.root_id().ok_or(JourneyError::NoJourney)?;
		let subgraph = build_subgraph(node, response).attach_to(clicked);
		let (nodes_before, edges_before) = (state.graph().nodes.len(), state.graph().edges.len());
		let merged = merge_graph(state.graph(), &subgraph.nodes, &subgraph.edges);
		let (graph, stats) = self.positioned(&merged, &root);

		let expansion = Expansion {
			clicked: clicked.clone(),
			added_nodes: graph.nodes.len() - nodes_before,
			added_edges: graph.edges.len() - edges_before,
			focus: graph.neighborhood(clicked),
			layout: stats,
		};
		info!(
			"expanded {} ({} pathways): +{} nodes, +{} edges, {} iterations in {:?}",
			clicked,
			response.pathways.len(),
			expansion.added_nodes,
			expansion.added_edges,
			expansion.layout.iterations,
			expansion.layout.elapsed
		);
		state.set_graph(graph);
		Ok(expansion)
	}

	fn positioned(&mut self, graph: &Graph, root: &NodeId) -> (Graph, LayoutStats) {
		let layout = self.layout.compute(&graph.node_order(), &graph.edges, root);
		let positioned = Graph {
			nodes: layout.apply(&graph.nodes),
			edges: graph.edges.clone(),
		};
		(positioned, layout.stats)
	}
}

fn clicked_node(state: &JourneyState, clicked: &NodeId) -> Result<NodeData, JourneyError> {
	if state.center().is_none() {
		return Err(JourneyError::NoJourney);
	}
	state
		.graph()
		.node(clicked)
		.map(|n| n.data.clone())
		.ok_or_else(|| JourneyError::UnknownNode(clicked.to_string()))
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::journey::config::LayoutConfig;
	use crate::journey::types::{PathwayType, Position};

	fn engine() -> JourneyEngine {
		let config = JourneyConfig {
			layout: LayoutConfig::default().unbounded(),
			..JourneyConfig::default()
		};
		JourneyEngine::seeded(config, 7)
	}

	fn journey() -> JourneyState {
		let mut state = JourneyState::new();
		state.begin("j", NodeData::new(NodeType::Artist, "miles", "Miles Davis"));
		state.start();
		state
	}

	fn payload() -> Value {
		json!({
			"pathways": [
				{
					"type": "influences",
					"title": "Roots",
					"nodes": [
						{ "nodeType": "artist", "nodeId": "bird", "nodeName": "Charlie Parker" },
						{ "nodeType": "artist", "nodeId": "diz", "nodeName": "Dizzy Gillespie" }
					]
				},
				{
					"type": "genre_connections",
					"nodes": [{ "nodeType": "genre", "nodeId": "bebop", "nodeName": "Bebop" }]
				}
			]
		})
	}

	fn centers(graph: &Graph) -> usize {
		graph.nodes.iter().filter(|n| n.id.is_center()).count()
	}

	#[test]
	fn expanding_the_center_adds_spokes() {
		let mut engine = engine();
		let mut state = journey();
		let root = state.root_id().unwrap();
		let response = PathwayResponse::from_value(&payload());

		let expansion = engine.expand(&mut state, &root, &response).unwrap();
		assert_eq!(expansion.added_nodes, 3);
		assert_eq!(expansion.added_edges, 3);
		assert_eq!(expansion.focus.len(), 4);
		assert_eq!(expansion.focus[0], root);
		assert_eq!(state.graph().node(&root).unwrap().position, Position::ORIGIN);
		assert_eq!(centers(state.graph()), 1);
		// Re-clicking the center is recorded as a visit.
		assert_eq!(state.visited().len(), 2);
	}

	#[test]
	fn expanding_a_child_hangs_spokes_off_the_child() {
		let mut engine = engine();
		let mut state = journey();
		let root = state.root_id().unwrap();
		engine
			.expand(&mut state, &root, &PathwayResponse::from_value(&payload()))
			.unwrap();

		let bird = NodeId::from_raw("node:artist:bird");
		let more = json!({
			"pathways": [{
				"type": "collaborators",
				"nodes": [
					{ "nodeType": "artist", "nodeId": "diz", "nodeName": "Dizzy Gillespie" },
					{ "nodeType": "artist", "nodeId": "max", "nodeName": "Max Roach" },
					{ "nodeType": "artist", "nodeId": "bird", "nodeName": "Charlie Parker" }
				]
			}]
		});
		let expansion = engine
			.expand(&mut state, &bird, &PathwayResponse::from_value(&more))
			.unwrap();

		assert_eq!(expansion.added_nodes, 1);
		// diz and max are new edges, the bird self-loop is dropped.
		assert_eq!(expansion.added_edges, 2);
		assert_eq!(centers(state.graph()), 1);
		assert!(state.graph().edges.iter().all(|e| e.source != e.target));
		assert!(
			state
				.graph()
				.edges
				.iter()
				.filter(|e| e.data.pathway_type == PathwayType::Collaborators)
				.all(|e| e.source == bird)
		);
		assert!(expansion.focus.contains(&NodeId::from_raw("node:artist:max")));
	}

	#[test]
	fn provider_sees_the_journey_so_far() {
		let mut engine = engine();
		let mut state = journey();
		let root = state.root_id().unwrap();
		let seen = std::cell::RefCell::new(None);
		let provider = |request: &PathwayRequest| -> Result<Value, JourneyError> {
			*seen.borrow_mut() = Some(request.clone());
			Ok(payload())
		};

		engine.expand_with(&mut state, &root, &provider).unwrap();
		let request = seen.into_inner().unwrap();
		assert_eq!(request.node_id, "miles");
		assert_eq!(request.context.previous_nodes, vec![PreviousNode {
			name: "Miles Davis".to_string()
		}]);

		let wire = serde_json::to_value(&request).unwrap();
		assert_eq!(wire["nodeType"], "artist");
		assert_eq!(wire["context"]["previousNodes"][0]["name"], "Miles Davis");
	}

	#[test]
	fn malformed_payload_expands_to_nothing() {
		let mut engine = engine();
		let mut state = journey();
		let root = state.root_id().unwrap();
		let provider =
			|_: &PathwayRequest| -> Result<Value, JourneyError> { Ok(json!({ "message": "rate limited" })) };

		let expansion = engine.expand_with(&mut state, &root, &provider).unwrap();
		assert_eq!(expansion.added_nodes, 0);
		assert_eq!(state.graph().nodes.len(), 1);
	}

	#[test]
	fn provider_failure_is_passed_through() {
		let mut engine = engine();
		let mut state = journey();
		let root = state.root_id().unwrap();
		let before = state.graph().clone();
		let provider =
			|_: &PathwayRequest| -> Result<Value, JourneyError> { Err(JourneyError::Provider("timeout".into())) };

		let err = engine.expand_with(&mut state, &root, &provider).unwrap_err();
		assert!(matches!(err, JourneyError::Provider(_)));
		assert_eq!(state.graph(), &before);
		assert_eq!(state.visited().len(), 2);
	}

	#[test]
	fn unknown_click_and_missing_journey_are_errors() {
		let mut engine = engine();
		let response = PathwayResponse::default();

		let mut empty = JourneyState::new();
		let err = engine
			.expand(&mut empty, &NodeId::from_raw("center:artist:x"), &response)
			.unwrap_err();
		assert!(matches!(err, JourneyError::NoJourney));

		let mut state = journey();
		let err = engine
			.expand(&mut state, &NodeId::from_raw("node:artist:ghost"), &response)
			.unwrap_err();
		assert!(matches!(err, JourneyError::UnknownNode(id) if id == "node:artist:ghost"));
	}

	#[test]
	fn render_routes_every_line_at_metro_angles() {
		let mut engine = engine();
		let mut state = journey();
		let root = state.root_id().unwrap();
		engine
			.expand(&mut state, &root, &PathwayResponse::from_value(&payload()))
			.unwrap();

		let rendered = engine.render(&state);
		assert_eq!(rendered.edges.len(), state.graph().edges.len());
		for edge in &rendered.edges {
			for (a, b) in edge.route.segments() {
				let (dx, dy) = ((b.x - a.x).abs(), (b.y - a.y).abs());
				assert!(dx < 1.0 || dy < 1.0 || (dx - dy).abs() < 5.0_f64.max(dx.min(dy) * 0.05));
			}
		}
		let center = rendered.graph.node(&root).unwrap();
		assert!(center.data.is_visited && center.data.is_current);
		assert!(rendered.stations.size(&root).is_some());
	}

	#[test]
	fn relayout_needs_a_journey() {
		let mut engine = engine();
		assert!(matches!(
			engine.relayout(&mut JourneyState::new()),
			Err(JourneyError::NoJourney)
		));
		let mut state = journey();
		let stats = engine.relayout(&mut state).unwrap();
		assert!(stats.trivial);
	}
}
