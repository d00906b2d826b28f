//! Property-based invariant tests for the journey pipeline.
//!
//! 1. Merging the same subgraph twice equals merging it once.
//! 2. The same entity from two responses collapses to one node id.
//! 3. Exactly one center node survives any sequence of expansions.
//! 4. Routed segments only run at multiples of 45°.
//! 5. Layout of a connected graph is reproducible and rooted at the origin.
//! 6. Two-node graphs place the child 200 units east of the root.
//! 7. Layout of a 200-node, 400-edge graph respects its time budget.
//! 8. Visits only count while recording.

// Integration tests only use a subset of the crate's dependencies.
#![allow(unused_crate_dependencies)]

use std::time::Duration;

use journey_graph::journey::{
	Edge, EdgeRouter, Graph, JourneyConfig, JourneyEngine, JourneyState, LayoutConfig, LayoutEngine,
	Node, NodeData, NodeId, NodeType, PathwayResponse, PathwayType, Position, RouteShape,
	build_subgraph, merge_graph,
};
use proptest::prelude::*;
use serde_json::{Value, json};

// ── Helpers ─────────────────────────────────────────────────────────────

const NODE_TYPES: [NodeType; 3] = [NodeType::Artist, NodeType::Track, NodeType::Genre];

fn entry_strategy() -> impl Strategy<Value = (usize, usize, u8)> {
	(0..PathwayType::ALL.len(), 0..NODE_TYPES.len(), 0u8..24)
}

/// Provider payload with up to five pathways, ids drawn from a small pool so
/// duplicates are common.
fn response_strategy() -> impl Strategy<Value = Value> {
	prop::collection::vec(entry_strategy(), 0..24).prop_map(|entries| {
		let pathways: Vec<Value> = PathwayType::ALL
			.iter()
			.enumerate()
			.map(|(p, kind)| {
				let nodes: Vec<Value> = entries
					.iter()
					.filter(|(ep, _, _)| *ep == p)
					.map(|(_, t, id)| {
						json!({
							"nodeType": NODE_TYPES[*t].as_str(),
							"nodeId": id.to_string(),
							"nodeName": format!("Name {id}"),
						})
					})
					.collect();
				json!({ "type": kind.as_str(), "title": kind.as_str(), "nodes": nodes })
			})
			.collect();
		json!({ "pathways": pathways })
	})
}

fn center() -> NodeData {
	NodeData::new(NodeType::Artist, "root", "Root")
}

fn fast_config() -> JourneyConfig {
	JourneyConfig {
		layout: LayoutConfig {
			max_iterations: 15,
			..LayoutConfig::default()
		}
		.unbounded(),
		..JourneyConfig::default()
	}
}

/// Connected graph: node `i` hangs off `parents[i - 1]`, which is always an
/// earlier node, plus a few chords.
fn tree_graph(parents: &[usize], chords: &[(usize, usize)]) -> (Graph, NodeId) {
	let root_data = center();
	let root = NodeId::center(&root_data);
	let mut graph = Graph::seeded(&root_data);
	for i in 1..=parents.len() {
		let data = NodeData::new(NodeType::Artist, format!("a{i}"), format!("Artist {i}"));
		graph.nodes.push(Node {
			id: NodeId::node(&data),
			position: Position::ORIGIN,
			data,
		});
	}
	let ids = graph.node_order();
	for (i, parent) in parents.iter().enumerate() {
		let child = i + 1;
		graph
			.edges
			.push(Edge::new(ids[parent % child].clone(), ids[child].clone(), PathwayType::Legacy));
	}
	for (a, b) in chords {
		let (a, b) = (a % ids.len(), b % ids.len());
		if a != b {
			graph
				.edges
				.push(Edge::new(ids[a].clone(), ids[b].clone(), PathwayType::Contemporaries));
		}
	}
	(graph, root)
}

fn is_axis_or_diagonal(a: Position, b: Position) -> bool {
	let (dx, dy) = ((b.x - a.x).abs(), (b.y - a.y).abs());
	dx == 0.0 || dy == 0.0 || (dx - dy).abs() <= 1e-9 * dx.max(dy).max(1.0)
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Merge idempotence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
	#[test]
	fn merge_is_idempotent(payload in response_strategy()) {
		let response = PathwayResponse::from_value(&payload);
		let sub = build_subgraph(&center(), &response);
		let base = Graph::seeded(&center());

		let once = merge_graph(&base, &sub.nodes, &sub.edges);
		let twice = merge_graph(&once, &sub.nodes, &sub.edges);
		prop_assert_eq!(&once, &twice);

		// No id appears twice.
		let mut ids = once.node_order();
		ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
		ids.dedup();
		prop_assert_eq!(ids.len(), once.nodes.len());
	}
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Id stability
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn same_entity_from_two_responses_is_one_node() {
	let mention = |kind: &str| {
		json!({ "pathways": [{
			"type": kind,
			"nodes": [{ "nodeType": "artist", "nodeId": "123", "nodeName": "X" }]
		}]})
	};
	let first = build_subgraph(&center(), &PathwayResponse::from_value(&mention("influences")));
	let second = build_subgraph(&center(), &PathwayResponse::from_value(&mention("collaborators")));
	assert_eq!(first.nodes[1].id.as_str(), "node:artist:123");
	assert_eq!(first.nodes[1].id, second.nodes[1].id);

	let graph = merge_graph(&Graph::seeded(&center()), &first.nodes, &first.edges);
	let graph = merge_graph(&graph, &second.nodes, &second.edges);
	assert_eq!(graph.nodes.len(), 2);
	// Both relationships are kept as separate lines.
	assert_eq!(graph.edges.len(), 2);
	assert_eq!(graph.nodes[1].data.pathway_type, Some(PathwayType::Influences));
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Center uniqueness
// ═════════════════════════════════════════════════════════════════════════

proptest! {
	#![proptest_config(ProptestConfig::with_cases(24))]

	#[test]
	fn one_center_after_any_expansions(
		steps in prop::collection::vec((any::<prop::sample::Index>(), response_strategy()), 1..6),
	) {
		let mut engine = JourneyEngine::seeded(fast_config(), 11);
		let mut state = JourneyState::new();
		state.begin("p", center());
		state.start();

		for (pick, payload) in steps {
			let clicked = pick.get(&state.graph().nodes).id.clone();
			let response = PathwayResponse::from_value(&payload);
			engine.expand(&mut state, &clicked, &response).unwrap();

			let graph = state.graph();
			prop_assert_eq!(graph.nodes.iter().filter(|n| n.id.is_center()).count(), 1);
			prop_assert!(graph.edges.iter().all(|e| e.source != e.target));
			prop_assert!(graph.edges.iter().all(|e| graph.contains(&e.source) && graph.contains(&e.target)));
		}
	}
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Edge angle constraint
// ═════════════════════════════════════════════════════════════════════════

proptest! {
	#[test]
	fn routes_use_metro_angles(
		fx in -2000.0f64..2000.0, fy in -2000.0f64..2000.0,
		tx in -2000.0f64..2000.0, ty in -2000.0f64..2000.0,
	) {
		let (from, to) = (Position::new(fx, fy), Position::new(tx, ty));
		let route = EdgeRouter::default().route(from, to);
		prop_assert_eq!(route.points.first().copied(), Some(from));
		prop_assert_eq!(route.points.last().copied(), Some(to));

		let (dx, dy) = ((tx - fx).abs(), (ty - fy).abs());
		match route.shape {
			RouteShape::Straight => prop_assert!(dx < 1.0 || dy < 1.0),
			RouteShape::Diagonal => prop_assert!((dx - dy).abs() < 5.0_f64.max(dx.min(dy) * 0.05)),
			RouteShape::Bent => {
				prop_assert_eq!(route.points.len(), 3);
				for (a, b) in route.segments() {
					prop_assert!(is_axis_or_diagonal(a, b), "segment {:?} -> {:?}", a, b);
				}
			}
		}
	}
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Layout determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
	#![proptest_config(ProptestConfig::with_cases(32))]

	#[test]
	fn connected_layout_is_reproducible(
		parents in prop::collection::vec(0usize..64, 2..30),
		chords in prop::collection::vec((0usize..64, 0usize..64), 0..8),
	) {
		let (graph, root) = tree_graph(&parents, &chords);
		let config = LayoutConfig { max_iterations: 40, ..LayoutConfig::default() }.unbounded();

		// Different seeds: a connected graph never touches the random source.
		let a = LayoutEngine::seeded(config.clone(), 1).layout_graph(&graph, &root);
		let b = LayoutEngine::seeded(config, 99).layout_graph(&graph, &root);
		prop_assert_eq!(&a, &b);

		prop_assert_eq!(a.node(&root).map(|n| n.position), Some(Position::ORIGIN));
		for node in &a.nodes {
			prop_assert!(node.position.x.fract() == 0.0 && node.position.y.fract() == 0.0);
			prop_assert!(node.position.x.is_finite() && node.position.y.is_finite());
		}
	}
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Trivial graph
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn two_node_graph_is_laid_out_on_the_x_axis() {
	let (graph, root) = tree_graph(&[0], &[]);
	let laid = LayoutEngine::default().layout_graph(&graph, &root);
	assert_eq!(laid.nodes[0].position, Position::ORIGIN);
	assert_eq!(laid.nodes[1].position, Position::new(200.0, 0.0));
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Bounded runtime
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn large_layout_respects_the_time_budget() {
	// 199 tree edges plus 201 chords, none of them self loops.
	let parents: Vec<usize> = (0..199).map(|i| i * 7 + 3).collect();
	let chords: Vec<(usize, usize)> = (0..201).map(|i| (i * 13 + 1, i * 29 + 5)).collect();
	let (graph, root) = tree_graph(&parents, &chords);
	assert_eq!(graph.nodes.len(), 200);
	assert_eq!(graph.edges.len(), 400);

	let config = LayoutConfig::default();
	let budget = config.time_budget().unwrap();
	let mut engine = LayoutEngine::seeded(config, 3);
	let layout = engine.compute(&graph.node_order(), &graph.edges, &root);

	assert_eq!(layout.len(), 200);
	// The budget is checked between iterations, so at most one iteration
	// (a few ms even unoptimized) runs past it.
	assert!(
		layout.stats.elapsed < budget + Duration::from_millis(50),
		"layout took {:?} for {} iterations",
		layout.stats.elapsed,
		layout.stats.iterations
	);
	assert!(layout.stats.iterations <= 300);
}

// ═════════════════════════════════════════════════════════════════════════
// 8. Recording gate
// ═════════════════════════════════════════════════════════════════════════

proptest! {
	#[test]
	fn visits_only_count_while_recording(
		before in prop::collection::vec((0..NODE_TYPES.len(), 0u8..8), 0..10),
		during in prop::collection::vec((0..NODE_TYPES.len(), 0u8..8), 0..10),
	) {
		let node = |(t, id): (usize, u8)| NodeData::new(NODE_TYPES[t], id.to_string(), "n");
		let mut state = JourneyState::new();
		state.begin("r", center());

		for entry in &before {
			state.visit_node(&node(*entry));
		}
		prop_assert!(state.visited().is_empty());
		prop_assert!(state.tracks().is_empty());

		state.start();
		for entry in &during {
			state.visit_node(&node(*entry));
		}
		prop_assert_eq!(state.visited().len(), during.len() + 1);

		let mut track_ids: Vec<u8> = during
			.iter()
			.filter(|(t, _)| NODE_TYPES[*t] == NodeType::Track)
			.map(|(_, id)| *id)
			.collect();
		track_ids.sort_unstable();
		track_ids.dedup();
		prop_assert_eq!(state.tracks().len(), track_ids.len());
		prop_assert!(state.tracks().iter().all(|t| t.node_type == NodeType::Track));
	}
}
