//! Idempotent union of an expansion into the accumulated graph.

use std::collections::HashSet;

use log::debug;

use super::types::{Edge, EdgeId, Graph, Node, NodeId};

/// Merge `new_nodes`/`new_edges` into `existing`.
///
/// Keyed by id, first seen wins: an existing node keeps its flags even when a
/// fresh copy arrives. Existing entries keep their order and new ids are
/// appended in the order encountered, so merging the same input twice lays
/// out identically. Center-kind nodes on the incoming side are ignored (the
/// accumulated graph already has its one center), and so are self-loops.
pub fn merge_graph(existing: &Graph, new_nodes: &[Node], new_edges: &[Edge]) -> Graph {
	let mut node_ids: HashSet<&NodeId> = existing.nodes.iter().map(|n| &n.id).collect();
	let mut nodes = existing.nodes.clone();
	for node in new_nodes {
		if node.id.is_center() {
			continue;
		}
		if node_ids.insert(&node.id) {
			nodes.push(node.clone());
		}
	}

	let mut edge_ids: HashSet<&EdgeId> = existing.edges.iter().map(|e| &e.id).collect();
	let mut edges = existing.edges.clone();
	let mut self_loops = 0usize;
	for edge in new_edges {
		if edge.source == edge.target {
			self_loops += 1;
			continue;
		}
		if edge_ids.insert(&edge.id) {
			edges.push(edge.clone());
		}
	}

	debug!(
		"merged graph: {} -> {} nodes, {} -> {} edges ({} self-loops dropped)",
		existing.nodes.len(),
		nodes.len(),
		existing.edges.len(),
		edges.len(),
		self_loops
	);

	Graph { nodes, edges }
}
