//! Journey state: origin, accumulated graph and the recorded visit history.
//!
//! Owned by the caller and passed into the pipeline by reference; there is
//! no global store. Transitions are synchronous and only touch this struct.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::types::{Graph, NodeData, NodeId, NodeType};

/// Recording lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RecordingState {
	/// Nothing recorded yet.
	#[default]
	Idle,
	/// Visits are being appended to the history.
	Recording,
	/// Recording ended; history is kept.
	Stopped,
}

/// The persisted part of a journey.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneySnapshot {
	/// Journey origin.
	pub center: Option<NodeData>,
	/// Accumulated graph.
	#[serde(default)]
	pub graph: Graph,
	/// Visit history.
	#[serde(default)]
	pub visited: Vec<NodeData>,
	/// Tracks visited, once each.
	#[serde(default)]
	pub tracks: Vec<NodeData>,
}

/// One exploration session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JourneyState {
	journey_id: Option<String>,
	center: Option<NodeData>,
	graph: Graph,
	visited: Vec<NodeData>,
	tracks: Vec<NodeData>,
	recording: RecordingState,
}

impl JourneyState {
	/// Idle state with no journey.
	pub fn new() -> Self {
		Self::default()
	}

	/// Start a brand-new journey from `center`: clears everything and seeds the
	/// graph with the single center node.
	pub fn begin(&mut self, journey_id: impl Into<String>, center: NodeData) {
		self.reset();
		let journey_id = journey_id.into();
		info!("journey {}: starting at {} {}", journey_id, center.node_type, center.node_id);
		self.graph = Graph::seeded(&center);
		self.center = Some(center);
		self.journey_id = Some(journey_id);
	}

	/// Restore a stored journey. An empty stored graph is reseeded with the
	/// center node so the journey is usable.
	pub fn restore(&mut self, journey_id: impl Into<String>, snapshot: JourneySnapshot) {
		self.reset();
		self.journey_id = Some(journey_id.into());
		self.graph = match (&snapshot.center, snapshot.graph.is_empty()) {
			(Some(center), true) => Graph::seeded(center),
			_ => snapshot.graph,
		};
		self.center = snapshot.center;
		self.visited = snapshot.visited;
		self.tracks = snapshot.tracks;
	}

	/// Begin recording. The history restarts at the center node, also when
	/// recording was already on.
	pub fn start(&mut self) {
		self.recording = RecordingState::Recording;
		self.visited = self.center.iter().cloned().collect();
	}

	/// Record a visit. Ignored unless recording.
	///
	/// Every visit is appended to `visited`; tracks are additionally kept in
	/// `tracks`, once per `node_id`.
	pub fn visit_node(&mut self, data: &NodeData) {
		if !self.is_recording() {
			debug!("not recording, ignoring visit to {}", data.node_id);
			return;
		}
		self.visited.push(data.clone());
		if data.node_type == NodeType::Track && !self.tracks.iter().any(|t| t.node_id == data.node_id) {
			self.tracks.push(data.clone());
		}
	}

	/// End recording, keeping the history.
	pub fn stop(&mut self) {
		if self.recording == RecordingState::Recording {
			self.recording = RecordingState::Stopped;
		}
	}

	/// Back to the initial, empty state.
	pub fn reset(&mut self) {
		*self = Self::default();
	}

	/// Whether visits are being recorded.
	pub fn is_recording(&self) -> bool {
		self.recording == RecordingState::Recording
	}

	/// Current recording lifecycle state.
	pub fn recording(&self) -> RecordingState {
		self.recording
	}

	/// Id of the loaded journey.
	pub fn journey_id(&self) -> Option<&str> {
		self.journey_id.as_deref()
	}

	/// Journey origin, if a journey is loaded.
	pub fn center(&self) -> Option<&NodeData> {
		self.center.as_ref()
	}

	/// Id of the journey's origin node, the layout root.
	pub fn root_id(&self) -> Option<NodeId> {
		self.center.as_ref().map(NodeId::center)
	}

	/// The accumulated graph.
	pub fn graph(&self) -> &Graph {
		&self.graph
	}

	/// Replace the accumulated graph, e.g. after a relayout.
	pub fn set_graph(&mut self, graph: Graph) {
		self.graph = graph;
	}

	/// Visit history, oldest first.
	pub fn visited(&self) -> &[NodeData] {
		&self.visited
	}

	/// Tracks visited, once each, in first-visit order.
	pub fn tracks(&self) -> &[NodeData] {
		&self.tracks
	}

	/// The most recent visit, if any.
	pub fn current(&self) -> Option<&NodeData> {
		self.visited.last()
	}

	/// Persistable copy of the journey.
	pub fn snapshot(&self) -> JourneySnapshot {
		JourneySnapshot {
			center: self.center.clone(),
			graph: self.graph.clone(),
			visited: self.visited.clone(),
			tracks: self.tracks.clone(),
		}
	}

	/// Copy of the graph with `is_visited` / `is_current` reflecting the
	/// history. Entities are matched by type and catalogue id, so both the
	/// center and expansion copies of a visited entity are marked.
	pub fn decorated_graph(&self) -> Graph {
		let current = self.current();
		let mut graph = self.graph.clone();
		for node in &mut graph.nodes {
			node.data.is_visited = self.visited.iter().any(|v| v.same_entity(&node.data));
			node.data.is_current = current.is_some_and(|c| c.same_entity(&node.data));
		}
		graph
	}
}
