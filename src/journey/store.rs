//! Persistence seam.
//!
//! The engine only produces and consumes the graph, visited and tracks
//! shapes; how they are stored belongs to the host.

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use super::error::JourneyError;
use super::state::{JourneySnapshot, JourneyState};
use super::types::{Graph, NodeData};

/// Partial update written back after a journey changes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyPatch {
	/// Visit history.
	pub nodes_visited: Vec<NodeData>,
	/// Tracks visited.
	pub tracks: Vec<NodeData>,
	/// Accumulated graph.
	pub graph: Graph,
}

impl From<&JourneyState> for JourneyPatch {
	fn from(state: &JourneyState) -> Self {
		Self {
			nodes_visited: state.visited().to_vec(),
			tracks: state.tracks().to_vec(),
			graph: state.graph().clone(),
		}
	}
}

/// Key-value storage of journeys by id.
pub trait JourneyStore {
	/// Read a journey.
	fn get(&self, journey_id: &str) -> Result<JourneySnapshot, JourneyError>;

	/// Overwrite a journey's history and graph.
	fn update(&mut self, journey_id: &str, patch: JourneyPatch) -> Result<(), JourneyError>;
}

/// Load a stored journey into a fresh state.
pub fn load_journey<S: JourneyStore + ?Sized>(
	store: &S,
	journey_id: &str,
) -> Result<JourneyState, JourneyError> {
	let snapshot = store.get(journey_id)?;
	let mut state = JourneyState::new();
	state.restore(journey_id, snapshot);
	debug!(
		"journey {}: loaded {} nodes, {} edges",
		journey_id,
		state.graph().nodes.len(),
		state.graph().edges.len()
	);
	Ok(state)
}

/// Write the journey's graph and history back to the store.
pub fn save_journey<S: JourneyStore + ?Sized>(
	state: &JourneyState,
	store: &mut S,
) -> Result<(), JourneyError> {
	let journey_id = state.journey_id().ok_or(JourneyError::NoJourney)?;
	store.update(journey_id, JourneyPatch::from(state))
}

/// Store backed by a `HashMap`, for tests and offline hosts.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
	journeys: HashMap<String, JourneySnapshot>,
}

impl MemoryStore {
	/// Empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Create (or replace) a journey record.
	pub fn insert(&mut self, journey_id: impl Into<String>, snapshot: JourneySnapshot) {
		self.journeys.insert(journey_id.into(), snapshot);
	}

	/// Dump one record as JSON, in the shape other clients read.
	pub fn export_json(&self, journey_id: &str) -> Result<String, JourneyError> {
		let snapshot = self.get(journey_id)?;
		Ok(serde_json::to_string(&snapshot)?)
	}

	/// Insert a record from JSON produced by [`MemoryStore::export_json`].
	pub fn import_json(&mut self, journey_id: impl Into<String>, json: &str) -> Result<(), JourneyError> {
		let snapshot: JourneySnapshot = serde_json::from_str(json)?;
		self.insert(journey_id, snapshot);
		Ok(())
	}
}

impl JourneyStore for MemoryStore {
	fn get(&self, journey_id: &str) -> Result<JourneySnapshot, JourneyError> {
		self.journeys
			.get(journey_id)
			.cloned()
			.ok_or_else(|| JourneyError::NotFound(journey_id.to_string()))
	}

	fn update(&mut self, journey_id: &str, patch: JourneyPatch) -> Result<(), JourneyError> {
		let record = self
			.journeys
			.get_mut(journey_id)
			.ok_or_else(|| JourneyError::NotFound(journey_id.to_string()))?;
		record.visited = patch.nodes_visited;
		record.tracks = patch.tracks;
		record.graph = patch.graph;
		Ok(())
	}
}
