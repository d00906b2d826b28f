//! Errors surfaced at the collaborator seams.
//!
//! Graph building, merging, layout and routing never fail; only the pathway
//! provider and the journey store can, and their failures are passed through
//! for the host to display.

use thiserror::Error;

/// Failures at the provider and store seams.
#[derive(Debug, Error)]
pub enum JourneyError {
	/// The pathway provider could not be reached or answered with an error.
	#[error("pathway provider failed: {0}")]
	Provider(String),
	/// The store has no journey with this id.
	#[error("journey `{0}` not found")]
	NotFound(String),
	/// The store backend failed.
	#[error("journey store failed: {0}")]
	Store(String),
	/// The clicked node is not part of the journey graph.
	#[error("node `{0}` is not in the journey graph")]
	UnknownNode(String),
	/// No journey has been started or restored.
	#[error("no journey has been started")]
	NoJourney,
	/// A stored or provided document is not valid JSON.
	#[error("invalid journey JSON: {0}")]
	Json(#[from] serde_json::Error),
}
