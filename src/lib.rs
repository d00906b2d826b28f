//! journey-graph: graph construction, incremental merging, force-directed
//! layout and metro-style edge routing for music exploration journeys.
//!
//! The crate draws nothing and owns no I/O. The host supplies a pathway
//! provider and a journey store, and renders the positioned nodes and routed
//! lines it gets back.

#[cfg(feature = "console")]
use log::{Level, info};

/// Journey graph engine.
pub mod journey;

// Only the integration tests drive proptest.
#[cfg(test)]
use proptest as _;

pub use journey::{
	Edge, EdgeId, Expansion, Graph, JourneyConfig, JourneyEngine, JourneyError, JourneySnapshot,
	JourneyState, JourneyStore, LayoutEngine, MemoryStore, Node, NodeData, NodeId, NodeType,
	PathwayProvider, PathwayRequest, PathwayResponse, PathwayType, Position, RenderedJourney,
};

/// Initialize logging and panic hooks for browser hosts.
#[cfg(feature = "console")]
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("journey-graph: logging initialized");
}
