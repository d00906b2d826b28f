//! Music journey graph engine.
//!
//! Each expansion of a clicked node goes through the same pipeline:
//! - build a hub-and-spoke subgraph from the pathway provider's answer
//! - merge it into the accumulated graph (first seen wins, stable order)
//! - lay the whole graph out with BFS ring seeding plus a time-boxed
//!   force-directed refinement
//! - route every edge as a metro line with 0°/45°/90° segments
//!
//! # Example
//!
//! ```ignore
//! use journey_graph::{JourneyEngine, JourneyState, NodeData, NodeType, PathwayResponse};
//!
//! let mut state = JourneyState::new();
//! state.begin("journey-1", NodeData::new(NodeType::Artist, "miles", "Miles Davis"));
//! state.start();
//!
//! let mut engine = JourneyEngine::default();
//! let root = state.root_id().unwrap();
//! let response = PathwayResponse::from_json(&provider_reply)?;
//! let expansion = engine.expand(&mut state, &root, &response)?;
//! let frame = engine.render(&state);
//! ```

mod builder;
/// Tunable parameters.
pub mod config;
mod error;
mod expand;
mod layout;
mod merge;
mod routing;
mod state;
mod station;
mod store;
/// Line and station styling.
pub mod theme;
mod types;

pub use builder::{Pathway, PathwayResponse, Subgraph, build_subgraph};
pub use config::{JourneyConfig, LayoutConfig, RouteConfig, StationConfig};
pub use error::JourneyError;
pub use expand::{
	Expansion, JourneyEngine, PathwayProvider, PathwayRequest, PreviousNode, RenderedJourney,
	RequestContext,
};
pub use layout::{DEFAULT_TRAVERSAL_LIMIT, Layout, LayoutEngine, LayoutStats, traversal_order};
pub use merge::merge_graph;
pub use routing::{EdgeRouter, Route, RouteShape, RoutedEdge, route_graph};
pub use state::{JourneySnapshot, JourneyState, RecordingState};
pub use station::{Anchor, EdgeAnchors, Side, StationGeometry, StationSize, classify};
pub use store::{JourneyPatch, JourneyStore, MemoryStore, load_journey, save_journey};
pub use theme::{Color, DashPattern, RouteStyle, StationShape, legend};
pub use types::{
	Connection, Direction, Edge, EdgeData, EdgeId, Graph, Node, NodeData, NodeId, NodeKind,
	NodeType, PathwayType, Position,
};
