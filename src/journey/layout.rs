//! Two-phase layout: BFS ring seeding, then force-directed refinement.
//!
//! Seeding places the root at the origin and every node at BFS depth `d` on a
//! circle of radius `d × ring_spacing`, starting due north and following the
//! caller's node order within a ring. Refinement is Fruchterman–Reingold with
//! an extra edge–node repulsion term, annealed by a shrinking temperature and
//! cut off by an iteration cap or wall-clock budget, whichever comes first.
//!
//! The engine works on a private position buffer and hands back a complete
//! [`Layout`]; nothing is mutated until the caller applies it. The only
//! randomness is the scatter of nodes unreachable from the root, which comes
//! from the engine's injectable `Rng`.

use std::collections::{HashMap, VecDeque};
use std::f64::consts::{FRAC_PI_2, TAU};
use std::time::Duration;

use log::{debug, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use web_time::{Instant, SystemTime, UNIX_EPOCH};

use super::config::LayoutConfig;
use super::types::{Edge, Graph, Node, NodeId, Position};

/// Default cap for [`traversal_order`].
pub const DEFAULT_TRAVERSAL_LIMIT: usize = 100;

/// Bookkeeping about one layout run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutStats {
	/// Refinement iterations actually run.
	pub iterations: usize,
	/// Wall-clock time spent in the whole run.
	pub elapsed: Duration,
	/// Nodes not reachable from the root (randomly scattered).
	pub unreachable: usize,
	/// True when the graph was too small for the force model.
	pub trivial: bool,
}

/// Result of a layout run: one position per input node id.
#[derive(Clone, Debug, Default)]
pub struct Layout {
	positions: HashMap<NodeId, Position>,
	/// How the run went.
	pub stats: LayoutStats,
}

impl Layout {
	/// Computed position of `id`, if it was laid out.
	pub fn position(&self, id: &NodeId) -> Option<Position> {
		self.positions.get(id).copied()
	}

	/// Number of positioned nodes.
	pub fn len(&self) -> usize {
		self.positions.len()
	}

	/// Whether no node was positioned.
	pub fn is_empty(&self) -> bool {
		self.positions.is_empty()
	}

	/// Copy `nodes` with their computed positions. Nodes the layout did not
	/// cover keep their previous position.
	pub fn apply(&self, nodes: &[Node]) -> Vec<Node> {
		nodes
			.iter()
			.map(|node| Node {
				position: self.position(&node.id).unwrap_or(node.position),
				..node.clone()
			})
			.collect()
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Vec2 {
	x: f64,
	y: f64,
}

impl Vec2 {
	const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

	fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	fn sub(self, o: Vec2) -> Vec2 {
		Vec2::new(self.x - o.x, self.y - o.y)
	}

	fn add(self, o: Vec2) -> Vec2 {
		Vec2::new(self.x + o.x, self.y + o.y)
	}

	fn scale(self, k: f64) -> Vec2 {
		Vec2::new(self.x * k, self.y * k)
	}

	fn dot(self, o: Vec2) -> f64 {
		self.x * o.x + self.y * o.y
	}

	fn len(self) -> f64 {
		self.dot(self).sqrt()
	}
}

/// Index-based view of the graph the simulation runs on.
struct Topology {
	ids: Vec<NodeId>,
	root: Option<usize>,
	/// Edges with both endpoints present, as index pairs.
	edges: Vec<(usize, usize)>,
	adjacency: Vec<Vec<usize>>,
}

impl Topology {
	fn new(order: &[NodeId], edges: &[Edge], root: &NodeId) -> Self {
		let mut index: HashMap<&NodeId, usize> = HashMap::with_capacity(order.len());
		let mut ids = Vec::with_capacity(order.len());
		for id in order {
			if !index.contains_key(id) {
				index.insert(id, ids.len());
				ids.push(id.clone());
			}
		}

		let mut adjacency = vec![Vec::new(); ids.len()];
		let mut resolved = Vec::with_capacity(edges.len());
		for edge in edges {
			let (Some(&s), Some(&t)) = (index.get(&edge.source), index.get(&edge.target)) else {
				debug!("layout: skipping edge {} with a missing endpoint", edge.id);
				continue;
			};
			if s == t {
				continue;
			}
			adjacency[s].push(t);
			adjacency[t].push(s);
			resolved.push((s, t));
		}

		Self {
			root: index.get(root).copied(),
			ids,
			edges: resolved,
			adjacency,
		}
	}

	/// BFS depth of every node from the root; `None` when unreachable.
	fn depths(&self) -> Vec<Option<usize>> {
		let mut depth = vec![None; self.ids.len()];
		let Some(root) = self.root else {
			return depth;
		};
		depth[root] = Some(0);
		let mut queue = VecDeque::from([root]);
		while let Some(current) = queue.pop_front() {
			let next_depth = depth[current].map(|d| d + 1);
			for &next in &self.adjacency[current] {
				if depth[next].is_none() {
					depth[next] = next_depth;
					queue.push_back(next);
				}
			}
		}
		depth
	}
}

/// Computes node positions for a journey graph.
///
/// Generic over the random source so tests can pin the scatter of
/// unreachable nodes; [`LayoutEngine::new`] seeds from the clock.
pub struct LayoutEngine<R = SmallRng> {
	config: LayoutConfig,
	rng: R,
}

impl LayoutEngine<SmallRng> {
	/// Engine whose unreachable-node scatter is seeded from the clock.
	pub fn new(config: LayoutConfig) -> Self {
		let seed = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map(|d| d.as_nanos() as u64)
			.unwrap_or_default();
		Self::seeded(config, seed)
	}

	/// Engine whose unreachable-node scatter is reproducible.
	pub fn seeded(config: LayoutConfig, seed: u64) -> Self {
		Self::with_rng(config, SmallRng::seed_from_u64(seed))
	}
}

impl Default for LayoutEngine<SmallRng> {
	fn default() -> Self {
		Self::new(LayoutConfig::default())
	}
}

impl<R: Rng> LayoutEngine<R> {
	/// Engine drawing from a caller-supplied random source.
	pub fn with_rng(config: LayoutConfig, rng: R) -> Self {
		Self { config, rng }
	}

	/// Parameters in use.
	pub fn config(&self) -> &LayoutConfig {
		&self.config
	}

	/// Lay out `graph` around `root`, returning the graph with new positions.
	pub fn layout_graph(&mut self, graph: &Graph, root: &NodeId) -> Graph {
		let layout = self.compute(&graph.node_order(), &graph.edges, root);
		Graph {
			nodes: layout.apply(&graph.nodes),
			edges: graph.edges.clone(),
		}
	}

	/// Compute positions for the nodes named in `order`.
	///
	/// `order` is the ring tie-break order: within one BFS depth, nodes are
	/// placed clockwise from north in the order they appear here. Edges with
	/// an endpoint outside `order` are ignored.
	pub fn compute(&mut self, order: &[NodeId], edges: &[Edge], root: &NodeId) -> Layout {
		let started = Instant::now();
		let topo = Topology::new(order, edges, root);
		if topo.root.is_none() && !topo.ids.is_empty() {
			warn!("layout root {} is not in the graph", root);
		}

		let mut stats = LayoutStats::default();
		let positions = if topo.ids.len() < 3 {
			stats.trivial = true;
			self.place_trivial(&topo)
		} else {
			let (mut positions, unreachable) = self.seed_rings(&topo);
			stats.unreachable = unreachable;
			stats.iterations = self.refine(&topo, &mut positions, started);
			positions
		};

		let origin = topo.root.map(|r| positions[r]).unwrap_or(Vec2::ZERO);
		let positions = topo
			.ids
			.iter()
			.zip(positions)
			.map(|(id, p)| {
				let p = p.sub(origin);
				(id.clone(), Position::new(p.x.round(), p.y.round()))
			})
			.collect();

		stats.elapsed = started.elapsed();
		debug!(
			"layout: {} nodes, {} edges, {} iterations in {:?} ({} unreachable)",
			topo.ids.len(),
			topo.edges.len(),
			stats.iterations,
			stats.elapsed,
			stats.unreachable
		);

		Layout { positions, stats }
	}

	/// Root at the origin, everything else in a row along +x.
	fn place_trivial(&self, topo: &Topology) -> Vec<Vec2> {
		let mut next = if topo.root.is_some() { 1.0 } else { 0.0 };
		(0..topo.ids.len())
			.map(|i| {
				if Some(i) == topo.root {
					Vec2::ZERO
				} else {
					let p = Vec2::new(next * self.config.trivial_spacing, 0.0);
					next += 1.0;
					p
				}
			})
			.collect()
	}

	fn seed_rings(&mut self, topo: &Topology) -> (Vec<Vec2>, usize) {
		let depths = topo.depths();
		let max_depth = depths.iter().flatten().copied().max().unwrap_or(0);

		let mut rings: Vec<Vec<usize>> = vec![Vec::new(); max_depth + 1];
		for (i, depth) in depths.iter().enumerate() {
			if let Some(d) = depth {
				rings[*d].push(i);
			}
		}

		let mut positions = vec![Vec2::ZERO; topo.ids.len()];
		for (d, ring) in rings.iter().enumerate().skip(1) {
			let radius = d as f64 * self.config.ring_spacing;
			let step = TAU / ring.len() as f64;
			for (k, &i) in ring.iter().enumerate() {
				let angle = -FRAC_PI_2 + step * k as f64;
				positions[i] = Vec2::new(radius * angle.cos(), radius * angle.sin());
			}
		}

		let half = self.config.scatter_box / 2.0;
		let mut unreachable = 0;
		for (i, depth) in depths.iter().enumerate() {
			if depth.is_none() {
				unreachable += 1;
				positions[i] = if half > 0.0 {
					Vec2::new(
						self.rng.gen_range(-half..half),
						self.rng.gen_range(-half..half),
					)
				} else {
					Vec2::ZERO
				};
			}
		}
		if unreachable > 0 {
			warn!("layout: {} node(s) unreachable from the root, scattering", unreachable);
		}

		(positions, unreachable)
	}

	/// Run the annealed force simulation in place. Returns iterations run.
	fn refine(&self, topo: &Topology, positions: &mut [Vec2], started: Instant) -> usize {
		let cfg = &self.config;
		let budget = cfg.time_budget();
		let ideal_sq = cfg.ideal_length * cfg.ideal_length;
		let n = positions.len();
		let mut disp = vec![Vec2::ZERO; n];
		let mut temperature = cfg.initial_temperature;
		let mut iterations = 0;

		while iterations < cfg.max_iterations {
			if budget.is_some_and(|b| started.elapsed() >= b) {
				break;
			}
			disp.fill(Vec2::ZERO);

			for i in 0..n {
				for j in (i + 1)..n {
					let delta = positions[i].sub(positions[j]);
					let raw = delta.len();
					let dist = raw.max(cfg.min_distance);
					// Coincident pair: no direction to push along, so split on x.
					let dir = if raw > 0.0 {
						delta.scale(1.0 / raw)
					} else {
						Vec2::new(1.0, 0.0)
					};
					let push = dir.scale(ideal_sq / dist);
					disp[i] = disp[i].add(push);
					disp[j] = disp[j].sub(push);
				}
			}

			for &(s, t) in &topo.edges {
				let delta = positions[s].sub(positions[t]);
				let dist = delta.len().max(cfg.min_distance);
				let pull = delta.scale((dist * dist / cfg.ideal_length) / dist);
				disp[s] = disp[s].sub(pull);
				disp[t] = disp[t].add(pull);
			}

			for (i, p) in positions.iter().enumerate() {
				for &(s, t) in &topo.edges {
					if i == s || i == t {
						continue;
					}
					if let Some(push) = edge_repulsion(*p, positions[s], positions[t], cfg) {
						disp[i] = disp[i].add(push);
					}
				}
			}

			for (p, d) in positions.iter_mut().zip(&disp) {
				let len = d.len();
				if len > 0.0 {
					*p = p.add(d.scale(len.min(temperature) / len));
				}
			}

			temperature *= cfg.cooling;
			iterations += 1;
		}

		iterations
	}
}

/// Push on `p` away from segment `a`–`b` when it sits within the clearance.
fn edge_repulsion(p: Vec2, a: Vec2, b: Vec2, cfg: &LayoutConfig) -> Option<Vec2> {
	let ab = b.sub(a);
	let len_sq = ab.dot(ab);
	let t = if len_sq > 0.0 {
		(p.sub(a).dot(ab) / len_sq).clamp(0.0, 1.0)
	} else {
		0.0
	};
	let nearest = a.add(ab.scale(t));
	let away = p.sub(nearest);
	let dist = away.len();
	if dist >= cfg.edge_clearance {
		return None;
	}

	let dir = if dist >= cfg.min_distance {
		away.scale(1.0 / dist)
	} else if len_sq > 0.0 {
		// On the line itself: leave along the segment normal.
		let len = len_sq.sqrt();
		Vec2::new(-ab.y / len, ab.x / len)
	} else {
		Vec2::new(1.0, 0.0)
	};
	Some(dir.scale((cfg.edge_clearance - dist) * cfg.edge_push))
}

/// Reachable node ids from `start` in stable BFS order, at most `max` of them.
///
/// Neighbours are visited in edge order, treating edges as undirected.
pub fn traversal_order(graph: &Graph, start: &NodeId, max: usize) -> Vec<NodeId> {
	let topo = Topology::new(&graph.node_order(), &graph.edges, start);
	let Some(root) = topo.root else {
		return Vec::new();
	};

	let mut seen = vec![false; topo.ids.len()];
	let mut order = Vec::new();
	let mut queue = VecDeque::from([root]);
	seen[root] = true;
	while let Some(current) = queue.pop_front() {
		if order.len() >= max {
			break;
		}
		order.push(topo.ids[current].clone());
		for &next in &topo.adjacency[current] {
			if !seen[next] {
				seen[next] = true;
				queue.push_back(next);
			}
		}
	}
	order
}
