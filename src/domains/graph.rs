//! Graph search domain: events, state and reducer.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::trace::{Counters, Domain, Event, EventKind, ModelState, Reducer};
use crate::view::{GraphEdge, GraphNode, Mark, ViewModel};

/// Weighted edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    #[serde(default = "default_weight")]
    pub weight: u64,
}

fn default_weight() -> u64 {
    1
}

/// Static graph searched by the producers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: usize,
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub directed: bool,
}

impl Graph {
    /// Neighbour lists sorted by node id, so traversal order is deterministic.
    pub fn adjacency(&self) -> Vec<Vec<(usize, u64)>> {
        let mut adjacency = vec![Vec::new(); self.nodes];
        for edge in &self.edges {
            if edge.from >= self.nodes || edge.to >= self.nodes {
                continue;
            }
            adjacency[edge.from].push((edge.to, edge.weight));
            if !self.directed {
                adjacency[edge.to].push((edge.from, edge.weight));
            }
        }
        for neighbours in &mut adjacency {
            neighbours.sort_unstable();
        }
        adjacency
    }

    /// Index of the first edge with an endpoint out of range.
    pub fn invalid_edge(&self) -> Option<usize> {
        self.edges
            .iter()
            .position(|e| e.from >= self.nodes || e.to >= self.nodes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GraphEvent {
    /// Forget all search progress for a graph of `nodes` nodes.
    Initialize { nodes: usize },
    /// Add a node to the frontier (possibly a duplicate entry).
    Enqueue { node: usize, priority: Option<u64> },
    /// Take a node entry off the frontier.
    Dequeue { node: usize },
    /// The dequeued entry was superseded; its node is already finalized.
    SkipStale { node: usize },
    /// Finalize a node.
    Visit { node: usize },
    /// Look at the edge `from -> to`.
    Explore { from: usize, to: usize },
    /// Record a better distance for `node`.
    Relax {
        node: usize,
        distance: u64,
        via: Option<usize>,
    },
    PathFound { path: Vec<usize>, distance: u64 },
    NoPath { source: usize, target: usize },
    Complete,
}

impl EventKind for GraphEvent {
    fn tag(&self) -> &'static str {
        match self {
            GraphEvent::Initialize { .. } => "initialize",
            GraphEvent::Enqueue { .. } => "enqueue",
            GraphEvent::Dequeue { .. } => "dequeue",
            GraphEvent::SkipStale { .. } => "skip_stale",
            GraphEvent::Visit { .. } => "visit",
            GraphEvent::Explore { .. } => "explore",
            GraphEvent::Relax { .. } => "relax",
            GraphEvent::PathFound { .. } => "path_found",
            GraphEvent::NoPath { .. } => "no_path",
            GraphEvent::Complete => "complete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphState {
    pub visited: Vec<bool>,
    pub distance: Vec<Option<u64>>,
    pub previous: Vec<Option<usize>>,
    /// Frontier entries in insertion order; duplicates are stale entries.
    pub frontier: Vec<usize>,
    pub current: Option<usize>,
    pub path: Vec<usize>,
    pub error: Option<String>,
    pub complete: bool,
    pub counters: Counters,
}

impl GraphState {
    pub fn new(nodes: usize) -> Self {
        Self {
            visited: vec![false; nodes],
            distance: vec![None; nodes],
            previous: vec![None; nodes],
            frontier: Vec::new(),
            current: None,
            path: Vec::new(),
            error: None,
            complete: false,
            counters: Counters::default(),
        }
    }
}

impl ModelState for GraphState {
    fn counters(&self) -> Counters {
        self.counters
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Reducer for [`GraphEvent`], bound to the graph being searched.
#[derive(Debug, Clone)]
pub struct GraphDomain {
    graph: Rc<Graph>,
}

impl GraphDomain {
    pub fn new(graph: Rc<Graph>) -> Self {
        Self { graph }
    }
}

impl Reducer for GraphDomain {
    type Kind = GraphEvent;
    type State = GraphState;

    fn reduce(&self, state: &GraphState, event: &Event<GraphEvent>) -> GraphState {
        let mut next = state.clone();

        match &event.kind {
            GraphEvent::Initialize { nodes } => {
                next = GraphState {
                    counters: state.counters,
                    ..GraphState::new(*nodes)
                };
            }
            GraphEvent::Enqueue { node, .. } => {
                next.frontier.push(*node);
                next.counters.writes += 1;
            }
            GraphEvent::Dequeue { node } => {
                if let Some(at) = next.frontier.iter().position(|n| n == node) {
                    next.frontier.remove(at);
                }
                next.current = Some(*node);
                next.counters.reads += 1;
            }
            GraphEvent::SkipStale { .. } => {
                next.current = None;
                next.counters.comparisons += 1;
            }
            GraphEvent::Visit { node } => {
                if let Some(flag) = next.visited.get_mut(*node) {
                    *flag = true;
                }
                next.current = Some(*node);
            }
            GraphEvent::Explore { .. } => {
                next.counters.comparisons += 1;
                next.counters.reads += 1;
            }
            GraphEvent::Relax {
                node,
                distance,
                via,
            } => {
                if let Some(slot) = next.distance.get_mut(*node) {
                    *slot = Some(*distance);
                }
                if let Some(slot) = next.previous.get_mut(*node) {
                    *slot = *via;
                }
                next.counters.writes += 1;
            }
            GraphEvent::PathFound { path, .. } => {
                next.path = path.clone();
            }
            GraphEvent::NoPath { source, target } => {
                next.error = Some(format!("No path from {source} to {target}"));
            }
            GraphEvent::Complete => {
                next.current = None;
                next.complete = true;
            }
        }

        next
    }
}

impl Domain for GraphDomain {
    fn view(&self, state: &GraphState) -> ViewModel {
        let nodes = (0..self.graph.nodes)
            .map(|id| {
                let mark = if state.path.contains(&id) {
                    Mark::Path
                } else if state.current == Some(id) {
                    Mark::Active
                } else if state.visited.get(id).copied().unwrap_or(false) {
                    Mark::Visited
                } else if state.frontier.contains(&id) {
                    Mark::Frontier
                } else {
                    Mark::Idle
                };
                GraphNode {
                    id,
                    distance: state.distance.get(id).copied().flatten(),
                    previous: state.previous.get(id).copied().flatten(),
                    mark,
                }
            })
            .collect();

        let directed = self.graph.directed;
        let on_path = |from: usize, to: usize| {
            state.path.windows(2).any(|w| {
                let forward = w[0] == from && w[1] == to;
                let backward = w[0] == to && w[1] == from;
                forward || (!directed && backward)
            })
        };
        let edges = self
            .graph
            .edges
            .iter()
            .map(|e| GraphEdge {
                from: e.from,
                to: e.to,
                weight: e.weight,
                on_path: on_path(e.from, e.to),
            })
            .collect();

        ViewModel::Graph {
            nodes,
            edges,
            frontier: state.frontier.clone(),
            path: state.path.clone(),
            error: state.error.clone(),
        }
    }
}
