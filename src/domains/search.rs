//! Graph search event producers.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use serde::{Deserialize, Serialize};

use super::graph::{Graph, GraphEvent, GraphState};
use crate::trace::{Event, Recording, TraceRecorder};

pub const BFS: &[&str] = &[
    "queue = [source]; dist[source] = 0",
    "while queue is not empty:",
    "  u = queue.pop_front(); visit(u)",
    "  if u == target: break",
    "  for v in neighbours(u):",
    "    if v is not discovered:",
    "      dist[v] = dist[u] + 1; prev[v] = u; queue.push(v)",
    "reconstruct path from prev",
];

pub const DIJKSTRA: &[&str] = &[
    "dist[source] = 0; pq = [(0, source)]",
    "while pq is not empty:",
    "  (d, u) = pq.pop_min()",
    "  if u is finalized: skip stale entry",
    "  finalize(u); if u == target: break",
    "  for (v, w) in neighbours(u):",
    "    if d + w < dist[v]:",
    "      dist[v] = d + w; prev[v] = u; pq.push((dist[v], v))",
    "reconstruct path from prev",
];

/// Available graph search producers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphSearch {
    Bfs,
    Dijkstra,
}

impl GraphSearch {
    pub fn run(
        self,
        graph: &Graph,
        source: usize,
        target: Option<usize>,
    ) -> Recording<GraphEvent, GraphState> {
        match self {
            GraphSearch::Bfs => bfs(graph, source, target),
            GraphSearch::Dijkstra => dijkstra(graph, source, target),
        }
    }

    pub fn pseudocode(self) -> &'static [&'static str] {
        match self {
            GraphSearch::Bfs => BFS,
            GraphSearch::Dijkstra => DIJKSTRA,
        }
    }
}

struct Search {
    recorder: TraceRecorder<GraphEvent>,
    distance: Vec<Option<u64>>,
    previous: Vec<Option<usize>>,
}

impl Search {
    fn new(nodes: usize) -> Self {
        Self {
            recorder: TraceRecorder::new(),
            distance: vec![None; nodes],
            previous: vec![None; nodes],
        }
    }

    fn relax(&mut self, node: usize, distance: u64, via: Option<usize>, line: usize) {
        self.distance[node] = Some(distance);
        self.previous[node] = via;
        let description = match via {
            Some(via) => format!("Distance of {node} is {distance} via {via}"),
            None => format!("Distance of {node} is {distance}"),
        };
        self.recorder.record(
            Event::new(
                GraphEvent::Relax {
                    node,
                    distance,
                    via,
                },
                description,
            )
            .at_line(line)
            .with_modified([node]),
        );
    }

    fn enqueue(&mut self, node: usize, priority: Option<u64>, line: usize) {
        self.recorder.record(
            Event::new(
                GraphEvent::Enqueue { node, priority },
                format!("Add {node} to the frontier"),
            )
            .at_line(line)
            .with_active([node]),
        );
    }

    fn visit(&mut self, node: usize, line: usize) {
        self.recorder.record(
            Event::new(GraphEvent::Visit { node }, format!("Visit {node}"))
                .at_line(line)
                .with_active([node]),
        );
    }

    fn explore(&mut self, from: usize, to: usize, line: usize) {
        self.recorder.record(
            Event::new(
                GraphEvent::Explore { from, to },
                format!("Explore edge {from} -> {to}"),
            )
            .at_line(line)
            .with_active([from, to]),
        );
    }

    fn path_to(&self, source: usize, target: usize) -> Option<Vec<usize>> {
        self.distance.get(target).copied().flatten()?;
        let mut path = vec![target];
        let mut node = target;
        while node != source {
            node = self.previous[node]?;
            path.push(node);
        }
        path.reverse();
        Some(path)
    }

    /// Append the path (or no-path) result and seal the trace.
    fn finish(
        mut self,
        nodes: usize,
        source: usize,
        target: Option<usize>,
        line: usize,
    ) -> Recording<GraphEvent, GraphState> {
        if let Some(target) = target {
            match self.path_to(source, target) {
                Some(path) => {
                    let distance = self.distance[target].unwrap_or_default();
                    let description = format!("Shortest path {path:?} with distance {distance}");
                    self.recorder.record(
                        Event::new(
                            GraphEvent::PathFound {
                                path: path.clone(),
                                distance,
                            },
                            description,
                        )
                        .at_line(line)
                        .with_active(path),
                    );
                }
                None => {
                    self.recorder.record(
                        Event::new(
                            GraphEvent::NoPath { source, target },
                            format!("No path from {source} to {target}"),
                        )
                        .at_line(line),
                    );
                    return self.recorder.finish(GraphState::new(nodes));
                }
            }
        }

        self.recorder
            .record(Event::new(GraphEvent::Complete, "Search finished"));
        self.recorder.finish(GraphState::new(nodes))
    }
}

/// Breadth-first search from `source`, stopping early at `target` if given.
///
/// An out-of-range source or target yields a trace with only the terminal
/// event.
pub fn bfs(
    graph: &Graph,
    source: usize,
    target: Option<usize>,
) -> Recording<GraphEvent, GraphState> {
    let n = graph.nodes;
    let mut search = Search::new(n);
    if source >= n || target.is_some_and(|t| t >= n) {
        return search.finish(n, source, target.filter(|&t| t < n), BFS.len() - 1);
    }

    let adjacency = graph.adjacency();
    let mut discovered = vec![false; n];
    let mut queue = VecDeque::new();

    discovered[source] = true;
    search.relax(source, 0, None, 0);
    search.enqueue(source, None, 0);
    queue.push_back(source);

    while let Some(u) = queue.pop_front() {
        search.recorder.record(
            Event::new(GraphEvent::Dequeue { node: u }, format!("Take {u} from the queue"))
                .at_line(2)
                .with_active([u]),
        );
        search.visit(u, 2);
        if target == Some(u) {
            break;
        }

        let du = search.distance[u].unwrap_or_default();
        for &(v, _) in &adjacency[u] {
            search.explore(u, v, 5);
            if !discovered[v] {
                discovered[v] = true;
                search.relax(v, du + 1, Some(u), 6);
                search.enqueue(v, None, 6);
                queue.push_back(v);
            }
        }
    }

    search.finish(n, source, target, BFS.len() - 1)
}

/// Dijkstra's shortest paths with a lazy-deletion priority queue.
///
/// Improved distances push a new queue entry instead of decreasing the old
/// one. Entries whose node is already finalized are skipped when popped.
pub fn dijkstra(
    graph: &Graph,
    source: usize,
    target: Option<usize>,
) -> Recording<GraphEvent, GraphState> {
    let n = graph.nodes;
    let mut search = Search::new(n);
    if source >= n || target.is_some_and(|t| t >= n) {
        return search.finish(n, source, target.filter(|&t| t < n), DIJKSTRA.len() - 1);
    }

    let adjacency = graph.adjacency();
    let mut finalized = vec![false; n];
    let mut queue = BinaryHeap::new();

    search.relax(source, 0, None, 0);
    search.enqueue(source, Some(0), 0);
    queue.push(Reverse((0u64, source)));

    while let Some(Reverse((d, u))) = queue.pop() {
        search.recorder.record(
            Event::new(
                GraphEvent::Dequeue { node: u },
                format!("Pop {u} with distance {d}"),
            )
            .at_line(2)
            .with_active([u]),
        );
        if finalized[u] {
            search.recorder.record(
                Event::new(
                    GraphEvent::SkipStale { node: u },
                    format!("Skip stale entry for {u} (distance {d})"),
                )
                .at_line(3)
                .with_active([u]),
            );
            continue;
        }

        finalized[u] = true;
        search.visit(u, 4);
        if target == Some(u) {
            break;
        }

        for &(v, w) in &adjacency[u] {
            if finalized[v] {
                continue;
            }
            search.explore(u, v, 6);
            let candidate = d.saturating_add(w);
            if search.distance[v].is_none_or(|current| candidate < current) {
                search.relax(v, candidate, Some(u), 7);
                search.enqueue(v, Some(candidate), 7);
                queue.push(Reverse((candidate, v)));
            }
        }
    }

    search.finish(n, source, target, DIJKSTRA.len() - 1)
}
