//! Visualizer registry: names to producer + domain pairs.
//!
//! The registry is an explicit value owned by the host. Opening a scenario
//! runs the producer eagerly, loads the recording into a fresh [`Player`] and
//! hands back the type-erased [`Playback`] handle.

use std::collections::BTreeMap;
use std::rc::Rc;

use log::info;

use crate::domains::search::GraphSearch;
use crate::domains::sorting::SortAlgorithm;
use crate::domains::{ArrayDomain, GraphDomain, HeapDomain, StackDomain, heap, stack};
use crate::playback::{Clock, Playback, Player};
use crate::schema::{PlaybackConfig, Scenario, ScenarioError, ScenarioInput};
use crate::trace::{Domain, Recording};

/// Builds a loaded player for a validated scenario.
pub type BuildFn = fn(&Scenario, Box<dyn Clock>) -> Result<Box<dyn Playback>, ScenarioError>;

/// One registered visualizer.
#[derive(Clone)]
pub struct VisualizerEntry {
    pub name: &'static str,
    pub summary: &'static str,
    /// Expected [`ScenarioInput`] kind.
    pub input: &'static str,
    pub pseudocode: &'static [&'static str],
    build: BuildFn,
}

impl VisualizerEntry {
    pub fn new(
        name: &'static str,
        summary: &'static str,
        input: &'static str,
        pseudocode: &'static [&'static str],
        build: BuildFn,
    ) -> Self {
        Self {
            name,
            summary,
            input,
            pseudocode,
            build,
        }
    }
}

impl std::fmt::Debug for VisualizerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisualizerEntry")
            .field("name", &self.name)
            .field("input", &self.input)
            .finish_non_exhaustive()
    }
}

/// Name-keyed visualizer table.
#[derive(Debug, Default)]
pub struct VisualizerRegistry {
    entries: BTreeMap<&'static str, VisualizerEntry>,
}

impl VisualizerRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in visualizer.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        let builtin = [
            VisualizerEntry::new(
                "bubble-sort",
                "Repeatedly swap adjacent out-of-order pairs",
                "array",
                SortAlgorithm::Bubble.pseudocode(),
                |s, c| open_sort(SortAlgorithm::Bubble, s, c),
            ),
            VisualizerEntry::new(
                "insertion-sort",
                "Shift each element left into the sorted prefix",
                "array",
                SortAlgorithm::Insertion.pseudocode(),
                |s, c| open_sort(SortAlgorithm::Insertion, s, c),
            ),
            VisualizerEntry::new(
                "selection-sort",
                "Select the minimum of the unsorted suffix",
                "array",
                SortAlgorithm::Selection.pseudocode(),
                |s, c| open_sort(SortAlgorithm::Selection, s, c),
            ),
            VisualizerEntry::new(
                "quick-sort",
                "Lomuto partitioning around the last element",
                "array",
                SortAlgorithm::Quick.pseudocode(),
                |s, c| open_sort(SortAlgorithm::Quick, s, c),
            ),
            VisualizerEntry::new(
                "stack",
                "Bounded LIFO stack operations",
                "stack",
                stack::STACK_OPERATIONS,
                open_stack,
            ),
            VisualizerEntry::new(
                "min-heap",
                "Binary min-heap insert and extract-min",
                "heap",
                heap::HEAP_OPERATIONS,
                open_heap,
            ),
            VisualizerEntry::new(
                "bfs",
                "Breadth-first search with shortest hop path",
                "graph",
                GraphSearch::Bfs.pseudocode(),
                |s, c| open_search(GraphSearch::Bfs, s, c),
            ),
            VisualizerEntry::new(
                "dijkstra",
                "Shortest weighted path with a lazy priority queue",
                "graph",
                GraphSearch::Dijkstra.pseudocode(),
                |s, c| open_search(GraphSearch::Dijkstra, s, c),
            ),
        ];
        for entry in builtin {
            registry.register(entry);
        }
        registry
    }

    /// Add or replace an entry. Returns the replaced entry, if any.
    pub fn register(&mut self, entry: VisualizerEntry) -> Option<VisualizerEntry> {
        self.entries.insert(entry.name, entry)
    }

    pub fn get(&self, name: &str) -> Option<&VisualizerEntry> {
        self.entries.get(name)
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = &VisualizerEntry> {
        self.entries.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validate `scenario`, run its producer and return a loaded, paused player.
    pub fn open(
        &self,
        scenario: &Scenario,
        clock: Box<dyn Clock>,
    ) -> Result<Box<dyn Playback>, ScenarioError> {
        scenario.validate()?;
        let entry = self
            .get(&scenario.visualizer)
            .ok_or_else(|| ScenarioError::UnknownVisualizer(scenario.visualizer.clone()))?;
        if entry.input != scenario.input.kind() {
            return Err(mismatch(scenario, entry.input));
        }

        let player = (entry.build)(scenario, clock)?;
        info!(
            "Opened '{}' with {} steps",
            entry.name,
            player.total_steps()
        );
        Ok(player)
    }
}

fn mismatch(scenario: &Scenario, expected: &'static str) -> ScenarioError {
    ScenarioError::InputMismatch {
        visualizer: scenario.visualizer.clone(),
        expected,
        actual: scenario.input.kind(),
    }
}

fn load<D>(
    domain: D,
    recording: Recording<D::Kind, D::State>,
    config: &PlaybackConfig,
    clock: Box<dyn Clock>,
) -> Box<dyn Playback>
where
    D: Domain + 'static,
    D::Kind: 'static,
    D::State: 'static,
{
    let mut player = Player::new(domain, config, clock);
    player.load(recording);
    Box::new(player)
}

fn open_sort(
    algorithm: SortAlgorithm,
    scenario: &Scenario,
    clock: Box<dyn Clock>,
) -> Result<Box<dyn Playback>, ScenarioError> {
    let ScenarioInput::Array { pattern } = &scenario.input else {
        return Err(mismatch(scenario, "array"));
    };
    let values = pattern.generate();
    Ok(load(
        ArrayDomain,
        algorithm.run(&values),
        &scenario.playback,
        clock,
    ))
}

fn open_stack(
    scenario: &Scenario,
    clock: Box<dyn Clock>,
) -> Result<Box<dyn Playback>, ScenarioError> {
    let ScenarioInput::Stack { capacity, ops } = &scenario.input else {
        return Err(mismatch(scenario, "stack"));
    };
    Ok(load(
        StackDomain,
        stack::run_operations(*capacity, ops),
        &scenario.playback,
        clock,
    ))
}

fn open_heap(
    scenario: &Scenario,
    clock: Box<dyn Clock>,
) -> Result<Box<dyn Playback>, ScenarioError> {
    let ScenarioInput::Heap { ops } = &scenario.input else {
        return Err(mismatch(scenario, "heap"));
    };
    Ok(load(
        HeapDomain,
        heap::run_operations(ops),
        &scenario.playback,
        clock,
    ))
}

fn open_search(
    search: GraphSearch,
    scenario: &Scenario,
    clock: Box<dyn Clock>,
) -> Result<Box<dyn Playback>, ScenarioError> {
    let ScenarioInput::Graph {
        graph,
        source,
        target,
    } = &scenario.input
    else {
        return Err(mismatch(scenario, "graph"));
    };
    let recording = search.run(graph, *source, *target);
    let domain = GraphDomain::new(Rc::new(graph.clone()));
    Ok(load(domain, recording, &scenario.playback, clock))
}
