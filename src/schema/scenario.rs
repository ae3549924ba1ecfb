//! Scenario files: which visualizer to open, on what input, with which
//! playback settings.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ArrayPattern, ConfigError, PlaybackConfig};
use crate::domains::{Graph, HeapOp, StackOp};

/// Producer input, tagged by shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioInput {
    Array {
        pattern: ArrayPattern,
    },
    Stack {
        capacity: usize,
        ops: Vec<StackOp>,
    },
    Heap {
        ops: Vec<HeapOp>,
    },
    Graph {
        #[serde(flatten)]
        graph: Graph,
        source: usize,
        #[serde(default)]
        target: Option<usize>,
    },
}

impl ScenarioInput {
    /// Shape name, as used in the `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            ScenarioInput::Array { .. } => "array",
            ScenarioInput::Stack { .. } => "stack",
            ScenarioInput::Heap { .. } => "heap",
            ScenarioInput::Graph { .. } => "graph",
        }
    }
}

/// Complete scenario description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Registered visualizer name (e.g. `"bubble-sort"`).
    pub visualizer: String,
    pub input: ScenarioInput,
    #[serde(default)]
    pub playback: PlaybackConfig,
}

impl Scenario {
    /// Parse and validate a scenario from JSON.
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Read, parse and validate a scenario file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check playback settings and input ranges.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        self.playback.validate()?;

        if let ScenarioInput::Graph {
            graph,
            source,
            target,
        } = &self.input
        {
            if let Some(index) = graph.invalid_edge() {
                return Err(ScenarioError::InvalidEdge {
                    index,
                    nodes: graph.nodes,
                });
            }
            for node in std::iter::once(*source).chain(*target) {
                if node >= graph.nodes {
                    return Err(ScenarioError::NodeOutOfRange {
                        node,
                        nodes: graph.nodes,
                    });
                }
            }
        }
        Ok(())
    }

    /// Example scenario printed by the CLI.
    pub fn example() -> Self {
        Self {
            visualizer: "bubble-sort".to_string(),
            input: ScenarioInput::Array {
                pattern: ArrayPattern::default(),
            },
            playback: PlaybackConfig::default(),
        }
    }
}

/// Scenario loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("Failed to read scenario: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid scenario JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Unknown visualizer '{0}'")]
    UnknownVisualizer(String),
    #[error("Visualizer '{visualizer}' expects {expected} input, got {actual}")]
    InputMismatch {
        visualizer: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("Node {node} out of range for a graph of {nodes} nodes")]
    NodeOutOfRange { node: usize, nodes: usize },
    #[error("Edge {index} references a node outside 0..{nodes}")]
    InvalidEdge { index: usize, nodes: usize },
}
