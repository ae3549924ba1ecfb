//! Renderer-facing projections.
//!
//! Everything here is derived from a model state on demand and never stored by
//! the engine.

use std::fmt;

use serde::Serialize;

use crate::trace::{Counters, Position};

/// Visual category of a single element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mark {
    #[default]
    Idle,
    Active,
    Modified,
    Pivot,
    Sorted,
    Frontier,
    Visited,
    Path,
    Error,
}

impl Mark {
    /// Single-character glyph used by the text renderer.
    pub fn glyph(self) -> char {
        match self {
            Mark::Idle => ' ',
            Mark::Active => '*',
            Mark::Modified => '~',
            Mark::Pivot => 'p',
            Mark::Sorted => '=',
            Mark::Frontier => '?',
            Mark::Visited => '+',
            Mark::Path => '#',
            Mark::Error => '!',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub value: i64,
    pub mark: Mark,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub index: usize,
    pub value: i64,
    pub parent: Option<usize>,
    pub depth: usize,
    pub mark: Mark,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: usize,
    pub distance: Option<u64>,
    pub previous: Option<usize>,
    pub mark: Mark,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    pub from: usize,
    pub to: usize,
    pub weight: u64,
    pub on_path: bool,
}

/// Drawable shape for one state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewModel {
    /// Array as a row of bars.
    Bars { bars: Vec<Bar> },
    /// Stack cells from bottom to top.
    Stack {
        cells: Vec<Bar>,
        capacity: usize,
        error: Option<String>,
    },
    /// Binary heap laid out as a tree.
    Tree {
        nodes: Vec<TreeNode>,
        error: Option<String>,
    },
    /// Graph search progress.
    Graph {
        nodes: Vec<GraphNode>,
        edges: Vec<GraphEdge>,
        frontier: Vec<usize>,
        path: Vec<usize>,
        error: Option<String>,
    },
}

impl ViewModel {
    /// Apply transient highlight hints from the most recently applied event.
    ///
    /// Sticky categories (sorted, visited, path, error) win over hints.
    pub fn highlight(mut self, active: &[usize], modified: &[usize]) -> Self {
        fn apply(mark: &mut Mark, index: usize, active: &[usize], modified: &[usize]) {
            if !matches!(mark, Mark::Idle | Mark::Frontier | Mark::Pivot) {
                return;
            }
            if modified.contains(&index) {
                *mark = Mark::Modified;
            } else if active.contains(&index) {
                *mark = Mark::Active;
            }
        }

        match &mut self {
            ViewModel::Bars { bars } | ViewModel::Stack { cells: bars, .. } => {
                for (i, bar) in bars.iter_mut().enumerate() {
                    apply(&mut bar.mark, i, active, modified);
                }
            }
            ViewModel::Tree { nodes, .. } => {
                for node in nodes.iter_mut() {
                    apply(&mut node.mark, node.index, active, modified);
                }
            }
            ViewModel::Graph { nodes, .. } => {
                for node in nodes.iter_mut() {
                    apply(&mut node.mark, node.id, active, modified);
                }
            }
        }
        self
    }
}

impl fmt::Display for ViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewModel::Bars { bars } => {
                let cells: Vec<String> = bars
                    .iter()
                    .map(|b| format!("{}{}", b.value, b.mark.glyph()))
                    .collect();
                write!(f, "[{}]", cells.join(" ").trim_end())
            }
            ViewModel::Stack {
                cells,
                capacity,
                error,
            } => {
                let items: Vec<String> = cells
                    .iter()
                    .map(|b| format!("{}{}", b.value, b.mark.glyph()))
                    .collect();
                write!(f, "|{}> ({}/{})", items.join(" "), cells.len(), capacity)?;
                if let Some(error) = error {
                    write!(f, " !! {error}")?;
                }
                Ok(())
            }
            ViewModel::Tree { nodes, error } => {
                let mut depth = 0;
                let mut levels: Vec<Vec<String>> = vec![Vec::new()];
                for node in nodes {
                    if node.depth > depth {
                        depth = node.depth;
                        levels.push(Vec::new());
                    }
                    if let Some(level) = levels.last_mut() {
                        level.push(format!("{}{}", node.value, node.mark.glyph()));
                    }
                }
                let rendered: Vec<String> = levels.iter().map(|l| l.join(" ")).collect();
                write!(f, "{{{}}}", rendered.join(" / "))?;
                if let Some(error) = error {
                    write!(f, " !! {error}")?;
                }
                Ok(())
            }
            ViewModel::Graph {
                nodes,
                frontier,
                path,
                error,
                ..
            } => {
                let rendered: Vec<String> = nodes
                    .iter()
                    .map(|n| match n.distance {
                        Some(d) => format!("{}:{}{}", n.id, d, n.mark.glyph()),
                        None => format!("{}:-{}", n.id, n.mark.glyph()),
                    })
                    .collect();
                write!(f, "<{}> frontier={:?}", rendered.join(" "), frontier)?;
                if !path.is_empty() {
                    write!(f, " path={path:?}")?;
                }
                if let Some(error) = error {
                    write!(f, " !! {error}")?;
                }
                Ok(())
            }
        }
    }
}

/// Everything a renderer pulls for the current position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepSnapshot {
    /// Logical position (`-1` = initial state).
    pub position: Position,
    /// 1-based step counter for display (`0` = initial state).
    pub step: usize,
    /// Total number of steps including the initial state.
    pub total_steps: usize,
    /// Tag of the most recently applied event.
    pub tag: Option<&'static str>,
    pub description: String,
    pub line: Option<usize>,
    pub active: Vec<usize>,
    pub modified: Vec<usize>,
    pub counters: Counters,
    pub error: Option<String>,
    pub view: ViewModel,
}

impl fmt::Display for StepSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:>4}/{}] {:<48} {}",
            self.step,
            self.total_steps.saturating_sub(1),
            self.description,
            self.view
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars(values: &[i64]) -> ViewModel {
        ViewModel::Bars {
            bars: values
                .iter()
                .map(|&value| Bar {
                    value,
                    mark: Mark::Idle,
                })
                .collect(),
        }
    }

    #[test]
    fn test_highlight_marks_active_and_modified() {
        let view = bars(&[3, 1, 2]).highlight(&[0, 1], &[1]);
        let ViewModel::Bars { bars } = view else {
            panic!("expected bars");
        };
        assert_eq!(bars[0].mark, Mark::Active);
        assert_eq!(bars[1].mark, Mark::Modified);
        assert_eq!(bars[2].mark, Mark::Idle);
    }

    #[test]
    fn test_highlight_keeps_sorted() {
        let mut view = bars(&[1, 2]);
        if let ViewModel::Bars { bars } = &mut view {
            bars[0].mark = Mark::Sorted;
        }
        let ViewModel::Bars { bars } = view.highlight(&[0, 1], &[]) else {
            panic!("expected bars");
        };
        assert_eq!(bars[0].mark, Mark::Sorted);
        assert_eq!(bars[1].mark, Mark::Active);
    }

    #[test]
    fn test_bars_display() {
        assert_eq!(bars(&[3, 1, 2]).to_string(), "[3  1  2]");
    }
}
