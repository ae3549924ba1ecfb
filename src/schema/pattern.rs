//! Input patterns for generating arrays to sort.

use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// Predefined array patterns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArrayPattern {
    /// Explicit values.
    Custom { values: Vec<i64> },
    /// Uniform random values in `1..=max`.
    Random {
        len: usize,
        #[serde(default = "default_max")]
        max: i64,
        /// Random seed.
        seed: u64,
    },
    /// `len, len - 1, ..., 1`.
    Reversed { len: usize },
    /// `1..=len` with `swaps` random adjacent transpositions.
    NearlySorted { len: usize, swaps: usize, seed: u64 },
}

fn default_max() -> i64 {
    100
}

impl Default for ArrayPattern {
    fn default() -> Self {
        ArrayPattern::Random {
            len: 16,
            max: default_max(),
            seed: 42,
        }
    }
}

impl ArrayPattern {
    /// Generate the array. Deterministic for a given pattern.
    pub fn generate(&self) -> Vec<i64> {
        match self {
            ArrayPattern::Custom { values } => values.clone(),
            ArrayPattern::Random { len, max, seed } => {
                let mut rng = StdRng::seed_from_u64(*seed);
                let max = (*max).max(1);
                (0..*len).map(|_| rng.gen_range(1..=max)).collect()
            }
            ArrayPattern::Reversed { len } => (1..=*len as i64).rev().collect(),
            ArrayPattern::NearlySorted { len, swaps, seed } => {
                let mut values: Vec<i64> = (1..=*len as i64).collect();
                if *len >= 2 {
                    let mut rng = StdRng::seed_from_u64(*seed);
                    for _ in 0..*swaps {
                        let i = rng.gen_range(0..*len - 1);
                        values.swap(i, i + 1);
                    }
                }
                values
            }
        }
    }

    /// Number of elements the pattern produces.
    pub fn len(&self) -> usize {
        match self {
            ArrayPattern::Custom { values } => values.len(),
            ArrayPattern::Random { len, .. }
            | ArrayPattern::Reversed { len }
            | ArrayPattern::NearlySorted { len, .. } => *len,
        }
    }

    /// True if the pattern produces no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_is_deterministic() {
        let pattern = ArrayPattern::Random {
            len: 20,
            max: 50,
            seed: 7,
        };
        let a = pattern.generate();
        assert_eq!(a, pattern.generate());
        assert_eq!(a.len(), 20);
        assert!(a.iter().all(|&v| (1..=50).contains(&v)));
    }

    #[test]
    fn test_reversed() {
        assert_eq!(ArrayPattern::Reversed { len: 4 }.generate(), vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_nearly_sorted_is_permutation() {
        let pattern = ArrayPattern::NearlySorted {
            len: 10,
            swaps: 3,
            seed: 1,
        };
        let mut values = pattern.generate();
        values.sort();
        assert_eq!(values, (1..=10).collect::<Vec<i64>>());
    }

    #[test]
    fn test_pattern_serde() {
        let pattern: ArrayPattern =
            serde_json::from_str(r#"{"type":"random","len":3,"seed":9}"#).unwrap();
        assert_eq!(pattern.len(), 3);
        assert!(matches!(pattern, ArrayPattern::Random { max: 100, .. }));
    }
}
