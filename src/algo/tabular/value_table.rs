use std::collections::{hash_map, HashMap};

use crate::util::argmax;

use super::Hashable;

/// Per-state action values
///
/// Rows are created lazily, initialized to zero on first mutable access, and never removed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTable<S: Hashable> {
    rows: HashMap<S, Vec<f64>>,
    n_actions: usize,
}

impl<S: Hashable> ValueTable<S> {
    pub fn new(n_actions: usize) -> Self {
        Self {
            rows: HashMap::new(),
            n_actions,
        }
    }

    pub fn n_actions(&self) -> usize {
        self.n_actions
    }

    /// Number of materialized rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the row for `state`, inserting a row of zeros if it is missing
    pub fn row_mut(&mut self, state: S) -> &mut [f64] {
        let n = self.n_actions;
        self.rows.entry(state).or_insert_with(|| vec![0.0; n])
    }

    /// Get the row for `state` without materializing it
    pub fn get(&self, state: &S) -> Option<&[f64]> {
        self.rows.get(state).map(Vec::as_slice)
    }

    /// Value of a state-action pair, zero if the state has never been visited
    ///
    /// Returns `None` if `action` is out of range.
    pub fn value(&self, state: &S, action: usize) -> Option<f64> {
        if action >= self.n_actions {
            return None;
        }
        Some(self.get(state).map_or(0.0, |row| row[action]))
    }

    /// The first action with the highest value in `state`
    pub fn greedy_action(&self, state: &S) -> usize {
        self.get(state).and_then(argmax).unwrap_or(0)
    }

    pub fn iter(&self) -> hash_map::Iter<'_, S, Vec<f64>> {
        self.rows.iter()
    }
}

impl<'a, S: Hashable> IntoIterator for &'a ValueTable<S> {
    type Item = (&'a S, &'a Vec<f64>);
    type IntoIter = hash_map::Iter<'a, S, Vec<f64>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
