//! Run analysis and validity strategy selection.

use crate::errors::{GenerateError, Result};
use crate::value::{Enumerant, EnumerantSet, Value};
use tracing::debug;

/// Largest run count still emitted as a range match. Beyond this the
/// validity check falls back to a set lookup.
pub const MAX_MULTI_RUNS: usize = 10;

/// A maximal block of enumerants whose values are consecutive integers,
/// ascending. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run<'a> {
    members: Vec<&'a Enumerant>,
}

impl<'a> Run<'a> {
    fn start(first: &'a Enumerant) -> Self {
        Self {
            members: vec![first],
        }
    }

    pub fn first(&self) -> &'a Enumerant {
        self.members[0]
    }

    pub fn last(&self) -> &'a Enumerant {
        self.members[self.members.len() - 1]
    }

    pub fn lo(&self) -> Value {
        self.first().value()
    }

    pub fn hi(&self) -> Value {
        self.last().value()
    }

    /// Number of distinct values covered. Aliases count once.
    pub fn len(&self) -> usize {
        1 + self
            .members
            .windows(2)
            .filter(|pair| pair[0].value() != pair[1].value())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// True when the run covers one value, however many constants share it.
    pub fn is_singleton(&self) -> bool {
        self.lo() == self.hi()
    }

    pub fn members(&self) -> &[&'a Enumerant] {
        &self.members
    }
}

/// Splits the set into maximal runs of consecutive values.
///
/// Enumerants are stable-sorted by value first, so aliases sharing a value
/// keep their extraction order. An alias joins the run holding its value,
/// so adjacent runs are always separated by a gap of more than one.
pub fn compute_runs(set: &EnumerantSet) -> Result<Vec<Run<'_>>> {
    if set.is_empty() {
        return Err(GenerateError::NoValues {
            type_name: set.type_name().to_string(),
        });
    }

    let mut sorted: Vec<&Enumerant> = set.iter().collect();
    sorted.sort_by_key(|e| e.value());

    let mut runs: Vec<Run<'_>> = Vec::new();
    for enumerant in sorted {
        let value = enumerant.value();
        match runs.last_mut() {
            Some(run) if value == run.hi() || value.follows(run.hi()) => run.members.push(enumerant),
            _ => runs.push(Run::start(enumerant)),
        }
    }

    debug!(
        type_name = set.type_name(),
        values = set.len(),
        runs = runs.len(),
        "computed runs"
    );
    Ok(runs)
}

/// Shape of the generated validity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// One contiguous block: a single bound comparison.
    SingleRun,
    /// A handful of blocks: one match arm per run.
    MultiRun,
    /// Too sparse for arms: membership in a set built once.
    SparseMap,
}

/// Picks the validity strategy from the run count alone.
pub fn select_strategy(runs: &[Run<'_>]) -> Strategy {
    match runs.len() {
        0 | 1 => Strategy::SingleRun,
        n if n <= MAX_MULTI_RUNS => Strategy::MultiRun,
        _ => Strategy::SparseMap,
    }
}
