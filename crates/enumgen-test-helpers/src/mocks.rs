//! Mock implementations for testing

use enumgen_core::errors::{GenerateError, Result};
use enumgen_core::{DescriptorSource, EnumerantSet};
use std::sync::atomic::{AtomicUsize, Ordering};

/// An in-memory descriptor source that counts how often it is asked
#[derive(Debug, Default)]
pub struct MockSource {
    sets: Vec<EnumerantSet>,
    requests: AtomicUsize,
}

impl MockSource {
    pub fn new(sets: Vec<EnumerantSet>) -> Self {
        Self {
            sets,
            requests: AtomicUsize::new(0),
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl DescriptorSource for MockSource {
    fn descriptors(&self, type_name: &str) -> Result<EnumerantSet> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.sets
            .iter()
            .find(|set| set.type_name() == type_name)
            .cloned()
            .ok_or_else(|| GenerateError::UnknownType {
                type_name: type_name.to_string(),
            })
    }
}
