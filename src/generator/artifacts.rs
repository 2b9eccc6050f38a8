use std::collections::BTreeMap;

use super::emitter::{EmittedFile, EmitterKind};
use crate::error::{GenerationError, Result};

/// Every file of a run, keyed by relative path.
///
/// Paths are unique: a second file for an existing path is rejected with
/// [`GenerationError::PathCollision`] instead of replacing the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedArtifactSet {
    files: BTreeMap<String, EmittedFile>,
}

impl GeneratedArtifactSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file: EmittedFile) -> Result<()> {
        if let Some(existing) = self.files.get(&file.path) {
            return Err(GenerationError::PathCollision {
                path: file.path,
                first: existing.emitter,
                second: file.emitter,
            });
        }
        self.files.insert(file.path.clone(), file);
        Ok(())
    }

    pub fn extend(&mut self, files: impl IntoIterator<Item = EmittedFile>) -> Result<()> {
        for file in files {
            self.insert(file)?;
        }
        Ok(())
    }

    pub fn get(&self, path: &str) -> Option<&EmittedFile> {
        self.files.get(path)
    }

    /// Files in path order.
    pub fn iter(&self) -> impl Iterator<Item = &EmittedFile> {
        self.files.values()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of files per emitter.
    pub fn counts(&self) -> BTreeMap<EmitterKind, usize> {
        let mut counts = BTreeMap::new();
        for file in self.files.values() {
            *counts.entry(file.emitter).or_insert(0) += 1;
        }
        counts
    }
}
