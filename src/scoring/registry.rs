//! Criteria Set
//!
//! Explicit registry of criteria, built once at startup and handed to the
//! scoring engine. Registration order is preserved and is the order in
//! which details appear on a Score.

use crate::scoring::criterion::Criterion;
use crate::scoring::error::{ScoringError, ScoringResult};
use std::sync::Arc;

#[derive(Default, Clone)]
pub struct CriteriaSet {
    criteria: Vec<Arc<dyn Criterion>>,
}

impl std::fmt::Debug for CriteriaSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CriteriaSet")
            .field("criteria", &self.names())
            .finish()
    }
}

impl CriteriaSet {
    /// Create an empty criteria set
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a criterion
    ///
    /// Duplicate and empty names are configuration errors; callers treat
    /// them as fatal at startup.
    pub fn register(&mut self, criterion: Arc<dyn Criterion>) -> ScoringResult<()> {
        let name = criterion.name();
        if name.trim().is_empty() {
            return Err(ScoringError::UnnamedCriterion);
        }
        if self.contains(name) {
            return Err(ScoringError::DuplicateCriterion {
                name: name.to_string(),
            });
        }

        log::trace!("Registered criterion '{}'", name);
        self.criteria.push(criterion);
        Ok(())
    }

    /// Builder-style registration
    pub fn with(mut self, criterion: Arc<dyn Criterion>) -> ScoringResult<Self> {
        self.register(criterion)?;
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.criteria.iter().any(|c| c.name() == name)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Criterion>> {
        self.criteria.iter().find(|c| c.name() == name)
    }

    /// Names in registration order
    pub fn names(&self) -> Vec<String> {
        self.criteria.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Criterion>> {
        self.criteria.iter()
    }

    /// Keep only the named criteria, in their original order
    ///
    /// Every name must exist; an empty selection keeps everything.
    pub fn select(self, names: &[String]) -> ScoringResult<Self> {
        if names.is_empty() {
            return Ok(self);
        }
        if let Some(unknown) = names.iter().find(|n| !self.contains(n)) {
            return Err(ScoringError::UnknownCriterion {
                name: unknown.clone(),
            });
        }
        Ok(Self {
            criteria: self
                .criteria
                .into_iter()
                .filter(|c| names.iter().any(|n| n == c.name()))
                .collect(),
        })
    }

    pub(crate) fn as_slice(&self) -> &[Arc<dyn Criterion>] {
        &self.criteria
    }
}
