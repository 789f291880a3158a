//! Balanced template rotation.
//!
//! The rotator hands out the least-used template each time, breaking ties at
//! random, so repeated calls spread evenly across the catalog instead of
//! clustering on a few favorites.

use crate::error::{CurationError, Result};
use crate::templates::{builtin_catalog, PromptTemplate};
use rand::prelude::*;
use std::sync::Mutex;

/// Rotates through a domain's templates, tracking per-template usage.
///
/// Usage counts live behind a mutex and each pick runs filter, minimum
/// search, random tie-break and increment under a single lock, so concurrent
/// callers never double-count or race the balance.
pub struct TemplateRotator {
    domain: String,
    templates: Vec<PromptTemplate>,
    counts: Mutex<Vec<u64>>,
}

/// Usage statistics snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotatorStats {
    pub domain: String,
    pub total_templates: usize,
    pub total_uses: u64,
    pub categories: Vec<String>,
}

impl TemplateRotator {
    /// Create a rotator over an explicit catalog
    pub fn new(domain: impl Into<String>, templates: Vec<PromptTemplate>) -> Result<Self> {
        let domain = domain.into();
        if templates.is_empty() {
            return Err(CurationError::EmptyCatalog(domain));
        }
        let counts = Mutex::new(vec![0; templates.len()]);
        Ok(Self {
            domain,
            templates,
            counts,
        })
    }

    /// Create a rotator over the built-in catalog for a domain
    pub fn from_builtin(domain: &str) -> Result<Self> {
        Self::new(domain, builtin_catalog(domain))
    }

    /// Get the domain this rotator serves
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Pick the least-used template across the whole catalog
    #[must_use]
    pub fn next(&self) -> PromptTemplate {
        self.pick(None)
    }

    /// Pick the least-used template within a category.
    ///
    /// A category with no templates falls back to the full catalog rather
    /// than failing, matching the lenient catalog-loading behavior.
    #[must_use]
    pub fn next_in_category(&self, category: &str) -> PromptTemplate {
        self.pick(Some(category))
    }

    fn pick(&self, category: Option<&str>) -> PromptTemplate {
        let mut counts = self
            .counts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut candidates: Vec<usize> = match category {
            Some(category) => (0..self.templates.len())
                .filter(|&i| self.templates[i].category == category)
                .collect(),
            None => (0..self.templates.len()).collect(),
        };
        if candidates.is_empty() {
            log::debug!(
                "No {:?} templates in domain {}, using full catalog",
                category,
                self.domain
            );
            candidates = (0..self.templates.len()).collect();
        }

        let min_usage = candidates
            .iter()
            .map(|&i| counts[i])
            .min()
            .unwrap_or_default();
        let least_used: Vec<usize> = candidates
            .into_iter()
            .filter(|&i| counts[i] == min_usage)
            .collect();

        let mut rng = rand::rng();
        let idx = least_used.choose(&mut rng).copied().unwrap_or_default();

        counts[idx] += 1;
        self.templates[idx].clone()
    }

    /// Reset all usage counts to zero
    pub fn reset(&self) {
        let mut counts = self
            .counts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        counts.fill(0);
    }

    /// Snapshot usage statistics
    #[must_use]
    pub fn stats(&self) -> RotatorStats {
        let counts = self
            .counts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut categories: Vec<String> = self
            .templates
            .iter()
            .map(|t| t.category.clone())
            .collect();
        categories.sort();
        categories.dedup();

        RotatorStats {
            domain: self.domain.clone(),
            total_templates: self.templates.len(),
            total_uses: counts.iter().sum(),
            categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn catalog() -> Vec<PromptTemplate> {
        vec![
            PromptTemplate::new("a {x}", "tone", "asm"),
            PromptTemplate::new("b {x}", "tone", "asm"),
            PromptTemplate::new("c {x}", "context", "asm"),
            PromptTemplate::new("d {x}", "context", "asm"),
        ]
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let result = TemplateRotator::new("asm", Vec::new());
        assert!(matches!(result, Err(CurationError::EmptyCatalog(_))));
    }

    #[test]
    fn first_pass_visits_every_template_once() {
        let rotator = TemplateRotator::new("asm", catalog()).expect("rotator");
        let picked: HashSet<String> = (0..4).map(|_| rotator.next().text).collect();
        assert_eq!(picked.len(), 4);
    }

    #[test]
    fn usage_stays_balanced_over_many_picks() {
        let rotator = TemplateRotator::new("asm", catalog()).expect("rotator");
        let mut per_template: std::collections::HashMap<String, u64> =
            std::collections::HashMap::new();
        for _ in 0..103 {
            *per_template.entry(rotator.next().text).or_default() += 1;
        }

        let max = per_template.values().max().copied().unwrap_or_default();
        let min = per_template.values().min().copied().unwrap_or_default();
        assert!(max - min <= 1, "unbalanced rotation: min {min}, max {max}");
        assert_eq!(rotator.stats().total_uses, 103);
    }

    #[test]
    fn category_filter_limits_the_pool() {
        let rotator = TemplateRotator::new("asm", catalog()).expect("rotator");
        for _ in 0..6 {
            let template = rotator.next_in_category("tone");
            assert_eq!(template.category, "tone");
        }
    }

    #[test]
    fn unknown_category_falls_back_to_full_catalog() {
        let rotator = TemplateRotator::new("asm", catalog()).expect("rotator");
        let picked: HashSet<String> =
            (0..4).map(|_| rotator.next_in_category("missing").text).collect();
        assert_eq!(picked.len(), 4);
    }

    #[test]
    fn reset_clears_usage() {
        let rotator = TemplateRotator::new("asm", catalog()).expect("rotator");
        let _ = rotator.next();
        let _ = rotator.next();
        assert_eq!(rotator.stats().total_uses, 2);

        rotator.reset();
        assert_eq!(rotator.stats().total_uses, 0);
    }

    #[test]
    fn stats_report_distinct_categories() {
        let rotator = TemplateRotator::new("asm", catalog()).expect("rotator");
        let stats = rotator.stats();
        assert_eq!(stats.domain, "asm");
        assert_eq!(stats.total_templates, 4);
        assert_eq!(stats.categories, vec!["context", "tone"]);
    }

    #[test]
    fn picks_are_safe_across_threads() {
        let rotator = std::sync::Arc::new(TemplateRotator::from_builtin("asm").expect("rotator"));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let rotator = rotator.clone();
                std::thread::spawn(move || {
                    for _ in 0..9 {
                        let _ = rotator.next();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread");
        }

        assert_eq!(rotator.stats().total_uses, 36);
    }
}
