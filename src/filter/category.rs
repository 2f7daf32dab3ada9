//! Category name matching and protection rules.
//!
//! Protection is two predicates combined with OR: a fixed reserved-prefix
//! rule that no configuration can disable, and the configurable
//! `protected_categories` list.

use super::FilterConfig;
use crate::catalog::RelatedObjectGraph;

/// Categories whose names start with this token are always protected.
pub const RESERVED_PREFIX: &str = "CATERING";

/// Case-insensitive containment in either direction.
///
/// "Alfajores" matches "ALFAJORES - Classic" and vice versa. Empty names
/// never match.
pub fn names_overlap(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(&b) || b.contains(&a)
}

pub fn is_hard_protected(name: &str) -> bool {
    name.trim()
        .to_uppercase()
        .starts_with(RESERVED_PREFIX)
}

pub fn is_config_protected(name: &str, config: &FilterConfig) -> bool {
    config
        .protected_categories
        .iter()
        .any(|protected| names_overlap(name, protected))
}

pub fn is_protected(name: &str, config: &FilterConfig) -> bool {
    is_hard_protected(name) || is_config_protected(name, config)
}

/// Outcome of resolving one category id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryResolution<'g> {
    pub id: &'g str,
    /// `None` when the id is not in the graph.
    pub name: Option<&'g str>,
    pub matches_allowed: bool,
    pub protected: bool,
}

pub struct CategoryResolver<'a> {
    graph: &'a RelatedObjectGraph,
    config: &'a FilterConfig,
}

impl<'a> CategoryResolver<'a> {
    pub fn new(graph: &'a RelatedObjectGraph, config: &'a FilterConfig) -> Self {
        Self { graph, config }
    }

    pub fn resolve<'g>(&self, id: &'g str) -> CategoryResolution<'g>
    where
        'a: 'g,
    {
        let Some(name) = self.graph.category_name(id) else {
            return CategoryResolution {
                id,
                name: None,
                matches_allowed: false,
                protected: false,
            };
        };

        let matches_allowed = self
            .config
            .active_categories()
            .iter()
            .any(|allowed| names_overlap(name, allowed));

        CategoryResolution {
            id,
            name: Some(name),
            matches_allowed,
            protected: is_protected(name, self.config),
        }
    }
}
