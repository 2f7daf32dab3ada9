use regex::{Regex, RegexBuilder};

use super::category::CategoryResolver;
use super::{FilterConfig, FilterError};
use crate::catalog::RelatedObjectGraph;
use crate::models::CatalogItem;

/// What to do with one catalog item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterDecision {
    Sync,
    SkipUnmatched(String),
    SkipProtected(String),
}

impl FilterDecision {
    pub fn reason(&self) -> Option<&str> {
        match self {
            FilterDecision::Sync => None,
            FilterDecision::SkipUnmatched(reason) | FilterDecision::SkipProtected(reason) => {
                Some(reason)
            }
        }
    }
}

/// Decides which catalog items are synced.
///
/// Protection is checked before any inclusion rule, so a protected item is
/// skipped even when its name matches an allowed pattern.
#[derive(Debug, Clone)]
pub struct ProductFilter {
    config: FilterConfig,
    name_patterns: Vec<Regex>,
}

impl ProductFilter {
    /// Compiles the name patterns of `config`.
    pub fn new(config: FilterConfig) -> Result<Self, FilterError> {
        let name_patterns = config
            .allowed_product_name_patterns
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| FilterError::InvalidPattern {
                        pattern: pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            config,
            name_patterns,
        })
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn resolver<'a>(&'a self, graph: &'a RelatedObjectGraph) -> CategoryResolver<'a> {
        CategoryResolver::new(graph, &self.config)
    }

    pub fn name_matches(&self, name: &str) -> bool {
        self.name_patterns.iter().any(|re| re.is_match(name))
    }

    pub fn decide(&self, item: &CatalogItem, graph: &RelatedObjectGraph) -> FilterDecision {
        let resolver = self.resolver(graph);
        let resolutions: Vec<_> = item
            .category_ids()
            .into_iter()
            .map(|id| resolver.resolve(id))
            .collect();

        if let Some(protected) = resolutions.iter().find(|r| r.protected) {
            return FilterDecision::SkipProtected(format!(
                "Protected category: {}",
                protected.name.unwrap_or(protected.id)
            ));
        }

        if self.name_matches(&item.name) {
            return FilterDecision::Sync;
        }

        if resolutions.iter().any(|r| r.matches_allowed) {
            return FilterDecision::Sync;
        }

        FilterDecision::SkipUnmatched("No matching name pattern or category".to_string())
    }

    /// Name of the category an accepted item is filed under: the first
    /// referenced category matching the inclusion rules, else the first one
    /// that resolves at all.
    pub fn primary_category<'a>(
        &'a self,
        item: &'a CatalogItem,
        graph: &'a RelatedObjectGraph,
    ) -> Option<(&'a str, &'a str)> {
        let resolver = self.resolver(graph);
        let mut fallback = None;
        for id in item.category_ids() {
            let resolution = resolver.resolve(id);
            if let Some(name) = resolution.name {
                if resolution.matches_allowed {
                    return Some((id, name));
                }
                fallback.get_or_insert((id, name));
            }
        }
        fallback
    }
}
