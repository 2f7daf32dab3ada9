use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Rules and knobs for one sync run. Immutable once the run starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Case-insensitive regular expressions matched against item names
    pub allowed_product_name_patterns: Vec<String>,
    /// Category names whose items are synced
    pub allowed_categories: Vec<String>,
    /// Replaces `allowed_categories` entirely when present and non-empty
    pub selected_categories: Option<Vec<String>>,
    /// Category names whose items are never touched
    pub protected_categories: Vec<String>,
    pub batch_size: usize,
    pub enable_image_sync: bool,
    pub dry_run: bool,
    /// Pause between batches, in milliseconds
    pub batch_delay_ms: u64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            allowed_product_name_patterns: vec!["alfajor".to_string(), "empanada".to_string()],
            allowed_categories: vec!["ALFAJORES".to_string(), "EMPANADAS".to_string()],
            selected_categories: None,
            protected_categories: vec!["CATERING".to_string()],
            batch_size: 50,
            enable_image_sync: true,
            dry_run: false,
            batch_delay_ms: 100,
        }
    }
}

impl FilterConfig {
    /// Category list used for inclusion.
    pub fn active_categories(&self) -> &[String] {
        match &self.selected_categories {
            Some(selected) if !selected.is_empty() => selected,
            _ => &self.allowed_categories,
        }
    }

    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    /// Layers per-invocation overrides on top of this config.
    pub fn with_overrides(mut self, overrides: &FilterOverrides) -> Self {
        if let Some(patterns) = &overrides.allowed_product_name_patterns {
            self.allowed_product_name_patterns = patterns.clone();
        }
        if let Some(categories) = &overrides.allowed_categories {
            self.allowed_categories = categories.clone();
        }
        if let Some(selected) = &overrides.selected_categories {
            self.selected_categories = Some(selected.clone());
        }
        if let Some(protected) = &overrides.protected_categories {
            self.protected_categories = protected.clone();
        }
        if let Some(batch_size) = overrides.batch_size {
            self.batch_size = batch_size;
        }
        if let Some(enable) = overrides.enable_image_sync {
            self.enable_image_sync = enable;
        }
        if let Some(dry_run) = overrides.dry_run {
            self.dry_run = dry_run;
        }
        if let Some(delay) = overrides.batch_delay_ms {
            self.batch_delay_ms = delay;
        }
        self
    }
}

/// Optional per-invocation changes to a [`FilterConfig`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOverrides {
    pub allowed_product_name_patterns: Option<Vec<String>>,
    pub allowed_categories: Option<Vec<String>>,
    pub selected_categories: Option<Vec<String>>,
    pub protected_categories: Option<Vec<String>>,
    pub batch_size: Option<usize>,
    pub enable_image_sync: Option<bool>,
    pub dry_run: Option<bool>,
    pub batch_delay_ms: Option<u64>,
}
