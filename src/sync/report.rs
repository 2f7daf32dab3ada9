//! Reports returned to callers of the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::stats::RunStats;

pub const STRATEGY: &str = "filtered";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    pub created: usize,
    pub updated: usize,
    pub with_images: usize,
    pub without_images: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncMetadata {
    pub sync_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub strategy: String,
}

/// Outcome of a sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub success: bool,
    pub message: String,
    pub synced_products: usize,
    pub protected_items: usize,
    pub errors: Vec<String>,
    pub product_details: ProductDetails,
    pub metadata: SyncMetadata,
}

impl SyncResult {
    pub fn completed(
        sync_id: Uuid,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        stats: &RunStats,
        dry_run: bool,
    ) -> Self {
        let prefix = if dry_run { "Dry run: would sync" } else { "Synced" };
        let message = format!(
            "{} {} products ({} created, {} updated), {} skipped, {} protected, {} errors",
            prefix,
            stats.synced(),
            stats.created,
            stats.updated,
            stats.skipped,
            stats.protected,
            stats.errors
        );

        Self {
            success: true,
            message,
            synced_products: stats.synced(),
            protected_items: stats.protected,
            errors: stats.error_messages.clone(),
            product_details: ProductDetails {
                created: stats.created,
                updated: stats.updated,
                with_images: stats.with_images,
                without_images: stats.without_images,
                skipped: stats.skipped,
            },
            metadata: SyncMetadata {
                sync_id,
                started_at,
                completed_at,
                strategy: STRATEGY.to_string(),
            },
        }
    }

    pub fn failed(
        sync_id: Uuid,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        error: String,
    ) -> Self {
        Self {
            success: false,
            message: format!("Sync failed: {}", error),
            synced_products: 0,
            protected_items: 0,
            errors: vec![error],
            product_details: ProductDetails {
                created: 0,
                updated: 0,
                with_images: 0,
                without_images: 0,
                skipped: 0,
            },
            metadata: SyncMetadata {
                sync_id,
                started_at,
                completed_at,
                strategy: STRATEGY.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SyncAction {
    Create,
    Update,
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncAction::Create => write!(f, "CREATE"),
            SyncAction::Update => write!(f, "UPDATE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedProduct {
    pub id: String,
    pub name: String,
    pub category: String,
    pub action: SyncAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedItem {
    pub id: String,
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewSummary {
    pub total_products: usize,
    pub will_sync: usize,
    pub will_skip: usize,
    pub protected_items: usize,
}

/// Dry-run classification of every fetched item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResult {
    pub products_to_sync: Vec<PlannedProduct>,
    pub items_to_skip: Vec<SkippedItem>,
    pub summary: PreviewSummary,
    /// Why the preview is empty or incomplete, if anything went wrong.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl PreviewResult {
    pub fn failed(error: String) -> Self {
        Self {
            errors: vec![error],
            ..Self::default()
        }
    }
}
