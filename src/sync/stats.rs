use serde::Serialize;

/// Counters for one run, threaded through the reconciler and returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Items that entered a batch
    pub processed: usize,
    pub created: usize,
    pub updated: usize,
    /// Items that matched no inclusion rule
    pub skipped: usize,
    /// Items in a protected category
    pub protected: usize,
    pub errors: usize,
    pub with_images: usize,
    pub without_images: usize,
    pub batches: usize,
    pub error_messages: Vec<String>,
}

impl RunStats {
    pub fn synced(&self) -> usize {
        self.created + self.updated
    }

    pub fn record_error(&mut self, message: String) {
        self.errors += 1;
        self.error_messages.push(message);
    }
}
