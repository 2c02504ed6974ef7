//! Progress reporting for dataset loading.
//!
//! Decouples load progress from any rendering backend. The CLI plugs in
//! `indicatif` bars; the server and tests use [`null_progress`].

use std::sync::Arc;

/// Receives progress updates while rows are being loaded.
pub trait ProgressCallback: Send + Sync {
    /// Set the total expected rows.
    fn set_total(&self, total: u64);

    /// Advance progress by `delta` rows.
    fn inc(&self, delta: u64);

    /// Mark progress as complete with a final message.
    fn finish(&self, msg: String);
}

/// Ignores all progress updates.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`] instance.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
