/// Trait for reporting cycle progress.
///
/// The CLI implements it with indicatif bars; tests use [`SilentReporter`].
/// All methods have default no-op implementations.
pub trait ProgressReporter {
    fn on_fetch_start(&self, _total_pages: u32) {}
    fn on_page_complete(&self, _page: u32, _items: usize) {}
    fn on_page_failed(&self, _page: u32, _reason: &str) {}
    fn on_fetch_complete(&self, _total_items: usize, _duration_secs: f64) {}
    fn on_rank_complete(&self, _ranked: usize, _duration_secs: f64) {}
    fn on_persist_complete(&self, _snapshot_entries: usize, _saved: bool) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
