pub mod bilibili;

pub use bilibili::{parse_page, BilibiliSource};

use crate::config::SourceConfig;
use crate::error::Error;
use crate::model::RawItem;
use crate::progress::ProgressReporter;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// A paginated listing of items. Pages are numbered from 1.
pub trait ItemSource {
    fn fetch_page(&self, page: u32) -> Result<Vec<RawItem>, Error>;
}

#[derive(Debug, Default)]
pub struct FetchReport {
    /// All records in the order received, duplicates included.
    pub items: Vec<RawItem>,
    pub pages_ok: u32,
    pub pages_failed: u32,
    /// Set when a page came back empty and pagination stopped early.
    pub exhausted: bool,
    pub duration: Duration,
}

/// Fetch pages `1..=config.pages` with a single attempt each.
///
/// A page that fails (network, HTTP status, API code or bad payload) is
/// logged and skipped. A page that succeeds with no items ends pagination.
pub fn fetch_all(
    source: &dyn ItemSource,
    config: &SourceConfig,
    reporter: &dyn ProgressReporter,
) -> FetchReport {
    let start = Instant::now();
    let mut report = FetchReport::default();
    let delay = Duration::from_millis(config.page_delay_ms);

    info!(
        "Fetching {} pages of up to {} items",
        config.pages, config.page_size
    );
    reporter.on_fetch_start(config.pages);

    for page in 1..=config.pages {
        match source.fetch_page(page) {
            Ok(items) if items.is_empty() => {
                warn!("Page {} returned no items, assuming the listing is exhausted", page);
                report.pages_ok += 1;
                report.exhausted = true;
                reporter.on_page_complete(page, 0);
                break;
            }
            Ok(items) => {
                info!("Fetched page {}: {} items", page, items.len());
                report.pages_ok += 1;
                reporter.on_page_complete(page, items.len());
                report.items.extend(items);
                if page < config.pages && !delay.is_zero() {
                    thread::sleep(delay);
                }
            }
            Err(e) => {
                warn!("Skipping page {}: {}", page, e);
                report.pages_failed += 1;
                reporter.on_page_failed(page, &e.to_string());
            }
        }
    }

    report.duration = start.elapsed();
    info!(
        "Fetch complete: {} items from {} pages ({} failed) in {:.2}s",
        report.items.len(),
        report.pages_ok,
        report.pages_failed,
        report.duration.as_secs_f64()
    );
    reporter.on_fetch_complete(report.items.len(), report.duration.as_secs_f64());

    report
}
