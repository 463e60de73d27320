use hot_radar_core::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::time::Duration;

/// CLI progress reporter using an indicatif bar over listing pages.
pub struct CliReporter {
    bar: RefCell<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: RefCell::new(None),
        }
    }

    fn finish_bar(&self) {
        if let Some(pb) = self.bar.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }
}

fn page_style() -> ProgressStyle {
    ProgressStyle::with_template("  {spinner:.cyan} Fetching [{bar:30.cyan/dim}] {pos}/{len} pages {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━╸─")
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
}

impl ProgressReporter for CliReporter {
    fn on_fetch_start(&self, total_pages: u32) {
        let pb = ProgressBar::new(u64::from(total_pages));
        pb.set_style(page_style());
        pb.enable_steady_tick(Duration::from_millis(80));
        if let Some(old) = self.bar.borrow_mut().replace(pb) {
            old.finish_and_clear();
        }
    }

    fn on_page_complete(&self, _page: u32, items: usize) {
        if let Some(pb) = self.bar.borrow().as_ref() {
            pb.set_message(format!("(+{} items)", items));
            pb.inc(1);
        }
    }

    fn on_page_failed(&self, page: u32, _reason: &str) {
        if let Some(pb) = self.bar.borrow().as_ref() {
            pb.set_message(format!("(page {} failed)", page));
            pb.inc(1);
        }
    }

    fn on_fetch_complete(&self, total_items: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Fetch complete: {} items in {:.2}s",
            total_items, duration_secs
        );
    }

    fn on_rank_complete(&self, ranked: usize, duration_secs: f64) {
        eprintln!(
            "  \x1b[32m✓\x1b[0m Ranking complete: {} growing videos in {:.3}s",
            ranked, duration_secs
        );
    }

    fn on_persist_complete(&self, snapshot_entries: usize, saved: bool) {
        if saved {
            eprintln!(
                "  \x1b[32m✓\x1b[0m Snapshot saved: {} entries",
                snapshot_entries
            );
        } else {
            eprintln!("  \x1b[31m✗\x1b[0m Snapshot not saved");
        }
    }
}
