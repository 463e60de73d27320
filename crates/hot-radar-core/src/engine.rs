use crate::config::AppConfig;
use crate::error::Error;
use crate::model::{RankedEntry, Snapshot};
use crate::progress::ProgressReporter;
use crate::ranker::{self, RankStats};
use crate::report;
use crate::source::{self, BilibiliSource, ItemSource};
use crate::storage::{JsonSnapshotStore, SnapshotStore};
use chrono::{Local, NaiveDateTime};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No usable item came back from any page. The stored snapshot was left
    /// alone.
    NoData,
    /// No previous snapshot to compare against; this run only records one.
    Baseline,
    /// Growth was computed against the previous snapshot.
    Ranked,
}

#[derive(Debug)]
pub struct CycleResult {
    pub outcome: CycleOutcome,
    pub ranked: Vec<RankedEntry>,
    pub rank_stats: RankStats,
    pub fetched_items: usize,
    pub pages_ok: u32,
    pub pages_failed: u32,
    pub report_path: Option<PathBuf>,
    pub snapshot_saved: bool,
    pub fetch_duration: Duration,
    pub rank_duration: Duration,
    pub generated_at: NaiveDateTime,
}

pub struct MonitorEngine {
    config: AppConfig,
    source: Box<dyn ItemSource>,
    store: Box<dyn SnapshotStore>,
}

impl MonitorEngine {
    /// Engine polling the configured endpoint and keeping the snapshot as a
    /// JSON file at `storage.snapshot_path`.
    pub fn new(config: AppConfig) -> Result<Self, Error> {
        let source = BilibiliSource::new(&config.source)?;
        let store = JsonSnapshotStore::new(config.storage.snapshot_path.clone());
        Ok(Self {
            config,
            source: Box::new(source),
            store: Box::new(store),
        })
    }

    pub fn with_source(mut self, source: impl ItemSource + 'static) -> Self {
        self.source = Box::new(source);
        self
    }

    pub fn with_store(mut self, store: impl SnapshotStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Failures inside the cycle are logged and reflected in the result; see
    /// [`CycleResult`].
    pub fn run_cycle(&self, reporter: &dyn ProgressReporter) -> CycleResult {
        self.run_cycle_at(reporter, Local::now().naive_local())
    }

    /// Run one monitoring cycle:
    /// 1. Load the previous snapshot (unreadable → empty baseline)
    /// 2. Fetch all pages (no usable items → stop, snapshot untouched)
    /// 3. Rank growth against the previous snapshot
    /// 4. Write the HTML report
    /// 5. Replace the stored snapshot with everything seen this cycle
    pub fn run_cycle_at(
        &self,
        reporter: &dyn ProgressReporter,
        generated_at: NaiveDateTime,
    ) -> CycleResult {
        info!("Starting monitoring cycle at {}", report::format_timestamp(&generated_at));

        let previous = match self.store.load() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Could not load previous snapshot, starting from an empty baseline: {}", e);
                Snapshot::new()
            }
        };
        if previous.is_empty() {
            info!("No previous snapshot; this run records the baseline and growth ranking starts next cycle");
        }

        // Phase 1: Fetch
        let fetch = source::fetch_all(self.source.as_ref(), &self.config.source, reporter);

        let mut result = CycleResult {
            outcome: CycleOutcome::NoData,
            ranked: Vec::new(),
            rank_stats: RankStats::default(),
            fetched_items: fetch.items.len(),
            pages_ok: fetch.pages_ok,
            pages_failed: fetch.pages_failed,
            report_path: None,
            snapshot_saved: false,
            fetch_duration: fetch.duration,
            rank_duration: Duration::ZERO,
            generated_at,
        };

        if fetch.items.is_empty() {
            warn!("No items fetched from any page; keeping the stored snapshot unchanged");
            result.report_path = self.write_report(&[], &generated_at);
            return result;
        }

        // Phase 2: Rank
        let rank_start = Instant::now();
        let ranking = ranker::rank(&fetch.items, &previous, &self.config.scoring);
        result.rank_duration = rank_start.elapsed();
        info!(
            "Ranked {} of {} unique items ({} first sightings, {} without growth) in {:.3}s",
            ranking.stats.ranked,
            ranking.stats.unique_items,
            ranking.stats.first_sightings,
            ranking.stats.without_growth,
            result.rank_duration.as_secs_f64(),
        );
        reporter.on_rank_complete(ranking.stats.ranked, result.rank_duration.as_secs_f64());

        // records without an identifier never reach the snapshot
        if ranking.snapshot.is_empty() {
            warn!(
                "None of the {} fetched records carried an identifier; keeping the stored snapshot unchanged",
                fetch.items.len()
            );
            result.rank_stats = ranking.stats;
            result.report_path = self.write_report(&[], &generated_at);
            return result;
        }

        result.outcome = if previous.is_empty() {
            CycleOutcome::Baseline
        } else {
            CycleOutcome::Ranked
        };
        if result.outcome == CycleOutcome::Ranked && ranking.entries.is_empty() {
            info!("A previous snapshot exists but no item showed positive growth this cycle");
        }

        // Phase 3: Report
        result.report_path = self.write_report(&ranking.entries, &generated_at);

        // Phase 4: Persist
        result.snapshot_saved = match self.store.save(&ranking.snapshot) {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to save snapshot: {}", e);
                false
            }
        };
        reporter.on_persist_complete(ranking.snapshot.len(), result.snapshot_saved);

        result.rank_stats = ranking.stats;
        result.ranked = ranking.entries;
        result
    }

    fn write_report(&self, entries: &[RankedEntry], generated_at: &NaiveDateTime) -> Option<PathBuf> {
        let path = &self.config.report.html_path;
        let html = report::render_html(entries, self.config.report.display_count, generated_at);
        match report::write_html(path, &html) {
            Ok(()) => Some(path.clone()),
            Err(e) => {
                error!("Failed to write HTML report {}: {}", path.display(), e);
                None
            }
        }
    }
}
