use chrono::{NaiveDate, NaiveDateTime};
use hot_radar_core::config::AppConfig;
use hot_radar_core::model::{Counters, Owner, RawItem};
use hot_radar_core::source::ItemSource;
use hot_radar_core::storage::{JsonSnapshotStore, SnapshotStore};
use hot_radar_core::{CycleOutcome, Error, MonitorEngine, SilentReporter};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Serves a fixed set of pages; missing pages come back empty, pages listed
/// in `failing` return an error.
struct FakeSource {
    pages: Vec<Vec<RawItem>>,
    failing: Vec<u32>,
}

impl ItemSource for FakeSource {
    fn fetch_page(&self, page: u32) -> Result<Vec<RawItem>, Error> {
        if self.failing.contains(&page) {
            return Err(Error::Api {
                code: -412,
                message: "request was intercepted".to_string(),
            });
        }
        Ok(self
            .pages
            .get(page as usize - 1)
            .cloned()
            .unwrap_or_default())
    }
}

fn video(bvid: &str, view: u64, like: u64, reply: u64, coin: u64) -> RawItem {
    RawItem {
        bvid: bvid.to_string(),
        title: format!("video {}", bvid),
        owner: Owner {
            name: format!("uploader {}", bvid),
            ..Owner::default()
        },
        stat: Counters {
            view,
            like,
            reply,
            coin,
            ..Counters::default()
        },
    }
}

fn test_config(root: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.source.pages = 3;
    config.source.page_delay_ms = 0;
    config.storage.snapshot_path = root.join("data").join("cache.json");
    config.report.html_path = root.join("report.html");
    config
}

fn at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|d| d.and_hms_opt(10, 0, 0))
        .unwrap()
}

fn engine(config: &AppConfig, source: FakeSource) -> MonitorEngine {
    let store = JsonSnapshotStore::new(config.storage.snapshot_path.clone());
    MonitorEngine::new(config.clone())
        .unwrap()
        .with_source(source)
        .with_store(store)
}

#[test]
fn test_first_cycle_records_baseline_only() {
    let tmp = tempdir().unwrap();
    let config = test_config(tmp.path());
    let source = FakeSource {
        pages: vec![vec![video("A", 100, 1, 0, 0), video("B", 50, 0, 0, 0)]],
        failing: vec![],
    };

    let result = engine(&config, source).run_cycle_at(&SilentReporter, at());

    assert_eq!(result.outcome, CycleOutcome::Baseline);
    assert!(result.ranked.is_empty());
    assert_eq!(result.rank_stats.first_sightings, 2);
    assert!(result.snapshot_saved);

    let stored = JsonSnapshotStore::new(&config.storage.snapshot_path).load().unwrap();
    assert_eq!(stored.len(), 2);

    let html = fs::read_to_string(&config.report.html_path).unwrap();
    assert!(html.contains("Top 0"));
    assert!(!html.contains("<table>"));
}

#[test]
fn test_second_cycle_ranks_growth_and_replaces_snapshot() {
    let tmp = tempdir().unwrap();
    let config = test_config(tmp.path());

    let first = FakeSource {
        pages: vec![vec![
            video("SLOW", 1_000, 10, 100, 0),
            video("FAST", 1_000, 10, 0, 0),
            video("FLAT", 500, 5, 5, 5),
            video("DROPPED", 10, 0, 0, 0),
        ]],
        failing: vec![],
    };
    engine(&config, first).run_cycle_at(&SilentReporter, at());

    let second = FakeSource {
        pages: vec![
            vec![
                video("SLOW", 1_200, 12, 110, 0),
                video("FAST", 1_300, 20, 1, 1),
            ],
            vec![video("FLAT", 500, 5, 5, 5), video("NEWCOMER", 99_999, 999, 0, 99)],
        ],
        failing: vec![],
    };
    let result = engine(&config, second).run_cycle_at(&SilentReporter, at());

    assert_eq!(result.outcome, CycleOutcome::Ranked);
    assert_eq!(result.fetched_items, 4);
    let ids: Vec<&str> = result.ranked.iter().map(|e| e.bvid.as_str()).collect();
    assert_eq!(ids, vec!["FAST", "SLOW"]);
    assert_eq!(result.rank_stats.first_sightings, 1);
    assert_eq!(result.rank_stats.without_growth, 1);

    // FAST: 300 + 10*5 + 1*20 + 1*100 = 470, opportunity 300 / 2 = 150
    let fast = &result.ranked[0];
    assert_eq!(fast.growth_score, 470);
    assert!((fast.opportunity_index - 150.0).abs() < 1e-9);
    assert!((fast.final_score - 70_500.0).abs() < 1e-6);

    let stored = JsonSnapshotStore::new(&config.storage.snapshot_path).load().unwrap();
    let keys: Vec<&str> = stored.keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["FAST", "FLAT", "NEWCOMER", "SLOW"]);
    assert_eq!(stored["FAST"].counters.view, 1_300);

    let html = fs::read_to_string(&config.report.html_path).unwrap();
    assert!(html.contains("Top 2"));
    assert!(html.contains("https://www.bilibili.com/video/FAST"));
}

#[test]
fn test_empty_fetch_keeps_snapshot_and_writes_placeholder() {
    let tmp = tempdir().unwrap();
    let config = test_config(tmp.path());

    let first = FakeSource {
        pages: vec![vec![video("A", 100, 0, 0, 0)]],
        failing: vec![],
    };
    engine(&config, first).run_cycle_at(&SilentReporter, at());
    let before = fs::read_to_string(&config.storage.snapshot_path).unwrap();

    let broken = FakeSource {
        pages: vec![],
        failing: vec![1, 2, 3],
    };
    let result = engine(&config, broken).run_cycle_at(&SilentReporter, at());

    assert_eq!(result.outcome, CycleOutcome::NoData);
    assert_eq!(result.pages_failed, 3);
    assert!(!result.snapshot_saved);
    assert!(result.ranked.is_empty());

    let after = fs::read_to_string(&config.storage.snapshot_path).unwrap();
    assert_eq!(before, after);

    let html = fs::read_to_string(&config.report.html_path).unwrap();
    assert!(!html.contains("<table>"));
}

#[test]
fn test_fetch_without_identifiers_keeps_snapshot() {
    let tmp = tempdir().unwrap();
    let config = test_config(tmp.path());

    let first = FakeSource {
        pages: vec![vec![video("A", 100, 0, 0, 0)]],
        failing: vec![],
    };
    engine(&config, first).run_cycle_at(&SilentReporter, at());
    let before = fs::read_to_string(&config.storage.snapshot_path).unwrap();

    let anonymous = FakeSource {
        pages: vec![vec![video("", 5_000, 10, 0, 0), video("", 7_000, 0, 3, 1)]],
        failing: vec![],
    };
    let result = engine(&config, anonymous).run_cycle_at(&SilentReporter, at());

    assert_eq!(result.outcome, CycleOutcome::NoData);
    assert_eq!(result.fetched_items, 2);
    assert_eq!(result.rank_stats.unique_items, 0);
    assert!(!result.snapshot_saved, "snapshot must not be overwritten");
    assert!(result.ranked.is_empty());

    let after = fs::read_to_string(&config.storage.snapshot_path).unwrap();
    assert_eq!(before, after);
    let stored = JsonSnapshotStore::new(&config.storage.snapshot_path).load().unwrap();
    assert!(stored.contains_key("A"));

    let html = fs::read_to_string(&config.report.html_path).unwrap();
    assert!(html.contains("Top 0"));
    assert!(!html.contains("<table>"));
}

#[test]
fn test_partial_page_failure_still_ranks() {
    let tmp = tempdir().unwrap();
    let config = test_config(tmp.path());

    let first = FakeSource {
        pages: vec![vec![video("A", 100, 0, 0, 0)], vec![video("B", 100, 0, 0, 0)]],
        failing: vec![],
    };
    engine(&config, first).run_cycle_at(&SilentReporter, at());

    let second = FakeSource {
        pages: vec![vec![], vec![video("B", 150, 0, 0, 0)]],
        failing: vec![1],
    };
    let result = engine(&config, second).run_cycle_at(&SilentReporter, at());

    assert_eq!(result.outcome, CycleOutcome::Ranked);
    assert_eq!(result.pages_failed, 1);
    assert_eq!(result.ranked.len(), 1);
    assert_eq!(result.ranked[0].bvid, "B");

    // the snapshot now only knows what this cycle saw
    let stored = JsonSnapshotStore::new(&config.storage.snapshot_path).load().unwrap();
    assert_eq!(stored.len(), 1);
    assert!(stored.contains_key("B"));
}

#[test]
fn test_corrupt_snapshot_treated_as_baseline() {
    let tmp = tempdir().unwrap();
    let config = test_config(tmp.path());
    fs::create_dir_all(config.storage.snapshot_path.parent().unwrap()).unwrap();
    fs::write(&config.storage.snapshot_path, "not json at all").unwrap();

    let source = FakeSource {
        pages: vec![vec![video("A", 100, 0, 0, 0)]],
        failing: vec![],
    };
    let result = engine(&config, source).run_cycle_at(&SilentReporter, at());

    assert_eq!(result.outcome, CycleOutcome::Baseline);
    assert!(result.snapshot_saved);
    let stored = JsonSnapshotStore::new(&config.storage.snapshot_path).load().unwrap();
    assert!(stored.contains_key("A"));
}

#[test]
fn test_unwritable_report_does_not_stop_persisting() {
    let tmp = tempdir().unwrap();
    let mut config = test_config(tmp.path());
    // a directory where the report file should go
    let blocked = tmp.path().join("blocked.html");
    fs::create_dir_all(&blocked).unwrap();
    config.report.html_path = blocked;

    let source = FakeSource {
        pages: vec![vec![video("A", 100, 0, 0, 0)]],
        failing: vec![],
    };
    let result = engine(&config, source).run_cycle_at(&SilentReporter, at());

    assert!(result.report_path.is_none());
    assert!(result.snapshot_saved);
}
