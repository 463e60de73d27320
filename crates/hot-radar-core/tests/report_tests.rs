use chrono::{NaiveDate, NaiveDateTime};
use hot_radar_core::model::{video_link, Counters, RankedEntry};
use hot_radar_core::report::html::EMPTY_HTML_MESSAGE;
use hot_radar_core::report::{render_html, write_html};
use std::fs;
use tempfile::tempdir;

fn at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .unwrap()
}

fn entry(bvid: &str, title: &str, uploader: &str) -> RankedEntry {
    RankedEntry {
        bvid: bvid.to_string(),
        title: title.to_string(),
        link: video_link(bvid),
        uploader_name: uploader.to_string(),
        total_view: 1_234_567,
        total_reply: 5,
        delta: Counters {
            view: 100,
            like: 10,
            reply: 2,
            favorite: 1,
            ..Counters::default()
        },
        opportunity_index: 100.0 / 6.0,
        growth_score: 220,
        final_score: 220.0 * 100.0 / 6.0,
    }
}

#[test]
fn test_empty_report_has_placeholder_and_no_table() {
    let html = render_html(&[], 50, &at());
    assert!(html.contains(EMPTY_HTML_MESSAGE));
    assert!(html.contains("Top 0"));
    assert!(!html.contains("<table>"));
    assert!(html.contains("2024-05-01 09:00:00"));
}

#[test]
fn test_report_rows_and_formatting() {
    let html = render_html(&[entry("BV1", "hello", "someone")], 50, &at());
    assert!(html.contains("Top 1"));
    assert!(html.contains("<table>"));
    assert!(html.contains(r#"href="https://www.bilibili.com/video/BV1""#));
    assert!(html.contains("1,234,567"));
    assert!(html.contains("16.7"));
    assert!(html.contains("<strong>3,667</strong>"));
    assert!(!html.contains(EMPTY_HTML_MESSAGE));
}

#[test]
fn test_report_escapes_titles_and_uploaders() {
    let html = render_html(
        &[entry("BV1", r#"<script>alert("x")</script> & co"#, "<b>up</b>")],
        50,
        &at(),
    );
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
    assert!(html.contains("&amp; co"));
    assert!(html.contains("&lt;b&gt;up&lt;/b&gt;"));
}

#[test]
fn test_report_respects_display_limit() {
    let entries = vec![
        entry("BV1", "one", "a"),
        entry("BV2", "two", "b"),
        entry("BV3", "three", "c"),
    ];
    let html = render_html(&entries, 2, &at());
    assert!(html.contains("Top 2"));
    assert!(html.contains("BV2"));
    assert!(!html.contains("BV3"));
}

#[test]
fn test_write_html_creates_parent_dirs() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("reports").join("hot.html");
    write_html(&path, "<html></html>").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "<html></html>");
}
