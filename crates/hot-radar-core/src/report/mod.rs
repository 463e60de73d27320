pub mod console;
pub mod html;

pub use self::console::render_console;
pub use self::html::{render_html, write_html};

use chrono::NaiveDateTime;
use indicatif::HumanCount;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// `1234567` → `"1,234,567"`.
pub fn group_thousands(n: u64) -> String {
    HumanCount(n).to_string()
}

/// Scores are shown rounded to whole points with thousands separators.
pub fn format_score(score: f64) -> String {
    group_thousands(score.max(0.0).round() as u64)
}

/// Number of rows a report shows for `len` ranked entries.
pub fn shown_count(len: usize, limit: usize) -> usize {
    len.min(limit)
}
