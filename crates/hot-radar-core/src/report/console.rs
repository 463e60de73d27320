use crate::model::RankedEntry;
use crate::report::{format_score, format_timestamp, group_thousands, shown_count};
use chrono::NaiveDateTime;
use console::{pad_str, truncate_str, Alignment};

const RANK_WIDTH: usize = 4;
const TITLE_WIDTH: usize = 42;
const TITLE_MAX: usize = 40;
const ID_WIDTH: usize = 14;
const NUM_WIDTH: usize = 10;
const NUM_COLUMNS: usize = 9;

pub const EMPTY_CONSOLE_MESSAGE: &str = "No growing videos to display.";

fn cell(text: &str, width: usize) -> String {
    pad_str(text, width, Alignment::Left, None).into_owned()
}

/// Fixed-width table of the top `limit` entries. Widths are measured in
/// terminal columns so wide (CJK) titles stay aligned.
pub fn render_console(entries: &[RankedEntry], limit: usize, generated_at: &NaiveDateTime) -> String {
    if entries.is_empty() {
        return format!("{}\n", EMPTY_CONSOLE_MESSAGE);
    }

    let shown = shown_count(entries.len(), limit);
    let mut out = String::new();
    out.push_str(&format!("\n--- Popular video growth, Top {} ---\n", shown));
    out.push_str(&format!("--- (data as of {}) ---\n", format_timestamp(generated_at)));

    let headers = [
        "View+", "Like+", "Danmaku+", "Reply+", "Fav+", "Coin+", "Share+", "Opp.", "Score",
    ];
    let mut header = String::new();
    header.push_str(&cell("#", RANK_WIDTH));
    header.push_str(&cell("Title", TITLE_WIDTH));
    header.push_str(&cell("BVID", ID_WIDTH));
    for h in headers {
        header.push_str(&cell(h, NUM_WIDTH));
    }
    out.push_str(header.trim_end());
    out.push('\n');
    out.push_str(&"-".repeat(RANK_WIDTH + TITLE_WIDTH + ID_WIDTH + NUM_WIDTH * NUM_COLUMNS));
    out.push('\n');

    for (idx, entry) in entries.iter().take(shown).enumerate() {
        let title = truncate_str(&entry.title, TITLE_MAX, "");
        let d = &entry.delta;
        let mut row = String::new();
        row.push_str(&cell(&(idx + 1).to_string(), RANK_WIDTH));
        row.push_str(&cell(&title, TITLE_WIDTH));
        row.push_str(&cell(&entry.bvid, ID_WIDTH));
        for n in [d.view, d.like, d.danmaku, d.reply, d.favorite, d.coin, d.share] {
            row.push_str(&cell(&group_thousands(n), NUM_WIDTH));
        }
        row.push_str(&cell(&format!("{:.1}", entry.opportunity_index), NUM_WIDTH));
        row.push_str(&format_score(entry.final_score));
        out.push_str(row.trim_end());
        out.push('\n');
    }

    out
}
