use crate::error::Error;
use crate::model::RankedEntry;
use crate::report::{format_score, format_timestamp, group_thousands, shown_count};
use chrono::NaiveDateTime;
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fs;
use std::path::Path;
use tracing::info;

pub const EMPTY_HTML_MESSAGE: &str =
    "No qualifying growth was observed this cycle, or the first baseline cycle is still being collected.";

const STYLE: &str = r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
            background-color: #f0f2f5;
            color: #333;
            margin: 0;
            padding: 20px;
        }
        .container {
            max-width: 1200px;
            margin: auto;
            background: #fff;
            padding: 25px 30px;
            border-radius: 12px;
            box-shadow: 0 6px 12px rgba(0,0,0,0.08);
        }
        h1 {
            color: #00a1d6;
            text-align: center;
            border-bottom: 2px solid #e7e7e7;
            padding-bottom: 15px;
            margin-top: 0;
        }
        p.timestamp {
            text-align: center;
            color: #777;
            margin-bottom: 25px;
            font-size: 0.95em;
        }
        table {
            width: 100%;
            border-collapse: collapse;
            margin-top: 20px;
        }
        th, td {
            padding: 14px 18px;
            border: 1px solid #ddd;
            text-align: left;
            vertical-align: middle;
        }
        thead th {
            background-color: #00a1d6;
            color: white;
            font-weight: 600;
            position: sticky;
            top: 0;
        }
        tbody tr:nth-child(even) { background-color: #f9f9f9; }
        tbody tr:hover { background-color: #e9efff; }
        a {
            color: #fb7299;
            text-decoration: none;
            font-weight: 500;
        }
        a:hover { text-decoration: underline; }
        .rank { font-weight: bold; text-align: center; width: 5%; }
        .growth-data {
            text-align: right;
            font-family: 'Courier New', Courier, monospace;
            width: 9%;
        }
        .title-col { width: 35%; }
        .uploader-col { width: 15%; }
"#;

/// Self-contained HTML page for the top `limit` entries.
pub fn render_html(entries: &[RankedEntry], limit: usize, generated_at: &NaiveDateTime) -> String {
    let shown = shown_count(entries.len(), limit);
    let mut html = String::with_capacity(8 * 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"zh-CN\">\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str("    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str("    <title>Bilibili popular growth report</title>\n");
    html.push_str("    <style>");
    html.push_str(STYLE);
    html.push_str("    </style>\n</head>\n<body>\n    <div class=\"container\">\n");
    html.push_str(&format!(
        "        <h1>Bilibili popular videos, hourly growth Top {}</h1>\n",
        shown
    ));
    html.push_str(&format!(
        "        <p class=\"timestamp\">Generated at {}</p>\n",
        format_timestamp(generated_at)
    ));

    if entries.is_empty() {
        html.push_str(&format!(
            "        <p><strong>{}</strong></p>\n",
            EMPTY_HTML_MESSAGE
        ));
    } else {
        html.push_str(
            r#"        <table>
            <thead>
                <tr>
                    <th class="rank">#</th>
                    <th class="title-col">Title</th>
                    <th class="uploader-col">Uploader</th>
                    <th class="growth-data">Views</th>
                    <th class="growth-data">View+</th>
                    <th class="growth-data">Reply+</th>
                    <th class="growth-data">Opportunity</th>
                    <th class="growth-data"><strong>Score</strong></th>
                </tr>
            </thead>
            <tbody>
"#,
        );
        for (idx, entry) in entries.iter().take(shown).enumerate() {
            html.push_str(&render_row(idx + 1, entry));
        }
        html.push_str("            </tbody>\n        </table>\n");
    }

    html.push_str("    </div>\n</body>\n</html>\n");
    html
}

fn render_row(rank: usize, entry: &RankedEntry) -> String {
    format!(
        r#"                <tr>
                    <td class="rank">{rank}</td>
                    <td><a href="{href}" target="_blank" title="{title_attr}">{title}</a></td>
                    <td>{uploader}</td>
                    <td class="growth-data">{total_view}</td>
                    <td class="growth-data">{delta_view}</td>
                    <td class="growth-data">{delta_reply}</td>
                    <td class="growth-data">{opportunity:.1}</td>
                    <td class="growth-data"><strong>{score}</strong></td>
                </tr>
"#,
        rank = rank,
        href = encode_double_quoted_attribute(&entry.link),
        title_attr = encode_double_quoted_attribute(&entry.title),
        title = encode_text(&entry.title),
        uploader = encode_text(&entry.uploader_name),
        total_view = group_thousands(entry.total_view),
        delta_view = group_thousands(entry.delta.view),
        delta_reply = group_thousands(entry.delta.reply),
        opportunity = entry.opportunity_index,
        score = format_score(entry.final_score),
    )
}

pub fn write_html(path: &Path, html: &str) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, html)?;
    info!("HTML report written to {}", path.display());
    Ok(())
}
