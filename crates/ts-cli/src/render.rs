//! Fixed-width rendering of report rows.

use ansi_term::Style;
use ts_core::{Row, RowKind};

const HEADERS: [&str; 9] = [
    "Wk",
    "Date",
    "Day",
    "Category",
    "Tags",
    "Phabricator",
    "IDs",
    "Time",
    "Total",
];

/// Time and Total are right-aligned.
const RIGHT_ALIGNED: [bool; 9] = [
    false, false, false, false, false, false, false, true, true,
];

const COLUMN_GAP: &str = "  ";
const TOTAL_COLUMN: usize = 8;

/// Renders the rows as a table, headers underlined when color is enabled.
pub fn render_table(rows: &[Row], color: bool) -> String {
    let widths = column_widths(rows);

    let mut output = String::new();
    output.push_str(&header_line(&widths, color));
    output.push('\n');
    for row in rows {
        output.push_str(&render_row(row, &widths, color));
        output.push('\n');
    }
    output
}

fn cells(row: &Row) -> [&str; 9] {
    [
        &row.week,
        &row.date,
        &row.day,
        &row.category,
        &row.tags,
        &row.link,
        &row.ids,
        &row.time,
        &row.total,
    ]
}

fn column_widths(rows: &[Row]) -> [usize; 9] {
    let mut widths = [0; 9];
    for (column, header) in HEADERS.iter().enumerate() {
        widths[column] = header.len();
    }
    for row in rows {
        for (column, cell) in cells(row).iter().enumerate() {
            widths[column] = widths[column].max(visible_width(cell));
        }
    }
    widths
}

fn header_line(widths: &[usize; 9], color: bool) -> String {
    let style = color.then(|| Style::new().underline());
    let rendered: Vec<String> = HEADERS
        .iter()
        .enumerate()
        .map(|(column, header)| {
            let text =
                style.map_or_else(|| (*header).to_string(), |s| s.paint(*header).to_string());
            pad(&text, widths[column], RIGHT_ALIGNED[column])
        })
        .collect();
    rendered.join(COLUMN_GAP).trim_end().to_string()
}

fn render_row(row: &Row, widths: &[usize; 9], color: bool) -> String {
    let rendered: Vec<String> = match row.kind {
        // The separator underlines a blank Total cell; without color it
        // falls back to dashes.
        RowKind::Separator => widths
            .iter()
            .enumerate()
            .map(|(column, width)| {
                if column == TOTAL_COLUMN {
                    if color {
                        Style::new().underline().paint(" ".repeat(*width)).to_string()
                    } else {
                        "-".repeat(*width)
                    }
                } else {
                    " ".repeat(*width)
                }
            })
            .collect(),
        _ => cells(row)
            .iter()
            .enumerate()
            .map(|(column, cell)| pad(cell, widths[column], RIGHT_ALIGNED[column]))
            .collect(),
    };
    rendered.join(COLUMN_GAP).trim_end().to_string()
}

fn pad(text: &str, width: usize, right_aligned: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(visible_width(text)));
    if right_aligned {
        format!("{fill}{text}")
    } else {
        format!("{text}{fill}")
    }
}

/// Character width of the cell text, ANSI escape sequences excluded.
fn visible_width(text: &str) -> usize {
    let mut width = 0;
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}
