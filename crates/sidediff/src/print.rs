//! Plain-text side-by-side output for `--print`

use sidediff_core::{render_column, ColumnLine, DiffRow, DiffStats, Side};
use std::fmt::Write;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const SEPARATOR: &str = " │ ";

/// Cut `text` to at most `width` display columns, expanding tabs
fn cut(text: &str, width: usize) -> String {
    let text = text.replace('\t', "    ");
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}

/// Cut or pad `text` to exactly `width` display columns
fn fit(text: &str, width: usize) -> String {
    let mut out = cut(text, width);
    out.push_str(&" ".repeat(width.saturating_sub(out.width())));
    out
}

/// Lay the two columns next to each other within `total_width` columns
pub fn side_by_side(rows: &[DiffRow], total_width: usize, show_line_numbers: bool) -> String {
    let old = render_column(rows, Side::Old, show_line_numbers);
    let new = render_column(rows, Side::New, show_line_numbers);
    debug_assert!(columns_aligned(&old, &new));
    let half = total_width.saturating_sub(SEPARATOR.width()) / 2;

    let mut out = String::new();
    for (left, right) in old.iter().zip(new.iter()) {
        // The right column is not padded, so trailing whitespace is content
        let _ = writeln!(
            out,
            "{}{}{}",
            fit(&left.text, half),
            SEPARATOR,
            cut(&right.text, half)
        );
    }
    out
}

/// Banner printed above each file in `--print` mode
pub fn file_banner(path: &str, stats: DiffStats, total_width: usize) -> String {
    let label = format!("── {} +{} -{} ", path, stats.additions, stats.deletions);
    let rest = total_width.saturating_sub(label.width());
    format!("{}{}", label, "─".repeat(rest))
}

/// True when both columns render to the same number of lines
pub fn columns_aligned(old: &[ColumnLine], new: &[ColumnLine]) -> bool {
    old.len() == new.len()
        && old
            .iter()
            .zip(new.iter())
            .all(|(o, n)| o.row_index == n.row_index)
}
