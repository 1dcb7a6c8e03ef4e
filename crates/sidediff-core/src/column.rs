//! Turning aligned rows into the text of a single column
//!
//! This is toolkit-agnostic: every output line carries a [`Paint`] that the
//! UI maps onto its own styles.

use crate::line::{DiffLine, DiffRow, LineKind, Side};

const MIN_NUMBER_WIDTH: usize = 4;
const HEADER_RULE_WIDTH: usize = 30;

/// How a column line should be colored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    /// Context, or a change shown on the side it does not belong to
    Plain,
    Addition,
    Deletion,
    /// Separator drawn above a hunk header
    HeaderRule,
    Header,
    /// Padding where this side has no line
    Blank,
}

/// One rendered line of a column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLine {
    pub text: String,
    pub paint: Paint,
    /// Row this line was rendered from
    pub row_index: usize,
    /// Byte offset of the line content within `text` (after the gutter)
    pub content_offset: usize,
}

/// Width of the line-number gutter for `side`: digits of the largest number, at least 4
pub fn line_number_width(rows: &[DiffRow], side: Side) -> usize {
    rows.iter()
        .filter_map(|row| row.side(side).and_then(|line| line.number))
        .max()
        .map_or(MIN_NUMBER_WIDTH, |max| {
            max.to_string().len().max(MIN_NUMBER_WIDTH)
        })
}

/// Render one side of `rows`.
///
/// Header rows expand to two lines (a rule and the header text), so the
/// output can be longer than `rows`; use `row_index` to map back.
pub fn render_column(rows: &[DiffRow], side: Side, show_line_numbers: bool) -> Vec<ColumnLine> {
    let width = if show_line_numbers {
        line_number_width(rows, side)
    } else {
        0
    };

    let mut out = Vec::with_capacity(rows.len());
    for (row_index, row) in rows.iter().enumerate() {
        match row.side(side) {
            Some(line) if line.kind == LineKind::Header => {
                out.push(ColumnLine {
                    text: "─".repeat(HEADER_RULE_WIDTH),
                    paint: Paint::HeaderRule,
                    row_index,
                    content_offset: 0,
                });
                out.push(ColumnLine {
                    text: line.content.clone(),
                    paint: Paint::Header,
                    row_index,
                    content_offset: 0,
                });
            }
            Some(line) => out.push(render_line(line, side, width, show_line_numbers, row_index)),
            None => out.push(ColumnLine {
                text: if show_line_numbers {
                    " ".repeat(width + 1)
                } else {
                    String::new()
                },
                paint: Paint::Blank,
                row_index,
                content_offset: 0,
            }),
        }
    }
    out
}

fn render_line(
    line: &DiffLine,
    side: Side,
    width: usize,
    show_line_numbers: bool,
    row_index: usize,
) -> ColumnLine {
    let (text, content_offset) = match line.number {
        Some(number) if show_line_numbers => {
            let gutter = format!("{:>width$} ", number, width = width);
            let offset = gutter.len();
            (gutter + &line.content, offset)
        }
        _ => (line.content.clone(), 0),
    };

    // Changes are only colored on the side they belong to
    let paint = match (line.kind, side) {
        (LineKind::Addition, Side::New) => Paint::Addition,
        (LineKind::Deletion, Side::Old) => Paint::Deletion,
        _ => Paint::Plain,
    };

    ColumnLine {
        text,
        paint,
        row_index,
        content_offset,
    }
}
