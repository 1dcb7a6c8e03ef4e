//! Old and new columns with synchronized scrolling

use crate::app::{App, Focus};
use crate::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use sidediff_core::{render_column, ColumnLine, DiffStats, Paint, SearchMatch, Side};

const TAB_WIDTH: usize = 4;

/// A highlighted byte range within a column line's text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Highlight {
    start: usize,
    end: usize,
    current: bool,
}

fn expand_tabs(text: &str) -> String {
    text.replace('\t', &" ".repeat(TAB_WIDTH))
}

fn highlights_for(
    line: &ColumnLine,
    side: Side,
    matches: &[SearchMatch],
    current: Option<usize>,
) -> Vec<Highlight> {
    if matches!(line.paint, Paint::Header | Paint::HeaderRule | Paint::Blank) {
        return Vec::new();
    }
    let mut out: Vec<Highlight> = matches
        .iter()
        .enumerate()
        .filter(|(_, m)| m.row_index == line.row_index && m.side == side)
        .map(|(idx, m)| Highlight {
            start: line.content_offset + m.column,
            end: line.content_offset + m.column + m.length,
            current: Some(idx) == current,
        })
        .filter(|h| h.end <= line.text.len())
        .collect();
    out.sort_by_key(|h| h.start);
    out
}

/// Split a column line into styled spans, applying search highlights
fn styled_line(line: &ColumnLine, highlights: &[Highlight], theme: &Theme) -> Line<'static> {
    let base = theme.paint_style(line.paint);
    if highlights.is_empty() {
        return Line::from(Span::styled(expand_tabs(&line.text), base));
    }

    let mut spans = Vec::new();
    let mut cursor = 0;
    for h in highlights {
        // Overlapping matches: only the part past the previous one is drawn
        let start = h.start.max(cursor);
        if start >= h.end {
            continue;
        }
        if start > cursor {
            spans.push(Span::styled(expand_tabs(&line.text[cursor..start]), base));
        }
        spans.push(Span::styled(
            expand_tabs(&line.text[start..h.end]),
            theme.match_style(h.current),
        ));
        cursor = h.end;
    }
    if cursor < line.text.len() {
        spans.push(Span::styled(expand_tabs(&line.text[cursor..]), base));
    }
    Line::from(spans)
}

/// Build the visible lines of one column
fn column_lines(app: &App, side: Side, height: usize) -> Vec<Line<'static>> {
    let column = render_column(&app.rows, side, app.show_line_numbers);
    let matches = app.search.matches();
    let current = app.search.current_index();

    column
        .iter()
        .skip(app.scroll_offset)
        .take(height)
        .map(|line| {
            let highlights = highlights_for(line, side, matches, current);
            styled_line(line, &highlights, &app.theme)
        })
        .collect()
}

/// Pane title with the number of changed lines on that side
fn pane_title(side: Side, stats: DiffStats) -> String {
    match side {
        Side::Old => format!(" Old (-{}) ", stats.deletions),
        Side::New => format!(" New (+{}) ", stats.additions),
    }
}

fn render_pane(frame: &mut Frame, app: &App, area: Rect, side: Side, stats: DiffStats) {
    let title = pane_title(side, stats);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(app.theme.border_style(app.focus == Focus::Diff))
        .title(title);

    let height = area.height.saturating_sub(2) as usize;
    let lines = column_lines(app, side, height);
    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(app.theme.context_fg))
        .block(block);
    frame.render_widget(paragraph, area);
}

/// Render both columns; the scroll offset is clamped to the new height
pub fn render_side_by_side(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    app.viewport_height = chunks[0].height.saturating_sub(2) as usize;
    app.scroll_by(0);

    let stats = DiffStats::from_rows(&app.rows);
    render_pane(frame, app, chunks[0], Side::Old, stats);
    render_pane(frame, app, chunks[1], Side::New, stats);
}
