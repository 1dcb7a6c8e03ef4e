//! Sidebar listing the changed files

use crate::app::{App, Focus};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use sidediff_core::FileStat;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const MAX_PATH_WIDTH: usize = 30;

/// Shorten `s` to at most `max` display columns, ending in "..." when cut
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let budget = max.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push_str("...");
    out
}

fn file_line<'a>(app: &App, file: &FileStat, selected: bool) -> Line<'a> {
    let theme = &app.theme;
    let name = truncate(&file.path, MAX_PATH_WIDTH);
    let pad = MAX_PATH_WIDTH.saturating_sub(name.width()) + 1;
    let name_style = if selected {
        theme.selected_style()
    } else {
        Style::default().fg(theme.foreground)
    };

    Line::from(vec![
        Span::styled(file.status.symbol().to_string(), theme.status_style(file.status)),
        Span::raw(" "),
        Span::styled(format!("{}{}", name, " ".repeat(pad)), name_style),
        Span::styled(
            format!("+{}", file.additions),
            Style::default().fg(theme.added_fg),
        ),
        Span::raw(" "),
        Span::styled(
            format!("-{}", file.deletions),
            Style::default().fg(theme.deleted_fg),
        ),
    ])
}

pub fn render_file_list(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(app.theme.border_style(app.focus == Focus::FileList))
        .title(format!(" Files ({}) ", app.files.len()));

    let height = area.height.saturating_sub(2) as usize;
    // Keep the selection in view
    let start = app.selected_file.saturating_sub(height.saturating_sub(1));

    let lines: Vec<Line> = if app.files.is_empty() {
        vec![Line::from("No modified files")]
    } else {
        app.files
            .iter()
            .enumerate()
            .skip(start)
            .take(height)
            .map(|(idx, file)| file_line(app, file, idx == app.selected_file))
            .collect()
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short() {
        assert_eq!(truncate("src/main.rs", 30), "src/main.rs");
    }

    #[test]
    fn test_truncate_long() {
        let path = "crates/sidediff-core/src/very_long_module_name.rs";
        let out = truncate(path, 30);
        assert_eq!(out.width(), 30);
        assert!(out.ends_with("..."));
        assert!(path.starts_with(out.trim_end_matches("...")));
    }

    #[test]
    fn test_truncate_wide_chars() {
        let out = truncate("日本語のファイル名です.rs", 10);
        assert!(out.width() <= 10);
        assert!(out.ends_with("..."));
    }
}
