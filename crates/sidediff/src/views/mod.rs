//! View rendering modules

mod file_list;
mod side_by_side;

pub use file_list::render_file_list;
pub use side_by_side::render_side_by_side;

use crate::app::{App, Focus};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

const APP_TITLE: &str = "Git Diff Side-by-Side";

/// Draw the whole screen
pub fn render(frame: &mut Frame, app: &mut App) {
    let search_height = if app.search_mode { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Min(0),    // Body
            Constraint::Length(search_height),
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_title(frame, app, chunks[0]);

    if let Some(error) = app.error.clone() {
        render_error(frame, app, chunks[1], &error);
    } else {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(20), Constraint::Percentage(80)])
            .split(chunks[1]);
        render_file_list(frame, app, body[0]);
        render_side_by_side(frame, app, body[1]);
    }

    if app.search_mode {
        render_search_bar(frame, app, chunks[2]);
    }
    render_footer(frame, app, chunks[3]);
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        format!(" {} ", APP_TITLE),
        app.theme.title_style(),
    )];
    if let Some(branch) = &app.branch {
        spans.push(Span::styled(
            format!(" {}", branch),
            Style::default().fg(app.theme.header_fg),
        ));
    }
    if let Some(message) = app.status_message() {
        spans.push(Span::styled(
            format!(" {}", message),
            Style::default()
                .fg(app.theme.modified_fg)
                .add_modifier(Modifier::BOLD),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_error(frame: &mut Frame, app: &App, area: Rect, error: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(app.theme.deletion_fg));
    let text = format!("Unable to load git diff.\n\n{}", error);
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(app.theme.foreground))
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(paragraph, area);
}

fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled("/", Style::default().fg(app.theme.focused_border)),
        Span::styled(
            app.search_input.clone(),
            Style::default().fg(app.theme.foreground),
        ),
        Span::styled("█", Style::default().fg(app.theme.focused_border)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Key hints plus the current toggle states and search status
pub fn footer_text(app: &App) -> String {
    let keys = &app.keys;
    let numbers = if app.show_line_numbers { "on" } else { "off" };
    let context = if app.full_context { "full" } else { "focus" };
    let focus = match app.focus {
        Focus::FileList => "files",
        Focus::Diff => "diff",
    };

    let mut text = if app.search_mode {
        "enter: confirm • esc: cancel".to_string()
    } else {
        format!(
            "tab: focus ({}) • {}/{}: navigate • {}: search • {}: line numbers ({}) • {}: context ({}) • {}: theme • {}/esc: quit",
            focus,
            keys.next_file,
            keys.prev_file,
            keys.search,
            keys.toggle_line_numbers,
            numbers,
            keys.toggle_context,
            context,
            keys.cycle_theme,
            keys.quit,
        )
    };
    if let Some(status) = app.search.status() {
        text = format!("{} • {}", status, text);
    }
    text
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let footer = Paragraph::new(footer_text(app)).style(app.theme.footer_style());
    frame.render_widget(footer, area);
}
