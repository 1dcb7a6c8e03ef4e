//! Application state and logic

use crate::config::{Config, ContextMode, KeyBindings};
use crate::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use sidediff_core::{
    ContextLines, DiffMode, DiffRequest, DiffRow, DiffSource, FileStat, GitError, SearchState,
};
use std::time::{Duration, Instant};

/// How long transient status messages stay visible
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(2);
/// Diff lines moved per mouse wheel notch
const MOUSE_SCROLL_LINES: isize = 3;

/// Which pane receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    FileList,
    Diff,
}

/// Startup options resolved from CLI flags and config
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub diff_mode: DiffMode,
    pub range: Option<String>,
    /// Context used when not in full-context mode
    pub context: ContextLines,
    pub full_context: bool,
    pub show_line_numbers: bool,
    pub theme: Theme,
    pub keys: KeyBindings,
    /// File to select once the list is loaded
    pub initial_file: Option<String>,
    /// Git branch name, shown in the title bar
    pub branch: Option<String>,
}

impl AppOptions {
    pub fn from_config(config: &Config, theme: Theme) -> Self {
        Self {
            diff_mode: config.diff_mode,
            range: None,
            context: ContextLines::Default,
            full_context: config.context_mode == ContextMode::Full,
            show_line_numbers: config.line_numbers,
            theme,
            keys: config.keys.clone(),
            initial_file: None,
            branch: None,
        }
    }
}

/// The main application state
pub struct App {
    source: Box<dyn DiffSource>,
    /// Changed files shown in the sidebar
    pub files: Vec<FileStat>,
    pub selected_file: usize,
    pub focus: Focus,
    /// Aligned rows for the selected file
    pub rows: Vec<DiffRow>,
    /// Scroll offset shared by both diff panes, in display lines
    pub scroll_offset: usize,
    /// Height of the diff panes at the last render
    pub viewport_height: usize,
    pub show_line_numbers: bool,
    pub full_context: bool,
    pub diff_mode: DiffMode,
    pub branch: Option<String>,
    range: Option<String>,
    context: ContextLines,
    pub theme: Theme,
    pub keys: KeyBindings,
    pub search: SearchState,
    /// True while the search prompt is taking input
    pub search_mode: bool,
    pub search_input: String,
    /// Error shown in place of the diff panes
    pub error: Option<String>,
    status_message: Option<(String, Instant)>,
    pub should_quit: bool,
}

impl App {
    pub fn new(source: Box<dyn DiffSource>, options: AppOptions) -> Self {
        let mut app = Self {
            source,
            files: Vec::new(),
            selected_file: 0,
            focus: Focus::FileList,
            rows: Vec::new(),
            scroll_offset: 0,
            viewport_height: 0,
            show_line_numbers: options.show_line_numbers,
            full_context: options.full_context,
            diff_mode: options.diff_mode,
            branch: options.branch,
            range: options.range,
            context: options.context,
            theme: options.theme,
            keys: options.keys,
            search: SearchState::new(),
            search_mode: false,
            search_input: String::new(),
            error: None,
            status_message: None,
            should_quit: false,
        };
        app.load_files(options.initial_file.as_deref());
        app
    }

    fn base_request(&self) -> DiffRequest {
        let mut request = DiffRequest::new(self.diff_mode).with_context(if self.full_context {
            ContextLines::Full
        } else {
            self.context
        });
        if let Some(range) = &self.range {
            request = request.with_range_spec(range.clone());
        }
        request
    }

    pub fn current_file(&self) -> Option<&FileStat> {
        self.files.get(self.selected_file)
    }

    /// Reload the file list and select `initial` (or the first file)
    pub fn load_files(&mut self, initial: Option<&str>) {
        match self.source.modified_files(&self.base_request()) {
            Ok(files) if files.is_empty() => {
                self.files.clear();
                self.rows.clear();
                self.error = Some(self.empty_message().to_string());
            }
            Ok(files) => {
                self.files = files;
                self.selected_file = initial
                    .and_then(|path| self.files.iter().position(|f| f.path == path))
                    .unwrap_or(0);
                self.error = None;
                self.load_selected_diff();
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to list changed files");
                self.error = Some(err.to_string());
            }
        }
    }

    fn empty_message(&self) -> &'static str {
        if self.range.is_some() {
            return "No changes found in the given commit range.";
        }
        match self.diff_mode {
            DiffMode::Staged => {
                "No staged changes found.\n\nTry one of the following:\n  • Run 'git add <file>' to stage some changes\n  • Use --unstaged to see unstaged changes\n  • Remove --staged flag to see all changes"
            }
            DiffMode::Unstaged => {
                "No unstaged changes found.\n\nTry one of the following:\n  • Use --staged to see staged changes\n  • Remove --unstaged flag to see all changes\n  • Make some changes to your working directory"
            }
            DiffMode::All => {
                "No changes found in the repository.\n\nMake sure you have:\n  • Modified some files in your working directory\n  • Staged some changes with 'git add'\n  • Checked that you're in a git repository"
            }
        }
    }

    /// Load rows for the selected file and reset scrolling
    pub fn load_selected_diff(&mut self) {
        let Some(file) = self.current_file() else {
            return;
        };
        let request = self.base_request().with_path(file.path.clone());

        match self.source.load_rows(&request) {
            Ok(rows) => self.show_rows(rows),
            // Keep whatever was aligned before the read failed
            Err(GitError::Align(err)) => {
                tracing::warn!(error = %err, "diff output cut short");
                self.set_status(format!("Diff incomplete: {}", err));
                self.show_rows(err.into_partial_rows());
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to load diff");
                self.error = Some(err.to_string());
            }
        }
    }

    fn show_rows(&mut self, rows: Vec<DiffRow>) {
        self.rows = rows;
        self.error = None;
        self.scroll_offset = 0;
        self.refresh_search();
    }

    pub fn select_next_file(&mut self) {
        if self.selected_file + 1 < self.files.len() {
            self.selected_file += 1;
            self.load_selected_diff();
        }
    }

    pub fn select_prev_file(&mut self) {
        if self.selected_file > 0 {
            self.selected_file -= 1;
            self.load_selected_diff();
        }
    }

    /// Number of display lines in each diff pane; headers take two
    pub fn display_line_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| if row.is_header() { 2 } else { 1 })
            .sum()
    }

    /// Display line where `row_index` starts
    pub fn display_line_of_row(&self, row_index: usize) -> usize {
        self.rows
            .iter()
            .take(row_index)
            .map(|row| if row.is_header() { 2 } else { 1 })
            .sum()
    }

    fn max_scroll(&self) -> usize {
        self.display_line_count()
            .saturating_sub(self.viewport_height.max(1))
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let target = self.scroll_offset.saturating_add_signed(delta);
        self.scroll_offset = target.min(self.max_scroll());
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.max_scroll();
    }

    fn page(&self) -> isize {
        self.viewport_height.max(1) as isize
    }

    fn scroll_to_current_match(&mut self) {
        if let Some(row_index) = self.search.current().map(|m| m.row_index) {
            self.scroll_offset = self.display_line_of_row(row_index).min(self.max_scroll());
        }
    }

    fn refresh_search(&mut self) {
        if self.search_input.is_empty() {
            self.search.clear();
            return;
        }
        let file_name = self
            .current_file()
            .map(|f| f.path.clone())
            .unwrap_or_default();
        self.search.update(&self.rows, &self.search_input, &file_name);
        self.scroll_to_current_match();
    }

    pub fn toggle_full_context(&mut self) {
        self.full_context = !self.full_context;
        self.load_selected_diff();
    }

    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
        self.set_status(format!("Theme: {}", self.theme.name));
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    /// Status message, if it has not expired yet
    pub fn status_message(&self) -> Option<&str> {
        self.status_message
            .as_ref()
            .filter(|(_, at)| at.elapsed() < STATUS_MESSAGE_TTL)
            .map(|(msg, _)| msg.as_str())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if self.search_mode {
            self.handle_search_key(key);
            return;
        }

        let keys = self.keys.clone();
        match key.code {
            KeyCode::Char(c) if c == keys.quit => self.should_quit = true,
            KeyCode::Esc => {
                if self.search.has_matches() || !self.search_input.is_empty() {
                    self.search_input.clear();
                    self.search.clear();
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Char(c) if c == keys.search => {
                self.search_mode = true;
                self.search_input.clear();
                self.search.clear();
            }
            KeyCode::Char('n') if self.search.has_matches() => {
                self.search.next();
                self.scroll_to_current_match();
            }
            KeyCode::Char('N') => {
                if self.search.prev().is_some() {
                    self.scroll_to_current_match();
                }
            }
            KeyCode::Char(c) if c == keys.toggle_line_numbers => {
                self.show_line_numbers = !self.show_line_numbers;
            }
            KeyCode::Char(c) if c == keys.toggle_context => self.toggle_full_context(),
            KeyCode::Char(c) if c == keys.cycle_theme => self.cycle_theme(),
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::FileList => Focus::Diff,
                    Focus::Diff => Focus::FileList,
                };
            }
            KeyCode::Down => self.move_down(),
            KeyCode::Char(c) if c == keys.next_file => self.move_down(),
            KeyCode::Up => self.move_up(),
            KeyCode::Char(c) if c == keys.prev_file => self.move_up(),
            KeyCode::PageDown => self.scroll_by(self.page()),
            KeyCode::PageUp => self.scroll_by(-self.page()),
            KeyCode::Char('g') | KeyCode::Home => self.scroll_to_top(),
            KeyCode::Char('G') | KeyCode::End => self.scroll_to_bottom(),
            _ => {}
        }
    }

    /// Wheel events scroll the diff panes regardless of focus
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollDown => self.scroll_by(MOUSE_SCROLL_LINES),
            MouseEventKind::ScrollUp => self.scroll_by(-MOUSE_SCROLL_LINES),
            _ => {}
        }
    }

    fn move_down(&mut self) {
        match self.focus {
            Focus::FileList => self.select_next_file(),
            Focus::Diff => self.scroll_by(1),
        }
    }

    fn move_up(&mut self) {
        match self.focus {
            Focus::FileList => self.select_prev_file(),
            Focus::Diff => self.scroll_by(-1),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.search_mode = false;
                self.search_input.clear();
                self.search.clear();
            }
            KeyCode::Enter => self.search_mode = false,
            KeyCode::Backspace => {
                self.search_input.pop();
                self.refresh_search();
            }
            KeyCode::Char(c) => {
                self.search_input.push(c);
                self.refresh_search();
            }
            _ => {}
        }
    }
}
