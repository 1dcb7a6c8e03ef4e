//! sidediff - side-by-side git diff viewer for the terminal

mod app;
mod config;
mod print;
mod theme;
mod views;

use anyhow::{bail, Context, Result};
use app::{App, AppOptions};
use clap::Parser;
use config::Config;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use sidediff_core::{ContextLines, DiffMode, DiffRequest, DiffSource, DiffStats, GitRepo};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;
use theme::Theme;

/// Environment variable naming a file to write debug logs to
const LOG_ENV: &str = "SIDEDIFF_LOG";
/// Width used for `--print` when stdout is not a terminal
const DEFAULT_PRINT_WIDTH: usize = 160;

#[derive(Parser, Debug)]
#[command(name = "sidediff")]
#[command(version, about = "Side-by-side git diff viewer", long_about = None)]
struct Args {
    /// Open with this file selected (or, with --print, print only this file)
    #[arg(short, long)]
    file: Option<String>,

    /// Show only staged changes
    #[arg(long, conflicts_with_all = ["unstaged", "range"])]
    staged: bool,

    /// Show only unstaged changes
    #[arg(long, conflicts_with = "range")]
    unstaged: bool,

    /// Compare a commit range instead of the working tree (e.g. main..HEAD)
    #[arg(long)]
    range: Option<String>,

    /// Color theme
    #[arg(long)]
    theme: Option<String>,

    /// List available themes and exit
    #[arg(long)]
    list_themes: bool,

    /// Preview the colors of a theme and exit
    #[arg(long, value_name = "NAME")]
    show_theme_colors: Option<String>,

    /// Lines of context around each change
    #[arg(short = 'U', long, conflicts_with = "full")]
    context: Option<u32>,

    /// Show the whole file instead of only the changed regions
    #[arg(long)]
    full: bool,

    /// Hide line numbers
    #[arg(long)]
    no_line_numbers: bool,

    /// Print the diff side by side to stdout instead of opening the viewer
    #[arg(long)]
    print: bool,

    /// Run as if started in this directory
    #[arg(short = 'C', default_value = ".")]
    dir: PathBuf,
}

fn init_tracing() -> Result<()> {
    use std::fs::File;
    use std::sync::Mutex;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_path = match std::env::var(LOG_ENV) {
        Ok(path) => PathBuf::from(path),
        Err(_) => return Ok(()),
    };
    let file = File::options()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(filter)
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(())
}

fn theme_colors(name: &str) -> Result<String> {
    match Theme::by_name(name) {
        Some(theme) => Ok(theme.color_preview()),
        None => bail!(
            "Unknown theme '{}'. Available themes: {}",
            name,
            Theme::names().join(", ")
        ),
    }
}

fn resolve_options(args: &Args, config: &Config) -> Result<AppOptions> {
    let theme_name = args.theme.as_deref().unwrap_or(&config.theme);
    let Some(theme) = Theme::by_name(theme_name) else {
        bail!(
            "Invalid theme '{}'. Available themes: {}",
            theme_name,
            Theme::names().join(", ")
        );
    };

    let mut options = AppOptions::from_config(config, theme);
    if args.staged {
        options.diff_mode = DiffMode::Staged;
    } else if args.unstaged {
        options.diff_mode = DiffMode::Unstaged;
    }
    options.range = args.range.clone();
    if let Some(n) = args.context {
        options.context = ContextLines::Lines(n);
        options.full_context = false;
    }
    if args.full {
        options.full_context = true;
    }
    if args.no_line_numbers {
        options.show_line_numbers = false;
    }
    options.initial_file = args.file.clone();
    Ok(options)
}

fn print_diffs(repo: &GitRepo, options: &AppOptions) -> Result<()> {
    let width = crossterm::terminal::size()
        .map(|(w, _)| w as usize)
        .unwrap_or(DEFAULT_PRINT_WIDTH);

    let mut request = DiffRequest::new(options.diff_mode).with_context(if options.full_context {
        ContextLines::Full
    } else {
        options.context
    });
    if let Some(range) = &options.range {
        request = request.with_range_spec(range.clone());
    }

    let paths: Vec<String> = match &options.initial_file {
        Some(path) => vec![path.clone()],
        None => repo
            .modified_files(&request)?
            .into_iter()
            .map(|f| f.path)
            .collect(),
    };

    for path in paths {
        let rows = repo.load_rows(&request.clone().with_path(path.clone()))?;
        let stats = DiffStats::from_rows(&rows);
        println!("{}", print::file_banner(&path, stats, width));
        print!(
            "{}",
            print::side_by_side(&rows, width, options.show_line_numbers)
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing()?;

    if args.list_themes {
        for name in Theme::names() {
            println!("{}", name);
        }
        return Ok(());
    }
    if let Some(name) = &args.show_theme_colors {
        print!("{}", theme_colors(name)?);
        return Ok(());
    }

    let repo = GitRepo::discover(&args.dir)
        .with_context(|| format!("{} is not inside a git repository", args.dir.display()))?;

    let config = Config::load(Some(repo.root())).unwrap_or_else(|err| {
        eprintln!("Warning: Failed to load config: {:#}", err);
        eprintln!("Using default configuration...");
        Config::default()
    });
    let mut options = resolve_options(&args, &config)?;
    options.branch = sidediff_core::git::get_current_branch(repo.root()).ok();
    tracing::info!(
        root = %repo.root().display(),
        mode = %options.diff_mode,
        theme = options.theme.name,
        "starting"
    );

    if args.print {
        return print_diffs(&repo, &options);
    }

    let mut app = App::new(Box::new(repo), options);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| views::render(frame, app))?;

        // Poll so expiring status messages get redrawn
        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::parse_from(std::iter::once("sidediff").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_overrides_config() {
        let mut config = Config::default();
        config.diff_mode = DiffMode::Unstaged;
        config.theme = "light".to_string();

        let options =
            resolve_options(&parse(&["--staged", "--theme", "dracula", "-U", "7"]), &config)
                .unwrap();
        assert_eq!(options.diff_mode, DiffMode::Staged);
        assert_eq!(options.theme.name, "dracula");
        assert_eq!(options.context, ContextLines::Lines(7));
        assert!(!options.full_context);
    }

    #[test]
    fn test_config_used_without_flags() {
        let mut config = Config::default();
        config.diff_mode = DiffMode::Unstaged;
        config.line_numbers = false;

        let options = resolve_options(&parse(&[]), &config).unwrap();
        assert_eq!(options.diff_mode, DiffMode::Unstaged);
        assert!(!options.show_line_numbers);
        assert_eq!(options.theme.name, "dark");
    }

    #[test]
    fn test_invalid_theme_is_rejected() {
        let err = resolve_options(&parse(&["--theme", "neon"]), &Config::default()).unwrap_err();
        assert!(err.to_string().contains("Available themes: dark, light"));
    }

    #[test]
    fn test_show_theme_colors() {
        let args = parse(&["--show-theme-colors", "dracula"]);
        let out = theme_colors(args.show_theme_colors.as_deref().unwrap()).unwrap();
        assert!(out.starts_with("Theme: dracula\n"));
        assert!(out.contains("#50FA7B"));

        let err = theme_colors("neon").unwrap_err();
        assert!(err.to_string().starts_with("Unknown theme 'neon'"));
    }

    #[test]
    fn test_staged_and_unstaged_conflict() {
        let result = Args::try_parse_from(["sidediff", "--staged", "--unstaged"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_range_and_file_flags() {
        let args = parse(&["--range", "main..HEAD", "--file", "src/lib.rs", "--full"]);
        let options = resolve_options(&args, &Config::default()).unwrap();
        assert_eq!(options.range.as_deref(), Some("main..HEAD"));
        assert_eq!(options.initial_file.as_deref(), Some("src/lib.rs"));
        assert!(options.full_context);
    }
}
