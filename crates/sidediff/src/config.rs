//! Configuration loading
//!
//! Settings come from the user file (`<config dir>/sidediff/config.toml`)
//! and are then overridden field by field by `.sidediff.toml` in the
//! repository root. Missing files are not an error.

use anyhow::{Context, Result};
use serde::Deserialize;
use sidediff_core::DiffMode;
use std::path::{Path, PathBuf};

pub const REPO_CONFIG_FILE: &str = ".sidediff.toml";

/// How much unchanged text surrounds each change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContextMode {
    /// Git's default few lines of context
    #[default]
    Focus,
    /// The entire file
    Full,
}

impl ContextMode {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "focus" => Some(Self::Focus),
            "full" => Some(Self::Full),
            _ => None,
        }
    }
}

/// Single-key bindings for the main actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    pub search: char,
    pub next_file: char,
    pub prev_file: char,
    pub toggle_line_numbers: char,
    pub toggle_context: char,
    pub cycle_theme: char,
    pub quit: char,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            search: '/',
            next_file: 'j',
            prev_file: 'k',
            toggle_line_numbers: 'n',
            toggle_context: 'c',
            cycle_theme: 't',
            quit: 'q',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub theme: String,
    pub line_numbers: bool,
    pub context_mode: ContextMode,
    pub diff_mode: DiffMode,
    pub keys: KeyBindings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            line_numbers: true,
            context_mode: ContextMode::Focus,
            diff_mode: DiffMode::All,
            keys: KeyBindings::default(),
        }
    }
}

/// On-disk shape: every field optional so a file only overrides what it sets
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    theme: Option<String>,
    line_numbers: Option<bool>,
    context_mode: Option<String>,
    diff_mode: Option<String>,
    keys: KeysFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct KeysFile {
    search: Option<String>,
    next_file: Option<String>,
    prev_file: Option<String>,
    toggle_line_numbers: Option<String>,
    toggle_context: Option<String>,
    cycle_theme: Option<String>,
    quit: Option<String>,
}

fn apply_key(slot: &mut char, name: &str, value: Option<String>) {
    let Some(value) = value else {
        return;
    };
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => *slot = c,
        _ => tracing::warn!(key = name, value = %value, "ignoring key binding that is not a single character"),
    }
}

impl Config {
    /// Path of the per-user config file
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("sidediff").join("config.toml"))
    }

    /// Load the user config, then the repository config from `repo_root`
    pub fn load(repo_root: Option<&Path>) -> Result<Self> {
        let user = Self::user_config_path();
        let repo = repo_root.map(|root| root.join(REPO_CONFIG_FILE));
        Self::load_from(user.as_deref(), repo.as_deref())
    }

    /// Load from explicit file locations; later files win
    pub fn load_from(user: Option<&Path>, repo: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();
        for path in [user, repo].into_iter().flatten() {
            if !path.exists() {
                continue;
            }
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            config.merge_str(&text).with_context(|| {
                format!("Failed to parse config file {}", path.display())
            })?;
            tracing::debug!(path = %path.display(), "loaded config");
        }
        Ok(config)
    }

    /// Override fields set in `text`. Unknown mode values fall back to defaults.
    pub fn merge_str(&mut self, text: &str) -> Result<()> {
        let file: ConfigFile = toml::from_str(text)?;

        if let Some(theme) = file.theme {
            self.theme = theme;
        }
        if let Some(line_numbers) = file.line_numbers {
            self.line_numbers = line_numbers;
        }
        if let Some(mode) = file.context_mode {
            self.context_mode = ContextMode::parse(&mode).unwrap_or_default();
        }
        if let Some(mode) = file.diff_mode {
            self.diff_mode = mode.parse().unwrap_or_default();
        }

        let keys = file.keys;
        apply_key(&mut self.keys.search, "search", keys.search);
        apply_key(&mut self.keys.next_file, "next_file", keys.next_file);
        apply_key(&mut self.keys.prev_file, "prev_file", keys.prev_file);
        apply_key(
            &mut self.keys.toggle_line_numbers,
            "toggle_line_numbers",
            keys.toggle_line_numbers,
        );
        apply_key(&mut self.keys.toggle_context, "toggle_context", keys.toggle_context);
        apply_key(&mut self.keys.cycle_theme, "cycle_theme", keys.cycle_theme);
        apply_key(&mut self.keys.quit, "quit", keys.quit);
        Ok(())
    }
}
