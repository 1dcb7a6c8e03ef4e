//! Color themes
//!
//! A theme is a plain value handed to the views; switching themes replaces
//! the value on the app instead of touching shared style state.

use ratatui::style::{Color, Modifier, Style};
use sidediff_core::{FileStatus, Paint};

/// All built-in theme names, in cycling order
const THEME_NAMES: [&str; 9] = [
    "dark",
    "light",
    "high-contrast",
    "solarized",
    "dracula",
    "github",
    "catppuccin",
    "tokyo-night",
    "one-dark",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,

    // Diff colors
    pub addition_bg: Color,
    pub addition_fg: Color,
    pub deletion_bg: Color,
    pub deletion_fg: Color,
    pub context_fg: Color,
    pub header_fg: Color,

    // Chrome
    pub border: Color,
    pub focused_border: Color,
    pub title_fg: Color,

    // File list
    pub modified_fg: Color,
    pub added_fg: Color,
    pub deleted_fg: Color,

    pub background: Color,
    pub foreground: Color,

    /// Hex sources of the colors above
    pub palette: Palette,
}

/// Hex color strings a theme is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub addition_bg: &'static str,
    pub addition_fg: &'static str,
    pub deletion_bg: &'static str,
    pub deletion_fg: &'static str,
    pub context_fg: &'static str,
    pub header_fg: &'static str,
    pub border: &'static str,
    pub focused_border: &'static str,
    pub title_fg: &'static str,
    pub modified_fg: &'static str,
    pub added_fg: &'static str,
    pub deleted_fg: &'static str,
    pub background: &'static str,
    pub foreground: &'static str,
}

fn hex(value: &str) -> Color {
    value.parse().unwrap_or(Color::Reset)
}

impl Theme {
    fn from_palette(name: &'static str, p: Palette) -> Self {
        Self {
            name,
            addition_bg: hex(p.addition_bg),
            addition_fg: hex(p.addition_fg),
            deletion_bg: hex(p.deletion_bg),
            deletion_fg: hex(p.deletion_fg),
            context_fg: hex(p.context_fg),
            header_fg: hex(p.header_fg),
            border: hex(p.border),
            focused_border: hex(p.focused_border),
            title_fg: hex(p.title_fg),
            modified_fg: hex(p.modified_fg),
            added_fg: hex(p.added_fg),
            deleted_fg: hex(p.deleted_fg),
            background: hex(p.background),
            foreground: hex(p.foreground),
            palette: p,
        }
    }

    fn dark() -> Self {
        Self::from_palette(
            "dark",
            Palette {
                addition_bg: "#1a3a1a",
                addition_fg: "#43BF6D",
                deletion_bg: "#3a1a1a",
                deletion_fg: "#E05252",
                context_fg: "#8B8B8B",
                header_fg: "#666666",
                border: "#5C5C5C",
                focused_border: "#A855F7",
                title_fg: "#FFFFFF",
                modified_fg: "#F5C842",
                added_fg: "#43BF6D",
                deleted_fg: "#E05252",
                background: "#000000",
                foreground: "#FFFFFF",
            },
        )
    }

    pub fn names() -> &'static [&'static str] {
        &THEME_NAMES
    }

    pub fn by_name(name: &str) -> Option<Self> {
        let palette = match name {
            "dark" => return Some(Self::dark()),
            "light" => Palette {
                addition_bg: "#D4F1D4",
                addition_fg: "#0B6622",
                deletion_bg: "#F1D4D4",
                deletion_fg: "#B62020",
                context_fg: "#4A4A4A",
                header_fg: "#6A6A6A",
                border: "#CCCCCC",
                focused_border: "#8B5CF6",
                title_fg: "#000000",
                modified_fg: "#D97706",
                added_fg: "#16A34A",
                deleted_fg: "#DC2626",
                background: "#FFFFFF",
                foreground: "#000000",
            },
            "high-contrast" => Palette {
                addition_bg: "#003300",
                addition_fg: "#00FF00",
                deletion_bg: "#330000",
                deletion_fg: "#FF0000",
                context_fg: "#FFFFFF",
                header_fg: "#FFFF00",
                border: "#FFFFFF",
                focused_border: "#FFFF00",
                title_fg: "#FFFFFF",
                modified_fg: "#FFFF00",
                added_fg: "#00FF00",
                deleted_fg: "#FF0000",
                background: "#000000",
                foreground: "#FFFFFF",
            },
            "solarized" => Palette {
                addition_bg: "#0D3A2E",
                addition_fg: "#859900",
                deletion_bg: "#3A0D0D",
                deletion_fg: "#DC322F",
                context_fg: "#657B83",
                header_fg: "#586E75",
                border: "#073642",
                focused_border: "#6C71C4",
                title_fg: "#839496",
                modified_fg: "#B58900",
                added_fg: "#859900",
                deleted_fg: "#DC322F",
                background: "#002B36",
                foreground: "#839496",
            },
            "dracula" => Palette {
                addition_bg: "#1A2A1A",
                addition_fg: "#50FA7B",
                deletion_bg: "#2A1A1A",
                deletion_fg: "#FF5555",
                context_fg: "#F8F8F2",
                header_fg: "#6272A4",
                border: "#44475A",
                focused_border: "#BD93F9",
                title_fg: "#F8F8F2",
                modified_fg: "#F1FA8C",
                added_fg: "#50FA7B",
                deleted_fg: "#FF5555",
                background: "#282A36",
                foreground: "#F8F8F2",
            },
            "github" => Palette {
                addition_bg: "#E6FFED",
                addition_fg: "#24292F",
                deletion_bg: "#FFEBE9",
                deletion_fg: "#24292F",
                context_fg: "#57606A",
                header_fg: "#6E7781",
                border: "#D0D7DE",
                focused_border: "#0969DA",
                title_fg: "#24292F",
                modified_fg: "#9A6700",
                added_fg: "#1A7F37",
                deleted_fg: "#CF222E",
                background: "#FFFFFF",
                foreground: "#24292F",
            },
            "catppuccin" => Palette {
                addition_bg: "#1E2D2F",
                addition_fg: "#A6E3A1",
                deletion_bg: "#2D1E1E",
                deletion_fg: "#F38BA8",
                context_fg: "#CDD6F4",
                header_fg: "#6C7086",
                border: "#45475A",
                focused_border: "#CBA6F7",
                title_fg: "#CDD6F4",
                modified_fg: "#F9E2AF",
                added_fg: "#A6E3A1",
                deleted_fg: "#F38BA8",
                background: "#1E1E2E",
                foreground: "#CDD6F4",
            },
            "tokyo-night" => Palette {
                addition_bg: "#1A2B32",
                addition_fg: "#9ECE6A",
                deletion_bg: "#2B1A1A",
                deletion_fg: "#F7768E",
                context_fg: "#A9B1D6",
                header_fg: "#565F89",
                border: "#3B4261",
                focused_border: "#BB9AF7",
                title_fg: "#C0CAF5",
                modified_fg: "#E0AF68",
                added_fg: "#9ECE6A",
                deleted_fg: "#F7768E",
                background: "#1A1B26",
                foreground: "#A9B1D6",
            },
            "one-dark" => Palette {
                addition_bg: "#1C2B1F",
                addition_fg: "#98C379",
                deletion_bg: "#2B1C1C",
                deletion_fg: "#E06C75",
                context_fg: "#ABB2BF",
                header_fg: "#5C6370",
                border: "#3E4451",
                focused_border: "#C678DD",
                title_fg: "#DCDFE4",
                modified_fg: "#E5C07B",
                added_fg: "#98C379",
                deleted_fg: "#E06C75",
                background: "#282C34",
                foreground: "#ABB2BF",
            },
            _ => return None,
        };

        let name = THEME_NAMES.iter().copied().find(|n| *n == name)?;
        Some(Self::from_palette(name, palette))
    }

    /// The theme after this one in cycling order
    pub fn next(&self) -> Self {
        let idx = THEME_NAMES
            .iter()
            .position(|n| *n == self.name)
            .unwrap_or(0);
        let next = THEME_NAMES[(idx + 1) % THEME_NAMES.len()];
        Self::by_name(next).unwrap_or_default()
    }

    pub fn paint_style(&self, paint: Paint) -> Style {
        match paint {
            Paint::Addition => Style::default().fg(self.addition_fg).bg(self.addition_bg),
            Paint::Deletion => Style::default().fg(self.deletion_fg).bg(self.deletion_bg),
            Paint::HeaderRule | Paint::Header => Style::default().fg(self.header_fg),
            Paint::Plain => Style::default().fg(self.context_fg),
            Paint::Blank => Style::default(),
        }
    }

    pub fn status_style(&self, status: FileStatus) -> Style {
        let fg = match status {
            FileStatus::Modified | FileStatus::Renamed => self.modified_fg,
            FileStatus::Added => self.added_fg,
            FileStatus::Deleted => self.deleted_fg,
            FileStatus::Unknown => self.foreground,
        };
        Style::default().fg(fg).add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.focused_border
        } else {
            self.border
        })
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.title_fg)
            .bg(self.focused_border)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.title_fg)
            .bg(self.focused_border)
            .add_modifier(Modifier::BOLD)
    }

    pub fn footer_style(&self) -> Style {
        Style::default().fg(self.context_fg)
    }

    /// Highlight for search matches; the current match is reversed as well
    pub fn match_style(&self, current: bool) -> Style {
        let style = Style::default().fg(self.background).bg(self.modified_fg);
        if current {
            style.add_modifier(Modifier::REVERSED | Modifier::BOLD)
        } else {
            style
        }
    }
}

/// A three-cell 24-bit background swatch followed by the hex value
fn swatch_line(label: &str, value: &str) -> String {
    let (r, g, b) = match hex(value) {
        Color::Rgb(r, g, b) => (r, g, b),
        _ => (0, 0, 0),
    };
    format!(
        "  {:<20} \x1b[48;2;{};{};{}m   \x1b[0m  {}\n",
        format!("  {}:", label),
        r,
        g,
        b,
        value
    )
}

impl Theme {
    /// Printable preview of every color in the theme, grouped by use
    pub fn color_preview(&self) -> String {
        let p = &self.palette;
        let groups: [(&str, &[(&str, &str)]); 4] = [
            (
                "Diff Colors",
                &[
                    ("Addition (text)", p.addition_fg),
                    ("Addition (bg)", p.addition_bg),
                    ("Deletion (text)", p.deletion_fg),
                    ("Deletion (bg)", p.deletion_bg),
                    ("Context", p.context_fg),
                    ("Headers", p.header_fg),
                ],
            ),
            (
                "UI Colors",
                &[
                    ("Focused border", p.focused_border),
                    ("Border", p.border),
                    ("Title", p.title_fg),
                ],
            ),
            (
                "File List Colors",
                &[
                    ("Modified", p.modified_fg),
                    ("Added", p.added_fg),
                    ("Deleted", p.deleted_fg),
                ],
            ),
            (
                "General",
                &[("Background", p.background), ("Foreground", p.foreground)],
            ),
        ];

        let mut out = format!("Theme: {}\n{}\n\n", self.name, "─".repeat(50));
        for (title, colors) in groups {
            out.push_str(title);
            out.push_str(":\n");
            for (label, value) in colors {
                out.push_str(&swatch_line(label, value));
            }
            out.push('\n');
        }
        out
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
