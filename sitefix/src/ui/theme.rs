//! Module for managing the application's command-line interface (CLI) theme.
//!
//! This module defines the structure for theme configuration, allowing users
//! to customize the colors of various output elements. It supports 16-color
//! ANSI named colors for foreground styling and provides functionality to
//! load themes from YAML files and manage default theme settings.

use anyhow::{Context, Result};
use owo_colors::AnsiColors;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Type alias for the theme map, providing a consistent type definition.
pub type ThemeMap = HashMap<ThemeEntry, ThemeStyle>;

/// The different logical parts of the output that can be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeEntry {
    /// Style for report titles ("Summary for ...").
    Header,
    /// Style for successful outcomes ("[OK]", "No immediate ... issues").
    Success,
    /// Style for general informational messages.
    Info,
    /// Style for warning messages and hazard counts.
    Warn,
    /// Style for error messages.
    Error,
    /// Style for file paths listed in a summary.
    SummaryPath,
    /// Style for counts in a summary.
    SummaryCount,
    /// Style for lines added in a diff view.
    DiffAdded,
    /// Style for lines removed in a diff view.
    DiffRemoved,
    /// Style for the header of a diff view.
    DiffHeader,
}

impl ThemeEntry {
    pub const ALL: [ThemeEntry; 10] = [
        ThemeEntry::Header,
        ThemeEntry::Success,
        ThemeEntry::Info,
        ThemeEntry::Warn,
        ThemeEntry::Error,
        ThemeEntry::SummaryPath,
        ThemeEntry::SummaryCount,
        ThemeEntry::DiffAdded,
        ThemeEntry::DiffRemoved,
        ThemeEntry::DiffHeader,
    ];
}

/// Represents an ANSI color that can be used in the theme.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ThemeColor {
    /// A named ANSI color (e.g., "red", "brightgreen").
    Named(String),
}

/// Error type for parsing an invalid `ThemeColor` string.
#[derive(Debug, Clone, Error)]
#[error(
    "Invalid theme color; expected one of: black, red, green, yellow, blue, \
    magenta, cyan, white, brightblack, brightred, brightgreen, brightyellow, \
    brightblue, brightmagenta, brightcyan, brightwhite."
)]
pub struct ParseThemeColorError;

impl FromStr for ThemeColor {
    type Err = ParseThemeColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        match lower.as_str() {
            "black" | "red" | "green" | "yellow" | "blue" | "magenta" | "cyan" | "white" |
            "brightblack" | "brightred" | "brightgreen" | "brightyellow" | "brightblue" |
            "brightmagenta" | "brightcyan" | "brightwhite" => Ok(ThemeColor::Named(lower)),
            _ => Err(ParseThemeColorError),
        }
    }
}

impl ThemeColor {
    /// Converts the `ThemeColor` enum variant into its corresponding `owo_colors::AnsiColors`.
    pub fn to_ansi_color(&self) -> AnsiColors {
        match self {
            ThemeColor::Named(name) => match name.as_str() {
                "black" => AnsiColors::Black,
                "red" => AnsiColors::Red,
                "green" => AnsiColors::Green,
                "yellow" => AnsiColors::Yellow,
                "blue" => AnsiColors::Blue,
                "magenta" => AnsiColors::Magenta,
                "cyan" => AnsiColors::Cyan,
                "white" => AnsiColors::White,
                "brightblack" => AnsiColors::BrightBlack,
                "brightred" => AnsiColors::BrightRed,
                "brightgreen" => AnsiColors::BrightGreen,
                "brightyellow" => AnsiColors::BrightYellow,
                "brightblue" => AnsiColors::BrightBlue,
                "brightmagenta" => AnsiColors::BrightMagenta,
                "brightcyan" => AnsiColors::BrightCyan,
                "brightwhite" => AnsiColors::BrightWhite,
                _ => AnsiColors::White,
            },
        }
    }
}

/// Represents the style configuration for a specific `ThemeEntry`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeStyle {
    /// An optional `ThemeColor` to apply as the foreground color.
    pub fg: Option<ThemeColor>,
}

/// Loads a theme configuration from a YAML file or returns the default theme.
pub fn build_theme_map(theme_path: Option<&PathBuf>) -> Result<ThemeMap> {
    if let Some(path) = theme_path {
        ThemeStyle::load_from_file(path)
    } else {
        Ok(ThemeStyle::default_theme_map())
    }
}

impl ThemeStyle {
    /// Loads a theme from YAML; entries the file leaves out fall back to the defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<ThemeMap> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read theme file {}", path.display()))?;
        let mut custom: ThemeMap = serde_yaml::from_str(&text)
            .with_context(|| format!("Failed to parse theme file {}", path.display()))?;

        for (entry, style) in Self::default_theme_map() {
            custom.entry(entry).or_insert(style);
        }
        Ok(custom)
    }

    /// Returns a default theme map with predefined color mappings.
    pub fn default_theme_map() -> ThemeMap {
        let named = |c: &str| ThemeStyle { fg: Some(ThemeColor::Named(c.into())) };
        let mut default_theme = HashMap::new();
        default_theme.insert(ThemeEntry::Header, named("cyan"));
        default_theme.insert(ThemeEntry::Success, named("green"));
        default_theme.insert(ThemeEntry::Warn, named("yellow"));
        default_theme.insert(ThemeEntry::Error, named("red"));
        default_theme.insert(ThemeEntry::SummaryCount, named("brightwhite"));
        default_theme.insert(ThemeEntry::DiffAdded, named("green"));
        default_theme.insert(ThemeEntry::DiffRemoved, named("red"));
        default_theme.insert(ThemeEntry::DiffHeader, named("cyan"));

        for entry in ThemeEntry::ALL {
            default_theme.entry(entry).or_insert_with(|| named("white"));
        }
        default_theme
    }
}
