//! Themed, single-line status messages.
//!
//! Colour is applied only when the caller says the target stream supports it,
//! so the same functions serve terminals, pipes and test buffers.

use owo_colors::OwoColorize;
use std::io::{self, Write};

use crate::ui::theme::{ThemeEntry, ThemeMap};

/// Writes `text` styled with the colour of `entry`, or plain when colour is off.
pub fn write_styled<W: Write + ?Sized>(
    writer: &mut W,
    text: &str,
    entry: ThemeEntry,
    theme: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    let color = theme.get(&entry).and_then(|style| style.fg.as_ref());
    match color {
        Some(color) if supports_color => write!(writer, "{}", text.color(color.to_ansi_color())),
        _ => write!(writer, "{}", text),
    }
}

fn print_message<W: Write + ?Sized>(
    writer: &mut W,
    message: &str,
    entry: ThemeEntry,
    theme: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    write_styled(writer, message, entry, theme, supports_color)?;
    writeln!(writer)
}

pub fn print_info_message<W: Write + ?Sized>(writer: &mut W, message: &str, theme: &ThemeMap, supports_color: bool) -> io::Result<()> {
    print_message(writer, message, ThemeEntry::Info, theme, supports_color)
}

pub fn print_success_message<W: Write + ?Sized>(writer: &mut W, message: &str, theme: &ThemeMap, supports_color: bool) -> io::Result<()> {
    print_message(writer, message, ThemeEntry::Success, theme, supports_color)
}

pub fn print_warn_message<W: Write + ?Sized>(writer: &mut W, message: &str, theme: &ThemeMap, supports_color: bool) -> io::Result<()> {
    print_message(writer, message, ThemeEntry::Warn, theme, supports_color)
}

pub fn print_error_message<W: Write + ?Sized>(writer: &mut W, message: &str, theme: &ThemeMap, supports_color: bool) -> io::Result<()> {
    print_message(writer, message, ThemeEntry::Error, theme, supports_color)
}
