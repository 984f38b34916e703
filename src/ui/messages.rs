//! Coloured one-line status messages for the terminal.
//!
//! Colours are dropped when `NO_COLOR` is set to a non-empty value.

use std::fmt;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Warning,
    Error,
}

impl Tone {
    fn color(self) -> &'static str {
        match self {
            Tone::Info => "\x1b[34m",
            Tone::Success => "\x1b[32m",
            Tone::Warning => "\x1b[33m",
            Tone::Error => "\x1b[31m",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Tone::Info => "ℹ️",
            Tone::Success => "✅",
            Tone::Warning => "⚠️",
            Tone::Error => "❌",
        }
    }
}

fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none_or(|v| v.is_empty())
}

/// One status line, with or without ANSI colours.
pub fn render<T: fmt::Display>(tone: Tone, msg: T, color: bool) -> String {
    if color {
        format!("{}{}{} {}{}", tone.color(), BOLD, tone.icon(), RESET, msg)
    } else {
        format!("{} {}", tone.icon(), msg)
    }
}

/// Banner printed above the output of a sync run.
pub fn render_header<T: fmt::Display>(msg: T, color: bool) -> String {
    if color {
        format!("{}{}====================== {}\n{}", Tone::Info.color(), BOLD, msg, RESET)
    } else {
        format!("====================== {}\n", msg)
    }
}

pub fn info<T: fmt::Display>(msg: T) {
    println!("{}", render(Tone::Info, msg, colors_enabled()));
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{}", render(Tone::Success, msg, colors_enabled()));
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{}", render(Tone::Warning, msg, colors_enabled()));
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{}", render(Tone::Error, msg, colors_enabled()));
}

pub fn header<T: fmt::Display>(msg: T) {
    println!("{}", render_header(msg, colors_enabled()));
}
