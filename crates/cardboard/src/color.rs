//! Terminal colors for card output.
//!
//! Everything goes through `owo-colors`' `if_supports_color()`, which handles
//! `NO_COLOR`, `FORCE_COLOR`, and TTY detection. `--no-color` sets an
//! in-process flag that short-circuits all styling.

use std::sync::atomic::{AtomicBool, Ordering};

use owo_colors::OwoColorize;
use owo_colors::Stream::{self, Stderr, Stdout};

static NO_COLOR_FLAG: AtomicBool = AtomicBool::new(false);

/// Called once from `main` when `--no-color` is passed.
pub fn set_no_color() {
    NO_COLOR_FLAG.store(true, Ordering::Relaxed);
}

#[derive(Debug, Clone, Copy)]
struct Rgb {
    r: u8,
    g: u8,
    b: u8,
}

impl Rgb {
    const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
        }
    }
}

const KRAFT: Rgb = Rgb::from_hex(0xC8A46E); // card titles
const LINK: Rgb = Rgb::from_hex(0x6FA8DC); // urls
const FRESH: Rgb = Rgb::from_hex(0x7FB069); // healthy poll status
const STALE: Rgb = Rgb::from_hex(0xE0A458); // backing off
const FAULT: Rgb = Rgb::from_hex(0xD1495B); // errors
const DIM: Rgb = Rgb::from_hex(0x6C757D); // borders, hints

fn no_color() -> bool {
    NO_COLOR_FLAG.load(Ordering::Relaxed)
}

fn paint(text: &str, stream: Stream, rgb: Rgb) -> String {
    if no_color() {
        return text.to_string();
    }
    text.if_supports_color(stream, |t| t.truecolor(rgb.r, rgb.g, rgb.b))
        .to_string()
}

pub fn title(text: &str) -> String {
    paint(text, Stdout, KRAFT)
}

pub fn link(text: &str) -> String {
    paint(text, Stdout, LINK)
}

pub fn fresh(text: &str) -> String {
    paint(text, Stdout, FRESH)
}

pub fn muted(text: &str) -> String {
    paint(text, Stdout, DIM)
}

/// Bold, for table headers.
pub fn bold(text: &str) -> String {
    if no_color() {
        return text.to_string();
    }
    text.if_supports_color(Stdout, |t| t.bold()).to_string()
}

/// Error styling for stderr messages.
pub fn error(text: &str) -> String {
    paint(text, Stderr, FAULT)
}

/// Warning styling for stderr messages.
pub fn warning(text: &str) -> String {
    paint(text, Stderr, STALE)
}

pub fn hint(text: &str) -> String {
    paint(text, Stderr, DIM)
}
