//! Formatting utilities for terminal output

use crate::core::{Piece, Tube};
use colored::{Color, Colorize};

const PIECE_COLORS: [Color; 8] = [
    Color::BrightWhite,
    Color::BrightYellow,
    Color::BrightGreen,
    Color::BrightCyan,
    Color::BrightBlue,
    Color::BrightMagenta,
    Color::BrightRed,
    Color::Yellow,
];

/// Colour for a piece value, cycling through the palette by exponent
#[must_use]
pub const fn piece_color(value: Piece) -> Color {
    let exponent = value.trailing_zeros() as usize;
    PIECE_COLORS[exponent.saturating_sub(1) % PIECE_COLORS.len()]
}

/// A tube as one line: pieces bottom to top, free slots as dots
#[must_use]
pub fn format_tube(tube: &Tube) -> String {
    let mut cells: Vec<String> = tube
        .pieces()
        .iter()
        .map(|&v| format!("{v:>4}").color(piece_color(v)).bold().to_string())
        .collect();
    cells.extend((0..tube.free_slots()).map(|_| format!("{:>4}", "·").bright_black().to_string()));
    format!("│{} │", cells.concat())
}

/// Create a progress bar string
#[must_use]
pub fn create_progress_bar(value: f64, max: f64, width: usize) -> String {
    // Cast is safe: values are clamped to [0, width]
    let filled = if max > 0.0 {
        ((value / max) * width as f64) as usize
    } else {
        0
    };
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Integer with thousands separators
#[must_use]
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Optional move count, `-` when unknown
#[must_use]
pub fn format_moves(moves: Option<usize>) -> String {
    moves.map_or_else(|| "-".to_string(), |m| m.to_string())
}
