//! Theme and Colors
//!
//! A small palette: red and white for the dex frame, plus one color per
//! notification severity.

use ratatui::style::Color;

use dex_core::Severity;

// ============================================================================
// Frame Colors
// ============================================================================

/// Dex red (borders, title)
pub const DEX_RED: Color = Color::Rgb(220, 60, 60);

/// Screen text inside the sprite panel
pub const SCREEN_TEXT: Color = Color::Rgb(230, 230, 230);

/// Accent for the creature name
pub const NAME_YELLOW: Color = Color::Rgb(255, 214, 80);

/// Input text
pub const INPUT_GREEN: Color = Color::Rgb(130, 220, 130);

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

// ============================================================================
// Notification Colors
// ============================================================================

/// Error red
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Warning amber
pub const WARN_AMBER: Color = Color::Rgb(255, 190, 80);

/// Success green
pub const SUCCESS_GREEN: Color = Color::Rgb(120, 230, 120);

/// Info blue
pub const INFO_BLUE: Color = Color::Rgb(100, 180, 255);

/// Color for a notification severity
#[must_use]
pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Error => ERROR_RED,
        Severity::Warn => WARN_AMBER,
        Severity::Success => SUCCESS_GREEN,
        Severity::Info => INFO_BLUE,
    }
}
