//! Sizing, color, and styling constants for the picker.

use floem::peniko::Color;

/// 1D slider track height
pub const SLIDER_HEIGHT: f32 = 16.0;

/// Thumb radius on 1D sliders
pub const THUMB_RADIUS: f64 = 7.0;

/// Border radius for slider tracks
pub const RADIUS: f32 = 4.0;

/// Gap between picker elements
pub const GAP: f32 = 8.0;

/// Padding around the whole picker
pub const PADDING: f32 = 8.0;

/// Input field width
pub const INPUT_WIDTH: f32 = 34.0;

/// Hex input field width
pub const HEX_INPUT_WIDTH: f32 = 64.0;

/// Input font size
pub const INPUT_FONT: f32 = 11.0;

/// Label font size
pub const LABEL_FONT: f32 = 10.0;

/// Preview swatch edge length
pub const SWATCH_SIZE: f32 = 50.0;

/// Checkerboard cell size (for alpha backgrounds)
pub const CHECKER_CELL: f64 = 5.0;

/// Focus ring color on the color field
pub const FOCUS_RING: Color = Color::rgba8(64, 120, 242, 180);
