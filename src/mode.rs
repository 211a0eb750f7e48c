//! Display modes for the picker.
//!
//! Each mode fixes one color channel; the 2-D field explores the remaining
//! two. `Alpha` exists only for the opacity spinner and slider — it is never
//! a valid field mode.

use std::fmt;

/// The color channel a control operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickerMode {
    Hue,
    Saturation,
    Brightness,
    Red,
    Green,
    Blue,
    Alpha,
}

/// The six modes the 2-D color field can display, in display order.
pub const FIELD_MODES: [PickerMode; 6] = [
    PickerMode::Hue,
    PickerMode::Saturation,
    PickerMode::Brightness,
    PickerMode::Red,
    PickerMode::Green,
    PickerMode::Blue,
];

impl PickerMode {
    /// The integer maximum of this channel's display range.
    pub fn max(&self) -> i32 {
        match self {
            PickerMode::Hue => 360,
            PickerMode::Saturation | PickerMode::Brightness => 100,
            PickerMode::Red | PickerMode::Green | PickerMode::Blue | PickerMode::Alpha => 255,
        }
    }

    /// Whether the 2-D field accepts this mode.
    pub fn is_field_mode(&self) -> bool {
        !matches!(self, PickerMode::Alpha)
    }

    /// Whether this mode's field renders as a disc (hue on the angle axis).
    pub(crate) fn is_disc(&self) -> bool {
        matches!(self, PickerMode::Saturation | PickerMode::Brightness)
    }

    /// Whether this mode fixes an RGB channel (square field over the other two).
    pub(crate) fn is_rgb(&self) -> bool {
        matches!(self, PickerMode::Red | PickerMode::Green | PickerMode::Blue)
    }
}

impl fmt::Display for PickerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PickerMode::Hue => "hue",
            PickerMode::Saturation => "saturation",
            PickerMode::Brightness => "brightness",
            PickerMode::Red => "red",
            PickerMode::Green => "green",
            PickerMode::Blue => "blue",
            PickerMode::Alpha => "alpha",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_maxima() {
        assert_eq!(PickerMode::Hue.max(), 360);
        assert_eq!(PickerMode::Saturation.max(), 100);
        assert_eq!(PickerMode::Brightness.max(), 100);
        assert_eq!(PickerMode::Red.max(), 255);
        assert_eq!(PickerMode::Alpha.max(), 255);
    }

    #[test]
    fn alpha_is_not_a_field_mode() {
        assert!(!PickerMode::Alpha.is_field_mode());
        for mode in FIELD_MODES {
            assert!(mode.is_field_mode());
        }
    }

    #[test]
    fn disc_modes_are_saturation_and_brightness() {
        assert!(PickerMode::Saturation.is_disc());
        assert!(PickerMode::Brightness.is_disc());
        assert!(!PickerMode::Hue.is_disc());
        assert!(!PickerMode::Red.is_disc());
    }
}
