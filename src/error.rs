//! Argument-validation errors for the public model setters.

use crate::mode::PickerMode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChromaError {
    /// An RGB or alpha channel outside [0,255].
    #[error("the {channel} value ({value}) must be between [0,255]")]
    ChannelOutOfRange { channel: &'static str, value: i32 },

    /// A saturation/brightness value outside [0,1], or a non-finite hue.
    #[error("the {channel} value ({value}) must be between [0,1]")]
    UnitOutOfRange { channel: &'static str, value: f32 },

    /// `Alpha` passed where one of the six field modes is required.
    #[error("{0} is not a displayable field mode")]
    NotAFieldMode(PickerMode),
}

pub(crate) fn check_channel(channel: &'static str, value: i32) -> Result<u8, ChromaError> {
    if (0..=255).contains(&value) {
        Ok(value as u8)
    } else {
        Err(ChromaError::ChannelOutOfRange { channel, value })
    }
}

pub(crate) fn check_unit(channel: &'static str, value: f32) -> Result<f32, ChromaError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ChromaError::UnitOutOfRange { channel, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_bounds() {
        assert_eq!(check_channel("red", 0), Ok(0));
        assert_eq!(check_channel("red", 255), Ok(255));
        assert!(check_channel("red", 256).is_err());
        assert!(check_channel("red", -1).is_err());
    }

    #[test]
    fn unit_bounds() {
        assert_eq!(check_unit("saturation", 0.0), Ok(0.0));
        assert_eq!(check_unit("saturation", 1.0), Ok(1.0));
        assert!(check_unit("saturation", 1.01).is_err());
        assert!(check_unit("saturation", -0.01).is_err());
        assert!(check_unit("hue", f32::NAN).is_err());
    }

    #[test]
    fn messages_name_the_channel() {
        let err = check_channel("green", 300).unwrap_err();
        assert_eq!(err.to_string(), "the green value (300) must be between [0,255]");
    }
}
