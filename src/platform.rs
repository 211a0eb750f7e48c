//! Platform conventions that affect dialog layout.

/// Platform-dependent presentation settings.
///
/// [`PlatformConfig::detect`] picks the conventions of the running OS;
/// the explicit constructor lets callers force a convention regardless of
/// platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformConfig {
    affirmative_on_right: bool,
}

impl PlatformConfig {
    /// Settings for the running operating system.
    pub fn detect() -> Self {
        Self {
            affirmative_on_right: cfg!(any(target_os = "macos", target_os = "linux")),
        }
    }

    /// Explicit settings, independent of the running platform.
    pub fn new(affirmative_on_right: bool) -> Self {
        Self {
            affirmative_on_right,
        }
    }

    /// Whether the affirmative button (OK) sits to the right of Cancel.
    pub fn affirmative_on_right(&self) -> bool {
        self.affirmative_on_right
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self::detect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_config_overrides_detection() {
        assert!(PlatformConfig::new(true).affirmative_on_right());
        assert!(!PlatformConfig::new(false).affirmative_on_right());
    }
}
