//! ChromaColor — the public color representation for floem-chroma.
//!
//! Stores RGBA as four 8-bit channels. HSB views are derived on demand; the
//! models keep their own hue/saturation floats so achromatic colors do not
//! lose hue across round trips.

use crate::math;

/// RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChromaColor {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl ChromaColor {
    pub const BLACK: Self = Self::from_rgb(0, 0, 0);

    /// Create from 0–255 RGB values with full opacity.
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create from 0–255 RGBA values.
    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Red component (0–255).
    pub fn red(&self) -> u8 {
        self.r
    }
    /// Green component (0–255).
    pub fn green(&self) -> u8 {
        self.g
    }
    /// Blue component (0–255).
    pub fn blue(&self) -> u8 {
        self.b
    }
    /// Alpha component (0–255, 255 = opaque).
    pub fn alpha(&self) -> u8 {
        self.a
    }

    /// The RGB triple, alpha dropped.
    pub fn to_rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Replace the alpha channel.
    pub fn with_alpha(&self, a: u8) -> Self {
        Self { a, ..*self }
    }

    /// Create from HSB values with full opacity. Hue wraps; saturation and
    /// brightness are expected in 0.0–1.0.
    pub fn from_hsb(h: f32, s: f32, b: f32) -> Self {
        let (r, g, bl) = math::hsb_to_rgb(math::wrap_hue(h), s, b);
        Self {
            r: (r * 255.0).round() as u8,
            g: (g * 255.0).round() as u8,
            b: (bl * 255.0).round() as u8,
            a: 255,
        }
    }

    /// Convert to HSB (all 0.0–1.0). Returns (h, s, b); hue is 0.0 for
    /// achromatic colors.
    pub fn to_hsb(&self) -> (f32, f32, f32) {
        math::rgb_to_hsb(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }

    /// Parse a 6-digit hex string (`#` optional). Returns `None` for any
    /// other length or non-hex characters; alpha defaults to opaque.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let stripped = hex.trim_start_matches('#');
        if stripped.len() != 6 || !stripped.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let r = u8::from_str_radix(&stripped[0..2], 16).ok()?;
        let g = u8::from_str_radix(&stripped[2..4], 16).ok()?;
        let b = u8::from_str_radix(&stripped[4..6], 16).ok()?;
        Some(Self::from_rgb(r, g, b))
    }

    /// Format as 6 lowercase hex digits (no `#` prefix, alpha dropped).
    pub fn to_hex(&self) -> String {
        format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let c = ChromaColor::from_hex("3B82F6").unwrap();
        assert_eq!(c.to_rgb(), (0x3b, 0x82, 0xf6));
        assert_eq!(c.to_hex(), "3b82f6");
        assert_eq!(ChromaColor::from_hex("#3b82f6"), Some(c));
    }

    #[test]
    fn hex_rejects_garbage() {
        assert_eq!(ChromaColor::from_hex("xyzxyz"), None);
        assert_eq!(ChromaColor::from_hex("fff"), None);
        assert_eq!(ChromaColor::from_hex("facade00"), None);
        assert_eq!(ChromaColor::from_hex(""), None);
    }

    #[test]
    fn facade_resolves_to_expected_rgb() {
        let c = ChromaColor::from_hex("FACADE").unwrap();
        assert_eq!(c.to_rgb(), (250, 202, 222));

        // Standard RGB→HSB conversion lands near 335°, 19%, 98%.
        let (h, s, b) = c.to_hsb();
        assert_eq!((h * 360.0).round() as i32, 335);
        assert_eq!((s * 100.0).round() as i32, 19);
        assert_eq!((b * 100.0).round() as i32, 98);
    }

    #[test]
    fn rgb_hsb_rgb_is_stable() {
        for &(r, g, b) in &[(250u8, 202u8, 222u8), (0, 0, 0), (255, 255, 255), (12, 200, 99)] {
            let c = ChromaColor::from_rgb(r, g, b);
            let (h, s, v) = c.to_hsb();
            assert_eq!(ChromaColor::from_hsb(h, s, v).to_rgb(), (r, g, b));
        }
    }

    #[test]
    fn default_is_transparent_black() {
        let c = ChromaColor::default();
        assert_eq!((c.red(), c.green(), c.blue(), c.alpha()), (0, 0, 0, 0));
        assert_eq!(ChromaColor::BLACK.alpha(), 255);
    }
}
