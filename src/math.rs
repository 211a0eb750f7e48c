//! Color math — direct conversions without external dependencies.
//! All functions use normalized f32 in 0.0–1.0.

/// HSB/HSV → RGB. All values 0.0–1.0.
pub(crate) fn hsb_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    if s == 0.0 {
        return (v, v, v);
    }
    let h6 = (h * 6.0).rem_euclid(6.0);
    let i = h6.floor() as u32;
    let f = h6 - h6.floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match i % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

/// RGB → HSB/HSV. All values 0.0–1.0.
///
/// Hue comes back as 0.0 for achromatic input; callers that need hue
/// stability across round trips must preserve their own hue.
pub(crate) fn rgb_to_hsb(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let v = max;
    let s = if max == 0.0 { 0.0 } else { delta / max };

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        ((g - b) / delta).rem_euclid(6.0) / 6.0
    } else if max == g {
        ((b - r) / delta + 2.0) / 6.0
    } else {
        ((r - g) / delta + 4.0) / 6.0
    };

    (h, s, v)
}

/// Wrap a hue value into [0,1). Hue is cyclic, so 1.3 → 0.3 and -0.2 → 0.8.
pub(crate) fn wrap_hue(h: f32) -> f32 {
    h - h.floor()
}

/// Quantize a normalized channel to a 0–255 byte the way the field raster
/// does (+0.49 additive bias before truncation).
pub(crate) fn unit_to_byte(v: f32) -> u8 {
    let scaled = v * 255.0 + 0.49;
    if scaled <= 0.0 {
        0
    } else if scaled >= 255.0 {
        255
    } else {
        scaled as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn primaries_convert_exactly() {
        assert_eq!(hsb_to_rgb(0.0, 1.0, 1.0), (1.0, 0.0, 0.0));
        assert_eq!(hsb_to_rgb(1.0 / 3.0, 1.0, 1.0), (0.0, 1.0, 0.0));
        assert_eq!(hsb_to_rgb(2.0 / 3.0, 1.0, 1.0), (0.0, 0.0, 1.0));
    }

    #[test]
    fn achromatic_has_zero_saturation() {
        let (h, s, v) = rgb_to_hsb(0.5, 0.5, 0.5);
        assert_eq!(h, 0.0);
        assert_eq!(s, 0.0);
        assert!(close(v, 0.5));
    }

    #[test]
    fn round_trip_chromatic() {
        for &(h, s, v) in &[
            (0.1_f32, 0.8_f32, 0.9_f32),
            (0.42, 0.5, 0.5),
            (0.75, 1.0, 0.25),
            (0.99, 0.3, 0.7),
        ] {
            let (r, g, b) = hsb_to_rgb(h, s, v);
            let (h2, s2, v2) = rgb_to_hsb(r, g, b);
            assert!(close(h, h2), "hue {h} vs {h2}");
            assert!(close(s, s2), "sat {s} vs {s2}");
            assert!(close(v, v2), "bri {v} vs {v2}");
        }
    }

    #[test]
    fn hue_wraps() {
        assert!(close(wrap_hue(1.3), 0.3));
        assert!(close(wrap_hue(-0.2), 0.8));
        assert!(close(wrap_hue(0.0), 0.0));
        assert!(close(wrap_hue(2.0), 0.0));
    }

    #[test]
    fn hue_above_one_matches_wrapped() {
        let a = hsb_to_rgb(1.25, 0.6, 0.6);
        let b = hsb_to_rgb(0.25, 0.6, 0.6);
        assert!(close(a.0, b.0) && close(a.1, b.1) && close(a.2, b.2));
    }

    #[test]
    fn byte_quantization_clamps() {
        assert_eq!(unit_to_byte(0.0), 0);
        assert_eq!(unit_to_byte(1.0), 255);
        assert_eq!(unit_to_byte(-0.5), 0);
        assert_eq!(unit_to_byte(1.5), 255);
    }
}
