//! Color utilities for theme definitions

use gpui::Hsla;

/// Parse a hex color string to Hsla
/// Supports formats: #RGB, #RRGGBB, #RRGGBBAA
pub fn hex(color: &str) -> Hsla {
    let color = color.trim_start_matches('#');

    let (r, g, b, a) = match color.len() {
        3 => {
            // #RGB
            let r = u8::from_str_radix(&color[0..1].repeat(2), 16).unwrap_or(0);
            let g = u8::from_str_radix(&color[1..2].repeat(2), 16).unwrap_or(0);
            let b = u8::from_str_radix(&color[2..3].repeat(2), 16).unwrap_or(0);
            (r, g, b, 255u8)
        }
        6 => {
            // #RRGGBB
            let r = u8::from_str_radix(&color[0..2], 16).unwrap_or(0);
            let g = u8::from_str_radix(&color[2..4], 16).unwrap_or(0);
            let b = u8::from_str_radix(&color[4..6], 16).unwrap_or(0);
            (r, g, b, 255u8)
        }
        8 => {
            // #RRGGBBAA
            let r = u8::from_str_radix(&color[0..2], 16).unwrap_or(0);
            let g = u8::from_str_radix(&color[2..4], 16).unwrap_or(0);
            let b = u8::from_str_radix(&color[4..6], 16).unwrap_or(0);
            let a = u8::from_str_radix(&color[6..8], 16).unwrap_or(255);
            (r, g, b, a)
        }
        _ => (0, 0, 0, 255),
    };

    rgb_to_hsla(r, g, b, a)
}

/// Convert RGB to HSLA
fn rgb_to_hsla(r: u8, g: u8, b: u8, a: u8) -> Hsla {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;
    let a = a as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        // Achromatic
        Hsla {
            h: 0.0,
            s: 0.0,
            l,
            a,
        }
    } else {
        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };

        let h = if max == r {
            let h = (g - b) / d;
            if g < b { h + 6.0 } else { h }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Hsla {
            h: h / 6.0,
            s,
            l,
            a,
        }
    }
}

/// Set the alpha of a color
pub fn with_alpha(color: Hsla, alpha: f32) -> Hsla {
    Hsla { a: alpha, ..color }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        let white = hex("#ffffff");
        assert!((white.l - 1.0).abs() < 0.01);

        let black = hex("#000000");
        assert!((black.l - 0.0).abs() < 0.01);

        let red = hex("#ff0000");
        assert!((red.h - 0.0).abs() < 0.01);
        assert!((red.s - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_short_hex() {
        let white = hex("#fff");
        assert!((white.l - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_with_alpha() {
        let scrim = with_alpha(hex("#000000"), 0.32);
        assert!((scrim.a - 0.32).abs() < 0.001);
    }
}
