//! Color parsing - HSL/HSLA values and linear-gradient stops

use once_cell::sync::Lazy;
use regex::Regex;

/// `hsl(h, s%, l%)` or `hsla(h, s%, l%, a)`; hue may carry `deg`
static HSL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"hsla?\(\s*(\d+(?:\.\d+)?)(?:deg)?\s*,\s*(\d+(?:\.\d+)?)%\s*,\s*(\d+(?:\.\d+)?)%\s*(?:,\s*(\d*\.?\d+)\s*)?\)",
    )
    .expect("Invalid HSL_RE regex")
});

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Channel-wise linear interpolation, `t` in [0, 1]
    pub fn lerp(self, other: Rgba, t: f64) -> Rgba {
        let mix = |from: u8, to: u8| -> u8 {
            (from as f64 * (1.0 - t) + to as f64 * t).round().clamp(0.0, 255.0) as u8
        };
        Rgba::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }

    pub fn channels(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

fn to_channel(unit: f64) -> u8 {
    (unit.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 0.5 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

/// Convert hue (degrees), saturation and lightness (percent) to RGB
pub fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (u8, u8, u8) {
    let h = hue.rem_euclid(360.0) / 360.0;
    let s = (saturation / 100.0).clamp(0.0, 1.0);
    let l = (lightness / 100.0).clamp(0.0, 1.0);

    if s == 0.0 {
        let gray = to_channel(l);
        return (gray, gray, gray);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    (
        to_channel(hue_to_rgb(p, q, h + 1.0 / 3.0)),
        to_channel(hue_to_rgb(p, q, h)),
        to_channel(hue_to_rgb(p, q, h - 1.0 / 3.0)),
    )
}

fn captures_to_rgba(caps: &regex::Captures<'_>) -> Option<Rgba> {
    let number = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<f64>().ok());
    let (r, g, b) = hsl_to_rgb(number(1)?, number(2)?, number(3)?);
    let alpha = match caps.get(4) {
        Some(_) => number(4)?,
        None => 1.0,
    };
    Some(Rgba::new(r, g, b, to_channel(alpha)))
}

/// Parse the first HSL/HSLA color in `value`
pub fn parse_hsl(value: &str) -> Option<Rgba> {
    HSL_RE.captures(value).and_then(|caps| captures_to_rgba(&caps))
}

/// All HSL/HSLA stops of a gradient, in order
pub fn gradient_stops(value: &str) -> Vec<Rgba> {
    HSL_RE
        .captures_iter(value)
        .filter_map(|caps| captures_to_rgba(&caps))
        .collect()
}

/// What to draw for a color-like token value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSpec {
    Solid(Rgba),
    Gradient(Vec<Rgba>),
}

impl IconSpec {
    /// `None` when the value holds no parsable color
    pub fn from_value(value: &str) -> Option<Self> {
        let value = value.trim_start();
        if value.starts_with("linear-gradient(") {
            let stops = gradient_stops(value);
            return (!stops.is_empty()).then_some(IconSpec::Gradient(stops));
        }
        if value.starts_with("hsl(") || value.starts_with("hsla(") {
            return parse_hsl(value).map(IconSpec::Solid);
        }
        None
    }
}
