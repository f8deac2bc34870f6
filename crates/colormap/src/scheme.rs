//! Color schemes and multi-stop interpolation engine.

/// RGB color as (r, g, b) with values in 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase hex string of the form `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A color stop: position in [0, 1] mapped to an RGB color.
#[derive(Debug, Clone, Copy)]
pub struct ColorStop {
    pub t: f64,
    pub color: Rgb,
}

impl ColorStop {
    pub const fn new(t: f64, r: u8, g: u8, b: u8) -> Self {
        Self {
            t,
            color: Rgb::new(r, g, b),
        }
    }
}

/// Available color schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorScheme {
    /// Red -> Yellow -> Blue diverging ramp (station accessibility)
    RdYlBu,
    /// White -> Red sequential ramp (suitability index)
    Reds,
    /// Black -> White
    Grayscale,
}

impl ColorScheme {
    /// All available schemes.
    pub const ALL: &[ColorScheme] = &[Self::RdYlBu, Self::Reds, Self::Grayscale];

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RdYlBu => "Red-Yellow-Blue",
            Self::Reds => "Reds",
            Self::Grayscale => "Grayscale",
        }
    }

    /// Parse a scheme name as given on the command line.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rdylbu" | "red-yellow-blue" => Some(Self::RdYlBu),
            "reds" | "red" => Some(Self::Reds),
            "grayscale" | "greys" | "gray" => Some(Self::Grayscale),
            _ => None,
        }
    }
}

// ─── Color stop definitions (ColorBrewer palettes) ─────────────────────

const RDYLBU_STOPS: &[ColorStop] = &[
    ColorStop::new(0.00, 165, 0, 38),
    ColorStop::new(0.25, 244, 109, 67),
    ColorStop::new(0.50, 255, 255, 191),
    ColorStop::new(0.75, 116, 173, 209),
    ColorStop::new(1.00, 49, 54, 149),
];

const REDS_STOPS: &[ColorStop] = &[
    ColorStop::new(0.00, 255, 245, 240),
    ColorStop::new(0.25, 252, 187, 161),
    ColorStop::new(0.50, 251, 106, 74),
    ColorStop::new(0.75, 203, 24, 29),
    ColorStop::new(1.00, 103, 0, 13),
];

// ─── Interpolation engine ──────────────────────────────────────────────

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn lerp_color(c1: Rgb, c2: Rgb, t: f64) -> Rgb {
    Rgb::new(
        lerp(c1.r as f64, c2.r as f64, t).round() as u8,
        lerp(c1.g as f64, c2.g as f64, t).round() as u8,
        lerp(c1.b as f64, c2.b as f64, t).round() as u8,
    )
}

fn multi_stop(stops: &[ColorStop], t: f64) -> Rgb {
    if t <= 0.0 {
        return stops[0].color;
    }
    if t >= 1.0 {
        return stops[stops.len() - 1].color;
    }
    for i in 1..stops.len() {
        if t <= stops[i].t {
            let ratio = (t - stops[i - 1].t) / (stops[i].t - stops[i - 1].t);
            return lerp_color(stops[i - 1].color, stops[i].color, ratio);
        }
    }
    stops[stops.len() - 1].color
}

/// Evaluate a color scheme at normalized position `t` in [0, 1].
///
/// Out-of-range values clamp to the scheme endpoints.
pub fn evaluate(scheme: ColorScheme, t: f64) -> Rgb {
    match scheme {
        ColorScheme::RdYlBu => multi_stop(RDYLBU_STOPS, t),
        ColorScheme::Reds => multi_stop(REDS_STOPS, t),
        ColorScheme::Grayscale => {
            let v = (t.clamp(0.0, 1.0) * 255.0).round() as u8;
            Rgb::new(v, v, v)
        }
    }
}
