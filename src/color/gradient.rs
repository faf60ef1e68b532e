use crate::foundation::core::Rgb8;
use crate::foundation::error::{ThermaError, ThermaResult};

/// Normalized RGB color with channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorF {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
}

impl ColorF {
    /// Construct from channels.
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation in RGB space; `f = 0` yields `self`.
    pub fn lerp(self, other: Self, f: f64) -> Self {
        Self {
            r: self.r + (other.r - self.r) * f,
            g: self.g + (other.g - self.g) * f,
            b: self.b + (other.b - self.b) * f,
        }
    }

    /// Quantize to 8 bits with `round(c * 255)`.
    pub fn to_rgb8(self) -> Rgb8 {
        Rgb8::from_unit(self.r, self.g, self.b)
    }
}

impl From<Rgb8> for ColorF {
    fn from(c: Rgb8) -> Self {
        Self::new(
            f64::from(c.r) / 255.0,
            f64::from(c.g) / 255.0,
            f64::from(c.b) / 255.0,
        )
    }
}

/// Anchor of a piecewise-linear gradient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    /// Position in `[0, 1]`.
    pub position: f64,
    /// Color at `position`.
    pub color: ColorF,
}

impl ColorStop {
    /// Construct a stop from an 8-bit color.
    pub fn new(position: f64, color: Rgb8) -> Self {
        Self {
            position,
            color: color.into(),
        }
    }
}

/// Piecewise-linear gradient over `[0, 1]`.
///
/// Invariants: at least two stops, positions strictly increasing, first at `0`, last at `1`.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    stops: Vec<ColorStop>,
    uniform: bool,
}

impl Gradient {
    /// Validate and build a gradient from explicit stops.
    pub fn new(stops: Vec<ColorStop>) -> ThermaResult<Self> {
        if stops.len() < 2 {
            return Err(ThermaError::validation(
                "gradient needs at least two color stops",
            ));
        }
        if stops.iter().any(|s| !s.position.is_finite()) {
            return Err(ThermaError::validation(
                "gradient stop positions must be finite",
            ));
        }
        if stops[0].position != 0.0 || stops[stops.len() - 1].position != 1.0 {
            return Err(ThermaError::validation(
                "gradient must start at position 0 and end at position 1",
            ));
        }
        if stops.windows(2).any(|w| w[1].position <= w[0].position) {
            return Err(ThermaError::validation(
                "gradient stop positions must be strictly increasing",
            ));
        }
        let uniform = is_evenly_spaced(&stops);
        Ok(Self { stops, uniform })
    }

    /// Gradient with `colors` placed at equal spacing over `[0, 1]`.
    pub fn evenly_spaced(colors: &[Rgb8]) -> ThermaResult<Self> {
        if colors.len() < 2 {
            return Err(ThermaError::validation(
                "gradient needs at least two color stops",
            ));
        }
        let last = (colors.len() - 1) as f64;
        let stops = colors
            .iter()
            .enumerate()
            .map(|(i, &c)| ColorStop::new(i as f64 / last, c))
            .collect();
        Ok(Self {
            stops,
            uniform: true,
        })
    }

    /// Parse `#RRGGBB` strings into an evenly spaced gradient.
    pub fn from_hex(colors: &[&str]) -> ThermaResult<Self> {
        let colors = colors
            .iter()
            .map(|s| Rgb8::parse_hex(s))
            .collect::<ThermaResult<Vec<_>>>()?;
        Self::evenly_spaced(&colors)
    }

    /// Black through indigo, magenta, orange and yellow to white.
    pub fn thermal() -> Self {
        Self::builtin(&[
            Rgb8::new(0, 0, 0),
            Rgb8::new(40, 0, 110),
            Rgb8::new(190, 0, 150),
            Rgb8::new(255, 90, 0),
            Rgb8::new(255, 220, 0),
            Rgb8::new(255, 255, 255),
        ])
    }

    /// Black to white.
    pub fn grayscale() -> Self {
        Self::builtin(&[Rgb8::BLACK, Rgb8::new(255, 255, 255)])
    }

    fn builtin(colors: &[Rgb8]) -> Self {
        let last = (colors.len() - 1) as f64;
        Self {
            stops: colors
                .iter()
                .enumerate()
                .map(|(i, &c)| ColorStop::new(i as f64 / last, c))
                .collect(),
            uniform: true,
        }
    }

    /// Borrow the stops.
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Color at normalized position `t` (clamped into `[0, 1]`; NaN reads as `0`).
    pub fn sample(&self, t: f64) -> ColorF {
        let n = self.stops.len();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        let i = if self.uniform {
            ((t * (n - 1) as f64).floor() as usize).min(n - 2)
        } else {
            self.stops
                .partition_point(|s| s.position <= t)
                .saturating_sub(1)
                .min(n - 2)
        };

        let a = self.stops[i];
        let b = self.stops[i + 1];
        let f = if self.uniform {
            t * (n - 1) as f64 - i as f64
        } else {
            (t - a.position) / (b.position - a.position)
        };
        a.color.lerp(b.color, f.clamp(0.0, 1.0))
    }
}

// Exact comparison against the positions `evenly_spaced` produces.
fn is_evenly_spaced(stops: &[ColorStop]) -> bool {
    let last = (stops.len() - 1) as f64;
    stops
        .iter()
        .enumerate()
        .all(|(i, s)| s.position == i as f64 / last)
}

#[cfg(test)]
#[path = "../../tests/unit/color/gradient.rs"]
mod tests;
