use crate::color::colormap::Colormap;
use crate::color::gradient::{ColorF, ColorStop, Gradient};
use crate::foundation::core::Rgb8;
use crate::foundation::error::ThermaResult;

/// Lookup strategy used to turn a normalized position into a color.
///
/// In config files a scale is written as a preset name (`"thermal"`, `"grayscale"`,
/// `"plasma"`, `"rainbow"`), an array of hex colors (evenly spaced), or
/// `{"stops": [[0.0, "#000000"], [1.0, "#ffffff"]]}`.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum ColorScale {
    /// Built-in six stop thermal gradient.
    #[default]
    Thermal,
    /// Built-in black to white gradient.
    Grayscale,
    /// Continuous colormap.
    Colormap(Colormap),
    /// User-supplied gradient.
    Custom(Gradient),
}

impl ColorScale {
    /// Resolve a preset name.
    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "thermal" => Some(Self::Thermal),
            "grayscale" | "greyscale" | "gray" | "grey" => Some(Self::Grayscale),
            "plasma" => Some(Self::Colormap(Colormap::Plasma)),
            "rainbow" => Some(Self::Colormap(Colormap::Rainbow)),
            _ => None,
        }
    }

    /// Resolve the scale into a sampler.
    pub fn sampler(&self) -> ScaleSampler {
        match self {
            Self::Thermal => ScaleSampler::Gradient(Gradient::thermal()),
            Self::Grayscale => ScaleSampler::Gradient(Gradient::grayscale()),
            Self::Colormap(c) => ScaleSampler::Colormap(*c),
            Self::Custom(g) => ScaleSampler::Gradient(g.clone()),
        }
    }
}

/// Resolved scale ready for repeated lookups.
#[derive(Clone, Debug, PartialEq)]
pub enum ScaleSampler {
    /// Discrete multi-stop interpolation.
    Gradient(Gradient),
    /// Continuous colormap.
    Colormap(Colormap),
}

impl ScaleSampler {
    /// Color at normalized `t`.
    pub fn sample(&self, t: f64) -> ColorF {
        match self {
            Self::Gradient(g) => g.sample(t),
            Self::Colormap(c) => c.sample(t),
        }
    }

    /// 8-bit color at normalized `t`.
    pub fn sample_rgb8(&self, t: f64) -> Rgb8 {
        self.sample(t).to_rgb8()
    }
}

impl serde::Serialize for ColorScale {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap as _;
        match self {
            Self::Thermal => serializer.serialize_str("thermal"),
            Self::Grayscale => serializer.serialize_str("grayscale"),
            Self::Colormap(c) => serializer.serialize_str(c.name()),
            Self::Custom(g) => {
                let stops: Vec<(f64, Rgb8)> = g
                    .stops()
                    .iter()
                    .map(|s| (s.position, s.color.to_rgb8()))
                    .collect();
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("stops", &stops)?;
                map.end()
            }
        }
    }
}

impl<'de> serde::Deserialize<'de> for ColorScale {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Name(String),
            Even(Vec<Rgb8>),
            Stops { stops: Vec<(f64, Rgb8)> },
        }

        let gradient: ThermaResult<Gradient> = match Repr::deserialize(deserializer)? {
            Repr::Name(name) => {
                return Self::preset(&name).ok_or_else(|| {
                    serde::de::Error::custom(format!("unknown color scale \"{name}\""))
                });
            }
            Repr::Even(colors) => Gradient::evenly_spaced(&colors),
            Repr::Stops { stops } => Gradient::new(
                stops
                    .into_iter()
                    .map(|(p, c)| ColorStop::new(p, c))
                    .collect(),
            ),
        };
        gradient
            .map(Self::Custom)
            .map_err(serde::de::Error::custom)
    }
}
