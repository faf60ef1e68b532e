use crate::color::gradient::ColorF;

/// Continuous colormaps evaluated directly at a normalized position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Colormap {
    /// Perceptually uniform dark-blue to yellow ramp.
    Plasma,
    /// Violet through green to red.
    Rainbow,
}

// Degree-6 least-squares fit of the plasma ramp, one coefficient triple per power of `t`.
const PLASMA: [[f64; 3]; 7] = [
    [0.058_732_343_923_997_02, 0.023_336_708_925_656_64, 0.543_340_182_674_875_4],
    [2.176_514_634_195_958, 0.238_383_417_126_018_2, 0.753_960_459_978_403_6],
    [-2.689_460_476_458_034, -7.455_851_135_738_909, 3.110_799_939_717_086],
    [6.130_348_345_893_603, 42.346_188_147_722_7, -28.518_854_653_321_58],
    [-11.107_436_190_622_71, -82.666_311_094_280_45, 60.139_847_674_182_63],
    [10.023_065_576_470_65, 71.413_617_700_953_49, -54.072_186_555_600_67],
    [-3.658_713_842_777_788, -22.931_534_654_611_49, 18.191_907_785_398_28],
];

impl Colormap {
    /// Evaluate at `t` (clamped into `[0, 1]`; NaN reads as `0`).
    pub fn sample(self, t: f64) -> ColorF {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let c = match self {
            Self::Plasma => {
                let mut acc = [0.0f64; 3];
                for coeffs in PLASMA.iter().rev() {
                    for (a, k) in acc.iter_mut().zip(coeffs) {
                        *a = *a * t + k;
                    }
                }
                ColorF::new(acc[0], acc[1], acc[2])
            }
            Self::Rainbow => ColorF::new(
                (2.0 * t - 0.5).abs(),
                (std::f64::consts::PI * t).sin(),
                (std::f64::consts::FRAC_PI_2 * t).cos(),
            ),
        };
        ColorF::new(
            c.r.clamp(0.0, 1.0),
            c.g.clamp(0.0, 1.0),
            c.b.clamp(0.0, 1.0),
        )
    }

    /// Stable lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Plasma => "plasma",
            Self::Rainbow => "rainbow",
        }
    }
}
