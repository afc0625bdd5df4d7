/// Rounding policy applied to every coordinate that reaches the scene
use nalgebra::Vector3;

/// Round to a fixed number of decimals, halves away from zero.
///
/// Decimal halfway values such as 0.285 land just below the half once
/// scaled (28.499...), so the scaled result is bumped when `value` is at or
/// past the halfway point of the next step.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let mut scaled = (value * factor).round();
    if value > 0.0 && (scaled + 0.5) / factor <= value {
        scaled += 1.0;
    } else if value < 0.0 && (scaled - 0.5) / factor >= value {
        scaled -= 1.0;
    }
    // adding 0.0 turns -0.0 into 0.0
    scaled / factor + 0.0
}

/// Round to two decimals (colors, alpha, model parameters)
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

/// Coordinate quantization selected by the scene's float mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quantizer {
    /// Round to one decimal, then floor onto the integer grid
    #[default]
    Grid,
    /// Round to two decimals
    Float,
}

impl Quantizer {
    pub fn from_float_mode(allow_float: bool) -> Self {
        if allow_float {
            Quantizer::Float
        } else {
            Quantizer::Grid
        }
    }

    pub fn quantize(self, value: f64) -> f64 {
        match self {
            // Not a plain round: 1.96 -> 2.0 -> 2, but -1.05 -> -1.1 -> -2
            Quantizer::Grid => round_to(value, 1).floor() + 0.0,
            Quantizer::Float => round2(value),
        }
    }

    pub fn quantize_point(self, point: &Vector3<f64>) -> [f64; 3] {
        [
            self.quantize(point.x),
            self.quantize(point.y),
            self.quantize(point.z),
        ]
    }
}
