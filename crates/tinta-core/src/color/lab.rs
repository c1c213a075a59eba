//! sRGB → CIE L*a*b* (D65) for perceptual distance.
//!
//! Goes through linear-light XYZ: sRGB gamma decode, D65 white point, then
//! the cube-root Lab transfer with its linear toe. Only used for masking,
//! so no inverse is provided.

use glam::Vec3;
use palette::{FromColor, Lab, Srgb};
use serde::{Deserialize, Serialize};

/// A CIE L*a*b* color. `l` is roughly `[0, 100]`; `a` and `b` are signed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabColor {
    pub l: f32,
    pub a: f32,
    pub b: f32,
}

impl LabColor {
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.l, self.a, self.b)
    }

    /// Euclidean distance in Lab (CIE76 ΔE).
    pub fn delta_e(self, other: LabColor) -> f32 {
        self.to_vec3().distance(other.to_vec3())
    }
}

/// Convert 8-bit-range RGB channels to Lab.
pub fn rgb_to_lab(rgb: [f32; 3]) -> LabColor {
    let srgb = Srgb::new(rgb[0] / 255.0, rgb[1] / 255.0, rgb[2] / 255.0);
    let lab: Lab = Lab::from_color(srgb);
    LabColor {
        l: lab.l,
        a: lab.a,
        b: lab.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_white_is_l100_neutral() {
        let lab = rgb_to_lab([255.0, 255.0, 255.0]);
        assert!((lab.l - 100.0).abs() < 0.1, "L = {}", lab.l);
        assert!(lab.a.abs() < 0.5);
        assert!(lab.b.abs() < 0.5);
    }

    #[test]
    fn test_black_is_l0() {
        let lab = rgb_to_lab([0.0, 0.0, 0.0]);
        assert!(lab.l.abs() < 0.1);
    }

    #[test]
    fn test_red_has_positive_a() {
        let lab = rgb_to_lab([255.0, 0.0, 0.0]);
        assert!((lab.l - 53.2).abs() < 1.0, "L = {}", lab.l);
        assert!(lab.a > 70.0);
        assert!(lab.b > 60.0);
    }

    #[test]
    fn test_delta_e_is_symmetric_and_zero_on_self() {
        let a = rgb_to_lab([167.0, 93.0, 90.0]);
        let b = rgb_to_lab([20.0, 200.0, 40.0]);
        assert_eq!(a.delta_e(a), 0.0);
        assert!((a.delta_e(b) - b.delta_e(a)).abs() < 1e-4);
        assert!(a.delta_e(b) > 10.0);
    }
}
