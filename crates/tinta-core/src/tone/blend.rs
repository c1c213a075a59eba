//! Per-channel compositing operators on 8-bit-range values.

/// Soft-light blend of `blend` onto `base`.
///
/// Two-branch definition, boundary at the blend midpoint:
/// ```text
/// b = base / 255, d = blend / 255
/// d < 0.5 → b − (1 − 2d) · b · (1 − b)        (darken)
/// d ≥ 0.5 → b + (2d − 1) · (√b − b)           (lighten)
/// ```
pub fn soft_light(base: f32, blend: f32) -> f32 {
    let b = (base / 255.0).clamp(0.0, 1.0);
    let d = (blend / 255.0).clamp(0.0, 1.0);
    let result = if d < 0.5 {
        b - (1.0 - 2.0 * d) * b * (1.0 - b)
    } else {
        b + (2.0 * d - 1.0) * (b.sqrt() - b)
    };
    (result * 255.0).clamp(0.0, 255.0)
}

/// Overlay blend: multiply below the base midpoint, screen above it.
pub fn overlay(base: f32, blend: f32) -> f32 {
    let b = base / 255.0;
    let d = blend / 255.0;
    let result = if b < 0.5 {
        2.0 * b * d
    } else {
        1.0 - 2.0 * (1.0 - b) * (1.0 - d)
    };
    result * 255.0
}

/// Apply a channel operator to each pair of channels.
pub fn blend_rgb(base: [f32; 3], layer: [f32; 3], op: fn(f32, f32) -> f32) -> [f32; 3] {
    [op(base[0], layer[0]), op(base[1], layer[1]), op(base[2], layer[2])]
}

/// Composite `layer` over `base` with `op`, then at `opacity`.
pub fn composite(base: [f32; 3], layer: [f32; 3], op: fn(f32, f32) -> f32, opacity: f32) -> [f32; 3] {
    let blended = blend_rgb(base, layer, op);
    super::mix(base, blended, opacity.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-3;

    #[test]
    fn test_soft_light_neutral_blend_is_identity() {
        // d = 0.5 exactly sits on the lighten branch with zero weight.
        for v in [0.0, 40.0, 128.0, 255.0] {
            assert!((soft_light(v, 127.5) - v).abs() < EPSILON);
        }
    }

    #[test]
    fn test_soft_light_branches() {
        let base = 100.0;
        assert!(soft_light(base, 0.0) < base, "dark blend darkens");
        assert!(soft_light(base, 255.0) > base, "light blend lightens");
    }

    #[test]
    fn test_soft_light_darkest_blend_matches_formula() {
        // d = 0: b − b(1 − b) = b²
        let b = 100.0 / 255.0;
        assert!((soft_light(100.0, 0.0) - b * b * 255.0).abs() < EPSILON);
    }

    #[test]
    fn test_soft_light_is_asymmetric() {
        // √b − b differs from b(1 − b), so equal offsets from the midpoint
        // do not move the base by equal amounts.
        let base = 60.0;
        let down = base - soft_light(base, 0.0);
        let up = soft_light(base, 255.0) - base;
        assert!((down - up).abs() > 1.0);
    }

    #[test]
    fn test_overlay_extremes() {
        assert_eq!(overlay(0.0, 200.0), 0.0);
        assert!((overlay(255.0, 10.0) - 255.0).abs() < EPSILON);
        assert!((overlay(64.0, 255.0) - 128.0).abs() < 1.0);
    }

    #[test]
    fn test_composite_zero_opacity_is_base() {
        let base = [10.0, 120.0, 240.0];
        assert_eq!(composite(base, [255.0, 0.0, 0.0], soft_light, 0.0), base);
    }
}
