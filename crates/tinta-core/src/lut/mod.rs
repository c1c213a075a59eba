//! Hue/saturation lookup tables for the selective regrade kernels.
//!
//! Source hues are quantised to 180 buckets of 2° each (the usual 8-bit hue
//! range). Each bucket is pulled toward a set of named anchor hues with
//! Gaussian weights, producing a remapped hue bucket and a saturation
//! multiplier.
//!
//! # Algorithm
//! For each bucket `h`:
//! ```text
//! d_i = circular distance(h, source_i)            (mod 180)
//! w_i = exp(−d_i² / 2σ²) × local_boost_i(h)
//! Σw < 1e-6            → pass through (h, 1.0)
//! w_i ← w_i / Σw
//! ≤ 2 anchors          → hue = round(Σ w_i · target_i) mod 180
//! ≥ 3 anchors          → hue = atan2(Σ w_i sin θ_i, Σ w_i cos θ_i)  (θ_i = target_i · 2°)
//! sat = Σ w_i · boost_i
//! ```
//! Linear averaging breaks for anchors straddling the wrap point, which is
//! why the three-plus anchor tables average on the unit circle.

pub mod cache;
pub mod variants;

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

pub use cache::LutCache;
pub use variants::LutVariant;

/// Number of hue buckets (2° each).
pub const HUE_BUCKETS: usize = 180;

/// Total weight below which a bucket is left untouched.
const NEGLIGIBLE_WEIGHT: f32 = 1e-6;

/// Extra weighting applied to a single anchor near its source hue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LocalBoost {
    /// `w ×= 1 + (max − 1) · exp(−d² / 2σ²)`, a sharp peak on the source hue.
    Gaussian { sigma: f32, max: f32 },
    /// `w ×= factor` for source buckets in `lo..=hi`.
    Band { lo: u32, hi: u32, factor: f32 },
}

impl LocalBoost {
    fn factor(&self, bucket: usize, distance: f32) -> f32 {
        match *self {
            Self::Gaussian { sigma, max } => {
                let falloff = (-(distance * distance) / (2.0 * sigma * sigma)).exp();
                1.0 + (max - 1.0) * falloff
            }
            Self::Band { lo, hi, factor } => {
                if (lo as usize..=hi as usize).contains(&bucket) {
                    factor
                } else {
                    1.0
                }
            }
        }
    }
}

/// A named hue the table pulls nearby source hues toward.
///
/// `source` and `target` are in bucket units `[0, 180)`. For plain anchors
/// they are equal; a remapping anchor captures hues near `source` and sends
/// them to `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub source: f32,
    pub target: f32,
    pub sat_boost: f32,
    pub boost: Option<LocalBoost>,
}

impl Anchor {
    /// An anchor that pulls toward its own hue.
    pub fn fixed(hue: f32, sat_boost: f32) -> Self {
        Self {
            source: hue,
            target: hue,
            sat_boost,
            boost: None,
        }
    }

    /// An anchor that captures `source` and remaps it to `target`.
    pub fn remap(source: f32, target: f32, sat_boost: f32) -> Self {
        Self {
            source,
            target,
            sat_boost,
            boost: None,
        }
    }

    pub fn with_boost(mut self, boost: LocalBoost) -> Self {
        self.boost = Some(boost);
        self
    }
}

/// Everything that determines a table. Two equal configs build equal tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LutConfig {
    /// Gaussian width in buckets.
    pub sigma: f32,
    pub anchors: Vec<Anchor>,
}

/// Bit-exact identity of a [`LutConfig`], usable as a map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LutKey(Vec<u32>);

impl LutConfig {
    pub fn cache_key(&self) -> LutKey {
        let mut bits = vec![self.sigma.to_bits()];
        for anchor in &self.anchors {
            bits.extend([
                anchor.source.to_bits(),
                anchor.target.to_bits(),
                anchor.sat_boost.to_bits(),
            ]);
            match anchor.boost {
                None => bits.push(0),
                Some(LocalBoost::Gaussian { sigma, max }) => {
                    bits.extend([1, sigma.to_bits(), max.to_bits()]);
                }
                Some(LocalBoost::Band { lo, hi, factor }) => {
                    bits.extend([2, lo, hi, factor.to_bits()]);
                }
            }
        }
        LutKey(bits)
    }

    /// Build both tables. Deterministic; prefer [`LutCache`] in kernels.
    pub fn build(&self) -> HueSatLut {
        let mut hue = [0u8; HUE_BUCKETS];
        let mut sat = [1.0f32; HUE_BUCKETS];
        let two_sigma2 = 2.0 * self.sigma * self.sigma;
        let circular = self.anchors.len() >= 3;

        let mut weights = vec![0.0f32; self.anchors.len()];
        for bucket in 0..HUE_BUCKETS {
            let h = bucket as f32;
            for (w, anchor) in weights.iter_mut().zip(&self.anchors) {
                let d = bucket_distance(h, anchor.source);
                *w = (-(d * d) / two_sigma2).exp();
                if let Some(boost) = &anchor.boost {
                    *w *= boost.factor(bucket, d);
                }
            }

            let total: f32 = weights.iter().sum();
            if !total.is_finite() || total < NEGLIGIBLE_WEIGHT {
                hue[bucket] = bucket as u8;
                sat[bucket] = 1.0;
                continue;
            }
            for w in &mut weights {
                *w /= total;
            }

            let new_hue = if circular {
                circular_mean(&weights, &self.anchors)
            } else {
                let mixed: f32 = weights
                    .iter()
                    .zip(&self.anchors)
                    .map(|(w, a)| w * a.target)
                    .sum();
                mixed.round().rem_euclid(HUE_BUCKETS as f32)
            };

            hue[bucket] = (new_hue as usize % HUE_BUCKETS) as u8;
            sat[bucket] = weights
                .iter()
                .zip(&self.anchors)
                .map(|(w, a)| w * a.sat_boost)
                .sum();
        }

        HueSatLut { hue, sat }
    }
}

/// Wrap-aware distance between two bucket positions.
pub fn bucket_distance(a: f32, b: f32) -> f32 {
    let d = (a - b).rem_euclid(HUE_BUCKETS as f32);
    d.min(HUE_BUCKETS as f32 - d)
}

/// Weighted mean of anchor targets on the unit circle, in bucket units.
fn circular_mean(weights: &[f32], anchors: &[Anchor]) -> f32 {
    let (mut x, mut y) = (0.0f32, 0.0f32);
    for (w, anchor) in weights.iter().zip(anchors) {
        let theta = anchor.target * 2.0 * PI / HUE_BUCKETS as f32;
        x += w * theta.cos();
        y += w * theta.sin();
    }
    let mut degrees = y.atan2(x).to_degrees();
    if degrees < 0.0 {
        degrees += 360.0;
    }
    (degrees / 2.0).round().rem_euclid(HUE_BUCKETS as f32)
}

/// The pair of 180-entry tables. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct HueSatLut {
    hue: [u8; HUE_BUCKETS],
    sat: [f32; HUE_BUCKETS],
}

impl HueSatLut {
    /// Remapped bucket for a source bucket.
    pub fn hue_bucket(&self, bucket: usize) -> u8 {
        self.hue[bucket % HUE_BUCKETS]
    }

    /// Saturation multiplier for a source bucket.
    pub fn sat_multiplier(&self, bucket: usize) -> f32 {
        self.sat[bucket % HUE_BUCKETS]
    }

    pub fn hue_table(&self) -> &[u8; HUE_BUCKETS] {
        &self.hue
    }

    pub fn sat_table(&self) -> &[f32; HUE_BUCKETS] {
        &self.sat
    }

    /// Look up a hue in degrees: returns (new hue in degrees, sat multiplier).
    pub fn lookup(&self, hue_degrees: f32) -> (f32, f32) {
        let bucket = (hue_degrees.rem_euclid(360.0) / 2.0) as usize % HUE_BUCKETS;
        (self.hue[bucket] as f32 * 2.0, self.sat[bucket])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn two_anchor() -> LutConfig {
        LutConfig {
            sigma: 15.0,
            anchors: vec![Anchor::fixed(17.0, 1.45), Anchor::fixed(94.0, 1.20)],
        }
    }

    #[test]
    fn test_bucket_distance_wraps() {
        assert_eq!(bucket_distance(2.0, 178.0), 4.0);
        assert_eq!(bucket_distance(178.0, 2.0), 4.0);
        assert_eq!(bucket_distance(10.0, 100.0), 90.0);
    }

    #[test]
    fn test_anchor_buckets_map_to_themselves() {
        let lut = two_anchor().build();
        assert_eq!(lut.hue_bucket(17), 17);
        assert_eq!(lut.hue_bucket(94), 94);
        assert!((lut.sat_multiplier(17) - 1.45).abs() < 1e-3);
        assert!((lut.sat_multiplier(94) - 1.20).abs() < 1e-3);
    }

    #[test]
    fn test_far_buckets_pass_through() {
        // A single narrow anchor leaves the opposite side of the wheel alone.
        let config = LutConfig {
            sigma: 2.0,
            anchors: vec![Anchor::fixed(0.0, 2.0)],
        };
        let lut = config.build();
        assert_eq!(lut.hue_bucket(90), 90);
        assert!((lut.sat_multiplier(90) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_circular_mean_straddles_wrap() {
        // Anchors at 175 and 5 with a third far away: bucket 0 should land
        // on the wrap point, not on the linear average of 90.
        let config = LutConfig {
            sigma: 10.0,
            anchors: vec![
                Anchor::fixed(175.0, 1.0),
                Anchor::fixed(5.0, 1.0),
                Anchor::fixed(90.0, 1.0),
            ],
        };
        let lut = config.build();
        let h = lut.hue_bucket(0) as f32;
        assert!(bucket_distance(h, 0.0) <= 1.0, "bucket 0 mapped to {h}");
    }

    #[test]
    fn test_remap_anchor_sends_source_to_target() {
        let config = LutConfig {
            sigma: 20.0,
            anchors: vec![
                Anchor::fixed(17.0, 1.45),
                Anchor::fixed(94.0, 1.20),
                Anchor::fixed(140.0, 1.25),
                Anchor::remap(60.0, 164.0, 1.4)
                    .with_boost(LocalBoost::Gaussian { sigma: 5.0, max: 3.0 }),
            ],
        };
        let lut = config.build();
        let h = lut.hue_bucket(60) as f32;
        assert!(bucket_distance(h, 164.0) < 10.0, "green mapped to {h}");
    }

    #[test]
    fn test_band_boost_only_inside_band() {
        let boost = LocalBoost::Band { lo: 60, hi: 120, factor: 1.5 };
        assert_eq!(boost.factor(59, 0.0), 1.0);
        assert_eq!(boost.factor(60, 0.0), 1.5);
        assert_eq!(boost.factor(120, 0.0), 1.5);
    }

    #[test]
    fn test_cache_key_distinguishes_configs() {
        let a = two_anchor();
        let mut b = two_anchor();
        b.anchors[0].source = 15.0;
        assert_eq!(a.cache_key(), two_anchor().cache_key());
        assert_ne!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn test_lookup_uses_degree_buckets() {
        let lut = two_anchor().build();
        let (hue, mult) = lut.lookup(34.0);
        assert_eq!(hue, 34.0);
        assert!((mult - 1.45).abs() < 1e-3);
    }
}
