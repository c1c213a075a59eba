//! Tuned anchor sets for the orange/teal regrade family.
//!
//! The constants are a starting calibration, not load-bearing invariants.

use serde::{Deserialize, Serialize};

use super::{Anchor, LocalBoost, LutConfig};

// Anchor hues in bucket units (degrees / 2).
const WARM: f32 = 17.0;
const COOL: f32 = 94.0;
const PINK: f32 = 140.0;
const PURPLE: f32 = 164.0;

const BOOST_WARM: f32 = 1.45;
const BOOST_COOL: f32 = 1.20;
const BOOST_PINK: f32 = 1.25;
const BOOST_PURPLE: f32 = 1.4;

/// Which anchor set a regrade kernel uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LutVariant {
    /// Two anchors: warm skin tones and cool teal.
    OrangeTeal,
    /// Warm, cool and pink; averaged on the hue circle.
    OrangeTealPink,
    /// Warm, cool, pink, and greens near 120° captured and sent to purple.
    GreenToPurple,
    /// Warm, cool, pink, and a broad cyan-green band sent to purple.
    OrangePink,
}

impl LutVariant {
    pub fn all() -> &'static [Self] {
        &[
            Self::OrangeTeal,
            Self::OrangeTealPink,
            Self::GreenToPurple,
            Self::OrangePink,
        ]
    }

    /// Variant from its 1-based slider index, clamped into range.
    pub fn from_index(index: f32) -> Self {
        match index.round().clamp(1.0, 4.0) as u32 {
            1 => Self::OrangeTeal,
            2 => Self::OrangeTealPink,
            3 => Self::GreenToPurple,
            _ => Self::OrangePink,
        }
    }

    pub fn index(self) -> u32 {
        match self {
            Self::OrangeTeal => 1,
            Self::OrangeTealPink => 2,
            Self::GreenToPurple => 3,
            Self::OrangePink => 4,
        }
    }

    pub fn config(self) -> LutConfig {
        match self {
            Self::OrangeTeal => LutConfig {
                sigma: 15.0,
                anchors: vec![Anchor::fixed(WARM, BOOST_WARM), Anchor::fixed(COOL, BOOST_COOL)],
            },
            Self::OrangeTealPink => LutConfig {
                sigma: 20.0,
                anchors: vec![
                    Anchor::fixed(WARM, BOOST_WARM),
                    Anchor::fixed(COOL, BOOST_COOL),
                    Anchor::fixed(PINK, BOOST_PINK),
                ],
            },
            Self::GreenToPurple => LutConfig {
                sigma: 20.0,
                anchors: vec![
                    Anchor::fixed(WARM, BOOST_WARM),
                    Anchor::fixed(COOL, BOOST_COOL),
                    Anchor::fixed(PINK, BOOST_PINK),
                    Anchor::remap(60.0, PURPLE, BOOST_PURPLE)
                        .with_boost(LocalBoost::Gaussian { sigma: 5.0, max: 3.0 }),
                ],
            },
            Self::OrangePink => LutConfig {
                sigma: 20.0,
                anchors: vec![
                    Anchor::fixed(WARM, BOOST_WARM),
                    Anchor::fixed(COOL, BOOST_COOL),
                    Anchor::fixed(PINK, BOOST_PINK),
                    Anchor::remap(90.0, PURPLE, BOOST_PURPLE).with_boost(LocalBoost::Band {
                        lo: 60,
                        hi: 120,
                        factor: 1.5,
                    }),
                ],
            },
        }
    }
}
