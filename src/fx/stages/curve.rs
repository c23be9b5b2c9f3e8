use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Operating point of the tube model; the curve bends asymmetrically around it.
pub const TUBE_Q: f32 = -0.2;
/// Steepness of the tube model.
pub const TUBE_DIST: f32 = 8.0;

/// Waveshaping transfer curves, in control-index order.
#[derive(
    ValueEnum, Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum Curve {
    #[value(name = "tanh")]
    HyperbolicTangent,
    #[value(name = "asinh")]
    InverseHyperbolicSine,
    #[value(name = "hard-clip")]
    HardClip,
    #[value(name = "soft-clip")]
    SoftClip,
    #[default]
    #[value(name = "tube")]
    TubeModel,
}

impl std::fmt::Display for Curve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HyperbolicTangent => write!(f, "Tanh"),
            Self::InverseHyperbolicSine => write!(f, "ASinh"),
            Self::HardClip => write!(f, "Hard Clipping"),
            Self::SoftClip => write!(f, "Soft Clipping"),
            Self::TubeModel => write!(f, "Tube"),
        }
    }
}

impl Curve {
    pub const ALL: [Self; 5] = [
        Self::HyperbolicTangent,
        Self::InverseHyperbolicSine,
        Self::HardClip,
        Self::SoftClip,
        Self::TubeModel,
    ];

    /// Look up a curve by its control index (`0..=4`).
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub const fn index(self) -> u32 {
        match self {
            Self::HyperbolicTangent => 0,
            Self::InverseHyperbolicSine => 1,
            Self::HardClip => 2,
            Self::SoftClip => 3,
            Self::TubeModel => 4,
        }
    }

    #[inline]
    pub fn apply(self, x: f32) -> f32 {
        match self {
            Self::HyperbolicTangent => x.tanh(),
            Self::InverseHyperbolicSine => x.asinh(),
            Self::HardClip => x.clamp(-1.0, 1.0),
            Self::SoftClip => {
                if x > 1.0 {
                    2.0 / 3.0
                } else if x < -1.0 {
                    -2.0 / 3.0
                } else {
                    x - x * x * x / 3.0
                }
            }
            Self::TubeModel => tube(x),
        }
    }
}

/// Asymmetric tube transfer curve.
///
/// `(x - Q) / (1 - e^(-dist·(x - Q))) + Q / (1 - e^(dist·Q))`, with the
/// removable singularity at `x == Q` replaced by its limit `1/dist`.
/// Both denominators are written with `exp_m1` so the bias term cancels
/// exactly at `x == 0`.
#[inline]
fn tube(x: f32) -> f32 {
    let bias = TUBE_Q / -(TUBE_DIST * TUBE_Q).exp_m1();
    if x == TUBE_Q {
        return 1.0 / TUBE_DIST + bias;
    }

    let offset = x - TUBE_Q;
    offset / -(-TUBE_DIST * offset).exp_m1() + bias
}
