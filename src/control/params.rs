use serde::{Deserialize, Serialize};

/// Inclusive range and default of a host control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

impl ParamRange {
    pub const fn new(min: f32, max: f32, default: f32) -> Self {
        Self { min, max, default }
    }

    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Clamp into range; NaN falls back to the default.
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }
}

pub const PRE_GAIN_DB: ParamRange = ParamRange::new(0.0, 12.0, 6.0);
pub const CURVE: ParamRange = ParamRange::new(0.0, 4.0, 4.0);
pub const STEAMER_GAIN_DB: ParamRange = ParamRange::new(-70.0, 24.0, -40.0);
pub const REVERB_ROOM_SIZE: ParamRange = ParamRange::new(0.0, 1.0, 0.5);
pub const LFO_RATE_HZ: ParamRange = ParamRange::new(50.0, 1000.0, 100.0);

/// The five controls the chain reads once per block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Param {
    PreGainDb,
    Curve,
    SteamerGainDb,
    ReverbRoomSize,
    LfoRateHz,
}

impl std::fmt::Display for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Param {
    pub const ALL: [Self; 5] = [
        Self::PreGainDb,
        Self::Curve,
        Self::SteamerGainDb,
        Self::ReverbRoomSize,
        Self::LfoRateHz,
    ];

    pub const fn id(self) -> &'static str {
        match self {
            Self::PreGainDb => "saturator_pre_gain_db",
            Self::Curve => "saturator_type",
            Self::SteamerGainDb => "steamer_gain_db",
            Self::ReverbRoomSize => "reverb_room_size",
            Self::LfoRateHz => "lfo_rate",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::PreGainDb => "PreGain dB",
            Self::Curve => "Saturator Type",
            Self::SteamerGainDb => "Steamer Gain dB",
            Self::ReverbRoomSize => "Reverb Room Size",
            Self::LfoRateHz => "LFO Rate",
        }
    }

    pub const fn range(self) -> ParamRange {
        match self {
            Self::PreGainDb => PRE_GAIN_DB,
            Self::Curve => CURVE,
            Self::SteamerGainDb => STEAMER_GAIN_DB,
            Self::ReverbRoomSize => REVERB_ROOM_SIZE,
            Self::LfoRateHz => LFO_RATE_HZ,
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.id() == id)
    }

    pub(crate) const fn slot(self) -> usize {
        self as usize
    }
}
