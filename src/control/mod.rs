//! Lock-free control values shared between the control thread and the
//! audio thread.
//!
//! The control side writes individual parameters whenever it likes; the
//! audio side takes one [`ControlSurface::snapshot`] per block. Each value
//! lives in its own `AtomicU32` (the `f32` bit pattern, or the raw index for
//! the curve selector), so a snapshot is five relaxed loads and may mix
//! values from before and after a concurrent write. That staleness is fine
//! for block-rate controls.

use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};

use crate::fx::stages::curve::Curve;

pub mod params;

pub use params::{Param, ParamRange};

/// One block's worth of control values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlValues {
    pub pre_gain_db: f32,
    /// Index into [`Curve::ALL`].
    pub curve: u32,
    pub steamer_gain_db: f32,
    pub reverb_room_size: f32,
    pub lfo_rate_hz: f32,
}

impl Default for ControlValues {
    fn default() -> Self {
        Self {
            pre_gain_db: params::PRE_GAIN_DB.default,
            curve: Curve::default().index(),
            steamer_gain_db: params::STEAMER_GAIN_DB.default,
            reverb_room_size: params::REVERB_ROOM_SIZE.default,
            lfo_rate_hz: params::LFO_RATE_HZ.default,
        }
    }
}

impl ControlValues {
    /// Clamp every continuous value into its range. The curve index is left
    /// alone so that a bad index still reaches the chain's check.
    pub fn sanitized(&self) -> Self {
        Self {
            pre_gain_db: params::PRE_GAIN_DB.clamp(self.pre_gain_db),
            curve: self.curve,
            steamer_gain_db: params::STEAMER_GAIN_DB.clamp(self.steamer_gain_db),
            reverb_room_size: params::REVERB_ROOM_SIZE.clamp(self.reverb_room_size),
            lfo_rate_hz: params::LFO_RATE_HZ.clamp(self.lfo_rate_hz),
        }
    }

    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curve = curve.index();
        self
    }
}

/// Atomic control store, shared through an `Arc`.
pub struct ControlSurface {
    slots: [AtomicU32; Param::ALL.len()],
}

impl Default for ControlSurface {
    fn default() -> Self {
        Self::new(&ControlValues::default())
    }
}

impl ControlSurface {
    pub fn new(values: &ControlValues) -> Self {
        let surface = Self {
            slots: Default::default(),
        };
        surface.store(values);
        surface
    }

    /// Write one control, clamped to its range.
    pub fn set(&self, param: Param, value: f32) {
        let range = param.range();
        let clamped = range.clamp(value);
        if clamped != value {
            debug!("{param} clamped from {value} to {clamped}");
        }

        let bits = match param {
            Param::Curve => clamped.round() as u32,
            _ => clamped.to_bits(),
        };
        self.slots[param.slot()].store(bits, Ordering::Relaxed);
    }

    pub fn get(&self, param: Param) -> f32 {
        let bits = self.slots[param.slot()].load(Ordering::Relaxed);
        match param {
            Param::Curve => bits as f32,
            _ => f32::from_bits(bits),
        }
    }

    pub fn set_curve(&self, curve: Curve) {
        self.slots[Param::Curve.slot()].store(curve.index(), Ordering::Relaxed);
    }

    /// Write every control at once.
    pub fn store(&self, values: &ControlValues) {
        self.set(Param::PreGainDb, values.pre_gain_db);
        self.set(Param::Curve, values.curve as f32);
        self.set(Param::SteamerGainDb, values.steamer_gain_db);
        self.set(Param::ReverbRoomSize, values.reverb_room_size);
        self.set(Param::LfoRateHz, values.lfo_rate_hz);
    }

    /// Read every control once. Wait-free; intended for the audio thread.
    #[inline]
    pub fn snapshot(&self) -> ControlValues {
        ControlValues {
            pre_gain_db: self.get(Param::PreGainDb),
            curve: self.slots[Param::Curve.slot()].load(Ordering::Relaxed),
            steamer_gain_db: self.get(Param::SteamerGainDb),
            reverb_room_size: self.get(Param::ReverbRoomSize),
            lfo_rate_hz: self.get(Param::LfoRateHz),
        }
    }
}
