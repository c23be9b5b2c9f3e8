use crate::fx::stages::curve::Curve;
use crate::fx::stages::{Frame, Modulation, Stage};

/// Pre-gain followed by a selectable waveshaping curve.
///
/// Curve switches take effect on the next sample without a crossfade.
pub struct Saturator {
    pre_gain: f32, // linear
    curve: Curve,
}

impl Default for Saturator {
    fn default() -> Self {
        Self::new(1.0, Curve::default())
    }
}

impl Saturator {
    pub const fn new(pre_gain: f32, curve: Curve) -> Self {
        Self { pre_gain, curve }
    }

    pub const fn set_pre_gain(&mut self, linear_gain: f32) {
        self.pre_gain = linear_gain;
    }

    pub const fn pre_gain(&self) -> f32 {
        self.pre_gain
    }

    pub const fn set_curve(&mut self, curve: Curve) {
        self.curve = curve;
    }

    pub const fn curve(&self) -> Curve {
        self.curve
    }
}

impl Stage for Saturator {
    // Modulation is accepted for signature parity but not routed anywhere yet.
    #[inline]
    fn process(&mut self, frame: &mut Frame, _modulation: Modulation) {
        for sample in frame.iter_mut() {
            *sample = self.curve.apply(self.pre_gain * *sample);
        }
    }
}
