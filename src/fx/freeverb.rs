//! Stereo Freeverb-topology reverb.
//!
//! Eight parallel damped comb filters feed four series allpass filters per
//! channel. Delay lengths are the classic Jezar tunings at 44.1 kHz, scaled
//! to the running sample rate, with the right channel spread by 23 samples.
//! Gain and feedback changes are ramped over 10 ms to avoid zipper noise.

use serde::{Deserialize, Serialize};

const NUM_COMBS: usize = 8;
const NUM_ALLPASSES: usize = 4;
const COMB_TUNING: [usize; NUM_COMBS] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];
const ALLPASS_TUNING: [usize; NUM_ALLPASSES] = [556, 441, 341, 225];
const STEREO_SPREAD: usize = 23;
const TUNING_SAMPLE_RATE: f32 = 44100.0;

const INPUT_GAIN: f32 = 0.015;
const WET_SCALE: f32 = 3.0;
const DRY_SCALE: f32 = 2.0;
const ROOM_SCALE: f32 = 0.28;
const ROOM_OFFSET: f32 = 0.7;
const DAMP_SCALE: f32 = 0.4;
const ALLPASS_FEEDBACK: f32 = 0.5;
const SMOOTH_TIME_SECONDS: f32 = 0.01;

/// Reverb controls, all normalised to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReverbParameters {
    pub room_size: f32,
    pub damping: f32,
    pub wet_level: f32,
    pub dry_level: f32,
    pub width: f32,
    /// Values of 0.5 and above hold the current tail indefinitely.
    pub freeze_mode: f32,
}

impl Default for ReverbParameters {
    fn default() -> Self {
        Self {
            room_size: 0.5,
            damping: 0.5,
            wet_level: 0.5,
            dry_level: 0.4,
            width: 1.0,
            freeze_mode: 0.0,
        }
    }
}

impl ReverbParameters {
    pub fn is_frozen(&self) -> bool {
        self.freeze_mode >= 0.5
    }
}

/// Linear ramp towards a target over a fixed number of samples.
#[derive(Debug, Clone, Default)]
struct Ramp {
    current: f32,
    target: f32,
    step: f32,
    steps_left: u32,
    length: u32,
}

impl Ramp {
    /// Set the ramp length and jump straight to the target.
    fn reset(&mut self, length: u32) {
        self.length = length;
        self.current = self.target;
        self.steps_left = 0;
    }

    fn set_target(&mut self, target: f32) {
        if target == self.target {
            return;
        }

        self.target = target;
        if self.length == 0 {
            self.current = target;
            self.steps_left = 0;
            return;
        }

        self.steps_left = self.length;
        self.step = (target - self.current) / self.length as f32;
    }

    #[inline]
    fn next(&mut self) -> f32 {
        if self.steps_left == 0 {
            return self.target;
        }

        self.steps_left -= 1;
        self.current = if self.steps_left == 0 {
            self.target
        } else {
            self.current + self.step
        };
        self.current
    }
}

#[derive(Debug, Clone, Default)]
struct CombFilter {
    buffer: Vec<f32>,
    index: usize,
    last: f32,
}

impl CombFilter {
    fn set_size(&mut self, size: usize) {
        self.buffer = vec![0.0; size.max(1)];
        self.index = 0;
        self.last = 0.0;
    }

    fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.last = 0.0;
    }

    #[inline]
    fn process(&mut self, input: f32, damp: f32, feedback: f32) -> f32 {
        let output = self.buffer[self.index];
        self.last = output.mul_add(1.0 - damp, self.last * damp);
        if self.last.abs() < f32::MIN_POSITIVE {
            self.last = 0.0;
        }

        self.buffer[self.index] = self.last.mul_add(feedback, input);
        self.index = (self.index + 1) % self.buffer.len();
        output
    }
}

#[derive(Debug, Clone, Default)]
struct AllpassFilter {
    buffer: Vec<f32>,
    index: usize,
}

impl AllpassFilter {
    fn set_size(&mut self, size: usize) {
        self.buffer = vec![0.0; size.max(1)];
        self.index = 0;
    }

    fn clear(&mut self) {
        self.buffer.fill(0.0);
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let buffered = self.buffer[self.index];
        self.buffer[self.index] = buffered.mul_add(ALLPASS_FEEDBACK, input);
        self.index = (self.index + 1) % self.buffer.len();
        buffered - input
    }
}

#[derive(Debug, Clone)]
pub struct Freeverb {
    parameters: ReverbParameters,
    gain: f32,
    combs: [[CombFilter; NUM_COMBS]; 2],
    allpasses: [[AllpassFilter; NUM_ALLPASSES]; 2],
    damping: Ramp,
    feedback: Ramp,
    dry_gain: Ramp,
    wet_gain1: Ramp,
    wet_gain2: Ramp,
}

impl Freeverb {
    /// Allocates the delay lines for `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        let mut reverb = Self {
            parameters: ReverbParameters::default(),
            gain: INPUT_GAIN,
            combs: Default::default(),
            allpasses: Default::default(),
            damping: Ramp::default(),
            feedback: Ramp::default(),
            dry_gain: Ramp::default(),
            wet_gain1: Ramp::default(),
            wet_gain2: Ramp::default(),
        };
        reverb.set_parameters(ReverbParameters::default());
        reverb.set_sample_rate(sample_rate);
        reverb
    }

    pub const fn parameters(&self) -> &ReverbParameters {
        &self.parameters
    }

    pub fn set_parameters(&mut self, parameters: ReverbParameters) {
        let wet = parameters.wet_level * WET_SCALE;
        self.dry_gain.set_target(parameters.dry_level * DRY_SCALE);
        self.wet_gain1
            .set_target(0.5 * wet * (1.0 + parameters.width));
        self.wet_gain2
            .set_target(0.5 * wet * (1.0 - parameters.width));

        self.gain = if parameters.is_frozen() {
            0.0
        } else {
            INPUT_GAIN
        };
        self.parameters = parameters;
        self.update_damping();
    }

    /// Resize every delay line for `sample_rate` and clear all state.
    ///
    /// Allocates, so it must stay off the audio thread.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        let scale = sample_rate / TUNING_SAMPLE_RATE;

        for (channel, combs) in self.combs.iter_mut().enumerate() {
            for (comb, &tuning) in combs.iter_mut().zip(&COMB_TUNING) {
                comb.set_size(scaled_length(tuning + STEREO_SPREAD * channel, scale));
            }
        }
        for (channel, allpasses) in self.allpasses.iter_mut().enumerate() {
            for (allpass, &tuning) in allpasses.iter_mut().zip(&ALLPASS_TUNING) {
                allpass.set_size(scaled_length(tuning + STEREO_SPREAD * channel, scale));
            }
        }

        let ramp_length = (sample_rate * SMOOTH_TIME_SECONDS).floor().max(0.0) as u32;
        for ramp in [
            &mut self.damping,
            &mut self.feedback,
            &mut self.dry_gain,
            &mut self.wet_gain1,
            &mut self.wet_gain2,
        ] {
            ramp.reset(ramp_length);
        }
    }

    /// Clear the reverb tail.
    pub fn reset(&mut self) {
        for comb in self.combs.iter_mut().flatten() {
            comb.clear();
        }
        for allpass in self.allpasses.iter_mut().flatten() {
            allpass.clear();
        }
    }

    /// Process one stereo frame in place.
    #[inline]
    pub fn process(&mut self, left: &mut f32, right: &mut f32) {
        let input = (*left + *right) * self.gain;
        let damp = self.damping.next();
        let feedback = self.feedback.next();

        let [combs_l, combs_r] = &mut self.combs;
        let mut out_l = 0.0;
        let mut out_r = 0.0;
        for (comb_l, comb_r) in combs_l.iter_mut().zip(combs_r.iter_mut()) {
            out_l += comb_l.process(input, damp, feedback);
            out_r += comb_r.process(input, damp, feedback);
        }

        let [allpasses_l, allpasses_r] = &mut self.allpasses;
        for (allpass_l, allpass_r) in allpasses_l.iter_mut().zip(allpasses_r.iter_mut()) {
            out_l = allpass_l.process(out_l);
            out_r = allpass_r.process(out_r);
        }

        let dry = self.dry_gain.next();
        let wet1 = self.wet_gain1.next();
        let wet2 = self.wet_gain2.next();

        *left = out_l.mul_add(wet1, out_r * wet2) + *left * dry;
        *right = out_r.mul_add(wet1, out_l * wet2) + *right * dry;
    }

    /// Process a block of stereo samples in place.
    pub fn process_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            self.process(l, r);
        }
    }

    fn update_damping(&mut self) {
        if self.parameters.is_frozen() {
            self.damping.set_target(0.0);
            self.feedback.set_target(1.0);
        } else {
            self.damping
                .set_target(self.parameters.damping * DAMP_SCALE);
            self.feedback
                .set_target(self.parameters.room_size.mul_add(ROOM_SCALE, ROOM_OFFSET));
        }
    }
}

fn scaled_length(tuning: usize, scale: f32) -> usize {
    (tuning as f32 * scale) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 44100.0;

    fn dry_only() -> ReverbParameters {
        ReverbParameters {
            wet_level: 0.0,
            dry_level: 0.5,
            ..ReverbParameters::default()
        }
    }

    #[test]
    fn dry_only_is_passthrough() {
        let mut reverb = Freeverb::new(SAMPLE_RATE);
        reverb.set_parameters(dry_only());
        reverb.set_sample_rate(SAMPLE_RATE);

        for i in 0..5000 {
            let mut l = (i as f32 * 0.01).sin();
            let mut r = -l;
            let (in_l, in_r) = (l, r);
            reverb.process(&mut l, &mut r);
            assert_eq!(l, in_l);
            assert_eq!(r, in_r);
        }
    }

    #[test]
    fn impulse_produces_tail() {
        let mut reverb = Freeverb::new(SAMPLE_RATE);
        let (mut l, mut r) = (1.0, 1.0);
        reverb.process(&mut l, &mut r);

        let mut found = false;
        for _ in 0..5000 {
            let (mut l, mut r) = (0.0, 0.0);
            reverb.process(&mut l, &mut r);
            if l.abs() > 1e-4 || r.abs() > 1e-4 {
                found = true;
                break;
            }
        }
        assert!(found, "reverb should ring after an impulse");
    }

    #[test]
    fn tail_decays() {
        let mut reverb = Freeverb::new(SAMPLE_RATE);
        reverb.set_parameters(ReverbParameters {
            room_size: 0.3,
            ..ReverbParameters::default()
        });
        reverb.set_sample_rate(SAMPLE_RATE);

        let (mut l, mut r) = (1.0, 1.0);
        reverb.process(&mut l, &mut r);

        let mut late_peak = 0.0f32;
        for i in 0..(SAMPLE_RATE as usize * 3) {
            let (mut l, mut r) = (0.0, 0.0);
            reverb.process(&mut l, &mut r);
            if i > SAMPLE_RATE as usize * 2 {
                late_peak = late_peak.max(l.abs()).max(r.abs());
            }
        }
        assert!(late_peak < 1e-3, "tail still at {late_peak} after 2 s");
    }

    #[test]
    fn reset_clears_tail() {
        let mut reverb = Freeverb::new(SAMPLE_RATE);
        reverb.set_parameters(ReverbParameters {
            dry_level: 0.0,
            ..ReverbParameters::default()
        });
        reverb.set_sample_rate(SAMPLE_RATE);

        for _ in 0..2000 {
            let (mut l, mut r) = (0.5, 0.5);
            reverb.process(&mut l, &mut r);
        }
        reverb.reset();

        for _ in 0..2000 {
            let (mut l, mut r) = (0.0, 0.0);
            reverb.process(&mut l, &mut r);
            assert_eq!((l, r), (0.0, 0.0));
        }
    }

    #[test]
    fn freeze_stops_input_and_holds_feedback() {
        let mut reverb = Freeverb::new(SAMPLE_RATE);
        reverb.set_parameters(ReverbParameters {
            freeze_mode: 1.0,
            dry_level: 0.0,
            ..ReverbParameters::default()
        });
        reverb.set_sample_rate(SAMPLE_RATE);

        // Empty tail and no input gain: nothing comes out.
        for _ in 0..1000 {
            let (mut l, mut r) = (1.0, 1.0);
            reverb.process(&mut l, &mut r);
            assert_eq!((l, r), (0.0, 0.0));
        }
    }

    #[test]
    fn parameter_change_ramps() {
        let mut reverb = Freeverb::new(SAMPLE_RATE);
        reverb.set_parameters(dry_only());
        reverb.set_sample_rate(SAMPLE_RATE);

        reverb.set_parameters(ReverbParameters {
            dry_level: 0.0,
            ..dry_only()
        });

        let (mut l, mut r) = (1.0, 1.0);
        reverb.process(&mut l, &mut r);
        assert!(l > 0.9 && l < 1.0, "dry gain should ramp, got {l}");
    }

    #[test]
    fn handles_tiny_sample_rates() {
        let mut reverb = Freeverb::new(1.0);
        let (mut l, mut r) = (0.5, 0.5);
        reverb.process(&mut l, &mut r);
        assert!(l.is_finite() && r.is_finite());
    }
}
