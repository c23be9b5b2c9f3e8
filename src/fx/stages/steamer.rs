use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::fx::stages::{Frame, Modulation, Stage};

/// Peak amplitude of the raw steam noise.
pub const NOISE_AMPLITUDE: f32 = 0.125;

/// Additive noise texturizer.
///
/// Every channel of every frame gets a fresh uniform variate in
/// `[-0.125, 0.125)`, scaled by the stage gain. Left is drawn before right,
/// so the two channels stay decorrelated while the whole sequence remains
/// reproducible from the seed.
pub struct Steamer {
    gain: f32, // linear
    rng: ChaCha8Rng,
}

impl Steamer {
    pub fn new(seed: u64) -> Self {
        Self {
            gain: 1.0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    pub const fn set_gain(&mut self, linear_gain: f32) {
        self.gain = linear_gain;
    }

    pub const fn gain(&self) -> f32 {
        self.gain
    }

    /// Draw one unscaled noise value in `[-0.125, 0.125)`.
    #[inline]
    pub fn noise(&mut self) -> f32 {
        self.rng
            .random::<f32>()
            .mul_add(2.0 * NOISE_AMPLITUDE, -NOISE_AMPLITUDE)
    }
}

impl Stage for Steamer {
    #[inline]
    fn process(&mut self, frame: &mut Frame, _modulation: Modulation) {
        for sample in frame.iter_mut() {
            *sample += self.gain * self.noise();
        }
    }
}
