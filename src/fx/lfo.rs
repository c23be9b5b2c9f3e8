use anyhow::{Result, bail};
use std::f32::consts::{FRAC_PI_2, TAU};

const DEFAULT_SAMPLE_RATE: f32 = 44100.0;
pub const DEFAULT_RATE_HZ: f32 = 100.0;

/// Two sine LFOs in quadrature, one per stereo channel.
///
/// Outputs are unipolar (`0.5 + 0.5·sin(phase)`). Both phases advance by the
/// same increment and wrap at `2π`, so the right channel always leads the
/// left by a quarter cycle.
#[derive(Debug, Clone)]
pub struct Lfo {
    phases: [f32; 2],
    increment: f32,
    rate_hz: f32,
    sample_rate: f32,
}

impl Default for Lfo {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_HZ)
    }
}

impl Lfo {
    pub fn new(rate_hz: f32) -> Self {
        let mut lfo = Self {
            phases: [0.0, FRAC_PI_2],
            increment: 0.0,
            rate_hz,
            sample_rate: DEFAULT_SAMPLE_RATE,
        };
        lfo.update_increment();
        lfo
    }

    /// Rejects zero, negative and non-finite rates and keeps the previous one.
    pub fn set_sample_rate(&mut self, sample_rate: f32) -> Result<()> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            bail!("LFO sample rate must be positive, got {sample_rate}");
        }

        self.sample_rate = sample_rate;
        self.update_increment();
        Ok(())
    }

    pub fn set_rate(&mut self, rate_hz: f32) {
        if !rate_hz.is_finite() || rate_hz == self.rate_hz {
            return;
        }

        self.rate_hz = rate_hz;
        self.update_increment();
    }

    pub fn reset(&mut self) {
        self.phases = [0.0, FRAC_PI_2];
    }

    /// Current modulation values, then advance both phases by one sample.
    #[inline]
    pub fn tick(&mut self) -> [f32; 2] {
        let values = self.phases.map(|phase| 0.5f32.mul_add(phase.sin(), 0.5));

        for phase in &mut self.phases {
            *phase = (*phase + self.increment) % TAU;
        }

        values
    }

    pub const fn phases(&self) -> [f32; 2] {
        self.phases
    }

    pub const fn increment(&self) -> f32 {
        self.increment
    }

    pub const fn rate_hz(&self) -> f32 {
        self.rate_hz
    }

    pub const fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn update_increment(&mut self) {
        self.increment = TAU * self.rate_hz / self.sample_rate;
    }
}
