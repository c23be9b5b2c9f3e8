use anyhow::{Context, Result, bail};
use log::{debug, info};

use crate::control::ControlValues;
use crate::control::params::STEAMER_GAIN_DB;
use crate::fx::freeverb::ReverbParameters;
use crate::fx::lfo::Lfo;
use crate::fx::stages::common::{db_to_lin, db_to_lin_or_mute};
use crate::fx::stages::curve::Curve;
use crate::fx::stages::reverb::ReverbStage;
use crate::fx::stages::saturator::Saturator;
use crate::fx::stages::steamer::Steamer;
use crate::fx::stages::{Frame, Stage};

pub const DEFAULT_NOISE_SEED: u64 = 0x5A_0A_5A_0A;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    Unprepared,
    Prepared,
}

/// The sizzler's fixed processing chain: Steamer → Reverb → Saturator.
///
/// Stage order is part of the sound: noise is added to the raw input, the
/// reverb spreads signal and noise together, and the saturator colours the
/// combined result. Processing runs one frame at a time through every stage,
/// not one block per stage.
pub struct SizzlerChain {
    state: ChainState,
    sample_rate: f32,
    block_size: usize,
    seed: u64,
    lfo: Lfo,
    steamer: Steamer,
    reverb: ReverbStage,
    saturator: Saturator,
}

impl Default for SizzlerChain {
    fn default() -> Self {
        Self::new(DEFAULT_NOISE_SEED)
    }
}

impl SizzlerChain {
    pub fn new(seed: u64) -> Self {
        Self {
            state: ChainState::Unprepared,
            sample_rate: 0.0,
            block_size: 0,
            seed,
            lfo: Lfo::default(),
            steamer: Steamer::new(seed),
            reverb: ReverbStage::default(),
            saturator: Saturator::default(),
        }
    }

    /// Configure for a sample rate and maximum block size.
    ///
    /// Allocates the reverb delay lines, restarts the LFO in quadrature and
    /// reseeds the steamer. On error the chain keeps its previous state, so an
    /// unprepared chain stays a passthrough.
    pub fn prepare(&mut self, sample_rate: f32, block_size: usize) -> Result<()> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            bail!("sample rate must be positive, got {sample_rate}");
        }
        if block_size == 0 {
            bail!("block size must be non-zero");
        }

        self.lfo
            .set_sample_rate(sample_rate)
            .context("failed to configure LFO")?;
        self.lfo.reset();
        self.reverb.prepare(sample_rate);
        self.steamer.reseed(self.seed);

        self.sample_rate = sample_rate;
        self.block_size = block_size;
        self.state = ChainState::Prepared;

        info!("Chain prepared: {sample_rate} Hz, {block_size} samples per block");
        Ok(())
    }

    pub const fn state(&self) -> ChainState {
        self.state
    }

    pub fn is_prepared(&self) -> bool {
        self.state == ChainState::Prepared
    }

    pub const fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub const fn block_size(&self) -> usize {
        self.block_size
    }

    pub const fn lfo(&self) -> &Lfo {
        &self.lfo
    }

    pub const fn saturator(&self) -> &Saturator {
        &self.saturator
    }

    pub const fn steamer(&self) -> &Steamer {
        &self.steamer
    }

    pub const fn reverb_parameters(&self) -> &ReverbParameters {
        self.reverb.parameters()
    }

    /// Set the reverb parameters that are not driven per block.
    ///
    /// Best called before `prepare` so the values apply without a ramp.
    pub fn set_reverb_parameters(&mut self, parameters: ReverbParameters) {
        debug!("Reverb parameters set to {parameters:?}");
        self.reverb.set_parameters(parameters);
    }

    /// Restart the steamer's noise sequence. The seed also applies to every
    /// later `prepare`.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.steamer.reseed(seed);
    }

    /// Clear the reverb tail and restart the LFO.
    pub fn reset(&mut self) {
        self.reverb.reset();
        self.lfo.reset();
    }

    /// Process one host block in place.
    ///
    /// Never fails and never allocates. An unprepared chain leaves the buffer
    /// untouched. A single channel runs as a duplicated stereo pair and gets
    /// the left result; channels past the second are left alone. Channels of
    /// unequal length are processed up to the shortest.
    pub fn process_block(&mut self, buffer: &mut [&mut [f32]], controls: &ControlValues) {
        if self.state != ChainState::Prepared {
            return;
        }

        self.apply_controls(&controls.sanitized());

        match buffer {
            [] => {}
            [mono] => {
                for sample in mono.iter_mut() {
                    let mut frame = [*sample, *sample];
                    self.process_frame(&mut frame);
                    *sample = frame[0];
                }
            }
            [left, right, ..] => {
                for (l, r) in left.iter_mut().zip(right.iter_mut()) {
                    let mut frame = [*l, *r];
                    self.process_frame(&mut frame);
                    *l = frame[0];
                    *r = frame[1];
                }
            }
        }
    }

    fn apply_controls(&mut self, controls: &ControlValues) {
        self.saturator.set_pre_gain(db_to_lin(controls.pre_gain_db));

        let curve = Curve::from_index(controls.curve);
        debug_assert!(
            curve.is_some(),
            "invalid saturation curve index {}",
            controls.curve
        );
        if let Some(curve) = curve {
            self.saturator.set_curve(curve);
        }

        self.steamer
            .set_gain(db_to_lin_or_mute(controls.steamer_gain_db, STEAMER_GAIN_DB.min));
        self.reverb.set_room_size(controls.reverb_room_size);
        self.lfo.set_rate(controls.lfo_rate_hz);
    }

    #[inline]
    fn process_frame(&mut self, frame: &mut Frame) {
        // Ticked every frame and handed to each stage, but no stage reads it yet.
        let modulation = self.lfo.tick();

        self.steamer.process(frame, modulation);
        self.reverb.process(frame, modulation);
        self.saturator.process(frame, modulation);
    }
}
