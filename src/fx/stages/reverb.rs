use crate::fx::freeverb::{Freeverb, ReverbParameters};
use crate::fx::stages::{Frame, Modulation, Stage};

const DEFAULT_SAMPLE_RATE: f32 = 44100.0;

/// Chain adapter around the stereo [`Freeverb`].
///
/// Only the room size moves per block; every other reverb parameter keeps
/// the value it was given before `prepare`.
pub struct ReverbStage {
    reverb: Freeverb,
}

impl Default for ReverbStage {
    fn default() -> Self {
        Self::new(ReverbParameters::default())
    }
}

impl ReverbStage {
    pub fn new(parameters: ReverbParameters) -> Self {
        let mut reverb = Freeverb::new(DEFAULT_SAMPLE_RATE);
        reverb.set_parameters(parameters);
        reverb.set_sample_rate(DEFAULT_SAMPLE_RATE);
        Self { reverb }
    }

    /// Resize the delay lines for `sample_rate`. Allocates.
    pub fn prepare(&mut self, sample_rate: f32) {
        self.reverb.set_sample_rate(sample_rate);
    }

    pub fn set_parameters(&mut self, parameters: ReverbParameters) {
        self.reverb.set_parameters(parameters);
    }

    pub const fn parameters(&self) -> &ReverbParameters {
        self.reverb.parameters()
    }

    pub fn set_room_size(&mut self, room_size: f32) {
        let parameters = *self.reverb.parameters();
        if parameters.room_size == room_size {
            return;
        }

        self.reverb.set_parameters(ReverbParameters {
            room_size,
            ..parameters
        });
    }
}

impl Stage for ReverbStage {
    #[inline]
    fn process(&mut self, frame: &mut Frame, _modulation: Modulation) {
        let [left, right] = frame;
        self.reverb.process(left, right);
    }

    fn process_block(&mut self, left: &mut [f32], right: &mut [f32], _modulation: Modulation) {
        self.reverb.process_stereo(left, right);
    }

    fn reset(&mut self) {
        self.reverb.reset();
    }
}
