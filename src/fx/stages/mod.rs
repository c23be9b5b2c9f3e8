pub mod common;
pub mod curve;
pub mod reverb;
pub mod saturator;
pub mod steamer;

/// One stereo sample frame, `[left, right]`.
pub type Frame = [f32; 2];

/// Per-channel LFO values handed to every stage, each in `[0, 1]`.
pub type Modulation = [f32; 2];

// The core trait that every stage in the sizzler chain implements
pub trait Stage: Send + 'static {
    // Process a single stereo frame in place
    fn process(&mut self, frame: &mut Frame, modulation: Modulation);

    // Process a block of stereo samples in place, with the modulation held for the block
    fn process_block(&mut self, left: &mut [f32], right: &mut [f32], modulation: Modulation) {
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let mut frame = [*l, *r];
            self.process(&mut frame, modulation);
            *l = frame[0];
            *r = frame[1];
        }
    }

    // Clear any internal signal state
    fn reset(&mut self) {}
}
