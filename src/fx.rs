pub mod chain;
pub mod freeverb;
pub mod lfo;
pub mod stages;
