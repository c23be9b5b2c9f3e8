use anyhow::Result;
use assert_no_alloc::{AllocDisabler, assert_no_alloc};
use sauna_sizzler::control::{ControlSurface, ControlValues};
use sauna_sizzler::control::params::Param;
use sauna_sizzler::fx::chain::SizzlerChain;
use sauna_sizzler::fx::stages::curve::Curve;

#[global_allocator]
static A: AllocDisabler = AllocDisabler;

const SAMPLE_RATE: f32 = 44100.0;
const BLOCK_SIZE: usize = 512;

#[test]
fn process_block_does_not_allocate() -> Result<()> {
    let mut chain = SizzlerChain::default();
    chain.prepare(SAMPLE_RATE, BLOCK_SIZE)?;

    let surface = ControlSurface::new(&ControlValues::default());
    let mut left = vec![0.25f32; BLOCK_SIZE];
    let mut right = vec![-0.25f32; BLOCK_SIZE];
    let mut mono = vec![0.1f32; BLOCK_SIZE];

    assert_no_alloc(|| {
        for curve in Curve::ALL {
            surface.set_curve(curve);
            let controls = surface.snapshot();
            chain.process_block(&mut [&mut left[..], &mut right[..]], &controls);
            chain.process_block(&mut [&mut mono[..]], &controls);
        }
    });

    assert!(left.iter().chain(&right).chain(&mono).all(|s| s.is_finite()));
    Ok(())
}

#[test]
fn control_changes_between_blocks_do_not_allocate() -> Result<()> {
    let mut chain = SizzlerChain::default();
    chain.prepare(SAMPLE_RATE, BLOCK_SIZE)?;

    let surface = ControlSurface::default();
    let mut left = vec![0.5f32; BLOCK_SIZE];
    let mut right = vec![0.5f32; BLOCK_SIZE];

    assert_no_alloc(|| {
        for step in 0..16u8 {
            let t = f32::from(step) / 15.0;
            surface.set(Param::PreGainDb, 12.0 * t);
            surface.set(Param::SteamerGainDb, -70.0 + 94.0 * t);
            surface.set(Param::ReverbRoomSize, t);
            surface.set(Param::LfoRateHz, 50.0 + 950.0 * t);

            let controls = surface.snapshot();
            chain.process_block(&mut [&mut left[..], &mut right[..]], &controls);
        }
    });

    Ok(())
}
