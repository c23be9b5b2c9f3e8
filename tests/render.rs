use anyhow::Result;
use hound::{SampleFormat, WavSpec, WavWriter};
use sauna_sizzler::control::{ControlSurface, ControlValues};
use sauna_sizzler::fx::chain::SizzlerChain;
use sauna_sizzler::fx::freeverb::ReverbParameters;
use sauna_sizzler::fx::stages::curve::Curve;
use sauna_sizzler::render::{read_wav, render_channels, render_file, write_wav};
use std::path::Path;

const SAMPLE_RATE: u32 = 44100;
const BLOCK_SIZE: usize = 128;

fn write_int_wav(path: &Path, channels: u16, frames: usize) -> Result<()> {
    let spec = WavSpec {
        channels,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for i in 0..frames {
        let value = (2.0 * std::f32::consts::PI * 440.0 * i as f32 / SAMPLE_RATE as f32).sin();
        for _ in 0..channels {
            writer.write_sample((value * 16000.0) as i16)?;
        }
    }
    writer.finalize()?;
    Ok(())
}

#[test]
fn renders_stereo_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    write_int_wav(&input, 2, 1000)?;

    let mut chain = SizzlerChain::default();
    let controls = ControlSurface::default();
    let stats = render_file(&input, &output, &mut chain, &controls, BLOCK_SIZE)?;

    assert_eq!(stats.sample_rate, SAMPLE_RATE);
    assert_eq!(stats.channels, 2);
    assert_eq!(stats.frames, 1000);
    assert_eq!(stats.blocks, 8);
    assert!(stats.peak > 0.0 && stats.peak.is_finite());
    assert!(chain.is_prepared());
    assert_eq!(chain.sample_rate(), SAMPLE_RATE as f32);

    let (spec, channels) = read_wav(&output)?;
    assert_eq!(spec.sample_format, SampleFormat::Float);
    assert_eq!(spec.bits_per_sample, 32);
    assert_eq!(channels.len(), 2);
    assert!(channels.iter().all(|c| c.len() == 1000));

    Ok(())
}

#[test]
fn renders_mono_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("mono.wav");
    let output = dir.path().join("mono_out.wav");
    write_int_wav(&input, 1, 300)?;

    let mut chain = SizzlerChain::default();
    let controls = ControlSurface::default();
    let stats = render_file(&input, &output, &mut chain, &controls, BLOCK_SIZE)?;

    assert_eq!(stats.channels, 1);
    assert_eq!(stats.blocks, 3);

    let (_, channels) = read_wav(&output)?;
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0].len(), 300);
    Ok(())
}

#[test]
fn rejects_multichannel_input() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("quad.wav");
    let output = dir.path().join("quad_out.wav");
    write_int_wav(&input, 4, 64)?;

    let mut chain = SizzlerChain::default();
    let controls = ControlSurface::default();
    let err = render_file(&input, &output, &mut chain, &controls, BLOCK_SIZE).unwrap_err();

    assert!(format!("{err:#}").contains("only mono and stereo"));
    assert!(!output.exists());
    assert!(!chain.is_prepared());
    Ok(())
}

#[test]
fn missing_input_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut chain = SizzlerChain::default();
    let controls = ControlSurface::default();

    let result = render_file(
        &dir.path().join("absent.wav"),
        &dir.path().join("out.wav"),
        &mut chain,
        &controls,
        BLOCK_SIZE,
    );
    assert!(result.is_err());
}

#[test]
fn float_wav_survives_write_and_read() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("float.wav");
    let channels = vec![vec![0.5f32, -0.25, 1.0], vec![0.0f32, 0.75, -1.0]];

    write_wav(&path, 48000, &channels)?;
    let (spec, read) = read_wav(&path)?;

    assert_eq!(spec.sample_rate, 48000);
    assert_eq!(read, channels);
    Ok(())
}

#[test]
fn passthrough_settings_render_unchanged() -> Result<()> {
    let mut chain = SizzlerChain::default();
    chain.set_reverb_parameters(ReverbParameters {
        wet_level: 0.0,
        dry_level: 0.5,
        ..ReverbParameters::default()
    });
    chain.prepare(SAMPLE_RATE as f32, BLOCK_SIZE)?;

    let controls = ControlSurface::new(&ControlValues {
        pre_gain_db: 0.0,
        curve: Curve::HardClip.index(),
        steamer_gain_db: -70.0,
        reverb_room_size: 0.0,
        lfo_rate_hz: 100.0,
    });

    let input: Vec<f32> = (0..500).map(|i| ((i % 40) as f32 - 20.0) / 20.0).collect();
    let mut channels = vec![input.clone(), input.clone()];
    let blocks = render_channels(&mut chain, &controls, &mut channels, BLOCK_SIZE);

    assert_eq!(blocks, 4);
    assert_eq!(channels[0], input);
    assert_eq!(channels[1], input);
    Ok(())
}
