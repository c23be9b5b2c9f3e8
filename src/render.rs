//! Offline rendering of WAV files through the chain.
//!
//! Plays the part of the plugin host: the file is cut into host-sized
//! blocks, the control surface is snapshotted once per block, and every
//! block goes through [`SizzlerChain::process_block`] in place.

use anyhow::{Context, Result, bail};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::{debug, info};
use std::path::Path;

use crate::control::ControlSurface;
use crate::fx::chain::SizzlerChain;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStats {
    pub sample_rate: u32,
    pub channels: u16,
    pub frames: usize,
    pub blocks: usize,
    pub peak: f32,
}

/// Read a WAV file into one `Vec` per channel, normalised to `[-1, 1]`.
pub fn read_wav(path: &Path) -> Result<(WavSpec, Vec<Vec<f32>>)> {
    let reader = WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file {}", path.display()))?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = if spec.sample_format == SampleFormat::Float {
        reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read float samples")?
    } else {
        let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
        reader
            .into_samples::<i32>()
            .map(|s| s.map(|v| v as f32 / max_val))
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read integer samples")?
    };

    let channel_count = usize::from(spec.channels.max(1));
    let mut channels = vec![Vec::with_capacity(interleaved.len() / channel_count); channel_count];
    for frame in interleaved.chunks_exact(channel_count) {
        for (channel, &sample) in channels.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }

    Ok((spec, channels))
}

/// Write channels as a 32-bit float WAV file.
pub fn write_wav(path: &Path, sample_rate: u32, channels: &[Vec<f32>]) -> Result<()> {
    let spec = WavSpec {
        channels: u16::try_from(channels.len()).context("Too many channels")?,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file {}", path.display()))?;

    let frames = channels.iter().map(Vec::len).min().unwrap_or(0);
    for i in 0..frames {
        for channel in channels {
            writer
                .write_sample(channel[i])
                .context("Failed to write sample")?;
        }
    }

    writer.finalize().context("Failed to finalize WAV file")?;
    Ok(())
}

/// Run `channels` through a prepared chain in blocks of `block_size` frames.
///
/// Returns the number of blocks processed.
pub fn render_channels(
    chain: &mut SizzlerChain,
    controls: &ControlSurface,
    channels: &mut [Vec<f32>],
    block_size: usize,
) -> usize {
    let block_size = block_size.max(1);
    let frames = channels.iter().map(Vec::len).min().unwrap_or(0);

    let mut blocks = 0;
    let mut start = 0;
    while start < frames {
        let end = (start + block_size).min(frames);
        let snapshot = controls.snapshot();
        let mut block: Vec<&mut [f32]> = channels
            .iter_mut()
            .map(|channel| &mut channel[start..end])
            .collect();

        chain.process_block(&mut block, &snapshot);

        start = end;
        blocks += 1;
    }

    blocks
}

/// Render `input` into `output`, preparing the chain for the file's sample rate.
pub fn render_file(
    input: &Path,
    output: &Path,
    chain: &mut SizzlerChain,
    controls: &ControlSurface,
    block_size: usize,
) -> Result<RenderStats> {
    let (spec, mut channels) = read_wav(input)?;
    if !(1..=2).contains(&spec.channels) {
        bail!(
            "only mono and stereo files are supported, {} has {} channels",
            input.display(),
            spec.channels
        );
    }

    debug!(
        "Read {} frames at {} Hz from {}",
        channels[0].len(),
        spec.sample_rate,
        input.display()
    );

    chain
        .prepare(spec.sample_rate as f32, block_size)
        .context("failed to prepare chain")?;

    let blocks = render_channels(chain, controls, &mut channels, block_size);
    let peak = channels
        .iter()
        .flatten()
        .fold(0.0f32, |peak, s| peak.max(s.abs()));

    write_wav(output, spec.sample_rate, &channels)?;

    let stats = RenderStats {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        frames: channels[0].len(),
        blocks,
        peak,
    };
    info!(
        "Rendered {} frames in {} blocks to {} (peak {:.3})",
        stats.frames,
        stats.blocks,
        output.display(),
        stats.peak
    );

    Ok(stats)
}
