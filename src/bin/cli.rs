use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use sauna_sizzler::control::{ControlSurface, ControlValues};
use sauna_sizzler::fx::chain::SizzlerChain;
use sauna_sizzler::fx::stages::curve::Curve;
use sauna_sizzler::render::render_file;
use sauna_sizzler::settings::Settings;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sauna-sizzler")]
#[command(version)]
#[command(about = "Render a WAV file through the Sauna Sizzler chain.")]
struct Args {
    #[arg(help = "Input WAV file (mono or stereo)")]
    input: PathBuf,
    #[arg(help = "Output WAV file (32-bit float)")]
    output: PathBuf,
    #[arg(
        long,
        env = "SIZZLER_SETTINGS",
        help = "Settings file, defaults to the user config directory"
    )]
    settings: Option<PathBuf>,
    #[arg(long, default_value_t = 6.0, help = "Saturator pre-gain in dB (0 to 12)")]
    pre_gain_db: f32,
    #[arg(long, value_enum, default_value_t = Curve::TubeModel, help = "Saturation curve")]
    curve: Curve,
    #[arg(
        long,
        default_value_t = -40.0,
        allow_negative_numbers = true,
        help = "Steamer noise gain in dB (-70 mutes, up to 24)"
    )]
    steamer_gain_db: f32,
    #[arg(long, default_value_t = 0.5, help = "Reverb room size (0 to 1)")]
    room_size: f32,
    #[arg(long, default_value_t = 100.0, help = "LFO rate in Hz (50 to 1000)")]
    lfo_rate: f32,
    #[arg(long, help = "Override the noise seed from the settings file")]
    seed: Option<u64>,
    #[arg(long, help = "Override the block size from the settings file")]
    block_size: Option<usize>,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    info!("Sauna Sizzler v{}", env!("CARGO_PKG_VERSION"));
    info!("Args: {:?}", args);

    let settings = match &args.settings {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("failed to load settings from '{}'", path.display()))?,
        None => Settings::load().context("failed to load settings")?,
    };
    info!("{settings}");

    let controls = ControlSurface::new(&ControlValues {
        pre_gain_db: args.pre_gain_db,
        curve: args.curve.index(),
        steamer_gain_db: args.steamer_gain_db,
        reverb_room_size: args.room_size,
        lfo_rate_hz: args.lfo_rate,
    });

    let mut chain = SizzlerChain::new(args.seed.unwrap_or(settings.engine.noise_seed));
    chain.set_reverb_parameters(settings.reverb);

    let block_size = args
        .block_size
        .unwrap_or(settings.engine.block_size as usize);

    let stats = render_file(&args.input, &args.output, &mut chain, &controls, block_size)
        .with_context(|| format!("failed to render '{}'", args.input.display()))?;

    info!(
        "Done: {} channel(s), {} frames at {} Hz, peak {:.3}",
        stats.channels, stats.frames, stats.sample_rate, stats.peak
    );

    Ok(())
}
