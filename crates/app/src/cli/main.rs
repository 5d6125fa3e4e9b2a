//! Virelai CLI application

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use virelai_core::domain::audio::{AudioEnumerator, DeviceId, SampleRate, StreamConfig};
use virelai_core::domain::response::{CURVE_DB_MAX, CURVE_DB_MIN};
use virelai_core::domain::{
    curve_frequency, magnitude_curve_db, render_update, EqParams, EqPreset, StageChain,
};
use virelai_infra::audio::{CpalEnumerator, EqEngine};

#[derive(Parser)]
#[command(name = "virelai")]
#[command(about = "A real-time stereo multiband equalizer", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the EQ between an input and output device
    Run {
        /// Input device name; defaults to the system default
        #[arg(long)]
        input: Option<String>,

        /// Output device name; defaults to the system default
        #[arg(long)]
        output: Option<String>,

        /// Preset file to load at startup
        #[arg(long)]
        preset: Option<PathBuf>,

        /// Sample rate in Hz
        #[arg(long, default_value_t = 48000)]
        sample_rate: u32,

        /// Device buffer size in frames
        #[arg(long, default_value_t = 512)]
        buffer_size: u32,
    },

    /// List available audio devices
    ListDevices,

    /// Print the magnitude response of a preset as an ASCII chart
    Curve {
        /// Preset file; omitted means the neutral default
        #[arg(long)]
        preset: Option<PathBuf>,

        /// Chart width in columns
        #[arg(long, default_value_t = 80, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
        width: usize,

        /// Sample rate the response is computed at, in Hz
        #[arg(long, default_value_t = 44100)]
        sample_rate: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .init();
    }

    match cli.command {
        Command::Run {
            input,
            output,
            preset,
            sample_rate,
            buffer_size,
        } => run(input, output, preset, sample_rate, buffer_size).await,
        Command::ListDevices => list_devices(),
        Command::Curve {
            preset,
            width,
            sample_rate,
        } => curve(preset, width, sample_rate).await,
    }
}

async fn load_preset(path: Option<PathBuf>) -> anyhow::Result<EqPreset> {
    match path {
        Some(path) => Ok(EqPreset::load_from_file(&path).await?),
        None => Ok(EqPreset::factory_default()),
    }
}

async fn run(
    input: Option<String>,
    output: Option<String>,
    preset: Option<PathBuf>,
    sample_rate: u32,
    buffer_size: u32,
) -> anyhow::Result<()> {
    tracing::info!("Virelai starting...");

    let enumerator = CpalEnumerator::new();
    let input_id = match input {
        Some(name) => DeviceId::new(name),
        None => enumerator.default_input_device()?.id,
    };
    let output_id = match output {
        Some(name) => DeviceId::new(name),
        None => enumerator.default_output_device()?.id,
    };

    let preset = load_preset(preset).await?;
    let params = Arc::new(EqParams::from_settings(&preset.settings));

    let config = StreamConfig {
        sample_rate: SampleRate::from_hz(sample_rate),
        channels: 2,
        buffer_size,
    };

    let mut engine = EqEngine::start(&input_id, &output_id, &config, params)?;
    tracing::info!("Running; press Ctrl-C to stop");

    let mut ticker = tokio::time::interval(Duration::from_millis(16));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => engine.controller_mut().tick(),
        }
    }

    tracing::info!("Stopping");
    Ok(())
}

fn list_devices() -> anyhow::Result<()> {
    let enumerator = CpalEnumerator::new();
    for device in enumerator.devices()? {
        let rate = device
            .default_sample_rate
            .map(|r| format!("{} Hz", r.hz()))
            .unwrap_or_else(|| "unknown rate".to_string());
        println!(
            "{:<40} {:?} in:{} out:{} ({})",
            device.name,
            device.device_type,
            device.max_input_channels,
            device.max_output_channels,
            rate
        );
    }
    Ok(())
}

async fn curve(preset: Option<PathBuf>, width: usize, sample_rate: u32) -> anyhow::Result<()> {
    let preset = load_preset(preset).await?;
    let mut chain = StageChain::new();
    render_update(&preset.settings, sample_rate as f64)?.apply_to(&mut chain);

    let curve = magnitude_curve_db(&chain, sample_rate as f64, width);

    // 17 rows covering -24..+24 dB, 3 dB per row
    const ROWS: usize = 17;
    let span = CURVE_DB_MAX - CURVE_DB_MIN;
    println!("preset: {}", preset.name);
    for row in 0..ROWS {
        let row_db = CURVE_DB_MAX - span * row as f64 / (ROWS - 1) as f64;
        let axis = if row_db.abs() < 1e-9 {
            format!("{:>6} +", "0")
        } else {
            format!("{:>+6.0} |", row_db)
        };
        let mut line = String::with_capacity(width);
        for &db in &curve {
            let clamped = db.clamp(CURVE_DB_MIN, CURVE_DB_MAX);
            let cell = ((CURVE_DB_MAX - clamped) / span * (ROWS - 1) as f64).round() as usize;
            line.push(if cell == row { '*' } else { ' ' });
        }
        println!("{axis}{line}");
    }

    // Frequency ticks under the axis
    let mut ticks = vec![' '; width];
    for mark in [0, width / 4, width / 2, 3 * width / 4, width - 1] {
        ticks[mark] = '^';
    }
    println!("{:>8}{}", "", ticks.iter().collect::<String>());
    print!("{:>8}", "");
    for mark in [0, width / 4, width / 2, 3 * width / 4, width - 1] {
        print!("{:<1$}", format!("{:.0}", curve_frequency(mark, width)), width / 4);
    }
    println!();
    Ok(())
}
