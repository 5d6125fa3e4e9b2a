//! Example demonstrating the preset management system
//!
//! Run with: cargo run --package virelai-core --example preset_demo

use virelai_core::domain::config::{EqPreset, PresetManager};
use virelai_core::domain::params::{EqParams, PeakBandSettings, Slope};
use virelai_core::domain::{magnitude_curve_db, render_update, ChainSettings, StageChain};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("virelai_core=debug,info")
        .init();

    println!("=== Virelai Preset Demo ===\n");

    // 1. Build a preset by editing the live parameter store
    println!("1. Building a 'warm' preset...");
    let params = EqParams::default();
    params.set_hp_cutoff(60.0);
    params.set_hp_slope(Slope::Db24);
    params.set_high_peak(PeakBandSettings {
        freq_hz: 6000.0,
        gain_db: -2.5,
        q: 0.8,
    });
    let preset = EqPreset::from_params("warm", &params);
    println!("   ✓ Captured preset '{}'", preset.name);

    // 2. Save and reload through the preset manager
    println!("\n2. Saving and reloading...");
    let preset_dir = std::path::PathBuf::from("demo_presets");
    let manager = PresetManager::new(preset_dir.clone());
    manager.save(&preset).await?;
    let loaded = manager.load("warm").await?;
    println!("   ✓ Round-tripped preset '{}'", loaded.name);

    // 3. List what the manager can see
    println!("\n3. Available presets:");
    for name in manager.list().await? {
        println!("   - {name}");
    }

    // 4. Render coefficients and show the response at a few frequencies
    println!("\n4. Magnitude response of the loaded preset:");
    let mut chain = StageChain::new();
    render_update(&loaded.settings, 48_000.0)?.apply_to(&mut chain);
    let curve = magnitude_curve_db(&chain, 48_000.0, 9);
    for (i, db) in curve.iter().enumerate() {
        println!("   column {i}: {db:+.2} dB");
    }

    // 5. Compare against the neutral default
    println!("\n5. Neutral default at 1 kHz:");
    let mut neutral = StageChain::new();
    render_update(&ChainSettings::default(), 48_000.0)?.apply_to(&mut neutral);
    println!(
        "   {:.3} dB",
        20.0 * neutral.magnitude_at(1000.0, 48_000.0).log10()
    );

    println!("\n=== Demo Complete ===");

    std::fs::remove_dir_all(preset_dir)?;
    Ok(())
}
