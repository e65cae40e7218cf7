//! Headless firing range.
//!
//! Runs a scripted input session through every configured weapon against a
//! small rapier scene and prints what happened.
//!
//! Usage: `range [CONFIG]` (default `./range.ron`). `RUST_LOG=debug` traces
//! every shot.

mod config;
mod scene;
mod session;

use anyhow::Result;
use std::path::PathBuf;

use config::RangeConfig;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("range.ron"));
    let config = RangeConfig::load(&path);
    config.validate()?;

    log::info!(
        "Range: {} weapon(s), {} script steps, {:.1}s at {} Hz",
        config.weapons.len(),
        config.script.len(),
        config.duration,
        config.tick_rate
    );

    for profile in &config.weapons {
        let report = session::run(&config, profile)?;
        println!("{report}");
    }
    Ok(())
}
