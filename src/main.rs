use std::thread;
use std::time::Duration;

use anyhow::Context;

use fortune_sounds::config::Config;
use fortune_sounds::logging;
use fortune_sounds::playback::{AssetCatalog, Diagnostics, PlaybackManager, RodioBackend};
use fortune_sounds::AppResult;

const DEFAULT_BACKGROUND_ID: u32 = 10;
const DEFAULT_EFFECT_ID: u32 = 99;

fn main() {
    println!("===========================================");
    println!("  Fortune Sounds - Playback Check");
    println!("===========================================\n");

    if let Err(e) = run() {
        eprintln!("✗ {:#}", e);
        std::process::exit(1);
    }
}

/// Usage: fortune-sounds [background-id] [effect-id]
fn run() -> AppResult<()> {
    let args: Vec<String> = std::env::args().collect();
    let background_id = parse_id(args.get(1), DEFAULT_BACKGROUND_ID)?;
    let effect_id = parse_id(args.get(2), DEFAULT_EFFECT_ID)?;

    let config = Config::load().context("Failed to load config")?;
    logging::initialize_tracing(&config.log_filter);
    println!("✓ Configuration loaded ({} assets)", config.assets.len());

    let config_dir = Config::config_dir().context("Failed to locate config directory")?;
    let catalog =
        AssetCatalog::from_config(&config, &config_dir).context("Invalid asset list")?;
    let preloaded = catalog.preload_all();
    println!("✓ Preloaded {}/{} assets", preloaded, catalog.len());

    let backend = RodioBackend::new(catalog).context("Failed to open audio output")?;
    let manager = PlaybackManager::new(backend, Diagnostics::for_build());
    println!("✓ Playback manager initialized\n");

    manager.start_background(background_id);
    println!(
        "Background {}: {}",
        background_id,
        status(manager.is_background_playing())
    );
    thread::sleep(Duration::from_secs(2));

    manager.fire_effect(effect_id);
    println!("Effect {}: {}", effect_id, status(manager.is_effect_active()));
    thread::sleep(Duration::from_secs(3));
    println!(
        "Effect after wait: {}",
        if manager.is_effect_active() { "still playing" } else { "finished" }
    );

    manager.stop_background();
    println!("Background stopped");

    drop(manager);
    println!("\n✓ Shut down cleanly");
    Ok(())
}

fn parse_id(arg: Option<&String>, default: u32) -> AppResult<u32> {
    match arg {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("'{}' is not a resource id", raw)),
        None => Ok(default),
    }
}

fn status(playing: bool) -> &'static str {
    if playing {
        "playing"
    } else {
        "silent (see log for details)"
    }
}
