use std::path::PathBuf;

use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn log_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("FortuneSounds").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Initialize structured logging with file rotation.
///
/// Logs are written to the platform data directory:
/// - macOS: ~/Library/Application Support/FortuneSounds/logs/
/// - Windows: %APPDATA%/FortuneSounds/logs/
/// - Linux: ~/.local/share/FortuneSounds/logs/
///
/// Debug builds also log to the console.
///
/// RUST_LOG takes precedence over `default_filter`.
pub fn initialize_tracing(default_filter: &str) {
    let log_dir = log_dir();

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
    }

    let file_appender = rolling::daily(&log_dir, "fortune-sounds.log");

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    #[cfg(debug_assertions)]
    {
        let console_layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_target(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(console_layer)
            .init();
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();
    }

    tracing::info!("Log directory: {}", log_dir.display());
}
