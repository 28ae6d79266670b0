//! Audio subsystem of the fortune reading app: looping background music and
//! one-shot sound effects with contained failures.

pub mod config;
pub mod error;
pub mod logging;
pub mod playback;

pub use error::{AppResult, AudioError, ConfigError};
pub use playback::{Diagnostics, PlaybackManager};
