use thiserror::Error;

use crate::playback::ResourceId;

/// Library errors using thiserror for structured error handling.
///
/// Audio errors never cross the playback manager boundary: the manager
/// contains them and hands them to the diagnostic sink. They are public so
/// backends can produce them and sinks can inspect them.

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Invalid resource identifier: {0}")]
    InvalidResource(u32),

    #[error("No audio asset registered for {0}")]
    UnknownResource(ResourceId),

    #[error("Failed to create playback resource for {resource}")]
    ResourceCreation {
        resource: ResourceId,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to initialize audio output stream")]
    OutputUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Playback handle rejected {operation}: {reason}")]
    PlatformState {
        operation: &'static str,
        reason: String,
    },
}

impl AudioError {
    /// Shorthand for a failed call on an existing handle
    pub fn platform(operation: &'static str, reason: impl Into<String>) -> Self {
        AudioError::PlatformState {
            operation,
            reason: reason.into(),
        }
    }

    /// True for failures that happen before a handle is playing
    /// (missing, corrupt or unsupported asset, no output device).
    pub fn is_creation_failure(&self) -> bool {
        !matches!(self, AudioError::PlatformState { .. })
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to save configuration to {path}")]
    SaveFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not determine configuration directory")]
    NoConfigDir,
}

/// Type alias for application Results using anyhow for context chaining
pub type AppResult<T> = anyhow::Result<T>;
