/// Playback module
///
/// Background music and one-shot sound effects for the reading screens:
/// - One looping background track at reduced volume
/// - One transient effect at full volume, released when it finishes
/// - Failures are contained and reported, never raised to the UI
///
/// ## Architecture
///
/// ```text
/// PlaybackManager
///   ├── PlaybackSlot (Background)  looping, 0.3/0.3
///   └── PlaybackSlot (Effect)      one-shot, 1.0/1.0
///         │
///         ▼
/// PlaybackBackend ──create──> PlaybackHandle
///   └── RodioBackend            └── RodioHandle (one Sink each)
/// ```
///
/// ## Usage
///
/// ```rust,ignore
/// use fortune_sounds::playback::{AssetCatalog, Diagnostics, PlaybackManager, RodioBackend};
///
/// let backend = RodioBackend::new(catalog)?;
/// let manager = PlaybackManager::new(backend, Diagnostics::for_build());
///
/// manager.start_background(10);
/// manager.fire_effect(99);
/// manager.stop_background();
/// // Dropping the manager releases whatever is still playing.
/// ```
pub mod backend;
pub mod diagnostics;
pub mod manager;
pub mod resource;
pub mod rodio_backend;
pub mod slot;

// Re-export commonly used types
pub use backend::{CompletionCallback, PlaybackBackend, PlaybackHandle};
pub use diagnostics::{DiagnosticSink, Diagnostics, TracingSink};
pub use manager::PlaybackManager;
pub use resource::{AssetCatalog, ResourceId};
pub use rodio_backend::{RodioBackend, RodioHandle};
pub use slot::{HandleToken, PlaybackSlot, SlotKind, StereoVolume};
