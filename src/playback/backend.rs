/// Platform playback primitive
///
/// The manager only talks to audio output through these two traits, so any
/// decoder/output pair can sit underneath it.
use crate::error::AudioError;

use super::resource::ResourceId;

/// Invoked once when a non-looping handle finishes on its own
pub type CompletionCallback = Box<dyn FnOnce() + Send + 'static>;

/// Produces playable handles from resource ids
pub trait PlaybackBackend {
    fn create(&self, resource: ResourceId) -> Result<Box<dyn PlaybackHandle>, AudioError>;
}

/// One decoder + output stream pair owned by a playback slot.
///
/// Every call is fallible. Implementations must deliver the completion
/// callback from their own execution context, never from inside a call on
/// the handle. Suppressing the callback after `stop` or `release` is best
/// effort: a completion racing a halt may still arrive, and callers must
/// tolerate a stale one.
pub trait PlaybackHandle: Send {
    fn start(&mut self) -> Result<(), AudioError>;

    fn stop(&mut self) -> Result<(), AudioError>;

    /// Free the underlying platform resource. The handle is consumed.
    fn release(self: Box<Self>) -> Result<(), AudioError>;

    fn set_volume(&mut self, left: f32, right: f32) -> Result<(), AudioError>;

    fn set_looping(&mut self, looping: bool) -> Result<(), AudioError>;

    fn on_completion(&mut self, callback: CompletionCallback) -> Result<(), AudioError>;
}
