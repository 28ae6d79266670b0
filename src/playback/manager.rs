/// Playback manager
///
/// Owns the background and effect slots and keeps every platform failure
/// on this side of its public API.
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::error::AudioError;

use super::backend::{PlaybackBackend, PlaybackHandle};
use super::diagnostics::Diagnostics;
use super::resource::ResourceId;
use super::slot::{ActiveHandle, HandleToken, PlaybackSlot, SlotKind};

/// Background music plus one-shot effects over a playback backend.
///
/// All operations are best-effort: failures leave the affected slot empty
/// and go to the diagnostic sink, never to the caller. Dropping the manager
/// releases both slots.
pub struct PlaybackManager<B: PlaybackBackend> {
    background: Arc<Mutex<PlaybackSlot>>,
    effect: Arc<Mutex<PlaybackSlot>>,
    diagnostics: Diagnostics,
    next_token: AtomicU64,
    // Declared last so handles are gone before the backend drops.
    backend: B,
}

impl<B: PlaybackBackend> PlaybackManager<B> {
    pub fn new(backend: B, diagnostics: Diagnostics) -> Self {
        Self {
            background: Arc::new(Mutex::new(PlaybackSlot::new(SlotKind::Background))),
            effect: Arc::new(Mutex::new(PlaybackSlot::new(SlotKind::Effect))),
            diagnostics,
            next_token: AtomicU64::new(1),
            backend,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Replace the background track with `resource_id`, looping at reduced volume
    pub fn start_background(&self, resource_id: u32) {
        let mut slot = self.background.lock();
        if let Some(previous) = slot.take() {
            release_handle(&self.diagnostics, SlotKind::Background, previous);
        }

        match self.open(SlotKind::Background, resource_id) {
            Ok(active) => {
                tracing::info!("Background music started: {}", active.resource);
                slot.install(active);
            }
            Err(e) => self.diagnostics.report(
                SlotKind::Background.tag(),
                "Failed to start background music",
                &e,
            ),
        }
    }

    /// Stop and release the background track. No-op when nothing plays.
    pub fn stop_background(&self) {
        // Take first so the slot is empty even if stop/release fail.
        let previous = self.background.lock().take();
        if let Some(previous) = previous {
            tracing::info!("Background music stopped: {}", previous.resource);
            release_handle(&self.diagnostics, SlotKind::Background, previous);
        }
    }

    /// Play a one-shot effect, cutting off any effect still playing
    pub fn fire_effect(&self, resource_id: u32) {
        // Held across start: a late completion for the previous handle waits
        // here, then finds its token gone.
        let mut slot = self.effect.lock();
        if let Some(previous) = slot.take() {
            tracing::debug!("Cutting off effect {}", previous.resource);
            release_handle(&self.diagnostics, SlotKind::Effect, previous);
        }

        match self.open(SlotKind::Effect, resource_id) {
            Ok(active) => {
                tracing::debug!("Effect fired: {}", active.resource);
                slot.install(active);
            }
            Err(e) => self.diagnostics.report(
                SlotKind::Effect.tag(),
                "Failed to play sound effect",
                &e,
            ),
        }
    }

    /// Release both slots. Safe to call more than once.
    pub fn shutdown(&self) {
        let background = self.background.lock().take();
        let effect = self.effect.lock().take();

        if let Some(active) = background {
            release_handle(&self.diagnostics, SlotKind::Background, active);
        }
        if let Some(active) = effect {
            release_handle(&self.diagnostics, SlotKind::Effect, active);
        }
        tracing::debug!("Playback manager torn down");
    }

    pub fn is_background_playing(&self) -> bool {
        !self.background.lock().is_empty()
    }

    pub fn is_effect_active(&self) -> bool {
        !self.effect.lock().is_empty()
    }

    pub fn background_resource(&self) -> Option<ResourceId> {
        self.background.lock().resource()
    }

    pub fn effect_resource(&self) -> Option<ResourceId> {
        self.effect.lock().resource()
    }

    fn issue_token(&self) -> HandleToken {
        HandleToken(self.next_token.fetch_add(1, Ordering::Relaxed))
    }

    /// Create, configure and start a handle for `kind`.
    ///
    /// A handle that fails after creation is released before returning.
    fn open(&self, kind: SlotKind, resource_id: u32) -> Result<ActiveHandle, AudioError> {
        let resource = ResourceId::try_from(resource_id)?;
        let mut handle = self.backend.create(resource)?;
        let token = self.issue_token();

        let configured = configure(&mut *handle, kind).and_then(|()| {
            if kind == SlotKind::Effect {
                let on_done = completion_release(
                    Arc::downgrade(&self.effect),
                    token,
                    self.diagnostics.clone(),
                );
                handle.on_completion(Box::new(on_done))?;
            }
            handle.start()
        });

        match configured {
            Ok(()) => Ok(ActiveHandle {
                token,
                resource,
                handle,
            }),
            Err(e) => {
                if let Err(release_err) = handle.release() {
                    self.diagnostics.report(
                        kind.tag(),
                        "Failed to release handle after failed start",
                        &release_err,
                    );
                }
                Err(e)
            }
        }
    }
}

impl<B: PlaybackBackend> Drop for PlaybackManager<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn configure(handle: &mut dyn PlaybackHandle, kind: SlotKind) -> Result<(), AudioError> {
    let volume = kind.volume();
    handle.set_looping(kind.looping())?;
    handle.set_volume(volume.left(), volume.right())
}

/// Completion callback bound to one handle instance.
///
/// Only releases the slot's handle if it is still the one issued as `token`.
fn completion_release(
    slot: Weak<Mutex<PlaybackSlot>>,
    token: HandleToken,
    diagnostics: Diagnostics,
) -> impl FnOnce() + Send + 'static {
    move || {
        let Some(slot) = slot.upgrade() else {
            return;
        };
        let finished = slot.lock().take_if(token);
        match finished {
            Some(active) => {
                tracing::debug!("Effect finished: {}", active.resource);
                release_handle(&diagnostics, SlotKind::Effect, active);
            }
            None => tracing::trace!("Stale completion for {:?} ignored", token),
        }
    }
}

/// Stop then release, reporting each failure. Release is attempted even if stop fails.
fn release_handle(diagnostics: &Diagnostics, kind: SlotKind, active: ActiveHandle) {
    let ActiveHandle {
        resource,
        mut handle,
        ..
    } = active;

    if let Err(e) = handle.stop() {
        diagnostics.report(kind.tag(), &format!("Failed to stop {}", resource), &e);
    }
    if let Err(e) = handle.release() {
        diagnostics.report(kind.tag(), &format!("Failed to release {}", resource), &e);
    }
}
