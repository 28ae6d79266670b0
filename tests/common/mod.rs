// Recording fake of the platform playback primitive.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;

use fortune_sounds::playback::{
    CompletionCallback, DiagnosticSink, PlaybackBackend, PlaybackHandle, ResourceId,
};
use fortune_sounds::AudioError;

/// Everything the fake saw happen to one handle
#[derive(Debug, Clone, PartialEq)]
pub struct HandleRecord {
    pub id: usize,
    pub resource: u32,
    pub looping: Option<bool>,
    pub volume: Option<(f32, f32)>,
    pub started: bool,
    pub stopped: bool,
    pub released: bool,
}

impl HandleRecord {
    pub fn is_live(&self) -> bool {
        !self.released
    }
}

#[derive(Default)]
struct FakeState {
    records: Vec<HandleRecord>,
    callbacks: HashMap<usize, CompletionCallback>,
    fail_create: HashSet<u32>,
    fail_start: HashSet<u32>,
    fail_stop: bool,
    fail_release: bool,
}

/// Cloneable view onto shared fake state; the manager owns one clone
#[derive(Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<FakeState>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_create(&self, resource: u32) {
        self.state.lock().fail_create.insert(resource);
    }

    pub fn fail_start(&self, resource: u32) {
        self.state.lock().fail_start.insert(resource);
    }

    pub fn fail_stop(&self, fail: bool) {
        self.state.lock().fail_stop = fail;
    }

    pub fn fail_release(&self, fail: bool) {
        self.state.lock().fail_release = fail;
    }

    pub fn records(&self) -> Vec<HandleRecord> {
        self.state.lock().records.clone()
    }

    pub fn live_handles(&self) -> Vec<HandleRecord> {
        self.records().into_iter().filter(HandleRecord::is_live).collect()
    }

    pub fn live_for(&self, resource: u32) -> Vec<HandleRecord> {
        self.live_handles()
            .into_iter()
            .filter(|r| r.resource == resource)
            .collect()
    }

    pub fn record(&self, id: usize) -> HandleRecord {
        self.state.lock().records[id].clone()
    }

    /// Id of the most recently created handle for `resource`
    pub fn last_handle_for(&self, resource: u32) -> Option<usize> {
        self.records()
            .iter()
            .rev()
            .find(|r| r.resource == resource)
            .map(|r| r.id)
    }

    /// Deliver the completion notification registered on handle `id`.
    ///
    /// Returns false if no callback was registered (or it already fired).
    pub fn complete(&self, id: usize) -> bool {
        let callback = self.state.lock().callbacks.remove(&id);
        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }
}

impl PlaybackBackend for FakeBackend {
    fn create(&self, resource: ResourceId) -> Result<Box<dyn PlaybackHandle>, AudioError> {
        let mut state = self.state.lock();
        if state.fail_create.contains(&resource.get()) {
            return Err(AudioError::ResourceCreation {
                resource,
                source: "corrupt asset".into(),
            });
        }

        let id = state.records.len();
        state.records.push(HandleRecord {
            id,
            resource: resource.get(),
            looping: None,
            volume: None,
            started: false,
            stopped: false,
            released: false,
        });

        Ok(Box::new(FakeHandle {
            id,
            resource: resource.get(),
            state: Arc::clone(&self.state),
        }))
    }
}

struct FakeHandle {
    id: usize,
    resource: u32,
    state: Arc<Mutex<FakeState>>,
}

impl FakeHandle {
    fn update(&self, f: impl FnOnce(&mut HandleRecord)) {
        f(&mut self.state.lock().records[self.id]);
    }
}

impl PlaybackHandle for FakeHandle {
    fn start(&mut self) -> Result<(), AudioError> {
        if self.state.lock().fail_start.contains(&self.resource) {
            return Err(AudioError::platform("start", "decoder unavailable"));
        }
        self.update(|r| r.started = true);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        self.update(|r| r.stopped = true);
        if self.state.lock().fail_stop {
            return Err(AudioError::platform("stop", "invalid state"));
        }
        Ok(())
    }

    fn release(self: Box<Self>) -> Result<(), AudioError> {
        self.update(|r| r.released = true);
        if self.state.lock().fail_release {
            return Err(AudioError::platform("release", "already released"));
        }
        Ok(())
    }

    fn set_volume(&mut self, left: f32, right: f32) -> Result<(), AudioError> {
        self.update(|r| r.volume = Some((left, right)));
        Ok(())
    }

    fn set_looping(&mut self, looping: bool) -> Result<(), AudioError> {
        self.update(|r| r.looping = Some(looping));
        Ok(())
    }

    fn on_completion(&mut self, callback: CompletionCallback) -> Result<(), AudioError> {
        self.state.lock().callbacks.insert(self.id, callback);
        Ok(())
    }
}

/// Diagnostic sink that keeps (tag, message) pairs
#[derive(Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<(String, String)>>,
}

impl RecordingSink {
    pub fn entries(&self) -> Vec<(String, String)> {
        self.entries.lock().clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn record(&self, tag: &str, message: &str, _error: &AudioError) {
        self.entries
            .lock()
            .push((tag.to_string(), message.to_string()));
    }
}
