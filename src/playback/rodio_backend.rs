/// rodio implementation of the playback primitive
///
/// One output stream is shared by every handle; each handle owns its own
/// `Sink`, so stopping one never touches another.
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use rodio::decoder::DecoderError;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::error::AudioError;

use super::backend::{CompletionCallback, PlaybackBackend, PlaybackHandle};
use super::resource::{AssetCatalog, ResourceId};
use super::slot::StereoVolume;

/// Backend playing catalog assets on the default output device
pub struct RodioBackend {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    catalog: AssetCatalog,
}

impl RodioBackend {
    /// Open the default output device
    pub fn new(catalog: AssetCatalog) -> Result<Self, AudioError> {
        let (stream, stream_handle) =
            OutputStream::try_default().map_err(|e| AudioError::OutputUnavailable(Box::new(e)))?;

        tracing::info!("Audio output ready ({} assets in catalog)", catalog.len());

        Ok(Self {
            _stream: stream,
            stream_handle,
            catalog,
        })
    }

    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }
}

impl PlaybackBackend for RodioBackend {
    fn create(&self, resource: ResourceId) -> Result<Box<dyn PlaybackHandle>, AudioError> {
        let data = self.catalog.load(resource)?;
        verify_decodable(resource, &data)?;

        let sink = Sink::try_new(&self.stream_handle).map_err(|e| AudioError::ResourceCreation {
            resource,
            source: Box::new(e),
        })?;
        sink.pause();

        tracing::debug!("Created sink for {}", resource);

        Ok(Box::new(RodioHandle {
            resource,
            sink: Arc::new(sink),
            data,
            looping: false,
            completion: None,
            halted: Arc::new(AtomicBool::new(false)),
            started: false,
        }))
    }
}

/// Cached asset bytes readable through a `Cursor` without copying
#[derive(Clone)]
struct SharedBytes(Arc<Vec<u8>>);

impl AsRef<[u8]> for SharedBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn decode(data: &Arc<Vec<u8>>) -> Result<Decoder<Cursor<SharedBytes>>, DecoderError> {
    Decoder::new(Cursor::new(SharedBytes(Arc::clone(data))))
}

/// Decoded source for one playback, repeating forever when `looping`
fn build_source(
    data: &Arc<Vec<u8>>,
    looping: bool,
) -> Result<Box<dyn Source<Item = i16> + Send>, DecoderError> {
    let decoder = decode(data)?;
    if looping {
        // repeat_infinite buffers its input itself.
        Ok(Box::new(decoder.repeat_infinite()))
    } else {
        Ok(Box::new(decoder))
    }
}

/// Probe the container header so corrupt assets fail at creation
fn verify_decodable(resource: ResourceId, data: &Arc<Vec<u8>>) -> Result<(), AudioError> {
    let decoder = decode(data).map_err(|e| {
        AudioError::ResourceCreation {
            resource,
            source: Box::new(e),
        }
    })?;

    if decoder.channels() == 0 || decoder.sample_rate() == 0 {
        return Err(AudioError::ResourceCreation {
            resource,
            source: "decoder reported no channels or zero sample rate".into(),
        });
    }
    Ok(())
}

/// Playback handle backed by a rodio `Sink`
pub struct RodioHandle {
    resource: ResourceId,
    sink: Arc<Sink>,
    data: Arc<Vec<u8>>,
    looping: bool,
    completion: Option<CompletionCallback>,
    /// Set once stopped or released; silences the completion watcher
    halted: Arc<AtomicBool>,
    started: bool,
}

impl RodioHandle {
    fn spawn_completion_watcher(&self, callback: CompletionCallback) -> Result<(), AudioError> {
        let sink = Arc::clone(&self.sink);
        let halted = Arc::clone(&self.halted);
        let resource = self.resource;

        thread::Builder::new()
            .name(format!("sound-done-{}", resource.get()))
            .spawn(move || {
                sink.sleep_until_end();
                // A halt racing this check can still let one stale callback
                // through; the manager's token check absorbs it.
                if halted.load(Ordering::Acquire) {
                    return;
                }
                tracing::debug!("Playback of {} completed", resource);
                callback();
            })
            .map(|_| ())
            .map_err(|e| AudioError::platform("on_completion", e.to_string()))
    }

    fn halt(&self) {
        self.halted.store(true, Ordering::Release);
        self.sink.stop();
    }
}

impl PlaybackHandle for RodioHandle {
    fn start(&mut self) -> Result<(), AudioError> {
        if self.started {
            return Err(AudioError::platform("start", "handle already started"));
        }
        if self.halted.load(Ordering::Acquire) {
            return Err(AudioError::platform("start", "handle was stopped"));
        }

        let source = build_source(&self.data, self.looping)
            .map_err(|e| AudioError::platform("start", e.to_string()))?;

        self.sink.append(source);
        self.sink.play();
        self.started = true;

        tracing::debug!(
            "Playing {} (looping={}, volume={})",
            self.resource,
            self.looping,
            self.sink.volume()
        );

        if !self.looping {
            if let Some(callback) = self.completion.take() {
                self.spawn_completion_watcher(callback)?;
            }
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        self.halt();
        Ok(())
    }

    fn release(self: Box<Self>) -> Result<(), AudioError> {
        self.halt();
        tracing::debug!("Released {}", self.resource);
        // Dropping the last Sink reference frees the queue.
        Ok(())
    }

    fn set_volume(&mut self, left: f32, right: f32) -> Result<(), AudioError> {
        let volume = StereoVolume::new(left, right);
        // A Sink carries a single gain; the pair collapses to its mean.
        self.sink.set_volume((volume.left() + volume.right()) / 2.0);
        Ok(())
    }

    fn set_looping(&mut self, looping: bool) -> Result<(), AudioError> {
        if self.started {
            return Err(AudioError::platform(
                "set_looping",
                "looping must be set before start",
            ));
        }
        self.looping = looping;
        Ok(())
    }

    fn on_completion(&mut self, callback: CompletionCallback) -> Result<(), AudioError> {
        if self.started {
            return Err(AudioError::platform(
                "on_completion",
                "callback must be registered before start",
            ));
        }
        self.completion = Some(callback);
        Ok(())
    }
}
