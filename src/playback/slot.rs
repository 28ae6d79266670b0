/// Playback slots
///
/// A slot is a named ownership cell holding at most one live playback
/// handle. The slot kind fixes how its handles are configured.
use std::fmt;

use super::backend::PlaybackHandle;
use super::resource::ResourceId;

/// Left/right gain pair, each channel clamped to 0.0-1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StereoVolume {
    left: f32,
    right: f32,
}

impl StereoVolume {
    pub const FULL: StereoVolume = StereoVolume {
        left: 1.0,
        right: 1.0,
    };

    pub const ATTENUATED: StereoVolume = StereoVolume {
        left: 0.3,
        right: 0.3,
    };

    pub fn new(left: f32, right: f32) -> Self {
        Self {
            left: clamp_gain(left),
            right: clamp_gain(right),
        }
    }

    pub fn left(&self) -> f32 {
        self.left
    }

    pub fn right(&self) -> f32 {
        self.right
    }
}

impl Default for StereoVolume {
    fn default() -> Self {
        Self::FULL
    }
}

// NaN would otherwise survive clamp().
fn clamp_gain(level: f32) -> f32 {
    if level.is_nan() {
        0.0
    } else {
        level.clamp(0.0, 1.0)
    }
}

/// The two slots a playback manager owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    /// Looping ambience
    Background,

    /// One-shot sound effect
    Effect,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKind::Background => write!(f, "Background"),
            SlotKind::Effect => write!(f, "Effect"),
        }
    }
}

impl SlotKind {
    /// Whether handles in this slot repeat forever
    pub fn looping(&self) -> bool {
        match self {
            SlotKind::Background => true,
            SlotKind::Effect => false,
        }
    }

    /// Fixed gain applied to every handle in this slot
    pub fn volume(&self) -> StereoVolume {
        match self {
            SlotKind::Background => StereoVolume::ATTENUATED,
            SlotKind::Effect => StereoVolume::FULL,
        }
    }

    /// Component tag used when reporting diagnostics
    pub fn tag(&self) -> &'static str {
        match self {
            SlotKind::Background => "BackgroundMusic",
            SlotKind::Effect => "SoundEffect",
        }
    }
}

/// Identity of one handle instance, unique for the manager's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleToken(pub(crate) u64);

/// A playing handle together with what it was created from
pub(crate) struct ActiveHandle {
    pub token: HandleToken,
    pub resource: ResourceId,
    pub handle: Box<dyn PlaybackHandle>,
}

/// Ownership cell for at most one live handle
pub struct PlaybackSlot {
    kind: SlotKind,
    active: Option<ActiveHandle>,
}

impl PlaybackSlot {
    pub fn new(kind: SlotKind) -> Self {
        Self { kind, active: None }
    }

    pub fn kind(&self) -> SlotKind {
        self.kind
    }

    pub fn looping(&self) -> bool {
        self.kind.looping()
    }

    pub fn volume(&self) -> StereoVolume {
        self.kind.volume()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_none()
    }

    pub fn resource(&self) -> Option<ResourceId> {
        self.active.as_ref().map(|a| a.resource)
    }

    pub fn token(&self) -> Option<HandleToken> {
        self.active.as_ref().map(|a| a.token)
    }

    /// Store a freshly started handle.
    ///
    /// The slot must be empty: callers release the previous handle first.
    pub(crate) fn install(&mut self, active: ActiveHandle) {
        debug_assert!(self.active.is_none(), "{} slot still occupied", self.kind);
        self.active = Some(active);
    }

    /// Empty the slot, handing the previous handle to the caller
    pub(crate) fn take(&mut self) -> Option<ActiveHandle> {
        self.active.take()
    }

    /// Empty the slot only if it still holds the handle issued as `token`
    pub(crate) fn take_if(&mut self, token: HandleToken) -> Option<ActiveHandle> {
        match &self.active {
            Some(active) if active.token == token => self.active.take(),
            _ => None,
        }
    }
}

impl fmt::Debug for PlaybackSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackSlot")
            .field("kind", &self.kind)
            .field("token", &self.token())
            .field("resource", &self.resource())
            .finish()
    }
}
