//! Capability set consumed from the video SDK
//!
//! Everything behind these traits (media capture, negotiation, transport)
//! belongs to the SDK. The controller only sees rooms, participants and
//! tracks as opaque handles.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;

use super::page::MediaElement;

/// Media kind of a track
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Audio,
    Video,
    Data,
}

impl TrackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackKind::Audio => "audio",
            TrackKind::Video => "video",
            TrackKind::Data => "data",
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A local or remote media track
pub trait Track: Send + Sync + fmt::Debug {
    fn id(&self) -> &str;

    fn kind(&self) -> TrackKind;

    /// Creates a new renderable element bound to this track
    fn attach(&self) -> MediaElement;

    /// Unbinds and returns every element previously produced by `attach`
    fn detach(&self) -> Vec<MediaElement>;

    /// Releases the underlying capture device
    fn stop(&self);
}

pub type TrackHandle = Arc<dyn Track>;

/// A participant in a room, local or remote
#[derive(Debug, Clone)]
pub struct Participant {
    pub sid: String,
    pub identity: String,
    pub tracks: HashMap<String, TrackHandle>,
}

impl Participant {
    pub fn new(sid: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            sid: sid.into(),
            identity: identity.into(),
            tracks: HashMap::new(),
        }
    }

    pub fn with_tracks(mut self, tracks: impl IntoIterator<Item = TrackHandle>) -> Self {
        for track in tracks {
            self.tracks.insert(track.id().to_string(), track);
        }
        self
    }

    /// Snapshot of the participant's tracks; order is not meaningful
    pub fn track_list(&self) -> Vec<TrackHandle> {
        self.tracks.values().cloned().collect()
    }
}

/// The fixed set of room events the controller subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomEventKind {
    ParticipantConnected,
    ParticipantDisconnected,
    TrackAdded,
    TrackRemoved,
    Disconnected,
}

impl RoomEventKind {
    pub const ALL: [RoomEventKind; 5] = [
        RoomEventKind::ParticipantConnected,
        RoomEventKind::ParticipantDisconnected,
        RoomEventKind::TrackAdded,
        RoomEventKind::TrackRemoved,
        RoomEventKind::Disconnected,
    ];

    /// Event name as emitted by the SDK
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomEventKind::ParticipantConnected => "participantConnected",
            RoomEventKind::ParticipantDisconnected => "participantDisconnected",
            RoomEventKind::TrackAdded => "trackAdded",
            RoomEventKind::TrackRemoved => "trackRemoved",
            RoomEventKind::Disconnected => "disconnected",
        }
    }
}

/// Events emitted by a connected room
#[derive(Debug, Clone)]
pub enum RoomEvent {
    ParticipantConnected(Participant),
    ParticipantDisconnected(Participant),
    TrackAdded {
        track: TrackHandle,
        participant: Participant,
    },
    TrackRemoved {
        track: TrackHandle,
        participant: Participant,
    },
    /// The local participant left the room, either on request or because the
    /// connection was lost
    Disconnected,
}

impl RoomEvent {
    pub fn kind(&self) -> RoomEventKind {
        match self {
            RoomEvent::ParticipantConnected(_) => RoomEventKind::ParticipantConnected,
            RoomEvent::ParticipantDisconnected(_) => RoomEventKind::ParticipantDisconnected,
            RoomEvent::TrackAdded { .. } => RoomEventKind::TrackAdded,
            RoomEvent::TrackRemoved { .. } => RoomEventKind::TrackRemoved,
            RoomEvent::Disconnected => RoomEventKind::Disconnected,
        }
    }
}

/// A connected room
pub trait Room: Send + Sync {
    fn sid(&self) -> &str;

    fn name(&self) -> &str;

    fn local_participant(&self) -> Participant;

    /// Remote participants currently in the room
    fn participants(&self) -> Vec<Participant>;

    /// Registers for room events; dropping the receiver unregisters
    fn subscribe(&self) -> broadcast::Receiver<RoomEvent>;

    /// Requests disconnection; completion is signalled by `RoomEvent::Disconnected`
    fn disconnect(&self);
}

/// SDK logging verbosity requested at connect time
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

/// Options passed to `VideoSdk::connect`
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub name: String,
    pub log_level: LogLevel,
    /// Previously captured tracks to publish instead of capturing new ones
    pub tracks: Option<Vec<TrackHandle>>,
}

impl ConnectOptions {
    pub fn new(name: impl Into<String>, log_level: LogLevel) -> Self {
        Self {
            name: name.into(),
            log_level,
            tracks: None,
        }
    }

    pub fn with_tracks(mut self, tracks: Vec<TrackHandle>) -> Self {
        self.tracks = Some(tracks);
        self
    }
}

/// Failures reported by the SDK
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SdkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Media access denied: {0}")]
    MediaAccessDenied(String),

    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("{0}")]
    Other(String),
}

impl SdkError {
    /// The SDK-supplied message without the variant prefix
    pub fn message(&self) -> &str {
        match self {
            SdkError::ConnectionFailed(msg)
            | SdkError::MediaAccessDenied(msg)
            | SdkError::DeviceNotFound(msg)
            | SdkError::Other(msg) => msg,
        }
    }
}

/// Entry points of the video SDK
#[async_trait]
pub trait VideoSdk: Send + Sync {
    async fn connect(&self, token: &str, options: ConnectOptions)
        -> Result<Arc<dyn Room>, SdkError>;

    /// Captures the default camera and microphone
    async fn create_local_tracks(&self) -> Result<Vec<TrackHandle>, SdkError>;
}
