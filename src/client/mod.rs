// Browser-side room session logic
//
// The page (DOM) and the video SDK are reached only through the `Page` and
// `VideoSdk` traits, so the controller runs the same against a real page
// binding or the in-memory page used in tests.

// Public API - what other modules can use
pub use activity_log::ActivityLog;
pub use controller::{
    ControllerConfig, ControllerError, RoomSessionController, SessionState, UiCommand,
};
pub use page::{Display, ElementId, InMemoryPage, MediaElement, Page};
pub use sdk::{
    ConnectOptions, LogLevel, Participant, Room, RoomEvent, RoomEventKind, SdkError, Track,
    TrackHandle, TrackKind, VideoSdk,
};
pub use token_source::{HttpTokenSource, TokenSource, TokenSourceError};

// Internal modules
mod activity_log;
mod controller;
pub mod page;
pub mod sdk;
mod token_source;
pub mod tracks;
