use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{
    broadcast::{
        self,
        error::{RecvError, TryRecvError},
    },
    mpsc,
};
use tracing::{debug, error, info, instrument, warn};

use super::{
    activity_log::ActivityLog,
    page::{Display, ElementId, Page},
    sdk::{ConnectOptions, LogLevel, Room, RoomEvent, SdkError, TrackHandle, VideoSdk},
    token_source::{TokenSource, TokenSourceError},
    tracks::{
        attach_participant_tracks, attach_tracks, detach_participant_tracks, detach_tracks,
        stop_tracks,
    },
};
use crate::token::TokenResponse;

/// Lifecycle of the room session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    /// Waiting for the SDK's connect call to resolve
    Joining,
    Joined,
}

/// User actions wired to the page's buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Join,
    Leave,
    Preview,
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("No access token has been issued yet")]
    NotReady,

    #[error("Room name is empty")]
    EmptyRoomName,

    #[error("Already joined a room")]
    AlreadyJoined,

    #[error("Not joined to a room")]
    NotJoined,

    #[error("Could not connect: {0}")]
    Connect(SdkError),

    #[error("Unable to access local media: {0}")]
    Media(SdkError),

    #[error(transparent)]
    Token(#[from] TokenSourceError),
}

#[derive(Debug, Clone, Default)]
pub struct ControllerConfig {
    /// SDK verbosity requested on every connect
    pub log_level: LogLevel,
}

/// A joined room together with the controller's event subscription.
/// Dropping it unregisters from the room's events.
struct Session {
    room: Arc<dyn Room>,
    events: broadcast::Receiver<RoomEvent>,
}

/// Drives the quickstart page: token acquisition, preview, and the
/// join/leave lifecycle of at most one room session
pub struct RoomSessionController<P: Page> {
    sdk: Arc<dyn VideoSdk>,
    token_source: Arc<dyn TokenSource>,
    config: ControllerConfig,
    page: P,
    activity: ActivityLog,
    grant: Option<TokenResponse>,
    state: SessionState,
    session: Option<Session>,
    preview_tracks: Option<Vec<TrackHandle>>,
}

impl<P: Page> RoomSessionController<P> {
    pub fn new(sdk: Arc<dyn VideoSdk>, token_source: Arc<dyn TokenSource>, page: P) -> Self {
        Self::with_config(sdk, token_source, page, ControllerConfig::default())
    }

    pub fn with_config(
        sdk: Arc<dyn VideoSdk>,
        token_source: Arc<dyn TokenSource>,
        page: P,
        config: ControllerConfig,
    ) -> Self {
        Self {
            sdk,
            token_source,
            config,
            page,
            activity: ActivityLog::new(),
            grant: None,
            state: SessionState::Idle,
            session: None,
            preview_tracks: None,
        }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn identity(&self) -> Option<&str> {
        self.grant.as_ref().map(|grant| grant.identity.as_str())
    }

    pub fn activity_log(&self) -> &ActivityLog {
        &self.activity
    }

    pub fn active_room(&self) -> Option<&Arc<dyn Room>> {
        self.session.as_ref().map(|session| &session.room)
    }

    pub fn preview_tracks(&self) -> Option<&[TrackHandle]> {
        self.preview_tracks.as_deref()
    }

    fn log_activity(&mut self, message: impl Into<String>) {
        self.activity.log(&mut self.page, message);
    }

    /// Exactly one of join/leave is shown, matching whether a session is active
    fn render_buttons(&mut self) {
        let joined = self.session.is_some();
        self.page.set_display(
            ElementId::JoinButton,
            if joined { Display::None } else { Display::Inline },
        );
        self.page.set_display(
            ElementId::LeaveButton,
            if joined { Display::Inline } else { Display::None },
        );
    }

    /// Fetches the identity and access token, then reveals the room controls.
    /// On failure the controls stay hidden; there is no retry.
    #[instrument(skip(self))]
    pub async fn init(&mut self) -> Result<(), ControllerError> {
        if self.grant.is_some() {
            debug!("Token already acquired");
            return Ok(());
        }

        self.render_buttons();

        let grant = self.token_source.fetch().await.map_err(|e| {
            warn!(error = %e, "Token acquisition failed");
            ControllerError::Token(e)
        })?;

        info!(identity = %grant.identity, "Token acquired");
        self.grant = Some(grant);
        self.page.set_display(ElementId::RoomControls, Display::Block);
        Ok(())
    }

    /// Joins the room named in the room-name input
    #[instrument(skip(self))]
    pub async fn join(&mut self) -> Result<(), ControllerError> {
        let token = match &self.grant {
            Some(grant) => grant.token.clone(),
            None => return Err(ControllerError::NotReady),
        };

        // `join` holds `&mut self` across connect, so callers never observe `Joining`
        if self.state != SessionState::Idle {
            return Err(ControllerError::AlreadyJoined);
        }

        let input = self.page.input_value(ElementId::RoomNameInput);
        let room_name = input.trim();
        if room_name.is_empty() {
            self.page.alert("Please enter a room name.");
            return Err(ControllerError::EmptyRoomName);
        }

        self.log_activity(format!("Joining room '{}'...", room_name));

        let mut options = ConnectOptions::new(room_name, self.config.log_level);
        if let Some(tracks) = &self.preview_tracks {
            options = options.with_tracks(tracks.clone());
        }

        self.state = SessionState::Joining;
        self.page.set_disabled(ElementId::JoinButton, true);

        let result = self.sdk.connect(&token, options).await;

        self.page.set_disabled(ElementId::JoinButton, false);

        match result {
            Ok(room) => {
                self.room_joined(room);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, room = %room_name, "Connect failed");
                self.state = SessionState::Idle;
                self.log_activity(format!("Could not connect: {}", e.message()));
                Err(ControllerError::Connect(e))
            }
        }
    }

    fn room_joined(&mut self, room: Arc<dyn Room>) {
        // Subscribe before rendering anything so no event is missed
        let events = room.subscribe();
        self.session = Some(Session {
            room: Arc::clone(&room),
            events,
        });
        self.state = SessionState::Joined;

        info!(room = %room.name(), room_sid = %room.sid(), "Joined room");
        let identity = self.identity().unwrap_or_default().to_string();
        self.log_activity(format!("Joined as '{}'", identity));
        self.render_buttons();

        // Local tracks may already be on screen from a preview
        if !self.page.contains_video(ElementId::LocalMedia) {
            attach_participant_tracks(
                &mut self.page,
                &room.local_participant(),
                ElementId::LocalMedia,
            );
        }

        for participant in room.participants() {
            self.log_activity(format!("Already in Room: '{}'", participant.identity));
            attach_participant_tracks(&mut self.page, &participant, ElementId::RemoteMedia);
        }
    }

    /// Asks the SDK to disconnect; cleanup runs once `Disconnected` arrives
    #[instrument(skip(self))]
    pub fn leave(&mut self) -> Result<(), ControllerError> {
        let room = match &self.session {
            Some(session) => Arc::clone(&session.room),
            None => return Err(ControllerError::NotJoined),
        };

        self.log_activity("Leaving room...");
        room.disconnect();
        Ok(())
    }

    /// Shows the local camera before joining, capturing tracks only once
    #[instrument(skip(self))]
    pub async fn preview(&mut self) -> Result<(), ControllerError> {
        let tracks = match &self.preview_tracks {
            Some(tracks) => tracks.clone(),
            None => match self.sdk.create_local_tracks().await {
                Ok(tracks) => tracks,
                Err(e) => {
                    error!(error = %e, "Unable to access local media");
                    self.log_activity("Unable to access Camera and Microphone");
                    return Err(ControllerError::Media(e));
                }
            },
        };

        if !self.page.contains_video(ElementId::LocalMedia) {
            attach_tracks(&mut self.page, &tracks, ElementId::LocalMedia);
        }
        self.preview_tracks = Some(tracks);
        Ok(())
    }

    /// Reacts to one event from the active room
    #[instrument(skip(self, event), fields(kind = event.kind().as_str()))]
    pub fn handle_room_event(&mut self, event: RoomEvent) {
        if self.session.is_none() {
            debug!("Ignoring room event without an active session");
            return;
        }

        match event {
            RoomEvent::ParticipantConnected(participant) => {
                self.log_activity(format!("Joining: '{}'", participant.identity));
            }
            RoomEvent::TrackAdded { track, participant } => {
                self.log_activity(format!(
                    "{} added track: {}",
                    participant.identity,
                    track.kind()
                ));
                attach_tracks(&mut self.page, &[track], ElementId::RemoteMedia);
            }
            RoomEvent::TrackRemoved { track, participant } => {
                self.log_activity(format!(
                    "{} removed track: {}",
                    participant.identity,
                    track.kind()
                ));
                detach_tracks(&mut self.page, &[track]);
            }
            RoomEvent::ParticipantDisconnected(participant) => {
                self.log_activity(format!(
                    "Participant '{}' left the room",
                    participant.identity
                ));
                detach_participant_tracks(&mut self.page, &participant);
            }
            RoomEvent::Disconnected => self.room_left(),
        }
    }

    /// Shared cleanup for user-initiated leave and connection loss
    fn room_left(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        self.log_activity("Left");

        // Stopped tracks cannot be previewed again, so the next preview captures anew
        if let Some(tracks) = self.preview_tracks.take() {
            stop_tracks(&tracks);
        }

        detach_participant_tracks(&mut self.page, &session.room.local_participant());
        for participant in session.room.participants() {
            detach_participant_tracks(&mut self.page, &participant);
        }

        info!(room = %session.room.name(), "Left room");
        drop(session);

        self.state = SessionState::Idle;
        self.render_buttons();
    }

    /// Handles every room event already queued, without waiting.
    /// Returns the number of events handled.
    pub fn process_pending_room_events(&mut self) -> usize {
        let mut handled = 0;

        loop {
            let next = match self.session.as_mut() {
                Some(session) => session.events.try_recv(),
                None => break,
            };

            match next {
                Ok(event) => {
                    self.handle_room_event(event);
                    handled += 1;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Room event subscriber lagged");
                }
                Err(TryRecvError::Closed) => {
                    // The room went away without announcing it
                    self.handle_room_event(RoomEvent::Disconnected);
                    handled += 1;
                }
                Err(TryRecvError::Empty) => break,
            }
        }

        handled
    }

    /// Waits for the next event of the active room; None when not joined
    pub async fn next_room_event(&mut self) -> Option<RoomEvent> {
        let session = self.session.as_mut()?;

        loop {
            match session.events.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Room event subscriber lagged");
                }
                Err(RecvError::Closed) => return Some(RoomEvent::Disconnected),
            }
        }
    }

    pub async fn dispatch(&mut self, command: UiCommand) -> Result<(), ControllerError> {
        match command {
            UiCommand::Join => self.join().await,
            UiCommand::Leave => self.leave(),
            UiCommand::Preview => self.preview().await,
        }
    }

    /// Disconnects the active room when the page is going away.
    /// A join still in flight is not affected.
    pub fn before_unload(&mut self) {
        if let Some(session) = &self.session {
            info!(room = %session.room.name(), "Page unloading, disconnecting");
            session.room.disconnect();
        }
    }

    /// Event loop for the lifetime of the page.
    ///
    /// Commands are handled one at a time, interleaved with events from the
    /// active room. Closing the command channel counts as page unload.
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<UiCommand>) -> Self {
        if let Err(e) = self.init().await {
            warn!(error = %e, "Room controls stay hidden");
        }

        loop {
            tokio::select! {
                // Events already delivered by the room go before further user input
                biased;

                Some(event) = self.next_room_event() => self.handle_room_event(event),
                command = commands.recv() => match command {
                    Some(command) => {
                        if let Err(e) = self.dispatch(command).await {
                            debug!(?command, error = %e, "Command not completed");
                        }
                    }
                    None => {
                        self.before_unload();
                        break;
                    }
                },
            }
        }

        self
    }
}
