use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

use uuid::Uuid;

use quickstart::{
    client::{
        ConnectOptions, Display, ElementId, InMemoryPage, MediaElement, Page, Participant, Room,
        RoomEvent, SdkError, TokenSource, TokenSourceError, Track, TrackHandle, TrackKind,
        VideoSdk,
    },
    TokenResponse,
};

// ============================================================================
// Mock Tracks
// ============================================================================

#[derive(Debug)]
pub struct MockTrack {
    id: String,
    kind: TrackKind,
    attached: Mutex<Vec<MediaElement>>,
    stopped: AtomicBool,
}

impl MockTrack {
    pub fn new(id: &str, kind: TrackKind) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            kind,
            attached: Mutex::new(Vec::new()),
            stopped: AtomicBool::new(false),
        })
    }

    pub fn video(id: &str) -> Arc<Self> {
        Self::new(id, TrackKind::Video)
    }

    pub fn audio(id: &str) -> Arc<Self> {
        Self::new(id, TrackKind::Audio)
    }

    pub fn attached_count(&self) -> usize {
        self.attached.lock().unwrap().len()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

impl Track for MockTrack {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> TrackKind {
        self.kind
    }

    fn attach(&self) -> MediaElement {
        let element = MediaElement::new(self.kind);
        self.attached.lock().unwrap().push(element.clone());
        element
    }

    fn detach(&self) -> Vec<MediaElement> {
        std::mem::take(&mut *self.attached.lock().unwrap())
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}

/// An audio + video pair, as captured from a camera and microphone
pub fn camera_and_mic(prefix: &str) -> Vec<Arc<MockTrack>> {
    vec![
        MockTrack::audio(&format!("{}-audio", prefix)),
        MockTrack::video(&format!("{}-video", prefix)),
    ]
}

pub fn as_handles(tracks: &[Arc<MockTrack>]) -> Vec<TrackHandle> {
    tracks
        .iter()
        .map(|track| Arc::clone(track) as TrackHandle)
        .collect()
}

/// A remote participant publishing a camera and microphone
pub fn remote_participant(identity: &str) -> Participant {
    Participant::new(format!("PA-{}", identity), identity)
        .with_tracks(as_handles(&camera_and_mic(identity)))
}

// ============================================================================
// Mock Room
// ============================================================================

pub struct MockRoom {
    sid: String,
    name: String,
    local: Participant,
    participants: Mutex<Vec<Participant>>,
    events: broadcast::Sender<RoomEvent>,
    disconnect_calls: AtomicUsize,
}

impl MockRoom {
    pub fn new(name: &str, local: Participant, participants: Vec<Participant>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            sid: format!("RM-{}", name),
            name: name.to_string(),
            local,
            participants: Mutex::new(participants),
            events,
            disconnect_calls: AtomicUsize::new(0),
        }
    }

    pub fn emit(&self, event: RoomEvent) {
        let _ = self.events.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }

    pub fn disconnect_calls(&self) -> usize {
        self.disconnect_calls.load(Ordering::SeqCst)
    }

    fn find_participant(&self, identity: &str) -> Option<Participant> {
        self.participants
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.identity == identity)
            .cloned()
    }

    pub fn connect_participant(&self, participant: Participant) {
        self.participants.lock().unwrap().push(participant.clone());
        self.emit(RoomEvent::ParticipantConnected(participant));
    }

    pub fn publish_track(&self, identity: &str, track: TrackHandle) {
        let participant = {
            let mut participants = self.participants.lock().unwrap();
            let participant = participants
                .iter_mut()
                .find(|p| p.identity == identity)
                .unwrap();
            participant
                .tracks
                .insert(track.id().to_string(), Arc::clone(&track));
            participant.clone()
        };
        self.emit(RoomEvent::TrackAdded { track, participant });
    }

    pub fn unpublish_track(&self, identity: &str, track_id: &str) {
        let (track, participant) = {
            let mut participants = self.participants.lock().unwrap();
            let participant = participants
                .iter_mut()
                .find(|p| p.identity == identity)
                .unwrap();
            let track = participant.tracks.remove(track_id).unwrap();
            (track, participant.clone())
        };
        self.emit(RoomEvent::TrackRemoved { track, participant });
    }

    pub fn disconnect_participant(&self, identity: &str) {
        let participant = self.find_participant(identity).unwrap();
        self.participants
            .lock()
            .unwrap()
            .retain(|p| p.identity != identity);
        self.emit(RoomEvent::ParticipantDisconnected(participant));
    }

    /// Simulates losing the connection without the user asking to leave
    pub fn drop_connection(&self) {
        self.emit(RoomEvent::Disconnected);
    }
}

impl Room for MockRoom {
    fn sid(&self) -> &str {
        &self.sid
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn local_participant(&self) -> Participant {
        self.local.clone()
    }

    fn participants(&self) -> Vec<Participant> {
        self.participants.lock().unwrap().clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<RoomEvent> {
        self.events.subscribe()
    }

    fn disconnect(&self) {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        self.emit(RoomEvent::Disconnected);
    }
}

// ============================================================================
// Mock SDK
// ============================================================================

pub struct MockVideoSdk {
    connect_calls: Mutex<Vec<(String, ConnectOptions)>>,
    connect_error: Mutex<Option<SdkError>>,
    media_error: Mutex<Option<SdkError>>,
    local_track_requests: AtomicUsize,
    captured_tracks: Mutex<Vec<Arc<MockTrack>>>,
    remote_participants: Vec<Participant>,
    rooms: Mutex<Vec<Arc<MockRoom>>>,
}

impl MockVideoSdk {
    pub fn new(remote_participants: Vec<Participant>) -> Self {
        Self {
            connect_calls: Mutex::new(Vec::new()),
            connect_error: Mutex::new(None),
            media_error: Mutex::new(None),
            local_track_requests: AtomicUsize::new(0),
            captured_tracks: Mutex::new(Vec::new()),
            remote_participants,
            rooms: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_connect_with(&self, error: SdkError) {
        *self.connect_error.lock().unwrap() = Some(error);
    }

    pub fn fail_media_with(&self, error: SdkError) {
        *self.media_error.lock().unwrap() = Some(error);
    }

    pub fn connect_calls(&self) -> Vec<(String, ConnectOptions)> {
        self.connect_calls.lock().unwrap().clone()
    }

    pub fn local_track_requests(&self) -> usize {
        self.local_track_requests.load(Ordering::SeqCst)
    }

    /// Every track handed out by `create_local_tracks` so far
    pub fn captured_tracks(&self) -> Vec<Arc<MockTrack>> {
        self.captured_tracks.lock().unwrap().clone()
    }

    pub fn rooms(&self) -> Vec<Arc<MockRoom>> {
        self.rooms.lock().unwrap().clone()
    }

    pub fn last_room(&self) -> Arc<MockRoom> {
        self.rooms.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl VideoSdk for MockVideoSdk {
    async fn connect(
        &self,
        token: &str,
        options: ConnectOptions,
    ) -> Result<Arc<dyn Room>, SdkError> {
        self.connect_calls
            .lock()
            .unwrap()
            .push((token.to_string(), options.clone()));

        if let Some(error) = self.connect_error.lock().unwrap().clone() {
            return Err(error);
        }

        let local_tracks = match options.tracks {
            Some(tracks) => tracks,
            None => as_handles(&camera_and_mic("local")),
        };
        let local = Participant::new("PA-local", "local").with_tracks(local_tracks);

        let room = Arc::new(MockRoom::new(
            &options.name,
            local,
            self.remote_participants.clone(),
        ));
        self.rooms.lock().unwrap().push(Arc::clone(&room));
        Ok(room as Arc<dyn Room>)
    }

    async fn create_local_tracks(&self) -> Result<Vec<TrackHandle>, SdkError> {
        let request = self.local_track_requests.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.media_error.lock().unwrap().clone() {
            return Err(error);
        }

        let tracks = camera_and_mic(&format!("preview{}", request));
        self.captured_tracks
            .lock()
            .unwrap()
            .extend(tracks.iter().cloned());
        Ok(as_handles(&tracks))
    }
}

// ============================================================================
// Mock Token Source
// ============================================================================

pub struct MockTokenSource {
    grant: Option<TokenResponse>,
}

impl MockTokenSource {
    pub fn issuing(identity: &str, token: &str) -> Self {
        Self {
            grant: Some(TokenResponse {
                identity: identity.to_string(),
                token: token.to_string(),
            }),
        }
    }

    pub fn unreachable() -> Self {
        Self { grant: None }
    }
}

#[async_trait]
impl TokenSource for MockTokenSource {
    async fn fetch(&self) -> Result<TokenResponse, TokenSourceError> {
        self.grant
            .clone()
            .ok_or_else(|| TokenSourceError::Request("connection refused".to_string()))
    }
}

// ============================================================================
// Recording Page
// ============================================================================

/// `InMemoryPage` that also remembers every enable/disable of the join button
#[derive(Default)]
pub struct RecordingPage {
    inner: InMemoryPage,
    join_button_history: Vec<bool>,
}

impl RecordingPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &InMemoryPage {
        &self.inner
    }

    pub fn type_into(&mut self, id: ElementId, value: &str) {
        self.inner.type_into(id, value);
    }

    /// Disabled flags passed for the join button, oldest first
    pub fn join_button_history(&self) -> &[bool] {
        &self.join_button_history
    }
}

impl Page for RecordingPage {
    fn set_display(&mut self, id: ElementId, display: Display) {
        self.inner.set_display(id, display);
    }

    fn set_disabled(&mut self, id: ElementId, disabled: bool) {
        if id == ElementId::JoinButton {
            self.join_button_history.push(disabled);
        }
        self.inner.set_disabled(id, disabled);
    }

    fn input_value(&self, id: ElementId) -> String {
        self.inner.input_value(id)
    }

    fn append_child(&mut self, container: ElementId, element: MediaElement) {
        self.inner.append_child(container, element);
    }

    fn remove_element(&mut self, element_id: Uuid) -> bool {
        self.inner.remove_element(element_id)
    }

    fn contains_video(&self, container: ElementId) -> bool {
        self.inner.contains_video(container)
    }

    fn alert(&mut self, message: &str) {
        self.inner.alert(message);
    }

    fn append_html(&mut self, container: ElementId, html: &str) {
        self.inner.append_html(container, html);
    }

    fn scroll_to_bottom(&mut self, id: ElementId) {
        self.inner.scroll_to_bottom(id);
    }
}
