use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::sdk::TrackKind;

/// Elements of the quickstart page, looked up by fixed identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    JoinButton,
    LeaveButton,
    PreviewButton,
    RoomControls,
    RoomNameInput,
    LocalMedia,
    RemoteMedia,
    Log,
}

impl ElementId {
    pub const ALL: [ElementId; 8] = [
        ElementId::JoinButton,
        ElementId::LeaveButton,
        ElementId::PreviewButton,
        ElementId::RoomControls,
        ElementId::RoomNameInput,
        ElementId::LocalMedia,
        ElementId::RemoteMedia,
        ElementId::Log,
    ];

    /// The `id` attribute of the element in the document
    pub fn dom_id(&self) -> &'static str {
        match self {
            ElementId::JoinButton => "button-join",
            ElementId::LeaveButton => "button-leave",
            ElementId::PreviewButton => "button-preview",
            ElementId::RoomControls => "room-controls",
            ElementId::RoomNameInput => "room-name",
            ElementId::LocalMedia => "local-media",
            ElementId::RemoteMedia => "remote-media",
            ElementId::Log => "log",
        }
    }
}

/// CSS `display` values the page switches between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Display {
    None,
    Block,
    Inline,
}

/// A renderable element produced by attaching a track
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaElement {
    pub id: Uuid,
    pub kind: TrackKind,
}

impl MediaElement {
    pub fn new(kind: TrackKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
        }
    }

    pub fn is_video(&self) -> bool {
        self.kind == TrackKind::Video
    }
}

/// DOM operations the room session controller relies on
pub trait Page: Send {
    fn set_display(&mut self, id: ElementId, display: Display);

    fn set_disabled(&mut self, id: ElementId, disabled: bool);

    fn input_value(&self, id: ElementId) -> String;

    fn append_child(&mut self, container: ElementId, element: MediaElement);

    /// Removes the element from the document wherever it is; false if absent
    fn remove_element(&mut self, element_id: Uuid) -> bool;

    /// Whether the container already holds a video element
    fn contains_video(&self, container: ElementId) -> bool;

    /// Blocking user-facing alert
    fn alert(&mut self, message: &str);

    fn append_html(&mut self, container: ElementId, html: &str);

    fn scroll_to_bottom(&mut self, id: ElementId);
}

#[derive(Debug, Clone)]
struct ElementState {
    display: Display,
    disabled: bool,
    value: String,
    children: Vec<MediaElement>,
    html: String,
    scrolled_to_bottom: bool,
}

impl ElementState {
    fn new(display: Display) -> Self {
        Self {
            display,
            disabled: false,
            value: String::new(),
            children: Vec::new(),
            html: String::new(),
            scrolled_to_bottom: true,
        }
    }
}

/// Headless page keeping element state in memory
///
/// Starts from the same layout the stylesheet gives the real page: room
/// controls and the leave button hidden.
#[derive(Debug, Clone)]
pub struct InMemoryPage {
    elements: HashMap<ElementId, ElementState>,
    alerts: Vec<String>,
}

impl Default for InMemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPage {
    pub fn new() -> Self {
        let elements = ElementId::ALL
            .iter()
            .map(|id| {
                let display = match id {
                    ElementId::RoomControls | ElementId::LeaveButton => Display::None,
                    ElementId::JoinButton | ElementId::PreviewButton => Display::Inline,
                    _ => Display::Block,
                };
                (*id, ElementState::new(display))
            })
            .collect();

        Self {
            elements,
            alerts: Vec::new(),
        }
    }

    fn element(&self, id: ElementId) -> Option<&ElementState> {
        self.elements.get(&id)
    }

    fn element_mut(&mut self, id: ElementId) -> &mut ElementState {
        self.elements
            .entry(id)
            .or_insert_with(|| ElementState::new(Display::Block))
    }

    /// Simulates the user typing into an input
    pub fn type_into(&mut self, id: ElementId, value: &str) {
        self.element_mut(id).value = value.to_string();
    }

    pub fn display(&self, id: ElementId) -> Display {
        self.element(id).map(|e| e.display).unwrap_or(Display::None)
    }

    pub fn is_visible(&self, id: ElementId) -> bool {
        self.display(id) != Display::None
    }

    pub fn is_disabled(&self, id: ElementId) -> bool {
        self.element(id).map(|e| e.disabled).unwrap_or(false)
    }

    pub fn children(&self, container: ElementId) -> &[MediaElement] {
        self.element(container)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    /// Count of media elements across every container
    pub fn media_element_count(&self) -> usize {
        self.elements.values().map(|e| e.children.len()).sum()
    }

    pub fn html(&self, id: ElementId) -> &str {
        self.element(id).map(|e| e.html.as_str()).unwrap_or("")
    }

    pub fn is_scrolled_to_bottom(&self, id: ElementId) -> bool {
        self.element(id).map(|e| e.scrolled_to_bottom).unwrap_or(true)
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }
}

impl Page for InMemoryPage {
    fn set_display(&mut self, id: ElementId, display: Display) {
        self.element_mut(id).display = display;
    }

    fn set_disabled(&mut self, id: ElementId, disabled: bool) {
        self.element_mut(id).disabled = disabled;
    }

    fn input_value(&self, id: ElementId) -> String {
        self.element(id).map(|e| e.value.clone()).unwrap_or_default()
    }

    fn append_child(&mut self, container: ElementId, element: MediaElement) {
        self.element_mut(container).children.push(element);
    }

    fn remove_element(&mut self, element_id: Uuid) -> bool {
        for element in self.elements.values_mut() {
            if let Some(pos) = element.children.iter().position(|c| c.id == element_id) {
                element.children.remove(pos);
                return true;
            }
        }
        false
    }

    fn contains_video(&self, container: ElementId) -> bool {
        self.children(container).iter().any(MediaElement::is_video)
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn append_html(&mut self, container: ElementId, html: &str) {
        let element = self.element_mut(container);
        element.html.push_str(html);
        element.scrolled_to_bottom = false;
    }

    fn scroll_to_bottom(&mut self, id: ElementId) {
        self.element_mut(id).scrolled_to_bottom = true;
    }
}
