use tracing::debug;

use super::page::{ElementId, Page};
use super::sdk::{Participant, TrackHandle};

/// Attaches each track and appends its element to `container`
pub fn attach_tracks(page: &mut dyn Page, tracks: &[TrackHandle], container: ElementId) {
    for track in tracks {
        let element = track.attach();
        debug!(
            track_id = %track.id(),
            kind = %track.kind(),
            container = container.dom_id(),
            "Attaching track"
        );
        page.append_child(container, element);
    }
}

pub fn attach_participant_tracks(
    page: &mut dyn Page,
    participant: &Participant,
    container: ElementId,
) {
    attach_tracks(page, &participant.track_list(), container);
}

/// Detaches each track and removes every element it produced from the page
pub fn detach_tracks(page: &mut dyn Page, tracks: &[TrackHandle]) {
    for track in tracks {
        for element in track.detach() {
            if !page.remove_element(element.id) {
                debug!(track_id = %track.id(), element_id = %element.id, "Detached element was not in the page");
            }
        }
    }
}

pub fn detach_participant_tracks(page: &mut dyn Page, participant: &Participant) {
    detach_tracks(page, &participant.track_list());
}

pub fn stop_tracks(tracks: &[TrackHandle]) {
    for track in tracks {
        track.stop();
    }
}
