use crate::frame::Frame;

/// Engine-level events for traceability.
///
/// Frame-stamped so tests and the preview app can assert on ordering
/// without reaching into component internals.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Land-dot dataset finished loading.
    DotsLoaded { count: usize },
    /// Land-dot dataset failed to load or validate; the globe stays hidden.
    DotsLoadFailed { reason: String },
    /// A click (not a drag) resolved to a country.
    CountrySelected { iso_a3: String },
    /// The ephemeral selection highlight expired.
    HighlightCleared,
    /// An arc finished its animation.
    ArcDone { arc: u64 },
    /// A landing pulse was spawned at an arc endpoint.
    LandingSpawned { arc: u64 },
    /// Every arc in a finite group has completed.
    AllArcsDone,
    /// A camera focus flight started toward a country centroid.
    FocusStarted { iso_a3: String },
    /// The camera focus flight reached its destination.
    FocusSettled,
    /// Focus was cleared; the camera is returning to the overview pose.
    FocusCleared,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub frame_index: u64,
    pub event: EngineEvent,
}

#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, frame: Frame, event: EngineEvent) {
        self.events.push(Event {
            frame_index: frame.index,
            event,
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::{EngineEvent, EventBus};
    use crate::frame::Frame;

    #[test]
    fn records_events_with_frame_index() {
        let mut bus = EventBus::new();
        let f = Frame::start().advance(0.1).advance(0.1);
        bus.emit(f, EngineEvent::AllArcsDone);
        assert_eq!(bus.events().len(), 1);
        assert_eq!(bus.events()[0].frame_index, 2);
    }

    #[test]
    fn drain_clears_events() {
        let mut bus = EventBus::new();
        bus.emit(
            Frame::start(),
            EngineEvent::CountrySelected {
                iso_a3: "USA".into(),
            },
        );
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.events().is_empty());
    }
}
