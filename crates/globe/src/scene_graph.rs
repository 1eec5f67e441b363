//! The scene-graph root: owns the shared rotation state, the scale-in
//! animation, and every visual layer, and routes pointer input.

use foundation::math::{Vec2, exp_approach};
use foundation::time::Time;
use formats::dots::LandDot;
use formats::trips::{ArcLocation, CityLocation};
use layers::arcs::{ArcEvent, ArcGroup, ArcGroupConfig};
use layers::dots::{DotCloud, PointerTracker, Ray};
use layers::landing::LandingEffect;
use layers::markers::MarkerSet;
use layers::style::LayerStyle;
use runtime::event_bus::{EngineEvent, Event, EventBus};
use runtime::frame::Frame;
use runtime::timers::{TimerId, TimerQueue};
use scene::camera::{Camera, FlightStatus, FocusController};
use scene::rotation::RotationState;
use scene::viewport::{Breakpoint, INITIAL_SCALE, SCALE_RATE};
use tracing::{debug, warn};

use crate::config::GlobeConfig;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum SceneTask {
    ClearHighlight,
}

/// The interactive globe.
///
/// Per-frame update order is fixed (see `update`): timers, rotation, focus,
/// scale, arcs, landing effects, dot colors. Rotation always settles before
/// arc state is advanced, and every animation is evaluated against the
/// frame's single `now`, so repeated evaluation within a frame is
/// idempotent.
pub struct GlobeScene {
    config: GlobeConfig,
    breakpoint: Breakpoint,
    frame: Frame,

    rotation: RotationState,
    camera: Camera,
    focus: FocusController,

    dots: Option<DotCloud>,
    arcs: Option<ArcGroup>,
    markers: Option<MarkerSet>,
    landing: Vec<LandingEffect>,

    pointer: PointerTracker,
    timers: TimerQueue<SceneTask>,
    highlight_timer: Option<TimerId>,

    scale: f64,
    bus: EventBus,
}

impl GlobeScene {
    pub fn new(config: GlobeConfig, breakpoint: Breakpoint) -> Self {
        Self {
            config,
            breakpoint,
            frame: Frame::start(),
            rotation: RotationState::new(),
            camera: Camera::overview(),
            focus: FocusController::new(),
            dots: None,
            arcs: None,
            markers: None,
            landing: Vec::new(),
            pointer: PointerTracker::new(),
            timers: TimerQueue::new(),
            highlight_timer: None,
            scale: INITIAL_SCALE,
            bus: EventBus::new(),
        }
    }

    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    pub fn now(&self) -> Time {
        self.frame.time
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// The globe stays invisible until the land dots have arrived, so an
    /// empty sphere never flashes on screen.
    pub fn is_visible(&self) -> bool {
        self.dots.is_some()
    }

    pub fn dot_cloud(&self) -> Option<&DotCloud> {
        self.dots.as_ref()
    }

    pub fn arc_group(&self) -> Option<&ArcGroup> {
        self.arcs.as_ref()
    }

    pub fn marker_set(&self) -> Option<&MarkerSet> {
        self.markers.as_ref()
    }

    pub fn landing_effects(&self) -> &[LandingEffect] {
        &self.landing
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.bus.drain()
    }

    // ------------------------------------------------------------------
    // Data ingestion
    // ------------------------------------------------------------------

    /// Install the loaded land-dot dataset and reveal the globe.
    pub fn dots_loaded(&mut self, dots: Vec<LandDot>) {
        let count = dots.len();
        self.dots = Some(DotCloud::new(
            dots,
            self.config.dot_base_color,
            self.config.dot_highlight_color,
            self.config.dot_point_size,
        ));
        self.bus.emit(self.frame, EngineEvent::DotsLoaded { count });
    }

    /// Record a failed load. The dot layer (and the whole globe) simply
    /// never appears; there is no retry.
    pub fn dots_failed(&mut self, reason: impl std::fmt::Display) {
        let reason = reason.to_string();
        warn!(%reason, "land-dot dataset failed to load; globe stays hidden");
        self.bus
            .emit(self.frame, EngineEvent::DotsLoadFailed { reason });
    }

    /// Show markers for a set of cities.
    pub fn set_markers(&mut self, cities: &[CityLocation]) {
        self.markers = Some(MarkerSet::new(
            cities,
            self.config.radius,
            self.config.marker_size,
            LayerStyle::new(true, self.config.marker_color, 1.0, 0.0),
        ));
    }

    // ------------------------------------------------------------------
    // Arcs
    // ------------------------------------------------------------------

    /// Play a finite arc set, replacing any active group.
    pub fn play_arcs(&mut self, locations: Vec<ArcLocation>, config: ArcGroupConfig) {
        self.arcs = Some(ArcGroup::play(locations, config, self.frame.time));
    }

    /// Endless random connections between the given arcs' cities.
    pub fn start_free_mode(&mut self, locations: &[ArcLocation], seed: u64) {
        let config = self.config.arcs.clone();
        self.arcs = Some(ArcGroup::free(locations, seed, config, self.frame.time));
    }

    /// Stop and clear the active arc group.
    pub fn clear_arcs(&mut self) {
        if let Some(arcs) = self.arcs.as_mut() {
            arcs.clear();
        }
        self.arcs = None;
    }

    // ------------------------------------------------------------------
    // Focus
    // ------------------------------------------------------------------

    /// Fly the camera to a country, or clear focus with `None`.
    ///
    /// Unknown countries and not-yet-loaded dot data are silent no-ops.
    /// Re-targeting mid-flight overrides the previous flight.
    pub fn set_focus(&mut self, iso_a3: Option<&str>) {
        let now = self.frame.time;
        match iso_a3 {
            Some(iso) => {
                let Some(dots) = self.dots.as_ref() else {
                    debug!(iso, "focus requested before dot data loaded");
                    return;
                };
                let Some(centroid) = dots.centroid(iso) else {
                    debug!(iso, "focus requested for a country with no dots");
                    return;
                };

                // The centroid lives in the globe's rotating local frame;
                // focus works on the world-space point.
                let world = self.rotation.euler.rotate(centroid) * self.scale;
                self.focus.focus_point(
                    &self.camera,
                    iso,
                    world,
                    self.breakpoint.focus_distance_offset(),
                    now,
                    self.config.focus_duration_s,
                );
                self.rotation.set_focus_active(true);
                self.bus.emit(
                    self.frame,
                    EngineEvent::FocusStarted {
                        iso_a3: iso.to_string(),
                    },
                );
            }
            None => {
                if self.focus.focused_iso().is_none() && !self.focus.in_flight() {
                    return;
                }
                self.focus.clear(
                    &self.camera,
                    Camera::overview().position,
                    now,
                    self.config.focus_duration_s,
                );
                self.rotation.set_focus_active(true);
                self.bus.emit(self.frame, EngineEvent::FocusCleared);
            }
        }
    }

    // ------------------------------------------------------------------
    // Pointer input
    // ------------------------------------------------------------------

    /// Pointer pressed. `ray` is the host's camera ray for the event, if
    /// the host has one (it arrives in the globe's local frame).
    pub fn pointer_down(&mut self, pos: Vec2, ray: Option<Ray>) {
        let hit = self.pick_index(ray);
        self.pointer.pointer_down(pos, hit);
        self.rotation.begin_drag();
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        if let Some(delta) = self.pointer.pointer_move(pos) {
            self.rotation.drag_by(delta.x, delta.y);
        }
    }

    /// Pointer released: either completes a selection (same dot as
    /// pointer-down, under the drag threshold) or ends a camera orbit.
    pub fn pointer_up(&mut self, ray: Option<Ray>) -> Option<String> {
        let hit = self.pick_index(ray);
        let selected = self.pointer.pointer_up(hit);
        self.rotation.end_drag(self.frame.time);

        let index = selected?;
        let iso = self
            .dots
            .as_ref()
            .and_then(|dots| dots.dot(index))
            .map(|dot| dot.iso_a3.clone())?;
        self.select_country(&iso);
        Some(iso)
    }

    /// Spotlight a country for the configured hold time, and optionally
    /// fly the camera to it.
    pub fn select_country(&mut self, iso_a3: &str) {
        let now = self.frame.time;
        if let Some(dots) = self.dots.as_mut() {
            dots.set_spotlight([iso_a3]);
        }

        // A new selection restarts the hold window.
        if let Some(previous) = self.highlight_timer.take() {
            self.timers.cancel(previous);
        }
        self.highlight_timer = Some(self.timers.schedule_in(
            now,
            self.config.highlight_hold_s,
            SceneTask::ClearHighlight,
        ));

        self.bus.emit(
            self.frame,
            EngineEvent::CountrySelected {
                iso_a3: iso_a3.to_string(),
            },
        );

        if self.config.focus_on_select {
            self.set_focus(Some(iso_a3));
        }
    }

    fn pick_index(&self, ray: Option<Ray>) -> Option<usize> {
        let dots = self.dots.as_ref()?;
        let hit = dots.pick(ray?, self.config.pick)?;
        Some(hit.index)
    }

    // ------------------------------------------------------------------
    // Per-frame update
    // ------------------------------------------------------------------

    pub fn update(&mut self, dt_s: f64) {
        self.frame = self.frame.advance(dt_s);
        let now = self.frame.time;

        // 1. Scheduled tasks.
        for (id, task) in self.timers.fire_due(now) {
            match task {
                SceneTask::ClearHighlight => {
                    if self.highlight_timer == Some(id) {
                        self.highlight_timer = None;
                    }
                    if let Some(dots) = self.dots.as_mut() {
                        dots.clear_spotlight();
                    }
                    self.bus.emit(self.frame, EngineEvent::HighlightCleared);
                }
            }
        }

        // 2. Rotation (single writer; no-op unless auto-rotate owns it).
        self.rotation
            .auto_rotate(now, dt_s, self.config.rotation_speed_rad_s);

        // 3. Camera focus flight.
        if self.focus.update(&mut self.camera, now) == FlightStatus::Settled {
            self.rotation.set_focus_active(false);
            self.bus.emit(self.frame, EngineEvent::FocusSettled);
        }

        // 4. Scale-in once data is present.
        if self.dots.is_some() {
            self.scale = exp_approach(self.scale, self.breakpoint.target_scale(), SCALE_RATE, dt_s);
        }

        // 5. Arcs (after rotation per the frame ordering contract).
        if let Some(arcs) = self.arcs.as_mut() {
            for event in arcs.update(now) {
                match event {
                    ArcEvent::Landing { arc, position } => {
                        self.landing.push(LandingEffect::spawn(position, now));
                        self.bus.emit(self.frame, EngineEvent::LandingSpawned { arc });
                    }
                    ArcEvent::ArcDone { arc } => {
                        self.bus.emit(self.frame, EngineEvent::ArcDone { arc });
                    }
                    ArcEvent::AllDone => {
                        self.bus.emit(self.frame, EngineEvent::AllArcsDone);
                    }
                    ArcEvent::SequenceRestarted => {}
                }
            }
        }

        // 6. Landing pulses remove themselves once grown.
        for fx in &mut self.landing {
            let _ = fx.poll_done(now);
        }
        self.landing.retain(|fx| !fx.is_done(now));

        // 7. Dot recolor only when the spotlight set changed.
        if let Some(dots) = self.dots.as_mut() {
            dots.refresh_colors();
        }
    }

    pub fn set_breakpoint(&mut self, breakpoint: Breakpoint) {
        self.breakpoint = breakpoint;
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }
}

#[cfg(test)]
mod tests {
    use super::GlobeScene;
    use crate::config::GlobeConfig;
    use foundation::math::{Vec2, Vec3};
    use formats::dots::LandDot;
    use layers::dots::Ray;
    use runtime::event_bus::EngineEvent;
    use scene::viewport::Breakpoint;

    fn dot(x: f64, y: f64, z: f64, iso: &str) -> LandDot {
        LandDot {
            x,
            y,
            z,
            country_name: iso.to_string(),
            iso_a3: iso.to_string(),
        }
    }

    fn test_dots() -> Vec<LandDot> {
        vec![
            dot(0.0, 0.0, 10.0, "AAA"),
            dot(10.0, 0.0, 0.0, "AAA"),
            dot(0.0, 10.0, 0.0, "BBB"),
        ]
    }

    fn scene_with_dots() -> GlobeScene {
        let mut config = GlobeConfig::default();
        config.focus_on_select = false;
        let mut scene = GlobeScene::new(config, Breakpoint::Md);
        scene.dots_loaded(test_dots());
        scene
    }

    #[test]
    fn hidden_until_dots_load_and_failure_stays_hidden() {
        let mut scene = GlobeScene::new(GlobeConfig::default(), Breakpoint::Md);
        assert!(!scene.is_visible());

        scene.dots_failed("404 not found");
        assert!(!scene.is_visible());
        let events = scene.drain_events();
        assert!(matches!(
            events[0].event,
            EngineEvent::DotsLoadFailed { .. }
        ));

        scene.dots_loaded(test_dots());
        assert!(scene.is_visible());
    }

    #[test]
    fn focus_flies_along_the_centroid_ray() {
        let mut scene = scene_with_dots();
        let before = scene.camera().position;

        // The flight target is computed against the scale at focus time.
        let scale_at_focus = scene.scale();
        scene.set_focus(Some("AAA"));
        // Fly the full configured duration.
        for _ in 0..150 {
            scene.update(1.0 / 60.0);
        }

        let centroid = Vec3::new(5.0, 0.0, 5.0) * scale_at_focus;
        let expected_dir = centroid.normalized().expect("dir");
        let got_dir = scene.camera().position.normalized().expect("dir");
        assert!(got_dir.distance_to(expected_dir) < 1e-6);

        let expected_len = centroid.length() + scene.breakpoint().focus_distance_offset();
        assert!((scene.camera().position.length() - expected_len).abs() < 1e-6);
        assert!(scene.camera().position.distance_to(before) > 1.0);
    }

    #[test]
    fn focus_on_missing_country_is_a_no_op() {
        let mut scene = scene_with_dots();
        let before = scene.camera().position;

        scene.set_focus(Some("CCC"));
        scene.update(1.0 / 60.0);
        assert_eq!(scene.camera().position, before);
        assert!(!scene.rotation().has_active_focus());
    }

    #[test]
    fn focus_suppresses_auto_rotation_until_settled() {
        let mut scene = scene_with_dots();
        scene.set_focus(Some("BBB"));
        assert!(scene.rotation().has_active_focus());

        let yaw_before = scene.rotation().euler.y;
        scene.update(0.5);
        assert_eq!(scene.rotation().euler.y, yaw_before);

        // Past the 2s flight the focus driver releases rotation.
        for _ in 0..240 {
            scene.update(1.0 / 60.0);
        }
        assert!(!scene.rotation().has_active_focus());
        let events = scene.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e.event, EngineEvent::FocusSettled)));

        let yaw = scene.rotation().euler.y;
        scene.update(1.0 / 60.0);
        assert!(scene.rotation().euler.y > yaw);
    }

    #[test]
    fn scale_eases_toward_the_breakpoint_target() {
        let mut scene = scene_with_dots();
        assert!(scene.scale() < 1.0);
        for _ in 0..600 {
            scene.update(1.0 / 60.0);
        }
        assert!((scene.scale() - Breakpoint::Md.target_scale()).abs() < 1e-3);
    }

    #[test]
    fn tap_selects_and_highlight_expires() {
        let mut scene = scene_with_dots();

        // Ray straight at the BBB dot at (0, 10, 0).
        let ray = Ray::new(Vec3::new(0.0, 10.0, 100.0), Vec3::new(0.0, 0.0, -1.0));
        scene.pointer_down(Vec2::new(50.0, 50.0), Some(ray));
        let selected = scene.pointer_up(Some(ray));
        assert_eq!(selected.as_deref(), Some("BBB"));

        scene.update(1.0 / 60.0);
        let cloud = scene.dot_cloud().expect("dots");
        assert!(cloud.spotlight().contains("BBB"));

        // Hold window (2s) expires and the highlight reverts.
        for _ in 0..150 {
            scene.update(1.0 / 60.0);
        }
        let cloud = scene.dot_cloud().expect("dots");
        assert!(cloud.spotlight().is_empty());
        let events = scene.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e.event, EngineEvent::CountrySelected { .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e.event, EngineEvent::HighlightCleared)));
    }

    #[test]
    fn dragging_suppresses_selection_and_spins_the_globe() {
        let mut scene = scene_with_dots();

        let ray = Ray::new(Vec3::new(0.0, 10.0, 100.0), Vec3::new(0.0, 0.0, -1.0));
        scene.pointer_down(Vec2::new(0.0, 0.0), Some(ray));
        scene.pointer_move(Vec2::new(30.0, 0.0));
        let selected = scene.pointer_up(Some(ray));
        assert_eq!(selected, None);
        assert!(scene.rotation().euler.y > 0.0);
    }
}
