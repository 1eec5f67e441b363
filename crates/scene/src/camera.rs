use foundation::math::{Vec3, ease_in_out_quad};
use foundation::time::Time;

/// Default focus flight duration in seconds.
pub const FOCUS_DURATION_S: f64 = 2.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y_deg: f64,
}

impl Camera {
    /// The resting pose: pulled back and slightly above the globe.
    pub fn overview() -> Self {
        Self {
            position: Vec3::new(0.0, 400.0, 900.0),
            target: Vec3::ZERO,
            fov_y_deg: 35.0,
        }
    }

    pub fn distance(&self) -> f64 {
        self.position.distance_to(self.target)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Flight {
    from: Vec3,
    to: Vec3,
    started_at: Time,
    duration_s: f64,
}

impl Flight {
    fn position_at(&self, now: Time) -> Vec3 {
        let t = if self.duration_s <= 0.0 {
            1.0
        } else {
            (now.since(self.started_at) / self.duration_s).clamp(0.0, 1.0)
        };
        self.from.lerp(self.to, ease_in_out_quad(t))
    }

    fn finished(&self, now: Time) -> bool {
        now.since(self.started_at) >= self.duration_s
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FlightStatus {
    Idle,
    InFlight,
    /// The flight reached its destination this update.
    Settled,
}

/// Eased camera flights toward (and back from) focus targets.
///
/// Cancellation contract: re-targeting while a flight is in progress
/// replaces the tween (last write wins); nothing queues.
#[derive(Debug, Default)]
pub struct FocusController {
    flight: Option<Flight>,
    focused_iso: Option<String>,
}

impl FocusController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused_iso(&self) -> Option<&str> {
        self.focused_iso.as_deref()
    }

    pub fn in_flight(&self) -> bool {
        self.flight.is_some()
    }

    /// Fly toward `world_point`, stopping `distance_offset` beyond it along
    /// the ray from the globe's center, so the target stays centered and
    /// unoccluded.
    pub fn focus_point(
        &mut self,
        camera: &Camera,
        iso_a3: &str,
        world_point: Vec3,
        distance_offset: f64,
        now: Time,
        duration_s: f64,
    ) {
        let Some(dir) = world_point.normalized() else {
            return;
        };
        let to = dir * (world_point.length() + distance_offset);
        self.flight = Some(Flight {
            from: camera.position,
            to,
            started_at: now,
            duration_s,
        });
        self.focused_iso = Some(iso_a3.to_string());
    }

    /// Ease back to the overview pose.
    pub fn clear(&mut self, camera: &Camera, overview: Vec3, now: Time, duration_s: f64) {
        self.flight = Some(Flight {
            from: camera.position,
            to: overview,
            started_at: now,
            duration_s,
        });
        self.focused_iso = None;
    }

    /// Advance the active flight; pure in `now`, so calling twice per frame
    /// leaves the camera in the same place.
    pub fn update(&mut self, camera: &mut Camera, now: Time) -> FlightStatus {
        let Some(flight) = self.flight else {
            return FlightStatus::Idle;
        };

        camera.position = flight.position_at(now);
        if flight.finished(now) {
            self.flight = None;
            return FlightStatus::Settled;
        }
        FlightStatus::InFlight
    }
}

#[cfg(test)]
mod tests {
    use super::{Camera, FlightStatus, FocusController};
    use foundation::math::Vec3;
    use foundation::time::Time;

    fn assert_vec_close(a: Vec3, b: Vec3, eps: f64) {
        assert!(a.distance_to(b) <= eps, "expected {a:?} ~= {b:?}");
    }

    #[test]
    fn flight_ends_on_the_radial_line_past_the_target() {
        let mut camera = Camera::overview();
        let mut focus = FocusController::new();

        // Centroid of two dots at (0,0,10) and (10,0,0).
        let centroid = Vec3::new(5.0, 0.0, 5.0);
        focus.focus_point(&camera, "AAA", centroid, 380.0, Time(0.0), 2.0);

        assert_eq!(focus.update(&mut camera, Time(1.0)), FlightStatus::InFlight);
        assert_eq!(focus.update(&mut camera, Time(2.0)), FlightStatus::Settled);

        let expected = centroid.normalized().expect("dir") * (centroid.length() + 380.0);
        assert_vec_close(camera.position, expected, 1e-9);
        assert!(!focus.in_flight());
    }

    #[test]
    fn update_is_pure_in_now() {
        let mut camera = Camera::overview();
        let mut focus = FocusController::new();
        focus.focus_point(&camera, "AAA", Vec3::new(0.0, 0.0, 150.0), 380.0, Time(0.0), 2.0);

        focus.update(&mut camera, Time(0.5));
        let first = camera.position;
        focus.update(&mut camera, Time(0.5));
        assert_eq!(camera.position, first);
    }

    #[test]
    fn retarget_overrides_rather_than_queues() {
        let mut camera = Camera::overview();
        let mut focus = FocusController::new();

        focus.focus_point(&camera, "AAA", Vec3::new(0.0, 0.0, 150.0), 380.0, Time(0.0), 2.0);
        focus.update(&mut camera, Time(1.0));

        // Switch mid-flight: the new tween starts from the current pose.
        let mid = camera.position;
        focus.focus_point(&camera, "BBB", Vec3::new(150.0, 0.0, 0.0), 380.0, Time(1.0), 2.0);
        assert_eq!(focus.focused_iso(), Some("BBB"));

        focus.update(&mut camera, Time(1.0));
        assert_vec_close(camera.position, mid, 1e-9);

        focus.update(&mut camera, Time(3.0));
        let expected = Vec3::new(530.0, 0.0, 0.0);
        assert_vec_close(camera.position, expected, 1e-9);
    }

    #[test]
    fn clear_returns_to_overview() {
        let overview = Camera::overview().position;
        let mut camera = Camera::overview();
        let mut focus = FocusController::new();

        focus.focus_point(&camera, "AAA", Vec3::new(0.0, 0.0, 150.0), 380.0, Time(0.0), 2.0);
        focus.update(&mut camera, Time(2.0));

        focus.clear(&camera, overview, Time(2.0), 2.0);
        assert_eq!(focus.focused_iso(), None);
        focus.update(&mut camera, Time(4.0));
        assert_vec_close(camera.position, overview, 1e-9);
    }
}
