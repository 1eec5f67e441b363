use foundation::math::{Quat, Vec3};
use foundation::time::Time;

/// Radius of the solid landing dot, world units.
pub const LANDING_BASE_RADIUS: f64 = 1.5;

/// Final scale multiplier both shapes grow toward.
pub const LANDING_FINAL_SCALE: f64 = 1.3;

/// Exponential growth rate (1/seconds). Matches a ~6%-per-frame step at
/// 60 fps, expressed as a pure function of elapsed time.
pub const LANDING_GROWTH_RATE: f64 = 3.6;

/// The effect reports done once the ring passes this fraction of its
/// target scale.
pub const LANDING_DONE_FRACTION: f64 = 0.98;

/// Expanding ring dimensions, world units before scaling.
pub const LANDING_RING_INNER: f64 = 3.1;
pub const LANDING_RING_OUTER: f64 = 10.0;

/// The shapes to draw for one landing pulse at a point in time.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LandingShapes {
    /// Scale of the solid dot, in [0, LANDING_FINAL_SCALE).
    pub dot_scale: f64,
    /// Scale of the expanding ring.
    pub ring_scale: f64,
    /// Ring opacity fades out as it expands.
    pub ring_opacity: f64,
}

/// Transient feedback at an arc's landing point: a dot that scales in plus
/// a ring that expands and fades.
///
/// Both shapes are flat, so they are oriented with a rotation mapping +Z
/// onto the outward radial direction at the anchor point; otherwise they
/// would render edge-on against the sphere.
#[derive(Debug, Clone, PartialEq)]
pub struct LandingEffect {
    position: Vec3,
    orientation: Quat,
    started_at: Time,
    done_fired: bool,
}

impl LandingEffect {
    pub fn spawn(position: Vec3, started_at: Time) -> Self {
        let orientation = match position.normalized() {
            Some(normal) => Quat::from_unit_vectors(Vec3::new(0.0, 0.0, 1.0), normal),
            None => Quat::IDENTITY,
        };
        Self {
            position,
            orientation,
            started_at,
            done_fired: false,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Growth fraction in [0, 1); pure in `now`.
    fn growth(&self, now: Time) -> f64 {
        let elapsed = now.since(self.started_at).max(0.0);
        1.0 - (-LANDING_GROWTH_RATE * elapsed).exp()
    }

    pub fn shapes(&self, now: Time) -> LandingShapes {
        let g = self.growth(now);
        LandingShapes {
            dot_scale: g * LANDING_FINAL_SCALE,
            ring_scale: g * LANDING_FINAL_SCALE,
            ring_opacity: 1.0 - g,
        }
    }

    pub fn is_done(&self, now: Time) -> bool {
        self.growth(now) > LANDING_DONE_FRACTION
    }

    /// Edge-triggered done notification; true exactly once.
    pub fn poll_done(&mut self, now: Time) -> bool {
        if self.done_fired || !self.is_done(now) {
            return false;
        }
        self.done_fired = true;
        true
    }
}
