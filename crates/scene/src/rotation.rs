use foundation::math::EulerXyz;
use foundation::time::Time;

/// Radians of rotation per pixel of pointer drag.
pub const DRAG_SENSITIVITY: f64 = 0.005;

/// Seconds after a drag ends before auto-rotation resumes.
pub const RESUME_COOLDOWN_S: f64 = 1.5;

/// Pitch clamp so the globe cannot flip past its poles.
pub const MAX_PITCH_RAD: f64 = std::f64::consts::FRAC_PI_2;

/// Who is allowed to write rotation this frame.
///
/// Priority order (highest first): user drag, camera focus, auto-rotate.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RotationDriver {
    UserDrag,
    Focus,
    Auto,
    /// Auto-rotation is parked during the post-drag cooldown.
    Idle,
}

/// The globe's shared rotation state.
///
/// Single-writer contract: three drivers want to mutate the euler angles
/// (auto-rotate tick, pointer drag, camera focus); every write goes through
/// a method that checks [`RotationState::driver`] first, so no two drivers
/// can write in the same frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationState {
    pub euler: EulerXyz,
    user_interacting: bool,
    focus_active: bool,
    resume_at: Option<Time>,
}

impl Default for RotationState {
    fn default() -> Self {
        Self {
            euler: EulerXyz::IDENTITY,
            user_interacting: false,
            focus_active: false,
            resume_at: None,
        }
    }
}

impl RotationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_user_interacting(&self) -> bool {
        self.user_interacting
    }

    pub fn has_active_focus(&self) -> bool {
        self.focus_active
    }

    /// Which driver owns rotation at `now`.
    pub fn driver(&self, now: Time) -> RotationDriver {
        if self.user_interacting {
            return RotationDriver::UserDrag;
        }
        if self.focus_active {
            return RotationDriver::Focus;
        }
        if let Some(resume_at) = self.resume_at {
            if now < resume_at {
                return RotationDriver::Idle;
            }
        }
        RotationDriver::Auto
    }

    pub fn begin_drag(&mut self) {
        self.user_interacting = true;
    }

    /// Apply a pointer drag delta (pixels). Only the drag driver may write.
    pub fn drag_by(&mut self, dx_px: f64, dy_px: f64) {
        if !self.user_interacting {
            return;
        }
        self.euler.x = (self.euler.x + dy_px * DRAG_SENSITIVITY).clamp(-MAX_PITCH_RAD, MAX_PITCH_RAD);
        self.euler.y += dx_px * DRAG_SENSITIVITY;
    }

    /// End the drag; auto-rotation stays parked for the cooldown window.
    pub fn end_drag(&mut self, now: Time) {
        self.user_interacting = false;
        self.resume_at = Some(now + RESUME_COOLDOWN_S);
    }

    /// Camera focus acquires/releases rotation ownership.
    pub fn set_focus_active(&mut self, active: bool) {
        self.focus_active = active;
    }

    /// Advance auto-rotation by `speed * dt` around Y.
    ///
    /// Returns whether anything was written; a no-op while another driver
    /// owns rotation or the cooldown is still running.
    pub fn auto_rotate(&mut self, now: Time, dt_s: f64, speed_rad_s: f64) -> bool {
        if self.driver(now) != RotationDriver::Auto {
            return false;
        }
        self.euler.y += speed_rad_s * dt_s;
        true
    }
}
