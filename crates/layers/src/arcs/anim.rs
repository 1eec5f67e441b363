use foundation::time::Time;

/// How an arc draws itself over its animation window.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DrawPolicy {
    /// Single phase: grow from 0 to full length, then stay drawn.
    GrowPersist,
    /// Two phases in one window: grow to full length in the first half,
    /// then retract from the start in the second half, so the arc appears
    /// to travel along its own path and vanish behind itself.
    GrowRetract,
}

/// The currently visible window of the path, as fractions of arc length.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawRange {
    pub start: f64,
    pub end: f64,
}

impl DrawRange {
    pub fn visible(&self) -> bool {
        self.end > self.start
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ArcPhase {
    Growing,
    Retracting,
    Done,
}

/// Edge-triggered notifications out of [`ArcAnimation::poll`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct ArcTick {
    /// The landing pulse should spawn this frame (fires at most once).
    pub landing: bool,
    /// The animation completed this frame (fires at most once).
    pub done: bool,
}

/// One arc's animation clock.
///
/// All interpolation derives from `(now - started_at)`; the struct stores
/// the start timestamp once and never accumulates per-frame steps, so
/// [`ArcAnimation::draw_range`] is idempotent within a frame and immune to
/// frame-rate variation. Only `poll` carries state, to edge-trigger the
/// landing/done notifications.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcAnimation {
    started_at: Time,
    duration_s: f64,
    policy: DrawPolicy,
    landing_fired: bool,
    done_fired: bool,
}

impl ArcAnimation {
    pub fn new(started_at: Time, duration_s: f64, policy: DrawPolicy) -> Self {
        Self {
            started_at,
            duration_s: duration_s.max(1e-9),
            policy,
            landing_fired: false,
            done_fired: false,
        }
    }

    pub fn policy(&self) -> DrawPolicy {
        self.policy
    }

    pub fn started_at(&self) -> Time {
        self.started_at
    }

    /// Normalized progress in [0, 1].
    fn t(&self, now: Time) -> f64 {
        (now.since(self.started_at) / self.duration_s).clamp(0.0, 1.0)
    }

    pub fn phase(&self, now: Time) -> ArcPhase {
        let t = self.t(now);
        if t >= 1.0 {
            return ArcPhase::Done;
        }
        match self.policy {
            DrawPolicy::GrowPersist => ArcPhase::Growing,
            DrawPolicy::GrowRetract => {
                if t <= 0.5 {
                    ArcPhase::Growing
                } else {
                    ArcPhase::Retracting
                }
            }
        }
    }

    /// The visible window at `now`. Pure in `now`.
    pub fn draw_range(&self, now: Time) -> DrawRange {
        let t = self.t(now);
        match self.policy {
            DrawPolicy::GrowPersist => DrawRange { start: 0.0, end: t },
            DrawPolicy::GrowRetract => {
                if t <= 0.5 {
                    DrawRange {
                        start: 0.0,
                        end: t / 0.5,
                    }
                } else {
                    DrawRange {
                        start: (t - 0.5) / 0.5,
                        end: 1.0,
                    }
                }
            }
        }
    }

    pub fn is_done(&self, now: Time) -> bool {
        self.t(now) >= 1.0
    }

    /// Advance edge-triggered state.
    ///
    /// Landing fires when the arc completes (grow-persist) or the moment
    /// retraction begins (grow-retract).
    pub fn poll(&mut self, now: Time) -> ArcTick {
        let t = self.t(now);
        let mut tick = ArcTick::default();

        let landing_due = match self.policy {
            DrawPolicy::GrowPersist => t >= 1.0,
            DrawPolicy::GrowRetract => t > 0.5,
        };
        if landing_due && !self.landing_fired {
            self.landing_fired = true;
            tick.landing = true;
        }

        if t >= 1.0 && !self.done_fired {
            self.done_fired = true;
            tick.done = true;
        }

        tick
    }
}
