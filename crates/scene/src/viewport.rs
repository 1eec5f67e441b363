/// Viewport size class, supplied by the host page (§ external interfaces).
///
/// The engine never measures the window itself; it only consumes this
/// signal to pick scale targets and focus distances.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Breakpoint {
    Xxs,
    Xs,
    Sm,
    Md,
    Xl,
}

/// Scale the globe starts at before the scale-in animation.
pub const INITIAL_SCALE: f64 = 0.55;

/// Exponential approach rate (1/seconds) for the scale-in animation.
pub const SCALE_RATE: f64 = 4.0;

impl Breakpoint {
    /// Target globe scale once the land dots have loaded.
    pub fn target_scale(self) -> f64 {
        match self {
            Breakpoint::Xxs => 0.6,
            Breakpoint::Xs => 0.7,
            Breakpoint::Sm => 0.8,
            Breakpoint::Md | Breakpoint::Xl => 1.0,
        }
    }

    /// How far beyond a focused centroid the camera parks.
    ///
    /// Small screens push the camera further out so the country still fits.
    pub fn focus_distance_offset(self) -> f64 {
        if self >= Breakpoint::Sm { 380.0 } else { 480.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::{Breakpoint, INITIAL_SCALE};

    #[test]
    fn scale_targets_grow_with_viewport() {
        assert!(Breakpoint::Xxs.target_scale() < Breakpoint::Xs.target_scale());
        assert!(Breakpoint::Xs.target_scale() < Breakpoint::Sm.target_scale());
        assert_eq!(Breakpoint::Md.target_scale(), 1.0);
        assert_eq!(Breakpoint::Xl.target_scale(), 1.0);
        assert!(INITIAL_SCALE < Breakpoint::Xxs.target_scale());
    }

    #[test]
    fn small_screens_focus_from_further_away() {
        assert_eq!(Breakpoint::Xs.focus_distance_offset(), 480.0);
        assert_eq!(Breakpoint::Sm.focus_distance_offset(), 380.0);
        assert_eq!(Breakpoint::Xl.focus_distance_offset(), 380.0);
    }
}
