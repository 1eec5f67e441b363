use foundation::math::{Vec3, project_point};
use formats::trips::CityLocation;

/// How far the arc's raised midpoint sits above the chord, as a multiple of
/// the chord length. The "light" profile uses a flatter bulge.
pub const ARC_HEIGHT_FACTOR: f64 = 1.5;
pub const ARC_HEIGHT_FACTOR_LIGHT: f64 = 1.0;

/// A cubic flight path between two points on the sphere.
///
/// Construction: take the chord midpoint, push it radially outward by
/// `height_factor * chord length`, then place both control points along the
/// start-to-raised-midpoint segment at 25% and 75%. The curve bulges above
/// the surface like a flight path instead of cutting through the globe.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ArcPath {
    pub start: Vec3,
    pub control1: Vec3,
    pub control2: Vec3,
    pub end: Vec3,
}

impl ArcPath {
    pub fn between(start: Vec3, end: Vec3, height_factor: f64) -> Self {
        let mid = (start + end) * 0.5;
        let chord = start.distance_to(end);
        let raised = mid.with_length(mid.length() + chord * height_factor);

        Self {
            start,
            control1: start.lerp(raised, 0.25),
            control2: start.lerp(raised, 0.75),
            end,
        }
    }

    /// Project two cities onto a sphere of `radius` and span them.
    pub fn between_cities(
        start: &CityLocation,
        end: &CityLocation,
        radius: f64,
        height_factor: f64,
    ) -> Self {
        Self::between(
            project_point(start.geo(), radius),
            project_point(end.geo(), radius),
            height_factor,
        )
    }

    /// Point on the cubic Bezier at `t` in [0, 1].
    pub fn point(&self, t: f64) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        self.start * (u * u * u)
            + self.control1 * (3.0 * u * u * t)
            + self.control2 * (3.0 * u * t * t)
            + self.end * (t * t * t)
    }

    /// Point at parameter `t` of the sub-curve [min_t, max_t].
    ///
    /// This is how retracting arcs render a partial path without rebuilding
    /// the curve: the visible window slides along the full geometry.
    pub fn sub_point(&self, min_t: f64, max_t: f64, t: f64) -> Vec3 {
        self.point(min_t + (max_t - min_t) * t.clamp(0.0, 1.0))
    }

    /// Uniform polyline sampling with `segments + 1` vertices.
    pub fn sample(&self, segments: usize) -> Vec<Vec3> {
        self.sample_range(0.0, 1.0, segments)
    }

    /// Polyline over the [min_t, max_t] window.
    pub fn sample_range(&self, min_t: f64, max_t: f64, segments: usize) -> Vec<Vec3> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.sub_point(min_t, max_t, i as f64 / segments as f64))
            .collect()
    }
}
