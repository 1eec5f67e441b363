//! Land-dot point cloud: a large static point set with per-dot colors,
//! nearest-dot ray picking, and click-vs-drag disambiguation.

use std::collections::BTreeSet;

use foundation::math::{Vec2, Vec3, smoothstep, stable_total_cmp_f64};
use formats::dots::LandDot;

use crate::style::Rgb;

/// Cumulative pointer travel (screen pixels) above which a gesture is a
/// camera orbit, not a dot selection.
pub const DRAG_THRESHOLD_PX: f64 = 20.0;

/// Default pick radius around the ray, in world units.
pub const PICK_RADIUS: f64 = 2.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickOptions {
    /// Dots further than this from the ray are not candidates.
    pub pick_radius: f64,
    pub max_distance: f64,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            pick_radius: PICK_RADIUS,
            max_distance: 1.0e30,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit {
    pub index: usize,
    /// Distance along the (normalized) ray.
    pub distance: f64,
    pub point: Vec3,
}

/// Mean position of a country's dots, or `None` if it has no dots.
pub fn country_centroid(dots: &[LandDot], iso_a3: &str) -> Option<Vec3> {
    let mut sum = Vec3::ZERO;
    let mut count = 0usize;
    for dot in dots {
        if dot.iso_a3 == iso_a3 {
            sum = sum + dot.position();
            count += 1;
        }
    }
    if count == 0 {
        return None;
    }
    Some(sum * (1.0 / count as f64))
}

/// The rendered point set.
///
/// The dot array and position buffer are built once at load and never
/// resized; spotlight changes only rewrite the parallel color buffer.
#[derive(Debug)]
pub struct DotCloud {
    dots: Vec<LandDot>,
    positions: Vec<f32>,
    colors: Vec<f32>,
    base: Rgb,
    highlight: Rgb,
    point_size: f32,
    spotlight: BTreeSet<String>,
    colors_dirty: bool,
}

impl DotCloud {
    pub fn new(dots: Vec<LandDot>, base: Rgb, highlight: Rgb, point_size: f32) -> Self {
        let mut positions = Vec::with_capacity(dots.len() * 3);
        let mut colors = Vec::with_capacity(dots.len() * 3);
        for dot in &dots {
            positions.extend_from_slice(&[dot.x as f32, dot.y as f32, dot.z as f32]);
            colors.extend_from_slice(&[base.r, base.g, base.b]);
        }
        Self {
            dots,
            positions,
            colors,
            base,
            highlight,
            point_size,
            spotlight: BTreeSet::new(),
            colors_dirty: false,
        }
    }

    pub fn len(&self) -> usize {
        self.dots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dots.is_empty()
    }

    pub fn dots(&self) -> &[LandDot] {
        &self.dots
    }

    pub fn dot(&self, index: usize) -> Option<&LandDot> {
        self.dots.get(index)
    }

    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    /// Interleaved xyz buffer, stable across the cloud's lifetime.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Interleaved rgb buffer, parallel to `positions`.
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn spotlight(&self) -> &BTreeSet<String> {
        &self.spotlight
    }

    /// Replace the spotlighted ISO set.
    pub fn set_spotlight<I, S>(&mut self, isos: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let next: BTreeSet<String> = isos.into_iter().map(Into::into).collect();
        if next != self.spotlight {
            self.spotlight = next;
            self.colors_dirty = true;
        }
    }

    pub fn clear_spotlight(&mut self) {
        if !self.spotlight.is_empty() {
            self.spotlight.clear();
            self.colors_dirty = true;
        }
    }

    /// Rewrite the color buffer if the spotlight set changed since the last
    /// refresh. O(N), in place; returns whether anything was written.
    pub fn refresh_colors(&mut self) -> bool {
        if !self.colors_dirty {
            return false;
        }
        for (i, dot) in self.dots.iter().enumerate() {
            let color = if self.spotlight.contains(&dot.iso_a3) {
                self.highlight
            } else {
                self.base
            };
            let offset = i * 3;
            self.colors[offset] = color.r;
            self.colors[offset + 1] = color.g;
            self.colors[offset + 2] = color.b;
        }
        self.colors_dirty = false;
        true
    }

    pub fn centroid(&self, iso_a3: &str) -> Option<Vec3> {
        country_centroid(&self.dots, iso_a3)
    }

    /// Nearest dot under a camera ray.
    ///
    /// Ordering contract:
    /// - Candidates are dots within `pick_radius` of the ray, in front of
    ///   its origin.
    /// - The smallest distance along the ray wins; exact ties go to the
    ///   lower dot index.
    pub fn pick(&self, ray: Ray, opts: PickOptions) -> Option<PickHit> {
        let dir = ray.dir.normalized()?;

        let mut best: Option<(f64, usize)> = None;
        for (index, dot) in self.dots.iter().enumerate() {
            let to_dot = dot.position() - ray.origin;
            let t = to_dot.dot(dir);
            if t < 0.0 || t > opts.max_distance {
                continue;
            }
            let closest = ray.origin + dir * t;
            if closest.distance_to(dot.position()) > opts.pick_radius {
                continue;
            }
            best = match best {
                None => Some((t, index)),
                Some((bt, bi)) => {
                    if stable_total_cmp_f64(t, bt).is_lt() {
                        Some((t, index))
                    } else {
                        Some((bt, bi))
                    }
                }
            };
        }

        let (t, index) = best?;
        Some(PickHit {
            index,
            distance: t,
            point: ray.origin + dir * t,
        })
    }
}

/// Distinguishes dot selection from camera-orbit drags.
///
/// A pointer-up counts as a selection only if the same dot was under the
/// pointer at down and up, and the cumulative travel stayed under
/// [`DRAG_THRESHOLD_PX`].
#[derive(Debug, Default)]
pub struct PointerTracker {
    down: Option<DownState>,
}

#[derive(Debug, Copy, Clone)]
struct DownState {
    last_pos: Vec2,
    dot_index: Option<usize>,
    traveled_px: f64,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_down(&self) -> bool {
        self.down.is_some()
    }

    pub fn pointer_down(&mut self, pos: Vec2, hit: Option<usize>) {
        self.down = Some(DownState {
            last_pos: pos,
            dot_index: hit,
            traveled_px: 0.0,
        });
    }

    /// Accumulate travel; returns the delta since the previous position for
    /// the caller's drag handling.
    pub fn pointer_move(&mut self, pos: Vec2) -> Option<Vec2> {
        let down = self.down.as_mut()?;
        let delta = pos - down.last_pos;
        down.traveled_px += delta.length();
        down.last_pos = pos;
        Some(delta)
    }

    /// Resolve the gesture. `hit` is the dot under the pointer at release.
    pub fn pointer_up(&mut self, hit: Option<usize>) -> Option<usize> {
        let down = self.down.take()?;
        let down_index = down.dot_index?;
        let up_index = hit?;
        if down_index != up_index {
            return None;
        }
        if down.traveled_px >= DRAG_THRESHOLD_PX {
            return None;
        }
        Some(down_index)
    }
}

/// Hemisphere fade for dots facing away from the camera.
///
/// `start_deg`/`end_deg` are angles between the dot's outward normal and
/// the direction to the camera: fully opaque below `start_deg`, invisible
/// above `end_deg`, smooth in between.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EdgeFade {
    pub start_deg: f64,
    pub end_deg: f64,
}

impl Default for EdgeFade {
    fn default() -> Self {
        Self {
            start_deg: 80.0,
            end_deg: 95.0,
        }
    }
}

impl EdgeFade {
    /// Alpha for a dot at `position` (globe local space, sphere centered on
    /// the origin) seen from `camera_pos`.
    pub fn view_alpha(&self, position: Vec3, camera_pos: Vec3) -> f32 {
        let Some(normal) = position.normalized() else {
            return 1.0;
        };
        let Some(to_camera) = (camera_pos - position).normalized() else {
            return 1.0;
        };
        let angle_deg = normal.dot(to_camera).clamp(-1.0, 1.0).acos().to_degrees();
        if self.end_deg <= self.start_deg {
            return if angle_deg < self.end_deg { 1.0 } else { 0.0 };
        }
        let t = (angle_deg - self.start_deg) / (self.end_deg - self.start_deg);
        (1.0 - smoothstep(t)) as f32
    }
}
