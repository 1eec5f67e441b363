use foundation::math::{Quat, Vec3, project};
use foundation::time::Time;
use formats::trips::CityLocation;

use crate::style::LayerStyle;

/// Seconds per marker pulse cycle.
pub const PULSE_PERIOD_S: f64 = 2.5;
pub const PULSE_MIN_SCALE: f64 = 1.0;
pub const PULSE_MAX_SCALE: f64 = 2.0;

/// One city marker: a flat disc on the sphere surface plus a looping pulse
/// ring, both oriented so their face normal is the outward radial.
#[derive(Debug, Clone, PartialEq)]
pub struct CityMarker {
    pub position: Vec3,
    pub orientation: Quat,
    pub size: f64,
    pub name: String,
}

impl CityMarker {
    pub fn from_city(city: &CityLocation, radius: f64, size: f64) -> Self {
        let position = project(city.lat, city.lon, radius);
        let orientation = match position.normalized() {
            Some(normal) => Quat::from_unit_vectors(Vec3::new(0.0, 0.0, 1.0), normal),
            None => Quat::IDENTITY,
        };
        Self {
            position,
            orientation,
            size,
            name: city.name.clone(),
        }
    }
}

/// Pulse ring state at a point in time: grows from min to max scale while
/// fading out, then snaps back and repeats.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pulse {
    pub scale: f64,
    pub opacity: f64,
}

/// Pure function of the scene clock, so every marker pulses in lockstep
/// and a dropped frame cannot desynchronize them.
pub fn pulse_at(now: Time) -> Pulse {
    let t = (now.0.rem_euclid(PULSE_PERIOD_S)) / PULSE_PERIOD_S;
    Pulse {
        scale: PULSE_MIN_SCALE + (PULSE_MAX_SCALE - PULSE_MIN_SCALE) * t,
        opacity: 1.0 - t,
    }
}

#[derive(Debug)]
pub struct MarkerSet {
    markers: Vec<CityMarker>,
    pub style: LayerStyle,
}

impl MarkerSet {
    pub fn new(cities: &[CityLocation], radius: f64, size: f64, style: LayerStyle) -> Self {
        Self {
            markers: cities
                .iter()
                .map(|c| CityMarker::from_city(c, radius, size))
                .collect(),
            style,
        }
    }

    pub fn markers(&self) -> &[CityMarker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
