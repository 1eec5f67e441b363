use std::collections::BTreeSet;

use foundation::math::GeoPoint;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named city stop, used both as an arc endpoint and a marker position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityLocation {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso_a3: Option<String>,
}

impl CityLocation {
    /// Validating constructor; coordinates outside the geographic ranges
    /// (or NaN) are rejected here so nothing downstream has to re-check.
    pub fn new(lat: f64, lon: f64, name: impl Into<String>) -> Result<Self, TripDataError> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(TripDataError::NonFiniteCoordinate);
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(TripDataError::LatitudeOutOfRange { value: lat });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(TripDataError::LongitudeOutOfRange { value: lon });
        }
        Ok(Self {
            lat,
            lon,
            name: name.into(),
            iso_a3: None,
        })
    }

    pub fn with_iso(mut self, iso_a3: impl Into<String>) -> Self {
        self.iso_a3 = Some(iso_a3.into());
        self
    }

    pub fn geo(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// One flight/connection between two cities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcLocation {
    pub id: Uuid,
    pub start: CityLocation,
    pub end: CityLocation,
}

impl ArcLocation {
    pub fn new(start: CityLocation, end: CityLocation) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
        }
    }
}

/// An ordered sequence of city stops; adjacent stops imply one arc each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    pub title: String,
    pub countries: Vec<String>,
    pub legs: Vec<CityLocation>,
}

impl Trip {
    pub fn new(
        title: impl Into<String>,
        countries: Vec<String>,
        legs: Vec<CityLocation>,
    ) -> Result<Self, TripDataError> {
        if legs.len() < 2 {
            return Err(TripDataError::TooFewLegs { found: legs.len() });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            title: title.into(),
            countries,
            legs,
        })
    }

    pub fn touches(&self, iso_a3: &str) -> bool {
        self.countries.iter().any(|c| c == iso_a3)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TripDataError {
    NonFiniteCoordinate,
    LatitudeOutOfRange { value: f64 },
    LongitudeOutOfRange { value: f64 },
    TooFewLegs { found: usize },
}

impl std::fmt::Display for TripDataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TripDataError::NonFiniteCoordinate => write!(f, "coordinate is not finite"),
            TripDataError::LatitudeOutOfRange { value } => {
                write!(f, "latitude {value} outside [-90, 90]")
            }
            TripDataError::LongitudeOutOfRange { value } => {
                write!(f, "longitude {value} outside [-180, 180]")
            }
            TripDataError::TooFewLegs { found } => {
                write!(f, "a trip needs at least 2 legs, found {found}")
            }
        }
    }
}

impl std::error::Error for TripDataError {}

/// `[C0, C1, ... Cn]` becomes `[Arc(C0->C1), ..., Arc(Cn-1->Cn)]`.
pub fn arcs_from_legs(legs: &[CityLocation]) -> Vec<ArcLocation> {
    legs.windows(2)
        .map(|pair| ArcLocation::new(pair[0].clone(), pair[1].clone()))
        .collect()
}

/// Flatten arcs from all trips into a single array.
pub fn flatten_all_trips(trips: &[Trip]) -> Vec<ArcLocation> {
    trips.iter().flat_map(|t| arcs_from_legs(&t.legs)).collect()
}

/// The city pool behind a set of arcs: first arc's start, then every end.
pub fn arc_cities(arcs: &[ArcLocation]) -> Vec<CityLocation> {
    let Some(first) = arcs.first() else {
        return Vec::new();
    };
    let mut cities = Vec::with_capacity(arcs.len() + 1);
    cities.push(first.start.clone());
    for arc in arcs {
        cities.push(arc.end.clone());
    }
    cities
}

/// Distinct ISO codes across all trips, sorted for determinism.
pub fn distinct_isos(trips: &[Trip]) -> Vec<String> {
    let set: BTreeSet<&str> = trips
        .iter()
        .flat_map(|t| t.countries.iter().map(String::as_str))
        .collect();
    set.into_iter().map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::{CityLocation, Trip, TripDataError, arc_cities, arcs_from_legs, distinct_isos, flatten_all_trips};
    use pretty_assertions::assert_eq;

    fn city(lat: f64, lon: f64, name: &str) -> CityLocation {
        CityLocation::new(lat, lon, name).expect("valid city")
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert_eq!(
            CityLocation::new(91.0, 0.0, "x").unwrap_err(),
            TripDataError::LatitudeOutOfRange { value: 91.0 }
        );
        assert_eq!(
            CityLocation::new(0.0, -180.5, "x").unwrap_err(),
            TripDataError::LongitudeOutOfRange { value: -180.5 }
        );
        assert_eq!(
            CityLocation::new(f64::NAN, 0.0, "x").unwrap_err(),
            TripDataError::NonFiniteCoordinate
        );
    }

    #[test]
    fn legs_fold_into_adjacent_arcs() {
        let legs = vec![
            city(40.7128, -74.006, "NYC"),
            city(4.711, -74.0721, "Bogota"),
            city(10.391, -75.4794, "Cartagena"),
        ];
        let arcs = arcs_from_legs(&legs);
        assert_eq!(arcs.len(), 2);
        assert_eq!(arcs[0].start.name, "NYC");
        assert_eq!(arcs[0].end.name, "Bogota");
        assert_eq!(arcs[1].start.name, "Bogota");
        assert_eq!(arcs[1].end.name, "Cartagena");
    }

    #[test]
    fn arc_cities_is_start_plus_every_end() {
        let legs = vec![
            city(0.0, 0.0, "a"),
            city(1.0, 1.0, "b"),
            city(2.0, 2.0, "c"),
        ];
        let cities = arc_cities(&arcs_from_legs(&legs));
        let names: Vec<_> = cities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(arc_cities(&[]).is_empty());
    }

    #[test]
    fn trips_flatten_and_dedupe_isos() {
        let t1 = Trip::new(
            "colombia",
            vec!["COL".into(), "USA".into()],
            vec![city(40.7128, -74.006, "NYC"), city(4.711, -74.0721, "Bogota")],
        )
        .expect("trip");
        let t2 = Trip::new(
            "domestic",
            vec!["USA".into()],
            vec![city(40.7128, -74.006, "NYC"), city(32.7767, -96.797, "Dallas")],
        )
        .expect("trip");

        assert_eq!(flatten_all_trips(&[t1.clone(), t2.clone()]).len(), 2);
        assert_eq!(distinct_isos(&[t1, t2]), vec!["COL", "USA"]);
    }

    #[test]
    fn trip_requires_two_legs() {
        let err = Trip::new("solo", vec![], vec![city(0.0, 0.0, "a")]).unwrap_err();
        assert_eq!(err, TripDataError::TooFewLegs { found: 1 });
    }
}
