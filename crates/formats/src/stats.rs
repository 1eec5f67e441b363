use std::collections::{BTreeMap, BTreeSet};

use crate::trips::Trip;

/// Mean Earth radius in miles, for display-facing distance sums.
const EARTH_RADIUS_MILES: f64 = 3_958.8;

#[derive(Debug, Clone, PartialEq)]
pub struct TripStats {
    pub distinct_cities: usize,
    pub total_miles: f64,
    pub countries_visited: Vec<String>,
    pub continents_visited: Vec<String>,
}

/// Great-circle distance in miles.
pub fn haversine_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_MILES * c
}

/// Summary numbers for one trip: leg mileage, distinct stops, countries,
/// and (when a lookup table is supplied) continents.
pub fn trip_stats(trip: &Trip, iso_to_continent: Option<&BTreeMap<String, String>>) -> TripStats {
    let distinct_cities = trip
        .legs
        .iter()
        .map(|c| c.name.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    let total_miles = trip
        .legs
        .windows(2)
        .map(|pair| haversine_miles(pair[0].lat, pair[0].lon, pair[1].lat, pair[1].lon))
        .sum();

    let continents_visited = match iso_to_continent {
        Some(lookup) => trip
            .countries
            .iter()
            .filter_map(|iso| lookup.get(iso).cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect(),
        None => Vec::new(),
    };

    TripStats {
        distinct_cities,
        total_miles,
        countries_visited: trip.countries.clone(),
        continents_visited,
    }
}
