use super::Vec3;

/// Geographic coordinates in degrees.
///
/// Range contract: `lat_deg` in [-90, 90], `lon_deg` in (-180, 180]. The
/// projection itself accepts any finite input; range validation happens at
/// the data-model boundary.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lat_deg: f64,
    pub lon_deg: f64,
}

impl GeoPoint {
    pub fn new(lat_deg: f64, lon_deg: f64) -> Self {
        Self { lat_deg, lon_deg }
    }
}

/// Lat/lon (degrees) to a point on a Y-up sphere.
///
/// Axis convention (shared by every layer, do not change):
/// - `phi = (90 - lat) * pi/180`, `theta = (lon + 180) * pi/180`
/// - `x = -r * sin(phi) * cos(theta)`
/// - `y =  r * cos(phi)`
/// - `z =  r * sin(phi) * sin(theta)`
pub fn project(lat_deg: f64, lon_deg: f64, radius: f64) -> Vec3 {
    let phi = (90.0 - lat_deg).to_radians();
    let theta = (lon_deg + 180.0).to_radians();

    Vec3::new(
        -radius * phi.sin() * theta.cos(),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    )
}

pub fn project_point(point: GeoPoint, radius: f64) -> Vec3 {
    project(point.lat_deg, point.lon_deg, radius)
}

/// Exact inverse of [`project`] for non-zero input.
///
/// Longitude is normalized to (-180, 180]. At the poles (`x = z = 0`) the
/// longitude is undefined and reported as 0.
pub fn unproject(v: Vec3) -> GeoPoint {
    let r = v.length();
    if r <= 0.0 {
        return GeoPoint::new(0.0, 0.0);
    }

    let lat_deg = (v.y / r).clamp(-1.0, 1.0).asin().to_degrees();

    // Inverting theta = lon + 180 gives atan2(z, x) = -lon.
    let mut lon_deg = -v.z.atan2(v.x).to_degrees();
    if lon_deg <= -180.0 {
        lon_deg += 360.0;
    }

    GeoPoint::new(lat_deg, lon_deg)
}

#[cfg(test)]
mod tests {
    use super::{GeoPoint, Vec3, project, unproject};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn north_pole_is_positive_y() {
        let v = project(90.0, 0.0, 150.0);
        assert_close(v.x, 0.0, 1e-9);
        assert_close(v.y, 150.0, 1e-9);
        assert_close(v.z, 0.0, 1e-9);
    }

    #[test]
    fn equator_prime_meridian_matches_convention() {
        // lat=0, lon=0: theta = 180 deg, so x = -r*cos(180) = +r.
        let v = project(0.0, 0.0, 150.0);
        assert_close(v.x, 150.0, 1e-9);
        assert_close(v.y, 0.0, 1e-9);
        assert_close(v.z, 0.0, 1e-9);
    }

    #[test]
    fn equator_90e_lands_on_negative_z() {
        let v = project(0.0, 90.0, 1.0);
        assert_close(v.x, 0.0, 1e-9);
        assert_close(v.y, 0.0, 1e-9);
        assert_close(v.z, -1.0, 1e-9);
    }

    #[test]
    fn round_trip_recovers_lat_lon() {
        // Sweep away from the pole/antimeridian singularities.
        let mut lat = -89.0;
        while lat <= 89.0 {
            let mut lon = -179.0;
            while lon <= 179.0 {
                let rt = unproject(project(lat, lon, 150.0));
                assert_close(rt.lat_deg, lat, 1e-6);
                assert_close(rt.lon_deg, lon, 1e-6);
                lon += 17.0;
            }
            lat += 11.0;
        }
    }

    #[test]
    fn unproject_normalizes_to_half_open_interval() {
        let antimeridian = unproject(project(10.0, 180.0, 1.0));
        assert_close(antimeridian.lon_deg, 180.0, 1e-6);

        let origin = unproject(Vec3::ZERO);
        assert_eq!(origin, GeoPoint::new(0.0, 0.0));
    }
}
