use crate::style::Rgb;

/// The opaque base sphere under the dot shell.
///
/// Sits one unit below the dot radius so dots never z-fight the surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BaseSphere {
    pub radius: f64,
    pub color: Rgb,
    pub emissive: Rgb,
    pub emissive_intensity: f32,
    pub shininess: f32,
}

impl BaseSphere {
    pub fn new(radius: f64, color: Rgb) -> Self {
        Self {
            radius,
            color,
            emissive: Rgb::new(0.0, 0.0, 0.0),
            emissive_intensity: 0.4,
            shininess: 5.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BaseSphere;
    use crate::style::Rgb;

    #[test]
    fn construction_defaults() {
        let sphere = BaseSphere::new(149.0, Rgb::WHITE);
        assert_eq!(sphere.radius, 149.0);
        assert_eq!(sphere.emissive_intensity, 0.4);
    }
}
