use foundation::math::Vec3;

use crate::style::Rgb;

/// The atmosphere shell: a slightly larger concentric sphere rendered
/// back-face with a Fresnel-style rim glow keyed on view angle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Atmosphere {
    pub radius: f64,
    /// Shell radius = `radius * scale_factor`.
    pub scale_factor: f64,
    pub color: Rgb,
    /// Rim falloff exponent; higher concentrates the glow at the limb.
    pub power: f64,
    pub intensity: f64,
    pub opacity: f32,
    /// Rendered from inside so the glow wraps the globe.
    pub render_back_face: bool,
}

impl Atmosphere {
    pub fn new(radius: f64, color: Rgb) -> Self {
        Self {
            radius,
            scale_factor: 1.001,
            color,
            power: 5.0,
            intensity: 1.5,
            opacity: 0.5,
            render_back_face: true,
        }
    }

    pub fn shell_radius(&self) -> f64 {
        self.radius * self.scale_factor
    }

    /// The rim term: `(1 - n.v)^power * intensity`, clamped at 0.
    ///
    /// `normal` is the surface normal, `view_dir` points from the surface
    /// toward the camera; both unit length. Head-on surfaces get no glow,
    /// grazing ones the most.
    pub fn rim_weight(&self, normal: Vec3, view_dir: Vec3) -> f64 {
        let facing = normal.dot(view_dir).clamp(-1.0, 1.0);
        (1.0 - facing).max(0.0).powf(self.power) * self.intensity
    }
}

#[cfg(test)]
mod tests {
    use super::Atmosphere;
    use crate::style::Rgb;
    use foundation::math::Vec3;

    #[test]
    fn rim_glow_peaks_at_grazing_angles() {
        let atmo = Atmosphere::new(150.0, Rgb::WHITE);

        let head_on = atmo.rim_weight(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(head_on, 0.0);

        let grazing = atmo.rim_weight(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(grazing, atmo.intensity);

        let oblique = atmo.rim_weight(
            Vec3::new(0.0, 1.0, 1.0).normalized().expect("unit"),
            Vec3::new(0.0, 0.0, 1.0),
        );
        assert!(oblique > 0.0 && oblique < grazing);
    }

    #[test]
    fn shell_wraps_the_globe() {
        let atmo = Atmosphere::new(150.0, Rgb::WHITE);
        assert!(atmo.shell_radius() > 150.0);
        assert!(atmo.render_back_face);
    }
}
