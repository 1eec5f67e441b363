use super::Vec3;

/// Euler angles in radians, applied in XYZ order.
///
/// `rotate` composes `R = Rx * Ry * Rz`, i.e. a vector is rotated about Z
/// first, then Y, then X. This matches the rotation convention of the
/// globe's shared rotation state.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct EulerXyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl EulerXyz {
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Local-to-world: rotate a point out of the rotating frame.
    pub fn rotate(self, v: Vec3) -> Vec3 {
        rotate_x(rotate_y(rotate_z(v, self.z), self.y), self.x)
    }
}

fn rotate_x(v: Vec3, angle: f64) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(v.x, v.y * c - v.z * s, v.y * s + v.z * c)
}

fn rotate_y(v: Vec3, angle: f64) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(v.x * c + v.z * s, v.y, -v.x * s + v.z * c)
}

fn rotate_z(v: Vec3, angle: f64) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(v.x * c - v.y * s, v.x * s + v.y * c, v.z)
}

#[cfg(test)]
mod tests {
    use super::{EulerXyz, Vec3};
    use std::f64::consts::FRAC_PI_2;

    fn assert_vec_close(a: Vec3, b: Vec3, eps: f64) {
        assert!(a.distance_to(b) <= eps, "expected {a:?} ~= {b:?}");
    }

    #[test]
    fn identity_leaves_points_alone() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_vec_close(EulerXyz::IDENTITY.rotate(v), v, 1e-12);
    }

    #[test]
    fn quarter_yaw_sends_z_to_x() {
        let e = EulerXyz::new(0.0, FRAC_PI_2, 0.0);
        assert_vec_close(
            e.rotate(Vec3::new(0.0, 0.0, 1.0)),
            Vec3::new(1.0, 0.0, 0.0),
            1e-12,
        );
    }

    #[test]
    fn quarter_pitch_sends_y_to_z() {
        let e = EulerXyz::new(FRAC_PI_2, 0.0, 0.0);
        assert_vec_close(
            e.rotate(Vec3::new(0.0, 1.0, 0.0)),
            Vec3::new(0.0, 0.0, 1.0),
            1e-12,
        );
    }

    #[test]
    fn rotation_preserves_length() {
        let e = EulerXyz::new(0.3, -1.1, 2.2);
        let v = Vec3::new(1.0, -2.0, 0.5);
        let rotated = e.rotate(v);
        assert!((rotated.length() - v.length()).abs() < 1e-12);
    }
}
