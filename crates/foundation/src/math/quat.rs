use super::Vec3;

/// Unit quaternion (x, y, z, w).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Quat {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quat {
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Shortest-arc rotation mapping unit vector `a` onto unit vector `b`.
    ///
    /// Used to orient flat surface shapes so their face normal follows the
    /// outward radial direction at a point on the sphere.
    pub fn from_unit_vectors(a: Vec3, b: Vec3) -> Self {
        let dot = a.dot(b).clamp(-1.0, 1.0);

        // Nearly opposite: rotate half a turn around any orthogonal axis.
        if dot < -0.999_999 {
            let mut axis = Vec3::new(1.0, 0.0, 0.0).cross(a);
            if axis.length_sq() < 1e-12 {
                axis = Vec3::new(0.0, 1.0, 0.0).cross(a);
            }
            let axis = axis.normalized().unwrap_or(Vec3::new(0.0, 0.0, 1.0));
            return Self::new(axis.x, axis.y, axis.z, 0.0);
        }

        // Nearly identical: identity.
        if dot > 0.999_999 {
            return Self::IDENTITY;
        }

        let axis = a.cross(b);
        Self::new(axis.x, axis.y, axis.z, 1.0 + dot).normalized()
    }

    pub fn normalized(self) -> Self {
        let n = (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt();
        if n <= 1e-10 {
            return Self::IDENTITY;
        }
        Self::new(self.x / n, self.y / n, self.z / n, self.w / n)
    }

    /// Rotate a vector by this (unit) quaternion.
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let qv = Vec3::new(self.x, self.y, self.z);
        let t = qv.cross(v) * 2.0;
        v + t * self.w + qv.cross(t)
    }
}
