use glam::Vec3;

/// Shared miscellaneous helper functions.
pub struct Helpers;

impl Helpers {
    /// Builds an orthonormal basis from a unit normal vector.
    #[inline(always)]
    pub fn build_orthonormal_basis(normal: Vec3) -> (Vec3, Vec3) {
        // This has a discontinuity at z==0. Raw frisvad has only one discontinuity,
        // though that region is more unpredictable than the revised version.
        let sign = if normal.z < 0.0 { -1.0f32 } else { 1.0f32 };
        let scale = -1.0 / (sign + normal.z);
        let t1 = Vec3::new(
            normal.x * normal.y * scale,
            sign + normal.y * normal.y * scale,
            -normal.y,
        );
        let t2 = Vec3::new(
            1.0 + sign * normal.x * normal.x * scale,
            sign * t1.x,
            -sign * normal.x,
        );
        (t1, t2)
    }

    /// Finds a unit vector perpendicular to the given unit normal.
    #[inline(always)]
    pub fn find_perpendicular(normal: Vec3) -> Vec3 {
        let sign = if normal.z < 0.0 { -1.0f32 } else { 1.0f32 };
        let scale = -1.0 / (sign + normal.z);
        Vec3::new(
            normal.x * normal.y * scale,
            sign + normal.y * normal.y * scale,
            -normal.y,
        )
    }
}
