use glam::Vec3;

/// Internal distance units per legacy distance unit.
pub const METERS_PER_INCH: f32 = 0.0254;

/// Converts between legacy (inch based, z-up) positions and internal (meter based, y-up) positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitConversion {
    /// Internal units per legacy unit.
    pub scale: f32,
}

impl Default for UnitConversion {
    fn default() -> Self {
        Self::new(METERS_PER_INCH)
    }
}

impl UnitConversion {
    #[inline]
    pub const fn new(scale: f32) -> Self {
        Self { scale }
    }

    #[inline(always)]
    pub fn distance_to_internal(&self, value: f32) -> f32 {
        value * self.scale
    }

    #[inline(always)]
    pub fn distance_to_legacy(&self, value: f32) -> f32 {
        value / self.scale
    }

    #[inline(always)]
    pub fn volume_to_legacy(&self, value: f32) -> f32 {
        value / (self.scale * self.scale * self.scale)
    }

    #[inline(always)]
    pub fn area_to_legacy(&self, value: f32) -> f32 {
        value / (self.scale * self.scale)
    }

    /// Legacy `(x, y, z)` maps to internal `(x, z, -y)`.
    #[inline(always)]
    pub fn position_to_internal(&self, legacy: Vec3) -> Vec3 {
        Vec3::new(legacy.x, legacy.z, -legacy.y) * self.scale
    }

    #[inline(always)]
    pub fn position_to_legacy(&self, internal: Vec3) -> Vec3 {
        Vec3::new(internal.x, -internal.z, internal.y) / self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_position_round_trip_axes() {
        let units = UnitConversion::default();
        let internal = units.position_to_internal(Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(internal.x, 0.0254);
        assert_relative_eq!(internal.y, 3.0 * 0.0254);
        assert_relative_eq!(internal.z, -2.0 * 0.0254);

        let legacy = units.position_to_legacy(internal);
        assert_relative_eq!(legacy.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(legacy.y, 2.0, epsilon = 1e-5);
        assert_relative_eq!(legacy.z, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_volume_scaling() {
        let units = UnitConversion::default();
        let edge = units.distance_to_internal(10.0);
        assert_relative_eq!(units.volume_to_legacy(edge * edge * edge), 1000.0, max_relative = 1e-4);
        assert_relative_eq!(units.area_to_legacy(edge * edge), 100.0, max_relative = 1e-4);
    }
}
