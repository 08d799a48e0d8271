use serde::{Deserialize, Serialize};

use super::units::{UnitConversion, METERS_PER_INCH};

/// Tunables of a collision context.
///
/// Tolerances are expressed in legacy distance units and converted with [`Self::units`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionSettings {
    /// Largest per-axis difference in half extents or origin for two boxes to share a cached compound.
    pub bbox_cache_tolerance: f32,
    /// Largest radius difference for two spheres to share a cached sphere.
    pub sphere_cache_tolerance: f32,
    /// Deepest ledge tree accepted by the decoder.
    pub max_ledge_tree_depth: usize,
    /// Internal distance units per legacy distance unit.
    pub unit_scale: f32,
}

impl Default for CollisionSettings {
    fn default() -> Self {
        Self {
            bbox_cache_tolerance: 0.1,
            sphere_cache_tolerance: 0.1,
            max_ledge_tree_depth: 256,
            unit_scale: METERS_PER_INCH,
        }
    }
}

impl CollisionSettings {
    #[inline]
    pub fn units(&self) -> UnitConversion {
        UnitConversion::new(self.unit_scale)
    }

    #[inline]
    pub fn internal_bbox_tolerance(&self) -> f32 {
        self.units().distance_to_internal(self.bbox_cache_tolerance)
    }

    #[inline]
    pub fn internal_sphere_tolerance(&self) -> f32 {
        self.units().distance_to_internal(self.sphere_cache_tolerance)
    }
}
