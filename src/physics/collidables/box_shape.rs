use glam::{Mat3, Quat, Vec3};

use super::mesh_inertia_helper::MeshInertiaHelper;
use super::shape::{Shape, CONVEX_DISTANCE_MARGIN};
use crate::utilities::bounding_box::BoundingBox;

/// Collision shape representing a solid cuboid.
///
/// The half extents describe the outer surface, which already includes the convex margin. Like a
/// hull, the solid core is that surface shrunk by [`CONVEX_DISTANCE_MARGIN`]; mass properties
/// come from the core, bounds and support points from the outer surface.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxShape {
    /// Half of the box's size along each local axis.
    pub half_extents: Vec3,
}

impl BoxShape {
    /// Creates a Box shape.
    #[inline(always)]
    pub fn new(half_extents: Vec3) -> Self {
        Self { half_extents }
    }

    /// Type id of box shapes.
    pub const ID: i32 = 2;

    /// Half extents of the solid core, never negative.
    #[inline]
    pub fn core_half_extents(&self) -> Vec3 {
        (self.half_extents - Vec3::splat(CONVEX_DISTANCE_MARGIN)).max(Vec3::ZERO)
    }

    #[inline]
    pub fn local_bounds(&self) -> BoundingBox {
        BoundingBox::from_half_extents(self.half_extents)
    }

    pub fn compute_bounds(&self, orientation: Quat) -> BoundingBox {
        let basis = Mat3::from_quat(orientation);
        let x = self.half_extents.x * basis.x_axis;
        let y = self.half_extents.y * basis.y_axis;
        let z = self.half_extents.z * basis.z_axis;
        let max = x.abs() + y.abs() + z.abs();
        BoundingBox::new(-max, max)
    }

    /// Farthest point of the box along `direction`.
    #[inline]
    pub fn support_point(&self, direction: Vec3) -> Vec3 {
        Vec3::select(direction.cmplt(Vec3::ZERO), -self.half_extents, self.half_extents)
    }
}

impl Shape for BoxShape {
    #[inline(always)]
    fn type_id(&self) -> i32 {
        Self::ID
    }

    fn volume(&self) -> f32 {
        let h = self.core_half_extents();
        8.0 * h.x * h.y * h.z
    }

    fn surface_area(&self) -> f32 {
        let h = self.core_half_extents();
        8.0 * (h.x * h.y + h.y * h.z + h.x * h.z)
    }

    fn mass_center(&self) -> Vec3 {
        Vec3::ZERO
    }

    fn inertia(&self) -> Vec3 {
        MeshInertiaHelper::compute_box_inertia(self.core_half_extents() * 2.0)
    }
}
