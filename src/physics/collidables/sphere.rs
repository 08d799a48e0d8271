use glam::Vec3;

use super::shape::{Shape, CONVEX_DISTANCE_MARGIN};
use crate::utilities::bounding_box::BoundingBox;

/// Collision shape representing a sphere.
///
/// The collision surface is inflated by [`CONVEX_DISTANCE_MARGIN`] like every convex, and mass
/// properties are taken from the inflated sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereShape {
    radius: f32,
}

impl SphereShape {
    /// Creates a sphere shape.
    #[inline(always)]
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }

    /// Type id of sphere shapes.
    pub const ID: i32 = 0;

    /// Radius without the margin.
    #[inline(always)]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline(always)]
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
    }

    #[inline(always)]
    pub fn inflated_radius(&self) -> f32 {
        self.radius + CONVEX_DISTANCE_MARGIN
    }

    /// Orientation does not matter for a sphere.
    #[inline(always)]
    pub fn local_bounds(&self) -> BoundingBox {
        BoundingBox::from_half_extents(Vec3::splat(self.inflated_radius()))
    }

    #[inline(always)]
    pub fn support_point(&self, direction: Vec3) -> Vec3 {
        direction.normalize_or_zero() * self.inflated_radius()
    }
}

impl Shape for SphereShape {
    #[inline(always)]
    fn type_id(&self) -> i32 {
        Self::ID
    }

    fn volume(&self) -> f32 {
        let radius = self.inflated_radius();
        (4.0 / 3.0) * std::f32::consts::PI * radius * radius * radius
    }

    fn surface_area(&self) -> f32 {
        let radius = self.inflated_radius();
        4.0 * std::f32::consts::PI * radius * radius
    }

    fn mass_center(&self) -> Vec3 {
        Vec3::ZERO
    }

    fn inertia(&self) -> Vec3 {
        let radius = self.inflated_radius();
        Vec3::splat(0.4 * radius * radius)
    }
}
