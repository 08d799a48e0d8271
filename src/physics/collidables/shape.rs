use glam::Vec3;

use crate::physics::units::METERS_PER_INCH;

/// Surface inflation of every convex primitive, in internal units (a quarter legacy unit).
pub const CONVEX_DISTANCE_MARGIN: f32 = 0.25 * METERS_PER_INCH;

/// Mass properties shared by every collision shape kind.
///
/// Inertia is diagonal and expressed per unit mass about [`Shape::mass_center`].
pub trait Shape {
    /// Unique type id for this shape type.
    fn type_id(&self) -> i32;

    fn volume(&self) -> f32;

    fn surface_area(&self) -> f32;

    /// Center of mass in the shape's local space.
    fn mass_center(&self) -> Vec3;

    fn inertia(&self) -> Vec3;
}
