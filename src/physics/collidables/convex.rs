use glam::{Quat, Vec3};

use super::box_shape::BoxShape;
use super::convex_hull::HullShape;
use super::shape::Shape;
use crate::utilities::bounding_box::BoundingBox;

/// Who is responsible for destroying a convex primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConvexOwnership {
    /// Created by the game and not yet absorbed into a compound.
    Unowned,
    /// Absorbed into a compound; lives exactly as long as the compound.
    OwnedByCompound,
    /// Created and kept by the collision context, e.g. the cached bounding box convexes.
    OwnedInternally,
}

/// Geometry of a convex primitive.
#[derive(Debug, Clone)]
pub enum ConvexShape {
    Hull(HullShape),
    Box(BoxShape),
}

impl ConvexShape {
    pub fn local_bounds(&self) -> BoundingBox {
        match self {
            ConvexShape::Hull(hull) => hull.local_bounds(),
            ConvexShape::Box(shape) => shape.local_bounds(),
        }
    }

    pub fn compute_bounds(&self, orientation: Quat) -> BoundingBox {
        match self {
            ConvexShape::Hull(hull) => hull.compute_bounds(orientation),
            ConvexShape::Box(shape) => shape.compute_bounds(orientation),
        }
    }

    pub fn support_point(&self, direction: Vec3) -> Vec3 {
        match self {
            ConvexShape::Hull(hull) => hull.support_point(direction),
            ConvexShape::Box(shape) => shape.support_point(direction),
        }
    }

    /// Material at `point`, 0 for shapes without per-triangle materials.
    pub fn triangle_material_index(&self, point: Vec3) -> i32 {
        match self {
            ConvexShape::Hull(hull) => hull.triangle_material_index(point),
            ConvexShape::Box(_) => 0,
        }
    }
}

impl Shape for ConvexShape {
    fn type_id(&self) -> i32 {
        match self {
            ConvexShape::Hull(hull) => hull.type_id(),
            ConvexShape::Box(shape) => shape.type_id(),
        }
    }

    fn volume(&self) -> f32 {
        match self {
            ConvexShape::Hull(hull) => hull.volume(),
            ConvexShape::Box(shape) => shape.volume(),
        }
    }

    fn surface_area(&self) -> f32 {
        match self {
            ConvexShape::Hull(hull) => hull.surface_area(),
            ConvexShape::Box(shape) => shape.surface_area(),
        }
    }

    fn mass_center(&self) -> Vec3 {
        match self {
            ConvexShape::Hull(hull) => hull.mass_center(),
            ConvexShape::Box(shape) => shape.mass_center(),
        }
    }

    fn inertia(&self) -> Vec3 {
        match self {
            ConvexShape::Hull(hull) => hull.inertia(),
            ConvexShape::Box(shape) => shape.inertia(),
        }
    }
}

/// A convex piece with its placement inside an enclosing compound.
#[derive(Debug, Clone)]
pub struct ConvexPrimitive {
    shape: ConvexShape,
    ownership: ConvexOwnership,
    origin: Vec3,
    game_data: u32,
}

impl ConvexPrimitive {
    /// Wraps a hull; hulls carry their placement in their points, so the origin is zero.
    pub fn from_hull(hull: HullShape) -> Self {
        Self {
            shape: ConvexShape::Hull(hull),
            ownership: ConvexOwnership::Unowned,
            origin: Vec3::ZERO,
            game_data: 0,
        }
    }

    /// Wraps a box centered at `origin` of the future compound.
    pub fn from_box(shape: BoxShape, origin: Vec3) -> Self {
        Self {
            shape: ConvexShape::Box(shape),
            ownership: ConvexOwnership::Unowned,
            origin,
            game_data: 0,
        }
    }

    #[inline]
    pub fn shape(&self) -> &ConvexShape {
        &self.shape
    }

    /// Mutable geometry, unavailable for primitives owned by the collision context.
    #[inline]
    pub fn shape_mut(&mut self) -> Option<&mut ConvexShape> {
        match self.ownership {
            ConvexOwnership::OwnedInternally => None,
            _ => Some(&mut self.shape),
        }
    }

    #[inline]
    pub fn ownership(&self) -> ConvexOwnership {
        self.ownership
    }

    /// Records an ownership transition.
    pub(crate) fn set_ownership(&mut self, ownership: ConvexOwnership) {
        debug_assert!(
            self.ownership == ConvexOwnership::Unowned || self.ownership == ownership,
            "Owned convexes cannot change owner."
        );
        self.ownership = ownership;
    }

    /// Position of the primitive's local origin inside its compound.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn game_data(&self) -> u32 {
        self.game_data
    }

    #[inline]
    pub fn set_game_data(&mut self, game_data: u32) {
        self.game_data = game_data;
    }

    /// Bounds in compound space before mass-center recentering.
    pub fn origin_bounds(&self) -> BoundingBox {
        self.shape.local_bounds().translated(self.origin)
    }
}

impl Shape for ConvexPrimitive {
    fn type_id(&self) -> i32 {
        self.shape.type_id()
    }

    fn volume(&self) -> f32 {
        self.shape.volume()
    }

    fn surface_area(&self) -> f32 {
        self.shape.surface_area()
    }

    fn mass_center(&self) -> Vec3 {
        self.shape.mass_center()
    }

    fn inertia(&self) -> Vec3 {
        self.shape.inertia()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_primitive_records_origin() {
        let primitive = ConvexPrimitive::from_box(BoxShape::new(Vec3::ONE), Vec3::new(0.0, 4.0, 0.0));
        assert_eq!(primitive.ownership(), ConvexOwnership::Unowned);
        assert_eq!(primitive.origin(), Vec3::new(0.0, 4.0, 0.0));
        assert_eq!(primitive.type_id(), BoxShape::ID);
        assert_eq!(primitive.volume(), BoxShape::new(Vec3::ONE).volume());
        assert_eq!(
            primitive.origin_bounds(),
            BoundingBox::new(Vec3::new(-1.0, 3.0, -1.0), Vec3::new(1.0, 5.0, 1.0))
        );
    }

    #[test]
    fn test_internal_primitives_are_not_mutable() {
        let mut primitive = ConvexPrimitive::from_box(BoxShape::new(Vec3::ONE), Vec3::ZERO);
        assert!(primitive.shape_mut().is_some());
        primitive.set_ownership(ConvexOwnership::OwnedInternally);
        assert!(primitive.shape_mut().is_none());
    }

    #[test]
    #[should_panic(expected = "Owned convexes cannot change owner.")]
    #[cfg(debug_assertions)]
    fn test_ownership_transitions_once() {
        let mut primitive = ConvexPrimitive::from_box(BoxShape::new(Vec3::ONE), Vec3::ZERO);
        primitive.set_ownership(ConvexOwnership::OwnedByCompound);
        primitive.set_ownership(ConvexOwnership::OwnedInternally);
    }
}
