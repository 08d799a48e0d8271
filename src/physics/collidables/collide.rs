use glam::{Quat, Vec3};

use super::compound::{CompoundChild, CompoundShape};
use super::mesh::TriangleMeshShape;
use super::shape::Shape;
use super::sphere::SphereShape;
use crate::utilities::bounding_box::BoundingBox;

/// Any collision model that can be handed to a rigid body.
#[derive(Debug, Clone)]
pub enum Collide {
    Compound(CompoundShape),
    Sphere(SphereShape),
    TriangleMesh(TriangleMeshShape),
}

impl Collide {
    #[inline]
    pub fn as_compound(&self) -> Option<&CompoundShape> {
        match self {
            Collide::Compound(compound) => Some(compound),
            _ => None,
        }
    }

    #[inline]
    pub fn as_compound_mut(&mut self) -> Option<&mut CompoundShape> {
        match self {
            Collide::Compound(compound) => Some(compound),
            _ => None,
        }
    }

    /// Convex children with their offsets; empty for non-compound models.
    pub fn convexes(&self) -> &[CompoundChild] {
        match self {
            Collide::Compound(compound) => compound.children(),
            _ => &[],
        }
    }

    pub fn compute_bounds(&self, orientation: Quat) -> BoundingBox {
        match self {
            Collide::Compound(compound) => compound.compute_bounds(orientation),
            Collide::Sphere(sphere) => sphere.local_bounds(),
            Collide::TriangleMesh(mesh) => mesh.compute_bounds(orientation),
        }
    }

    /// True while any body still uses the model. Only compounds track their bodies.
    pub fn is_referenced(&self) -> bool {
        match self {
            Collide::Compound(compound) => compound.is_referenced(),
            _ => false,
        }
    }
}

impl Shape for Collide {
    fn type_id(&self) -> i32 {
        match self {
            Collide::Compound(compound) => compound.type_id(),
            Collide::Sphere(sphere) => sphere.type_id(),
            Collide::TriangleMesh(mesh) => mesh.type_id(),
        }
    }

    fn volume(&self) -> f32 {
        match self {
            Collide::Compound(compound) => compound.volume(),
            Collide::Sphere(sphere) => sphere.volume(),
            Collide::TriangleMesh(mesh) => mesh.volume(),
        }
    }

    fn surface_area(&self) -> f32 {
        match self {
            Collide::Compound(compound) => compound.surface_area(),
            Collide::Sphere(sphere) => sphere.surface_area(),
            Collide::TriangleMesh(mesh) => mesh.surface_area(),
        }
    }

    fn mass_center(&self) -> Vec3 {
        match self {
            Collide::Compound(compound) => compound.mass_center(),
            Collide::Sphere(sphere) => sphere.mass_center(),
            Collide::TriangleMesh(mesh) => mesh.mass_center(),
        }
    }

    fn inertia(&self) -> Vec3 {
        match self {
            Collide::Compound(compound) => compound.inertia(),
            Collide::Sphere(sphere) => sphere.inertia(),
            Collide::TriangleMesh(mesh) => mesh.inertia(),
        }
    }
}

impl From<CompoundShape> for Collide {
    fn from(compound: CompoundShape) -> Self {
        Collide::Compound(compound)
    }
}

impl From<SphereShape> for Collide {
    fn from(sphere: SphereShape) -> Self {
        Collide::Sphere(sphere)
    }
}

impl From<TriangleMeshShape> for Collide {
    fn from(mesh: TriangleMeshShape) -> Self {
        Collide::TriangleMesh(mesh)
    }
}
