use glam::{Mat3, Quat, Vec3};

use super::mesh_inertia_helper::{IndexedTriangleSource, MeshInertiaHelper};
use super::shape::Shape;
use crate::physics::errors::CollisionError;
use crate::utilities::bounding_box::BoundingBox;

/// Static triangle mesh, typically terrain handed over by the host as a virtual mesh.
///
/// Meshes have no volume; they are meant for static geometry only.
#[derive(Debug, Clone)]
pub struct TriangleMeshShape {
    vertices: Vec<Vec3>,
    indices: Vec<u16>,
    surface_props_index: i32,
}

impl TriangleMeshShape {
    /// Type id of mesh shapes.
    pub const ID: i32 = 8;

    pub fn new(
        vertices: Vec<Vec3>,
        indices: Vec<u16>,
        surface_props_index: i32,
    ) -> Result<Self, CollisionError> {
        if indices.is_empty() || indices.len() % 3 != 0 {
            return Err(CollisionError::InvalidTriangleList(indices.len()));
        }
        if let Some(&index) = indices
            .iter()
            .find(|&&index| index as usize >= vertices.len())
        {
            return Err(CollisionError::TriangleIndexOutOfRange {
                index: index as u32,
                points: vertices.len(),
            });
        }
        Ok(Self {
            vertices,
            indices,
            surface_props_index,
        })
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn surface_props_index(&self) -> i32 {
        self.surface_props_index
    }

    /// Computes the bounding box of the mesh given an orientation.
    pub fn compute_bounds(&self, orientation: Quat) -> BoundingBox {
        let basis = Mat3::from_quat(orientation);
        self.indices
            .iter()
            .fold(BoundingBox::empty(), |bounds, &index| {
                bounds.including(basis * self.vertices[index as usize])
            })
    }
}

impl Shape for TriangleMeshShape {
    #[inline(always)]
    fn type_id(&self) -> i32 {
        Self::ID
    }

    fn volume(&self) -> f32 {
        0.0
    }

    fn surface_area(&self) -> f32 {
        MeshInertiaHelper::compute_surface_area(&mut IndexedTriangleSource::new(
            &self.vertices,
            &self.indices,
        ))
    }

    fn mass_center(&self) -> Vec3 {
        Vec3::ZERO
    }

    fn inertia(&self) -> Vec3 {
        Vec3::ONE
    }
}
