use glam::Vec3;
use tracing::trace;

use super::compound::CompoundShape;
use super::compound_builder::CompoundBuilder;
use super::convex::ConvexPrimitive;
use super::convex_hull::HullShape;
use crate::physics::errors::CollisionError;

/// Triangles accumulated one at a time and later turned into a compound of flat hulls.
#[derive(Debug, Default)]
pub struct Polysoup {
    convexes: Vec<ConvexPrimitive>,
}

impl Polysoup {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.convexes.len()
    }

    /// Adds one triangle. A nonzero material is stored as the triangle's 7-bit override.
    pub fn add_triangle(
        &mut self,
        a: Vec3,
        b: Vec3,
        c: Vec3,
        material_index: u8,
    ) -> Result<(), CollisionError> {
        let mut hull = HullShape::new(vec![a, b, c], vec![0, 1, 2])?;
        if material_index & 0x7F != 0 {
            hull.set_triangle_material_index(0, material_index);
        }
        trace!(triangles = self.convexes.len() + 1, "added polysoup triangle");
        self.convexes.push(ConvexPrimitive::from_hull(hull));
        Ok(())
    }

    /// Consumes the soup into a game-owned compound.
    pub fn into_collide(self) -> Result<CompoundShape, CollisionError> {
        CompoundBuilder {
            children: self.convexes,
        }
        .build()
    }
}
