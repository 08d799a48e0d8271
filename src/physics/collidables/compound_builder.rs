use glam::Vec3;
use tracing::debug;

use super::compound::{CollideOwnership, CompoundChild, CompoundShape};
use super::convex::{ConvexOwnership, ConvexPrimitive};
use super::mesh_inertia_helper::MeshInertiaHelper;
use super::shape::Shape;
use crate::physics::errors::CollisionError;
use crate::utilities::bounding_box::BoundingBox;

/// Reusable convenience type for incrementally building compound shapes out of convexes.
///
/// Children keep the origin they were created with; the built compound is centered on the
/// volume-weighted center of mass of all children.
#[derive(Debug, Default)]
pub struct CompoundBuilder {
    pub children: Vec<ConvexPrimitive>,
}

impl CompoundBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(initial_builder_capacity: usize) -> Self {
        Self {
            children: Vec::with_capacity(initial_builder_capacity),
        }
    }

    /// Adds a convex to the accumulator.
    pub fn add(&mut self, convex: ConvexPrimitive) {
        self.children.push(convex);
    }

    #[inline]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Builds a game-owned compound with eagerly computed mass properties.
    pub fn build(self) -> Result<CompoundShape, CollisionError> {
        if self.children.is_empty() {
            return Err(CollisionError::EmptyCompound);
        }
        Ok(Self::assemble(self.children, CollideOwnership::Game))
    }

    /// Absorbs `convexes` into a compound. Internally owned convexes keep their tag.
    pub(crate) fn assemble(
        mut convexes: Vec<ConvexPrimitive>,
        ownership: CollideOwnership,
    ) -> CompoundShape {
        for convex in &mut convexes {
            if convex.ownership() == ConvexOwnership::Unowned {
                convex.set_ownership(ConvexOwnership::OwnedByCompound);
            }
        }
        let volume: f32 = convexes.iter().map(|convex| convex.volume()).sum();
        let mass_center = Self::compute_center_of_mass(&convexes, volume);

        let mut compound =
            CompoundShape::from_parts(convexes, mass_center, Vec3::ZERO, Some(volume), ownership);
        let inertia = Self::compute_inertia(compound.children(), volume, compound.bounds());
        compound.set_inertia(inertia);
        debug!(
            children = compound.child_count(),
            volume,
            mass_center = %mass_center,
            "assembled compound"
        );
        compound
    }

    /// Volume-weighted center of mass of the convexes in compound space.
    ///
    /// Without volume, falls back to the center of the union of the convexes' bounds.
    pub fn compute_center_of_mass(convexes: &[ConvexPrimitive], volume: f32) -> Vec3 {
        if volume > 0.0 {
            let sum = convexes.iter().fold(Vec3::ZERO, |sum, convex| {
                sum + (convex.origin() + convex.mass_center()) * convex.volume()
            });
            sum / volume
        } else {
            convexes
                .iter()
                .fold(BoundingBox::empty(), |bounds, convex| {
                    BoundingBox::create_merged_boxes(bounds, convex.origin_bounds())
                })
                .center()
        }
    }

    /// Inertia contribution of a child of `volume` whose origin sits at `offset` from the
    /// compound's mass center.
    #[inline]
    pub fn get_offset_inertia_contribution(inertia: Vec3, offset: Vec3, volume: f32) -> Vec3 {
        volume * MeshInertiaHelper::offset_inertia(inertia, offset, false)
    }

    /// Volume-weighted inertia of `children` about the compound's mass center.
    ///
    /// Without volume, treats `bounds` as a solid box.
    pub fn compute_inertia(children: &[CompoundChild], volume: f32, bounds: BoundingBox) -> Vec3 {
        if !(volume > 0.0) {
            return MeshInertiaHelper::compute_bounding_box_properties(bounds).inertia;
        }
        let summed = children.iter().fold(Vec3::ZERO, |sum, child| {
            let convex = child.convex();
            sum + Self::get_offset_inertia_contribution(
                convex.inertia(),
                child.local_position(),
                convex.volume(),
            )
        });
        (summed / volume).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collidables::box_shape::BoxShape;
    use crate::physics::collidables::convex_hull::HullShape;
    use crate::physics::collidables::shape::CONVEX_DISTANCE_MARGIN;
    use approx::assert_relative_eq;

    /// Box whose solid core has exactly `half_extents`.
    fn core_box(half_extents: Vec3) -> BoxShape {
        BoxShape::new(half_extents + Vec3::splat(CONVEX_DISTANCE_MARGIN))
    }

    fn flat_triangle(offset: Vec3) -> ConvexPrimitive {
        let hull = HullShape::new(
            vec![offset, offset + Vec3::X, offset + Vec3::Y],
            vec![0, 1, 2],
        )
        .unwrap();
        ConvexPrimitive::from_hull(hull)
    }

    #[test]
    fn test_empty_builder_fails() {
        assert_eq!(
            CompoundBuilder::new().build().unwrap_err(),
            CollisionError::EmptyCompound
        );
    }

    #[test]
    fn test_weighted_center_of_mass() {
        let mut builder = CompoundBuilder::with_capacity(2);
        builder.add(ConvexPrimitive::from_box(core_box(Vec3::splat(0.5)), Vec3::ZERO));
        builder.add(ConvexPrimitive::from_box(
            core_box(Vec3::new(1.0, 0.5, 0.5)),
            Vec3::new(3.0, 0.0, 0.0),
        ));
        assert_eq!(builder.child_count(), 2);
        let compound = builder.build().unwrap();
        // Volumes 1 and 2.
        assert_relative_eq!(compound.volume(), 3.0, epsilon = 1e-5);
        assert_relative_eq!(compound.mass_center(), Vec3::new(2.0, 0.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(
            compound.children()[0].local_position(),
            Vec3::new(-2.0, 0.0, 0.0),
            epsilon = 1e-5
        );
        assert_eq!(compound.ownership(), CollideOwnership::Game);
    }

    #[test]
    fn test_flat_children_fall_back_to_bounds() {
        let mut builder = CompoundBuilder::new();
        builder.add(flat_triangle(Vec3::ZERO));
        builder.add(flat_triangle(Vec3::new(4.0, 0.0, 0.0)));
        let compound = builder.build().unwrap();
        assert_eq!(compound.volume(), 0.0);
        assert_relative_eq!(compound.mass_center(), Vec3::new(2.5, 0.5, 0.0), epsilon = 1e-5);
        let expected =
            MeshInertiaHelper::compute_bounding_box_properties(compound.bounds()).inertia;
        assert_relative_eq!(compound.inertia(), expected);
        assert!(compound.inertia().x > 0.0);
    }

    #[test]
    fn test_internal_convexes_keep_their_tag() {
        let mut convex = ConvexPrimitive::from_box(BoxShape::new(Vec3::ONE), Vec3::ZERO);
        convex.set_ownership(ConvexOwnership::OwnedInternally);
        let compound = CompoundBuilder::assemble(vec![convex], CollideOwnership::Internal);
        assert_eq!(
            compound.children()[0].convex().ownership(),
            ConvexOwnership::OwnedInternally
        );
        assert_eq!(compound.ownership(), CollideOwnership::Internal);
        assert_relative_eq!(compound.inertia(), BoxShape::new(Vec3::ONE).inertia());
    }
}
