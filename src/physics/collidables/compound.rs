use std::cell::OnceCell;

use glam::{Quat, Vec3};
use tracing::debug;

use super::body_references::{BodyReferenceList, MassCenterObserver};
use super::compound_builder::CompoundBuilder;
use super::convex::{ConvexOwnership, ConvexPrimitive};
use super::convex_hull::HullShape;
use super::shape::Shape;
use crate::physics::errors::CollisionError;
use crate::physics::handles::BodyHandle;
use crate::physics::vcollide::{CompactSurface, LedgeTreeNode};
use crate::utilities::bounding_box::BoundingBox;

/// Who is responsible for destroying a compound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollideOwnership {
    /// Built for the game, which frees it.
    Game,
    /// Kept by a collision context cache.
    Internal,
}

/// Mass properties that replace the ones stored in a compact surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassOverrides {
    pub mass_center: Vec3,
    pub inertia: Vec3,
}

/// Convex child of a compound and its offset from the compound's mass center.
#[derive(Debug, Clone)]
pub struct CompoundChild {
    convex: ConvexPrimitive,
    local_position: Vec3,
}

impl CompoundChild {
    #[inline]
    pub fn convex(&self) -> &ConvexPrimitive {
        &self.convex
    }

    /// Position of the child's local origin relative to the compound's mass center.
    #[inline]
    pub fn local_position(&self) -> Vec3 {
        self.local_position
    }

    /// Bounds of the child in the compound's mass-centered space.
    pub fn bounds(&self) -> BoundingBox {
        self.convex.shape().local_bounds().translated(self.local_position)
    }
}

/// Aggregate of convex primitives sharing one mass center and inertia.
#[derive(Debug, Clone)]
pub struct CompoundShape {
    children: Vec<CompoundChild>,
    volume: OnceCell<f32>,
    mass_center: Vec3,
    inertia: Vec3,
    bounds: BoundingBox,
    ownership: CollideOwnership,
    orthographic_areas: Vec3,
    index: i32,
    references: BodyReferenceList,
}

impl CompoundShape {
    /// Type id of compound shapes.
    pub const ID: i32 = 6;

    /// Places the children around `mass_center`. A known `volume` is cached right away.
    pub(crate) fn from_parts(
        convexes: Vec<ConvexPrimitive>,
        mass_center: Vec3,
        inertia: Vec3,
        volume: Option<f32>,
        ownership: CollideOwnership,
    ) -> Self {
        let children: Vec<CompoundChild> = convexes
            .into_iter()
            .map(|convex| CompoundChild {
                local_position: convex.origin() - mass_center,
                convex,
            })
            .collect();
        let bounds = Self::compute_local_bounds(&children);
        Self {
            children,
            volume: volume.map_or_else(OnceCell::new, OnceCell::from),
            mass_center,
            inertia,
            bounds,
            ownership,
            orthographic_areas: Vec3::ONE,
            index: 0,
            references: BodyReferenceList::new(),
        }
    }

    /// Flattens a decoded ledge tree into hull children, left subtrees first.
    ///
    /// The mass properties are taken as given; the volume is summed on first query.
    pub fn from_ledge_tree(
        root: LedgeTreeNode,
        mass_center: Vec3,
        inertia: Vec3,
    ) -> Result<Self, CollisionError> {
        let convexes = root
            .into_ledges()
            .into_iter()
            .map(|ledge| -> Result<ConvexPrimitive, CollisionError> {
                let mut convex = ConvexPrimitive::from_hull(HullShape::from_ledge(ledge)?);
                convex.set_ownership(ConvexOwnership::OwnedByCompound);
                Ok(convex)
            })
            .collect::<Result<Vec<_>, _>>()?;
        if convexes.is_empty() {
            return Err(CollisionError::EmptyCompound);
        }
        debug!(children = convexes.len(), "built compound from ledge tree");
        Ok(Self::from_parts(
            convexes,
            mass_center,
            inertia,
            None,
            CollideOwnership::Game,
        ))
    }

    /// Builds a compound from a decoded compact surface, optionally replacing its mass properties.
    pub fn from_compact_surface(
        surface: CompactSurface,
        overrides: Option<MassOverrides>,
    ) -> Result<Self, CollisionError> {
        let (mass_center, inertia) = match overrides {
            Some(overrides) => (overrides.mass_center, overrides.inertia),
            None => (surface.mass_center, surface.rotation_inertia),
        };
        Self::from_ledge_tree(surface.root, mass_center, inertia)
    }

    #[inline]
    pub(crate) fn set_inertia(&mut self, inertia: Vec3) {
        self.inertia = inertia;
    }

    #[inline]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub fn children(&self) -> &[CompoundChild] {
        &self.children
    }

    #[inline]
    pub fn get_child(&self, index: usize) -> Option<&CompoundChild> {
        self.children.get(index)
    }

    /// Local bounds around the mass center.
    #[inline]
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Bounds of the compound rotated by `orientation` about its mass center.
    pub fn compute_bounds(&self, orientation: Quat) -> BoundingBox {
        self.children.iter().fold(BoundingBox::empty(), |bounds, child| {
            let child_bounds = child
                .convex
                .shape()
                .compute_bounds(orientation)
                .translated(orientation * child.local_position);
            BoundingBox::create_merged_boxes(bounds, child_bounds)
        })
    }

    /// Farthest point of the compound along `direction`, relative to the mass center.
    pub fn extent(&self, direction: Vec3) -> Vec3 {
        let mut best = Vec3::ZERO;
        let mut best_distance = f32::MIN;
        for child in &self.children {
            let candidate = child.convex.shape().support_point(direction) + child.local_position;
            let distance = candidate.dot(direction);
            if distance > best_distance {
                best_distance = distance;
                best = candidate;
            }
        }
        best
    }

    /// Moves the mass center, re-derives offsets, bounds and inertia, then tells every
    /// attached body where the mass center used to be.
    pub fn set_mass_center(&mut self, mass_center: Vec3, observer: &mut dyn MassCenterObserver) {
        let previous = self.mass_center;
        self.mass_center = mass_center;
        for child in &mut self.children {
            child.local_position = child.convex.origin() - mass_center;
        }
        self.bounds = Self::compute_local_bounds(&self.children);
        self.inertia = CompoundBuilder::compute_inertia(&self.children, self.volume(), self.bounds);
        debug!(
            previous = %previous,
            current = %mass_center,
            bodies = self.references.len(),
            "compound mass center changed"
        );
        for body in self.references.iter() {
            observer.mass_center_changed(body, previous);
        }
    }

    /// Attaches a body so it hears about mass center changes. Returns false if already attached.
    pub fn add_object_reference(&mut self, body: BodyHandle) -> bool {
        self.references.add(body)
    }

    pub fn remove_object_reference(&mut self, body: BodyHandle) -> bool {
        self.references.remove(body)
    }

    #[inline]
    pub fn object_references(&self) -> &BodyReferenceList {
        &self.references
    }

    #[inline]
    pub fn is_referenced(&self) -> bool {
        !self.references.is_empty()
    }

    #[inline]
    pub fn index(&self) -> i32 {
        self.index
    }

    #[inline]
    pub fn set_index(&mut self, index: i32) {
        self.index = index;
    }

    #[inline]
    pub fn orthographic_areas(&self) -> Vec3 {
        self.orthographic_areas
    }

    #[inline]
    pub fn set_orthographic_areas(&mut self, areas: Vec3) {
        self.orthographic_areas = areas;
    }

    #[inline]
    pub fn ownership(&self) -> CollideOwnership {
        self.ownership
    }

    /// Material of child `child` at `point`, given relative to the compound's mass center.
    pub fn triangle_material_index(&self, child: usize, point: Vec3) -> i32 {
        self.children.get(child).map_or(0, |child| {
            child
                .convex
                .shape()
                .triangle_material_index(point - child.local_position)
        })
    }

    fn compute_local_bounds(children: &[CompoundChild]) -> BoundingBox {
        children.iter().fold(BoundingBox::empty(), |bounds, child| {
            BoundingBox::create_merged_boxes(bounds, child.bounds())
        })
    }
}

impl Shape for CompoundShape {
    fn type_id(&self) -> i32 {
        Self::ID
    }

    /// Sum of the child volumes, computed once.
    fn volume(&self) -> f32 {
        *self
            .volume
            .get_or_init(|| self.children.iter().map(|child| child.convex.volume()).sum())
    }

    fn surface_area(&self) -> f32 {
        self.children
            .iter()
            .map(|child| child.convex.surface_area())
            .sum()
    }

    fn mass_center(&self) -> Vec3 {
        self.mass_center
    }

    fn inertia(&self) -> Vec3 {
        self.inertia
    }
}
