use glam::Vec3;
use tracing::{debug, trace};

use super::collidables::box_shape::BoxShape;
use super::collidables::compound::{CollideOwnership, CompoundShape};
use super::collidables::compound_builder::CompoundBuilder;
use super::collidables::convex::{ConvexOwnership, ConvexPrimitive, ConvexShape};
use super::collidables::sphere::SphereShape;
use super::handles::{CachedCollideId, CachedSphereId};

/// Single-box compounds shared between every caller asking for nearly the same box.
///
/// Entries live as long as the cache; [`Self::clear`] drops all of them and invalidates every
/// id handed out so far.
#[derive(Debug, Default)]
pub struct BoxCompoundCache {
    entries: Vec<CompoundShape>,
    tolerance: f32,
}

impl BoxCompoundCache {
    /// `tolerance` is the largest per-axis difference, in internal units, for two boxes to match.
    pub fn new(tolerance: f32) -> Self {
        Self {
            entries: Vec::new(),
            tolerance,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Finds a cached box whose half extents and origin are both within tolerance on every axis.
    /// Newer entries are checked first.
    pub fn find(&self, half_extents: Vec3, origin: Vec3) -> Option<CachedCollideId> {
        self.entries
            .iter()
            .enumerate()
            .rev()
            .find(|(_, compound)| {
                Self::cached_box(compound).is_some_and(|(cached_half_extents, cached_origin)| {
                    (cached_half_extents - half_extents).abs().max_element() <= self.tolerance
                        && (cached_origin - origin).abs().max_element() <= self.tolerance
                })
            })
            .map(|(index, _)| CachedCollideId(index))
    }

    /// Returns a matching cached box compound, building and caching a new one on a miss.
    pub fn find_or_insert(&mut self, half_extents: Vec3, origin: Vec3) -> CachedCollideId {
        if let Some(id) = self.find(half_extents, origin) {
            trace!(%id, "box cache hit");
            return id;
        }
        let mut convex = ConvexPrimitive::from_box(BoxShape::new(half_extents), origin);
        convex.set_ownership(ConvexOwnership::OwnedInternally);
        let compound = CompoundBuilder::assemble(vec![convex], CollideOwnership::Internal);
        let id = CachedCollideId(self.entries.len());
        self.entries.push(compound);
        debug!(%id, half_extents = %half_extents, origin = %origin, "box cache miss");
        id
    }

    #[inline]
    pub fn get(&self, id: CachedCollideId) -> Option<&CompoundShape> {
        self.entries.get(id.0)
    }

    /// Mutable access for attaching bodies and moving the mass center.
    #[inline]
    pub fn get_mut(&mut self, id: CachedCollideId) -> Option<&mut CompoundShape> {
        self.entries.get_mut(id.0)
    }

    pub fn clear(&mut self) {
        debug!(entries = self.entries.len(), "clearing box cache");
        self.entries.clear();
    }

    fn cached_box(compound: &CompoundShape) -> Option<(Vec3, Vec3)> {
        let convex = compound.get_child(0)?.convex();
        match convex.shape() {
            ConvexShape::Box(shape) => Some((shape.half_extents, convex.origin())),
            _ => None,
        }
    }
}

/// Spheres shared between every caller asking for nearly the same radius.
#[derive(Debug, Default)]
pub struct SphereCache {
    entries: Vec<SphereShape>,
    tolerance: f32,
}

impl SphereCache {
    pub fn new(tolerance: f32) -> Self {
        Self {
            entries: Vec::new(),
            tolerance,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find_or_insert(&mut self, radius: f32) -> CachedSphereId {
        let existing = self
            .entries
            .iter()
            .rposition(|sphere| (sphere.radius() - radius).abs() <= self.tolerance);
        if let Some(index) = existing {
            return CachedSphereId(index);
        }
        self.entries.push(SphereShape::new(radius));
        CachedSphereId(self.entries.len() - 1)
    }

    #[inline]
    pub fn get(&self, id: CachedSphereId) -> Option<&SphereShape> {
        self.entries.get(id.0)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collidables::shape::Shape;

    #[test]
    fn test_box_cache_tolerance() {
        let mut cache = BoxCompoundCache::new(0.1);
        let first = cache.find_or_insert(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO);
        let near = cache.find_or_insert(Vec3::new(1.05, 2.0, 2.95), Vec3::new(0.0, 0.09, 0.0));
        assert_eq!(first, near);
        assert_eq!(cache.len(), 1);

        let far = cache.find_or_insert(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.5, 0.0, 0.0));
        assert_ne!(first, far);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_newest_match_wins() {
        let mut cache = BoxCompoundCache::new(0.1);
        cache.find_or_insert(Vec3::ONE, Vec3::ZERO);
        let newer = cache.find_or_insert(Vec3::splat(1.15), Vec3::ZERO);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.find(Vec3::splat(1.08), Vec3::ZERO), Some(newer));
    }

    #[test]
    fn test_cached_compound_is_internal() {
        let mut cache = BoxCompoundCache::new(0.1);
        let id = cache.find_or_insert(Vec3::new(1.0, 0.5, 0.5), Vec3::new(2.0, 0.0, 0.0));
        let compound = cache.get(id).unwrap();
        assert_eq!(compound.ownership(), CollideOwnership::Internal);
        assert_eq!(compound.child_count(), 1);
        assert_eq!(
            compound.children()[0].convex().ownership(),
            ConvexOwnership::OwnedInternally
        );
        assert_eq!(compound.mass_center(), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(compound.volume(), BoxShape::new(Vec3::new(1.0, 0.5, 0.5)).volume());

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get(id).is_none());
    }

    #[test]
    fn test_sphere_cache() {
        let mut cache = SphereCache::new(0.1);
        let a = cache.find_or_insert(1.0);
        assert_eq!(cache.find_or_insert(1.05), a);
        let b = cache.find_or_insert(2.0);
        assert_ne!(a, b);
        assert_eq!(cache.get(b).unwrap().radius(), 2.0);
        cache.clear();
        assert!(cache.get(a).is_none());
    }
}
