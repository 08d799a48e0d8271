use glam::Vec3;
use tracing::{debug, warn};

use super::collidables::body_references::MassCenterObserver;
use super::collidables::collide::Collide;
use super::collidables::compound::{CompoundShape, MassOverrides};
use super::collidables::compound_builder::CompoundBuilder;
use super::collidables::convex::{ConvexOwnership, ConvexPrimitive};
use super::collidables::convex_hull::HullShape;
use super::collidables::convex_hull_helper::ConvexHullHelper;
use super::collidables::mesh::TriangleMeshShape;
use super::collidables::polysoup::Polysoup;
use super::collidables::shape::Shape;
use super::collidables::sphere::SphereShape;
use super::collision_settings::CollisionSettings;
use super::errors::CollisionError;
use super::handles::{CachedCollideId, CachedSphereId};
use super::shape_cache::{BoxCompoundCache, SphereCache};
use super::units::UnitConversion;
use super::vcollide::{decode_solid, decode_vcollide, Endian, VCollideSolid};

/// Convex polyhedron in legacy units. Polygons index into `vertices` and may be empty.
#[derive(Debug, Clone, Default)]
pub struct Polyhedron {
    pub vertices: Vec<Vec3>,
    pub polygons: Vec<Vec<u16>>,
}

/// Triangle list handed over by the host for static geometry, in legacy units.
#[derive(Debug, Clone, Default)]
pub struct VirtualMeshParams {
    pub vertices: Vec<Vec3>,
    pub indices: Vec<u16>,
    pub surface_props_index: i32,
}

/// Every solid of a loaded collision model and the model's key-values text.
#[derive(Debug, Clone)]
pub struct VCollideModel {
    pub solids: Vec<Collide>,
    pub key_values: String,
}

/// Collision context: builds convexes and collision models from legacy-unit input.
///
/// A context owns its hull scratch state and both shape caches. Nothing is shared between
/// contexts, so each host thread can create its own with [`Self::thread_context_create`].
#[derive(Debug)]
pub struct PhysicsCollision {
    settings: CollisionSettings,
    units: UnitConversion,
    hull_helper: ConvexHullHelper,
    bbox_cache: BoxCompoundCache,
    sphere_cache: SphereCache,
}

impl Default for PhysicsCollision {
    fn default() -> Self {
        Self::new(CollisionSettings::default())
    }
}

impl PhysicsCollision {
    pub fn new(settings: CollisionSettings) -> Self {
        Self {
            units: settings.units(),
            hull_helper: ConvexHullHelper::new(),
            bbox_cache: BoxCompoundCache::new(settings.internal_bbox_tolerance()),
            sphere_cache: SphereCache::new(settings.internal_sphere_tolerance()),
            settings,
        }
    }

    #[inline]
    pub fn settings(&self) -> &CollisionSettings {
        &self.settings
    }

    #[inline]
    pub fn units(&self) -> UnitConversion {
        self.units
    }

    /// Creates an independent context with the same settings and empty caches.
    pub fn thread_context_create(&self) -> Self {
        Self::new(self.settings)
    }

    /// Builds a hull around legacy-unit vertices.
    pub fn convex_from_verts(&mut self, verts: &[Vec3]) -> Result<ConvexPrimitive, CollisionError> {
        let points: Vec<Vec3> = verts
            .iter()
            .map(|vertex| self.units.position_to_internal(*vertex))
            .collect();
        let hull = HullShape::from_unordered_points(&points, &mut self.hull_helper).map_err(|error| {
            warn!(vertices = verts.len(), %error, "convex construction failed");
            error
        })?;
        Ok(ConvexPrimitive::from_hull(hull))
    }

    /// Builds a hull from a polyhedron, fanning its polygons or re-hulling its vertices when it
    /// has none.
    pub fn convex_from_polyhedron(
        &mut self,
        polyhedron: &Polyhedron,
    ) -> Result<ConvexPrimitive, CollisionError> {
        if polyhedron.polygons.is_empty() {
            return self.convex_from_verts(&polyhedron.vertices);
        }
        let points = polyhedron
            .vertices
            .iter()
            .map(|vertex| self.units.position_to_internal(*vertex))
            .collect();
        let mut triangle_indices = Vec::new();
        for polygon in polyhedron.polygons.iter().filter(|polygon| polygon.len() >= 3) {
            for k in 2..polygon.len() {
                triangle_indices.extend([
                    polygon[0] as u32,
                    polygon[k - 1] as u32,
                    polygon[k] as u32,
                ]);
            }
        }
        Ok(ConvexPrimitive::from_hull(HullShape::new(points, triangle_indices)?))
    }

    /// Volume in cubic legacy units.
    pub fn convex_volume(&self, convex: &ConvexPrimitive) -> f32 {
        self.units.volume_to_legacy(convex.volume())
    }

    /// Surface area in square legacy units.
    pub fn convex_surface_area(&self, convex: &ConvexPrimitive) -> f32 {
        self.units.area_to_legacy(convex.surface_area())
    }

    /// Releases a convex the game still owns. Convexes owned by a compound or by this context
    /// are handed back untouched.
    pub fn convex_free(&self, convex: ConvexPrimitive) -> Result<(), ConvexPrimitive> {
        match convex.ownership() {
            ConvexOwnership::Unowned => Ok(()),
            ownership => {
                warn!(?ownership, "refusing to free an owned convex");
                Err(convex)
            }
        }
    }

    /// Absorbs `convexes` into a new game-owned compound.
    pub fn convert_convexes_to_collide(
        &self,
        convexes: Vec<ConvexPrimitive>,
    ) -> Result<Collide, CollisionError> {
        Ok(CompoundBuilder {
            children: convexes,
        }
        .build()?
        .into())
    }

    /// Returns the cached box compound spanning `mins`..`maxs`, or `None` for an empty box.
    pub fn bbox_to_collide(&mut self, mins: Vec3, maxs: Vec3) -> Option<CachedCollideId> {
        if mins == maxs {
            return None;
        }
        let mins = self.units.position_to_internal(mins);
        let maxs = self.units.position_to_internal(maxs);
        let half_extents = (maxs - mins).abs() * 0.5;
        let origin = (mins + maxs) * 0.5;
        Some(self.bbox_cache.find_or_insert(half_extents, origin))
    }

    /// The box convex inside the cached compound spanning `mins`..`maxs`.
    pub fn bbox_to_convex(&mut self, mins: Vec3, maxs: Vec3) -> Option<&ConvexPrimitive> {
        let id = self.bbox_to_collide(mins, maxs)?;
        self.bbox_cache
            .get(id)?
            .get_child(0)
            .map(|child| child.convex())
    }

    #[inline]
    pub fn cached_collide(&self, id: CachedCollideId) -> Option<&CompoundShape> {
        self.bbox_cache.get(id)
    }

    #[inline]
    pub fn cached_collide_mut(&mut self, id: CachedCollideId) -> Option<&mut CompoundShape> {
        self.bbox_cache.get_mut(id)
    }

    /// Drops every cached box and sphere; ids handed out before become invalid.
    pub fn clear_bbox_cache(&mut self) {
        self.bbox_cache.clear();
        self.sphere_cache.clear();
    }

    /// Returns a cached sphere of `radius` legacy units.
    pub fn create_cached_sphere(&mut self, radius: f32) -> CachedSphereId {
        self.sphere_cache
            .find_or_insert(self.units.distance_to_internal(radius))
    }

    #[inline]
    pub fn cached_sphere(&self, id: CachedSphereId) -> Option<&SphereShape> {
        self.sphere_cache.get(id)
    }

    pub fn create_virtual_mesh(&self, params: &VirtualMeshParams) -> Result<Collide, CollisionError> {
        let vertices = params
            .vertices
            .iter()
            .map(|vertex| self.units.position_to_internal(*vertex))
            .collect();
        Ok(TriangleMeshShape::new(vertices, params.indices.clone(), params.surface_props_index)?.into())
    }

    pub fn polysoup_create(&self) -> Polysoup {
        Polysoup::new()
    }

    /// Adds a legacy-unit triangle with an optional 7-bit material to `soup`.
    pub fn polysoup_add_triangle(
        &self,
        soup: &mut Polysoup,
        a: Vec3,
        b: Vec3,
        c: Vec3,
        material_index: u8,
    ) -> Result<(), CollisionError> {
        soup.add_triangle(
            self.units.position_to_internal(a),
            self.units.position_to_internal(b),
            self.units.position_to_internal(c),
            material_index,
        )
    }

    pub fn convert_polysoup_to_collide(&self, soup: Polysoup) -> Result<Collide, CollisionError> {
        Ok(soup.into_collide()?.into())
    }

    /// Decodes one serialized solid. `overrides` are in internal units and replace the mass
    /// properties stored in the buffer.
    pub fn unserialize_collide(
        &self,
        data: &[u8],
        order: Endian,
        overrides: Option<MassOverrides>,
    ) -> Result<Collide, CollisionError> {
        let solid = decode_solid(data, order, self.settings.max_ledge_tree_depth)?;
        Ok(Self::solid_to_compound(solid, overrides)?.into())
    }

    /// Decodes `solid_count` solids plus the key-values text of a collision model.
    pub fn vcollide_load(
        &self,
        data: &[u8],
        solid_count: usize,
        order: Endian,
    ) -> Result<VCollideModel, CollisionError> {
        let decoded = decode_vcollide(data, solid_count, order, self.settings.max_ledge_tree_depth)?;
        let solids = decoded
            .solids
            .into_iter()
            .map(|solid| Self::solid_to_compound(solid, None).map(Collide::from))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(solids = solids.len(), "loaded collision model");
        Ok(VCollideModel {
            solids,
            key_values: decoded.key_values,
        })
    }

    fn solid_to_compound(
        solid: VCollideSolid,
        overrides: Option<MassOverrides>,
    ) -> Result<CompoundShape, CollisionError> {
        let mut compound = CompoundShape::from_compact_surface(solid.surface, overrides)?;
        compound.set_orthographic_areas(solid.orthographic_areas);
        Ok(compound)
    }

    /// Volume in cubic legacy units.
    pub fn collide_volume(&self, collide: &dyn Shape) -> f32 {
        self.units.volume_to_legacy(collide.volume())
    }

    /// Surface area in square legacy units.
    pub fn collide_surface_area(&self, collide: &dyn Shape) -> f32 {
        self.units.area_to_legacy(collide.surface_area())
    }

    /// Mass center as a legacy position.
    pub fn collide_mass_center(&self, collide: &dyn Shape) -> Vec3 {
        self.units.position_to_legacy(collide.mass_center())
    }

    /// Moves a compound's mass center to the legacy position `mass_center`; `observer` hears
    /// from every attached body with the previous center in internal units.
    pub fn collide_set_mass_center(
        &self,
        compound: &mut CompoundShape,
        mass_center: Vec3,
        observer: &mut dyn MassCenterObserver,
    ) {
        compound.set_mass_center(self.units.position_to_internal(mass_center), observer);
    }

    pub fn is_collision_model_used(&self, collide: &Collide) -> bool {
        collide.is_referenced()
    }
}
