use glam::Vec3;

use crate::utilities::bounding_box::BoundingBox;

/// Defines a type capable of providing a sequence of triangles.
pub trait ITriangleSource {
    /// Gets the next triangle in the sequence, if any.
    fn get_next_triangle(&mut self) -> Option<(Vec3, Vec3, Vec3)>;
}

/// Volume, center of mass and per-unit-mass diagonal inertia of a solid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeProperties {
    pub volume: f32,
    pub mass_center: Vec3,
    pub inertia: Vec3,
}

/// Provides helpers for computing the mass properties of objects with triangular surfaces.
pub struct MeshInertiaHelper;

impl MeshInertiaHelper {
    /// Six times the unsigned volume of the tetrahedron (reference, a, b, c).
    #[inline(always)]
    pub fn compute_tetrahedron_six_volume(reference: Vec3, a: Vec3, b: Vec3, c: Vec3) -> f32 {
        let a = a - reference;
        let b = b - reference;
        let c = c - reference;
        a.dot(b.cross(c)).abs()
    }

    /// Diagonal inertia contribution of the tetrahedron (0, a, b, c) at unit density.
    pub fn compute_tetrahedron_inertia(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
        let scale = a.dot(b.cross(c)).abs() * (0.1 / 6.0);
        // Second moments along each axis.
        let moments = scale * (a * a + b * b + c * c + a * b + a * c + b * c);
        Vec3::new(
            moments.y + moments.z,
            moments.z + moments.x,
            moments.x + moments.y,
        )
    }

    #[inline(always)]
    pub fn compute_triangle_area(a: Vec3, b: Vec3, c: Vec3) -> f32 {
        0.5 * (b - a).cross(c - a).length()
    }

    pub fn compute_surface_area(triangle_source: &mut dyn ITriangleSource) -> f32 {
        let mut area = 0.0;
        while let Some((a, b, c)) = triangle_source.get_next_triangle() {
            area += Self::compute_triangle_area(a, b, c);
        }
        area
    }

    /// Closed-form inertia of a uniform box with full extents `extents`, per unit mass.
    #[inline(always)]
    pub fn compute_box_inertia(extents: Vec3) -> Vec3 {
        let squared = extents * extents;
        Vec3::new(
            squared.y + squared.z,
            squared.x + squared.z,
            squared.x + squared.y,
        ) * (1.0 / 12.0)
    }

    /// Moves a diagonal inertia away from the center of mass by `offset` (parallel axis theorem).
    #[inline(always)]
    pub fn offset_inertia(inertia: Vec3, offset: Vec3, absolute: bool) -> Vec3 {
        let offset_inertia = inertia + Vec3::splat(offset.length_squared()) - offset * offset;
        if absolute {
            offset_inertia.abs()
        } else {
            offset_inertia
        }
    }

    /// Treats `bounds` as a uniform solid box.
    pub fn compute_bounding_box_properties(bounds: BoundingBox) -> VolumeProperties {
        let mass_center = bounds.center();
        VolumeProperties {
            volume: 0.0,
            mass_center,
            inertia: Self::offset_inertia(
                Self::compute_box_inertia(bounds.extents()),
                mass_center,
                true,
            ),
        }
    }

    /// Integrates a closed convex surface through tetrahedra fanned from one of its vertices.
    ///
    /// `triangles` is called once per pass and must yield the same sequence each time.
    /// Surfaces without volume fall back to treating `fallback_bounds` as a solid box.
    pub fn compute_convex_volume_properties<S, F>(
        triangles: F,
        fallback_bounds: BoundingBox,
    ) -> VolumeProperties
    where
        S: ITriangleSource,
        F: Fn() -> S,
    {
        let mut source = triangles();
        let Some(first) = source.get_next_triangle() else {
            return Self::compute_bounding_box_properties(fallback_bounds);
        };
        let reference = first.0;

        let mut six_volume = 0.0f32;
        let mut weighted_center = Vec3::ZERO;
        let mut triangle = Some(first);
        while let Some((a, b, c)) = triangle {
            let tetrahedron = Self::compute_tetrahedron_six_volume(reference, a, b, c);
            six_volume += tetrahedron;
            weighted_center += 0.25 * tetrahedron * (a + b + c + reference);
            triangle = source.get_next_triangle();
        }

        let volume = six_volume * (1.0 / 6.0);
        if !(volume > 0.0) {
            return Self::compute_bounding_box_properties(fallback_bounds);
        }
        let mass_center = weighted_center / six_volume;

        let mut inertia = Vec3::ZERO;
        let mut source = triangles();
        while let Some((a, b, c)) = source.get_next_triangle() {
            inertia += Self::compute_tetrahedron_inertia(
                a - mass_center,
                b - mass_center,
                c - mass_center,
            );
        }
        VolumeProperties {
            volume,
            mass_center,
            inertia: (inertia / volume).abs(),
        }
    }
}

/// Triangle source over an indexed triangle list.
pub struct IndexedTriangleSource<'a, I: Copy + Into<u32>> {
    points: &'a [Vec3],
    indices: &'a [I],
    next: usize,
}

impl<'a, I: Copy + Into<u32>> IndexedTriangleSource<'a, I> {
    pub fn new(points: &'a [Vec3], indices: &'a [I]) -> Self {
        Self {
            points,
            indices,
            next: 0,
        }
    }
}

impl<'a, I: Copy + Into<u32>> ITriangleSource for IndexedTriangleSource<'a, I> {
    fn get_next_triangle(&mut self) -> Option<(Vec3, Vec3, Vec3)> {
        let triangle = self.indices.get(self.next..self.next + 3)?;
        self.next += 3;
        let point = |i: I| self.points[i.into() as usize];
        Some((point(triangle[0]), point(triangle[1]), point(triangle[2])))
    }
}
