use std::cell::OnceCell;

use glam::{Mat3, Quat, Vec3};

use super::convex_hull_helper::ConvexHullHelper;
use super::mesh_inertia_helper::{IndexedTriangleSource, MeshInertiaHelper, VolumeProperties};
use super::shape::{Shape, CONVEX_DISTANCE_MARGIN};
use crate::physics::errors::CollisionError;
use crate::physics::vcollide::Ledge;
use crate::utilities::bounding_box::BoundingBox;

/// Plane of one hull triangle: `normal · p == offset` for points on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrianglePlane {
    pub normal: Vec3,
    pub offset: f32,
}

/// Convex hull over an explicit point set and triangle index set.
///
/// The surface is inflated by [`CONVEX_DISTANCE_MARGIN`] for collision queries; mass properties
/// use the raw triangles. Mass properties and triangle planes are computed on first use.
#[derive(Debug, Clone)]
pub struct HullShape {
    points: Vec<Vec3>,
    triangle_indices: Vec<u32>,
    materials: Option<Vec<u8>>,
    triangle_planes: OnceCell<Vec<TrianglePlane>>,
    volume_properties: OnceCell<VolumeProperties>,
    user_index: i32,
}

impl HullShape {
    /// Type id of convex hull shapes.
    pub const ID: i32 = 5;

    /// Wraps `points` and three indices per triangle as a hull.
    pub fn new(points: Vec<Vec3>, triangle_indices: Vec<u32>) -> Result<Self, CollisionError> {
        if points.len() < 3 {
            return Err(CollisionError::TooFewPoints(points.len()));
        }
        if triangle_indices.is_empty() || triangle_indices.len() % 3 != 0 {
            return Err(CollisionError::InvalidTriangleList(triangle_indices.len()));
        }
        if let Some(&index) = triangle_indices
            .iter()
            .find(|&&index| index as usize >= points.len())
        {
            return Err(CollisionError::TriangleIndexOutOfRange {
                index,
                points: points.len(),
            });
        }
        Ok(Self {
            points,
            triangle_indices,
            materials: None,
            triangle_planes: OnceCell::new(),
            volume_properties: OnceCell::new(),
            user_index: 0,
        })
    }

    /// Computes the hull of an unordered point cloud with `helper` and wraps the result.
    pub fn from_unordered_points(
        points: &[Vec3],
        helper: &mut ConvexHullHelper,
    ) -> Result<Self, CollisionError> {
        if points.len() < 3 {
            return Err(CollisionError::TooFewPoints(points.len()));
        }
        let hull_data = helper.compute_hull(points);
        if hull_data.face_count() == 0 {
            return Err(CollisionError::HullFailed("no faces"));
        }
        let triangle_indices = hull_data.triangulate();
        if triangle_indices.is_empty() {
            return Err(CollisionError::HullFailed("no triangles"));
        }
        Self::new(hull_data.hull_points(points), triangle_indices)
    }

    /// Builds a hull from a decoded ledge, keeping its materials and client data.
    pub fn from_ledge(ledge: Ledge) -> Result<Self, CollisionError> {
        let mut hull = Self::new(ledge.points, ledge.triangle_indices)?;
        hull.materials = ledge.materials;
        hull.user_index = ledge.client_data;
        Ok(hull)
    }

    #[inline]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    #[inline]
    pub fn triangle_indices(&self) -> &[u32] {
        &self.triangle_indices
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangle_indices.len() / 3
    }

    pub fn triangle(&self, index: usize) -> [Vec3; 3] {
        let corners = &self.triangle_indices[index * 3..index * 3 + 3];
        [
            self.points[corners[0] as usize],
            self.points[corners[1] as usize],
            self.points[corners[2] as usize],
        ]
    }

    #[inline]
    pub fn user_index(&self) -> i32 {
        self.user_index
    }

    #[inline]
    pub fn set_user_index(&mut self, user_index: i32) {
        self.user_index = user_index;
    }

    #[inline]
    pub fn has_material_overrides(&self) -> bool {
        self.materials.is_some()
    }

    /// Overrides the material of one triangle; only the low 7 bits are kept.
    /// Returns false, leaving the hull untouched, if `triangle` is out of range.
    pub fn set_triangle_material_index(&mut self, triangle: usize, material: u8) -> bool {
        let triangle_count = self.triangle_count();
        if triangle >= triangle_count {
            return false;
        }
        let materials = self
            .materials
            .get_or_insert_with(|| vec![0; triangle_count]);
        materials[triangle] = material & 0x7F;
        true
    }

    /// Planes of every triangle, computed once when first needed.
    pub fn triangle_planes(&self) -> &[TrianglePlane] {
        self.triangle_planes.get_or_init(|| {
            (0..self.triangle_count())
                .map(|index| {
                    let [a, b, c] = self.triangle(index);
                    let normal = (b - a).cross(c - a).normalize_or_zero();
                    TrianglePlane {
                        normal,
                        offset: normal.dot(a),
                    }
                })
                .collect()
        })
    }

    /// Material of the triangle whose plane lies nearest to `point`, or 0 without overrides.
    ///
    /// This is a per-plane approximation; it is exact as long as no two coplanar triangles of
    /// the hull carry different materials.
    pub fn triangle_material_index(&self, point: Vec3) -> i32 {
        let Some(materials) = &self.materials else {
            return 0;
        };
        let mut nearest_distance = f32::MAX;
        let mut nearest_material = 0;
        for (plane, &material) in self.triangle_planes().iter().zip(materials) {
            let distance = (plane.normal.dot(point) - plane.offset).abs();
            if distance < nearest_distance {
                nearest_distance = distance;
                nearest_material = material;
            }
        }
        nearest_material as i32
    }

    /// Cached volume, center of mass and inertia.
    pub fn volume_properties(&self) -> &VolumeProperties {
        self.volume_properties.get_or_init(|| {
            MeshInertiaHelper::compute_convex_volume_properties(
                || IndexedTriangleSource::new(&self.points, &self.triangle_indices),
                self.local_bounds(),
            )
        })
    }

    /// Bounds of the points inflated by the margin.
    pub fn local_bounds(&self) -> BoundingBox {
        BoundingBox::from_points(&self.points).expanded(CONVEX_DISTANCE_MARGIN)
    }

    pub fn compute_bounds(&self, orientation: Quat) -> BoundingBox {
        let basis = Mat3::from_quat(orientation);
        self.points
            .iter()
            .fold(BoundingBox::empty(), |bounds, point| {
                bounds.including(basis * *point)
            })
            .expanded(CONVEX_DISTANCE_MARGIN)
    }

    /// Farthest point of the inflated hull along `direction`.
    pub fn support_point(&self, direction: Vec3) -> Vec3 {
        let mut best = self.points[0];
        let mut best_dot = best.dot(direction);
        for point in &self.points[1..] {
            let dot = point.dot(direction);
            if dot > best_dot {
                best_dot = dot;
                best = *point;
            }
        }
        best + direction.normalize_or_zero() * CONVEX_DISTANCE_MARGIN
    }
}

impl Shape for HullShape {
    #[inline(always)]
    fn type_id(&self) -> i32 {
        Self::ID
    }

    fn volume(&self) -> f32 {
        self.volume_properties().volume
    }

    fn surface_area(&self) -> f32 {
        MeshInertiaHelper::compute_surface_area(&mut IndexedTriangleSource::new(
            &self.points,
            &self.triangle_indices,
        ))
    }

    fn mass_center(&self) -> Vec3 {
        self.volume_properties().mass_center
    }

    fn inertia(&self) -> Vec3 {
        self.volume_properties().inertia
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_cube_hull(center: Vec3) -> HullShape {
        let points = (0..8)
            .map(|i| {
                center
                    + Vec3::new(
                        if i & 1 != 0 { 0.5 } else { -0.5 },
                        if i & 2 != 0 { 0.5 } else { -0.5 },
                        if i & 4 != 0 { 0.5 } else { -0.5 },
                    )
            })
            .collect();
        let indices = vec![
            0, 4, 6, 0, 6, 2, 1, 3, 7, 1, 7, 5, 0, 1, 5, 0, 5, 4, 2, 6, 7, 2, 7, 3, 0, 2, 3, 0,
            3, 1, 4, 5, 7, 4, 7, 6,
        ];
        HullShape::new(points, indices).unwrap()
    }

    #[test]
    fn test_unit_cube_mass_properties() {
        let hull = unit_cube_hull(Vec3::ZERO);
        assert_eq!(hull.triangle_count(), 12);
        assert_relative_eq!(hull.volume(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(hull.mass_center(), Vec3::ZERO, epsilon = 1e-5);
        assert_relative_eq!(
            hull.inertia(),
            MeshInertiaHelper::compute_box_inertia(Vec3::ONE),
            epsilon = 1e-5
        );
        assert_relative_eq!(hull.surface_area(), 6.0, epsilon = 1e-5);
    }

    #[test]
    fn test_offset_cube_mass_center() {
        let hull = unit_cube_hull(Vec3::new(3.0, -1.0, 2.0));
        assert_relative_eq!(hull.mass_center(), Vec3::new(3.0, -1.0, 2.0), epsilon = 1e-5);
        assert_relative_eq!(hull.inertia(), Vec3::splat(1.0 / 6.0), epsilon = 1e-4);
    }

    #[test]
    fn test_regular_tetrahedron() {
        let points = vec![
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(-1.0, -1.0, 1.0),
        ];
        let centroid = points.iter().copied().sum::<Vec3>() / 4.0;
        let edge = 8f32.sqrt();
        let hull = HullShape::new(points, vec![0, 1, 2, 0, 3, 1, 0, 2, 3, 1, 3, 2]).unwrap();
        assert_relative_eq!(hull.volume(), edge.powi(3) / (6.0 * 2f32.sqrt()), epsilon = 1e-4);
        assert_relative_eq!(hull.mass_center(), centroid, epsilon = 1e-5);
        assert_relative_eq!(
            hull.surface_area(),
            3f32.sqrt() * edge * edge,
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(
            HullShape::new(vec![Vec3::ZERO, Vec3::X], vec![0, 1, 0]).unwrap_err(),
            CollisionError::TooFewPoints(2)
        );
        assert_eq!(
            HullShape::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1]).unwrap_err(),
            CollisionError::InvalidTriangleList(2)
        );
        assert_eq!(
            HullShape::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 3]).unwrap_err(),
            CollisionError::TriangleIndexOutOfRange { index: 3, points: 3 }
        );
    }

    #[test]
    fn test_unordered_points() {
        let mut helper = ConvexHullHelper::new();
        assert_eq!(
            HullShape::from_unordered_points(&[Vec3::ZERO, Vec3::X], &mut helper).unwrap_err(),
            CollisionError::TooFewPoints(2)
        );
        assert!(HullShape::from_unordered_points(&[Vec3::ONE; 4], &mut helper).is_err());
        assert_eq!(
            HullShape::from_unordered_points(&[Vec3::ONE; 3], &mut helper).unwrap_err(),
            CollisionError::HullFailed("no faces")
        );
        let collinear = [Vec3::ZERO, Vec3::X, Vec3::new(2.0, 0.0, 0.0)];
        assert!(HullShape::from_unordered_points(&collinear, &mut helper).is_err());

        let points = [
            Vec3::ZERO,
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(0.2, 0.2, 0.2),
        ];
        let hull = HullShape::from_unordered_points(&points, &mut helper).unwrap();
        assert_eq!(hull.points().len(), 4);
        let area_sum: f32 = (0..hull.triangle_count())
            .map(|i| {
                let [a, b, c] = hull.triangle(i);
                0.5 * (b - a).cross(c - a).length()
            })
            .sum();
        assert_relative_eq!(hull.surface_area(), area_sum, epsilon = 1e-5);
        assert_relative_eq!(hull.surface_area(), 6.0 + 2.0 * 3f32.sqrt(), epsilon = 1e-4);
        assert_relative_eq!(hull.volume(), 8.0 / 6.0, epsilon = 1e-4);
    }

    #[test]
    fn test_flat_hull_falls_back_to_bounds() {
        let hull = HullShape::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(2.0, 0.0, 2.0),
                Vec3::new(0.0, 0.0, 2.0),
            ],
            vec![0, 1, 2, 0, 2, 3, 0, 2, 1, 0, 3, 2],
        )
        .unwrap();
        assert_eq!(hull.volume(), 0.0);
        assert_relative_eq!(hull.mass_center(), Vec3::new(1.0, 0.0, 1.0), epsilon = 1e-6);
        assert!(hull.inertia().cmpge(Vec3::ZERO).all());
        assert_relative_eq!(hull.surface_area(), 8.0, epsilon = 1e-5);
    }

    #[test]
    fn test_material_lookup_uses_nearest_plane() {
        let mut hull = unit_cube_hull(Vec3::ZERO);
        assert!(!hull.has_material_overrides());
        assert_eq!(hull.triangle_material_index(Vec3::new(0.5, 0.0, 0.0)), 0);

        // Triangles 2 and 3 form the +x face.
        assert!(hull.set_triangle_material_index(2, 9));
        assert!(hull.set_triangle_material_index(3, 9));
        assert!(hull.set_triangle_material_index(10, 0xFF));
        assert!(hull.has_material_overrides());
        assert_eq!(hull.triangle_material_index(Vec3::new(0.5, 0.1, -0.2)), 9);
        assert_eq!(hull.triangle_material_index(Vec3::new(0.1, 0.1, 0.49)), 0x7F);
        assert_eq!(hull.triangle_material_index(Vec3::new(-0.5, 0.0, 0.0)), 0);
    }

    #[test]
    fn test_out_of_range_material_is_rejected() {
        let mut hull = unit_cube_hull(Vec3::ZERO);
        assert!(!hull.set_triangle_material_index(12, 5));
        assert!(!hull.has_material_overrides());
    }

    #[test]
    fn test_bounds_and_support_include_margin() {
        let hull = unit_cube_hull(Vec3::ZERO);
        let bounds = hull.local_bounds();
        assert_relative_eq!(bounds.max, Vec3::splat(0.5 + CONVEX_DISTANCE_MARGIN));
        let support = hull.support_point(Vec3::X);
        assert_relative_eq!(support.x, 0.5 + CONVEX_DISTANCE_MARGIN);
        let rotated = hull.compute_bounds(Quat::from_rotation_z(std::f32::consts::FRAC_PI_4));
        assert_relative_eq!(
            rotated.max.x,
            0.5 * 2f32.sqrt() + CONVEX_DISTANCE_MARGIN,
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_from_ledge_keeps_metadata() {
        let ledge = Ledge {
            points: vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z],
            triangle_indices: vec![0, 2, 1, 0, 1, 3, 0, 3, 2, 1, 2, 3],
            materials: Some(vec![0, 0, 3, 0]),
            client_data: 17,
        };
        let hull = HullShape::from_ledge(ledge).unwrap();
        assert_eq!(hull.user_index(), 17);
        assert!(hull.has_material_overrides());
        assert_eq!(hull.triangle_planes().len(), 4);
    }
}
