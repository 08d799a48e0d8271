use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};

use glam::{Vec2, Vec3};
use tracing::{debug, trace, warn};

use crate::physics::helpers::Helpers;

/// Raw data representing a convex hull.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HullData {
    /// Mapping of points on the convex hull back to the original point set.
    pub original_vertex_mapping: Vec<usize>,
    /// List of indices composing the faces of the hull. Individual faces indexed by the face start indices.
    pub face_vertex_indices: Vec<usize>,
    /// Starting index in the face vertex indices for each face.
    pub face_start_indices: Vec<usize>,
}

impl HullData {
    #[inline(always)]
    pub fn face_count(&self) -> usize {
        self.face_start_indices.len()
    }

    /// Hull vertex indices of one face, in winding order.
    pub fn face(&self, face_index: usize) -> &[usize] {
        let start = self.face_start_indices[face_index];
        let end = self
            .face_start_indices
            .get(face_index + 1)
            .copied()
            .unwrap_or(self.face_vertex_indices.len());
        &self.face_vertex_indices[start..end]
    }

    /// Points of the hull, in hull vertex order.
    pub fn hull_points(&self, points: &[Vec3]) -> Vec<Vec3> {
        self.original_vertex_mapping
            .iter()
            .map(|&i| points[i])
            .collect()
    }

    /// Fan-triangulates every face into hull vertex indices.
    pub fn triangulate(&self) -> Vec<u32> {
        let mut indices = Vec::new();
        for face_index in 0..self.face_count() {
            let face = self.face(face_index);
            for k in 2..face.len() {
                indices.extend([face[0] as u32, face[k - 1] as u32, face[k] as u32]);
            }
        }
        indices
    }
}

/// Edge endpoints used as keys in the edge-face dictionary.
#[derive(Clone, Copy, Debug, Default)]
pub struct EdgeEndpoints {
    pub a: usize,
    pub b: usize,
}

impl PartialEq for EdgeEndpoints {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        // Same edge in either direction.
        (self.a == other.a && self.b == other.b) || (self.a == other.b && self.b == other.a)
    }
}

impl Eq for EdgeEndpoints {}

impl Hash for EdgeEndpoints {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.a.min(self.b).hash(state);
        self.a.max(self.b).hash(state);
    }
}

#[derive(Clone, Debug)]
struct EarlyFace {
    vertex_indices: Vec<usize>,
    normal: Vec3,
}

#[derive(Clone, Copy, Debug)]
struct EdgeToTest {
    endpoints: EdgeEndpoints,
    face_normal: Vec3,
}

/// Creates convex hulls from point clouds by gift wrapping.
///
/// Keeps its scratch buffers between calls; one helper belongs to one collision context.
#[derive(Debug, Default)]
pub struct ConvexHullHelper {
    projected_on_x: Vec<f32>,
    projected_on_y: Vec<f32>,
    allow_vertices: Vec<bool>,
    raw_face_vertex_indices: Vec<usize>,
    reduced_face_indices: Vec<usize>,
    face_points: Vec<Vec2>,
}

impl ConvexHullHelper {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(clippy::too_many_arguments)]
    fn find_extreme_face(
        basis_x: Vec3,
        basis_y: Vec3,
        basis_origin: Vec3,
        source_edge_endpoints: EdgeEndpoints,
        points: &[Vec3],
        allow_vertices: &[bool],
        projected_on_x: &mut [f32],
        projected_on_y: &mut [f32],
        plane_epsilon: f32,
        vertex_indices: &mut Vec<usize>,
    ) -> Vec3 {
        debug_assert!(
            projected_on_x.len() >= points.len()
                && projected_on_y.len() >= points.len()
                && vertex_indices.is_empty()
        );

        // Find the candidate-basisOrigin which has the smallest angle with basisY when projected onto the plane.
        let mut best_x = 1.0f32;
        let mut best_y = f32::MIN;
        for (i, point) in points.iter().enumerate() {
            let to_candidate = *point - basis_origin;
            let x = basis_x.dot(to_candidate).max(0.0);
            let y = basis_y.dot(to_candidate);
            projected_on_x[i] = x;
            projected_on_y[i] = y;
            let ignore_slot = !allow_vertices[i]
                || (x <= plane_epsilon && y <= plane_epsilon)
                || i == source_edge_endpoints.a
                || i == source_edge_endpoints.b;
            if !ignore_slot && y * best_x > best_y * x {
                best_x = x;
                best_y = y;
            }
        }

        // Compute projected plane normal.
        let candidate_normal_direction = Vec2::new(-best_y, best_x);
        let length = candidate_normal_direction.length();
        let projected_plane_normal = if length.is_finite() && length > 0.0 {
            candidate_normal_direction / length
        } else {
            Vec2::X
        };
        let face_normal = basis_x * projected_plane_normal.x + basis_y * projected_plane_normal.y;

        for i in 0..points.len() {
            let dot = projected_on_x[i] * projected_plane_normal.x
                + projected_on_y[i] * projected_plane_normal.y;
            if dot > -plane_epsilon && allow_vertices[i] {
                vertex_indices.push(i);
            }
        }
        face_normal
    }

    /// Finds the next index in the 2D hull of a face using gift wrapping.
    fn find_next_index_for_face_hull(
        start: Vec2,
        previous_edge_direction: Vec2,
        plane_epsilon: f32,
        face_points: &[Vec2],
    ) -> Option<usize> {
        let basis_x = Vec2::new(previous_edge_direction.y, -previous_edge_direction.x);
        let basis_y = -previous_edge_direction;
        let mut best_x = 1.0f32;
        let mut best_y = f32::MAX;
        let mut best_index = None;

        for (i, candidate) in face_points.iter().enumerate() {
            let to_candidate = *candidate - start;
            let x = to_candidate.dot(basis_x).max(0.0);
            let y = to_candidate.dot(basis_y);

            let ignore_slot = x <= plane_epsilon && y >= -plane_epsilon;
            if !ignore_slot && y * best_x < best_y * x {
                best_y = y;
                best_x = x;
                best_index = Some(i);
            }
        }
        let best_index = best_index?;

        // Find the most distant point on the best edge direction.
        let projected_best_edge_direction = Vec2::new(best_x, best_y);
        let length = projected_best_edge_direction.length();
        let projected_best_edge_direction = if length.is_finite() && length > 0.0 {
            projected_best_edge_direction / length
        } else {
            Vec2::X
        };
        let edge_direction =
            basis_x * projected_best_edge_direction.x + basis_y * projected_best_edge_direction.y;
        let face_normal = Vec2::new(-edge_direction.y, edge_direction.x);

        let mut distance = 0.0f32;
        let mut most_distant_index = None;
        for (i, candidate) in face_points.iter().enumerate() {
            let to_candidate = *candidate - start;
            if to_candidate.dot(face_normal) > -plane_epsilon {
                let along_edge = to_candidate.dot(edge_direction);
                if along_edge > distance {
                    distance = along_edge;
                    most_distant_index = Some(i);
                }
            }
        }
        Some(most_distant_index.unwrap_or(best_index))
    }

    fn reduce_face(
        face_vertex_indices: &mut Vec<usize>,
        face_normal: Vec3,
        points: &[Vec3],
        plane_epsilon: f32,
        face_points: &mut Vec<Vec2>,
        allow_vertex: &mut [bool],
        reduced_indices: &mut Vec<usize>,
    ) {
        debug_assert!(face_points.is_empty() && reduced_indices.is_empty());

        // Remove disallowed vertices.
        face_vertex_indices.retain(|&index| allow_vertex[index]);

        if face_vertex_indices.len() <= 3 {
            reduced_indices.extend_from_slice(face_vertex_indices);
            if reduced_indices.len() == 3 {
                let a = points[reduced_indices[0]];
                let b = points[reduced_indices[1]];
                let c = points[reduced_indices[2]];
                let ab = b - a;
                let ac = c - a;
                let uncalibrated_normal = ab.cross(ac);
                if uncalibrated_normal.length_squared() < 1e-14 {
                    if ab.length_squared() > 1e-14 {
                        allow_vertex[reduced_indices[2]] = false;
                        reduced_indices.swap_remove(2);
                    } else if ac.length_squared() > 1e-14 {
                        allow_vertex[reduced_indices[1]] = false;
                        reduced_indices.swap_remove(1);
                    } else {
                        allow_vertex[reduced_indices[1]] = false;
                        allow_vertex[reduced_indices[2]] = false;
                        reduced_indices.truncate(1);
                    }
                } else if face_normal.dot(uncalibrated_normal) < 0.0 {
                    reduced_indices.swap(0, 1);
                }
            }
            return;
        }

        let (basis_x, basis_y) = Helpers::build_orthonormal_basis(face_normal);
        let mut centroid = Vec2::ZERO;
        for &index in face_vertex_indices.iter() {
            let source = points[index];
            let face_point = Vec2::new(basis_x.dot(source), basis_y.dot(source));
            face_points.push(face_point);
            centroid += face_point;
        }
        centroid /= face_vertex_indices.len() as f32;

        let mut greatest_distance_squared = -1.0f32;
        let mut initial_index = 0usize;
        for (i, face_point) in face_points.iter().enumerate() {
            let distance_squared = (*face_point - centroid).length_squared();
            if greatest_distance_squared < distance_squared {
                greatest_distance_squared = distance_squared;
                initial_index = i;
            }
        }

        if greatest_distance_squared < 1e-14 {
            for &index in face_vertex_indices.iter() {
                allow_vertex[index] = false;
            }
            return;
        }

        let greatest_distance = greatest_distance_squared.sqrt();
        let initial_offset_direction = (face_points[initial_index] - centroid) / greatest_distance;
        let mut previous_edge_direction =
            Vec2::new(initial_offset_direction.y, -initial_offset_direction.x);
        reduced_indices.push(face_vertex_indices[initial_index]);

        let mut previous_end_index = initial_index;
        for _ in 0..face_points.len() {
            let next_index = Self::find_next_index_for_face_hull(
                face_points[previous_end_index],
                previous_edge_direction,
                plane_epsilon,
                face_points,
            );
            let Some(next_index) = next_index else {
                break;
            };
            let next_vertex = face_vertex_indices[next_index];
            if let Some(cycle_start_index) = reduced_indices.iter().position(|&v| v == next_vertex) {
                // Wrapped back onto an earlier vertex; anything before it is not part of the loop.
                reduced_indices.drain(..cycle_start_index);
                break;
            }
            reduced_indices.push(next_vertex);
            previous_edge_direction =
                (face_points[next_index] - face_points[previous_end_index]).normalize();
            previous_end_index = next_index;
        }

        // Ignore vertices not on the outer boundary.
        for &index in face_vertex_indices.iter() {
            if !reduced_indices.contains(&index) {
                allow_vertex[index] = false;
            }
        }
    }

    fn add_face_edges_to_test_list(
        reduced_face_indices: &[usize],
        edges_to_test: &mut Vec<EdgeToTest>,
        edge_face_counts: &mut HashMap<EdgeEndpoints, u32>,
        face_normal: Vec3,
    ) {
        let mut previous_index = reduced_face_indices[reduced_face_indices.len() - 1];
        for &index in reduced_face_indices {
            let endpoints = EdgeEndpoints {
                a: previous_index,
                b: index,
            };
            previous_index = index;
            let count = edge_face_counts.entry(endpoints).or_insert(0);
            if *count == 0 {
                edges_to_test.push(EdgeToTest {
                    endpoints,
                    face_normal,
                });
            }
            *count += 1;
        }
    }

    /// Drops one face's claim on an edge and returns how many faces still use it.
    fn release_edge(
        endpoints: EdgeEndpoints,
        edge_face_counts: &mut HashMap<EdgeEndpoints, u32>,
    ) -> u32 {
        let Some(count) = edge_face_counts.get_mut(&endpoints) else {
            return 0;
        };
        *count = count.saturating_sub(1);
        let remaining = *count;
        if remaining == 0 {
            edge_face_counts.remove(&endpoints);
        }
        remaining
    }

    fn release_face_edges(
        face_vertex_indices: &[usize],
        edge_face_counts: &mut HashMap<EdgeEndpoints, u32>,
    ) {
        let Some(&last) = face_vertex_indices.last() else {
            return;
        };
        let mut previous_index = last;
        for &index in face_vertex_indices {
            Self::release_edge(
                EdgeEndpoints {
                    a: previous_index,
                    b: index,
                },
                edge_face_counts,
            );
            previous_index = index;
        }
    }

    /// True if the fan triangulation of `faces` is closed (every edge shared by two triangles)
    /// and no point lies more than `tolerance` in front of any face.
    fn faces_enclose_points(points: &[Vec3], faces: &[EarlyFace], tolerance: f32) -> bool {
        if faces.is_empty() {
            return false;
        }
        let mut edge_counts: HashMap<EdgeEndpoints, u32> = HashMap::new();
        for face in faces {
            let vertices = &face.vertex_indices;
            let origin = points[vertices[0]];
            if points
                .iter()
                .any(|point| face.normal.dot(*point - origin) > tolerance)
            {
                return false;
            }
            for k in 2..vertices.len() {
                for (a, b) in [
                    (vertices[0], vertices[k - 1]),
                    (vertices[k - 1], vertices[k]),
                    (vertices[k], vertices[0]),
                ] {
                    *edge_counts.entry(EdgeEndpoints { a, b }).or_insert(0) += 1;
                }
            }
        }
        edge_counts.values().all(|&count| count == 2)
    }

    fn farthest_point(points: &[Vec3], distance: impl Fn(Vec3) -> f32) -> (usize, f32) {
        points
            .iter()
            .enumerate()
            .map(|(i, point)| (i, distance(*point)))
            .fold((0, f32::MIN), |best, candidate| {
                if candidate.1 > best.1 {
                    candidate
                } else {
                    best
                }
            })
    }

    /// Incremental triangle hull, used when wrapping leaves a surface that is open or cuts
    /// through the cloud. Returns `None` for clouds without a spanning tetrahedron.
    fn compute_triangle_hull(points: &[Vec3], plane_epsilon: f32) -> Option<Vec<EarlyFace>> {
        let p0 = points[0];
        let (i1, d1) = Self::farthest_point(points, |p| p.distance(p0));
        if d1 <= plane_epsilon {
            return None;
        }
        let axis = (points[i1] - p0) / d1;
        let (i2, d2) = Self::farthest_point(points, |p| {
            let offset = p - p0;
            (offset - axis * axis.dot(offset)).length()
        });
        if d2 <= plane_epsilon {
            return None;
        }
        let normal = (points[i1] - p0).cross(points[i2] - p0).normalize_or_zero();
        let (i3, d3) = Self::farthest_point(points, |p| normal.dot(p - p0).abs());
        if d3 <= plane_epsilon {
            return None;
        }

        let simplex = [0, i1, i2, i3];
        let interior = simplex.iter().map(|&i| points[i]).sum::<Vec3>() * 0.25;
        let outward = |a: usize, b: usize, c: usize| -> [usize; 3] {
            let (pa, pb, pc) = (points[a], points[b], points[c]);
            if (pb - pa).cross(pc - pa).dot(pa - interior) < 0.0 {
                [a, c, b]
            } else {
                [a, b, c]
            }
        };
        let mut triangles = vec![
            outward(0, i1, i2),
            outward(0, i1, i3),
            outward(0, i2, i3),
            outward(i1, i2, i3),
        ];
        let triangle_normal = |t: &[usize; 3]| {
            (points[t[1]] - points[t[0]])
                .cross(points[t[2]] - points[t[0]])
                .normalize_or_zero()
        };

        for (i, point) in points.iter().enumerate() {
            if simplex.contains(&i) {
                continue;
            }
            let visible: Vec<bool> = triangles
                .iter()
                .map(|t| triangle_normal(t).dot(*point - points[t[0]]) > plane_epsilon)
                .collect();
            if !visible.contains(&true) {
                continue;
            }
            let hidden_edges: HashSet<(usize, usize)> = triangles
                .iter()
                .zip(&visible)
                .filter(|(_, is_visible)| !**is_visible)
                .flat_map(|(t, _)| [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])])
                .collect();
            let mut next = Vec::with_capacity(triangles.len() + 4);
            let mut horizon = Vec::new();
            for (t, &is_visible) in triangles.iter().zip(&visible) {
                if !is_visible {
                    next.push(*t);
                    continue;
                }
                for (a, b) in [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])] {
                    if hidden_edges.contains(&(b, a)) {
                        horizon.push([a, b, i]);
                    }
                }
            }
            next.extend(horizon);
            triangles = next;
        }

        Some(
            triangles
                .iter()
                .map(|t| EarlyFace {
                    vertex_indices: t.to_vec(),
                    normal: triangle_normal(t),
                })
                .collect(),
        )
    }

    /// Computes the convex hull of a set of points.
    ///
    /// Fewer than three points, or points that are all coincident or collinear, produce hull
    /// data without faces.
    pub fn compute_hull(&mut self, points: &[Vec3]) -> HullData {
        if points.len() <= 3 {
            let mut hull_data = HullData {
                original_vertex_mapping: (0..points.len()).collect(),
                ..HullData::default()
            };
            if points.len() == 3
                && (points[1] - points[0])
                    .cross(points[2] - points[0])
                    .length_squared()
                    >= 1e-14
            {
                hull_data.face_start_indices.push(0);
                hull_data.face_vertex_indices.extend([0, 1, 2]);
            }
            return hull_data;
        }

        let centroid = points.iter().copied().sum::<Vec3>() / points.len() as f32;

        // Find starting point; furthest from centroid.
        let mut initial_index = 0usize;
        let mut best_distance_squared = -1.0f32;
        for (i, point) in points.iter().enumerate() {
            let distance_squared = point.distance_squared(centroid);
            if distance_squared > best_distance_squared {
                best_distance_squared = distance_squared;
                initial_index = i;
            }
        }
        let initial_vertex = points[initial_index];
        let initial_to_centroid = centroid - initial_vertex;
        let initial_distance = initial_to_centroid.length();
        if initial_distance < 1e-7 {
            return HullData {
                original_vertex_mapping: vec![0],
                ..HullData::default()
            };
        }

        let Self {
            projected_on_x,
            projected_on_y,
            allow_vertices,
            raw_face_vertex_indices,
            reduced_face_indices,
            face_points,
        } = self;
        projected_on_x.clear();
        projected_on_x.resize(points.len(), 0.0);
        projected_on_y.clear();
        projected_on_y.resize(points.len(), 0.0);
        allow_vertices.clear();
        allow_vertices.resize(points.len(), true);
        raw_face_vertex_indices.clear();
        reduced_face_indices.clear();
        face_points.clear();

        let initial_basis_x = initial_to_centroid / initial_distance;
        let initial_basis_y = Helpers::find_perpendicular(initial_basis_x);
        let plane_epsilon = best_distance_squared.sqrt() * 1e-4;
        let normal_coplanarity_epsilon = 1.0 - 1e-6f32;

        let initial_face_normal = Self::find_extreme_face(
            initial_basis_x,
            initial_basis_y,
            initial_vertex,
            EdgeEndpoints {
                a: initial_index,
                b: initial_index,
            },
            points,
            allow_vertices,
            projected_on_x,
            projected_on_y,
            plane_epsilon,
            raw_face_vertex_indices,
        );
        debug_assert!(raw_face_vertex_indices.len() >= 2);

        Self::reduce_face(
            raw_face_vertex_indices,
            initial_face_normal,
            points,
            plane_epsilon,
            face_points,
            allow_vertices,
            reduced_face_indices,
        );

        let mut faces: Vec<EarlyFace> = Vec::new();
        let mut edges_to_test: Vec<EdgeToTest> = Vec::new();
        let mut edge_face_counts: HashMap<EdgeEndpoints, u32> = HashMap::new();

        match reduced_face_indices.len() {
            0 | 1 => {
                warn!(points = points.len(), "hull start face collapsed to a point");
                return HullData {
                    original_vertex_mapping: vec![initial_index],
                    ..HullData::default()
                };
            }
            2 => {
                let mut endpoints = EdgeEndpoints {
                    a: reduced_face_indices[0],
                    b: reduced_face_indices[1],
                };
                let edge_offset = points[endpoints.b] - points[endpoints.a];
                let basis_y = edge_offset.cross(initial_face_normal);
                let basis_x = edge_offset.cross(basis_y);
                if basis_x.dot(initial_face_normal) > 0.0 {
                    std::mem::swap(&mut endpoints.a, &mut endpoints.b);
                }
                edges_to_test.push(EdgeToTest {
                    endpoints,
                    face_normal: initial_face_normal,
                });
            }
            _ => {
                faces.push(EarlyFace {
                    vertex_indices: reduced_face_indices.clone(),
                    normal: initial_face_normal,
                });
                Self::add_face_edges_to_test_list(
                    reduced_face_indices,
                    &mut edges_to_test,
                    &mut edge_face_counts,
                    initial_face_normal,
                );
            }
        }

        // Wrapping visits each edge a bounded number of times; anything beyond this is a numerical loop.
        let iteration_limit = 8 * points.len() * points.len() + 64;
        let mut iterations = 0usize;
        let mut wrapped = true;
        while let Some(edge_to_test) = edges_to_test.pop() {
            iterations += 1;
            if iterations > iteration_limit {
                wrapped = false;
                break;
            }
            if edge_face_counts
                .get(&edge_to_test.endpoints)
                .is_some_and(|count| *count >= 2)
            {
                continue;
            }

            let edge_a = points[edge_to_test.endpoints.a];
            let edge_b = points[edge_to_test.endpoints.b];
            let edge_offset = edge_b - edge_a;
            let basis_y = edge_offset.cross(edge_to_test.face_normal);
            let basis_x = edge_offset.cross(basis_y);

            raw_face_vertex_indices.clear();
            let face_normal = Self::find_extreme_face(
                basis_x.normalize(),
                basis_y.normalize(),
                edge_a,
                edge_to_test.endpoints,
                points,
                allow_vertices,
                projected_on_x,
                projected_on_y,
                plane_epsilon,
                raw_face_vertex_indices,
            );

            reduced_face_indices.clear();
            face_points.clear();
            Self::reduce_face(
                raw_face_vertex_indices,
                face_normal,
                points,
                plane_epsilon,
                face_points,
                allow_vertices,
                reduced_face_indices,
            );
            if reduced_face_indices.len() < 3 {
                continue;
            }

            // Merge into an existing face only if every one of its vertices lies on the new plane.
            let mut merged_face = false;
            for face in faces.iter_mut() {
                if face.normal.dot(face_normal) <= normal_coplanarity_epsilon
                    || face
                        .vertex_indices
                        .iter()
                        .any(|&v| (points[v] - edge_a).dot(face_normal).abs() > plane_epsilon)
                {
                    continue;
                }
                Self::release_face_edges(&face.vertex_indices, &mut edge_face_counts);
                raw_face_vertex_indices.clear();
                raw_face_vertex_indices.extend_from_slice(reduced_face_indices);
                for &vertex_index in &face.vertex_indices {
                    if allow_vertices[vertex_index] && !reduced_face_indices.contains(&vertex_index)
                    {
                        raw_face_vertex_indices.push(vertex_index);
                    }
                }
                face.vertex_indices.clear();
                face_points.clear();
                Self::reduce_face(
                    raw_face_vertex_indices,
                    face_normal,
                    points,
                    plane_epsilon,
                    face_points,
                    allow_vertices,
                    &mut face.vertex_indices,
                );
                face.normal = face_normal;
                if face.vertex_indices.len() >= 3 {
                    Self::add_face_edges_to_test_list(
                        &face.vertex_indices,
                        &mut edges_to_test,
                        &mut edge_face_counts,
                        face_normal,
                    );
                }
                merged_face = true;
                break;
            }

            if !merged_face {
                faces.push(EarlyFace {
                    vertex_indices: reduced_face_indices.clone(),
                    normal: face_normal,
                });
                Self::add_face_edges_to_test_list(
                    reduced_face_indices,
                    &mut edges_to_test,
                    &mut edge_face_counts,
                    face_normal,
                );
            }

            // Delete faces that reference disallowed vertices; their edges may have been exposed.
            let allow_vertices: &[bool] = allow_vertices;
            faces.retain(|face| {
                if face.vertex_indices.len() < 3 {
                    return false;
                }
                if face.vertex_indices.iter().all(|&v| allow_vertices[v]) {
                    return true;
                }
                let count = face.vertex_indices.len();
                for j in 0..count {
                    let previous_index = face.vertex_indices[if j == 0 { count - 1 } else { j - 1 }];
                    let next_index = face.vertex_indices[j];
                    // Endpoints are flipped to fill the void.
                    let endpoints = EdgeEndpoints {
                        a: next_index,
                        b: previous_index,
                    };
                    if Self::release_edge(endpoints, &mut edge_face_counts) > 0
                        && allow_vertices[endpoints.a]
                        && allow_vertices[endpoints.b]
                    {
                        edges_to_test.push(EdgeToTest {
                            endpoints,
                            face_normal: face.normal,
                        });
                    }
                }
                false
            });
        }

        let tolerance = 2.0 * plane_epsilon;
        if !(wrapped && Self::faces_enclose_points(points, &faces, tolerance)) {
            match Self::compute_triangle_hull(points, plane_epsilon) {
                Some(triangles) => {
                    debug!(
                        points = points.len(),
                        wrapped,
                        "wrapped hull surface was not closed; rebuilt incrementally"
                    );
                    faces = triangles;
                }
                None if !wrapped => {
                    warn!(points = points.len(), "hull wrapping did not terminate");
                    return HullData::default();
                }
                None => {}
            }
        }

        // Create reduced hull point set from face vertex references.
        let mut hull_data = HullData::default();
        let mut original_to_hull_index_mapping = vec![usize::MAX; points.len()];
        for face in faces.iter().filter(|face| face.vertex_indices.len() >= 3) {
            hull_data
                .face_start_indices
                .push(hull_data.face_vertex_indices.len());
            for &original_vertex_index in &face.vertex_indices {
                let original_to_hull = &mut original_to_hull_index_mapping[original_vertex_index];
                if *original_to_hull == usize::MAX {
                    *original_to_hull = hull_data.original_vertex_mapping.len();
                    hull_data.original_vertex_mapping.push(original_vertex_index);
                }
                hull_data.face_vertex_indices.push(*original_to_hull);
            }
        }
        trace!(
            input_points = points.len(),
            hull_points = hull_data.original_vertex_mapping.len(),
            faces = hull_data.face_count(),
            "computed convex hull"
        );
        hull_data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collidables::mesh_inertia_helper::{
        IndexedTriangleSource, MeshInertiaHelper,
    };
    use approx::assert_relative_eq;
    use rand::prelude::*;

    fn cube_points() -> Vec<Vec3> {
        (0..8)
            .map(|i| {
                Vec3::new(
                    if i & 1 != 0 { 0.5 } else { -0.5 },
                    if i & 2 != 0 { 0.5 } else { -0.5 },
                    if i & 4 != 0 { 0.5 } else { -0.5 },
                )
            })
            .collect()
    }

    #[test]
    fn test_edge_endpoints_are_undirected() {
        let mut counts = HashMap::new();
        counts.insert(EdgeEndpoints { a: 3, b: 7 }, 1u32);
        assert!(counts.contains_key(&EdgeEndpoints { a: 7, b: 3 }));
        assert!(!counts.contains_key(&EdgeEndpoints { a: 3, b: 6 }));
    }

    #[test]
    fn test_small_inputs() {
        let mut helper = ConvexHullHelper::new();
        assert_eq!(helper.compute_hull(&[]).face_count(), 0);
        assert_eq!(helper.compute_hull(&[Vec3::ZERO, Vec3::X]).face_count(), 0);
        let triangle = helper.compute_hull(&[Vec3::ZERO, Vec3::X, Vec3::Y]);
        assert_eq!(triangle.face_count(), 1);
        assert_eq!(triangle.triangulate(), vec![0, 1, 2]);
        let coincident = helper.compute_hull(&[Vec3::ONE; 5]);
        assert_eq!(coincident.face_count(), 0);
    }

    #[test]
    fn test_degenerate_triangles_have_no_faces() {
        let mut helper = ConvexHullHelper::new();
        assert_eq!(helper.compute_hull(&[Vec3::ONE; 3]).face_count(), 0);
        let collinear = [Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0), Vec3::new(2.0, 2.0, 2.0)];
        assert_eq!(helper.compute_hull(&collinear).face_count(), 0);
    }

    #[test]
    fn test_random_clouds_are_closed_and_enclosing() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut helper = ConvexHullHelper::new();
        for _ in 0..300 {
            let count = rng.gen_range(4..44);
            let points: Vec<Vec3> = (0..count)
                .map(|_| {
                    Vec3::new(
                        rng.gen_range(-1.0..1.0),
                        rng.gen_range(-1.0..1.0),
                        rng.gen_range(-1.0..1.0),
                    )
                })
                .collect();
            let hull = helper.compute_hull(&points);
            let hull_points = hull.hull_points(&points);
            let indices = hull.triangulate();
            assert!(!indices.is_empty());

            let mut edge_counts: HashMap<EdgeEndpoints, u32> = HashMap::new();
            for triangle in indices.chunks(3) {
                let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
                for endpoints in [(a, b), (b, c), (c, a)] {
                    *edge_counts
                        .entry(EdgeEndpoints {
                            a: endpoints.0,
                            b: endpoints.1,
                        })
                        .or_insert(0) += 1;
                }
            }
            assert!(edge_counts.values().all(|&uses| uses == 2));

            let centroid = hull_points.iter().copied().sum::<Vec3>() / hull_points.len() as f32;
            for face_index in 0..hull.face_count() {
                let face = hull.face(face_index);
                let origin =
                    face.iter().map(|&i| hull_points[i]).sum::<Vec3>() / face.len() as f32;
                let mut normal = Vec3::ZERO;
                for k in 0..face.len() {
                    let current = hull_points[face[k]] - origin;
                    let next = hull_points[face[(k + 1) % face.len()]] - origin;
                    normal += current.cross(next);
                }
                // Slivers are too thin to carry a reliable normal; the edge check covers them.
                if normal.length() < 1e-3 {
                    continue;
                }
                let mut normal = normal.normalize();
                if normal.dot(centroid - origin) > 0.0 {
                    normal = -normal;
                }
                for point in &points {
                    assert!(normal.dot(*point - origin) <= 1e-3);
                }
            }
        }
    }

    #[test]
    fn test_cube_with_interior_points() {
        let mut points = cube_points();
        points.push(Vec3::ZERO);
        points.push(Vec3::new(0.1, -0.2, 0.3));
        let mut helper = ConvexHullHelper::new();
        let hull = helper.compute_hull(&points);

        assert_eq!(hull.original_vertex_mapping.len(), 8);
        assert!(hull.original_vertex_mapping.iter().all(|&i| i < 8));
        for face_index in 0..hull.face_count() {
            assert!(hull.face(face_index).len() >= 3);
        }

        let hull_points = hull.hull_points(&points);
        let indices = hull.triangulate();
        let area = MeshInertiaHelper::compute_surface_area(&mut IndexedTriangleSource::new(
            &hull_points,
            &indices,
        ));
        assert_relative_eq!(area, 6.0, epsilon = 1e-4);
    }

    #[test]
    fn test_scratch_is_reusable() {
        let mut helper = ConvexHullHelper::new();
        let first = helper.compute_hull(&cube_points());
        let tetrahedron = [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z];
        let second = helper.compute_hull(&tetrahedron);
        assert_eq!(second.original_vertex_mapping.len(), 4);
        assert_eq!(second.triangulate().len(), 12);
        assert_eq!(helper.compute_hull(&cube_points()), first);
    }
}
