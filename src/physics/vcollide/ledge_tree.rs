use glam::Vec3;
use tracing::{debug, trace};

use super::byte_cursor::ByteCursor;
use super::records::{
    CompactSurfaceRecord, LedgeHeaderRecord, LedgetreeNodeRecord, PointRecord, TriangleRecord,
    COMPACT_SURFACE_SIZE, IVP_COMPACT_SURFACE_ID, LEDGETREE_NODE_SIZE, LEDGE_HEADER_SIZE,
    POINT_SIZE, TRIANGLE_SIZE,
};
use crate::physics::errors::DecodeError;

/// A decoded convex piece: a triangle soup over its own point array.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledge {
    /// Points in internal handedness.
    pub points: Vec<Vec3>,
    /// Three point indices per triangle.
    pub triangle_indices: Vec<u32>,
    /// Per-triangle material, present only if at least one triangle overrides the default (0).
    pub materials: Option<Vec<u8>>,
    pub client_data: i32,
}

impl Ledge {
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangle_indices.len() / 3
    }
}

/// Owned ledge tree produced by [`LedgeTreeDecoder`].
#[derive(Debug, Clone, PartialEq)]
pub enum LedgeTreeNode {
    Internal {
        center: Vec3,
        radius: f32,
        box_sizes: [u8; 3],
        left: Box<LedgeTreeNode>,
        right: Box<LedgeTreeNode>,
    },
    Leaf {
        center: Vec3,
        radius: f32,
        ledge: Ledge,
    },
}

impl LedgeTreeNode {
    pub fn leaf_count(&self) -> usize {
        match self {
            LedgeTreeNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
            LedgeTreeNode::Leaf { .. } => 1,
        }
    }

    /// Flattens the tree into its ledges, left subtree first.
    pub fn into_ledges(self) -> Vec<Ledge> {
        let mut ledges = Vec::with_capacity(self.leaf_count());
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                LedgeTreeNode::Internal { left, right, .. } => {
                    stack.push(*right);
                    stack.push(*left);
                }
                LedgeTreeNode::Leaf { ledge, .. } => ledges.push(ledge),
            }
        }
        ledges
    }
}

/// Recursive-descent parser for the ledge tree of a compact surface.
///
/// The left child of an internal node is stored immediately after it; the right child sits at
/// `node + offset_right_node`. A node with a zero right offset is a leaf whose ledge lives at
/// `node + offset_compact_ledge`.
pub struct LedgeTreeDecoder<'a> {
    cursor: ByteCursor<'a>,
    max_depth: usize,
}

impl<'a> LedgeTreeDecoder<'a> {
    pub fn new(cursor: ByteCursor<'a>, max_depth: usize) -> Self {
        Self { cursor, max_depth }
    }

    pub fn decode_tree(&self, root_offset: usize) -> Result<LedgeTreeNode, DecodeError> {
        self.decode_node(root_offset, 0)
    }

    fn decode_node(&self, offset: usize, depth: usize) -> Result<LedgeTreeNode, DecodeError> {
        if depth > self.max_depth {
            return Err(DecodeError::TreeTooDeep(self.max_depth));
        }
        let node = LedgetreeNodeRecord::read(&self.cursor.record::<LEDGETREE_NODE_SIZE>(offset)?);

        if node.is_leaf() {
            let ledge_offset = self.cursor.resolve(
                offset,
                node.offset_compact_ledge as i64,
                LEDGE_HEADER_SIZE,
            )?;
            let ledge = self.decode_ledge(ledge_offset)?;
            return Ok(LedgeTreeNode::Leaf {
                center: node.center,
                radius: node.radius,
                ledge,
            });
        }

        // Both children follow the node, so the right one can't start before the left one ends.
        if node.offset_right_node < 2 * LEDGETREE_NODE_SIZE as i32 {
            return Err(DecodeError::InvalidNodeOffset {
                offset,
                right: node.offset_right_node,
            });
        }
        let left = self.decode_node(offset + LEDGETREE_NODE_SIZE, depth + 1)?;
        let right_offset = self.cursor.resolve(
            offset,
            node.offset_right_node as i64,
            LEDGETREE_NODE_SIZE,
        )?;
        let right = self.decode_node(right_offset, depth + 1)?;
        Ok(LedgeTreeNode::Internal {
            center: node.center,
            radius: node.radius,
            box_sizes: node.box_sizes,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Decodes the ledge whose header starts at `offset`.
    pub fn decode_ledge(&self, offset: usize) -> Result<Ledge, DecodeError> {
        let header = LedgeHeaderRecord::read(&self.cursor.record::<LEDGE_HEADER_SIZE>(offset)?);
        let triangle_count = header.triangle_count as i32;
        let point_count = header.point_count();
        if point_count < 3 || triangle_count <= 0 {
            return Err(DecodeError::DegenerateLedge {
                offset,
                points: point_count,
                triangles: triangle_count,
            });
        }
        let point_count = point_count as usize;
        let triangle_count = triangle_count as usize;

        let points_offset = self.cursor.resolve(
            offset,
            header.point_offset as i64,
            point_count * POINT_SIZE,
        )?;
        let points = (0..point_count)
            .map(|i| {
                self.cursor
                    .record::<POINT_SIZE>(points_offset + i * POINT_SIZE)
                    .map(|record| PointRecord::read(&record))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let triangles_offset =
            self.cursor
                .resolve(offset, LEDGE_HEADER_SIZE as i64, triangle_count * TRIANGLE_SIZE)?;
        let mut triangle_indices = Vec::with_capacity(triangle_count * 3);
        let mut materials = Vec::with_capacity(triangle_count);
        for triangle_index in 0..triangle_count {
            let triangle = TriangleRecord::read(
                &self
                    .cursor
                    .record::<TRIANGLE_SIZE>(triangles_offset + triangle_index * TRIANGLE_SIZE)?,
            );
            for edge in &triangle.edges {
                if edge.start_point_index as usize >= point_count {
                    return Err(DecodeError::PointIndexOutOfRange {
                        offset,
                        triangle: triangle_index,
                        index: edge.start_point_index,
                        points: point_count,
                    });
                }
                triangle_indices.push(edge.start_point_index as u32);
            }
            materials.push(triangle.material_index);
        }

        let materials = materials.iter().any(|&m| m != 0).then_some(materials);
        trace!(
            offset,
            points = point_count,
            triangles = triangle_count,
            has_materials = materials.is_some(),
            "decoded ledge"
        );
        Ok(Ledge {
            points,
            triangle_indices,
            materials,
            client_data: header.client_data,
        })
    }
}

/// Top-level record of a legacy collision model plus its decoded tree.
#[derive(Debug, Clone, PartialEq)]
pub struct CompactSurface {
    /// Mass center in internal handedness.
    pub mass_center: Vec3,
    pub rotation_inertia: Vec3,
    pub upper_limit_radius: f32,
    pub max_factor_surface_deviation: u8,
    pub byte_size: i32,
    pub root: LedgeTreeNode,
}

impl CompactSurface {
    /// Decodes the compact surface starting at the first byte of `cursor`.
    pub fn decode(cursor: ByteCursor<'_>, max_depth: usize) -> Result<Self, DecodeError> {
        let surface = CompactSurfaceRecord::read(&cursor.record::<COMPACT_SURFACE_SIZE>(0)?);
        if surface.id != IVP_COMPACT_SURFACE_ID {
            return Err(DecodeError::BadSurfaceId(surface.id));
        }
        let root_offset =
            cursor.resolve(0, surface.offset_ledgetree_root as i64, LEDGETREE_NODE_SIZE)?;
        let root = LedgeTreeDecoder::new(cursor, max_depth).decode_tree(root_offset)?;
        debug!(
            ledges = root.leaf_count(),
            byte_size = surface.byte_size,
            order = ?cursor.order(),
            "decoded compact surface"
        );
        Ok(Self {
            mass_center: Vec3::new(
                surface.mass_center.x,
                -surface.mass_center.y,
                -surface.mass_center.z,
            ),
            rotation_inertia: surface.rotation_inertia,
            upper_limit_radius: surface.upper_limit_radius,
            max_factor_surface_deviation: surface.max_factor_surface_deviation,
            byte_size: surface.byte_size,
            root,
        })
    }
}
