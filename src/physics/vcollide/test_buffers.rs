//! Builders for hand-made legacy buffers used across the decoder and context tests.

use byteorder::{ByteOrder, WriteBytesExt};
use glam::Vec3;

use super::records::{
    COMPACT_SURFACE_SIZE, IVP_COMPACT_SURFACE_ID, LEDGETREE_NODE_SIZE, LEDGE_HEADER_SIZE,
    POINT_SIZE, TRIANGLE_SIZE, VPHYSICS_ID,
};

/// Logical content of one ledge, with points in stored (unconverted) coordinates.
#[derive(Debug, Clone)]
pub struct LedgeFixture {
    pub points: Vec<Vec3>,
    pub triangles: Vec<([u16; 3], u8)>,
    pub client_data: i32,
}

pub fn tetrahedron_ledge() -> LedgeFixture {
    LedgeFixture {
        points: vec![
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ],
        triangles: vec![
            ([0, 2, 1], 0),
            ([0, 1, 3], 0),
            ([0, 3, 2], 0),
            ([1, 2, 3], 0),
        ],
        client_data: 0,
    }
}

pub fn unit_cube_ledge(center: Vec3) -> LedgeFixture {
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
    let triangles = [
        [0, 4, 6],
        [0, 6, 2],
        [1, 3, 7],
        [1, 7, 5],
        [0, 1, 5],
        [0, 5, 4],
        [2, 6, 7],
        [2, 7, 3],
        [0, 2, 3],
        [0, 3, 1],
        [4, 5, 7],
        [4, 7, 6],
    ]
    .into_iter()
    .map(|t| (t, 0))
    .collect();
    LedgeFixture {
        points,
        triangles,
        client_data: 0,
    }
}

fn write_vec3<B: ByteOrder>(out: &mut Vec<u8>, v: Vec3) {
    out.write_f32::<B>(v.x).unwrap();
    out.write_f32::<B>(v.y).unwrap();
    out.write_f32::<B>(v.z).unwrap();
}

/// Shape of the ledge tree written after the ledges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeLayout {
    /// Every internal node has a single leaf on its left.
    RightLeaning,
    /// Ledges are split in half at every internal node.
    Balanced,
}

/// Lays out a compact surface with a right-leaning ledge tree. See
/// [`write_compact_surface_with_layout`].
pub fn write_compact_surface<B: ByteOrder>(
    ledges: &[LedgeFixture],
    mass_center: Vec3,
    rotation_inertia: Vec3,
) -> Vec<u8> {
    write_compact_surface_with_layout::<B>(
        ledges,
        mass_center,
        rotation_inertia,
        TreeLayout::RightLeaning,
    )
}

/// Lays out a compact surface: header, then each ledge's points followed by the ledge, then a
/// ledge tree with one leaf per ledge, in ledge order.
pub fn write_compact_surface_with_layout<B: ByteOrder>(
    ledges: &[LedgeFixture],
    mass_center: Vec3,
    rotation_inertia: Vec3,
    layout: TreeLayout,
) -> Vec<u8> {
    let mut cursor = COMPACT_SURFACE_SIZE;
    let mut ledge_offsets = Vec::new();
    for ledge in ledges {
        cursor += ledge.points.len() * POINT_SIZE;
        ledge_offsets.push(cursor);
        cursor += LEDGE_HEADER_SIZE + ledge.triangles.len() * TRIANGLE_SIZE;
    }
    let tree_offset = cursor;
    let node_count = 2 * ledges.len() - 1;
    let total_size = tree_offset + node_count * LEDGETREE_NODE_SIZE;

    let mut out = Vec::with_capacity(total_size);
    write_vec3::<B>(&mut out, mass_center);
    write_vec3::<B>(&mut out, rotation_inertia);
    out.write_f32::<B>(1.0).unwrap();
    out.write_u32::<B>((total_size as u32) << 8).unwrap();
    out.write_i32::<B>(tree_offset as i32).unwrap();
    out.write_i32::<B>(0).unwrap();
    out.write_i32::<B>(0).unwrap();
    out.write_u32::<B>(IVP_COMPACT_SURFACE_ID).unwrap();

    for (ledge, &ledge_offset) in ledges.iter().zip(&ledge_offsets) {
        let points_offset = out.len();
        for point in &ledge.points {
            write_vec3::<B>(&mut out, *point);
            out.write_f32::<B>(0.0).unwrap();
        }
        assert_eq!(out.len(), ledge_offset);
        let size_div_16 = (ledge.points.len() + ledge.triangles.len() + 1) as u32;
        out.write_i32::<B>(points_offset as i32 - ledge_offset as i32).unwrap();
        out.write_i32::<B>(ledge.client_data).unwrap();
        out.write_u32::<B>((1 << 2) | (size_div_16 << 8)).unwrap();
        out.write_i16::<B>(ledge.triangles.len() as i16).unwrap();
        out.write_i16::<B>(0).unwrap();
        for (index, (corners, material)) in ledge.triangles.iter().enumerate() {
            out.write_u32::<B>((index as u32 & 0xFFF) | ((*material as u32 & 0x7F) << 24))
                .unwrap();
            for corner in corners {
                out.write_u32::<B>(*corner as u32).unwrap();
            }
        }
    }

    assert_eq!(out.len(), tree_offset);
    write_subtree::<B>(&mut out, &ledge_offsets, layout);
    assert_eq!(out.len(), total_size);
    out
}

fn write_node<B: ByteOrder>(out: &mut Vec<u8>, right_offset: i32, ledge_offset: i32) {
    out.write_i32::<B>(right_offset).unwrap();
    out.write_i32::<B>(ledge_offset).unwrap();
    write_vec3::<B>(out, Vec3::ZERO);
    out.write_f32::<B>(1.0).unwrap();
    out.extend_from_slice(&[1, 1, 1, 0]);
}

/// Writes the left subtree right after its parent, then patches the parent's right offset.
fn write_subtree<B: ByteOrder>(out: &mut Vec<u8>, ledge_offsets: &[usize], layout: TreeLayout) {
    let node_offset = out.len();
    if let [ledge_offset] = ledge_offsets {
        write_node::<B>(out, 0, *ledge_offset as i32 - node_offset as i32);
        return;
    }
    let split = match layout {
        TreeLayout::RightLeaning => 1,
        TreeLayout::Balanced => ledge_offsets.len() / 2,
    };
    write_node::<B>(out, 0, 0);
    write_subtree::<B>(out, &ledge_offsets[..split], layout);
    let right_offset = (out.len() - node_offset) as i32;
    B::write_i32(&mut out[node_offset..node_offset + 4], right_offset);
    write_subtree::<B>(out, &ledge_offsets[split..], layout);
}

/// Wraps a compact surface in a collide header and compact surface header.
pub fn write_vphysics_solid<B: ByteOrder>(surface: &[u8], drag_axis_areas: Vec3, model_type: i16) -> Vec<u8> {
    let mut out = Vec::new();
    out.write_u32::<B>(VPHYSICS_ID).unwrap();
    out.write_i16::<B>(0x100).unwrap();
    out.write_i16::<B>(model_type).unwrap();
    out.write_i32::<B>(surface.len() as i32).unwrap();
    write_vec3::<B>(&mut out, drag_axis_areas);
    out.write_i32::<B>(0).unwrap();
    out.extend_from_slice(surface);
    out
}

/// Concatenates size-prefixed solids and a trailing key-values block.
pub fn write_vcollide<B: ByteOrder>(solids: &[Vec<u8>], key_values: &str) -> Vec<u8> {
    let mut out = Vec::new();
    for solid in solids {
        out.write_i32::<B>(solid.len() as i32).unwrap();
        out.extend_from_slice(solid);
    }
    out.extend_from_slice(key_values.as_bytes());
    out.push(0);
    out
}
