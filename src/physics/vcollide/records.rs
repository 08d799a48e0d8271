//! Fixed layouts of the legacy compact collision records.
//!
//! Packed bit-fields are allocated from the least significant bit of their 32-bit word after
//! the word has been read in the buffer's byte order.

use glam::Vec3;

use super::byte_cursor::Record;

pub const POINT_SIZE: usize = 16;
pub const EDGE_SIZE: usize = 4;
pub const TRIANGLE_SIZE: usize = 16;
pub const LEDGE_HEADER_SIZE: usize = 16;
pub const LEDGETREE_NODE_SIZE: usize = 28;
pub const COMPACT_SURFACE_SIZE: usize = 48;
pub const COLLIDE_HEADER_SIZE: usize = 8;
pub const SURFACE_HEADER_SIZE: usize = 20;

/// Collide model type of a polygon soup solid; the only type with a compact surface body.
pub const COLLIDE_POLY: i16 = 0;

/// Sizes inside a ledge blob are counted in these units.
pub const LEDGE_SIZE_UNIT: usize = 16;

pub const fn make_id(a: u8, b: u8, c: u8, d: u8) -> u32 {
    (a as u32) | ((b as u32) << 8) | ((c as u32) << 16) | ((d as u32) << 24)
}

/// Identifier stored in the last reserved word of a compact surface.
pub const IVP_COMPACT_SURFACE_ID: u32 = make_id(b'I', b'V', b'P', b'S');

/// Identifier opening a collide header.
pub const VPHYSICS_ID: u32 = make_id(b'V', b'P', b'H', b'Y');

/// A stored point; the fourth float is a cached plane distance and is not decoded.
pub struct PointRecord;

impl PointRecord {
    /// Reads a point and converts it into the internal handedness by negating y and z.
    #[inline]
    pub fn read(record: &Record<POINT_SIZE>) -> Vec3 {
        let stored = record.vec3_at(0);
        Vec3::new(stored.x, -stored.y, -stored.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRecord {
    pub start_point_index: u16,
    pub opposite_index: i16,
    pub is_virtual: bool,
}

impl EdgeRecord {
    #[inline]
    pub fn unpack(word: u32) -> Self {
        Self {
            start_point_index: (word & 0xFFFF) as u16,
            // 15-bit signed field in bits 16..31.
            opposite_index: (((word << 1) as i32) >> 17) as i16,
            is_virtual: word >> 31 != 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangleRecord {
    pub tri_index: u16,
    pub pierce_index: u16,
    pub material_index: u8,
    pub is_virtual: bool,
    pub edges: [EdgeRecord; 3],
}

impl TriangleRecord {
    pub fn read(record: &Record<TRIANGLE_SIZE>) -> Self {
        let header = record.u32_at(0);
        Self {
            tri_index: (header & 0xFFF) as u16,
            pierce_index: ((header >> 12) & 0xFFF) as u16,
            material_index: ((header >> 24) & 0x7F) as u8,
            is_virtual: header >> 31 != 0,
            edges: [
                EdgeRecord::unpack(record.u32_at(4)),
                EdgeRecord::unpack(record.u32_at(8)),
                EdgeRecord::unpack(record.u32_at(12)),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgeHeaderRecord {
    /// Byte offset of the point array relative to the ledge.
    pub point_offset: i32,
    /// Shares storage with the owning tree node offset; compact surfaces store client data here.
    pub client_data: i32,
    pub has_children_flag: u8,
    pub is_compact_flag: u8,
    pub size_div_16: u32,
    pub triangle_count: i16,
    pub for_future_use: i16,
}

impl LedgeHeaderRecord {
    pub fn read(record: &Record<LEDGE_HEADER_SIZE>) -> Self {
        let flags = record.u32_at(8);
        Self {
            point_offset: record.i32_at(0),
            client_data: record.i32_at(4),
            has_children_flag: (flags & 0x3) as u8,
            is_compact_flag: ((flags >> 2) & 0x3) as u8,
            size_div_16: flags >> 8,
            triangle_count: record.i16_at(12),
            for_future_use: record.i16_at(14),
        }
    }

    /// Points stored for this ledge: total blob size minus the header and triangle units.
    #[inline]
    pub fn point_count(&self) -> i64 {
        self.size_div_16 as i64 - self.triangle_count as i64 - 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgetreeNodeRecord {
    /// Zero for leaves.
    pub offset_right_node: i32,
    pub offset_compact_ledge: i32,
    pub center: Vec3,
    pub radius: f32,
    pub box_sizes: [u8; 3],
}

impl LedgetreeNodeRecord {
    pub fn read(record: &Record<LEDGETREE_NODE_SIZE>) -> Self {
        Self {
            offset_right_node: record.i32_at(0),
            offset_compact_ledge: record.i32_at(4),
            center: record.vec3_at(8),
            radius: record.f32_at(20),
            box_sizes: [record.u8_at(24), record.u8_at(25), record.u8_at(26)],
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.offset_right_node == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompactSurfaceRecord {
    pub mass_center: Vec3,
    pub rotation_inertia: Vec3,
    pub upper_limit_radius: f32,
    pub max_factor_surface_deviation: u8,
    pub byte_size: i32,
    pub offset_ledgetree_root: i32,
    pub id: u32,
}

impl CompactSurfaceRecord {
    pub fn read(record: &Record<COMPACT_SURFACE_SIZE>) -> Self {
        let packed = record.u32_at(28);
        Self {
            mass_center: record.vec3_at(0),
            rotation_inertia: record.vec3_at(12),
            upper_limit_radius: record.f32_at(24),
            max_factor_surface_deviation: (packed & 0xFF) as u8,
            byte_size: (packed as i32) >> 8,
            offset_ledgetree_root: record.i32_at(32),
            id: record.u32_at(44),
        }
    }
}

/// Optional header in front of a compact surface inside a collide solid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollideHeaderRecord {
    pub id: u32,
    pub version: i16,
    pub model_type: i16,
}

impl CollideHeaderRecord {
    pub fn read(record: &Record<COLLIDE_HEADER_SIZE>) -> Self {
        Self {
            id: record.u32_at(0),
            version: record.i16_at(4),
            model_type: record.i16_at(6),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHeaderRecord {
    pub surface_size: i32,
    pub drag_axis_areas: Vec3,
    pub axis_map_size: i32,
}

impl SurfaceHeaderRecord {
    pub fn read(record: &Record<SURFACE_HEADER_SIZE>) -> Self {
        Self {
            surface_size: record.i32_at(0),
            drag_axis_areas: record.vec3_at(4),
            axis_map_size: record.i32_at(16),
        }
    }
}
