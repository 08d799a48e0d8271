use glam::Vec3;
use tracing::{debug, warn};

use super::byte_cursor::{ByteCursor, Endian};
use super::ledge_tree::CompactSurface;
use super::records::{
    CollideHeaderRecord, SurfaceHeaderRecord, COLLIDE_HEADER_SIZE, COLLIDE_POLY,
    SURFACE_HEADER_SIZE, VPHYSICS_ID,
};
use crate::physics::errors::DecodeError;

/// One decoded solid of a collision model.
#[derive(Debug, Clone, PartialEq)]
pub struct VCollideSolid {
    pub surface: CompactSurface,
    /// Drag areas along each axis as fractions of the bounding box faces.
    pub orthographic_areas: Vec3,
}

/// Every solid of a collision model plus its trailing key-values text.
#[derive(Debug, Clone, PartialEq)]
pub struct VCollideData {
    pub solids: Vec<VCollideSolid>,
    pub key_values: String,
}

/// Decodes one solid, with or without a collide header in front of the compact surface.
pub fn decode_solid(data: &[u8], order: Endian, max_depth: usize) -> Result<VCollideSolid, DecodeError> {
    let cursor = ByteCursor::new(data, order);
    let id = cursor.record::<4>(0)?.u32_at(0);
    if id != VPHYSICS_ID {
        // Headerless solids are a bare compact surface.
        return Ok(VCollideSolid {
            surface: CompactSurface::decode(cursor, max_depth)?,
            orthographic_areas: Vec3::ONE,
        });
    }

    let header = CollideHeaderRecord::read(&cursor.record::<COLLIDE_HEADER_SIZE>(0)?);
    if header.model_type != COLLIDE_POLY {
        return Err(DecodeError::UnsupportedModelType(header.model_type));
    }
    let surface_header =
        SurfaceHeaderRecord::read(&cursor.record::<SURFACE_HEADER_SIZE>(COLLIDE_HEADER_SIZE)?);
    let body_offset = COLLIDE_HEADER_SIZE + SURFACE_HEADER_SIZE;
    let body = cursor.sub_cursor(body_offset, data.len() - body_offset)?;
    if surface_header.surface_size as i64 != body.len() as i64 {
        warn!(
            declared = surface_header.surface_size,
            actual = body.len(),
            "compact surface size disagrees with solid size"
        );
    }
    Ok(VCollideSolid {
        surface: CompactSurface::decode(body, max_depth)?,
        orthographic_areas: surface_header.drag_axis_areas,
    })
}

/// Decodes `solid_count` size-prefixed solids followed by the key-values text block.
pub fn decode_vcollide(
    data: &[u8],
    solid_count: usize,
    order: Endian,
    max_depth: usize,
) -> Result<VCollideData, DecodeError> {
    let cursor = ByteCursor::new(data, order);
    let mut offset = 0usize;
    let mut solids = Vec::with_capacity(solid_count);
    for index in 0..solid_count {
        let size = cursor.record::<4>(offset)?.i32_at(0);
        offset += 4;
        let available = data.len() - offset;
        if size < 0 || size as usize > available {
            return Err(DecodeError::TruncatedSolid {
                index,
                size,
                available,
            });
        }
        let size = size as usize;
        solids.push(decode_solid(cursor.bytes(offset, size)?, order, max_depth)?);
        offset += size;
    }

    let key_values = String::from_utf8_lossy(&data[offset..])
        .trim_end_matches('\0')
        .to_string();
    debug!(
        solids = solids.len(),
        key_values_len = key_values.len(),
        "decoded collision model"
    );
    Ok(VCollideData { solids, key_values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::vcollide::test_buffers::{
        tetrahedron_ledge, unit_cube_ledge, write_compact_surface, write_vcollide,
        write_vphysics_solid,
    };
    use byteorder::{BigEndian, LittleEndian};

    #[test]
    fn test_headerless_and_vphysics_solids() {
        let bare = write_compact_surface::<BigEndian>(&[tetrahedron_ledge()], Vec3::ZERO, Vec3::ONE);
        let cube = write_compact_surface::<BigEndian>(
            &[unit_cube_ledge(Vec3::ZERO)],
            Vec3::ZERO,
            Vec3::ONE,
        );
        let wrapped = write_vphysics_solid::<BigEndian>(&cube, Vec3::new(0.5, 0.25, 1.0), 0);
        let data = write_vcollide::<BigEndian>(&[bare, wrapped], "solid {\n\"index\" \"0\"\n}\n");

        let model = decode_vcollide(&data, 2, Endian::Big, 16).unwrap();
        assert_eq!(model.solids.len(), 2);
        assert_eq!(model.solids[0].orthographic_areas, Vec3::ONE);
        assert_eq!(model.solids[1].orthographic_areas, Vec3::new(0.5, 0.25, 1.0));
        assert_eq!(model.solids[1].surface.root.leaf_count(), 1);
        assert!(model.key_values.starts_with("solid {"));
        assert!(!model.key_values.ends_with('\0'));
    }

    #[test]
    fn test_unsupported_model_type() {
        let cube = write_compact_surface::<LittleEndian>(
            &[unit_cube_ledge(Vec3::ZERO)],
            Vec3::ZERO,
            Vec3::ONE,
        );
        let wrapped = write_vphysics_solid::<LittleEndian>(&cube, Vec3::ONE, 1);
        assert_eq!(
            decode_solid(&wrapped, Endian::Little, 16),
            Err(DecodeError::UnsupportedModelType(1))
        );
    }

    #[test]
    fn test_truncated_solid() {
        let bare =
            write_compact_surface::<LittleEndian>(&[tetrahedron_ledge()], Vec3::ZERO, Vec3::ONE);
        let mut data = write_vcollide::<LittleEndian>(&[bare], "");
        data.truncate(data.len() - 10);
        assert!(matches!(
            decode_vcollide(&data, 1, Endian::Little, 16),
            Err(DecodeError::TruncatedSolid { index: 0, .. })
        ));
        assert!(decode_vcollide(&data, 2, Endian::Little, 16).is_err());
    }
}
