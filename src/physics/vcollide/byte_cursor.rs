use byteorder::{BigEndian, ByteOrder, LittleEndian};
use glam::Vec3;

use crate::physics::errors::DecodeError;

/// Byte order of a legacy collision buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    /// Byte order of the running host.
    #[inline]
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            Endian::Big
        } else {
            Endian::Little
        }
    }

    /// Byte order of data that is byte swapped relative to the host when `swap` is set.
    #[inline]
    pub const fn swapped(swap: bool) -> Self {
        match (Self::native(), swap) {
            (order, false) => order,
            (Endian::Little, true) => Endian::Big,
            (Endian::Big, true) => Endian::Little,
        }
    }

    #[inline(always)]
    pub fn read_u16(self, buf: &[u8]) -> u16 {
        match self {
            Endian::Little => LittleEndian::read_u16(buf),
            Endian::Big => BigEndian::read_u16(buf),
        }
    }

    #[inline(always)]
    pub fn read_i16(self, buf: &[u8]) -> i16 {
        match self {
            Endian::Little => LittleEndian::read_i16(buf),
            Endian::Big => BigEndian::read_i16(buf),
        }
    }

    #[inline(always)]
    pub fn read_u32(self, buf: &[u8]) -> u32 {
        match self {
            Endian::Little => LittleEndian::read_u32(buf),
            Endian::Big => BigEndian::read_u32(buf),
        }
    }

    #[inline(always)]
    pub fn read_i32(self, buf: &[u8]) -> i32 {
        match self {
            Endian::Little => LittleEndian::read_i32(buf),
            Endian::Big => BigEndian::read_i32(buf),
        }
    }

    #[inline(always)]
    pub fn read_f32(self, buf: &[u8]) -> f32 {
        match self {
            Endian::Little => LittleEndian::read_f32(buf),
            Endian::Big => BigEndian::read_f32(buf),
        }
    }
}

/// Bounds-checked reader over an untrusted legacy buffer.
///
/// Records are copied out of the buffer into a fixed-size scratch [`Record`] before any
/// field is interpreted, and every address derived from a stored offset is checked
/// against the buffer length first.
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    order: Endian,
}

impl<'a> ByteCursor<'a> {
    #[inline]
    pub fn new(data: &'a [u8], order: Endian) -> Self {
        Self { data, order }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn order(&self) -> Endian {
        self.order
    }

    /// Resolves `base + relative` into an absolute offset with at least `size` readable bytes.
    pub fn resolve(&self, base: usize, relative: i64, size: usize) -> Result<usize, DecodeError> {
        let offset = base as i64 + relative;
        let end = offset.checked_add(size as i64);
        match end {
            Some(end) if offset >= 0 && end <= self.data.len() as i64 => Ok(offset as usize),
            _ => Err(DecodeError::OutOfBounds {
                offset,
                len: size,
                buffer_len: self.data.len(),
            }),
        }
    }

    /// Copies `N` bytes at `offset` into a scratch record.
    pub fn record<const N: usize>(&self, offset: usize) -> Result<Record<N>, DecodeError> {
        let start = self.resolve(offset, 0, N)?;
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.data[start..start + N]);
        Ok(Record {
            bytes,
            order: self.order,
        })
    }

    /// Raw bytes in `[offset, offset + len)`.
    pub fn bytes(&self, offset: usize, len: usize) -> Result<&'a [u8], DecodeError> {
        let start = self.resolve(offset, 0, len)?;
        let data = self.data;
        Ok(&data[start..start + len])
    }

    /// A cursor over `[offset, offset + len)` sharing this cursor's byte order.
    pub fn sub_cursor(&self, offset: usize, len: usize) -> Result<ByteCursor<'a>, DecodeError> {
        Ok(ByteCursor::new(self.bytes(offset, len)?, self.order))
    }
}

/// Fixed-size copy of one legacy record; field reads normalize byte order.
///
/// Field offsets are compile-time constants of the record layouts, so indexing past `N` is a
/// layout bug rather than a property of the input.
#[derive(Debug, Clone, Copy)]
pub struct Record<const N: usize> {
    bytes: [u8; N],
    order: Endian,
}

impl<const N: usize> Record<N> {
    #[inline(always)]
    pub fn u8_at(&self, at: usize) -> u8 {
        self.bytes[at]
    }

    #[inline(always)]
    pub fn u16_at(&self, at: usize) -> u16 {
        self.order.read_u16(&self.bytes[at..at + 2])
    }

    #[inline(always)]
    pub fn i16_at(&self, at: usize) -> i16 {
        self.order.read_i16(&self.bytes[at..at + 2])
    }

    #[inline(always)]
    pub fn u32_at(&self, at: usize) -> u32 {
        self.order.read_u32(&self.bytes[at..at + 4])
    }

    #[inline(always)]
    pub fn i32_at(&self, at: usize) -> i32 {
        self.order.read_i32(&self.bytes[at..at + 4])
    }

    #[inline(always)]
    pub fn f32_at(&self, at: usize) -> f32 {
        self.order.read_f32(&self.bytes[at..at + 4])
    }

    #[inline(always)]
    pub fn vec3_at(&self, at: usize) -> Vec3 {
        Vec3::new(self.f32_at(at), self.f32_at(at + 4), self.f32_at(at + 8))
    }
}
