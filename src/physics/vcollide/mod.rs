//! Decoder for the legacy compact collision format.

pub mod byte_cursor;
pub mod ledge_tree;
pub mod loader;
pub mod records;

#[cfg(test)]
pub(crate) mod test_buffers;

pub use byte_cursor::{ByteCursor, Endian};
pub use ledge_tree::{CompactSurface, Ledge, LedgeTreeDecoder, LedgeTreeNode};
pub use loader::{decode_solid, decode_vcollide, VCollideData, VCollideSolid};
