use thiserror::Error;

/// Failures while reading a legacy collision buffer.
///
/// Every offset stored in the buffer is validated before it is followed, so a malformed
/// buffer produces one of these instead of an out-of-bounds read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("read of {len} bytes at offset {offset} exceeds buffer of {buffer_len} bytes")]
    OutOfBounds {
        offset: i64,
        len: usize,
        buffer_len: usize,
    },
    #[error("ledge tree node at offset {offset} has invalid right child offset {right}")]
    InvalidNodeOffset { offset: usize, right: i32 },
    #[error("ledge tree is deeper than the limit of {0} levels")]
    TreeTooDeep(usize),
    #[error("ledge at offset {offset} has {points} points and {triangles} triangles")]
    DegenerateLedge {
        offset: usize,
        points: i64,
        triangles: i32,
    },
    #[error("triangle {triangle} of ledge at offset {offset} references point {index} of {points}")]
    PointIndexOutOfRange {
        offset: usize,
        triangle: usize,
        index: u16,
        points: usize,
    },
    #[error("compact surface identifier {0:#010x} is not IVPS")]
    BadSurfaceId(u32),
    #[error("unsupported collide model type {0}")]
    UnsupportedModelType(i16),
    #[error("solid {index} declares {size} bytes but {available} remain")]
    TruncatedSolid {
        index: usize,
        size: i32,
        available: usize,
    },
}

/// Failures while building convex primitives and collideables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollisionError {
    #[error("a convex hull needs at least 3 points, got {0}")]
    TooFewPoints(usize),
    #[error("convex hull computation failed: {0}")]
    HullFailed(&'static str),
    #[error("triangle index list of length {0} is empty or not a multiple of 3")]
    InvalidTriangleList(usize),
    #[error("triangle index {index} is out of range for {points} points")]
    TriangleIndexOutOfRange { index: u32, points: usize },
    #[error("a compound needs at least one convex")]
    EmptyCompound,
    #[error(transparent)]
    Decode(#[from] DecodeError),
}
