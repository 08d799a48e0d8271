// Newtype Pattern for enhanced type safety
/// Opaque handle of an external rigid body attached to a compound.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BodyHandle(pub i32);

/// Index of a box compound owned by a collision context's box cache.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct CachedCollideId(pub usize);

/// Index of a sphere owned by a collision context's sphere cache.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct CachedSphereId(pub usize);

// Simple implementations for Display for user-friendliness
impl std::fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "BodyHandle<{}>", self.0)
    }
}

impl std::fmt::Display for CachedCollideId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "CachedCollideId<{}>", self.0)
    }
}

impl std::fmt::Display for CachedSphereId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "CachedSphereId<{}>", self.0)
    }
}
