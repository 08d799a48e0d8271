//! Convex collision primitives, compounds and mass properties, with a decoder for the legacy
//! compact collision format.

pub mod physics;
pub mod utilities;
