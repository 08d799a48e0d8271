pub mod collidables;
pub mod collision;
pub mod collision_settings;
pub mod errors;
pub mod handles;
pub mod helpers;
pub mod shape_cache;
pub mod units;
pub mod vcollide;

pub use collision::{PhysicsCollision, Polyhedron, VCollideModel, VirtualMeshParams};
pub use collision_settings::CollisionSettings;
pub use errors::{CollisionError, DecodeError};
pub use handles::{BodyHandle, CachedCollideId, CachedSphereId};
