pub mod shape;
pub mod mesh_inertia_helper;

// Convex primitives
pub mod box_shape;
pub mod convex_hull_helper;
pub mod convex_hull;
pub mod convex;

// Collision models
pub mod body_references;
pub mod compound;
pub mod compound_builder;
pub mod sphere;
pub mod mesh;
pub mod polysoup;
pub mod collide;

pub use body_references::{BodyReferenceList, MassCenterObserver};
pub use box_shape::BoxShape;
pub use collide::Collide;
pub use compound::{CollideOwnership, CompoundChild, CompoundShape, MassOverrides};
pub use compound_builder::CompoundBuilder;
pub use convex::{ConvexOwnership, ConvexPrimitive, ConvexShape};
pub use convex_hull::HullShape;
pub use convex_hull_helper::ConvexHullHelper;
pub use mesh::TriangleMeshShape;
pub use polysoup::Polysoup;
pub use shape::{Shape, CONVEX_DISTANCE_MARGIN};
pub use sphere::SphereShape;
