//! octree_accel - Ray/triangle intersection acceleration for a CPU path tracer
//!
//! Answers "what does this ray hit first?" and "is this segment blocked?"
//! against a set of triangle meshes without testing every triangle.
//!
//! # Features
//!
//! - **Octree index**: midpoint subdivision over all registered meshes,
//!   breadth-first leaf collection, front-to-back leaf resolution
//! - **Traversal policies**: the historical first-hit-leaf order or exact
//!   global nearest
//! - **Interchangeable engines**: the octree or parry3d's BVH (feature
//!   `parry`) behind one query contract
//! - **Hit enrichment**: hit point, UVs, geometric and shading frames
//! - **Query metrics**: lock-free counters (feature `metrics`)
//!
//! # Example
//!
//! ```ignore
//! use octree_accel::{shapes, Accel, AccelConfig, Ray};
//! use glam::Vec3;
//!
//! let mut accel = Accel::new(AccelConfig::default())?;
//! accel.add_mesh(shapes::uv_sphere(Vec3::ZERO, 1.0, 32, 64).into_shared());
//! let stats = accel.build()?;
//! println!("{} nodes, {:.1} triangles per leaf",
//!     stats.node_count, stats.average_leaf_triangles());
//!
//! let its = accel.intersect(&Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z));
//! assert!(its.is_some());
//! ```

pub mod bounds;
pub mod config;
pub mod error;
pub mod mesh;
pub mod ray;

// Re-export commonly used items
pub use bounds::BoundingBox;
pub use config::{AccelConfig, BuildConfig, EngineKind, TraversalPolicy};
pub use error::{AccelError, Result};
pub use mesh::{shapes, Mesh, MeshId, SharedMesh, TriangleHit, TriangleMesh};
pub use ray::{Ray, RAY_EPSILON};

// Octree index: arena nodes, builder, traversal
pub mod octree;
pub use octree::{BuildStats, TraversalStats};

// Engine abstraction (software octree / parry3d)
pub mod engine;
pub use engine::{AccelEngine, SoftwareSpatialIndex};
#[cfg(feature = "parry")]
pub use engine::ExternalRayTracingEngine;

// Query results and enrichment
pub mod intersection;
pub use intersection::{Frame, Hit, Intersection, QueryMode, RawHit};

// Renderer-facing facade
pub mod accel;
pub use accel::Accel;

// Query counters
pub mod metrics;

#[cfg(test)]
pub mod test_utils;
