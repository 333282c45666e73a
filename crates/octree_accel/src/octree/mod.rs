//! Octree spatial index over triangle meshes.
//!
//! Nodes live in a flat arena and refer to children by [`NodeId`]. Leaves
//! store a range into a tree-wide pool of [`PrimitiveRef`]s, so one tree can
//! index the triangles of several meshes.
//!
//! # Octant Convention
//!
//! ```text
//! octant = x | y << 1 | z << 2     (1 = upper half of that axis)
//! ```
//!
//! # Module Structure
//!
//! - [`node`]: `SpatialNode`, `NodeId`, `PrimitiveRef`
//! - [`tree`]: `Octree` - node arena plus primitive pool
//! - [`builder`]: midpoint subdivision with triangle duplication
//! - [`traversal`]: breadth-first leaf collection and front-to-back
//!   resolution
//! - [`stats`]: `BuildStats`, `TraversalStats`

pub mod builder;
pub mod node;
pub mod stats;
pub mod traversal;
pub mod tree;

// Re-exports
pub use builder::build_octree;
pub use node::{NodeId, NodeKind, PrimitiveRef, SpatialNode};
pub use stats::{BuildStats, TraversalStats};
pub use traversal::{collect_leaves, nearest_hit, occluded, LeafCandidate};
pub use tree::Octree;
