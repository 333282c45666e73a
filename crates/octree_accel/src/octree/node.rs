//! SpatialNode - arena-allocated octree node.
//!
//! Nodes live in a flat `Vec` owned by [`super::Octree`] and refer to their
//! children by [`NodeId`]. Leaves refer to a contiguous range of the tree-wide
//! primitive pool.

use crate::bounds::BoundingBox;

/// Index of a node in the octree arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
  /// Index into the node arena.
  #[inline]
  pub fn index(&self) -> usize {
    self.0 as usize
  }
}

/// A triangle of a registered mesh.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct PrimitiveRef {
  /// Mesh index in registration order.
  pub mesh: u32,
  /// Triangle index within that mesh.
  pub triangle: u32,
}

impl PrimitiveRef {
  pub fn new(mesh: u32, triangle: u32) -> Self {
    Self { mesh, triangle }
  }
}

/// Node payload: eight optional children or a primitive range.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum NodeKind {
  /// Interior node. Child slot = octant index; empty octants are `None`.
  Interior { children: [Option<NodeId>; 8] },
  /// Leaf node holding `count` primitives starting at `first` in the pool.
  Leaf { first: u32, count: u32 },
}

/// Octree node.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct SpatialNode {
  /// Region covered by this node.
  pub bbox: BoundingBox,
  /// Distance from the root (root = 1).
  pub depth: u32,
  /// Children or primitive range.
  pub kind: NodeKind,
}

impl SpatialNode {
  /// Check if this node holds primitives directly.
  #[inline]
  pub fn is_leaf(&self) -> bool {
    matches!(self.kind, NodeKind::Leaf { .. })
  }

  /// Child slots, or `None` for a leaf.
  #[inline]
  pub fn children(&self) -> Option<&[Option<NodeId>; 8]> {
    match &self.kind {
      NodeKind::Interior { children } => Some(children),
      NodeKind::Leaf { .. } => None,
    }
  }

  /// Number of primitives stored in a leaf (0 for interior nodes).
  #[inline]
  pub fn primitive_count(&self) -> usize {
    match self.kind {
      NodeKind::Leaf { count, .. } => count as usize,
      NodeKind::Interior { .. } => 0,
    }
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
