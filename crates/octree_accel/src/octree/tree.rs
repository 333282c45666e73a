//! Octree - node arena plus primitive pool.

use super::node::{NodeId, NodeKind, PrimitiveRef, SpatialNode};
use crate::bounds::BoundingBox;

/// Built octree over the triangles of one or more meshes.
///
/// Immutable after construction. Nodes and primitive references live in two
/// flat vectors and are dropped together with the tree.
#[derive(Clone, Debug, Default)]
pub struct Octree {
  nodes: Vec<SpatialNode>,
  primitives: Vec<PrimitiveRef>,
  root: Option<NodeId>,
  bounds: BoundingBox,
}

impl Octree {
  pub(crate) fn from_parts(
    nodes: Vec<SpatialNode>,
    primitives: Vec<PrimitiveRef>,
    root: Option<NodeId>,
    bounds: BoundingBox,
  ) -> Self {
    Self {
      nodes,
      primitives,
      root,
      bounds,
    }
  }

  /// Root node, `None` when the tree indexes no triangles.
  #[inline]
  pub fn root(&self) -> Option<NodeId> {
    self.root
  }

  /// Root region (union of the source meshes' boxes).
  #[inline]
  pub fn bounds(&self) -> BoundingBox {
    self.bounds
  }

  #[inline]
  pub fn node(&self, id: NodeId) -> &SpatialNode {
    &self.nodes[id.index()]
  }

  #[inline]
  pub fn nodes(&self) -> &[SpatialNode] {
    &self.nodes
  }

  /// Number of allocated nodes.
  #[inline]
  pub fn node_count(&self) -> usize {
    self.nodes.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.root.is_none()
  }

  /// Primitives stored in a leaf (empty for interior nodes).
  #[inline]
  pub fn leaf_primitives(&self, node: &SpatialNode) -> &[PrimitiveRef] {
    match node.kind {
      NodeKind::Leaf { first, count } => {
        let start = first as usize;
        &self.primitives[start..start + count as usize]
      }
      NodeKind::Interior { .. } => &[],
    }
  }

  /// Iterate over all leaves in arena order.
  pub fn leaves(&self) -> impl Iterator<Item = (NodeId, &SpatialNode)> + '_ {
    self
      .nodes
      .iter()
      .enumerate()
      .filter(|(_, node)| node.is_leaf())
      .map(|(i, node)| (NodeId(i as u32), node))
  }
}
