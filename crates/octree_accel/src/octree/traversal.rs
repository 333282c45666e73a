//! Ray traversal: collect candidate leaves, order them, resolve triangles.
//!
//! Collection is breadth-first over a work queue. Every leaf whose box the
//! ray segment reaches is recorded with its entry distance; interior nodes
//! enqueue all non-empty children. Leaves are then resolved front to back.

use std::collections::VecDeque;

use smallvec::SmallVec;

use super::node::{NodeId, NodeKind};
use super::stats::TraversalStats;
use super::tree::Octree;
use crate::config::TraversalPolicy;
use crate::intersection::RawHit;
use crate::mesh::SharedMesh;
use crate::ray::Ray;

/// Leaf reached by the ray, keyed by entry distance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LeafCandidate {
  /// Entry distance into the leaf box (negative when the origin is inside).
  pub t_near: f32,
  pub node: NodeId,
}

/// Inline capacity for candidate lists; typical rays reach a handful of leaves.
pub type Candidates = SmallVec<[LeafCandidate; 16]>;

/// Collect every leaf the ray reaches, sorted by ascending entry distance.
///
/// The sort is stable, so leaves with equal entry distance keep breadth-first
/// order and repeated queries visit leaves identically.
pub fn collect_leaves(tree: &Octree, ray: &Ray, stats: &mut TraversalStats) -> Candidates {
  let mut candidates = Candidates::new();
  let Some(root) = tree.root() else {
    return candidates;
  };

  let mut queue = VecDeque::with_capacity(16);
  queue.push_back(root);

  while let Some(id) = queue.pop_front() {
    let node = tree.node(id);
    stats.nodes_visited += 1;

    let Some((t_near, _)) = node.bbox.ray_intersect(ray) else {
      continue;
    };

    match &node.kind {
      NodeKind::Leaf { .. } => candidates.push(LeafCandidate { t_near, node: id }),
      NodeKind::Interior { children } => queue.extend(children.iter().flatten().copied()),
    }
  }

  candidates.sort_by(|a, b| a.t_near.total_cmp(&b.t_near));
  stats.leaves_collected += candidates.len();
  candidates
}

/// Closest hit along `ray` under `policy`.
///
/// `meshes` must be the mesh list the tree was built from.
pub fn nearest_hit(
  tree: &Octree,
  meshes: &[SharedMesh],
  ray: &Ray,
  policy: TraversalPolicy,
  stats: &mut TraversalStats,
) -> Option<RawHit> {
  let candidates = collect_leaves(tree, ray, stats);

  let mut ray = *ray;
  let mut best: Option<RawHit> = None;

  for candidate in &candidates {
    // Sorted by entry distance: nothing further can beat the current best.
    if best.is_some() && candidate.t_near > ray.t_max {
      break;
    }

    let node = tree.node(candidate.node);
    if node.bbox.ray_intersect(&ray).is_none() {
      continue;
    }
    stats.leaves_tested += 1;

    let mut leaf_hit = false;
    for &primitive in tree.leaf_primitives(node) {
      stats.triangle_tests += 1;
      let mesh = &meshes[primitive.mesh as usize];
      // The predicate bounds hits by the shrinking `t_max`, so every accepted
      // hit is at least as close; ties go to the later primitive.
      if let Some(hit) = mesh.intersect_triangle(primitive.triangle as usize, &ray) {
        ray.t_max = hit.t;
        best = Some(RawHit::new(hit, primitive));
        leaf_hit = true;
      }
    }

    if leaf_hit && policy == TraversalPolicy::FirstHitLeaf {
      break;
    }
  }

  best
}

/// Check whether anything blocks the segment `[ray.t_min, ray.t_max]`.
pub fn occluded(
  tree: &Octree,
  meshes: &[SharedMesh],
  ray: &Ray,
  stats: &mut TraversalStats,
) -> bool {
  let candidates = collect_leaves(tree, ray, stats);

  for candidate in &candidates {
    let node = tree.node(candidate.node);
    stats.leaves_tested += 1;
    for &primitive in tree.leaf_primitives(node) {
      stats.triangle_tests += 1;
      let mesh = &meshes[primitive.mesh as usize];
      if mesh.intersect_triangle(primitive.triangle as usize, ray).is_some() {
        return true;
      }
    }
  }

  false
}

#[cfg(test)]
#[path = "traversal_test.rs"]
mod traversal_test;
