//! Top-down octree construction.
//!
//! Every node bisects its box at the midpoint on all three axes. A triangle
//! goes to every octant its bounding box overlaps (inclusive), so straddling
//! triangles are duplicated rather than split. Recursion stops when a node
//! holds few enough triangles or reaches the depth limit, see
//! [`BuildConfig::is_leaf`].

use rayon::prelude::*;
use tracing::debug;
use web_time::Instant;

use super::node::{NodeId, NodeKind, PrimitiveRef, SpatialNode};
use super::stats::BuildStats;
use super::tree::Octree;
use crate::bounds::BoundingBox;
use crate::config::BuildConfig;
use crate::mesh::SharedMesh;

/// Build one octree over every triangle of `meshes`.
///
/// `bounds` becomes the root box and must enclose every triangle (the facade
/// passes the union of the mesh boxes). An input without triangles yields an
/// empty tree and zeroed stats.
#[tracing::instrument(skip_all, name = "octree::build", fields(meshes = meshes.len()))]
pub fn build_octree(
  meshes: &[SharedMesh],
  bounds: &BoundingBox,
  config: &BuildConfig,
) -> (Octree, BuildStats) {
  let start = Instant::now();

  let entries: Vec<PrimitiveRef> = meshes
    .iter()
    .enumerate()
    .flat_map(|(mesh, m)| {
      (0..m.triangle_count() as u32).map(move |triangle| PrimitiveRef::new(mesh as u32, triangle))
    })
    .collect();

  // Per-triangle boxes are needed at every level; compute them once.
  let boxes: Vec<BoundingBox> = entries
    .par_iter()
    .map(|p| meshes[p.mesh as usize].triangle_bounds(p.triangle as usize))
    .collect();

  let mut builder = OctreeBuilder {
    config,
    entries: &entries,
    boxes: &boxes,
    nodes: Vec::new(),
    primitives: Vec::with_capacity(entries.len()),
    stats: BuildStats {
      triangle_count: entries.len(),
      ..Default::default()
    },
  };

  let all: Vec<u32> = (0..entries.len() as u32).collect();
  let root = builder.build_node(*bounds, all, 1);

  let OctreeBuilder {
    nodes,
    primitives,
    mut stats,
    ..
  } = builder;
  stats.node_count = nodes.len();
  stats.build_time_us = start.elapsed().as_micros() as u64;

  debug!(
    triangles = stats.triangle_count,
    nodes = stats.node_count,
    leaves = stats.leaf_count,
    max_depth = stats.max_depth,
    avg_leaf_triangles = stats.average_leaf_triangles(),
    avg_leaf_depth = stats.average_leaf_depth(),
    duplication = stats.duplication_factor(),
    time_us = stats.build_time_us,
    "octree built"
  );

  (Octree::from_parts(nodes, primitives, root, *bounds), stats)
}

struct OctreeBuilder<'a> {
  config: &'a BuildConfig,
  entries: &'a [PrimitiveRef],
  boxes: &'a [BoundingBox],
  nodes: Vec<SpatialNode>,
  primitives: Vec<PrimitiveRef>,
  stats: BuildStats,
}

impl OctreeBuilder<'_> {
  /// Build the subtree for `items` (indices into `entries`) inside `bbox`.
  ///
  /// Returns `None` for an empty set. The parent is pushed before its
  /// children, so the root of a non-empty build is always `NodeId(0)`.
  fn build_node(&mut self, bbox: BoundingBox, items: Vec<u32>, depth: u32) -> Option<NodeId> {
    if items.is_empty() {
      return None;
    }

    let id = NodeId(self.nodes.len() as u32);

    if self.config.is_leaf(items.len(), depth) {
      let first = self.primitives.len() as u32;
      let entries = self.entries;
      self
        .primitives
        .extend(items.iter().map(|&i| entries[i as usize]));

      self.nodes.push(SpatialNode {
        bbox,
        depth,
        kind: NodeKind::Leaf {
          first,
          count: items.len() as u32,
        },
      });

      self.stats.leaf_count += 1;
      self.stats.leaf_triangle_total += items.len();
      self.stats.leaf_depth_total += depth as usize;
      self.stats.max_depth = self.stats.max_depth.max(depth);
      return Some(id);
    }

    // Placeholder; children are patched in once built.
    self.nodes.push(SpatialNode {
      bbox,
      depth,
      kind: NodeKind::Interior {
        children: [None; 8],
      },
    });

    let mut children = [None; 8];
    for (octant, slot) in children.iter_mut().enumerate() {
      let child_box = bbox.octant(octant as u8);
      let subset: Vec<u32> = items
        .iter()
        .copied()
        .filter(|&i| self.boxes[i as usize].overlaps(&child_box))
        .collect();
      *slot = self.build_node(child_box, subset, depth + 1);
    }

    self.nodes[id.index()].kind = NodeKind::Interior { children };
    Some(id)
  }
}

#[cfg(test)]
#[path = "builder_test.rs"]
mod builder_test;
