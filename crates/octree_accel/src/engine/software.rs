//! Octree-backed engine.

use super::AccelEngine;
use crate::bounds::BoundingBox;
use crate::config::{BuildConfig, EngineKind, TraversalPolicy};
use crate::error::Result;
use crate::intersection::RawHit;
use crate::mesh::SharedMesh;
use crate::octree::{self, BuildStats, Octree, TraversalStats};
use crate::ray::Ray;

/// Hand-built octree over all registered meshes.
#[derive(Clone, Debug, Default)]
pub struct SoftwareSpatialIndex {
  build_config: BuildConfig,
  policy: TraversalPolicy,
  tree: Octree,
}

impl SoftwareSpatialIndex {
  pub fn new(build_config: BuildConfig, policy: TraversalPolicy) -> Self {
    Self {
      build_config,
      policy,
      tree: Octree::default(),
    }
  }

  /// The built tree (empty before `build`).
  #[inline]
  pub fn tree(&self) -> &Octree {
    &self.tree
  }

  #[inline]
  pub fn policy(&self) -> TraversalPolicy {
    self.policy
  }
}

impl AccelEngine for SoftwareSpatialIndex {
  fn kind(&self) -> EngineKind {
    EngineKind::Software
  }

  fn build(&mut self, meshes: &[SharedMesh], bounds: &BoundingBox) -> Result<BuildStats> {
    let (tree, stats) = octree::build_octree(meshes, bounds, &self.build_config);
    self.tree = tree;
    Ok(stats)
  }

  fn nearest_hit(
    &self,
    meshes: &[SharedMesh],
    ray: &Ray,
    stats: &mut TraversalStats,
  ) -> Option<RawHit> {
    octree::nearest_hit(&self.tree, meshes, ray, self.policy, stats)
  }

  fn occluded(&self, meshes: &[SharedMesh], ray: &Ray, stats: &mut TraversalStats) -> bool {
    octree::occluded(&self.tree, meshes, ray, stats)
  }
}
