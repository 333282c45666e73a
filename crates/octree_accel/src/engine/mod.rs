//! Interchangeable acceleration engines behind one query contract.
//!
//! - [`SoftwareSpatialIndex`]: the octree in [`crate::octree`]
//! - [`ExternalRayTracingEngine`]: parry3d triangle meshes with their own
//!   BVH (feature `parry`)
//!
//! Engines are built once over the facade's mesh list and then queried
//! read-only from any number of threads.

use crate::bounds::BoundingBox;
use crate::config::{AccelConfig, EngineKind};
use crate::error::Result;
use crate::intersection::RawHit;
use crate::mesh::SharedMesh;
use crate::octree::{BuildStats, TraversalStats};
use crate::ray::Ray;

#[cfg(feature = "parry")]
mod external;
mod software;

#[cfg(feature = "parry")]
pub use external::ExternalRayTracingEngine;
pub use software::SoftwareSpatialIndex;

/// Ray query backend.
///
/// `meshes` passed to the query methods must be the list the engine was
/// built from. Querying before `build` reports no hits.
pub trait AccelEngine: Send + Sync {
  /// Which engine this is.
  fn kind(&self) -> EngineKind;

  /// Index every triangle of `meshes`. `bounds` is the union of the mesh
  /// boxes. A second call replaces the previous index.
  fn build(&mut self, meshes: &[SharedMesh], bounds: &BoundingBox) -> Result<BuildStats>;

  /// Closest hit in `[ray.t_min, ray.t_max]`.
  fn nearest_hit(
    &self,
    meshes: &[SharedMesh],
    ray: &Ray,
    stats: &mut TraversalStats,
  ) -> Option<RawHit>;

  /// Whether any triangle intersects `[ray.t_min, ray.t_max]`.
  fn occluded(&self, meshes: &[SharedMesh], ray: &Ray, stats: &mut TraversalStats) -> bool;
}

/// Instantiate the engine selected by `config`.
pub fn create_engine(config: &AccelConfig) -> Result<Box<dyn AccelEngine>> {
  match config.engine {
    EngineKind::Software => Ok(Box::new(SoftwareSpatialIndex::new(
      config.build,
      config.traversal,
    ))),
    #[cfg(feature = "parry")]
    EngineKind::External => Ok(Box::new(ExternalRayTracingEngine::new())),
    #[cfg(not(feature = "parry"))]
    EngineKind::External => Err(crate::error::AccelError::EngineUnavailable(
      EngineKind::External,
    )),
  }
}
