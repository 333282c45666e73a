//! Accel - the renderer-facing facade.
//!
//! Owns the registered meshes and the selected engine. Build is exclusive
//! (`&mut self`); queries take `&self`, so one built accelerator can be shared
//! across render threads without locks.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::bounds::BoundingBox;
use crate::config::{AccelConfig, EngineKind};
use crate::engine::{create_engine, AccelEngine};
use crate::error::Result;
use crate::intersection::{Hit, Intersection, QueryMode, RawHit};
use crate::mesh::{MeshId, SharedMesh};
use crate::metrics::{QueryCounters, QueryMetrics};
use crate::octree::{BuildStats, TraversalStats};
use crate::ray::Ray;

/// Ray/scene intersection accelerator.
///
/// ```ignore
/// let mut accel = Accel::new(AccelConfig::default())?;
/// accel.add_mesh(mesh.into_shared());
/// accel.build()?;
///
/// if let Some(its) = accel.intersect(&Ray::new(origin, dir)) {
///     shade(its.p, its.sh_frame);
/// }
/// ```
pub struct Accel {
  config: AccelConfig,
  meshes: Vec<SharedMesh>,
  bbox: BoundingBox,
  engine: Box<dyn AccelEngine>,
  built: bool,
  build_stats: Option<BuildStats>,
  counters: QueryCounters,
}

impl Accel {
  /// Validate `config` and instantiate its engine.
  pub fn new(config: AccelConfig) -> Result<Self> {
    config.validate()?;
    let engine = create_engine(&config)?;
    Ok(Self {
      config,
      meshes: Vec::new(),
      bbox: BoundingBox::empty(),
      engine,
      built: false,
      build_stats: None,
      counters: QueryCounters::new(),
    })
  }

  /// Register a mesh and grow the scene bounds.
  ///
  /// Meshes added after [`Accel::build`] are not visible to queries until
  /// `build` runs again.
  pub fn add_mesh(&mut self, mesh: SharedMesh) -> MeshId {
    let id = MeshId(self.meshes.len() as u32);
    if self.built {
      warn!(mesh = id.0, "mesh added after build; queries ignore it until rebuild");
      self.built = false;
    }
    if mesh.triangle_count() == 0 {
      debug!(mesh = id.0, name = mesh.name(), "registered mesh has no triangles");
    }
    self.bbox.expand_by(&mesh.bounding_box());
    self.meshes.push(mesh);
    id
  }

  /// Build the engine over every registered mesh.
  ///
  /// With no meshes this does nothing and returns zeroed stats. Calling it
  /// again without new meshes returns the previous stats.
  #[tracing::instrument(
    skip_all,
    name = "accel::build",
    fields(engine = ?self.config.engine, meshes = self.meshes.len())
  )]
  pub fn build(&mut self) -> Result<BuildStats> {
    if self.meshes.is_empty() {
      debug!("no meshes registered, nothing to build");
      return Ok(BuildStats::default());
    }
    if let (true, Some(stats)) = (self.built, self.build_stats) {
      return Ok(stats);
    }

    let stats = self.engine.build(&self.meshes, &self.bbox)?;
    self.built = true;
    self.build_stats = Some(stats);
    debug!(
      triangles = stats.triangle_count,
      nodes = stats.node_count,
      time_us = stats.build_time_us,
      "accelerator ready"
    );
    Ok(stats)
  }

  /// Answer one query.
  ///
  /// `Nearest` returns the closest surface with full hit data; `Shadow`
  /// returns [`Hit::Occluded`] as soon as anything blocks the segment.
  pub fn ray_intersect(&self, ray: &Ray, mode: QueryMode) -> Option<Hit> {
    self.ray_intersect_with_stats(ray, mode).0
  }

  /// [`Accel::ray_intersect`] plus the work the engine did.
  pub fn ray_intersect_with_stats(&self, ray: &Ray, mode: QueryMode) -> (Option<Hit>, TraversalStats) {
    let mut stats = TraversalStats::default();
    let hit = match mode {
      QueryMode::Shadow => self
        .engine
        .occluded(&self.meshes, ray, &mut stats)
        .then_some(Hit::Occluded),
      QueryMode::Nearest => self
        .engine
        .nearest_hit(&self.meshes, ray, &mut stats)
        .map(|raw| Hit::Surface(self.enrich(&raw))),
    };
    self.counters.record_query(mode, hit.is_some(), &stats);
    (hit, stats)
  }

  /// Closest surface hit.
  pub fn intersect(&self, ray: &Ray) -> Option<Intersection> {
    self
      .ray_intersect(ray, QueryMode::Nearest)
      .and_then(Hit::into_intersection)
  }

  /// Whether anything blocks the ray's segment.
  pub fn occluded(&self, ray: &Ray) -> bool {
    self.ray_intersect(ray, QueryMode::Shadow).is_some()
  }

  /// Answer many queries in parallel. Results are in input order.
  pub fn intersect_batch(&self, rays: &[Ray], mode: QueryMode) -> Vec<Option<Hit>> {
    rays.par_iter().map(|ray| self.ray_intersect(ray, mode)).collect()
  }

  /// [`Accel::intersect_batch`] plus the summed work of every query.
  pub fn intersect_batch_with_stats(
    &self,
    rays: &[Ray],
    mode: QueryMode,
  ) -> (Vec<Option<Hit>>, TraversalStats) {
    let results: Vec<(Option<Hit>, TraversalStats)> = rays
      .par_iter()
      .map(|ray| self.ray_intersect_with_stats(ray, mode))
      .collect();

    let mut total = TraversalStats::default();
    let hits = results
      .into_iter()
      .map(|(hit, stats)| {
        total.merge(&stats);
        hit
      })
      .collect();
    (hits, total)
  }

  fn enrich(&self, raw: &RawHit) -> Intersection {
    Intersection::from_raw(self.meshes[raw.primitive.mesh as usize].as_ref(), raw)
  }

  /// Union of all registered mesh boxes (empty with no meshes).
  #[inline]
  pub fn bounding_box(&self) -> BoundingBox {
    self.bbox
  }

  pub fn mesh(&self, id: MeshId) -> Option<&SharedMesh> {
    self.meshes.get(id.index())
  }

  pub fn meshes(&self) -> &[SharedMesh] {
    &self.meshes
  }

  pub fn config(&self) -> &AccelConfig {
    &self.config
  }

  pub fn engine_kind(&self) -> EngineKind {
    self.engine.kind()
  }

  /// Stats from the last successful build.
  pub fn build_stats(&self) -> Option<BuildStats> {
    self.build_stats
  }

  /// Check if every registered mesh is indexed.
  pub fn is_built(&self) -> bool {
    self.built
  }

  /// Query counters accumulated so far (all zero without the `metrics`
  /// feature).
  pub fn metrics(&self) -> QueryMetrics {
    self.counters.snapshot()
  }

  pub fn reset_metrics(&self) {
    self.counters.reset();
  }
}

#[cfg(test)]
#[path = "accel_test.rs"]
mod accel_test;
