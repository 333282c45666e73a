//! Library-backed engine using parry3d triangle meshes.
//!
//! Each registered mesh becomes one `TriMesh` with its own BVH. Queries walk
//! the meshes in registration order, shrinking the search distance as hits
//! are found. Once parry reports the closest triangle, the mesh's own
//! predicate re-derives `(u, v, t)` so both engines describe a hit the same
//! way.

use glam::Vec3;
use parry3d::math::{Point, Vector};
use parry3d::query::{Ray as ParryRay, RayCast};
use parry3d::shape::{FeatureId, TriMesh};
use tracing::debug;
use web_time::Instant;

use super::AccelEngine;
use crate::bounds::BoundingBox;
use crate::config::EngineKind;
use crate::error::{AccelError, Result};
use crate::intersection::RawHit;
use crate::mesh::{Mesh, SharedMesh, TriangleHit};
use crate::octree::{BuildStats, PrimitiveRef, TraversalStats};
use crate::ray::Ray;

/// parry3d ray casting over one `TriMesh` per registered mesh.
#[derive(Default)]
pub struct ExternalRayTracingEngine {
  /// `(mesh index, shape)`; meshes without triangles are skipped.
  shapes: Vec<(u32, TriMesh)>,
}

impl ExternalRayTracingEngine {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of meshes handed to parry.
  pub fn shape_count(&self) -> usize {
    self.shapes.len()
  }
}

impl AccelEngine for ExternalRayTracingEngine {
  fn kind(&self) -> EngineKind {
    EngineKind::External
  }

  #[tracing::instrument(skip_all, name = "external::build", fields(meshes = meshes.len()))]
  fn build(&mut self, meshes: &[SharedMesh], _bounds: &BoundingBox) -> Result<BuildStats> {
    let start = Instant::now();
    let mut triangle_count = 0;

    self.shapes.clear();
    let mut shapes = Vec::with_capacity(meshes.len());
    for (index, mesh) in meshes.iter().enumerate() {
      if mesh.triangle_count() == 0 {
        continue;
      }
      let vertices = mesh
        .vertex_positions()
        .iter()
        .map(|p| Point::new(p.x, p.y, p.z))
        .collect();
      let shape = TriMesh::new(vertices, mesh.indices().to_vec()).map_err(|e| {
        AccelError::Engine(format!("mesh {index} ({}): {e:?}", mesh.name()))
      })?;
      triangle_count += mesh.triangle_count();
      shapes.push((index as u32, shape));
    }
    self.shapes = shapes;

    let stats = BuildStats {
      triangle_count,
      build_time_us: start.elapsed().as_micros() as u64,
      ..Default::default()
    };
    debug!(
      shapes = self.shapes.len(),
      triangles = triangle_count,
      time_us = stats.build_time_us,
      "external engine built"
    );
    Ok(stats)
  }

  fn nearest_hit(
    &self,
    meshes: &[SharedMesh],
    ray: &Ray,
    stats: &mut TraversalStats,
  ) -> Option<RawHit> {
    let (local, mut max_toi) = to_parry(ray);
    let mut best: Option<(u32, u32, f32)> = None;

    for (mesh_index, shape) in &self.shapes {
      stats.nodes_visited += 1;
      let Some(hit) = shape.cast_local_ray_and_get_normal(&local, max_toi, true) else {
        continue;
      };
      let FeatureId::Face(face) = hit.feature else {
        continue;
      };
      // Back-face hits are reported past the triangle count.
      let triangle = face % shape.indices().len() as u32;
      if best.map_or(true, |(_, _, toi)| hit.time_of_impact < toi) {
        max_toi = hit.time_of_impact;
        best = Some((*mesh_index, triangle, hit.time_of_impact));
      }
    }

    let (mesh_index, triangle, toi) = best?;
    stats.triangle_tests += 1;
    let mesh = &meshes[mesh_index as usize];
    let hit = mesh
      .intersect_triangle(triangle as usize, ray)
      .unwrap_or_else(|| barycentric_hit(mesh.as_ref(), triangle, ray, ray.t_min + toi));
    Some(RawHit::new(hit, PrimitiveRef::new(mesh_index, triangle)))
  }

  fn occluded(&self, _meshes: &[SharedMesh], ray: &Ray, stats: &mut TraversalStats) -> bool {
    let (local, max_toi) = to_parry(ray);
    self.shapes.iter().any(|(_, shape)| {
      stats.nodes_visited += 1;
      shape.intersects_local_ray(&local, max_toi)
    })
  }
}

/// Shift the origin to `t_min` so parry's `[0, max_toi]` covers the segment.
fn to_parry(ray: &Ray) -> (ParryRay, f32) {
  let origin = ray.at(ray.t_min);
  let d = ray.direction;
  let max_toi = if ray.t_max.is_finite() {
    (ray.t_max - ray.t_min).max(0.0)
  } else {
    f32::MAX
  };
  (
    ParryRay::new(Point::new(origin.x, origin.y, origin.z), Vector::new(d.x, d.y, d.z)),
    max_toi,
  )
}

/// Barycentrics of the hit point, for hits the mesh predicate rejects by a
/// rounding margin.
fn barycentric_hit(mesh: &dyn Mesh, triangle: u32, ray: &Ray, t: f32) -> TriangleHit {
  let positions = mesh.vertex_positions();
  let [a, b, c] = mesh.indices()[triangle as usize].map(|i| positions[i as usize]);
  let (u, v) = barycentric_uv(ray.at(t), a, b, c);
  TriangleHit { u, v, t }
}

fn barycentric_uv(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> (f32, f32) {
  let (e1, e2, ep) = (b - a, c - a, p - a);
  let d11 = e1.dot(e1);
  let d12 = e1.dot(e2);
  let d22 = e2.dot(e2);
  let denom = d11 * d22 - d12 * d12;
  if denom.abs() < f32::EPSILON {
    return (0.0, 0.0);
  }
  let dp1 = ep.dot(e1);
  let dp2 = ep.dot(e2);
  let u = (d22 * dp1 - d12 * dp2) / denom;
  let v = (d11 * dp2 - d12 * dp1) / denom;
  (u, v)
}
