use glam::{Vec2, Vec3};

use super::*;
use crate::config::TraversalPolicy;
use crate::error::AccelError;
use crate::mesh::{shapes, TriangleMesh};
use crate::test_utils::{leaf_order_scene, random_rays, random_scene, unit_triangle};

fn software() -> Accel {
  Accel::new(AccelConfig::default()).expect("default config is valid")
}

fn down_ray() -> Ray {
  Ray::new(Vec3::new(0.2, 0.2, 1.0), Vec3::new(0.0, 0.0, -1.0))
}

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_accel_is_send_sync() {
  assert_send_sync::<Accel>();
}

// =========================================================================
// Construction and build
// =========================================================================

/// Invalid configs are rejected up front.
#[test]
fn test_new_rejects_invalid_config() {
  let result = Accel::new(AccelConfig::default().with_thresholds(10, 0));
  assert!(matches!(result, Err(AccelError::InvalidConfig(_))));
}

/// No meshes: build is a no-op and queries find nothing.
#[test]
fn test_empty_build_is_noop() {
  let mut accel = software();
  let stats = accel.build().unwrap();

  assert_eq!(stats, BuildStats::default());
  assert!(!accel.is_built());
  assert!(accel.build_stats().is_none());
  assert!(accel.intersect(&down_ray()).is_none());
  assert!(!accel.occluded(&down_ray()));
}

/// Mesh ids follow registration order; bounds grow with each mesh.
#[test]
fn test_add_mesh_ids_and_bounds() {
  let mut accel = software();
  let a = accel.add_mesh(unit_triangle());
  let b = accel.add_mesh(shapes::uv_sphere(Vec3::new(5.0, 0.0, 0.0), 1.0, 8, 8).into_shared());

  assert_eq!(a, MeshId(0));
  assert_eq!(b, MeshId(1));
  assert_eq!(accel.meshes().len(), 2);
  assert!(accel.mesh(MeshId(2)).is_none());

  let bbox = accel.bounding_box();
  assert_eq!(bbox.min.x, 0.0);
  assert!((bbox.max.x - 6.0).abs() < 1e-5);
}

/// Queries before build report nothing.
#[test]
fn test_query_before_build() {
  let mut accel = software();
  accel.add_mesh(unit_triangle());
  assert!(accel.intersect(&down_ray()).is_none());
}

/// Repeated build returns cached stats; a late mesh forces a rebuild.
#[test]
fn test_rebuild_after_late_mesh() {
  let mut accel = software();
  accel.add_mesh(unit_triangle());
  let first = accel.build().unwrap();
  assert!(accel.is_built());
  assert_eq!(accel.build().unwrap(), first);

  let plane = shapes::grid_plane(Vec2::splat(-2.0), Vec2::splat(4.0), -3.0, 2);
  let plane_id = accel.add_mesh(plane.into_shared());
  assert!(!accel.is_built());

  let second = accel.build().unwrap();
  assert_eq!(second.triangle_count, 1 + 8);

  // Straight down outside the unit triangle lands on the plane.
  let ray = Ray::new(Vec3::new(1.5, 1.5, 1.0), -Vec3::Z);
  let its = accel.intersect(&ray).expect("plane should be hit");
  assert_eq!(its.mesh, plane_id);
  assert!((its.t - 4.0).abs() < 1e-5);
}

// =========================================================================
// Queries and enrichment
// =========================================================================

/// Unit-triangle scenario through the facade.
#[test]
fn test_unit_triangle_intersection() {
  let mut accel = software();
  accel.add_mesh(unit_triangle());
  accel.build().unwrap();

  let its = accel.intersect(&down_ray()).expect("ray should hit");
  assert!((its.t - 1.0).abs() < 1e-6);
  assert!((its.p - Vec3::new(0.2, 0.2, 0.0)).length() < 1e-6);
  assert!((its.uv - Vec2::new(0.2, 0.2)).length() < 1e-6);
  assert!((its.geo_frame.n.abs() - Vec3::Z).length() < 1e-6);
  assert_eq!(its.sh_frame, its.geo_frame);
  assert_eq!(its.mesh, MeshId(0));
  assert_eq!(its.triangle, 0);
}

/// Shadow mode carries no surface data.
#[test]
fn test_shadow_mode() {
  let mut accel = software();
  accel.add_mesh(unit_triangle());
  accel.build().unwrap();

  assert_eq!(accel.ray_intersect(&down_ray(), QueryMode::Shadow), Some(Hit::Occluded));
  let miss = Ray::new(Vec3::new(0.8, 0.8, 1.0), -Vec3::Z);
  assert_eq!(accel.ray_intersect(&miss, QueryMode::Shadow), None);
  assert!(accel.ray_intersect(&miss, QueryMode::Nearest).is_none());
}

/// Sphere normals are interpolated into the shading frame.
#[test]
fn test_sphere_shading_normal_points_outward() {
  let mut accel = software();
  accel.add_mesh(shapes::uv_sphere(Vec3::ZERO, 1.0, 24, 48).into_shared());
  accel.build().unwrap();

  let ray = Ray::new(Vec3::new(0.1, 0.2, -5.0), Vec3::Z);
  let its = accel.intersect(&ray).expect("sphere should be hit");
  assert!(its.p.z < 0.0);
  assert!(its.sh_frame.n.dot(its.p.normalize()) > 0.99);
  assert!((its.p.length() - 1.0).abs() < 0.02);
}

/// Missing the scene box costs zero triangle tests.
#[test]
fn test_miss_has_no_triangle_tests() {
  let mut accel = software();
  for mesh in random_scene(4, 2, 100) {
    accel.add_mesh(mesh);
  }
  accel.build().unwrap();

  let ray = Ray::new(Vec3::new(100.0, 0.0, 0.0), Vec3::X);
  for mode in [QueryMode::Nearest, QueryMode::Shadow] {
    let (hit, stats) = accel.ray_intersect_with_stats(&ray, mode);
    assert!(hit.is_none());
    assert_eq!(stats.triangle_tests, 0);
  }
}

/// Traversal policy from the config reaches the engine.
#[test]
fn test_policy_selects_leaf_order() {
  let (meshes, ray) = leaf_order_scene();
  let base = AccelConfig::default().with_thresholds(0, 2);

  let hit_with = |policy: TraversalPolicy| {
    let mut accel = Accel::new(base.with_traversal(policy)).unwrap();
    for mesh in &meshes {
      accel.add_mesh(mesh.clone());
    }
    accel.build().unwrap();
    accel.intersect(&ray).expect("scene is hit")
  };

  assert_eq!(hit_with(TraversalPolicy::FirstHitLeaf).triangle, 0);
  assert_eq!(hit_with(TraversalPolicy::GlobalNearest).triangle, 1);
}

/// Parallel batch gives the same answers as one-by-one queries.
#[test]
fn test_batch_matches_sequential() {
  let mut accel = software();
  for mesh in random_scene(12, 3, 150) {
    accel.add_mesh(mesh);
  }
  accel.build().unwrap();

  let rays = random_rays(13, 256, &accel.bounding_box());
  for mode in [QueryMode::Nearest, QueryMode::Shadow] {
    let batch = accel.intersect_batch(&rays, mode);
    let sequential: Vec<Option<Hit>> = rays.iter().map(|r| accel.ray_intersect(r, mode)).collect();
    assert_eq!(batch, sequential);
  }
}

/// Batch stats are the sum of the per-query stats.
#[test]
fn test_batch_stats_sum_per_query_stats() {
  let mut accel = software();
  for mesh in random_scene(21, 2, 120) {
    accel.add_mesh(mesh);
  }
  accel.build().unwrap();

  let rays = random_rays(22, 128, &accel.bounding_box());
  let (hits, total) = accel.intersect_batch_with_stats(&rays, QueryMode::Nearest);

  let mut expected = TraversalStats::default();
  for (ray, hit) in rays.iter().zip(&hits) {
    let (single, stats) = accel.ray_intersect_with_stats(ray, QueryMode::Nearest);
    assert_eq!(&single, hit);
    expected.merge(&stats);
  }
  assert_eq!(total, expected);
  assert!(total.triangle_tests > 0);
}

/// Secondary rays leave the surface without re-hitting it.
#[test]
fn test_spawned_ray_escapes_surface() {
  let mut accel = software();
  accel.add_mesh(unit_triangle());
  accel.build().unwrap();

  let its = accel.intersect(&down_ray()).expect("ray should hit");
  let up = its.spawn_ray(Vec3::Z);
  assert_eq!(up.origin, its.p);
  assert!(accel.intersect(&up).is_none());
  assert!(!accel.occluded(&up));
}

/// Triangle meshes built by hand work through the facade.
#[test]
fn test_multiple_meshes_report_owner() {
  let near = TriangleMesh::new(
    vec![Vec3::new(-1.0, -1.0, 2.0), Vec3::new(1.0, -1.0, 2.0), Vec3::new(0.0, 1.0, 2.0)],
    vec![[0, 1, 2]],
  )
  .unwrap();
  let far = TriangleMesh::new(
    vec![Vec3::new(-1.0, -1.0, 5.0), Vec3::new(1.0, -1.0, 5.0), Vec3::new(0.0, 1.0, 5.0)],
    vec![[0, 1, 2]],
  )
  .unwrap();

  let mut accel = Accel::new(AccelConfig::default().with_traversal(TraversalPolicy::GlobalNearest)).unwrap();
  let far_id = accel.add_mesh(far.into_shared());
  let near_id = accel.add_mesh(near.into_shared());
  accel.build().unwrap();

  let its = accel.intersect(&Ray::new(Vec3::ZERO, Vec3::Z)).expect("hit");
  assert_eq!(its.mesh, near_id);
  assert!((its.t - 2.0).abs() < 1e-6);

  let behind = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::Z);
  assert_eq!(accel.intersect(&behind).unwrap().mesh, far_id);
}

// =========================================================================
// Metrics
// =========================================================================

#[cfg(feature = "metrics")]
#[test]
fn test_metrics_count_queries() {
  let mut accel = software();
  accel.add_mesh(unit_triangle());
  accel.build().unwrap();
  accel.reset_metrics();

  accel.intersect(&down_ray());
  accel.occluded(&down_ray());
  accel.intersect(&Ray::new(Vec3::new(5.0, 5.0, 1.0), -Vec3::Z));

  let metrics = accel.metrics();
  assert_eq!(metrics.rays, 2);
  assert_eq!(metrics.shadow_rays, 1);
  assert_eq!(metrics.hits, 2);
  assert_eq!(metrics.triangle_tests, 2);
}

#[cfg(not(feature = "metrics"))]
#[test]
fn test_metrics_disabled() {
  let mut accel = software();
  accel.add_mesh(unit_triangle());
  accel.build().unwrap();
  accel.intersect(&down_ray());
  assert_eq!(accel.metrics(), crate::metrics::QueryMetrics::default());
}
