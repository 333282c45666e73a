//! Test utilities: seeded random scenes and brute-force reference queries.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bounds::BoundingBox;
use crate::intersection::RawHit;
use crate::mesh::{SharedMesh, TriangleMesh};
use crate::octree::PrimitiveRef;
use crate::ray::Ray;

// =============================================================================
// Fixtures
// =============================================================================

/// Triangle (0,0,0), (1,0,0), (0,1,0).
pub fn unit_triangle() -> SharedMesh {
  TriangleMesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![[0, 1, 2]])
    .expect("unit triangle is valid")
    .into_shared()
}

/// `count` random triangles inside `[-extent, extent]^3`, each with edges up
/// to `max_edge` long.
pub fn random_soup(seed: u64, count: usize, extent: f32, max_edge: f32) -> TriangleMesh {
  let mut rng = StdRng::seed_from_u64(seed);
  let mut positions = Vec::with_capacity(count * 3);
  let mut indices = Vec::with_capacity(count);

  for i in 0..count as u32 {
    let anchor = random_point(&mut rng, extent);
    positions.push(anchor);
    for _ in 0..2 {
      let offset = random_point(&mut rng, max_edge * 0.5);
      positions.push((anchor + offset).clamp(Vec3::splat(-extent), Vec3::splat(extent)));
    }
    indices.push([i * 3, i * 3 + 1, i * 3 + 2]);
  }

  TriangleMesh::new(positions, indices)
    .expect("soup indices are in range")
    .with_name(format!("soup_{seed}"))
}

/// Several random soups as separate meshes.
pub fn random_scene(seed: u64, meshes: usize, triangles_per_mesh: usize) -> Vec<SharedMesh> {
  (0..meshes as u64)
    .map(|i| random_soup(seed.wrapping_add(i * 7919), triangles_per_mesh, 4.0, 1.5).into_shared())
    .collect()
}

/// Rays from points around `bounds` aimed at random points inside it.
///
/// A quarter of the rays aim away from the box so misses are exercised too.
pub fn random_rays(seed: u64, count: usize, bounds: &BoundingBox) -> Vec<Ray> {
  let mut rng = StdRng::seed_from_u64(seed);
  let center = bounds.center();
  let reach = bounds.extents().max_element().max(1.0);

  (0..count)
    .map(|i| {
      let origin = center + random_point(&mut rng, reach);
      let target = Vec3::new(
        rng.random_range(bounds.min.x..=bounds.max.x),
        rng.random_range(bounds.min.y..=bounds.max.y),
        rng.random_range(bounds.min.z..=bounds.max.z),
      );
      let direction = if i % 4 == 3 { origin - target } else { target - origin };
      Ray::new(origin, direction.normalize_or(Vec3::X))
    })
    .collect()
}

fn random_point(rng: &mut StdRng, extent: f32) -> Vec3 {
  Vec3::new(
    rng.random_range(-extent..=extent),
    rng.random_range(-extent..=extent),
    rng.random_range(-extent..=extent),
  )
}

/// Scene where the first leaf with a hit does not hold the nearest triangle.
///
/// Config: `triangle_threshold = 0`, `depth_threshold = 2`. The root splits
/// at x = 2; the ray (+X at y = 0.9, z = 1) enters the low-x leaf first
/// (t_near = 1.5), which holds only triangle 0, hit at t = 3.9. Triangle 1
/// lives only in the high-x leaf (t_near = 3.0) and is hit at t = 3.5.
pub fn leaf_order_scene() -> (Vec<SharedMesh>, Ray) {
  let positions = vec![
    Vec3::new(3.5, 0.5, 0.5),
    Vec3::new(3.5, 1.5, 0.5),
    Vec3::new(0.5, 1.0, 3.0),
    Vec3::new(2.5, 0.5, 0.5),
    Vec3::new(2.5, 1.5, 0.5),
    Vec3::new(2.5, 1.0, 1.5),
  ];
  let mesh = TriangleMesh::new(positions, vec![[0, 1, 2], [3, 4, 5]])
    .expect("scene indices are in range")
    .into_shared();
  let ray = Ray::new(Vec3::new(-1.0, 0.9, 1.0), Vec3::X);
  (vec![mesh], ray)
}

/// Union of mesh boxes, as the facade computes it.
pub fn scene_bounds(meshes: &[SharedMesh]) -> BoundingBox {
  meshes
    .iter()
    .fold(BoundingBox::empty(), |acc, mesh| acc.union(&mesh.bounding_box()))
}

// =============================================================================
// Brute-force references
// =============================================================================

/// Nearest hit by testing every triangle of every mesh.
pub fn brute_force_nearest(meshes: &[SharedMesh], ray: &Ray) -> Option<RawHit> {
  let mut ray = *ray;
  let mut best = None;
  for (m, mesh) in meshes.iter().enumerate() {
    for t in 0..mesh.triangle_count() {
      if let Some(hit) = mesh.intersect_triangle(t, &ray) {
        ray.t_max = hit.t;
        best = Some(RawHit::new(hit, PrimitiveRef::new(m as u32, t as u32)));
      }
    }
  }
  best
}

/// Whether any triangle of any mesh intersects the segment.
pub fn brute_force_occluded(meshes: &[SharedMesh], ray: &Ray) -> bool {
  meshes
    .iter()
    .any(|mesh| (0..mesh.triangle_count()).any(|t| mesh.intersect_triangle(t, ray).is_some()))
}

/// Every triangle hit along the ray, as `(t, primitive)`.
pub fn brute_force_all_hits(meshes: &[SharedMesh], ray: &Ray) -> Vec<(f32, PrimitiveRef)> {
  let mut hits = Vec::new();
  for (m, mesh) in meshes.iter().enumerate() {
    for t in 0..mesh.triangle_count() {
      if let Some(hit) = mesh.intersect_triangle(t, ray) {
        hits.push((hit.t, PrimitiveRef::new(m as u32, t as u32)));
      }
    }
  }
  hits
}
