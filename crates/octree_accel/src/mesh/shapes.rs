//! Procedural test geometry.
//!
//! Small generators for benchmarks and tests. Scene loading is the renderer's
//! job; these only exist so the index can be exercised standalone.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use super::TriangleMesh;

/// Latitude/longitude sphere with outward normals and spherical UVs.
///
/// `stacks` and `slices` are clamped to at least 2 and 3. Pole rows emit one
/// triangle per slice, so the mesh has `2 * slices * (stacks - 1)` triangles.
pub fn uv_sphere(center: Vec3, radius: f32, stacks: u32, slices: u32) -> TriangleMesh {
  let stacks = stacks.max(2);
  let slices = slices.max(3);
  let row = slices + 1;

  let mut positions = Vec::with_capacity(((stacks + 1) * row) as usize);
  let mut normals = Vec::with_capacity(positions.capacity());
  let mut tex_coords = Vec::with_capacity(positions.capacity());

  for i in 0..=stacks {
    let v = i as f32 / stacks as f32;
    let theta = v * PI;
    for j in 0..=slices {
      let u = j as f32 / slices as f32;
      let phi = u * TAU;
      let n = Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin());
      positions.push(center + n * radius);
      normals.push(n);
      tex_coords.push(Vec2::new(u, v));
    }
  }

  let mut indices = Vec::with_capacity((2 * slices * stacks) as usize);
  for i in 0..stacks {
    for j in 0..slices {
      let a = i * row + j;
      let b = a + row;
      if i != 0 {
        indices.push([a, b, a + 1]);
      }
      if i != stacks - 1 {
        indices.push([a + 1, b, b + 1]);
      }
    }
  }

  TriangleMesh::from_parts("uv_sphere", positions, normals, tex_coords, indices)
}

/// Flat grid in the XY plane at height `z`, `cells x cells` quads split into
/// two triangles each, normals along +Z.
pub fn grid_plane(min: Vec2, extent: Vec2, z: f32, cells: u32) -> TriangleMesh {
  let cells = cells.max(1);
  let row = cells + 1;

  let mut positions = Vec::with_capacity((row * row) as usize);
  let mut tex_coords = Vec::with_capacity(positions.capacity());
  for y in 0..=cells {
    for x in 0..=cells {
      let uv = Vec2::new(x as f32, y as f32) / cells as f32;
      let p = min + uv * extent;
      positions.push(Vec3::new(p.x, p.y, z));
      tex_coords.push(uv);
    }
  }
  let normals = vec![Vec3::Z; positions.len()];

  let mut indices = Vec::with_capacity((2 * cells * cells) as usize);
  for y in 0..cells {
    for x in 0..cells {
      let a = y * row + x;
      let b = a + row;
      indices.push([a, a + 1, b]);
      indices.push([a + 1, b + 1, b]);
    }
  }

  TriangleMesh::from_parts("grid_plane", positions, normals, tex_coords, indices)
}
