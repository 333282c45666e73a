//! Mesh collaborator interface and the default indexed triangle mesh.
//!
//! The index only needs per-triangle bounds and a per-triangle ray predicate.
//! Vertex buffers are consumed by hit enrichment in [`crate::Accel`] and by
//! the external engine.

use std::sync::Arc;

use glam::{Vec2, Vec3};

use crate::bounds::BoundingBox;
use crate::error::{AccelError, Result};
use crate::ray::Ray;

pub mod shapes;

/// Determinant threshold below which a ray is treated as parallel to a
/// triangle.
pub const TRIANGLE_EPSILON: f32 = 1e-8;

/// Mesh handle shared between the facade and its engine.
pub type SharedMesh = Arc<dyn Mesh>;

/// Index of a mesh registered with [`crate::Accel`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct MeshId(pub u32);

impl MeshId {
  /// Index into the facade's mesh list.
  #[inline]
  pub fn index(&self) -> usize {
    self.0 as usize
  }
}

/// Result of a single ray/triangle test.
///
/// `u` and `v` are the barycentric weights of the second and third vertex;
/// the first vertex has weight `1 - u - v`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangleHit {
  pub u: f32,
  pub v: f32,
  pub t: f32,
}

/// Triangle storage consumed by the acceleration structure.
///
/// Implementations must be immutable once registered: the index caches
/// per-triangle bounds at build time.
pub trait Mesh: Send + Sync {
  /// Number of triangles.
  fn triangle_count(&self) -> usize;

  /// Bounds of the whole mesh.
  fn bounding_box(&self) -> BoundingBox;

  /// Bounds of one triangle (used only during build).
  fn triangle_bounds(&self, triangle: usize) -> BoundingBox;

  /// Test one triangle, accepting hits in `[ray.t_min, ray.t_max]`.
  fn intersect_triangle(&self, triangle: usize, ray: &Ray) -> Option<TriangleHit>;

  /// Vertex positions.
  fn vertex_positions(&self) -> &[Vec3];

  /// Per-vertex normals, empty when the mesh has none.
  fn vertex_normals(&self) -> &[Vec3];

  /// Per-vertex texture coordinates, empty when the mesh has none.
  fn vertex_tex_coords(&self) -> &[Vec2];

  /// Triangle vertex indices.
  fn indices(&self) -> &[[u32; 3]];

  /// Human-readable name for logs.
  fn name(&self) -> &str {
    ""
  }
}

/// Möller–Trumbore ray/triangle intersection.
#[inline]
pub fn intersect_triangle(ray: &Ray, p0: Vec3, p1: Vec3, p2: Vec3) -> Option<TriangleHit> {
  let edge1 = p1 - p0;
  let edge2 = p2 - p0;

  let pvec = ray.direction.cross(edge2);
  let det = edge1.dot(pvec);
  if det.abs() < TRIANGLE_EPSILON {
    return None;
  }
  let inv_det = 1.0 / det;

  let tvec = ray.origin - p0;
  let u = tvec.dot(pvec) * inv_det;
  if !(0.0..=1.0).contains(&u) {
    return None;
  }

  let qvec = tvec.cross(edge1);
  let v = ray.direction.dot(qvec) * inv_det;
  if v < 0.0 || u + v > 1.0 {
    return None;
  }

  let t = edge2.dot(qvec) * inv_det;
  if t >= ray.t_min && t <= ray.t_max {
    Some(TriangleHit { u, v, t })
  } else {
    None
  }
}

/// Indexed triangle mesh with optional normals and texture coordinates.
#[derive(Clone, Debug, Default)]
pub struct TriangleMesh {
  name: String,
  positions: Vec<Vec3>,
  normals: Vec<Vec3>,
  tex_coords: Vec<Vec2>,
  indices: Vec<[u32; 3]>,
  bbox: BoundingBox,
}

impl TriangleMesh {
  /// Create a mesh, rejecting indices that point past the position buffer.
  pub fn new(positions: Vec<Vec3>, indices: Vec<[u32; 3]>) -> Result<Self> {
    let vertex_count = positions.len();
    for (triangle, tri) in indices.iter().enumerate() {
      if let Some(&vertex) = tri.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(AccelError::IndexOutOfRange {
          triangle,
          vertex,
          vertex_count,
        });
      }
    }

    let bbox = BoundingBox::from_points(positions.iter().copied());
    Ok(Self {
      name: String::new(),
      positions,
      normals: Vec::new(),
      tex_coords: Vec::new(),
      indices,
      bbox,
    })
  }

  /// Assemble a mesh whose buffers are consistent by construction.
  fn from_parts(
    name: &str,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    tex_coords: Vec<Vec2>,
    indices: Vec<[u32; 3]>,
  ) -> Self {
    debug_assert!(normals.is_empty() || normals.len() == positions.len());
    debug_assert!(tex_coords.is_empty() || tex_coords.len() == positions.len());
    let bbox = BoundingBox::from_points(positions.iter().copied());
    Self {
      name: name.to_owned(),
      positions,
      normals,
      tex_coords,
      indices,
      bbox,
    }
  }

  /// Attach per-vertex normals (one per position).
  pub fn with_normals(mut self, normals: Vec<Vec3>) -> Result<Self> {
    check_attribute("normals", self.positions.len(), normals.len())?;
    self.normals = normals;
    Ok(self)
  }

  /// Attach per-vertex texture coordinates (one per position).
  pub fn with_tex_coords(mut self, tex_coords: Vec<Vec2>) -> Result<Self> {
    check_attribute("tex_coords", self.positions.len(), tex_coords.len())?;
    self.tex_coords = tex_coords;
    Ok(self)
  }

  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.name = name.into();
    self
  }

  /// Corner positions of one triangle.
  #[inline]
  pub fn triangle(&self, triangle: usize) -> [Vec3; 3] {
    let [a, b, c] = self.indices[triangle];
    [
      self.positions[a as usize],
      self.positions[b as usize],
      self.positions[c as usize],
    ]
  }

  /// Wrap in an `Arc` for registration with [`crate::Accel`].
  pub fn into_shared(self) -> SharedMesh {
    Arc::new(self)
  }
}

fn check_attribute(attribute: &'static str, expected: usize, found: usize) -> Result<()> {
  if expected == found {
    Ok(())
  } else {
    Err(AccelError::AttributeCount {
      attribute,
      expected,
      found,
    })
  }
}

impl Mesh for TriangleMesh {
  fn triangle_count(&self) -> usize {
    self.indices.len()
  }

  fn bounding_box(&self) -> BoundingBox {
    self.bbox
  }

  fn triangle_bounds(&self, triangle: usize) -> BoundingBox {
    BoundingBox::from_points(self.triangle(triangle))
  }

  fn intersect_triangle(&self, triangle: usize, ray: &Ray) -> Option<TriangleHit> {
    let [p0, p1, p2] = self.triangle(triangle);
    intersect_triangle(ray, p0, p1, p2)
  }

  fn vertex_positions(&self) -> &[Vec3] {
    &self.positions
  }

  fn vertex_normals(&self) -> &[Vec3] {
    &self.normals
  }

  fn vertex_tex_coords(&self) -> &[Vec2] {
    &self.tex_coords
  }

  fn indices(&self) -> &[[u32; 3]] {
    &self.indices
  }

  fn name(&self) -> &str {
    &self.name
  }
}

#[cfg(test)]
#[path = "mesh_test.rs"]
mod mesh_test;
