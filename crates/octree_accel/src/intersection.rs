//! Query results: raw engine hits and the renderer-facing intersection record.

use glam::{Vec2, Vec3};

use crate::mesh::{Mesh, MeshId, TriangleHit};
use crate::octree::PrimitiveRef;
use crate::ray::Ray;

/// Minimal hit reported by an engine: distance, barycentrics and triangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawHit {
  pub t: f32,
  /// Barycentric weight of the second vertex.
  pub u: f32,
  /// Barycentric weight of the third vertex.
  pub v: f32,
  pub primitive: PrimitiveRef,
}

impl RawHit {
  #[inline]
  pub fn new(hit: TriangleHit, primitive: PrimitiveRef) -> Self {
    Self {
      t: hit.t,
      u: hit.u,
      v: hit.v,
      primitive,
    }
  }
}

/// Orthonormal basis with `n` as the local +Z axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
  pub s: Vec3,
  pub t: Vec3,
  pub n: Vec3,
}

impl Frame {
  /// Build a frame around a unit normal. Tangents are arbitrary but
  /// deterministic.
  pub fn from_normal(n: Vec3) -> Self {
    let n = if n.is_normalized() { n } else { Vec3::Z };
    let (s, t) = n.any_orthonormal_pair();
    Self { s, t, n }
  }

  /// World-space vector to local coordinates.
  #[inline]
  pub fn to_local(&self, v: Vec3) -> Vec3 {
    Vec3::new(v.dot(self.s), v.dot(self.t), v.dot(self.n))
  }

  /// Local coordinates to a world-space vector.
  #[inline]
  pub fn to_world(&self, v: Vec3) -> Vec3 {
    self.s * v.x + self.t * v.y + self.n * v.z
  }

  /// Cosine between a local direction and the normal.
  #[inline]
  pub fn cos_theta(v: Vec3) -> f32 {
    v.z
  }
}

impl Default for Frame {
  fn default() -> Self {
    Self::from_normal(Vec3::Z)
  }
}

/// Surface hit with everything a shader needs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
  /// Distance along the query ray.
  pub t: f32,
  /// Hit position, interpolated from the triangle corners.
  pub p: Vec3,
  /// Interpolated texture coordinates, or the raw `(u, v)` when the mesh has
  /// none.
  pub uv: Vec2,
  /// Weights of the three triangle corners, summing to 1.
  pub barycentric: Vec3,
  /// Frame around the face normal.
  pub geo_frame: Frame,
  /// Frame around the interpolated vertex normal (equals `geo_frame` when
  /// the mesh has no normals).
  pub sh_frame: Frame,
  pub mesh: MeshId,
  pub triangle: u32,
}

impl Intersection {
  /// Fill in hit geometry from the mesh's vertex buffers.
  pub fn from_raw(mesh: &dyn Mesh, raw: &RawHit) -> Self {
    let barycentric = Vec3::new(1.0 - raw.u - raw.v, raw.u, raw.v);
    let [i0, i1, i2] = mesh.indices()[raw.primitive.triangle as usize].map(|i| i as usize);

    let positions = mesh.vertex_positions();
    let (p0, p1, p2) = (positions[i0], positions[i1], positions[i2]);
    let p = interpolate(barycentric, p0, p1, p2);

    let tex_coords = mesh.vertex_tex_coords();
    let uv = if tex_coords.is_empty() {
      Vec2::new(raw.u, raw.v)
    } else {
      tex_coords[i0] * barycentric.x + tex_coords[i1] * barycentric.y + tex_coords[i2] * barycentric.z
    };

    let geo_frame = Frame::from_normal((p1 - p0).cross(p2 - p0).normalize_or_zero());

    let normals = mesh.vertex_normals();
    let sh_frame = if normals.is_empty() {
      geo_frame
    } else {
      let n = interpolate(barycentric, normals[i0], normals[i1], normals[i2]).normalize_or_zero();
      if n == Vec3::ZERO {
        geo_frame
      } else {
        Frame::from_normal(n)
      }
    };

    Self {
      t: raw.t,
      p,
      uv,
      barycentric,
      geo_frame,
      sh_frame,
      mesh: MeshId(raw.primitive.mesh),
      triangle: raw.primitive.triangle,
    }
  }

  /// Ray leaving the hit point, offset by [`crate::ray::RAY_EPSILON`].
  #[inline]
  pub fn spawn_ray(&self, direction: Vec3) -> Ray {
    Ray::new(self.p, direction)
  }

  /// Shadow ray from the hit point towards `target`.
  #[inline]
  pub fn shadow_ray_to(&self, target: Vec3) -> Ray {
    Ray::between(self.p, target)
  }
}

#[inline]
fn interpolate(barycentric: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
  a * barycentric.x + b * barycentric.y + c * barycentric.z
}

/// What a query should compute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QueryMode {
  /// Closest hit with full surface data.
  #[default]
  Nearest,
  /// Any hit on the segment; no surface data.
  Shadow,
}

/// Query outcome.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Hit {
  /// Shadow query found a blocker.
  Occluded,
  /// Nearest query found a surface.
  Surface(Intersection),
}

impl Hit {
  #[inline]
  pub fn intersection(&self) -> Option<&Intersection> {
    match self {
      Hit::Surface(its) => Some(its),
      Hit::Occluded => None,
    }
  }

  #[inline]
  pub fn into_intersection(self) -> Option<Intersection> {
    match self {
      Hit::Surface(its) => Some(its),
      Hit::Occluded => None,
    }
  }
}
