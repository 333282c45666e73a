//! Ray segment type shared by the index and the mesh predicate.

use glam::Vec3;

/// Default lower bound of a ray segment, avoids self-intersection at spawn
/// points.
pub const RAY_EPSILON: f32 = 1e-4;

/// Parametric ray `origin + t * direction` restricted to `[t_min, t_max]`.
///
/// `t_max` shrinks during nearest-hit traversal as closer hits are found.
/// The direction is not required to be normalized; distances are measured in
/// units of `direction`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
  /// Ray origin.
  pub origin: Vec3,
  /// Ray direction.
  pub direction: Vec3,
  /// Minimum accepted hit distance.
  pub t_min: f32,
  /// Maximum accepted hit distance.
  pub t_max: f32,
}

impl Ray {
  /// Unbounded ray starting at `RAY_EPSILON`.
  pub fn new(origin: Vec3, direction: Vec3) -> Self {
    Self {
      origin,
      direction,
      t_min: RAY_EPSILON,
      t_max: f32::INFINITY,
    }
  }

  /// Ray restricted to an explicit `[t_min, t_max]` segment.
  pub fn segment(origin: Vec3, direction: Vec3, t_min: f32, t_max: f32) -> Self {
    Self {
      origin,
      direction,
      t_min,
      t_max,
    }
  }

  /// Shadow ray from `from` towards `to`, stopping just short of the target.
  pub fn between(from: Vec3, to: Vec3) -> Self {
    Self {
      origin: from,
      direction: to - from,
      t_min: RAY_EPSILON,
      t_max: 1.0 - RAY_EPSILON,
    }
  }

  /// Point at distance `t` along the ray.
  #[inline]
  pub fn at(&self, t: f32) -> Vec3 {
    self.origin + self.direction * t
  }
}
