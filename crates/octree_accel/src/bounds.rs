//! Axis-aligned bounding box used by the octree and the facade.

use glam::{BVec3, Vec3};

use crate::ray::Ray;

/// Single-precision axis-aligned bounding box.
///
/// Bounds are inclusive on both corners. A box may be degenerate (zero extent
/// on one or more axes) for planar or single-point geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
	/// Minimum corner (inclusive).
	pub min: Vec3,
	/// Maximum corner (inclusive).
	pub max: Vec3,
}

impl BoundingBox {
	/// Create a new box from min and max corners.
	///
	/// # Panics
	/// Debug-asserts that min <= max on all axes.
	pub fn new(min: Vec3, max: Vec3) -> Self {
		debug_assert!(
			min.x <= max.x && min.y <= max.y && min.z <= max.z,
			"BoundingBox min must be <= max on all axes"
		);
		Self { min, max }
	}

	/// Box with inverted extents, ready for expansion.
	///
	/// This is the identity of [`BoundingBox::union`].
	pub const fn empty() -> Self {
		Self {
			min: Vec3::splat(f32::INFINITY),
			max: Vec3::splat(f32::NEG_INFINITY),
		}
	}

	/// Smallest box containing every point.
	pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
		let mut bbox = Self::empty();
		for point in points {
			bbox.expand_by_point(point);
		}
		bbox
	}

	/// Grow the box to include a point.
	#[inline]
	pub fn expand_by_point(&mut self, point: Vec3) {
		self.min = self.min.min(point);
		self.max = self.max.max(point);
	}

	/// Grow the box to include another box.
	#[inline]
	pub fn expand_by(&mut self, other: &BoundingBox) {
		self.min = self.min.min(other.min);
		self.max = self.max.max(other.max);
	}

	/// Union of two boxes.
	#[inline]
	pub fn union(&self, other: &BoundingBox) -> BoundingBox {
		let mut out = *self;
		out.expand_by(other);
		out
	}

	/// Check if min <= max on all axes (false for [`BoundingBox::empty`]).
	#[inline]
	pub fn is_valid(&self) -> bool {
		self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
	}

	/// Check if this box overlaps with another.
	///
	/// Two boxes overlap if they share any interior or boundary points.
	#[inline]
	pub fn overlaps(&self, other: &BoundingBox) -> bool {
		self.min.x <= other.max.x
			&& self.max.x >= other.min.x
			&& self.min.y <= other.max.y
			&& self.max.y >= other.min.y
			&& self.min.z <= other.max.z
			&& self.max.z >= other.min.z
	}

	/// Check if this box contains a point.
	#[inline]
	pub fn contains_point(&self, point: Vec3) -> bool {
		point.x >= self.min.x
			&& point.x <= self.max.x
			&& point.y >= self.min.y
			&& point.y <= self.max.y
			&& point.z >= self.min.z
			&& point.z <= self.max.z
	}

	/// Get the size of the box (max - min).
	#[inline]
	pub fn extents(&self) -> Vec3 {
		self.max - self.min
	}

	/// Get the center of the box.
	#[inline]
	pub fn center(&self) -> Vec3 {
		(self.min + self.max) * 0.5
	}

	/// Sub-box for one of the 8 octants, bisecting every axis at its midpoint.
	///
	/// Octant bits: X (bit 0), Y (bit 1), Z (bit 2). A set bit selects the
	/// upper half of that axis. Outer faces are copied from the parent, so the
	/// eight octants tile it exactly.
	pub fn octant(&self, octant: u8) -> BoundingBox {
		debug_assert!(octant < 8, "octant must be in 0..8");
		let center = self.center();
		let upper = BVec3::new(octant & 1 != 0, octant & 2 != 0, octant & 4 != 0);
		BoundingBox {
			min: Vec3::select(upper, center, self.min),
			max: Vec3::select(upper, self.max, center),
		}
	}

	/// Slab test against the three pairs of axis-aligned planes.
	///
	/// Returns the entry and exit distances `(t_near, t_far)` along the ray.
	/// `t_near` is negative when the origin lies inside the box. Returns `None`
	/// when the slabs do not overlap or the interval lies outside
	/// `[ray.t_min, ray.t_max]`.
	pub fn ray_intersect(&self, ray: &Ray) -> Option<(f32, f32)> {
		let mut near = f32::NEG_INFINITY;
		let mut far = f32::INFINITY;

		for axis in 0..3 {
			let origin = ray.origin[axis];
			let (lo, hi) = (self.min[axis], self.max[axis]);

			if ray.direction[axis] == 0.0 {
				// Parallel to the slab: the origin must already be inside it.
				if origin < lo || origin > hi {
					return None;
				}
				continue;
			}

			let inv = 1.0 / ray.direction[axis];
			let mut t1 = (lo - origin) * inv;
			let mut t2 = (hi - origin) * inv;
			if t1 > t2 {
				std::mem::swap(&mut t1, &mut t2);
			}

			near = near.max(t1);
			far = far.min(t2);

			if !(near <= far) {
				return None;
			}
		}

		if ray.t_min <= far && near <= ray.t_max {
			Some((near, far))
		} else {
			None
		}
	}
}

impl Default for BoundingBox {
	fn default() -> Self {
		Self::empty()
	}
}
