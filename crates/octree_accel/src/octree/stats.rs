//! Build and traversal statistics.
//!
//! Both are plain values returned to (or filled in by) the caller, so
//! independent trees and concurrent queries never share counters.

/// Statistics from one octree build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildStats {
	/// Nodes allocated in the arena (interior + leaf).
	pub node_count: usize,
	/// Leaf nodes.
	pub leaf_count: usize,
	/// Sum of primitive counts over all leaves (straddlers counted per leaf).
	pub leaf_triangle_total: usize,
	/// Sum of leaf depths.
	pub leaf_depth_total: usize,
	/// Deepest leaf (root = 1).
	pub max_depth: u32,
	/// Triangles fed into the build.
	pub triangle_count: usize,
	/// Wall-clock build time in microseconds.
	pub build_time_us: u64,
}

impl BuildStats {
	/// Mean primitives per leaf.
	#[inline]
	pub fn average_leaf_triangles(&self) -> f32 {
		if self.leaf_count == 0 {
			return 0.0;
		}
		self.leaf_triangle_total as f32 / self.leaf_count as f32
	}

	/// Mean leaf depth.
	#[inline]
	pub fn average_leaf_depth(&self) -> f32 {
		if self.leaf_count == 0 {
			return 0.0;
		}
		self.leaf_depth_total as f32 / self.leaf_count as f32
	}

	/// Ratio of stored primitive references to input triangles.
	///
	/// 1.0 means no triangle straddles a split plane.
	#[inline]
	pub fn duplication_factor(&self) -> f32 {
		if self.triangle_count == 0 {
			return 0.0;
		}
		self.leaf_triangle_total as f32 / self.triangle_count as f32
	}
}

/// Work done by a single query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TraversalStats {
	/// Nodes whose box was slab-tested during collection.
	pub nodes_visited: usize,
	/// Leaves the ray's segment reached.
	pub leaves_collected: usize,
	/// Leaves whose primitives were actually tested.
	pub leaves_tested: usize,
	/// Ray/triangle predicate calls.
	pub triangle_tests: usize,
}

impl TraversalStats {
	/// Accumulate another query's counters.
	#[inline]
	pub fn merge(&mut self, other: &TraversalStats) {
		self.nodes_visited += other.nodes_visited;
		self.leaves_collected += other.leaves_collected;
		self.leaves_tested += other.leaves_tested;
		self.triangle_tests += other.triangle_tests;
	}
}
