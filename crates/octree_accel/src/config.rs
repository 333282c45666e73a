//! AccelConfig - build thresholds, traversal policy and engine selection.
//!
//! Every field has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! engine = "software"
//! traversal = "first_hit_leaf"
//!
//! [build]
//! triangle_threshold = 10
//! depth_threshold = 10
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AccelError, Result};

/// Default maximum triangle count stored in a leaf.
pub const DEFAULT_TRIANGLE_THRESHOLD: usize = 10;

/// Default depth at which subdivision stops (root = depth 1).
pub const DEFAULT_DEPTH_THRESHOLD: u32 = 10;

/// Deepest tree the builder accepts. Bisecting an f32 box more than 24 times
/// runs out of mantissa bits.
pub const MAX_DEPTH_THRESHOLD: u32 = 24;

/// Subdivision stopping rule for the octree builder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
  /// A node with this many triangles or fewer becomes a leaf.
  pub triangle_threshold: usize,

  /// A node at this depth or deeper becomes a leaf.
  pub depth_threshold: u32,
}

impl BuildConfig {
  /// Check whether a node with `triangle_count` triangles at `depth` must be
  /// a leaf.
  #[inline]
  pub fn is_leaf(&self, triangle_count: usize, depth: u32) -> bool {
    triangle_count <= self.triangle_threshold || depth >= self.depth_threshold
  }
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      triangle_threshold: DEFAULT_TRIANGLE_THRESHOLD,
      depth_threshold: DEFAULT_DEPTH_THRESHOLD,
    }
  }
}

/// How nearest-hit queries walk the sorted candidate leaves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalPolicy {
  /// Stop at the first leaf (in entry-distance order) that yields any hit.
  ///
  /// Matches the historical renderer output. A triangle stored in an earlier
  /// leaf can win over a closer triangle that only lives in a later leaf.
  #[default]
  FirstHitLeaf,

  /// Keep scanning later leaves while their entry distance is below the
  /// current best hit, returning the global nearest hit.
  GlobalNearest,
}

/// Which acceleration engine answers queries behind [`crate::Accel`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
  /// Hand-built octree ([`crate::engine::SoftwareSpatialIndex`]).
  #[default]
  Software,

  /// Library ray-casting engine (requires the `parry` feature).
  External,
}

/// Top-level accelerator configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccelConfig {
  /// Engine selected at facade construction.
  pub engine: EngineKind,

  /// Nearest-hit traversal policy (software engine only).
  pub traversal: TraversalPolicy,

  /// Octree build thresholds (software engine only).
  ///
  /// Kept last so it serializes as a trailing `[build]` table.
  pub build: BuildConfig,
}

impl AccelConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_build(mut self, build: BuildConfig) -> Self {
    self.build = build;
    self
  }

  pub fn with_thresholds(mut self, triangle_threshold: usize, depth_threshold: u32) -> Self {
    self.build = BuildConfig {
      triangle_threshold,
      depth_threshold,
    };
    self
  }

  pub fn with_traversal(mut self, traversal: TraversalPolicy) -> Self {
    self.traversal = traversal;
    self
  }

  pub fn with_engine(mut self, engine: EngineKind) -> Self {
    self.engine = engine;
    self
  }

  /// Parse and validate a config from TOML text.
  pub fn from_toml_str(text: &str) -> Result<Self> {
    let config: AccelConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
  }

  /// Load and validate a config from a TOML file.
  pub fn load(path: &Path) -> Result<Self> {
    let content = std::fs::read_to_string(path).map_err(|source| AccelError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_toml_str(&content)
  }

  /// Serialize to TOML text.
  pub fn to_toml_string(&self) -> String {
    // Plain structs and unit enums always serialize.
    toml::to_string(self).unwrap_or_default()
  }

  /// Reject values the builder cannot honor.
  pub fn validate(&self) -> Result<()> {
    let depth = self.build.depth_threshold;
    if depth == 0 || depth > MAX_DEPTH_THRESHOLD {
      return Err(AccelError::InvalidConfig(format!(
        "depth_threshold must be in 1..={MAX_DEPTH_THRESHOLD}, got {depth}"
      )));
    }
    if self.engine == EngineKind::External && !cfg!(feature = "parry") {
      return Err(AccelError::EngineUnavailable(EngineKind::External));
    }
    Ok(())
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
