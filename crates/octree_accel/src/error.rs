//! Error types for configuration, mesh construction and engine builds.
//!
//! Ray queries never fail: they either report a hit or they don't. Only the
//! setup path (loading config, validating mesh buffers, building an engine)
//! returns [`AccelError`].

use std::path::PathBuf;

use crate::config::EngineKind;

/// Errors that can occur while configuring or building an accelerator.
#[derive(Debug, thiserror::Error)]
pub enum AccelError {
  /// Config file could not be read.
  #[error("failed to read config file {}: {source}", path.display())]
  Io {
    /// Path that failed to load.
    path: PathBuf,
    /// Underlying I/O failure.
    #[source]
    source: std::io::Error,
  },

  /// Config text is not valid TOML for [`crate::AccelConfig`].
  #[error("failed to parse config TOML: {0}")]
  ConfigParse(#[from] toml::de::Error),

  /// Config parsed but holds values the builder cannot honor.
  #[error("invalid config: {0}")]
  InvalidConfig(String),

  /// A triangle references a vertex that does not exist.
  #[error("triangle {triangle} references vertex {vertex}, but the mesh has {vertex_count} vertices")]
  IndexOutOfRange {
    /// Offending triangle.
    triangle: usize,
    /// Offending vertex index.
    vertex: u32,
    /// Number of vertex positions in the mesh.
    vertex_count: usize,
  },

  /// A per-vertex attribute buffer does not match the position count.
  #[error("{attribute} buffer has {found} entries, expected {expected} (one per vertex)")]
  AttributeCount {
    /// Attribute name (`"normals"`, `"tex_coords"`).
    attribute: &'static str,
    /// Expected number of entries.
    expected: usize,
    /// Actual number of entries.
    found: usize,
  },

  /// Requested engine was not compiled into this build.
  #[error("engine {0:?} is not available in this build")]
  EngineUnavailable(EngineKind),

  /// The external engine rejected the scene.
  #[error("engine build failed: {0}")]
  Engine(String),
}

/// Result alias for fallible setup operations.
pub type Result<T> = std::result::Result<T, AccelError>;
