//! Shared primitive types used across the whole rule layer.

/// Host-assigned identifier of a tile document.
pub type TileId = String;

/// Host-assigned identifier of a token document.
pub type TokenId = String;

/// Identifier of the scene a `FadeEngine` session belongs to.
pub type SceneId = String;

/// Elevation in host units. Higher is physically higher.
pub type Elevation = f64;
