//! Tile and token snapshots as delivered by the host.
//!
//! The host owns these documents. This crate only ever sees copies of
//! them, and only ever writes back an occlusion mode.

use crate::{
    error::{FadeError, FadeResult},
    types::{Elevation, TileId, TokenId},
};
use serde::{Deserialize, Serialize};

/// How a tile reacts when something is beneath it.
/// Numeric codes match the host's tile occlusion constants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum OcclusionMode {
    None,
    Fade,
    Roof,
    Radial,
    #[default]
    Vision,
}

impl OcclusionMode {
    pub fn code(&self) -> i64 {
        match self {
            Self::None   => 0,
            Self::Fade   => 1,
            Self::Roof   => 2,
            Self::Radial => 3,
            Self::Vision => 4,
        }
    }

    pub fn from_code(code: i64) -> FadeResult<Self> {
        match code {
            0 => Ok(Self::None),
            1 => Ok(Self::Fade),
            2 => Ok(Self::Roof),
            3 => Ok(Self::Radial),
            4 => Ok(Self::Vision),
            _ => Err(FadeError::UnknownOcclusionMode { code }),
        }
    }
}

/// Axis-aligned rectangle with inclusive edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left:   f64,
    pub top:    f64,
    pub right:  f64,
    pub bottom: f64,
}

impl Bounds {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.left <= x && x <= self.right && self.top <= y && y <= self.bottom
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tile {
    pub id:        TileId,
    pub x:         f64,
    pub y:         f64,
    pub width:     f64,
    pub height:    f64,
    pub elevation: Elevation,
    #[serde(default)]
    pub occlusion: OcclusionMode,
    /// Opt-in to dynamic fading. Mirrors the tile's `alsoFade` flag.
    #[serde(default)]
    pub also_fade: bool,
}

impl Tile {
    pub fn new(id: impl Into<TileId>, x: f64, y: f64, width: f64, height: f64, elevation: Elevation) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            width,
            height,
            elevation,
            occlusion: OcclusionMode::default(),
            also_fade: false,
        }
    }

    pub fn with_also_fade(mut self, also_fade: bool) -> Self {
        self.also_fade = also_fade;
        self
    }

    pub fn with_occlusion(mut self, mode: OcclusionMode) -> Self {
        self.occlusion = mode;
        self
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            left:   self.x,
            top:    self.y,
            right:  self.x + self.width,
            bottom: self.y + self.height,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    pub id:        TokenId,
    /// Bounding-box origin.
    pub x:         f64,
    pub y:         f64,
    pub width:     f64,
    pub height:    f64,
    pub elevation: Elevation,
    /// Owned by the acting user.
    #[serde(default)]
    pub is_owner:  bool,
    /// Currently controlled (selected) by the acting user.
    #[serde(default)]
    pub controlled: bool,
}

impl Token {
    pub fn new(id: impl Into<TokenId>, x: f64, y: f64, width: f64, height: f64, elevation: Elevation) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            width,
            height,
            elevation,
            is_owner: true,
            controlled: false,
        }
    }

    /// A token of the given size whose center sits at `(cx, cy)`.
    pub fn centered_at(id: impl Into<TokenId>, cx: f64, cy: f64, size: f64, elevation: Elevation) -> Self {
        Self::new(id, cx - size / 2.0, cy - size / 2.0, size, size, elevation)
    }

    pub fn owned(mut self, is_owner: bool) -> Self {
        self.is_owner = is_owner;
        self
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn controlled(mut self, controlled: bool) -> Self {
        self.controlled = controlled;
        self
    }

    pub fn moved_to(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occlusion_codes_are_stable() {
        for mode in [
            OcclusionMode::None,
            OcclusionMode::Fade,
            OcclusionMode::Roof,
            OcclusionMode::Radial,
            OcclusionMode::Vision,
        ] {
            assert_eq!(OcclusionMode::from_code(mode.code()).unwrap(), mode);
        }
        assert!(OcclusionMode::from_code(9).is_err());
    }

    #[test]
    fn centered_token_reports_its_center() {
        let token = Token::centered_at("t", 50.0, 50.0, 100.0, 0.0);
        assert_eq!(token.center(), (50.0, 50.0));
        assert_eq!(token.x, 0.0);
    }

    #[test]
    fn tile_deserializes_with_defaults() {
        let tile: Tile = serde_json::from_str(
            r#"{"id":"roof","x":0,"y":0,"width":100,"height":100,"elevation":5}"#,
        )
        .unwrap();
        assert!(!tile.also_fade);
        assert_eq!(tile.occlusion, OcclusionMode::Vision);
        assert_eq!(tile.occlusion, Tile::new("x", 0.0, 0.0, 1.0, 1.0, 0.0).occlusion);
    }
}
