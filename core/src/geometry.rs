//! The "is this token under that tile" predicate.
//!
//! Point containment only: the token's center against the tile's
//! rectangle, edges inclusive, no rotation. A token counts as under a
//! tile only when it is also strictly lower than the tile.

use crate::scene::{Bounds, Tile, Token};

/// Intermediate values of one predicate evaluation, kept so the
/// evaluator can log them when the `debug-mode` setting is on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnderTileCheck {
    pub bounds:          Bounds,
    pub center:          (f64, f64),
    pub tile_elevation:  f64,
    pub token_elevation: f64,
    pub within_bounds:   bool,
}

impl UnderTileCheck {
    pub fn is_under(&self) -> bool {
        self.within_bounds && self.token_elevation < self.tile_elevation
    }
}

pub fn check_under_tile(tile: &Tile, token: &Token) -> UnderTileCheck {
    let bounds = tile.bounds();
    let center = token.center();
    UnderTileCheck {
        bounds,
        center,
        tile_elevation:  tile.elevation,
        token_elevation: token.elevation,
        // NaN anywhere compares false, which reads as "not under".
        within_bounds:   bounds.contains(center.0, center.1),
    }
}

/// True iff the token's center lies inside the tile (inclusive) and the
/// token is strictly below the tile's elevation.
pub fn is_under_tile(tile: &Tile, token: &Token) -> bool {
    check_under_tile(tile, token).is_under()
}
