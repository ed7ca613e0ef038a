//! The two tracked sets: tiles opted into fading, and tokens the acting
//! user currently controls.
//!
//! Membership is unique by id. Snapshots are replaced in place when the
//! host re-delivers a member, so evaluation always sees current geometry.
//! Tokens keep insertion order; the first tracked token is the one the
//! evaluator consults.

use crate::scene::{OcclusionMode, Tile, Token};

#[derive(Debug, Default, Clone)]
pub struct TrackedSets {
    tiles:  Vec<Tile>,
    tokens: Vec<Token>,
}

impl TrackedSets {
    pub fn new() -> Self { Self::default() }

    pub fn tiles(&self) -> &[Tile] { &self.tiles }
    pub fn tokens(&self) -> &[Token] { &self.tokens }

    pub fn has_tile(&self, id: &str) -> bool {
        self.tiles.iter().any(|t| t.id == id)
    }

    pub fn has_token(&self, id: &str) -> bool {
        self.tokens.iter().any(|t| t.id == id)
    }

    /// Re-derive a tile's membership from its `also_fade` flag.
    /// Returns true only when membership actually changed.
    pub fn sync_tile(&mut self, tile: &Tile) -> bool {
        let pos = self.tiles.iter().position(|t| t.id == tile.id);
        match (pos, tile.also_fade) {
            (Some(i), true) => {
                self.tiles[i] = tile.clone();
                false
            }
            (None, true) => {
                self.tiles.push(tile.clone());
                true
            }
            (Some(i), false) => {
                self.tiles.remove(i);
                true
            }
            (None, false) => false,
        }
    }

    pub fn remove_tile(&mut self, id: &str) -> bool {
        let before = self.tiles.len();
        self.tiles.retain(|t| t.id != id);
        self.tiles.len() != before
    }

    /// Returns true if the token was not tracked before.
    pub fn track_token(&mut self, token: &Token) -> bool {
        if self.refresh_token(token) {
            return false;
        }
        self.tokens.push(token.clone());
        true
    }

    pub fn untrack_token(&mut self, id: &str) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|t| t.id != id);
        self.tokens.len() != before
    }

    /// Replace the snapshot of an already tracked token.
    /// Returns false if the token is not tracked.
    pub fn refresh_token(&mut self, token: &Token) -> bool {
        match self.tokens.iter_mut().find(|t| t.id == token.id) {
            Some(slot) => {
                *slot = token.clone();
                true
            }
            None => false,
        }
    }

    /// Remember the mode last written to a tracked tile.
    pub fn record_mode(&mut self, tile_id: &str, mode: OcclusionMode) {
        if let Some(tile) = self.tiles.iter_mut().find(|t| t.id == tile_id) {
            tile.occlusion = mode;
        }
    }

    /// Both sets hold at least one member.
    pub fn is_ready(&self) -> bool {
        !self.tiles.is_empty() && !self.tokens.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty() && self.tokens.is_empty()
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
        self.tokens.clear();
    }
}
