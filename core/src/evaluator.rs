//! Occlusion evaluation — decides FADE or VISION for each candidate tile.
//!
//! Only the FIRST token of the supplied sequence is consulted, for every
//! tile. A later token that happens to sit under a tile does not make it
//! fade. Callers control which token comes first through iteration order.

use crate::{
    error::FadeResult,
    geometry::check_under_tile,
    scene::{OcclusionMode, Tile, Token},
    types::TileId,
};
use serde::{Deserialize, Serialize};

/// A partial tile update, shaped like the host's `{"occlusion":{"mode":n}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TileUpdate {
    pub tile_id:   TileId,
    pub occlusion: OcclusionPatch,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OcclusionPatch {
    pub mode: OcclusionMode,
}

impl TileUpdate {
    pub fn occlusion(tile_id: impl Into<TileId>, mode: OcclusionMode) -> Self {
        Self {
            tile_id:   tile_id.into(),
            occlusion: OcclusionPatch { mode },
        }
    }

    pub fn mode(&self) -> OcclusionMode {
        self.occlusion.mode
    }

    /// The body the host's document update interface expects.
    pub fn to_host_json(&self) -> serde_json::Value {
        serde_json::json!({ "occlusion": { "mode": self.occlusion.mode.code() } })
    }
}

/// The host's tile update interface. Fire-and-forget from our side:
/// an `Err` is logged by the evaluator and otherwise ignored.
pub trait TileUpdater {
    fn update_tile(&mut self, update: &TileUpdate) -> FadeResult<()>;
}

/// Collects updates in memory. Useful for embedding and tests.
#[derive(Debug, Default)]
pub struct RecordingUpdater {
    pub updates: Vec<TileUpdate>,
}

impl RecordingUpdater {
    pub fn new() -> Self { Self::default() }

    pub fn last_mode(&self, tile_id: &str) -> Option<OcclusionMode> {
        self.updates
            .iter()
            .rev()
            .find(|u| u.tile_id == tile_id)
            .map(TileUpdate::mode)
    }
}

impl TileUpdater for RecordingUpdater {
    fn update_tile(&mut self, update: &TileUpdate) -> FadeResult<()> {
        self.updates.push(update.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EvalOptions {
    /// Log predicate inputs at info level instead of trace.
    pub debug: bool,
    /// Skip the write when the tile already has the decided mode.
    pub skip_redundant_writes: bool,
}

/// The outcome for one tile in one evaluation pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OcclusionDecision {
    pub tile_id: TileId,
    pub mode:    OcclusionMode,
    /// False when the write was suppressed or the host rejected it.
    pub written: bool,
}

/// Decide and write an occlusion mode for every tile.
///
/// Absent collections short-circuit before any work. An empty token
/// sequence also decides nothing, since there is no first token.
pub fn evaluate_occlusion(
    tiles: Option<&[Tile]>,
    tokens: Option<&[Token]>,
    updater: &mut dyn TileUpdater,
    opts: EvalOptions,
) -> Vec<OcclusionDecision> {
    let (Some(tiles), Some(tokens)) = (tiles, tokens) else {
        return vec![];
    };
    let Some(first) = tokens.first() else {
        return vec![];
    };

    let mut decisions = Vec::with_capacity(tiles.len());
    for tile in tiles {
        let check = check_under_tile(tile, first);
        if opts.debug {
            log::info!("tile={} token={} check={check:?}", tile.id, first.id);
        } else {
            log::trace!("tile={} token={} check={check:?}", tile.id, first.id);
        }

        let mode = if check.is_under() {
            OcclusionMode::Fade
        } else {
            OcclusionMode::Vision
        };

        let written = if opts.skip_redundant_writes && tile.occlusion == mode {
            false
        } else {
            set_occlusion_mode(updater, tile, mode)
        };

        decisions.push(OcclusionDecision {
            tile_id: tile.id.clone(),
            mode,
            written,
        });
    }
    decisions
}

fn set_occlusion_mode(updater: &mut dyn TileUpdater, tile: &Tile, mode: OcclusionMode) -> bool {
    let update = TileUpdate::occlusion(tile.id.clone(), mode);
    match updater.update_tile(&update) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("occlusion update for tile {} dropped: {e}", tile.id);
            false
        }
    }
}
