//! Events in and out of the rule layer.
//!
//! `HostEvent` is what the host's dispatcher delivers; `FadeEvent` is
//! what hooks report back. Variants are appended, never reordered.

use crate::{
    evaluator::OcclusionDecision,
    scene::{Tile, Token},
    settings::SettingKey,
    types::{SceneId, TileId, TokenId},
};
use serde::{Deserialize, Serialize};

/// The kinds of host event a hook can subscribe to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HookKind {
    TileRendered,
    TileUpdated,
    TileDeleted,
    SceneTornDown,
    TokenControlled,
    TokenUpdated,
    TokenDeleted,
    SettingChanged,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    // ── Tiles ──────────────────────────────────────
    TileRendered { tile: Tile },
    TileUpdated { tile: Tile },
    TileDeleted { tile_id: TileId },

    // ── Scene ──────────────────────────────────────
    SceneTornDown,

    // ── Tokens ─────────────────────────────────────
    /// Selection toggled; `token.controlled` carries the new state.
    TokenControlled { token: Token },
    TokenUpdated { token: Token },
    TokenDeleted { token_id: TokenId },

    // ── Settings ───────────────────────────────────
    SettingChanged { key: SettingKey, value: bool },
}

impl HostEvent {
    pub fn kind(&self) -> HookKind {
        match self {
            Self::TileRendered { .. }    => HookKind::TileRendered,
            Self::TileUpdated { .. }     => HookKind::TileUpdated,
            Self::TileDeleted { .. }     => HookKind::TileDeleted,
            Self::SceneTornDown          => HookKind::SceneTornDown,
            Self::TokenControlled { .. } => HookKind::TokenControlled,
            Self::TokenUpdated { .. }    => HookKind::TokenUpdated,
            Self::TokenDeleted { .. }    => HookKind::TokenDeleted,
            Self::SettingChanged { .. }  => HookKind::SettingChanged,
        }
    }
}

/// Everything a hook reports while handling a host event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FadeEvent {
    TileTracked { tile_id: TileId },
    TileUntracked { tile_id: TileId },
    TokenTracked { token_id: TokenId },
    TokenUntracked { token_id: TokenId },
    TrackedSetsCleared { tiles: usize, tokens: usize },
    OcclusionEvaluated {
        /// The token whose position decided every tile.
        token_id:  TokenId,
        decisions: Vec<OcclusionDecision>,
    },
    TriggerIgnored { kind: HookKind, reason: String },
    /// The last tracked token was released; tracked tiles went back to VISION.
    OcclusionReset { decisions: Vec<OcclusionDecision> },
}

impl FadeEvent {
    /// Stable name for the event_type column of the event log.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::TileTracked { .. }        => "tile_tracked",
            Self::TileUntracked { .. }      => "tile_untracked",
            Self::TokenTracked { .. }       => "token_tracked",
            Self::TokenUntracked { .. }     => "token_untracked",
            Self::TrackedSetsCleared { .. } => "tracked_sets_cleared",
            Self::OcclusionEvaluated { .. } => "occlusion_evaluated",
            Self::TriggerIgnored { .. }     => "trigger_ignored",
            Self::OcclusionReset { .. }     => "occlusion_reset",
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub scene_id:   SceneId,
    /// Position of the host event that produced this entry.
    pub sequence:   u64,
    pub hook:       String,
    pub event_type: String,
    pub payload:    String, // JSON-serialized FadeEvent
}
