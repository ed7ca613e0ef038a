//! The tracked-set manager: keeps the tracked sets in step with host
//! events and re-runs the evaluator when they change.
//!
//! TRIGGERS:
//!   tile rendered / updated  → re-derive tile membership from `also_fade`
//!   tile deleted             → drop the tile
//!   scene torn down          → clear both sets (even when disabled)
//!   token controlled on      → track the token, evaluate
//!   token controlled off     → untrack the token, evaluate
//!   token updated            → refresh snapshot, evaluate if both sets non-empty
//!   token deleted            → as controlled off
//!   setting changed          → apply the disable policy
//!
//! Every evaluation passes the whole tracked sets, not just the member
//! that changed. All other triggers are no-ops while `enabled` is off.

use crate::{
    config::{DisablePolicy, FadeConfig},
    error::FadeResult,
    evaluator::{evaluate_occlusion, EvalOptions, OcclusionDecision, TileUpdate},
    event::{FadeEvent, HookKind, HostEvent},
    hook::{FadeHook, HookContext},
    scene::{OcclusionMode, Tile, Token},
    settings::{SettingKey, SettingsStore},
    tracker::TrackedSets,
};

pub const OCCLUSION_HOOK: &str = "occlusion";

const SUBSCRIPTIONS: &[HookKind] = &[
    HookKind::TileRendered,
    HookKind::TileUpdated,
    HookKind::TileDeleted,
    HookKind::SceneTornDown,
    HookKind::TokenControlled,
    HookKind::TokenUpdated,
    HookKind::TokenDeleted,
    HookKind::SettingChanged,
];

pub struct OcclusionHook {
    pub tracked: TrackedSets,
    config:      FadeConfig,
}

impl OcclusionHook {
    pub fn new(config: FadeConfig) -> Self {
        Self { tracked: TrackedSets::new(), config }
    }

    fn on_tile(&mut self, tile: &Tile) -> Vec<FadeEvent> {
        if !self.tracked.sync_tile(tile) {
            return vec![];
        }
        let tile_id = tile.id.clone();
        if tile.also_fade {
            log::debug!("tracking tile {tile_id}");
            vec![FadeEvent::TileTracked { tile_id }]
        } else {
            log::debug!("untracking tile {tile_id}");
            vec![FadeEvent::TileUntracked { tile_id }]
        }
    }

    fn on_tile_deleted(&mut self, tile_id: &str) -> Vec<FadeEvent> {
        if self.tracked.remove_tile(tile_id) {
            log::debug!("tile {tile_id} deleted while tracked");
            vec![FadeEvent::TileUntracked { tile_id: tile_id.to_string() }]
        } else {
            vec![]
        }
    }

    fn on_teardown(&mut self) -> Vec<FadeEvent> {
        let tiles = self.tracked.tiles().len();
        let tokens = self.tracked.tokens().len();
        self.tracked.clear();
        log::debug!("scene torn down: dropped {tiles} tiles, {tokens} tokens");
        vec![FadeEvent::TrackedSetsCleared { tiles, tokens }]
    }

    fn on_controlled(
        &mut self,
        token: &Token,
        ctx: &mut HookContext<'_>,
    ) -> FadeResult<Vec<FadeEvent>> {
        if !token.controlled {
            return self.release(&token.id, ctx);
        }
        if self.config.require_ownership && !token.is_owner {
            return Ok(vec![FadeEvent::TriggerIgnored {
                kind:   HookKind::TokenControlled,
                reason: format!("token {} is not owned by the acting user", token.id),
            }]);
        }

        let mut events = vec![];
        if self.tracked.track_token(token) {
            log::debug!("tracking token {}", token.id);
            events.push(FadeEvent::TokenTracked { token_id: token.id.clone() });
        }
        events.extend(self.evaluate(ctx)?);
        Ok(events)
    }

    fn release(&mut self, token_id: &str, ctx: &mut HookContext<'_>) -> FadeResult<Vec<FadeEvent>> {
        let mut events = vec![];
        if self.tracked.untrack_token(token_id) {
            log::debug!("untracking token {token_id}");
            events.push(FadeEvent::TokenUntracked { token_id: token_id.to_string() });
            if self.tracked.tokens().is_empty() && self.config.reset_on_release {
                events.extend(self.reset(ctx)?);
            }
        }
        events.extend(self.evaluate(ctx)?);
        Ok(events)
    }

    fn on_token_updated(&mut self, token: &Token, ctx: &mut HookContext<'_>) -> FadeResult<Vec<FadeEvent>> {
        self.tracked.refresh_token(token);
        if !self.tracked.is_ready() {
            return Ok(vec![]);
        }
        self.evaluate(ctx)
    }

    fn on_setting(&mut self, key: SettingKey, value: bool) -> Vec<FadeEvent> {
        if key != SettingKey::Enabled || value {
            return vec![];
        }
        match self.config.disable_policy {
            DisablePolicy::Clear  => self.on_teardown(),
            DisablePolicy::Retain => vec![],
        }
    }

    /// Run the evaluator over the whole tracked sets.
    fn evaluate(&mut self, ctx: &mut HookContext<'_>) -> FadeResult<Vec<FadeEvent>> {
        let Some(first) = self.tracked.tokens().first() else {
            return Ok(vec![]);
        };
        if self.tracked.tiles().is_empty() {
            return Ok(vec![]);
        }
        let token_id = first.id.clone();

        let opts = self.eval_options(&*ctx.settings)?;
        let decisions = evaluate_occlusion(
            Some(self.tracked.tiles()),
            Some(self.tracked.tokens()),
            ctx.updater,
            opts,
        );
        self.record(&decisions);
        log::debug!("evaluated {} tiles against token {token_id}", decisions.len());
        Ok(vec![FadeEvent::OcclusionEvaluated { token_id, decisions }])
    }

    /// Send every tracked tile back to VISION.
    fn reset(&mut self, ctx: &mut HookContext<'_>) -> FadeResult<Vec<FadeEvent>> {
        if self.tracked.tiles().is_empty() {
            return Ok(vec![]);
        }
        let skip = self.config.skip_redundant_writes;
        let decisions: Vec<_> = self
            .tracked
            .tiles()
            .iter()
            .map(|tile| {
                let mode = OcclusionMode::Vision;
                let written = if skip && tile.occlusion == mode {
                    false
                } else {
                    match ctx.updater.update_tile(&TileUpdate::occlusion(tile.id.clone(), mode)) {
                        Ok(()) => true,
                        Err(e) => {
                            log::warn!("occlusion reset for tile {} dropped: {e}", tile.id);
                            false
                        }
                    }
                };
                OcclusionDecision { tile_id: tile.id.clone(), mode, written }
            })
            .collect();
        self.record(&decisions);
        Ok(vec![FadeEvent::OcclusionReset { decisions }])
    }

    fn record(&mut self, decisions: &[OcclusionDecision]) {
        for d in decisions.iter().filter(|d| d.written) {
            self.tracked.record_mode(&d.tile_id, d.mode);
        }
    }

    /// Options for the next pass. `debug-mode` is read fresh every time.
    pub fn eval_options(&self, settings: &dyn SettingsStore) -> FadeResult<EvalOptions> {
        Ok(EvalOptions {
            debug: settings.setting(SettingKey::DebugMode)?,
            skip_redundant_writes: self.config.skip_redundant_writes,
        })
    }
}

impl Default for OcclusionHook {
    fn default() -> Self { Self::new(FadeConfig::default()) }
}

impl FadeHook for OcclusionHook {
    fn name(&self) -> &'static str { OCCLUSION_HOOK }

    fn subscriptions(&self) -> &'static [HookKind] { SUBSCRIPTIONS }

    fn handle(&mut self, event: &HostEvent, ctx: &mut HookContext<'_>) -> FadeResult<Vec<FadeEvent>> {
        match event {
            HostEvent::SceneTornDown => return Ok(self.on_teardown()),
            HostEvent::SettingChanged { key, value } => return Ok(self.on_setting(*key, *value)),
            _ => {}
        }

        if !ctx.settings.setting(SettingKey::Enabled)? {
            log::trace!("scene={} {:?} ignored: feature disabled", ctx.scene_id, event.kind());
            return Ok(vec![FadeEvent::TriggerIgnored {
                kind:   event.kind(),
                reason: "feature disabled".into(),
            }]);
        }

        match event {
            HostEvent::TileRendered { tile } | HostEvent::TileUpdated { tile } => Ok(self.on_tile(tile)),
            HostEvent::TileDeleted { tile_id } => Ok(self.on_tile_deleted(tile_id)),
            HostEvent::TokenControlled { token } => self.on_controlled(token, ctx),
            HostEvent::TokenUpdated { token } => self.on_token_updated(token, ctx),
            HostEvent::TokenDeleted { token_id } => self.release(token_id, ctx),
            HostEvent::SceneTornDown | HostEvent::SettingChanged { .. } => Ok(vec![]),
        }
    }

    fn as_any(&self) -> &dyn std::any::Any { self }
}
