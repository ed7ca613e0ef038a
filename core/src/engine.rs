//! The session-scoped controller for one scene.
//!
//! A FadeEngine is built when a scene is entered and dropped when it is
//! left. It owns every piece of state the rule layer keeps, so nothing
//! lives in process-wide statics.
//!
//! RULES:
//!   - dispatch() is the only entry point for host events.
//!   - Hooks subscribed to an event's kind run in registration order.
//!   - Handlers run to completion before the next event is dispatched.
//!   - Every emitted FadeEvent is appended to the event log, if attached.

use crate::{
    config::FadeConfig,
    error::FadeResult,
    evaluator::TileUpdater,
    event::{EventLogEntry, FadeEvent, HostEvent},
    hook::{FadeHook, HookContext},
    occlusion_hook::OcclusionHook,
    settings::{SettingsStore, TileFlag},
    store::FadeStore,
    tracker::TrackedSets,
    types::SceneId,
};

pub struct FadeEngine {
    pub scene_id: SceneId,
    settings:     Box<dyn SettingsStore>,
    updater:      Box<dyn TileUpdater>,
    hooks:        Vec<Box<dyn FadeHook>>,
    event_log:    Option<FadeStore>,
    sequence:     u64,
}

impl FadeEngine {
    pub fn new(
        scene_id: SceneId,
        settings: Box<dyn SettingsStore>,
        updater: Box<dyn TileUpdater>,
    ) -> Self {
        Self {
            scene_id,
            settings,
            updater,
            hooks: Vec::new(),
            event_log: None,
            sequence: 0,
        }
    }

    /// Build a session with the occlusion hook registered.
    /// Call this instead of new() + manual register() calls.
    ///
    /// Only a GM may update tiles, so for any other acting user the
    /// session is built with no hooks and every dispatch is a no-op.
    pub fn enter_scene(
        scene_id: SceneId,
        config: FadeConfig,
        settings: Box<dyn SettingsStore>,
        updater: Box<dyn TileUpdater>,
    ) -> Self {
        let mut engine = FadeEngine::new(scene_id, settings, updater);
        if config.acting_user_is_gm {
            engine.register(Box::new(OcclusionHook::new(config)));
            log::debug!("entered scene {}", engine.scene_id);
        } else {
            log::info!("entered scene {} as a player: occlusion hook not registered", engine.scene_id);
        }
        engine
    }

    /// Attach a store that receives every emitted event.
    pub fn with_event_log(mut self, store: FadeStore) -> Self {
        self.event_log = Some(store);
        self
    }

    pub fn register(&mut self, hook: Box<dyn FadeHook>) {
        self.hooks.push(hook);
    }

    /// Deliver one host event to every subscribed hook.
    pub fn dispatch(&mut self, event: &HostEvent) -> FadeResult<Vec<FadeEvent>> {
        self.sequence += 1;
        let kind = event.kind();

        // The host has already persisted the new value; mirror it so
        // hooks read the same thing the host does.
        // Same for the tile's flag: the snapshot is the document, so the
        // store never disagrees with what the hooks are handed.
        match event {
            HostEvent::SettingChanged { key, value } => {
                self.settings.set_setting(*key, *value)?;
            }
            HostEvent::TileRendered { tile } | HostEvent::TileUpdated { tile } => {
                self.settings.set_tile_flag(&tile.id, TileFlag::AlsoFade, tile.also_fade)?;
            }
            HostEvent::TileDeleted { tile_id } => {
                self.settings.set_tile_flag(tile_id, TileFlag::AlsoFade, false)?;
            }
            _ => {}
        }

        let mut emitted = Vec::new();
        for hook in &mut self.hooks {
            if !hook.subscriptions().contains(&kind) {
                continue;
            }
            let mut ctx = HookContext {
                scene_id: &self.scene_id,
                settings: self.settings.as_mut(),
                updater:  self.updater.as_mut(),
            };
            let events = hook.handle(event, &mut ctx)?;

            if let Some(store) = &self.event_log {
                for e in &events {
                    let entry = EventLogEntry {
                        id:         None,
                        scene_id:   self.scene_id.clone(),
                        sequence:   self.sequence,
                        hook:       hook.name().to_string(),
                        event_type: e.type_name().to_string(),
                        payload:    serde_json::to_string(e)?,
                    };
                    store.append_event(&entry)?;
                }
            }
            emitted.extend(events);
        }
        Ok(emitted)
    }

    /// Number of host events dispatched so far.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn settings(&self) -> &dyn SettingsStore {
        self.settings.as_ref()
    }

    pub fn settings_mut(&mut self) -> &mut dyn SettingsStore {
        self.settings.as_mut()
    }

    /// The occlusion hook's tracked sets, if it is registered.
    pub fn tracked(&self) -> Option<&TrackedSets> {
        self.hooks.iter().find_map(|hook| {
            hook.as_any()
                .downcast_ref::<OcclusionHook>()
                .map(|h| &h.tracked)
        })
    }

    pub fn hook_names(&self) -> Vec<&'static str> {
        self.hooks.iter().map(|h| h.name()).collect()
    }

    /// Leave the scene. Returns the event log store, if one was attached.
    pub fn exit_scene(self) -> Option<FadeStore> {
        log::debug!("left scene {} after {} events", self.scene_id, self.sequence);
        self.event_log
    }
}
