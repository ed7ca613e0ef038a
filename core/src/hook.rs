//! Hook trait and the context hooks run in.
//!
//! RULE: Every handler of host events implements FadeHook.
//! The engine calls handle() on each hook subscribed to the event's
//! kind, in registration order. Hooks never call each other.

use crate::{
    error::FadeResult,
    evaluator::TileUpdater,
    event::{FadeEvent, HookKind, HostEvent},
    settings::SettingsStore,
};
use std::any::Any;

/// What a hook may touch while handling one event.
pub struct HookContext<'a> {
    pub scene_id: &'a str,
    pub settings: &'a mut dyn SettingsStore,
    pub updater:  &'a mut dyn TileUpdater,
}

/// The contract every hook must fulfill.
pub trait FadeHook {
    /// Unique stable name for this hook.
    fn name(&self) -> &'static str;

    /// Event kinds this hook wants delivered.
    fn subscriptions(&self) -> &'static [HookKind];

    /// Called once per delivered host event.
    ///
    /// Returns the events this hook wants recorded.
    fn handle(&mut self, event: &HostEvent, ctx: &mut HookContext<'_>) -> FadeResult<Vec<FadeEvent>>;

    /// For downcasting in tests and tooling only.
    fn as_any(&self) -> &dyn Any;
}
