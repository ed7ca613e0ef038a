//! Namespaced settings and per-tile flags.
//!
//! The host persists these; this module only names them, supplies
//! defaults, and defines the storage seam.

use crate::{
    error::{FadeError, FadeResult},
    types::TileId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const MODULE_NAME: &str = "roof-occlusion-vision-fade";

/// World-scoped boolean settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SettingKey {
    #[serde(rename = "enabled")]
    Enabled,
    #[serde(rename = "debug-mode")]
    DebugMode,
}

impl SettingKey {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Enabled   => "enabled",
            Self::DebugMode => "debug-mode",
        }
    }

    /// `<module>.<key>`, the form the host stores it under.
    pub fn namespaced(&self) -> String {
        format!("{MODULE_NAME}.{}", self.key())
    }

    pub fn default_value(&self) -> bool {
        match self {
            Self::Enabled   => true,
            Self::DebugMode => false,
        }
    }

    pub fn parse(key: &str) -> FadeResult<Self> {
        let bare = key
            .strip_prefix(MODULE_NAME)
            .and_then(|k| k.strip_prefix('.'))
            .unwrap_or(key);
        match bare {
            "enabled"    => Ok(Self::Enabled),
            "debug-mode" => Ok(Self::DebugMode),
            _ => Err(FadeError::UnknownSetting { key: key.to_string() }),
        }
    }
}

/// Per-tile flags.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TileFlag {
    #[serde(rename = "alsoFade")]
    AlsoFade,
}

impl TileFlag {
    pub fn key(&self) -> &'static str {
        match self {
            Self::AlsoFade => "alsoFade",
        }
    }

    pub fn namespaced(&self) -> String {
        format!("flags.{MODULE_NAME}.{}", self.key())
    }
}

/// The host's flag storage interface.
pub trait SettingsStore {
    /// Unset settings read as their default.
    fn setting(&self, key: SettingKey) -> FadeResult<bool>;
    fn set_setting(&mut self, key: SettingKey, value: bool) -> FadeResult<()>;

    /// Unset flags read as false.
    fn tile_flag(&self, tile_id: &str, flag: TileFlag) -> FadeResult<bool>;
    fn set_tile_flag(&mut self, tile_id: &str, flag: TileFlag, value: bool) -> FadeResult<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemorySettings {
    settings: HashMap<SettingKey, bool>,
    flags:    HashMap<(TileId, TileFlag), bool>,
}

impl MemorySettings {
    pub fn new() -> Self { Self::default() }

    pub fn with(mut self, key: SettingKey, value: bool) -> Self {
        self.settings.insert(key, value);
        self
    }
}

impl SettingsStore for MemorySettings {
    fn setting(&self, key: SettingKey) -> FadeResult<bool> {
        Ok(self.settings.get(&key).copied().unwrap_or_else(|| key.default_value()))
    }

    fn set_setting(&mut self, key: SettingKey, value: bool) -> FadeResult<()> {
        self.settings.insert(key, value);
        Ok(())
    }

    fn tile_flag(&self, tile_id: &str, flag: TileFlag) -> FadeResult<bool> {
        Ok(self.flags.get(&(tile_id.to_string(), flag)).copied().unwrap_or(false))
    }

    fn set_tile_flag(&mut self, tile_id: &str, flag: TileFlag, value: bool) -> FadeResult<()> {
        self.flags.insert((tile_id.to_string(), flag), value);
        Ok(())
    }
}
