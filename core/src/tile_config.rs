//! The "also fade" control on the host's tile configuration form.
//!
//! The checkbox is only offered while the tile's occlusion mode is
//! VISION. Switching the form to any other mode unticks it before save,
//! so a tile can never be saved with `alsoFade` on and a non-VISION mode.

use crate::{
    error::FadeResult,
    scene::{OcclusionMode, Tile},
    settings::{SettingsStore, TileFlag},
};

#[derive(Debug, Clone, PartialEq)]
pub struct TileConfigForm {
    pub tile_id:        String,
    pub occlusion_mode: OcclusionMode,
    pub also_fade:      bool,
}

impl TileConfigForm {
    /// Open the form for a tile, reading the stored flag.
    pub fn open(tile: &Tile, settings: &dyn SettingsStore) -> FadeResult<Self> {
        Ok(Self {
            tile_id:        tile.id.clone(),
            occlusion_mode: tile.occlusion,
            also_fade:      settings.tile_flag(&tile.id, TileFlag::AlsoFade)?,
        })
    }

    pub fn also_fade_visible(&self) -> bool {
        self.occlusion_mode == OcclusionMode::Vision
    }

    pub fn select_mode(&mut self, mode: OcclusionMode) {
        self.occlusion_mode = mode;
        if mode != OcclusionMode::Vision {
            self.also_fade = false;
        }
    }

    /// Tick or untick the checkbox. Ignored while it is hidden.
    pub fn set_also_fade(&mut self, checked: bool) {
        if self.also_fade_visible() {
            self.also_fade = checked;
        }
    }

    /// Persist the flag and return the tile as the host would re-render it.
    pub fn submit(&self, tile: &Tile, settings: &mut dyn SettingsStore) -> FadeResult<Tile> {
        settings.set_tile_flag(&self.tile_id, TileFlag::AlsoFade, self.also_fade)?;
        Ok(tile
            .clone()
            .with_occlusion(self.occlusion_mode)
            .with_also_fade(self.also_fade))
    }
}
