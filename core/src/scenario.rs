//! Seeded random scenes for the scene runner and for soak tests.
//!
//! A scenario lays out a few roof tiles at different elevations, a
//! handful of tokens (some not owned by the acting user), and then
//! produces a stream of host events: selections, moves, flag flips.

use crate::{
    event::HostEvent,
    rng::SceneRng,
    scene::{OcclusionMode, Tile, Token},
};

const GRID: f64 = 100.0;
const SCENE_CELLS: u64 = 30;

/// Stable stream indices. Append only.
#[repr(u64)]
enum Stream {
    Layout = 0,
    Events = 1,
}

#[derive(Debug, Clone, Copy)]
pub struct ScenarioParams {
    pub tiles:  usize,
    pub tokens: usize,
    /// Chance a generated tile starts with `also_fade` on.
    pub fade_share: f64,
    /// Chance a generated token is owned by the acting user.
    pub owned_share: f64,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self { tiles: 6, tokens: 4, fade_share: 0.6, owned_share: 0.75 }
    }
}

pub struct Scenario {
    pub tiles:  Vec<Tile>,
    pub tokens: Vec<Token>,
    events_rng: SceneRng,
}

impl Scenario {
    pub fn generate(seed: u64, params: ScenarioParams) -> Self {
        let mut rng = SceneRng::new(seed, Stream::Layout as u64);

        let tiles = (0..params.tiles)
            .map(|_| {
                let w = (2 + rng.next_u64_below(6)) as f64 * GRID;
                let h = (2 + rng.next_u64_below(6)) as f64 * GRID;
                let x = rng.next_u64_below(SCENE_CELLS - 8) as f64 * GRID;
                let y = rng.next_u64_below(SCENE_CELLS - 8) as f64 * GRID;
                let elevation = (1 + rng.next_u64_below(4)) as f64 * 10.0;
                let also_fade = rng.chance(params.fade_share);
                Tile::new(rng.uuid().to_string(), x, y, w, h, elevation)
                    .with_occlusion(OcclusionMode::Vision)
                    .with_also_fade(also_fade)
            })
            .collect();

        let tokens = (0..params.tokens)
            .map(|_| {
                let size = (1 + rng.next_u64_below(2)) as f64 * GRID;
                let x = rng.next_u64_below(SCENE_CELLS) as f64 * GRID;
                let y = rng.next_u64_below(SCENE_CELLS) as f64 * GRID;
                let elevation = rng.next_u64_below(3) as f64 * 10.0;
                Token::new(rng.uuid().to_string(), x, y, size, size, elevation)
                    .owned(rng.chance(params.owned_share))
            })
            .collect();

        Self {
            tiles,
            tokens,
            events_rng: SceneRng::new(seed, Stream::Events as u64),
        }
    }

    /// The render pass the host fires when the scene is drawn.
    pub fn initial_events(&self) -> Vec<HostEvent> {
        self.tiles
            .iter()
            .map(|tile| HostEvent::TileRendered { tile: tile.clone() })
            .collect()
    }

    /// Draw the next host event and apply it to the scene's own state.
    pub fn next_event(&mut self) -> HostEvent {
        let roll = self.events_rng.next_f64();
        if roll < 0.55 || self.tiles.is_empty() {
            self.move_token()
        } else if roll < 0.9 {
            self.toggle_selection()
        } else {
            self.flip_flag()
        }
    }

    fn pick(&mut self, len: usize) -> usize {
        self.events_rng.next_u64_below(len as u64) as usize
    }

    fn move_token(&mut self) -> HostEvent {
        if self.tokens.is_empty() {
            return self.flip_flag();
        }
        let i = self.pick(self.tokens.len());
        let dx = self.events_rng.range(-2.0, 2.0).round() * GRID;
        let dy = self.events_rng.range(-2.0, 2.0).round() * GRID;
        let limit = SCENE_CELLS as f64 * GRID;
        let token = &mut self.tokens[i];
        token.x = (token.x + dx).clamp(0.0, limit);
        token.y = (token.y + dy).clamp(0.0, limit);
        HostEvent::TokenUpdated { token: token.clone() }
    }

    fn toggle_selection(&mut self) -> HostEvent {
        if self.tokens.is_empty() {
            return self.flip_flag();
        }
        let i = self.pick(self.tokens.len());
        let token = &mut self.tokens[i];
        token.controlled = !token.controlled;
        HostEvent::TokenControlled { token: token.clone() }
    }

    fn flip_flag(&mut self) -> HostEvent {
        if self.tiles.is_empty() {
            return HostEvent::SceneTornDown;
        }
        let i = self.pick(self.tiles.len());
        let tile = &mut self.tiles[i];
        tile.also_fade = !tile.also_fade;
        HostEvent::TileUpdated { tile: tile.clone() }
    }
}
