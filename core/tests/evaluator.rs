//! Occlusion evaluation: first token only, one write per tile.

use roof_fade_core::{
    evaluator::{evaluate_occlusion, EvalOptions, RecordingUpdater, TileUpdate, TileUpdater},
    error::{FadeError, FadeResult},
    scene::{OcclusionMode, Tile, Token},
};

fn tile_a() -> Tile {
    Tile::new("a", 0.0, 0.0, 100.0, 100.0, 10.0).with_also_fade(true)
}

fn tile_b() -> Tile {
    Tile::new("b", 500.0, 0.0, 100.0, 100.0, 10.0).with_also_fade(true)
}

#[test]
fn empty_tiles_write_nothing() {
    let mut updater = RecordingUpdater::new();
    let tokens = vec![Token::centered_at("t", 50.0, 50.0, 10.0, 0.0)];

    let decisions = evaluate_occlusion(Some(&[][..]), Some(tokens.as_slice()), &mut updater, EvalOptions::default());

    assert!(decisions.is_empty());
    assert!(updater.updates.is_empty());
}

#[test]
fn absent_collections_short_circuit() {
    let mut updater = RecordingUpdater::new();
    let tiles = vec![tile_a()];
    let tokens = vec![Token::centered_at("t", 50.0, 50.0, 10.0, 0.0)];

    assert!(evaluate_occlusion(None, Some(tokens.as_slice()), &mut updater, EvalOptions::default()).is_empty());
    assert!(evaluate_occlusion(Some(tiles.as_slice()), None, &mut updater, EvalOptions::default()).is_empty());
    assert!(evaluate_occlusion(Some(tiles.as_slice()), Some(&[][..]), &mut updater, EvalOptions::default()).is_empty());
    assert!(updater.updates.is_empty());
}

#[test]
fn only_the_first_token_decides_every_tile() {
    let mut updater = RecordingUpdater::new();
    let tiles = vec![tile_a(), tile_b()];
    // First token sits under A; second would sit under B but is never consulted.
    let tokens = vec![
        Token::centered_at("first", 50.0, 50.0, 10.0, 0.0),
        Token::centered_at("second", 550.0, 50.0, 10.0, 0.0),
    ];

    let decisions = evaluate_occlusion(Some(tiles.as_slice()), Some(tokens.as_slice()), &mut updater, EvalOptions::default());

    assert_eq!(decisions.len(), 2);
    assert_eq!(updater.updates.len(), 2);
    assert_eq!(updater.last_mode("a"), Some(OcclusionMode::Fade));
    assert_eq!(updater.last_mode("b"), Some(OcclusionMode::Vision));
}

#[test]
fn every_tile_gets_exactly_one_write() {
    let mut updater = RecordingUpdater::new();
    let tiles = vec![tile_a(), tile_b()];
    let tokens = vec![Token::centered_at("t", 5000.0, 5000.0, 10.0, 0.0)];

    evaluate_occlusion(Some(tiles.as_slice()), Some(tokens.as_slice()), &mut updater, EvalOptions::default());

    assert_eq!(
        updater.updates,
        vec![
            TileUpdate::occlusion("a", OcclusionMode::Vision),
            TileUpdate::occlusion("b", OcclusionMode::Vision),
        ]
    );
}

#[test]
fn redundant_writes_can_be_skipped() {
    let mut updater = RecordingUpdater::new();
    let tiles = vec![tile_a().with_occlusion(OcclusionMode::Vision), tile_b().with_occlusion(OcclusionMode::Vision)];
    let tokens = vec![Token::centered_at("t", 50.0, 50.0, 10.0, 0.0)];
    let opts = EvalOptions { skip_redundant_writes: true, ..Default::default() };

    let decisions = evaluate_occlusion(Some(tiles.as_slice()), Some(tokens.as_slice()), &mut updater, opts);

    assert_eq!(updater.updates, vec![TileUpdate::occlusion("a", OcclusionMode::Fade)]);
    assert!(decisions[0].written);
    assert!(!decisions[1].written);
    assert_eq!(decisions[1].mode, OcclusionMode::Vision);
}

struct RejectingUpdater {
    attempts: usize,
}

impl TileUpdater for RejectingUpdater {
    fn update_tile(&mut self, update: &TileUpdate) -> FadeResult<()> {
        self.attempts += 1;
        Err(FadeError::UpdateRejected {
            tile_id: update.tile_id.clone(),
            reason:  "read-only".into(),
        })
    }
}

#[test]
fn failed_writes_are_swallowed_without_retry() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut updater = RejectingUpdater { attempts: 0 };
    let tiles = vec![tile_a(), tile_b()];
    let tokens = vec![Token::centered_at("t", 50.0, 50.0, 10.0, 0.0)];

    let decisions = evaluate_occlusion(Some(tiles.as_slice()), Some(tokens.as_slice()), &mut updater, EvalOptions::default());

    assert_eq!(updater.attempts, 2);
    assert!(decisions.iter().all(|d| !d.written));
    assert_eq!(decisions[0].mode, OcclusionMode::Fade);
}
