//! The under-tile predicate against a 100x100 roof at elevation 5.

use roof_fade_core::{
    geometry::is_under_tile,
    scene::{Tile, Token},
};

fn roof() -> Tile {
    Tile::new("roof", 0.0, 0.0, 100.0, 100.0, 5.0)
}

#[test]
fn centered_token_below_roof_is_under() {
    let token = Token::centered_at("hero", 50.0, 50.0, 100.0, 0.0);
    assert!(is_under_tile(&roof(), &token));
}

#[test]
fn token_beside_roof_is_not_under() {
    let token = Token::centered_at("hero", 150.0, 50.0, 100.0, 0.0);
    assert!(!is_under_tile(&roof(), &token));
}

#[test]
fn token_level_with_roof_is_not_under() {
    let token = Token::centered_at("hero", 50.0, 50.0, 100.0, 5.0);
    assert!(!is_under_tile(&roof(), &token));
}

#[test]
fn bottom_right_corner_counts_as_inside() {
    let token = Token::centered_at("hero", 100.0, 100.0, 100.0, 4.9);
    assert!(is_under_tile(&roof(), &token));
}

#[test]
fn center_not_overlap_decides() {
    // Bounding box overlaps the roof by 40 units, but the center is outside.
    let token = Token::new("hero", 60.0, 0.0, 100.0, 100.0, 0.0);
    assert_eq!(token.center(), (110.0, 50.0));
    assert!(!is_under_tile(&roof(), &token));
}

#[test]
fn offset_roof_uses_its_own_origin() {
    let roof = Tile::new("roof", 200.0, 300.0, 50.0, 50.0, 20.0);
    let inside = Token::centered_at("a", 225.0, 325.0, 10.0, 0.0);
    let before = Token::centered_at("b", 199.0, 325.0, 10.0, 0.0);
    assert!(is_under_tile(&roof, &inside));
    assert!(!is_under_tile(&roof, &before));
}
