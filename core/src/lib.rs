pub mod config;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod event;
pub mod geometry;
pub mod hook;
pub mod occlusion_hook;
pub mod rng;
pub mod scenario;
pub mod scene;
pub mod settings;
pub mod store;
pub mod tile_config;
pub mod tracker;
pub mod types;
