//! scene-runner: headless driver for the roof fade rule layer.
//!
//! Usage:
//!   scene-runner --seed 12345 --steps 500 --db run.db
//!   scene-runner --config fade.json --ipc-mode < events.jsonl

use anyhow::Result;
use roof_fade_core::{
    config::FadeConfig,
    engine::FadeEngine,
    event::{FadeEvent, HostEvent},
    scenario::{Scenario, ScenarioParams},
    store::FadeStore,
};
use std::env;
use std::io::{self, BufRead, Write};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let steps = parse_arg(&args, "--steps", 200u64);
    let tiles = parse_arg(&args, "--tiles", 6usize);
    let tokens = parse_arg(&args, "--tokens", 4usize);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = string_arg(&args, "--db").unwrap_or(":memory:");
    let config = match string_arg(&args, "--config") {
        Some(path) => FadeConfig::load(path)?,
        None => FadeConfig::default(),
    };

    let scene_id = format!("scene-{}", uuid::Uuid::new_v4());

    if !ipc_mode {
        println!("Roof Vision Fade — scene-runner");
        println!("  seed:      {seed}");
        println!("  steps:     {steps}");
        println!("  db:        {db}");
        println!("  scene:     {scene_id}");
        println!();
    }

    // For :memory: use SQLite shared-memory URI so the settings, updater
    // and event log connections all see the same database.
    let db_effective: String = if db == ":memory:" {
        format!("file:fade_{}?mode=memory&cache=shared", uuid::Uuid::new_v4().simple())
    } else {
        db.to_string()
    };
    let store = FadeStore::open(&db_effective)?;
    store.migrate()?;

    let mut engine = FadeEngine::enter_scene(
        scene_id.clone(),
        config,
        Box::new(store.reopen()?),
        Box::new(store.reopen()?),
    )
    .with_event_log(store.reopen()?);

    if ipc_mode {
        run_ipc_loop(&mut engine)?;
    } else {
        let params = ScenarioParams { tiles, tokens, ..Default::default() };
        let mut scenario = Scenario::generate(seed, params);
        run_scenario(&mut engine, &mut scenario, steps)?;
        print_summary(&engine, &scenario, &store, &scene_id)?;
    }

    engine.dispatch(&HostEvent::SceneTornDown)?;
    engine.exit_scene();
    Ok(())
}

fn run_ipc_loop(engine: &mut FadeEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let event: HostEvent = match serde_json::from_str(&buffer) {
            Ok(e) => e,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        for emitted in engine.dispatch(&event)? {
            writeln!(stdout, "{}", serde_json::to_string(&emitted)?)?;
        }
        stdout.flush()?;
    }
    Ok(())
}

fn run_scenario(engine: &mut FadeEngine, scenario: &mut Scenario, steps: u64) -> Result<()> {
    for event in scenario.initial_events() {
        engine.dispatch(&event)?;
    }
    for _ in 0..steps {
        let event = scenario.next_event();
        let emitted = engine.dispatch(&event)?;
        for e in &emitted {
            if let FadeEvent::OcclusionEvaluated { token_id, decisions } = e {
                log::debug!("token {token_id} decided {} tiles", decisions.len());
            }
        }
    }
    Ok(())
}

fn print_summary(
    engine: &FadeEngine,
    scenario: &Scenario,
    store: &FadeStore,
    scene_id: &str,
) -> Result<()> {
    let evaluations = store.event_count(scene_id, "occlusion_evaluated")?;
    let resets = store.event_count(scene_id, "occlusion_reset")?;
    let ignored = store.event_count(scene_id, "trigger_ignored")?;
    let writes = store.total_tile_updates()?;

    println!("=== RUN SUMMARY ===");
    println!("  scene_id:        {scene_id}");
    println!("  host events:     {}", engine.sequence());
    println!("  evaluations:     {evaluations}");
    println!("  resets:          {resets}");
    println!("  ignored:         {ignored}");
    println!("  tile writes:     {writes}");
    if let Some(tracked) = engine.tracked() {
        println!("  tracked tiles:   {}", tracked.tiles().len());
        println!("  tracked tokens:  {}", tracked.tokens().len());
    }

    println!();
    println!("=== TILES ===");
    for tile in &scenario.tiles {
        let mode = store
            .tile_mode(&tile.id)?
            .map(|m| format!("{m:?}"))
            .unwrap_or_else(|| "untouched".into());
        println!(
            "  {} | elev {:>4} | also_fade {:<5} | {}",
            tile.id, tile.elevation, tile.also_fade, mode
        );
    }
    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
