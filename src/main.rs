//! Light-cycle arena entry point
//!
//! Native build runs a headless demo match: the demo autopilot drives the
//! controlled actor against the configured opponent until one of them
//! crashes, then prints the match summary as JSON.
//!
//! Usage: `lightcycle [settings.json] [--seed N] [--difficulty easy|medium|hard]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use lightcycle::consts::*;
    use lightcycle::sim::{GamePhase, GameState, SimEvent, TickInput, run_frame};
    use lightcycle::{Difficulty, Settings};

    env_logger::init();
    log::info!("Lightcycle (native, headless) starting...");

    let mut settings_path = None;
    let mut seed = None;
    let mut difficulty = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => match args.next().map(|s| s.parse::<u64>()) {
                Some(Ok(n)) => seed = Some(n),
                _ => log::warn!("--seed expects an unsigned integer, ignoring"),
            },
            "--difficulty" => match args.next().as_deref().and_then(Difficulty::from_name) {
                Some(d) => difficulty = Some(d),
                None => log::warn!("Unknown difficulty, ignoring"),
            },
            _ => settings_path = Some(arg),
        }
    }

    let mut settings = match settings_path {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Settings::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Invalid settings in {}: {}, using defaults", path, e);
                Settings::default()
            }),
            Err(e) => {
                log::warn!("Cannot read {}: {}, using defaults", path, e);
                Settings::default()
            }
        },
        None => Settings::default(),
    };
    if let Some(seed) = seed {
        settings.seed = seed;
    }
    if let Some(difficulty) = difficulty {
        settings.difficulty = difficulty;
    }
    log::info!("Game initialized with seed: {}", settings.seed);

    let mut state = GameState::new(settings);
    state.start();

    let mut input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    // Ten minutes of simulated play at most
    let frame_limit = (600.0 / SIM_DT) as u64;
    let mut accumulator = 0.0;
    let mut frames = 0;
    while state.phase != GamePhase::GameOver && frames < frame_limit {
        accumulator = run_frame(&mut state, &mut input, SIM_DT, accumulator);
        for event in state.drain_events() {
            match event {
                SimEvent::ActorDied { actor, cause, .. } => {
                    log::info!("{:?} crashed: {:?}", actor, cause)
                }
                SimEvent::PhaseChanged { to, .. } => log::debug!("Phase now {:?}", to),
                _ => {}
            }
        }
        frames += 1;
    }

    match state.outcome() {
        Some(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Cannot serialize summary: {}", e),
        },
        None => log::warn!("No result after {} frames", frames),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser host in this crate; the library is the integration point
}
