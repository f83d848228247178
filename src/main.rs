//! Stack Tower entry point
//!
//! The browser build is driven by the page through `platform::web`. Natively
//! this runs a headless autoplayed game and logs how the tower went.
//!
//! Usage: `stack-tower [variant] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use stack_tower::consts::SIM_DT;
    use stack_tower::{GameEvent, GamePhase, GameSession, TickInput, Tuning, Variant, tick};

    env_logger::init();
    log::info!("Stack Tower (native) starting...");

    let mut args = std::env::args().skip(1);
    let variant = match args.next() {
        Some(name) => Variant::from_str(&name).unwrap_or_else(|| {
            log::warn!("Unknown variant {:?}, using {}", name, Variant::default().as_str());
            Variant::default()
        }),
        None => Variant::default(),
    };

    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring {}: {}", path, e);
                variant.tuning()
            }),
            Err(e) => {
                log::warn!("Cannot read {}: {}", path, e);
                variant.tuning()
            }
        },
        None => variant.tuning(),
    };

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut session = GameSession::new(tuning, seed);
    log::info!("Variant {} with seed {}", variant.as_str(), session.seed());
    let input = TickInput {
        autoplay: true,
        ..Default::default()
    };

    // Ten simulated minutes is far more than any autoplayed tower survives
    let max_frames = 10 * 60 * 60;
    for _ in 0..max_frames {
        tick(&mut session, &input, SIM_DT);
        for event in session.drain_events() {
            if let GameEvent::Placed { level, overlap, aligned, .. } = event {
                println!(
                    "level {:>3}  width {:>6.3}{}",
                    level,
                    overlap,
                    if aligned { "  perfect" } else { "" }
                );
            }
        }
        if session.phase() == GamePhase::GameOver {
            break;
        }
    }

    println!(
        "\nFinal score: {} ({} blocks, {} debris pieces still in view)",
        session.score(),
        session.stack().len(),
        session.debris().len()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
