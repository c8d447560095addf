//! Globe Hunt entry point
//!
//! Native builds run a headless session with the greedy autoplayer on the
//! simulated clock. The browser build starts from `globe_hunt::web`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use globe_hunt::sim::GameEngine;
    use globe_hunt::sim::autoplay::{DEFAULT_THINK_MS, play_session};

    env_logger::init();
    log::info!("Globe Hunt (native) starting...");

    let seed = std::env::var("GLOBE_HUNT_SEED")
        .ok()
        .and_then(|s| match s.trim().parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(e) => {
                log::warn!("Ignoring GLOBE_HUNT_SEED={:?}: {}", s, e);
                None
            }
        })
        .unwrap_or_else(clock_seed);

    let mut engine = GameEngine::new(seed);
    let scores = play_session(&mut engine, DEFAULT_THINK_MS);

    println!("Globe Hunt, seed {seed}");
    for (i, entry) in scores.iter().enumerate() {
        println!("{:>2}. {:<28} {:>5}", i + 1, entry.city, entry.points);
    }
    println!("Total: {} points", engine.session().total_score);
}

#[cfg(not(target_arch = "wasm32"))]
fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is globe_hunt::web::wasm_start
}
