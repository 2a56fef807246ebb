//! Tail Chase headless driver
//!
//! Stands in for the excluded presentation layer: runs a session at a
//! fixed frame rate with a simple autopilot for the pointer, printing one
//! JSON frame report per simulated second. Seed comes from the first CLI
//! argument when given.

use tail_chase::SessionConfig;
use tail_chase::sim::{Role, Session};

const FRAME_DT: f32 = 1.0 / 60.0;
const MAX_SIM_SECS: f32 = 120.0;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(0);
    let mut config = SessionConfig::default();
    config.seed = seed;

    let mut session = match Session::new(config) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("bad configuration: {err}");
            std::process::exit(1);
        }
    };

    let mut sim_time = 0.0f32;
    let mut next_print = 0.0f32;
    let mut target = session.arena().center();

    loop {
        session.on_target_input(target);
        let report = session.advance(FRAME_DT);
        sim_time += FRAME_DT;

        // Autopilot: chase the nearest collectible that has fully popped in
        let chaser_pos = report.entities[0].pos;
        target = report
            .entities
            .iter()
            .filter(|e| e.visual.role == Role::Collectible && e.scale > 0.2)
            .min_by(|a, b| {
                let da = (a.pos - chaser_pos).length();
                let db = (b.pos - chaser_pos).length();
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|e| e.pos)
            .unwrap_or(target);

        if sim_time >= next_print || report.outcome.is_terminal() {
            next_print += 1.0;
            match serde_json::to_string(&report) {
                Ok(json) => println!("{json}"),
                Err(err) => log::error!("report serialization failed: {err}"),
            }
        }

        if report.outcome.is_terminal() {
            log::info!(
                "session over after {sim_time:.1}s: {:?}, chain {}, lives {}",
                report.outcome,
                report.chain_length,
                report.lives_remaining
            );
            break;
        }
        if sim_time >= MAX_SIM_SECS {
            log::info!("time cap reached with outcome {:?}", report.outcome);
            break;
        }
    }
}
