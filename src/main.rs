//! Count Rush entry point
//!
//! Headless autoplay: runs a session against the in-memory repository,
//! feeding fixed frames to the drivers and answering every stage.
//!
//! Usage: `count-rush [counting|tapping] [stages] [seed]`

#[cfg(not(target_arch = "wasm32"))]
use count_rush::consts::*;
#[cfg(not(target_arch = "wasm32"))]
use count_rush::platform::{Clock, SystemClock};
#[cfg(not(target_arch = "wasm32"))]
use count_rush::sim::{GameMode, Phase, count_kind};
#[cfg(not(target_arch = "wasm32"))]
use count_rush::{Game, GameError, MemoryRepository, Tuning};

/// Frames fed per simulated stage before giving up
#[cfg(not(target_arch = "wasm32"))]
const MAX_FRAMES_PER_STAGE: u32 = 10_000;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let mode = match args.next().as_deref() {
        Some("tapping") => GameMode::Tapping,
        _ => GameMode::Counting,
    };
    let stages: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(5);
    let seed: u64 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| SystemClock.now_millis());

    log::info!("Count Rush (headless) starting: {} mode, seed {}", mode.as_str(), seed);

    let tuning = Tuning::default();
    let repo = MemoryRepository::new(tuning.daily_credits);
    let mut game = Game::new(repo, tuning, seed);
    if let Err(e) = autoplay(&mut game, mode, stages) {
        eprintln!("Autoplay stopped: {}", e);
    }

    if let Ok(stats) = game.statistics() {
        println!(
            "Highest stage {} | accuracy {:.0}% | best {}",
            stats.highest_stage,
            stats.accuracy_rate(),
            stats.best_score
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host on wasm; nothing to run here
}

/// Play up to `stages` stages, answering each one correctly
#[cfg(not(target_arch = "wasm32"))]
fn autoplay(game: &mut Game<MemoryRepository>, mode: GameMode, stages: u32) -> Result<(), GameError> {
    game.start_new_game(mode)?;
    game.start_stage(1)?;

    for played in 1..=stages {
        play_stage(game)?;

        let Some(result) = game.last_result() else {
            break;
        };
        println!(
            "Stage {:>2}: answered {:>2} of {:>2} in {}s -> {} points",
            result.stage,
            result.user_answer,
            result.correct_answer,
            result.time_spent,
            result.points()
        );

        if !result.is_correct || played == stages {
            break;
        }
        game.next_stage()?;
    }

    game.finish()
}

/// Run frames until the stage is scored
#[cfg(not(target_arch = "wasm32"))]
fn play_stage(game: &mut Game<MemoryRepository>) -> Result<(), GameError> {
    for _ in 0..MAX_FRAMES_PER_STAGE {
        let Some(session) = game.session() else {
            return Ok(());
        };

        match session.phase {
            Phase::Playing if session.mode() == GameMode::Tapping => {
                // Tap one matching item per frame
                let target = session.round.target();
                let next = session.items.iter().find(|i| Some(i.kind) == target).map(|i| i.id);
                match next {
                    Some(id) => {
                        game.tap(id)?;
                    }
                    None => game.advance(MOTION_PERIOD_MS)?,
                }
            }
            Phase::Playing => game.advance(MOTION_PERIOD_MS)?,
            Phase::Answering => {
                let answer = match session.round.target() {
                    Some(kind) => count_kind(&session.items, kind),
                    None => session.items.len() as u32,
                };
                game.submit_answer(answer)?;
            }
            _ => return Ok(()),
        }
    }
    Ok(())
}
