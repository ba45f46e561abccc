//! Session driver
//!
//! `Game` is the command boundary between a presentation layer and the
//! simulation. It owns the single live session, the two periodic drivers
//! (countdown and motion), and the repository. Every transition out of
//! `Playing` cancels both drivers in the same call that flips the phase.

use std::sync::mpsc::Receiver;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::credits::Credits;
use crate::error::{Command, GameError};
use crate::persistence::Repository;
use crate::platform::PeriodicTimer;
use crate::settings::Settings;
use crate::sim::{Arena, Countdown, GameMode, GameResult, Phase, Session, TapOutcome};
use crate::statistics::Statistics;
use crate::tuning::Tuning;

/// Countdown and motion drivers for the live session
#[derive(Debug, Clone)]
struct Drivers {
    countdown: PeriodicTimer,
    motion: PeriodicTimer,
}

impl Drivers {
    fn new(tuning: &Tuning) -> Self {
        Self {
            countdown: PeriodicTimer::new(tuning.countdown_period_ms),
            motion: PeriodicTimer::new(tuning.motion_period_ms),
        }
    }

    fn start(&mut self) {
        self.countdown.start();
        self.motion.start();
    }

    fn cancel(&mut self) {
        self.countdown.cancel();
        self.motion.cancel();
    }
}

/// Borrow the session or reject `command` when there is none
fn session_for(session: &mut Option<Session>, command: Command) -> Result<&mut Session, GameError> {
    session.as_mut().ok_or(GameError::InvalidTransition {
        command,
        phase: None,
    })
}

/// Store a tapping stage that has just reached `Result`
///
/// Works on the caller's copy of the session; the copy is only committed
/// once both writes succeed.
fn score_tapping_stage<R: Repository>(repo: &mut R, session: &mut Session) -> Result<GameResult, GameError> {
    let result = session.tapping_result()?;
    session.apply_result(&result);
    repo.save_session(session)?;
    repo.record_result(&result)?;

    log::info!(
        "Tapping stage {} finished: {}/{} tapped, {} points",
        result.stage,
        result.user_answer,
        result.correct_answer,
        result.points()
    );
    Ok(result)
}

fn log_stage_start(session: &Session) {
    log::info!(
        "Stage {} started: {} items, {}s",
        session.stage,
        session.items.len(),
        session.time_limit
    );
}

/// Drives one game session against a repository
pub struct Game<R: Repository> {
    repo: R,
    tuning: Tuning,
    arena: Arena,
    rng: Pcg32,
    session: Option<Session>,
    last_result: Option<GameResult>,
    drivers: Drivers,
    last_error: Option<String>,
}

impl<R: Repository> Game<R> {
    /// Create a driver; `seed` makes every generated stage reproducible
    pub fn new(repo: R, tuning: Tuning, seed: u64) -> Self {
        log::info!("Game initialized with seed: {}", seed);
        Self {
            arena: Arena::from_tuning(&tuning),
            drivers: Drivers::new(&tuning),
            repo,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            session: None,
            last_result: None,
            last_error: None,
        }
    }

    pub fn with_default_tuning(repo: R, seed: u64) -> Self {
        Self::new(repo, Tuning::default(), seed)
    }

    // === Observation ===

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn phase(&self) -> Option<Phase> {
        self.session.as_ref().map(|s| s.phase)
    }

    /// Result of the most recently scored stage
    pub fn last_result(&self) -> Option<&GameResult> {
        self.last_result.as_ref()
    }

    /// User-visible description of the last rejected command
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn repository_mut(&mut self) -> &mut R {
        &mut self.repo
    }

    /// (countdown, motion) driver state
    pub fn drivers_running(&self) -> (bool, bool) {
        (
            self.drivers.countdown.is_running(),
            self.drivers.motion.is_running(),
        )
    }

    fn report<T>(&mut self, command: Command, result: Result<T, GameError>) -> Result<T, GameError> {
        if let Err(e) = &result {
            log::warn!("{} rejected: {}", command, e);
            self.last_error = Some(e.to_string());
        }
        result
    }

    // === Session commands ===

    /// Spend a credit and create a fresh session at stage 1 in `Ready`
    ///
    /// Any previous session is discarded.
    pub fn start_new_game(&mut self, mode: GameMode) -> Result<(), GameError> {
        let result = self.try_start_new_game(mode);
        self.report(Command::StartNewGame, result)
    }

    fn try_start_new_game(&mut self, mode: GameMode) -> Result<(), GameError> {
        if self.repo.credits()?.current == 0 || !self.repo.consume_credit()? {
            return Err(GameError::InsufficientCredits);
        }

        let session = Session::new(mode, self.tuning.starting_lives);
        self.repo.save_session(&session)?;

        self.drivers.cancel();
        self.session = Some(session);
        self.last_result = None;
        log::info!("New {} game started", mode.as_str());
        Ok(())
    }

    /// Generate `stage` and start playing it; does not spend a credit
    ///
    /// Only valid on a fresh session in `Ready`.
    pub fn start_stage(&mut self, stage: u32) -> Result<(), GameError> {
        let result = self.try_start_stage(stage);
        self.report(Command::StartStage, result)
    }

    fn try_start_stage(&mut self, stage: u32) -> Result<(), GameError> {
        let mut rng = self.rng.clone();
        let session = session_for(&mut self.session, Command::StartStage)?;
        session.start_stage(stage, rng.random(), &self.arena)?;

        self.rng = rng;
        self.drivers.start();
        self.last_result = None;
        log_stage_start(session);
        Ok(())
    }

    /// One countdown step followed by one motion step
    ///
    /// Returns the phase afterwards. Rejected unless `Playing`.
    pub fn tick(&mut self) -> Result<Phase, GameError> {
        let result = self.try_tick();
        self.report(Command::Tick, result)
    }

    fn try_tick(&mut self) -> Result<Phase, GameError> {
        let phase = self.countdown_step()?;
        if phase == Phase::Playing {
            self.motion_step()?;
        }
        Ok(phase)
    }

    /// Advance item motion by one motion period
    pub fn step_motion(&mut self) -> Result<usize, GameError> {
        let result = self.motion_step();
        self.report(Command::Tick, result)
    }

    /// Feed elapsed wall time to both drivers and run whatever became due
    ///
    /// Does nothing while the drivers are stopped.
    pub fn advance(&mut self, elapsed_ms: u64) -> Result<(), GameError> {
        let result = self.try_advance(elapsed_ms);
        self.report(Command::Tick, result)
    }

    fn try_advance(&mut self, elapsed_ms: u64) -> Result<(), GameError> {
        let motion_due = self
            .drivers
            .motion
            .advance(elapsed_ms)
            .min(self.tuning.max_substeps);
        let countdown_due = self.drivers.countdown.advance(elapsed_ms);

        for _ in 0..motion_due {
            if !self.drivers.motion.is_running() {
                break;
            }
            self.motion_step()?;
        }
        for _ in 0..countdown_due {
            if !self.drivers.countdown.is_running() {
                break;
            }
            self.countdown_step()?;
        }
        Ok(())
    }

    fn countdown_step(&mut self) -> Result<Phase, GameError> {
        let session = session_for(&mut self.session, Command::Tick)?;
        let mut next = session.clone();

        match next.countdown()? {
            Countdown::Running { remaining } => {
                log::debug!("Countdown: {}s left", remaining);
                *session = next;
                Ok(Phase::Playing)
            }
            Countdown::Expired => {
                log::debug!("Time up at stage {}", next.stage);
                // A tapping stage is scored on expiry; nothing changes if that fails
                let scored = match next.mode() {
                    GameMode::Tapping => Some(score_tapping_stage(&mut self.repo, &mut next)?),
                    GameMode::Counting => None,
                };

                let phase = next.phase;
                *session = next;
                self.drivers.cancel();
                if scored.is_some() {
                    self.last_result = scored;
                }
                Ok(phase)
            }
        }
    }

    fn motion_step(&mut self) -> Result<usize, GameError> {
        let dt = self.tuning.motion_dt();
        let session = session_for(&mut self.session, Command::Tick)?;
        session.advance_motion(dt, &self.arena)
    }

    /// Freeze countdown and motion
    pub fn pause(&mut self) -> Result<(), GameError> {
        let result = session_for(&mut self.session, Command::Pause).and_then(|s| s.pause());
        if result.is_ok() {
            self.drivers.cancel();
            log::debug!("Paused");
        }
        self.report(Command::Pause, result)
    }

    /// Restart both drivers from the frozen remaining time
    pub fn resume(&mut self) -> Result<(), GameError> {
        let result = session_for(&mut self.session, Command::Resume).and_then(|s| s.resume());
        if result.is_ok() {
            self.drivers.start();
            log::debug!("Resumed");
        }
        self.report(Command::Resume, result)
    }

    /// Submit the counted value for a counting stage in `Answering`
    pub fn submit_answer(&mut self, value: u32) -> Result<GameResult, GameError> {
        let result = self.try_submit_answer(value);
        self.report(Command::SubmitAnswer, result)
    }

    fn try_submit_answer(&mut self, value: u32) -> Result<GameResult, GameError> {
        let session = session_for(&mut self.session, Command::SubmitAnswer)?;
        let result = session.evaluate_answer(value)?;

        let mut scored = session.clone();
        scored.apply_result(&result);
        // Snapshot first: a failed save must not leave a recorded result behind
        self.repo.save_session(&scored)?;
        self.repo.record_result(&result)?;

        *session = scored;
        self.last_result = Some(result.clone());
        log::info!(
            "Stage {} answered {} (expected {}): {} points",
            result.stage,
            result.user_answer,
            result.correct_answer,
            result.points()
        );
        Ok(result)
    }

    /// Tap an item in a tapping stage
    pub fn tap(&mut self, item_id: u32) -> Result<TapOutcome, GameError> {
        let result = self.try_tap(item_id);
        self.report(Command::Tap, result)
    }

    fn try_tap(&mut self, item_id: u32) -> Result<TapOutcome, GameError> {
        let session = session_for(&mut self.session, Command::Tap)?;
        let mut next = session.clone();
        let outcome = next.tap(item_id)?;

        if outcome != TapOutcome::Cleared {
            *session = next;
            return Ok(outcome);
        }

        // The last tap only lands once the stage is stored
        let result = score_tapping_stage(&mut self.repo, &mut next)?;
        *session = next;
        self.drivers.cancel();
        self.last_result = Some(result);
        Ok(outcome)
    }

    /// Continue to the next stage after a cleared stage; free of charge
    pub fn next_stage(&mut self) -> Result<(), GameError> {
        let result = self.try_next_stage();
        self.report(Command::NextStage, result)
    }

    fn try_next_stage(&mut self) -> Result<(), GameError> {
        let mut rng = self.rng.clone();
        let session = session_for(&mut self.session, Command::NextStage)?;
        session.next_stage(rng.random(), &self.arena)?;

        self.rng = rng;
        self.drivers.start();
        self.last_result = None;
        log_stage_start(session);
        Ok(())
    }

    /// Spend a credit and start over from stage 1 after a failed stage
    pub fn retry_stage(&mut self) -> Result<(), GameError> {
        let result = self.try_retry_stage();
        self.report(Command::RetryStage, result)
    }

    fn try_retry_stage(&mut self) -> Result<(), GameError> {
        let session = session_for(&mut self.session, Command::RetryStage)?;
        match session.cleared() {
            None => {
                return Err(GameError::InvalidTransition {
                    command: Command::RetryStage,
                    phase: Some(session.phase),
                });
            }
            Some(true) => return Err(GameError::AlreadyCleared),
            Some(false) => {}
        }
        let mode = session.mode();

        if self.repo.credits()?.current == 0 || !self.repo.consume_credit()? {
            return Err(GameError::InsufficientCredits);
        }

        let mut rng = self.rng.clone();
        let mut fresh = Session::new(mode, self.tuning.starting_lives);
        fresh.start_stage(1, rng.random(), &self.arena)?;
        self.repo.save_session(&fresh)?;

        self.rng = rng;
        self.session = Some(fresh);
        self.last_result = None;
        self.drivers.start();
        log::info!("Retrying from stage 1");
        Ok(())
    }

    /// Leave the session from any live phase and drop the saved snapshot
    pub fn finish(&mut self) -> Result<(), GameError> {
        let result = self.try_finish();
        self.report(Command::Finish, result)
    }

    fn try_finish(&mut self) -> Result<(), GameError> {
        let session = session_for(&mut self.session, Command::Finish)?;
        let mut finished = session.clone();
        finished.finish()?;
        self.repo.clear_session()?;

        *session = finished;
        self.drivers.cancel();
        log::info!("Session finished with score {}", session.score);
        Ok(())
    }

    /// Reload the saved session, if any
    ///
    /// A snapshot saved mid-stage comes back paused.
    pub fn restore(&mut self) -> Result<Option<&Session>, GameError> {
        let loaded = match self.repo.load_session() {
            Ok(loaded) => loaded,
            Err(e) => {
                let err = GameError::from(e);
                log::warn!("Restore failed: {}", err);
                self.last_error = Some(err.to_string());
                return Err(err);
            }
        };

        self.drivers.cancel();
        self.last_result = None;
        self.session = loaded.map(|mut session| {
            if session.phase == Phase::Playing {
                session.phase = Phase::Paused;
                session.paused = true;
            }
            log::info!("Loaded saved session at stage {}", session.stage);
            session
        });
        Ok(self.session.as_ref())
    }

    // === Collaborator pass-through ===

    /// Current credits (refilled first if a reset is due)
    pub fn credits(&mut self) -> Result<Credits, GameError> {
        Ok(self.repo.credits()?)
    }

    pub fn grant_daily_credits(&mut self) -> Result<Credits, GameError> {
        Ok(self.repo.grant_daily_credits()?)
    }

    pub fn statistics(&self) -> Result<Statistics, GameError> {
        Ok(self.repo.statistics()?)
    }

    pub fn high_score(&self) -> Result<u32, GameError> {
        Ok(self.repo.high_score()?)
    }

    pub fn clear_statistics(&mut self) -> Result<(), GameError> {
        Ok(self.repo.clear_statistics()?)
    }

    pub fn settings(&self) -> Result<Settings, GameError> {
        Ok(self.repo.settings()?)
    }

    pub fn update_settings(&mut self, settings: Settings) -> Result<(), GameError> {
        Ok(self.repo.update_settings(settings)?)
    }

    pub fn subscribe_credits(&mut self) -> Receiver<Credits> {
        self.repo.subscribe_credits()
    }

    pub fn subscribe_statistics(&mut self) -> Receiver<Statistics> {
        self.repo.subscribe_statistics()
    }

    pub fn subscribe_settings(&mut self) -> Receiver<Settings> {
        self.repo.subscribe_settings()
    }
}
