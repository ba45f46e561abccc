//! Session state and phase transitions
//!
//! A session is one run through successive stages in a single game mode.
//! Everything here is synchronous and deterministic; timers and persistence
//! live in `game`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::generate::{generate, pick_target};
use super::item::{Item, ItemKind, count_kind};
use super::result::{GameMode, GameResult};
use super::tick::{Arena, tick};
use crate::error::{Command, GameError};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Created, no stage generated yet
    Ready,
    /// Items moving, countdown running
    Playing,
    /// Countdown and motion frozen until resume
    Paused,
    /// Time is up, waiting for the counted value
    Answering,
    /// Stage scored
    Result,
    /// Player left the session
    Finished,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Ready => "ready",
            Phase::Playing => "playing",
            Phase::Paused => "paused",
            Phase::Answering => "answering",
            Phase::Result => "showing results",
            Phase::Finished => "finished",
        }
    }
}

/// Mode-specific part of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Round {
    Counting {
        /// `None` means count every item
        target: Option<ItemKind>,
        correct_answer: u32,
        submitted: Option<u32>,
    },
    Tapping {
        target: Option<ItemKind>,
        target_count: u32,
        tapped: u32,
        wrong_taps: u32,
    },
}

impl Round {
    pub fn new(mode: GameMode) -> Self {
        match mode {
            GameMode::Counting => Round::Counting {
                target: None,
                correct_answer: 0,
                submitted: None,
            },
            GameMode::Tapping => Round::Tapping {
                target: None,
                target_count: 0,
                tapped: 0,
                wrong_taps: 0,
            },
        }
    }

    pub fn mode(&self) -> GameMode {
        match self {
            Round::Counting { .. } => GameMode::Counting,
            Round::Tapping { .. } => GameMode::Tapping,
        }
    }

    pub fn target(&self) -> Option<ItemKind> {
        match self {
            Round::Counting { target, .. } | Round::Tapping { target, .. } => *target,
        }
    }
}

/// Result of one countdown step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Running { remaining: u32 },
    /// Time ran out; the session left `Playing`
    Expired,
}

/// Result of a tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// Target item popped
    Hit { remaining: u32 },
    /// Wrong kind; the item stays in play
    Miss,
    /// Last target popped; the session moved to `Result`
    Cleared,
}

/// A game session (serializable snapshot)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Current stage (1-based)
    pub stage: u32,
    /// Running score across cleared stages
    pub score: u32,
    pub lives: u8,
    pub phase: Phase,
    /// Seconds allowed for the current stage
    pub time_limit: u32,
    /// Seconds left on the countdown
    pub time_remaining: u32,
    pub paused: bool,
    /// Seed the current layout was generated from
    pub stage_seed: u64,
    pub items: Vec<Item>,
    pub round: Round,
}

impl Session {
    /// A fresh session at stage 1 in `Ready`
    pub fn new(mode: GameMode, lives: u8) -> Self {
        Self {
            stage: 1,
            score: 0,
            lives,
            phase: Phase::Ready,
            time_limit: 0,
            time_remaining: 0,
            paused: false,
            stage_seed: 0,
            items: Vec::new(),
            round: Round::new(mode),
        }
    }

    pub fn mode(&self) -> GameMode {
        self.round.mode()
    }

    fn expect_phase(&self, command: Command, allowed: &[Phase]) -> Result<(), GameError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(GameError::InvalidTransition {
                command,
                phase: Some(self.phase),
            })
        }
    }

    fn wrong_mode(&self, command: Command) -> GameError {
        GameError::WrongMode {
            command,
            mode: self.mode(),
        }
    }

    /// Generate `stage` from `stage_seed` and start playing it
    ///
    /// Only a fresh session may pick its stage; later stages go through
    /// `next_stage`.
    pub fn start_stage(&mut self, stage: u32, stage_seed: u64, arena: &Arena) -> Result<(), GameError> {
        self.expect_phase(Command::StartStage, &[Phase::Ready])?;
        if stage == 0 {
            return Err(GameError::InvalidStage(stage));
        }
        self.load_stage(stage, stage_seed, arena);
        Ok(())
    }

    /// Move from a cleared stage to the one after it
    pub fn next_stage(&mut self, stage_seed: u64, arena: &Arena) -> Result<(), GameError> {
        match self.cleared() {
            None => Err(GameError::InvalidTransition {
                command: Command::NextStage,
                phase: Some(self.phase),
            }),
            Some(false) => Err(GameError::NotCleared),
            Some(true) => {
                self.load_stage(self.stage + 1, stage_seed, arena);
                Ok(())
            }
        }
    }

    fn load_stage(&mut self, stage: u32, stage_seed: u64, arena: &Arena) {
        let difficulty = Difficulty::for_stage(stage);
        let mut rng = Pcg32::seed_from_u64(stage_seed);
        let layout = generate(&difficulty, arena, &mut rng);

        self.round = match self.mode() {
            GameMode::Counting => Round::Counting {
                target: layout.target,
                correct_answer: layout.correct_answer,
                submitted: None,
            },
            GameMode::Tapping => {
                // Tapping always needs something to tap, even on count-all stages
                let target = layout.target.or_else(|| pick_target(&layout.items, &mut rng));
                Round::Tapping {
                    target,
                    target_count: target.map(|k| count_kind(&layout.items, k)).unwrap_or(0),
                    tapped: 0,
                    wrong_taps: 0,
                }
            }
        };

        self.stage = stage;
        self.stage_seed = stage_seed;
        self.items = layout.items;
        self.time_limit = difficulty.time_limit;
        self.time_remaining = difficulty.time_limit;
        self.paused = false;
        self.phase = Phase::Playing;
    }

    /// Take one second off the clock
    ///
    /// On expiry a counting session moves to `Answering` and a tapping
    /// session moves straight to `Result`.
    pub fn countdown(&mut self) -> Result<Countdown, GameError> {
        self.expect_phase(Command::Tick, &[Phase::Playing])?;

        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining > 0 {
            return Ok(Countdown::Running {
                remaining: self.time_remaining,
            });
        }

        self.phase = match self.mode() {
            GameMode::Counting => Phase::Answering,
            GameMode::Tapping => Phase::Result,
        };
        Ok(Countdown::Expired)
    }

    /// Advance item motion by `dt` seconds; returns collisions resolved
    pub fn advance_motion(&mut self, dt: f32, arena: &Arena) -> Result<usize, GameError> {
        self.expect_phase(Command::Tick, &[Phase::Playing])?;
        Ok(tick(&mut self.items, dt, arena))
    }

    pub fn pause(&mut self) -> Result<(), GameError> {
        self.expect_phase(Command::Pause, &[Phase::Playing])?;
        self.phase = Phase::Paused;
        self.paused = true;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), GameError> {
        self.expect_phase(Command::Resume, &[Phase::Paused])?;
        self.phase = Phase::Playing;
        self.paused = false;
        Ok(())
    }

    /// Seconds of stage time used so far
    pub fn time_spent(&self) -> u32 {
        self.time_limit.saturating_sub(self.time_remaining)
    }

    /// Score a counted value without changing the session
    pub fn evaluate_answer(&self, value: u32) -> Result<GameResult, GameError> {
        let Round::Counting {
            target,
            correct_answer,
            ..
        } = self.round
        else {
            return Err(self.wrong_mode(Command::SubmitAnswer));
        };
        self.expect_phase(Command::SubmitAnswer, &[Phase::Answering])?;

        Ok(GameResult {
            stage: self.stage,
            mode: GameMode::Counting,
            target,
            correct_answer,
            user_answer: value,
            is_correct: value == correct_answer,
            time_spent: self.time_spent(),
            total_items: self.items.len() as u32,
            count_all: target.is_none(),
        })
    }

    /// Tap an item by id
    pub fn tap(&mut self, item_id: u32) -> Result<TapOutcome, GameError> {
        if self.mode() != GameMode::Tapping {
            return Err(self.wrong_mode(Command::Tap));
        }
        self.expect_phase(Command::Tap, &[Phase::Playing])?;

        let index = self
            .items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or(GameError::UnknownItem(item_id))?;

        let Round::Tapping {
            target,
            target_count,
            tapped,
            wrong_taps,
        } = &mut self.round
        else {
            return Err(GameError::WrongMode {
                command: Command::Tap,
                mode: GameMode::Counting,
            });
        };

        if Some(self.items[index].kind) != *target {
            *wrong_taps += 1;
            return Ok(TapOutcome::Miss);
        }

        self.items.remove(index);
        *tapped += 1;
        if *tapped >= *target_count {
            self.phase = Phase::Result;
            return Ok(TapOutcome::Cleared);
        }
        Ok(TapOutcome::Hit {
            remaining: *target_count - *tapped,
        })
    }

    /// Outcome of a finished tapping stage
    pub fn tapping_result(&self) -> Result<GameResult, GameError> {
        let Round::Tapping {
            target,
            target_count,
            tapped,
            ..
        } = self.round
        else {
            return Err(self.wrong_mode(Command::Tap));
        };

        Ok(GameResult {
            stage: self.stage,
            mode: GameMode::Tapping,
            target,
            correct_answer: target_count,
            user_answer: tapped,
            is_correct: tapped == target_count,
            time_spent: self.time_spent(),
            total_items: self.items.len() as u32 + tapped,
            count_all: false,
        })
    }

    /// Record a scored result on the session and move to `Result`
    pub fn apply_result(&mut self, result: &GameResult) {
        if let Round::Counting { submitted, .. } = &mut self.round {
            *submitted = Some(result.user_answer);
        }
        self.score += result.points();
        self.phase = Phase::Result;
    }

    /// Whether the scored stage was cleared; `None` before scoring
    pub fn cleared(&self) -> Option<bool> {
        if self.phase != Phase::Result {
            return None;
        }
        match self.round {
            Round::Counting {
                correct_answer,
                submitted,
                ..
            } => submitted.map(|v| v == correct_answer),
            Round::Tapping {
                target_count,
                tapped,
                ..
            } => Some(tapped == target_count),
        }
    }

    /// Leave the session from any live phase
    pub fn finish(&mut self) -> Result<(), GameError> {
        if self.phase == Phase::Finished {
            return Err(GameError::InvalidTransition {
                command: Command::Finish,
                phase: Some(self.phase),
            });
        }
        self.phase = Phase::Finished;
        self.paused = false;
        Ok(())
    }

    /// Whether timers should be running for this session
    pub fn is_live(&self) -> bool {
        self.phase == Phase::Playing
    }
}
