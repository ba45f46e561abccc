//! Error types for session commands and the repository collaborator

use std::fmt;

use thiserror::Error;

use crate::sim::{GameMode, Phase};

/// Commands accepted at the session boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    StartNewGame,
    StartStage,
    Tick,
    Pause,
    Resume,
    SubmitAnswer,
    Tap,
    NextStage,
    RetryStage,
    Finish,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::StartNewGame => "start-new-game",
            Command::StartStage => "start-stage",
            Command::Tick => "tick",
            Command::Pause => "pause",
            Command::Resume => "resume",
            Command::SubmitAnswer => "submit-answer",
            Command::Tap => "tap",
            Command::NextStage => "next-stage",
            Command::RetryStage => "retry-stage",
            Command::Finish => "finish",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures reported by a `Repository`
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("snapshot encoding failed: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Everything a session command can fail with
#[derive(Debug, Error)]
pub enum GameError {
    #[error("not enough credits to start a game")]
    InsufficientCredits,

    /// `phase` is `None` when there is no session at all
    #[error("{command} is not allowed {}", phase_label(.phase))]
    InvalidTransition {
        command: Command,
        phase: Option<Phase>,
    },

    #[error("{command} is not available in {} mode", .mode.as_str())]
    WrongMode { command: Command, mode: GameMode },

    #[error("stages start at 1, got {0}")]
    InvalidStage(u32),

    #[error("stage was not cleared; retry instead")]
    NotCleared,

    #[error("stage was cleared; continue to the next stage instead")]
    AlreadyCleared,

    #[error("item {0} is not in play")]
    UnknownItem(u32),

    #[error("repository failure: {0}")]
    Repository(#[from] RepositoryError),
}

fn phase_label(phase: &Option<Phase>) -> String {
    match phase {
        Some(phase) => format!("while {}", phase.as_str()),
        None => "without an active session".to_string(),
    }
}
