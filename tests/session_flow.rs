//! End-to-end session flows through the public `Game` API

use std::sync::mpsc::Receiver;

use count_rush::consts::*;
use count_rush::platform::ManualClock;
use count_rush::sim::{GameMode, GameResult, Phase, Round, Session, TapOutcome};
use count_rush::{
    Credits, Game, GameError, MemoryRepository, Repository, RepositoryError, Settings, Statistics,
};

/// Memory repository whose writes can be made to fail
struct FlakyRepository {
    inner: MemoryRepository<ManualClock>,
    fail_saves: bool,
    fail_records: bool,
}

impl FlakyRepository {
    fn new(clock: ManualClock) -> Self {
        Self {
            inner: MemoryRepository::with_clock(clock, DAILY_CREDITS),
            fail_saves: false,
            fail_records: false,
        }
    }

    fn offline() -> RepositoryError {
        RepositoryError::Unavailable("storage offline".into())
    }
}

impl Repository for FlakyRepository {
    fn save_session(&mut self, session: &Session) -> Result<(), RepositoryError> {
        if self.fail_saves {
            return Err(Self::offline());
        }
        self.inner.save_session(session)
    }

    fn load_session(&self) -> Result<Option<Session>, RepositoryError> {
        self.inner.load_session()
    }

    fn clear_session(&mut self) -> Result<(), RepositoryError> {
        if self.fail_saves {
            return Err(Self::offline());
        }
        self.inner.clear_session()
    }

    fn statistics(&self) -> Result<Statistics, RepositoryError> {
        self.inner.statistics()
    }

    fn record_result(&mut self, result: &GameResult) -> Result<Statistics, RepositoryError> {
        if self.fail_records {
            return Err(Self::offline());
        }
        self.inner.record_result(result)
    }

    fn clear_statistics(&mut self) -> Result<(), RepositoryError> {
        self.inner.clear_statistics()
    }

    fn subscribe_statistics(&mut self) -> Receiver<Statistics> {
        self.inner.subscribe_statistics()
    }

    fn update_high_score(&mut self, score: u32) -> Result<(), RepositoryError> {
        self.inner.update_high_score(score)
    }

    fn settings(&self) -> Result<Settings, RepositoryError> {
        self.inner.settings()
    }

    fn update_settings(&mut self, settings: Settings) -> Result<(), RepositoryError> {
        self.inner.update_settings(settings)
    }

    fn subscribe_settings(&mut self) -> Receiver<Settings> {
        self.inner.subscribe_settings()
    }

    fn credits(&mut self) -> Result<Credits, RepositoryError> {
        self.inner.credits()
    }

    fn update_credits(&mut self, credits: Credits) -> Result<(), RepositoryError> {
        self.inner.update_credits(credits)
    }

    fn consume_credit(&mut self) -> Result<bool, RepositoryError> {
        self.inner.consume_credit()
    }

    fn grant_daily_credits(&mut self) -> Result<Credits, RepositoryError> {
        self.inner.grant_daily_credits()
    }

    fn subscribe_credits(&mut self) -> Receiver<Credits> {
        self.inner.subscribe_credits()
    }
}

fn flaky_game(clock: &ManualClock) -> Game<FlakyRepository> {
    Game::with_default_tuning(FlakyRepository::new(clock.clone()), 2024)
}

fn expected_answer(session: &Session) -> u32 {
    match session.round {
        Round::Counting { correct_answer, .. } => correct_answer,
        Round::Tapping { target_count, .. } => target_count,
    }
}

/// Feed one-second frames until the countdown ends
fn run_out_clock<R: Repository>(game: &mut Game<R>) {
    while game.phase() == Some(Phase::Playing) {
        game.advance(COUNTDOWN_PERIOD_MS).unwrap();
    }
}

#[test]
fn test_counting_run_across_stages() {
    let clock = ManualClock::new(5_000);
    let mut game = flaky_game(&clock);
    let stats_rx = game.subscribe_statistics();

    game.start_new_game(GameMode::Counting).unwrap();
    game.start_stage(1).unwrap();

    let mut total = 0;
    for stage in 1..=4 {
        assert_eq!(game.session().unwrap().stage, stage);
        run_out_clock(&mut game);
        assert_eq!(game.phase(), Some(Phase::Answering));

        let answer = expected_answer(game.session().unwrap());
        let result = game.submit_answer(answer).unwrap();
        assert!(result.is_correct);
        total += result.points();
        game.next_stage().unwrap();
    }

    let session = game.session().unwrap();
    assert_eq!(session.stage, 5);
    assert_eq!(session.score, total);

    let stats = game.statistics().unwrap();
    assert_eq!(stats.highest_stage, 4);
    assert_eq!(stats.correct_answers, 4);
    assert_eq!(stats.accuracy_rate(), 100.0);
    // Initial snapshot plus one per scored stage
    assert_eq!(stats_rx.try_iter().count(), 5);
    assert_eq!(game.credits().unwrap().current, DAILY_CREDITS - 1);
}

#[test]
fn test_record_failure_keeps_answering() {
    let clock = ManualClock::new(5_000);
    let mut game = flaky_game(&clock);
    game.start_new_game(GameMode::Counting).unwrap();
    game.start_stage(1).unwrap();
    run_out_clock(&mut game);

    game.repository_mut().fail_records = true;
    let answer = expected_answer(game.session().unwrap());
    let err = game.submit_answer(answer).unwrap_err();
    assert!(matches!(err, GameError::Repository(RepositoryError::Unavailable(_))));
    assert_eq!(game.phase(), Some(Phase::Answering));
    assert_eq!(game.session().unwrap().score, 0);
    assert!(game.last_result().is_none());
    assert!(game.last_error().unwrap().contains("storage offline"));
    assert!(game.statistics().unwrap().is_empty());

    game.repository_mut().fail_records = false;
    game.clear_error();
    assert!(game.submit_answer(answer).unwrap().is_correct);
    assert_eq!(game.phase(), Some(Phase::Result));
    assert!(game.last_error().is_none());
}

#[test]
fn test_save_failure_rejects_new_game() {
    let clock = ManualClock::new(5_000);
    let mut game = flaky_game(&clock);
    game.repository_mut().fail_saves = true;

    assert!(game.start_new_game(GameMode::Counting).is_err());
    assert!(game.session().is_none());
    assert!(game.last_error().is_some());
}

#[test]
fn test_finish_failure_keeps_session_live() {
    let clock = ManualClock::new(5_000);
    let mut game = flaky_game(&clock);
    game.start_new_game(GameMode::Counting).unwrap();
    game.start_stage(1).unwrap();

    game.repository_mut().fail_saves = true;
    assert!(game.finish().is_err());
    assert_eq!(game.phase(), Some(Phase::Playing));
    assert_eq!(game.drivers_running(), (true, true));
}

#[test]
fn test_tapping_run() {
    let clock = ManualClock::new(5_000);
    let mut game = flaky_game(&clock);
    game.start_new_game(GameMode::Tapping).unwrap();
    game.start_stage(1).unwrap();

    let session = game.session().unwrap();
    let target = session.round.target().unwrap();
    let decoy = session.items.iter().find(|i| i.kind != target).map(|i| i.id);
    let hits: Vec<u32> = session
        .items
        .iter()
        .filter(|i| i.kind == target)
        .map(|i| i.id)
        .collect();

    if let Some(id) = decoy {
        assert_eq!(game.tap(id).unwrap(), TapOutcome::Miss);
    }
    assert!(matches!(game.tap(9_999), Err(GameError::UnknownItem(9_999))));

    let mut last = TapOutcome::Miss;
    for id in &hits {
        game.advance(MOTION_PERIOD_MS).unwrap();
        last = game.tap(*id).unwrap();
    }
    assert_eq!(last, TapOutcome::Cleared);
    assert_eq!(game.phase(), Some(Phase::Result));
    assert!(game.last_result().unwrap().is_correct);
    assert!(matches!(game.submit_answer(1), Err(GameError::WrongMode { .. })));

    game.next_stage().unwrap();
    assert_eq!(game.session().unwrap().stage, 2);
}

#[test]
fn test_retry_charges_credit_and_restarts() {
    let clock = ManualClock::new(5_000);
    let mut game = flaky_game(&clock);
    game.start_new_game(GameMode::Counting).unwrap();
    game.start_stage(1).unwrap();
    run_out_clock(&mut game);

    let wrong = expected_answer(game.session().unwrap()) + 3;
    game.submit_answer(wrong).unwrap();
    assert!(matches!(game.next_stage(), Err(GameError::NotCleared)));

    game.retry_stage().unwrap();
    assert_eq!(game.credits().unwrap().current, DAILY_CREDITS - 2);
    let session = game.session().unwrap();
    assert_eq!((session.stage, session.phase, session.score), (1, Phase::Playing, 0));
}

#[test]
fn test_credits_run_out_then_reset_at_midnight() {
    let clock = ManualClock::new(5_000);
    let mut game = flaky_game(&clock);
    let credits_rx = game.subscribe_credits();

    for _ in 0..DAILY_CREDITS {
        game.start_new_game(GameMode::Counting).unwrap();
    }
    let err = game.start_new_game(GameMode::Counting).unwrap_err();
    assert!(matches!(err, GameError::InsufficientCredits));
    assert_eq!(game.phase(), Some(Phase::Ready));

    clock.set(MILLIS_PER_DAY);
    let credits = game.credits().unwrap();
    assert_eq!(credits.current, DAILY_CREDITS);
    assert_eq!(credits.next_reset_millis, 2 * MILLIS_PER_DAY);
    game.start_new_game(GameMode::Counting).unwrap();

    let seen: Vec<u32> = credits_rx.try_iter().map(|c| c.current).collect();
    assert_eq!(seen.first(), Some(&DAILY_CREDITS));
    assert_eq!(seen.last(), Some(&(DAILY_CREDITS - 1)));
    assert!(seen.contains(&0));
}

#[test]
fn test_restore_after_restart() {
    let clock = ManualClock::new(5_000);
    let mut game = Game::with_default_tuning(MemoryRepository::with_clock(clock.clone(), DAILY_CREDITS), 9);
    game.start_new_game(GameMode::Counting).unwrap();
    game.start_stage(1).unwrap();
    game.advance(2 * COUNTDOWN_PERIOD_MS).unwrap();
    game.pause().unwrap();

    let snapshot = game.session().unwrap().clone();
    game.repository_mut().save_session(&snapshot).unwrap();
    let json = serde_json::to_string(&snapshot).unwrap();

    let mut repo = MemoryRepository::with_clock(clock, DAILY_CREDITS);
    repo.put_session_json(json);
    let mut restored = Game::with_default_tuning(repo, 10);
    let session = restored.restore().unwrap().unwrap();
    assert_eq!(session.phase, Phase::Paused);
    assert_eq!(session.time_remaining, snapshot.time_remaining);
    assert_eq!(restored.drivers_running(), (false, false));

    restored.resume().unwrap();
    run_out_clock(&mut restored);
    assert_eq!(restored.phase(), Some(Phase::Answering));
}

#[test]
fn test_corrupt_snapshot_is_reported() {
    let mut repo = MemoryRepository::with_clock(ManualClock::new(0), DAILY_CREDITS);
    repo.put_session_json("not json");
    let mut game = Game::with_default_tuning(repo, 1);

    assert!(matches!(
        game.restore(),
        Err(GameError::Repository(RepositoryError::Snapshot(_)))
    ));
    assert!(game.session().is_none());
    assert!(game.last_error().is_some());
}

#[test]
fn test_settings_pass_through() {
    let mut game = Game::with_default_tuning(MemoryRepository::with_clock(ManualClock::new(0), DAILY_CREDITS), 1);
    let rx = game.subscribe_settings();

    let mut settings = game.settings().unwrap();
    assert!(settings.set_language("en"));
    settings.sound_enabled = false;
    game.update_settings(settings.clone()).unwrap();

    assert_eq!(game.settings().unwrap(), settings);
    assert_eq!(rx.try_iter().last(), Some(settings));
}

fn target_ids<R: Repository>(game: &Game<R>) -> Vec<u32> {
    let session = game.session().unwrap();
    let target = session.round.target().unwrap();
    session
        .items
        .iter()
        .filter(|i| i.kind == target)
        .map(|i| i.id)
        .collect()
}

#[test]
fn test_record_failure_on_last_tap_keeps_stage_open() {
    let clock = ManualClock::new(5_000);
    let mut game = flaky_game(&clock);
    game.start_new_game(GameMode::Tapping).unwrap();
    game.start_stage(1).unwrap();

    let hits = target_ids(&game);
    let (last, rest) = hits.split_last().unwrap();
    for id in rest {
        game.tap(*id).unwrap();
    }

    game.repository_mut().fail_records = true;
    let before = game.session().unwrap().clone();
    let err = game.tap(*last).unwrap_err();
    assert!(matches!(err, GameError::Repository(RepositoryError::Unavailable(_))));
    assert_eq!(game.session().unwrap(), &before);
    assert_eq!(game.phase(), Some(Phase::Playing));
    assert_eq!(game.drivers_running(), (true, true));
    assert!(game.last_result().is_none());
    assert!(game.statistics().unwrap().is_empty());
    assert!(matches!(
        game.next_stage(),
        Err(GameError::InvalidTransition {
            phase: Some(Phase::Playing),
            ..
        })
    ));

    game.repository_mut().fail_records = false;
    assert_eq!(game.tap(*last).unwrap(), TapOutcome::Cleared);
    assert_eq!(game.phase(), Some(Phase::Result));
    assert_eq!(game.statistics().unwrap().total_answers, 1);
    assert_eq!(game.session().unwrap().score, game.last_result().unwrap().points());
}

#[test]
fn test_record_failure_on_tapping_timeout_keeps_clock() {
    let clock = ManualClock::new(5_000);
    let mut game = flaky_game(&clock);
    game.start_new_game(GameMode::Tapping).unwrap();
    game.start_stage(1).unwrap();
    while game.session().unwrap().time_remaining > 1 {
        game.tick().unwrap();
    }

    game.repository_mut().fail_records = true;
    assert!(game.tick().is_err());
    assert_eq!(game.phase(), Some(Phase::Playing));
    assert_eq!(game.session().unwrap().time_remaining, 1);
    assert!(game.last_result().is_none());
    assert!(game.statistics().unwrap().is_empty());

    game.repository_mut().fail_records = false;
    assert_eq!(game.tick().unwrap(), Phase::Result);
    assert_eq!(game.drivers_running(), (false, false));
    assert!(!game.last_result().unwrap().is_correct);
    assert_eq!(game.statistics().unwrap().total_answers, 1);
}

#[test]
fn test_save_failure_on_submit_records_nothing() {
    let clock = ManualClock::new(5_000);
    let mut game = flaky_game(&clock);
    game.start_new_game(GameMode::Counting).unwrap();
    game.start_stage(1).unwrap();
    run_out_clock(&mut game);

    game.repository_mut().fail_saves = true;
    let answer = expected_answer(game.session().unwrap());
    assert!(game.submit_answer(answer).is_err());
    assert_eq!(game.phase(), Some(Phase::Answering));
    assert!(game.statistics().unwrap().is_empty());

    game.repository_mut().fail_saves = false;
    game.submit_answer(answer).unwrap();
    assert_eq!(game.statistics().unwrap().total_answers, 1);
}

#[test]
fn test_start_stage_cannot_skip_retry() {
    let clock = ManualClock::new(5_000);
    let mut game = flaky_game(&clock);
    game.start_new_game(GameMode::Counting).unwrap();
    game.start_stage(1).unwrap();
    run_out_clock(&mut game);
    let wrong = expected_answer(game.session().unwrap()) + 1;
    game.submit_answer(wrong).unwrap();

    assert!(game.start_stage(1).is_err());
    assert!(game.start_stage(7).is_err());
    assert_eq!(game.credits().unwrap().current, DAILY_CREDITS - 1);
    assert!(game.last_error().unwrap().contains("start-stage is not allowed while showing results"));
}
