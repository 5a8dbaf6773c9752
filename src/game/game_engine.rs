use log::{debug, info, trace, warn};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::SystemTime;
use uuid::Uuid;

use super::generator::ProblemGenerator;
use super::hints::{hints, HintReveal};
use super::progress;
use super::session::{GameSession, SessionError};
use super::settings::Settings;
use super::shop::{self, ShopError};
use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventObserver, Unsubscriber};
use crate::helpers::{Clock, SystemClock};
use crate::model::{
    Difficulty, GameEngineCommand, GameEngineEvent, GameMode, OperationType, SettingsChange,
    UserProfile,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Shop(#[from] ShopError),
    #[error("no wrong answers to replay")]
    NoWrongAnswers,
    #[error("problem {0} is not in the wrong-answer set")]
    UnknownWrongAnswer(Uuid),
    #[error("every hint for this problem is already shown")]
    HintsExhausted,
}

/// Owns the profile and the session in progress, turns commands into state
/// changes and reports them as events.
pub struct GameEngine {
    profile: UserProfile,
    session: Option<GameSession>,
    generator: ProblemGenerator,
    settings: Settings,
    current_hints: Vec<String>,
    hint_reveal: HintReveal,
    clock: Box<dyn Clock>,
    subscription: Option<Unsubscriber<GameEngineCommand>>,
    game_engine_event_emitter: EventEmitter<GameEngineEvent>,
}

impl Destroyable for GameEngine {
    fn destroy(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl GameEngine {
    pub fn new(
        profile: UserProfile,
        settings: Settings,
        game_engine_command_observer: EventObserver<GameEngineCommand>,
        game_engine_event_emitter: EventEmitter<GameEngineEvent>,
    ) -> Rc<RefCell<Self>> {
        let generator = ProblemGenerator::new(Settings::seed_from_env());
        Self::with_parts(
            profile,
            settings,
            generator,
            Box::new(SystemClock),
            game_engine_command_observer,
            game_engine_event_emitter,
        )
    }

    pub fn with_parts(
        profile: UserProfile,
        settings: Settings,
        generator: ProblemGenerator,
        clock: Box<dyn Clock>,
        game_engine_command_observer: EventObserver<GameEngineCommand>,
        game_engine_event_emitter: EventEmitter<GameEngineEvent>,
    ) -> Rc<RefCell<Self>> {
        let generator = generator.with_word_problem_ratio(settings.word_problem_ratio);
        let engine = Self {
            profile,
            session: None,
            generator,
            settings,
            current_hints: vec![],
            hint_reveal: HintReveal::new(),
            clock,
            subscription: None,
            game_engine_event_emitter,
        };
        let refcell = Rc::new(RefCell::new(engine));
        GameEngine::wire_subscription(refcell.clone(), game_engine_command_observer);
        refcell
    }

    fn wire_subscription(
        engine: Rc<RefCell<Self>>,
        game_engine_command_observer: EventObserver<GameEngineCommand>,
    ) {
        let engine_handler = engine.clone();
        let subscription = game_engine_command_observer.subscribe(move |command| {
            engine_handler.borrow_mut().handle_command(command.clone());
        });
        engine.borrow_mut().subscription = Some(subscription);
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Hints revealed so far for the current problem.
    pub fn visible_hints(&self) -> &[String] {
        self.hint_reveal.visible(&self.current_hints)
    }

    pub fn handle_command(&mut self, command: GameEngineCommand) {
        trace!(target: "game_engine", "Handling command: {:?}", command);
        let result = match command {
            GameEngineCommand::StartSession {
                mode,
                kind,
                difficulty,
                count,
            } => self.start_session(mode, kind, difficulty, count),
            GameEngineCommand::SubmitAnswer {
                answer,
                remainder,
                time_spent_seconds,
            } => self.submit_answer(answer, remainder, time_spent_seconds),
            GameEngineCommand::NextProblem => self.next_problem(),
            GameEngineCommand::EndSession => self.end_session(),
            GameEngineCommand::RevealHint => self.reveal_hint(),
            GameEngineCommand::PurchaseItem(item_id) => self.purchase_item(&item_id),
            GameEngineCommand::EquipItem(item_id) => self.equip_item(&item_id),
            GameEngineCommand::RemoveWrongAnswer(problem_id) => {
                self.remove_wrong_answer(problem_id)
            }
            GameEngineCommand::ReplayWrongAnswers(limit) => self.replay_wrong_answers(limit),
            GameEngineCommand::RecordMiniGameScore(score) => {
                self.record_mini_game_score(score);
                Ok(())
            }
            GameEngineCommand::UpdateSettings(change) => {
                self.update_settings(change);
                Ok(())
            }
        };
        if let Err(err) = result {
            warn!(target: "game_engine", "Command rejected: {}", err);
            self.emit(GameEngineEvent::CommandRejected(err.to_string()));
        }
    }

    fn emit(&self, event: GameEngineEvent) {
        self.game_engine_event_emitter.emit(&event);
    }

    fn now(&self) -> SystemTime {
        self.clock.now().into()
    }

    fn start_session(
        &mut self,
        mode: GameMode,
        kind: OperationType,
        difficulty: Option<Difficulty>,
        count: usize,
    ) -> Result<(), EngineError> {
        let difficulty = difficulty.unwrap_or(self.settings.difficulty);
        let problems = self.generator.generate_many(kind, difficulty, count);
        let session = GameSession::new(mode, kind, difficulty, problems, self.now())?;
        self.begin(session);
        Ok(())
    }

    /// Practice session over the stored wrong answers, oldest first.
    fn replay_wrong_answers(&mut self, limit: usize) -> Result<(), EngineError> {
        let problems: Vec<_> = self
            .profile
            .wrong_answers
            .iter()
            .take(limit)
            .cloned()
            .collect();
        let first = problems.first().ok_or(EngineError::NoWrongAnswers)?;
        let (kind, difficulty) = (first.kind, first.difficulty);
        let session = GameSession::new(GameMode::Practice, kind, difficulty, problems, self.now())?;
        self.begin(session);
        Ok(())
    }

    fn begin(&mut self, session: GameSession) {
        if let Some(previous) = self.session.as_ref().filter(|s| !s.is_ended()) {
            debug!(target: "game_engine", "Abandoning unfinished session {}", previous.id());
        }
        self.emit(GameEngineEvent::SessionStarted {
            session_id: session.id(),
            mode: session.mode(),
            total_problems: session.problems().len(),
        });
        self.session = Some(session);
        self.present_current_problem();
    }

    fn present_current_problem(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        let Some(problem) = session.current_problem() else {
            return;
        };
        self.current_hints = hints(problem);
        self.hint_reveal = HintReveal::new();
        self.emit(GameEngineEvent::ProblemPresented {
            index: session.current_index(),
            problem: problem.clone(),
        });
    }

    fn submit_answer(
        &mut self,
        answer: u32,
        remainder: Option<u32>,
        time_spent_seconds: Option<f64>,
    ) -> Result<(), EngineError> {
        let now = self.now();
        let session = self.session.as_mut().ok_or(SessionError::NoSession)?;
        let graded = session.grade(
            answer,
            remainder,
            time_spent_seconds,
            self.hint_reveal.hints_used(),
            now,
        )?;
        let graded = match self.settings.time_limit() {
            Some(limit) if graded.time_spent_seconds > limit.as_secs_f64() => {
                debug!(
                    target: "game_engine",
                    "Answer took {:.1}s, over the {}s limit",
                    graded.time_spent_seconds,
                    limit.as_secs()
                );
                graded.out_of_time()
            }
            _ => graded,
        };
        let outcome =
            progress::submit_answer(&mut self.profile, session, graded, self.clock.as_ref())?;

        self.emit(GameEngineEvent::AnswerRecorded {
            answer: outcome.answer,
            correct_answer: outcome.problem.answer,
            correct_remainder: outcome.problem.remainder,
            added_to_wrong_answers: outcome.added_to_wrong_answers,
        });
        for id in outcome.unlocked {
            self.emit(GameEngineEvent::AchievementUnlocked(id));
        }
        self.profile_changed();
        Ok(())
    }

    fn next_problem(&mut self) -> Result<(), EngineError> {
        let now = self.now();
        let session = self.session.as_mut().ok_or(SessionError::NoSession)?;
        session.advance(now)?;
        self.present_current_problem();
        Ok(())
    }

    fn end_session(&mut self) -> Result<(), EngineError> {
        let session = self.session.as_mut().ok_or(SessionError::NoSession)?;
        let ended = progress::end_session(&mut self.profile, session, self.clock.as_ref())?;
        self.current_hints.clear();
        self.hint_reveal = HintReveal::new();

        self.emit(GameEngineEvent::SessionEnded(ended.summary));
        if ended.leveled_up {
            self.emit(GameEngineEvent::LeveledUp(self.profile.character.level));
        }
        for id in ended.unlocked {
            self.emit(GameEngineEvent::AchievementUnlocked(id));
        }
        self.profile_changed();
        Ok(())
    }

    fn reveal_hint(&mut self) -> Result<(), EngineError> {
        let session = self.session.as_ref().ok_or(SessionError::NoSession)?;
        if session.is_ended() {
            return Err(SessionError::Ended.into());
        }
        let hint = self
            .hint_reveal
            .reveal_next(&self.current_hints)
            .map(str::to_string)
            .ok_or(EngineError::HintsExhausted)?;
        self.emit(GameEngineEvent::HintRevealed {
            hint,
            hints_used: self.hint_reveal.hints_used(),
        });
        Ok(())
    }

    fn purchase_item(&mut self, item_id: &str) -> Result<(), EngineError> {
        let item =
            shop::find_item(item_id).ok_or_else(|| ShopError::UnknownItem(item_id.to_string()))?;
        shop::purchase(&mut self.profile, &item)?;
        self.profile_changed();
        Ok(())
    }

    fn equip_item(&mut self, item_id: &str) -> Result<(), EngineError> {
        shop::toggle_equipped(&mut self.profile, item_id)?;
        self.profile_changed();
        Ok(())
    }

    fn remove_wrong_answer(&mut self, problem_id: Uuid) -> Result<(), EngineError> {
        self.profile
            .wrong_answers
            .remove(problem_id)
            .ok_or(EngineError::UnknownWrongAnswer(problem_id))?;
        self.profile.touch();
        self.profile_changed();
        Ok(())
    }

    fn record_mini_game_score(&mut self, score: u64) {
        if progress::record_mini_game_score(&mut self.profile, score) {
            info!(target: "game_engine", "New mini-game best: {}", score);
            self.profile_changed();
        }
    }

    fn update_settings(&mut self, change: SettingsChange) {
        let settings = &mut self.settings;
        if let Some(value) = change.sound_enabled {
            settings.sound_enabled = value;
        }
        if let Some(value) = change.music_enabled {
            settings.music_enabled = value;
        }
        if let Some(value) = change.show_visual_help {
            settings.show_visual_help = value;
        }
        if let Some(value) = change.time_limit_enabled {
            settings.time_limit_enabled = value;
        }
        if let Some(value) = change.difficulty {
            settings.difficulty = value;
        }
        if let Some(value) = change.word_problem_ratio {
            settings.word_problem_ratio = value.clamp(0.0, 1.0);
            self.generator
                .set_word_problem_ratio(settings.word_problem_ratio);
        }
        self.emit(GameEngineEvent::SettingsChanged(self.settings.clone()));
    }

    fn profile_changed(&self) {
        self.emit(GameEngineEvent::ProfileChanged(self.profile.clone()));
    }
}
