use std::io::{self, BufRead, Write};
use std::sync::Arc;

use math_adventure::destroyable::Destroyable;
use math_adventure::events::Channel;
use math_adventure::game::settings::Settings;
use math_adventure::game::GameEngine;
use math_adventure::model::{
    Difficulty, GameEngineCommand, GameEngineEvent, GameMode, OperationType, UserProfile,
};
use math_adventure::sync::{
    AuthSession, Credential, InMemoryProfileStore, LocalSnapshot, SyncNotice, SyncOrchestrator,
    SyncScheduler,
};

const DEFAULT_PROBLEM_COUNT: usize = 10;
const TOKEN_VAR: &str = "MATH_ADVENTURE_TOKEN";

fn init_logging() {
    env_logger::init();
}

struct Options {
    kind: OperationType,
    difficulty: Option<Difficulty>,
    count: usize,
}

fn parse_options(args: &[String]) -> Result<Options, String> {
    let kind = match args.first() {
        Some(arg) => arg.parse()?,
        None => OperationType::Multiplication,
    };
    let difficulty = args.get(1).map(|arg| arg.parse()).transpose()?;
    let count = match args.get(2) {
        Some(arg) => arg
            .parse()
            .map_err(|_| format!("not a problem count: {arg}"))?,
        None => DEFAULT_PROBLEM_COUNT,
    };
    Ok(Options {
        kind,
        difficulty,
        count,
    })
}

/// Accepts `12`, `3 r 2` and `3r2`.
fn parse_answer(line: &str) -> Option<(u32, Option<u32>)> {
    let line = line.trim().to_lowercase();
    match line.split_once('r') {
        Some((quotient, remainder)) => Some((
            quotient.trim().parse().ok()?,
            Some(remainder.trim().parse().ok()?),
        )),
        None => Some((line.parse().ok()?, None)),
    }
}

fn print_event(event: &GameEngineEvent) {
    match event {
        GameEngineEvent::ProblemPresented { index, problem } => {
            println!("\n#{} {}", index + 1, problem.question_text);
        }
        GameEngineEvent::AnswerRecorded {
            answer,
            correct_answer,
            correct_remainder,
            ..
        } => {
            if answer.is_correct {
                println!("Correct!");
            } else {
                match correct_remainder {
                    Some(remainder) => {
                        println!("Not quite: {} remainder {}", correct_answer, remainder)
                    }
                    None => println!("Not quite: {}", correct_answer),
                }
            }
        }
        GameEngineEvent::HintRevealed { hint, .. } => println!("Hint: {}", hint),
        GameEngineEvent::AchievementUnlocked(id) => {
            println!("{} Achievement unlocked: {}", id.icon(), id.title())
        }
        GameEngineEvent::LeveledUp(level) => println!("Level up! You are now level {}", level),
        GameEngineEvent::SessionEnded(summary) => println!(
            "\n{}/{} correct, {} stars, {} coins earned",
            summary.correct,
            summary.answered,
            "★".repeat(summary.stars as usize),
            summary.coins_earned
        ),
        GameEngineEvent::CommandRejected(reason) => println!("({})", reason),
        _ => (),
    }
}

fn main() {
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_options(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("usage: math-adventure [multiplication|division] [easy|medium|hard] [count]");
            std::process::exit(2);
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("could not start the sync runtime: {}", err);
            std::process::exit(1);
        }
    };
    let _runtime_guard = runtime.enter();

    let settings = Settings::load();
    let snapshot = LocalSnapshot::in_data_dir();
    let profile = snapshot.load().unwrap_or_else(|| {
        let name = std::env::var("USER").unwrap_or_else(|_| "Explorer".to_string());
        UserProfile::new(&name)
    });
    println!(
        "Welcome {}! Level {}, {} coins. Type 'h' for a hint, 'q' to stop.",
        profile.name, profile.character.level, profile.coins
    );

    let (command_emitter, command_observer) = Channel::<GameEngineCommand>::new();
    let (event_emitter, event_observer) = Channel::<GameEngineEvent>::new();
    let _printer = event_observer.subscribe(print_event);
    let _saver = event_observer.subscribe(move |event: &GameEngineEvent| {
        if let GameEngineEvent::ProfileChanged(profile) = event {
            if let Err(err) = snapshot.save(profile) {
                log::error!(target: "sync", "Could not save progress: {}", err);
            }
        }
    });

    let store = Arc::new(InMemoryProfileStore::new());
    let auth = match std::env::var(TOKEN_VAR) {
        Ok(token) => {
            let credential = Credential::new(token);
            runtime.block_on(store.register(&credential, profile.id));
            AuthSession::signed_in(profile.id, &profile.name, credential)
        }
        Err(_) => AuthSession::anonymous(),
    };
    let (scheduler, mut sync_notices) = SyncScheduler::with_settings(store, &settings);
    let orchestrator = SyncOrchestrator::attach(&event_observer, scheduler, auth);

    let engine = GameEngine::new(profile, settings, command_observer, event_emitter);
    command_emitter.emit(&GameEngineCommand::StartSession {
        mode: GameMode::Practice,
        kind: options.kind,
        difficulty: options.difficulty,
        count: options.count,
    });

    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => (),
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            break;
        }
        if line.eq_ignore_ascii_case("h") {
            command_emitter.emit(&GameEngineCommand::RevealHint);
            continue;
        }
        let Some((answer, remainder)) = parse_answer(line) else {
            println!("Please type a number, like 12 or 3 r 2.");
            continue;
        };
        command_emitter.emit(&GameEngineCommand::SubmitAnswer {
            answer,
            remainder,
            time_spent_seconds: None,
        });

        let finished = engine
            .borrow()
            .session()
            .is_none_or(|session| session.is_last_problem() && session.current_answered());
        if finished {
            break;
        }
        command_emitter.emit(&GameEngineCommand::NextProblem);
    }

    command_emitter.emit(&GameEngineCommand::EndSession);
    engine.borrow_mut().destroy();

    runtime.block_on(SyncOrchestrator::flush(&orchestrator));
    orchestrator.borrow_mut().destroy();
    while let Ok(notice) = sync_notices.try_recv() {
        match notice {
            SyncNotice::Saved(id) => log::info!(target: "sync", "Profile {} synced", id),
            SyncNotice::Failed(reason) => println!("(sync failed: {})", reason),
        }
    }
}
