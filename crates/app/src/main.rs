use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use quiz_core::model::{Answer, AttemptKind, ModuleId, PositioningStatus, QuizContext};
use services::{
    Clock, GradingService, HttpEvaluationClient, PositioningService, ProgressTrackingGrader,
    QuestionSource, QuizConfig, QuizSession, QuizTimer, SessionHandle, SessionStatus, SessionView,
    SubmitOutcome,
};
use storage::repository::{ProgressRepository, Storage};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingFlag { flag: &'static str },
    UnknownArg(String),
    InvalidModule { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingFlag { flag } => write!(f, "{flag} is required"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidModule { raw } => write!(f, "invalid --module value: {raw:?}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid database url: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quiz run    --course <title> --module <id> --topic <topic>... [--positioning] [--config <file>]");
    eprintln!("  quiz status --course <title> [--module <id>] [--config <file>]");
    eprintln!();
    eprintln!("During a quiz:");
    eprintln!("  n / p        next / previous question");
    eprintln!("  <number>     jump to question");
    eprintln!("  a <answer>   answer the current question (option number or text)");
    eprintln!("  s            submit for grading");
    eprintln!("  r            retake after grading");
    eprintln!("  q            quit");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_API_URL, QUIZ_API_TOKEN, QUIZ_LANGUAGE, QUIZ_SECONDS_PER_QUESTION,");
    eprintln!("  QUIZ_TIME_LIMIT_SECS, QUIZ_DB_URL, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Run,
    Status,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "run" => Some(Self::Run),
            "status" => Some(Self::Status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RunArgs {
    course: String,
    module: ModuleId,
    topics: Vec<String>,
    positioning: bool,
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StatusArgs {
    course: String,
    module: Option<ModuleId>,
    config: Option<PathBuf>,
}

fn parse_module(raw: String) -> Result<ModuleId, ArgsError> {
    raw.parse().map_err(|_| ArgsError::InvalidModule { raw })
}

impl RunArgs {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut course = None;
        let mut module = None;
        let mut topics = Vec::new();
        let mut positioning = false;
        let mut config = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--course" => course = Some(require_value(args, "--course")?),
                "--module" => module = Some(parse_module(require_value(args, "--module")?)?),
                "--topic" => topics.push(require_value(args, "--topic")?),
                "--positioning" => positioning = true,
                "--config" => config = Some(PathBuf::from(require_value(args, "--config")?)),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        if topics.is_empty() {
            return Err(ArgsError::MissingFlag { flag: "--topic" });
        }
        Ok(Self {
            course: course.ok_or(ArgsError::MissingFlag { flag: "--course" })?,
            module: module.ok_or(ArgsError::MissingFlag { flag: "--module" })?,
            topics,
            positioning,
            config,
        })
    }
}

impl StatusArgs {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut course = None;
        let mut module = None;
        let mut config = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--course" => course = Some(require_value(args, "--course")?),
                "--module" => module = Some(parse_module(require_value(args, "--module")?)?),
                "--config" => config = Some(PathBuf::from(require_value(args, "--config")?)),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            course: course.ok_or(ArgsError::MissingFlag { flag: "--course" })?,
            module,
            config,
        })
    }
}

fn normalize_sqlite_url(raw: &str) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw.to_string();
    }

    let trimmed = raw.trim();
    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = std::path::Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn open_storage(config: &QuizConfig) -> Result<Storage, Box<dyn std::error::Error>> {
    // Open + migrate SQLite in the binary glue so services stay storage-agnostic.
    let db_url = normalize_sqlite_url(&config.storage.db_url);
    prepare_sqlite_file(&db_url)?;
    Ok(Storage::sqlite(&db_url).await?)
}

//
// ─── INTERACTIVE LOOP ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Next,
    Prev,
    GoTo(usize),
    Answer(String),
    Submit,
    Reset,
    Quit,
    Help,
    Yes,
    Unknown(String),
}

impl Input {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        if line == "a" {
            return Self::Answer(String::new());
        }
        if let Some(rest) = line.strip_prefix("a ") {
            return Self::Answer(rest.trim().to_string());
        }
        match line {
            "n" => Self::Next,
            "p" => Self::Prev,
            "s" => Self::Submit,
            "r" => Self::Reset,
            "q" => Self::Quit,
            "h" | "?" => Self::Help,
            "y" | "yes" => Self::Yes,
            other => match other.parse::<usize>() {
                Ok(number) if number > 0 => Self::GoTo(number - 1),
                _ => Self::Unknown(other.to_string()),
            },
        }
    }
}

enum Event {
    TimedOut,
    Submitted(SubmitOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    TimeUp,
    Submit,
}

/// Positioning lookup for the course being quizzed.
struct Placement {
    service: PositioningService,
    course: String,
}

impl Placement {
    async fn attempt_kind(&self) -> AttemptKind {
        self.service.attempt_kind(&self.course).await
    }
}

fn confirmation_prompt(
    trigger: Trigger,
    attempt: Option<AttemptKind>,
    unanswered: usize,
) -> String {
    let mut prompt = String::new();
    if trigger == Trigger::TimeUp {
        prompt.push_str("Time is up. ");
    }
    if unanswered > 0 {
        prompt.push_str(&format!("{unanswered} question(s) unanswered. "));
    }
    prompt.push_str(match attempt {
        None => "Submit now?",
        Some(AttemptKind::First) => "Submit your first positioning test for this course?",
        Some(AttemptKind::Retake) => {
            "Submit this positioning retake? The new score replaces the recorded one."
        }
    });
    prompt.push_str(" [y/N]");
    prompt
}

async fn ask_to_submit(handle: &SessionHandle, placement: Option<&Placement>, trigger: Trigger) {
    let attempt = match placement {
        Some(placement) => Some(placement.attempt_kind().await),
        None => None,
    };
    let unanswered = handle.view().progress.unattempted;
    println!();
    println!("{}", confirmation_prompt(trigger, attempt, unanswered));
}

fn answer_for(view: &SessionView, raw: &str) -> Option<Answer> {
    let question = view.current_question.as_ref()?;
    if question.is_multiple_choice() {
        let number: usize = raw.parse().ok()?;
        number.checked_sub(1).map(Answer::Choice)
    } else {
        Some(Answer::text(raw))
    }
}

fn start_timer(
    handle: &SessionHandle,
    config: &QuizConfig,
    events: &mpsc::UnboundedSender<Event>,
) -> QuizTimer {
    let question_count = handle.read(|s| s.questions().len());
    let limit = config.time_limit(question_count);
    let events = events.clone();
    QuizTimer::start(limit.as_secs(), handle.lifecycle(), move || {
        let _ = events.send(Event::TimedOut);
    })
}

fn submit(
    handle: &SessionHandle,
    grader: &Arc<dyn GradingService>,
    events: &mpsc::UnboundedSender<Event>,
) {
    let pending = handle.submit(Arc::clone(grader));
    let events = events.clone();
    tokio::spawn(async move {
        let outcome = pending.await;
        let _ = events.send(Event::Submitted(outcome));
    });
}

fn render(view: &SessionView, timer: &QuizTimer) {
    let remaining = timer.remaining_seconds();
    println!();
    println!(
        "[{}/{} answered, {:.0}%]  time left {:02}:{:02}",
        view.progress.attempted,
        view.progress.total,
        view.progress.percentage,
        remaining / 60,
        remaining % 60
    );

    let Some(question) = &view.current_question else {
        println!("(no questions)");
        return;
    };
    println!(
        "Question {}/{}: {}",
        view.current_index + 1,
        view.total_questions,
        question.prompt()
    );
    for (index, option) in question.options().iter().enumerate() {
        let marker = if view.current_answer == Some(Answer::Choice(index)) {
            '*'
        } else {
            ' '
        };
        println!("  {marker}{}. {option}", index + 1);
    }
    if let Some(Answer::Text(text)) = &view.current_answer {
        println!("  your answer: {text}");
    }
    if view.is_last_question() {
        println!("  (last question, s to submit)");
    }
}

fn render_result(view: &SessionView) {
    let Some(result) = &view.result else {
        return;
    };
    println!();
    println!(
        "Score: {:.1} / 100  ({})",
        result.score(),
        if result.passed() { "passed" } else { "not passed" }
    );
    if let Some(guide) = result.study_guide() {
        println!();
        println!("{guide}");
    }
    println!();
    println!("r to retake, q to quit");
}

async fn drive(
    handle: SessionHandle,
    grader: Arc<dyn GradingService>,
    placement: Option<Placement>,
    config: &QuizConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let (events_tx, mut events) = mpsc::unbounded_channel();
    let mut timer = start_timer(&handle, config, &events_tx);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut confirming = false;

    render(&handle.view(), &timer);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let input = Input::parse(&line);

                if confirming {
                    confirming = false;
                    if input == Input::Yes {
                        submit(&handle, &grader, &events_tx);
                    } else {
                        println!("Continuing without submitting.");
                    }
                    continue;
                }

                match input {
                    Input::Next => {
                        handle.update(QuizSession::go_to_next_question);
                    }
                    Input::Prev => {
                        handle.update(QuizSession::go_to_prev_question);
                    }
                    Input::GoTo(index) => {
                        handle.update(|s| s.go_to_question(index));
                    }
                    Input::Answer(raw) => {
                        let view = handle.view();
                        match answer_for(&view, &raw) {
                            Some(answer) => {
                                if let Err(err) = handle.update(|s| s.save_current_answer(answer)) {
                                    println!("{err}");
                                }
                            }
                            None => println!("Enter an option number."),
                        }
                    }
                    Input::Submit => {
                        let view = handle.view();
                        let needs_confirmation =
                            placement.is_some() || !view.progress.is_complete();
                        if view.status == SessionStatus::Ready && needs_confirmation {
                            ask_to_submit(&handle, placement.as_ref(), Trigger::Submit).await;
                            confirming = true;
                        } else {
                            submit(&handle, &grader, &events_tx);
                        }
                        continue;
                    }
                    Input::Reset => {
                        if handle.update(QuizSession::reset_to_first_question) {
                            timer = start_timer(&handle, config, &events_tx);
                        } else {
                            println!("Retake is available after grading.");
                        }
                    }
                    Input::Quit => break,
                    Input::Help => print_usage(),
                    Input::Yes | Input::Unknown(_) => println!("Unknown command (h for help)."),
                }
                render(&handle.view(), &timer);
            }
            Some(event) = events.recv() => match event {
                Event::TimedOut => {
                    if handle.status() == SessionStatus::Ready {
                        ask_to_submit(&handle, placement.as_ref(), Trigger::TimeUp).await;
                        confirming = true;
                    }
                }
                Event::Submitted(SubmitOutcome::Graded) => render_result(&handle.view()),
                Event::Submitted(SubmitOutcome::Failed(err)) => {
                    println!("Submission failed: {err}");
                    println!("Your answers are kept; s to retry.");
                }
                Event::Submitted(SubmitOutcome::Ignored(status)) => {
                    println!("Nothing to submit while {status:?}.");
                }
                Event::Submitted(SubmitOutcome::Discarded) => {}
            },
        }
    }

    Ok(())
}

//
// ─── COMMANDS ──────────────────────────────────────────────────────────────────
//

async fn run_quiz(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = QuizConfig::load(args.config.as_deref())?;
    tracing::debug!(?config, "configuration loaded");
    let storage = open_storage(&config).await?;
    let clock = Clock::system();

    let placement = args.positioning.then(|| Placement {
        service: PositioningService::new(Arc::clone(&storage.progress)),
        course: args.course.clone(),
    });

    let client = HttpEvaluationClient::new(&config)?;
    let source: Arc<dyn QuestionSource> = Arc::new(client.clone());
    let grader: Arc<dyn GradingService> = Arc::new(ProgressTrackingGrader::new(
        client,
        Arc::clone(&storage.progress),
        clock,
    ));

    let context = QuizContext::new(args.module, args.course, args.topics, args.positioning);
    let handle = SessionHandle::new(QuizSession::new(context, clock));

    println!("Loading questions...");
    handle.load(source).await;
    if let Some(err) = handle.view().load_error {
        return Err(err.into());
    }

    drive(handle, grader, placement, &config).await
}

async fn show_status(args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = QuizConfig::load(args.config.as_deref())?;
    let storage = open_storage(&config).await?;

    let status = storage
        .progress
        .get_positioning_status(&args.course)
        .await?
        .unwrap_or(PositioningStatus::NotAttempted);
    println!("{}: positioning {status}", args.course);

    if let Some(module) = args.module {
        match storage.progress.get_module_progress(&args.course, &module).await? {
            Some(progress) => println!(
                "{module}: {} after {} attempt(s), best score {}",
                progress.status().as_str(),
                progress.attempts(),
                progress
                    .best_score()
                    .map_or_else(|| "-".to_string(), |score| format!("{score:.1}"))
            ),
            None => println!("{module}: not started"),
        }
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);

    let cmd = match argv.next() {
        None => {
            print_usage();
            return Ok(());
        }
        Some(first) if first == "--help" || first == "-h" => {
            print_usage();
            return Ok(());
        }
        Some(first) => Command::from_arg(&first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    let report = |e: ArgsError| {
        eprintln!("{e}");
        print_usage();
        e
    };

    match cmd {
        Command::Run => run_quiz(RunArgs::parse(&mut argv).map_err(report)?).await,
        Command::Status => show_status(StatusArgs::parse(&mut argv).map_err(report)?).await,
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
