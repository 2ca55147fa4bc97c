use std::fmt;

use chrono::{DateTime, Utc};
use quiz_core::model::ModuleId;
use storage::repository::{ProgressRepository, Storage};

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    course: String,
    positioning_score: Option<f64>,
    module: Option<ModuleId>,
    module_scores: Vec<f64>,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingCourse,
    UnknownArg(String),
    InvalidScore { flag: &'static str, raw: String },
    InvalidDbUrl { raw: String },
    InvalidNow { raw: String },
    InvalidModule { raw: String },
    ScoresWithoutModule,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingCourse => write!(f, "--course is required"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidScore { flag, raw } => {
                write!(f, "invalid {flag} value (expected 0..=100): {raw}")
            }
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
            }
            ArgsError::InvalidModule { raw } => write!(f, "invalid --module value: {raw:?}"),
            ArgsError::ScoresWithoutModule => write!(f, "--module-score requires --module"),
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

fn parse_score(flag: &'static str, raw: String) -> Result<f64, ArgsError> {
    match raw.parse::<f64>() {
        Ok(score) if (0.0..=100.0).contains(&score) => Ok(score),
        _ => Err(ArgsError::InvalidScore { flag, raw }),
    }
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("QUIZ_DB_URL").unwrap_or_else(|_| "sqlite:quiz.sqlite3?mode=rwc".into());
        let mut course = None;
        let mut positioning_score = None;
        let mut module = None;
        let mut module_scores = Vec::new();
        let mut now: Option<DateTime<Utc>> = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--course" => course = Some(require_value(&mut args, "--course")?),
                "--positioning-score" => {
                    let value = require_value(&mut args, "--positioning-score")?;
                    positioning_score = Some(parse_score("--positioning-score", value)?);
                }
                "--module" => {
                    let value = require_value(&mut args, "--module")?;
                    let parsed = value
                        .parse::<ModuleId>()
                        .map_err(|_| ArgsError::InvalidModule { raw: value.clone() })?;
                    module = Some(parsed);
                }
                "--module-score" => {
                    let value = require_value(&mut args, "--module-score")?;
                    module_scores.push(parse_score("--module-score", value)?);
                }
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value.clone() })?
                        .with_timezone(&Utc);
                    now = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        if module.is_none() && !module_scores.is_empty() {
            return Err(ArgsError::ScoresWithoutModule);
        }

        Ok(Self {
            db_url,
            course: course.ok_or(ArgsError::MissingCourse)?,
            positioning_score,
            module,
            module_scores,
            now,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- --course <title> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>            SQLite URL (default: sqlite:quiz.sqlite3?mode=rwc)");
    eprintln!("  --positioning-score <score>  Record a graded positioning test");
    eprintln!("  --module <id>                Module to record scores for");
    eprintln!("  --module-score <score>       Record a graded module attempt (repeatable)");
    eprintln!("  --now <rfc3339>              Timestamp to record (default: now)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL");
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().inspect_err(|_| print_usage())?;
    let storage = Storage::sqlite(&args.db_url).await?;
    let now = args.now.unwrap_or_else(Utc::now);

    if let Some(score) = args.positioning_score {
        let record = storage
            .progress
            .record_positioning_result(&args.course, score, now)
            .await?;
        println!("positioning for {}: {}", args.course, record.status);
    }

    if let Some(module) = &args.module {
        for score in &args.module_scores {
            let progress = storage
                .progress
                .record_module_result(&args.course, module, *score, now)
                .await?;
            println!(
                "module {} of {}: {} attempt(s), status {}",
                module,
                args.course,
                progress.attempts(),
                progress.status().as_str()
            );
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
