use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use quiz_core::QuizConfig;
use quiz_core::config::{
    DEFAULT_INITIAL_SECONDS, DEFAULT_MAX_CONSECUTIVE_WRONG, DEFAULT_QUESTION_COUNT,
};
use quiz_core::model::QuestionBank;
use quiz_services::{Clock, IntervalTickers, QuizService, ServiceError, TickerSource, load_bank};
use quiz_ui::{App, UiApp, build_app_context};

#[derive(Debug, PartialEq, Eq)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidNumber { flag: &'static str, raw: String },
    EmptyBankPath,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::EmptyBankPath => write!(f, "--bank requires a non-empty path"),
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

fn parse_number<T: std::str::FromStr>(raw: String, flag: &'static str) -> Result<T, ArgsError> {
    raw.parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw })
}

struct DesktopApp {
    quiz_service: Arc<QuizService>,
    tickers: Arc<dyn TickerSource>,
}

impl UiApp for DesktopApp {
    fn quiz_service(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz_service)
    }

    fn tickers(&self) -> Arc<dyn TickerSource> {
        Arc::clone(&self.tickers)
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    bank: Option<PathBuf>,
    questions: usize,
    seconds: u32,
    strikes: u32,
    seed: Option<u64>,
    verbose: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quiz ui    [--bank <path>] [--questions <n>] [--seconds <n>] [--strikes <n>] [--seed <u64>] [-v]");
    eprintln!("  quiz check [--bank <path>] [--questions <n>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  built-in question bank");
    eprintln!("  --questions {DEFAULT_QUESTION_COUNT}");
    eprintln!("  --seconds {DEFAULT_INITIAL_SECONDS}");
    eprintln!("  --strikes {DEFAULT_MAX_CONSECUTIVE_WRONG}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_BANK, QUIZ_SEED, QUIZ_LOG (tracing filter, e.g. info)");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Check,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "check" => Some(Self::Check),
            _ => None,
        }
    }
}

impl Args {
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            bank: env("QUIZ_BANK")
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from),
            questions: DEFAULT_QUESTION_COUNT,
            seconds: DEFAULT_INITIAL_SECONDS,
            strikes: DEFAULT_MAX_CONSECUTIVE_WRONG,
            seed: env("QUIZ_SEED").and_then(|value| value.parse::<u64>().ok()),
            verbose: false,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--bank" => {
                    let value = require_value(args, "--bank")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::EmptyBankPath);
                    }
                    parsed.bank = Some(PathBuf::from(value));
                }
                "--questions" => {
                    parsed.questions = parse_number(require_value(args, "--questions")?, "--questions")?;
                }
                "--seconds" => {
                    parsed.seconds = parse_number(require_value(args, "--seconds")?, "--seconds")?;
                }
                "--strikes" => {
                    parsed.strikes = parse_number(require_value(args, "--strikes")?, "--strikes")?;
                }
                "--seed" => {
                    parsed.seed = Some(parse_number(require_value(args, "--seed")?, "--seed")?);
                }
                "--verbose" | "-v" => parsed.verbose = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }
}

fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let level = if verbose { "info" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_env("QUIZ_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| format!("failed to initialize tracing subscriber: {err}"))?;
    Ok(())
}

fn read_bank(path: Option<&PathBuf>) -> Result<QuestionBank, ServiceError> {
    match path {
        Some(path) => Ok(load_bank(path)?),
        None => Ok(QuestionBank::builtin()),
    }
}

/// Resolves the question bank and session config the flags ask for.
fn load_settings(args: &Args) -> Result<(QuestionBank, QuizConfig), ServiceError> {
    let bank = read_bank(args.bank.as_ref())?;
    let config = QuizConfig::new(args.questions, args.seconds, args.strikes)?;
    Ok((bank, config))
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Launching the UI is the default when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with('-') => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with('-') {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter, |key| std::env::var(key).ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing(parsed.verbose)?;

    let (bank, config) = load_settings(&parsed)?;

    match cmd {
        Command::Check => {
            let source = parsed
                .bank
                .as_ref()
                .map_or_else(|| "built-in".to_string(), |path| path.display().to_string());
            println!("bank: {source}");
            println!("questions: {}", bank.len());
            if bank.len() >= config.question_count() {
                println!("ok: enough for a {}-question session", config.question_count());
                Ok(())
            } else {
                Err(format!(
                    "bank has {} questions, a session needs {}",
                    bank.len(),
                    config.question_count()
                )
                .into())
            }
        }
        Command::Ui => {
            let mut service = QuizService::new(Arc::new(bank), config, Clock::system())?;
            if let Some(seed) = parsed.seed {
                tracing::info!(seed, "using seeded question order");
                service = service.with_seed(seed);
            }

            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                quiz_service: Arc::new(service),
                tickers: Arc::new(IntervalTickers::every_second()),
            });
            let context = build_app_context(&app);

            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Genel Kültür Testi")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
