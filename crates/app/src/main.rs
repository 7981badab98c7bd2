use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

use cabin_core::model::{BookId, FlightPhase};
use cabin_core::session::SessionState;
use services::{Clock, LibraryService, SessionOutcome, SessionTimer, Ticker};
use storage::AppState;
use tracing::info;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidBookId { raw: String },
    InvalidNumber { flag: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidBookId { raw } => write!(f, "invalid --book value: {raw}"),
            ArgsError::InvalidNumber { flag, raw } => {
                write!(f, "invalid {flag} value: {raw}")
            }
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
    eprintln!("  cargo run -p app -- [--route <id>] [--book <id>] [--minutes <n>] [--tick-ms <n>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --route entebbe-london");
    eprintln!("  --book 1");
    eprintln!("  --minutes 30");
    eprintln!("  --tick-ms 1000");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  CABIN_ROUTE, CABIN_BOOK");
}

struct Args {
    route: String,
    book: BookId,
    minutes: u32,
    tick_ms: u64,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut route = std::env::var("CABIN_ROUTE")
            .ok()
            .unwrap_or_else(|| "entebbe-london".to_owned());
        let mut book = std::env::var("CABIN_BOOK")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map_or_else(|| BookId::new(1), BookId::new);
        let mut minutes = 30u32;
        let mut tick_ms = 1000u64;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--route" => {
                    route = require_value(args, "--route")?;
                }
                "--book" => {
                    let value = require_value(args, "--book")?;
                    book = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidBookId { raw: value.clone() })?;
                }
                "--minutes" => {
                    let value = require_value(args, "--minutes")?;
                    minutes = parse_number(&value, "--minutes")?;
                }
                "--tick-ms" => {
                    let value = require_value(args, "--tick-ms")?;
                    tick_ms = parse_number(&value, "--tick-ms")?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            route,
            book,
            minutes,
            tick_ms,
        })
    }
}

fn parse_number<T: std::str::FromStr>(value: &str, flag: &'static str) -> Result<T, ArgsError> {
    value.parse().map_err(|_| ArgsError::InvalidNumber {
        flag,
        raw: value.to_owned(),
    })
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let clock = Clock::system();
    let mut state = AppState::seeded();

    if !state.flight.select_route(&args.route) {
        eprintln!("unknown route: {}", args.route);
        eprintln!("available routes:");
        for route in state.flight.routes() {
            eprintln!("  {} ({} min)", route.id, route.duration_minutes);
        }
        std::process::exit(2);
    }
    state.flight.set_phase(FlightPhase::Takeoff, clock.now());
    let route = state
        .flight
        .selected_route()
        .map(|r| r.name.clone())
        .unwrap_or_default();
    info!(route = %route, "flight started");

    let mut defaults = state.settings.reading_defaults();
    defaults.session_minutes = args.minutes;
    state.settings.set_reading_defaults(defaults);

    let library = LibraryService::new(clock);
    let timer = SessionTimer::new(clock);
    let session_id = library.start_reading(&mut state, args.book)?;
    let title = state
        .reading
        .book(args.book)
        .map(|b| b.title().to_owned())
        .unwrap_or_default();
    println!("Reading \"{title}\" for {} minutes. Ctrl-C to abandon.", args.minutes);

    let (ticker, mut ticks) = Ticker::spawn(Duration::from_millis(args.tick_ms));
    while ticks.recv().await.is_some() {
        for due in timer.poll_breaks(&mut state) {
            println!("Break time! That was stretch reminder #{}.", due.boundary);
            timer.record_break(&mut state, due.session_id)?;
            state.wellness.take_break(clock.now());
        }

        let Some(remaining) = timer.remaining_seconds(&state, session_id) else {
            break;
        };
        if remaining == 0 {
            let session = timer.complete(&mut state, session_id, SessionOutcome::Nothing)?;
            debug_assert_eq!(session.state(), SessionState::Completed);
            break;
        }
        print!("\r{:02}:{:02} remaining  ", remaining / 60, remaining % 60);
        let _ = io::stdout().flush();
    }
    ticker.stop();

    let book = state.reading.book(args.book);
    println!();
    println!("Session complete.");
    if let Some(book) = book {
        println!(
            "  {} now has {} reading minutes on record.",
            book.title(),
            book.reading_minutes()
        );
    }
    println!(
        "  Flight progress: {:.0}%",
        state.flight.progress(clock.now()) * 100.0
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
