use std::time::Duration;

use chrono::Utc;
use clap::Subcommand;
use pacebell_core::clock;
use pacebell_core::session::{SessionController, SessionState};
use pacebell_core::storage::{Config, Database};
use pacebell_core::Event;

use crate::services::{ConsoleNotifier, TerminalCue};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Acknowledge the disclaimer (resumes a persisted run if present)
    Ack,
    /// Start a run (acknowledges the disclaimer first if needed)
    Start,
    /// Restart after the unit budget ran out
    Restart,
    /// Print the current session state as JSON
    Status,
    /// Drive the session in the foreground, ticking once per interval
    Run {
        /// Seconds between ticks
        #[arg(long, default_value = "1")]
        interval_secs: u64,
    },
}

fn controller() -> Result<SessionController, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load()?;
    Ok(SessionController::new(
        Box::new(db),
        Box::new(ConsoleNotifier),
        Box::new(TerminalCue::from_config(&config)),
    ))
}

fn print_events(events: &[Event]) -> Result<(), Box<dyn std::error::Error>> {
    for event in events {
        println!("{}", serde_json::to_string_pretty(event)?);
    }
    Ok(())
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = controller()?;
    let now = Utc::now();

    match action {
        SessionAction::Ack => {
            if let Some(event) = session.acknowledge_warning(now) {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
        }
        SessionAction::Start => {
            session.acknowledge_warning(now);
            let events = session.start(now);
            if events.is_empty() {
                // Already running; show where the run stands instead.
                println!("{}", serde_json::to_string_pretty(&session.snapshot(now))?);
            } else {
                print_events(&events)?;
            }
        }
        SessionAction::Restart => {
            session.acknowledge_warning(now);
            // A resumed run that already overran its budget ends on
            // this tick, which is what makes a restart valid.
            session.tick(now);
            let events = session.restart(now);
            if events.is_empty() {
                eprintln!("nothing to restart; no ended session");
            } else {
                print_events(&events)?;
            }
        }
        SessionAction::Status => {
            session.acknowledge_warning(now);
            session.tick(now);
            println!("{}", serde_json::to_string_pretty(&session.snapshot(now))?);
        }
        SessionAction::Run { interval_secs } => run_loop(&mut session, interval_secs)?,
    }

    Ok(())
}

/// Foreground driver: this loop is the "external scheduler" that
/// delivers the periodic tick.
fn run_loop(
    session: &mut SessionController,
    interval_secs: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let now = Utc::now();
    session.acknowledge_warning(now);
    if session.state() == SessionState::BeforeStart {
        print_events(&session.start(now))?;
    }

    loop {
        std::thread::sleep(Duration::from_secs(interval_secs));
        let now = Utc::now();
        if let Some(event) = session.tick(now) {
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        match session.state() {
            SessionState::Started { started_at, .. } => {
                let elapsed = clock::elapsed(now, started_at);
                println!(
                    "{} elapsed | next unit in {}s | {} remaining",
                    clock::format_elapsed(&elapsed),
                    clock::seconds_to_next_unit(elapsed.seconds),
                    clock::units_remaining(elapsed.minutes).max(0),
                );
            }
            _ => break,
        }
    }

    Ok(())
}
