//! Full lifecycle walkthrough: warning, start, sixty minute boundaries,
//! end, restart, and resume from a persisted timestamp.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use pacebell_core::services::{CuePlayer, Notifier, PermissionCallback, StartTimeStore};
use pacebell_core::{Event, SessionController, SessionState, TOTAL_UNITS};

#[derive(Default)]
struct Recorded {
    start_time: Option<DateTime<Utc>>,
    cues: u32,
    badges: Vec<i64>,
}

/// Shared fake for all three services so two controllers can observe
/// the same durable state, the way two process launches would.
#[derive(Clone, Default)]
struct SharedServices(Arc<Mutex<Recorded>>);

impl StartTimeStore for SharedServices {
    fn start_time(&self) -> pacebell_core::error::Result<Option<DateTime<Utc>>> {
        Ok(self.0.lock().unwrap().start_time)
    }
    fn set_start_time(&self, started_at: DateTime<Utc>) -> pacebell_core::error::Result<()> {
        self.0.lock().unwrap().start_time = Some(started_at);
        Ok(())
    }
    fn clear_start_time(&self) -> pacebell_core::error::Result<()> {
        self.0.lock().unwrap().start_time = None;
        Ok(())
    }
}

impl Notifier for SharedServices {
    fn request_permission(&self, on_result: PermissionCallback) {
        on_result(true);
    }
    fn schedule_notification(
        &self,
        _body: &str,
        _badge: i64,
        _delay_secs: u64,
    ) -> pacebell_core::error::Result<()> {
        Ok(())
    }
    fn set_badge(&self, count: i64) -> pacebell_core::error::Result<()> {
        self.0.lock().unwrap().badges.push(count);
        Ok(())
    }
}

impl CuePlayer for SharedServices {
    fn play_cue(&self) -> pacebell_core::error::Result<()> {
        self.0.lock().unwrap().cues += 1;
        Ok(())
    }
}

fn controller(services: &SharedServices) -> SessionController {
    SessionController::new(
        Box::new(services.clone()),
        Box::new(services.clone()),
        Box::new(services.clone()),
    )
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 20, 0, 0).unwrap()
}

#[test]
fn one_hour_run_fires_a_cue_per_minute() {
    let services = SharedServices::default();
    let mut session = controller(&services);

    session.acknowledge_warning(t0());
    session.start(t0());

    // Tick twice per simulated minute; only the boundary tick cues.
    for minute in 1..TOTAL_UNITS {
        let boundary = t0() + Duration::seconds(minute * 60);
        assert!(session.tick(boundary - Duration::seconds(30)).is_none());
        match session.tick(boundary) {
            Some(Event::UnitElapsed {
                minute: m,
                units_remaining,
                ..
            }) => {
                assert_eq!(m, minute);
                assert_eq!(units_remaining, TOTAL_UNITS - minute);
            }
            other => panic!("expected UnitElapsed at minute {minute}, got {other:?}"),
        }
    }

    let end = session.tick(t0() + Duration::seconds(TOTAL_UNITS * 60));
    assert!(matches!(end, Some(Event::SessionEnded { .. })));
    assert_eq!(session.state(), SessionState::Ended);

    let recorded = services.0.lock().unwrap();
    // One cue at start, one per minute boundary, one at the end.
    assert_eq!(recorded.cues, TOTAL_UNITS as u32 + 1);
    assert_eq!(recorded.start_time, None);
    assert_eq!(recorded.badges.last(), Some(&0));
}

#[test]
fn relaunch_resumes_the_persisted_run() {
    let services = SharedServices::default();

    let mut first = controller(&services);
    first.acknowledge_warning(t0());
    first.start(t0());
    drop(first);

    // A second controller over the same store picks the run up at the
    // disclaimer, keeping the original start timestamp.
    let mut second = controller(&services);
    let resumed = second.acknowledge_warning(t0() + Duration::seconds(150));
    assert!(matches!(
        resumed,
        Some(Event::SessionStarted { resumed: true, .. })
    ));

    let event = second.tick(t0() + Duration::seconds(150));
    match event {
        Some(Event::UnitElapsed {
            minute,
            units_remaining,
            ..
        }) => {
            assert_eq!(minute, 2);
            assert_eq!(units_remaining, TOTAL_UNITS - 2);
        }
        other => panic!("expected UnitElapsed, got {other:?}"),
    }
}

#[test]
fn restart_begins_a_new_budget() {
    let services = SharedServices::default();
    let mut session = controller(&services);

    session.acknowledge_warning(t0());
    session.start(t0());
    session.tick(t0() + Duration::seconds(TOTAL_UNITS * 60));
    assert_eq!(session.state(), SessionState::Ended);

    let restart_at = t0() + Duration::seconds(TOTAL_UNITS * 60 + 300);
    let events = session.restart(restart_at);
    assert!(matches!(events[0], Event::SessionStarted { .. }));
    assert!(matches!(
        events[1],
        Event::UnitElapsed {
            minute: 0,
            units_remaining: TOTAL_UNITS,
            ..
        }
    ));
    assert_eq!(
        services.0.lock().unwrap().start_time,
        Some(restart_at)
    );
}
