//! End-to-end flows across services and state, driven by fixed clocks.

use chrono::Duration;

use cabin_core::model::{BookId, GoalKind};
use cabin_core::session::{SessionState, Subject};
use cabin_core::time::fixed_clock;
use services::{
    LibraryService, MAX_UPLOAD_BYTES, PomodoroService, SessionOutcome, SessionTimer, TimerError,
    Upload, UploadError,
};
use storage::{AppState, NewGoal};

fn timer_at_seconds(secs: i64) -> SessionTimer {
    SessionTimer::new(fixed_clock().advanced(Duration::seconds(secs)))
}

fn first_book(state: &AppState) -> BookId {
    state.reading.books()[0].id()
}

#[test]
fn paused_time_is_excluded_from_elapsed() {
    let mut state = AppState::seeded();
    let book = first_book(&state);

    // start at t=0, pause at 600s, resume at 900s, complete at 1500s
    let id = timer_at_seconds(0)
        .start(&mut state, Subject::Book(book), 30, None)
        .unwrap();
    timer_at_seconds(600).pause(&mut state, id).unwrap();
    timer_at_seconds(900).resume(&mut state, id).unwrap();
    let session = timer_at_seconds(1500)
        .complete(&mut state, id, SessionOutcome::PagesRead(10))
        .unwrap();

    assert_eq!(session.elapsed_seconds(session.ended_at().unwrap()), 1200);
    // 20 active minutes credited, not 25 wall minutes
    assert_eq!(state.reading.book(book).unwrap().reading_minutes(), 20);
}

#[test]
fn conflicting_start_leaves_state_unchanged() {
    let mut state = AppState::seeded();
    let book = first_book(&state);

    timer_at_seconds(0)
        .start(&mut state, Subject::Book(book), 30, None)
        .unwrap();
    let before = state.clone();

    let err = timer_at_seconds(5)
        .start(&mut state, Subject::Book(book), 45, None)
        .unwrap_err();
    assert!(matches!(err, TimerError::Conflict { .. }));
    assert_eq!(state, before);
}

#[test]
fn invalid_transitions_are_rejected_cleanly() {
    let mut state = AppState::seeded();
    let book = first_book(&state);
    let id = timer_at_seconds(0)
        .start(&mut state, Subject::Book(book), 30, None)
        .unwrap();

    // resume a running session
    assert!(timer_at_seconds(10).resume(&mut state, id).is_err());
    assert_eq!(state.sessions.session(id).unwrap().state(), SessionState::Running);

    // complete, then everything else fails
    timer_at_seconds(60)
        .complete(&mut state, id, SessionOutcome::Nothing)
        .unwrap();
    assert!(matches!(
        timer_at_seconds(70).pause(&mut state, id),
        Err(TimerError::UnknownSession(_))
    ));
}

#[test]
fn break_reminders_follow_active_time() {
    let mut state = AppState::seeded();
    let book = first_book(&state);
    timer_at_seconds(0)
        .start(&mut state, Subject::Book(book), 60, Some(25))
        .unwrap();

    assert!(timer_at_seconds(1499).poll_breaks(&mut state).is_empty());
    let due = timer_at_seconds(1500).poll_breaks(&mut state);
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].boundary, 1);
    assert!(timer_at_seconds(1501).poll_breaks(&mut state).is_empty());
}

#[test]
fn wellness_metrics_accumulate() {
    let mut state = AppState::new();
    let clock = fixed_clock();

    state.wellness.add_water(250, clock.now());
    state
        .wellness
        .add_water(250, clock.advanced(Duration::minutes(40)).now());

    assert_eq!(state.wellness.water_intake_ml(), 500);
    assert_eq!(
        state.wellness.last_water_intake(),
        Some(clock.advanced(Duration::minutes(40)).now())
    );
}

#[test]
fn bookmarking_the_same_page_twice_is_one_entry() {
    let mut state = AppState::seeded();
    let book = first_book(&state);

    assert!(state.reading.add_bookmark(book, 100));
    assert!(!state.reading.add_bookmark(book, 100));
    assert_eq!(state.reading.book(book).unwrap().bookmarks(), &[100]);
}

#[test]
fn goal_completion_is_recomputed_not_latched() {
    let mut state = AppState::new();
    let goal = state
        .reading
        .add_goal(NewGoal {
            title: Some("Finish Kintu".to_owned()),
            kind: GoalKind::Pages,
            target: 100,
            deadline: fixed_clock().now() + Duration::days(30),
            unit: "pages".to_owned(),
        })
        .unwrap();

    state.reading.update_goal_progress(goal, 120);
    assert!(state.reading.goal(goal).unwrap().completed());

    state.reading.update_goal_progress(goal, 40);
    assert!(!state.reading.goal(goal).unwrap().completed());
}

#[test]
fn removing_a_book_cancels_its_session() {
    let mut state = AppState::seeded();
    let library = LibraryService::new(fixed_clock());
    let book = first_book(&state);

    library.start_reading(&mut state, book).unwrap();
    library.remove_book(&mut state, book).unwrap();

    assert!(state.reading.book(book).is_none());
    assert!(state.sessions.live_for(Subject::Book(book)).is_none());
    assert_eq!(state.sessions.history()[0].state(), SessionState::Cancelled);
}

#[test]
fn pomodoro_long_break_arrives_on_the_fourth_cycle() {
    let mut state = AppState::new();
    let mut minute = 0i64;
    let mut longs = Vec::new();

    for _ in 0..4 {
        let service = PomodoroService::new(fixed_clock().advanced(Duration::minutes(minute)));
        service.start_focus(&mut state).unwrap();
        let service = PomodoroService::new(fixed_clock().advanced(Duration::minutes(minute + 25)));
        let plan = service.complete_focus(&mut state).unwrap();
        longs.push(plan.long);
        let service = PomodoroService::new(
            fixed_clock().advanced(Duration::minutes(minute + 25 + i64::from(plan.minutes))),
        );
        service.complete_break(&mut state).unwrap();
        minute += 60;
    }

    assert_eq!(longs, vec![false, false, false, true]);
    assert_eq!(state.productivity.total_focus_minutes(), 100);
}

#[test]
fn rejected_upload_mutates_nothing() {
    let mut state = AppState::seeded();
    let library = LibraryService::new(fixed_clock());
    let before = state.clone();

    let err = library
        .import_upload(
            &mut state,
            Upload {
                file_name: "huge.pdf".to_owned(),
                mime_type: "application/pdf".to_owned(),
                size_bytes: MAX_UPLOAD_BYTES + 1,
            },
        )
        .unwrap_err();

    assert!(matches!(err, UploadError::TooLarge { .. }));
    assert_eq!(state, before);
}
