//! Integration tests for driving the controller from the tick schedule.
//!
//! Uses paused tokio time, so a 10-minute session runs instantly.

use tokio::time::{advance, Duration};

use lockin::{AppController, MockSessionStore, SessionDraft, TickSchedule};

/// Runs the controller until the session ends, syncing the schedule the
/// way the event loop does. Returns the number of ticks delivered.
async fn drive_to_end(controller: &mut AppController<MockSessionStore>, schedule: &mut TickSchedule) -> u32 {
    let mut ticks = 0;
    loop {
        schedule.sync(controller.is_counting());
        schedule.next().await;
        ticks += 1;
        if controller.tick().is_some() {
            schedule.sync(controller.is_counting());
            return ticks;
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_schedule_drives_session_to_completion() {
    let mut controller = AppController::new(MockSessionStore::new());
    controller.commit_draft(SessionDraft::new("Read", 10).unwrap());
    controller.start_session();
    controller.toggle_running();

    let mut schedule = TickSchedule::every_second();
    let ticks = drive_to_end(&mut controller, &mut schedule).await;

    assert_eq!(ticks, 600);
    assert_eq!(controller.history().len(), 1);
    assert!(!schedule.is_armed());
    assert_eq!(schedule.armed_count(), 1);
    assert_eq!(schedule.cancelled_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_schedule_disarms_during_break() {
    let mut controller = AppController::new(MockSessionStore::new());
    controller.commit_draft(SessionDraft::new("Read", 1).unwrap());
    controller.start_session();
    controller.toggle_running();

    let mut schedule = TickSchedule::every_second();
    schedule.sync(controller.is_counting());
    for _ in 0..30 {
        schedule.next().await;
        controller.tick();
    }

    controller.toggle_break();
    schedule.sync(controller.is_counting());
    assert!(!schedule.is_armed());

    // A long break delivers nothing and loses nothing
    advance(Duration::from_secs(600)).await;
    assert_eq!(controller.engine().unwrap().remaining_seconds(), 30);

    controller.toggle_break();
    let ticks = drive_to_end(&mut controller, &mut schedule).await;
    assert_eq!(ticks, 30);
    assert_eq!(schedule.armed_count(), 2);
    assert_eq!(schedule.cancelled_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_forfeit_releases_schedule() {
    let mut controller = AppController::new(MockSessionStore::new());
    controller.commit_draft(SessionDraft::new("Write", 25).unwrap());
    controller.start_session();
    controller.toggle_running();

    let mut schedule = TickSchedule::every_second();
    schedule.sync(controller.is_counting());
    schedule.next().await;
    controller.tick();

    controller.forfeit().unwrap();
    schedule.sync(controller.is_counting());

    assert!(!schedule.is_armed());
    assert_eq!(schedule.cancelled_count(), 1);
}
