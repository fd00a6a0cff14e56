//! Dispatcher tests on a paused clock with fake playback and lamps

mod common;

use common::{playlist, FakeSource, RecordingLamps};
use oneclick_core::{DeviceId, LampId, Level};
use oneclick_indicator::{BlinkPattern, Indicator, PreemptionTiming, SessionState};
use oneclick_playback::{PlaybackConfig, PlaybackController, PlaybackError, TriggerOutcome};
use oneclick_player::{ButtonBinding, ButtonEvent, Dispatch, Dispatcher};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;

const DEBOUNCE: Duration = Duration::from_millis(1500);

fn buttons() -> Vec<ButtonBinding> {
    vec![
        ButtonBinding { pin: 20, playlist: playlist("A") },
        ButtonBinding { pin: 22, playlist: playlist("B") },
        ButtonBinding { pin: 23, playlist: playlist("C") },
    ]
}

fn dispatcher(source: &Arc<FakeSource>, lamps: &RecordingLamps) -> Dispatcher {
    let controller = PlaybackController::new(
        source.clone(),
        DeviceId::new("dev-kitchen"),
        PlaybackConfig::default(),
    );
    let indicator = Indicator::new(
        Arc::new(lamps.clone()),
        vec![LampId::new(5), LampId::new(6), LampId::new(13)],
        BlinkPattern::default(),
        PreemptionTiming::default(),
    )
    .unwrap();
    Dispatcher::new(&buttons(), DEBOUNCE, controller, indicator)
}

fn started_track(dispatch: &Dispatch) -> String {
    match dispatch {
        Dispatch::Triggered {
            outcome: TriggerOutcome::Started { track, .. },
            ..
        } => track.as_str().trim_start_matches("spotify:track:").to_string(),
        other => panic!("Expected a started track, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn press_a_then_b_then_a_resumes_a() {
    let source = Arc::new(FakeSource::three_by_two());
    let lamps = RecordingLamps::default();
    let mut dispatcher = dispatcher(&source, &lamps);
    let activity = dispatcher.indicator().activity();

    let first = dispatcher.handle(ButtonEvent::now(20)).await;
    assert_eq!(started_track(&first), "A0");
    assert!(dispatcher.indicator().is_running());

    // Inside the first lamp's blink window
    sleep(Duration::from_secs(3)).await;
    let pressed_at = Instant::now();
    let second = dispatcher.handle(ButtonEvent::now(22)).await;
    assert_eq!(started_track(&second), "B0");

    // A's session stopped and cleared the lamps before B's was spawned
    let Dispatch::Triggered { session: first_session, .. } = first else {
        unreachable!()
    };
    assert_eq!(
        activity.last_outcome(),
        Some((first_session, SessionState::Cancelled))
    );
    assert!(lamps.all_dark());
    assert!(pressed_at.elapsed() <= Duration::from_millis(600));

    sleep(Duration::from_secs(2)).await;
    let third = dispatcher.handle(ButtonEvent::now(20)).await;
    assert_eq!(started_track(&third), "A1");

    assert_eq!(source.played(), vec!["A0", "B0", "A1"]);
    assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
    assert_eq!(activity.peak(), 1);
}

#[tokio::test(start_paused = true)]
async fn double_press_inside_debounce_window_triggers_once() {
    let source = Arc::new(FakeSource::three_by_two());
    let lamps = RecordingLamps::default();
    let mut dispatcher = dispatcher(&source, &lamps);

    let pressed = Instant::now();
    let first = dispatcher.handle(ButtonEvent { line: 20, at: pressed }).await;
    let bounce = dispatcher
        .handle(ButtonEvent { line: 20, at: pressed + Duration::from_millis(40) })
        .await;

    assert_eq!(started_track(&first), "A0");
    assert!(matches!(bounce, Dispatch::Bounced));
    assert_eq!(source.played(), vec!["A0"]);

    let later = dispatcher
        .handle(ButtonEvent { line: 20, at: pressed + DEBOUNCE })
        .await;
    assert_eq!(started_track(&later), "A1");
}

#[tokio::test(start_paused = true)]
async fn exhausted_playlist_still_restarts_indicator() {
    let source = Arc::new(FakeSource::three_by_two());
    let lamps = RecordingLamps::default();
    let mut dispatcher = dispatcher(&source, &lamps);

    for _ in 0..2 {
        dispatcher.handle(ButtonEvent::now(23)).await;
        sleep(DEBOUNCE).await;
    }
    let third = dispatcher.handle(ButtonEvent::now(23)).await;

    assert!(matches!(
        third,
        Dispatch::Triggered { outcome: TriggerOutcome::Exhausted { total: 2, .. }, .. }
    ));
    assert_eq!(source.played(), vec!["C0", "C1"]);
    assert!(dispatcher.indicator().is_running());
}

#[tokio::test(start_paused = true)]
async fn failed_fetch_is_contained_and_retried() {
    let source = Arc::new(FakeSource::three_by_two());
    let lamps = RecordingLamps::default();
    let mut dispatcher = dispatcher(&source, &lamps);

    source.fail_next_fetches(1);
    let failed = dispatcher.handle(ButtonEvent::now(22)).await;
    assert!(matches!(failed, Dispatch::Failed(PlaybackError::Fetch { .. })));
    assert!(dispatcher.indicator().active_session().is_none());
    assert!(source.played().is_empty());

    sleep(DEBOUNCE).await;
    let retried = dispatcher.handle(ButtonEvent::now(22)).await;
    assert_eq!(started_track(&retried), "B0");
    assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn unbound_line_is_ignored() {
    let source = Arc::new(FakeSource::three_by_two());
    let lamps = RecordingLamps::default();
    let mut dispatcher = dispatcher(&source, &lamps);

    assert!(matches!(dispatcher.handle(ButtonEvent::now(4)).await, Dispatch::Unbound));
    assert_eq!(source.fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn run_drains_queue_and_leaves_lamps_dark() {
    let source = Arc::new(FakeSource::three_by_two());
    let lamps = RecordingLamps::default();
    let mut dispatcher = dispatcher(&source, &lamps);
    let activity = dispatcher.indicator().activity();

    let (events, queue) = mpsc::unbounded_channel();
    events.send(ButtonEvent::now(20)).unwrap();
    events.send(ButtonEvent::now(22)).unwrap();
    events.send(ButtonEvent::now(20)).unwrap();
    drop(events);

    dispatcher.run(queue, CancellationToken::new()).await;

    // The second press on line 20 falls inside its debounce window
    assert_eq!(source.played(), vec!["A0", "B0"]);
    assert_eq!(activity.started(), 2);
    assert_eq!(activity.running(), 0);
    assert!(lamps.all_dark());
    assert!(lamps.writes().iter().any(|w| w.level == Level::Inactive));
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_running_session() {
    let source = Arc::new(FakeSource::three_by_two());
    let lamps = RecordingLamps::default();
    let mut dispatcher = dispatcher(&source, &lamps);
    let activity = dispatcher.indicator().activity();

    let (events, queue) = mpsc::unbounded_channel();
    let shutdown = CancellationToken::new();

    let stopper = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            events.send(ButtonEvent::now(20)).unwrap();
            sleep(Duration::from_secs(5)).await;
            shutdown.cancel();
            // Keep the queue open so only the token can end the loop
            sleep(Duration::from_secs(60)).await;
            drop(events);
        })
    };

    dispatcher.run(queue, shutdown).await;

    assert_eq!(source.played(), vec!["A0"]);
    assert_eq!(activity.last_outcome().map(|(_, state)| state), Some(SessionState::Cancelled));
    assert!(lamps.all_dark());
    stopper.abort();
}
