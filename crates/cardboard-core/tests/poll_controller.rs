//! Integration tests for the poll controller.
//!
//! Every test runs on tokio's paused clock: idle time auto-advances to the
//! next timer, so call instants recorded by `ScriptedFetcher` are exact.

use std::sync::Arc;
use std::time::Duration;

use cardboard_core::test_support::{ScriptedFetcher, items_body};
use cardboard_core::{
    CardData, FetchError, FetchResponse, PollConfig, PollController, PollError, PollFailure,
    RecordingDiagnostics,
};
use tokio::time::Instant;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn activate(
    config: PollConfig,
    fetcher: &Arc<ScriptedFetcher>,
    diagnostics: &Arc<RecordingDiagnostics>,
) -> PollController {
    PollController::activate(config, Arc::clone(fetcher), diagnostics.clone()).unwrap()
}

fn gaps(fetcher: &ScriptedFetcher) -> Vec<Duration> {
    fetcher
        .calls()
        .windows(2)
        .map(|pair| pair[1].at - pair[0].at)
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_success_publishes_items_and_schedules_at_base_interval() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let diagnostics = Arc::new(RecordingDiagnostics::new());
    fetcher.respond(200, r#"{"items":[{"title":"T1","content":"C1"}]}"#);
    fetcher.set_fallback(Ok(FetchResponse::new(200, r#"{"items":[]}"#)));

    let start = Instant::now();
    let controller = activate(PollConfig::new().with_endpoint("/d"), &fetcher, &diagnostics);
    let mut status = controller.subscribe_status();
    status
        .wait_for(|s| s.cycles == 1 && s.timer_pending)
        .await
        .unwrap();

    assert_eq!(&*controller.cards(), &[CardData::new("T1", "C1")]);
    let snapshot = controller.status();
    assert_eq!(snapshot.interval, ms(2_000));
    assert_eq!(snapshot.next_cycle_at, Some(start + ms(2_000)));
    assert!(diagnostics.is_empty());

    status
        .wait_for(|s| s.cycles == 2 && !s.in_flight)
        .await
        .unwrap();
    let calls = fetcher.calls();
    assert_eq!(calls[0].url, "/d");
    assert_eq!(calls[0].at, start);
    assert_eq!(calls[1].at, start + ms(2_000));

    controller.deactivate().await;
}

#[tokio::test(start_paused = true)]
async fn test_repeated_status_failures_double_interval() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let diagnostics = Arc::new(RecordingDiagnostics::new());
    fetcher.set_fallback(Ok(FetchResponse::new(503, r#"{"items":[]}"#)));

    let controller = activate(PollConfig::new().with_endpoint("/d"), &fetcher, &diagnostics);
    assert_eq!(controller.status().interval, ms(2_000));

    let mut status = controller.subscribe_status();
    let mut intervals = vec![status.borrow().interval];
    for failures in 1..=3u32 {
        status
            .wait_for(|s| s.consecutive_failures == failures && s.timer_pending)
            .await
            .unwrap();
        intervals.push(status.borrow().interval);
        assert!(controller.cards().is_empty());
    }

    assert_eq!(intervals, vec![ms(2_000), ms(4_000), ms(8_000), ms(16_000)]);
    assert_eq!(gaps(&fetcher), vec![ms(4_000), ms(8_000)]);
    assert_eq!(diagnostics.len(), 3);
    assert!(diagnostics.failures().iter().all(|f| matches!(
        f,
        PollFailure::Status { status: 503, endpoint } if endpoint == "/d"
    )));

    controller.deactivate().await;
}

#[tokio::test(start_paused = true)]
async fn test_snapshot_only_never_schedules() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let diagnostics = Arc::new(RecordingDiagnostics::new());

    let controller = activate(
        PollConfig::new().with_snapshot(r#"[{"title":"S","content":"X"}]"#),
        &fetcher,
        &diagnostics,
    );
    assert_eq!(&*controller.cards(), &[CardData::new("S", "X")]);
    assert_eq!(controller.store().len(), 1);

    tokio::time::sleep(Duration::from_secs(600)).await;
    assert_eq!(fetcher.call_count(), 0);
    let status = controller.status();
    assert!(status.active);
    assert!(!status.timer_pending);
    assert_eq!(status.cycles, 0);

    controller.deactivate().await;
    assert!(!controller.is_active());
}

#[tokio::test(start_paused = true)]
async fn test_transport_failure_keeps_last_good_list() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let diagnostics = Arc::new(RecordingDiagnostics::new());
    fetcher.respond(200, items_body(&[CardData::new("T1", "C1")]));
    fetcher.fail(FetchError::Connect("Network error".to_string()));

    let start = Instant::now();
    let controller = activate(PollConfig::new().with_endpoint("/d"), &fetcher, &diagnostics);
    let mut status = controller.subscribe_status();
    status
        .wait_for(|s| s.consecutive_failures == 1 && s.timer_pending)
        .await
        .unwrap();

    assert_eq!(fetcher.calls()[1].at, start + ms(2_000));
    assert_eq!(controller.status().interval, ms(4_000));
    assert_eq!(&*controller.cards(), &[CardData::new("T1", "C1")]);
    assert_eq!(
        diagnostics.failures(),
        vec![PollFailure::Transport {
            endpoint: "/d".to_string(),
            detail: "connection failed: Network error".to_string(),
        }]
    );

    controller.deactivate().await;
}

#[tokio::test(start_paused = true)]
async fn test_deactivate_before_first_response_discards_it() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let diagnostics = Arc::new(RecordingDiagnostics::new());
    let release = fetcher.hold();

    let controller = activate(PollConfig::new().with_endpoint("/d"), &fetcher, &diagnostics);
    controller.deactivate().await;
    assert!(!controller.is_active());
    assert!(controller.status().in_flight);

    release
        .send(Ok(FetchResponse::new(200, items_body(&[CardData::new("late", "x")]))))
        .unwrap();
    let mut status = controller.subscribe_status();
    status.wait_for(|s| !s.in_flight).await.unwrap();

    tokio::time::sleep(Duration::from_secs(600)).await;
    assert!(controller.cards().is_empty());
    assert!(!controller.status().timer_pending);
    assert_eq!(fetcher.call_count(), 1);
    assert!(diagnostics.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_deactivate_cancels_pending_timer() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let diagnostics = Arc::new(RecordingDiagnostics::new());
    fetcher.set_fallback(Ok(FetchResponse::new(200, r#"{"items":[]}"#)));

    let controller = activate(PollConfig::new().with_endpoint("/d"), &fetcher, &diagnostics);
    let mut status = controller.subscribe_status();
    status.wait_for(|s| s.timer_pending).await.unwrap();

    controller.deactivate().await;
    let after = controller.status();
    assert!(!after.active);
    assert!(!after.timer_pending);
    assert_eq!(after.next_cycle_at, None);

    tokio::time::sleep(Duration::from_secs(600)).await;
    assert_eq!(fetcher.call_count(), 1);

    // Second call is a no-op.
    controller.deactivate().await;
    assert!(!controller.is_active());
}

#[tokio::test(start_paused = true)]
async fn test_success_after_failures_resets_backoff() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let diagnostics = Arc::new(RecordingDiagnostics::new());
    fetcher.respond(500, "");
    fetcher.respond(500, "");
    fetcher.respond(200, items_body(&[CardData::new("ok", "back")]));
    fetcher.set_fallback(Ok(FetchResponse::new(200, r#"{"items":[]}"#)));

    let controller = activate(PollConfig::new().with_endpoint("/d"), &fetcher, &diagnostics);
    let mut status = controller.subscribe_status();
    status
        .wait_for(|s| s.cycles == 3 && s.timer_pending)
        .await
        .unwrap();

    let snapshot = controller.status();
    assert_eq!(snapshot.interval, ms(2_000));
    assert_eq!(snapshot.consecutive_failures, 0);
    assert!(snapshot.last_failure.is_none());
    assert!(snapshot.last_success_at.is_some());
    assert_eq!(controller.cards()[0].title, "ok");

    status
        .wait_for(|s| s.cycles == 4 && !s.in_flight)
        .await
        .unwrap();
    assert_eq!(gaps(&fetcher), vec![ms(4_000), ms(8_000), ms(2_000)]);

    controller.deactivate().await;
}

#[tokio::test(start_paused = true)]
async fn test_backoff_caps_at_max_interval() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let diagnostics = Arc::new(RecordingDiagnostics::new());
    fetcher.set_fallback(Err(FetchError::Timeout));

    let controller = activate(PollConfig::new().with_endpoint("/d"), &fetcher, &diagnostics);
    let mut status = controller.subscribe_status();
    status
        .wait_for(|s| s.consecutive_failures == 9 && s.timer_pending)
        .await
        .unwrap();

    assert_eq!(controller.status().interval, ms(180_000));
    assert_eq!(
        gaps(&fetcher),
        vec![
            ms(4_000),
            ms(8_000),
            ms(16_000),
            ms(32_000),
            ms(64_000),
            ms(128_000),
            ms(180_000),
            ms(180_000),
        ]
    );

    controller.deactivate().await;
}

#[tokio::test(start_paused = true)]
async fn test_malformed_payload_is_a_failure() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let diagnostics = Arc::new(RecordingDiagnostics::new());
    fetcher.respond(200, r#"{"cards":[{"title":"T","content":"C"}]}"#);

    let controller = activate(PollConfig::new().with_endpoint("/d"), &fetcher, &diagnostics);
    let mut status = controller.subscribe_status();
    status
        .wait_for(|s| s.consecutive_failures == 1 && s.timer_pending)
        .await
        .unwrap();

    assert!(controller.cards().is_empty());
    assert_eq!(controller.status().interval, ms(4_000));
    assert!(matches!(
        diagnostics.failures().as_slice(),
        [PollFailure::Malformed { .. }]
    ));

    controller.deactivate().await;
}

#[tokio::test(start_paused = true)]
async fn test_snapshot_shown_until_first_successful_fetch() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let diagnostics = Arc::new(RecordingDiagnostics::new());
    fetcher.respond(502, "");
    fetcher.respond(200, items_body(&[CardData::new("live", "data")]));

    let controller = activate(
        PollConfig::new()
            .with_snapshot(r#"[{"title":"cached","content":"data"}]"#)
            .with_endpoint("/d"),
        &fetcher,
        &diagnostics,
    );
    assert_eq!(controller.cards()[0].title, "cached");

    let mut status = controller.subscribe_status();
    status
        .wait_for(|s| s.consecutive_failures == 1)
        .await
        .unwrap();
    assert_eq!(controller.cards()[0].title, "cached");

    let mut cards = controller.subscribe_cards();
    cards.changed().await.unwrap();
    assert_eq!(cards.borrow_and_update()[0].title, "live");

    controller.deactivate().await;
}

#[tokio::test(start_paused = true)]
async fn test_no_source_is_a_silent_no_op() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let diagnostics = Arc::new(RecordingDiagnostics::new());

    let controller = activate(PollConfig::new(), &fetcher, &diagnostics);
    controller.refresh();
    tokio::time::sleep(Duration::from_secs(60)).await;

    assert!(controller.cards().is_empty());
    assert_eq!(fetcher.call_count(), 0);
    assert!(!controller.status().timer_pending);
    assert!(diagnostics.is_empty());

    controller.deactivate().await;
}

#[tokio::test(start_paused = true)]
async fn test_invalid_snapshot_fails_activation() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let err = PollController::activate(
        PollConfig::new()
            .with_snapshot("[{\"title\":")
            .with_endpoint("/d"),
        Arc::clone(&fetcher),
        Arc::new(RecordingDiagnostics::new()),
    )
    .unwrap_err();

    assert!(matches!(err, PollError::InvalidSnapshot { .. }));
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(fetcher.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_manual_refresh_replaces_pending_timer() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let diagnostics = Arc::new(RecordingDiagnostics::new());
    fetcher.set_fallback(Ok(FetchResponse::new(200, r#"{"items":[]}"#)));

    let start = Instant::now();
    let controller = activate(PollConfig::new().with_endpoint("/d"), &fetcher, &diagnostics);

    tokio::time::sleep_until(start + ms(500)).await;
    controller.refresh();
    tokio::time::sleep_until(start + ms(10_000)).await;

    let offsets: Vec<Duration> = fetcher.calls().iter().map(|c| c.at - start).collect();
    // The timer due at 2000 was replaced by one due at 2500; it never fires.
    assert_eq!(
        offsets,
        vec![ms(0), ms(500), ms(2_500), ms(4_500), ms(6_500), ms(8_500)]
    );

    controller.deactivate().await;
}

#[tokio::test(start_paused = true)]
async fn test_at_most_one_timer_observed() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let diagnostics = Arc::new(RecordingDiagnostics::new());
    fetcher.respond(500, "");
    fetcher.fail(FetchError::Timeout);
    fetcher.set_fallback(Ok(FetchResponse::new(200, r#"{"items":[]}"#)));

    let start = Instant::now();
    let controller = activate(PollConfig::new().with_endpoint("/d"), &fetcher, &diagnostics);
    let mut status = controller.subscribe_status();

    for _ in 0..5 {
        controller.refresh();
        status.changed().await.unwrap();
        let current = status.borrow_and_update().clone();
        // A pending timer and an in-flight request never coexist.
        assert!(!(current.timer_pending && current.in_flight));
    }
    tokio::time::sleep_until(start + ms(60_000)).await;

    // Call 0 fails with 500, call 1 times out, the rest succeed.
    let interval_after = |call: usize| match call {
        0 => ms(4_000),
        1 => ms(8_000),
        _ => ms(2_000),
    };
    let calls = fetcher.calls();
    let burst = calls.iter().take_while(|c| c.at == start).count();
    assert!(burst >= 1);
    for (i, gap) in gaps(&fetcher).into_iter().enumerate() {
        if i + 1 < burst {
            assert_eq!(gap, Duration::ZERO, "call {} is part of the refresh burst", i + 1);
        } else {
            // Exactly one timer drives each later call.
            assert_eq!(gap, interval_after(i), "gap before call {}", i + 1);
        }
    }
    let last = calls.len() - 1;
    assert!(calls[last].at + interval_after(last) >= start + ms(60_000));

    controller.deactivate().await;
    assert!(!controller.status().timer_pending);
}
