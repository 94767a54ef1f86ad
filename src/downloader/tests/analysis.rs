use super::*;
use std::sync::Arc;
use tokio::sync::Notify;

#[tokio::test]
async fn test_submit_success_stores_analysis_result() {
    let downloader = create_test_downloader(FakeClient::succeeding());

    let stored = downloader.submit("https://example.com/v1").await.unwrap();

    assert_eq!(stored.source, MetadataSource::Analysis);
    assert_eq!(stored.metadata.title, "T");
    assert_eq!(
        stored.metadata.summary,
        Some(vec!["a".to_string(), "b".to_string()])
    );
    assert_eq!(stored.metadata.category.as_deref(), Some("c"));
    assert_eq!(stored.metadata.description.as_deref(), Some("d"));

    let snapshot = downloader.snapshot();
    assert_eq!(snapshot.status, AppStatus::Ready);
    assert_eq!(snapshot.metadata.unwrap().title, "T");
    assert_eq!(snapshot.metadata_source, Some(MetadataSource::Analysis));
}

#[tokio::test]
async fn test_submit_failure_stores_fallback_record() {
    let downloader = create_test_downloader(FakeClient::failing());

    let stored = downloader.submit("https://example.com/v2").await.unwrap();

    assert_eq!(stored.source, MetadataSource::Fallback);
    assert_eq!(stored.metadata, downloader.config.fallback.to_metadata());
    assert_eq!(downloader.status(), AppStatus::Ready);
}

#[tokio::test]
async fn test_malformed_payload_falls_back() {
    let client = FakeClient::scripted(vec![Err(AnalysisError::MissingField("category"))]);
    let downloader = create_test_downloader(client);

    let stored = downloader.submit("https://example.com/v3").await.unwrap();

    assert_eq!(stored.source, MetadataSource::Fallback);
    assert_eq!(downloader.status(), AppStatus::Ready);
}

#[tokio::test]
async fn test_empty_url_is_rejected_without_state_change() {
    let client = Arc::new(FakeClient::succeeding());
    let downloader = create_test_downloader_with(fast_config(), client.clone());
    let mut events = downloader.subscribe();

    for url in ["", "   ", "\t\n"] {
        let err = downloader.submit(url).await.unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    assert_eq!(downloader.status(), AppStatus::Idle);
    assert_eq!(client.analyze_calls.load(Ordering::SeqCst), 0);
    assert!(events.try_recv().is_err(), "no event for rejected input");
}

#[tokio::test]
async fn test_submit_clears_metadata_before_analysis_resolves() {
    let gate = Arc::new(Notify::new());
    let client = Arc::new(FakeClient::gated(gate.clone()));
    let downloader = create_test_downloader_with(fast_config(), client.clone());

    // First round completes normally
    gate.notify_one();
    downloader.submit("https://example.com/first").await.unwrap();
    assert!(downloader.metadata().is_some());

    // Second round is held inside the client
    let pending = {
        let downloader = downloader.clone();
        tokio::spawn(async move { downloader.submit("https://example.com/second").await })
    };
    let mut events = downloader.subscribe();
    while downloader.status() != AppStatus::Fetching {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    assert!(downloader.metadata().is_none());
    assert!(downloader.snapshot().metadata.is_none());

    gate.notify_one();
    pending.await.unwrap().unwrap();
    assert_eq!(downloader.status(), AppStatus::Ready);
    assert!(downloader.metadata().is_some());

    let event = wait_for_event(&mut events, |e| matches!(e, Event::AnalysisComplete { .. })).await;
    assert!(matches!(
        event,
        Event::AnalysisComplete {
            source: MetadataSource::Analysis,
            ..
        }
    ));
}

#[tokio::test]
async fn test_submit_rejected_while_fetching() {
    let gate = Arc::new(Notify::new());
    let client = Arc::new(FakeClient::gated(gate.clone()));
    let downloader = create_test_downloader_with(fast_config(), client.clone());

    let pending = {
        let downloader = downloader.clone();
        tokio::spawn(async move { downloader.submit("https://example.com/a").await })
    };
    while downloader.status() != AppStatus::Fetching {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    let err = downloader.submit("https://example.com/b").await.unwrap_err();
    match err {
        Error::InvalidState {
            operation,
            current_state,
        } => {
            assert_eq!(operation, "submit");
            assert_eq!(current_state, "fetching");
        }
        other => panic!("expected InvalidState, got {other:?}"),
    }

    gate.notify_one();
    pending.await.unwrap().unwrap();
    assert_eq!(client.analyze_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_resubmit_from_ready_overwrites_metadata() {
    let mut second = sample_result();
    second.title = "Second".to_string();
    let client = FakeClient::scripted(vec![Ok(sample_result()), Ok(second)]);
    let downloader = create_test_downloader(client);

    downloader.submit("https://example.com/1").await.unwrap();
    downloader.submit("https://example.com/2").await.unwrap();

    assert_eq!(downloader.metadata().unwrap().metadata.title, "Second");
    assert_eq!(downloader.status(), AppStatus::Ready);
}

#[tokio::test]
async fn test_transient_failure_is_retried_when_configured() {
    let client = Arc::new(FakeClient::scripted(vec![
        Err(AnalysisError::HttpStatus {
            status: 503,
            body: String::new(),
        }),
        Ok(sample_result()),
    ]));
    let downloader = create_test_downloader_with(retrying(fast_config(), 2), client.clone());

    let stored = downloader.submit("https://example.com/retry").await.unwrap();

    assert_eq!(stored.source, MetadataSource::Analysis);
    assert_eq!(client.analyze_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_single_attempt_by_default() {
    let client = Arc::new(FakeClient::failing());
    let downloader = create_test_downloader_with(fast_config(), client.clone());

    downloader.submit("https://example.com/once").await.unwrap();

    assert_eq!(client.analyze_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_min_fetch_duration_is_honored() {
    let mut config = fast_config();
    config.session.min_fetch_duration = Duration::from_millis(80);
    let downloader = create_test_downloader_with(config, Arc::new(FakeClient::succeeding()));

    let started = std::time::Instant::now();
    downloader.submit("https://example.com/slow").await.unwrap();

    assert!(started.elapsed() >= Duration::from_millis(80));
}

#[tokio::test]
async fn test_submit_emits_events_in_order() {
    let downloader = create_test_downloader(FakeClient::succeeding());
    let mut events = downloader.subscribe();

    downloader.submit("  https://example.com/trim  ").await.unwrap();

    let kinds: Vec<Event> = std::iter::from_fn(|| events.try_recv().ok()).collect();
    assert!(matches!(
        kinds[0],
        Event::StatusChanged {
            from: AppStatus::Idle,
            to: AppStatus::Fetching
        }
    ));
    assert!(matches!(&kinds[1], Event::AnalysisStarted { url } if url == "https://example.com/trim"));
    assert!(matches!(
        kinds[2],
        Event::StatusChanged {
            from: AppStatus::Fetching,
            to: AppStatus::Ready
        }
    ));
    assert!(matches!(&kinds[3], Event::AnalysisComplete { title, .. } if title == "T"));
}
