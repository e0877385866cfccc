//! Integration tests: replay browser traces end to end.
//!
//! Each test loads a JSONL trace fixture, drives it through the simulated
//! browser, the sensors and the aggregator event loop, and checks the
//! report the reporter produces afterwards.

use privscope::render::{render_report, RenderOptions};
use privscope::replay::{replay, ReplayOptions, ReplayOutcome};
use privscope::trace::{parse_lines, TraceEvent};
use privscope_core::config::StoreBackend;
use privscope_core::*;
use privscope_reporter::DetailList;
use privscope_sensors::UNLOAD_MESSAGE;
use privscope_store::FileStore;
use tokio_util::sync::CancellationToken;

fn load_fixture(name: &str) -> Vec<TraceEvent> {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    let content =
        std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read fixture {name}: {e}"));
    let result = parse_lines(&content);
    assert!(
        result.errors.is_empty(),
        "Parse errors in {name}: {:?}",
        result.errors.iter().map(|e| &e.message).collect::<Vec<_>>()
    );
    result.events
}

async fn run(events: &[TraceEvent], config: &PrivscopeConfig, focus: Option<u32>) -> ReplayOutcome {
    replay(events, config, &ReplayOptions { focus }, CancellationToken::new())
        .await
        .unwrap()
}

fn file_config(dir: &tempfile::TempDir, purge: bool) -> PrivscopeConfig {
    let mut config = PrivscopeConfig::default();
    config.store.backend = StoreBackend::File;
    config.store.path = Some(dir.path().join("records.json"));
    config.teardown.purge_records_on_close = purge;
    config
}

// ===========================================================================
// Focused tab report
// ===========================================================================

#[tokio::test]
async fn news_site_report_matches_trace() {
    let events = load_fixture("news_site.jsonl");
    let outcome = run(&events, &PrivscopeConfig::default(), None).await;
    let report = &outcome.report;

    assert_eq!(report.session, SessionKey::new(1));
    assert_eq!(report.url, "https://news.example.com/");

    let mut domains = report.third_party_domains.clone();
    domains.sort();
    assert_eq!(
        domains,
        [
            "a.tracker.net",
            "b.tracker.net",
            "beacon.metrics.dev",
            "cdn.analytics.org",
            "fonts.cdnhost.com",
            "pixel.ads.io",
        ]
    );

    assert_eq!(report.cookie_count, 3);
    assert_eq!(report.cookies.first_party, 1);
    assert_eq!(report.cookies.third_party, 2);

    assert_eq!(report.local_storage_count, 6);
    assert_eq!(report.local_storage[0], ("theme".to_string(), "dark".to_string()));
    assert_eq!(report.local_storage[5], ("font_size".to_string(), "14".to_string()));
    assert_eq!(report.session_storage_count, 1);

    assert_eq!(report.canvas_access, Some(CanvasMethod::ToDataUrl));
    // The unattributed hijack message must not land on any tab.
    assert!(report.hijacking.is_none());

    // 10 - 2 (domains) - 1 (local storage) - 2 (canvas)
    assert_eq!(report.score.value, 5);
    assert_eq!(outcome.badge, Some(Badge::new("!", "red")));
    assert_eq!(outcome.skipped, 0);
}

#[tokio::test]
async fn event_loop_sees_every_browser_event() {
    let events = load_fixture("news_site.jsonl");
    let outcome = run(&events, &PrivscopeConfig::default(), None).await;

    assert_eq!(outcome.stats.requests, 10);
    assert_eq!(outcome.stats.messages, 8);
    assert_eq!(outcome.stats.tabs_removed, 1);
}

#[tokio::test]
async fn focus_option_reports_other_tab() {
    let events = load_fixture("news_site.jsonl");
    let outcome = run(&events, &PrivscopeConfig::default(), Some(3)).await;

    assert_eq!(outcome.report.url, "https://quiet.org/");
    assert_eq!(outcome.report.score.value, 10);
    assert!(outcome.report.third_party_domains.is_empty());
    assert!(outcome.badge.is_none());
}

#[tokio::test]
async fn focusing_closed_tab_fails() {
    let events = load_fixture("news_site.jsonl");
    let result = replay(
        &events,
        &PrivscopeConfig::default(),
        &ReplayOptions { focus: Some(2) },
        CancellationToken::new(),
    )
    .await;
    assert!(result.is_err());
}

// ===========================================================================
// Teardown against a durable store
// ===========================================================================

#[tokio::test]
async fn closed_tab_records_are_purged() {
    let dir = tempfile::tempdir().unwrap();
    let config = file_config(&dir, true);
    let events = load_fixture("news_site.jsonl");
    run(&events, &config, None).await;

    let store = FileStore::open(dir.path().join("records.json")).await.unwrap();
    let closed = SessionKey::new(2);
    for kind in RecordKind::ALL {
        assert_eq!(store.get(&kind.store_key(&closed)).await.unwrap(), None);
    }
    // The open tab keeps its records.
    let open = SessionKey::new(1);
    assert!(store
        .get(&RecordKind::CanvasAccess.store_key(&open))
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn closed_tab_records_survive_without_purge() {
    let dir = tempfile::tempdir().unwrap();
    let config = file_config(&dir, false);
    let events = load_fixture("news_site.jsonl");
    run(&events, &config, None).await;

    let store = FileStore::open(dir.path().join("records.json")).await.unwrap();
    let closed = SessionKey::new(2);
    // Unload fired after the navigation attempt, so it is the last write.
    assert_eq!(
        store.get(&RecordKind::Hijacking.store_key(&closed)).await.unwrap(),
        Some(serde_json::json!({"type": "potentialHijacking", "message": UNLOAD_MESSAGE}))
    );
    assert_eq!(
        store.get(&RecordKind::CanvasAccess.store_key(&closed)).await.unwrap(),
        Some(serde_json::json!({"type": "canvasAccess", "method": "getImageData"}))
    );
}

// ===========================================================================
// Inline traces
// ===========================================================================

#[tokio::test]
async fn hijack_on_focused_tab_is_reported() {
    let trace = r#"
{"event":"tabOpened","tabId":4,"url":"https://bank.example/"}
{"event":"pageLoad","tabId":4}
{"event":"navigate","tabId":4,"url":"https://bank-example.phish/"}
"#;
    let events = parse_lines(trace).events;
    let outcome = run(&events, &PrivscopeConfig::default(), None).await;

    assert_eq!(
        outcome.report.hijacking.as_deref(),
        Some("Attempting to navigate to https://bank-example.phish/")
    );
    assert_eq!(outcome.report.score.value, 6);
}

#[tokio::test]
async fn sensor_events_without_page_are_skipped() {
    let trace = r#"
{"event":"tabOpened","tabId":5,"url":"https://example.com/"}
{"event":"canvasRead","tabId":5,"method":"toDataURL"}
{"event":"unload","tabId":5}
{"event":"activate","tabId":99}
"#;
    let events = parse_lines(trace).events;
    let outcome = run(&events, &PrivscopeConfig::default(), None).await;

    assert_eq!(outcome.skipped, 3);
    assert!(outcome.report.canvas_access.is_none());
    assert_eq!(outcome.report.score.value, 10);
}

#[tokio::test]
async fn tiny_channel_still_delivers_every_sensor_message() {
    let mut trace = String::from("{\"event\":\"tabOpened\",\"tabId\":6,\"url\":\"https://example.com/\"}\n");
    trace.push_str("{\"event\":\"pageLoad\",\"tabId\":6,\"localStorage\":[[\"a\",\"1\"]]}\n");
    for _ in 0..50 {
        trace.push_str("{\"event\":\"canvasRead\",\"tabId\":6,\"method\":\"getImageData\"}\n");
    }
    let events = parse_lines(&trace).events;

    let mut config = PrivscopeConfig::default();
    config.events.channel_capacity = 1;
    let outcome = run(&events, &config, None).await;

    assert_eq!(outcome.stats.messages, 51);
    assert_eq!(outcome.report.canvas_access, Some(CanvasMethod::GetImageData));
    assert_eq!(outcome.report.local_storage_count, 1);
}

// ===========================================================================
// Rendering
// ===========================================================================

#[tokio::test]
async fn text_render_lists_signals_and_details() {
    let events = load_fixture("news_site.jsonl");
    let outcome = run(&events, &PrivscopeConfig::default(), None).await;

    let text = render_report(
        &outcome.report,
        outcome.badge.as_ref(),
        &RenderOptions { details: true },
    );
    assert!(text.contains("URL: https://news.example.com/"));
    assert!(text.contains("Privacy score: 5/10"));
    assert!(text.contains("Canvas fingerprinting: detected (toDataURL)"));
    assert!(text.contains("Badge: [!] (red)"));
    assert!(text.contains(&format!("{}:", DetailList::Cookies.title())));
    assert!(text.contains("  - prefs: compact (news.example.com)"));
    assert!(text.contains("  - theme: dark"));
}
