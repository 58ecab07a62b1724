use std::borrow::Cow;

use widget_core::redirect::{describe_fetch, rewrite_api_url, settle, FetchOutcome};
use widget_core::{EnvironmentContext, LoaderConfig};

#[test]
fn api_calls_go_to_production_origin() {
    let env = EnvironmentContext::resolve(None, &LoaderConfig::default());
    assert_eq!(
        rewrite_api_url("/api/player?playerId=5", &env.api_base_url),
        "https://widget.eliteprospects.com/api/player?playerId=5"
    );
}

#[test]
fn api_calls_go_to_dev_origin() {
    let env = EnvironmentContext::resolve(
        Some("https://widget.eliteprospects.com/widget-loader-combined.js?dev=true"),
        &LoaderConfig::default(),
    );
    assert_eq!(
        rewrite_api_url("/api/player?playerId=5", &env.api_base_url),
        "http://localhost:3000/api/player?playerId=5"
    );
}

#[test]
fn other_urls_pass_through() {
    let base = "https://widget.eliteprospects.com";
    for url in [
        "https://other.example.com/x",
        "/static/logo.png",
        "/apiary",
        "api/player",
        "//cdn.example.com/api/x",
    ] {
        assert!(matches!(rewrite_api_url(url, base), Cow::Borrowed(_)), "{url}");
    }
}

#[test]
fn trailing_slash_on_base_is_tolerated() {
    assert_eq!(
        rewrite_api_url("/api/team?teamId=1", "http://localhost:3000/"),
        "http://localhost:3000/api/team?teamId=1"
    );
}

#[test]
fn fetch_log_lines() {
    assert_eq!(
        describe_fetch("/api/x", FetchOutcome::Status(200), 12.4),
        "fetch /api/x -> 200 (12 ms)"
    );
    assert_eq!(
        describe_fetch("/api/x", FetchOutcome::Failed, 3.0),
        "fetch /api/x failed (3 ms)"
    );
}

#[test]
fn rejected_fetch_reaches_caller_unchanged() {
    let rejection: Result<u16, String> = Err("NetworkError when attempting to fetch".to_string());
    let (outcome, result) = settle(rejection.clone(), |status| Some(*status));

    assert_eq!(outcome, FetchOutcome::Failed);
    assert_eq!(result, rejection);
}

#[test]
fn resolved_fetch_reports_status() {
    let (outcome, result) = settle(Ok::<u16, String>(404), |status| Some(*status));
    assert_eq!(outcome, FetchOutcome::Status(404));
    assert_eq!(result, Ok(404));

    let (outcome, _) = settle(Ok::<&str, String>("not a response"), |_| None);
    assert_eq!(outcome, FetchOutcome::Status(0));
}
