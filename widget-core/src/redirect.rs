//! Network Redirector rules: which fetch URLs get pointed at the data API origin.

use std::borrow::Cow;

/// Relative prefix of every data API route.
pub const API_PREFIX: &str = "/api/";

/// Rewrites same-origin-relative `/api/...` URLs onto `api_base_url`.
/// Anything else (absolute URLs, other paths) is returned untouched.
pub fn rewrite_api_url<'a>(url: &'a str, api_base_url: &str) -> Cow<'a, str> {
    if !url.starts_with(API_PREFIX) {
        return Cow::Borrowed(url);
    }
    let base = api_base_url.trim().trim_end_matches('/');
    if base.is_empty() {
        return Cow::Borrowed(url);
    }
    Cow::Owned(format!("{base}{url}"))
}

/// Result of one observed fetch, for the diagnostic log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Status(u16),
    Failed,
}

/// Splits a settled fetch into its log outcome and the result itself, which
/// goes back to the caller unchanged. `status` reads the HTTP status off a
/// resolved value, if it is a response at all.
pub fn settle<T, E>(
    result: Result<T, E>,
    status: impl FnOnce(&T) -> Option<u16>,
) -> (FetchOutcome, Result<T, E>) {
    let outcome = match &result {
        Ok(value) => FetchOutcome::Status(status(value).unwrap_or(0)),
        Err(_) => FetchOutcome::Failed,
    };
    (outcome, result)
}

/// Log line for one fetch.
pub fn describe_fetch(url: &str, outcome: FetchOutcome, elapsed_ms: f64) -> String {
    let elapsed = elapsed_ms.max(0.0).round() as u64;
    match outcome {
        FetchOutcome::Status(status) => format!("fetch {url} -> {status} ({elapsed} ms)"),
        FetchOutcome::Failed => format!("fetch {url} failed ({elapsed} ms)"),
    }
}
