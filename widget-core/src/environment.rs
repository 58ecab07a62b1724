//! Resolves where data and resources come from, based on the loader's own URL.

use serde::Serialize;
use url::Url;

use crate::LoaderConfig;

/// Runtime environment of one loader invocation. Immutable once resolved.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentContext {
    pub is_dev: bool,
    /// Origin every data fetch must target.
    pub api_base_url: String,
    /// Origin the bundle and other assets are loaded from.
    pub script_base_url: String,
}

impl EnvironmentContext {
    /// Resolves the context from the loader script's `src`. A missing or
    /// unparseable URL falls back to production.
    pub fn resolve(script_src: Option<&str>, config: &LoaderConfig) -> Self {
        let parsed = script_src.and_then(|src| Url::parse(src.trim()).ok());
        let is_dev = parsed.as_ref().map(is_dev_url).unwrap_or(false);

        if is_dev {
            return Self {
                is_dev,
                api_base_url: trim_origin(&config.dev_origin),
                script_base_url: trim_origin(&config.dev_origin),
            };
        }

        let script_base_url = parsed
            .as_ref()
            .map(|url| url.origin())
            .filter(|origin| origin.is_tuple())
            .map(|origin| origin.ascii_serialization())
            .unwrap_or_else(|| trim_origin(&config.prod_origin));

        Self {
            is_dev,
            api_base_url: trim_origin(&config.prod_origin),
            script_base_url,
        }
    }

    /// Absolute URL of the UI bundle.
    pub fn bundle_url(&self, config: &LoaderConfig) -> String {
        join_path(&self.script_base_url, &config.bundle_path)
    }
}

/// `dev=true` anywhere in the query string.
pub fn is_dev_url(url: &Url) -> bool {
    url.query_pairs()
        .any(|(key, value)| key == "dev" && value.eq_ignore_ascii_case("true"))
}

pub(crate) fn trim_origin(origin: &str) -> String {
    origin.trim().trim_end_matches('/').to_string()
}

pub(crate) fn join_path(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
