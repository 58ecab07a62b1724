//! Console message formatting shared by the wasm crates.

use crate::EnvironmentContext;

pub const LOG_PREFIX: &str = "[ep-widgets]";

pub fn tagged(message: &str) -> String {
    format!("{LOG_PREFIX} {message}")
}

pub fn environment_summary(env: &EnvironmentContext) -> String {
    tagged(&format!(
        "env isDev={} api={} scripts={}",
        env.is_dev, env.api_base_url, env.script_base_url
    ))
}

pub fn widget_failure(widget_id: &str, error: &dyn std::fmt::Display) -> String {
    tagged(&format!("{widget_id}: {error}"))
}
