//! Config Extractor: turns the `data-*` attributes of a widget container into the
//! camelCase configuration object handed to the renderer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::{WidgetError, WidgetType};

/// Config keys that only style the widget and never reach the data API.
const PRESENTATION_KEYS: [&str; 9] = [
    "widgetType",
    "widgetKey",
    "backgroundColor",
    "textColor",
    "tableBackgroundColor",
    "headerTextColor",
    "nameTextColor",
    "viewMode",
    "showSummary",
];

/// Attribute naming the widget type on a container.
pub const WIDGET_TYPE_ATTRIBUTE: &str = "data-widget-type";
/// Optional attribute giving a container a stable id across reloads.
pub const WIDGET_KEY_ATTRIBUTE: &str = "data-widget-key";

/// Written by the loader once a container has been mounted.
pub const WIDGET_READY_ATTRIBUTE: &str = "data-widget-ready";
/// Written by the loader with the id the container was mounted under.
pub const WIDGET_ID_ATTRIBUTE: &str = "data-widget-id";
/// Written by the loader on a container showing an inline error.
pub const WIDGET_ERROR_ATTRIBUTE: &str = "data-widget-error";
/// Written by the embed script on tags it has already processed.
pub const EMBEDDED_ATTRIBUTE: &str = "data-ep-embedded";

/// Bookkeeping attributes the scripts put on the page themselves. They are
/// never part of a widget's config.
pub const MARKER_ATTRIBUTES: [&str; 4] = [
    WIDGET_READY_ATTRIBUTE,
    WIDGET_ID_ATTRIBUTE,
    WIDGET_ERROR_ATTRIBUTE,
    EMBEDDED_ATTRIBUTE,
];

/// One DOM element marked as a widget mount point, captured at scan time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetContainerDescriptor {
    pub widget_type: WidgetType,
    /// Attribute name/value pairs in DOM order, verbatim.
    pub attributes: Vec<(String, String)>,
    pub widget_id: String,
}

impl WidgetContainerDescriptor {
    /// Builds the descriptor for the `ordinal`-th container found by the scan.
    pub fn new(ordinal: usize, attributes: Vec<(String, String)>) -> Result<Self, WidgetError> {
        let lookup = |name: &str| {
            attributes
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str())
        };

        let widget_type = lookup(WIDGET_TYPE_ATTRIBUTE)
            .ok_or_else(|| WidgetError::UnknownWidgetType(String::new()))?
            .parse::<WidgetType>()?;
        let widget_id = widget_id_for(ordinal, lookup(WIDGET_KEY_ATTRIBUTE));

        Ok(Self {
            widget_type,
            attributes,
            widget_id,
        })
    }

    /// The camelCase projection of the prefixed attributes.
    pub fn config(&self, prefix: &str, api_base_url: &str) -> WidgetConfig {
        WidgetConfig::new(
            &self.widget_id,
            api_base_url,
            extract_config(
                self.attributes
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.as_str())),
                prefix,
            ),
        )
    }
}

/// `widget-<ordinal>` unless the container carries a non-empty stable key.
pub fn widget_id_for(ordinal: usize, stable_key: Option<&str>) -> String {
    match stable_key.map(str::trim).filter(|key| !key.is_empty()) {
        Some(key) => key.to_string(),
        None => format!("widget-{ordinal}"),
    }
}

/// Configuration passed to `renderWidget`. Unknown keys are preserved.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    #[serde(default)]
    pub widget_id: String,
    #[serde(default)]
    pub api_base_url: String,
    #[serde(flatten)]
    pub values: BTreeMap<String, String>,
}

impl WidgetConfig {
    pub fn new(widget_id: &str, api_base_url: &str, mut values: BTreeMap<String, String>) -> Self {
        // Injected fields win over same-named DOM attributes.
        values.remove("widgetId");
        values.remove("apiBaseUrl");
        Self {
            widget_id: widget_id.to_string(),
            api_base_url: api_base_url.to_string(),
            values,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Relative data API route for `widget`: `/api/<endpoint>?<data params>`.
    /// The Network Redirector points it at the right origin at fetch time.
    pub fn api_path(&self, widget: WidgetType) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(
                self.values
                    .iter()
                    .filter(|(key, _)| !PRESENTATION_KEYS.contains(&key.as_str())),
            )
            .finish();
        if query.is_empty() {
            format!("/api/{}", widget.api_endpoint())
        } else {
            format!("/api/{}?{query}", widget.api_endpoint())
        }
    }
}

/// Strips `prefix` from matching attribute names and camelCases the rest.
/// Values are copied as-is; parsing them is the renderer's job.
/// [`MARKER_ATTRIBUTES`] are skipped.
pub fn extract_config<'a>(
    attributes: impl IntoIterator<Item = (&'a str, &'a str)>,
    prefix: &str,
) -> BTreeMap<String, String> {
    attributes
        .into_iter()
        .filter_map(|(name, value)| {
            let name = name.to_ascii_lowercase();
            if MARKER_ATTRIBUTES.contains(&name.as_str()) {
                return None;
            }
            let rest = name.strip_prefix(prefix)?;
            if rest.is_empty() {
                return None;
            }
            Some((kebab_to_camel(rest), value.to_string()))
        })
        .collect()
}

/// `selected-teams` -> `selectedTeams`. Follows `dataset` rules: only a dash
/// followed by an ASCII lowercase letter is folded.
pub fn kebab_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '-' {
            if let Some(next) = chars.peek().copied().filter(char::is_ascii_lowercase) {
                out.push(next.to_ascii_uppercase());
                chars.next();
                continue;
            }
        }
        out.push(ch);
    }
    out
}

/// `selectedTeams` -> `data-selected-teams`.
pub fn camel_to_data_attribute(key: &str) -> String {
    let mut out = String::from("data-");
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
