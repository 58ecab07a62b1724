//! Iframe delivery: validates the `data-*` parameters of an embed `<script>` tag
//! and builds the `/embed/<type>` URL the generated iframe points at.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::{form_urlencoded, Url};

use crate::attributes::{camel_to_data_attribute, extract_config};
use crate::environment::trim_origin;
use crate::{WidgetError, WidgetType, PROD_ORIGIN};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct EmbedConfig {
    /// Origin serving the `/embed/*` pages; also the only origin whose resize
    /// messages the embed script accepts.
    pub base_url: String,
    pub embed_prefix: String,
    pub default_height_px: u32,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            base_url: PROD_ORIGIN.to_string(),
            embed_prefix: "/embed".to_string(),
            default_height_px: 400,
        }
    }
}

impl EmbedConfig {
    /// Pins `base_url` to the origin the embed script was served from, so the
    /// iframe and the accepted message origin follow the script. Keeps the
    /// configured base for relative or opaque sources.
    pub fn for_script(mut self, script_src: &str) -> Self {
        if let Some(origin) = Url::parse(script_src.trim())
            .ok()
            .map(|url| url.origin())
            .filter(|origin| origin.is_tuple())
        {
            self.base_url = origin.ascii_serialization();
        }
        self
    }
}

/// Query parameters (camelCase) an iframe embed of `widget` cannot do without.
pub fn required_params(widget: WidgetType) -> &'static [&'static str] {
    match widget {
        WidgetType::Player => &["playerId"],
        WidgetType::Team => &["teamId"],
        WidgetType::League => &["leagueSlug"],
        WidgetType::ScoringLeaders | WidgetType::GoalieLeaders => &["leagueSlug", "season"],
        WidgetType::Alumni => &["teamIds", "leagues"],
        WidgetType::Tournament => &["tournaments", "leagues"],
    }
}

/// A validated iframe embed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedRequest {
    pub widget_type: WidgetType,
    pub params: BTreeMap<String, String>,
}

impl EmbedRequest {
    /// Builds a request from the embed script tag's attributes. Fails on an
    /// unknown type or the first missing required parameter.
    pub fn from_attributes<'a>(
        attributes: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, WidgetError> {
        let mut params = extract_config(attributes, "data-");
        let widget_type = params
            .remove("widgetType")
            .ok_or_else(|| WidgetError::UnknownWidgetType(String::new()))?
            .parse::<WidgetType>()?;
        Self::new(widget_type, params)
    }

    pub fn new(widget_type: WidgetType, params: BTreeMap<String, String>) -> Result<Self, WidgetError> {
        for key in required_params(widget_type) {
            if params.get(*key).map_or(true, |value| value.trim().is_empty()) {
                return Err(WidgetError::MissingAttribute {
                    widget: widget_type,
                    attribute: camel_to_data_attribute(key),
                });
            }
        }
        Ok(Self {
            widget_type,
            params,
        })
    }

    /// Form-urlencoded query string; `#` in colors becomes `%23`.
    pub fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish()
    }

    /// `<base><prefix>/<type>?<query>`.
    pub fn iframe_src(&self, config: &EmbedConfig) -> String {
        let base = trim_origin(&config.base_url);
        let prefix = config.embed_prefix.trim_end_matches('/');
        let query = self.query_string();
        if query.is_empty() {
            format!("{base}{prefix}/{}", self.widget_type)
        } else {
            format!("{base}{prefix}/{}?{query}", self.widget_type)
        }
    }

    /// Value for the iframe's `title` attribute.
    pub fn iframe_title(&self) -> String {
        format!("Elite Prospects {} widget", self.widget_type)
    }
}

/// Parses the query string of an `/embed/<type>` page back into config keys.
pub fn parse_query(query: &str) -> BTreeMap<String, String> {
    form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .into_owned()
        .collect()
}

/// Widget type from an `/embed/<type>` path.
pub fn widget_type_from_path(path: &str, config: &EmbedConfig) -> Result<WidgetType, WidgetError> {
    let prefix = config.embed_prefix.trim_end_matches('/');
    path.strip_prefix(prefix)
        .map(|rest| rest.trim_matches('/'))
        .filter(|rest| !rest.is_empty() && !rest.contains('/'))
        .ok_or_else(|| WidgetError::UnknownWidgetType(path.to_string()))?
        .parse()
}

/// HTML for an iframe embed, as pasted into a host page.
pub fn iframe_snippet(request: &EmbedRequest, config: &EmbedConfig) -> String {
    format!(
        r#"<iframe src="{}" title="{}" width="100%" height="{}" style="border:none;width:100%;" scrolling="no" loading="lazy"></iframe>"#,
        escape_attribute(&request.iframe_src(config)),
        escape_attribute(&request.iframe_title()),
        config.default_height_px,
    )
}

/// HTML for the embed-script variant: a `<script>` tag the embed script turns
/// into an iframe at runtime.
pub fn script_snippet(request: &EmbedRequest, config: &EmbedConfig) -> String {
    let mut tag = format!(
        r#"<script src="{}/widget-embed.js" data-widget-type="{}""#,
        trim_origin(&config.base_url),
        request.widget_type
    );
    for (key, value) in &request.params {
        tag.push_str(&format!(
            r#" {}="{}""#,
            camel_to_data_attribute(key),
            escape_attribute(value)
        ));
    }
    tag.push_str("></script>");
    tag
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
