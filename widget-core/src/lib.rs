//! Logic lõi cho việc phân phối widget nhúng: mô hình dữ liệu, cấu hình và các phép
//! biến đổi thuần túy dùng chung giữa loader, bundle giao diện và script iframe.

pub mod attributes;
pub mod bootstrap;
pub mod diag;
pub mod embed;
pub mod environment;
#[cfg(target_arch = "wasm32")]
pub mod js;
pub mod redirect;
pub mod resize;
pub mod style_guard;
pub mod table;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use attributes::{WidgetConfig, WidgetContainerDescriptor};
pub use environment::EnvironmentContext;
pub use resize::{HeightListener, HeightReporter, ResizeMessage};

/// Origin của dev server cục bộ.
pub const DEV_ORIGIN: &str = "http://localhost:3000";
/// Origin production phục vụ widget và API dữ liệu.
pub const PROD_ORIGIN: &str = "https://widget.eliteprospects.com";
/// Object toàn cục mà bundle công bố `renderWidget` lên.
pub const RENDERER_NAMESPACE: &str = "EPWidgets";

/// Các loại widget mà bundle biết cách render.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetType {
    Player,
    Team,
    League,
    ScoringLeaders,
    GoalieLeaders,
    Alumni,
    Tournament,
}

impl WidgetType {
    pub const ALL: [WidgetType; 7] = [
        WidgetType::Player,
        WidgetType::Team,
        WidgetType::League,
        WidgetType::ScoringLeaders,
        WidgetType::GoalieLeaders,
        WidgetType::Alumni,
        WidgetType::Tournament,
    ];

    /// Tên kebab-case dùng trong `data-widget-type` và đường dẫn `/embed/<type>`.
    pub fn as_str(self) -> &'static str {
        match self {
            WidgetType::Player => "player",
            WidgetType::Team => "team",
            WidgetType::League => "league",
            WidgetType::ScoringLeaders => "scoring-leaders",
            WidgetType::GoalieLeaders => "goalie-leaders",
            WidgetType::Alumni => "alumni",
            WidgetType::Tournament => "tournament",
        }
    }

    /// Config keys (camelCase) the renderer needs before it can mount this widget.
    pub fn required_attributes(self) -> &'static [&'static str] {
        match self {
            WidgetType::Player => &["playerId"],
            WidgetType::Team => &["teamId"],
            WidgetType::League => &["leagueSlug"],
            WidgetType::ScoringLeaders | WidgetType::GoalieLeaders => &["leagueSlug", "season"],
            WidgetType::Alumni => &["selectedTeams", "selectedLeagues"],
            WidgetType::Tournament => &["selectedTournaments", "selectedLeagues"],
        }
    }

    /// Path segment of the data API route backing this widget.
    pub fn api_endpoint(self) -> &'static str {
        match self {
            WidgetType::Player => "player",
            WidgetType::Team => "team",
            WidgetType::League => "league",
            WidgetType::ScoringLeaders => "scoring-leaders",
            WidgetType::GoalieLeaders => "goalie-leaders",
            WidgetType::Alumni => "alumni",
            WidgetType::Tournament => "tournament",
        }
    }

    /// Tiêu đề mặc định hiển thị ở đầu widget.
    pub fn title(self) -> &'static str {
        match self {
            WidgetType::Player => "Player Stats",
            WidgetType::Team => "Team Roster",
            WidgetType::League => "League Standings",
            WidgetType::ScoringLeaders => "Scoring Leaders",
            WidgetType::GoalieLeaders => "Goalie Leaders",
            WidgetType::Alumni => "Alumni",
            WidgetType::Tournament => "Tournament",
        }
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WidgetType {
    type Err = WidgetError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        WidgetType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| WidgetError::UnknownWidgetType(value.to_string()))
    }
}

/// Bảng màu cố định mà mọi widget nhận qua `data-*-color`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorScheme {
    pub background_color: String,
    pub text_color: String,
    pub table_background_color: String,
    pub header_text_color: String,
    pub name_text_color: String,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            background_color: "#052D41".to_string(),
            text_color: "#000000".to_string(),
            table_background_color: "#FFFFFF".to_string(),
            header_text_color: "#FFFFFF".to_string(),
            name_text_color: "#0D73A6".to_string(),
        }
    }
}

impl ColorScheme {
    /// Overlay any color keys present in `config` onto the defaults.
    pub fn from_config(config: &WidgetConfig) -> Self {
        let mut scheme = ColorScheme::default();
        let slots = [
            ("backgroundColor", &mut scheme.background_color),
            ("textColor", &mut scheme.text_color),
            ("tableBackgroundColor", &mut scheme.table_background_color),
            ("headerTextColor", &mut scheme.header_text_color),
            ("nameTextColor", &mut scheme.name_text_color),
        ];
        for (key, slot) in slots {
            if let Some(value) = config.get(key).map(str::trim).filter(|v| !v.is_empty()) {
                *slot = value.to_string();
            }
        }
        scheme
    }
}

/// Cấu hình của loader; trang host có thể ghi đè qua `window.EPWidgetLoaderConfig`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct LoaderConfig {
    pub dev_origin: String,
    pub prod_origin: String,
    /// Path of the UI bundle relative to the script base URL.
    pub bundle_path: String,
    /// Substring used to find the loader's own `<script>` tag.
    pub loader_script_hint: String,
    pub marker_class: String,
    pub data_prefix: String,
    /// Global object the bundle publishes `renderWidget` on.
    pub renderer_namespace: String,
    pub bundle_load_timeout_ms: u32,
    /// Fixed delay before the single "renderer initialized?" re-check.
    pub renderer_grace_ms: u32,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            dev_origin: DEV_ORIGIN.to_string(),
            prod_origin: PROD_ORIGIN.to_string(),
            bundle_path: "/widget-bundle.js".to_string(),
            loader_script_hint: "widget-loader".to_string(),
            marker_class: "ep-widget".to_string(),
            data_prefix: "data-".to_string(),
            renderer_namespace: RENDERER_NAMESPACE.to_string(),
            bundle_load_timeout_ms: 10_000,
            renderer_grace_ms: 1_000,
        }
    }
}

/// Lỗi chung của hệ thống widget.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WidgetError {
    #[error("Unknown widget type: {0:?}")]
    UnknownWidgetType(String),
    #[error("{widget} widget requires the {attribute} attribute")]
    MissingAttribute { widget: WidgetType, attribute: String },
    #[error("Invalid value for {attribute}: {reason}")]
    InvalidAttribute { attribute: String, reason: String },
    #[error("Widget bundle failed to load: {0}")]
    BundleLoad(String),
    #[error("Widget renderer is not initialized: {0}")]
    RendererUnavailable(String),
    #[error("Widget failed to render: {0}")]
    Render(String),
    #[error("DOM error: {0}")]
    Dom(String),
}

/// Kiểm tra các key bắt buộc của một loại widget; báo key thiếu đầu tiên.
pub fn validate_config(widget: WidgetType, config: &WidgetConfig) -> Result<(), WidgetError> {
    for key in widget.required_attributes() {
        let present = config
            .get(key)
            .map(|value| !value.trim().is_empty())
            .unwrap_or(false);
        if !present {
            return Err(WidgetError::MissingAttribute {
                widget,
                attribute: attributes::camel_to_data_attribute(key),
            });
        }
    }
    Ok(())
}
