use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const NORMAL_HEIGHT: &str = "450px";
pub const FULL_SCREEN_HEIGHT: &str = "99vh";

pub const STATUS_OK: &str = "OK";
pub const STATUS_ERROR: &str = "Error";

/// Kind of a visualization as reported by the dashboard API.
///
/// Unknown kinds are preserved verbatim so that they survive a round trip
/// through the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VisualizationType {
    Chart,
    EventChart,
    Table,
    ReportTable,
    EventReport,
    Map,
    App,
    Reports,
    Resources,
    Users,
    Messages,
    Other(String),
}

impl VisualizationType {
    pub fn as_str(&self) -> &str {
        match self {
            VisualizationType::Chart => "CHART",
            VisualizationType::EventChart => "EVENT_CHART",
            VisualizationType::Table => "TABLE",
            VisualizationType::ReportTable => "REPORT_TABLE",
            VisualizationType::EventReport => "EVENT_REPORT",
            VisualizationType::Map => "MAP",
            VisualizationType::App => "APP",
            VisualizationType::Reports => "REPORTS",
            VisualizationType::Resources => "RESOURCES",
            VisualizationType::Users => "USERS",
            VisualizationType::Messages => "MESSAGES",
            VisualizationType::Other(raw) => raw,
        }
    }
}

impl From<&str> for VisualizationType {
    fn from(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "CHART" => VisualizationType::Chart,
            "EVENT_CHART" => VisualizationType::EventChart,
            "TABLE" => VisualizationType::Table,
            "REPORT_TABLE" => VisualizationType::ReportTable,
            "EVENT_REPORT" => VisualizationType::EventReport,
            "MAP" => VisualizationType::Map,
            "APP" => VisualizationType::App,
            "REPORTS" => VisualizationType::Reports,
            "RESOURCES" => VisualizationType::Resources,
            "USERS" => VisualizationType::Users,
            "MESSAGES" => VisualizationType::Messages,
            _ => VisualizationType::Other(value.to_string()),
        }
    }
}

impl From<String> for VisualizationType {
    fn from(value: String) -> Self {
        VisualizationType::from(value.as_str())
    }
}

impl From<VisualizationType> for String {
    fn from(value: VisualizationType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for VisualizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendering classification of a single layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LayerType {
    #[default]
    Thematic,
    Event,
    Facility,
    Boundary,
    EarthEngine,
    Other(String),
}

impl LayerType {
    pub fn as_str(&self) -> &str {
        match self {
            LayerType::Thematic => "thematic",
            LayerType::Event => "event",
            LayerType::Facility => "facility",
            LayerType::Boundary => "boundary",
            LayerType::EarthEngine => "earthEngine",
            LayerType::Other(raw) => raw,
        }
    }
}

impl From<String> for LayerType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "thematic" => LayerType::Thematic,
            "event" => LayerType::Event,
            "facility" => LayerType::Facility,
            "boundary" => LayerType::Boundary,
            "earthEngine" => LayerType::EarthEngine,
            _ => LayerType::Other(value),
        }
    }
}

impl From<LayerType> for String {
    fn from(value: LayerType) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub status_code: u16,
    pub status_text: String,
    pub percent: u8,
    pub message: String,
}

impl Progress {
    pub fn ok(percent: u8, message: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            status_text: STATUS_OK.to_string(),
            percent,
            message: message.into(),
        }
    }

    /// Terminal failure state. `percent` is forced to 100, so callers must
    /// check [`Progress::is_error`] rather than the percentage alone.
    pub fn error(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            status_text: STATUS_ERROR.to_string(),
            percent: 100,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.status_text == STATUS_ERROR
    }

    pub fn is_untouched(&self) -> bool {
        self.percent == 0
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::ok(0, "Loading data...")
    }
}

/// Reference to a saved favorite, as attached to a dashboard visualization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteDescriptor {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Key of the favorite in the dashboard API (`chart`, `map`, `reports`, ...).
    #[serde(rename = "type")]
    pub favorite_type: String,
    #[serde(default)]
    pub require_analytics: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basemap: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_views: Option<Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visualization {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub visualization_type: VisualizationType,
    pub visualization_config_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite: Option<FavoriteDescriptor>,
    #[serde(default)]
    pub layers: Vec<String>,
    #[serde(default)]
    pub progress: Progress,
    /// Generation counter bumped on every initialization; responses issued
    /// under an older epoch are discarded.
    #[serde(default)]
    pub epoch: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epoch: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionLayout {
    Columns,
    Rows,
    Filters,
}

impl SelectionLayout {
    pub const ALL: [SelectionLayout; 3] = [
        SelectionLayout::Columns,
        SelectionLayout::Rows,
        SelectionLayout::Filters,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SelectionLayout::Columns => "columns",
            SelectionLayout::Rows => "rows",
            SelectionLayout::Filters => "filters",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionItem {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
}

/// One analytics dimension selected by a layer (`dx`, `pe`, `ou`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSelection {
    pub dimension: String,
    pub layout: SelectionLayout,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend_set: Option<String>,
    #[serde(default)]
    pub items: Vec<SelectionItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    #[serde(default)]
    pub headers: Vec<Value>,
    #[serde(default)]
    pub meta_data: Value,
    /// Row arrays for analytics responses. Inline favorites keep their own
    /// field here as-is, which may be a string, bool or object.
    #[serde(default)]
    pub rows: Value,
    #[serde(default)]
    pub height: usize,
    #[serde(default)]
    pub width: usize,
    #[serde(default)]
    pub pre_aggregated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationLayer {
    pub id: String,
    #[serde(default)]
    pub analytics: Option<Analytics>,
    #[serde(default)]
    pub data_selections: Vec<DataSelection>,
    #[serde(default)]
    pub layer_type: LayerType,
    #[serde(default)]
    pub config: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationLayerChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytics: Option<Analytics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_selections: Option<Vec<DataSelection>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_type: Option<LayerType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationUiConfiguration {
    pub id: String,
    #[serde(rename = "type")]
    pub visualization_type: VisualizationType,
    #[serde(default)]
    pub full_screen: bool,
    pub height: String,
    #[serde(default = "default_true")]
    pub show_body: bool,
    #[serde(default)]
    pub show_interpretation: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationUiConfigurationChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_screen: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_body: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_interpretation: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationConfiguration {
    pub id: String,
    #[serde(rename = "type")]
    pub visualization_type: VisualizationType,
    pub current_type: VisualizationType,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basemap: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationConfigurationChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_type: Option<VisualizationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basemap: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

fn default_true() -> bool {
    true
}
