use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    domain::{
        DataSelection, LayerType, Visualization, VisualizationChanges, VisualizationConfiguration,
        VisualizationConfigurationChanges, VisualizationLayer, VisualizationLayerChanges,
        VisualizationType, VisualizationUiConfiguration, VisualizationUiConfigurationChanges,
    },
    error::HttpError,
};

/// Layer as handed over by the caller of an initialization, before
/// standardization. `analytics` is still the raw API payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationLayerInput {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytics: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_selections: Option<Vec<DataSelection>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_type: Option<LayerType>,
    #[serde(default)]
    pub config: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Action {
    InitializeVisualization {
        id: String,
        name: String,
        visualization_type: VisualizationType,
        #[serde(default)]
        visualization_layers: Option<Vec<VisualizationLayerInput>>,
    },
    AddAllVisualizations {
        visualizations: Vec<Visualization>,
    },
    AddVisualization {
        visualization: Visualization,
    },
    UpdateVisualization {
        id: String,
        changes: VisualizationChanges,
    },
    LoadVisualizationFavorite {
        visualization: Visualization,
    },
    LoadVisualizationFavoriteSuccess {
        visualization: Visualization,
        #[serde(default)]
        favorite: Option<Value>,
    },
    LoadVisualizationFavoriteFail {
        visualization_id: String,
        epoch: u64,
        error: HttpError,
    },
    AddAllVisualizationLayers {
        layers: Vec<VisualizationLayer>,
    },
    AddVisualizationLayer {
        layer: VisualizationLayer,
    },
    UpdateVisualizationLayer {
        id: String,
        changes: VisualizationLayerChanges,
    },
    LoadVisualizationAnalytics {
        visualization_id: String,
        epoch: u64,
        layers: Vec<VisualizationLayer>,
    },
    LoadVisualizationAnalyticsSuccess {
        visualization_id: String,
        epoch: u64,
        layers: Vec<VisualizationLayer>,
    },
    LoadVisualizationAnalyticsFail {
        visualization_id: String,
        epoch: u64,
        error: HttpError,
    },
    AddAllVisualizationUiConfigurations {
        ui_configurations: Vec<VisualizationUiConfiguration>,
    },
    AddVisualizationUiConfiguration {
        ui_configuration: VisualizationUiConfiguration,
    },
    ShowOrHideVisualizationBody {
        id: String,
        changes: VisualizationUiConfigurationChanges,
    },
    ToggleFullScreen {
        id: String,
    },
    ToggleVisualizationInterpretation {
        id: String,
    },
    AddAllVisualizationConfigurations {
        configurations: Vec<VisualizationConfiguration>,
    },
    AddVisualizationConfiguration {
        configuration: VisualizationConfiguration,
    },
    UpdateVisualizationConfiguration {
        id: String,
        changes: VisualizationConfigurationChanges,
    },
    ChangeVisualizationType {
        id: String,
        visualization_type: VisualizationType,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::InitializeVisualization { .. } => "initialize_visualization",
            Action::AddAllVisualizations { .. } => "add_all_visualizations",
            Action::AddVisualization { .. } => "add_visualization",
            Action::UpdateVisualization { .. } => "update_visualization",
            Action::LoadVisualizationFavorite { .. } => "load_visualization_favorite",
            Action::LoadVisualizationFavoriteSuccess { .. } => {
                "load_visualization_favorite_success"
            }
            Action::LoadVisualizationFavoriteFail { .. } => "load_visualization_favorite_fail",
            Action::AddAllVisualizationLayers { .. } => "add_all_visualization_layers",
            Action::AddVisualizationLayer { .. } => "add_visualization_layer",
            Action::UpdateVisualizationLayer { .. } => "update_visualization_layer",
            Action::LoadVisualizationAnalytics { .. } => "load_visualization_analytics",
            Action::LoadVisualizationAnalyticsSuccess { .. } => {
                "load_visualization_analytics_success"
            }
            Action::LoadVisualizationAnalyticsFail { .. } => "load_visualization_analytics_fail",
            Action::AddAllVisualizationUiConfigurations { .. } => {
                "add_all_visualization_ui_configurations"
            }
            Action::AddVisualizationUiConfiguration { .. } => "add_visualization_ui_configuration",
            Action::ShowOrHideVisualizationBody { .. } => "show_or_hide_visualization_body",
            Action::ToggleFullScreen { .. } => "toggle_full_screen",
            Action::ToggleVisualizationInterpretation { .. } => {
                "toggle_visualization_interpretation"
            }
            Action::AddAllVisualizationConfigurations { .. } => {
                "add_all_visualization_configurations"
            }
            Action::AddVisualizationConfiguration { .. } => "add_visualization_configuration",
            Action::UpdateVisualizationConfiguration { .. } => {
                "update_visualization_configuration"
            }
            Action::ChangeVisualizationType { .. } => "change_visualization_type",
        }
    }
}
