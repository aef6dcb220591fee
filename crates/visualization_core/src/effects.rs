//! Orchestration effects as pure transitions.
//!
//! [`run`] is called with the state *after* the reducer has applied `action`
//! and returns the follow-up actions in the order they must be applied.
//! Service calls are not made here; `LoadVisualizationFavorite` and
//! `LoadVisualizationAnalytics` are picked up by the runtime.

use serde_json::Value;
use shared::{
    domain::{
        Progress, Visualization, VisualizationChanges, VisualizationConfigurationChanges,
        VisualizationLayer, VisualizationLayerChanges, VisualizationType,
    },
    error::HttpError,
    protocol::{Action, VisualizationLayerInput},
};
use store::VisualizationState;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::helpers::{
    layer_config, selection_dimensions_from_favorite, standardized_analytics,
    standardized_configuration, standardized_ui_configuration, standardized_visualization,
    standardized_visualization_type, static_analytics, visualization_layer_type,
};

pub const ANALYTICS_LOADED: &str = "Analytics has been loaded";
pub const FAVORITE_LOADED: &str = "Favorite has been loaded";
pub const FAVORITE_INFORMATION_LOADED: &str = "Favorite information has been loaded";
pub const INFORMATION_LOADED: &str = "Information has been loaded";

pub fn run(state: &VisualizationState, action: &Action) -> Vec<Action> {
    match action {
        Action::InitializeVisualization {
            id,
            name,
            visualization_type,
            visualization_layers,
        } => initialize_visualization(
            state,
            id,
            name,
            visualization_type,
            visualization_layers.as_deref().unwrap_or_default(),
        ),
        Action::LoadVisualizationFavoriteSuccess {
            visualization,
            favorite,
        } => favorite_loaded(state, visualization, favorite.as_ref()),
        Action::LoadVisualizationFavoriteFail {
            visualization_id,
            epoch,
            error,
        } => request_failed(state, visualization_id, *epoch, error),
        Action::LoadVisualizationAnalyticsSuccess {
            visualization_id,
            epoch,
            layers,
        } => analytics_loaded(state, visualization_id, *epoch, layers),
        Action::LoadVisualizationAnalyticsFail {
            visualization_id,
            epoch,
            error,
        } => request_failed(state, visualization_id, *epoch, error),
        Action::ChangeVisualizationType {
            id,
            visualization_type,
        } => change_visualization_type(state, id, visualization_type),
        Action::AddAllVisualizations { .. }
        | Action::AddVisualization { .. }
        | Action::UpdateVisualization { .. }
        | Action::LoadVisualizationFavorite { .. }
        | Action::AddAllVisualizationLayers { .. }
        | Action::AddVisualizationLayer { .. }
        | Action::UpdateVisualizationLayer { .. }
        | Action::LoadVisualizationAnalytics { .. }
        | Action::AddAllVisualizationUiConfigurations { .. }
        | Action::AddVisualizationUiConfiguration { .. }
        | Action::ShowOrHideVisualizationBody { .. }
        | Action::ToggleFullScreen { .. }
        | Action::ToggleVisualizationInterpretation { .. }
        | Action::AddAllVisualizationConfigurations { .. }
        | Action::AddVisualizationConfiguration { .. }
        | Action::UpdateVisualizationConfiguration { .. } => Vec::new(),
    }
}

fn is_current(state: &VisualizationState, visualization_id: &str, epoch: u64) -> bool {
    match state.visualization(visualization_id) {
        Some(visualization) if visualization.epoch == epoch => true,
        Some(visualization) => {
            debug!(
                visualization_id,
                epoch,
                current_epoch = visualization.epoch,
                "discarding response issued for a superseded initialization"
            );
            false
        }
        None => false,
    }
}

fn progress_update(id: &str, layers: Option<Vec<String>>, progress: Progress) -> Action {
    Action::UpdateVisualization {
        id: id.to_string(),
        changes: VisualizationChanges {
            layers,
            progress: Some(progress),
            ..Default::default()
        },
    }
}

fn layer_ids(layers: &[VisualizationLayer]) -> Vec<String> {
    layers.iter().map(|layer| layer.id.clone()).collect()
}

fn initialize_visualization(
    state: &VisualizationState,
    id: &str,
    name: &str,
    visualization_type: &VisualizationType,
    layer_inputs: &[VisualizationLayerInput],
) -> Vec<Action> {
    let existing = state.visualization(id);
    let next_epoch = existing.map_or(1, |visualization| visualization.epoch + 1);

    if let Some(visualization) = existing.filter(|visualization| visualization.progress.is_untouched())
    {
        return resume_visualization(visualization, next_epoch);
    }

    let mut visualization = standardized_visualization(id, name, visualization_type);
    visualization.epoch = next_epoch;

    let mut actions = vec![
        Action::AddVisualization {
            visualization: visualization.clone(),
        },
        Action::AddVisualizationUiConfiguration {
            ui_configuration: standardized_ui_configuration(id, visualization_type),
        },
        Action::AddVisualizationConfiguration {
            configuration: standardized_configuration(&visualization),
        },
    ];

    let layers: Vec<VisualizationLayer> = layer_inputs
        .iter()
        .filter(|input| input.analytics.is_some() || input.data_selections.is_some())
        .map(|input| VisualizationLayer {
            id: input.id.clone(),
            analytics: input
                .analytics
                .as_ref()
                .map(|raw| standardized_analytics(raw, true)),
            data_selections: input.data_selections.clone().unwrap_or_default(),
            layer_type: input.layer_type.clone().unwrap_or_default(),
            config: input.config.clone(),
        })
        .collect();

    if layers.is_empty() {
        return actions;
    }

    if layers.iter().any(|layer| layer.analytics.is_some()) {
        actions.push(progress_update(
            id,
            Some(layer_ids(&layers)),
            Progress::ok(100, ANALYTICS_LOADED),
        ));
        actions.extend(
            layers
                .into_iter()
                .map(|layer| Action::AddVisualizationLayer { layer }),
        );
    } else if layers.iter().any(|layer| !layer.data_selections.is_empty()) {
        // Only layers with selections are persisted and queried.
        let layers: Vec<VisualizationLayer> = layers
            .into_iter()
            .filter(|layer| !layer.data_selections.is_empty())
            .collect();
        actions.push(progress_update(
            id,
            Some(layer_ids(&layers)),
            Progress::ok(50, FAVORITE_LOADED),
        ));
        actions.extend(
            layers
                .iter()
                .cloned()
                .map(|layer| Action::AddVisualizationLayer { layer }),
        );
        actions.push(Action::LoadVisualizationAnalytics {
            visualization_id: id.to_string(),
            epoch: next_epoch,
            layers,
        });
    } else {
        warn!(
            visualization_id = id,
            "visualization has no visualizable layer or data selections"
        );
    }

    actions
}

fn resume_visualization(visualization: &Visualization, epoch: u64) -> Vec<Action> {
    let mut actions = vec![
        Action::AddVisualizationConfiguration {
            configuration: standardized_configuration(visualization),
        },
        Action::UpdateVisualization {
            id: visualization.id.clone(),
            changes: VisualizationChanges {
                epoch: Some(epoch),
                ..Default::default()
            },
        },
    ];

    if visualization.favorite.is_some() {
        let mut visualization = visualization.clone();
        visualization.epoch = epoch;
        actions.push(Action::LoadVisualizationFavorite { visualization });
    }

    actions
}

fn favorite_loaded(
    state: &VisualizationState,
    visualization: &Visualization,
    favorite: Option<&Value>,
) -> Vec<Action> {
    if !is_current(state, &visualization.id, visualization.epoch) {
        return Vec::new();
    }

    let (Some(options), Some(favorite)) = (visualization.favorite.as_ref(), favorite) else {
        let layers = visualization
            .favorite
            .as_ref()
            .map(|options| vec![options.id.clone()])
            .unwrap_or_default();
        return vec![progress_update(
            &visualization.id,
            Some(layers),
            Progress::ok(100, INFORMATION_LOADED),
        )];
    };

    if options.require_analytics {
        let mut actions = vec![Action::UpdateVisualizationConfiguration {
            id: visualization.visualization_config_id.clone(),
            changes: VisualizationConfigurationChanges {
                basemap: favorite
                    .get("basemap")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                zoom: favorite.get("zoom").and_then(Value::as_f64),
                latitude: favorite.get("latitude").and_then(Value::as_f64),
                longitude: favorite.get("longitude").and_then(Value::as_f64),
                ..Default::default()
            },
        }];

        let sub_views: Vec<&Value> = match favorite.get("mapViews").and_then(Value::as_array) {
            Some(map_views) => map_views.iter().collect(),
            None => vec![favorite],
        };

        let layers: Vec<VisualizationLayer> = sub_views
            .into_iter()
            .map(|sub_view| VisualizationLayer {
                id: value_id(sub_view),
                analytics: None,
                data_selections: selection_dimensions_from_favorite(sub_view),
                layer_type: visualization_layer_type(&options.favorite_type, sub_view),
                config: layer_config(sub_view, &visualization.visualization_type),
            })
            .collect();

        info!(
            visualization_id = %visualization.id,
            favorite_id = %options.id,
            layers = layers.len(),
            "favorite loaded; requesting analytics"
        );

        actions.extend(
            layers
                .iter()
                .cloned()
                .map(|layer| Action::AddVisualizationLayer { layer }),
        );
        actions.push(progress_update(
            &visualization.id,
            Some(layer_ids(&layers)),
            Progress::ok(50, FAVORITE_INFORMATION_LOADED),
        ));
        actions.push(Action::LoadVisualizationAnalytics {
            visualization_id: visualization.id.clone(),
            epoch: visualization.epoch,
            layers,
        });
        actions
    } else {
        let layer = VisualizationLayer {
            id: favorite
                .get("id")
                .and_then(Value::as_str)
                .map_or_else(|| options.id.clone(), str::to_string),
            analytics: Some(static_analytics(
                favorite.get(&options.favorite_type).unwrap_or(&Value::Null),
            )),
            data_selections: Vec::new(),
            layer_type: Default::default(),
            config: layer_config(&Value::Null, &visualization.visualization_type),
        };

        vec![
            progress_update(
                &visualization.id,
                Some(vec![layer.id.clone()]),
                Progress::ok(100, INFORMATION_LOADED),
            ),
            Action::AddVisualizationLayer { layer },
        ]
    }
}

fn value_id(value: &Value) -> String {
    value
        .get("id")
        .and_then(Value::as_str)
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_string)
}

fn request_failed(
    state: &VisualizationState,
    visualization_id: &str,
    epoch: u64,
    error: &HttpError,
) -> Vec<Action> {
    if !is_current(state, visualization_id, epoch) {
        return Vec::new();
    }

    vec![progress_update(
        visualization_id,
        None,
        Progress::error(error.status, error.body.clone()),
    )]
}

fn analytics_loaded(
    state: &VisualizationState,
    visualization_id: &str,
    epoch: u64,
    layers: &[VisualizationLayer],
) -> Vec<Action> {
    if !is_current(state, visualization_id, epoch) {
        return Vec::new();
    }

    let mut actions: Vec<Action> = layers
        .iter()
        .filter_map(|layer| {
            layer.analytics.as_ref().map(|analytics| Action::UpdateVisualizationLayer {
                id: layer.id.clone(),
                changes: VisualizationLayerChanges {
                    analytics: Some(analytics.clone()),
                    ..Default::default()
                },
            })
        })
        .collect();
    actions.push(progress_update(
        visualization_id,
        None,
        Progress::ok(100, ANALYTICS_LOADED),
    ));
    actions
}

fn change_visualization_type(
    state: &VisualizationState,
    id: &str,
    visualization_type: &VisualizationType,
) -> Vec<Action> {
    let Some(visualization) = state.visualization(id) else {
        debug!(visualization_id = id, "type change for unknown visualization");
        return Vec::new();
    };

    vec![Action::UpdateVisualizationConfiguration {
        id: visualization.visualization_config_id.clone(),
        changes: VisualizationConfigurationChanges {
            current_type: Some(standardized_visualization_type(visualization_type)),
            ..Default::default()
        },
    }]
}

#[cfg(test)]
#[path = "tests/effects_tests.rs"]
mod tests;
