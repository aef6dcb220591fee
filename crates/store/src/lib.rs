//! Normalized in-memory store for visualization entities.
//!
//! Every entity kind lives in its own [`EntityCollection`], keyed by id and
//! kept in insertion order. The only way to mutate a [`VisualizationState`] is
//! [`VisualizationState::reduce`], which never fails: actions naming unknown
//! ids leave the state untouched.

use indexmap::IndexMap;
use serde::Serialize;
use shared::{
    domain::{
        Visualization, VisualizationChanges, VisualizationConfiguration,
        VisualizationConfigurationChanges, VisualizationLayer, VisualizationLayerChanges,
        VisualizationUiConfiguration, VisualizationUiConfigurationChanges, FULL_SCREEN_HEIGHT,
        NORMAL_HEIGHT,
    },
    protocol::Action,
};
use tracing::debug;

pub trait Entity {
    type Changes;

    fn id(&self) -> &str;
    fn apply_changes(&mut self, changes: &Self::Changes);
}

impl Entity for Visualization {
    type Changes = VisualizationChanges;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply_changes(&mut self, changes: &VisualizationChanges) {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(layers) = &changes.layers {
            self.layers = layers.clone();
        }
        if let Some(progress) = &changes.progress {
            self.progress = progress.clone();
        }
        if let Some(epoch) = changes.epoch {
            self.epoch = epoch;
        }
    }
}

impl Entity for VisualizationLayer {
    type Changes = VisualizationLayerChanges;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply_changes(&mut self, changes: &VisualizationLayerChanges) {
        if let Some(analytics) = &changes.analytics {
            self.analytics = Some(analytics.clone());
        }
        if let Some(data_selections) = &changes.data_selections {
            self.data_selections = data_selections.clone();
        }
        if let Some(layer_type) = &changes.layer_type {
            self.layer_type = layer_type.clone();
        }
        if let Some(config) = &changes.config {
            for (key, value) in config {
                self.config.insert(key.clone(), value.clone());
            }
        }
    }
}

impl Entity for VisualizationUiConfiguration {
    type Changes = VisualizationUiConfigurationChanges;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply_changes(&mut self, changes: &VisualizationUiConfigurationChanges) {
        if let Some(full_screen) = changes.full_screen {
            self.full_screen = full_screen;
        }
        if let Some(height) = &changes.height {
            self.height = height.clone();
        }
        if let Some(show_body) = changes.show_body {
            self.show_body = show_body;
        }
        if let Some(show_interpretation) = changes.show_interpretation {
            self.show_interpretation = show_interpretation;
        }
    }
}

impl Entity for VisualizationConfiguration {
    type Changes = VisualizationConfigurationChanges;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply_changes(&mut self, changes: &VisualizationConfigurationChanges) {
        if let Some(current_type) = &changes.current_type {
            self.current_type = current_type.clone();
        }
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if changes.basemap.is_some() {
            self.basemap = changes.basemap.clone();
        }
        if changes.zoom.is_some() {
            self.zoom = changes.zoom;
        }
        if changes.latitude.is_some() {
            self.latitude = changes.latitude;
        }
        if changes.longitude.is_some() {
            self.longitude = changes.longitude;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EntityCollection<T> {
    entities: IndexMap<String, T>,
}

impl<T> Default for EntityCollection<T> {
    fn default() -> Self {
        Self {
            entities: IndexMap::new(),
        }
    }
}

impl<T: Entity> EntityCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole collection.
    pub fn add_all(&mut self, items: impl IntoIterator<Item = T>) {
        self.entities = items
            .into_iter()
            .map(|item| (item.id().to_string(), item))
            .collect();
    }

    /// Inserts `item`; an existing entity with the same id is overwritten in
    /// place and keeps its position.
    pub fn add_one(&mut self, item: T) {
        self.entities.insert(item.id().to_string(), item);
    }

    /// Returns `false` when no entity has the given id.
    pub fn update_one(&mut self, id: &str, changes: &T::Changes) -> bool {
        match self.entities.get_mut(id) {
            Some(entity) => {
                entity.apply_changes(changes);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.entities.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entities.values()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationState {
    visualizations: EntityCollection<Visualization>,
    layers: EntityCollection<VisualizationLayer>,
    ui_configurations: EntityCollection<VisualizationUiConfiguration>,
    configurations: EntityCollection<VisualizationConfiguration>,
}

impl VisualizationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Functional form of [`VisualizationState::reduce`].
    pub fn reduced(mut self, action: &Action) -> Self {
        self.reduce(action);
        self
    }

    pub fn reduce(&mut self, action: &Action) {
        let applied = match action {
            Action::AddAllVisualizations { visualizations } => {
                self.visualizations.add_all(visualizations.iter().cloned());
                true
            }
            Action::AddVisualization { visualization } => {
                self.visualizations.add_one(visualization.clone());
                true
            }
            Action::UpdateVisualization { id, changes } => {
                self.visualizations.update_one(id, changes)
            }
            Action::AddAllVisualizationLayers { layers } => {
                self.layers.add_all(layers.iter().cloned());
                true
            }
            Action::AddVisualizationLayer { layer } => {
                self.layers.add_one(layer.clone());
                true
            }
            Action::UpdateVisualizationLayer { id, changes } => self.layers.update_one(id, changes),
            Action::AddAllVisualizationUiConfigurations { ui_configurations } => {
                self.ui_configurations
                    .add_all(ui_configurations.iter().cloned());
                true
            }
            Action::AddVisualizationUiConfiguration { ui_configuration } => {
                self.ui_configurations.add_one(ui_configuration.clone());
                true
            }
            Action::ShowOrHideVisualizationBody { id, changes } => {
                self.ui_configurations.update_one(id, changes)
            }
            Action::ToggleFullScreen { id } => self.toggle_full_screen(id),
            Action::ToggleVisualizationInterpretation { id } => self.toggle_interpretation(id),
            Action::AddAllVisualizationConfigurations { configurations } => {
                self.configurations.add_all(configurations.iter().cloned());
                true
            }
            Action::AddVisualizationConfiguration { configuration } => {
                self.configurations.add_one(configuration.clone());
                true
            }
            Action::UpdateVisualizationConfiguration { id, changes } => {
                self.configurations.update_one(id, changes)
            }
            Action::InitializeVisualization { .. }
            | Action::LoadVisualizationFavorite { .. }
            | Action::LoadVisualizationFavoriteSuccess { .. }
            | Action::LoadVisualizationFavoriteFail { .. }
            | Action::LoadVisualizationAnalytics { .. }
            | Action::LoadVisualizationAnalyticsSuccess { .. }
            | Action::LoadVisualizationAnalyticsFail { .. }
            | Action::ChangeVisualizationType { .. } => return,
        };

        if !applied {
            debug!(action = action.name(), "action targets unknown entity; state unchanged");
        }
    }

    fn toggle_full_screen(&mut self, id: &str) -> bool {
        let Some(full_screen) = self
            .ui_configurations
            .get(id)
            .map(|ui_configuration| ui_configuration.full_screen)
        else {
            return false;
        };

        let height = if full_screen {
            NORMAL_HEIGHT
        } else {
            FULL_SCREEN_HEIGHT
        };
        self.ui_configurations.update_one(
            id,
            &VisualizationUiConfigurationChanges {
                full_screen: Some(!full_screen),
                height: Some(height.to_string()),
                ..Default::default()
            },
        )
    }

    fn toggle_interpretation(&mut self, id: &str) -> bool {
        let Some(show_interpretation) = self
            .ui_configurations
            .get(id)
            .map(|ui_configuration| ui_configuration.show_interpretation)
        else {
            return false;
        };

        self.ui_configurations.update_one(
            id,
            &VisualizationUiConfigurationChanges {
                show_interpretation: Some(!show_interpretation),
                ..Default::default()
            },
        )
    }

    pub fn visualizations(&self) -> &EntityCollection<Visualization> {
        &self.visualizations
    }

    pub fn layers(&self) -> &EntityCollection<VisualizationLayer> {
        &self.layers
    }

    pub fn ui_configurations(&self) -> &EntityCollection<VisualizationUiConfiguration> {
        &self.ui_configurations
    }

    pub fn configurations(&self) -> &EntityCollection<VisualizationConfiguration> {
        &self.configurations
    }

    pub fn visualization(&self, id: &str) -> Option<&Visualization> {
        self.visualizations.get(id)
    }

    /// Layers of a visualization in the order the visualization lists them.
    /// Ids without a stored layer are skipped.
    pub fn visualization_layers(&self, visualization_id: &str) -> Vec<&VisualizationLayer> {
        self.visualizations
            .get(visualization_id)
            .map(|visualization| {
                visualization
                    .layers
                    .iter()
                    .filter_map(|layer_id| self.layers.get(layer_id))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn ui_configuration(&self, visualization_id: &str) -> Option<&VisualizationUiConfiguration> {
        self.ui_configurations.get(visualization_id)
    }

    pub fn configuration(&self, visualization_id: &str) -> Option<&VisualizationConfiguration> {
        self.visualizations
            .get(visualization_id)
            .and_then(|visualization| {
                self.configurations
                    .get(&visualization.visualization_config_id)
            })
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
