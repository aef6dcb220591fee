use std::{collections::VecDeque, sync::Arc};

use futures::{
    future::{try_join_all, BoxFuture},
    stream::FuturesUnordered,
    StreamExt,
};
use shared::{
    domain::{Visualization, VisualizationLayer, VisualizationType, VisualizationUiConfigurationChanges},
    protocol::{Action, VisualizationLayerInput},
};
use store::VisualizationState;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::{
    effects,
    helpers::standardized_analytics,
    services::{AnalyticsService, FavoriteService, MissingAnalyticsService, MissingFavoriteService},
};

/// Owns the visualization store and drives every action through the reducer
/// and the effects, one at a time and in FIFO order.
///
/// Service calls are kept as in-flight futures; their completions are fed
/// back through [`VisualizationContext::next_completion`] or
/// [`VisualizationContext::run_until_idle`].
pub struct VisualizationContext {
    state: VisualizationState,
    queue: VecDeque<Action>,
    in_flight: FuturesUnordered<BoxFuture<'static, Action>>,
    favorites: Arc<dyn FavoriteService>,
    analytics: Arc<dyn AnalyticsService>,
    events: broadcast::Sender<Action>,
}

impl Default for VisualizationContext {
    fn default() -> Self {
        Self::new(Arc::new(MissingFavoriteService), Arc::new(MissingAnalyticsService))
    }
}

impl VisualizationContext {
    pub fn new(favorites: Arc<dyn FavoriteService>, analytics: Arc<dyn AnalyticsService>) -> Self {
        let (events, _) = broadcast::channel(1024);
        Self {
            state: VisualizationState::new(),
            queue: VecDeque::new(),
            in_flight: FuturesUnordered::new(),
            favorites,
            analytics,
            events,
        }
    }

    pub fn state(&self) -> &VisualizationState {
        &self.state
    }

    /// Receives every action after it has been applied to the store.
    pub fn subscribe(&self) -> broadcast::Receiver<Action> {
        self.events.subscribe()
    }

    pub fn pending_requests(&self) -> usize {
        self.in_flight.len()
    }

    pub fn dispatch(&mut self, action: Action) {
        self.queue.push_back(action);
        while let Some(action) = self.queue.pop_front() {
            self.process(action);
        }
    }

    fn process(&mut self, action: Action) {
        debug!(action = action.name(), "processing action");
        self.state.reduce(&action);
        let follow_ups = effects::run(&self.state, &action);

        match &action {
            Action::LoadVisualizationFavorite { visualization } => {
                self.request_favorite(visualization.clone())
            }
            Action::LoadVisualizationAnalytics {
                visualization_id,
                epoch,
                layers,
            } => self.request_analytics(visualization_id.clone(), *epoch, layers.clone()),
            _ => {}
        }

        // Nobody listening is fine.
        let _ = self.events.send(action);
        self.queue.extend(follow_ups);
    }

    fn request_favorite(&mut self, visualization: Visualization) {
        let Some(descriptor) = visualization.favorite.clone() else {
            self.queue.push_back(Action::LoadVisualizationFavoriteSuccess {
                visualization,
                favorite: None,
            });
            return;
        };

        let service = Arc::clone(&self.favorites);
        self.in_flight.push(Box::pin(async move {
            match service.get_favorite(&descriptor).await {
                Ok(favorite) => Action::LoadVisualizationFavoriteSuccess {
                    visualization,
                    favorite,
                },
                Err(error) => {
                    warn!(
                        visualization_id = %visualization.id,
                        favorite_id = %descriptor.id,
                        status = error.status,
                        "favorite load failed"
                    );
                    Action::LoadVisualizationFavoriteFail {
                        visualization_id: visualization.id,
                        epoch: visualization.epoch,
                        error,
                    }
                }
            }
        }));
    }

    fn request_analytics(&mut self, visualization_id: String, epoch: u64, layers: Vec<VisualizationLayer>) {
        let service = Arc::clone(&self.analytics);
        self.in_flight.push(Box::pin(async move {
            let responses = try_join_all(layers.iter().map(|layer| service.get_analytics(layer))).await;
            match responses {
                Ok(responses) => Action::LoadVisualizationAnalyticsSuccess {
                    visualization_id,
                    epoch,
                    layers: layers
                        .into_iter()
                        .zip(responses)
                        .map(|(mut layer, raw)| {
                            layer.analytics = Some(standardized_analytics(&raw, false));
                            layer
                        })
                        .collect(),
                },
                Err(error) => {
                    warn!(
                        visualization_id = %visualization_id,
                        status = error.status,
                        "analytics load failed"
                    );
                    Action::LoadVisualizationAnalyticsFail {
                        visualization_id,
                        epoch,
                        error,
                    }
                }
            }
        }));
    }

    /// Waits for one in-flight service call and dispatches its outcome.
    /// Returns `false` when nothing was in flight.
    pub async fn next_completion(&mut self) -> bool {
        match self.in_flight.next().await {
            Some(action) => {
                self.dispatch(action);
                true
            }
            None => false,
        }
    }

    pub async fn run_until_idle(&mut self) {
        while self.next_completion().await {}
    }

    pub fn initialize(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        visualization_type: VisualizationType,
        visualization_layers: Option<Vec<VisualizationLayerInput>>,
    ) {
        self.dispatch(Action::InitializeVisualization {
            id: id.into(),
            name: name.into(),
            visualization_type,
            visualization_layers,
        });
    }

    pub fn toggle_full_screen(&mut self, id: impl Into<String>) {
        self.dispatch(Action::ToggleFullScreen { id: id.into() });
    }

    pub fn show_or_hide_body(&mut self, id: impl Into<String>, changes: VisualizationUiConfigurationChanges) {
        self.dispatch(Action::ShowOrHideVisualizationBody {
            id: id.into(),
            changes,
        });
    }

    pub fn toggle_interpretation(&mut self, id: impl Into<String>) {
        self.dispatch(Action::ToggleVisualizationInterpretation { id: id.into() });
    }

    pub fn change_visualization_type(&mut self, id: impl Into<String>, visualization_type: VisualizationType) {
        self.dispatch(Action::ChangeVisualizationType {
            id: id.into(),
            visualization_type,
        });
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
