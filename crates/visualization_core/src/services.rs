use async_trait::async_trait;
use serde_json::Value;
use shared::{
    domain::{FavoriteDescriptor, VisualizationLayer},
    error::HttpError,
};

#[async_trait]
pub trait FavoriteService: Send + Sync {
    /// `Ok(None)` means the API answered without a payload.
    async fn get_favorite(&self, descriptor: &FavoriteDescriptor)
        -> Result<Option<Value>, HttpError>;
}

#[async_trait]
pub trait AnalyticsService: Send + Sync {
    async fn get_analytics(&self, layer: &VisualizationLayer) -> Result<Value, HttpError>;
}

pub struct MissingFavoriteService;

#[async_trait]
impl FavoriteService for MissingFavoriteService {
    async fn get_favorite(
        &self,
        descriptor: &FavoriteDescriptor,
    ) -> Result<Option<Value>, HttpError> {
        Err(HttpError::transport(format!(
            "favorite service unavailable for {} {}",
            descriptor.favorite_type, descriptor.id
        )))
    }
}

pub struct MissingAnalyticsService;

#[async_trait]
impl AnalyticsService for MissingAnalyticsService {
    async fn get_analytics(&self, layer: &VisualizationLayer) -> Result<Value, HttpError> {
        Err(HttpError::transport(format!(
            "analytics service unavailable for layer {}",
            layer.id
        )))
    }
}
