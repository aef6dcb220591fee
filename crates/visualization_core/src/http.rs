//! reqwest-backed implementations of the favorite and analytics services.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use shared::{
    domain::{DataSelection, FavoriteDescriptor, SelectionLayout, VisualizationLayer},
    error::HttpError,
};
use tracing::debug;
use url::Url;

use crate::services::{AnalyticsService, FavoriteService};

const FAVORITE_FIELDS: &str = "*,columns[*,items[*]],rows[*,items[*]],filters[*,items[*]],\
mapViews[*,columns[*,items[*]],rows[*,items[*]],filters[*,items[*]]]";

#[derive(Debug, Clone)]
struct Credentials {
    username: String,
    password: String,
}

/// Thin JSON client for the dashboard web API.
#[derive(Debug, Clone)]
pub struct DashboardApi {
    http: Client,
    base_url: Url,
    credentials: Option<Credentials>,
}

impl DashboardApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url = base_url.trim().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base_url =
            Url::parse(&base_url).with_context(|| format!("invalid base url '{base_url}'"))?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            http,
            base_url,
            credentials: None,
        })
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn get_json(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Option<Value>, HttpError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|err| HttpError::transport(format!("invalid request path '{path}': {err}")))?;
        debug!(url = %url, "dashboard api request");

        let mut request = self.http.get(url).query(query);
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }

        let response = request
            .send()
            .await
            .map_err(|err| HttpError::transport(err.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| HttpError::new(status.as_u16(), err.to_string()))?;

        if !status.is_success() {
            return Err(HttpError::new(status.as_u16(), body));
        }
        if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
            return Ok(None);
        }

        let value: Value = serde_json::from_str(&body).map_err(|err| {
            HttpError::new(status.as_u16(), format!("invalid json response: {err}"))
        })?;
        Ok((!value.is_null()).then_some(value))
    }
}

pub struct HttpFavoriteService {
    api: DashboardApi,
}

impl HttpFavoriteService {
    pub fn new(api: DashboardApi) -> Self {
        Self { api }
    }
}

/// Path and query for fetching a favorite. Analytics favorites live in their
/// own collection; inline ones are read off the dashboard item.
pub fn favorite_request(descriptor: &FavoriteDescriptor) -> (String, Vec<(String, String)>) {
    if descriptor.require_analytics {
        (
            format!("api/{}s/{}.json", descriptor.favorite_type, descriptor.id),
            vec![("fields".to_string(), FAVORITE_FIELDS.to_string())],
        )
    } else {
        (
            format!("api/dashboardItems/{}.json", descriptor.id),
            vec![(
                "fields".to_string(),
                format!("id,{}[*]", descriptor.favorite_type),
            )],
        )
    }
}

#[async_trait]
impl FavoriteService for HttpFavoriteService {
    async fn get_favorite(
        &self,
        descriptor: &FavoriteDescriptor,
    ) -> Result<Option<Value>, HttpError> {
        let (path, query) = favorite_request(descriptor);
        self.api.get_json(&path, &query).await
    }
}

pub struct HttpAnalyticsService {
    api: DashboardApi,
}

impl HttpAnalyticsService {
    pub fn new(api: DashboardApi) -> Self {
        Self { api }
    }
}

/// Columns and rows become `dimension` parameters, filters become `filter`.
pub fn analytics_query(data_selections: &[DataSelection]) -> Vec<(String, String)> {
    data_selections
        .iter()
        .map(|selection| {
            let key = match selection.layout {
                SelectionLayout::Columns | SelectionLayout::Rows => "dimension",
                SelectionLayout::Filters => "filter",
            };
            let value = if selection.items.is_empty() {
                selection.dimension.clone()
            } else {
                let items: Vec<&str> = selection.items.iter().map(|item| item.id.as_str()).collect();
                format!("{}:{}", selection.dimension, items.join(";"))
            };
            (key.to_string(), value)
        })
        .collect()
}

#[async_trait]
impl AnalyticsService for HttpAnalyticsService {
    async fn get_analytics(&self, layer: &VisualizationLayer) -> Result<Value, HttpError> {
        let query = analytics_query(&layer.data_selections);
        let analytics = self.api.get_json("api/analytics.json", &query).await?;
        Ok(analytics.unwrap_or(Value::Null))
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
