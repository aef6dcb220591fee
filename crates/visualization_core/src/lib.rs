//! Visualization lifecycle orchestration: standardization helpers, pure
//! effect transitions, service contracts and the runtime context tying them
//! to the store.

pub mod effects;
pub mod helpers;
pub mod http;
pub mod runtime;
pub mod services;

pub use http::{DashboardApi, HttpAnalyticsService, HttpFavoriteService};
pub use runtime::VisualizationContext;
pub use services::{AnalyticsService, FavoriteService, MissingAnalyticsService, MissingFavoriteService};
