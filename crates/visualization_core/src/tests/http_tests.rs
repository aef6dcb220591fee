use super::*;
use axum::{
    extract::{Path, RawQuery},
    http::{HeaderMap, StatusCode as AxumStatus},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use shared::domain::{SelectionItem, VisualizationLayer};
use tokio::net::TcpListener;

const ADMIN_AUTH: &str = "Basic YWRtaW46ZGlzdHJpY3Q=";

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

fn api(base_url: &str) -> DashboardApi {
    DashboardApi::new(base_url, Duration::from_secs(5))
        .expect("api")
        .with_credentials("admin", "district")
}

fn descriptor(favorite_type: &str, id: &str, require_analytics: bool) -> FavoriteDescriptor {
    FavoriteDescriptor {
        id: id.to_string(),
        name: String::new(),
        favorite_type: favorite_type.to_string(),
        require_analytics,
        basemap: None,
        zoom: None,
        latitude: None,
        longitude: None,
        map_views: None,
    }
}

fn selection(dimension: &str, layout: SelectionLayout, items: &[&str]) -> DataSelection {
    DataSelection {
        dimension: dimension.to_string(),
        layout,
        filter: None,
        legend_set: None,
        items: items
            .iter()
            .map(|id| SelectionItem {
                id: id.to_string(),
                name: None,
                item_type: None,
            })
            .collect(),
    }
}

async fn chart_handler(
    Path(file): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> impl IntoResponse {
    let authorized = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        == Some(ADMIN_AUTH);
    if !authorized {
        return (AxumStatus::UNAUTHORIZED, "unauthorized").into_response();
    }
    match file.strip_suffix(".json") {
        Some("chart1") => Json(json!({
            "id": "chart1",
            "fields": query.unwrap_or_default(),
        }))
        .into_response(),
        _ => (AxumStatus::NOT_FOUND, "not found").into_response(),
    }
}

async fn dashboard_item_handler(Path(file): Path<String>) -> impl IntoResponse {
    match file.as_str() {
        "item2.json" => Json(json!({"id": "item2", "reports": [{"id": "r1"}]})).into_response(),
        _ => AxumStatus::NO_CONTENT.into_response(),
    }
}

async fn analytics_handler(RawQuery(query): RawQuery) -> Json<Value> {
    let pairs: Vec<Value> = url::form_urlencoded::parse(query.unwrap_or_default().as_bytes())
        .map(|(key, value)| json!([key, value]))
        .collect();
    Json(json!({"headers": [], "rows": [], "metaData": {"query": pairs}}))
}

fn router() -> Router {
    Router::new()
        .route("/api/charts/:file", get(chart_handler))
        .route("/api/dashboardItems/:file", get(dashboard_item_handler))
        .route("/api/analytics.json", get(analytics_handler))
}

#[test]
fn favorite_request_targets_collection_or_dashboard_item() {
    let (path, query) = favorite_request(&descriptor("reportTable", "rt1", true));
    assert_eq!(path, "api/reportTables/rt1.json");
    assert_eq!(query[0].0, "fields");
    assert!(query[0].1.contains("mapViews"));

    let (path, query) = favorite_request(&descriptor("messages", "item9", false));
    assert_eq!(path, "api/dashboardItems/item9.json");
    assert_eq!(query[0].1, "id,messages[*]");
}

#[test]
fn analytics_query_splits_dimensions_and_filters() {
    let query = analytics_query(&[
        selection("dx", SelectionLayout::Columns, &["a", "b"]),
        selection("pe", SelectionLayout::Rows, &["LAST_12_MONTHS"]),
        selection("ou", SelectionLayout::Filters, &["ImspTQPwCqd"]),
        selection("co", SelectionLayout::Columns, &[]),
    ]);
    assert_eq!(
        query,
        vec![
            ("dimension".to_string(), "dx:a;b".to_string()),
            ("dimension".to_string(), "pe:LAST_12_MONTHS".to_string()),
            ("filter".to_string(), "ou:ImspTQPwCqd".to_string()),
            ("dimension".to_string(), "co".to_string()),
        ]
    );
}

#[tokio::test]
async fn fetches_analytics_favorite_with_credentials() {
    let base_url = serve(router()).await;
    let service = HttpFavoriteService::new(api(&base_url));

    let favorite = service
        .get_favorite(&descriptor("chart", "chart1", true))
        .await
        .expect("favorite")
        .expect("payload");
    assert_eq!(favorite["id"], "chart1");
    assert!(favorite["fields"].as_str().expect("fields").starts_with("fields="));
}

#[tokio::test]
async fn missing_favorite_keeps_status_and_body() {
    let base_url = serve(router()).await;
    let service = HttpFavoriteService::new(api(&base_url));

    let err = service
        .get_favorite(&descriptor("chart", "gone", true))
        .await
        .expect_err("should fail");
    assert_eq!(err, HttpError::new(404, "not found"));
}

#[tokio::test]
async fn rejected_credentials_surface_unauthorized() {
    let base_url = serve(router()).await;
    let api = DashboardApi::new(&base_url, Duration::from_secs(5)).expect("api");
    let service = HttpFavoriteService::new(api);

    let err = service
        .get_favorite(&descriptor("chart", "chart1", true))
        .await
        .expect_err("should fail");
    assert_eq!(err.status, 401);
}

#[tokio::test]
async fn inline_favorite_comes_from_dashboard_item() {
    let base_url = serve(router()).await;
    let service = HttpFavoriteService::new(api(&base_url));

    let favorite = service
        .get_favorite(&descriptor("reports", "item2", false))
        .await
        .expect("favorite")
        .expect("payload");
    assert_eq!(favorite["reports"][0]["id"], "r1");

    let empty = service
        .get_favorite(&descriptor("reports", "item3", false))
        .await
        .expect("favorite");
    assert!(empty.is_none());
}

#[tokio::test]
async fn analytics_request_encodes_selections() {
    let base_url = serve(router()).await;
    let service = HttpAnalyticsService::new(api(&base_url));
    let layer = VisualizationLayer {
        id: "layer1".to_string(),
        analytics: None,
        data_selections: vec![
            selection("dx", SelectionLayout::Columns, &["a", "b"]),
            selection("ou", SelectionLayout::Filters, &["c"]),
        ],
        layer_type: Default::default(),
        config: Default::default(),
    };

    let analytics = service.get_analytics(&layer).await.expect("analytics");
    assert_eq!(
        analytics["metaData"]["query"],
        json!([["dimension", "dx:a;b"], ["filter", "ou:c"]])
    );
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let service = HttpFavoriteService::new(api(&format!("http://{addr}")));
    let err = service
        .get_favorite(&descriptor("chart", "chart1", true))
        .await
        .expect_err("should fail");
    assert!(err.is_transport());
}

#[test]
fn rejects_invalid_base_url() {
    assert!(DashboardApi::new("not a url", Duration::from_secs(1)).is_err());
}

#[test]
fn base_url_gains_trailing_slash() {
    let api = DashboardApi::new("https://play.dhis2.org/demo", Duration::from_secs(1)).expect("api");
    assert_eq!(api.base_url().as_str(), "https://play.dhis2.org/demo/");
}
