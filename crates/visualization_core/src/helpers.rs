//! Pure standardization helpers turning heterogeneous API payloads into the
//! canonical entity shapes kept by the store.

use serde_json::{Map, Value};
use shared::domain::{
    Analytics, DataSelection, FavoriteDescriptor, LayerType, Progress, SelectionItem,
    SelectionLayout, Visualization, VisualizationConfiguration, VisualizationType,
    VisualizationUiConfiguration, NORMAL_HEIGHT,
};

pub const VISUALIZATION_TYPE_KEY: &str = "visualizationType";

/// Collapses the many dashboard item kinds onto the renderer that draws them.
pub fn standardized_visualization_type(visualization_type: &VisualizationType) -> VisualizationType {
    match visualization_type {
        VisualizationType::Chart | VisualizationType::EventChart => VisualizationType::Chart,
        VisualizationType::Table | VisualizationType::ReportTable | VisualizationType::EventReport => {
            VisualizationType::Table
        }
        other => other.clone(),
    }
}

pub fn visualization_config_id(visualization_id: &str) -> String {
    format!("{visualization_id}_config")
}

pub fn standardized_visualization(
    id: &str,
    name: &str,
    visualization_type: &VisualizationType,
) -> Visualization {
    Visualization {
        id: id.to_string(),
        name: name.to_string(),
        visualization_type: visualization_type.clone(),
        visualization_config_id: visualization_config_id(id),
        favorite: None,
        layers: Vec::new(),
        progress: Progress::default(),
        epoch: 0,
    }
}

pub fn standardized_ui_configuration(
    id: &str,
    visualization_type: &VisualizationType,
) -> VisualizationUiConfiguration {
    VisualizationUiConfiguration {
        id: id.to_string(),
        visualization_type: visualization_type.clone(),
        full_screen: false,
        height: NORMAL_HEIGHT.to_string(),
        show_body: true,
        show_interpretation: false,
    }
}

pub fn standardized_configuration(visualization: &Visualization) -> VisualizationConfiguration {
    VisualizationConfiguration {
        id: visualization.visualization_config_id.clone(),
        visualization_type: visualization.visualization_type.clone(),
        current_type: standardized_visualization_type(&visualization.visualization_type),
        name: visualization
            .favorite
            .as_ref()
            .map(|favorite| favorite.name.clone())
            .unwrap_or_default(),
        basemap: None,
        zoom: None,
        latitude: None,
        longitude: None,
    }
}

/// Normalizes a raw analytics response. Missing dimensions are inferred from
/// the rows and headers actually present.
pub fn standardized_analytics(raw: &Value, pre_aggregated: bool) -> Analytics {
    let headers = array_of(raw.get("headers"));
    let rows = array_of(raw.get("rows"));
    let height = raw
        .get("height")
        .and_then(Value::as_u64)
        .map(|height| height as usize)
        .unwrap_or(rows.len());
    let rows = Value::Array(rows);
    let width = raw
        .get("width")
        .and_then(Value::as_u64)
        .map(|width| width as usize)
        .unwrap_or(headers.len());

    Analytics {
        headers,
        meta_data: raw.get("metaData").cloned().unwrap_or(Value::Null),
        rows,
        height,
        width,
        pre_aggregated,
    }
}

/// Wraps the field a favorite carries inline (reports, app key, messages)
/// without reshaping it.
pub fn static_analytics(rows: &Value) -> Analytics {
    Analytics {
        height: rows.as_array().map_or(0, Vec::len),
        rows: rows.clone(),
        ..Default::default()
    }
}

fn array_of(value: Option<&Value>) -> Vec<Value> {
    value
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

pub fn selection_dimensions_from_favorite(favorite_layer: &Value) -> Vec<DataSelection> {
    SelectionLayout::ALL
        .into_iter()
        .flat_map(|layout| {
            favorite_layer
                .get(layout.as_str())
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
                .filter_map(move |dimension| selection_from_dimension(layout, dimension))
        })
        .collect()
}

fn selection_from_dimension(layout: SelectionLayout, dimension: &Value) -> Option<DataSelection> {
    let name = dimension.get("dimension")?.as_str()?;
    let items = dimension
        .get("items")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|item| {
            let id = item
                .get("dimensionItem")
                .or_else(|| item.get("id"))?
                .as_str()?;
            Some(SelectionItem {
                id: id.to_string(),
                name: item
                    .get("displayName")
                    .or_else(|| item.get("name"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
                item_type: item
                    .get("dimensionItemType")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            })
        })
        .collect();

    Some(DataSelection {
        dimension: name.to_string(),
        layout,
        filter: dimension
            .get("filter")
            .and_then(Value::as_str)
            .map(str::to_string),
        legend_set: dimension
            .get("legendSet")
            .and_then(|legend_set| legend_set.get("id"))
            .and_then(Value::as_str)
            .map(str::to_string),
        items,
    })
}

pub fn visualization_layer_type(favorite_type: &str, favorite_layer: &Value) -> LayerType {
    match favorite_type {
        "map" => match favorite_layer.get("layer").and_then(Value::as_str) {
            None => LayerType::Thematic,
            Some(layer) if layer.starts_with("thematic") => LayerType::Thematic,
            Some(layer) => LayerType::from(layer.to_string()),
        },
        "eventChart" | "eventReport" => LayerType::Event,
        _ => LayerType::Thematic,
    }
}

/// Dashboard item property holding the favorite for a given item type.
pub fn favorite_key(visualization_type: &VisualizationType) -> Option<&'static str> {
    match visualization_type {
        VisualizationType::Chart => Some("chart"),
        VisualizationType::EventChart => Some("eventChart"),
        VisualizationType::Table | VisualizationType::ReportTable => Some("reportTable"),
        VisualizationType::EventReport => Some("eventReport"),
        VisualizationType::Map => Some("map"),
        VisualizationType::App => Some("appKey"),
        VisualizationType::Reports => Some("reports"),
        VisualizationType::Resources => Some("resources"),
        VisualizationType::Users => Some("users"),
        VisualizationType::Messages => Some("messages"),
        VisualizationType::Other(_) => None,
    }
}

pub fn requires_analytics(favorite_type: &str) -> bool {
    matches!(
        favorite_type,
        "chart" | "eventChart" | "reportTable" | "eventReport" | "map"
    )
}

/// Converts a dashboard item into an untouched visualization carrying its
/// favorite reference. Items without an id or a known kind yield `None`.
pub fn visualization_from_dashboard_item(item: &Value) -> Option<Visualization> {
    let id = item.get("id")?.as_str()?;
    let visualization_type = VisualizationType::from(item.get("type")?.as_str()?);
    let key = favorite_key(&visualization_type)?;

    let favorite = if requires_analytics(key) {
        let favorite = item.get(key)?;
        FavoriteDescriptor {
            id: favorite.get("id")?.as_str()?.to_string(),
            name: display_name(favorite).unwrap_or_default(),
            favorite_type: key.to_string(),
            require_analytics: true,
            basemap: None,
            zoom: None,
            latitude: None,
            longitude: None,
            map_views: None,
        }
    } else {
        // Inline favorites are served by the dashboard item itself.
        FavoriteDescriptor {
            id: id.to_string(),
            name: display_name(item).unwrap_or_else(|| key.to_string()),
            favorite_type: key.to_string(),
            require_analytics: false,
            basemap: None,
            zoom: None,
            latitude: None,
            longitude: None,
            map_views: None,
        }
    };

    let mut visualization =
        standardized_visualization(id, &favorite.name, &visualization_type);
    visualization.favorite = Some(favorite);
    Some(visualization)
}

fn display_name(value: &Value) -> Option<String> {
    value
        .get("displayName")
        .or_else(|| value.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Layer configuration: the favorite sub-view merged with the owning
/// visualization's kind.
pub fn layer_config(source: &Value, visualization_type: &VisualizationType) -> Map<String, Value> {
    let mut config = source.as_object().cloned().unwrap_or_default();
    config.insert(
        VISUALIZATION_TYPE_KEY.to_string(),
        Value::String(visualization_type.to_string()),
    );
    config
}

#[cfg(test)]
#[path = "tests/helpers_tests.rs"]
mod tests;
