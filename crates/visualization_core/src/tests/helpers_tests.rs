use super::*;
use serde_json::json;

#[test]
fn standardizes_chart_and_table_families() {
    assert_eq!(
        standardized_visualization_type(&VisualizationType::EventChart),
        VisualizationType::Chart
    );
    assert_eq!(
        standardized_visualization_type(&VisualizationType::ReportTable),
        VisualizationType::Table
    );
    assert_eq!(
        standardized_visualization_type(&VisualizationType::EventReport),
        VisualizationType::Table
    );
    assert_eq!(
        standardized_visualization_type(&VisualizationType::Map),
        VisualizationType::Map
    );
    assert_eq!(
        standardized_visualization_type(&VisualizationType::Other("TEXT".into())),
        VisualizationType::Other("TEXT".into())
    );
}

#[test]
fn standardized_visualization_starts_untouched() {
    let visualization = standardized_visualization("item1", "ANC", &VisualizationType::Chart);
    assert_eq!(visualization.visualization_config_id, "item1_config");
    assert_eq!(visualization.progress.percent, 0);
    assert!(visualization.layers.is_empty());
    assert!(visualization.favorite.is_none());

    let ui = standardized_ui_configuration("item1", &VisualizationType::Chart);
    assert_eq!(ui.height, NORMAL_HEIGHT);
    assert!(!ui.full_screen);
    assert!(ui.show_body);
}

#[test]
fn configuration_takes_favorite_name_and_standard_type() {
    let mut visualization =
        standardized_visualization("item1", "", &VisualizationType::ReportTable);
    visualization.favorite = Some(FavoriteDescriptor {
        id: "fav".into(),
        name: "Immunization".into(),
        favorite_type: "reportTable".into(),
        require_analytics: true,
        basemap: None,
        zoom: None,
        latitude: None,
        longitude: None,
        map_views: None,
    });

    let configuration = standardized_configuration(&visualization);
    assert_eq!(configuration.id, "item1_config");
    assert_eq!(configuration.name, "Immunization");
    assert_eq!(configuration.current_type, VisualizationType::Table);
}

#[test]
fn standardized_analytics_infers_dimensions() {
    let raw = json!({
        "headers": [{"name": "dx"}, {"name": "value"}],
        "metaData": {"items": {}},
        "rows": [["a", "1"], ["b", "2"], ["c", "3"]]
    });
    let analytics = standardized_analytics(&raw, true);
    assert_eq!(analytics.height, 3);
    assert_eq!(analytics.width, 2);
    assert!(analytics.pre_aggregated);
    assert_eq!(analytics.meta_data, json!({"items": {}}));
}

#[test]
fn standardized_analytics_tolerates_garbage() {
    let analytics = standardized_analytics(&json!("not analytics"), false);
    assert_eq!(analytics.rows, json!([]));
    assert_eq!(analytics.meta_data, Value::Null);
}

#[test]
fn static_analytics_wraps_inline_rows() {
    let rows = json!([{"id": "r1"}, {"id": "r2"}]);
    let analytics = static_analytics(&rows);
    assert_eq!(analytics.rows, rows);
    assert_eq!(analytics.height, 2);
    assert_eq!(static_analytics(&Value::Null).rows, Value::Null);
}

#[test]
fn static_analytics_keeps_scalar_fields_unchanged() {
    for inline in [json!("dhis-web-maps"), json!(true), json!({"id": "u1"})] {
        let analytics = static_analytics(&inline);
        assert_eq!(analytics.rows, inline);
        assert_eq!(analytics.height, 0);
    }
}

#[test]
fn extracts_selection_dimensions_in_layout_order() {
    let favorite = json!({
        "filters": [{"dimension": "ou", "items": [{"id": "ImspTQPwCqd", "displayName": "Sierra Leone"}]}],
        "columns": [{
            "dimension": "dx",
            "legendSet": {"id": "legend1"},
            "items": [
                {"dimensionItem": "fbfJHSPpUQD", "displayName": "ANC 1st visit", "dimensionItemType": "DATA_ELEMENT"},
                {"id": "cYeuwXTCPkU", "name": "ANC 2nd visit"}
            ]
        }],
        "rows": [{"dimension": "pe", "items": [{"id": "LAST_12_MONTHS"}]}, {"noDimension": true}]
    });

    let selections = selection_dimensions_from_favorite(&favorite);
    let dimensions: Vec<(&str, SelectionLayout)> = selections
        .iter()
        .map(|selection| (selection.dimension.as_str(), selection.layout))
        .collect();
    assert_eq!(
        dimensions,
        vec![
            ("dx", SelectionLayout::Columns),
            ("pe", SelectionLayout::Rows),
            ("ou", SelectionLayout::Filters),
        ]
    );

    let dx = &selections[0];
    assert_eq!(dx.legend_set.as_deref(), Some("legend1"));
    assert_eq!(dx.items[0].id, "fbfJHSPpUQD");
    assert_eq!(dx.items[0].item_type.as_deref(), Some("DATA_ELEMENT"));
    assert_eq!(dx.items[1].name.as_deref(), Some("ANC 2nd visit"));
}

#[test]
fn favorite_without_layout_has_no_selections() {
    assert!(selection_dimensions_from_favorite(&json!({"id": "x"})).is_empty());
}

#[test]
fn classifies_layer_types() {
    assert_eq!(
        visualization_layer_type("map", &json!({"layer": "thematic2"})),
        LayerType::Thematic
    );
    assert_eq!(
        visualization_layer_type("map", &json!({"layer": "facility"})),
        LayerType::Facility
    );
    assert_eq!(
        visualization_layer_type("map", &json!({"layer": "earthEngine"})),
        LayerType::EarthEngine
    );
    assert_eq!(visualization_layer_type("map", &json!({})), LayerType::Thematic);
    assert_eq!(
        visualization_layer_type("eventReport", &json!({})),
        LayerType::Event
    );
    assert_eq!(visualization_layer_type("chart", &json!({})), LayerType::Thematic);
}

#[test]
fn converts_analytics_dashboard_item() {
    let item = json!({
        "id": "item1",
        "type": "CHART",
        "chart": {"id": "chart1", "displayName": "ANC coverage"}
    });
    let visualization = visualization_from_dashboard_item(&item).expect("visualization");
    let favorite = visualization.favorite.expect("favorite");
    assert_eq!(visualization.name, "ANC coverage");
    assert_eq!(favorite.id, "chart1");
    assert_eq!(favorite.favorite_type, "chart");
    assert!(favorite.require_analytics);
}

#[test]
fn converts_inline_dashboard_item() {
    let item = json!({"id": "item2", "type": "REPORTS", "reports": [{"id": "r1"}]});
    let visualization = visualization_from_dashboard_item(&item).expect("visualization");
    let favorite = visualization.favorite.expect("favorite");
    assert_eq!(favorite.id, "item2");
    assert_eq!(favorite.favorite_type, "reports");
    assert!(!favorite.require_analytics);
}

#[test]
fn rejects_incomplete_dashboard_items() {
    assert!(visualization_from_dashboard_item(&json!({"type": "CHART"})).is_none());
    assert!(visualization_from_dashboard_item(&json!({"id": "x", "type": "CHART"})).is_none());
    assert!(visualization_from_dashboard_item(&json!({"id": "x", "type": "TEXT"})).is_none());
}

#[test]
fn layer_config_carries_visualization_type() {
    let config = layer_config(&json!({"id": "view1", "opacity": 0.9}), &VisualizationType::Map);
    assert_eq!(config[VISUALIZATION_TYPE_KEY], json!("MAP"));
    assert_eq!(config["opacity"], json!(0.9));
}
