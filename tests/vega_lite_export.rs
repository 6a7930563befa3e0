use std::sync::Arc;

use annotated_price_chart::application::coordinator::DashboardCoordinator;
use annotated_price_chart::config::DashboardConfig;
use annotated_price_chart::domain::chart::{ChartBuilder, LayerKind};
use annotated_price_chart::domain::chart::vega_lite::VEGA_LITE_SCHEMA;
use annotated_price_chart::domain::events::ControlEvent;
use annotated_price_chart::infrastructure::EmbeddedStocksRepository;
use insta::assert_json_snapshot;

#[test]
fn default_text_mark() {
    let mut coordinator =
        DashboardCoordinator::new(EmbeddedStocksRepository::new(), DashboardConfig::default()).unwrap();
    coordinator.start().unwrap();
    let mark = coordinator.composed().unwrap().layers[3].text_mark().unwrap().clone();

    assert_json_snapshot!(mark, @r#"
    {
      "text": "Analysis",
      "size": 15,
      "dx": 0,
      "dy": -10,
      "align": "center",
      "baseline": "middle"
    }
    "#);
}

#[test]
fn composed_document_layers() {
    let mut coordinator =
        DashboardCoordinator::new(EmbeddedStocksRepository::new(), DashboardConfig::default()).unwrap();
    coordinator.start().unwrap();
    coordinator.dispatch(ControlEvent::HorizontalOffsetChanged(12)).unwrap();
    let doc = coordinator.composed().unwrap().to_vega_lite().unwrap();

    assert_eq!(doc["$schema"], VEGA_LITE_SCHEMA);
    assert_eq!(doc["title"], "Evolution of stock prices");
    assert_eq!(doc["height"], 500);

    let layers = doc["layer"].as_array().unwrap();
    let names: Vec<LayerKind> = layers.iter().map(|layer| layer["name"].as_str().unwrap().parse().unwrap()).collect();
    assert_eq!(names, vec![LayerKind::Lines, LayerKind::HoverPoints, LayerKind::TooltipRule, LayerKind::Annotations]);
    let marks: Vec<&str> = layers.iter().map(|layer| layer["mark"]["type"].as_str().unwrap()).collect();
    assert_eq!(marks, vec!["line", "circle", "rule", "text"]);

    assert_eq!(layers[0]["encoding"]["color"]["field"], "symbol");
    assert_eq!(layers[0]["data"]["values"][0]["date"].as_str().map(|d| d > "2004-01-01"), Some(true));
    assert_eq!(layers[1]["mark"]["size"], 65.0);
    assert_eq!(layers[2]["encoding"]["tooltip"][1]["title"], "Price (USD)");
    assert_eq!(layers[3]["mark"]["dx"], 12);
    assert_eq!(layers[3]["data"]["values"].as_array().unwrap().len(), 4);
    assert_eq!(layers[3]["data"]["values"][0]["y"], 0.0);
    assert_eq!(layers[3]["encoding"]["tooltip"][0]["field"], "event");
}

#[test]
fn non_interactive_chart_has_no_scale_binding() {
    let mut chart = ChartBuilder::new("t", 300).build(Arc::new(Vec::new()));
    chart.interactive = false;
    let doc = chart.to_vega_lite().unwrap();
    assert!(doc["layer"][0].get("params").is_none());
}
