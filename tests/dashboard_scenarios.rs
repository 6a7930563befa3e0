use std::sync::Arc;

use annotated_price_chart::application::coordinator::DashboardCoordinator;
use annotated_price_chart::config::DashboardConfig;
use annotated_price_chart::domain::annotations::default_annotations;
use annotated_price_chart::domain::errors::AppError;
use annotated_price_chart::domain::events::ControlEvent;
use annotated_price_chart::infrastructure::EmbeddedStocksRepository;
use annotated_price_chart::domain::chart::TextBaseline;
use annotated_price_chart::infrastructure::rendering::{DrawCommand, Scene, SceneBuilder, TextRole};
use annotated_price_chart::time_utils::date_to_millis;
use chrono::NaiveDate;
use insta::assert_json_snapshot;

fn started() -> DashboardCoordinator<EmbeddedStocksRepository> {
    let mut coordinator =
        DashboardCoordinator::new(EmbeddedStocksRepository::new(), DashboardConfig::default()).unwrap();
    coordinator.start().unwrap();
    coordinator
}

fn scene(coordinator: &DashboardCoordinator<EmbeddedStocksRepository>) -> Scene {
    SceneBuilder::new(coordinator.composed().unwrap(), coordinator.viewport(), coordinator.layout(), coordinator.hover())
        .build()
}

/// Canvas position of an annotation anchor before the text offset
fn anchors(coordinator: &DashboardCoordinator<EmbeddedStocksRepository>) -> Vec<(f64, f64)> {
    let viewport = coordinator.viewport();
    default_annotations()
        .unwrap()
        .iter()
        .map(|row| coordinator.layout().to_canvas(viewport.time_to_x(row.timestamp_ms()), viewport.price_to_y(row.y)))
        .collect()
}

#[test]
fn default_page_labels_every_annotation() {
    let coordinator = started();
    let scene = scene(&coordinator);

    let labels = scene.texts(TextRole::Annotation);
    assert_eq!(labels.len(), 4);
    assert!(labels.iter().all(|(_, _, text)| *text == "Analysis"));
    for ((x, y, _), (ax, ay)) in labels.iter().zip(anchors(&coordinator)) {
        assert!((x - ax).abs() < 1e-9);
        assert!((y - (ay - 10.0)).abs() < 1e-9);
    }

    // Five symbols, one line each; nothing hovered yet.
    assert_eq!(scene.polylines(), 5);
    assert!(scene.plot_circles().is_empty());
    assert!(scene.rules().is_empty());
    assert_eq!(scene.texts(TextRole::Title)[0].2, "Evolution of stock prices");
}

#[test]
fn text_change_only_rebuilds_the_overlay() {
    let mut coordinator = started();
    let base = Arc::clone(&coordinator.frame().unwrap().base);

    let plan = coordinator.dispatch(ControlEvent::TextChanged("Test".to_string())).unwrap();
    assert!(plan.annotations_rebuilt);
    assert!(!plan.chart_rebuilt);
    assert!(!plan.data_reloaded);
    assert!(Arc::ptr_eq(&base, &coordinator.frame().unwrap().base));

    let scene = scene(&coordinator);
    let labels = scene.texts(TextRole::Annotation);
    assert_eq!(labels.len(), 4);
    assert!(labels.iter().all(|(_, _, text)| *text == "Test"));
}

#[test]
fn empty_text_draws_empty_labels() {
    let mut coordinator = started();
    coordinator.dispatch(ControlEvent::TextChanged(String::new())).unwrap();
    let scene = scene(&coordinator);
    assert!(scene.texts(TextRole::Annotation).iter().all(|(_, _, text)| text.is_empty()));
}

#[test]
fn horizontal_offset_moves_labels_right() {
    let mut coordinator = started();
    let before = scene(&coordinator);

    let plan = coordinator.dispatch(ControlEvent::HorizontalOffsetChanged(30)).unwrap();
    assert!(plan.needs_redraw());
    let after = scene(&coordinator);

    for ((x0, y0, _), (x1, y1, _)) in before.texts(TextRole::Annotation).iter().zip(after.texts(TextRole::Annotation)) {
        assert!((x1 - (x0 + 30.0)).abs() < 1e-9);
        assert!((y1 - y0).abs() < 1e-9);
    }
}

#[test]
fn labels_pushed_below_the_plot_stay_visible() {
    let mut coordinator = started();
    coordinator.dispatch(ControlEvent::VerticalOffsetChanged(30)).unwrap();
    let scene = scene(&coordinator);

    let labels = scene.texts(TextRole::Annotation);
    assert_eq!(labels.len(), 4);
    assert_eq!(scene.clipped_texts(TextRole::Annotation), 0);
    let plot_bottom = coordinator.layout().margin_top + coordinator.layout().plot_height() as f64;
    for ((_, y, _), (_, ay)) in labels.iter().zip(anchors(&coordinator)) {
        assert!((y - (ay + 30.0)).abs() < 1e-9);
        assert!(*y > plot_bottom);
        // Middle-anchored 15px glyphs still fit on the canvas.
        assert!(y + 7.5 <= scene.height as f64);
    }
    assert!(scene.commands.iter().all(|command| match command {
        DrawCommand::Text { role: TextRole::Annotation, baseline, .. } => *baseline == TextBaseline::Middle,
        _ => true,
    }));

    // The label tooltip is reachable below the plot area.
    let (x, y) = {
        let viewport = coordinator.viewport();
        let row = &default_annotations().unwrap()[0];
        (viewport.time_to_x(row.timestamp_ms()), viewport.price_to_y(row.y) + 30.0)
    };
    assert!(!coordinator.viewport().contains_pixel(x, y));
    let plan = coordinator.dispatch(ControlEvent::PointerMoved { x, y }).unwrap();
    assert!(plan.view_changed);
    assert!(coordinator.hover().is_none());
    assert_eq!(coordinator.tooltip().unwrap().lines(), vec!["event: Pretty good day for GOOG".to_string()]);
}

#[test]
fn out_of_range_offset_is_clamped() {
    let mut coordinator = started();
    coordinator.dispatch(ControlEvent::VerticalOffsetChanged(-500)).unwrap();
    assert_eq!(coordinator.controls().dy(), -30);
    let mark = coordinator.composed().unwrap().layers[3].text_mark().unwrap().clone();
    assert_eq!(mark.dy, -30);

    // Already at the bound: nothing to redo.
    let plan = coordinator.dispatch(ControlEvent::VerticalOffsetChanged(-31)).unwrap();
    assert!(!plan.needs_redraw());
}

#[test]
fn hover_near_goog_march_2008() {
    let mut coordinator = started();
    let date = NaiveDate::from_ymd_opt(2008, 3, 1).unwrap();
    let (x, y) = {
        let viewport = coordinator.viewport();
        (viewport.time_to_x(date_to_millis(date)), viewport.price_to_y(440.47))
    };

    let plan = coordinator.dispatch(ControlEvent::PointerMoved { x: x + 1.0, y: y + 1.0 }).unwrap();
    assert!(plan.view_changed);
    let hover = coordinator.hover().unwrap();
    assert_eq!(hover.date, date);
    assert_eq!(hover.nearest.symbol.value(), "GOOG");

    assert_json_snapshot!(coordinator.tooltip().unwrap().lines(), @r#"
    [
      "Date: Mar 1, 2008",
      "Price (USD): 440.47"
    ]
    "#);

    let scene = scene(&coordinator);
    // One marker per symbol quoted that day, one rule at the selected date.
    assert_eq!(scene.plot_circles().len(), 5);
    let rules = scene.rules();
    assert_eq!(rules.len(), 1);
    let (rule_x, _) = coordinator.layout().to_canvas(x, 0.0);
    assert!((rules[0].0 - rule_x).abs() < 1e-9);
    assert!((rules[0].1.a - 0.3).abs() < 1e-6);
}

#[test]
fn pointer_leaving_clears_the_selection() {
    let mut coordinator = started();
    coordinator.dispatch(ControlEvent::PointerMoved { x: 10.0, y: 10.0 }).unwrap();
    assert!(coordinator.hover().is_some());

    let plan = coordinator.dispatch(ControlEvent::PointerLeft).unwrap();
    assert!(plan.view_changed);
    assert!(coordinator.hover().is_none());
    assert!(coordinator.tooltip().is_none());
    assert!(scene(&coordinator).rules().is_empty());
}

#[test]
fn annotation_label_tooltip_shows_the_event() {
    let mut coordinator = started();
    let (x, y) = {
        let viewport = coordinator.viewport();
        let row = &default_annotations().unwrap()[0];
        (viewport.time_to_x(row.timestamp_ms()), viewport.price_to_y(row.y) - 10.0)
    };
    coordinator.dispatch(ControlEvent::PointerMoved { x, y }).unwrap();
    assert_eq!(coordinator.tooltip().unwrap().lines(), vec!["event: Pretty good day for GOOG".to_string()]);
}

#[test]
fn zoom_pan_and_reset() {
    let mut coordinator = started();
    let fitted = coordinator.viewport().clone();

    coordinator.dispatch(ControlEvent::Zoom { factor: 2.0, center_x: 0.5, center_y: 0.5 }).unwrap();
    assert!(coordinator.viewport().time_range() < fitted.time_range());
    coordinator.dispatch(ControlEvent::Pan { dx_px: 40.0, dy_px: 0.0 }).unwrap();
    assert_ne!(coordinator.viewport().start_time, fitted.start_time);

    coordinator.dispatch(ControlEvent::ResetView).unwrap();
    assert_eq!(*coordinator.viewport(), fitted);
}

#[test]
fn resize_tracks_the_container() {
    let mut coordinator = started();
    let plan = coordinator.dispatch(ControlEvent::Resized { width: 1200, height: 500 }).unwrap();
    assert!(plan.view_changed);
    assert_eq!(coordinator.layout().width, 1200);
    assert_eq!(coordinator.viewport().width, coordinator.layout().plot_width());
    assert_eq!(scene(&coordinator).width, 1200);
}

#[test]
fn events_before_start_are_rejected() {
    let mut coordinator =
        DashboardCoordinator::new(EmbeddedStocksRepository::new(), DashboardConfig::default()).unwrap();
    assert!(matches!(coordinator.dispatch(ControlEvent::ResetView), Err(AppError::Rendering(_))));
}
