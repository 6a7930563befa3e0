use leptos::html::Canvas;
use leptos::*;
use std::cell::RefCell;

use crate::{
    application::coordinator::DashboardCoordinator,
    config::DashboardConfig,
    domain::{
        errors::{AppError, AppResult},
        events::ControlEvent,
        logging::{LogComponent, get_logger},
    },
    global_state::{TooltipData, globals, request_redraw},
    infrastructure::{
        EmbeddedStocksRepository,
        rendering::{CanvasRenderer, SceneBuilder},
    },
};

/// Wheel notch zoom factor
const ZOOM_STEP: f64 = 1.1;

thread_local! {
    static COORDINATOR: RefCell<Option<DashboardCoordinator<EmbeddedStocksRepository>>> = const { RefCell::new(None) };
}

fn with_coordinator<T>(f: impl FnOnce(&mut DashboardCoordinator<EmbeddedStocksRepository>) -> T) -> Option<T> {
    COORDINATOR.with(|cell| cell.borrow_mut().as_mut().map(f))
}

fn start_dashboard(config: DashboardConfig) -> AppResult<()> {
    let mut coordinator = DashboardCoordinator::new(EmbeddedStocksRepository::new(), config)?;
    coordinator.start()?;

    let controls = coordinator.controls().clone();
    globals().annotation_text.set(controls.text().to_string());
    globals().offset_dx.set(controls.dx());
    globals().offset_dy.set(controls.dy());

    COORDINATOR.with(|cell| *cell.borrow_mut() = Some(coordinator));
    Ok(())
}

fn report(err: &AppError) {
    get_logger().error(LogComponent::Presentation("App"), &format!("❌ {}", err));
    globals().status.set(format!("❌ {}", err));
}

/// Route an event through the coordinator and schedule a repaint if needed
fn dispatch(event: ControlEvent) {
    match with_coordinator(|coordinator| coordinator.dispatch(event)) {
        Some(Ok(plan)) if plan.needs_redraw() => request_redraw(),
        Some(Err(err)) => report(&err),
        _ => {}
    }
}

/// Mirror the coordinator's tooltip into the overlay signal
fn sync_tooltip(canvas_x: f64, canvas_y: f64) {
    let lines = with_coordinator(|coordinator| coordinator.tooltip().map(|tooltip| tooltip.lines())).flatten();
    globals().tooltip.set(lines.map(|lines| TooltipData { lines, x: canvas_x, y: canvas_y }));
}

fn paint(canvas: &web_sys::HtmlCanvasElement) -> AppResult<()> {
    with_coordinator(|coordinator| {
        let chart = coordinator
            .composed()
            .ok_or_else(|| AppError::Rendering("no chart composed yet".to_string()))?;
        let scene = SceneBuilder::new(chart, coordinator.viewport(), coordinator.layout(), coordinator.hover()).build();
        CanvasRenderer::new(canvas.clone())?.render(&scene)
    })
    .unwrap_or(Ok(()))
}

/// Root component: page chrome, widget row and the chart
#[component]
pub fn App() -> impl IntoView {
    let config = DashboardConfig::default();

    if let Some(document) = web_sys::window().and_then(|window| window.document()) {
        document.set_title(&config.page_title);
    }
    match start_dashboard(config.clone()) {
        Ok(()) => globals().status.set("Drag to pan, scroll to zoom, double-click to reset".to_string()),
        Err(err) => report(&err),
    }

    view! {
        <style>
            {r#"
            .dashboard {
                font-family: 'Source Sans Pro', -apple-system, BlinkMacSystemFont, sans-serif;
                max-width: 760px;
                margin: 0 auto;
                padding: 24px 16px 48px;
                color: #31333f;
            }

            .controls {
                display: grid;
                grid-template-columns: repeat(3, 1fr);
                gap: 16px;
                margin: 16px 0 24px;
            }

            .control label {
                display: block;
                font-size: 14px;
                margin-bottom: 6px;
            }

            .control input[type=text] {
                width: 100%;
                box-sizing: border-box;
                padding: 6px 8px;
            }

            .control input[type=range] {
                width: 100%;
            }

            .chart-wrapper {
                position: relative;
                width: 100%;
            }

            .chart-wrapper canvas {
                display: block;
                width: 100%;
                cursor: crosshair;
            }

            .tooltip {
                position: absolute;
                background: rgba(255, 255, 255, 0.95);
                color: #222;
                padding: 6px 10px;
                border: 1px solid #ddd;
                border-radius: 4px;
                font-size: 12px;
                white-space: pre-line;
                pointer-events: none;
                transform: translate(12px, -100%);
                box-shadow: 0 2px 6px rgba(0, 0, 0, 0.15);
            }

            .status {
                color: #808495;
                font-size: 12px;
                margin-top: 6px;
            }
            "#}
        </style>
        <div class="dashboard">
            <h1>{config.heading.clone()}</h1>
            <p>{config.intro.clone()}</p>
            <Controls text_label=config.text_label.clone() min=config.offset_bounds.min max=config.offset_bounds.max />
            <ChartPanel height=config.chart_height />
            <h2>"Code"</h2>
            <p>
                {config.footer_prefix.clone()}
                <a href=config.footer_url.clone() target="_blank">{config.footer_text.clone()}</a>
            </p>
        </div>
    }
}

/// Text input and the two offset sliders, one per column
#[component]
fn Controls(text_label: String, min: i32, max: i32) -> impl IntoView {
    let g = globals();

    let on_text = move |ev: ev::Event| {
        let text = event_target_value(&ev);
        g.annotation_text.set(text.clone());
        dispatch(ControlEvent::TextChanged(text));
    };
    let on_dx = move |ev: ev::Event| {
        if let Ok(dx) = event_target_value(&ev).parse::<i32>() {
            dispatch(ControlEvent::HorizontalOffsetChanged(dx));
            if let Some(stored) = with_coordinator(|coordinator| coordinator.controls().dx()) {
                g.offset_dx.set(stored);
            }
        }
    };
    let on_dy = move |ev: ev::Event| {
        if let Ok(dy) = event_target_value(&ev).parse::<i32>() {
            dispatch(ControlEvent::VerticalOffsetChanged(dy));
            if let Some(stored) = with_coordinator(|coordinator| coordinator.controls().dy()) {
                g.offset_dy.set(stored);
            }
        }
    };

    view! {
        <div class="controls">
            <div class="control">
                <label>{text_label}</label>
                <input type="text" prop:value=move || g.annotation_text.get() on:input=on_text />
            </div>
            <div class="control">
                <label>{move || format!("Horizontal offset: {}", g.offset_dx.get())}</label>
                <input type="range" min=min max=max step="1" prop:value=move || g.offset_dx.get().to_string() on:input=on_dx />
            </div>
            <div class="control">
                <label>{move || format!("Vertical offset: {}", g.offset_dy.get())}</label>
                <input type="range" min=min max=max step="1" prop:value=move || g.offset_dy.get().to_string() on:input=on_dy />
            </div>
        </div>
    }
}

/// Canvas chart at full container width with pointer interaction
#[component]
fn ChartPanel(height: u32) -> impl IntoView {
    let g = globals();
    let canvas_ref = create_node_ref::<Canvas>();

    let fit_to_container = move || {
        if let Some(canvas) = canvas_ref.get_untracked() {
            let width = canvas.parent_element().map(|parent| parent.client_width()).unwrap_or(0);
            if width > 0 {
                dispatch(ControlEvent::Resized { width: width as u32, height });
            }
        }
    };

    // Mount: size to the container once the canvas exists.
    create_effect(move |_| {
        if canvas_ref.get().is_some() {
            fit_to_container();
            request_redraw();
        }
    });

    // Repaint on every frame bump.
    create_effect(move |_| {
        let _version = g.frame_version.get();
        if let Some(canvas) = canvas_ref.get_untracked() {
            if let Err(err) = paint(&canvas) {
                report(&err);
            }
        }
    });

    let resize_handle = window_event_listener(ev::resize, move |_| fit_to_container());
    on_cleanup(move || resize_handle.remove());

    let plot_point = move |ev: &web_sys::MouseEvent| {
        let (x, y) = (ev.offset_x() as f64, ev.offset_y() as f64);
        let plot = with_coordinator(|coordinator| coordinator.layout().to_plot(x, y)).unwrap_or((x, y));
        ((x, y), plot)
    };

    let on_mouse_move = move |ev: ev::MouseEvent| {
        let ((x, y), (px, py)) = plot_point(&ev);
        if g.is_dragging.get_untracked() {
            let dx = x - g.last_mouse_x.get_untracked();
            let dy = y - g.last_mouse_y.get_untracked();
            dispatch(ControlEvent::Pan { dx_px: dx, dy_px: dy });
        } else {
            dispatch(ControlEvent::PointerMoved { x: px, y: py });
            sync_tooltip(x, y);
        }
        g.last_mouse_x.set(x);
        g.last_mouse_y.set(y);
    };

    let on_mouse_down = move |ev: ev::MouseEvent| {
        g.is_dragging.set(true);
        g.last_mouse_x.set(ev.offset_x() as f64);
        g.last_mouse_y.set(ev.offset_y() as f64);
        g.tooltip.set(None);
    };

    let on_mouse_up = move |_: ev::MouseEvent| g.is_dragging.set(false);

    let on_mouse_leave = move |_: ev::MouseEvent| {
        g.is_dragging.set(false);
        dispatch(ControlEvent::PointerLeft);
        g.tooltip.set(None);
    };

    let on_wheel = move |ev: ev::WheelEvent| {
        ev.prevent_default();
        let (_, (px, py)) = plot_point(&ev);
        let factor = if ev.delta_y() < 0.0 { ZOOM_STEP } else { 1.0 / ZOOM_STEP };
        let Some((center_x, center_y)) = with_coordinator(|coordinator| {
            let viewport = coordinator.viewport();
            (px / viewport.width.max(1) as f64, py / viewport.height.max(1) as f64)
        }) else {
            return;
        };
        dispatch(ControlEvent::Zoom { factor, center_x, center_y });
    };

    let on_double_click = move |_: ev::MouseEvent| dispatch(ControlEvent::ResetView);

    view! {
        <div class="chart-wrapper">
            <canvas
                node_ref=canvas_ref
                height=height
                on:mousemove=on_mouse_move
                on:mousedown=on_mouse_down
                on:mouseup=on_mouse_up
                on:mouseleave=on_mouse_leave
                on:wheel=on_wheel
                on:dblclick=on_double_click
            />
            <ChartTooltip />
        </div>
        <div class="status">{move || g.status.get()}</div>
    }
}

#[component]
fn ChartTooltip() -> impl IntoView {
    let tooltip = globals().tooltip;

    view! {
        <div
            class="tooltip"
            style:display=move || if tooltip.with(Option::is_some) { "block" } else { "none" }
            style:left=move || tooltip.with(|t| t.as_ref().map(|t| format!("{}px", t.x)).unwrap_or_default())
            style:top=move || tooltip.with(|t| t.as_ref().map(|t| format!("{}px", t.y)).unwrap_or_default())
        >
            {move || tooltip.with(|t| t.as_ref().map(|t| t.lines.join("\n")).unwrap_or_default())}
        </div>
    }
}
