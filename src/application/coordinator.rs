use std::sync::Arc;

use crate::application::use_cases::{GetChartUseCase, GetDataUseCase, RenderPageUseCase};
use crate::config::DashboardConfig;
use crate::domain::{
    chart::{ChartBuilder, ChartSpec, HoverResolver, HoverSelection, Layer, PlotLayout, Tooltip, Viewport},
    controls::ControlState,
    errors::{AppError, AppResult},
    events::{ControlEvent, DomainEvent},
    logging::{LogComponent, get_logger, get_time_provider},
    market_data::{PricePoint, PriceRepository, PriceTable},
};

/// Canvas width used until the first resize event
pub const INITIAL_WIDTH: u32 = 800;

/// Charts currently on screen
#[derive(Debug, Clone)]
pub struct DashboardFrame {
    /// Cached base chart (three layers)
    pub base: Arc<ChartSpec>,
    pub annotations: Layer,
    /// `base + annotations`, interactive
    pub composed: ChartSpec,
}

/// What a dispatched event recomputed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderPlan {
    pub data_reloaded: bool,
    pub chart_rebuilt: bool,
    pub annotations_rebuilt: bool,
    pub view_changed: bool,
}

impl RenderPlan {
    pub fn needs_redraw(&self) -> bool {
        self.data_reloaded || self.chart_rebuilt || self.annotations_rebuilt || self.view_changed
    }
}

/// Event-driven dashboard state: data -> base chart -> annotation overlay -> view.
pub struct DashboardCoordinator<R: PriceRepository> {
    config: DashboardConfig,
    get_data: GetDataUseCase<R>,
    get_chart: GetChartUseCase,
    render_page: RenderPageUseCase,
    controls: ControlState,
    layout: PlotLayout,
    viewport: Viewport,
    hover: Option<HoverSelection>,
    tooltip: Option<Tooltip>,
    frame: Option<DashboardFrame>,
    clock: Box<dyn Fn() -> u64>,
}

impl<R: PriceRepository> DashboardCoordinator<R> {
    pub fn new(repository: R, config: DashboardConfig) -> AppResult<Self> {
        config.validate()?;
        let builder = ChartBuilder::new(&config.chart_title, config.chart_height);
        let layout = PlotLayout::new(INITIAL_WIDTH, config.chart_height);

        get_logger().info(
            LogComponent::Application("DashboardCoordinator"),
            &format!("Creating dashboard coordinator (source: {})", repository.source_name()),
        );

        Ok(Self {
            get_data: GetDataUseCase::new(repository, config.cutoff_date()?),
            get_chart: GetChartUseCase::new(builder.clone(), config.chart_ttl()),
            render_page: RenderPageUseCase::new(builder),
            controls: config.default_controls(),
            viewport: Viewport::new(layout.plot_width(), layout.plot_height()),
            layout,
            hover: None,
            tooltip: None,
            frame: None,
            clock: Box::new(|| get_time_provider().current_timestamp()),
            config,
        })
    }

    /// Replace the millisecond clock driving cache expiry
    pub fn with_clock(mut self, clock: impl Fn() -> u64 + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// First full pass: load data, build both charts, fit the view.
    pub fn start(&mut self) -> AppResult<RenderPlan> {
        let mut plan = self.refresh_base()?;
        plan.annotations_rebuilt = self.rebuild_annotations()?;
        self.reset_view();
        plan.view_changed = true;

        if let Some(frame) = &self.frame {
            get_logger().info(
                LogComponent::Application("DashboardCoordinator"),
                &format!("✅ Dashboard ready: {} layers, {} price rows", frame.composed.layer_count(), self.data_len()),
            );
        }
        Ok(plan)
    }

    pub fn dispatch(&mut self, event: ControlEvent) -> AppResult<RenderPlan> {
        if self.frame.is_none() {
            return Err(AppError::Rendering(format!("{} dispatched before start", event.event_type())));
        }
        if event.is_widget_event() {
            get_logger().debug(
                LogComponent::Application("DashboardCoordinator"),
                &format!("{}: {:?}", event.event_type(), event),
            );
        }

        let mut plan = RenderPlan::default();
        match event {
            ControlEvent::TextChanged(text) => {
                if self.controls.set_text(&text) {
                    plan = self.rerender_overlay()?;
                }
            }
            ControlEvent::HorizontalOffsetChanged(dx) => {
                if self.controls.set_dx(dx) {
                    plan = self.rerender_overlay()?;
                }
            }
            ControlEvent::VerticalOffsetChanged(dy) => {
                if self.controls.set_dy(dy) {
                    plan = self.rerender_overlay()?;
                }
            }
            ControlEvent::PointerMoved { x, y } => plan.view_changed = self.update_hover(x, y),
            ControlEvent::PointerLeft => plan.view_changed = self.clear_hover(),
            ControlEvent::Zoom { factor, center_x, center_y } => {
                self.viewport.zoom(factor, center_x);
                self.viewport.zoom_price(factor, center_y);
                plan.view_changed = true;
            }
            ControlEvent::Pan { dx_px, dy_px } => {
                self.viewport.pan_pixels(dx_px, dy_px);
                plan.view_changed = true;
            }
            ControlEvent::Resized { width, height } => {
                let resized = PlotLayout::new(width, height);
                plan.view_changed = resized != self.layout;
                self.layout = resized;
                self.viewport.resize(resized.plot_width(), resized.plot_height());
            }
            ControlEvent::ResetView => {
                self.reset_view();
                plan.view_changed = true;
            }
        }
        Ok(plan)
    }

    /// Widget changes: revalidate the cached inputs, then rebuild the overlay only.
    fn rerender_overlay(&mut self) -> AppResult<RenderPlan> {
        let mut plan = self.refresh_base()?;
        plan.annotations_rebuilt = self.rebuild_annotations()?;
        Ok(plan)
    }

    /// Pull data and base chart through their caches; swap the base when it changed.
    fn refresh_base(&mut self) -> AppResult<RenderPlan> {
        let now = (self.clock)();
        let (data, data_reloaded) = self.get_data.execute(now)?;
        let (base, chart_rebuilt) = self.get_chart.execute(data, now);

        match self.frame.as_mut() {
            Some(frame) if !Arc::ptr_eq(&frame.base, &base) => {
                frame.composed = self.render_page.compose(&base, frame.annotations.clone());
                frame.base = base;
            }
            Some(_) => {}
            None => {
                let annotations = self.render_page.annotation_layer(&self.controls)?;
                let composed = self.render_page.compose(&base, annotations.clone());
                self.frame = Some(DashboardFrame { base, annotations, composed });
            }
        }

        Ok(RenderPlan { data_reloaded, chart_rebuilt, ..Default::default() })
    }

    fn rebuild_annotations(&mut self) -> AppResult<bool> {
        let annotations = self.render_page.annotation_layer(&self.controls)?;
        let Some(frame) = self.frame.as_mut() else {
            return Ok(false);
        };
        frame.composed = self.render_page.compose(&frame.base, annotations.clone());
        frame.annotations = annotations;
        // The tooltip may point at a label that moved.
        self.tooltip = None;
        Ok(true)
    }

    fn update_hover(&mut self, x: f64, y: f64) -> bool {
        let Some(frame) = &self.frame else {
            return false;
        };
        let resolver = HoverResolver::new(&frame.composed, &self.viewport);
        // Price selection only inside the plot; labels may sit in the margins.
        let hover = if self.viewport.contains_pixel(x, y) { resolver.resolve(x, y) } else { None };
        let tooltip = resolver.tooltip(x, y, hover.as_ref());
        let changed = hover != self.hover || tooltip != self.tooltip;
        self.hover = hover;
        self.tooltip = tooltip;
        changed
    }

    fn clear_hover(&mut self) -> bool {
        let changed = self.hover.is_some() || self.tooltip.is_some();
        self.hover = None;
        self.tooltip = None;
        changed
    }

    fn reset_view(&mut self) {
        let (width, height) = (self.layout.plot_width(), self.layout.plot_height());
        self.viewport = match self.frame.as_ref().and_then(|frame| frame.base.layers.first()) {
            Some(layer) => Viewport::fit(PriceTable::new(layer.data.prices().unwrap_or_default()), width, height),
            None => Viewport::new(width, height),
        };
    }

    fn data_len(&self) -> usize {
        self.data().map(|rows| rows.len()).unwrap_or(0)
    }

    /// Rows behind the line layer
    pub fn data(&self) -> Option<&[PricePoint]> {
        self.frame.as_ref()?.base.layers.first()?.data.prices()
    }

    pub fn frame(&self) -> Option<&DashboardFrame> {
        self.frame.as_ref()
    }

    pub fn composed(&self) -> Option<&ChartSpec> {
        self.frame.as_ref().map(|frame| &frame.composed)
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn controls(&self) -> &ControlState {
        &self.controls
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn layout(&self) -> &PlotLayout {
        &self.layout
    }

    pub fn hover(&self) -> Option<&HoverSelection> {
        self.hover.as_ref()
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn cached_charts(&self) -> usize {
        self.get_chart.cached_charts()
    }
}
