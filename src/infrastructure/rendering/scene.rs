//! Backend-independent draw list for a composed chart.
//!
//! All coordinates are canvas pixels. The builder is pure so it can be
//! exercised without a browser.

use std::collections::BTreeSet;
use std::f64::consts::PI;

use chrono::NaiveDate;

use crate::domain::chart::{
    category_color, selection_matches, symbol_order, ChartSpec, Color, HoverSelection, Layer, LayerKind, Mark,
    PlotLayout, TextAlign, TextBaseline, Viewport,
};
use crate::domain::market_data::{PriceTable, Symbol};
use crate::time_utils::{date_to_millis, format_axis_label, month_ticks};

pub const TITLE_FONT_SIZE: u32 = 16;
pub const AXIS_FONT_SIZE: u32 = 11;
pub const LEGEND_ROW_HEIGHT: f64 = 18.0;
pub const LINE_WIDTH: f64 = 2.0;
/// Horizontal room per x-axis label
pub const X_TICK_SPACING: f64 = 90.0;
pub const Y_TICK_TARGET: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    Title,
    AxisLabel,
    AxisTitle,
    Legend,
    Annotation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Background { color: Color },
    /// Restrict drawing to a rectangle until the matching `ClipEnd`
    ClipBegin { x: f64, y: f64, width: f64, height: f64 },
    ClipEnd,
    Polyline { points: Vec<(f64, f64)>, color: Color, width: f64 },
    Circle { x: f64, y: f64, radius: f64, color: Color },
    /// Selection rule spanning the plot height
    Rule { x: f64, y_top: f64, y_bottom: f64, color: Color },
    /// Grid and axis lines
    Segment { from: (f64, f64), to: (f64, f64), color: Color, width: f64 },
    Text {
        x: f64,
        y: f64,
        text: String,
        size: u32,
        color: Color,
        align: TextAlign,
        baseline: TextBaseline,
        role: TextRole,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, commands: Vec::new() }
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// `(x, y, text)` of every text command with `role`
    pub fn texts(&self, role: TextRole) -> Vec<(f64, f64, &str)> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { x, y, text, role: r, .. } if *r == role => Some((*x, *y, text.as_str())),
                _ => None,
            })
            .collect()
    }

    pub fn circles(&self) -> Vec<(f64, f64)> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Circle { x, y, .. } => Some((*x, *y)),
                _ => None,
            })
            .collect()
    }

    /// Circles drawn inside the plot clip (hover markers, not legend swatches)
    pub fn plot_circles(&self) -> Vec<(f64, f64)> {
        let mut clipped = false;
        let mut circles = Vec::new();
        for command in &self.commands {
            match command {
                DrawCommand::ClipBegin { .. } => clipped = true,
                DrawCommand::ClipEnd => clipped = false,
                DrawCommand::Circle { x, y, .. } if clipped => circles.push((*x, *y)),
                _ => {}
            }
        }
        circles
    }

    /// Text commands of `role` drawn inside the plot clip
    pub fn clipped_texts(&self, role: TextRole) -> usize {
        let mut clipped = false;
        let mut count = 0;
        for command in &self.commands {
            match command {
                DrawCommand::ClipBegin { .. } => clipped = true,
                DrawCommand::ClipEnd => clipped = false,
                DrawCommand::Text { role: r, .. } if clipped && *r == role => count += 1,
                _ => {}
            }
        }
        count
    }

    pub fn rules(&self) -> Vec<(f64, Color)> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Rule { x, color, .. } => Some((*x, *color)),
                _ => None,
            })
            .collect()
    }

    pub fn polylines(&self) -> usize {
        self.commands.iter().filter(|command| matches!(command, DrawCommand::Polyline { .. })).count()
    }
}

/// Round tick values covering `[min, max]`
pub fn nice_ticks(min: f64, max: f64, target: usize) -> (f64, Vec<f64>) {
    if !(min.is_finite() && max.is_finite()) || max <= min || target == 0 {
        return (0.0, Vec::new());
    }
    let raw = (max - min) / target as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let step = magnitude
        * if normalized < 1.5 {
            1.0
        } else if normalized < 3.0 {
            2.0
        } else if normalized < 7.0 {
            5.0
        } else {
            10.0
        };

    let mut ticks = Vec::new();
    let mut tick = (min / step).ceil() * step;
    while tick <= max + step * 1e-9 && ticks.len() <= target * 4 {
        ticks.push(tick);
        tick += step;
    }
    (step, ticks)
}

fn format_price_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 { 0 } else { (-step.log10().floor()) as usize };
    format!("{:.*}", decimals, value)
}

/// Lowers a composed chart into a [`Scene`]
pub struct SceneBuilder<'a> {
    chart: &'a ChartSpec,
    viewport: &'a Viewport,
    layout: &'a PlotLayout,
    hover: Option<&'a HoverSelection>,
    symbols: Vec<Symbol>,
}

impl<'a> SceneBuilder<'a> {
    pub fn new(
        chart: &'a ChartSpec,
        viewport: &'a Viewport,
        layout: &'a PlotLayout,
        hover: Option<&'a HoverSelection>,
    ) -> Self {
        Self { chart, viewport, layout, hover, symbols: symbol_order(chart) }
    }

    pub fn build(&self) -> Scene {
        let mut scene = Scene::new(self.layout.width, self.layout.height);
        scene.push(DrawCommand::Background { color: Color::WHITE });

        self.push_title(&mut scene);
        self.push_axes(&mut scene);

        let (x, y) = self.layout.to_canvas(0.0, 0.0);
        scene.push(DrawCommand::ClipBegin {
            x,
            y,
            width: self.layout.plot_width() as f64,
            height: self.layout.plot_height() as f64,
        });
        for layer in &self.chart.layers {
            match layer.kind {
                LayerKind::Lines => self.push_lines(&mut scene, layer),
                LayerKind::HoverPoints => self.push_points(&mut scene, layer),
                LayerKind::TooltipRule => self.push_rules(&mut scene, layer),
                LayerKind::Annotations => {}
            }
        }
        scene.push(DrawCommand::ClipEnd);

        // Text marks are not clipped: offset labels may sit in the margins.
        for layer in self.chart.layers.iter().filter(|layer| layer.kind == LayerKind::Annotations) {
            self.push_annotations(&mut scene, layer);
        }

        self.push_legend(&mut scene);
        scene
    }

    fn canvas_point(&self, timestamp: f64, price: f64) -> (f64, f64) {
        self.layout.to_canvas(self.viewport.time_to_x(timestamp), self.viewport.price_to_y(price))
    }

    fn symbol_color(&self, symbol: &Symbol) -> Color {
        let index = self.symbols.iter().position(|s| s == symbol).unwrap_or(0);
        category_color(index)
    }

    fn push_title(&self, scene: &mut Scene) {
        if let Some(title) = &self.chart.title {
            scene.push(DrawCommand::Text {
                x: self.layout.width as f64 / 2.0,
                y: self.layout.margin_top / 2.0,
                text: title.clone(),
                size: TITLE_FONT_SIZE,
                color: Color::BLACK,
                align: TextAlign::Center,
                baseline: TextBaseline::Alphabetic,
                role: TextRole::Title,
            });
        }
    }

    fn push_axes(&self, scene: &mut Scene) {
        let left = self.layout.margin_left;
        let top = self.layout.margin_top;
        let right = left + self.layout.plot_width() as f64;
        let bottom = top + self.layout.plot_height() as f64;

        let (step, ticks) = nice_ticks(self.viewport.min_price, self.viewport.max_price, Y_TICK_TARGET);
        for tick in ticks {
            let (_, y) = self.layout.to_canvas(0.0, self.viewport.price_to_y(tick));
            scene.push(DrawCommand::Segment { from: (left, y), to: (right, y), color: Color::GRID, width: 1.0 });
            scene.push(self.axis_text(left - 6.0, y + 4.0, format_price_tick(tick, step), TextAlign::Right));
        }

        let max_ticks = ((self.layout.plot_width() as f64 / X_TICK_SPACING).floor() as usize).max(2);
        let (months, dates) = month_ticks(self.viewport.start_time, self.viewport.end_time, max_ticks);
        for date in dates {
            let (x, _) = self.layout.to_canvas(self.viewport.time_to_x(date_to_millis(date)), 0.0);
            scene.push(DrawCommand::Segment { from: (x, top), to: (x, bottom), color: Color::GRID, width: 1.0 });
            scene.push(self.axis_text(x, bottom + 16.0, format_axis_label(date, months), TextAlign::Center));
        }

        scene.push(DrawCommand::Segment { from: (left, bottom), to: (right, bottom), color: Color::AXIS_TEXT, width: 1.0 });
        scene.push(DrawCommand::Segment { from: (left, top), to: (left, bottom), color: Color::AXIS_TEXT, width: 1.0 });

        if let Some(lines) = self.chart.layer(LayerKind::Lines) {
            if let Some(x) = &lines.encoding.x {
                scene.push(self.axis_title((left + right) / 2.0, bottom + 34.0, x.caption(), TextAlign::Center));
            }
            if let Some(y) = &lines.encoding.y {
                scene.push(self.axis_title(left, top - 8.0, y.caption(), TextAlign::Right));
            }
        }
    }

    fn axis_text(&self, x: f64, y: f64, text: String, align: TextAlign) -> DrawCommand {
        DrawCommand::Text {
            x,
            y,
            text,
            size: AXIS_FONT_SIZE,
            color: Color::AXIS_TEXT,
            align,
            baseline: TextBaseline::Alphabetic,
            role: TextRole::AxisLabel,
        }
    }

    fn axis_title(&self, x: f64, y: f64, text: &str, align: TextAlign) -> DrawCommand {
        DrawCommand::Text {
            x,
            y,
            text: text.to_string(),
            size: AXIS_FONT_SIZE + 1,
            color: Color::BLACK,
            align,
            baseline: TextBaseline::Alphabetic,
            role: TextRole::AxisTitle,
        }
    }

    fn push_lines(&self, scene: &mut Scene, layer: &Layer) {
        let Some(rows) = layer.data.prices() else {
            return;
        };
        let table = PriceTable::new(rows);
        for symbol in table.symbols() {
            let points: Vec<(f64, f64)> = table
                .series(&symbol)
                .into_iter()
                .map(|row| self.canvas_point(row.timestamp_ms(), row.price.value()))
                .collect();
            if points.len() > 1 {
                scene.push(DrawCommand::Polyline { points, color: self.symbol_color(&symbol), width: LINE_WIDTH });
            }
        }
    }

    fn selected(&self, layer_filter: Option<&str>, date: NaiveDate) -> bool {
        let Some(name) = layer_filter else {
            return true;
        };
        match self.chart.selection(name) {
            Some(selection) => selection_matches(selection, self.hover, date),
            None => false,
        }
    }

    fn push_points(&self, scene: &mut Scene, layer: &Layer) {
        let (Some(rows), Mark::Circle { size }) = (layer.data.prices(), &layer.mark) else {
            return;
        };
        let radius = (size / PI).sqrt();
        for row in rows.iter().filter(|row| self.selected(layer.filter.as_deref(), row.date)) {
            let (x, y) = self.canvas_point(row.timestamp_ms(), row.price.value());
            scene.push(DrawCommand::Circle { x, y, radius, color: self.symbol_color(&row.symbol) });
        }
    }

    fn push_rules(&self, scene: &mut Scene, layer: &Layer) {
        let Some(rows) = layer.data.prices() else {
            return;
        };
        let Some(opacity) = &layer.encoding.opacity else {
            return;
        };
        let selection = self.chart.selection(&opacity.selection);
        // One rule per distinct date; rows on the same date share x.
        let dates: BTreeSet<NaiveDate> = rows.iter().map(|row| row.date).collect();
        let top = self.layout.margin_top;
        let bottom = top + self.layout.plot_height() as f64;
        for date in dates {
            let selected = selection.is_some_and(|s| selection_matches(s, self.hover, date));
            let alpha = opacity.resolve(selected);
            if alpha <= 0.0 {
                continue;
            }
            let (x, _) = self.layout.to_canvas(self.viewport.time_to_x(date_to_millis(date)), 0.0);
            scene.push(DrawCommand::Rule { x, y_top: top, y_bottom: bottom, color: Color::BLACK.with_alpha(alpha as f32) });
        }
    }

    fn push_annotations(&self, scene: &mut Scene, layer: &Layer) {
        let (Some(rows), Some(mark)) = (layer.data.annotations(), layer.text_mark()) else {
            return;
        };
        for row in rows {
            let (x, y) = self.canvas_point(row.timestamp_ms(), row.y);
            scene.push(DrawCommand::Text {
                x: x + mark.dx as f64,
                y: y + mark.dy as f64,
                text: mark.text.clone(),
                size: mark.size,
                color: Color::BLACK,
                align: mark.align,
                baseline: mark.baseline,
                role: TextRole::Annotation,
            });
        }
    }

    fn push_legend(&self, scene: &mut Scene) {
        let Some(title) = self
            .chart
            .layer(LayerKind::Lines)
            .and_then(|layer| layer.encoding.color.as_ref())
            .map(|color| color.caption().to_string())
        else {
            return;
        };
        let x = self.layout.width as f64 - self.layout.margin_right + 12.0;
        let mut y = self.layout.margin_top + 4.0;
        scene.push(DrawCommand::Text {
            x,
            y,
            text: title,
            size: AXIS_FONT_SIZE,
            color: Color::BLACK,
            align: TextAlign::Left,
            baseline: TextBaseline::Alphabetic,
            role: TextRole::Legend,
        });
        for symbol in &self.symbols {
            y += LEGEND_ROW_HEIGHT;
            scene.push(DrawCommand::Circle { x: x + 4.0, y: y - 4.0, radius: 4.0, color: self.symbol_color(symbol) });
            scene.push(DrawCommand::Text {
                x: x + 14.0,
                y,
                text: symbol.to_string(),
                size: AXIS_FONT_SIZE,
                color: Color::AXIS_TEXT,
                align: TextAlign::Left,
                baseline: TextBaseline::Alphabetic,
                role: TextRole::Legend,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_ticks_cover_range() {
        let (step, ticks) = nice_ticks(0.0, 735.0, 6);
        assert_eq!(step, 100.0);
        assert_eq!(ticks.first(), Some(&0.0));
        assert_eq!(ticks.last(), Some(&700.0));
        assert!(nice_ticks(5.0, 5.0, 6).1.is_empty());
    }

    #[test]
    fn price_labels_follow_step() {
        assert_eq!(format_price_tick(200.0, 100.0), "200");
        assert_eq!(format_price_tick(0.25, 0.05), "0.25");
    }
}
