use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{
    vec2, Align2, Color32, FontId, Painter, Pos2, Rect, RichText, Sense, Shape, Stroke, Ui, Vec2,
};
use egui_plot::{uniform_grid_spacer, Bar, BarChart, Line, Plot, PlotPoints, Points};

use super::panels::metric_card;
use crate::color::{text_color_on, ColorMap, ColorScale};
use crate::dashboard::{DashboardSnapshot, ViewCharts};
use crate::data::aggregate::{Histogram, Pivot, Series, StockCounts};
use crate::format::{
    format_compact_currency, format_count, format_currency, format_percentage, format_units,
};

const CHART_HEIGHT: f32 = 320.0;
const DONUT_HOLE: f32 = 0.3;
const HISTOGRAM_FILL: Color32 = Color32::from_rgb(52, 152, 219);
const TREND_LINE: Color32 = Color32::from_rgb(231, 76, 60);
const NO_DATA_FILL: Color32 = Color32::from_gray(200);

// ---------------------------------------------------------------------------
// Views (central panel)
// ---------------------------------------------------------------------------

/// Render the charts of the snapshot's view.
pub fn view_charts(ui: &mut Ui, snapshot: &DashboardSnapshot) {
    match &snapshot.charts {
        ViewCharts::SalesOverview {
            revenue_by_region,
            revenue_by_category,
            top_stores,
        } => {
            ui.heading("Sales Performance");
            ui.columns(2, |cols: &mut [Ui]| {
                bar_chart(
                    &mut cols[0],
                    "revenue_by_region",
                    "Revenue by Region",
                    revenue_by_region,
                    ColorScale::Blues,
                    Orientation::Vertical,
                    format_currency,
                );
                bar_chart(
                    &mut cols[1],
                    "revenue_by_category",
                    "Revenue by Category",
                    revenue_by_category,
                    ColorScale::Greens,
                    Orientation::Vertical,
                    format_currency,
                );
            });
            ui.separator();
            ui.heading("Top Performing Stores");
            bar_chart(
                ui,
                "top_stores",
                "Top Stores by Revenue",
                top_stores,
                ColorScale::Oranges,
                Orientation::Vertical,
                format_currency,
            );
        }
        ViewCharts::InventoryStatus {
            inventory_distribution,
            avg_inventory_by_region,
            stock_status,
            inventory_by_category,
        } => {
            ui.heading("Inventory Analysis");
            ui.columns(2, |cols: &mut [Ui]| {
                histogram_chart(
                    &mut cols[0],
                    "inventory_distribution",
                    "Inventory Distribution",
                    inventory_distribution,
                );
                bar_chart(
                    &mut cols[1],
                    "avg_inventory_by_region",
                    "Avg Inventory by Region",
                    avg_inventory_by_region,
                    ColorScale::Viridis,
                    Orientation::Horizontal,
                    format_units,
                );
            });
            ui.separator();
            ui.heading("Stock Status");
            stock_cards(ui, stock_status);
            ui.separator();
            ui.heading("Inventory by Category");
            donut_chart(ui, "Inventory Distribution", inventory_by_category);
        }
        ViewCharts::TrendsPatterns {
            monthly_revenue,
            units_by_season,
            revenue_heatmap,
        } => {
            ui.heading("Seasonal Patterns");
            ui.columns(2, |cols: &mut [Ui]| {
                line_chart(
                    &mut cols[0],
                    "monthly_revenue",
                    "Monthly Revenue Trend",
                    monthly_revenue,
                    TREND_LINE,
                );
                bar_chart(
                    &mut cols[1],
                    "units_by_season",
                    "Units Sold by Season",
                    units_by_season,
                    ColorScale::Viridis,
                    Orientation::Vertical,
                    |v| format_count(v.round() as usize),
                );
            });
            ui.separator();
            ui.heading("Revenue Heatmap");
            heatmap(ui, "Revenue: Category × Region", revenue_heatmap, ColorScale::Blues);
        }
    }
}

fn no_data(ui: &mut Ui) {
    ui.add_space(8.0);
    ui.label(RichText::new("No data for the current filters").weak());
    ui.add_space(8.0);
}

/// Category label for an axis mark that sits on an integer position.
fn category_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Bars, histogram, line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    Vertical,
    Horizontal,
}

/// One bar per series point, coloured by value along `scale`.
fn bar_chart(
    ui: &mut Ui,
    id: &str,
    title: &str,
    series: &Series,
    scale: ColorScale,
    orientation: Orientation,
    format_value: fn(f64) -> String,
) {
    ui.strong(title);
    if series.is_empty() {
        no_data(ui);
        return;
    }

    let range = series.value_range();
    let bars: Vec<Bar> = series
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            Bar::new(i as f64, p.value)
                .name(format!("{}: {}", p.key, format_value(p.value)))
                .fill(scale.color_for(p.value, range))
                .width(0.7)
        })
        .collect();
    let labels: Vec<String> = series.keys().map(str::to_string).collect();

    let mut chart = BarChart::new(bars).name(title);
    let mut plot = Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false);

    match orientation {
        Orientation::Vertical => {
            plot = plot
                .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
                .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value));
        }
        Orientation::Horizontal => {
            chart = chart.horizontal();
            plot = plot
                .y_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
                .y_axis_formatter(move |mark, _range| category_label(&labels, mark.value));
        }
    }

    plot.show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

fn histogram_chart(ui: &mut Ui, id: &str, title: &str, histogram: &Histogram) {
    ui.strong(title);
    if histogram.bins.is_empty() {
        no_data(ui);
        return;
    }

    let bars: Vec<Bar> = histogram
        .bins
        .iter()
        .map(|bin| {
            Bar::new((bin.start + bin.end) / 2.0, bin.count as f64)
                .width(bin.end - bin.start)
                .name(format!("{:.0}–{:.0}: {}", bin.start, bin.end, format_count(bin.count)))
                .fill(HISTOGRAM_FILL)
        })
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label("Inventory Level")
        .y_axis_label("Count")
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(BarChart::new(bars).name(title)));
}

/// Line with markers over the series' own order.
fn line_chart(ui: &mut Ui, id: &str, title: &str, series: &Series, color: Color32) {
    ui.strong(title);
    if series.is_empty() {
        no_data(ui);
        return;
    }

    let points: Vec<[f64; 2]> = series
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| [i as f64, p.value])
        .collect();
    let labels: Vec<String> = series.keys().map(str::to_string).collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .y_axis_formatter(|mark, _range| format_compact_currency(mark.value))
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .name(title)
                    .color(color)
                    .width(3.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .name(title)
                    .color(color)
                    .radius(5.0),
            );
        });
}

// ---------------------------------------------------------------------------
// Stock status cards
// ---------------------------------------------------------------------------

fn stock_cards(ui: &mut Ui, counts: &StockCounts) {
    let items = |n: usize| format!("{} items", format_count(n));
    ui.columns(3, |cols: &mut [Ui]| {
        metric_card(&mut cols[0], "Low Stock (< 100)", &items(counts.low));
        metric_card(&mut cols[1], "Optimal Stock (100–400)", &items(counts.optimal));
        metric_card(&mut cols[2], "High Stock (> 400)", &items(counts.high));
    });
}

// ---------------------------------------------------------------------------
// Donut
// ---------------------------------------------------------------------------

fn donut_chart(ui: &mut Ui, title: &str, series: &Series) {
    ui.strong(title);
    let total = series.total();
    if series.is_empty() || total <= 0.0 {
        no_data(ui);
        return;
    }

    let colors = ColorMap::new(series.keys());
    ui.horizontal(|ui: &mut Ui| {
        let diameter = CHART_HEIGHT - 20.0;
        let (response, painter) = ui.allocate_painter(Vec2::splat(diameter), Sense::hover());
        let center = response.rect.center();
        let outer = diameter / 2.0 - 4.0;
        let inner = outer * DONUT_HOLE;

        let mut start = -FRAC_PI_2;
        for p in &series.points {
            let sweep = TAU * (p.value / total) as f32;
            paint_ring_segment(
                &painter,
                center,
                inner,
                outer,
                start,
                start + sweep,
                colors.color_for(&p.key),
            );
            start += sweep;
        }

        ui.vertical(|ui: &mut Ui| {
            for p in &series.points {
                ui.horizontal(|ui: &mut Ui| {
                    let (swatch, _) = ui.allocate_exact_size(Vec2::splat(12.0), Sense::hover());
                    ui.painter().rect_filled(swatch, 2.0, colors.color_for(&p.key));
                    ui.label(format!(
                        "{}  {} ({})",
                        p.key,
                        format_units(p.value),
                        format_percentage(p.value / total)
                    ));
                });
            }
        });
    });
}

/// Fill the annulus sector between `from` and `to` radians with convex quads.
fn paint_ring_segment(
    painter: &Painter,
    center: Pos2,
    inner: f32,
    outer: f32,
    from: f32,
    to: f32,
    fill: Color32,
) {
    let steps = ((to - from) / 0.05).ceil().max(1.0) as usize;
    let at = |angle: f32, r: f32| center + r * Vec2::angled(angle);
    for i in 0..steps {
        let a0 = from + (to - from) * i as f32 / steps as f32;
        let a1 = from + (to - from) * (i + 1) as f32 / steps as f32;
        painter.add(Shape::convex_polygon(
            vec![at(a0, outer), at(a1, outer), at(a1, inner), at(a0, inner)],
            fill,
            Stroke::NONE,
        ));
    }
}

// ---------------------------------------------------------------------------
// Heatmap
// ---------------------------------------------------------------------------

/// Pivot grid; cells without rows are grey with a dash, unlike zero-valued cells.
fn heatmap(ui: &mut Ui, title: &str, pivot: &Pivot, scale: ColorScale) {
    ui.strong(title);
    if pivot.is_empty() {
        no_data(ui);
        return;
    }

    let range = pivot.value_range();
    let label_w = 130.0;
    let header_h = 24.0;
    let n_cols = pivot.column_keys.len() as f32;
    let n_rows = pivot.row_keys.len() as f32;
    let cell_w = ((ui.available_width() - label_w) / n_cols).max(48.0);
    let cell_h = ((CHART_HEIGHT - header_h) / n_rows).clamp(24.0, 48.0);

    let (response, painter) = ui.allocate_painter(
        vec2(label_w + cell_w * n_cols, header_h + cell_h * n_rows),
        Sense::hover(),
    );
    let origin = response.rect.min;
    let font = FontId::proportional(13.0);
    let text_color = ui.visuals().text_color();

    for (c, key) in pivot.column_keys.iter().enumerate() {
        painter.text(
            origin + vec2(label_w + cell_w * (c as f32 + 0.5), header_h / 2.0),
            Align2::CENTER_CENTER,
            key,
            font.clone(),
            text_color,
        );
    }

    for (r, row_key) in pivot.row_keys.iter().enumerate() {
        let y = header_h + cell_h * r as f32;
        painter.text(
            origin + vec2(label_w - 8.0, y + cell_h / 2.0),
            Align2::RIGHT_CENTER,
            row_key,
            font.clone(),
            text_color,
        );

        for (c, cell) in pivot.cells[r].iter().enumerate() {
            let rect = Rect::from_min_size(
                origin + vec2(label_w + cell_w * c as f32, y),
                vec2(cell_w, cell_h),
            )
            .shrink(1.0);
            let (fill, label) = match cell {
                Some(v) => (scale.color_for(*v, range), format_compact_currency(*v)),
                None => (NO_DATA_FILL, "—".to_string()),
            };
            painter.rect_filled(rect, 2.0, fill);
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                label,
                font.clone(),
                text_color_on(fill),
            );
        }
    }

    let hovered = response.hover_pos().and_then(|pos| {
        let c = ((pos.x - origin.x - label_w) / cell_w).floor();
        let r = ((pos.y - origin.y - header_h) / cell_h).floor();
        if c < 0.0 || r < 0.0 {
            return None;
        }
        let category = pivot.row_keys.get(r as usize)?;
        let region = pivot.column_keys.get(c as usize)?;
        Some((category, region, pivot.cell(category, region)))
    });
    if let Some((category, region, cell)) = hovered {
        let value = cell.map_or_else(|| "no data".to_string(), format_currency);
        response.on_hover_text_at_pointer(format!("{category} × {region}: {value}"));
    }

    ui.horizontal(|ui: &mut Ui| {
        let (swatch, _) = ui.allocate_exact_size(Vec2::splat(12.0), Sense::hover());
        ui.painter().rect_filled(swatch, 2.0, NO_DATA_FILL);
        ui.label(RichText::new("no data").weak());
        if let Some((lo, hi)) = range {
            ui.separator();
            let (lo_swatch, _) = ui.allocate_exact_size(Vec2::splat(12.0), Sense::hover());
            ui.painter().rect_filled(lo_swatch, 2.0, scale.color_at(0.0));
            ui.label(format_compact_currency(lo));
            let (hi_swatch, _) = ui.allocate_exact_size(Vec2::splat(12.0), Sense::hover());
            ui.painter().rect_filled(hi_swatch, 2.0, scale.color_at(1.0));
            ui.label(format_compact_currency(hi));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_only_on_integer_marks() {
        let labels = vec!["North".to_string(), "South".to_string()];
        assert_eq!(category_label(&labels, 0.0), "North");
        assert_eq!(category_label(&labels, 1.0), "South");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 2.0), "");
        assert_eq!(category_label(&labels, -1.0), "");
    }
}
