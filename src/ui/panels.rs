use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::dashboard::DashboardView;
use crate::data::aggregate::Kpis;
use crate::data::model::Facet;
use crate::format::{format_count, format_currency, format_units};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – facet filters
// ---------------------------------------------------------------------------

enum FilterAction {
    Toggle(Facet, String),
    SelectAll(Facet),
    SelectNone(Facet),
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let table = Arc::clone(&state.table);
    let mut actions = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for facet in Facet::ALL {
                let all_values = table.facet_values(facet);
                let selected = state.filters.selected(facet);
                let header_text = format!("{facet}  ({}/{})", selected.len(), all_values.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(facet.label())
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                actions.push(FilterAction::SelectAll(facet));
                            }
                            if ui.small_button("None").clicked() {
                                actions.push(FilterAction::SelectNone(facet));
                            }
                        });

                        for val in all_values {
                            let mut checked = selected.contains(val);
                            if ui.checkbox(&mut checked, val.as_str()).changed() {
                                actions.push(FilterAction::Toggle(facet, val.clone()));
                            }
                        }
                    });
            }
        });

    for action in actions {
        match action {
            FilterAction::Toggle(facet, value) => state.toggle_filter_value(facet, &value),
            FilterAction::SelectAll(facet) => state.select_all(facet),
            FilterAction::SelectNone(facet) => state.select_none(facet),
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                reload_source(state);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Export view as JSON…").clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} of {} rows",
            format_count(state.snapshot.kpis.row_count),
            format_count(state.table.len())
        ))
        .on_hover_text(state.source_path.display().to_string());

        let unknown_dates = state.table.date_warnings().len();
        if unknown_dates > 0 {
            ui.separator();
            ui.label(
                RichText::new(format!("{} with unknown date", format_count(unknown_dates)))
                    .color(Color32::from_rgb(200, 140, 0)),
            )
            .on_hover_text("Excluded from the monthly trend only");
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// KPI strip and view selector
// ---------------------------------------------------------------------------

/// A labelled value in a bordered frame.
pub fn metric_card(ui: &mut Ui, label: &str, value: &str) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value).size(24.0).strong());
    });
}

pub fn kpi_strip(ui: &mut Ui, kpis: &Kpis) {
    ui.heading("Key Performance Indicators");
    ui.columns(4, |cols: &mut [Ui]| {
        metric_card(&mut cols[0], "Total Revenue", &format_currency(kpis.total_revenue));
        metric_card(&mut cols[1], "Avg Inventory", &format_units(kpis.avg_inventory));
        metric_card(&mut cols[2], "Low Stock Items", &format_count(kpis.low_stock_count));
        metric_card(&mut cols[3], "Overstocked Items", &format_count(kpis.overstock_count));
    });
}

pub fn view_selector(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Select View:");
        let mut selected = state.view;
        for view in DashboardView::ALL {
            ui.radio_value(&mut selected, view, view.label());
        }
        if selected != state.view {
            state.set_view(selected);
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open inventory data")
        .add_filter("Supported files", &["csv", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = state.open(&path) {
            log::error!("Failed to load {}: {e}", path.display());
            state.status_message = Some(format!("Error: {e}"));
        }
    }
}

fn reload_source(state: &mut AppState) {
    if let Err(e) = state.reload() {
        log::error!("Failed to reload {}: {e}", state.source_path.display());
        state.status_message = Some(format!("Error: {e}"));
    }
}

fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export dashboard view")
        .set_file_name("dashboard.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        match state.export_snapshot(&path) {
            Ok(()) => state.status_message = None,
            Err(e) => {
                log::error!("Export failed: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
