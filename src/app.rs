use eframe::egui::{self, RichText};

use crate::state::AppState;
use crate::ui::{charts, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct InventoryDashboardApp {
    pub state: AppState,
}

impl InventoryDashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for InventoryDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: KPIs, view selector, charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.heading(RichText::new("Inventory Optimization Dashboard").size(26.0));
                    ui.label(
                        RichText::new("Real-time insights for smarter inventory decisions").strong(),
                    );
                    ui.separator();

                    panels::kpi_strip(ui, &self.state.snapshot.kpis);
                    ui.separator();

                    panels::view_selector(ui, &mut self.state);
                    ui.separator();

                    charts::view_charts(ui, &self.state.snapshot);
                });
        });
    }
}
