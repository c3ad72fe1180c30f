use eframe::egui::{self, Ui};

use crate::state::AppState;
use crate::ui::{charts, metrics, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SalaryPandaApp {
    pub state: AppState,
}

impl SalaryPandaApp {
    /// Create the app and load `source` before the first frame.
    pub fn new(source: &str) -> Self {
        let mut state = AppState::default();
        state.load(source);
        Self { state }
    }
}

impl eframe::App for SalaryPandaApp {
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

        // ---- Central panel: metrics, charts, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui: &mut Ui| {
                dashboard(ui, &self.state);
            });
        });
    }
}

fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(view) = state.filtered_view() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No dataset loaded  (File → Open… or File → Reload default dataset)");
        });
        return;
    };

    ui.heading("Data-industry salary dashboard");
    ui.label(
        "Explore annual salaries in the data field. \
         Use the filters on the left to refine the analysis.",
    );
    ui.add_space(8.0);

    metrics::kpi_row(ui, &state.snapshot.summary);
    ui.separator();
    charts::chart_grid(ui, &state.snapshot);
    ui.separator();
    table::records_table(ui, &view);
}
