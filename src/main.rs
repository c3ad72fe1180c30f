mod app;
mod color;
mod data;
mod state;
mod ui;

use app::SalaryPandaApp;
use data::loader::DEFAULT_DATASET_URL;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional data source: a URL or a local .csv / .json / .parquet path.
    let source = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DATASET_URL.to_string());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Salary Panda – Data Salaries Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(SalaryPandaApp::new(&source)))),
    )
}
