use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::filter::FilteredView;

const HEADERS: [&str; 8] = [
    "Year",
    "Seniority",
    "Contract",
    "Company size",
    "Work mode",
    "Role",
    "Residence",
    "Salary (USD)",
];

/// Every visible record, in source order.
pub fn records_table(ui: &mut Ui, view: &FilteredView<'_>) {
    ui.heading("Detailed data");
    let records: Vec<_> = view.records().collect();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(400.0)
        .columns(Column::auto().at_least(70.0), HEADERS.len())
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, records.len(), |mut row| {
                let r = records[row.index()];
                let cells = [
                    r.year.to_string(),
                    r.seniority.clone(),
                    r.contract_type.clone(),
                    r.company_size.clone(),
                    r.work_mode.clone(),
                    r.role.clone(),
                    r.country_of_residence.clone(),
                    format!("{:.0}", r.salary_usd),
                ];
                for cell in cells {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}
