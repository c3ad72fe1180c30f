use eframe::egui::{RichText, Ui};

use crate::data::aggregate::Summary;

// ---------------------------------------------------------------------------
// KPI row
// ---------------------------------------------------------------------------

/// Five headline metrics side by side.
pub fn kpi_row(ui: &mut Ui, summary: &Summary) {
    ui.heading("Overall metrics (annual salary in USD)");
    ui.columns(5, |cols: &mut [Ui]| {
        metric(&mut cols[0], "Mean salary", &format_usd(summary.mean_salary));
        metric(&mut cols[1], "Max salary", &format_usd(summary.max_salary));
        metric(&mut cols[2], "Records", &group_thousands(summary.count as i64));
        metric(&mut cols[3], "Most frequent role", &summary.top_role);
        metric(&mut cols[4], "Work mode", &summary.top_work_mode);
    });
}

fn metric(ui: &mut Ui, label: &str, value: &str) {
    ui.label(label);
    ui.label(RichText::new(value).size(24.0).strong());
}

/// `$1,234,568`, rounded to whole dollars.
pub fn format_usd(value: f64) -> String {
    format!("${}", group_thousands(value.round() as i64))
}

/// Integer with comma thousands separators.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
