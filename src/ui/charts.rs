use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::{ColorMap, ColorScale};
use crate::data::aggregate::{
    CountrySalary, DashboardSnapshot, HistogramBin, RoleSalary, WorkModeShare, COUNTRY_VIEW_ROLE,
};
use crate::ui::metrics::format_usd;

const CHART_HEIGHT: f32 = 320.0;
const BAR_COLOR: Color32 = Color32::from_rgb(99, 110, 250);

// ---------------------------------------------------------------------------
// Chart grid (central panel)
// ---------------------------------------------------------------------------

/// The four charts in a 2×2 grid.
pub fn chart_grid(ui: &mut Ui, snapshot: &DashboardSnapshot) {
    ui.heading("Charts");
    ui.columns(2, |cols: &mut [Ui]| {
        top_roles_chart(&mut cols[0], &snapshot.top_roles);
        salary_histogram_chart(&mut cols[1], &snapshot.histogram);
    });
    ui.add_space(8.0);
    ui.columns(2, |cols: &mut [Ui]| {
        work_mode_chart(&mut cols[0], &snapshot.work_modes);
        country_chart(&mut cols[1], &snapshot.countries);
    });
}

fn no_data(ui: &mut Ui, chart: &str) {
    ui.colored_label(
        Color32::from_rgb(230, 160, 0),
        format!("No data to display in the {chart} chart."),
    );
}

fn chart_title(ui: &mut Ui, title: &str) {
    ui.label(RichText::new(title).strong());
}

// ---------------------------------------------------------------------------
// Top roles
// ---------------------------------------------------------------------------

fn top_roles_chart(ui: &mut Ui, roles: &[RoleSalary]) {
    chart_title(ui, "Top 10 roles by mean salary");
    if roles.is_empty() {
        no_data(ui, "roles");
        return;
    }

    // Ascending input, so the best paid role ends up at the top.
    let bars: Vec<Bar> = roles
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Bar::new(i as f64, r.mean_salary)
                .name(format!("{} ({})", r.role, format_usd(r.mean_salary)))
                .fill(BAR_COLOR)
                .width(0.7)
        })
        .collect();

    Plot::new("top_roles_plot")
        .height(CHART_HEIGHT)
        .x_axis_label("Mean annual salary (USD)")
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().name("Mean salary"));
        });

    for r in roles.iter().rev() {
        ui.small(format!("{}: {}", r.role, format_usd(r.mean_salary)));
    }
}

// ---------------------------------------------------------------------------
// Salary histogram
// ---------------------------------------------------------------------------

fn salary_histogram_chart(ui: &mut Ui, bins: &[HistogramBin]) {
    chart_title(ui, "Salary distribution");
    if bins.is_empty() {
        no_data(ui, "distribution");
        return;
    }

    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| {
            Bar::new(b.center(), b.count as f64)
                .width(b.width())
                .name(format!("{} – {}", format_usd(b.lower), format_usd(b.upper)))
                .fill(BAR_COLOR)
        })
        .collect();

    Plot::new("salary_histogram_plot")
        .height(CHART_HEIGHT)
        .x_axis_label("Salary range (USD)")
        .y_axis_label("Records")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Records"));
        });
}

// ---------------------------------------------------------------------------
// Work mode proportions
// ---------------------------------------------------------------------------

fn work_mode_chart(ui: &mut Ui, shares: &[WorkModeShare]) {
    chart_title(ui, "Work mode proportions");
    if shares.is_empty() {
        no_data(ui, "work mode");
        return;
    }

    let colors = ColorMap::new(shares.iter().map(|s| s.work_mode.as_str()));

    Plot::new("work_mode_plot")
        .height(CHART_HEIGHT)
        .y_axis_label("Share (%)")
        .legend(Legend::default())
        .include_y(0.0)
        .include_y(100.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            for (i, s) in shares.iter().enumerate() {
                let label = format!("{} ({:.1}%)", s.work_mode, s.share * 100.0);
                let bar = Bar::new(i as f64, s.share * 100.0)
                    .name(format!("{label}, {} records", s.count))
                    .width(0.6);
                plot_ui.bar_chart(
                    BarChart::new(vec![bar])
                        .name(label)
                        .color(colors.color_for(&s.work_mode)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Per-country mean salary
// ---------------------------------------------------------------------------

fn country_chart(ui: &mut Ui, countries: &[CountrySalary]) {
    chart_title(ui, &format!("Mean {COUNTRY_VIEW_ROLE} salary by country of residence"));
    if countries.is_empty() {
        no_data(ui, "country");
        return;
    }

    let scale = ColorScale::new(countries.iter().map(|c| c.mean_salary));

    let bars: Vec<Bar> = countries
        .iter()
        .enumerate()
        .map(|(i, c)| {
            Bar::new(i as f64, c.mean_salary)
                .name(format!("{} ({})", c.country, format_usd(c.mean_salary)))
                .fill(scale.color_for(c.mean_salary))
                .width(0.8)
        })
        .collect();

    Plot::new("country_plot")
        .height(CHART_HEIGHT)
        .x_axis_label("Country (ISO-3)")
        .y_axis_label("Mean salary (USD)")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Mean salary"));
        });

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for c in countries {
            ui.label(RichText::new(&c.country).color(scale.color_for(c.mean_salary)));
        }
    });
}
