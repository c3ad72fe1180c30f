use std::collections::BTreeMap;

use super::country::CountryCodeLookup;
use super::filter::FilteredView;
use super::model::Record;

/// Number of roles shown in the salary ranking.
pub const TOP_ROLE_COUNT: usize = 10;

/// Number of equal-width bins in the salary histogram.
pub const HISTOGRAM_BINS: usize = 30;

/// Role the per-country drill-down is fixed to. It deliberately ignores the
/// general filter selection's notion of role.
pub const COUNTRY_VIEW_ROLE: &str = "Data Scientist";

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

/// Headline metrics over a filtered view. All zero / empty for an empty view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub mean_salary: f64,
    pub max_salary: f64,
    pub count: usize,
    pub top_role: String,
    pub top_work_mode: String,
}

pub fn summarize(view: &FilteredView<'_>) -> Summary {
    if view.is_empty() {
        return Summary::default();
    }
    let salaries: Vec<f64> = view.records().map(|r| r.salary_usd).collect();
    Summary {
        mean_salary: mean(&salaries),
        max_salary: salaries.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        count: salaries.len(),
        top_role: mode(view.records().map(|r| r.role.as_str())),
        top_work_mode: mode(view.records().map(|r| r.work_mode.as_str())),
    }
}

/// Most frequent value. Ties go to the smallest value in sorted order.
fn mode<'a>(values: impl Iterator<Item = &'a str>) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }
    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        if best.map_or(true, |(_, n)| count > n) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value.to_string()).unwrap_or_default()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Mean salary per key, keys in sorted order.
fn mean_salary_by<'a, K: Ord>(
    records: impl Iterator<Item = &'a Record>,
    key: impl Fn(&'a Record) -> K,
) -> BTreeMap<K, f64> {
    let mut groups: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for record in records {
        let entry = groups.entry(key(record)).or_default();
        entry.0 += record.salary_usd;
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(k, (sum, n))| (k, sum / n as f64))
        .collect()
}

// ---------------------------------------------------------------------------
// Top roles by mean salary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RoleSalary {
    pub role: String,
    pub mean_salary: f64,
}

/// The `limit` roles with the highest mean salary, ordered ascending by mean.
///
/// Equal means keep grouped (role name) order in both sorts.
pub fn top_roles_by_mean_salary(view: &FilteredView<'_>, limit: usize) -> Vec<RoleSalary> {
    let mut roles: Vec<RoleSalary> = mean_salary_by(view.records(), |r| r.role.as_str())
        .into_iter()
        .map(|(role, mean_salary)| RoleSalary {
            role: role.to_string(),
            mean_salary,
        })
        .collect();
    roles.sort_by(|a, b| b.mean_salary.total_cmp(&a.mean_salary));
    roles.truncate(limit);
    roles.sort_by(|a, b| a.mean_salary.total_cmp(&b.mean_salary));
    roles
}

// ---------------------------------------------------------------------------
// Salary histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Equal-width bins over `[min, max]` of the view's salaries. Bins are
/// half-open except the last, which also takes `max`. A single repeated
/// salary `v` is spread over `[v - 0.5, v + 0.5]`.
pub fn salary_histogram(view: &FilteredView<'_>, bins: usize) -> Vec<HistogramBin> {
    if view.is_empty() || bins == 0 {
        return Vec::new();
    }
    let (mut lo, mut hi) = view
        .records()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
            (lo.min(r.salary_usd), hi.max(r.salary_usd))
        });
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut histogram: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins {
                hi
            } else {
                lo + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for record in view.records() {
        let x = record.salary_usd;
        // The division can land one bin off the stored edges; the edges win.
        let mut index = (((x - lo) / width) as usize).min(bins - 1);
        while index > 0 && x < histogram[index].lower {
            index -= 1;
        }
        while index + 1 < bins && x >= histogram[index].upper {
            index += 1;
        }
        histogram[index].count += 1;
    }
    histogram
}

// ---------------------------------------------------------------------------
// Work mode proportions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct WorkModeShare {
    pub work_mode: String,
    pub count: usize,
    /// Fraction of the view, in `[0, 1]`.
    pub share: f64,
}

/// Record count and share per work mode, most frequent first.
pub fn work_mode_shares(view: &FilteredView<'_>) -> Vec<WorkModeShare> {
    let total = view.len();
    if total == 0 {
        return Vec::new();
    }
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in view.records() {
        *counts.entry(record.work_mode.as_str()).or_default() += 1;
    }
    let mut shares: Vec<WorkModeShare> = counts
        .into_iter()
        .map(|(mode, count)| WorkModeShare {
            work_mode: mode.to_string(),
            count,
            share: count as f64 / total as f64,
        })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count));
    shares
}

// ---------------------------------------------------------------------------
// Per-country mean salary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CountrySalary {
    /// ISO 3166-1 alpha-3 code.
    pub country: String,
    pub mean_salary: f64,
}

/// Mean salary per country of residence for records whose role is exactly
/// `role`, grouped by resolved alpha-3 code and ordered by it. Records whose
/// code cannot be resolved are dropped.
pub fn country_mean_salary(
    view: &FilteredView<'_>,
    role: &str,
    codes: &dyn CountryCodeLookup,
) -> Vec<CountrySalary> {
    // Ok(alpha-3) for resolved codes, Err(raw alpha-2) for the rest.
    let by_country = mean_salary_by(view.records().filter(|r| r.role == role), |r| {
        let alpha2 = r.country_of_residence.as_str();
        codes.alpha3(alpha2).ok_or(alpha2)
    });

    let mut unresolved = Vec::new();
    let resolved: Vec<CountrySalary> = by_country
        .into_iter()
        .filter_map(|(code, mean_salary)| match code {
            Ok(alpha3) => Some(CountrySalary {
                country: alpha3.to_string(),
                mean_salary,
            }),
            Err(alpha2) => {
                unresolved.push(alpha2);
                None
            }
        })
        .collect();

    if !unresolved.is_empty() {
        log::warn!("Dropped unresolved country codes: {unresolved:?}");
    }
    resolved
}

// ---------------------------------------------------------------------------
// Snapshot of every view
// ---------------------------------------------------------------------------

/// All aggregate views for one filter selection, computed together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSnapshot {
    pub summary: Summary,
    pub top_roles: Vec<RoleSalary>,
    pub histogram: Vec<HistogramBin>,
    pub work_modes: Vec<WorkModeShare>,
    pub countries: Vec<CountrySalary>,
}

impl DashboardSnapshot {
    pub fn compute(view: &FilteredView<'_>, codes: &dyn CountryCodeLookup) -> Self {
        DashboardSnapshot {
            summary: summarize(view),
            top_roles: top_roles_by_mean_salary(view, TOP_ROLE_COUNT),
            histogram: salary_histogram(view, HISTOGRAM_BINS),
            work_modes: work_mode_shares(view),
            countries: country_mean_salary(view, COUNTRY_VIEW_ROLE, codes),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::country::Iso3166;
    use crate::data::filter::FilterSelection;
    use crate::data::model::tests::{record, scenario_dataset};
    use crate::data::model::{Attribute, FilterValue, SalaryDataset};

    const EPS: f64 = 1e-9;

    fn full_view(ds: &SalaryDataset) -> FilteredView<'_> {
        FilteredView::new(ds, &FilterSelection::full(ds))
    }

    #[test]
    fn year_scenario() {
        let ds = scenario_dataset();
        let selection = FilterSelection::full(&ds)
            .with(Attribute::Year, BTreeSet::from([FilterValue::from(2023)]));
        let view = FilteredView::new(&ds, &selection);
        assert_eq!(view.indices(), &[0, 1]);

        let snapshot = DashboardSnapshot::compute(&view, &Iso3166::new());
        assert!((snapshot.summary.mean_salary - 95_000.0).abs() < EPS);
        assert_eq!(snapshot.summary.max_salary, 150_000.0);
        assert_eq!(snapshot.summary.count, 2);
        assert_eq!(
            snapshot.countries,
            vec![CountrySalary {
                country: "USA".to_string(),
                mean_salary: 150_000.0
            }]
        );
    }

    #[test]
    fn empty_selection_scenario() {
        let ds = scenario_dataset();
        let selection = FilterSelection::full(&ds).with(Attribute::Seniority, BTreeSet::new());
        let view = FilteredView::new(&ds, &selection);
        assert!(view.is_empty());

        let snapshot = DashboardSnapshot::compute(&view, &Iso3166::new());
        assert_eq!(snapshot, DashboardSnapshot::default());
        assert_eq!(snapshot.summary.mean_salary, 0.0);
        assert_eq!(snapshot.summary.top_role, "");
        assert_eq!(snapshot.summary.top_work_mode, "");
    }

    #[test]
    fn mode_ties_go_to_smallest_value() {
        let ds = SalaryDataset::from_records(vec![
            record(2023, "Senior", "Remote", "ML Engineer", "US", 1.0),
            record(2023, "Senior", "Hybrid", "Analyst", "US", 1.0),
            record(2023, "Senior", "Remote", "Analyst", "US", 1.0),
            record(2023, "Senior", "Hybrid", "ML Engineer", "US", 1.0),
            record(2023, "Senior", "On-site", "Data Scientist", "US", 1.0),
        ]);
        let summary = summarize(&full_view(&ds));
        assert_eq!(summary.top_role, "Analyst");
        assert_eq!(summary.top_work_mode, "Hybrid");
    }

    #[test]
    fn mode_prefers_the_most_frequent() {
        let ds = SalaryDataset::from_records(vec![
            record(2023, "Senior", "Remote", "Zoologist", "US", 1.0),
            record(2023, "Senior", "Remote", "Zoologist", "US", 1.0),
            record(2023, "Senior", "Hybrid", "Analyst", "US", 1.0),
        ]);
        let summary = summarize(&full_view(&ds));
        assert_eq!(summary.top_role, "Zoologist");
        assert_eq!(summary.top_work_mode, "Remote");
    }

    #[test]
    fn top_roles_are_capped_and_ascending() {
        let records: Vec<Record> = (0..15)
            .map(|i| {
                let role = format!("Role {i:02}");
                record(2023, "Senior", "Remote", &role, "US", 1_000.0 * i as f64)
            })
            .collect();
        let ds = SalaryDataset::from_records(records);
        let ranking = top_roles_by_mean_salary(&full_view(&ds), TOP_ROLE_COUNT);

        assert_eq!(ranking.len(), 10);
        assert!(ranking.windows(2).all(|w| w[0].mean_salary <= w[1].mean_salary));
        assert_eq!(ranking.first().map(|r| r.role.as_str()), Some("Role 05"));
        assert_eq!(ranking.last().map(|r| r.role.as_str()), Some("Role 14"));
    }

    #[test]
    fn top_roles_average_each_group() {
        let ds = scenario_dataset();
        let ranking = top_roles_by_mean_salary(&full_view(&ds), TOP_ROLE_COUNT);
        assert_eq!(
            ranking,
            vec![
                RoleSalary {
                    role: "Analyst".to_string(),
                    mean_salary: 45_000.0,
                },
                RoleSalary {
                    role: "Data Scientist".to_string(),
                    mean_salary: 120_000.0,
                },
            ]
        );
    }

    #[test]
    fn top_roles_ties_keep_grouped_order() {
        let ds = SalaryDataset::from_records(vec![
            record(2023, "Senior", "Remote", "C", "US", 10.0),
            record(2023, "Senior", "Remote", "B", "US", 10.0),
            record(2023, "Senior", "Remote", "A", "US", 10.0),
            record(2023, "Senior", "Remote", "D", "US", 5.0),
        ]);
        let ranking = top_roles_by_mean_salary(&full_view(&ds), 2);
        let roles: Vec<&str> = ranking.iter().map(|r| r.role.as_str()).collect();
        assert_eq!(roles, vec!["A", "B"]);
    }

    #[test]
    fn top_roles_of_empty_view_is_empty() {
        let ds = SalaryDataset::default();
        assert!(top_roles_by_mean_salary(&full_view(&ds), TOP_ROLE_COUNT).is_empty());
    }

    #[test]
    fn histogram_counts_sum_to_view_size() {
        let records: Vec<Record> = (0..97)
            .map(|i| {
                let salary = 20_000.0 + 1_337.0 * (i * i % 61) as f64;
                record(2023, "Senior", "Remote", "A", "US", salary)
            })
            .collect();
        let ds = SalaryDataset::from_records(records);
        let bins = salary_histogram(&full_view(&ds), HISTOGRAM_BINS);

        assert_eq!(bins.len(), HISTOGRAM_BINS);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 97);
        let first = &bins[0];
        let last = &bins[HISTOGRAM_BINS - 1];
        assert_eq!(first.lower, 20_000.0);
        assert_eq!(last.upper, 20_000.0 + 1_337.0 * 60.0);
        assert!(last.count > 0);
        assert!(bins.iter().all(|b| (b.width() - first.width()).abs() < 1e-6));
    }

    #[test]
    fn histogram_of_one_salary_value() {
        let ds = SalaryDataset::from_records(vec![
            record(2023, "Senior", "Remote", "A", "US", 50_000.0),
            record(2023, "Senior", "Remote", "A", "US", 50_000.0),
        ]);
        let bins = salary_histogram(&full_view(&ds), HISTOGRAM_BINS);
        assert_eq!(bins.len(), HISTOGRAM_BINS);
        assert_eq!(bins[0].lower, 49_999.5);
        assert_eq!(bins[HISTOGRAM_BINS - 1].upper, 50_000.5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
        assert!((bins[HISTOGRAM_BINS / 2].center() - 50_000.0).abs() < 0.02);
    }

    #[test]
    fn salaries_on_interior_edges_count_in_the_bin_they_open() {
        for k in 1..200 {
            let hi = 1_000.0 + k as f64 * 7.3;
            let bounds = SalaryDataset::from_records(vec![
                record(2023, "Senior", "Remote", "A", "US", 1_000.0),
                record(2023, "Senior", "Remote", "A", "US", hi),
            ]);
            let edges = salary_histogram(&full_view(&bounds), HISTOGRAM_BINS);

            // One salary on every lower edge plus the maximum; same min and max,
            // so the same edges.
            let mut records: Vec<Record> = edges
                .iter()
                .map(|b| record(2023, "Senior", "Remote", "A", "US", b.lower))
                .collect();
            records.push(record(2023, "Senior", "Remote", "A", "US", hi));
            let ds = SalaryDataset::from_records(records);
            let bins = salary_histogram(&full_view(&ds), HISTOGRAM_BINS);

            let mut expected = edges;
            for bin in &mut expected {
                bin.count = 1;
            }
            expected[HISTOGRAM_BINS - 1].count = 2;
            assert_eq!(bins, expected, "max salary {hi}");
        }
    }

    #[test]
    fn histogram_of_empty_view_is_empty() {
        let ds = SalaryDataset::default();
        assert!(salary_histogram(&full_view(&ds), HISTOGRAM_BINS).is_empty());
    }

    #[test]
    fn work_mode_shares_sum_to_one() {
        let ds = SalaryDataset::from_records(vec![
            record(2023, "Senior", "Remote", "A", "US", 1.0),
            record(2023, "Senior", "Remote", "A", "US", 1.0),
            record(2023, "Senior", "Remote", "A", "US", 1.0),
            record(2023, "Senior", "Hybrid", "A", "US", 1.0),
            record(2023, "Senior", "On-site", "A", "US", 1.0),
            record(2023, "Senior", "Hybrid", "A", "US", 1.0),
            record(2023, "Senior", "Hybrid", "A", "US", 1.0),
        ]);
        let shares = work_mode_shares(&full_view(&ds));
        let modes: Vec<(&str, usize)> = shares
            .iter()
            .map(|s| (s.work_mode.as_str(), s.count))
            .collect();
        assert_eq!(modes, vec![("Hybrid", 3), ("Remote", 3), ("On-site", 1)]);
        let total: f64 = shares.iter().map(|s| s.share).sum();
        assert!((total - 1.0).abs() < EPS);
        assert!((shares[2].share - 1.0 / 7.0).abs() < EPS);
        assert!(work_mode_shares(&full_view(&SalaryDataset::default())).is_empty());
    }

    #[test]
    fn country_view_ignores_other_roles_and_unknown_codes() {
        let ds = SalaryDataset::from_records(vec![
            record(2023, "Senior", "Remote", "Data Scientist", "US", 100.0),
            record(2023, "Senior", "Remote", "Data Scientist", "US", 200.0),
            record(2023, "Senior", "Remote", "Data Scientist", "XK", 300.0),
            record(2023, "Senior", "Remote", "Data Scientist", "DE", 400.0),
            record(2023, "Senior", "Remote", "Data Scientist Lead", "FR", 500.0),
            record(2023, "Senior", "Remote", "Analyst", "BR", 600.0),
        ]);
        let countries = country_mean_salary(&full_view(&ds), COUNTRY_VIEW_ROLE, &Iso3166::new());
        assert_eq!(
            countries,
            vec![
                CountrySalary {
                    country: "DEU".to_string(),
                    mean_salary: 400.0,
                },
                CountrySalary {
                    country: "USA".to_string(),
                    mean_salary: 150.0,
                },
            ]
        );
    }

    #[test]
    fn country_view_uses_the_injected_lookup() {
        let ds = scenario_dataset();
        let lookup = std::collections::HashMap::from([("BR", "BRZ")]);
        let countries = country_mean_salary(&full_view(&ds), COUNTRY_VIEW_ROLE, &lookup);
        assert_eq!(
            countries,
            vec![CountrySalary {
                country: "BRZ".to_string(),
                mean_salary: 90_000.0,
            }]
        );
    }

    #[test]
    fn country_codes_that_resolve_alike_share_one_entry() {
        let ds = SalaryDataset::from_records(vec![
            record(2023, "Senior", "Remote", "Data Scientist", "US", 100.0),
            record(2023, "Senior", "Remote", "Data Scientist", "us", 200.0),
            record(2023, "Senior", "Remote", "Data Scientist", " US", 600.0),
            record(2023, "Senior", "Remote", "Data Scientist", "at", 50.0),
            record(2023, "Senior", "Remote", "Data Scientist", "xk", 1.0),
            record(2023, "Senior", "Remote", "Data Scientist", "XK", 1.0),
        ]);
        let countries = country_mean_salary(&full_view(&ds), COUNTRY_VIEW_ROLE, &Iso3166::new());
        assert_eq!(
            countries,
            vec![
                CountrySalary {
                    country: "AUT".to_string(),
                    mean_salary: 50.0,
                },
                CountrySalary {
                    country: "USA".to_string(),
                    mean_salary: 300.0,
                },
            ]
        );
    }
}
