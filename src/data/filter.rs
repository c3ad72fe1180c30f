use std::collections::{BTreeMap, BTreeSet};

use super::model::{Attribute, FilterValue, Record, SalaryDataset};

// ---------------------------------------------------------------------------
// Filter selection: which values are admissible per attribute
// ---------------------------------------------------------------------------

/// Per-attribute selection: maps attribute → set of admissible values.
///
/// An attribute absent from the map is unconstrained (same as selecting its
/// full domain). A present but empty set admits nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    selected: BTreeMap<Attribute, BTreeSet<FilterValue>>,
}

impl FilterSelection {
    /// Every attribute set to its full domain, i.e. show everything.
    pub fn full(dataset: &SalaryDataset) -> Self {
        let selected = Attribute::ALL
            .iter()
            .map(|&attr| (attr, dataset.domain(attr).clone()))
            .collect();
        FilterSelection { selected }
    }

    /// Replace the selection for one attribute.
    #[cfg(test)]
    pub fn with(mut self, attribute: Attribute, values: BTreeSet<FilterValue>) -> Self {
        self.set(attribute, values);
        self
    }

    pub fn set(&mut self, attribute: Attribute, values: BTreeSet<FilterValue>) {
        self.selected.insert(attribute, values);
    }

    /// Selected values for `attribute`, `None` when unconstrained.
    pub fn get(&self, attribute: Attribute) -> Option<&BTreeSet<FilterValue>> {
        self.selected.get(&attribute)
    }

    pub fn is_selected(&self, attribute: Attribute, value: &FilterValue) -> bool {
        self.get(attribute).map_or(true, |set| set.contains(value))
    }

    /// Add `value` if absent, remove it otherwise.
    pub fn toggle(&mut self, dataset: &SalaryDataset, attribute: Attribute, value: &FilterValue) {
        let selected = self
            .selected
            .entry(attribute)
            .or_insert_with(|| dataset.domain(attribute).clone());
        if !selected.remove(value) {
            selected.insert(value.clone());
        }
    }

    /// Does `record` pass every attribute's membership test?
    pub fn matches(&self, record: &Record) -> bool {
        self.selected
            .iter()
            .all(|(&attr, set)| !set.is_empty() && set.contains(&record.value(attr)))
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Records of a dataset passing a [`FilterSelection`], in source order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a SalaryDataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn new(dataset: &'a SalaryDataset, selection: &FilterSelection) -> Self {
        FilteredView {
            dataset,
            indices: filtered_indices(dataset, selection),
        }
    }

    /// View over already computed indices.
    pub fn from_indices(dataset: &'a SalaryDataset, indices: Vec<usize>) -> Self {
        FilteredView { dataset, indices }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.indices.iter().map(|&i| &self.dataset.records[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Return indices of records that pass all attribute filters.
///
/// A record passes an attribute filter when:
/// * The attribute is not present in `selection` → passes (no constraint)
/// * The selected set is empty → nothing selected → fails
/// * The record's value is in the selected set → passes
pub fn filtered_indices(dataset: &SalaryDataset, selection: &FilterSelection) -> Vec<usize> {
    // Attributes whose selection covers the whole domain cannot reject a row.
    let active = FilterSelection {
        selected: selection
            .selected
            .iter()
            .filter(|&(&attr, set)| set.is_empty() || !dataset.domain(attr).is_subset(set))
            .map(|(&attr, set)| (attr, set.clone()))
            .collect(),
    };

    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, record)| active.matches(record))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{record, scenario_dataset};

    fn years(values: &[i64]) -> BTreeSet<FilterValue> {
        values.iter().map(|&y| FilterValue::from(y)).collect()
    }

    #[test]
    fn full_selection_is_identity() {
        let ds = scenario_dataset();
        let view = FilteredView::new(&ds, &FilterSelection::full(&ds));
        assert_eq!(view.indices(), &[0, 1, 2, 3]);
        assert_eq!(filtered_indices(&ds, &FilterSelection::default()), vec![0, 1, 2, 3]);
    }

    #[test]
    fn empty_set_on_any_attribute_matches_nothing() {
        let ds = scenario_dataset();
        for attr in Attribute::ALL {
            let selection = FilterSelection::full(&ds).with(attr, BTreeSet::new());
            assert!(filtered_indices(&ds, &selection).is_empty(), "{attr}");
        }
    }

    #[test]
    fn year_filter_keeps_source_order() {
        let ds = scenario_dataset();
        let selection = FilterSelection::full(&ds).with(Attribute::Year, years(&[2023]));
        let view = FilteredView::new(&ds, &selection);
        let salaries: Vec<f64> = view.records().map(|r| r.salary_usd).collect();
        assert_eq!(salaries, vec![150_000.0, 40_000.0]);
    }

    #[test]
    fn attributes_combine_with_and() {
        let ds = scenario_dataset();
        let selection = FilterSelection::full(&ds)
            .with(Attribute::Year, years(&[2024]))
            .with(Attribute::Seniority, BTreeSet::from(["Junior".into()]));
        assert_eq!(filtered_indices(&ds, &selection), vec![3]);
    }

    #[test]
    fn values_outside_domain_match_nothing() {
        let ds = scenario_dataset();
        let selection = FilterSelection::full(&ds).with(Attribute::Year, years(&[1999]));
        assert!(filtered_indices(&ds, &selection).is_empty());

        // Extra unknown values next to real ones are harmless.
        let selection = FilterSelection::full(&ds).with(Attribute::Year, years(&[1999, 2024]));
        assert_eq!(filtered_indices(&ds, &selection), vec![2, 3]);
    }

    #[test]
    fn shrinking_a_selection_never_grows_the_view() {
        let ds = SalaryDataset::from_records(vec![
            record(2020, "Junior", "Remote", "A", "US", 1.0),
            record(2021, "Mid", "Hybrid", "B", "US", 2.0),
            record(2022, "Senior", "Remote", "A", "DE", 3.0),
            record(2022, "Junior", "On-site", "C", "FR", 4.0),
            record(2023, "Senior", "Hybrid", "B", "BR", 5.0),
        ]);
        for attr in Attribute::ALL {
            let mut selection = FilterSelection::full(&ds);
            let mut previous = filtered_indices(&ds, &selection).len();
            for value in ds.domain(attr).clone() {
                selection.toggle(&ds, attr, &value);
                let now = filtered_indices(&ds, &selection).len();
                assert!(now <= previous, "{attr} grew from {previous} to {now}");
                previous = now;
            }
            assert_eq!(previous, 0);
        }
    }

    #[test]
    fn toggle_round_trips() {
        let ds = scenario_dataset();
        let mut selection = FilterSelection::default();
        let junior = FilterValue::from("Junior");
        selection.toggle(&ds, Attribute::Seniority, &junior);
        assert!(!selection.is_selected(Attribute::Seniority, &junior));
        assert_eq!(filtered_indices(&ds, &selection), vec![0, 2]);
        selection.toggle(&ds, Attribute::Seniority, &junior);
        assert!(selection.is_selected(Attribute::Seniority, &junior));
        assert_eq!(filtered_indices(&ds, &selection).len(), 4);
    }
}
