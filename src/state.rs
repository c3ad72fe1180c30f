use crate::data::aggregate::DashboardSnapshot;
use crate::data::country::{CountryCodeLookup, Iso3166};
use crate::data::filter::{FilterSelection, FilteredView};
use crate::data::loader;
use crate::data::model::{Attribute, FilterValue, SalaryDataset};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a source loads successfully).
    pub dataset: Option<SalaryDataset>,

    /// Where the current dataset came from (URL or path).
    pub source: Option<String>,

    /// Per-attribute filter selections.
    pub selection: FilterSelection,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Aggregate views over the visible records (cached).
    pub snapshot: DashboardSnapshot,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Two-letter → three-letter translation for the country view.
    country_codes: Box<dyn CountryCodeLookup>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_country_codes(Box::new(Iso3166::new()))
    }
}

impl AppState {
    pub fn with_country_codes(country_codes: Box<dyn CountryCodeLookup>) -> Self {
        Self {
            dataset: None,
            source: None,
            selection: FilterSelection::default(),
            visible_indices: Vec::new(),
            snapshot: DashboardSnapshot::default(),
            status_message: None,
            country_codes,
        }
    }

    /// Load `source` (URL or path). On failure the current dataset stays.
    pub fn load(&mut self, source: &str) {
        match loader::load_source(source) {
            Ok(dataset) => {
                if dataset.is_empty() {
                    log::warn!("{source} contains no records");
                } else {
                    log::info!("Loaded {} records from {source}", dataset.len());
                }
                self.set_dataset(dataset, source);
            }
            Err(e) => {
                log::error!("Failed to load {source}: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset and reset filters to the full domains.
    pub fn set_dataset(&mut self, dataset: SalaryDataset, source: &str) {
        self.selection = FilterSelection::full(&dataset);
        self.dataset = Some(dataset);
        self.source = Some(source.to_string());
        self.status_message = None;
        self.refilter();
    }

    /// Recompute `visible_indices` and every aggregate after a filter change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let view = FilteredView::new(ds, &self.selection);
        self.snapshot = DashboardSnapshot::compute(&view, self.country_codes.as_ref());
        self.visible_indices = view.indices().to_vec();
        log::debug!("{} of {} records visible", self.visible_indices.len(), ds.len());
    }

    /// Currently visible records.
    pub fn filtered_view(&self) -> Option<FilteredView<'_>> {
        self.dataset
            .as_ref()
            .map(|ds| FilteredView::from_indices(ds, self.visible_indices.clone()))
    }

    /// Toggle a single value in an attribute's filter.
    pub fn toggle_filter_value(&mut self, attribute: Attribute, value: &FilterValue) {
        if let Some(ds) = &self.dataset {
            self.selection.toggle(ds, attribute, value);
            self.refilter();
        }
    }

    /// Select all values of an attribute.
    pub fn select_all(&mut self, attribute: Attribute) {
        if let Some(ds) = &self.dataset {
            self.selection.set(attribute, ds.domain(attribute).clone());
            self.refilter();
        }
    }

    /// Deselect all values of an attribute.
    pub fn select_none(&mut self, attribute: Attribute) {
        self.selection.set(attribute, Default::default());
        self.refilter();
    }
}
