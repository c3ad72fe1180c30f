use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Record – one row of the salary table
// ---------------------------------------------------------------------------

/// A single salary record. Field names follow the source CSV header.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Record {
    #[serde(rename = "ano")]
    pub year: i64,
    #[serde(rename = "senioridade")]
    pub seniority: String,
    #[serde(rename = "contrato")]
    pub contract_type: String,
    #[serde(rename = "tamanho_empresa")]
    pub company_size: String,
    #[serde(rename = "remoto")]
    pub work_mode: String,
    #[serde(rename = "cargo")]
    pub role: String,
    /// ISO 3166-1 alpha-2 code.
    #[serde(rename = "residencia")]
    pub country_of_residence: String,
    #[serde(rename = "usd")]
    pub salary_usd: f64,
}

impl Record {
    /// Value of a filterable attribute, as used for domain and membership tests.
    pub fn value(&self, attribute: Attribute) -> FilterValue {
        match attribute {
            Attribute::Year => FilterValue::Integer(self.year),
            Attribute::Seniority => FilterValue::Text(self.seniority.clone()),
            Attribute::ContractType => FilterValue::Text(self.contract_type.clone()),
            Attribute::CompanySize => FilterValue::Text(self.company_size.clone()),
            Attribute::WorkMode => FilterValue::Text(self.work_mode.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// Attribute – the five filterable columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attribute {
    Year,
    Seniority,
    ContractType,
    CompanySize,
    WorkMode,
}

impl Attribute {
    /// All filterable attributes in sidebar order.
    pub const ALL: [Attribute; 5] = [
        Attribute::Year,
        Attribute::Seniority,
        Attribute::ContractType,
        Attribute::CompanySize,
        Attribute::WorkMode,
    ];

    /// Column name in the source table.
    pub fn column(self) -> &'static str {
        match self {
            Attribute::Year => "ano",
            Attribute::Seniority => "senioridade",
            Attribute::ContractType => "contrato",
            Attribute::CompanySize => "tamanho_empresa",
            Attribute::WorkMode => "remoto",
        }
    }

    /// Human readable label for filter widgets.
    pub fn label(self) -> &'static str {
        match self {
            Attribute::Year => "Year",
            Attribute::Seniority => "Seniority",
            Attribute::ContractType => "Contract type",
            Attribute::CompanySize => "Company size",
            Attribute::WorkMode => "Work mode",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// FilterValue – a single admissible value of a filterable attribute
// ---------------------------------------------------------------------------

/// Years are integers, every other filterable column is categorical text.
/// Kept in `BTreeSet`s downstream, so the derived `Ord` fixes domain order:
/// integers numerically, text lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterValue {
    Integer(i64),
    Text(String),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Integer(i) => write!(f, "{i}"),
            FilterValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Integer(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

/// Sorted set of distinct values `attribute` takes across `records`.
pub fn distinct_values(records: &[Record], attribute: Attribute) -> BTreeSet<FilterValue> {
    records.iter().map(|r| r.value(attribute)).collect()
}

// ---------------------------------------------------------------------------
// SalaryDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed filter domains.
#[derive(Debug, Clone, Default)]
pub struct SalaryDataset {
    /// All records, in source order.
    pub records: Vec<Record>,
    /// For each filterable attribute the sorted set of distinct values.
    pub domains: BTreeMap<Attribute, BTreeSet<FilterValue>>,
}

impl SalaryDataset {
    /// Build filter domains from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let domains = Attribute::ALL
            .iter()
            .map(|&attr| (attr, distinct_values(&records, attr)))
            .collect();
        SalaryDataset { records, domains }
    }

    /// Domain of `attribute`; empty for an empty dataset.
    pub fn domain(&self, attribute: Attribute) -> &BTreeSet<FilterValue> {
        static EMPTY: BTreeSet<FilterValue> = BTreeSet::new();
        self.domains.get(&attribute).unwrap_or(&EMPTY)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
