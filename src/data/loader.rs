use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::error::DatasetError;
use super::model::{Record, SalaryDataset};

/// Public salary survey used when no source is given.
pub const DEFAULT_DATASET_URL: &str = "https://raw.githubusercontent.com/vqrca/dashboard_salarios_dados/refs/heads/main/dados-imersao-final.csv";

/// Rows per Arrow record batch when reading Parquet.
const PARQUET_BATCH_SIZE: usize = 8192;

/// Columns every source must provide. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "ano",
    "senioridade",
    "contrato",
    "tamanho_empresa",
    "remoto",
    "cargo",
    "residencia",
    "usd",
];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a dataset from an `http(s)://` URL or a local file path.
pub fn load_source(source: &str) -> Result<SalaryDataset> {
    if is_url(source) {
        load_url(source)
    } else {
        load_file(Path::new(source))
    }
}

pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Fetch a CSV resource over HTTP. Blocking; called once per load.
pub fn load_url(url: &str) -> Result<SalaryDataset> {
    log::info!("Fetching dataset from {url}");
    let response = reqwest::blocking::get(url)
        .with_context(|| format!("requesting {url}"))?
        .error_for_status()
        .with_context(|| format!("fetching {url}"))?;
    let body = response.bytes().context("reading response body")?;
    parse_csv(body.as_ref())
}

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the salary columns
/// * `.json`    – `[{ "ano": 2023, "cargo": "...", ... }, ...]`
/// * `.parquet` – one column per salary field
pub fn load_file(path: &Path) -> Result<SalaryDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            parse_csv(file)
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            parse_json(&text)
        }
        "parquet" | "pq" => load_parquet(path, PARQUET_BATCH_SIZE),
        _ => Err(DatasetError::UnsupportedSource(path.display().to_string()).into()),
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

pub fn parse_csv<R: Read>(input: R) -> Result<SalaryDataset> {
    let mut reader = csv::Reader::from_reader(input);
    let headers = reader.headers().context("reading CSV headers")?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DatasetError::MissingColumn(column.to_string()).into());
        }
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<Record>().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(record);
    }
    finish(records)
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Records-oriented JSON, as written by `df.to_json(orient='records')`.
pub fn parse_json(text: &str) -> Result<SalaryDataset> {
    let records: Vec<Record> = serde_json::from_str(text).context("parsing JSON records")?;
    finish(records)
}

fn finish(records: Vec<Record>) -> Result<SalaryDataset> {
    for (row, record) in records.iter().enumerate() {
        if !record.salary_usd.is_finite() || record.salary_usd < 0.0 {
            return Err(DatasetError::InvalidValue {
                row,
                column: "usd".to_string(),
                value: record.salary_usd.to_string(),
            }
            .into());
        }
    }
    Ok(SalaryDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per salary field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path, batch_size: usize) -> Result<SalaryDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?
        .with_batch_size(batch_size);
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let offset = records.len();
        records.extend(batch_records(&batch, offset)?);
    }
    finish(records)
}

/// Convert one record batch. `offset` is the global index of its first row.
fn batch_records(batch: &RecordBatch, offset: usize) -> Result<Vec<Record>> {
    let year = column(batch, "ano")?;
    let seniority = column(batch, "senioridade")?;
    let contract = column(batch, "contrato")?;
    let size = column(batch, "tamanho_empresa")?;
    let remote = column(batch, "remoto")?;
    let role = column(batch, "cargo")?;
    let residence = column(batch, "residencia")?;
    let usd = column(batch, "usd")?;

    (0..batch.num_rows())
        .map(|row| {
            let at = offset + row;
            Ok(Record {
                year: integer_at(year, "ano", at, row)?,
                seniority: string_at(seniority, "senioridade", at, row)?,
                contract_type: string_at(contract, "contrato", at, row)?,
                company_size: string_at(size, "tamanho_empresa", at, row)?,
                work_mode: string_at(remote, "remoto", at, row)?,
                role: string_at(role, "cargo", at, row)?,
                country_of_residence: string_at(residence, "residencia", at, row)?,
                salary_usd: float_at(usd, "usd", at, row)?,
            })
        })
        .collect()
}

// -- Arrow helpers --

fn column<'b>(batch: &'b RecordBatch, name: &str) -> Result<&'b Arc<dyn Array>> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| DatasetError::MissingColumn(name.to_string()))?;
    Ok(batch.column(idx))
}

fn null_value(name: &str, at: usize) -> anyhow::Error {
    DatasetError::InvalidValue {
        row: at,
        column: name.to_string(),
        value: "<null>".to_string(),
    }
    .into()
}

fn unsupported(col: &Arc<dyn Array>, name: &str) -> anyhow::Error {
    DatasetError::UnsupportedColumnType {
        column: name.to_string(),
        data_type: format!("{:?}", col.data_type()),
    }
    .into()
}

fn string_at(col: &Arc<dyn Array>, name: &str, at: usize, row: usize) -> Result<String> {
    if col.is_null(row) {
        return Err(null_value(name, at));
    }
    match col.data_type() {
        DataType::Utf8 => Ok(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        _ => Err(unsupported(col, name)),
    }
}

fn integer_at(col: &Arc<dyn Array>, name: &str, at: usize, row: usize) -> Result<i64> {
    if col.is_null(row) {
        return Err(null_value(name, at));
    }
    match col.data_type() {
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            Ok(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            Ok(arr.value(row))
        }
        _ => Err(unsupported(col, name)),
    }
}

fn float_at(col: &Arc<dyn Array>, name: &str, at: usize, row: usize) -> Result<f64> {
    if col.is_null(row) {
        return Err(null_value(name, at));
    }
    match col.data_type() {
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            Ok(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            Ok(arr.value(row) as f64)
        }
        DataType::Int32 | DataType::Int64 => integer_at(col, name, at, row).map(|v| v as f64),
        _ => Err(unsupported(col, name)),
    }
}
