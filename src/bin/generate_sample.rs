use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// One generated row, using the dashboard's input column names.
#[derive(Debug, Serialize)]
struct SampleRow {
    ano: i64,
    senioridade: &'static str,
    contrato: &'static str,
    tamanho_empresa: &'static str,
    remoto: &'static str,
    cargo: &'static str,
    residencia: &'static str,
    usd: f64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Pick from `(item, weight)` pairs.
    fn weighted<T: Copy>(&mut self, items: &[(T, f64)]) -> T {
        let total: f64 = items.iter().map(|&(_, w)| w).sum();
        let mut target = self.next_f64() * total;
        for &(item, weight) in items {
            if target < weight {
                return item;
            }
            target -= weight;
        }
        items[items.len() - 1].0
    }
}

// (label, salary multiplier, weight)
const SENIORITY: [(&str, f64, f64); 4] = [
    ("junior", 0.55, 0.15),
    ("pleno", 0.8, 0.25),
    ("senior", 1.1, 0.5),
    ("executivo", 1.5, 0.1),
];

// (role, base salary USD, weight)
const ROLES: [(&str, f64, f64); 8] = [
    ("Data Scientist", 140_000.0, 0.25),
    ("Data Engineer", 145_000.0, 0.22),
    ("Data Analyst", 100_000.0, 0.2),
    ("Machine Learning Engineer", 170_000.0, 0.15),
    ("Analytics Engineer", 150_000.0, 0.06),
    ("Research Scientist", 180_000.0, 0.05),
    ("Data Architect", 160_000.0, 0.04),
    ("BI Developer", 95_000.0, 0.03),
];

// (alpha-2 code, salary multiplier, weight); XK has no ISO 3166-1 entry
const COUNTRIES: [(&str, f64, f64); 9] = [
    ("US", 1.0, 0.7),
    ("CA", 0.8, 0.06),
    ("GB", 0.6, 0.06),
    ("DE", 0.6, 0.04),
    ("ES", 0.45, 0.03),
    ("IN", 0.25, 0.03),
    ("BR", 0.3, 0.03),
    ("FR", 0.55, 0.03),
    ("XK", 0.3, 0.02),
];

// (value, weight)
const YEARS: [(i64, f64); 5] = [
    (2020, 0.1),
    (2021, 0.15),
    (2022, 0.25),
    (2023, 0.3),
    (2024, 0.2),
];
const CONTRACTS: [(&str, f64); 4] = [
    ("integral", 0.95),
    ("contrato", 0.02),
    ("parcial", 0.02),
    ("freelancer", 0.01),
];
const COMPANY_SIZES: [(&str, f64); 3] = [("pequena", 0.1), ("media", 0.75), ("grande", 0.15)];
const WORK_MODES: [(&str, f64); 3] = [("presencial", 0.55), ("remoto", 0.35), ("hibrido", 0.1)];

fn generate_rows(n: usize, rng: &mut SimpleRng) -> Vec<SampleRow> {
    let seniority: Vec<((&str, f64), f64)> = SENIORITY
        .iter()
        .map(|&(s, m, w)| ((s, m), w))
        .collect();
    let roles: Vec<((&str, f64), f64)> = ROLES.iter().map(|&(r, b, w)| ((r, b), w)).collect();
    let countries: Vec<((&str, f64), f64)> = COUNTRIES
        .iter()
        .map(|&(c, m, w)| ((c, m), w))
        .collect();

    (0..n)
        .map(|_| {
            let (senioridade, level) = rng.weighted(&seniority);
            let (cargo, base) = rng.weighted(&roles);
            let (residencia, local) = rng.weighted(&countries);
            let usd = (base * level * local * rng.gauss(1.0, 0.15).max(0.3)).round();
            SampleRow {
                ano: rng.weighted(&YEARS),
                senioridade,
                contrato: rng.weighted(&CONTRACTS),
                tamanho_empresa: rng.weighted(&COMPANY_SIZES),
                remoto: rng.weighted(&WORK_MODES),
                cargo,
                residencia,
                usd,
            }
        })
        .collect()
}

fn to_batch(rows: &[SampleRow]) -> Result<RecordBatch> {
    let text = |f: fn(&SampleRow) -> &'static str| -> StringArray {
        StringArray::from(rows.iter().map(f).collect::<Vec<_>>())
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("ano", DataType::Int64, false),
        Field::new("senioridade", DataType::Utf8, false),
        Field::new("contrato", DataType::Utf8, false),
        Field::new("tamanho_empresa", DataType::Utf8, false),
        Field::new("remoto", DataType::Utf8, false),
        Field::new("cargo", DataType::Utf8, false),
        Field::new("residencia", DataType::Utf8, false),
        Field::new("usd", DataType::Float64, false),
    ]));

    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(rows.iter().map(|r| r.ano).collect::<Vec<_>>())),
            Arc::new(text(|r| r.senioridade)),
            Arc::new(text(|r| r.contrato)),
            Arc::new(text(|r| r.tamanho_empresa)),
            Arc::new(text(|r| r.remoto)),
            Arc::new(text(|r| r.cargo)),
            Arc::new(text(|r| r.residencia)),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.usd).collect::<Vec<_>>())),
        ],
    )
    .context("building record batch")
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(2_000, &mut rng);

    // Write CSV
    let csv_path = "sample_salaries.csv";
    let mut writer = csv::Writer::from_path(csv_path).context("creating CSV file")?;
    for row in &rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;

    // Write Parquet
    let batch = to_batch(&rows)?;
    let parquet_path = "sample_salaries.parquet";
    let file = std::fs::File::create(parquet_path).context("creating parquet file")?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;

    log::info!("Preview:\n{}", pretty_format_batches(&[batch.slice(0, 5)])?);
    println!("Wrote {} salary records to {csv_path} and {parquet_path}", rows.len());
    Ok(())
}
