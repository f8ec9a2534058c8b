//! Dataset loader — reads the patient-encounter CSV once at startup
//! into an immutable in-memory table.
//!
//! Coercion policy: every row's Age, Billing Amount and Date of Admission
//! must parse, or the whole load fails with the offending CSV line. A
//! partially loaded table would skew every statistic downstream, so there
//! is no row-drop recovery path.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Columns the loader requires. Extra columns in the file are ignored.
const REQUIRED_COLUMNS: [&str; 6] = [
    "Gender",
    "Age",
    "Medical Condition",
    "Billing Amount",
    "Date of Admission",
    "Insurance Provider",
];

/// Date shapes accepted for Date of Admission.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot open dataset {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("dataset is missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("line {line}: invalid {column} value '{value}'")]
    Coercion {
        line: usize,
        column: &'static str,
        value: String,
    },
    #[error("failed to read dataset: {0}")]
    Csv(#[from] csv::Error),
}

// ═══════════════════════════════════════════════════════════
// Row and grouping-key types
// ═══════════════════════════════════════════════════════════

/// Calendar (year, month) grouping key derived from the admission date.
/// Used only for trend aggregation, never shown as a raw date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// One patient-encounter row, fully coerced at load time.
#[derive(Debug, Clone, Serialize)]
pub struct Encounter {
    pub gender: String,
    pub age: u32,
    pub condition: String,
    pub billing_amount: f64,
    pub admission_date: NaiveDate,
    pub insurance_provider: String,
    pub admission_month: YearMonth,
}

/// Raw CSV row as read from the file, before coercion.
#[derive(Debug, Deserialize)]
struct RawEncounter {
    #[serde(rename = "Gender")]
    gender: String,
    #[serde(rename = "Age")]
    age: String,
    #[serde(rename = "Medical Condition")]
    condition: String,
    #[serde(rename = "Billing Amount")]
    billing_amount: String,
    #[serde(rename = "Date of Admission")]
    admission_date: String,
    #[serde(rename = "Insurance Provider")]
    insurance_provider: String,
}

// ═══════════════════════════════════════════════════════════
// Dataset — the immutable record table
// ═══════════════════════════════════════════════════════════

/// Billing Amount summary used to seed the ceiling slider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BillingStats {
    pub min: f64,
    pub median: f64,
    pub max: f64,
}

/// The in-memory record table. Loaded once, never mutated; every
/// derivation borrows the rows and allocates its own output.
#[derive(Debug)]
pub struct Dataset {
    rows: Vec<Encounter>,
}

impl Dataset {
    pub fn new(rows: Vec<Encounter>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Encounter] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct Gender values, sorted, in observed spelling.
    pub fn genders(&self) -> Vec<String> {
        let mut values: Vec<String> = self.rows.iter().map(|r| r.gender.clone()).collect();
        values.sort();
        values.dedup();
        values
    }

    /// Distinct Medical Condition values, sorted.
    pub fn conditions(&self) -> Vec<String> {
        let mut values: Vec<String> = self.rows.iter().map(|r| r.condition.clone()).collect();
        values.sort();
        values.dedup();
        values
    }

    /// Billing Amount min / median / max. All zeros for an empty table.
    pub fn billing_stats(&self) -> BillingStats {
        if self.rows.is_empty() {
            return BillingStats {
                min: 0.0,
                median: 0.0,
                max: 0.0,
            };
        }

        let mut amounts: Vec<f64> = self.rows.iter().map(|r| r.billing_amount).collect();
        amounts.sort_by(f64::total_cmp);

        let mid = amounts.len() / 2;
        let median = if amounts.len() % 2 == 0 {
            (amounts[mid - 1] + amounts[mid]) / 2.0
        } else {
            amounts[mid]
        };

        BillingStats {
            min: amounts[0],
            median,
            max: amounts[amounts.len() - 1],
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Loading
// ═══════════════════════════════════════════════════════════

/// Load the record table from a CSV file. Any unparsable Age, Billing
/// Amount or Date of Admission value fails the whole load.
pub fn load_dataset(path: &Path) -> Result<Dataset, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn(column));
        }
    }

    let mut rows = Vec::new();
    for (index, result) in reader.deserialize::<RawEncounter>().enumerate() {
        let raw = result?;
        // Header occupies line 1; data starts on line 2.
        let line = index + 2;
        rows.push(coerce_row(raw, line)?);
    }

    tracing::info!(path = %path.display(), rows = rows.len(), "dataset loaded");
    Ok(Dataset::new(rows))
}

fn coerce_row(raw: RawEncounter, line: usize) -> Result<Encounter, LoadError> {
    let age: u32 = raw
        .age
        .trim()
        .parse()
        .map_err(|_| LoadError::Coercion {
            line,
            column: "Age",
            value: raw.age.clone(),
        })?;

    let billing_amount: f64 = raw
        .billing_amount
        .trim()
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| LoadError::Coercion {
            line,
            column: "Billing Amount",
            value: raw.billing_amount.clone(),
        })?;

    let admission_date = parse_admission_date(raw.admission_date.trim()).ok_or_else(|| {
        LoadError::Coercion {
            line,
            column: "Date of Admission",
            value: raw.admission_date.clone(),
        }
    })?;

    Ok(Encounter {
        gender: raw.gender,
        age,
        condition: raw.condition,
        billing_amount,
        admission_date,
        insurance_provider: raw.insurance_provider,
        admission_month: YearMonth::of(admission_date),
    })
}

fn parse_admission_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}
