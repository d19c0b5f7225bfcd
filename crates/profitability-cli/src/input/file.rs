use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use profitability_core::engine::{BookInput, CoverageBatch};
use profitability_core::CoverageKind;
use tracing::{debug, warn};

/// Read a JSON file and deserialise into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    Ok(value)
}

/// Read a YAML file. JSON files parse too, YAML being a superset.
pub fn read_yaml<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let value: T = serde_yaml::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    Ok(value)
}

/// Read every row of a headed CSV file. Blank cells deserialise as absent.
///
/// Cells reach serde as text, so decimal amounts keep every digit instead of
/// passing through `f64`.
pub fn read_csv<T: DeserializeOwned>(path: &str) -> Result<Vec<T>, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    read_csv_file(&canonical)
}

fn read_csv_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, Box<dyn std::error::Error>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    let headers = reader
        .headers()
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?
        .clone();

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record =
            record.map_err(|e| format!("Failed to parse '{}' row {}: {}", path.display(), i, e))?;
        let cells: Map<String, Value> = headers
            .iter()
            .zip(record.iter())
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(header, cell)| (header.to_string(), Value::String(cell.to_string())))
            .collect();
        let row: T = serde_json::from_value(Value::Object(cells))
            .map_err(|e| format!("Failed to parse '{}' row {}: {}", path.display(), i, e))?;
        rows.push(row);
    }
    debug!(path = %path.display(), rows = rows.len(), "read csv");
    Ok(rows)
}

/// Build a book from `<COVERAGE IDENTIFIER>.csv` files in a directory.
///
/// Coverages without a file are skipped; a directory with none is an error.
pub fn read_csv_dir(dir: &str) -> Result<BookInput, Box<dyn std::error::Error>> {
    let root = Path::new(dir);
    if !root.is_dir() {
        return Err(format!("Not a directory: {}", root.display()).into());
    }

    let mut batches = Vec::new();
    for kind in CoverageKind::ALL {
        let path = root.join(format!("{}.csv", kind.identifier()));
        if !path.is_file() {
            warn!(coverage = %kind, path = %path.display(), "no csv for coverage, skipping");
            continue;
        }
        batches.push(CoverageBatch {
            coverage: kind.identifier().to_string(),
            policies: read_csv_file(&path)?,
        });
    }

    if batches.is_empty() {
        return Err(format!("No coverage CSV files found in {}", root.display()).into());
    }
    Ok(BookInput { batches })
}

pub fn is_csv(path: &str) -> bool {
    Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Resolve against the working directory and require an existing file.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}
