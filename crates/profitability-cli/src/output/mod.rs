pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter. Shapes no renderer knows
/// are printed as JSON.
pub fn format_output(format: &OutputFormat, value: &Value) {
    let Some(report) = classify(value) else {
        print_json(value);
        return;
    };
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => table::print_table(&report, value),
        OutputFormat::Csv => csv_out::print_csv(&report),
        OutputFormat::Minimal => minimal::print_minimal(&report),
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("JSON serialization error: {e}"),
    }
}

/// Per-policy columns in waterfall order.
pub const DERIVED_COLUMNS: [&str; 35] = [
    "row",
    "tsi_local",
    "limit_local",
    "top_risk_local",
    "exposure_basis",
    "retained_exposure",
    "pool_amount",
    "facultative_amount",
    "own_retention_amount",
    "shortfall_amount",
    "pct_pool",
    "pct_facultative",
    "pct_own_retention",
    "pct_shortfall",
    "premium_100",
    "premium_cedant",
    "premium_pool",
    "premium_facultative",
    "premium_own_retention",
    "premium_shortfall",
    "cedant_retained_premium",
    "loss_basis",
    "loss_100",
    "loss_cedant",
    "loss_shortfall",
    "cedant_retained_loss",
    "loss_pool",
    "loss_facultative",
    "acquisition",
    "pool_commission",
    "facultative_commission",
    "excess_of_loss_cost",
    "expense",
    "result",
    "result_ratio",
];

/// Portfolio summary columns.
pub const SUMMARY_COLUMNS: [&str; 7] = [
    "label",
    "policies",
    "cedant_retained_premium",
    "result",
    "result_ratio",
    "shortfall_rows",
    "shortfall_amount",
];

/// What a command produced, judged from the envelope's `result`.
pub enum Report<'a> {
    /// `run`: per-coverage reports, failures and the portfolio summary.
    Book(&'a Map<String, Value>),
    /// `coverage`: derived rows plus the total row.
    Coverage(&'a Map<String, Value>),
    /// `rules`: one flat object per coverage.
    Rules(Vec<&'a Map<String, Value>>),
}

pub fn classify(value: &Value) -> Option<Report<'_>> {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);
    match result {
        Value::Object(map) if map.contains_key("summary") && map.contains_key("reports") => {
            Some(Report::Book(map))
        }
        Value::Object(map) if map.contains_key("rows") && map.contains_key("total") => {
            Some(Report::Coverage(map))
        }
        Value::Array(arr) => arr
            .iter()
            .map(Value::as_object)
            .collect::<Option<Vec<_>>>()
            .map(Report::Rules),
        _ => None,
    }
}

/// Plain text for a cell; decimal strings are left exactly as computed.
pub fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(cell).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Display text for a cell: decimals rounded to `dp` places, trailing zeros dropped.
pub fn rounded_cell(value: &Value, dp: u32) -> String {
    match value {
        Value::String(s) => match s.parse::<Decimal>() {
            Ok(d) => d.round_dp(dp).normalize().to_string(),
            Err(_) => s.clone(),
        },
        other => cell(other),
    }
}

/// Pick `columns` from an object, in order.
pub fn project(map: &Map<String, Value>, columns: &[&str]) -> Vec<String> {
    columns
        .iter()
        .map(|c| map.get(*c).map(cell).unwrap_or_default())
        .collect()
}
