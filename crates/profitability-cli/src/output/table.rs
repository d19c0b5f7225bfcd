use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{cell, rounded_cell, Report};

/// Columns shown per policy in table view; the full set is in csv/json.
const ROW_COLUMNS: [(&str, &str); 10] = [
    ("row", "Row"),
    ("exposure_basis", "Exposure Basis"),
    ("pool_amount", "Pool"),
    ("facultative_amount", "Facultative"),
    ("own_retention_amount", "Own Retention"),
    ("shortfall_amount", "Shortfall"),
    ("cedant_retained_premium", "Retained Premium"),
    ("cedant_retained_loss", "Retained Loss"),
    ("result", "Result"),
    ("result_ratio", "Result Ratio"),
];

const SUMMARY_HEADERS: [&str; 7] = [
    "Coverage",
    "Policies",
    "Retained Premium",
    "Result",
    "Result Ratio",
    "Shortfall Rows",
    "Shortfall Amount",
];

/// Format output as tables using the tabled crate. `value` is the envelope
/// the report was classified from; its warnings follow the table.
pub fn print_table(report: &Report<'_>, value: &Value) {
    match report {
        Report::Book(book) => print_book(book),
        Report::Coverage(report) => print_coverage(report),
        Report::Rules(rows) => print_rules(rows),
    }
    print_envelope_notes(value);
}

fn print_book(book: &Map<String, Value>) {
    if let Some(Value::Object(summary)) = book.get("summary") {
        let mut builder = Builder::default();
        builder.push_record(SUMMARY_HEADERS);
        if let Some(Value::Array(lines)) = summary.get("lines") {
            for line in lines {
                if let Value::Object(line) = line {
                    builder.push_record(summary_record(line));
                }
            }
        }
        if let Some(Value::Object(total)) = summary.get("grand_total") {
            builder.push_record(summary_record(total));
        }
        println!("{}", Table::from(builder));
    }

    if let Some(Value::Array(failures)) = book.get("failures") {
        if !failures.is_empty() {
            println!("\nRejected batches:");
            for f in failures {
                println!(
                    "  - {}: {}",
                    f.get("coverage").map(cell).unwrap_or_default(),
                    f.get("error").map(cell).unwrap_or_default()
                );
            }
        }
    }
}

fn summary_record(line: &Map<String, Value>) -> Vec<String> {
    super::SUMMARY_COLUMNS
        .iter()
        .map(|c| {
            let dp = if c.ends_with("ratio") { 4 } else { 2 };
            let cell = line.get(*c);
            cell.map(|v| rounded_cell(v, dp)).unwrap_or_default()
        })
        .collect()
}

fn print_coverage(report: &Map<String, Value>) {
    if let Some(Value::String(coverage)) = report.get("coverage") {
        println!("Coverage: {coverage}");
    }

    let mut builder = Builder::default();
    builder.push_record(ROW_COLUMNS.iter().map(|(_, header)| *header));
    if let Some(Value::Array(rows)) = report.get("rows") {
        for row in rows {
            if let Value::Object(row) = row {
                builder.push_record(row_record(row, None));
            }
        }
    }
    if let Some(Value::Object(total)) = report.get("total") {
        builder.push_record(row_record(total, Some("TOTAL")));
    }
    println!("{}", Table::from(builder));
}

fn row_record(row: &Map<String, Value>, label: Option<&str>) -> Vec<String> {
    ROW_COLUMNS
        .iter()
        .map(|(key, _)| match (*key, label) {
            ("row", Some(label)) => label.to_string(),
            (key, _) => {
                let dp = if key.ends_with("ratio") { 4 } else { 2 };
                let cell = row.get(key);
                cell.map(|v| rounded_cell(v, dp)).unwrap_or_default()
            }
        })
        .collect()
}

fn print_rules(rows: &[&Map<String, Value>]) {
    let Some(first) = rows.first() else {
        println!("(empty)");
        return;
    };

    let headers: Vec<&String> = first.keys().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(|h| h.as_str()));
    for row in rows {
        builder.push_record(headers.iter().map(|h| {
            row.get(h.as_str())
                .map(|v| rounded_cell(v, 6))
                .unwrap_or_default()
        }));
    }
    println!("{}", Table::from(builder));
}

fn print_envelope_notes(value: &Value) {
    let Some(envelope) = value.as_object() else {
        return;
    };

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {s}");
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {meth}");
    }
}
