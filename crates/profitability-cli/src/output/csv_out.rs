use serde_json::{Map, Value};
use std::io;

use super::{project, Report, DERIVED_COLUMNS, SUMMARY_COLUMNS};

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout, values at full precision.
///
/// A coverage run gives one line per policy plus a TOTAL line; a book run
/// gives the portfolio summary.
pub fn print_csv(report: &Report<'_>) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match report {
        Report::Coverage(report) => write_coverage(&mut wtr, report),
        Report::Book(book) => write_book(&mut wtr, book),
        Report::Rules(rows) => write_rules(&mut wtr, rows),
    }

    let _ = wtr.flush();
}

fn write_coverage(wtr: &mut StdoutWriter<'_>, report: &Map<String, Value>) {
    let _ = wtr.write_record(DERIVED_COLUMNS);
    if let Some(Value::Array(rows)) = report.get("rows") {
        for row in rows {
            if let Value::Object(row) = row {
                let _ = wtr.write_record(project(row, &DERIVED_COLUMNS));
            }
        }
    }
    if let Some(Value::Object(total)) = report.get("total") {
        let mut record = project(total, &DERIVED_COLUMNS);
        record[0] = "TOTAL".to_string();
        let _ = wtr.write_record(record);
    }
}

fn write_book(wtr: &mut StdoutWriter<'_>, book: &Map<String, Value>) {
    let _ = wtr.write_record(SUMMARY_COLUMNS);
    let Some(Value::Object(summary)) = book.get("summary") else {
        return;
    };
    if let Some(Value::Array(lines)) = summary.get("lines") {
        for line in lines {
            if let Value::Object(line) = line {
                let _ = wtr.write_record(project(line, &SUMMARY_COLUMNS));
            }
        }
    }
    if let Some(Value::Object(total)) = summary.get("grand_total") {
        let _ = wtr.write_record(project(total, &SUMMARY_COLUMNS));
    }
}

fn write_rules(wtr: &mut StdoutWriter<'_>, rows: &[&Map<String, Value>]) {
    let Some(first) = rows.first() else {
        return;
    };
    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);
    for row in rows {
        let _ = wtr.write_record(project(row, &headers));
    }
}
