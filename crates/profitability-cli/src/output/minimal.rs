use super::{cell, Report};

/// Print just the headline figures: result and result ratio of the whole run.
pub fn print_minimal(report: &Report<'_>) {
    let headline = match report {
        Report::Book(book) => book.get("summary").and_then(|s| s.get("grand_total")),
        Report::Coverage(report) => report.get("total"),
        Report::Rules(rows) => {
            println!("{}", rows.len());
            return;
        }
    };

    match headline {
        Some(total) => println!(
            "result: {}, result_ratio: {}",
            total.get("result").map(cell).unwrap_or_default(),
            total.get("result_ratio").map(cell).unwrap_or_default()
        ),
        None => println!("null"),
    }
}
