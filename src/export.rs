//! CSV report export of a visible record set.

use crate::error::Result;
use crate::transaction::TransactionRecord;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use log::info;
use std::io::Write;

/// Default name of the downloadable report.
pub const REPORT_FILE_NAME: &str = "transactions_report.csv";

/// Report columns, in display-table order.
pub const HEADER: [&str; 12] = [
    "ID",
    "Date",
    "Customer",
    "Gross",
    "Posted",
    "Advertising Fee",
    "Cashback Status",
    "Platform Fee",
    "Store",
    "Post Reach",
    "Net",
    "Status",
];

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Formats one record as report fields.
pub fn report_row(record: &TransactionRecord) -> [String; 12] {
    [
        record.id().to_string(),
        record.occurred_at().format(DATE_FORMAT).to_string(),
        record.customer().to_string(),
        record.gross().to_string(),
        if record.is_posted() { "Yes" } else { "No" }.to_string(),
        record.advertising_fee().to_string(),
        record.cashback().label().to_string(),
        record.platform_fee().to_string(),
        record.store().to_string(),
        record.post_reach().to_string(),
        record.net_amount().to_string(),
        record.status().label().to_string(),
    ]
}

/// Writes the header and one row per record, in the given order.
///
/// Every field is double-quoted, with embedded quotes doubled, and rows end
/// with `\n`.
pub fn write_csv<'a, W, I>(writer: W, records: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    let mut csv_writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record(HEADER)?;

    let mut rows = 0;
    for record in records {
        csv_writer.write_record(report_row(record))?;
        rows += 1;
    }

    csv_writer.flush()?;
    info!("Exported {} transaction rows", rows);
    Ok(rows)
}

/// Builds the whole report in memory.
pub fn export_to_string<'a, I>(records: I) -> Result<String>
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    let mut buffer = Vec::new();
    write_csv(&mut buffer, records)?;
    Ok(String::from_utf8(buffer)?)
}
