use crate::core::csv_codec::{read_table, write_table, ColumnLayout};
use crate::domain::cleaner::{clean, RowFilter};
use crate::domain::model::{CleaningSummary, RejectReason, SourceTable};
use crate::utils::error::Result;
use std::io::{Read, Write};

#[derive(Debug, Clone, PartialEq)]
pub struct CleanOptions {
    pub delimiter: u8,
    pub filter: RowFilter,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            filter: RowFilter::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Run every row through the cleaner and the optional filters, keeping input order.
pub fn clean_table(table: SourceTable, filter: &RowFilter) -> (CleanedTable, CleaningSummary) {
    let layout = ColumnLayout::from_headers(&table.headers);
    let missing = layout.missing_columns();
    if !missing.is_empty() {
        tracing::warn!(
            "⚠️ Input is missing column(s) {}, affected rows will be dropped",
            missing.join(", ")
        );
    }

    let mut summary = CleaningSummary::default();
    let mut rows = Vec::with_capacity(table.rows.len());

    for row in table.rows {
        if row.fields.len() != layout.width() {
            tracing::debug!(
                line = row.line,
                fields = row.fields.len(),
                "Dropping row: {}",
                RejectReason::MalformedRow
            );
            summary.record_rejected(RejectReason::MalformedRow);
            continue;
        }

        let record = match clean(&layout.raw_record(&row.fields)) {
            Ok(record) => record,
            Err(reason) => {
                tracing::debug!(line = row.line, "Dropping row: {}", reason);
                summary.record_rejected(reason);
                continue;
            }
        };

        if let Err(reason) = filter.check(&record) {
            tracing::debug!(line = row.line, ?reason, "Filtered out row {}", record.transaction_id);
            summary.record_filtered(reason);
            continue;
        }

        let mut fields = row.fields;
        layout.apply(&mut fields, &record);
        rows.push(fields);
        summary.record_kept();
    }

    (
        CleanedTable {
            headers: table.headers,
            rows,
        },
        summary,
    )
}

/// Clean a whole CSV stream: read from `reader`, write kept rows to `writer`.
pub fn clean_csv<R: Read, W: Write>(
    reader: R,
    writer: W,
    options: &CleanOptions,
) -> Result<CleaningSummary> {
    let table = read_table(reader, options.delimiter)?;
    let (cleaned, summary) = clean_table(table, &options.filter);
    write_table(writer, &cleaned.headers, &cleaned.rows)?;
    Ok(summary)
}
