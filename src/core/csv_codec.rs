use crate::domain::cleaner::format_price;
use crate::domain::model::{
    CleanRecord, RawRecord, SourceRow, SourceTable, CUSTOMER_ID, PRODUCT_NAME, QUANTITY, REGION,
    TRANSACTION_ID, UNIT_PRICE,
};
use crate::utils::error::{EtlError, Result};
use std::io::{Read, Write};

const UTF8_BOM: char = '\u{feff}';

/// Read a delimited file with a header row into memory.
///
/// Rows whose length differs from the header are kept as-is so the cleaner
/// can reject them individually instead of failing the whole file.
pub fn read_table<R: Read>(reader: R, delimiter: u8) -> Result<SourceTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut headers: Vec<String> = rdr.byte_headers()?.iter().map(decode_field).collect();
    if let Some(first) = headers.first_mut() {
        if first.starts_with(UTF8_BOM) {
            *first = first.trim_start_matches(UTF8_BOM).to_string();
        }
    }
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(EtlError::ProcessingError {
            message: "input has no header row".to_string(),
        });
    }

    let mut rows = Vec::new();
    for record in rdr.byte_records() {
        let record = record?;

        // 只有空白的行直接略過
        if record.len() == 1 && decode_field(&record[0]).trim().is_empty() {
            continue;
        }

        let line = record.position().map(|p| p.line()).unwrap_or(0);
        rows.push(SourceRow {
            line,
            fields: record.iter().map(decode_field).collect(),
        });
    }

    tracing::debug!("Read {} data rows with {} columns", rows.len(), headers.len());
    Ok(SourceTable { headers, rows })
}

/// UTF-8 first, Latin-1 as the fallback for legacy exports.
pub fn decode_field(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

pub fn write_table<'a, W, I>(writer: W, headers: &[String], rows: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Vec<String>>,
{
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(headers)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Header positions of the columns the cleaner cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    width: usize,
    transaction_id: Option<usize>,
    customer_id: Option<usize>,
    region: Option<usize>,
    product_name: Option<usize>,
    quantity: Option<usize>,
    unit_price: Option<usize>,
}

impl ColumnLayout {
    pub fn from_headers(headers: &[String]) -> Self {
        let find = |name: &str| headers.iter().position(|h| h == name);
        Self {
            width: headers.len(),
            transaction_id: find(TRANSACTION_ID),
            customer_id: find(CUSTOMER_ID),
            region: find(REGION),
            product_name: find(PRODUCT_NAME),
            quantity: find(QUANTITY),
            unit_price: find(UNIT_PRICE),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn missing_columns(&self) -> Vec<&'static str> {
        [
            (TRANSACTION_ID, self.transaction_id),
            (CUSTOMER_ID, self.customer_id),
            (REGION, self.region),
            (PRODUCT_NAME, self.product_name),
            (QUANTITY, self.quantity),
            (UNIT_PRICE, self.unit_price),
        ]
        .into_iter()
        .filter(|(_, idx)| idx.is_none())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn raw_record<'a>(&self, fields: &'a [String]) -> RawRecord<'a> {
        let get = |idx: Option<usize>| idx.and_then(|i| fields.get(i)).map(String::as_str);
        RawRecord {
            transaction_id: get(self.transaction_id),
            customer_id: get(self.customer_id),
            region: get(self.region),
            product_name: get(self.product_name),
            quantity: get(self.quantity),
            unit_price: get(self.unit_price),
        }
    }

    /// Write the normalized cells back into the source row; other cells are untouched.
    pub fn apply(&self, fields: &mut [String], record: &CleanRecord) {
        if let Some(cell) = self.product_name.and_then(|i| fields.get_mut(i)) {
            cell.clone_from(&record.product_name);
        }
        if let Some(cell) = self.unit_price.and_then(|i| fields.get_mut(i)) {
            *cell = format_price(record.unit_price);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_read_pipe_delimited_with_bom() {
        let data = "\u{feff}TransactionID|CustomerID|Region\nT1|C1|North\n\nT2|C2|South\n";
        let table = read_table(data.as_bytes(), b'|').unwrap();

        assert_eq!(table.headers, headers(&["TransactionID", "CustomerID", "Region"]));
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].fields, headers(&["T1", "C1", "North"]));
        assert_eq!(table.rows[0].line, 2);
        assert_eq!(table.rows[1].fields[0], "T2");
    }

    #[test]
    fn test_read_keeps_short_rows() {
        let data = "a,b,c\n1,2,3\n4,5\n";
        let table = read_table(data.as_bytes(), b',').unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].fields.len(), 2);
    }

    #[test]
    fn test_empty_input_has_no_header() {
        let err = read_table(&b""[..], b',').unwrap_err();
        assert!(matches!(err, EtlError::ProcessingError { .. }));
    }

    #[test]
    fn test_latin1_fallback() {
        assert_eq!(decode_field(b"Caf\xe9"), "Café");
        assert_eq!(decode_field("Café".as_bytes()), "Café");
    }

    #[test]
    fn test_quoted_commas_survive_read() {
        let data = "ProductName,UnitPrice\n\"Mouse, Wireless\",\"1,916\"\n";
        let table = read_table(data.as_bytes(), b',').unwrap();
        assert_eq!(table.rows[0].fields, headers(&["Mouse, Wireless", "1,916"]));
    }

    #[test]
    fn test_layout_lookup_and_missing_columns() {
        let layout = ColumnLayout::from_headers(&headers(&[
            "Date",
            "TransactionID",
            "CustomerID",
            "ProductName",
        ]));
        assert_eq!(layout.width(), 4);
        assert_eq!(
            layout.missing_columns(),
            vec![REGION, QUANTITY, UNIT_PRICE]
        );

        let fields = headers(&["2024-01-01", "T1", "C1", "Pen"]);
        let raw = layout.raw_record(&fields);
        assert_eq!(raw.transaction_id, Some("T1"));
        assert_eq!(raw.customer_id, Some("C1"));
        assert_eq!(raw.region, None);
        assert_eq!(raw.product_name, Some("Pen"));
    }

    #[test]
    fn test_apply_rewrites_only_normalized_cells() {
        let layout = ColumnLayout::from_headers(&headers(&[
            "TransactionID",
            "ProductName",
            "Quantity",
            "UnitPrice",
        ]));
        let mut fields = headers(&["T1", "Mouse, Wireless", "03", "1,916"]);
        let record = CleanRecord {
            transaction_id: "T1".to_string(),
            customer_id: "C1".to_string(),
            region: "US".to_string(),
            product_name: "Mouse Wireless".to_string(),
            quantity: 3.0,
            unit_price: 1916.0,
        };

        layout.apply(&mut fields, &record);
        assert_eq!(fields, headers(&["T1", "Mouse Wireless", "03", "1916.0"]));
    }

    #[test]
    fn test_write_table() {
        let mut out = Vec::new();
        let rows = vec![headers(&["T1", "Pad Soft"])];
        write_table(&mut out, &headers(&["TransactionID", "ProductName"]), &rows).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "TransactionID,ProductName\nT1,Pad Soft\n"
        );
    }
}
