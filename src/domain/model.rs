use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

pub const TRANSACTION_ID: &str = "TransactionID";
pub const CUSTOMER_ID: &str = "CustomerID";
pub const REGION: &str = "Region";
pub const PRODUCT_NAME: &str = "ProductName";
pub const QUANTITY: &str = "Quantity";
pub const UNIT_PRICE: &str = "UnitPrice";

pub const REQUIRED_COLUMNS: [&str; 6] = [
    TRANSACTION_ID,
    CUSTOMER_ID,
    REGION,
    PRODUCT_NAME,
    QUANTITY,
    UNIT_PRICE,
];

/// One unvalidated input row. A field is `None` when its column is missing
/// from the header or the row is too short to hold it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawRecord<'a> {
    pub transaction_id: Option<&'a str>,
    pub customer_id: Option<&'a str>,
    pub region: Option<&'a str>,
    pub product_name: Option<&'a str>,
    pub quantity: Option<&'a str>,
    pub unit_price: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CleanRecord {
    pub transaction_id: String,
    pub customer_id: String,
    pub region: String,
    pub product_name: String,
    pub quantity: f64,
    pub unit_price: f64,
}

impl CleanRecord {
    pub fn amount(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    MissingCustomerId,
    MissingRegion,
    InvalidTransactionId,
    InvalidQuantity,
    InvalidUnitPrice,
    MalformedRow,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RejectReason::MissingCustomerId => "CustomerID is empty or missing",
            RejectReason::MissingRegion => "Region is empty or missing",
            RejectReason::InvalidTransactionId => "TransactionID does not start with 'T'",
            RejectReason::InvalidQuantity => "Quantity is not a positive number",
            RejectReason::InvalidUnitPrice => "UnitPrice is not a positive number",
            RejectReason::MalformedRow => "field count does not match the header",
        };
        f.write_str(text)
    }
}

/// Post-validation exclusions. These rows are valid but not wanted in this report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterReason {
    Region,
    Amount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    /// 1-based line number in the input, header included.
    pub line: u64,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTable {
    pub headers: Vec<String>,
    pub rows: Vec<SourceRow>,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub csv_output: Vec<u8>,
    pub summary: CleaningSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleaningSummary {
    pub total_input: usize,
    pub invalid: usize,
    pub invalid_by_reason: BTreeMap<RejectReason, usize>,
    pub filtered_by_region: usize,
    pub filtered_by_amount: usize,
    pub final_count: usize,
    pub generated_at: DateTime<Utc>,
}

impl Default for CleaningSummary {
    fn default() -> Self {
        Self {
            total_input: 0,
            invalid: 0,
            invalid_by_reason: BTreeMap::new(),
            filtered_by_region: 0,
            filtered_by_amount: 0,
            final_count: 0,
            generated_at: Utc::now(),
        }
    }
}

impl CleaningSummary {
    pub fn record_kept(&mut self) {
        self.total_input += 1;
        self.final_count += 1;
    }

    pub fn record_rejected(&mut self, reason: RejectReason) {
        self.total_input += 1;
        self.invalid += 1;
        *self.invalid_by_reason.entry(reason).or_insert(0) += 1;
    }

    pub fn record_filtered(&mut self, reason: FilterReason) {
        self.total_input += 1;
        match reason {
            FilterReason::Region => self.filtered_by_region += 1,
            FilterReason::Amount => self.filtered_by_amount += 1,
        }
    }

    pub fn removed(&self) -> usize {
        self.total_input - self.final_count
    }
}
