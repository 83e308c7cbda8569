//! Row-level validation and normalization for sales records.

use crate::domain::model::{CleanRecord, FilterReason, RawRecord, RejectReason};

/// Validate one input row and return its normalized form.
///
/// Predicates run in a fixed order and the first failure wins, which makes
/// the reported reason deterministic. Only `ProductName` and `UnitPrice` are
/// rewritten; every other field is carried through as read.
pub fn clean(raw: &RawRecord<'_>) -> Result<CleanRecord, RejectReason> {
    let customer_id = non_empty(raw.customer_id).ok_or(RejectReason::MissingCustomerId)?;
    let region = non_empty(raw.region).ok_or(RejectReason::MissingRegion)?;

    let transaction_id = raw
        .transaction_id
        .filter(|id| id.starts_with('T'))
        .ok_or(RejectReason::InvalidTransactionId)?;

    let product_name = normalize_product_name(raw.product_name.unwrap_or_default());

    let quantity = raw
        .quantity
        .and_then(parse_positive)
        .ok_or(RejectReason::InvalidQuantity)?;

    let unit_price = raw
        .unit_price
        .map(normalize_unit_price)
        .as_deref()
        .and_then(parse_positive)
        .ok_or(RejectReason::InvalidUnitPrice)?;

    Ok(CleanRecord {
        transaction_id: transaction_id.to_string(),
        customer_id: customer_id.to_string(),
        region: region.to_string(),
        product_name,
        quantity,
        unit_price,
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// `"Mouse, Wireless"` becomes `"Mouse Wireless"`.
pub fn normalize_product_name(name: &str) -> String {
    name.replace(',', "")
}

/// Commas in prices are thousands separators: `"1,916"` becomes `"1916"`.
pub fn normalize_unit_price(price: &str) -> String {
    price.replace(',', "")
}

/// Surrounding whitespace is ignored; NaN and infinities count as unparseable.
pub fn parse_positive(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// Renders a price the way downstream reports expect it: always with a
/// decimal part, so `1916` is written as `1916.0`.
pub fn format_price(value: f64) -> String {
    format!("{:?}", value)
}

/// Optional filters applied to rows that already passed [`clean`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowFilter {
    pub region: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}

impl RowFilter {
    pub fn is_empty(&self) -> bool {
        self.region.is_none() && self.min_amount.is_none() && self.max_amount.is_none()
    }

    pub fn check(&self, record: &CleanRecord) -> Result<(), FilterReason> {
        if let Some(region) = &self.region {
            if record.region != *region {
                return Err(FilterReason::Region);
            }
        }

        let amount = record.amount();
        if self.min_amount.is_some_and(|min| amount < min)
            || self.max_amount.is_some_and(|max| amount > max)
        {
            return Err(FilterReason::Amount);
        }

        Ok(())
    }
}
