//! Record shapes returned by the backend.
//!
//! Numeric fields are read leniently: a JSON number, a numeric string, `null`
//! or a missing field are all accepted, and anything that is not a number
//! counts as zero. Names are read the same way: `null` or a non-string value
//! becomes an empty name, which matches no participant.

use super::error::LedgerError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Parses a user supplied amount.
pub fn parse_amount(raw: &str) -> Result<Decimal, LedgerError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::InvalidAmount(raw.to_string()));
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| LedgerError::InvalidAmount(raw.to_string()))
}

/// Parses a `YYYY-MM-DD` date, also accepting a full ISO timestamp.
pub fn parse_date(raw: &str) -> Result<NaiveDate, LedgerError> {
    let trimmed = raw.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|_| LedgerError::InvalidDate(raw.to_string()))
}

fn amount_from_json(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .ok()
            .or_else(|| n.as_f64().and_then(Decimal::from_f64)),
        Value::String(s) => parse_amount(s).ok(),
        _ => None,
    }
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(amount_from_json)
        .unwrap_or(Decimal::ZERO))
}

fn integer_from_json(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_integer<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64> + Default,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(integer_from_json)
        .and_then(|n| T::try_from(n).ok())
        .unwrap_or_default())
}

fn lenient_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(name)) => Ok(name),
        _ => Ok(String::new()),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueRecord {
    #[serde(default, deserialize_with = "lenient_name")]
    pub received_by: String,
    #[serde(
        default,
        deserialize_with = "lenient_amount",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub revenue_amount: Decimal,
    pub transaction_date: Option<String>,
    pub vehicle_number: Option<String>,
    pub vehicle_description: Option<String>,
    pub transaction_mode: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    #[serde(default, deserialize_with = "lenient_name")]
    pub spent_by: String,
    #[serde(
        default,
        deserialize_with = "lenient_amount",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub amount: Decimal,
    pub transaction_date: Option<String>,
    pub expense_type: Option<String>,
    pub description: Option<String>,
    pub transaction_mode: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Take-home snapshot for a month.
    Normal,
    /// One leg of a cash movement between partners.
    Transfer,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheetEntry {
    #[serde(default, deserialize_with = "lenient_name")]
    pub user_name: String,
    #[serde(
        default,
        deserialize_with = "lenient_amount",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub amount: Decimal,
    #[serde(default, deserialize_with = "lenient_integer")]
    pub month: u32,
    #[serde(default, deserialize_with = "lenient_integer")]
    pub year: i32,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntryKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl BalanceSheetEntry {
    /// Rows without a type predate transfers and count as take-home rows.
    pub fn is_take_home(&self) -> bool {
        matches!(self.kind, None | Some(EntryKind::Normal))
    }

    pub fn is_transfer(&self) -> bool {
        self.kind == Some(EntryKind::Transfer)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceRecord {
    #[serde(
        default,
        deserialize_with = "lenient_amount",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub advance_amount: Decimal,
    #[serde(
        default,
        deserialize_with = "lenient_amount",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub advance_refund: Decimal,
    pub start_date: Option<String>,
}

impl AdvanceRecord {
    /// Deposit still held for this tenant.
    pub fn net(&self) -> Decimal {
        self.advance_amount - self.advance_refund
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date.as_deref().and_then(|d| parse_date(d).ok())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvanceExpenseRecord {
    pub date: Option<String>,
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_amount",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1500").unwrap(), dec!(1500));
        assert_eq!(parse_amount(" 12.50 ").unwrap(), dec!(12.50));
        assert_eq!(parse_amount("-300").unwrap(), dec!(-300));
        assert_eq!(
            parse_amount("abc").unwrap_err(),
            LedgerError::InvalidAmount("abc".to_string())
        );
        assert!(parse_amount("").is_err());
        assert!(parse_amount("12abc").is_err());
    }

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(parse_date("2024-03-05").unwrap(), expected);
        assert_eq!(parse_date("2024-03-05T10:15:00.000Z").unwrap(), expected);
        assert!(matches!(
            parse_date("05/03/2024"),
            Err(LedgerError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_revenue_record_deserialization() {
        let json = r#"{
            "receivedBy": "Balu",
            "revenueAmount": 1200,
            "transactionDate": "2024-01-10",
            "vehicleNumber": "TN 01 AB 1234",
            "vehicleDescription": "Sedan",
            "transactionMode": "cash"
        }"#;
        let record: RevenueRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.received_by, "Balu");
        assert_eq!(record.revenue_amount, dec!(1200));
        assert_eq!(record.vehicle_number.as_deref(), Some("TN 01 AB 1234"));
    }

    #[test]
    fn test_lenient_amounts() {
        let json = r#"[
            {"spentBy": "Mani", "amount": "250.75"},
            {"spentBy": "Mani", "amount": null},
            {"spentBy": "Mani"},
            {"spentBy": "Mani", "amount": "n/a"},
            {"spentBy": "Mani", "amount": 99.5}
        ]"#;
        let records: Vec<ExpenseRecord> = serde_json::from_str(json).unwrap();
        let amounts: Vec<Decimal> = records.iter().map(|r| r.amount).collect();
        assert_eq!(
            amounts,
            vec![dec!(250.75), Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, dec!(99.5)]
        );
    }

    #[test]
    fn test_balance_sheet_entry_kinds() {
        let json = r#"[
            {"userName": "Balu", "amount": 100, "month": 0, "year": 2024, "type": "normal"},
            {"userName": "Balu", "amount": -50, "month": 0, "year": 2024, "type": "transfer"},
            {"userName": "Balu", "amount": 10, "month": 0, "year": 2024},
            {"userName": "Balu", "amount": 10, "month": 0, "year": 2024, "type": "archived"}
        ]"#;
        let entries: Vec<BalanceSheetEntry> = serde_json::from_str(json).unwrap();
        assert!(entries[0].is_take_home());
        assert!(entries[1].is_transfer());
        assert!(entries[2].is_take_home());
        assert_eq!(entries[3].kind, Some(EntryKind::Other));
        assert!(!entries[3].is_take_home());
        assert!(!entries[3].is_transfer());
    }

    #[test]
    fn test_lenient_month_and_year() {
        let json = r#"[
            {"userName": "Balu", "amount": 10, "month": null, "year": 2024},
            {"userName": "Balu", "amount": 10, "month": "2", "year": "2024"},
            {"userName": "Balu", "amount": 10, "month": 3.0, "year": 2024},
            {"userName": "Balu", "amount": 10, "month": -1, "year": "soon"},
            {"userName": "Balu", "amount": 10}
        ]"#;
        let entries: Vec<BalanceSheetEntry> = serde_json::from_str(json).unwrap();
        let periods: Vec<(u32, i32)> = entries.iter().map(|e| (e.month, e.year)).collect();
        assert_eq!(periods, vec![(0, 2024), (2, 2024), (3, 2024), (0, 0), (0, 0)]);
    }

    #[test]
    fn test_null_names_keep_the_rest_of_the_collection() {
        let json = r#"[
            {"receivedBy": null, "revenueAmount": 10},
            {"receivedBy": 42, "revenueAmount": 7},
            {"receivedBy": "Balu", "revenueAmount": 5}
        ]"#;
        let records: Vec<RevenueRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].received_by, "");
        assert_eq!(records[1].received_by, "");
        assert_eq!(records[2].received_by, "Balu");
        assert_eq!(records[2].revenue_amount, dec!(5));

        let expenses: Vec<ExpenseRecord> =
            serde_json::from_str(r#"[{"spentBy": null, "amount": 1}]"#).unwrap();
        assert_eq!(expenses[0].spent_by, "");
        let entries: Vec<BalanceSheetEntry> =
            serde_json::from_str(r#"[{"userName": null, "amount": 1, "month": 0, "year": 2024}]"#)
                .unwrap();
        assert_eq!(entries[0].user_name, "");
    }

    #[test]
    fn test_balance_sheet_entry_serializes_amount_as_number() {
        let entry = BalanceSheetEntry {
            user_name: "Mani".to_string(),
            amount: dec!(-1500),
            month: 2,
            year: 2024,
            kind: Some(EntryKind::Transfer),
            date: Some("2024-03-04".to_string()),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["userName"], "Mani");
        assert_eq!(value["amount"].as_f64(), Some(-1500.0));
        assert_eq!(value["type"], "transfer");
        assert_eq!(value["month"], 2);
    }

    #[test]
    fn test_advance_record() {
        let json = r#"{"advanceAmount": 2000, "advanceRefund": 500, "startDate": "2024-01-15T00:00:00Z"}"#;
        let record: AdvanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.net(), dec!(1500));
        assert_eq!(
            record.start_date(),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );

        let no_refund: AdvanceRecord = serde_json::from_str(r#"{"advanceAmount": "3000"}"#).unwrap();
        assert_eq!(no_refund.advance_refund, Decimal::ZERO);
        assert_eq!(no_refund.net(), dec!(3000));
        assert!(no_refund.start_date().is_none());
    }
}
