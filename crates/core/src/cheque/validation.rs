//! Parsing and validation of cheque payloads.
//!
//! Forms arrive with every field optional so that a missing field is reported
//! as a validation error naming the field, not as a deserialization failure.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::cheque::error::ChequeError;
use crate::cheque::types::{ChequeFields, ChequeStatus};

/// Maximum length of a cheque number.
pub const MAX_CHEQUE_NUMBER_LEN: usize = 50;
/// Maximum length of a beneficiary name.
pub const MAX_BENEFICIARY_LEN: usize = 255;
/// Maximum length of the details text.
pub const MAX_DETAILS_LEN: usize = 2000;
/// Maximum number of decimal places in an amount.
pub const MAX_AMOUNT_SCALE: u32 = 2;

/// Amounts must stay below this bound (12 integer digits).
const AMOUNT_LIMIT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Raw cheque payload used for creation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChequeForm {
    /// Cheque number (required).
    pub cheque_number: Option<String>,
    /// Beneficiary (required).
    pub beneficiary: Option<String>,
    /// Amount as a decimal string such as `"1250.00"`, or a JSON number (required).
    #[serde(default, deserialize_with = "amount_text")]
    pub amount: Option<String>,
    /// Due date as `YYYY-MM-DD` (required).
    pub due_date: Option<String>,
    /// Free-text details (optional).
    pub details: Option<String>,
    /// Bank ID (required).
    pub bank_id: Option<String>,
    /// Invoice ID (optional, blank means none).
    pub invoice_id: Option<String>,
}

/// Raw cheque payload used for updates.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateChequeForm {
    /// The editable cheque fields.
    #[serde(flatten)]
    pub fields: ChequeForm,
    /// New status; absent or blank keeps the current one.
    pub status: Option<String>,
}

impl ChequeForm {
    /// Validates the form and returns normalized fields.
    ///
    /// # Errors
    ///
    /// Returns `ChequeError::MissingField` or `ChequeError::InvalidField`
    /// for the first offending field.
    pub fn validate(&self) -> Result<ChequeFields, ChequeError> {
        let cheque_number = required_text(
            "cheque_number",
            self.cheque_number.as_deref(),
            MAX_CHEQUE_NUMBER_LEN,
        )?;
        let beneficiary = required_text(
            "beneficiary",
            self.beneficiary.as_deref(),
            MAX_BENEFICIARY_LEN,
        )?;
        let amount = parse_amount(required("amount", self.amount.as_deref())?)?;
        let due_date = parse_date("due_date", required("due_date", self.due_date.as_deref())?)?;

        let details = self.details.as_deref().unwrap_or_default().trim().to_string();
        if details.chars().count() > MAX_DETAILS_LEN {
            return Err(ChequeError::invalid(
                "details",
                format!("must be at most {MAX_DETAILS_LEN} characters"),
            ));
        }

        let bank_id = parse_id("bank_id", required("bank_id", self.bank_id.as_deref())?)?;
        let invoice_id = match non_blank(self.invoice_id.as_deref()) {
            Some(raw) => Some(parse_id("invoice_id", raw)?),
            None => None,
        };

        Ok(ChequeFields {
            cheque_number,
            beneficiary,
            amount,
            due_date,
            details,
            bank_id,
            invoice_id,
        })
    }
}

impl UpdateChequeForm {
    /// Validates the form, returning the fields and the requested status.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed fields or an unknown status.
    pub fn validate(&self) -> Result<(ChequeFields, Option<ChequeStatus>), ChequeError> {
        let fields = self.fields.validate()?;
        let status = match non_blank(self.status.as_deref()) {
            Some(raw) => Some(ChequeStatus::parse(raw).ok_or_else(|| {
                ChequeError::invalid(
                    "status",
                    "must be one of created, deposited, returned, voided",
                )
            })?),
            None => None,
        };
        Ok((fields, status))
    }
}

/// Parses and checks a monetary amount.
///
/// # Errors
///
/// Returns `ChequeError::InvalidField` if the amount is not a decimal number,
/// is not positive, has more than two decimal places, or is too large.
pub fn parse_amount(raw: &str) -> Result<Decimal, ChequeError> {
    let amount = Decimal::from_str(raw.trim())
        .map_err(|_| ChequeError::invalid("amount", "must be a decimal number"))?;

    if amount <= Decimal::ZERO {
        return Err(ChequeError::invalid("amount", "must be positive"));
    }
    if amount.normalize().scale() > MAX_AMOUNT_SCALE {
        return Err(ChequeError::invalid(
            "amount",
            format!("must have at most {MAX_AMOUNT_SCALE} decimal places"),
        ));
    }
    if amount >= AMOUNT_LIMIT {
        return Err(ChequeError::invalid("amount", "is too large"));
    }

    Ok(amount.round_dp(MAX_AMOUNT_SCALE))
}

/// Amount as it may appear in a payload.
#[derive(Deserialize)]
#[serde(untagged)]
enum AmountInput {
    Text(String),
    Integer(i64),
    Number(f64),
}

/// Accepts the amount as a string or a number, keeping it as text so that
/// `parse_amount` applies the same rules to both.
fn amount_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<AmountInput>::deserialize(deserializer)?.map(|amount| match amount {
        AmountInput::Text(text) => text,
        AmountInput::Integer(value) => value.to_string(),
        AmountInput::Number(value) => value.to_string(),
    }))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn required<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str, ChequeError> {
    non_blank(value).ok_or(ChequeError::MissingField(field))
}

fn required_text(
    field: &'static str,
    value: Option<&str>,
    max_len: usize,
) -> Result<String, ChequeError> {
    let value = required(field, value)?;
    if value.chars().count() > max_len {
        return Err(ChequeError::invalid(
            field,
            format!("must be at most {max_len} characters"),
        ));
    }
    Ok(value.to_string())
}

fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, ChequeError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ChequeError::invalid(field, "must be a date formatted YYYY-MM-DD"))
}

fn parse_id(field: &'static str, raw: &str) -> Result<Uuid, ChequeError> {
    Uuid::parse_str(raw).map_err(|_| ChequeError::invalid(field, "must be a UUID"))
}
