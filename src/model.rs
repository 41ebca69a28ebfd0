// Customer and Transaction records plus the request shapes that create them

use crate::error::{Result, RewardsError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// PERSISTED RECORDS
// ============================================================================

/// Customer - owns its transactions exclusively
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub customer_id: i64,
    pub customer_name: String,
    /// Wire name is singular to stay compatible with existing clients
    #[serde(rename = "transaction")]
    pub transactions: Vec<Transaction>,
}

/// Purchase transaction
/// The owning customer is kept as a plain id and never serialized,
/// so nested responses have no back-reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub transaction_id: i64,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(skip)]
    pub customer_id: i64,
}

// ============================================================================
// REQUEST SHAPES
// ============================================================================

/// Body of an "add customer" request
/// Every field is optional so missing values surface as validation errors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default, rename = "transaction")]
    pub transactions: Option<Vec<NewTransaction>>,
}

/// Submitted transaction; the date stays raw text until `validate`
/// so a bad value is reported as a date error, not a parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTransaction {
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub date: Option<String>,
}

/// A transaction that passed validation and is ready to persist
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidTransaction {
    pub amount: f64,
    pub date: NaiveDate,
}

/// Parse a YYYY-MM-DD date, naming the offending field on failure
pub fn parse_iso_date(raw: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        RewardsError::InvalidDateFormat(format!(
            "Invalid value '{}' for {}: expected YYYY-MM-DD",
            raw, field
        ))
    })
}

impl NewCustomer {
    pub fn new(name: &str, transactions: Vec<NewTransaction>) -> Self {
        NewCustomer {
            customer_name: Some(name.to_string()),
            transactions: Some(transactions),
        }
    }

    /// Field-level checks on the request envelope
    /// Collects every failing field instead of stopping at the first.
    pub fn validate_fields(&self) -> Result<()> {
        let mut errors = BTreeMap::new();

        let name_blank = self
            .customer_name
            .as_deref()
            .map_or(true, |name| name.trim().is_empty());
        if name_blank {
            errors.insert(
                "customerName".to_string(),
                "Customer name cannot be null or blank.".to_string(),
            );
        }

        let list_empty = self.transactions.as_ref().map_or(true, Vec::is_empty);
        if list_empty {
            errors.insert(
                "transaction".to_string(),
                "Transaction list cannot be empty".to_string(),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(RewardsError::Validation(errors))
        }
    }
}

impl NewTransaction {
    pub fn new(amount: f64, date: NaiveDate) -> Self {
        NewTransaction {
            amount: Some(amount),
            date: Some(date.format("%Y-%m-%d").to_string()),
        }
    }

    /// Check the amount/date invariants of a single transaction
    pub fn validate(&self) -> Result<ValidTransaction> {
        let raw_date = self.date.as_deref().ok_or_else(|| {
            RewardsError::InvalidTransaction("Transaction date cannot be null.".to_string())
        })?;
        let date = parse_iso_date(raw_date, "date")?;

        match self.amount {
            Some(amount) if amount > 0.0 && amount.is_finite() => Ok(ValidTransaction { amount, date }),
            _ => Err(RewardsError::InvalidTransaction(
                "Transaction amount must be greater than zero.".to_string(),
            )),
        }
    }
}
