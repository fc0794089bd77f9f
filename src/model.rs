//! Input records for a statement render.
//!
//! These arrive already validated and persisted; the renderer treats them as
//! immutable for the duration of a render.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The cardholder block of a statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardholderProfile {
    pub name: String,
    pub card_number: String,
    pub billing_address: String,
    pub email: String,
    pub phone: String,
}

impl CardholderProfile {
    /// The card number as printed on the statement, e.g. `XXXX-XXXX-XXXX-3456`.
    pub fn masked_card(&self) -> String {
        let digits: Vec<char> = self.card_number.trim().chars().collect();
        let tail: String = digits[digits.len().saturating_sub(4)..].iter().collect();
        format!("XXXX-XXXX-XXXX-{}", tail)
    }
}

/// Running balance figures for one statement period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementSummary {
    pub statement_date: NaiveDate,
    pub previous_balance: f64,
    pub payments_received: f64,
    pub purchases_charges: f64,
    pub finance_charges: f64,
    pub new_balance: f64,
    pub credit_limit: f64,
    pub available_credit: f64,
    pub payment_due_date: NaiveDate,
    #[serde(default)]
    pub reward_points: u32,
}

impl StatementSummary {
    /// The monetary fields in summary-table order, paired with their field names.
    pub(crate) fn amounts(&self) -> [(&'static str, f64); 7] {
        [
            ("previous_balance", self.previous_balance),
            ("payments_received", self.payments_received),
            ("purchases_charges", self.purchases_charges),
            ("finance_charges", self.finance_charges),
            ("new_balance", self.new_balance),
            ("credit_limit", self.credit_limit),
            ("available_credit", self.available_credit),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
}

fn default_language() -> String {
    "en".to_string()
}

/// Everything needed to render one statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementRequest {
    pub cardholder: CardholderProfile,
    pub statement: StatementSummary,
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
    #[serde(default = "default_language")]
    pub language: String,
}

impl StatementRequest {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
