#![allow(dead_code)]

use chrono::NaiveDate;
use statement_render::{CardholderProfile, StatementRequest, StatementSummary, TransactionRecord};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn jane_roe() -> CardholderProfile {
    CardholderProfile {
        name: "Jane Roe".to_string(),
        card_number: "4111111111119876".to_string(),
        billing_address: "12 Park Street, Chennai".to_string(),
        email: "jane.roe@example.com".to_string(),
        phone: "+91 98765 43210".to_string(),
    }
}

pub fn summary() -> StatementSummary {
    StatementSummary {
        statement_date: date(2025, 3, 31),
        previous_balance: 13840.0,
        payments_received: 175.5,
        purchases_charges: 100.0,
        finance_charges: 45.0,
        new_balance: 13809.5,
        credit_limit: 50000.0,
        available_credit: 36190.5,
        payment_due_date: date(2025, 4, 21),
        reward_points: 175,
    }
}

pub fn transaction(index: usize) -> TransactionRecord {
    TransactionRecord {
        date: date(2025, 3, 1 + (index % 28) as u32),
        description: format!("Merchant {:03}", index),
        amount: 100.0 + index as f64,
    }
}

/// "Jane Roe" with `count` transactions in `language`
pub fn request(language: &str, count: usize) -> StatementRequest {
    StatementRequest {
        cardholder: jane_roe(),
        statement: summary(),
        transactions: (0..count).map(transaction).collect(),
        language: language.to_string(),
    }
}

/// The single-transaction statement: 2025-03-02, 100.00
pub fn single_transaction(language: &str) -> StatementRequest {
    let mut request = request(language, 0);
    request.transactions.push(TransactionRecord {
        date: date(2025, 3, 2),
        description: "Amazon India - Electronics".to_string(),
        amount: 100.0,
    });
    request
}
