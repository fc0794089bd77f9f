//! Sample statements for demos and benchmarks.

use crate::model::{CardholderProfile, StatementRequest, StatementSummary, TransactionRecord};
use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MERCHANTS: &[&str] = &[
    "Amazon India - Electronics",
    "Uber Ride - New Delhi",
    "Big Bazaar - Grocery",
    "Mobile Recharge",
    "Restaurant Bill",
    "IRCTC Rail Booking",
    "Apollo Pharmacy",
    "Indian Oil - Fuel",
    "BookMyShow - Movies",
    "Electricity Bill Payment",
];

/// The date every sample statement is issued on.
pub fn sample_statement_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 31).unwrap_or_default()
}

pub fn sample_cardholder() -> CardholderProfile {
    CardholderProfile {
        name: "John Doe".to_string(),
        card_number: "1234567890123456".to_string(),
        billing_address: "123 Sample St, City, Country".to_string(),
        email: "john@example.com".to_string(),
        phone: "1234567890".to_string(),
    }
}

/// `count` transactions from the month before the statement date. The same
/// seed always gives the same transactions.
pub fn sample_transactions(count: usize, seed: u64) -> Vec<TransactionRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let statement_date = sample_statement_date();
    let mut transactions: Vec<TransactionRecord> = (0..count)
        .map(|_| {
            let days_back = rng.random_range(1..=30u64);
            let rupees: f64 = rng.random_range(50.0..5000.0);
            TransactionRecord {
                date: statement_date
                    .checked_sub_days(Days::new(days_back))
                    .unwrap_or(statement_date),
                description: MERCHANTS[rng.random_range(0..MERCHANTS.len())].to_string(),
                amount: (rupees * 100.0).round() / 100.0,
            }
        })
        .collect();
    transactions.sort_by_key(|t| t.date);
    transactions
}

/// A summary whose balances agree with `transactions`.
pub fn sample_summary(transactions: &[TransactionRecord]) -> StatementSummary {
    let statement_date = sample_statement_date();
    let previous_balance = 10_000.0;
    let payments_received = 5_000.0;
    let finance_charges = 100.0;
    let credit_limit = 50_000.0;
    let purchases_charges: f64 = transactions.iter().map(|t| t.amount).sum();
    let new_balance = previous_balance - payments_received + purchases_charges + finance_charges;
    StatementSummary {
        statement_date,
        previous_balance,
        payments_received,
        purchases_charges,
        finance_charges,
        new_balance,
        credit_limit,
        available_credit: credit_limit - new_balance,
        payment_due_date: statement_date
            .checked_add_days(Days::new(21))
            .unwrap_or(statement_date),
        reward_points: 175,
    }
}

pub fn sample_request(language: &str, count: usize, seed: u64) -> StatementRequest {
    let transactions = sample_transactions(count, seed);
    StatementRequest {
        cardholder: sample_cardholder(),
        statement: sample_summary(&transactions),
        transactions,
        language: language.to_string(),
    }
}
