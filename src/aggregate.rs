// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{display_category, normalize_category, InputError, Transaction, TxKind};

pub const DEFAULT_WINDOW_DAYS: u32 = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub category_totals: Vec<CategoryTotal>,
    pub daily_series: Vec<DailyPoint>,
}

impl AggregationResult {
    pub fn balance(&self) -> Decimal {
        self.total_income - self.total_expense
    }
}

/// Fold a snapshot of transactions into dashboard totals: overall income
/// and expense, per-category expense with its share of the whole, and a
/// zero-filled daily expense series for the `window_days` calendar days
/// ending at `reference_date`.
///
/// Totals and category figures cover every transaction in the snapshot;
/// only the daily series is restricted to the window.
pub fn aggregate(
    transactions: &[Transaction],
    reference_date: NaiveDate,
    window_days: u32,
) -> Result<AggregationResult, InputError> {
    if window_days == 0 {
        return Err(InputError::EmptyWindow);
    }
    let start = reference_date
        .checked_sub_days(Days::new(u64::from(window_days) - 1))
        .ok_or(InputError::WindowOverflow(window_days))?;

    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;
    let mut category_totals: Vec<CategoryTotal> = Vec::new();
    let mut category_index: HashMap<String, usize> = HashMap::new();
    let mut daily_series: Vec<DailyPoint> = (0..window_days)
        .map(|i| DailyPoint {
            date: start + Days::new(u64::from(i)),
            amount: Decimal::ZERO,
        })
        .collect();

    for tx in transactions {
        if tx.amount < Decimal::ZERO {
            return Err(InputError::NegativeAmount {
                id: tx.id.clone(),
                amount: tx.amount,
            });
        }
        match tx.kind {
            TxKind::Income => total_income += tx.amount,
            TxKind::Expense => {
                total_expense += tx.amount;
                let key = normalize_category(&tx.category);
                let slot = *category_index.entry(key).or_insert_with(|| {
                    category_totals.push(CategoryTotal {
                        category: display_category(&tx.category),
                        amount: Decimal::ZERO,
                        percentage: Decimal::ZERO,
                    });
                    category_totals.len() - 1
                });
                category_totals[slot].amount += tx.amount;

                if tx.occurred_at >= start && tx.occurred_at <= reference_date {
                    let offset = (tx.occurred_at - start).num_days() as usize;
                    daily_series[offset].amount += tx.amount;
                }
            }
        }
    }

    if total_expense > Decimal::ZERO {
        for total in &mut category_totals {
            total.percentage = (total.amount * Decimal::ONE_HUNDRED / total_expense).round_dp(2);
        }
    }

    Ok(AggregationResult {
        total_income,
        total_expense,
        category_totals,
        daily_series,
    })
}
