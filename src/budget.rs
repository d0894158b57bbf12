// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregate::AggregationResult;
use crate::models::{display_category, normalize_category, Budget};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetState {
    Ok,
    Warning,
    Over,
}

impl BudgetState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Warning => "warning",
            Self::Over => "over",
        }
    }
}

impl std::fmt::Display for BudgetState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    pub category: String,
    pub spent: Decimal,
    pub limit: Decimal,
    pub ratio: Decimal,
    pub state: BudgetState,
}

/// Judge each budget against the aggregated category spending. Output
/// order follows input order; a second budget for an already-seen
/// category is skipped. A zero limit yields a ratio of zero.
pub fn evaluate(budgets: &[Budget], aggregation: &AggregationResult) -> Vec<BudgetStatus> {
    let warning_floor = Decimal::new(8, 1);
    let mut seen: HashSet<String> = HashSet::new();
    let mut statuses = Vec::with_capacity(budgets.len());

    for budget in budgets {
        let key = normalize_category(&budget.category);
        if !seen.insert(key.clone()) {
            tracing::warn!(
                category = %budget.category,
                id = %budget.id,
                "duplicate budget ignored; first definition wins"
            );
            continue;
        }
        let spent = aggregation
            .category_totals
            .iter()
            .find(|total| normalize_category(&total.category) == key)
            .map(|total| total.amount)
            .unwrap_or(Decimal::ZERO);
        let ratio = if budget.limit.is_zero() {
            Decimal::ZERO
        } else {
            spent / budget.limit
        };
        let state = if ratio > Decimal::ONE {
            BudgetState::Over
        } else if ratio > warning_floor {
            BudgetState::Warning
        } else {
            BudgetState::Ok
        };
        statuses.push(BudgetStatus {
            category: display_category(&budget.category),
            spent,
            limit: budget.limit,
            ratio,
            state,
        });
    }
    statuses
}

/// Id of the first existing budget covering `category`, if any.
pub fn resolve_duplicate(existing: &[Budget], category: &str) -> Option<String> {
    let key = normalize_category(category);
    existing
        .iter()
        .find(|b| normalize_category(&b.category) == key)
        .map(|b| b.id.clone())
}

#[derive(Debug, Clone, PartialEq)]
pub enum BudgetWrite {
    Create { category: String, limit: Decimal },
    Update { id: String, category: String, limit: Decimal },
    MergeInto { id: String, limit: Decimal },
}

/// Decide how a budget save lands in the store. An explicit edit updates
/// that budget in place. Otherwise a save for a category that already
/// has a budget merges into it instead of creating a duplicate.
pub fn plan_budget_save(
    existing: &[Budget],
    editing_id: Option<&str>,
    category: &str,
    limit: Decimal,
) -> BudgetWrite {
    let category = category.trim();
    if let Some(id) = editing_id {
        return BudgetWrite::Update {
            id: id.to_string(),
            category: category.to_string(),
            limit,
        };
    }
    match resolve_duplicate(existing, category) {
        Some(id) => BudgetWrite::MergeInto { id, limit },
        None => BudgetWrite::Create {
            category: category.to_string(),
            limit,
        },
    }
}
