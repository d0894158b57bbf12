// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tallyclip::aggregate::{aggregate, AggregationResult};
use tallyclip::budget::{evaluate, plan_budget_save, resolve_duplicate, BudgetState, BudgetWrite};
use tallyclip::models::{Budget, Transaction, TxKind};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn budget(id: &str, category: &str, limit: &str) -> Budget {
    Budget {
        id: id.to_string(),
        category: category.to_string(),
        limit: dec(limit),
        owner_id: "u1".to_string(),
        color: None,
    }
}

fn spent(pairs: &[(&str, &str)]) -> AggregationResult {
    let txs: Vec<Transaction> = pairs
        .iter()
        .enumerate()
        .map(|(i, (category, amount))| Transaction {
            id: format!("t{}", i),
            kind: TxKind::Expense,
            amount: dec(amount),
            title: String::new(),
            category: category.to_string(),
            owner_id: "u1".to_string(),
            occurred_at: d("2025-06-28"),
        })
        .collect();
    aggregate(&txs, d("2025-06-30"), 7).unwrap()
}

#[test]
fn states_follow_ratio_thresholds() {
    let agg = spent(&[
        ("Groceries", "80"),
        ("Dining", "81"),
        ("Travel", "100"),
        ("Fun", "100.01"),
    ]);
    let budgets = vec![
        budget("b1", "Groceries", "100"),
        budget("b2", "Dining", "100"),
        budget("b3", "Travel", "100"),
        budget("b4", "Fun", "100"),
    ];
    let statuses = evaluate(&budgets, &agg);

    assert_eq!(statuses.len(), 4);
    assert_eq!(statuses[0].ratio, dec("0.8"));
    assert_eq!(statuses[0].state, BudgetState::Ok);
    assert_eq!(statuses[1].ratio, dec("0.81"));
    assert_eq!(statuses[1].state, BudgetState::Warning);
    assert_eq!(statuses[2].ratio, Decimal::ONE);
    assert_eq!(statuses[2].state, BudgetState::Warning);
    assert_eq!(statuses[3].ratio, dec("1.0001"));
    assert_eq!(statuses[3].state, BudgetState::Over);
}

#[test]
fn overspent_budget_reports_over() {
    let agg = spent(&[("Food", "150")]);
    let statuses = evaluate(&[budget("b1", "Food", "100")], &agg);

    assert_eq!(statuses[0].spent, dec("150"));
    assert_eq!(statuses[0].limit, dec("100"));
    assert_eq!(statuses[0].ratio, dec("1.5"));
    assert_eq!(statuses[0].state, BudgetState::Over);
}

#[test]
fn zero_limit_reports_zero_ratio() {
    let agg = spent(&[("Food", "50")]);
    let statuses = evaluate(&[budget("b1", "Food", "0")], &agg);

    assert_eq!(statuses[0].spent, dec("50"));
    assert_eq!(statuses[0].ratio, Decimal::ZERO);
    assert_eq!(statuses[0].state, BudgetState::Ok);
}

#[test]
fn unmatched_category_reports_zero_spent() {
    let agg = spent(&[("Food", "50")]);
    let statuses = evaluate(&[budget("b1", "Utilities", "75")], &agg);

    assert_eq!(statuses[0].spent, Decimal::ZERO);
    assert_eq!(statuses[0].ratio, Decimal::ZERO);
    assert_eq!(statuses[0].state, BudgetState::Ok);
}

#[test]
fn output_follows_budget_input_order() {
    let agg = spent(&[("Food", "10"), ("Travel", "20")]);
    let budgets = vec![budget("b1", "Travel", "100"), budget("b2", "Food", "100")];
    let statuses = evaluate(&budgets, &agg);

    let labels: Vec<&str> = statuses.iter().map(|s| s.category.as_str()).collect();
    assert_eq!(labels, vec!["Travel", "Food"]);
}

#[test]
fn duplicate_budgets_keep_the_first() {
    let agg = spent(&[("Food", "90")]);
    let budgets = vec![budget("b1", "Food", "100"), budget("b2", "food", "50")];
    let statuses = evaluate(&budgets, &agg);

    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].limit, dec("100"));
    assert_eq!(statuses[0].state, BudgetState::Warning);
}

#[test]
fn labels_match_across_case_and_padding() {
    let agg = spent(&[("food", "40")]);
    let statuses = evaluate(&[budget("b1", " FOOD ", "100")], &agg);

    assert_eq!(statuses[0].category, "FOOD");
    assert_eq!(statuses[0].spent, dec("40"));
    assert_eq!(statuses[0].ratio, dec("0.4"));
}

#[test]
fn no_budgets_evaluate_to_nothing() {
    let agg = spent(&[("Food", "10")]);
    assert!(evaluate(&[], &agg).is_empty());
}

#[test]
fn resolve_duplicate_finds_first_match() {
    let existing = vec![
        budget("b1", "Food", "100"),
        budget("b2", "Travel", "200"),
        budget("b3", "food", "50"),
    ];
    assert_eq!(resolve_duplicate(&existing, "FOOD"), Some("b1".to_string()));
    assert_eq!(
        resolve_duplicate(&existing, " travel "),
        Some("b2".to_string())
    );
    assert_eq!(resolve_duplicate(&existing, "Rent"), None);
}

#[test]
fn plan_budget_save_picks_the_right_write() {
    let existing = vec![budget("b1", "Food", "100")];

    let plan = plan_budget_save(&existing, Some("b7"), "Rent", dec("300"));
    assert_eq!(
        plan,
        BudgetWrite::Update {
            id: "b7".to_string(),
            category: "Rent".to_string(),
            limit: dec("300"),
        }
    );

    let plan = plan_budget_save(&existing, None, "FOOD", dec("80"));
    assert_eq!(
        plan,
        BudgetWrite::MergeInto {
            id: "b1".to_string(),
            limit: dec("80"),
        }
    );

    let plan = plan_budget_save(&existing, None, " Fun ", dec("25"));
    assert_eq!(
        plan,
        BudgetWrite::Create {
            category: "Fun".to_string(),
            limit: dec("25"),
        }
    );
}
