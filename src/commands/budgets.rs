// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{aggregate, DEFAULT_WINDOW_DAYS};
use crate::budget::{evaluate, plan_budget_save, BudgetStatus, BudgetWrite};
use crate::ledger;
use crate::models::Budget;
use crate::store::{Collection, MemoryStore, RecordStore};
use crate::utils::{fmt_amount, maybe_print_json, parse_decimal, pretty_table, require_category};
use anyhow::{bail, Result};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::path::Path;

pub fn handle(store: &MemoryStore, path: &Path, owner: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(store, path, owner, sub)?,
        Some(("list", sub)) => list(store, owner, sub)?,
        Some(("status", sub)) => status(store, owner, sub)?,
        _ => {}
    }
    Ok(())
}

/// Every budget of `owner`, decoded, in insertion order.
pub fn owned_budgets(store: &MemoryStore, owner: &str) -> Result<Vec<Budget>> {
    let mut out = Vec::new();
    for doc in store.documents(Collection::Budgets) {
        if doc.get("ownerId").and_then(Value::as_str) != Some(owner) {
            continue;
        }
        out.push(Budget::from_value(&doc)?);
    }
    Ok(out)
}

fn set(store: &MemoryStore, path: &Path, owner: &str, sub: &clap::ArgMatches) -> Result<()> {
    let limit = parse_decimal(sub.get_one::<String>("limit").unwrap())?;
    if limit <= Decimal::ZERO {
        bail!("Budget limit must be positive");
    }
    let categories = crate::commands::categories::owned_categories(store, owner)?;
    let record = require_category(&categories, sub.get_one::<String>("category").unwrap())?;
    let existing = owned_budgets(store, owner)?;
    let editing = sub.get_one::<String>("id").map(String::as_str);

    match plan_budget_save(&existing, editing, &record.name, limit) {
        BudgetWrite::Create { category, limit } => {
            let b = Budget {
                id: String::new(),
                category,
                limit,
                owner_id: owner.to_string(),
                color: record.color.clone(),
            };
            store.create(Collection::Budgets, serde_json::to_value(&b)?)?;
            println!("Budget set for '{}' = {}", b.category, fmt_amount(&limit));
        }
        BudgetWrite::MergeInto { id, limit } => {
            store.update(Collection::Budgets, &id, json!({ "limit": limit }))?;
            println!(
                "Budget for '{}' already exists; updated its limit to {}",
                record.name,
                fmt_amount(&limit)
            );
        }
        BudgetWrite::Update {
            id,
            category,
            limit,
        } => {
            store.update(
                Collection::Budgets,
                &id,
                json!({ "category": category, "limit": limit }),
            )?;
            println!("Budget {} updated: '{}' = {}", id, category, fmt_amount(&limit));
        }
    }
    ledger::save(path, store)?;
    Ok(())
}

fn list(store: &MemoryStore, owner: &str, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = owned_budgets(store, owner)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|b| vec![b.category.clone(), fmt_amount(&b.limit), b.id.clone()])
            .collect();
        println!("{}", pretty_table(&["Category", "Monthly Limit", "Id"], rows));
    }
    Ok(())
}

fn status(store: &MemoryStore, owner: &str, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = status_rows(store, owner)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|s| {
                vec![
                    s.category.clone(),
                    fmt_amount(&s.spent),
                    fmt_amount(&s.limit),
                    format!("{:.0}%", s.ratio * Decimal::ONE_HUNDRED),
                    s.state.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Spent", "Limit", "Used", "State"], rows)
        );
    }
    Ok(())
}

pub fn status_rows(store: &MemoryStore, owner: &str) -> Result<Vec<BudgetStatus>> {
    let txs = crate::commands::transactions::owned_transactions(store, owner)?;
    let budgets = owned_budgets(store, owner)?;
    let reference = chrono::Local::now().date_naive();
    let summary = aggregate(&txs, reference, DEFAULT_WINDOW_DAYS)?;
    Ok(evaluate(&budgets, &summary))
}
