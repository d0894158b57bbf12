// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger;
use crate::models::{display_category, normalize_category, Transaction, TxKind};
use crate::store::{Collection, MemoryStore, RecordStore};
use crate::utils::{
    fmt_amount, maybe_print_json, parse_date, parse_decimal, parse_month, pretty_table,
    require_category,
};
use anyhow::{bail, Result};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

pub fn handle(store: &MemoryStore, path: &Path, owner: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, path, owner, sub)?,
        Some(("list", sub)) => list(store, owner, sub)?,
        Some(("rm", sub)) => rm(store, path, sub)?,
        _ => {}
    }
    Ok(())
}

/// Every transaction of `owner`, decoded, in insertion order.
pub fn owned_transactions(store: &MemoryStore, owner: &str) -> Result<Vec<Transaction>> {
    let mut out = Vec::new();
    for doc in store.documents(Collection::Transactions) {
        if doc.get("ownerId").and_then(Value::as_str) != Some(owner) {
            continue;
        }
        out.push(Transaction::from_value(&doc)?);
    }
    Ok(out)
}

fn add(store: &MemoryStore, path: &Path, owner: &str, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    if amount.is_sign_negative() {
        bail!("Amount must not be negative; record money out with --kind expense");
    }
    let title = sub.get_one::<String>("title").unwrap().trim().to_string();
    let kind = TxKind::parse(sub.get_one::<String>("kind").unwrap()).unwrap_or(TxKind::Expense);
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => chrono::Local::now().date_naive(),
    };
    let categories = crate::commands::categories::owned_categories(store, owner)?;
    let category = require_category(&categories, sub.get_one::<String>("category").unwrap())?;

    let tx = Transaction {
        id: String::new(),
        kind,
        amount,
        title: title.clone(),
        category: category.name.clone(),
        owner_id: owner.to_string(),
        occurred_at: date,
    };
    store.create(Collection::Transactions, serde_json::to_value(&tx)?)?;
    ledger::save(path, store)?;
    println!(
        "Recorded {} {} '{}' on {} ({})",
        kind,
        fmt_amount(&amount),
        title,
        date,
        tx.category
    );
    Ok(())
}

fn list(store: &MemoryStore, owner: &str, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(store, owner, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.kind.clone(),
                    r.title.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Type", "Title", "Category", "Amount", "Id"], rows)
        );
    }
    Ok(())
}

fn rm(store: &MemoryStore, path: &Path, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap();
    store.delete(Collection::Transactions, id)?;
    ledger::save(path, store)?;
    println!("Removed transaction {}", id);
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub date: String,
    pub kind: String,
    pub title: String,
    pub category: String,
    pub amount: String,
    pub id: String,
}

pub fn query_rows(
    store: &MemoryStore,
    owner: &str,
    sub: &clap::ArgMatches,
) -> Result<Vec<TransactionRow>> {
    let mut txs = owned_transactions(store, owner)?;
    if let Some(month) = sub.get_one::<String>("month") {
        let month = parse_month(month)?;
        txs.retain(|t| t.occurred_at.format("%Y-%m").to_string() == month);
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        let key = normalize_category(cat);
        txs.retain(|t| normalize_category(&t.category) == key);
    }
    if let Some(kind) = sub.get_one::<String>("kind").and_then(|s| TxKind::parse(s)) {
        txs.retain(|t| t.kind == kind);
    }
    txs.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        txs.truncate(*limit);
    }
    Ok(txs
        .iter()
        .map(|t| TransactionRow {
            date: t.occurred_at.to_string(),
            kind: t.kind.to_string(),
            title: t.title.clone(),
            category: display_category(&t.category),
            amount: fmt_amount(&t.amount),
            id: t.id.clone(),
        })
        .collect())
}
