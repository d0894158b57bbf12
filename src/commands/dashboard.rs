// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::DEFAULT_WINDOW_DAYS;
use crate::feed::DashboardFeed;
use crate::store::MemoryStore;
use crate::utils::{fmt_amount, maybe_print_json, parse_date, pretty_table};
use anyhow::Result;
use rust_decimal::Decimal;

pub fn handle(store: &MemoryStore, owner: &str, m: &clap::ArgMatches) -> Result<()> {
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");
    let reference = match m.get_one::<String>("on") {
        Some(s) => parse_date(s)?,
        None => chrono::Local::now().date_naive(),
    };
    let window = *m.get_one::<u32>("window").unwrap_or(&DEFAULT_WINDOW_DAYS);

    let mut feed = DashboardFeed::attach(store, owner, window);
    let view = feed.next_view(reference)?;

    if maybe_print_json(json_flag, jsonl_flag, &view)? {
        return Ok(());
    }

    println!("Overview for {} through {}", owner, reference);
    println!(
        "{}",
        pretty_table(
            &["Income", "Expense", "Balance"],
            vec![vec![
                fmt_amount(&view.summary.total_income),
                fmt_amount(&view.summary.total_expense),
                fmt_amount(&view.summary.balance()),
            ]],
        )
    );

    if view.summary.category_totals.is_empty() {
        println!("No expenses recorded yet.");
    } else {
        let rows: Vec<Vec<String>> = view
            .summary
            .category_totals
            .iter()
            .map(|c| {
                vec![
                    c.category.clone(),
                    fmt_amount(&c.amount),
                    format!("{}%", c.percentage),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Spent", "Share"], rows));
    }

    let rows: Vec<Vec<String>> = view
        .summary
        .daily_series
        .iter()
        .map(|p| {
            vec![
                p.date.format("%a").to_string(),
                p.date.to_string(),
                fmt_amount(&p.amount),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Day", "Date", "Spent"], rows));

    if !view.budgets.is_empty() {
        let rows: Vec<Vec<String>> = view
            .budgets
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
            pretty_table(&["Budget", "Spent", "Limit", "Used", "State"], rows)
        );
    }
    Ok(())
}
