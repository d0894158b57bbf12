// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::DEFAULT_WINDOW_DAYS;
use crate::feed::DashboardFeed;
use crate::store::MemoryStore;
use crate::utils::parse_date;
use anyhow::{bail, Result};

pub fn handle(store: &MemoryStore, owner: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(store, owner, sub),
        Some(("dashboard", sub)) => export_dashboard(store, owner, sub),
        _ => Ok(()),
    }
}

fn export_transactions(store: &MemoryStore, owner: &str, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut txs = crate::commands::transactions::owned_transactions(store, owner)?;
    txs.sort_by(|a, b| a.occurred_at.cmp(&b.occurred_at));

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["date", "type", "title", "category", "amount", "id"])?;
            for t in &txs {
                wtr.write_record([
                    t.occurred_at.to_string(),
                    t.kind.to_string(),
                    t.title.clone(),
                    t.category.clone(),
                    t.amount.to_string(),
                    t.id.clone(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&txs)?)?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    println!("Exported transactions to {}", out);
    Ok(())
}

fn export_dashboard(store: &MemoryStore, owner: &str, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let reference = match sub.get_one::<String>("on") {
        Some(s) => parse_date(s)?,
        None => chrono::Local::now().date_naive(),
    };
    let window = *sub.get_one::<u32>("window").unwrap_or(&DEFAULT_WINDOW_DAYS);

    let mut feed = DashboardFeed::attach(store, owner, window);
    let view = feed.next_view(reference)?;

    match fmt.as_str() {
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&view)?)?;
        }
        _ => bail!("Unknown format: {} (use json)", fmt),
    }
    println!("Exported dashboard to {}", out);
    Ok(())
}
