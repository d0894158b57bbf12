// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger;
use crate::models::{normalize_category, Category};
use crate::store::{Collection, MemoryStore, RecordStore};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{bail, Result};
use serde_json::Value;
use std::path::Path;

pub fn handle(store: &MemoryStore, path: &Path, owner: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim().to_string();
            if name.is_empty() {
                bail!("Category name must not be empty");
            }
            let existing = owned_categories(store, owner)?;
            let key = normalize_category(&name);
            if existing.iter().any(|c| normalize_category(&c.name) == key) {
                bail!("Category '{}' already exists", name);
            }
            let cat = Category {
                id: String::new(),
                name: name.clone(),
                owner_id: owner.to_string(),
                icon: sub.get_one::<String>("icon").map(|s| s.to_string()),
                color: sub.get_one::<String>("color").map(|s| s.to_string()),
            };
            store.create(Collection::Categories, serde_json::to_value(&cat)?)?;
            ledger::save(path, store)?;
            println!("Added category '{}'", name);
        }
        Some(("list", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let data = owned_categories(store, owner)?;
            if !maybe_print_json(json_flag, jsonl_flag, &data)? {
                let rows: Vec<Vec<String>> = data
                    .iter()
                    .map(|c| {
                        vec![
                            c.name.clone(),
                            c.icon.clone().unwrap_or_default(),
                            c.color.clone().unwrap_or_default(),
                            c.id.clone(),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["Category", "Icon", "Color", "Id"], rows));
            }
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let existing = owned_categories(store, owner)?;
            let key = normalize_category(name);
            match existing.iter().find(|c| normalize_category(&c.name) == key) {
                Some(cat) => {
                    store.delete(Collection::Categories, &cat.id)?;
                    ledger::save(path, store)?;
                    println!("Removed category '{}'", cat.name);
                }
                None => println!("No category named '{}'", name),
            }
        }
        _ => {}
    }
    Ok(())
}

/// Every category record of `owner`, decoded, in insertion order.
pub fn owned_categories(store: &MemoryStore, owner: &str) -> Result<Vec<Category>> {
    let mut out = Vec::new();
    for doc in store.documents(Collection::Categories) {
        if doc.get("ownerId").and_then(Value::as_str) != Some(owner) {
            continue;
        }
        out.push(Category::from_value(&doc)?);
    }
    Ok(out)
}
