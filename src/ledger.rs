// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::store::{Collection, MemoryStore};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Tallyclip", "tallyclip"));

pub fn ledger_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("ledger.json"))
}

/// Read a ledger file into a fresh store. A missing file is an empty
/// ledger, not an error.
pub fn load(path: &Path) -> Result<MemoryStore> {
    let store = MemoryStore::new();
    if !path.exists() {
        return Ok(store);
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Read ledger at {}", path.display()))?;
    let doc: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Ledger at {} is not valid JSON", path.display()))?;
    for collection in Collection::ALL {
        if let Some(docs) = doc.get(collection.as_str()).and_then(Value::as_array) {
            store.seed(collection, docs.clone());
        }
    }
    tracing::debug!(path = %path.display(), "ledger loaded");
    Ok(store)
}

pub fn save(path: &Path, store: &MemoryStore) -> Result<()> {
    let mut doc = serde_json::Map::new();
    for collection in Collection::ALL {
        doc.insert(
            collection.as_str().to_string(),
            Value::Array(store.documents(collection)),
        );
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Create data dir {}", parent.display()))?;
    }
    let body = serde_json::to_string_pretty(&Value::Object(doc))?;
    fs::write(path, body).with_context(|| format!("Write ledger at {}", path.display()))?;
    Ok(())
}
