// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::models::TxKind;

pub type SubscriptionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Transactions,
    Budgets,
    Categories,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Transactions,
        Collection::Budgets,
        Collection::Categories,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transactions => "transactions",
            Self::Budgets => "budgets",
            Self::Categories => "categories",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: Collection,
    pub owner_id: String,
    pub kind: Option<TxKind>,
}

impl Query {
    pub fn owned(collection: Collection, owner_id: &str) -> Self {
        Self {
            collection,
            owner_id: owner_id.to_string(),
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: TxKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// One delivery to a listener: the full matching set for its query,
/// never a delta.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotEvent {
    pub collection: Collection,
    pub documents: Vec<Value>,
}

pub struct Subscription {
    pub id: SubscriptionId,
    pub events: Receiver<SnapshotEvent>,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("record store is unavailable")]
    Unavailable,
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("no record with id '{0}'")]
    NotFound(String),
    #[error("malformed write: {0}")]
    Malformed(String),
}

/// Storage seam for transaction, budget, and category records. Listeners
/// receive the current matching set immediately on subscribe and the full
/// set again after every mutation of the collection.
pub trait RecordStore {
    fn subscribe_with(&self, query: Query, sender: Sender<SnapshotEvent>) -> SubscriptionId;
    fn unsubscribe(&self, id: SubscriptionId);
    fn create(&self, collection: Collection, record: Value) -> Result<String, StoreError>;
    fn update(&self, collection: Collection, id: &str, patch: Value) -> Result<(), StoreError>;
    fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError>;

    fn subscribe(&self, query: Query) -> Subscription {
        let (sender, events) = channel();
        let id = self.subscribe_with(query, sender);
        Subscription { id, events }
    }
}

/// In-memory [`RecordStore`] holding documents in insertion order. Backs
/// the local ledger file and stands in for a hosted document store in
/// tests. An authorized owner, once set, fences every write; `offline`
/// makes writes fail the way a dropped connection would.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    transactions: Vec<Value>,
    budgets: Vec<Value>,
    categories: Vec<Value>,
    watchers: Vec<Watcher>,
    authorized_owner: Option<String>,
    offline: bool,
    next_subscription: SubscriptionId,
}

struct Watcher {
    id: SubscriptionId,
    query: Query,
    sender: Sender<SnapshotEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_owner(self, owner: &str) -> Self {
        self.lock().authorized_owner = Some(owner.to_string());
        self
    }

    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Load documents without notifying listeners. Records without an id
    /// are assigned one.
    pub fn seed(&self, collection: Collection, documents: Vec<Value>) {
        let mut inner = self.lock();
        for mut doc in documents {
            ensure_id(&mut doc);
            inner.docs_mut(collection).push(doc);
        }
    }

    /// Every document of a collection, regardless of owner.
    pub fn documents(&self, collection: Collection) -> Vec<Value> {
        self.lock().docs(collection).clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Inner {
    fn docs(&self, collection: Collection) -> &Vec<Value> {
        match collection {
            Collection::Transactions => &self.transactions,
            Collection::Budgets => &self.budgets,
            Collection::Categories => &self.categories,
        }
    }

    fn docs_mut(&mut self, collection: Collection) -> &mut Vec<Value> {
        match collection {
            Collection::Transactions => &mut self.transactions,
            Collection::Budgets => &mut self.budgets,
            Collection::Categories => &mut self.categories,
        }
    }

    fn snapshot_for(&self, query: &Query) -> Vec<Value> {
        self.docs(query.collection)
            .iter()
            .filter(|doc| matches_query(doc, query))
            .cloned()
            .collect()
    }

    fn notify(&mut self, collection: Collection) {
        let mut dead: Vec<SubscriptionId> = Vec::new();
        for watcher in self.watchers.iter().filter(|w| w.query.collection == collection) {
            let event = SnapshotEvent {
                collection,
                documents: self.snapshot_for(&watcher.query),
            };
            if watcher.sender.send(event).is_err() {
                dead.push(watcher.id);
            }
        }
        if !dead.is_empty() {
            self.watchers.retain(|w| !dead.contains(&w.id));
        }
    }
}

impl RecordStore for MemoryStore {
    fn subscribe_with(&self, query: Query, sender: Sender<SnapshotEvent>) -> SubscriptionId {
        let mut inner = self.lock();
        inner.next_subscription += 1;
        let id = inner.next_subscription;
        let initial = SnapshotEvent {
            collection: query.collection,
            documents: inner.snapshot_for(&query),
        };
        let _ = sender.send(initial);
        inner.watchers.push(Watcher { id, query, sender });
        tracing::debug!(subscription = id, "registered snapshot listener");
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.lock().watchers.retain(|w| w.id != id);
    }

    fn create(&self, collection: Collection, mut record: Value) -> Result<String, StoreError> {
        let mut inner = self.lock();
        if inner.offline {
            return Err(StoreError::Unavailable);
        }
        if !record.is_object() {
            return Err(StoreError::Malformed("record must be a JSON object".into()));
        }
        let owner = record.get("ownerId").and_then(Value::as_str).map(str::to_string);
        match (&inner.authorized_owner, owner) {
            (Some(auth), Some(o)) if o != *auth => {
                return Err(StoreError::PermissionDenied(format!(
                    "cannot write records for '{o}'"
                )));
            }
            (Some(auth), None) => {
                record["ownerId"] = Value::String(auth.clone());
            }
            (None, None) => {
                return Err(StoreError::Malformed("record missing ownerId".into()));
            }
            _ => {}
        }
        let Some(id) = ensure_id(&mut record) else {
            return Err(StoreError::Malformed("record must be a JSON object".into()));
        };
        if inner
            .docs(collection)
            .iter()
            .any(|d| d.get("id").and_then(Value::as_str) == Some(id.as_str()))
        {
            return Err(StoreError::Malformed(format!("duplicate id '{id}'")));
        }
        inner.docs_mut(collection).push(record);
        inner.notify(collection);
        tracing::debug!(collection = collection.as_str(), id = %id, "created record");
        Ok(id)
    }

    fn update(&self, collection: Collection, id: &str, patch: Value) -> Result<(), StoreError> {
        let mut inner = self.lock();
        if inner.offline {
            return Err(StoreError::Unavailable);
        }
        let Some(patch_obj) = patch.as_object() else {
            return Err(StoreError::Malformed("patch must be a JSON object".into()));
        };
        let authorized = inner.authorized_owner.clone();
        let Some(doc) = inner
            .docs_mut(collection)
            .iter_mut()
            .find(|d| d.get("id").and_then(Value::as_str) == Some(id))
        else {
            return Err(StoreError::NotFound(id.to_string()));
        };
        let owner = doc
            .get("ownerId")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        if let Some(auth) = &authorized {
            if owner != *auth {
                return Err(StoreError::PermissionDenied(format!(
                    "cannot update records of '{owner}'"
                )));
            }
        }
        if let Some(new_owner) = patch_obj.get("ownerId").and_then(Value::as_str) {
            if new_owner != owner {
                return Err(StoreError::PermissionDenied(
                    "records cannot change owner".into(),
                ));
            }
        }
        if let Some(obj) = doc.as_object_mut() {
            for (key, value) in patch_obj {
                if key == "id" {
                    continue;
                }
                obj.insert(key.clone(), value.clone());
            }
        }
        inner.notify(collection);
        tracing::debug!(collection = collection.as_str(), id = %id, "updated record");
        Ok(())
    }

    fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        if inner.offline {
            return Err(StoreError::Unavailable);
        }
        let authorized = inner.authorized_owner.clone();
        let docs = inner.docs_mut(collection);
        let Some(pos) = docs
            .iter()
            .position(|d| d.get("id").and_then(Value::as_str) == Some(id))
        else {
            // Absent records delete as a no-op.
            return Ok(());
        };
        if let Some(auth) = &authorized {
            let owner = docs[pos]
                .get("ownerId")
                .and_then(Value::as_str)
                .unwrap_or_default();
            if owner != auth.as_str() {
                return Err(StoreError::PermissionDenied(format!(
                    "cannot delete records of '{owner}'"
                )));
            }
        }
        docs.remove(pos);
        inner.notify(collection);
        tracing::debug!(collection = collection.as_str(), id = %id, "deleted record");
        Ok(())
    }
}

fn matches_query(doc: &Value, query: &Query) -> bool {
    let owner_ok =
        doc.get("ownerId").and_then(Value::as_str) == Some(query.owner_id.as_str());
    let kind_ok = match query.kind {
        None => true,
        Some(kind) => doc.get("type").and_then(Value::as_str) == Some(kind.as_str()),
    };
    owner_ok && kind_ok
}

fn ensure_id(doc: &mut Value) -> Option<String> {
    let obj = doc.as_object_mut()?;
    let current = obj
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    if current.is_empty() {
        let id = Uuid::new_v4().to_string();
        obj.insert("id".to_string(), Value::String(id.clone()));
        Some(id)
    } else {
        Some(current)
    }
}
