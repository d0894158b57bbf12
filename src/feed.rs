// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::mpsc::{channel, Receiver, TryRecvError};

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::aggregate::{aggregate, AggregationResult};
use crate::budget::{evaluate, BudgetStatus};
use crate::models::{Budget, InputError, Transaction};
use crate::store::{Collection, Query, RecordStore, SnapshotEvent, SubscriptionId};

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("snapshot stream closed")]
    Closed,
    #[error(transparent)]
    Input(#[from] InputError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub reference_date: NaiveDate,
    pub summary: AggregationResult,
    pub budgets: Vec<BudgetStatus>,
}

/// Live dashboard over a [`RecordStore`]: one merged stream of
/// transaction and budget snapshots, recomputed from scratch on demand.
pub struct DashboardFeed<'a> {
    store: &'a dyn RecordStore,
    subscriptions: [SubscriptionId; 2],
    events: Receiver<SnapshotEvent>,
    latest_transactions: Vec<Value>,
    latest_budgets: Vec<Value>,
    window_days: u32,
}

impl<'a> DashboardFeed<'a> {
    /// Subscribe to the owner's transactions and budgets through one
    /// event stream. The initial snapshots are queued before this
    /// returns, so the first [`Self::next_view`] call never blocks.
    pub fn attach(store: &'a dyn RecordStore, owner: &str, window_days: u32) -> Self {
        let (sender, events) = channel();
        let tx_sub = store.subscribe_with(
            Query::owned(Collection::Transactions, owner),
            sender.clone(),
        );
        let budget_sub = store.subscribe_with(Query::owned(Collection::Budgets, owner), sender);
        Self {
            store,
            subscriptions: [tx_sub, budget_sub],
            events,
            latest_transactions: Vec::new(),
            latest_budgets: Vec::new(),
            window_days,
        }
    }

    /// Wait for the next snapshot, fold in everything queued behind it,
    /// and rebuild the dashboard once from the final state. Each
    /// collection keeps only its newest snapshot, so a burst of
    /// mutations costs a single recomputation.
    pub fn next_view(&mut self, reference_date: NaiveDate) -> Result<DashboardView, FeedError> {
        let first = self.events.recv().map_err(|_| FeedError::Closed)?;
        self.absorb(first);
        let mut absorbed = 1usize;
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    self.absorb(event);
                    absorbed += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        if absorbed > 1 {
            tracing::debug!(events = absorbed, "coalesced snapshot backlog");
        }
        self.build(reference_date)
    }

    fn absorb(&mut self, event: SnapshotEvent) {
        match event.collection {
            Collection::Transactions => self.latest_transactions = event.documents,
            Collection::Budgets => self.latest_budgets = event.documents,
            Collection::Categories => {}
        }
    }

    fn build(&self, reference_date: NaiveDate) -> Result<DashboardView, FeedError> {
        let transactions: Vec<Transaction> = self
            .latest_transactions
            .iter()
            .map(Transaction::from_value)
            .collect::<Result<_, _>>()?;
        let budgets: Vec<Budget> = self
            .latest_budgets
            .iter()
            .map(Budget::from_value)
            .collect::<Result<_, _>>()?;
        let summary = aggregate(&transactions, reference_date, self.window_days)?;
        let statuses = evaluate(&budgets, &summary);
        Ok(DashboardView {
            reference_date,
            summary,
            budgets: statuses,
        })
    }
}

impl Drop for DashboardFeed<'_> {
    fn drop(&mut self) {
        for id in self.subscriptions {
            self.store.unsubscribe(id);
        }
    }
}
