// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tallyclip::budget::BudgetState;
use tallyclip::feed::{DashboardFeed, FeedError};
use tallyclip::models::InputError;
use tallyclip::store::{Collection, MemoryStore, RecordStore};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn expense(id: &str, amount: &str, category: &str, date: &str) -> Value {
    json!({
        "id": id,
        "type": "expense",
        "amount": amount,
        "title": "x",
        "category": category,
        "ownerId": "u1",
        "occurredAt": date
    })
}

#[test]
fn initial_view_reflects_the_seeded_ledger() {
    let store = MemoryStore::new();
    store.seed(
        Collection::Transactions,
        vec![
            expense("t1", "30", "Food", "2025-05-01"),
            json!({
                "id": "t2",
                "type": "income",
                "amount": "100",
                "title": "pay",
                "category": "",
                "ownerId": "u1",
                "occurredAt": "2025-05-01"
            }),
        ],
    );
    store.seed(
        Collection::Budgets,
        vec![json!({ "id": "b1", "category": "Food", "limit": "100", "ownerId": "u1" })],
    );

    let mut feed = DashboardFeed::attach(&store, "u1", 7);
    let view = feed.next_view(d("2025-05-03")).unwrap();

    assert_eq!(view.summary.total_income, dec("100"));
    assert_eq!(view.summary.total_expense, dec("30"));
    assert_eq!(view.summary.daily_series.len(), 7);
    assert_eq!(view.budgets.len(), 1);
    assert_eq!(view.budgets[0].spent, dec("30"));
    assert_eq!(view.budgets[0].state, BudgetState::Ok);
}

#[test]
fn views_track_store_mutations() {
    let store = MemoryStore::new();
    let mut feed = DashboardFeed::attach(&store, "u1", 7);
    let view = feed.next_view(d("2025-05-03")).unwrap();
    assert_eq!(view.summary.total_expense, Decimal::ZERO);

    store
        .create(
            Collection::Transactions,
            expense("t1", "40", "Food", "2025-05-02"),
        )
        .unwrap();
    let view = feed.next_view(d("2025-05-03")).unwrap();
    assert_eq!(view.summary.total_expense, dec("40"));

    store
        .update(Collection::Transactions, "t1", json!({ "amount": "55" }))
        .unwrap();
    let view = feed.next_view(d("2025-05-03")).unwrap();
    assert_eq!(view.summary.total_expense, dec("55"));

    store.delete(Collection::Transactions, "t1").unwrap();
    let view = feed.next_view(d("2025-05-03")).unwrap();
    assert_eq!(view.summary.total_expense, Decimal::ZERO);
}

#[test]
fn queued_snapshots_coalesce_into_one_view() {
    let store = MemoryStore::new();
    let mut feed = DashboardFeed::attach(&store, "u1", 7);

    for i in 1..=3 {
        store
            .create(
                Collection::Transactions,
                expense(&format!("t{}", i), "10", "Food", "2025-05-02"),
            )
            .unwrap();
    }
    store
        .create(
            Collection::Budgets,
            json!({ "id": "b1", "category": "Food", "limit": "40", "ownerId": "u1" }),
        )
        .unwrap();

    // Initial snapshots plus four mutations are queued; one view folds
    // them all in.
    let view = feed.next_view(d("2025-05-03")).unwrap();
    assert_eq!(view.summary.total_expense, dec("30"));
    assert_eq!(view.budgets.len(), 1);
    assert_eq!(view.budgets[0].ratio, dec("0.75"));
}

#[test]
fn budget_changes_update_statuses() {
    let store = MemoryStore::new();
    store.seed(
        Collection::Transactions,
        vec![expense("t1", "90", "Food", "2025-05-01")],
    );
    let mut feed = DashboardFeed::attach(&store, "u1", 7);
    let view = feed.next_view(d("2025-05-03")).unwrap();
    assert!(view.budgets.is_empty());

    store
        .create(
            Collection::Budgets,
            json!({ "id": "b1", "category": "Food", "limit": "100", "ownerId": "u1" }),
        )
        .unwrap();
    let view = feed.next_view(d("2025-05-03")).unwrap();
    assert_eq!(view.budgets.len(), 1);
    assert_eq!(view.budgets[0].ratio, dec("0.9"));
    assert_eq!(view.budgets[0].state, BudgetState::Warning);
}

#[test]
fn foreign_owners_never_reach_the_view() {
    let store = MemoryStore::new();
    store.seed(
        Collection::Transactions,
        vec![
            expense("t1", "30", "Food", "2025-05-01"),
            json!({
                "id": "t2",
                "type": "expense",
                "amount": "999",
                "title": "other",
                "category": "Food",
                "ownerId": "u2",
                "occurredAt": "2025-05-01"
            }),
        ],
    );

    let mut feed = DashboardFeed::attach(&store, "u1", 7);
    let view = feed.next_view(d("2025-05-03")).unwrap();
    assert_eq!(view.summary.total_expense, dec("30"));
}

#[test]
fn malformed_documents_surface_as_errors() {
    let store = MemoryStore::new();
    store.seed(
        Collection::Transactions,
        vec![expense("t1", "not-a-number", "Food", "2025-05-01")],
    );

    let mut feed = DashboardFeed::attach(&store, "u1", 7);
    let err = feed.next_view(d("2025-05-03")).unwrap_err();
    assert!(matches!(
        err,
        FeedError::Input(InputError::BadAmount { .. })
    ));
}

#[test]
fn views_serialize_in_wire_shape() {
    let store = MemoryStore::new();
    store.seed(
        Collection::Transactions,
        vec![expense("t1", "30", "Food", "2025-05-02")],
    );
    store.seed(
        Collection::Budgets,
        vec![json!({ "id": "b1", "category": "Food", "limit": "60", "ownerId": "u1" })],
    );

    let mut feed = DashboardFeed::attach(&store, "u1", 3);
    let view = feed.next_view(d("2025-05-03")).unwrap();
    let wire = serde_json::to_value(&view).unwrap();

    assert_eq!(wire["referenceDate"], json!("2025-05-03"));
    assert_eq!(wire["summary"]["totalExpense"], json!("30"));
    assert_eq!(wire["summary"]["categoryTotals"][0]["category"], json!("Food"));
    let share = wire["summary"]["categoryTotals"][0]["percentage"]
        .as_str()
        .unwrap();
    assert_eq!(share.parse::<Decimal>().unwrap(), dec("100"));
    assert_eq!(wire["summary"]["dailySeries"].as_array().unwrap().len(), 3);
    assert_eq!(wire["summary"]["dailySeries"][1]["date"], json!("2025-05-02"));
    assert_eq!(wire["budgets"][0]["state"], json!("ok"));
    let ratio = wire["budgets"][0]["ratio"].as_str().unwrap();
    assert_eq!(ratio.parse::<Decimal>().unwrap(), dec("0.5"));
}

#[test]
fn detached_feeds_stop_consuming_subscriptions() {
    let store = MemoryStore::new();
    {
        let mut feed = DashboardFeed::attach(&store, "u1", 7);
        feed.next_view(d("2025-05-03")).unwrap();
    }
    // Dropping the feed released its listeners; later writes go nowhere.
    store
        .create(
            Collection::Transactions,
            expense("t1", "10", "Food", "2025-05-02"),
        )
        .unwrap();
}
