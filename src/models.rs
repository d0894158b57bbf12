// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Label used for transactions whose category is missing or blank.
pub const OTHER_CATEGORY: &str = "Other";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum InputError {
    #[error("window must cover at least one day")]
    EmptyWindow,
    #[error("window of {0} days does not fit the calendar")]
    WindowOverflow(u32),
    #[error("record {id}: negative amount {amount}")]
    NegativeAmount { id: String, amount: Decimal },
    #[error("record {id}: negative limit {limit}")]
    NegativeLimit { id: String, limit: Decimal },
    #[error("record {id}: '{raw}' is not a decimal amount")]
    BadAmount { id: String, raw: String },
    #[error("record {id}: '{raw}' is not a recognized date")]
    BadDate { id: String, raw: String },
    #[error("record {id}: '{raw}' is not a transaction type")]
    BadKind { id: String, raw: String },
    #[error("record {id}: missing field '{field}'")]
    MissingField { id: String, field: &'static str },
    #[error("record is not a JSON object")]
    NotAnObject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Income,
    Expense,
}

impl TxKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::fmt::Display for TxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TxKind,
    pub amount: Decimal,
    pub title: String,
    pub category: String,
    pub owner_id: String,
    pub occurred_at: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub category: String,
    pub limit: Decimal,
    pub owner_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Canonical grouping key for a category label: trimmed and case-folded.
/// Blank labels fold into the key of [`OTHER_CATEGORY`].
pub fn normalize_category(raw: &str) -> String {
    let key = raw.trim().to_lowercase();
    if key.is_empty() {
        OTHER_CATEGORY.to_lowercase()
    } else {
        key
    }
}

/// Label shown for a raw category value: the trimmed original spelling,
/// or [`OTHER_CATEGORY`] when blank.
pub fn display_category(raw: &str) -> String {
    let label = raw.trim();
    if label.is_empty() {
        OTHER_CATEGORY.to_string()
    } else {
        label.to_string()
    }
}

impl Transaction {
    pub fn from_value(doc: &Value) -> Result<Self, InputError> {
        let obj = doc.as_object().ok_or(InputError::NotAnObject)?;
        let id = opt_str(obj, "id").unwrap_or_default();
        let raw_kind = req_str(obj, "type", &id)?;
        let kind = TxKind::parse(&raw_kind).ok_or_else(|| InputError::BadKind {
            id: id.clone(),
            raw: raw_kind,
        })?;
        Ok(Self {
            kind,
            amount: req_decimal(obj, "amount", &id)?,
            title: opt_str(obj, "title").unwrap_or_default(),
            category: opt_str(obj, "category").unwrap_or_default(),
            owner_id: req_str(obj, "ownerId", &id)?,
            occurred_at: req_date(obj, "occurredAt", &id)?,
            id,
        })
    }
}

impl Budget {
    pub fn from_value(doc: &Value) -> Result<Self, InputError> {
        let obj = doc.as_object().ok_or(InputError::NotAnObject)?;
        let id = opt_str(obj, "id").unwrap_or_default();
        let limit = req_decimal(obj, "limit", &id)?;
        if limit < Decimal::ZERO {
            return Err(InputError::NegativeLimit { id, limit });
        }
        Ok(Self {
            category: req_str(obj, "category", &id)?,
            limit,
            owner_id: req_str(obj, "ownerId", &id)?,
            color: opt_str(obj, "color"),
            id,
        })
    }
}

impl Category {
    pub fn from_value(doc: &Value) -> Result<Self, InputError> {
        let obj = doc.as_object().ok_or(InputError::NotAnObject)?;
        let id = opt_str(obj, "id").unwrap_or_default();
        Ok(Self {
            name: req_str(obj, "name", &id)?,
            owner_id: req_str(obj, "ownerId", &id)?,
            icon: opt_str(obj, "icon"),
            color: opt_str(obj, "color"),
            id,
        })
    }
}

fn opt_str(obj: &serde_json::Map<String, Value>, field: &str) -> Option<String> {
    obj.get(field).and_then(Value::as_str).map(str::to_string)
}

fn req_str(
    obj: &serde_json::Map<String, Value>,
    field: &'static str,
    id: &str,
) -> Result<String, InputError> {
    opt_str(obj, field).ok_or_else(|| InputError::MissingField {
        id: id.to_string(),
        field,
    })
}

// Amounts arrive either as JSON numbers or as decimal strings. Anything
// else is rejected rather than coerced to zero.
fn req_decimal(
    obj: &serde_json::Map<String, Value>,
    field: &'static str,
    id: &str,
) -> Result<Decimal, InputError> {
    let raw = obj.get(field).ok_or_else(|| InputError::MissingField {
        id: id.to_string(),
        field,
    })?;
    let bad = |raw: &Value| InputError::BadAmount {
        id: id.to_string(),
        raw: raw.to_string(),
    };
    match raw {
        Value::Number(n) => n
            .to_string()
            .parse::<Decimal>()
            .ok()
            .or_else(|| n.as_f64().and_then(|f| Decimal::try_from(f).ok()))
            .ok_or_else(|| bad(raw)),
        Value::String(s) => s.trim().parse::<Decimal>().map_err(|_| bad(raw)),
        _ => Err(bad(raw)),
    }
}

// Dates arrive as plain YYYY-MM-DD, as RFC 3339 timestamps, or as naive
// ISO timestamps. The calendar day is taken as recorded, without
// timezone conversion.
fn req_date(
    obj: &serde_json::Map<String, Value>,
    field: &'static str,
    id: &str,
) -> Result<NaiveDate, InputError> {
    let raw = req_str(obj, field, id)?;
    let s = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt.date());
    }
    Err(InputError::BadDate {
        id: id.to_string(),
        raw,
    })
}
