// Copyright 2026 Theke Authors
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::ids::*;

/// A billing record owned by the remote shop service. The console only ever
/// holds the copy from the most recent page fetch; `mailed` moves from false
/// to true exactly once in the normal flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: InvoiceId,
    pub user_id: String,
    pub amount_cents: i64,
    pub mailed: bool,
    #[serde(with = "time::serde::timestamp")]
    pub created_at: OffsetDateTime,
}

/// One page of invoices as reported by the service. Replaced wholesale on
/// every fetch, never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePage {
    pub content: Vec<Invoice>,
    pub total_pages: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopItem {
    pub id: ShopItemId,
    pub identifier: String,
    pub display_name: String,
    pub category: String,
    pub price_cents: i64,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopHistoryEntry {
    pub id: HistoryEntryId,
    pub user_id: String,
    pub item_display_name: String,
    pub price_cents: i64,
    #[serde(with = "time::serde::timestamp")]
    pub created_at: OffsetDateTime,
}

/// The caller's own account record, including the two profile switches the
/// console can flip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KioskUser {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub balance_cents: i64,
    pub total_spent_cents: i64,
    pub hidden: bool,
    pub kiosk: bool,
}

impl KioskUser {
    pub fn display_name_or_id(&self) -> &str {
        if self.display_name.is_empty() {
            &self.id
        } else {
            &self.display_name
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabKind {
    Invoices,
    Items,
    Statistics,
    Profile,
}

impl TabKind {
    pub const ALL: [Self; 4] = [Self::Invoices, Self::Items, Self::Statistics, Self::Profile];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Invoices => "invoices",
            Self::Items => "items",
            Self::Statistics => "stats",
            Self::Profile => "profile",
        }
    }
}

pub fn format_money(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.abs();
    format!("{sign}{}.{:02} €", abs / 100, abs % 100)
}
