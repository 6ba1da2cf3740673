// Copyright 2026 Theke Authors
// Licensed under the Apache License, Version 2.0

//! Deterministic fixture data for theke tests: invoices, items, history and
//! users with stable ids, plus JSON encoders for mock shop servers.

use anyhow::{Context, Result};
use theke_app::{
    HistoryEntryId, Invoice, InvoiceId, InvoicePage, KioskUser, ShopHistoryEntry, ShopItem,
    ShopItemId,
};
use time::{Duration, OffsetDateTime};

const USER_IDS: [&str; 8] = [
    "abecker", "cfuchs", "dlange", "ekrause", "fvogel", "gwinter", "hbrandt", "jseidel",
];

const ITEM_NAMES: [(&str, &str, &str, i64); 6] = [
    ("helles", "Helles", "beer", 150),
    ("radler", "Radler", "beer", 150),
    ("mate", "Club Mate", "soft", 120),
    ("spezi", "Spezi", "soft", 110),
    ("riegel", "Muesliriegel", "snack", 80),
    ("brezel", "Brezel", "snack", 100),
];

fn fixture_epoch() -> OffsetDateTime {
    // 2026-01-01T00:00:00Z, so fixtures sort the same way everywhere.
    OffsetDateTime::from_unix_timestamp(1_767_225_600).unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

/// `count` invoices with ids 1..=count; every third one is already mailed.
pub fn sample_invoices(count: usize) -> Vec<Invoice> {
    (1..=count as i64)
        .map(|id| Invoice {
            id: InvoiceId::new(id),
            user_id: USER_IDS[(id as usize - 1) % USER_IDS.len()].to_owned(),
            amount_cents: 250 + id * 35,
            mailed: id % 3 == 0,
            created_at: fixture_epoch() + Duration::hours(id),
        })
        .collect()
}

pub fn sample_items() -> Vec<ShopItem> {
    ITEM_NAMES
        .iter()
        .enumerate()
        .map(|(index, (identifier, name, category, price))| ShopItem {
            id: ShopItemId::new(index as i64 + 1),
            identifier: (*identifier).to_owned(),
            display_name: (*name).to_owned(),
            category: (*category).to_owned(),
            price_cents: *price,
            enabled: index != 4,
        })
        .collect()
}

/// `count` history entries, newest first.
pub fn sample_history(count: usize) -> Vec<ShopHistoryEntry> {
    let items = sample_items();
    (0..count as i64)
        .map(|offset| {
            let item = &items[offset as usize % items.len()];
            ShopHistoryEntry {
                id: HistoryEntryId::new(count as i64 - offset),
                user_id: USER_IDS[offset as usize % USER_IDS.len()].to_owned(),
                item_display_name: item.display_name.clone(),
                price_cents: item.price_cents,
                created_at: fixture_epoch() - Duration::minutes(offset * 15),
            }
        })
        .collect()
}

pub fn sample_user() -> KioskUser {
    KioskUser {
        id: "abecker".to_owned(),
        display_name: "Anna Becker".to_owned(),
        email: "abecker@example.org".to_owned(),
        balance_cents: 1_250,
        total_spent_cents: 34_780,
        hidden: false,
        kiosk: true,
    }
}

pub fn invoice_page(invoices: Vec<Invoice>, total_pages: i64) -> InvoicePage {
    InvoicePage {
        content: invoices,
        total_pages,
    }
}

pub fn invoice_page_json(invoices: &[Invoice], total_pages: i64) -> Result<String> {
    let page = InvoicePage {
        content: invoices.to_vec(),
        total_pages,
    };
    serde_json::to_string(&page).context("encode invoice page fixture")
}

pub fn history_page_json(entries: &[ShopHistoryEntry]) -> Result<String> {
    let body = serde_json::json!({ "content": entries, "totalPages": 1 });
    serde_json::to_string(&body).context("encode history page fixture")
}

pub fn ids_json(ids: &[InvoiceId]) -> Result<String> {
    serde_json::to_string(ids).context("encode id list fixture")
}
