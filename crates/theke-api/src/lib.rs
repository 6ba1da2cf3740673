// Copyright 2026 Theke Authors
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, Response};
use serde::Deserialize;
use std::time::Duration;
use theke_app::{InvoiceId, InvoicePage, KioskUser, ListQuery, ShopHistoryEntry, ShopItem};
use url::Url;

/// Reject anything that is not a plain http(s) base URL before a request is
/// ever built from it.
pub fn validate_base_url(raw: &str) -> Result<()> {
    let parsed = Url::parse(raw).with_context(|| format!("invalid server.base_url {raw:?}"))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        bail!(
            "server.base_url {raw:?} must use http or https, got {:?}",
            parsed.scheme()
        );
    }
    if parsed.host_str().is_none() {
        bail!("server.base_url {raw:?} has no host");
    }
    Ok(())
}

/// Blocking client for the shop service. Cheap to clone; clones share the
/// underlying connection pool, so fetch threads can carry their own copy.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("server.base_url must not be empty");
        }
        validate_base_url(&base_url)?;

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Startup check: the service is reachable and answers for the calling
    /// account.
    pub fn ping(&self) -> Result<()> {
        self.own_profile().map(drop)
    }

    pub fn list_invoices(&self, query: &ListQuery) -> Result<InvoicePage> {
        let mut params: Vec<(&str, String)> = vec![
            ("p", query.page.to_string()),
            ("s", query.size.to_string()),
        ];
        if !query.search.is_empty() {
            params.push(("q", query.search.clone()));
        }
        if let Some(mailed) = query.mailed {
            params.push(("mailed", mailed.to_string()));
        }

        let response = self
            .http
            .get(format!("{}/api/invoices/list", self.base_url))
            .query(&params)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let response = checked(response)?;
        response.json().context("decode invoice page")
    }

    /// Returns the subset of ids the service actually mailed, or `None` when
    /// the service answered without a usable body.
    pub fn mail_invoices(&self, ids: &[InvoiceId]) -> Result<Option<Vec<InvoiceId>>> {
        self.post_batch("mail", ids)
    }

    /// Returns the subset of ids the service actually deleted, or `None`
    /// when the service answered without a usable body.
    pub fn delete_invoices(&self, ids: &[InvoiceId]) -> Result<Option<Vec<InvoiceId>>> {
        self.post_batch("delete", ids)
    }

    fn post_batch(&self, action: &str, ids: &[InvoiceId]) -> Result<Option<Vec<InvoiceId>>> {
        let response = self
            .http
            .post(format!("{}/api/invoices/{action}", self.base_url))
            .json(ids)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let response = checked(response)?;
        let body = response.text().context("read batch response")?;
        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(None);
        }

        let processed: Vec<InvoiceId> =
            serde_json::from_str(trimmed).context("decode batch response")?;
        Ok(Some(processed))
    }

    pub fn list_items(&self) -> Result<Vec<ShopItem>> {
        let response = self
            .http
            .get(format!("{}/api/items/list", self.base_url))
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let response = checked(response)?;
        response.json().context("decode item list")
    }

    /// Most recent shop history entries, newest first.
    pub fn recent_history(&self, limit: usize) -> Result<Vec<ShopHistoryEntry>> {
        let response = self
            .http
            .get(format!("{}/api/history/shop/list", self.base_url))
            .query(&[("p", "0".to_owned()), ("s", limit.to_string())])
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let response = checked(response)?;
        let page: HistoryPage = response.json().context("decode history page")?;
        Ok(page.content)
    }

    pub fn own_profile(&self) -> Result<KioskUser> {
        let response = self
            .http
            .get(format!("{}/api/users/me", self.base_url))
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let response = checked(response)?;
        response.json().context("decode own profile")
    }

    pub fn set_own_hidden(&self, hidden: bool) -> Result<()> {
        self.post_profile_flag("hidden", hidden)
    }

    pub fn set_own_kiosk(&self, kiosk: bool) -> Result<()> {
        self.post_profile_flag("kiosk", kiosk)
    }

    fn post_profile_flag(&self, flag: &str, value: bool) -> Result<()> {
        let response = self
            .http
            .post(format!("{}/api/users/me/{flag}", self.base_url))
            .query(&[("value", value.to_string())])
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        checked(response).map(drop)
    }
}

#[derive(Debug, Deserialize)]
struct HistoryPage {
    content: Vec<ShopHistoryEntry>,
}

fn checked(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(clean_error_response(status, &body))
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!(
        "cannot reach shop service at {} -- check [server].base_url and that the backend is up ({} )",
        base_url,
        error
    )
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<ServiceErrorEnvelope>(body)
        && let Some(message) = parsed.message
        && !message.is_empty()
    {
        return anyhow!("server error ({}): {}", status.as_u16(), message);
    }

    if body.len() < 100 && !body.contains('{') && !body.trim().is_empty() {
        return anyhow!("server error ({}): {}", status.as_u16(), body.trim());
    }

    anyhow!("server returned {}", status.as_u16())
}

#[derive(Debug, Deserialize)]
struct ServiceErrorEnvelope {
    message: Option<String>,
}
