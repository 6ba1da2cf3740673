// Copyright 2026 Theke Authors
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use std::sync::mpsc::Sender;
use std::thread;
use theke_app::{
    FetchRequest, InvoiceId, InvoicePage, KioskUser, ListQuery, ShopHistoryEntry, ShopItem,
};
use theke_tui::InternalEvent;

/// Runtime backed by the shop service HTTP client. List fetches run on a
/// worker thread so pagination stays responsive on a slow link.
pub struct ApiRuntime {
    client: theke_api::Client,
}

impl ApiRuntime {
    pub fn new(client: theke_api::Client) -> Self {
        Self { client }
    }
}

impl theke_tui::AppRuntime for ApiRuntime {
    fn fetch_invoices(&mut self, query: &ListQuery) -> Result<InvoicePage> {
        self.client.list_invoices(query)
    }

    fn spawn_invoice_fetch(
        &mut self,
        request: &FetchRequest,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let client = self.client.clone();
        let request = request.clone();
        thread::spawn(move || {
            let outcome = client
                .list_invoices(&request.query)
                .map_err(|error| format!("{error:#}"));
            // The receiver going away just means the UI is shutting down.
            let _ = tx.send(InternalEvent::InvoicePage {
                request_id: request.request_id,
                outcome,
            });
        });
        Ok(())
    }

    fn mail_invoices(&mut self, ids: &[InvoiceId]) -> Result<Option<Vec<InvoiceId>>> {
        self.client.mail_invoices(ids)
    }

    fn delete_invoices(&mut self, ids: &[InvoiceId]) -> Result<Option<Vec<InvoiceId>>> {
        self.client.delete_invoices(ids)
    }

    fn load_items(&mut self) -> Result<Vec<ShopItem>> {
        self.client.list_items()
    }

    fn load_recent_history(&mut self, limit: usize) -> Result<Vec<ShopHistoryEntry>> {
        self.client.recent_history(limit)
    }

    fn load_profile(&mut self) -> Result<KioskUser> {
        self.client.own_profile()
    }

    fn set_profile_hidden(&mut self, hidden: bool) -> Result<()> {
        self.client.set_own_hidden(hidden)
    }

    fn set_profile_kiosk(&mut self, kiosk: bool) -> Result<()> {
        self.client.set_own_kiosk(kiosk)
    }
}

#[cfg(test)]
mod tests {
    use super::ApiRuntime;
    use anyhow::Result;
    use std::sync::mpsc;
    use std::time::Duration;
    use theke_app::{FetchRequest, ListQuery};
    use theke_tui::{AppRuntime, InternalEvent};

    fn runtime_for(base_url: &str) -> Result<ApiRuntime> {
        Ok(ApiRuntime::new(theke_api::Client::new(
            base_url,
            Duration::from_secs(2),
        )?))
    }

    #[test]
    fn spawned_fetch_reports_connection_failure_through_channel() -> Result<()> {
        // A detached thread against a closed port must deliver the error
        // through the channel instead of panicking.
        let mut runtime = runtime_for("http://127.0.0.1:1")?;
        let (tx, rx) = mpsc::channel();
        let request = FetchRequest {
            request_id: 7,
            query: ListQuery {
                page: 0,
                size: 10,
                search: String::new(),
                mailed: None,
            },
        };

        runtime.spawn_invoice_fetch(&request, tx)?;
        let event = rx.recv_timeout(Duration::from_secs(10))?;
        match event {
            InternalEvent::InvoicePage {
                request_id,
                outcome,
            } => {
                assert_eq!(request_id, 7);
                let message = outcome.expect_err("closed port should fail");
                assert!(message.contains("cannot reach shop service"));
            }
            other => panic!("unexpected event {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn spawned_fetch_delivers_page_from_live_server() -> Result<()> {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("bind mock server");
        let base_url = format!("http://{}", server.server_addr());
        let mut runtime = runtime_for(&base_url)?;

        let handle = std::thread::spawn(move || {
            let request = server.recv().expect("mock server request");
            let body = theke_testkit::invoice_page_json(&theke_testkit::sample_invoices(2), 3)
                .expect("fixture json");
            let response = tiny_http::Response::from_string(body).with_header(
                tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                    .expect("header"),
            );
            request.respond(response).expect("mock server respond");
        });

        let (tx, rx) = mpsc::channel();
        let request = FetchRequest {
            request_id: 1,
            query: ListQuery {
                page: 0,
                size: 10,
                search: String::new(),
                mailed: None,
            },
        };
        runtime.spawn_invoice_fetch(&request, tx)?;

        let event = rx.recv_timeout(Duration::from_secs(10))?;
        match event {
            InternalEvent::InvoicePage { outcome, .. } => {
                let page = outcome.expect("mock page decodes");
                assert_eq!(page.content.len(), 2);
                assert_eq!(page.total_pages, 3);
            }
            other => panic!("unexpected event {other:?}"),
        }
        handle.join().expect("mock server thread");
        Ok(())
    }
}
