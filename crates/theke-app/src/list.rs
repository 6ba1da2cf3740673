// Copyright 2026 Theke Authors
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;

use crate::model::{Invoice, InvoicePage};
use crate::state::Notice;
use crate::ids::InvoiceId;

/// Half-width of the page button window around the selected page.
pub const PAGE_RANGE: usize = 5;

/// Inclusive `[min, max]` range of page indices to render as buttons,
/// centered on `selected_page` and clamped to the start and end of the page
/// count. `None` when there are no pages at all.
pub fn page_window(selected_page: usize, total_pages: usize) -> Option<(usize, usize)> {
    if total_pages == 0 {
        return None;
    }

    let last = total_pages - 1;
    let mut min_page = selected_page.saturating_sub(PAGE_RANGE);
    let mut max_page = (selected_page + PAGE_RANGE).min(last);

    if selected_page <= PAGE_RANGE {
        min_page = 0;
        max_page = (2 * PAGE_RANGE).min(last);
    } else if selected_page + PAGE_RANGE >= last {
        min_page = total_pages.saturating_sub(2 + 2 * PAGE_RANGE);
        max_page = last;
    }

    Some((min_page, max_page))
}

/// Tri-state mail filter. A single successor function keeps the cycle total:
/// every state has exactly one next state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MailedFilter {
    #[default]
    All,
    Mailed,
    Unmailed,
}

impl MailedFilter {
    pub const fn cycled(self) -> Self {
        match self {
            Self::All => Self::Mailed,
            Self::Mailed => Self::Unmailed,
            Self::Unmailed => Self::All,
        }
    }

    pub const fn as_query(self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Mailed => Some(true),
            Self::Unmailed => Some(false),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Mailed => "mailed",
            Self::Unmailed => "unmailed",
        }
    }
}

/// Checked invoice ids. Members always refer to the last-fetched page; mailed
/// invoices are never selectable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<InvoiceId>,
}

impl SelectionSet {
    pub fn toggle(&mut self, id: InvoiceId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    pub fn contains(&self, id: InvoiceId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn ids(&self) -> Vec<InvoiceId> {
        self.ids.iter().copied().collect()
    }

    /// True iff every invoice on the page is either selected or already
    /// mailed. An empty page or an empty selection is never "all selected",
    /// so a page with zero eligible rows cannot toggle vacuously.
    pub fn is_all_eligible_selected(&self, invoices: &[Invoice]) -> bool {
        if invoices.is_empty() || self.ids.is_empty() {
            return false;
        }
        invoices
            .iter()
            .all(|invoice| self.ids.contains(&invoice.id) || invoice.mailed)
    }

    /// Select-all toggle: clears the set when everything eligible is already
    /// selected, otherwise replaces the set with exactly the unmailed ids.
    /// A full reset, not a merge.
    pub fn select_all_eligible(&mut self, invoices: &[Invoice]) {
        if self.is_all_eligible_selected(invoices) {
            self.ids.clear();
            return;
        }

        self.ids = invoices
            .iter()
            .filter(|invoice| !invoice.mailed)
            .map(|invoice| invoice.id)
            .collect();
    }
}

/// Parameters of one list fetch, passed verbatim to the shop service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: usize,
    pub size: usize,
    pub search: String,
    pub mailed: Option<bool>,
}

/// A fetch tagged with the sequence number it was issued under. Responses
/// carrying an older id than the newest issued one are stale and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub request_id: u64,
    pub query: ListQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    Mail,
    Delete,
}

impl BatchKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Mail => "mail",
            Self::Delete => "delete",
        }
    }
}

/// What the service did with a batch request, as seen by the controller.
///
/// `Completed` is a transport-level success carrying the subset of ids the
/// service actually processed; `Rejected` is a transport-level success with
/// no usable body; `Unreachable` is a failed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceReply {
    Completed(Vec<InvoiceId>),
    Rejected,
    Unreachable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    pub kind: BatchKind,
    pub ids: Vec<InvoiceId>,
}

/// Outcome of resolving a batch action: notices to surface and, on a success
/// path, the refetch that reflects the new server state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchResolution {
    pub notices: Vec<Notice>,
    pub refetch: Option<FetchRequest>,
}

/// The invoice tab controller: current page data, window bounds, filter and
/// search inputs, the selection, and the in-flight bookkeeping for fetches
/// and batch actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceList {
    invoices: Vec<Invoice>,
    selection: SelectionSet,
    selected_page: usize,
    total_pages: usize,
    window: Option<(usize, usize)>,
    filter: MailedFilter,
    search: String,
    page_size: usize,
    fetch_seq: u64,
    batch_in_flight: Option<BatchKind>,
}

impl InvoiceList {
    pub fn new(page_size: usize) -> Self {
        Self {
            invoices: Vec::new(),
            selection: SelectionSet::default(),
            selected_page: 0,
            total_pages: 0,
            window: None,
            filter: MailedFilter::All,
            search: String::new(),
            page_size,
            fetch_seq: 0,
            batch_in_flight: None,
        }
    }

    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn selected_page(&self) -> usize {
        self.selected_page
    }

    pub fn filter(&self) -> MailedFilter {
        self.filter
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn batch_in_flight(&self) -> Option<BatchKind> {
        self.batch_in_flight
    }

    pub fn is_current(&self, request_id: u64) -> bool {
        request_id == self.fetch_seq
    }

    /// Page indices the page bar should offer, in order. The service reports
    /// its page count off by one against the recorded total, so the last
    /// navigable index is `total - 2`.
    pub fn page_indices(&self) -> Vec<usize> {
        if self.total_pages < 2 {
            return Vec::new();
        }
        let last = self.total_pages - 2;
        let Some((min_page, max_page)) = self.window else {
            return Vec::new();
        };
        (min_page..=max_page.min(last)).collect()
    }

    fn next_request(&mut self) -> FetchRequest {
        self.fetch_seq += 1;
        FetchRequest {
            request_id: self.fetch_seq,
            query: ListQuery {
                page: self.selected_page,
                size: self.page_size,
                search: self.search.clone(),
                mailed: self.filter.as_query(),
            },
        }
    }

    /// The one-time initial fetch. Subsequent fetches are driven solely by
    /// page, search, and filter changes.
    pub fn init(&mut self) -> FetchRequest {
        self.next_request()
    }

    /// Refetch with unchanged parameters ("reload").
    pub fn refresh(&mut self) -> FetchRequest {
        self.next_request()
    }

    pub fn select_page(&mut self, page: usize) -> FetchRequest {
        self.selected_page = page;
        self.window = page_window(self.selected_page, self.total_pages);
        self.next_request()
    }

    pub fn next_page(&mut self) -> Option<FetchRequest> {
        let last = self.page_indices().into_iter().next_back()?;
        if self.selected_page >= last {
            return None;
        }
        Some(self.select_page(self.selected_page + 1))
    }

    pub fn prev_page(&mut self) -> Option<FetchRequest> {
        if self.selected_page == 0 {
            return None;
        }
        Some(self.select_page(self.selected_page - 1))
    }

    pub fn cycle_filter(&mut self) -> FetchRequest {
        self.filter = self.filter.cycled();
        self.next_request()
    }

    pub fn submit_search(&mut self, text: impl Into<String>) -> FetchRequest {
        self.search = text.into();
        self.next_request()
    }

    /// Apply a resolved page if it is still the newest fetch; a stale
    /// response never overwrites current state. Applying replaces the page
    /// wholesale, records the reported page count plus one, recomputes the
    /// window, and drops the selection because the page set changed.
    pub fn apply_page(&mut self, request_id: u64, page: InvoicePage) -> bool {
        if !self.is_current(request_id) {
            return false;
        }

        self.invoices = page.content;
        self.total_pages = page.total_pages.max(0) as usize + 1;
        self.window = page_window(self.selected_page, self.total_pages);
        self.selection.clear();
        true
    }

    /// Toggle one row. Mailed invoices are not selectable.
    pub fn toggle_selected(&mut self, id: InvoiceId) {
        let mailed = self
            .invoices
            .iter()
            .any(|invoice| invoice.id == id && invoice.mailed);
        if mailed {
            return;
        }
        self.selection.toggle(id);
    }

    pub fn toggle_all(&mut self) {
        self.selection.select_all_eligible(&self.invoices);
    }

    /// Start a batch action. `None` when there is nothing selected or
    /// another batch is still in flight; batches never overlap.
    pub fn begin_batch(&mut self, kind: BatchKind) -> Option<BatchRequest> {
        if self.selection.is_empty() || self.batch_in_flight.is_some() {
            return None;
        }
        self.batch_in_flight = Some(kind);
        Some(BatchRequest {
            kind,
            ids: self.selection.ids(),
        })
    }

    pub fn resolve_mail(&mut self, requested: usize, reply: ServiceReply) -> BatchResolution {
        self.batch_in_flight = None;
        let mut resolution = BatchResolution::default();

        match reply {
            ServiceReply::Completed(mailed) => {
                let succeeded = mailed.len();
                let failed = requested.saturating_sub(succeeded);
                if succeeded > 0 {
                    resolution
                        .notices
                        .push(Notice::success(format!("{} mailed", count_invoices(succeeded))));
                    if failed > 0 {
                        resolution
                            .notices
                            .push(Notice::warn(format!("{} not mailed", count_invoices(failed))));
                    }
                    self.selection.clear();
                    resolution.refetch = Some(self.refresh());
                } else {
                    // The service answered but processed nothing. Distinct
                    // from a rejected request: the selection stays so the
                    // user can retry.
                    resolution.notices.push(Notice::warn(format!(
                        "service mailed none of {}",
                        count_invoices(requested)
                    )));
                }
            }
            ServiceReply::Rejected => {
                resolution.notices.push(Notice::error("mail request failed"));
            }
            ServiceReply::Unreachable => {
                resolution
                    .notices
                    .push(Notice::error("shop service unreachable"));
            }
        }

        resolution
    }

    pub fn resolve_delete(&mut self, reply: ServiceReply) -> BatchResolution {
        self.batch_in_flight = None;
        let mut resolution = BatchResolution::default();

        match reply {
            ServiceReply::Completed(deleted) => {
                resolution
                    .notices
                    .push(Notice::success(format!("{} deleted", count_invoices(deleted.len()))));
                self.selection.clear();
                resolution.refetch = Some(self.refresh());
            }
            ServiceReply::Rejected => {
                resolution
                    .notices
                    .push(Notice::error("delete request failed"));
            }
            ServiceReply::Unreachable => {
                resolution
                    .notices
                    .push(Notice::error("shop service unreachable"));
            }
        }

        resolution
    }
}

fn count_invoices(count: usize) -> String {
    if count == 1 {
        "1 invoice".to_owned()
    } else {
        format!("{count} invoices")
    }
}

#[cfg(test)]
mod tests {
    use super::{
        BatchKind, InvoiceList, MailedFilter, PAGE_RANGE, SelectionSet, ServiceReply, page_window,
    };
    use crate::model::{Invoice, InvoicePage};
    use crate::state::{Notice, NoticeLevel};
    use crate::ids::InvoiceId;
    use time::OffsetDateTime;

    fn invoice(id: i64, mailed: bool) -> Invoice {
        Invoice {
            id: InvoiceId::new(id),
            user_id: format!("user{id}"),
            amount_cents: id * 100,
            mailed,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn page(invoices: Vec<Invoice>, total_pages: i64) -> InvoicePage {
        InvoicePage {
            content: invoices,
            total_pages,
        }
    }

    fn loaded_list(invoices: Vec<Invoice>, reported_total: i64) -> InvoiceList {
        let mut list = InvoiceList::new(10);
        let request = list.init();
        assert!(list.apply_page(request.request_id, page(invoices, reported_total)));
        list
    }

    #[test]
    fn window_is_empty_without_pages() {
        assert_eq!(page_window(0, 0), None);
    }

    #[test]
    fn window_boundaries_match_reference_values() {
        assert_eq!(page_window(0, 1), Some((0, 0)));
        assert_eq!(page_window(0, 100), Some((0, 10)));
        assert_eq!(page_window(99, 100), Some((88, 99)));
        assert_eq!(page_window(50, 100), Some((45, 55)));
    }

    #[test]
    fn window_stays_in_bounds_for_all_inputs() {
        for total_pages in 1..64usize {
            for selected in 0..total_pages {
                let (min_page, max_page) =
                    page_window(selected, total_pages).expect("window for non-empty pages");
                assert!(min_page <= max_page);
                assert!(max_page < total_pages);
                // Near the end the reference algorithm widens to 2R+2 pages.
                assert!(max_page - min_page + 1 <= 2 * PAGE_RANGE + 2);
            }
        }
    }

    #[test]
    fn filter_cycle_is_total_and_returns_to_start() {
        let mut filter = MailedFilter::All;
        filter = filter.cycled();
        assert_eq!(filter, MailedFilter::Mailed);
        assert_eq!(filter.as_query(), Some(true));
        filter = filter.cycled();
        assert_eq!(filter, MailedFilter::Unmailed);
        assert_eq!(filter.as_query(), Some(false));
        filter = filter.cycled();
        assert_eq!(filter, MailedFilter::All);
        assert_eq!(filter.as_query(), None);
    }

    #[test]
    fn selection_toggle_is_symmetric_difference() {
        let mut selection = SelectionSet::default();
        selection.toggle(InvoiceId::new(1));
        assert!(selection.contains(InvoiceId::new(1)));
        selection.toggle(InvoiceId::new(1));
        assert!(selection.is_empty());
    }

    #[test]
    fn all_selected_is_never_vacuously_true() {
        let selection = SelectionSet::default();
        assert!(!selection.is_all_eligible_selected(&[]));
        assert!(!selection.is_all_eligible_selected(&[invoice(1, true)]));
    }

    #[test]
    fn all_selected_ignores_mailed_rows() {
        let mut selection = SelectionSet::default();
        let invoices = vec![invoice(1, false), invoice(2, true), invoice(3, false)];
        selection.toggle(InvoiceId::new(1));
        assert!(!selection.is_all_eligible_selected(&invoices));
        selection.toggle(InvoiceId::new(3));
        assert!(selection.is_all_eligible_selected(&invoices));
    }

    #[test]
    fn select_all_replaces_prior_selection_with_unmailed_ids() {
        let mut selection = SelectionSet::default();
        let invoices = vec![invoice(1, false), invoice(2, true), invoice(3, false)];
        // A stale manual pick of the mailed row must not survive the reset.
        selection.toggle(InvoiceId::new(2));

        selection.select_all_eligible(&invoices);
        assert_eq!(selection.ids(), vec![InvoiceId::new(1), InvoiceId::new(3)]);

        selection.select_all_eligible(&invoices);
        assert!(selection.is_empty());
    }

    #[test]
    fn init_issues_fetch_with_current_parameters() {
        let mut list = InvoiceList::new(25);
        let request = list.init();
        assert_eq!(request.request_id, 1);
        assert_eq!(request.query.page, 0);
        assert_eq!(request.query.size, 25);
        assert_eq!(request.query.search, "");
        assert_eq!(request.query.mailed, None);
    }

    #[test]
    fn stale_response_does_not_overwrite_newer_state() {
        let mut list = InvoiceList::new(10);
        let first = list.init();
        let second = list.submit_search("a");

        assert!(!list.apply_page(first.request_id, page(vec![invoice(1, false)], 4)));
        assert!(list.invoices().is_empty());

        assert!(list.apply_page(second.request_id, page(vec![invoice(2, false)], 4)));
        assert_eq!(list.invoices().len(), 1);
        assert_eq!(list.invoices()[0].id, InvoiceId::new(2));
    }

    #[test]
    fn apply_page_records_reported_total_plus_one_and_clears_selection() {
        let mut list = loaded_list(vec![invoice(1, false)], 4);
        list.toggle_selected(InvoiceId::new(1));
        assert_eq!(list.selection().len(), 1);

        let request = list.refresh();
        assert!(list.apply_page(request.request_id, page(vec![invoice(1, false)], 4)));
        assert!(list.selection().is_empty());
        // Reported 4 pages, recorded 5; navigable indices stop at 3.
        assert_eq!(list.page_indices(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn page_indices_are_empty_when_service_reports_no_pages() {
        let list = loaded_list(Vec::new(), 0);
        assert!(list.page_indices().is_empty());
    }

    #[test]
    fn page_navigation_stays_within_navigable_range() {
        let mut list = loaded_list(vec![invoice(1, false)], 3);
        assert!(list.prev_page().is_none());

        let request = list.next_page().expect("second page");
        assert_eq!(request.query.page, 1);
        assert_eq!(list.selected_page(), 1);

        assert!(list.next_page().is_some());
        assert_eq!(list.selected_page(), 2);
        assert!(list.next_page().is_none());
    }

    #[test]
    fn filter_and_search_changes_trigger_one_fetch_each() {
        let mut list = InvoiceList::new(10);
        list.init();

        let request = list.cycle_filter();
        assert_eq!(request.request_id, 2);
        assert_eq!(request.query.mailed, Some(true));

        let request = list.submit_search("mmuster");
        assert_eq!(request.request_id, 3);
        assert_eq!(request.query.search, "mmuster");
        assert_eq!(request.query.mailed, Some(true));
    }

    #[test]
    fn mailed_rows_cannot_be_toggled() {
        let mut list = loaded_list(vec![invoice(1, true), invoice(2, false)], 0);
        list.toggle_selected(InvoiceId::new(1));
        assert!(list.selection().is_empty());
        list.toggle_selected(InvoiceId::new(2));
        assert_eq!(list.selection().len(), 1);
    }

    #[test]
    fn batch_requires_selection_and_never_overlaps() {
        let mut list = loaded_list(vec![invoice(1, false)], 0);
        assert!(list.begin_batch(BatchKind::Mail).is_none());

        list.toggle_selected(InvoiceId::new(1));
        let batch = list.begin_batch(BatchKind::Mail).expect("batch starts");
        assert_eq!(batch.ids, vec![InvoiceId::new(1)]);
        assert_eq!(list.batch_in_flight(), Some(BatchKind::Mail));

        assert!(list.begin_batch(BatchKind::Delete).is_none());

        list.resolve_mail(1, ServiceReply::Completed(vec![InvoiceId::new(1)]));
        assert_eq!(list.batch_in_flight(), None);
    }

    #[test]
    fn partial_mail_success_reports_both_counts_and_refetches() {
        let mut list = loaded_list(
            (1..=5).map(|id| invoice(id, false)).collect(),
            0,
        );
        list.toggle_all();
        let batch = list.begin_batch(BatchKind::Mail).expect("batch starts");
        assert_eq!(batch.ids.len(), 5);

        let mailed = vec![InvoiceId::new(1), InvoiceId::new(2), InvoiceId::new(3)];
        let resolution = list.resolve_mail(batch.ids.len(), ServiceReply::Completed(mailed));

        assert_eq!(
            resolution.notices,
            vec![
                Notice::success("3 invoices mailed"),
                Notice::warn("2 invoices not mailed"),
            ],
        );
        assert!(list.selection().is_empty());
        assert!(resolution.refetch.is_some());
    }

    #[test]
    fn mail_success_message_is_singular_for_one_invoice() {
        let mut list = loaded_list(vec![invoice(1, false)], 0);
        list.toggle_selected(InvoiceId::new(1));
        let batch = list.begin_batch(BatchKind::Mail).expect("batch starts");

        let resolution =
            list.resolve_mail(batch.ids.len(), ServiceReply::Completed(batch.ids.clone()));
        assert_eq!(resolution.notices, vec![Notice::success("1 invoice mailed")]);
    }

    #[test]
    fn mail_with_nothing_processed_keeps_selection() {
        let mut list = loaded_list(vec![invoice(1, false), invoice(2, false)], 0);
        list.toggle_all();
        let batch = list.begin_batch(BatchKind::Mail).expect("batch starts");

        let resolution = list.resolve_mail(batch.ids.len(), ServiceReply::Completed(Vec::new()));
        assert_eq!(
            resolution.notices,
            vec![Notice::warn("service mailed none of 2 invoices")],
        );
        assert_eq!(list.selection().len(), 2);
        assert!(resolution.refetch.is_none());
    }

    #[test]
    fn rejected_and_unreachable_mail_leave_state_unchanged() {
        for reply in [ServiceReply::Rejected, ServiceReply::Unreachable] {
            let mut list = loaded_list(vec![invoice(1, false)], 0);
            list.toggle_selected(InvoiceId::new(1));
            let batch = list.begin_batch(BatchKind::Mail).expect("batch starts");

            let resolution = list.resolve_mail(batch.ids.len(), reply);
            assert_eq!(resolution.notices.len(), 1);
            assert_eq!(resolution.notices[0].level, NoticeLevel::Error);
            assert_eq!(list.selection().len(), 1);
            assert!(resolution.refetch.is_none());
        }
    }

    #[test]
    fn delete_success_clears_selection_and_refetches() {
        let mut list = loaded_list(vec![invoice(1, false), invoice(2, false)], 0);
        list.toggle_all();
        let batch = list.begin_batch(BatchKind::Delete).expect("batch starts");

        let resolution = list.resolve_delete(ServiceReply::Completed(batch.ids.clone()));
        assert_eq!(
            resolution.notices,
            vec![Notice::success("2 invoices deleted")],
        );
        assert!(list.selection().is_empty());
        assert!(resolution.refetch.is_some());
    }

    #[test]
    fn delete_failure_keeps_selection() {
        let mut list = loaded_list(vec![invoice(1, false)], 0);
        list.toggle_selected(InvoiceId::new(1));
        let batch = list.begin_batch(BatchKind::Delete).expect("batch starts");
        drop(batch);

        let resolution = list.resolve_delete(ServiceReply::Rejected);
        assert_eq!(resolution.notices, vec![Notice::error("delete request failed")]);
        assert_eq!(list.selection().len(), 1);
        assert!(resolution.refetch.is_none());
    }
}
