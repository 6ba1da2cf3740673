// Copyright 2026 Theke Authors
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use theke_app::{
    AppCommand, AppMode, AppState, BatchKind, FetchRequest, InvoiceId, InvoiceList, InvoicePage,
    KioskUser, ListQuery, Notice, NoticeLevel, ServiceReply, ShopHistoryEntry, ShopItem, TabKind,
    format_money,
};

const MAILED_MARK: &str = "✓";
const SELECTED_MARK: &str = "[x]";
const UNSELECTED_MARK: &str = "[ ]";
const NOTICE_SECONDS: u64 = 4;

/// Seam between the UI and the shop service. The CLI implements this over
/// the HTTP client; tests implement it in memory.
pub trait AppRuntime {
    fn fetch_invoices(&mut self, query: &ListQuery) -> Result<InvoicePage>;
    /// Run a tagged list fetch and deliver the outcome through the internal
    /// event channel. The default completes synchronously; runtimes backed
    /// by a network move this onto a thread.
    fn spawn_invoice_fetch(
        &mut self,
        request: &FetchRequest,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let outcome = self
            .fetch_invoices(&request.query)
            .map_err(|error| format!("{error:#}"));
        tx.send(InternalEvent::InvoicePage {
            request_id: request.request_id,
            outcome,
        })
        .map_err(|_| anyhow!("fetch event channel closed"))?;
        Ok(())
    }
    fn mail_invoices(&mut self, ids: &[InvoiceId]) -> Result<Option<Vec<InvoiceId>>>;
    fn delete_invoices(&mut self, ids: &[InvoiceId]) -> Result<Option<Vec<InvoiceId>>>;
    fn load_items(&mut self) -> Result<Vec<ShopItem>>;
    fn load_recent_history(&mut self, limit: usize) -> Result<Vec<ShopHistoryEntry>>;
    fn load_profile(&mut self) -> Result<KioskUser>;
    fn set_profile_hidden(&mut self, hidden: bool) -> Result<()>;
    fn set_profile_kiosk(&mut self, kiosk: bool) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearNotice {
        token: u64,
    },
    InvoicePage {
        request_id: u64,
        outcome: Result<InvoicePage, String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiOptions {
    pub page_size: usize,
    pub history_size: usize,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            page_size: 10,
            history_size: 5,
        }
    }
}

struct ViewData {
    list: InvoiceList,
    invoice_cursor: usize,
    search_input: String,
    items: Vec<ShopItem>,
    item_cursor: usize,
    history: Vec<ShopHistoryEntry>,
    history_size: usize,
    profile: Option<KioskUser>,
    notice_token: u64,
}

impl ViewData {
    fn new(options: UiOptions) -> Self {
        Self {
            list: InvoiceList::new(options.page_size),
            invoice_cursor: 0,
            search_input: String::new(),
            items: Vec::new(),
            item_cursor: 0,
            history: Vec::new(),
            history_size: options.history_size,
            profile: None,
            notice_token: 0,
        }
    }

    fn clamp_cursors(&mut self) {
        let invoice_rows = self.list.invoices().len();
        if self.invoice_cursor >= invoice_rows {
            self.invoice_cursor = invoice_rows.saturating_sub(1);
        }
        if self.item_cursor >= self.items.len() {
            self.item_cursor = self.items.len().saturating_sub(1);
        }
    }
}

pub fn run_app<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    options: UiOptions,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::new(options);
    let (internal_tx, internal_rx) = mpsc::channel();

    initial_load(state, runtime, &mut view_data, &internal_tx);

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_tx, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

/// One explicit initialization step per controller lifetime; after this,
/// fetches happen only when page, search, or filter change.
fn initial_load<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let request = view_data.list.init();
    spawn_fetch(state, runtime, view_data, internal_tx, request);
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearNotice { token } if token == view_data.notice_token => {
                state.dispatch(AppCommand::ClearNotice);
            }
            InternalEvent::ClearNotice { .. } => {}
            InternalEvent::InvoicePage {
                request_id,
                outcome,
            } => {
                if !view_data.list.is_current(request_id) {
                    // Stale response: newer parameters were issued while
                    // this fetch ran.
                    continue;
                }
                match outcome {
                    Ok(page) => {
                        view_data.list.apply_page(request_id, page);
                        view_data.clamp_cursors();
                    }
                    Err(message) => {
                        emit_notice(
                            state,
                            view_data,
                            tx,
                            Notice::error(format!("invoice fetch failed: {message}")),
                        );
                    }
                }
            }
        }
    }
}

fn schedule_notice_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(NOTICE_SECONDS));
        let _ = sender.send(InternalEvent::ClearNotice { token });
    });
}

fn emit_notice(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    notice: Notice,
) {
    state.dispatch(AppCommand::SetNotice(notice));
    view_data.notice_token = view_data.notice_token.saturating_add(1);
    schedule_notice_clear(internal_tx, view_data.notice_token);
}

fn spawn_fetch<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    request: FetchRequest,
) {
    if let Err(error) = runtime.spawn_invoice_fetch(&request, internal_tx.clone()) {
        emit_notice(
            state,
            view_data,
            internal_tx,
            Notice::error(format!("invoice fetch failed: {error:#}")),
        );
    }
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match state.mode {
        AppMode::Help => {
            state.dispatch(AppCommand::ExitToNav);
            false
        }
        AppMode::Search => {
            handle_search_key(state, runtime, view_data, internal_tx, key);
            false
        }
        AppMode::Confirm(kind) => {
            handle_confirm_key(state, runtime, view_data, internal_tx, key, kind);
            false
        }
        AppMode::Nav => {
            handle_nav_key(state, runtime, view_data, internal_tx, key);
            false
        }
    }
}

fn handle_search_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Enter => {
            // Enter submits and refetches immediately.
            let request = view_data.list.submit_search(view_data.search_input.clone());
            state.dispatch(AppCommand::ExitToNav);
            spawn_fetch(state, runtime, view_data, internal_tx, request);
        }
        KeyCode::Esc => {
            view_data.search_input = view_data.list.search().to_owned();
            state.dispatch(AppCommand::ExitToNav);
        }
        KeyCode::Backspace => {
            view_data.search_input.pop();
        }
        KeyCode::Char(c) => {
            view_data.search_input.push(c);
        }
        _ => {}
    }
}

fn handle_confirm_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
    kind: BatchKind,
) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
            state.dispatch(AppCommand::ExitToNav);
            run_batch(state, runtime, view_data, internal_tx, kind);
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            state.dispatch(AppCommand::ExitToNav);
        }
        _ => {}
    }
}

fn handle_nav_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Tab => {
            state.dispatch(AppCommand::NextTab);
            ensure_tab_loaded(state, runtime, view_data, internal_tx, false);
            return;
        }
        KeyCode::BackTab => {
            state.dispatch(AppCommand::PrevTab);
            ensure_tab_loaded(state, runtime, view_data, internal_tx, false);
            return;
        }
        KeyCode::Char('?') => {
            state.dispatch(AppCommand::OpenHelp);
            return;
        }
        KeyCode::Char('r') => {
            ensure_tab_loaded(state, runtime, view_data, internal_tx, true);
            return;
        }
        _ => {}
    }

    match state.active_tab {
        TabKind::Invoices => handle_invoice_key(state, runtime, view_data, internal_tx, key),
        TabKind::Items => handle_item_key(view_data, key),
        TabKind::Statistics => {}
        TabKind::Profile => handle_profile_key(state, runtime, view_data, internal_tx, key),
    }
}

fn handle_invoice_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            let rows = view_data.list.invoices().len();
            if rows > 0 && view_data.invoice_cursor + 1 < rows {
                view_data.invoice_cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view_data.invoice_cursor = view_data.invoice_cursor.saturating_sub(1);
        }
        KeyCode::Char(' ') => {
            if let Some(invoice) = view_data.list.invoices().get(view_data.invoice_cursor) {
                let id = invoice.id;
                view_data.list.toggle_selected(id);
            }
        }
        KeyCode::Char('a') => {
            view_data.list.toggle_all();
        }
        KeyCode::Char('f') => {
            let request = view_data.list.cycle_filter();
            spawn_fetch(state, runtime, view_data, internal_tx, request);
        }
        KeyCode::Char('/') => {
            state.dispatch(AppCommand::EnterSearch);
        }
        KeyCode::Char('h') | KeyCode::Left => {
            if let Some(request) = view_data.list.prev_page() {
                spawn_fetch(state, runtime, view_data, internal_tx, request);
            }
        }
        KeyCode::Char('l') | KeyCode::Right => {
            if let Some(request) = view_data.list.next_page() {
                spawn_fetch(state, runtime, view_data, internal_tx, request);
            }
        }
        KeyCode::Char('m') => {
            if batch_available(view_data) {
                state.dispatch(AppCommand::OpenConfirm(BatchKind::Mail));
            }
        }
        KeyCode::Char('d') => {
            if batch_available(view_data) {
                state.dispatch(AppCommand::OpenConfirm(BatchKind::Delete));
            }
        }
        _ => {}
    }
}

/// Batch triggers stay disabled while a batch is in flight and when nothing
/// is selected.
fn batch_available(view_data: &ViewData) -> bool {
    !view_data.list.selection().is_empty() && view_data.list.batch_in_flight().is_none()
}

fn handle_item_key(view_data: &mut ViewData, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if !view_data.items.is_empty() && view_data.item_cursor + 1 < view_data.items.len() {
                view_data.item_cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view_data.item_cursor = view_data.item_cursor.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_profile_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let Some(profile) = view_data.profile.clone() else {
        return;
    };

    match key.code {
        KeyCode::Char('h') => {
            let hidden = !profile.hidden;
            let message = if hidden {
                "profile is now hidden"
            } else {
                "profile is now public"
            };
            apply_profile_toggle(
                state,
                runtime,
                view_data,
                internal_tx,
                message,
                |runtime| runtime.set_profile_hidden(hidden),
            );
        }
        KeyCode::Char('k') => {
            let kiosk = !profile.kiosk;
            let message = if kiosk {
                "kiosk can purchase for this profile"
            } else {
                "kiosk purchases are disabled"
            };
            apply_profile_toggle(
                state,
                runtime,
                view_data,
                internal_tx,
                message,
                |runtime| runtime.set_profile_kiosk(kiosk),
            );
        }
        _ => {}
    }
}

/// Apply one profile switch. On success the profile is refetched rather than
/// patched in place, so no stale shared copy survives.
fn apply_profile_toggle<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    success_message: &str,
    toggle: impl FnOnce(&mut R) -> Result<()>,
) {
    match toggle(runtime) {
        Ok(()) => {
            match runtime.load_profile() {
                Ok(profile) => view_data.profile = Some(profile),
                Err(error) => {
                    emit_notice(
                        state,
                        view_data,
                        internal_tx,
                        Notice::error(format!("profile reload failed: {error:#}")),
                    );
                    return;
                }
            }
            emit_notice(state, view_data, internal_tx, Notice::success(success_message));
        }
        Err(_) => {
            emit_notice(state, view_data, internal_tx, Notice::error("profile update failed"));
        }
    }
}

/// Load the data behind the active tab; satellites load lazily on first
/// visit, `force` reloads unconditionally (the `r` key).
fn ensure_tab_loaded<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    force: bool,
) {
    match state.active_tab {
        TabKind::Invoices => {
            if force {
                let request = view_data.list.refresh();
                spawn_fetch(state, runtime, view_data, internal_tx, request);
            }
        }
        TabKind::Items => {
            if force || view_data.items.is_empty() {
                match runtime.load_items() {
                    Ok(items) => {
                        view_data.items = items;
                        view_data.clamp_cursors();
                    }
                    Err(error) => emit_notice(
                        state,
                        view_data,
                        internal_tx,
                        Notice::error(format!("item fetch failed: {error:#}")),
                    ),
                }
            }
        }
        TabKind::Statistics => {
            if force || view_data.history.is_empty() {
                match runtime.load_recent_history(view_data.history_size) {
                    Ok(history) => view_data.history = history,
                    Err(error) => emit_notice(
                        state,
                        view_data,
                        internal_tx,
                        Notice::error(format!("history fetch failed: {error:#}")),
                    ),
                }
            }
        }
        TabKind::Profile => {
            if force || view_data.profile.is_none() {
                match runtime.load_profile() {
                    Ok(profile) => view_data.profile = Some(profile),
                    Err(error) => emit_notice(
                        state,
                        view_data,
                        internal_tx,
                        Notice::error(format!("profile fetch failed: {error:#}")),
                    ),
                }
            }
        }
    }
}

fn run_batch<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    kind: BatchKind,
) {
    let Some(batch) = view_data.list.begin_batch(kind) else {
        return;
    };

    let outcome = match kind {
        BatchKind::Mail => runtime.mail_invoices(&batch.ids),
        BatchKind::Delete => runtime.delete_invoices(&batch.ids),
    };
    let reply = match outcome {
        Ok(Some(processed)) => ServiceReply::Completed(processed),
        Ok(None) => ServiceReply::Rejected,
        Err(_) => ServiceReply::Unreachable,
    };

    let resolution = match kind {
        BatchKind::Mail => view_data.list.resolve_mail(batch.ids.len(), reply),
        BatchKind::Delete => view_data.list.resolve_delete(reply),
    };

    if let Some(notice) = combined_notice(&resolution.notices) {
        emit_notice(state, view_data, internal_tx, notice);
    }
    if let Some(request) = resolution.refetch {
        spawn_fetch(state, runtime, view_data, internal_tx, request);
    }
}

/// The status line holds one notice, so a success plus a partial-failure
/// warning collapse into a single message at the sterner level.
fn combined_notice(notices: &[Notice]) -> Option<Notice> {
    let first = notices.first()?;
    let mut level = first.level;
    let mut parts = vec![first.message.clone()];
    for notice in &notices[1..] {
        if severity(notice.level) > severity(level) {
            level = notice.level;
        }
        parts.push(notice.message.clone());
    }
    Some(Notice {
        level,
        message: parts.join("; "),
    })
}

const fn severity(level: NoticeLevel) -> u8 {
    match level {
        NoticeLevel::Success => 0,
        NoticeLevel::Warn => 1,
        NoticeLevel::Error => 2,
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let selected = TabKind::ALL
        .iter()
        .position(|tab| *tab == state.active_tab)
        .unwrap_or(0);
    let tab_titles = TabKind::ALL
        .iter()
        .map(|tab| tab.label().to_owned())
        .collect::<Vec<String>>();
    let tabs = Tabs::new(tab_titles)
        .block(Block::default().title("theke").borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    match state.active_tab {
        TabKind::Invoices => render_invoices(frame, layout[1], state, view_data),
        TabKind::Items => render_items(frame, layout[1], view_data),
        TabKind::Statistics => render_history(frame, layout[1], view_data),
        TabKind::Profile => render_profile(frame, layout[1], view_data),
    }

    let (status, color) = status_text(state);
    let status_widget = Paragraph::new(status)
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[2]);

    if let AppMode::Confirm(kind) = state.mode {
        let area = centered_rect(60, 50, frame.area());
        frame.render_widget(Clear, area);
        let confirm = Paragraph::new(render_confirm_overlay_text(kind, view_data)).block(
            Block::default()
                .title(format!("{} invoices?", kind.label()))
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(confirm, area);
    }

    if state.mode == AppMode::Help {
        let area = centered_rect(70, 70, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_invoices(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(area);

    let header = Row::new(
        ["sel", "id", "user", "amount", "mailed", "created"].map(|label| {
            Cell::from(label).style(
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
        }),
    );

    let rows = view_data
        .list
        .invoices()
        .iter()
        .enumerate()
        .map(|(row_index, invoice)| {
            let selected = view_data.list.selection().contains(invoice.id);
            let mark = if selected {
                SELECTED_MARK
            } else {
                UNSELECTED_MARK
            };
            let mut style = Style::default();
            if invoice.mailed {
                style = style.fg(Color::DarkGray);
            }
            if row_index == view_data.invoice_cursor {
                style = style.bg(Color::DarkGray).fg(Color::White);
            }
            Row::new([
                Cell::from(mark),
                Cell::from(invoice.id.get().to_string()),
                Cell::from(invoice.user_id.clone()),
                Cell::from(format_money(invoice.amount_cents)),
                Cell::from(if invoice.mailed { MAILED_MARK } else { "" }),
                Cell::from(invoice.created_at.date().to_string()),
            ])
            .style(style)
        });

    let widths = [
        Constraint::Length(4),
        Constraint::Length(6),
        Constraint::Min(10),
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Length(12),
    ];
    let table = Table::new(rows, widths).header(header).column_spacing(1).block(
        Block::default()
            .title(invoice_table_title(view_data))
            .borders(Borders::ALL),
    );
    frame.render_widget(table, parts[0]);

    let bar = Paragraph::new(format!(
        "{}\n{}",
        page_bar_text(view_data),
        filter_bar_text(state, view_data)
    ));
    frame.render_widget(bar, parts[1]);
}

fn invoice_table_title(view_data: &ViewData) -> String {
    let selected = view_data.list.selection().len();
    if selected == 0 {
        "invoices".to_owned()
    } else {
        format!("invoices ({selected} selected)")
    }
}

fn page_bar_text(view_data: &ViewData) -> String {
    let indices = view_data.list.page_indices();
    if indices.is_empty() {
        return String::new();
    }
    indices
        .iter()
        .map(|index| {
            if *index == view_data.list.selected_page() {
                format!("[{}]", index + 1)
            } else {
                (index + 1).to_string()
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn filter_bar_text(state: &AppState, view_data: &ViewData) -> String {
    let search = if state.mode == AppMode::Search {
        format!("search: {}_", view_data.search_input)
    } else if view_data.list.search().is_empty() {
        "search: (none)".to_owned()
    } else {
        format!("search: {}", view_data.list.search())
    };
    format!("{search}  filter: {}", view_data.list.filter().label())
}

fn render_items(frame: &mut ratatui::Frame<'_>, area: Rect, view_data: &ViewData) {
    let header = Row::new(["item", "category", "price", "enabled"].map(|label| {
        Cell::from(label).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let rows = view_data.items.iter().enumerate().map(|(row_index, item)| {
        let mut style = Style::default();
        if !item.enabled {
            style = style.fg(Color::DarkGray);
        }
        if row_index == view_data.item_cursor {
            style = style.bg(Color::DarkGray).fg(Color::White);
        }
        Row::new([
            Cell::from(item.display_name.clone()),
            Cell::from(item.category.clone()),
            Cell::from(format_money(item.price_cents)),
            Cell::from(if item.enabled { "yes" } else { "no" }),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Min(14),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(8),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().title("items").borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn render_history(frame: &mut ratatui::Frame<'_>, area: Rect, view_data: &ViewData) {
    let header = Row::new(["when", "user", "item", "price"].map(|label| {
        Cell::from(label).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let rows = view_data.history.iter().map(|entry| {
        Row::new([
            Cell::from(entry.created_at.date().to_string()),
            Cell::from(entry.user_id.clone()),
            Cell::from(entry.item_display_name.clone()),
            Cell::from(format_money(entry.price_cents)),
        ])
    });

    let widths = [
        Constraint::Length(12),
        Constraint::Min(10),
        Constraint::Min(14),
        Constraint::Length(10),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().title("recent purchases").borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn render_profile(frame: &mut ratatui::Frame<'_>, area: Rect, view_data: &ViewData) {
    let body = match &view_data.profile {
        Some(profile) => [
            format!("name: {}", profile.display_name_or_id()),
            format!("id: {}", profile.id),
            format!("email: {}", profile.email),
            String::new(),
            format!("balance: {}", format_money(profile.balance_cents)),
            format!("total spent: {}", format_money(profile.total_spent_cents)),
            String::new(),
            format!(
                "h: public profile [{}]",
                if profile.hidden { "off" } else { "on" }
            ),
            format!("k: kiosk purchases [{}]", if profile.kiosk { "on" } else { "off" }),
        ]
        .join("\n"),
        None => "profile not loaded -- press r to retry".to_owned(),
    };

    let widget =
        Paragraph::new(body).block(Block::default().title("profile").borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn render_confirm_overlay_text(kind: BatchKind, view_data: &ViewData) -> String {
    let selection = view_data.list.selection();
    let mut lines = vec![
        format!("{} {} selected invoice(s)?", kind.label(), selection.len()),
        String::new(),
    ];
    for invoice in view_data.list.invoices() {
        if selection.contains(invoice.id) {
            lines.push(format!(
                "  #{} {} {}",
                invoice.id.get(),
                invoice.user_id,
                format_money(invoice.amount_cents)
            ));
        }
    }
    lines.push(String::new());
    lines.push("y: confirm   n: cancel".to_owned());
    lines.join("\n")
}

fn status_text(state: &AppState) -> (String, Color) {
    if let Some(notice) = &state.notice {
        let color = match notice.level {
            NoticeLevel::Success => Color::Green,
            NoticeLevel::Warn => Color::Yellow,
            NoticeLevel::Error => Color::Red,
        };
        return (notice.message.clone(), color);
    }

    let hint = match state.mode {
        AppMode::Search => "enter: apply search   esc: cancel",
        AppMode::Confirm(_) => "y: confirm   n: cancel",
        AppMode::Help => "any key to close",
        AppMode::Nav => "tab: switch  /: search  f: filter  space: select  a: all  m: mail  d: delete  ?: help",
    };
    (hint.to_owned(), Color::Gray)
}

fn help_overlay_text() -> &'static str {
    "theke keys\n\
     \n\
     tab / shift-tab  switch tab\n\
     j / k            move row\n\
     space            select invoice\n\
     a                select or clear all unmailed\n\
     f                cycle mailed filter (all > mailed > unmailed)\n\
     /                edit search, enter applies\n\
     h / l            previous / next page\n\
     m                mail selected (asks first)\n\
     d                delete selected (asks first)\n\
     r                reload current tab\n\
     ctrl-q           quit"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
