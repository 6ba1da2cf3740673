// Copyright 2026 Theke Authors
// Licensed under the Apache License, Version 2.0

use crate::TabKind;
use crate::list::BatchKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warn,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Nav,
    Search,
    Confirm(BatchKind),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub mode: AppMode,
    pub active_tab: TabKind,
    pub notice: Option<Notice>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: AppMode::Nav,
            active_tab: TabKind::Invoices,
            notice: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    NextTab,
    PrevTab,
    EnterSearch,
    OpenConfirm(BatchKind),
    OpenHelp,
    ExitToNav,
    SetNotice(Notice),
    ClearNotice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    TabChanged(TabKind),
    ModeChanged(AppMode),
    NoticeUpdated(Notice),
    NoticeCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::NextTab => self.rotate_tab(1),
            AppCommand::PrevTab => self.rotate_tab(-1),
            AppCommand::EnterSearch => {
                self.mode = AppMode::Search;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::OpenConfirm(kind) => {
                self.mode = AppMode::Confirm(kind);
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::OpenHelp => {
                self.mode = AppMode::Help;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::ExitToNav => {
                self.mode = AppMode::Nav;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::SetNotice(notice) => {
                self.notice = Some(notice.clone());
                vec![AppEvent::NoticeUpdated(notice)]
            }
            AppCommand::ClearNotice => {
                self.notice = None;
                vec![AppEvent::NoticeCleared]
            }
        }
    }

    fn rotate_tab(&mut self, delta: isize) -> Vec<AppEvent> {
        let tabs = TabKind::ALL;
        let current = tabs
            .iter()
            .position(|tab| *tab == self.active_tab)
            .unwrap_or(0) as isize;
        let len = tabs.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.active_tab = tabs[next];
        vec![AppEvent::TabChanged(self.active_tab)]
    }
}

#[cfg(test)]
mod tests {
    use super::{AppCommand, AppEvent, AppMode, AppState, Notice};
    use crate::TabKind;
    use crate::list::BatchKind;

    #[test]
    fn tab_rotation_wraps() {
        let mut state = AppState {
            active_tab: TabKind::Profile,
            ..AppState::default()
        };

        let events = state.dispatch(AppCommand::NextTab);
        assert_eq!(state.active_tab, TabKind::Invoices);
        assert_eq!(events, vec![AppEvent::TabChanged(TabKind::Invoices)]);

        let events = state.dispatch(AppCommand::PrevTab);
        assert_eq!(state.active_tab, TabKind::Profile);
        assert_eq!(events, vec![AppEvent::TabChanged(TabKind::Profile)]);
    }

    #[test]
    fn mode_transitions() {
        let mut state = AppState::default();

        state.dispatch(AppCommand::EnterSearch);
        assert_eq!(state.mode, AppMode::Search);

        state.dispatch(AppCommand::OpenConfirm(BatchKind::Mail));
        assert_eq!(state.mode, AppMode::Confirm(BatchKind::Mail));

        state.dispatch(AppCommand::ExitToNav);
        assert_eq!(state.mode, AppMode::Nav);
    }

    #[test]
    fn notice_set_and_clear() {
        let mut state = AppState::default();

        let events = state.dispatch(AppCommand::SetNotice(Notice::warn("2 invoices not mailed")));
        assert_eq!(
            events,
            vec![AppEvent::NoticeUpdated(Notice::warn("2 invoices not mailed"))],
        );
        assert!(state.notice.is_some());

        let events = state.dispatch(AppCommand::ClearNotice);
        assert_eq!(events, vec![AppEvent::NoticeCleared]);
        assert!(state.notice.is_none());
    }
}
