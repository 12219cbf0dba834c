// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{AppMode, TabKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleState {
    pub mode: AppMode,
    pub active_tab: TabKind,
    pub status_line: Option<String>,
}

impl Default for ConsoleState {
    fn default() -> Self {
        Self::new(TabKind::Activities)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    NextTab,
    PrevTab,
    SelectTab(TabKind),
    OpenFilter,
    CloseFilter,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    ModeChanged(AppMode),
    TabChanged(TabKind),
    StatusUpdated(String),
    StatusCleared,
}

impl ConsoleState {
    pub fn new(active_tab: TabKind) -> Self {
        Self {
            mode: AppMode::Browse,
            active_tab,
            status_line: None,
        }
    }

    pub fn dispatch(&mut self, command: ConsoleCommand) -> Vec<ConsoleEvent> {
        match command {
            ConsoleCommand::NextTab => self.rotate_tab(1),
            ConsoleCommand::PrevTab => self.rotate_tab(-1),
            ConsoleCommand::SelectTab(tab) => {
                if tab == self.active_tab {
                    return Vec::new();
                }
                self.active_tab = tab;
                self.mode = AppMode::Browse;
                vec![ConsoleEvent::TabChanged(tab)]
            }
            ConsoleCommand::OpenFilter => {
                self.mode = AppMode::Filter;
                vec![ConsoleEvent::ModeChanged(self.mode)]
            }
            ConsoleCommand::CloseFilter => {
                self.mode = AppMode::Browse;
                vec![ConsoleEvent::ModeChanged(self.mode)]
            }
            ConsoleCommand::SetStatus(message) => vec![self.set_status(message)],
            ConsoleCommand::ClearStatus => {
                self.status_line = None;
                vec![ConsoleEvent::StatusCleared]
            }
        }
    }

    fn rotate_tab(&mut self, delta: isize) -> Vec<ConsoleEvent> {
        let tabs = TabKind::ALL;
        let current = tabs
            .iter()
            .position(|tab| *tab == self.active_tab)
            .unwrap_or(0) as isize;
        let len = tabs.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.active_tab = tabs[next];
        self.mode = AppMode::Browse;
        vec![ConsoleEvent::TabChanged(self.active_tab)]
    }

    fn set_status(&mut self, message: String) -> ConsoleEvent {
        self.status_line = Some(message.clone());
        ConsoleEvent::StatusUpdated(message)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConsoleCommand, ConsoleEvent, ConsoleState};
    use crate::{AppMode, TabKind};

    #[test]
    fn tab_rotation_wraps() {
        let mut state = ConsoleState::new(TabKind::SignUps);

        let events = state.dispatch(ConsoleCommand::NextTab);
        assert_eq!(state.active_tab, TabKind::Admins);
        assert_eq!(events, vec![ConsoleEvent::TabChanged(TabKind::Admins)]);

        state.dispatch(ConsoleCommand::PrevTab);
        assert_eq!(state.active_tab, TabKind::SignUps);
    }

    #[test]
    fn switching_tabs_closes_the_filter_form() {
        let mut state = ConsoleState::default();
        state.dispatch(ConsoleCommand::OpenFilter);
        assert_eq!(state.mode, AppMode::Filter);

        state.dispatch(ConsoleCommand::NextTab);
        assert_eq!(state.mode, AppMode::Browse);
    }

    #[test]
    fn selecting_the_active_tab_is_silent() {
        let mut state = ConsoleState::new(TabKind::Volunteers);
        assert!(state.dispatch(ConsoleCommand::SelectTab(TabKind::Volunteers)).is_empty());
        assert_eq!(
            state.dispatch(ConsoleCommand::SelectTab(TabKind::Admins)),
            vec![ConsoleEvent::TabChanged(TabKind::Admins)]
        );
    }

    #[test]
    fn status_set_and_clear() {
        let mut state = ConsoleState::default();

        let events = state.dispatch(ConsoleCommand::SetStatus("3 matches".to_owned()));
        assert_eq!(state.status_line.as_deref(), Some("3 matches"));
        assert_eq!(events, vec![ConsoleEvent::StatusUpdated("3 matches".to_owned())]);

        let events = state.dispatch(ConsoleCommand::ClearStatus);
        assert_eq!(state.status_line, None);
        assert_eq!(events, vec![ConsoleEvent::StatusCleared]);
    }
}
