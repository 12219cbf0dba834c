// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::sync::Mutex;
use std::sync::atomic::{AtomicU16, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "ok",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// User-facing notification sink for the HTTP layer.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);

    /// The backend rejected the session with `status` (401 or 403).
    fn login_required(&self, status: u16);
}

/// Collects notices until the shell drains them into its status line.
#[derive(Debug, Default)]
pub struct NoticeLog {
    pending: Mutex<Vec<Notice>>,
    login_required: AtomicU16,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Notice> {
        match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    /// Status of the last session rejection, if any.
    pub fn login_required_status(&self) -> Option<u16> {
        match self.login_required.load(Ordering::SeqCst) {
            0 => None,
            status => Some(status),
        }
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, notice: Notice) {
        match self.pending.lock() {
            Ok(mut pending) => pending.push(notice),
            Err(poisoned) => poisoned.into_inner().push(notice),
        }
    }

    fn login_required(&self, status: u16) {
        self.login_required.store(status, Ordering::SeqCst);
    }
}

/// Forwards notices to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info | NoticeLevel::Success => log::info!("{}", notice.message),
            NoticeLevel::Warning => log::warn!("{}", notice.message),
            NoticeLevel::Error => log::error!("{}", notice.message),
        }
    }

    fn login_required(&self, status: u16) {
        log::warn!("session rejected with status {status}; sign in again");
    }
}

#[cfg(test)]
mod tests {
    use super::{Notice, NoticeLevel, NoticeLog, Notifier};

    #[test]
    fn drain_empties_the_log() {
        let log = NoticeLog::new();
        log.notify(Notice::new(NoticeLevel::Error, "network error"));
        log.notify(Notice::new(NoticeLevel::Success, "saved"));

        let drained = log.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].message, "network error");
        assert!(log.drain().is_empty());
    }

    #[test]
    fn login_required_records_status() {
        let log = NoticeLog::new();
        assert_eq!(log.login_required_status(), None);
        log.login_required(403);
        assert_eq!(log.login_required_status(), Some(403));
    }
}
