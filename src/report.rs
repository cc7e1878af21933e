use std::fmt;
use std::sync::Mutex;

use crate::traits::Reporter;

/// What a [`Notice`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// A search found nothing under `on_empty = warn`.
    EmptyResult,
    /// A candidate was skipped under `on_parse_error = warn`.
    ParseFailure,
    /// A deprecated call was used.
    Deprecated,
}

/// A structured warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind:    NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Forwards notices to `tracing::warn!`. Used unless another reporter is set.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, notice: Notice) {
        tracing::warn!(kind = ?notice.kind, "{}", notice.message);
    }
}

/// Keeps every notice in memory.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    notices: Mutex<Vec<Notice>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the notices received so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_default()
    }

    /// Drain the notices received so far.
    pub fn take(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|mut n| std::mem::take(&mut *n))
            .unwrap_or_default()
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_reporter_keeps_order_and_drains() {
        let reporter = CollectingReporter::new();
        reporter.report(Notice::new(NoticeKind::ParseFailure, "first"));
        reporter.report(Notice::new(NoticeKind::EmptyResult, "second"));

        let seen = reporter.notices();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].kind, NoticeKind::ParseFailure);
        assert_eq!(seen[1].message, "second");

        assert_eq!(reporter.take().len(), 2);
        assert!(reporter.notices().is_empty());
    }

    #[test]
    fn notice_display() {
        let n = Notice::new(NoticeKind::Deprecated, "gone");
        assert_eq!(n.to_string(), "Deprecated: gone");
    }
}
