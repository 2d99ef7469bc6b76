//! Transient user notice ("no actions remaining").

use crate::pet::Millis;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notice {
    pub message: &'static str,
    pub raised_at: Millis,
    pub expires_at: Millis,
}

/// Holds at most one notice; a new one replaces the old.
#[derive(Debug)]
pub struct NoticeBoard {
    duration_ms: Millis,
    current: Option<Notice>,
}

impl NoticeBoard {
    pub fn new(duration_ms: Millis) -> Self {
        Self {
            duration_ms,
            current: None,
        }
    }

    pub fn raise(&mut self, message: &'static str, now: Millis) -> Notice {
        let notice = Notice {
            message,
            raised_at: now,
            expires_at: now.saturating_add(self.duration_ms),
        };
        self.current = Some(notice);
        notice
    }

    /// The notice still visible at `now`.
    pub fn active(&self, now: Millis) -> Option<&Notice> {
        self.current.as_ref().filter(|n| now < n.expires_at)
    }

    /// Drop an expired notice.  Returns `true` if one was dropped.
    pub fn expire(&mut self, now: Millis) -> bool {
        match self.current {
            Some(n) if now >= n.expires_at => {
                self.current = None;
                true
            }
            _ => false,
        }
    }
}
