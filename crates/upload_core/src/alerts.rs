//! Dismissible, auto-expiring user messages.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// How long an alert stays up unless dismissed earlier.
pub const DEFAULT_ALERT_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    #[default]
    Info,
    Success,
    Danger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlertId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub id: AlertId,
    pub level: AlertLevel,
    pub message: String,
    /// `None` when the TTL reaches past what `Instant` can represent; such
    /// an alert stays until dismissed.
    pub expires_at: Option<Instant>,
}

impl Alert {
    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

/// Alert container. Newest alerts sit first.
#[derive(Debug, Clone)]
pub struct AlertBoard {
    ttl: Duration,
    next_id: u64,
    alerts: VecDeque<Alert>,
}

impl Default for AlertBoard {
    fn default() -> Self {
        Self::new(DEFAULT_ALERT_TTL)
    }
}

impl AlertBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            next_id: 0,
            alerts: VecDeque::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Post a new alert. Alerts already past their deadline are dropped first.
    pub fn push(&mut self, level: AlertLevel, message: impl Into<String>, now: Instant) -> AlertId {
        self.expire(now);
        let id = AlertId(self.next_id);
        self.next_id += 1;
        self.alerts.push_front(Alert {
            id,
            level,
            message: message.into(),
            expires_at: now.checked_add(self.ttl),
        });
        id
    }

    /// Remove an alert the user closed. Returns false if it was already gone.
    pub fn dismiss(&mut self, id: AlertId) -> bool {
        let before = self.alerts.len();
        self.alerts.retain(|a| a.id != id);
        self.alerts.len() != before
    }

    /// Drop every alert whose deadline has passed; returns how many went.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.alerts.len();
        self.alerts.retain(|a| !a.is_expired(now));
        before - self.alerts.len()
    }

    pub fn visible(&self, now: Instant) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().filter(move |a| !a.is_expired(now))
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}
