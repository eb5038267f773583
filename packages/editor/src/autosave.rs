//! Debounced autosave.
//!
//! Changes restart a quiet-period timer; a save becomes due once the draft
//! has been quiet for `debounce`, or once the oldest unsaved change is
//! `max_wait` old, whichever comes first. Time is passed in explicitly so
//! the policy never sleeps.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutosavePolicy {
    #[serde(with = "millis")]
    pub debounce: Duration,

    #[serde(with = "millis")]
    pub max_wait: Duration,
}

impl Default for AutosavePolicy {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(1500),
            max_wait: Duration::from_secs(10),
        }
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[derive(Debug, Clone)]
pub struct Autosave {
    policy: AutosavePolicy,
    first_change: Option<Instant>,
    last_change: Option<Instant>,
}

impl Autosave {
    pub fn new(policy: AutosavePolicy) -> Self {
        Self {
            policy,
            first_change: None,
            last_change: None,
        }
    }

    pub fn policy(&self) -> &AutosavePolicy {
        &self.policy
    }

    pub fn record_change(&mut self, now: Instant) {
        self.first_change.get_or_insert(now);
        self.last_change = Some(now);
    }

    /// Whether unsaved changes exist
    pub fn is_pending(&self) -> bool {
        self.last_change.is_some()
    }

    pub fn due(&self, now: Instant) -> bool {
        match (self.first_change, self.last_change) {
            (Some(first), Some(last)) => {
                now.saturating_duration_since(last) >= self.policy.debounce
                    || now.saturating_duration_since(first) >= self.policy.max_wait
            }
            _ => false,
        }
    }

    /// When the next save becomes due, if anything is pending
    pub fn deadline(&self) -> Option<Instant> {
        let (first, last) = (self.first_change?, self.last_change?);
        Some((last + self.policy.debounce).min(first + self.policy.max_wait))
    }

    pub fn mark_saved(&mut self) {
        self.first_change = None;
        self.last_change = None;
    }
}

impl Default for Autosave {
    fn default() -> Self {
        Self::new(AutosavePolicy::default())
    }
}
