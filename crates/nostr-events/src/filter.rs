//! Typed subscription filters
//!
//! A filter is conjunctive across fields and disjunctive within a field:
//! an event matches when every populated field accepts it, and a list field
//! accepts an event when any of its entries does. Empty list fields match
//! everything.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::{unix_seconds, Event};

/// Event filter for subscriptions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filter {
    /// Accepted kinds (empty = any)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub kinds: Vec<u32>,

    /// Accepted author public keys (empty = any)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,

    /// Accepted replaceable-event identifiers (empty = any)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,

    /// Only events created at or after this time
    #[serde(skip_serializing_if = "Option::is_none", with = "unix_seconds::option")]
    pub since: Option<DateTime<Utc>>,

    /// Only events created at or before this time
    #[serde(skip_serializing_if = "Option::is_none", with = "unix_seconds::option")]
    pub until: Option<DateTime<Utc>>,
}

impl Filter {
    /// Empty filter matching every event
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an accepted kind
    pub fn kind(mut self, kind: u32) -> Self {
        self.kinds.push(kind);
        self
    }

    /// Add an accepted author
    pub fn author(mut self, pubkey: impl Into<String>) -> Self {
        self.authors.push(pubkey.into());
        self
    }

    /// Add an accepted replaceable-event identifier
    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifiers.push(identifier.into());
        self
    }

    /// Only accept events created at or after this time
    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    /// Only accept events created at or before this time
    pub fn until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    /// Whether the event passes this filter
    pub fn matches(&self, event: &Event) -> bool {
        if !self.kinds.is_empty() && !self.kinds.contains(&event.kind) {
            return false;
        }

        if !self.authors.is_empty() && !self.authors.iter().any(|a| a == &event.pubkey) {
            return false;
        }

        if !self.identifiers.is_empty() {
            match event.identifier() {
                Some(d) if self.identifiers.iter().any(|i| i == d) => {}
                _ => return false,
            }
        }

        if let Some(since) = self.since {
            if event.created_at < since {
                return false;
            }
        }

        if let Some(until) = self.until {
            if event.created_at > until {
                return false;
            }
        }

        true
    }
}
