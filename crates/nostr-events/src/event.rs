//! Generic protocol event structure and tag accessors
//!
//! Events carry their payload in a flat list of string tags. The typed
//! wrappers in this crate project onto these tags; the accessors here are
//! the single place tag lookup happens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EventError, EventResult};

/// Kind for encrypted direct messages
pub const DIRECT_MESSAGE_KIND: u32 = 4;

/// A generic protocol event
///
/// `id` and `sig` are absent on unsigned templates; signing is performed by
/// an external signer and is out of scope for this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event id (hex), filled in by the signer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Author public key (hex)
    pub pubkey: String,

    /// Creation timestamp (serialized as Unix seconds)
    #[serde(with = "unix_seconds")]
    pub created_at: DateTime<Utc>,

    /// Event kind
    pub kind: u32,

    /// Tags: each tag is a list of strings, the first being the tag name
    pub tags: Vec<Vec<String>>,

    /// Free-form content
    pub content: String,

    /// Signature (hex), filled in by the signer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sig: Option<String>,
}

impl Event {
    /// First value of the first tag with the given name
    pub fn first_tag_value(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|tag| tag.first().map(String::as_str) == Some(name))
            .and_then(|tag| tag.get(1))
            .map(String::as_str)
    }

    /// First values of every tag with the given name
    pub fn tag_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> {
        self.tags
            .iter()
            .filter(move |tag| tag.first().map(String::as_str) == Some(name))
            .filter_map(|tag| tag.get(1))
            .map(String::as_str)
    }

    /// First value of a tag that must be present
    pub fn required_tag_value(&self, name: &'static str) -> EventResult<&str> {
        self.first_tag_value(name)
            .ok_or(EventError::MissingTag(name))
    }

    /// Replaceable-event identifier (`d` tag)
    pub fn identifier(&self) -> Option<&str> {
        self.first_tag_value("d")
    }

    /// Whether this kind is addressable (parameterized replaceable)
    pub fn is_addressable(&self) -> bool {
        (30_000..40_000).contains(&self.kind)
    }

    /// Address of an addressable event (`kind:pubkey:identifier`)
    pub fn address(&self) -> EventResult<EventAddress> {
        let identifier = self
            .identifier()
            .ok_or(EventError::MissingTag("d"))?
            .to_string();

        Ok(EventAddress {
            kind: self.kind,
            pubkey: self.pubkey.clone(),
            identifier,
        })
    }

    /// Fail with a typed error unless the event has the expected kind
    pub fn expect_kind(&self, expected: u32) -> EventResult<()> {
        if self.kind != expected {
            return Err(EventError::WrongKind {
                expected,
                got: self.kind,
            });
        }
        Ok(())
    }
}

/// Address of an addressable event: `kind:pubkey:identifier`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventAddress {
    /// Event kind
    pub kind: u32,
    /// Author public key (hex)
    pub pubkey: String,
    /// Replaceable-event identifier (`d` tag)
    pub identifier: String,
}

impl std::fmt::Display for EventAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.kind, self.pubkey, self.identifier)
    }
}

impl std::str::FromStr for EventAddress {
    type Err = EventError;

    fn from_str(s: &str) -> EventResult<Self> {
        let mut parts = s.splitn(3, ':');

        let kind = parts
            .next()
            .and_then(|k| k.parse::<u32>().ok())
            .ok_or_else(|| EventError::InvalidAddress(s.to_string()))?;
        let pubkey = parts
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| EventError::InvalidAddress(s.to_string()))?
            .to_string();
        let identifier = parts
            .next()
            .ok_or_else(|| EventError::InvalidAddress(s.to_string()))?
            .to_string();

        Ok(Self {
            kind,
            pubkey,
            identifier,
        })
    }
}

impl Serialize for EventAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EventAddress {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Builder for unsigned event templates
#[derive(Debug, Clone)]
pub struct EventBuilder {
    pubkey: String,
    created_at: DateTime<Utc>,
    kind: u32,
    tags: Vec<Vec<String>>,
    content: String,
}

impl EventBuilder {
    /// Start a template for the given kind and author
    pub fn new(kind: u32, pubkey: impl Into<String>) -> Self {
        Self {
            pubkey: pubkey.into(),
            created_at: Utc::now(),
            kind,
            tags: Vec::new(),
            content: String::new(),
        }
    }

    /// Set the creation timestamp
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Set the content
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Append a tag
    pub fn tag<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.push(values.into_iter().map(Into::into).collect());
        self
    }

    /// Build the unsigned event
    pub fn build(self) -> Event {
        Event {
            id: None,
            pubkey: self.pubkey,
            created_at: self.created_at,
            kind: self.kind,
            tags: self.tags,
            content: self.content,
            sig: None,
        }
    }
}

/// Serde adapter: `DateTime<Utc>` as Unix seconds
pub(crate) mod unix_seconds {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(time.timestamp())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let secs = i64::deserialize(deserializer)?;
        Utc.timestamp_opt(secs, 0)
            .single()
            .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {}", secs)))
    }

    /// Same adapter for `Option<DateTime<Utc>>`
    pub mod option {
        use chrono::{DateTime, TimeZone, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            time: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match time {
                Some(time) => serializer.serialize_some(&time.timestamp()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            let secs = Option::<i64>::deserialize(deserializer)?;
            secs.map(|secs| {
                Utc.timestamp_opt(secs, 0)
                    .single()
                    .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {}", secs)))
            })
            .transpose()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_event() -> Event {
        Event {
            id: Some("a".repeat(64)),
            pubkey: "b".repeat(64),
            created_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            kind: 32_767,
            tags: vec![
                vec!["d".to_string(), "job-1".to_string()],
                vec!["title".to_string(), "Fix my node".to_string()],
                vec!["t".to_string(), "lightning".to_string()],
                vec!["t".to_string(), "bitcoin".to_string()],
            ],
            content: "It keeps crashing".to_string(),
            sig: Some("c".repeat(128)),
        }
    }

    #[test]
    fn test_first_tag_value() {
        let event = test_event();
        assert_eq!(event.first_tag_value("title"), Some("Fix my node"));
        assert_eq!(event.first_tag_value("t"), Some("lightning"));
        assert_eq!(event.first_tag_value("missing"), None);
    }

    #[test]
    fn test_tag_values_collects_all() {
        let event = test_event();
        let topics: Vec<&str> = event.tag_values("t").collect();
        assert_eq!(topics, vec!["lightning", "bitcoin"]);
    }

    #[test]
    fn test_required_tag_value_missing() {
        let event = test_event();
        let result = event.required_tag_value("amount");
        assert!(matches!(result, Err(EventError::MissingTag("amount"))));
    }

    #[test]
    fn test_address() {
        let event = test_event();
        let address = event.address().unwrap();
        assert_eq!(address.kind, 32_767);
        assert_eq!(address.identifier, "job-1");
        assert_eq!(
            address.to_string(),
            format!("32767:{}:job-1", "b".repeat(64))
        );
    }

    #[test]
    fn test_address_round_trip() {
        let address = EventAddress {
            kind: 32_768,
            pubkey: "f".repeat(64),
            identifier: "offer-9".to_string(),
        };

        let parsed: EventAddress = address.to_string().parse().unwrap();
        assert_eq!(parsed, address);
    }

    #[test]
    fn test_address_parse_rejects_garbage() {
        assert!("not-an-address".parse::<EventAddress>().is_err());
        assert!("abc:def".parse::<EventAddress>().is_err());
        assert!(":pubkey:id".parse::<EventAddress>().is_err());
    }

    #[test]
    fn test_address_identifier_may_contain_colons() {
        let parsed: EventAddress = "30023:pub:a:b:c".parse().unwrap();
        assert_eq!(parsed.identifier, "a:b:c");
    }

    #[test]
    fn test_serde_round_trip() {
        let event = test_event();
        let json = serde_json::to_string(&event).unwrap();
        let parsed: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_serde_unix_seconds() {
        let event = test_event();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["created_at"], serde_json::json!(1_700_000_000));
    }

    #[test]
    fn test_builder_produces_unsigned_template() {
        let event = EventBuilder::new(1, "pubkey")
            .content("hello")
            .tag(["t", "intro"])
            .build();

        assert_eq!(event.id, None);
        assert_eq!(event.sig, None);
        assert_eq!(event.kind, 1);
        assert_eq!(event.first_tag_value("t"), Some("intro"));
    }

    #[test]
    fn test_expect_kind() {
        let event = test_event();
        assert!(event.expect_kind(32_767).is_ok());
        assert!(matches!(
            event.expect_kind(1),
            Err(EventError::WrongKind {
                expected: 1,
                got: 32_767
            })
        ));
    }
}
