//! Typed wrapper for offers on jobs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EventError, EventResult};
use crate::event::{Event, EventAddress, EventBuilder};

/// Kind for offers
pub const OFFER_KIND: u32 = 32_768;

/// How the offered amount is charged, carried in the `pricing` tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pricing {
    /// Flat price in sats for the whole job
    Absolute,
    /// Sats per minute of work
    SatsPerMinute,
}

impl Pricing {
    /// Tag value for this pricing mode
    pub fn as_tag_value(&self) -> &'static str {
        match self {
            Pricing::Absolute => "0",
            Pricing::SatsPerMinute => "1",
        }
    }

    /// Parse a pricing tag value
    pub fn from_tag_value(value: &str) -> EventResult<Self> {
        match value {
            "0" => Ok(Pricing::Absolute),
            "1" => Ok(Pricing::SatsPerMinute),
            _ => Err(EventError::InvalidTag {
                tag: "pricing".to_string(),
                value: value.to_string(),
            }),
        }
    }
}

/// An offer on a job
#[derive(Debug, Clone, PartialEq)]
pub struct OfferEvent {
    /// Replaceable-event identifier (`d` tag)
    pub identifier: String,
    /// Author public key (hex)
    pub pubkey: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Address of the job this offer responds to (`a` tag)
    pub job: EventAddress,
    /// Pricing mode
    pub pricing: Pricing,
    /// Amount in sats (total or per minute, depending on pricing)
    pub amount: u64,
    /// Free-form pitch (event content)
    pub pitch: String,
}

impl OfferEvent {
    /// Create a new offer on a job with a fresh identifier
    pub fn new(
        pubkey: impl Into<String>,
        job: EventAddress,
        pricing: Pricing,
        amount: u64,
        pitch: impl Into<String>,
    ) -> Self {
        Self {
            identifier: Uuid::new_v4().to_string(),
            pubkey: pubkey.into(),
            created_at: Utc::now(),
            job,
            pricing,
            amount,
            pitch: pitch.into(),
        }
    }

    /// Address of this offer
    pub fn address(&self) -> EventAddress {
        EventAddress {
            kind: OFFER_KIND,
            pubkey: self.pubkey.clone(),
            identifier: self.identifier.clone(),
        }
    }

    /// Project a generic event into a typed offer, validating every tag
    pub fn from_event(event: &Event) -> EventResult<Self> {
        event.expect_kind(OFFER_KIND)?;

        let identifier = event.required_tag_value("d")?.to_string();
        let job = event.required_tag_value("a")?.parse::<EventAddress>()?;
        let pricing = Pricing::from_tag_value(event.required_tag_value("pricing")?)?;

        let amount_value = event.required_tag_value("amount")?;
        let amount = amount_value
            .parse::<u64>()
            .map_err(|_| EventError::InvalidTag {
                tag: "amount".to_string(),
                value: amount_value.to_string(),
            })?;

        Ok(Self {
            identifier,
            pubkey: event.pubkey.clone(),
            created_at: event.created_at,
            job,
            pricing,
            amount,
            pitch: event.content.clone(),
        })
    }

    /// Serialize back into an unsigned generic event
    pub fn to_event(&self) -> Event {
        EventBuilder::new(OFFER_KIND, self.pubkey.as_str())
            .created_at(self.created_at)
            .content(self.pitch.as_str())
            .tag(["d", self.identifier.as_str()])
            .tag(["a", self.job.to_string().as_str()])
            .tag(["pricing", self.pricing.as_tag_value()])
            .tag(["amount", self.amount.to_string().as_str()])
            .build()
    }
}
