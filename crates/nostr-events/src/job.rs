//! Typed wrapper for job postings
//!
//! A job is an addressable event: the `d` tag identifies it, the `s` tag
//! carries its status, and the content is the free-form description. All
//! required tags are validated when projecting from a generic event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EventError, EventResult};
use crate::event::{Event, EventAddress, EventBuilder};

/// Kind for job postings
pub const JOB_KIND: u32 = 32_767;

/// Job lifecycle status, carried in the `s` tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Posted, accepting offers
    New,
    /// An offer was accepted, work underway
    InProgress,
    /// Work completed successfully
    Resolved,
    /// Abandoned or failed
    Failed,
}

impl JobStatus {
    /// Tag value for this status
    pub fn as_tag_value(&self) -> &'static str {
        match self {
            JobStatus::New => "0",
            JobStatus::InProgress => "1",
            JobStatus::Resolved => "2",
            JobStatus::Failed => "3",
        }
    }

    /// Parse a status tag value
    pub fn from_tag_value(value: &str) -> EventResult<Self> {
        match value {
            "0" => Ok(JobStatus::New),
            "1" => Ok(JobStatus::InProgress),
            "2" => Ok(JobStatus::Resolved),
            "3" => Ok(JobStatus::Failed),
            _ => Err(EventError::InvalidTag {
                tag: "s".to_string(),
                value: value.to_string(),
            }),
        }
    }

    /// Whether the job no longer accepts offers
    pub fn is_closed(&self) -> bool {
        matches!(self, JobStatus::Resolved | JobStatus::Failed)
    }
}

/// A job posting
#[derive(Debug, Clone, PartialEq)]
pub struct JobEvent {
    /// Replaceable-event identifier (`d` tag)
    pub identifier: String,
    /// Author public key (hex)
    pub pubkey: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Short title
    pub title: String,
    /// Free-form description (event content)
    pub description: String,
    /// Topic tags
    pub topics: Vec<String>,
    /// Lifecycle status
    pub status: JobStatus,
    /// Address of the accepted offer, once one is chosen
    pub accepted_offer: Option<EventAddress>,
}

impl JobEvent {
    /// Create a new job posting with a fresh identifier
    pub fn new(
        pubkey: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            identifier: Uuid::new_v4().to_string(),
            pubkey: pubkey.into(),
            created_at: Utc::now(),
            title: title.into(),
            description: description.into(),
            topics: Vec::new(),
            status: JobStatus::New,
            accepted_offer: None,
        }
    }

    /// Address of this job
    pub fn address(&self) -> EventAddress {
        EventAddress {
            kind: JOB_KIND,
            pubkey: self.pubkey.clone(),
            identifier: self.identifier.clone(),
        }
    }

    /// Project a generic event into a typed job, validating every tag
    pub fn from_event(event: &Event) -> EventResult<Self> {
        event.expect_kind(JOB_KIND)?;

        let identifier = event.required_tag_value("d")?.to_string();
        let title = event.required_tag_value("title")?.to_string();
        let status = JobStatus::from_tag_value(event.required_tag_value("s")?)?;
        let topics = event.tag_values("t").map(str::to_string).collect();
        let accepted_offer = event
            .first_tag_value("a")
            .map(|a| a.parse::<EventAddress>())
            .transpose()?;

        Ok(Self {
            identifier,
            pubkey: event.pubkey.clone(),
            created_at: event.created_at,
            title,
            description: event.content.clone(),
            topics,
            status,
            accepted_offer,
        })
    }

    /// Serialize back into an unsigned generic event
    pub fn to_event(&self) -> Event {
        let mut builder = EventBuilder::new(JOB_KIND, self.pubkey.as_str())
            .created_at(self.created_at)
            .content(self.description.as_str())
            .tag(["d", self.identifier.as_str()])
            .tag(["title", self.title.as_str()])
            .tag(["s", self.status.as_tag_value()]);

        for topic in &self.topics {
            builder = builder.tag(["t", topic.as_str()]);
        }

        if let Some(offer) = &self.accepted_offer {
            builder = builder.tag(["a", offer.to_string().as_str()]);
        }

        builder.build()
    }
}
