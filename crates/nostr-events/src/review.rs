//! Typed wrapper for reviews
//!
//! Reviews are label events: an `L` tag names the label namespace, an `l`
//! tag says which side of the trade is being reviewed, and boolean quality
//! ratings are carried as `rating` tags. A missing `rating` tag reads as
//! false; a malformed one is a typed error.

use chrono::{DateTime, Utc};

use crate::error::{EventError, EventResult};
use crate::event::{Event, EventAddress, EventBuilder};

/// Kind for label events carrying reviews
pub const REVIEW_KIND: u32 = 1_985;

/// Label namespace for marketplace reviews
pub const REVIEW_NAMESPACE: &str = "qts/freelancing";

/// Qualities a freelancer rates a client on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientRatings {
    /// Overall thumbs up
    pub thumb: bool,
    /// Client was responsive and available
    pub availability: bool,
    /// Client communicated the problem clearly
    pub communication: bool,
}

/// Qualities a client rates a freelancer on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FreelancerRatings {
    /// The job was completed successfully
    pub success: bool,
    /// Freelancer knew the problem domain
    pub expertise: bool,
    /// Freelancer was responsive and available
    pub availability: bool,
    /// Freelancer communicated progress clearly
    pub communication: bool,
}

/// Ratings for the reviewed party
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ratings {
    /// A freelancer reviewing a client
    Client(ClientRatings),
    /// A client reviewing a freelancer
    Freelancer(FreelancerRatings),
}

impl Ratings {
    /// Label value naming the reviewed party
    pub fn label(&self) -> &'static str {
        match self {
            Ratings::Client(_) => "client",
            Ratings::Freelancer(_) => "freelancer",
        }
    }

    /// Aggregate score in `[0, 1]`
    ///
    /// The primary flag (thumb for clients, success for freelancers) is
    /// worth half the score; the remaining qualities split the other half.
    pub fn score(&self) -> f32 {
        match self {
            Ratings::Client(r) => {
                let primary = if r.thumb { 0.5 } else { 0.0 };
                let qualities = [r.availability, r.communication];
                let earned = qualities.iter().filter(|q| **q).count() as f32;
                primary + earned * 0.5 / qualities.len() as f32
            }
            Ratings::Freelancer(r) => {
                let primary = if r.success { 0.5 } else { 0.0 };
                let qualities = [r.expertise, r.availability, r.communication];
                let earned = qualities.iter().filter(|q| **q).count() as f32;
                primary + earned * 0.5 / qualities.len() as f32
            }
        }
    }
}

/// A review of one party of a completed job
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewEvent {
    /// Reviewer public key (hex)
    pub pubkey: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Address of the reviewed job or offer (`a` tag)
    pub subject: EventAddress,
    /// Boolean quality ratings
    pub ratings: Ratings,
    /// Free-form comment (event content)
    pub comment: String,
}

impl ReviewEvent {
    /// Create a new review
    pub fn new(
        pubkey: impl Into<String>,
        subject: EventAddress,
        ratings: Ratings,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            pubkey: pubkey.into(),
            created_at: Utc::now(),
            subject,
            ratings,
            comment: comment.into(),
        }
    }

    /// Project a generic event into a typed review, validating every tag
    pub fn from_event(event: &Event) -> EventResult<Self> {
        event.expect_kind(REVIEW_KIND)?;

        let namespace = event.required_tag_value("L")?;
        if namespace != REVIEW_NAMESPACE {
            return Err(EventError::InvalidTag {
                tag: "L".to_string(),
                value: namespace.to_string(),
            });
        }

        let subject = event.required_tag_value("a")?.parse::<EventAddress>()?;

        let label = event.required_tag_value("l")?;
        let ratings = match label {
            "client" => Ratings::Client(ClientRatings {
                thumb: rating_flag(event, "thumb")?,
                availability: rating_flag(event, "availability")?,
                communication: rating_flag(event, "communication")?,
            }),
            "freelancer" => Ratings::Freelancer(FreelancerRatings {
                success: rating_flag(event, "success")?,
                expertise: rating_flag(event, "expertise")?,
                availability: rating_flag(event, "availability")?,
                communication: rating_flag(event, "communication")?,
            }),
            _ => {
                return Err(EventError::InvalidTag {
                    tag: "l".to_string(),
                    value: label.to_string(),
                })
            }
        };

        Ok(Self {
            pubkey: event.pubkey.clone(),
            created_at: event.created_at,
            subject,
            ratings,
            comment: event.content.clone(),
        })
    }

    /// Serialize back into an unsigned generic event
    pub fn to_event(&self) -> Event {
        let mut builder = EventBuilder::new(REVIEW_KIND, self.pubkey.as_str())
            .created_at(self.created_at)
            .content(self.comment.as_str())
            .tag(["L", REVIEW_NAMESPACE])
            .tag(["l", self.ratings.label(), REVIEW_NAMESPACE])
            .tag(["a", self.subject.to_string().as_str()]);

        let flags: Vec<(&str, bool)> = match &self.ratings {
            Ratings::Client(r) => vec![
                ("thumb", r.thumb),
                ("availability", r.availability),
                ("communication", r.communication),
            ],
            Ratings::Freelancer(r) => vec![
                ("success", r.success),
                ("expertise", r.expertise),
                ("availability", r.availability),
                ("communication", r.communication),
            ],
        };

        for (name, set) in flags {
            builder = builder.tag(["rating", name, if set { "1" } else { "0" }]);
        }

        builder.build()
    }
}

/// Read a boolean `rating` tag; absent means false, malformed is an error
fn rating_flag(event: &Event, name: &str) -> EventResult<bool> {
    let tag = event
        .tags
        .iter()
        .find(|tag| tag.first().map(String::as_str) == Some("rating") && tag.get(1).map(String::as_str) == Some(name));

    match tag {
        None => Ok(false),
        Some(tag) => match tag.get(2).map(String::as_str) {
            Some("1") => Ok(true),
            Some("0") => Ok(false),
            other => Err(EventError::InvalidTag {
                tag: format!("rating:{}", name),
                value: other.unwrap_or("").to_string(),
            }),
        },
    }
}
