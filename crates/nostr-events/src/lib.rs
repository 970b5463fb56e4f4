//! # nostr-events
//!
//! Typed event wrappers for SatShoot.
//! Projects marketplace domain objects (jobs, offers, reviews) onto generic
//! protocol events, with tag validation at construction time.

mod event;
mod filter;
mod job;
mod offer;
mod review;
mod error;

pub use event::{Event, EventAddress, EventBuilder, DIRECT_MESSAGE_KIND};
pub use filter::Filter;
pub use job::{JobEvent, JobStatus, JOB_KIND};
pub use offer::{OfferEvent, Pricing, OFFER_KIND};
pub use review::{
    ClientRatings, FreelancerRatings, Ratings, ReviewEvent, REVIEW_KIND, REVIEW_NAMESPACE,
};
pub use error::{EventError, EventResult};
