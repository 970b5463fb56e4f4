//! Notification routing
//!
//! Maps incoming events to user-facing notification payloads by explicit
//! match on the event kind. Categories the user disabled route to nothing,
//! as do kinds we do not recognize and events whose tags fail validation.

use tracing::debug;

use nostr_events::{
    Event, JobEvent, OfferEvent, Pricing, ReviewEvent, DIRECT_MESSAGE_KIND, JOB_KIND, OFFER_KIND,
    REVIEW_KIND,
};

use crate::settings::NotificationPrefs;

/// A user-facing notification payload
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// Short headline
    pub title: String,
    /// One-line body
    pub body: String,
    /// Address or id of the event behind the notification
    pub target: String,
}

/// Routes events to notification payloads
#[derive(Debug, Clone, Default)]
pub struct NotificationRouter {
    prefs: NotificationPrefs,
}

impl NotificationRouter {
    /// Create a router with the given preferences
    pub fn new(prefs: NotificationPrefs) -> Self {
        Self { prefs }
    }

    /// Replace the preferences
    pub fn set_prefs(&mut self, prefs: NotificationPrefs) {
        self.prefs = prefs;
    }

    /// Build a notification for an event, if one is warranted
    pub fn route(&self, event: &Event) -> Option<Notification> {
        match event.kind {
            JOB_KIND if self.prefs.jobs => {
                let job = match JobEvent::from_event(event) {
                    Ok(job) => job,
                    Err(e) => {
                        debug!("Ignoring malformed job event: {}", e);
                        return None;
                    }
                };

                Some(Notification {
                    title: "New job posted".to_string(),
                    body: job.title.clone(),
                    target: job.address().to_string(),
                })
            }
            OFFER_KIND if self.prefs.offers => {
                let offer = match OfferEvent::from_event(event) {
                    Ok(offer) => offer,
                    Err(e) => {
                        debug!("Ignoring malformed offer event: {}", e);
                        return None;
                    }
                };

                let body = match offer.pricing {
                    Pricing::Absolute => format!("Offer: {} sats", offer.amount),
                    Pricing::SatsPerMinute => format!("Offer: {} sats/min", offer.amount),
                };

                Some(Notification {
                    title: "New offer on your job".to_string(),
                    body,
                    target: offer.address().to_string(),
                })
            }
            REVIEW_KIND if self.prefs.reviews => {
                let review = match ReviewEvent::from_event(event) {
                    Ok(review) => review,
                    Err(e) => {
                        debug!("Ignoring malformed review event: {}", e);
                        return None;
                    }
                };

                let percent = (review.ratings.score() * 100.0).round() as u32;

                Some(Notification {
                    title: "You received a review".to_string(),
                    body: format!("Rated {}%", percent),
                    target: review.subject.to_string(),
                })
            }
            DIRECT_MESSAGE_KIND if self.prefs.messages => Some(Notification {
                title: "New message".to_string(),
                // Content is encrypted for the recipient; never shown here
                body: "You have a new direct message".to_string(),
                target: event.id.clone().unwrap_or_default(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nostr_events::{EventAddress, EventBuilder, FreelancerRatings, Ratings};

    fn all_on() -> NotificationPrefs {
        NotificationPrefs::default()
    }

    fn job() -> JobEvent {
        JobEvent::new("a".repeat(64), "Fix my node", "It crashes on startup.")
    }

    #[test]
    fn test_job_notification() {
        let router = NotificationRouter::new(all_on());
        let job = job();

        let notification = router.route(&job.to_event()).unwrap();
        assert_eq!(notification.title, "New job posted");
        assert_eq!(notification.body, "Fix my node");
        assert_eq!(notification.target, job.address().to_string());
    }

    #[test]
    fn test_offer_notification_pricing_modes() {
        let router = NotificationRouter::new(all_on());

        let offer = OfferEvent::new(
            "b".repeat(64),
            job().address(),
            Pricing::Absolute,
            21_000,
            "On it.",
        );
        let notification = router.route(&offer.to_event()).unwrap();
        assert_eq!(notification.body, "Offer: 21000 sats");

        let offer = OfferEvent::new(
            "b".repeat(64),
            job().address(),
            Pricing::SatsPerMinute,
            300,
            "On it.",
        );
        let notification = router.route(&offer.to_event()).unwrap();
        assert_eq!(notification.body, "Offer: 300 sats/min");
    }

    #[test]
    fn test_review_notification_shows_score() {
        let router = NotificationRouter::new(all_on());

        let review = ReviewEvent::new(
            "c".repeat(64),
            job().address(),
            Ratings::Freelancer(FreelancerRatings {
                success: true,
                expertise: true,
                availability: true,
                communication: true,
            }),
            "Great work",
        );

        let notification = router.route(&review.to_event()).unwrap();
        assert_eq!(notification.body, "Rated 100%");
    }

    #[test]
    fn test_direct_message_body_is_generic() {
        let router = NotificationRouter::new(all_on());

        let mut event = EventBuilder::new(DIRECT_MESSAGE_KIND, "d".repeat(64))
            .content("ciphertext goes here")
            .build();
        event.id = Some("e".repeat(64));

        let notification = router.route(&event).unwrap();
        assert_eq!(notification.title, "New message");
        assert!(!notification.body.contains("ciphertext"));
        assert_eq!(notification.target, "e".repeat(64));
    }

    #[test]
    fn test_disabled_category_routes_nothing() {
        let prefs = NotificationPrefs {
            jobs: false,
            ..NotificationPrefs::default()
        };
        let router = NotificationRouter::new(prefs);

        assert_eq!(router.route(&job().to_event()), None);
    }

    #[test]
    fn test_unknown_kind_routes_nothing() {
        let router = NotificationRouter::new(all_on());

        let event = EventBuilder::new(12_345, "a".repeat(64)).build();
        assert_eq!(router.route(&event), None);
    }

    #[test]
    fn test_malformed_event_routes_nothing() {
        let router = NotificationRouter::new(all_on());

        // Job kind but no tags at all
        let event = EventBuilder::new(JOB_KIND, "a".repeat(64)).build();
        assert_eq!(router.route(&event), None);
    }

    #[test]
    fn test_target_parses_as_address() {
        let router = NotificationRouter::new(all_on());
        let notification = router.route(&job().to_event()).unwrap();

        let address: EventAddress = notification.target.parse().unwrap();
        assert_eq!(address.kind, JOB_KIND);
    }
}
