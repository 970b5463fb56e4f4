//! Application context and subscription handles
//!
//! Replaces ambient module-level stores with an explicit context object
//! passed to components. Subscriptions are handles with an explicit stop;
//! a dropped handle is pruned on the next dispatch.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

use nostr_events::{Event, Filter};

use crate::notifications::NotificationRouter;
use crate::settings::SettingsManager;

/// Queued events per subscription before delivery starts dropping
const SUBSCRIPTION_QUEUE_DEPTH: usize = 64;

struct SubscriptionEntry {
    filter: Filter,
    sender: mpsc::Sender<Event>,
}

/// Application context owning settings and live subscriptions
pub struct AppContext {
    /// Settings manager (non-sensitive config)
    settings: RwLock<SettingsManager>,
    /// Live subscriptions by id
    subscriptions: Arc<RwLock<HashMap<Uuid, SubscriptionEntry>>>,
}

impl AppContext {
    /// Create a context around a settings manager
    pub fn new(settings: SettingsManager) -> Self {
        Self {
            settings: RwLock::new(settings),
            subscriptions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Access the settings manager
    pub fn settings(&self) -> &RwLock<SettingsManager> {
        &self.settings
    }

    /// Build a notification router from the current preferences
    pub async fn notification_router(&self) -> NotificationRouter {
        let settings = self.settings.read().await;
        NotificationRouter::new(settings.notifications())
    }

    /// Start a subscription for events matching the filter
    pub async fn subscribe(&self, filter: Filter) -> Subscription {
        let (sender, events) = mpsc::channel(SUBSCRIPTION_QUEUE_DEPTH);
        let id = Uuid::new_v4();

        let mut subscriptions = self.subscriptions.write().await;
        subscriptions.insert(id, SubscriptionEntry { filter, sender });

        debug!("Started subscription {}", id);

        Subscription {
            id,
            events,
            subscriptions: Arc::clone(&self.subscriptions),
        }
    }

    /// Deliver an event to every live matching subscription
    ///
    /// Returns the number of subscriptions the event was delivered to.
    /// Subscriptions whose handle was dropped are pruned here.
    pub async fn dispatch(&self, event: &Event) -> usize {
        let subscriptions = self.subscriptions.read().await;

        let mut delivered = 0;
        let mut dead = Vec::new();

        for (id, entry) in subscriptions.iter() {
            if !entry.filter.matches(event) {
                continue;
            }

            match entry.sender.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Closed(_)) => dead.push(*id),
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!("Subscription {} queue full, dropping event", id);
                }
            }
        }

        drop(subscriptions);

        if !dead.is_empty() {
            let mut subscriptions = self.subscriptions.write().await;
            for id in dead {
                subscriptions.remove(&id);
                debug!("Pruned dead subscription {}", id);
            }
        }

        delivered
    }

    /// Number of live subscriptions
    pub async fn subscription_count(&self) -> usize {
        self.subscriptions.read().await.len()
    }
}

/// Handle to a live subscription
///
/// Receive events with [`Subscription::recv`]; stop explicitly with
/// [`Subscription::close`], or just drop the handle.
pub struct Subscription {
    id: Uuid,
    events: mpsc::Receiver<Event>,
    subscriptions: Arc<RwLock<HashMap<Uuid, SubscriptionEntry>>>,
}

impl Subscription {
    /// Subscription id
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Receive the next matching event
    ///
    /// Returns `None` once the subscription is closed and drained.
    pub async fn recv(&mut self) -> Option<Event> {
        self.events.recv().await
    }

    /// Stop the subscription and remove it from the context
    pub async fn close(self) {
        let mut subscriptions = self.subscriptions.write().await;
        subscriptions.remove(&self.id);
        debug!("Closed subscription {}", self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nostr_events::{EventBuilder, JOB_KIND};
    use tempfile::TempDir;

    fn test_context(temp_dir: &TempDir) -> AppContext {
        AppContext::new(SettingsManager::new(temp_dir.path()))
    }

    fn job_event(pubkey: &str) -> Event {
        EventBuilder::new(JOB_KIND, pubkey)
            .tag(["d", "job-1"])
            .build()
    }

    #[tokio::test]
    async fn test_subscribe_and_dispatch() {
        let temp_dir = TempDir::new().unwrap();
        let context = test_context(&temp_dir);

        let mut subscription = context.subscribe(Filter::new().kind(JOB_KIND)).await;

        let delivered = context.dispatch(&job_event("alice")).await;
        assert_eq!(delivered, 1);

        let event = subscription.recv().await.unwrap();
        assert_eq!(event.kind, JOB_KIND);
    }

    #[tokio::test]
    async fn test_filter_respected() {
        let temp_dir = TempDir::new().unwrap();
        let context = test_context(&temp_dir);

        let _subscription = context.subscribe(Filter::new().author("bob")).await;

        let delivered = context.dispatch(&job_event("alice")).await;
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_multiple_subscriptions() {
        let temp_dir = TempDir::new().unwrap();
        let context = test_context(&temp_dir);

        let _by_kind = context.subscribe(Filter::new().kind(JOB_KIND)).await;
        let _by_author = context.subscribe(Filter::new().author("alice")).await;
        let _unrelated = context.subscribe(Filter::new().kind(1)).await;

        let delivered = context.dispatch(&job_event("alice")).await;
        assert_eq!(delivered, 2);
    }

    #[tokio::test]
    async fn test_close_stops_delivery() {
        let temp_dir = TempDir::new().unwrap();
        let context = test_context(&temp_dir);

        let subscription = context.subscribe(Filter::new()).await;
        assert_eq!(context.subscription_count().await, 1);

        subscription.close().await;
        assert_eq!(context.subscription_count().await, 0);

        let delivered = context.dispatch(&job_event("alice")).await;
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_notification_router_follows_settings() {
        let temp_dir = TempDir::new().unwrap();
        let context = test_context(&temp_dir);

        let posting = nostr_events::JobEvent::new("alice", "Fix my node", "It crashes").to_event();

        let router = context.notification_router().await;
        assert!(router.route(&posting).is_some());

        context
            .settings()
            .write()
            .await
            .get_mut()
            .notifications
            .jobs = false;

        let router = context.notification_router().await;
        assert!(router.route(&posting).is_none());
    }

    #[tokio::test]
    async fn test_dropped_handle_is_pruned() {
        let temp_dir = TempDir::new().unwrap();
        let context = test_context(&temp_dir);

        {
            let _subscription = context.subscribe(Filter::new()).await;
        }
        assert_eq!(context.subscription_count().await, 1);

        // First dispatch after the drop notices the closed receiver
        let delivered = context.dispatch(&job_event("alice")).await;
        assert_eq!(delivered, 0);
        assert_eq!(context.subscription_count().await, 0);
    }
}
