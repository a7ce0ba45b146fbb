//! Embedded App Adapter
//!
//! Guest-side half of the protocol, running inside a frame created by the
//! shell router. Reports the guest's route and height upstream, relays
//! notifications and broadcasts, and hands `sub-route` requests from the
//! shell to the hosted application.

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::env::{EventKind, GuestEnvironment, Subscriptions};
use crate::error::RouteError;
use crate::protocol::{Envelope, Message, OriginPolicy};

/// Receives the requested sub-route and the optional payload sent with it.
pub type RouteChangeHandler = Box<dyn FnMut(&str, Option<&Value>)>;

/// Receives `(tag, data)` of notifications delivered by the shell.
pub type GuestNotificationHandler = Box<dyn FnMut(&str, &Value)>;

pub struct EmbeddedApp<E: GuestEnvironment> {
    env: E,
    app_path: String,
    policy: OriginPolicy,
    on_route_change: Option<RouteChangeHandler>,
    on_notification: GuestNotificationHandler,
    subscriptions: Option<Subscriptions>,
}

impl<E: GuestEnvironment> EmbeddedApp<E> {
    pub fn new(env: E, config: AppConfig) -> Self {
        Self {
            env,
            policy: config.origin_policy(),
            app_path: config.app_path,
            on_route_change: None,
            on_notification: Box::new(|_, _| {}),
            subscriptions: None,
        }
    }

    /// Resolve `same-origin` and subscribe to load, resize and message events.
    pub fn init(&mut self) -> Subscriptions {
        self.teardown();
        self.policy = self.policy.resolve(&self.env.origin());
        let subscriptions = Subscriptions::acquire(
            &mut self.env,
            &[EventKind::Load, EventKind::Resize, EventKind::Message],
        );
        self.subscriptions = Some(subscriptions.clone());
        debug!(app_path = %self.app_path, policy = %self.policy, "Embedded app initialized");
        subscriptions
    }

    pub fn teardown(&mut self) {
        if let Some(subscriptions) = self.subscriptions.take() {
            subscriptions.release(&mut self.env);
        }
    }

    /// Register the hosted application's handler for shell-requested routes.
    pub fn register_for_route_change<F>(&mut self, handler: F)
    where
        F: FnMut(&str, Option<&Value>) + 'static,
    {
        self.on_route_change = Some(Box::new(handler));
    }

    pub fn set_notification_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&str, &Value) + 'static,
    {
        self.on_notification = Box::new(handler);
    }

    /// Report the guest's current route to the shell.
    pub fn send_route(&mut self, url: &str) {
        self.post(&Message::Routed {
            app_path: self.app_path.clone(),
            route: url.to_string(),
        });
    }

    pub fn notify_shell(&mut self, tag: &str, data: Value) {
        self.post(&Message::Notification {
            tag: tag.to_string(),
            data,
        });
    }

    /// Notify the shell and, through it, every sibling app.
    pub fn broadcast(&mut self, tag: &str, data: Value) {
        self.post(&Message::Broadcast {
            tag: tag.to_string(),
            data,
            app_path: Some(self.app_path.clone()),
        });
    }

    pub fn handle_load(&mut self) {
        self.send_height();
    }

    pub fn handle_resize(&mut self) {
        self.send_height();
    }

    /// Message listener.
    pub fn handle_message(&mut self, envelope: &Envelope) -> Result<(), RouteError> {
        if envelope.is_empty() {
            return Ok(());
        }
        if let Err(e) = self.policy.check(&envelope.origin) {
            warn!(origin = %envelope.origin, app_path = %self.app_path, "Rejected message from disallowed origin");
            return Err(e);
        }

        match Message::decode(&envelope.payload) {
            Some(Message::SubRoute { route, data }) => match self.on_route_change.as_mut() {
                Some(handler) => handler(&route, data.as_ref()),
                None => debug!(%route, "No route change handler registered"),
            },
            Some(Message::Notification { tag, data }) => (self.on_notification)(&tag, &data),
            _ => debug!(app_path = %self.app_path, "Ignoring message"),
        }
        Ok(())
    }

    pub fn app_path(&self) -> &str {
        &self.app_path
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    fn send_height(&mut self) {
        let height = self.env.document_height();
        self.post(&Message::SetHeight {
            app_path: self.app_path.clone(),
            height,
        });
    }

    fn post(&mut self, message: &Message) {
        let payload = message.to_value();
        for target_origin in self.policy.target_origins() {
            self.env.post_to_parent(&payload, &target_origin);
        }
    }
}

impl<E: GuestEnvironment> Drop for EmbeddedApp<E> {
    fn drop(&mut self) {
        self.teardown();
    }
}
