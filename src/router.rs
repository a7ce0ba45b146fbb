//! Shell Router
//!
//! Host-side half of the protocol. Owns the configured routes and the frames
//! created for them, keeps at most one frame visible per outlet, mirrors every
//! outlet's current route into the shared location hash, and dispatches
//! inbound messages from guests.

mod registry;

pub use registry::FrameRegistry;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{RouteDescriptor, RouterConfig};
use crate::env::{ElementHandle, EventKind, HostEnvironment, Subscriptions};
use crate::error::{ConfigError, RouteError};
use crate::fragment;
use crate::protocol::{Envelope, Message, OriginPolicy};

/// Class given to every frame the router creates
pub const FRAME_CLASS: &str = "outlet-frame";

/// Receives `(tag, data)` of notifications and broadcasts from guests.
pub type NotificationHandler = Box<dyn FnMut(&str, &Value)>;

/// The most recently activated route
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveRoute {
    pub route: RouteDescriptor,
    pub sub_route: Option<String>,
}

pub struct ShellRouter<E: HostEnvironment> {
    env: E,
    routes: Vec<RouteDescriptor>,
    hash_prefix: String,
    additional_height: f64,
    policy: OriginPolicy,
    frames: FrameRegistry,
    active: Option<ActiveRoute>,
    on_notification: NotificationHandler,
    subscriptions: Option<Subscriptions>,
}

impl<E: HostEnvironment> ShellRouter<E> {
    /// Build a router over `env`. The configuration is validated first, so
    /// every route path and outlet id can be written to and read back from
    /// the location hash.
    pub fn new(env: E, config: RouterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            env,
            policy: config.origin_policy(),
            routes: config.routes,
            hash_prefix: config.hash_prefix,
            additional_height: config.additional_height,
            frames: FrameRegistry::new(),
            active: None,
            on_notification: Box::new(|_, _| {}),
            subscriptions: None,
        })
    }

    pub fn set_notification_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&str, &Value) + 'static,
    {
        self.on_notification = Box::new(handler);
    }

    /// Start listening and route to the initial state.
    ///
    /// `same-origin` is resolved to the page origin here, once. With an empty
    /// hash the first configured route is activated; otherwise every outlet
    /// named in the hash is routed. Listeners stay registered until
    /// [`teardown`](Self::teardown) or drop, even if initial routing fails.
    pub fn init(&mut self) -> Result<Subscriptions, RouteError> {
        self.teardown();
        self.policy = self.policy.resolve(&self.env.origin());

        let subscriptions =
            Subscriptions::acquire(&mut self.env, &[EventKind::Message, EventKind::HashChange]);
        self.subscriptions = Some(subscriptions.clone());
        info!(routes = self.routes.len(), policy = %self.policy, "Shell router initialized");

        let default_path = self.routes.first().map(|r| r.path.clone());
        match default_path {
            Some(path) if self.env.hash().is_empty() => self.go(&path, None, None)?,
            _ => self.route_by_hash()?,
        }
        Ok(subscriptions)
    }

    /// Release the listeners acquired by [`init`](Self::init).
    pub fn teardown(&mut self) {
        if let Some(subscriptions) = self.subscriptions.take() {
            subscriptions.release(&mut self.env);
            debug!("Shell router listeners released");
        }
    }

    /// Create every configured frame up front, invisible.
    pub fn preload(&mut self) -> Result<(), RouteError> {
        let routes = self.routes.clone();
        for route in &routes {
            self.ensure_frame(route, None)?;
        }
        Ok(())
    }

    /// Navigate to a configured route, optionally passing a sub-route and a
    /// payload to the routed app.
    pub fn go(
        &mut self,
        path: &str,
        sub_route: Option<&str>,
        data: Option<Value>,
    ) -> Result<(), RouteError> {
        let route = self
            .find_route(path)
            .cloned()
            .ok_or_else(|| RouteError::RouteNotFound(path.to_string()))?;
        let sub_route = sub_route.filter(|s| !s.is_empty());

        let frame = self.ensure_frame(&route, sub_route)?;
        self.activate(route, frame, sub_route, data);
        Ok(())
    }

    /// Hash-change listener: re-derive routes from the current hash.
    pub fn handle_hash_change(&mut self) -> Result<(), RouteError> {
        self.route_by_hash()
    }

    /// Message listener.
    pub fn handle_message(&mut self, envelope: &Envelope) -> Result<(), RouteError> {
        if envelope.is_empty() {
            return Ok(());
        }
        if let Err(e) = self.policy.check(&envelope.origin) {
            warn!(origin = %envelope.origin, "Rejected message from disallowed origin");
            return Err(e);
        }
        let Some(message) = Message::decode(&envelope.payload) else {
            debug!(origin = %envelope.origin, "Ignoring unrecognized message");
            return Ok(());
        };
        debug!(kind = message.kind(), origin = %envelope.origin, "Handling message");

        match message {
            Message::Routed { app_path, route } => {
                let descriptor = self
                    .find_route(&app_path)
                    .cloned()
                    .ok_or(RouteError::RouteNotFound(app_path))?;
                self.set_route_in_hash(&descriptor, Some(&route));
            }
            Message::SetHeight { app_path, height } => self.resize_frame(&app_path, height),
            Message::Notification { tag, data } => (self.on_notification)(&tag, &data),
            Message::Broadcast {
                tag,
                data,
                app_path,
            } => self.broadcast(&tag, &data, app_path.as_deref()),
            Message::SubRoute { .. } => debug!("Ignoring sub-route message sent to the shell"),
        }
        Ok(())
    }

    /// The most recently activated route, if any navigation succeeded.
    pub fn active_route(&self) -> Option<&ActiveRoute> {
        self.active.as_ref()
    }

    /// Configured routes in configuration order.
    pub fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }

    /// Frames created so far.
    pub fn frames(&self) -> &FrameRegistry {
        &self.frames
    }

    /// Origin policy; `same-origin` is resolved after [`init`](Self::init).
    pub fn origin_policy(&self) -> &OriginPolicy {
        &self.policy
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    fn find_route(&self, path: &str) -> Option<&RouteDescriptor> {
        self.routes.iter().find(|r| r.path == path)
    }

    fn route_by_hash(&mut self) -> Result<(), RouteError> {
        let hash = self.env.hash();
        if hash.is_empty() {
            return Ok(());
        }
        for (outlet, encoded) in fragment::parse(&hash) {
            let (app_path, sub_route) = fragment::split_app_path(&encoded);
            if app_path.is_empty() {
                debug!(%outlet, "Hash entry without app path");
                continue;
            }
            self.go(app_path, Some(sub_route), None)?;
        }
        Ok(())
    }

    fn ensure_frame(
        &mut self,
        route: &RouteDescriptor,
        sub_route: Option<&str>,
    ) -> Result<ElementHandle, RouteError> {
        if let Some(frame) = self.frames.get(&route.path) {
            return Ok(frame);
        }

        let outlet = self
            .env
            .get_element_by_id(route.outlet_id())
            .ok_or_else(|| RouteError::OutletMissing {
                outlet: route.outlet_id().to_string(),
                path: route.path.clone(),
            })?;

        let src = match sub_route {
            Some(sub_route) => format!("{}#{}{}", route.app, self.hash_prefix, sub_route),
            None => route.app.clone(),
        };

        let frame = self.env.create_element("iframe");
        self.env.set_style_property(frame, "display", "none");
        self.env.set_attribute(frame, "src", &src);
        self.env.set_attribute(frame, "id", &route.path);
        self.env.set_class(frame, FRAME_CLASS);
        self.env.append_child(outlet, frame);
        self.frames.register(&route.path, frame);

        info!(path = %route.path, outlet = route.outlet_id(), %src, "Created frame");
        Ok(frame)
    }

    fn activate(
        &mut self,
        route: RouteDescriptor,
        frame: ElementHandle,
        sub_route: Option<&str>,
        data: Option<Value>,
    ) {
        for sibling in self.routes.iter().filter(|r| r.outlet_id() == route.outlet_id()) {
            if let Some(sibling_frame) = self.frames.get(&sibling.path) {
                let display = if sibling.path == route.path { "block" } else { "none" };
                self.env.set_style_property(sibling_frame, "display", display);
            }
        }

        if let Some(sub_route) = sub_route {
            let message = Message::SubRoute {
                route: sub_route.to_string(),
                data,
            };
            self.post(frame, &message);
        }

        self.set_route_in_hash(&route, sub_route);
        info!(path = %route.path, sub_route, "Activated route");
        self.active = Some(ActiveRoute {
            route,
            sub_route: sub_route.map(str::to_string),
        });
    }

    /// Read-modify-write of the current hash; sibling outlets are preserved.
    fn set_route_in_hash(&mut self, route: &RouteDescriptor, sub_route: Option<&str>) {
        let sub_route = sub_route
            .map(|s| s.strip_prefix('/').unwrap_or(s))
            .filter(|s| !s.is_empty());
        let entry = match sub_route {
            Some(sub_route) => format!("{}/{}", route.path, sub_route),
            None => route.path.clone(),
        };

        let mut routes = fragment::parse(&self.env.hash());
        routes.insert(route.outlet_id(), entry);
        let hash = fragment::serialize(&routes);
        debug!(%hash, "Replacing location hash");
        self.env.replace_hash(&hash);
    }

    fn resize_frame(&mut self, app_path: &str, height: f64) {
        let Some(frame) = self.frames.get(app_path) else {
            debug!(app_path, "Height reported for unknown frame");
            return;
        };
        let height = height + self.additional_height;
        if height.is_finite() && height > 0.0 {
            self.env
                .set_style_property(frame, "height", &format!("{}px", height));
        }
    }

    fn broadcast(&mut self, tag: &str, data: &Value, sender: Option<&str>) {
        let notification = Message::Notification {
            tag: tag.to_string(),
            data: data.clone(),
        };
        let targets: Vec<ElementHandle> = self
            .routes
            .iter()
            .filter(|r| Some(r.path.as_str()) != sender)
            .filter_map(|r| self.frames.get(&r.path))
            .collect();
        for frame in targets {
            self.post(frame, &notification);
        }
        (self.on_notification)(tag, data);
    }

    fn post(&mut self, frame: ElementHandle, message: &Message) {
        let payload = message.to_value();
        for target_origin in self.policy.target_origins() {
            self.env.post_to_frame(frame, &payload, &target_origin);
        }
    }
}

impl<E: HostEnvironment> Drop for ShellRouter<E> {
    fn drop(&mut self) {
        self.teardown();
    }
}
