//! Shared fixtures: a shell page and guests wired through memory environments.

use metarouter::env::memory::MemoryEnvironment;
use metarouter::env::Document;
use metarouter::{AppConfig, EmbeddedApp, Envelope, RouteDescriptor, RouterConfig, ShellRouter};
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

pub const SHELL_ORIGIN: &str = "https://shell.example";

pub type Log = Rc<RefCell<Vec<(String, Value)>>>;

pub fn routes() -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor::new("televet", "https://televet.example"),
        RouteDescriptor::new("booking", "https://booking.example"),
        RouteDescriptor::new("chat", "https://chat.example").with_outlet("side"),
    ]
}

pub fn origin_of(path: &str) -> String {
    format!("https://{}.example", path)
}

pub fn shell(
    config: RouterConfig,
    hash: &str,
) -> (ShellRouter<MemoryEnvironment>, MemoryEnvironment) {
    let env = MemoryEnvironment::new(SHELL_ORIGIN).with_hash(hash);
    for outlet in config.outlets() {
        env.add_outlet(outlet);
    }
    (ShellRouter::new(env.clone(), config).unwrap(), env)
}

pub fn guest(path: &str) -> (EmbeddedApp<MemoryEnvironment>, MemoryEnvironment) {
    let env = MemoryEnvironment::new(origin_of(path));
    let config = AppConfig::new(path).with_allowed_origins(SHELL_ORIGIN);
    (EmbeddedApp::new(env.clone(), config), env)
}

pub fn recorder() -> (Log, impl FnMut(&str, &Value) + 'static) {
    let log: Log = Rc::default();
    let sink = Rc::clone(&log);
    let handler = move |tag: &str, data: &Value| {
        sink.borrow_mut().push((tag.to_string(), data.clone()));
    };
    (log, handler)
}

/// Deliver everything a guest posted upstream to the shell, as the browser would.
pub fn pump_up(
    guest_env: &MemoryEnvironment,
    guest_origin: &str,
    router: &mut ShellRouter<MemoryEnvironment>,
) {
    for post in guest_env.take_parent_posts() {
        if post.target_origin == "*" || post.target_origin == SHELL_ORIGIN {
            router
                .handle_message(&Envelope::new(guest_origin, post.payload))
                .unwrap();
        }
    }
}

/// Drain the shell's outbound posts and deliver each to the guest living in
/// the addressed frame. Posts to frames without a listed guest are dropped.
pub fn pump_down(
    shell_env: &MemoryEnvironment,
    guests: &mut [(&str, &mut EmbeddedApp<MemoryEnvironment>)],
) {
    for post in shell_env.take_frame_posts() {
        for (path, app) in guests.iter_mut() {
            if shell_env.get_element_by_id(*path) == Some(post.frame) {
                app.handle_message(&Envelope::new(SHELL_ORIGIN, post.payload.clone()))
                    .unwrap();
            }
        }
    }
}
