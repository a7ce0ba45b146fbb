//! Hash-driven routing and router lifecycle.

use super::test_utils::{routes, shell};
use metarouter::env::memory::MemoryEnvironment;
use metarouter::env::{EventKind, Navigation};
use metarouter::{ConfigError, RouteDescriptor, RouteError, RouterConfig, ShellRouter};

#[test]
fn test_deep_link_restores_all_outlets() {
    let (mut router, env) = shell(
        RouterConfig::with_routes(routes()),
        "#booking/slots/2024-05-01//side:chat/rooms/9",
    );
    router.init().unwrap();

    assert!(env.is_displayed("booking"));
    assert!(env.is_displayed("chat"));
    assert_eq!(env.count_with_id("televet"), 0);
    assert_eq!(
        env.element_by_id("booking").unwrap().attributes["src"],
        "https://booking.example#/slots/2024-05-01"
    );
    assert_eq!(router.active_route().unwrap().route.path, "chat");
}

#[test]
fn test_custom_hash_prefix_in_frame_source() {
    let mut config = RouterConfig::with_routes(routes());
    config.hash_prefix = "!/".to_string();
    let (mut router, env) = shell(config, "televet/pets/3");
    router.init().unwrap();
    assert_eq!(
        env.element_by_id("televet").unwrap().attributes["src"],
        "https://televet.example#!/pets/3"
    );
}

#[test]
fn test_unknown_app_in_hash_is_route_not_found() {
    let (mut router, _env) = shell(RouterConfig::with_routes(routes()), "missing/x");
    assert_eq!(
        router.init(),
        Err(RouteError::RouteNotFound("missing".to_string()))
    );
}

#[test]
fn test_hash_change_switches_outlet_content() {
    let (mut router, env) = shell(RouterConfig::with_routes(routes()), "");
    router.init().unwrap();
    assert!(env.is_displayed("televet"));

    env.navigate_hash("booking//side:chat");
    router.handle_hash_change().unwrap();
    assert!(env.is_displayed("booking"));
    assert!(!env.is_displayed("televet"));
    assert!(env.is_displayed("chat"));

    // Router updates replace the entry the user pushed; they never add one.
    assert_eq!(env.history_len(), 2);
    assert_eq!(env.hash(), "booking//side:chat");
}

#[test]
fn test_empty_hash_change_is_a_no_op() {
    let (mut router, env) = shell(RouterConfig::with_routes(routes()), "");
    router.init().unwrap();
    env.navigate_hash("");
    router.handle_hash_change().unwrap();
    assert!(env.is_displayed("televet"));
}

#[test]
fn test_routers_do_not_leak_listeners() {
    let env = MemoryEnvironment::new("https://shell.example");
    env.add_outlet("outlet");

    for _ in 0..3 {
        let mut router =
            ShellRouter::new(env.clone(), RouterConfig::with_routes(routes())).unwrap();
        let subscriptions = router.init().unwrap();
        assert!(!subscriptions.is_empty());
        assert_eq!(env.listener_count(EventKind::Message), 1);
        assert_eq!(env.listener_count(EventKind::HashChange), 1);
    }

    assert_eq!(env.listener_count(EventKind::Message), 0);
    assert_eq!(env.listener_count(EventKind::HashChange), 0);
}

#[test]
fn test_no_routes_means_no_navigation() {
    let (mut router, env) = shell(RouterConfig::default(), "");
    router.init().unwrap();
    assert!(router.active_route().is_none());
    assert_eq!(env.hash(), "");
}

#[test]
fn test_routes_sharing_custom_outlet() {
    let config = RouterConfig::with_routes(vec![
        RouteDescriptor::new("inbox", "https://mail.example/inbox").with_outlet("main"),
        RouteDescriptor::new("calendar", "https://cal.example").with_outlet("main"),
    ]);
    let (mut router, env) = shell(config, "");
    router.init().unwrap();
    router.go("calendar", Some("week"), None).unwrap();

    assert!(!env.is_displayed("inbox"));
    assert!(env.is_displayed("calendar"));
    assert_eq!(env.hash(), "main:calendar/week");
}

#[test]
fn test_reload_restores_state_from_own_hash() {
    let (mut router, env) = shell(RouterConfig::with_routes(routes()), "");
    router.init().unwrap();
    router.go("booking", Some("slots/4"), None).unwrap();
    router.go("chat", Some("rooms/(a:b)"), None).unwrap();
    let hash = env.hash();
    drop(router);

    let (mut reloaded, reloaded_env) = shell(RouterConfig::with_routes(routes()), &hash);
    reloaded.init().unwrap();
    assert_eq!(reloaded_env.hash(), hash);
    assert!(reloaded_env.is_displayed("booking"));
    assert!(reloaded_env.is_displayed("chat"));
    assert_eq!(
        reloaded_env.element_by_id("chat").unwrap().attributes["src"],
        "https://chat.example#/rooms/(a:b)"
    );
}

#[test]
fn test_routes_the_hash_cannot_carry_are_rejected_up_front() {
    let env = MemoryEnvironment::new("https://shell.example");
    env.add_outlet("outlet");
    let config = RouterConfig::with_routes(vec![RouteDescriptor::new(
        "apps/televet",
        "https://televet.example",
    )]);
    assert!(matches!(
        ShellRouter::new(env, config),
        Err(ConfigError::ReservedCharacter { .. })
    ));
}
