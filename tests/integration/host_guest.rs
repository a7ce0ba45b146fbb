//! Shell and guests exchanging messages end to end.

use super::test_utils::{guest, origin_of, pump_down, pump_up, recorder, routes, shell};
use metarouter::env::Navigation;
use metarouter::{Envelope, RouteError, RouterConfig};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn test_guest_route_report_lands_in_hash() {
    let (mut router, shell_env) = shell(RouterConfig::with_routes(routes()), "");
    router.init().unwrap();
    router.go("chat", None, None).unwrap();

    let (mut chat, chat_env) = guest("chat");
    chat.send_route("rooms/42");
    pump_up(&chat_env, &origin_of("chat"), &mut router);

    assert_eq!(shell_env.hash(), "televet//side:chat/rooms/42");
}

#[test]
fn test_shell_navigation_reaches_guest_handler() {
    let (mut router, shell_env) = shell(RouterConfig::with_routes(routes()), "");
    router.init().unwrap();

    let (mut televet, _env) = guest("televet");
    let requested: Rc<RefCell<Vec<(String, Option<Value>)>>> = Rc::default();
    let sink = Rc::clone(&requested);
    televet.register_for_route_change(move |route, data| {
        sink.borrow_mut().push((route.to_string(), data.cloned()))
    });

    router
        .go("televet", Some("pets/0/consultations/1"), None)
        .unwrap();
    router
        .go("televet", Some("pets/0/create-consultation"), Some(json!({"draft": true})))
        .unwrap();
    pump_down(&shell_env, &mut [("televet", &mut televet)]);

    assert_eq!(shell_env.count_with_id("televet"), 1);
    assert_eq!(
        requested.borrow().as_slice(),
        &[
            ("pets/0/consultations/1".to_string(), None),
            ("pets/0/create-consultation".to_string(), Some(json!({"draft": true}))),
        ]
    );
}

#[test]
fn test_broadcast_reaches_every_sibling_once() {
    let (mut router, shell_env) = shell(RouterConfig::with_routes(routes()), "");
    let (shell_log, handler) = recorder();
    router.set_notification_handler(handler);
    router.init().unwrap();
    router.preload().unwrap();

    let (mut televet, _) = guest("televet");
    let (mut booking, _) = guest("booking");
    let (mut chat, chat_env) = guest("chat");
    let (televet_log, handler) = recorder();
    televet.set_notification_handler(handler);
    let (booking_log, handler) = recorder();
    booking.set_notification_handler(handler);
    let (chat_log, handler) = recorder();
    chat.set_notification_handler(handler);

    chat.broadcast("logout", json!({"reason": "expired"}));
    pump_up(&chat_env, &origin_of("chat"), &mut router);
    pump_down(
        &shell_env,
        &mut [
            ("televet", &mut televet),
            ("booking", &mut booking),
            ("chat", &mut chat),
        ],
    );

    let expected = vec![("logout".to_string(), json!({"reason": "expired"}))];
    assert_eq!(*shell_log.borrow(), expected);
    assert_eq!(*televet_log.borrow(), expected);
    assert_eq!(*booking_log.borrow(), expected);
    assert!(chat_log.borrow().is_empty());
}

#[test]
fn test_guest_height_report_resizes_frame() {
    let (mut router, shell_env) = shell(RouterConfig::with_routes(routes()), "");
    router.init().unwrap();

    let (mut televet, televet_env) = guest("televet");
    televet_env.set_document_height(400.0);
    televet.handle_load();
    pump_up(&televet_env, &origin_of("televet"), &mut router);
    assert_eq!(shell_env.style("televet", "height").as_deref(), Some("405px"));

    televet_env.set_document_height(1200.5);
    televet.handle_resize();
    pump_up(&televet_env, &origin_of("televet"), &mut router);
    assert_eq!(shell_env.style("televet", "height").as_deref(), Some("1205.5px"));
}

#[test]
fn test_disallowed_origin_does_not_stop_later_messages() {
    let mut config = RouterConfig::with_routes(routes());
    config.allowed_origins = "https://televet.example;https://booking.example".to_string();
    let (mut router, _shell_env) = shell(config, "");
    let (log, handler) = recorder();
    router.set_notification_handler(handler);
    router.init().unwrap();

    let note = |tag: &str| json!({"message": "notification", "tag": tag, "data": null});
    let rejected = router.handle_message(&Envelope::new(origin_of("chat"), note("from-chat")));
    assert_eq!(
        rejected,
        Err(RouteError::OriginRejected {
            origin: origin_of("chat")
        })
    );

    router
        .handle_message(&Envelope::new(origin_of("booking"), note("from-booking")))
        .unwrap();
    assert_eq!(
        *log.borrow(),
        vec![("from-booking".to_string(), Value::Null)]
    );
}

#[test]
fn test_guest_rejects_foreign_sub_route() {
    let (mut televet, _) = guest("televet");
    let requested: Rc<RefCell<Vec<String>>> = Rc::default();
    let sink = Rc::clone(&requested);
    televet.register_for_route_change(move |route, _| sink.borrow_mut().push(route.to_string()));

    let forged = json!({"message": "sub-route", "route": "admin"});
    assert!(televet
        .handle_message(&Envelope::new("https://evil.example", forged))
        .is_err());
    assert!(requested.borrow().is_empty());
}
