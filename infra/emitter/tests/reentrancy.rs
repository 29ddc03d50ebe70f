pub mod fixtures;

use fixtures::*;
use parking_lot::Mutex;
use pemit_emitter::*;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn test_listener_added_during_dispatch_waits_for_next_emit() {
    let emitter = Emitter::<String>::new();
    let journal = Journal::new();
    let late = journal.listener("late");
    let registrar = emitter.clone();
    emitter
        .once(
            "e",
            Listener::<String>::new(move |_, _, _| {
                registrar.on("e", late.clone()).unwrap();
            }),
        )
        .unwrap();

    assert_eq!(emitter.emit("e", &data("first")), 1);
    assert_eq!(journal.count("late"), 0);

    assert_eq!(emitter.emit("e", &data("second")), 1);
    assert_eq!(journal.calls()[0].data, "second");
}

#[test]
fn test_listener_removed_during_dispatch_still_runs_this_round() {
    let emitter = Emitter::<String>::new();
    let journal = Journal::new();
    let victim_slot: Arc<Mutex<Option<Subscription<String>>>> = Arc::new(Mutex::new(None));

    let slot = Arc::clone(&victim_slot);
    emitter
        .on(
            "e",
            Listener::<String>::new(move |_, _, _| {
                if let Some(victim) = slot.lock().as_ref() {
                    victim.unsubscribe();
                }
            }),
        )
        .unwrap();
    let victim = emitter.on("e", journal.listener("victim")).unwrap();
    emitter.on("e", journal.listener("bystander")).unwrap();
    *victim_slot.lock() = Some(victim);

    assert_eq!(emitter.emit("e", &data("1")), 3);
    assert_eq!(journal.tags(), vec!["victim", "bystander"]);

    assert_eq!(emitter.emit("e", &data("2")), 2);
    assert_eq!(journal.tags(), vec!["victim", "bystander", "bystander"]);
}

#[test]
fn test_off_during_dispatch_does_not_skip_remaining_listeners() {
    let emitter = Emitter::<String>::new();
    let journal = Journal::new();
    let remover = emitter.clone();
    emitter.on("e", journal.listener("a")).unwrap();
    emitter
        .on(
            "e",
            Listener::<String>::new(move |_, _, _| {
                remover.off(&Scope::Event("e"));
            }),
        )
        .unwrap();
    emitter.on("e", journal.listener("c")).unwrap();
    emitter.on("e", journal.listener("d")).unwrap();

    assert_eq!(emitter.emit("e", &data("x")), 4);
    assert_eq!(journal.tags(), vec!["a", "c", "d"]);
    assert!(!emitter.has_listeners(&Scope::Event("e")));
}

#[test]
fn test_once_listener_removed_by_nested_off_still_runs_this_round() {
    let emitter = Emitter::<String>::new();
    let journal = Journal::new();
    let remover = emitter.clone();
    emitter
        .on(
            "e",
            Listener::<String>::new(move |_, _, _| {
                remover.off(&Scope::Event("e"));
            }),
        )
        .unwrap();
    let once = emitter.once("e", journal.listener("once")).unwrap();

    assert_eq!(emitter.emit("e", &data("x")), 2);
    assert_eq!(journal.count("once"), 1);
    assert_eq!(emitter.listeners_count(&Scope::Event("e")), 0);
    assert!(!once.is_active());
    assert!(!once.unsubscribe());

    assert_eq!(emitter.emit("e", &data("y")), 0);
    assert_eq!(journal.count("once"), 1);
}

#[test]
fn test_nested_emit_consumes_once_listener_exactly_once() {
    let emitter = Emitter::<String>::new();
    let journal = Journal::new();
    let nested = emitter.clone();
    let depth = Arc::new(AtomicUsize::new(0));
    let level = Arc::clone(&depth);
    emitter
        .on(
            "e",
            Listener::<String>::new(move |_, _, _| {
                if level.fetch_add(1, Ordering::SeqCst) == 0 {
                    nested.emit("e", &data("nested"));
                }
            }),
        )
        .unwrap();
    emitter.once("e", journal.listener("once")).unwrap();

    emitter.emit("e", &data("outer"));

    assert_eq!(journal.count("once"), 1);
    assert_eq!(journal.calls()[0].data, "nested");
    assert_eq!(emitter.listeners_count(&Scope::Event("e")), 1);
}

#[test]
fn test_once_listener_re_emitting_its_event_does_not_recurse() {
    let emitter = Emitter::<String>::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let nested = emitter.clone();
    emitter
        .once(
            "e",
            Listener::<String>::new(move |_, _, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                nested.emit("e", &data("again"));
            }),
        )
        .unwrap();

    emitter.emit("e", &data("x"));

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(emitter.event_names().is_empty());
}

#[test]
fn test_listener_can_unsubscribe_itself() {
    let emitter = Emitter::<String>::new();
    let own: Arc<Mutex<Option<Subscription<String>>>> = Arc::new(Mutex::new(None));
    let slot = Arc::clone(&own);
    let subscription = emitter
        .on_params(
            "e",
            &json!({ "id": 1 }),
            Listener::<String>::new(move |event, params, data| {
                if let Some(me) = slot.lock().as_ref() {
                    assert_eq!(me.id(), event.id());
                    assert_eq!(params, Some(&json!({ "id": 1 })));
                    assert!(!data.is_empty());
                    me.unsubscribe();
                }
            }),
        )
        .unwrap();
    *own.lock() = Some(subscription.clone());

    emitter.emit_params("e", &json!({ "id": 1 }), &data("x")).unwrap();

    assert!(!subscription.is_active());
    assert_eq!(emitter.emit_params("e", &json!({ "id": 1 }), &data("x")).unwrap(), 0);
}

#[test]
fn test_emitter_is_shared_across_threads() {
    let emitter = Emitter::<usize>::new();
    let total = Arc::new(AtomicUsize::new(0));
    let sum = Arc::clone(&total);
    emitter
        .on(
            "add",
            Listener::<usize>::new(move |_, _, n| {
                sum.fetch_add(*n, Ordering::SeqCst);
            }),
        )
        .unwrap();

    let handles: Vec<_> = (1..=4)
        .map(|n| {
            let emitter = emitter.clone();
            std::thread::spawn(move || {
                for _ in 0..10 {
                    emitter.emit("add", &n);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(total.load(Ordering::SeqCst), 10 * (1 + 2 + 3 + 4));
}
