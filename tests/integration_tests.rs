//! Integration tests for Vessel

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

use proptest::prelude::*;
use serde_json::{json, Value};
use vessel::{StateMap, Status, Store, StoreConfig};

fn object(value: Value) -> StateMap {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

fn counter_config() -> StoreConfig {
    StoreConfig::new()
        .mutation("increment", |mut state, payload| {
            let by = payload.as_ref().and_then(Value::as_i64).unwrap_or(1);
            let count = state.get("count").and_then(Value::as_i64).unwrap_or(0);
            state.insert("count".into(), json!(count + by));
            state
        })
        .action("increment", |store, payload| {
            store.commit("increment", payload);
        })
        .initial_state(object(json!({ "count": 0 })))
}

fn recorder(store: &Store) -> Arc<Mutex<Vec<StateMap>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    store.subscribe(move |state| {
        seen_clone.lock().unwrap().push(state.clone());
    });
    seen
}

#[test]
fn direct_write_notifies_and_rests() {
    let store = Store::new(StoreConfig::new().initial_state(object(json!({ "count": 0 }))));
    let first = recorder(&store);
    let second = recorder(&store);

    assert!(store.set("count", 5));

    for seen in [first, second] {
        assert_eq!(*seen.lock().unwrap(), vec![object(json!({ "count": 5 }))]);
    }
    assert_eq!(store.status(), Status::Resting);
}

#[test]
fn commit_replaces_state() {
    let store = Store::new(counter_config());
    assert!(store.commit("increment", json!(3)));
    assert_eq!(store.state(), object(json!({ "count": 3 })));
}

#[test]
fn unknown_action_is_rejected() {
    let store = Store::new(counter_config());
    let seen = recorder(&store);

    assert!(!store.dispatch("doesNotExist", None));
    assert_eq!(
        store.try_dispatch("doesNotExist", None).unwrap_err().to_string(),
        "action \"doesNotExist\" doesn't exist"
    );
    assert_eq!(store.state(), object(json!({ "count": 0 })));
    assert_eq!(store.status(), Status::Resting);
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn unknown_mutation_is_rejected() {
    let store = Store::new(counter_config());
    assert!(!store.commit("decrement", json!(1)));
    assert!(store.try_commit("decrement", None).is_err());
    assert_eq!(store.state(), object(json!({ "count": 0 })));
    assert_eq!(store.status(), Status::Resting);
}

#[test]
fn writes_after_commit_still_notify() {
    let store = Store::new(counter_config());
    let seen = recorder(&store);

    store.commit("increment", json!(1));
    store.set("count", 99);

    assert_eq!(
        *seen.lock().unwrap(),
        vec![object(json!({ "count": 1 })), object(json!({ "count": 99 }))]
    );
    assert_eq!(store.status(), Status::Resting);
}

#[test]
fn invalid_subscriber_is_rejected() {
    let store = Store::default();
    store.subscribe(|_| {});

    assert!(!store.subscribe_dyn(Box::new(42)));
    assert_eq!(store.subscriber_count(), 1);
}

#[test]
fn action_runs_exactly_once_with_payload() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let calls_clone = calls.clone();
    let store = Store::new(StoreConfig::new().action("record", move |_store, payload| {
        calls_clone.lock().unwrap().push(payload);
    }));

    assert!(store.dispatch("record", json!({ "id": 7 })));
    assert!(store.dispatch("record", None));
    assert_eq!(
        *calls.lock().unwrap(),
        vec![Some(json!({ "id": 7 })), None]
    );
}

#[test]
fn dispatch_reports_true_even_without_commit() {
    let store = Store::new(StoreConfig::new().action("noop", |_, _| {}));
    assert!(store.dispatch("noop", None));
    assert_eq!(store.status(), Status::Action);
}

#[test]
#[should_panic(expected = "mutation exploded")]
fn mutation_panics_propagate() {
    let store = Store::new(
        StoreConfig::new()
            .mutation("explode", |_, _| panic!("mutation exploded"))
            .action("explode", |store, _| {
                store.commit("explode", None);
            }),
    );
    store.dispatch("explode", None);
}

#[test]
fn subscriber_panic_stops_fan_out() {
    let store = Store::default();
    let later = Arc::new(AtomicUsize::new(0));
    let later_clone = later.clone();

    store.subscribe(|_| panic!("subscriber failed"));
    store.subscribe(move |_| {
        later_clone.fetch_add(1, Ordering::SeqCst);
    });

    let result = catch_unwind(AssertUnwindSafe(|| store.set("a", 1)));
    assert!(result.is_err());
    assert_eq!(later.load(Ordering::SeqCst), 0);

    // The write itself landed and the store is still usable.
    assert_eq!(store.get("a"), Some(json!(1)));
    assert_eq!(store.subscriber_count(), 2);
}

#[test]
fn parallel_commits_are_not_lost() {
    const THREADS: usize = 8;
    const COMMITS: usize = 2000;

    let store = Store::new(counter_config());
    let notified = Arc::new(AtomicUsize::new(0));
    let notified_clone = notified.clone();
    store.subscribe(move |_| {
        notified_clone.fetch_add(1, Ordering::SeqCst);
    });

    std::thread::scope(|scope| {
        for _ in 0..THREADS {
            let store = store.clone();
            scope.spawn(move || {
                for _ in 0..COMMITS {
                    assert!(store.commit("increment", None));
                }
            });
        }
    });

    assert_eq!(store.get("count"), Some(json!(THREADS * COMMITS)));
    assert_eq!(notified.load(Ordering::SeqCst), THREADS * COMMITS);
}

#[test]
fn panicking_mutation_leaves_state_intact() {
    let store = Store::new(
        counter_config().mutation("explode", |_, _| panic!("mutation exploded")),
    );

    let result = catch_unwind(AssertUnwindSafe(|| store.commit("explode", None)));
    assert!(result.is_err());
    assert_eq!(store.state(), object(json!({ "count": 0 })));

    assert!(store.commit("increment", json!(2)));
    assert_eq!(store.get("count"), Some(json!(2)));
}

#[tokio::test]
async fn async_action_commits_after_dispatch_returns() {
    let store = Store::new(
        StoreConfig::new()
            .mutation("set_user", |mut state, payload| {
                state.insert("user".into(), payload.unwrap_or_default());
                state
            })
            .action("load_user", |store, payload| {
                let store = store.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    store.commit("set_user", payload);
                });
            }),
    );

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    store.subscribe(move |state| {
        let _ = tx.send(state.clone());
    });

    assert!(store.dispatch("load_user", json!("ada")));
    assert_eq!(store.get("user"), None);
    assert_eq!(store.status(), Status::Action);

    let state = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("commit should land")
        .expect("channel open");
    assert_eq!(state.get("user"), Some(&json!("ada")));
    assert_eq!(store.status(), Status::Resting);
}

#[tokio::test]
async fn concurrent_actions_both_land() {
    let store = Store::new(
        StoreConfig::new()
            .mutation("put", |mut state, payload| {
                if let Some(Value::Object(entry)) = payload {
                    state.extend(entry);
                }
                state
            })
            .action("delayed_put", |store, payload| {
                let store = store.clone();
                let delay = payload
                    .as_ref()
                    .and_then(|p| p.get("delay"))
                    .and_then(Value::as_u64)
                    .unwrap_or(0);
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    store.commit("put", payload);
                });
            }),
    );

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    store.subscribe(move |_| {
        let _ = tx.send(());
    });

    store.dispatch("delayed_put", json!({ "slow": true, "delay": 30 }));
    store.dispatch("delayed_put", json!({ "fast": true, "delay": 1 }));

    for _ in 0..2 {
        tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("commit should land");
    }
    assert_eq!(store.get("slow"), Some(json!(true)));
    assert_eq!(store.get("fast"), Some(json!(true)));
}

proptest! {
    #[test]
    fn subscribers_fire_once_in_order(n in 1usize..24) {
        let store = Store::default();
        let order = Arc::new(Mutex::new(Vec::new()));
        for i in 0..n {
            let order = order.clone();
            store.subscribe(move |_| order.lock().unwrap().push(i));
        }

        store.set("tick", 1);
        prop_assert_eq!(order.lock().unwrap().clone(), (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn unknown_names_leave_state_alone(name in "[a-z]{1,12}", payload in any::<i64>()) {
        prop_assume!(name != "increment");
        let store = Store::new(counter_config());
        store.subscribe(|_| {});
        let before = store.state();

        prop_assert!(!store.dispatch(&name, json!(payload)));
        prop_assert!(!store.commit(&name, json!(payload)));
        prop_assert_eq!(store.state(), before);
        prop_assert_eq!(store.subscriber_count(), 1);
    }

    #[test]
    fn commit_applies_the_mutation(start in -1000i64..1000, by in -1000i64..1000) {
        let store = Store::new(counter_config().initial_state(object(json!({ "count": start }))));
        prop_assert!(store.commit("increment", json!(by)));
        prop_assert_eq!(store.get("count"), Some(json!(start + by)));
    }
}
