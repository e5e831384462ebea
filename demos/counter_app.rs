//! Counter application driven entirely through actions and mutations

use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;
use vessel::{StateMap, Store, StoreConfig};

fn int(state: &StateMap, key: &str) -> i64 {
    state.get(key).and_then(Value::as_i64).unwrap_or(0)
}

fn push_history(state: &mut StateMap, count: i64) {
    let mut history = state
        .get("history")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    history.push(json!(count));
    state.insert("history".into(), Value::Array(history));
}

fn step_by(mut state: StateMap, sign: i64) -> StateMap {
    let delta = int(&state, "step").saturating_mul(sign);
    let count = int(&state, "count").saturating_add(delta);
    state.insert("count".into(), json!(count));
    push_history(&mut state, count);
    state
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Complete Counter Application ===\n");

    println!("1. Initializing counter store");
    let store = Store::new(
        StoreConfig::new()
            .mutation("increment", |state, _| step_by(state, 1))
            .mutation("decrement", |state, _| step_by(state, -1))
            .mutation("set_step", |mut state, payload| {
                state.insert("step".into(), payload.unwrap_or(json!(1)));
                state
            })
            .mutation("reset", |mut state, _| {
                state.insert("count".into(), json!(0));
                push_history(&mut state, 0);
                state
            })
            .action("increment", |store, _| {
                store.commit("increment", None);
            })
            .action("decrement", |store, _| {
                store.commit("decrement", None);
            })
            .action("change_step", |store, payload| {
                store.commit("set_step", payload);
            })
            .action("reset", |store, _| {
                store.commit("reset", None);
            })
            .initial_state_value(json!({ "count": 0, "step": 1, "history": [0] }))
            .expect("initial state is an object"),
    );

    println!("\n2. Subscribing a display");
    let display = store.watch(|state| {
        let count = int(state, "count");
        println!(
            "   [State] Count: {} | Step: {} | Positive: {} | Even: {}",
            count,
            int(state, "step"),
            count > 0,
            count % 2 == 0
        );
    });

    println!("\n3. Incrementing...");
    for _ in 0..3 {
        store.dispatch("increment", None);
    }

    println!("\n4. Changing step size to 5");
    store.dispatch("change_step", json!(5));

    println!("\n5. Incrementing with new step...");
    store.dispatch("increment", None);

    println!("\n6. Decrementing...");
    for _ in 0..3 {
        store.dispatch("decrement", None);
    }

    println!("\n7. History:");
    store.read(|state| println!("   {}", state["history"]));

    println!("\n8. Detaching the display and resetting quietly");
    drop(display);
    store.dispatch("reset", None);
    println!("   status: {}, count: {}", store.status(), store.read(|s| int(s, "count")));

    println!("\n✓ Counter application complete!");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn huge_step_saturates() {
        let state = match json!({ "count": i64::MAX - 1, "step": i64::MAX, "history": [] }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let up = step_by(state.clone(), 1);
        assert_eq!(up["count"], json!(i64::MAX));
        let down = step_by(state, -1);
        assert_eq!(down["count"], json!(-1));
    }
}
