//! Demonstration of a Store driving a todo list, including an async action

use std::time::Duration;

use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;
use vessel::{StateMap, Store, StoreConfig};

fn todos(state: &StateMap) -> Vec<Value> {
    state
        .get("todos")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

fn stats(state: &StateMap) -> (usize, usize, usize) {
    let todos = todos(state);
    let total = todos.len();
    let completed = todos.iter().filter(|t| t["completed"] == json!(true)).count();
    (total, total - completed, completed)
}

fn print_todos(state: &StateMap) {
    let filter = state.get("filter").and_then(Value::as_str).unwrap_or("all");
    for todo in todos(state) {
        let completed = todo["completed"] == json!(true);
        let shown = match filter {
            "active" => !completed,
            "completed" => completed,
            _ => true,
        };
        if shown {
            let mark = if completed { "✓" } else { " " };
            println!("   [{}] {}", mark, todo["title"].as_str().unwrap_or_default());
        }
    }
}

fn config() -> StoreConfig {
    StoreConfig::new()
        .mutation("add_todo", |mut state, payload| {
            let mut list = todos(&state);
            let id = list.len();
            list.push(json!({ "id": id, "title": payload.unwrap_or_default(), "completed": false }));
            state.insert("todos".into(), Value::Array(list));
            state
        })
        .mutation("toggle_todo", |mut state, payload| {
            let id = payload.and_then(|p| p.as_u64());
            let list = todos(&state)
                .into_iter()
                .map(|mut todo| {
                    if todo["id"].as_u64() == id {
                        let done = todo["completed"] == json!(true);
                        todo["completed"] = json!(!done);
                    }
                    todo
                })
                .collect();
            state.insert("todos".into(), Value::Array(list));
            state
        })
        .mutation("set_filter", |mut state, payload| {
            state.insert("filter".into(), payload.unwrap_or(json!("all")));
            state
        })
        .action("add_todo", |store, payload| {
            store.commit("add_todo", payload);
        })
        .action("toggle_todo", |store, payload| {
            store.commit("toggle_todo", payload);
        })
        .action("fetch_todos", |store, _| {
            // Pretend to hit a server, then commit each result.
            let store = store.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                for title in ["Write documentation", "Publish crate"] {
                    store.commit("add_todo", json!(title));
                }
            });
        })
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Store Example: Todo App ===\n");

    let store = Store::new(
        config()
            .initial_state_value(json!({ "todos": [], "filter": "all" }))
            .expect("initial state is an object"),
    );

    println!("1. Setting up subscriber");
    store.subscribe(|state| {
        let (total, active, completed) = stats(state);
        println!(
            "   [Store Update] Total: {}, Active: {}, Completed: {}",
            total, active, completed
        );
    });

    println!("\n2. Adding todos");
    store.dispatch("add_todo", json!("Learn Rust"));
    store.dispatch("add_todo", json!("Build a state container"));

    println!("\n3. Fetching more todos in the background");
    store.dispatch("fetch_todos", None);
    println!("   status while fetching: {}", store.status());
    tokio::time::sleep(Duration::from_millis(50)).await;
    println!("   status after fetch: {}", store.status());

    println!("\n4. Completing first todo");
    store.dispatch("toggle_todo", json!(0));

    println!("\n5. Current todos:");
    store.read(print_todos);

    println!("\n6. Unknown action is reported, not fatal");
    let handled = store.dispatch("archive_all", None);
    println!("   dispatched: {}", handled);

    println!("\n7. Filtering to show only active todos");
    store.commit("set_filter", json!("active"));
    store.read(print_todos);

    println!("\n8. Final statistics:");
    let (total, active, completed) = store.read(stats);
    println!("   Total: {}", total);
    println!("   Active: {}", active);
    println!("   Completed: {}", completed);

    println!("\n✓ Example complete!");
}
