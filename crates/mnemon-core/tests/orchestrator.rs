//! Turn-loop integration tests with scripted capabilities.

use mnemon_config::{MnemonConfig, SessionScope, TurnLimits};
use mnemon_core::{CoreError, Orchestrator};
use mnemon_protocol::{
    Conversation, DirectiveCall, ExtractedRecord, INSTRUCTIONS_KEY, Message, Role, ToDo,
    TodoStatus,
};
use mnemon_store::{FileStore, InMemoryStore, MemoryStore, Namespace};
use mnemon_test_utils::{
    FailingModel, FixedExtractor, FixedModel, ScriptedExtractor, ScriptedModel,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use tempfile::tempdir;

fn config_for(user_id: &str) -> MnemonConfig {
    MnemonConfig::builder()
        .session(SessionScope::new(user_id, "general"))
        .build()
}

fn build_orchestrator(
    config: MnemonConfig,
    store: Arc<dyn MemoryStore>,
    model: Arc<dyn mnemon_protocol::ModelCapability>,
    extractor: Arc<dyn mnemon_protocol::ExtractionCapability>,
) -> Orchestrator {
    Orchestrator::new(config, store, model, extractor)
}

#[tokio::test]
async fn plain_reply_ends_the_turn_with_store_untouched() {
    let store = Arc::new(InMemoryStore::new());
    let model = Arc::new(ScriptedModel::new(vec![Message::assistant("hello there")]));
    let extractor = Arc::new(FixedExtractor::new(Vec::new()));
    let orchestrator = build_orchestrator(config_for("user-1"), store.clone(), model, extractor);

    let mut conversation = Conversation::new();
    conversation.push(Message::user("hi"));
    let result = orchestrator.run_turn(&mut conversation).await.expect("turn");

    assert_eq!(result.response, "hello there");
    assert_eq!(result.dispatches, 0);
    for namespace in [
        Namespace::profile("general", "user-1"),
        Namespace::todo("general", "user-1"),
        Namespace::instructions("general", "user-1"),
    ] {
        assert_eq!(store.search(&namespace).await.expect("search"), vec![]);
    }
}

#[tokio::test]
async fn todo_directive_inserts_record_and_confirms_the_call() {
    let store = Arc::new(InMemoryStore::new());
    let model = Arc::new(ScriptedModel::new(vec![
        Message::assistant_directive("", DirectiveCall::new("call-1", "todo")),
        Message::assistant("Added buy milk to your list."),
    ]));
    let extractor = Arc::new(ScriptedExtractor::new(vec![vec![ExtractedRecord::insert(
        json!({
            "task": "buy milk",
            "deadline": "2026-08-07T09:00:00Z",
            "status": "not started"
        }),
    )]]));
    let orchestrator = build_orchestrator(config_for("user-1"), store.clone(), model, extractor);

    let mut conversation = Conversation::new();
    conversation.push(Message::user("remind me to buy milk tomorrow"));
    let result = orchestrator.run_turn(&mut conversation).await.expect("turn");

    assert_eq!(result.response, "Added buy milk to your list.");
    assert_eq!(result.dispatches, 1);

    let records = store
        .search(&Namespace::todo("general", "user-1"))
        .await
        .expect("search");
    assert_eq!(records.len(), 1);
    let todo: ToDo = serde_json::from_value(records[0].value.clone()).expect("todo");
    assert_eq!(todo.task, "buy milk");
    assert_eq!(todo.status, TodoStatus::NotStarted);
    assert!(todo.deadline.is_some());

    let confirmation = conversation
        .messages()
        .iter()
        .find(|message| message.role == Role::Tool)
        .expect("confirmation");
    assert_eq!(confirmation.tool_call_id.as_deref(), Some("call-1"));
    assert_eq!(confirmation.content, "updated todos: 1 inserted, 0 updated");
}

#[tokio::test]
async fn profile_directive_reconciles_the_profile_namespace() {
    let store = Arc::new(InMemoryStore::new());
    let model = Arc::new(ScriptedModel::new(vec![
        Message::assistant_directive("", DirectiveCall::new("call-2", "user")),
        Message::assistant("Nice to meet you, Alice."),
    ]));
    let extractor = Arc::new(ScriptedExtractor::new(vec![vec![ExtractedRecord::insert(
        json!({ "name": "Alice", "location": "Lisbon" }),
    )]]));
    let orchestrator = build_orchestrator(config_for("user-1"), store.clone(), model, extractor);

    let mut conversation = Conversation::new();
    conversation.push(Message::user("I'm Alice, based in Lisbon"));
    let result = orchestrator.run_turn(&mut conversation).await.expect("turn");

    assert_eq!(result.dispatches, 1);
    let records = store
        .search(&Namespace::profile("general", "user-1"))
        .await
        .expect("search");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].value["name"], json!("Alice"));

    let confirmation = conversation
        .messages()
        .iter()
        .find(|message| message.role == Role::Tool)
        .expect("confirmation");
    assert_eq!(confirmation.content, "updated profile");
}

#[tokio::test]
async fn correlated_update_replaces_without_growing_the_namespace() {
    let store = Arc::new(InMemoryStore::new());
    let ns = Namespace::todo("general", "user-1");
    store
        .put(&ns, "k1", json!({ "task": "buy milk" }))
        .await
        .expect("put");

    let model = Arc::new(ScriptedModel::new(vec![
        Message::assistant_directive("", DirectiveCall::new("call-1", "todo")),
        Message::assistant("Updated."),
    ]));
    let extractor = Arc::new(ScriptedExtractor::new(vec![vec![ExtractedRecord::update(
        "k1",
        json!({ "task": "buy oat milk" }),
    )]]));
    let orchestrator = build_orchestrator(config_for("user-1"), store.clone(), model, extractor);

    let mut conversation = Conversation::new();
    conversation.push(Message::user("make that oat milk"));
    orchestrator.run_turn(&mut conversation).await.expect("turn");

    let records = store.search(&ns).await.expect("search");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].key, "k1");
    assert_eq!(records[0].value, json!({ "task": "buy oat milk" }));
}

#[tokio::test]
async fn instructions_updates_overwrite_a_single_record() {
    let store = Arc::new(InMemoryStore::new());
    let extractor = Arc::new(FixedExtractor::new(Vec::new()));
    let ns = Namespace::instructions("general", "user-1");

    for text in ["always add deadlines", "deadlines plus time estimates"] {
        let model = Arc::new(ScriptedModel::new(vec![
            Message::assistant_directive("", DirectiveCall::new("call-3", "instructions")),
            Message::assistant(text),
            Message::assistant("Noted."),
        ]));
        let orchestrator = build_orchestrator(
            config_for("user-1"),
            store.clone(),
            model,
            extractor.clone(),
        );
        let mut conversation = Conversation::new();
        conversation.push(Message::user("update how you track my tasks"));
        orchestrator.run_turn(&mut conversation).await.expect("turn");
    }

    let records = store.search(&ns).await.expect("search");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].key, INSTRUCTIONS_KEY);
    assert_eq!(
        records[0].value,
        json!({ "memory": "deadlines plus time estimates" })
    );
}

#[tokio::test]
async fn unknown_directive_aborts_without_dispatching() {
    let store = Arc::new(InMemoryStore::new());
    let model = Arc::new(ScriptedModel::new(vec![Message::assistant_directive(
        "",
        DirectiveCall::new("call-9", "calendar"),
    )]));
    let extractor = Arc::new(FixedExtractor::new(vec![ExtractedRecord::insert(
        json!({ "task": "should never be written" }),
    )]));
    let orchestrator = build_orchestrator(config_for("user-1"), store.clone(), model, extractor);

    let mut conversation = Conversation::new();
    conversation.push(Message::user("hi"));
    let err = orchestrator
        .run_turn(&mut conversation)
        .await
        .expect_err("turn");

    match err {
        CoreError::UnknownDirective(value) => assert_eq!(value, "calendar"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        store
            .search(&Namespace::todo("general", "user-1"))
            .await
            .expect("search"),
        vec![]
    );
}

#[tokio::test]
async fn runaway_directives_hit_the_dispatch_limit() {
    let store = Arc::new(InMemoryStore::new());
    // A model that emits a directive on every reply never terminates the
    // loop on its own; the configured budget has to stop it.
    let model = Arc::new(FixedModel::new(Message::assistant_directive(
        "",
        DirectiveCall::new("call-1", "todo"),
    )));
    let extractor = Arc::new(FixedExtractor::new(Vec::new()));
    let config = MnemonConfig::builder()
        .session(SessionScope::new("user-1", "general"))
        .limits(TurnLimits { max_dispatches: 2 })
        .build();
    let orchestrator = build_orchestrator(config, store, model, extractor);

    let mut conversation = Conversation::new();
    conversation.push(Message::user("hi"));
    let err = orchestrator
        .run_turn(&mut conversation)
        .await
        .expect_err("turn");
    assert!(matches!(err, CoreError::DispatchLimit(2)));
}

#[tokio::test]
async fn model_failure_fails_the_turn() {
    let store = Arc::new(InMemoryStore::new());
    let model = Arc::new(FailingModel::new("provider offline"));
    let extractor = Arc::new(FixedExtractor::new(Vec::new()));
    let orchestrator = build_orchestrator(config_for("user-1"), store, model, extractor);

    let mut conversation = Conversation::new();
    conversation.push(Message::user("hi"));
    let err = orchestrator
        .run_turn(&mut conversation)
        .await
        .expect_err("turn");
    assert!(matches!(err, CoreError::Capability(_)));
    // Nothing was appended beyond the user message.
    assert_eq!(conversation.len(), 1);
}

#[tokio::test]
async fn one_turn_can_dispatch_multiple_categories() {
    let store = Arc::new(InMemoryStore::new());
    let model = Arc::new(ScriptedModel::new(vec![
        Message::assistant_directive("", DirectiveCall::new("call-1", "user")),
        Message::assistant_directive("", DirectiveCall::new("call-2", "todo")),
        Message::assistant("All noted."),
    ]));
    let extractor = Arc::new(ScriptedExtractor::new(vec![
        vec![ExtractedRecord::insert(json!({ "name": "Alice" }))],
        vec![ExtractedRecord::insert(json!({ "task": "buy milk" }))],
    ]));
    let orchestrator = build_orchestrator(config_for("user-1"), store.clone(), model, extractor);

    let mut conversation = Conversation::new();
    conversation.push(Message::user("I'm Alice; remind me to buy milk"));
    let result = orchestrator.run_turn(&mut conversation).await.expect("turn");

    assert_eq!(result.dispatches, 2);
    assert_eq!(result.response, "All noted.");
    assert_eq!(
        store
            .search(&Namespace::profile("general", "user-1"))
            .await
            .expect("search")
            .len(),
        1
    );
    assert_eq!(
        store
            .search(&Namespace::todo("general", "user-1"))
            .await
            .expect("search")
            .len(),
        1
    );
    let confirmations: Vec<&Message> = conversation
        .messages()
        .iter()
        .filter(|message| message.role == Role::Tool)
        .collect();
    assert_eq!(confirmations.len(), 2);
    assert_eq!(confirmations[0].tool_call_id.as_deref(), Some("call-1"));
    assert_eq!(confirmations[1].tool_call_id.as_deref(), Some("call-2"));
}

#[tokio::test]
async fn memory_persists_across_turns_on_a_file_store() {
    let temp = tempdir().expect("tempdir");
    let store = Arc::new(FileStore::new(temp.path()).expect("store"));
    let extractor = Arc::new(ScriptedExtractor::new(vec![vec![ExtractedRecord::insert(
        json!({ "task": "water the plants" }),
    )]]));
    let model = Arc::new(ScriptedModel::new(vec![
        Message::assistant_directive("", DirectiveCall::new("call-1", "todo")),
        Message::assistant("Saved."),
    ]));
    let orchestrator = build_orchestrator(config_for("user-1"), store, model, extractor);

    let mut conversation = Conversation::new();
    conversation.push(Message::user("remind me to water the plants"));
    orchestrator.run_turn(&mut conversation).await.expect("turn");

    // A fresh store over the same root sees the committed record.
    let reopened = FileStore::new(temp.path()).expect("store");
    let records = reopened
        .search(&Namespace::todo("general", "user-1"))
        .await
        .expect("search");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].value["task"], json!("water the plants"));
}
