use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use cmdtree::{instrument, Client, CommandError, CommandFrame, ExecutionContext};

/// Client with the command set the scenarios below exercise. `custom` invokes
/// `title` and `press` while it is still running, the way a user-defined
/// composite command would.
fn sample_client() -> Client {
    let client = Client::new();

    client
        .add_command(
            "open",
            Client::handler(|_client, args| async move {
                Ok(args.into_iter().next().unwrap_or(Value::Null))
            }),
            false,
        )
        .expect("register open");

    client
        .add_command(
            "click",
            Client::handler(|_client, _args| async move {
                tokio::time::sleep(Duration::from_millis(2)).await;
                Ok(Value::Bool(true))
            }),
            false,
        )
        .expect("register click");

    client
        .add_command(
            "title",
            Client::handler(|_client, _args| async move { Ok(json!("Example Domain")) }),
            false,
        )
        .expect("register title");

    client
        .add_command(
            "press",
            Client::handler(|_client, _args| async move {
                tokio::time::sleep(Duration::from_millis(2)).await;
                Ok(Value::Null)
            }),
            false,
        )
        .expect("register press");

    client
        .add_command(
            "custom",
            Client::handler(|client: Client, _args| async move {
                let title = client.run("title", vec![]).await?;
                client.run("press", vec![json!("Enter")]).await?;
                Ok(title)
            }),
            false,
        )
        .expect("register custom");

    client
        .add_command(
            "failing",
            Client::handler(|_client, _args| async move {
                Err(CommandError::client("element not found"))
            }),
            false,
        )
        .expect("register failing");

    client
}

fn traced(client: &Client) -> Arc<ExecutionContext> {
    let ctx = Arc::new(ExecutionContext::with_tracing());
    client.set_execution_context(Some(Arc::clone(&ctx)));
    ctx
}

fn names(frame: &CommandFrame) -> Vec<&str> {
    frame.children.iter().map(|f| f.name.as_str()).collect()
}

#[tokio::test]
async fn tracing_disabled_leaves_results_and_context_untouched() {
    let client = sample_client();
    instrument(&client);

    let ctx = Arc::new(ExecutionContext::new());
    client.set_execution_context(Some(Arc::clone(&ctx)));

    let opened = client
        .run("open", vec![json!("https://example.com")])
        .await
        .expect("open succeeds");
    let clicked = client.run("click", vec![]).await.expect("click succeeds");

    assert_eq!(opened, json!("https://example.com"));
    assert_eq!(clicked, Value::Bool(true));
    assert!(ctx.command_log().is_none());
}

#[tokio::test]
async fn sequential_commands_record_flat_root_children() {
    let client = sample_client();
    instrument(&client);
    let ctx = traced(&client);

    client
        .run("open", vec![json!("https://example.com")])
        .await
        .expect("open succeeds");
    client.run("click", vec![]).await.expect("click succeeds");

    let tree = ctx.command_log().expect("tree recorded");
    assert!(tree.is_root());
    assert_eq!(names(&tree), vec!["open", "click"]);
    for frame in &tree.children {
        assert!(frame.children.is_empty());
        assert!(frame.start_ms.is_some());
        assert!(frame.duration_ms.is_some());
    }
}

#[tokio::test]
async fn composite_command_records_nested_frames() {
    let client = sample_client();
    instrument(&client);
    let ctx = traced(&client);

    let title = client.run("custom", vec![]).await.expect("custom succeeds");
    assert_eq!(title, json!("Example Domain"));

    let tree = ctx.command_log().expect("tree recorded");
    assert_eq!(names(&tree), vec!["custom"]);

    let custom = &tree.children[0];
    assert_eq!(names(custom), vec!["title", "press"]);

    // Children settle before the parent, so the parent's duration covers them.
    let parent = custom.duration_ms.expect("custom finalized");
    for child in &custom.children {
        let child_d = child.duration_ms.expect("child finalized");
        assert!(parent >= child_d, "parent {}ms < child {}ms", parent, child_d);
    }
}

#[tokio::test]
async fn double_instrumentation_records_single_frames() {
    let client = sample_client();
    instrument(&client);
    instrument(&client);
    let ctx = traced(&client);

    client.run("click", vec![]).await.expect("click succeeds");

    let tree = ctx.command_log().expect("tree recorded");
    assert_eq!(names(&tree), vec!["click"]);
    assert!(tree.children[0].children.is_empty());
}

#[tokio::test]
async fn failing_command_propagates_error_and_finalizes_frame() {
    let client = sample_client();
    instrument(&client);
    let ctx = traced(&client);

    let err = client.run("failing", vec![]).await.unwrap_err();
    assert!(matches!(err, CommandError::Client(msg) if msg == "element not found"));

    let tree = ctx.command_log().expect("tree recorded");
    assert_eq!(names(&tree), vec!["failing"]);
    assert!(tree.children[0].duration_ms.is_some());
}

#[tokio::test]
async fn context_swap_separates_trees_between_tests() {
    let client = sample_client();
    instrument(&client);

    let first = traced(&client);
    client.run("open", vec![]).await.expect("open succeeds");

    let second = traced(&client);
    client.run("click", vec![]).await.expect("click succeeds");

    let first_tree = first.command_log().expect("first tree");
    let second_tree = second.command_log().expect("second tree");
    assert_eq!(names(&first_tree), vec!["open"]);
    assert_eq!(names(&second_tree), vec!["click"]);
}

#[tokio::test]
async fn recorded_tree_serializes_in_report_shape() {
    let client = sample_client();
    instrument(&client);
    let ctx = traced(&client);

    client.run("custom", vec![]).await.expect("custom succeeds");

    let tree = ctx.command_log().expect("tree recorded");
    let json = serde_json::to_string(&tree).expect("serialize tree");

    assert!(json.starts_with("{\"cn\":\"root\",\"cl\":["));
    assert!(json.contains("\"cn\":\"custom\""));
    assert!(json.contains("\"cn\":\"title\""));
    assert!(json.contains("\"cn\":\"press\""));
    assert!(json.contains("\"ts\":"));
    assert!(json.contains("\"d\":"));
}

#[tokio::test]
async fn instrumented_commands_pass_arguments_through() {
    let client = sample_client();
    instrument(&client);
    let _ctx = traced(&client);

    let result = client
        .run("open", vec![json!("https://example.com/page")])
        .await
        .expect("open succeeds");

    assert_eq!(result, json!("https://example.com/page"));
}
