mod common;

use baklib_mcp::errors::{ToolError, ToolErrorKind};
use baklib_mcp::services::logger::Logger;
use baklib_mcp::services::tool_executor::ToolExecutor;
use common::RecordingTransport;
use serde_json::{json, Value};
use std::sync::Arc;

fn executor_with(transport: Arc<RecordingTransport>) -> ToolExecutor {
    ToolExecutor::new(Logger::new("test"), transport)
}

#[tokio::test]
async fn unknown_tool_fails_without_network() {
    let transport = Arc::new(RecordingTransport::returning(json!({"data": []})));
    let executor = executor_with(transport.clone());

    let err = executor
        .execute("nonexistent_tool", json!({}))
        .await
        .unwrap_err();

    assert!(err.message.contains("Unknown tool: nonexistent_tool"));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn unknown_tool_close_to_a_real_one_gets_a_suggestion() {
    let transport = Arc::new(RecordingTransport::returning(json!({"data": []})));
    let executor = executor_with(transport.clone());

    let err = executor
        .execute("dam_uplaod_entity", json!({"file_path": "x"}))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ToolErrorKind::NotFound);
    assert!(err.hint.as_deref().unwrap_or("").contains("dam_upload_entity"));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn missing_required_argument_fails_before_network() {
    let transport = Arc::new(RecordingTransport::returning(json!({"data": {}})));
    let executor = executor_with(transport.clone());

    let err = executor
        .execute("kb_create_article", json!({"title": "T"}))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ToolErrorKind::InvalidParams);
    assert!(err.message.contains("space_id"));
    assert_eq!(transport.call_count(), 0);

    let err = executor.execute("dam_get_entity", json!({})).await.unwrap_err();
    assert!(err.message.contains("id"));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn pagination_arguments_round_trip_to_bracketed_keys() {
    let transport = Arc::new(RecordingTransport::returning(json!({"data": []})));
    let executor = executor_with(transport.clone());

    executor
        .execute("dam_list_entities", json!({"page": 2, "per_page": 25}))
        .await
        .expect("list call");

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].path, "/dam/entities");
    assert_eq!(calls[0].method, "GET");
    assert_eq!(
        calls[0].query,
        vec![
            ("page[number]".to_string(), "2".to_string()),
            ("page[size]".to_string(), "25".to_string()),
        ]
    );
}

#[tokio::test]
async fn kb_create_article_sends_only_supplied_attributes() {
    let transport = Arc::new(RecordingTransport::returning(
        json!({"data": {"id": "a1", "attributes": {"title": "T"}}}),
    ));
    let executor = executor_with(transport.clone());

    let result = executor
        .execute("kb_create_article", json!({"space_id": "s1", "title": "T"}))
        .await
        .expect("create call");

    let calls = transport.calls();
    assert_eq!(calls[0].path, "/kb/spaces/s1/articles");
    assert_eq!(calls[0].method, "POST");
    assert_eq!(
        calls[0].json_body,
        Some(json!({"data": {"attributes": {"title": "T"}}}))
    );
    assert_eq!(result["success"], json!(true));
    assert_eq!(result["data"]["id"], json!("a1"));
}

#[tokio::test]
async fn kb_create_article_coerces_position_to_string() {
    let transport = Arc::new(RecordingTransport::returning(json!({"data": {}})));
    let executor = executor_with(transport.clone());

    executor
        .execute(
            "kb_create_article",
            json!({"space_id": "s1", "title": "T", "position": "7", "parent_id": "p2"}),
        )
        .await
        .expect("create call");

    let body = transport.calls()[0].json_body.clone().unwrap();
    assert_eq!(
        body["data"]["attributes"],
        json!({"title": "T", "position": "7", "parent_id": "p2"})
    );
}

#[tokio::test]
async fn site_update_page_passes_full_path_as_query() {
    let transport = Arc::new(RecordingTransport::returning(json!({"data": {}})));
    let executor = executor_with(transport.clone());

    executor
        .execute(
            "site_update_page",
            json!({
                "site_id": "s1",
                "page_id": "p1",
                "published": true,
                "full_path": "docs/intro"
            }),
        )
        .await
        .expect("update call");

    let calls = transport.calls();
    assert_eq!(calls[0].path, "/sites/s1/pages/p1");
    assert_eq!(calls[0].method, "PATCH");
    assert_eq!(
        calls[0].query,
        vec![("full_path".to_string(), "docs/intro".to_string())]
    );
    assert_eq!(
        calls[0].json_body,
        Some(json!({"data": {"attributes": {"published": true}}}))
    );
}

#[tokio::test]
async fn delete_returns_bare_success() {
    let transport = Arc::new(RecordingTransport::returning(json!({"success": true})));
    let executor = executor_with(transport.clone());

    let result = executor
        .execute("dam_delete_entity", json!({"id": "f1"}))
        .await
        .expect("delete call");

    assert_eq!(result, json!({"success": true}));
    assert_eq!(transport.calls()[0].method, "DELETE");
    assert_eq!(transport.calls()[0].path, "/dam/entities/f1");
}

#[tokio::test]
async fn list_decoding_defaults_missing_data_to_empty_array() {
    let transport = Arc::new(RecordingTransport::returning(json!({})));
    let executor = executor_with(transport.clone());

    let result = executor
        .execute("kb_list_knowledge_bases", json!({}))
        .await
        .expect("list call");

    assert_eq!(result["data"], json!([]));
    assert_eq!(result["success"], json!(true));
}

#[tokio::test]
async fn single_entity_null_data_is_passed_through() {
    let transport = Arc::new(RecordingTransport::returning(json!({"data": null})));
    let executor = executor_with(transport.clone());

    let result = executor
        .execute("site_get_site", json!({"site_id": "s1"}))
        .await
        .expect("get call");

    assert_eq!(result["data"], Value::Null);
    assert_eq!(result["full_response"], json!({"data": null}));
}

#[tokio::test]
async fn remote_errors_keep_status_and_body_text() {
    let transport = Arc::new(RecordingTransport::failing(ToolError::remote(
        422,
        r#"{"errors":"bad"}"#,
    )));
    let executor = executor_with(transport.clone());

    let err = executor
        .execute("theme_list_themes", json!({}))
        .await
        .unwrap_err();

    assert!(err.message.contains("422"));
    assert!(err.message.contains("bad"));
}

#[tokio::test]
async fn upload_round_trip_against_a_mock_gateway() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = dir.path().join("notes.md");
    std::fs::write(&source, b"# notes\n").expect("write fixture");

    let transport = Arc::new(RecordingTransport::returning(
        json!({"data": {"id": "f1", "attributes": {"url": "https://x/f1"}}}),
    ));
    let executor = executor_with(transport.clone());

    let result = executor
        .execute(
            "dam_upload_entity",
            json!({"file_path": source.to_string_lossy()}),
        )
        .await
        .expect("upload call");

    assert_eq!(result["success"], json!(true));
    assert_eq!(result["id"], json!("f1"));
    assert_eq!(result["name"], json!("notes.md"));
    assert_eq!(result["type"], json!("file"));
    assert_eq!(result["mime_type"], json!("text/markdown"));
    assert_eq!(result["url"], json!("https://x/f1"));
    assert_eq!(result["size"], json!(8));

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].path, "/dam/files");
    assert_eq!(calls[0].method, "POST");
    let upload = calls[0].multipart.clone().expect("multipart payload");
    assert_eq!(upload.type_name, "dam_files");
    assert_eq!(upload.file_name, "notes.md");
    assert_eq!(upload.content_type, "text/markdown");
    assert_eq!(upload.size, 8);
}

#[tokio::test]
async fn upload_honors_name_override_for_media_type() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = dir.path().join("raw.bin");
    std::fs::write(&source, b"\x00\x01").expect("write fixture");

    let transport = Arc::new(RecordingTransport::returning(json!({"data": {"id": "f2"}})));
    let executor = executor_with(transport.clone());

    let result = executor
        .execute(
            "dam_upload_entity",
            json!({
                "file_path": source.to_string_lossy(),
                "name": "scan.png",
                "type": "image"
            }),
        )
        .await
        .expect("upload call");

    assert_eq!(result["name"], json!("scan.png"));
    assert_eq!(result["mime_type"], json!("image/png"));
    assert_eq!(result["type"], json!("image"));
    assert!(result.get("url").is_none());
}

#[tokio::test]
async fn upload_of_missing_file_fails_with_resolved_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = dir.path().join("absent.txt");

    let transport = Arc::new(RecordingTransport::returning(json!({})));
    let executor = executor_with(transport.clone());

    let err = executor
        .execute(
            "dam_upload_entity",
            json!({"file_path": source.to_string_lossy()}),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind, ToolErrorKind::Io);
    assert!(err.message.contains("File not found"));
    assert!(err.message.contains("absent.txt"));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn upload_of_a_directory_fails_before_network() {
    let dir = tempfile::tempdir().expect("tempdir");

    let transport = Arc::new(RecordingTransport::returning(json!({})));
    let executor = executor_with(transport.clone());

    let err = executor
        .execute(
            "dam_upload_entity",
            json!({"file_path": dir.path().to_string_lossy()}),
        )
        .await
        .unwrap_err();

    assert!(err.message.contains("Path is not a file"));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn upload_rejects_invalid_resource_type_before_io() {
    let transport = Arc::new(RecordingTransport::returning(json!({})));
    let executor = executor_with(transport.clone());

    let err = executor
        .execute(
            "dam_upload_entity",
            json!({"file_path": "whatever.md", "type": "archive"}),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind, ToolErrorKind::InvalidParams);
    assert_eq!(transport.call_count(), 0);
}
