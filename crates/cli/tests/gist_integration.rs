use std::io::Write;

use snipdoc::commands::gist::gists;
use snipdoc::commands::gist::utils::GistContext;
use snipdoc_api::ApiClient;
use snipdoc_output::{OutputFormat, OutputRenderer};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn context<'a>(renderer: &'a OutputRenderer, server: &MockServer) -> GistContext<'a> {
    GistContext {
        client: ApiClient::new(server.uri())
            .unwrap()
            .with_bearer_token("fake-token"),
        renderer,
    }
}

fn gist_json(id: &str, description: &str, files: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "description": description,
        "public": false,
        "updated_at": "2026-02-01T10:00:00Z",
        "files": files,
        "html_url": format!("https://gist.github.com/{id}")
    })
}

// ============================================================================
// Listing & search
// ============================================================================

#[tokio::test]
async fn test_list_gists() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gists"))
        .and(query_param("per_page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            gist_json("aaa111", "deploy notes", serde_json::json!({
                "deploy.md": {"filename": "deploy.md"}
            })),
            gist_json("bbb222", "scratch", serde_json::json!({
                "scratch.txt": {"filename": "scratch.txt"}
            }))
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let renderer = OutputRenderer::new(OutputFormat::Json);
    let ctx = context(&renderer, &server);

    gists::list_gists(&ctx, Some(2)).await.unwrap();
}

#[tokio::test]
async fn test_search_filters_client_side() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gists"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            gist_json("aaa111", "kubernetes deploy checklist", serde_json::json!({
                "deploy.md": {"filename": "deploy.md"}
            })),
            gist_json("bbb222", "unrelated", serde_json::json!({
                "scratch.txt": {"filename": "scratch.txt"}
            }))
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let renderer = OutputRenderer::new(OutputFormat::Plain);
    let ctx = context(&renderer, &server);

    gists::search_gists(&ctx, "deploy", None).await.unwrap();
}

// ============================================================================
// Read flow: truncated files fall back to the raw URL
// ============================================================================

#[tokio::test]
async fn test_read_truncated_file_fetches_raw_url() {
    let server = MockServer::start().await;

    let raw_url = format!("{}/raw/aaa111/big.log", server.uri());

    Mock::given(method("GET"))
        .and(path("/gists/aaa111"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gist_json(
            "aaa111",
            "big one",
            serde_json::json!({
                "big.log": {
                    "filename": "big.log",
                    "truncated": true,
                    "content": "inline prefix only",
                    "raw_url": raw_url
                }
            }),
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/raw/aaa111/big.log"))
        .respond_with(ResponseTemplate::new(200).set_body_string("the full untruncated content"))
        .expect(1)
        .mount(&server)
        .await;

    let renderer = OutputRenderer::new(OutputFormat::Json);
    let ctx = context(&renderer, &server);

    gists::read_gist_file(&ctx, "aaa111", Some("big.log"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_read_inline_file_skips_raw_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gists/aaa111"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gist_json(
            "aaa111",
            "small one",
            serde_json::json!({
                "note.md": {
                    "filename": "note.md",
                    "truncated": false,
                    "content": "fits inline",
                    "raw_url": format!("{}/raw/aaa111/note.md", server.uri())
                }
            }),
        )))
        .expect(1)
        .mount(&server)
        .await;

    // The raw endpoint must not be hit for non-truncated content.
    Mock::given(method("GET"))
        .and(path("/raw/aaa111/note.md"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let renderer = OutputRenderer::new(OutputFormat::Json);
    let ctx = context(&renderer, &server);

    gists::read_gist_file(&ctx, "aaa111", None).await.unwrap();
}

// ============================================================================
// Mutations
// ============================================================================

#[tokio::test]
async fn test_create_gist_from_file() {
    let server = MockServer::start().await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "#!/bin/sh\necho hi\n").unwrap();
    let name = file.path().file_name().unwrap().to_str().unwrap().to_string();

    Mock::given(method("POST"))
        .and(path("/gists"))
        .and(body_partial_json(serde_json::json!({
            "description": "tiny script",
            "public": true,
            "files": { name.clone(): { "content": "#!/bin/sh\necho hi\n" } }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": "new123",
            "html_url": "https://gist.github.com/new123"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let renderer = OutputRenderer::new(OutputFormat::Json);
    let ctx = context(&renderer, &server);

    gists::create_gist(
        &ctx,
        "tiny script",
        &[file.path().to_path_buf()],
        true,
        "gistfile1.txt",
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_update_gist_file_patches_content() {
    let server = MockServer::start().await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "updated body").unwrap();
    let name = file.path().file_name().unwrap().to_str().unwrap().to_string();

    Mock::given(method("PATCH"))
        .and(path("/gists/aaa111"))
        .and(body_partial_json(serde_json::json!({
            "files": { name: { "content": "updated body" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "aaa111"})))
        .expect(1)
        .mount(&server)
        .await;

    let renderer = OutputRenderer::new(OutputFormat::Json);
    let ctx = context(&renderer, &server);

    gists::update_gist_file(&ctx, "aaa111", file.path(), None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_rename_gist_file() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/gists/aaa111"))
        .and(body_partial_json(serde_json::json!({
            "files": { "old.md": { "filename": "new.md" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "aaa111"})))
        .expect(1)
        .mount(&server)
        .await;

    let renderer = OutputRenderer::new(OutputFormat::Json);
    let ctx = context(&renderer, &server);

    gists::rename_gist_file(&ctx, "aaa111", "old.md", "new.md")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_remove_gist_file_sends_null_entry() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/gists/aaa111"))
        .and(body_partial_json(serde_json::json!({
            "files": { "junk.txt": null }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "aaa111"})))
        .expect(1)
        .mount(&server)
        .await;

    let renderer = OutputRenderer::new(OutputFormat::Json);
    let ctx = context(&renderer, &server);

    gists::remove_gist_file(&ctx, "aaa111", "junk.txt")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_set_description() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/gists/aaa111"))
        .and(body_partial_json(serde_json::json!({
            "description": "fresh description"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "aaa111"})))
        .expect(1)
        .mount(&server)
        .await;

    let renderer = OutputRenderer::new(OutputFormat::Json);
    let ctx = context(&renderer, &server);

    gists::set_gist_description(&ctx, "aaa111", "fresh description")
        .await
        .unwrap();
}

// ============================================================================
// Deletion & errors
// ============================================================================

#[tokio::test]
async fn test_delete_without_force_makes_no_call() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/gists/aaa111"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let renderer = OutputRenderer::new(OutputFormat::Json);
    let ctx = context(&renderer, &server);

    gists::delete_gist(&ctx, "aaa111", false).await.unwrap();
}

#[tokio::test]
async fn test_delete_with_force() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/gists/aaa111"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let renderer = OutputRenderer::new(OutputFormat::Json);
    let ctx = context(&renderer, &server);

    gists::delete_gist(&ctx, "aaa111", true).await.unwrap();
}

#[tokio::test]
async fn test_missing_gist_error_names_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gists/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({"message": "Not Found"})),
        )
        .mount(&server)
        .await;

    let renderer = OutputRenderer::new(OutputFormat::Json);
    let ctx = context(&renderer, &server);

    let err = gists::get_gist(&ctx, "missing").await.unwrap_err();
    let chain = format!("{:#}", err);
    assert!(chain.contains("/gists/missing"));
    assert!(chain.contains("404"));
}
