mod common;

use base64::{Engine as _, engine::general_purpose};
use common::{BRANCH, TOKEN, can_bind_localhost, contents_path, github_backend};
use folio_store::{BlobSha, ContentStore, ContentStoreExt, StoreError, WriteToken};
use httpmock::Method::{DELETE, GET, PUT};
use httpmock::MockServer;
use serde_json::json;

const HOME: &str = "src/assets/data/home.json";

#[tokio::test]
async fn fetch_blob_sends_headers_and_ref() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    let content = "{\n  \"title\": \"Welcome\"\n}";
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path(contents_path(HOME))
            .query_param("ref", BRANCH)
            .header("authorization", format!("token {TOKEN}"))
            .header("accept", "application/vnd.github.v3+json");
        then.status(200).json_body(json!({
            "content": general_purpose::STANDARD.encode(content),
            "sha": "abc123",
            "encoding": "base64"
        }));
    });

    let store = github_backend(&server);
    let blob = store.fetch_blob(HOME).await.unwrap();

    mock.assert();
    assert_eq!(blob.sha, BlobSha::new("abc123"));
    assert_eq!(blob.json().unwrap(), json!({"title": "Welcome"}));
}

#[tokio::test]
async fn fetch_reports_status_text_on_failure() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(contents_path("src/assets/data/missing.json"));
        then.status(404)
            .json_body(json!({"message": "Not Found", "documentation_url": "https://docs"}));
    });
    server.mock(|when, then| {
        when.method(GET).path(contents_path("src/assets/data/locked.json"));
        then.status(403).json_body(json!({"message": "Resource not accessible"}));
    });

    let store = github_backend(&server);

    let err = store
        .fetch_blob("src/assets/data/missing.json")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.reason(), "Not Found");

    let err = store
        .fetch_blob("src/assets/data/locked.json")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Rejected { status: 403, .. }));
    assert_eq!(err.reason(), "Forbidden");
}

#[tokio::test]
async fn update_sends_current_sha_and_branch() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    let lookup = server.mock(|when, then| {
        when.method(GET).path(contents_path(HOME));
        then.status(200).json_body(json!({
            "content": general_purpose::STANDARD.encode("{}"),
            "sha": "abc123"
        }));
    });
    let new_content = b"{\n  \"title\": \"New\"\n}";
    let put = server.mock(|when, then| {
        when.method(PUT)
            .path(contents_path(HOME))
            .header("authorization", format!("token {TOKEN}"))
            .json_body(json!({
                "message": "Update home.json via Admin Dashboard",
                "content": general_purpose::STANDARD.encode(new_content),
                "sha": "abc123",
                "branch": BRANCH
            }));
        then.status(200)
            .json_body(json!({"content": {"sha": "def456"}, "commit": {"sha": "c0ffee"}}));
    });

    let store = github_backend(&server);
    let revision = store.begin_update(HOME).await.unwrap();
    let sha = store
        .commit_write(
            revision.into(),
            new_content,
            "Update home.json via Admin Dashboard",
        )
        .await
        .unwrap();

    lookup.assert();
    put.assert();
    assert_eq!(sha.as_str(), "def456");
}

#[tokio::test]
async fn create_omits_sha() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    let path = "src/assets/data/faq.json";
    server.mock(|when, then| {
        when.method(GET).path(contents_path(path));
        then.status(404).json_body(json!({"message": "Not Found"}));
    });
    let put = server.mock(|when, then| {
        when.method(PUT)
            .path(contents_path(path))
            .matches(|req| {
                let Some(body) = req.body.as_ref() else {
                    return false;
                };
                serde_json::from_slice::<serde_json::Value>(body)
                    .map(|value| value.get("sha").is_none())
                    .unwrap_or(false)
            });
        then.status(201).json_body(json!({"content": {"sha": "fff000"}}));
    });

    let store = github_backend(&server);
    let token = store.begin_create(path).await.unwrap();
    assert_eq!(
        token,
        WriteToken::Create {
            path: path.to_string()
        }
    );

    let sha = store
        .commit_write(token, b"{\"q\": []}", "Create faq.json via Admin Dashboard")
        .await
        .unwrap();
    put.assert();
    assert_eq!(sha.as_str(), "fff000");
}

#[tokio::test]
async fn create_refuses_existing_blob_without_writing() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(contents_path(HOME));
        then.status(200)
            .json_body(json!({"content": "", "sha": "abc123"}));
    });
    let put = server.mock(|when, then| {
        when.method(PUT).path(contents_path(HOME));
        then.status(201).json_body(json!({"content": {"sha": "x"}}));
    });

    let store = github_backend(&server);
    let err = store.begin_create(HOME).await.unwrap_err();

    assert!(matches!(err, StoreError::AlreadyExists(_)));
    assert_eq!(err.reason(), "File already exists");
    put.assert_hits(0);
}

#[tokio::test]
async fn create_treats_failed_lookup_as_absent() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(contents_path(HOME));
        then.status(500);
    });

    let store = github_backend(&server);
    let token = store.begin_create(HOME).await.unwrap();
    assert_eq!(token.expected_sha(), None);
}

#[tokio::test]
async fn write_failure_prefers_body_message() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(PUT).path(contents_path(HOME));
        then.status(409)
            .json_body(json!({"message": "home.json does not match abc123"}));
    });
    server.mock(|when, then| {
        when.method(DELETE).path(contents_path(HOME));
        then.status(502).body("bad gateway");
    });

    let store = github_backend(&server);

    let err = store
        .put_blob(HOME, b"{}", Some(&BlobSha::new("abc123")), "m")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict { status: 409, .. }));
    assert_eq!(err.reason(), "home.json does not match abc123");

    let err = store
        .delete_blob(HOME, &BlobSha::new("abc123"), "m")
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.reason(), "Bad Gateway");
}

#[tokio::test]
async fn delete_sends_sha_message_and_branch() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    let path = "src/assets/data/old.json";
    server.mock(|when, then| {
        when.method(GET).path(contents_path(path));
        then.status(200)
            .json_body(json!({"content": "e30=", "sha": "d1e2"}));
    });
    let delete = server.mock(|when, then| {
        when.method(DELETE).path(contents_path(path)).json_body(json!({
            "message": "Delete old.json via Admin Dashboard",
            "sha": "d1e2",
            "branch": BRANCH
        }));
        then.status(200).json_body(json!({"content": null}));
    });

    let store = github_backend(&server);
    let revision = store.begin_update(path).await.unwrap();
    store
        .commit_delete(revision, "Delete old.json via Admin Dashboard")
        .await
        .unwrap();
    delete.assert();
}
