use folio_cli::{ApiClient, ContentCache};
use folio_core::PageDocument;
use folio_core::config::ClientConfig;
use httpmock::Method::{DELETE, GET, PUT};
use httpmock::MockServer;
use serde_json::json;
use std::net::TcpListener;
use std::time::Duration;

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn cache(server: &MockServer) -> ContentCache {
    let client = ApiClient::new(&ClientConfig {
        base_url: server.base_url(),
        ..ClientConfig::default()
    })
    .unwrap();
    ContentCache::new(client)
}

#[tokio::test]
async fn concurrent_reads_share_one_fetch() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    let get = server.mock(|when, then| {
        when.method(GET).path("/api/content/home");
        then.status(200)
            .delay(Duration::from_millis(200))
            .json_body(json!({"title": "Welcome"}));
    });

    let cache = cache(&server);
    let (first, second) = tokio::join!(cache.get_content("home"), cache.get_content("home"));

    assert_eq!(first, json!({"title": "Welcome"}));
    assert_eq!(first, second);
    assert!(cache.is_cached("home").await);

    cache.get_content("home").await;
    get.assert_hits(1);
}

#[tokio::test]
async fn failed_fetch_is_cached_as_empty_object() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    let get = server.mock(|when, then| {
        when.method(GET).path("/api/content/missing");
        then.status(500)
            .json_body(json!({"error": "Failed to fetch file: Not Found"}));
    });

    let cache = cache(&server);
    assert_eq!(cache.get_content("missing").await, json!({}));
    assert_eq!(cache.get_content("missing").await, json!({}));
    get.assert_hits(1);

    cache.invalidate("missing").await;
    assert!(!cache.is_cached("missing").await);
    cache.get_content("missing").await;
    get.assert_hits(2);
}

#[tokio::test]
async fn successful_write_evicts_entry() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    let get = server.mock(|when, then| {
        when.method(GET).path("/api/content/about");
        then.status(200).json_body(json!({"title": "About"}));
    });
    server.mock(|when, then| {
        when.method(PUT).path("/api/content/about");
        then.status(200)
            .json_body(json!({"success": true, "message": "Content updated successfully"}));
    });
    server.mock(|when, then| {
        when.method(DELETE).path("/api/content/about");
        then.status(200)
            .json_body(json!({"success": true, "message": "Content deleted successfully"}));
    });

    let cache = cache(&server);
    cache.get_content("about").await;
    assert!(cache.is_cached("about").await);

    cache
        .update_content("about", &json!({"title": "About us"}), None)
        .await
        .unwrap();
    assert!(!cache.is_cached("about").await);

    cache.get_content("about").await;
    cache.delete_content("about").await.unwrap();
    assert!(!cache.is_cached("about").await);
    get.assert_hits(2);
}

#[tokio::test]
async fn failed_write_keeps_entry() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/content/home");
        then.status(200).json_body(json!({"title": "Welcome"}));
    });
    server.mock(|when, then| {
        when.method(PUT).path("/api/content/home");
        then.status(500)
            .json_body(json!({"error": "Failed to update file: sha mismatch"}));
    });

    let cache = cache(&server);
    cache.get_content("home").await;

    let err = cache
        .update_content("home", &json!({"title": "X"}), None)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Failed to update file: sha mismatch"));
    assert!(cache.is_cached("home").await);
    assert_eq!(cache.get_content("home").await, json!({"title": "Welcome"}));
}

#[tokio::test]
async fn get_page_validates_schema() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/content/pricing");
        then.status(200).json_body(json!({
            "title": "Pricing",
            "metaDescription": "Plans",
            "plans": [{
                "name": "Basic",
                "price": "$20",
                "period": "month",
                "features": ["Cut"],
                "ctaText": "Book",
                "highlight": true
            }]
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/content/home");
        then.status(200).json_body(json!({"title": 42}));
    });

    let cache = cache(&server);

    match cache.get_page("pricing").await.unwrap() {
        PageDocument::Pricing(page) => {
            assert_eq!(page.plans.len(), 1);
            assert_eq!(page.plans[0].highlight, Some(true));
        }
        other => panic!("unexpected page: {other:?}"),
    }

    let err = cache.get_page("home").await.unwrap_err();
    assert!(err.to_string().starts_with("Invalid home document"));
}
