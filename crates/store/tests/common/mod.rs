#![allow(dead_code)]

use folio_store::GitHubBackend;
use httpmock::MockServer;
use std::net::TcpListener;

pub const TOKEN: &str = "ghp_test";
pub const OWNER: &str = "acme";
pub const REPO: &str = "salon-site";
pub const BRANCH: &str = "main";

pub fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

pub fn github_backend(server: &MockServer) -> GitHubBackend {
    GitHubBackend::new(&server.base_url(), OWNER, REPO, BRANCH, TOKEN).unwrap()
}

pub fn contents_path(path: &str) -> String {
    format!("/repos/{OWNER}/{REPO}/contents/{path}")
}
