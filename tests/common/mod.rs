#![allow(dead_code)]

use httpmock::{
    Method::{DELETE, POST},
    Mock, MockServer,
};
use std::{fs, path::Path};
use url::Url;

use bbgdata_rs::BbgClient;

pub const SESSION: &str = "s1";

pub fn setup_server() -> MockServer {
    MockServer::start()
}

pub fn fixture(endpoint: &str, tag: &str, ext: &str) -> String {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let filename = format!("{}_{}.{}", endpoint, tag, ext);
    let path = dir.join(&filename);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {}", path.display(), e))
}

pub fn client_for(server: &MockServer) -> BbgClient {
    BbgClient::builder()
        .gateway(Url::parse(&format!("{}/gw/", server.base_url())).unwrap())
        .build()
        .unwrap()
}

pub fn mock_start(server: &'_ MockServer) -> Mock<'_> {
    server.mock(|when, then| {
        when.method(POST)
            .path("/gw/sessions")
            .body_includes("\"serverPort\":8194");
        then.status(200)
            .header("content-type", "application/json")
            .body(fixture("session_start", "gateway", "json"));
    })
}

pub fn mock_open(server: &'_ MockServer) -> Mock<'_> {
    server.mock(|when, then| {
        when.method(POST)
            .path(format!("/gw/sessions/{SESSION}/services"))
            .body_includes("//blp/refdata");
        then.status(200)
            .header("content-type", "application/json")
            .body(fixture("open_service", "gateway", "json"));
    })
}

pub fn mock_stop(server: &'_ MockServer) -> Mock<'_> {
    server.mock(|when, then| {
        when.method(DELETE).path(format!("/gw/sessions/{SESSION}"));
        then.status(200)
            .header("content-type", "application/json")
            .body(fixture("session_stop", "gateway", "json"));
    })
}

/// Start, open and stop mocks for one well-behaved session.
pub fn mock_session(server: &'_ MockServer) -> (Mock<'_>, Mock<'_>, Mock<'_>) {
    (mock_start(server), mock_open(server), mock_stop(server))
}

/// Answers every request whose body mentions `operation` with the recorded fixture.
pub fn mock_request<'a>(server: &'a MockServer, operation: &str) -> Mock<'a> {
    let body = fixture("request", operation, "json");
    server.mock(|when, then| {
        when.method(POST)
            .path(format!("/gw/sessions/{SESSION}/requests"))
            .body_includes(format!("\"operation\":\"{operation}\""));
        then.status(200)
            .header("content-type", "application/json")
            .body(body);
    })
}
