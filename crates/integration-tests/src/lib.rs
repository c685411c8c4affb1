//! Integration tests for Emporium.
//!
//! Tests drive the REST client, resolvers and update controllers against a
//! `mockito` server standing in for the catalogue backend.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p emporium-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `rest_client` - request shapes and response handling of `RestClient`
//! - `resolver` - navigation identifier resolution over HTTP
//! - `update_controller` - activation, option lists and save over HTTP

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::{Arc, Mutex};

use emporium_admin::api::RestClient;
use emporium_admin::config::ApiConfig;
use emporium_admin::resolve::Navigator;
use mockito::{Mock, Server, ServerGuard};
use serde::Serialize;

pub struct TestSetup {
    pub server: ServerGuard,
    pub client: Arc<RestClient>,
}

/// Start a mock backend and a client pointed at it.
pub async fn test_setup() -> TestSetup {
    let server = Server::new_async().await;
    let config = ApiConfig::new(&server.url()).unwrap();
    let client = Arc::new(RestClient::new(&config).unwrap());

    TestSetup { server, client }
}

/// Mock `GET {url}` returning `body` as JSON.
pub async fn mock_get_json<T: Serialize>(
    server: &mut ServerGuard,
    url: &str,
    body: &T,
    expected_requests: usize,
) -> Mock {
    server
        .mock("GET", url)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(serde_json::to_string(body).unwrap())
        .expect(expected_requests)
        .create_async()
        .await
}

/// Navigator recording every navigation in order.
#[derive(Default)]
pub struct RecordingNavigator {
    events: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn back(&self) {
        self.events.lock().unwrap().push("back".to_string());
    }

    fn navigate(&self, route: &str) {
        self.events.lock().unwrap().push(route.to_string());
    }
}
