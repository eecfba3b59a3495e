//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use tennet_client::{ClientConfig, TennetClient};
use tokio::runtime::Runtime;
use wiremock::MockServer;

/// Load fixture file content.
pub fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A mock TenneT server.
///
/// The blocking client must not run inside an async context, so the mock
/// server lives on its own runtime and tests drive it with `block_on`.
pub struct MockTennet {
    pub server: MockServer,
    pub runtime: Runtime,
}

impl MockTennet {
    pub fn start() -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("Failed to build runtime");
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    pub fn mount(&self, mock: wiremock::Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    /// Client pointed at this server for both URL families.
    pub fn client(&self) -> TennetClient {
        let config = ClientConfig::default()
            .with_xml_base_url(format!("{}/xml", self.server.uri()))
            .with_export_url(format!("{}/export_data.aspx", self.server.uri()));
        TennetClient::with_config(config).expect("Failed to build client")
    }

    /// Paths and query strings of all received requests, in arrival order.
    pub fn requested(&self) -> Vec<String> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
            .iter()
            .map(|r| match r.url.query() {
                Some(q) => format!("{}?{}", r.url.path(), q),
                None => r.url.path().to_string(),
            })
            .collect()
    }
}
