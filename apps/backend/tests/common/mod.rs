//! Common test utilities and fixtures for integration tests.
//!
//! Tests run against [`MemoryStore`], so no database is needed. The
//! PostgreSQL store has its own ignored tests in `db_store.rs`.

#![allow(dead_code)]

pub mod fixtures;

use axum::Router;
use axum_test::TestServer;

use pronunciation_backend::catalog::Catalog;
use pronunciation_backend::store::MemoryStore;
use pronunciation_backend::{router, AppState};

/// Test context holding the shared store and the router built over it.
pub struct TestContext {
    pub store: MemoryStore,
    app: Router,
}

impl TestContext {
    /// Context over the fixture catalog.
    pub fn new() -> Self {
        Self::with_catalog(fixtures::catalog())
    }

    pub fn with_catalog(catalog: Catalog) -> Self {
        let store = MemoryStore::new();
        let app = router(AppState::new(store.clone(), catalog));
        Self { store, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router()).unwrap()
    }
}
