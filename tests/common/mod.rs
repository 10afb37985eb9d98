#![allow(dead_code)]

use axum_test::TestServer;
use std::sync::Arc;
use url_shortener::config::Config;
use url_shortener::infrastructure::persistence::InMemoryEntryRepository;
use url_shortener::routes::app_router;
use url_shortener::server::build_state;
use url_shortener::state::AppState;
use url_shortener::utils::id_generator::AlphabetKind;

pub fn test_config(alphabet: AlphabetKind) -> Config {
    Config {
        database_url: None,
        listen_addr: "127.0.0.1:0".to_string(),
        log_level: "debug".to_string(),
        log_format: "text".to_string(),
        id_alphabet: alphabet,
        id_alphabet_seed: Some(1_437_625_938),
        id_max_attempts: 5,
        db_max_connections: 1,
        db_connect_timeout: 1,
        db_idle_timeout: 60,
        db_max_lifetime: 60,
    }
}

pub fn create_test_state_with(alphabet: AlphabetKind) -> (AppState, Arc<InMemoryEntryRepository>) {
    let repo = Arc::new(InMemoryEntryRepository::new());
    let state = build_state(&test_config(alphabet), repo.clone());
    (state, repo)
}

pub fn create_test_state() -> (AppState, Arc<InMemoryEntryRepository>) {
    create_test_state_with(AlphabetKind::Base62)
}

pub fn create_test_server() -> (TestServer, Arc<InMemoryEntryRepository>) {
    let (state, repo) = create_test_state();
    let server = TestServer::new(app_router(state).unwrap()).unwrap();
    (server, repo)
}

pub fn is_base62(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())
}
