//! Loopback availability check for wiremock-backed tests.
//!
//! Sandboxed CI runners sometimes forbid binding sockets. Tests that need a
//! mock API call [`start_mock_server_or_skip`] and return early on `None`;
//! setting `FOLLOWGRAPH_REQUIRE_SOCKET_TESTS=1` turns the skip into a failure.

use std::net::TcpListener;
use std::panic::Location;

use wiremock::MockServer;

const REQUIRE_ENV: &str = "FOLLOWGRAPH_REQUIRE_SOCKET_TESTS";

fn flag_enabled(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[must_use]
pub fn socket_tests_required() -> bool {
    std::env::var(REQUIRE_ENV).is_ok_and(|value| flag_enabled(&value))
}

fn loopback_available() -> bool {
    TcpListener::bind(("127.0.0.1", 0)).is_ok()
}

/// Starts a mock API server, or returns `None` when loopback sockets are unavailable.
#[track_caller]
pub fn start_mock_server_or_skip() -> impl std::future::Future<Output = Option<MockServer>> {
    let caller = Location::caller();
    let available = loopback_available();
    if !available {
        let message = format!(
            "[mock-api] {}:{} needs a loopback socket and none could be bound",
            caller.file(),
            caller.line()
        );
        assert!(
            !socket_tests_required(),
            "{message}; unset {REQUIRE_ENV} to skip instead"
        );
        eprintln!("{message}; skipping (set {REQUIRE_ENV}=1 to fail instead)");
    }
    async move {
        if available {
            Some(MockServer::start().await)
        } else {
            None
        }
    }
}
