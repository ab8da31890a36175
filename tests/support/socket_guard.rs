//! Gate for tests that need a localhost listener.
//!
//! Sandboxed runners sometimes forbid binding sockets. Such tests are skipped
//! with a note on stderr, unless `SESSIONCLIENT_REQUIRE_SOCKET_TESTS` is set,
//! in which case they fail.

use std::net::TcpListener;
use std::panic::Location;

use wiremock::MockServer;

const REQUIRE_ENV: &str = "SESSIONCLIENT_REQUIRE_SOCKET_TESTS";

fn strict() -> bool {
    std::env::var(REQUIRE_ENV).is_ok_and(|value| {
        matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
    })
}

/// True when the calling test should return early.
#[track_caller]
#[must_use]
pub fn should_skip_socket_bound_test() -> bool {
    let Err(error) = TcpListener::bind(("127.0.0.1", 0)) else {
        return false;
    };

    let caller = Location::caller();
    assert!(
        !strict(),
        "{}:{}: localhost bind failed ({error}) and {REQUIRE_ENV} is set",
        caller.file(),
        caller.line()
    );
    eprintln!(
        "skipping {}:{}: localhost bind failed ({error})",
        caller.file(),
        caller.line()
    );
    true
}

/// Starts a mock backend, or `None` when sockets are unavailable.
#[track_caller]
pub fn start_mock_server_or_skip() -> impl Future<Output = Option<MockServer>> {
    let skip = should_skip_socket_bound_test();
    async move {
        if skip {
            None
        } else {
            Some(MockServer::start().await)
        }
    }
}
