//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{body::Bytes, extract::State, http::StatusCode, routing::post, Router};
use rippled_passthrough::config::{Engine, PassthroughConfig};
use rippled_passthrough::{HttpServer, Shutdown};
use serde_json::Value;
use tokio::net::TcpListener;

/// A fake rippled that records every JSON-RPC call it receives.
#[derive(Clone)]
pub struct MockRippled {
    pub addr: SocketAddr,
    calls: Arc<Mutex<Vec<Value>>>,
}

impl MockRippled {
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn calls(&self) -> Vec<Value> {
        self.calls.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct MockState {
    calls: Arc<Mutex<Vec<Value>>>,
    status: u16,
    body: &'static str,
}

async fn record_call(State(state): State<MockState>, body: Bytes) -> (StatusCode, String) {
    if let Ok(call) = serde_json::from_slice::<Value>(&body) {
        state.calls.lock().unwrap().push(call);
    }
    (StatusCode::from_u16(state.status).unwrap(), state.body.to_string())
}

/// Start a mock rippled answering every call with `status` and `body` verbatim.
pub async fn start_mock_rippled(status: u16, body: &'static str) -> MockRippled {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let calls = Arc::new(Mutex::new(Vec::new()));

    let app = Router::new().route("/", post(record_call)).with_state(MockState {
        calls: calls.clone(),
        status,
        body,
    });

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockRippled { addr, calls }
}

async fn record_and_hang(State(state): State<MockState>, body: Bytes) -> (StatusCode, String) {
    if let Ok(call) = serde_json::from_slice::<Value>(&body) {
        state.calls.lock().unwrap().push(call);
    }
    tokio::time::sleep(Duration::from_secs(60)).await;
    (StatusCode::OK, state.body.to_string())
}

/// Start a mock rippled that accepts calls but does not answer for a minute.
pub async fn start_hanging_rippled() -> MockRippled {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let calls = Arc::new(Mutex::new(Vec::new()));

    let app = Router::new().route("/", post(record_and_hang)).with_state(MockState {
        calls: calls.clone(),
        status: 200,
        body: r#"{"result":{}}"#,
    });

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockRippled { addr, calls }
}

/// An address nothing listens on.
pub async fn dead_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Config pointing at `upstream`, isolated from the real environment.
pub fn test_config(engine: Engine, upstream: &str) -> PassthroughConfig {
    let mut config = PassthroughConfig::default();
    config.server.bind_address = "127.0.0.1:0".to_string();
    config.server.engine = engine;
    config.upstream.url = Some(upstream.to_string());
    config.upstream.env_var = "RIPPLED_PASSTHROUGH_TEST_UNSET_URL".to_string();
    config.upstream.use_system_proxy = false;
    config.timeouts.upstream_secs = 5;
    config
}

/// A running passthrough; shuts down when dropped.
pub struct RunningPassthrough {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl RunningPassthrough {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for RunningPassthrough {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_passthrough(config: PassthroughConfig) -> RunningPassthrough {
    let listener = TcpListener::bind(&config.server.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    let server = HttpServer::new(config).unwrap();

    tokio::spawn(async move {
        let _ = server.run(listener, receiver).await;
    });

    // Let the accept loop start.
    tokio::time::sleep(Duration::from_millis(50)).await;

    RunningPassthrough { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
