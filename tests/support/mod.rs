use serde_json::Value;
use std::time::Duration;
use tokio::net::TcpListener;

use sse_bridge::{config::Config, create_app, AppState};

/// A bridge bound to an ephemeral local port.
pub struct TestServer {
    pub base_url: String,
    pub state: AppState,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn spawn() -> Self {
        // A short keep-alive makes the server notice closed peers quickly
        let config = Config {
            keep_alive: Some(Duration::from_millis(50)),
            ..Config::default()
        };
        let state = AppState::new(config);
        let app = create_app(state.clone()).expect("router should build");

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test listener");
        let address = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server failed");
        });

        Self {
            base_url: format!("http://{}", address),
            state,
            client: reqwest::Client::new(),
        }
    }

    /// Open an event stream on its own client and consume the bootstrap frame.
    /// Returns the advertised dispatch path and the reader for later frames.
    pub async fn open_stream(&self) -> (String, EventReader) {
        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/sse", self.base_url))
            .send()
            .await
            .expect("failed to open event stream");
        assert_eq!(response.status(), 200);
        assert_eq!(
            response.headers()["content-type"].to_str().unwrap(),
            "text/event-stream"
        );

        let mut reader = EventReader {
            response,
            buffer: String::new(),
            _client: client,
        };

        let bootstrap = reader
            .next_data(Duration::from_secs(5))
            .await
            .expect("stream should start with the endpoint event");
        let bootstrap: Value = serde_json::from_str(&bootstrap).expect("bootstrap frame is JSON");
        assert_eq!(bootstrap["event"], "endpoint");

        let endpoint = bootstrap["data"]
            .as_str()
            .expect("endpoint data is a string")
            .to_string();
        (endpoint, reader)
    }

    pub async fn post(&self, path: &str, body: &'static str) -> (u16, Value) {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .body(body)
            .send()
            .await
            .expect("dispatch request failed");

        let status = response.status().as_u16();
        let body = response.json::<Value>().await.expect("response body is JSON");
        (status, body)
    }
}

/// Reads `data:` frames off an event stream, skipping keep-alive comments.
pub struct EventReader {
    response: reqwest::Response,
    buffer: String,
    _client: reqwest::Client,
}

impl EventReader {
    pub async fn next_data(&mut self, wait: Duration) -> Option<String> {
        tokio::time::timeout(wait, self.read_frame()).await.ok().flatten()
    }

    async fn read_frame(&mut self) -> Option<String> {
        loop {
            if let Some(end) = self.buffer.find("\n\n") {
                let frame: String = self.buffer.drain(..end + 2).collect();
                let data: Vec<&str> = frame
                    .lines()
                    .filter_map(|line| line.strip_prefix("data:"))
                    .map(|value| value.strip_prefix(' ').unwrap_or(value))
                    .collect();

                if data.is_empty() {
                    continue;
                }
                return Some(data.join("\n"));
            }

            let chunk = self.response.chunk().await.ok()??;
            self.buffer.push_str(&String::from_utf8_lossy(&chunk));
        }
    }
}
