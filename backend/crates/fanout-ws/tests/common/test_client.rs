#![allow(dead_code)]

use fanout_ws::{GROUP_HEADER, USER_HEADER};

use std::time::Duration;

use axum_test::{TestServer, TestWebSocket, WsMessage};
use bytes::Bytes;

/// How long a client waits before deciding nothing is coming
const SILENCE_WINDOW: Duration = Duration::from_millis(200);

/// WebSocket test client wrapper
pub struct WsTestClient {
    ws: TestWebSocket,
    pub group: String,
    pub user: String,
}

impl WsTestClient {
    /// Connect to the relay with the given identity headers
    pub async fn connect(server: &TestServer, group: &str, user: &str) -> Self {
        let ws = server
            .get_websocket("/ws")
            .add_header(GROUP_HEADER, group.to_string())
            .add_header(USER_HEADER, user.to_string())
            .await
            .into_websocket()
            .await;

        Self {
            ws,
            group: group.to_string(),
            user: user.to_string(),
        }
    }

    /// Send text message
    pub async fn send_text(&mut self, text: impl std::fmt::Display) {
        self.ws.send_text(text).await;
    }

    /// Send binary message
    pub async fn send_binary(&mut self, data: &'static [u8]) {
        self.ws
            .send_message(WsMessage::Binary(Bytes::from_static(data)))
            .await;
    }

    /// Receive text message, failing the test if none arrives in time
    pub async fn receive_text(&mut self) -> String {
        tokio::time::timeout(Duration::from_secs(2), self.ws.receive_text())
            .await
            .unwrap_or_else(|_| panic!("{}/{} received nothing", self.group, self.user))
    }

    /// Assert that nothing arrives for a short while
    pub async fn expect_silence(&mut self) {
        let received = tokio::time::timeout(SILENCE_WINDOW, self.ws.receive_message()).await;
        assert!(
            received.is_err(),
            "{}/{} unexpectedly received {:?}",
            self.group,
            self.user,
            received
        );
    }

    /// Close the WebSocket connection
    pub async fn close(self) {
        self.ws.close().await;
    }
}

/// Connect `count` clients to the same group (helper for fan-out tests)
pub async fn connect_group(
    server: &TestServer,
    group: &str,
    user_prefix: &str,
    count: usize,
) -> Vec<WsTestClient> {
    let mut clients = Vec::with_capacity(count);
    for i in 0..count {
        let user = format!("{}-{}", user_prefix, i + 1);
        clients.push(WsTestClient::connect(server, group, &user).await);
    }
    clients
}
