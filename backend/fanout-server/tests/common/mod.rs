#![allow(dead_code)]

//! Test infrastructure for fanout-server end-to-end tests

use fanout_config::Config;
use fanout_server::Result as ServerResult;
use fanout_ws::ShutdownCoordinator;

use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A relay listening on an ephemeral localhost port
pub struct TestRelay {
    pub addr: SocketAddr,
    pub shutdown: ShutdownCoordinator,
    pub task: JoinHandle<ServerResult<()>>,
}

impl TestRelay {
    pub async fn start() -> Self {
        Self::start_with_config(Config::default()).await
    }

    pub async fn start_with_config(config: Config) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let shutdown = ShutdownCoordinator::new();

        let shutdown_for_server = shutdown.clone();
        let task = tokio::spawn(async move {
            fanout_server::serve(listener, &config, shutdown_for_server, None).await
        });

        Self {
            addr,
            shutdown,
            task,
        }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Poll /health until the registry holds `members` sessions
    pub async fn wait_for_members(&self, members: usize) {
        for _ in 0..50 {
            if self.members().await == members {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("registry never reached {} members", members);
    }

    pub async fn members(&self) -> usize {
        let health = self.get("/health").await;
        let body = health
            .split("\r\n\r\n")
            .nth(1)
            .expect("health response has a body");
        let json: serde_json::Value = serde_json::from_str(body).expect("health body is JSON");
        json["registry"]["members"]
            .as_u64()
            .expect("members is a number") as usize
    }

    /// Minimal HTTP/1.1 GET returning the raw response
    pub async fn get(&self, path: &str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let mut stream = TcpStream::connect(self.addr)
            .await
            .expect("Failed to connect to relay");
        let request = format!(
            "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
            path, self.addr
        );
        stream
            .write_all(request.as_bytes())
            .await
            .expect("Failed to write request");

        let mut response = String::new();
        stream
            .read_to_string(&mut response)
            .await
            .expect("Failed to read response");
        response
    }
}

/// Open a WebSocket session with the identity headers set
pub async fn connect(relay: &TestRelay, group: &str, user: &str) -> WsStream {
    let mut request = relay
        .ws_url()
        .into_client_request()
        .expect("valid request");
    let headers = request.headers_mut();
    headers.insert("GROUP", HeaderValue::from_str(group).expect("valid header"));
    headers.insert("USER", HeaderValue::from_str(user).expect("valid header"));

    let (ws, _) = connect_async(request).await.expect("Failed to connect");
    ws
}

pub async fn send_text(ws: &mut WsStream, text: &str) {
    ws.send(Message::text(text)).await.expect("Failed to send");
}

/// Next text frame, or None if the stream ends or closes first
pub async fn next_text(ws: &mut WsStream) -> Option<String> {
    let next = tokio::time::timeout(Duration::from_secs(2), async {
        while let Some(msg) = ws.next().await {
            match msg {
                Ok(Message::Text(text)) => return Some(text.as_str().to_owned()),
                Ok(Message::Close(_)) | Err(_) => return None,
                Ok(_) => continue,
            }
        }
        None
    })
    .await;

    next.expect("timed out waiting for a frame")
}

/// True if nothing arrives within a short window
pub async fn is_silent(ws: &mut WsStream) -> bool {
    tokio::time::timeout(Duration::from_millis(200), ws.next())
        .await
        .is_err()
}
