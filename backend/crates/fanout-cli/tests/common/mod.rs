#![allow(dead_code)]

//! A real relay on an ephemeral port for driving the client end to end

use fanout_config::Config;
use fanout_ws::ShutdownCoordinator;

use std::net::SocketAddr;
use std::time::Duration;

use futures::StreamExt;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;

pub struct TestRelay {
    pub addr: SocketAddr,
    pub shutdown: ShutdownCoordinator,
}

impl TestRelay {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let shutdown = ShutdownCoordinator::new();

        let shutdown_for_server = shutdown.clone();
        tokio::spawn(async move {
            let config = Config::default();
            fanout_server::serve(listener, &config, shutdown_for_server, None).await
        });

        Self { addr, shutdown }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Poll /health until the registry holds `members` sessions
    pub async fn wait_for_members(&self, members: usize) {
        let needle = format!("\"members\":{}", members);
        for _ in 0..50 {
            if self.health().await.contains(&needle) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("registry never reached {} members", members);
    }

    async fn health(&self) -> String {
        let mut stream = TcpStream::connect(self.addr)
            .await
            .expect("Failed to connect to relay");
        let request = format!(
            "GET /health HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
            self.addr
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

/// Next text frame within two seconds, None if the stream ends first
pub async fn next_text(ws: &mut fanout_cli::WsStream) -> Option<String> {
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
