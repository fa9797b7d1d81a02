use crate::{ClientError, ClientResult};

use std::panic::Location;
use std::time::Duration;

use error_location::ErrorLocation;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::{HeaderName, HeaderValue};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

/// Give up on the upgrade after this long
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(45);

const GROUP_HEADER: HeaderName = HeaderName::from_static("group");
const USER_HEADER: HeaderName = HeaderName::from_static("user");

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Build the upgrade request carrying the identity headers
pub fn build_request(server: &str, group: &str, user: &str) -> ClientResult<Request> {
    let mut request = server.into_client_request()?;

    let headers = request.headers_mut();
    headers.insert(GROUP_HEADER, header_value("group", group)?);
    headers.insert(USER_HEADER, header_value("user", user)?);

    Ok(request)
}

/// Connect to the relay as `group`/`user`
pub async fn connect(server: &str, group: &str, user: &str) -> ClientResult<WsStream> {
    let request = build_request(server, group, user)?;

    match tokio::time::timeout(HANDSHAKE_TIMEOUT, connect_async(request)).await {
        Ok(Ok((ws, _response))) => Ok(ws),
        Ok(Err(e)) => Err(e.into()),
        Err(_) => Err(ClientError::Timeout {
            seconds: HANDSHAKE_TIMEOUT.as_secs(),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}

#[track_caller]
fn header_value(name: &'static str, value: &str) -> ClientResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| ClientError::Header {
        name,
        message: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    })
}
