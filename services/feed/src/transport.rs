//! Transport abstraction and the production WebSocket implementation
//!
//! The lifecycle manager talks to the network only through [`FeedTransport`]
//! and [`FeedConnection`], which keeps it testable against scripted
//! transports. The production implementation performs the hub negotiation
//! over HTTP and the streaming connection over a WebSocket upgrade.

use crate::{FeedConfig, FeedError, Result};
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::{ACCEPT_ENCODING, COOKIE, USER_AGENT};
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use url::Url;

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Outcome of a successful negotiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiatedSession {
    /// The connection token to present on the transport connect
    pub token: String,
    /// Session cookie to replay on the transport connect, when issued
    pub cookie: Option<String>,
}

/// Produces streaming connections: one negotiation call, one connect call.
#[async_trait]
pub trait FeedTransport: Send + Sync {
    /// Request a session token (and optional cookie) from the negotiation
    /// endpoint.
    async fn negotiate(&self, config: &FeedConfig) -> Result<NegotiatedSession>;

    /// Open the streaming transport using a negotiated session.
    async fn connect(
        &self,
        config: &FeedConfig,
        session: &NegotiatedSession,
    ) -> Result<Box<dyn FeedConnection>>;
}

/// An open streaming connection.
#[async_trait]
pub trait FeedConnection: Send {
    /// Send a JSON control message.
    async fn send_json(&mut self, message: &Value) -> Result<()>;

    /// Receive the next text frame. `None` means the peer closed cleanly;
    /// `Some(Err(_))` is a transport failure.
    async fn next_frame(&mut self) -> Option<Result<String>>;

    /// Close the connection, releasing the underlying socket.
    async fn close(&mut self);
}

/// Production transport: HTTP negotiation + WebSocket streaming.
pub struct WebSocketTransport {
    http: reqwest::Client,
}

impl WebSocketTransport {
    /// Create a transport with a fresh HTTP client.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for WebSocketTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedTransport for WebSocketTransport {
    async fn negotiate(&self, config: &FeedConfig) -> Result<NegotiatedSession> {
        let response = self
            .http
            .get(&config.negotiate_url)
            .header(reqwest::header::USER_AGENT, &config.user_agent)
            .query(&[
                ("clientProtocol", config.client_protocol.as_str()),
                ("connectionData", config.hub_data.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let cookie = response
            .headers()
            .get(reqwest::header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body: Value = response.json().await?;
        let token = body
            .get("ConnectionToken")
            .and_then(Value::as_str)
            .ok_or(FeedError::MissingToken)?
            .to_string();

        tracing::debug!(cookie = cookie.is_some(), "negotiation succeeded");
        Ok(NegotiatedSession { token, cookie })
    }

    async fn connect(
        &self,
        config: &FeedConfig,
        session: &NegotiatedSession,
    ) -> Result<Box<dyn FeedConnection>> {
        let mut url = Url::parse(&config.connect_url)?;
        url.query_pairs_mut()
            .append_pair("transport", "webSockets")
            .append_pair("clientProtocol", &config.client_protocol)
            .append_pair("connectionToken", &session.token)
            .append_pair("connectionData", &config.hub_data);

        let mut request = url.as_str().into_client_request()?;
        let headers = request.headers_mut();
        headers.insert(USER_AGENT, header_value(&config.user_agent)?);
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip,identity"));
        if let Some(cookie) = &session.cookie {
            headers.insert(COOKIE, header_value(cookie)?);
        }

        let (ws, response) = connect_async(request).await?;
        tracing::info!(status = %response.status(), "WebSocket connected");
        Ok(Box::new(WebSocketConnection { ws }))
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| FeedError::Connection {
        reason: format!("invalid header value: {e}"),
    })
}

struct WebSocketConnection {
    ws: WsStream,
}

#[async_trait]
impl FeedConnection for WebSocketConnection {
    async fn send_json(&mut self, message: &Value) -> Result<()> {
        self.ws
            .send(Message::Text(message.to_string()))
            .await
            .map_err(FeedError::from)
    }

    async fn next_frame(&mut self) -> Option<Result<String>> {
        loop {
            match self.ws.next().await {
                Some(Ok(Message::Text(text))) => return Some(Ok(text)),
                // Pings and pongs are answered by tungstenite itself; the
                // feed is not expected to send binary frames.
                Some(Ok(Message::Ping(_)))
                | Some(Ok(Message::Pong(_)))
                | Some(Ok(Message::Binary(_)))
                | Some(Ok(Message::Frame(_))) => continue,
                Some(Ok(Message::Close(_))) => return None,
                Some(Err(e)) => return Some(Err(e.into())),
                None => return None,
            }
        }
    }

    async fn close(&mut self) {
        self.ws.close(None).await.ok();
    }
}
