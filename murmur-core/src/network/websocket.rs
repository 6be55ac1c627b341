// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! WebSocket Channel
//!
//! Push channel implementation using tungstenite over a blocking socket.
//! Supports both native-tls and rustls TLS backends.

use std::collections::VecDeque;
use std::net::TcpStream;
use std::time::{Duration, Instant};

#[cfg(all(feature = "network-native-tls", not(feature = "network-rustls")))]
use native_tls::TlsConnector;

#[cfg(feature = "network-rustls")]
use rustls::pki_types::ServerName;
#[cfg(feature = "network-rustls")]
use std::sync::Arc;

use tracing::{debug, warn};
use tungstenite::client::IntoClientRequest;
use tungstenite::http::HeaderValue;
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};
use url::Url;

use super::channel::{ChannelConfig, ClientEvent, ConnectionState, PushChannel, PushEvent};
use super::error::{NetworkError, NetworkResult};
use super::protocol::{decode_packet, encode_packet, Packet};

type Socket = WebSocket<MaybeTlsStream<TcpStream>>;

/// WebSocket push channel.
///
/// Supports both ws:// (plaintext) and wss:// (TLS) connections.
///
/// # Example
///
/// ```ignore
/// use murmur_core::network::{ChannelConfig, PushChannel, WebSocketChannel};
///
/// let mut channel = WebSocketChannel::new();
/// let config = ChannelConfig {
///     url: "ws://localhost:5000/socket.io/?EIO=4&transport=websocket".to_string(),
///     ..Default::default()
/// };
/// channel.connect(&config)?;
/// ```
pub struct WebSocketChannel {
    socket: Option<Socket>,
    state: ConnectionState,
    /// Events decoded during the handshake, delivered on the next poll.
    pending: VecDeque<PushEvent>,
}

impl WebSocketChannel {
    /// Creates a new, disconnected channel.
    pub fn new() -> Self {
        WebSocketChannel {
            socket: None,
            state: ConnectionState::Disconnected,
            pending: VecDeque::new(),
        }
    }

    /// Parses a WebSocket URL into host and port.
    fn parse_url(url: &str) -> NetworkResult<(String, u16, bool)> {
        let parsed = Url::parse(url)
            .map_err(|e| NetworkError::ConnectionFailed(format!("Invalid URL: {}", e)))?;
        let is_tls = match parsed.scheme() {
            "wss" => true,
            "ws" => false,
            _ => {
                return Err(NetworkError::ConnectionFailed(
                    "Invalid URL scheme (expected ws:// or wss://)".into(),
                ))
            }
        };
        let host = parsed
            .host_str()
            .ok_or_else(|| NetworkError::ConnectionFailed("URL has no host".into()))?
            .to_string();
        let port = parsed
            .port_or_known_default()
            .unwrap_or(if is_tls { 443 } else { 80 });
        Ok((host, port, is_tls))
    }

    /// Create a TLS stream using native-tls
    #[cfg(all(feature = "network-native-tls", not(feature = "network-rustls")))]
    fn create_tls_stream(
        host: &str,
        tcp_stream: TcpStream,
    ) -> NetworkResult<MaybeTlsStream<TcpStream>> {
        let connector = TlsConnector::new()
            .map_err(|e| NetworkError::ConnectionFailed(format!("TLS error: {}", e)))?;
        let tls_stream = connector
            .connect(host, tcp_stream)
            .map_err(|e| NetworkError::ConnectionFailed(format!("TLS handshake failed: {}", e)))?;
        Ok(MaybeTlsStream::NativeTls(tls_stream))
    }

    /// Create a TLS stream using rustls
    #[cfg(feature = "network-rustls")]
    fn create_tls_stream(
        host: &str,
        tcp_stream: TcpStream,
    ) -> NetworkResult<MaybeTlsStream<TcpStream>> {
        let mut root_store = rustls::RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let server_name: ServerName<'_> = host.try_into().map_err(|_| {
            NetworkError::ConnectionFailed(format!("Invalid server name: {}", host))
        })?;

        let tls_conn = rustls::ClientConnection::new(Arc::new(config), server_name.to_owned())
            .map_err(|e| NetworkError::ConnectionFailed(format!("TLS setup failed: {}", e)))?;

        Ok(MaybeTlsStream::Rustls(rustls::StreamOwned::new(
            tls_conn, tcp_stream,
        )))
    }

    #[cfg(not(any(feature = "network-native-tls", feature = "network-rustls")))]
    fn create_tls_stream(
        _host: &str,
        _tcp_stream: TcpStream,
    ) -> NetworkResult<MaybeTlsStream<TcpStream>> {
        Err(NetworkError::ConnectionFailed(
            "wss:// requires a TLS feature".into(),
        ))
    }

    fn set_read_timeout(socket: &Socket, timeout: Duration) -> NetworkResult<()> {
        let tcp = match socket.get_ref() {
            MaybeTlsStream::Plain(stream) => stream,
            #[cfg(all(feature = "network-native-tls", not(feature = "network-rustls")))]
            MaybeTlsStream::NativeTls(stream) => stream.get_ref(),
            #[cfg(feature = "network-rustls")]
            MaybeTlsStream::Rustls(stream) => &stream.sock,
            _ => return Ok(()),
        };
        tcp.set_read_timeout(Some(timeout))
            .map_err(|e| NetworkError::ConnectionFailed(e.to_string()))
    }

    fn open_socket(config: &ChannelConfig) -> NetworkResult<Socket> {
        let (host, port, is_tls) = Self::parse_url(&config.url)?;
        let addr = format!("{}:{}", host, port);

        let tcp_stream =
            TcpStream::connect(&addr).map_err(|e| NetworkError::ConnectionFailed(e.to_string()))?;
        tcp_stream
            .set_read_timeout(Some(Duration::from_millis(config.connect_timeout_ms)))
            .map_err(|e| NetworkError::ConnectionFailed(e.to_string()))?;

        let stream: MaybeTlsStream<TcpStream> = if is_tls {
            Self::create_tls_stream(&host, tcp_stream)?
        } else {
            MaybeTlsStream::Plain(tcp_stream)
        };

        let mut request = config.url.as_str().into_client_request().map_err(|e| {
            NetworkError::ConnectionFailed(format!("Invalid WebSocket request: {}", e))
        })?;
        if let Some(cookie) = &config.cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| NetworkError::ConnectionFailed(format!("Invalid cookie: {}", e)))?;
            request.headers_mut().insert("Cookie", value);
        }

        let (socket, _response) = tungstenite::client(request, stream).map_err(|e| {
            NetworkError::ConnectionFailed(format!("WebSocket handshake failed: {}", e))
        })?;
        Ok(socket)
    }

    fn send_packet(socket: &mut Socket, packet: &Packet) -> NetworkResult<()> {
        let frame = encode_packet(packet)?;
        socket.send(Message::Text(frame)).map_err(|e| {
            if matches!(
                e,
                tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed
            ) {
                NetworkError::ConnectionClosed
            } else {
                NetworkError::SendFailed(e.to_string())
            }
        })
    }

    /// Reads one frame. `Ok(None)` on read timeout.
    fn read_packet(socket: &mut Socket) -> NetworkResult<Option<Packet>> {
        match socket.read() {
            Ok(Message::Text(text)) => decode_packet(&text).map(Some),
            Ok(Message::Ping(data)) => {
                let _ = socket.send(Message::Pong(data));
                Ok(None)
            }
            Ok(Message::Pong(_)) | Ok(Message::Frame(_)) => Ok(None),
            Ok(Message::Binary(_)) => Err(NetworkError::InvalidPacket(
                "Unexpected binary message".into(),
            )),
            Ok(Message::Close(_)) => Err(NetworkError::ConnectionClosed),
            Err(tungstenite::Error::Io(ref e))
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                Ok(None)
            }
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                Err(NetworkError::ConnectionClosed)
            }
            Err(e) => Err(NetworkError::ReceiveFailed(e.to_string())),
        }
    }

    /// Performs the open / connect exchange on a fresh socket.
    fn handshake(&mut self, config: &ChannelConfig) -> NetworkResult<()> {
        let deadline = Instant::now() + Duration::from_millis(config.connect_timeout_ms);
        let socket = self.socket.as_mut().ok_or(NetworkError::NotConnected)?;
        let mut connect_sent = false;

        loop {
            if Instant::now() >= deadline {
                return Err(NetworkError::ConnectionFailed("handshake timed out".into()));
            }
            let packet = match Self::read_packet(socket)? {
                Some(packet) => packet,
                None => continue,
            };
            match packet {
                Packet::Open(open) => {
                    debug!(sid = %open.sid, ping_interval = open.ping_interval, "channel opened");
                    Self::send_packet(socket, &Packet::Connect { sid: None })?;
                    connect_sent = true;
                }
                Packet::Ping => Self::send_packet(socket, &Packet::Pong)?,
                Packet::Connect { .. } if connect_sent => {
                    self.pending.push_back(PushEvent::Connected);
                    return Ok(());
                }
                Packet::ConnectError(message) => {
                    return Err(NetworkError::ConnectionFailed(message));
                }
                Packet::Close => return Err(NetworkError::ConnectionClosed),
                other => debug!(?other, "ignoring packet during handshake"),
            }
        }
    }

    fn mark_closed(&mut self) {
        self.socket = None;
        self.state = ConnectionState::Disconnected;
    }
}

impl Default for WebSocketChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl PushChannel for WebSocketChannel {
    fn connect(&mut self, config: &ChannelConfig) -> NetworkResult<()> {
        if self.state == ConnectionState::Connected {
            return Ok(());
        }

        self.state = ConnectionState::Connecting;
        self.pending.clear();

        let socket = Self::open_socket(config).inspect_err(|_| {
            self.state = ConnectionState::Disconnected;
        })?;
        self.socket = Some(socket);

        let ready = self.handshake(config).and_then(|_| match &self.socket {
            // A zero read timeout is rejected by the socket.
            Some(socket) => Self::set_read_timeout(
                socket,
                Duration::from_millis(config.poll_interval_ms.max(1)),
            ),
            None => Err(NetworkError::NotConnected),
        });
        if let Err(e) = ready {
            if let Some(mut socket) = self.socket.take() {
                let _ = socket.close(None);
            }
            self.pending.clear();
            self.state = ConnectionState::Disconnected;
            return Err(e);
        }

        self.state = ConnectionState::Connected;
        Ok(())
    }

    fn disconnect(&mut self) -> NetworkResult<()> {
        if let Some(mut socket) = self.socket.take() {
            let _ = Self::send_packet(&mut socket, &Packet::Disconnect);
            let _ = socket.close(None); // Ignore errors on close
        }
        self.pending.clear();
        self.state = ConnectionState::Disconnected;
        Ok(())
    }

    fn state(&self) -> ConnectionState {
        self.state
    }

    fn emit(&mut self, event: &ClientEvent) -> NetworkResult<()> {
        if self.state != ConnectionState::Connected {
            return Err(NetworkError::NotConnected);
        }
        let socket = self.socket.as_mut().ok_or(NetworkError::NotConnected)?;
        let packet = event.to_packet()?;
        let result = Self::send_packet(socket, &packet);
        if matches!(result, Err(NetworkError::ConnectionClosed)) {
            self.mark_closed();
        }
        result
    }

    fn poll(&mut self) -> NetworkResult<Option<PushEvent>> {
        if let Some(event) = self.pending.pop_front() {
            return Ok(Some(event));
        }

        loop {
            let socket = match self.socket.as_mut() {
                Some(socket) => socket,
                None => return Ok(None),
            };

            let packet = match Self::read_packet(socket) {
                Ok(Some(packet)) => packet,
                Ok(None) => return Ok(None),
                Err(NetworkError::ConnectionClosed) => {
                    self.mark_closed();
                    return Ok(Some(PushEvent::Disconnected));
                }
                Err(e) => return Err(e),
            };

            match packet {
                Packet::Ping => Self::send_packet(socket, &Packet::Pong)?,
                Packet::Event { name, data } => match PushEvent::from_event(&name, data) {
                    Ok(Some(event)) => return Ok(Some(event)),
                    Ok(None) => debug!(event = %name, "ignoring unhandled event"),
                    Err(e) => {
                        warn!(error = %e, "dropping malformed event");
                        return Err(e);
                    }
                },
                Packet::Disconnect | Packet::Close => {
                    if let Some(mut socket) = self.socket.take() {
                        let _ = socket.close(None);
                    }
                    self.state = ConnectionState::Disconnected;
                    return Ok(Some(PushEvent::Disconnected));
                }
                Packet::ConnectError(message) => {
                    return Ok(Some(PushEvent::ConnectError(message)));
                }
                Packet::Connect { .. } => return Ok(Some(PushEvent::Connected)),
                Packet::Open(_) | Packet::Pong | Packet::Noop | Packet::Ack => {}
            }
        }
    }
}
