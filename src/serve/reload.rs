//! Change-notification channel for connected preview clients.
//!
//! A plain WebSocket broadcast: the watch dispatcher calls `emit(topic)`,
//! every connected client receives a one-line JSON message naming the
//! topic. Delivery is at-least-once per connected client; clients that
//! fail a send are pruned.

use std::net::{IpAddr, SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;
use tungstenite::{Message, WebSocket};

/// Maximum port retry attempts
const MAX_PORT_RETRIES: u16 = 10;

/// Notification topics, a closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Comments,
    Markup,
    Styles,
}

impl Topic {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Comments => "comments",
            Self::Markup => "markup",
            Self::Styles => "styles",
        }
    }

    /// Wire form: `{"topic":"<name>"}`.
    pub fn to_message(self) -> String {
        format!(r#"{{"topic":"{}"}}"#, self.as_str())
    }
}

/// WebSocket broadcast hub.
pub struct ReloadHub {
    clients: Arc<Mutex<Vec<WebSocket<TcpStream>>>>,
    port: u16,
}

impl ReloadHub {
    /// Bind the notification port (retrying on busy ports) and spawn the
    /// acceptor thread. Binds the same interface as the HTTP server, so
    /// remote preview clients can reach both.
    pub fn start(interface: IpAddr, base_port: u16) -> Result<Self> {
        let (listener, port) = try_bind_port(interface, base_port, MAX_PORT_RETRIES)?;
        listener.set_nonblocking(true)?;

        let clients: Arc<Mutex<Vec<WebSocket<TcpStream>>>> = Arc::new(Mutex::new(Vec::new()));
        let accept_clients = Arc::clone(&clients);

        std::thread::spawn(move || {
            loop {
                if crate::core::is_shutdown() {
                    break;
                }
                match listener.accept() {
                    Ok((stream, addr)) => {
                        crate::debug!("reload"; "client connected: {}", addr);
                        let _ = stream.set_nonblocking(false);
                        match tungstenite::accept(stream) {
                            Ok(ws) => accept_clients.lock().push(ws),
                            Err(e) => crate::debug!("reload"; "handshake failed: {}", e),
                        }
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        std::thread::sleep(std::time::Duration::from_millis(100));
                    }
                    Err(e) => {
                        crate::log!("reload"; "accept error: {}", e);
                        std::thread::sleep(std::time::Duration::from_millis(100));
                    }
                }
            }
        });

        Ok(Self { clients, port })
    }

    /// Actual bound port (may differ from the configured one after retry).
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Broadcast a topic to every connected client, pruning the dead ones.
    pub fn emit(&self, topic: Topic) {
        let message = topic.to_message();
        let mut clients = self.clients.lock();
        clients.retain_mut(|client| {
            match client.send(Message::Text(message.clone().into())) {
                Ok(()) => true,
                Err(e) => {
                    crate::debug!("reload"; "pruning client: {}", e);
                    false
                }
            }
        });
        crate::debug!("reload"; "emit {} to {} client(s)", topic.as_str(), clients.len());
    }

    /// Number of connected clients.
    pub fn client_count(&self) -> usize {
        self.clients.lock().len()
    }
}

/// Try binding to port, retry with incremented port if in use
fn try_bind_port(
    interface: IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(TcpListener, u16)> {
    let mut last_error = None;

    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        match TcpListener::bind(SocketAddr::new(interface, port)) {
            Ok(listener) => {
                let actual_port = listener.local_addr()?.port();
                return Ok((listener, actual_port));
            }
            Err(e) => {
                last_error = Some(e);
                continue;
            }
        }
    }

    Err(anyhow::anyhow!(
        "Failed to bind notification channel after {} attempts: {}",
        max_retries,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}
