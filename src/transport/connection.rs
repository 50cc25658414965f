//! WebSocket connection and event loop.
//!
//! This module handles the WebSocket connection to the browser's DevTools
//! endpoint, including request/response correlation and event routing.
//!
//! # Event Loop
//!
//! The connection spawns a tokio task that handles:
//!
//! - Incoming messages from the browser (responses, events)
//! - Outgoing commands from the Rust API
//! - Request/response correlation by numeric id
//! - Event subscriber callbacks

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::{from_str, to_string};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, error, trace, warn};

use crate::error::{Error, Result};
use crate::identifiers::{RequestId, SubscriptionId};
use crate::protocol::{Event, Request, Response};

// ============================================================================
// Constants
// ============================================================================

/// Default timeout for command execution.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum pending requests before rejecting new ones.
const MAX_PENDING_REQUESTS: usize = 100;

// ============================================================================
// Types
// ============================================================================

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

type WsSink = SplitSink<WsStream, Message>;

/// Map of request IDs to response channels.
type CorrelationMap = FxHashMap<RequestId, oneshot::Sender<Result<Response>>>;

/// Event subscriber callback type.
///
/// Called for each event received from the browser. Subscribers filter
/// by method and session themselves.
pub type EventHandler = Box<dyn Fn(&Event) + Send + Sync>;

/// Map of subscription IDs to event handlers.
type SubscriberMap = FxHashMap<SubscriptionId, EventHandler>;

// ============================================================================
// ConnectionCommand
// ============================================================================

/// Internal commands for the event loop.
enum ConnectionCommand {
    /// Send a request and wait for response.
    Send {
        request: Request,
        response_tx: oneshot::Sender<Result<Response>>,
    },
    /// Remove a timed-out correlation entry.
    RemoveCorrelation(RequestId),
    /// Shutdown the connection.
    Shutdown,
}

// ============================================================================
// Connection
// ============================================================================

/// WebSocket connection to a browser DevTools endpoint.
///
/// Handles request/response correlation and event routing.
/// The connection spawns an internal event loop task.
///
/// # Thread Safety
///
/// `Connection` is `Send + Sync` and cheap to clone; clones share the same
/// event loop.
#[derive(Clone)]
pub struct Connection {
    /// Channel for sending commands to the event loop.
    command_tx: mpsc::UnboundedSender<ConnectionCommand>,
    /// Correlation map (shared with event loop).
    correlation: Arc<Mutex<CorrelationMap>>,
    /// Event subscribers (shared with event loop).
    subscribers: Arc<Mutex<SubscriberMap>>,
}

impl Connection {
    /// Connects to a DevTools WebSocket URL and spawns the event loop.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the handshake fails.
    pub async fn connect(ws_url: &str) -> Result<Self> {
        debug!(url = %ws_url, "Connecting to DevTools endpoint");

        let (ws_stream, _) = connect_async(ws_url)
            .await
            .map_err(|e| Error::connection(format!("{ws_url}: {e}")))?;

        debug!(url = %ws_url, "DevTools WebSocket established");
        Ok(Self::new(ws_stream))
    }

    /// Creates a new connection from a WebSocket stream.
    ///
    /// Spawns the event loop task internally.
    fn new(ws_stream: WsStream) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let correlation = Arc::new(Mutex::new(CorrelationMap::default()));
        let subscribers = Arc::new(Mutex::new(SubscriberMap::default()));

        tokio::spawn(Self::run_event_loop(
            ws_stream,
            command_rx,
            Arc::clone(&correlation),
            Arc::clone(&subscribers),
        ));

        Self {
            command_tx,
            correlation,
            subscribers,
        }
    }

    /// Registers an event subscriber.
    ///
    /// Returns the handle used to [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe(&self, handler: EventHandler) -> SubscriptionId {
        let id = SubscriptionId::next();
        self.subscribers.lock().insert(id, handler);
        trace!(%id, "Event subscriber registered");
        id
    }

    /// Removes an event subscriber.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        if self.subscribers.lock().remove(&id).is_some() {
            trace!(%id, "Event subscriber removed");
        }
    }

    /// Sends a request and waits for response with the default timeout (30s).
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`] if connection is closed
    /// - [`Error::RequestTimeout`] if response not received within timeout
    /// - [`Error::Protocol`] if too many pending requests
    pub async fn send(&self, request: Request) -> Result<Response> {
        self.send_with_timeout(request, DEFAULT_COMMAND_TIMEOUT)
            .await
    }

    /// Sends a request and waits for response with custom timeout.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`] if connection is closed
    /// - [`Error::RequestTimeout`] if response not received within timeout
    /// - [`Error::Protocol`] if too many pending requests
    pub async fn send_with_timeout(
        &self,
        request: Request,
        request_timeout: Duration,
    ) -> Result<Response> {
        let request_id = request.id;

        {
            let correlation = self.correlation.lock();
            if correlation.len() >= MAX_PENDING_REQUESTS {
                warn!(
                    pending = correlation.len(),
                    max = MAX_PENDING_REQUESTS,
                    "Too many pending requests"
                );
                return Err(Error::protocol(format!(
                    "Too many pending requests: {}/{}",
                    correlation.len(),
                    MAX_PENDING_REQUESTS
                )));
            }
        }

        let (response_tx, response_rx) = oneshot::channel();

        self.command_tx
            .send(ConnectionCommand::Send {
                request,
                response_tx,
            })
            .map_err(|_| Error::ConnectionClosed)?;

        match timeout(request_timeout, response_rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(Error::ConnectionClosed),
            Err(_) => {
                let _ = self
                    .command_tx
                    .send(ConnectionCommand::RemoveCorrelation(request_id));

                Err(Error::request_timeout(
                    request_id,
                    request_timeout.as_millis() as u64,
                ))
            }
        }
    }

    /// Shuts down the connection gracefully.
    ///
    /// Not called on drop: clones share the event loop.
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(ConnectionCommand::Shutdown);
    }

    /// Event loop that handles WebSocket I/O.
    async fn run_event_loop(
        ws_stream: WsStream,
        mut command_rx: mpsc::UnboundedReceiver<ConnectionCommand>,
        correlation: Arc<Mutex<CorrelationMap>>,
        subscribers: Arc<Mutex<SubscriberMap>>,
    ) {
        let (mut ws_write, mut ws_read) = ws_stream.split();

        loop {
            tokio::select! {
                message = ws_read.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            Self::handle_incoming_message(&text, &correlation, &subscribers);
                        }

                        Some(Ok(Message::Close(_))) => {
                            debug!("WebSocket closed by browser");
                            break;
                        }

                        Some(Err(e)) => {
                            error!(error = %e, "WebSocket error");
                            break;
                        }

                        None => {
                            debug!("WebSocket stream ended");
                            break;
                        }

                        // Ignore Binary, Ping, Pong
                        _ => {}
                    }
                }

                command = command_rx.recv() => {
                    match command {
                        Some(ConnectionCommand::Send { request, response_tx }) => {
                            Self::handle_send_command(
                                request,
                                response_tx,
                                &mut ws_write,
                                &correlation,
                            ).await;
                        }

                        Some(ConnectionCommand::RemoveCorrelation(request_id)) => {
                            correlation.lock().remove(&request_id);
                            debug!(%request_id, "Removed timed-out correlation");
                        }

                        Some(ConnectionCommand::Shutdown) => {
                            debug!("Shutdown command received");
                            let _ = ws_write.close().await;
                            break;
                        }

                        None => {
                            debug!("Command channel closed");
                            break;
                        }
                    }
                }
            }
        }

        Self::fail_pending_requests(&correlation);
        subscribers.lock().clear();

        debug!("Event loop terminated");
    }

    /// Handles an incoming text message from the browser.
    fn handle_incoming_message(
        text: &str,
        correlation: &Arc<Mutex<CorrelationMap>>,
        subscribers: &Arc<Mutex<SubscriberMap>>,
    ) {
        // Responses carry an id, events never do
        if let Ok(response) = from_str::<Response>(text) {
            let tx = correlation.lock().remove(&response.id);

            if let Some(tx) = tx {
                let _ = tx.send(Ok(response));
            } else {
                warn!(id = %response.id, "Response for unknown request");
            }
            return;
        }

        if let Ok(event) = from_str::<Event>(text) {
            trace!(method = %event.method, "Event received");
            let subscribers = subscribers.lock();
            for handler in subscribers.values() {
                handler(&event);
            }
            return;
        }

        warn!(text = %text, "Failed to parse incoming message");
    }

    /// Handles a send command from the Rust API.
    async fn handle_send_command(
        request: Request,
        response_tx: oneshot::Sender<Result<Response>>,
        ws_write: &mut WsSink,
        correlation: &Arc<Mutex<CorrelationMap>>,
    ) {
        let request_id = request.id;
        let method = request.method();

        let json = match to_string(&request) {
            Ok(j) => j,
            Err(e) => {
                let _ = response_tx.send(Err(Error::Json(e)));
                return;
            }
        };

        // Store correlation before sending
        correlation.lock().insert(request_id, response_tx);

        if let Err(e) = ws_write.send(Message::Text(json.into())).await {
            if let Some(tx) = correlation.lock().remove(&request_id) {
                let _ = tx.send(Err(Error::connection(e.to_string())));
            }
            return;
        }

        trace!(%request_id, method, "Request sent");
    }

    /// Fails all pending requests with ConnectionClosed error.
    fn fail_pending_requests(correlation: &Arc<Mutex<CorrelationMap>>) {
        let pending: Vec<_> = correlation.lock().drain().collect();
        let count = pending.len();

        for (_, tx) in pending {
            let _ = tx.send(Err(Error::ConnectionClosed));
        }

        if count > 0 {
            debug!(count, "Failed pending requests on shutdown");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    #[test]
    fn test_constants() {
        assert_eq!(DEFAULT_COMMAND_TIMEOUT.as_secs(), 30);
        assert_eq!(MAX_PENDING_REQUESTS, 100);
    }

    fn empty_maps() -> (Arc<Mutex<CorrelationMap>>, Arc<Mutex<SubscriberMap>>) {
        (
            Arc::new(Mutex::new(CorrelationMap::default())),
            Arc::new(Mutex::new(SubscriberMap::default())),
        )
    }

    #[tokio::test]
    async fn test_response_is_routed_to_waiter() {
        let (correlation, subscribers) = empty_maps();
        let (tx, rx) = oneshot::channel();
        correlation.lock().insert(RequestId::new(9), tx);

        let text = json!({"id": 9, "result": {"ok": true}}).to_string();
        Connection::handle_incoming_message(&text, &correlation, &subscribers);

        let response = rx.await.expect("delivered").expect("ok response");
        assert_eq!(response.id, RequestId::new(9));
        assert!(correlation.lock().is_empty());
    }

    #[test]
    fn test_event_reaches_every_subscriber() {
        let (correlation, subscribers) = empty_maps();
        let hits = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let hits = Arc::clone(&hits);
            subscribers.lock().insert(
                SubscriptionId::next(),
                Box::new(move |event: &Event| {
                    if event.method == "Page.lifecycleEvent" {
                        hits.fetch_add(1, Ordering::SeqCst);
                    }
                }),
            );
        }

        let text = json!({
            "method": "Page.lifecycleEvent",
            "params": {"name": "load"},
            "sessionId": "S1"
        })
        .to_string();
        Connection::handle_incoming_message(&text, &correlation, &subscribers);

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fail_pending_requests() {
        let (correlation, _) = empty_maps();
        let (tx, rx) = oneshot::channel();
        correlation.lock().insert(RequestId::new(1), tx);

        Connection::fail_pending_requests(&correlation);

        let result = rx.await.expect("delivered");
        assert!(matches!(result, Err(Error::ConnectionClosed)));
    }
}
