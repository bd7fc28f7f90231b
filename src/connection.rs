//! The single duplex channel to the training server.
//!
//! The socket lives inside an iced subscription. The UI gets a [`Connection`] handle once the
//! socket is up and receives snapshots as [`Event`]s. When the socket fails or closes the
//! subscription reports [`Event::Disconnected`], waits, and dials again.

use crate::protocol::{self, Command, Inbound, Snapshot};
use iced::futures::channel::mpsc;
use iced::futures::{SinkExt, StreamExt};
use iced::subscription::{self, Subscription};
use std::convert::Infallible;
use std::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};
use url::Url;

pub const COMMAND_BUFFER: usize = 32;

#[derive(Debug, Clone)]
pub enum Event {
    Connected(Connection),
    /// Only FrozenLake snapshots reach the UI. Other messages are dropped in the session.
    Received(Box<Snapshot>),
    Disconnected,
}

/// Owned sending half of the channel. Commands are fire-and-forget.
#[derive(Debug, Clone)]
pub struct Connection(mpsc::Sender<Command>);

impl Connection {
    /// A handle and the queue it feeds.
    pub fn channel() -> (Self, mpsc::Receiver<Command>) {
        let (sender, receiver) = mpsc::channel(COMMAND_BUFFER);
        (Self(sender), receiver)
    }

    /// Queues `command` for the socket. Returns `false` when it was dropped because the session
    /// is gone or the queue is full.
    pub fn send(&mut self, command: Command) -> bool {
        let name = command.name();
        match self.0.try_send(command) {
            Ok(()) => true,
            Err(e) => {
                warn!(command = name, error = %e, "dropping command");
                false
            }
        }
    }
}

enum State {
    Disconnected,
    Connected(
        WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
        mpsc::Receiver<Command>,
    ),
}

pub fn connect(endpoint: Url, reconnect_delay: Duration) -> Subscription<Event> {
    struct Connect;

    subscription::channel(
        std::any::TypeId::of::<Connect>(),
        100,
        move |output| run(endpoint, reconnect_delay, output),
    )
}

/// Dials `endpoint` and keeps a session alive forever, reporting to `output`.
pub async fn run(
    endpoint: Url,
    reconnect_delay: Duration,
    mut output: mpsc::Sender<Event>,
) -> Infallible {
    let mut state = State::Disconnected;

    loop {
        match &mut state {
            State::Disconnected => match connect_async(endpoint.as_str()).await {
                Ok((websocket, _)) => {
                    info!(%endpoint, "connected");
                    let (connection, receiver) = Connection::channel();
                    let _ = output.send(Event::Connected(connection)).await;

                    state = State::Connected(websocket, receiver);
                }
                Err(e) => {
                    warn!(%endpoint, error = %e, "connection failed");
                    let _ = output.send(Event::Disconnected).await;

                    tokio::time::sleep(reconnect_delay).await;
                }
            },
            State::Connected(websocket, input) => {
                let closed = tokio::select! {
                    received = websocket.next() => match received {
                        Some(Ok(tungstenite::Message::Text(text))) => {
                            if let Some(snapshot) = receive(&text) {
                                let _ = output.send(Event::Received(snapshot)).await;
                            }
                            false
                        }
                        Some(Ok(tungstenite::Message::Close(frame))) => {
                            info!(?frame, "server closed the connection");
                            true
                        }
                        Some(Ok(_)) => false,
                        Some(Err(e)) => {
                            warn!(error = %e, "connection lost");
                            true
                        }
                        None => true,
                    },
                    Some(command) = input.next() => match command.encode() {
                        Ok(text) => {
                            debug!(command = command.name(), "sending");
                            match websocket.send(tungstenite::Message::Text(text)).await {
                                Ok(()) => false,
                                Err(e) => {
                                    warn!(command = command.name(), error = %e, "connection lost");
                                    true
                                }
                            }
                        }
                        Err(e) => {
                            warn!(error = %e, "cannot encode command");
                            false
                        }
                    },
                };

                if closed {
                    let _ = output.send(Event::Disconnected).await;
                    state = State::Disconnected;
                }
            }
        }
    }
}

fn receive(text: &str) -> Option<Box<Snapshot>> {
    match protocol::interpret(text) {
        Ok(Inbound::Snapshot(snapshot)) => Some(snapshot),
        Ok(Inbound::Ignored { kind }) => {
            debug!(?kind, "ignoring message");
            None
        }
        Err(e) => {
            warn!(error = %e, "discarding message");
            None
        }
    }
}
