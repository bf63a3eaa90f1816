//! TCP server for the remote key link
//!
//! Accepts any number of clients. Each connection forwards its keys into the
//! appliance key channel and receives a `status` line for every published
//! snapshot.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::engine::{Clock, KeySender, Shutdown, SnapshotReader};
use crate::protocol::*;
use crate::types::RawEvent;

pub const DEFAULT_LINK_HOST: &str = "127.0.0.1";
pub const DEFAULT_LINK_PORT: u16 = 7878;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkConfig {
    pub host: String,
    pub port: u16,
    pub disabled: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_LINK_HOST.to_string(),
            port: DEFAULT_LINK_PORT,
            disabled: false,
        }
    }
}

impl LinkConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("LIFE_LINK_HOST")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_LINK_HOST.to_string());
        let port = lookup("LIFE_LINK_PORT")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_LINK_PORT);
        let disabled = lookup("LIFE_LINK_DISABLED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            host,
            port,
            disabled,
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid link address {}:{}", self.host, self.port))
    }
}

/// Everything a connection needs from the appliance.
#[derive(Debug, Clone)]
pub struct LinkHandles {
    pub keys: KeySender,
    pub snapshots: SnapshotReader,
    pub clock: Clock,
    pub shutdown: Shutdown,
    /// Expansion ratio reported in `welcome`
    pub ratio: u16,
}

/// Start the TCP server. Returns when shutdown is triggered.
pub async fn run_server(
    config: LinkConfig,
    handles: LinkHandles,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    if config.disabled {
        info!("remote key link disabled via LIFE_LINK_DISABLED");
        return Ok(());
    }

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind link on {}", addr))?;
    let bound = listener.local_addr()?;
    info!(%bound, "remote key link listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let mut client_id_counter = 0usize;
    loop {
        let (socket, peer) = tokio::select! {
            _ = handles.shutdown.wait() => break,
            accepted = listener.accept() => accepted?,
        };
        client_id_counter += 1;
        let client_id = client_id_counter;
        info!(client_id, %peer, "client connected");

        let handles = handles.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, client_id, handles).await {
                warn!(client_id, error = %e, "client error");
            }
            info!(client_id, "client disconnected");
        });
    }

    info!("remote key link stopped");
    Ok(())
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    client_id: usize,
    handles: LinkHandles,
) -> anyhow::Result<()> {
    let LinkHandles {
        keys,
        mut snapshots,
        clock,
        shutdown,
        ratio,
    } = handles;

    let (reader, mut writer) = socket.into_split();
    let mut lines = BufReader::new(reader).lines();
    let mut buf: Vec<u8> = Vec::with_capacity(256);
    let mut out_seq = 0u64;

    let welcome = create_welcome(out_seq, &snapshots.latest(), ratio);
    write_message(&mut writer, &mut buf, &welcome).await?;

    loop {
        tokio::select! {
            _ = shutdown.wait() => break,

            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let Some(reply) = handle_line(trimmed, client_id, &keys, &clock).await else {
                    // Appliance is shutting down.
                    break;
                };
                write_message(&mut writer, &mut buf, &reply).await?;
            }

            snapshot = snapshots.changed() => {
                let Some(snapshot) = snapshot else {
                    break;
                };
                out_seq += 1;
                write_message(&mut writer, &mut buf, &create_status(out_seq, &snapshot)).await?;
            }
        }
    }

    Ok(())
}

/// Process one client line. `None` means the key channel is closed.
async fn handle_line(
    line: &str,
    client_id: usize,
    keys: &KeySender,
    clock: &Clock,
) -> Option<ServerMessage> {
    let msg = match parse_message(line) {
        Ok(ParsedMessage::Key(msg)) => msg,
        Ok(ParsedMessage::Unknown { seq, msg_type }) => {
            debug!(client_id, %msg_type, "unknown message type");
            return Some(create_error(
                seq,
                ErrorCode::UnknownType,
                &format!("unsupported message type {:?}", msg_type),
            ));
        }
        Err(e) => {
            warn!(client_id, error = %e, "invalid json");
            return Some(create_error(0, ErrorCode::InvalidJson, &e.to_string()));
        }
    };

    let Some(key) = msg.key.resolve() else {
        debug!(client_id, key = %msg.key, "unknown key");
        return Some(create_error(
            msg.seq,
            ErrorCode::UnknownKey,
            &format!("unknown key {}", msg.key),
        ));
    };

    // Waits while the key slot is full; the ack only goes out once the key is in.
    if keys.send(RawEvent::tap(key, clock.now_ms())).await.is_err() {
        return None;
    }
    debug!(client_id, seq = msg.seq, key = key.as_str(), "key forwarded");
    Some(create_ack(msg.seq))
}

async fn write_message(
    writer: &mut OwnedWriteHalf,
    buf: &mut Vec<u8>,
    msg: &ServerMessage,
) -> anyhow::Result<()> {
    buf.clear();
    serde_json::to_writer(&mut *buf, msg)?;
    buf.push(b'\n');
    writer.write_all(buf).await?;
    writer.flush().await?;
    Ok(())
}
