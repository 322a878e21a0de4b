//! TCP chat client with newline-delimited framing.
//!
//! On open, the stream is split: the write half becomes a framed sink held
//! behind a lock, the read half moves into a background task that forwards
//! every incoming server line to the display sink. The task flips the
//! connected flag when the server closes the stream, so the console sees the
//! disconnect on its next guard check.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use parking_lot::RwLock;
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec};
use tracing::{debug, info};

use crate::client::ChatClient;
use crate::display::DisplaySink;
use crate::error::ClientError;

/// The endpoint the next `open_connection` will dial.
struct Endpoint {
    host: String,
    port: u16,
}

/// State that only exists while a connection is open.
struct Live {
    writer: FramedWrite<OwnedWriteHalf, LinesCodec>,
    reader: JoinHandle<()>,
}

/// A [`ChatClient`] over plain TCP, one text line per message.
pub struct TcpClient {
    endpoint: RwLock<Endpoint>,
    live: Mutex<Option<Live>>,
    connected: Arc<AtomicBool>,
    display: Arc<dyn DisplaySink>,
}

impl TcpClient {
    /// Create a client for the given endpoint. Does not connect.
    pub fn new(host: impl Into<String>, port: u16, display: Arc<dyn DisplaySink>) -> Self {
        Self {
            endpoint: RwLock::new(Endpoint {
                host: host.into(),
                port,
            }),
            live: Mutex::new(None),
            connected: Arc::new(AtomicBool::new(false)),
            display,
        }
    }

    /// Tear down connection state after a failure or close.
    fn drop_live(&self, live: Option<Live>) {
        if let Some(live) = live {
            live.reader.abort();
        }
        self.connected.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl ChatClient for TcpClient {
    async fn send_message(&self, text: &str) -> Result<(), ClientError> {
        let mut guard = self.live.lock().await;
        let Some(live) = guard.as_mut() else {
            return Err(ClientError::NotConnected);
        };
        match live.writer.send(text).await {
            Ok(()) => Ok(()),
            Err(e) => {
                // A failed write means the connection is gone.
                self.drop_live(guard.take());
                Err(e.into())
            }
        }
    }

    async fn open_connection(&self) -> Result<(), ClientError> {
        let mut guard = self.live.lock().await;
        if guard.is_some() && self.connected.load(Ordering::SeqCst) {
            return Ok(());
        }
        // A stale entry is left behind when the server closed the stream.
        self.drop_live(guard.take());

        let (host, port) = {
            let endpoint = self.endpoint.read();
            (endpoint.host.clone(), endpoint.port)
        };
        let stream = TcpStream::connect((host.as_str(), port))
            .await
            .map_err(|source| ClientError::Connect {
                host: host.clone(),
                port,
                source,
            })?;
        let (read_half, write_half) = stream.into_split();
        let writer = FramedWrite::new(write_half, LinesCodec::new());

        let connected = Arc::clone(&self.connected);
        let display = Arc::clone(&self.display);
        let reader = tokio::spawn(async move {
            let mut lines = FramedRead::new(read_half, LinesCodec::new());
            while let Some(next) = lines.next().await {
                match next {
                    Ok(line) => display.show(&line),
                    Err(e) => {
                        debug!(error = %e, "Receive failed");
                        break;
                    }
                }
            }
            connected.store(false, Ordering::SeqCst);
            info!("Server closed the connection");
        });

        *guard = Some(Live { writer, reader });
        self.connected.store(true, Ordering::SeqCst);
        info!(host = %host, port = port, "Connection opened");
        Ok(())
    }

    async fn close_connection(&self) -> Result<(), ClientError> {
        let mut guard = self.live.lock().await;
        let Some(mut live) = guard.take() else {
            return Err(ClientError::NotConnected);
        };
        live.reader.abort();
        self.connected.store(false, Ordering::SeqCst);
        SinkExt::<&str>::close(&mut live.writer).await?;
        info!("Connection closed");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn host(&self) -> String {
        self.endpoint.read().host.clone()
    }

    fn set_host(&self, host: &str) {
        self.endpoint.write().host = host.to_string();
    }

    fn port(&self) -> u16 {
        self.endpoint.read().port
    }

    fn set_port(&self, port: u16) {
        self.endpoint.write().port = port;
    }

    async fn shutdown(&self) {
        if let Err(e) = self.close_connection().await {
            debug!(error = %e, "Close during shutdown failed");
        }
    }
}
