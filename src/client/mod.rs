//! Network client abstraction.
//!
//! The console core drives the connection through the [`ChatClient`] trait
//! and never touches sockets itself. [`TcpClient`] is the shipping
//! implementation; tests substitute scripted doubles.

mod tcp;

pub use tcp::TcpClient;

use async_trait::async_trait;

use crate::error::ClientError;

/// Operations the console core needs from the connection owner.
///
/// Connection state belongs to the implementation; the core only requests
/// transitions and reads the current value to guard commands.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Best-effort dispatch of one outgoing line.
    async fn send_message(&self, text: &str) -> Result<(), ClientError>;

    /// Open a connection to the configured endpoint.
    async fn open_connection(&self) -> Result<(), ClientError>;

    /// Close the current connection. Fails if there is none.
    async fn close_connection(&self) -> Result<(), ClientError>;

    /// Whether the client currently holds an open connection.
    fn is_connected(&self) -> bool;

    fn host(&self) -> String;

    fn set_host(&self, host: &str);

    fn port(&self) -> u16;

    fn set_port(&self, port: u16);

    /// Best-effort teardown used when the console shuts down; close failures
    /// are logged, never surfaced.
    async fn shutdown(&self);
}
