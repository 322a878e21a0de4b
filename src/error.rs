//! Error types for the network client.

use thiserror::Error;
use tokio_util::codec::LinesCodecError;

/// Errors surfaced by a [`ChatClient`](crate::client::ChatClient).
///
/// The console core treats all of these as recoverable: guard violations are
/// reported to the user, operational failures are logged and swallowed.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("not connected to a server")]
    NotConnected,

    #[error("can't connect to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("line transport error: {0}")]
    Transport(#[from] LinesCodecError),
}
