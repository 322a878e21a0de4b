//! Console loop: reads input lines and routes them.
//!
//! A line whose first character is the [`MARKER`] is a command and goes to
//! the interpreter; anything else is a chat message and goes to the server
//! verbatim. An empty line has no first character, so it ships as a chat
//! message with empty content.

pub mod command;

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use crate::client::ChatClient;
use crate::console::command::{CommandInterpreter, Flow};
use crate::display::DisplaySink;

/// Leading character that distinguishes a command line from a chat message.
pub const MARKER: char = '#';

/// Shown once if reading from the input stream fails mid-loop.
const READ_ERROR_NOTICE: &str = "Unexpected error while reading from console!";

/// The read-eval cycle over one input stream.
pub struct Console {
    identity: String,
    client: Arc<dyn ChatClient>,
    display: Arc<dyn DisplaySink>,
    interpreter: CommandInterpreter,
}

impl Console {
    pub fn new(
        identity: String,
        client: Arc<dyn ChatClient>,
        display: Arc<dyn DisplaySink>,
    ) -> Self {
        let interpreter = CommandInterpreter::new(Arc::clone(&client), Arc::clone(&display));
        Self {
            identity,
            client,
            display,
            interpreter,
        }
    }

    /// Announce the session, then read lines until the stream ends, a read
    /// fails, or a command requests shutdown.
    pub async fn run<R>(&self, input: R)
    where
        R: AsyncBufRead + Unpin,
    {
        // Login announcement rides the message path, not the command path,
        // and goes out best effort whatever the connection state.
        let announcement = format!("{MARKER}login {}", self.identity);
        if let Err(e) = self.client.send_message(&announcement).await {
            warn!(error = %e, "Login announcement failed");
        }

        let mut lines = input.lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if line.starts_with(MARKER) {
                        if self.interpreter.handle(&line).await == Flow::Quit {
                            debug!("Shutdown requested, leaving read loop");
                            break;
                        }
                    } else if let Err(e) = self.client.send_message(&line).await {
                        warn!(error = %e, "Could not send message to server");
                    }
                }
                Ok(None) => {
                    debug!("Input stream ended");
                    break;
                }
                Err(e) => {
                    self.display.show(READ_ERROR_NOTICE);
                    debug!(error = %e, "Console read failed");
                    break;
                }
            }
        }
    }
}
