//! Command interpretation for marker-prefixed input lines.
//!
//! Each command line maps to exactly one action. Keywords are tested in a
//! fixed order and the first match wins; matching is substring-contains, so
//! a keyword anywhere in the line triggers its handler.

use std::sync::Arc;

use tracing::debug;

use crate::client::ChatClient;
use crate::console::MARKER;
use crate::display::DisplaySink;

/// What the console loop should do after a command has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Reported when `sethost` or `setport` is issued while connected.
const ENDPOINT_GUARD_NOTICE: &str = "You can't change the host while connected!";

/// Maps one command line to one client operation or display report.
pub struct CommandInterpreter {
    client: Arc<dyn ChatClient>,
    display: Arc<dyn DisplaySink>,
}

impl CommandInterpreter {
    pub fn new(client: Arc<dyn ChatClient>, display: Arc<dyn DisplaySink>) -> Self {
        Self { client, display }
    }

    /// Dispatch one command line.
    pub async fn handle(&self, line: &str) -> Flow {
        if matches(line, "quit") {
            self.client.shutdown().await;
            return Flow::Quit;
        }

        if matches(line, "logoff") {
            if let Err(e) = self.client.close_connection().await {
                debug!(error = %e, "Logoff close failed");
            }
        } else if matches(line, "sethost") {
            if self.client.is_connected() {
                self.display.show(ENDPOINT_GUARD_NOTICE);
            } else {
                let host = value_after(line, "sethost");
                self.client.set_host(host);
                self.display.show(&format!("Host set to: {host}"));
            }
        } else if matches(line, "setport") {
            if self.client.is_connected() {
                self.display.show(ENDPOINT_GUARD_NOTICE);
            } else {
                let value = value_after(line, "setport");
                match value.parse::<u16>() {
                    Ok(port) if port > 0 => {
                        self.client.set_port(port);
                        self.display.show(&format!("Port set to: {port}"));
                    }
                    _ => self.display.show(&format!("Invalid port value: {value}")),
                }
            }
        } else if matches(line, "login") {
            if self.client.is_connected() {
                self.display.show("Hey, you're already logged in!");
            } else if let Err(e) = self.client.open_connection().await {
                debug!(error = %e, "Login open failed");
            }
        } else if matches(line, "gethost") {
            self.display.show(&self.client.host());
        } else if matches(line, "getport") {
            self.display.show(&self.client.port().to_string());
        } else {
            self.display.show("Sorry, that isn't a recognizable command");
        }

        Flow::Continue
    }
}

/// Keyword matching policy, kept in one place so it can be tightened later.
///
/// Substring-contains, not token equality: `#justquitnow` triggers `quit`.
/// Acceptable for a trusted single-user console.
fn matches(line: &str, keyword: &str) -> bool {
    line.contains(keyword)
}

/// Everything after `<marker><keyword> `, with the offset computed from the
/// marker and keyword lengths. A line shorter than the prefix yields an
/// empty value.
fn value_after<'a>(line: &'a str, keyword: &str) -> &'a str {
    let offset = MARKER.len_utf8() + keyword.len() + 1;
    line.get(offset..).unwrap_or("")
}
