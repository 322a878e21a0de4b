//! Integration test common infrastructure.
//!
//! Provides a line-oriented stand-in for the chat server and a handle to a
//! spawned `linelink` process with piped stdio.

// Not every test binary exercises every helper.
#![allow(dead_code)]

use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::time::timeout;

const IO_TIMEOUT: Duration = Duration::from_secs(5);

/// A minimal line server standing in for the chat server.
pub struct TestServer {
    listener: TcpListener,
    pub port: u16,
}

impl TestServer {
    /// Bind on an ephemeral loopback port.
    pub async fn bind() -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();
        Ok(Self { listener, port })
    }

    /// Accept one client connection.
    pub async fn accept(&self) -> anyhow::Result<ServerSide> {
        let (stream, _) = timeout(IO_TIMEOUT, self.listener.accept()).await??;
        let (read_half, write_half) = stream.into_split();
        Ok(ServerSide {
            reader: BufReader::new(read_half),
            writer: write_half,
        })
    }
}

/// The server end of one accepted connection.
pub struct ServerSide {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl ServerSide {
    /// Receive one line from the client.
    pub async fn recv(&mut self) -> anyhow::Result<String> {
        let mut line = String::new();
        let n = timeout(IO_TIMEOUT, self.reader.read_line(&mut line)).await??;
        if n == 0 {
            anyhow::bail!("client closed the connection");
        }
        Ok(line.trim_end().to_string())
    }

    /// True once the client has closed its end of the stream.
    pub async fn recv_eof(&mut self) -> anyhow::Result<bool> {
        let mut line = String::new();
        let n = timeout(IO_TIMEOUT, self.reader.read_line(&mut line)).await??;
        Ok(n == 0)
    }

    /// Send one line to the client.
    pub async fn send(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        Ok(())
    }
}

/// A spawned `linelink` process with piped stdin/stdout.
pub struct ConsoleProc {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl ConsoleProc {
    /// Spawn the built binary against a loopback server port.
    pub fn spawn(identity: &str, port: u16) -> anyhow::Result<Self> {
        let mut child = Command::new(env!("CARGO_BIN_EXE_linelink"))
            .arg(identity)
            .arg("127.0.0.1")
            .arg(port.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;
        let stdin = child.stdin.take().expect("stdin piped");
        let stdout = BufReader::new(child.stdout.take().expect("stdout piped"));
        Ok(Self {
            child,
            stdin,
            stdout,
        })
    }

    /// Type one line into the console.
    pub async fn type_line(&mut self, line: &str) -> anyhow::Result<()> {
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.write_all(b"\n").await?;
        self.stdin.flush().await?;
        Ok(())
    }

    /// Read one line of console output.
    pub async fn read_line(&mut self) -> anyhow::Result<String> {
        let mut line = String::new();
        let n = timeout(IO_TIMEOUT, self.stdout.read_line(&mut line)).await??;
        if n == 0 {
            anyhow::bail!("console closed stdout");
        }
        Ok(line.trim_end().to_string())
    }

    /// Wait for the process to exit.
    pub async fn wait(mut self) -> anyhow::Result<std::process::ExitStatus> {
        drop(self.stdin);
        Ok(timeout(IO_TIMEOUT, self.child.wait()).await??)
    }
}
