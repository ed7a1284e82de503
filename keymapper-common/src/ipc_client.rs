//! IPC client for communicating with the key-mapper daemon
//!
//! This module sends one request per connection to the daemon over a Unix
//! domain socket and waits for the matching response, with per-operation
//! timeouts. Nothing is retried, a request is written at most once.

use crate::{read_message, write_message, Request, Response};

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::net::UnixStream;
use tokio::time::timeout;

/// Errors that can occur during IPC communication
#[derive(Error, Debug)]
pub enum IpcError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Connection timeout")]
    ConnectionTimeout,

    #[error("Operation timeout after {0}ms")]
    OperationTimeout(u64),

    #[error("Daemon not running at {0}")]
    DaemonNotRunning(String),

    #[error("Message too large: {0} bytes exceeds maximum of {1} bytes")]
    MessageTooLarge(usize, usize),

    #[error("Connection closed unexpectedly")]
    ConnectionClosed,
}

/// Default socket path for the key-mapper daemon
pub const DEFAULT_SOCKET_PATH: &str = "/run/keymapper/keymapper.sock";

/// Default timeout for operations (in milliseconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// IPC client with connection management and error handling
#[derive(Debug, Clone)]
pub struct IpcClient {
    socket_path: PathBuf,
    timeout: Duration,
}

impl IpcClient {
    /// Create a new IPC client with a custom socket path
    pub fn with_socket_path<P: AsRef<Path>>(socket_path: P) -> Self {
        Self {
            socket_path: socket_path.as_ref().to_path_buf(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    /// Set the timeout for operations
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = Duration::from_millis(timeout_ms);
        self
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Check if the daemon is running by attempting to connect to its socket
    pub async fn is_daemon_running(&self) -> bool {
        matches!(
            timeout(self.timeout, UnixStream::connect(&self.socket_path)).await,
            Ok(Ok(_))
        )
    }

    /// Connect to the daemon, giving up after the operation timeout
    pub async fn connect(&self) -> Result<UnixStream, IpcError> {
        match timeout(self.timeout, UnixStream::connect(&self.socket_path)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => {
                tracing::debug!("Connecting to {} failed: {}", self.socket_path.display(), e);
                Err(IpcError::DaemonNotRunning(self.socket_path.display().to_string()))
            }
            Err(_) => Err(IpcError::ConnectionTimeout),
        }
    }

    /// Send a request to the daemon and wait for its response
    pub async fn send(&self, request: &Request) -> Result<Response, IpcError> {
        let mut stream = self.connect().await?;
        self.send_with_stream(&mut stream, request).await
    }

    /// Send a request using an existing stream
    async fn send_with_stream(
        &self,
        stream: &mut UnixStream,
        request: &Request,
    ) -> Result<Response, IpcError> {
        let timeout_ms = self.timeout.as_millis() as u64;

        // Send the request
        timeout(self.timeout, write_message(&mut *stream, request))
            .await
            .map_err(|_| IpcError::OperationTimeout(timeout_ms))??;

        // Wait for the single response
        timeout(self.timeout, read_message(&mut *stream))
            .await
            .map_err(|_| IpcError::OperationTimeout(timeout_ms))?
    }
}
