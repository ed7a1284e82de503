//! Handle to the running key-mapper daemon
//!
//! The dispatcher only sees the [`DaemonProxy`] capability set. [`IpcDaemon`]
//! implements it over the Unix socket protocol from `keymapper-common`, and
//! [`acquire`] obtains one when the daemon is reachable.

use crate::error::ControlError;
use keymapper_common::ipc_client::IpcClient;
use keymapper_common::{Request, Response};
use std::path::Path;
use tracing::{debug, error};

/// Remote operations offered by the daemon
#[async_trait::async_trait]
pub trait DaemonProxy: Send + Sync {
    /// Autoload presets for every known device
    async fn autoload(&self) -> Result<(), ControlError>;
    /// Autoload the preset associated with one device
    async fn autoload_single(&self, device: &str) -> Result<(), ControlError>;
    async fn start_injecting(&self, device: &str, preset: &str) -> Result<(), ControlError>;
    async fn stop_injecting(&self, device: &str) -> Result<(), ControlError>;
    async fn stop_all(&self) -> Result<(), ControlError>;
    /// Round-trip `payload` through the daemon and return its echo
    async fn hello(&self, payload: &str) -> Result<String, ControlError>;
    async fn set_config_dir(&self, path: &Path) -> Result<(), ControlError>;
}

/// Daemon handle backed by the Unix socket IPC client
#[derive(Debug, Clone)]
pub struct IpcDaemon {
    client: IpcClient,
}

impl IpcDaemon {
    pub fn new(client: IpcClient) -> Self {
        Self { client }
    }

    async fn request(&self, request: Request) -> Result<Response, ControlError> {
        debug!("Sending {} to {}", request.operation(), self.client.socket_path().display());

        // Transport failures surface as ControlError::Transport
        match self.client.send(&request).await? {
            // The daemon answered, but refused the request
            Response::Error(message) => {
                error!("Daemon rejected {}: {}", request.operation(), message);
                Err(ControlError::DaemonRejected(message))
            }
            response => Ok(response),
        }
    }

    async fn expect_ack(&self, request: Request) -> Result<(), ControlError> {
        let operation = request.operation();
        match self.request(request).await? {
            Response::Ack => Ok(()),
            _ => Err(ControlError::UnexpectedResponse(operation)),
        }
    }
}

#[async_trait::async_trait]
impl DaemonProxy for IpcDaemon {
    async fn autoload(&self) -> Result<(), ControlError> {
        self.expect_ack(Request::Autoload).await
    }

    async fn autoload_single(&self, device: &str) -> Result<(), ControlError> {
        self.expect_ack(Request::AutoloadSingle {
            device: device.to_string(),
        })
        .await
    }

    async fn start_injecting(&self, device: &str, preset: &str) -> Result<(), ControlError> {
        self.expect_ack(Request::StartInjecting {
            device: device.to_string(),
            preset: preset.to_string(),
        })
        .await
    }

    async fn stop_injecting(&self, device: &str) -> Result<(), ControlError> {
        self.expect_ack(Request::StopInjecting {
            device: device.to_string(),
        })
        .await
    }

    async fn stop_all(&self) -> Result<(), ControlError> {
        self.expect_ack(Request::StopAll).await
    }

    async fn hello(&self, payload: &str) -> Result<String, ControlError> {
        let request = Request::Hello {
            payload: payload.to_string(),
        };
        match self.request(request).await? {
            Response::Hello(echo) => Ok(echo),
            _ => Err(ControlError::UnexpectedResponse("hello")),
        }
    }

    async fn set_config_dir(&self, path: &Path) -> Result<(), ControlError> {
        // Send the path exactly as it was checked, or not at all
        let path = path
            .to_str()
            .ok_or_else(|| ControlError::NonUtf8Path(path.to_path_buf()))?;

        self.expect_ack(Request::SetConfigDir {
            path: path.to_string(),
        })
        .await
    }
}

/// Obtain a handle to the daemon behind `client`
///
/// An unreachable daemon yields `Ok(None)` when `fallback` is set and
/// `ControlError::DaemonUnreachable` otherwise.
pub async fn acquire(client: IpcClient, fallback: bool) -> Result<Option<IpcDaemon>, ControlError> {
    // Check the socket once, this connection carries no request
    if client.is_daemon_running().await {
        debug!("Connected to the daemon at {}", client.socket_path().display());
        return Ok(Some(IpcDaemon::new(client)));
    }

    let socket = client.socket_path().display().to_string();
    if fallback {
        debug!("No daemon at {}, continuing without one", socket);
        return Ok(None);
    }

    error!("Failed to connect to the daemon at {}", socket);
    Err(ControlError::DaemonUnreachable(socket))
}
