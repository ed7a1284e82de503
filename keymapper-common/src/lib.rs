use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

// Re-export common dependencies
pub use bincode;
pub use serde;
pub use tokio;
pub use tracing;

// IPC client module
pub mod ipc_client;

pub use ipc_client::IpcError;

/// Maximum message size (1MB)
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// IPC Requests from the control tool to the daemon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Request {
    /// Start injecting for every device that has an autoload preset
    Autoload,

    /// Start injecting for one device, using its autoload preset
    AutoloadSingle {
        device: String,
    },

    /// Start injecting the named preset into the named device
    StartInjecting {
        device: String,
        preset: String,
    },

    /// Stop injecting for the named device
    StopInjecting {
        device: String,
    },

    /// Stop every running injection
    StopAll,

    /// Liveness probe, the daemon echoes the payload back
    Hello {
        payload: String,
    },

    /// Point the daemon at a different configuration directory
    SetConfigDir {
        path: String,
    },
}

impl Request {
    /// Name of the remote operation this request invokes
    pub fn operation(&self) -> &'static str {
        match self {
            Request::Autoload => "autoload",
            Request::AutoloadSingle { .. } => "autoload_single",
            Request::StartInjecting { .. } => "start_injecting",
            Request::StopInjecting { .. } => "stop_injecting",
            Request::StopAll => "stop_all",
            Request::Hello { .. } => "hello",
            Request::SetConfigDir { .. } => "set_config_dir",
        }
    }
}

/// IPC Responses from the daemon to the control tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Response {
    /// Acknowledgment of successful operation
    Ack,

    /// Echo of a `Request::Hello` payload
    Hello(String),

    /// The daemon refused or failed the request
    Error(String),
}

/// Serialize a message using bincode
pub fn serialize<T: Serialize>(msg: &T) -> Result<Vec<u8>, IpcError> {
    bincode::serialize(msg).map_err(|e| IpcError::Serialization(e.to_string()))
}

/// Deserialize a message using bincode
pub fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, IpcError> {
    bincode::deserialize(bytes).map_err(|e| IpcError::Serialization(e.to_string()))
}

/// Write one length-prefixed message (u32 little endian length, then payload)
pub async fn write_message<W, T>(writer: &mut W, msg: &T) -> Result<(), IpcError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let serialized = serialize(msg)?;

    if serialized.len() > MAX_MESSAGE_SIZE {
        return Err(IpcError::MessageTooLarge(serialized.len(), MAX_MESSAGE_SIZE));
    }

    let len = serialized.len() as u32;
    writer.write_all(&len.to_le_bytes()).await?;
    writer.write_all(&serialized).await?;
    writer.flush().await?;

    Ok(())
}

/// Read one length-prefixed message
pub async fn read_message<R, T>(reader: &mut R) -> Result<T, IpcError>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    let mut len_bytes = [0u8; 4];
    reader.read_exact(&mut len_bytes).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            IpcError::ConnectionClosed
        } else {
            IpcError::Io(e)
        }
    })?;
    let len = u32::from_le_bytes(len_bytes) as usize;

    if len > MAX_MESSAGE_SIZE {
        return Err(IpcError::MessageTooLarge(len, MAX_MESSAGE_SIZE));
    }

    let mut buffer = vec![0u8; len];
    reader.read_exact(&mut buffer).await?;

    deserialize(&buffer)
}
