use thiserror::Error;

#[derive(Error, Debug)]
pub enum PacketError {
    #[error("Packet fetch failed: {0}")]
    Fetch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid packet JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type PacketResult<T> = Result<T, PacketError>;
