use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("Packet error: {0}")]
    Packet(#[from] storefront_packets::PacketError),

    #[error("Layout error: {0}")]
    Layout(#[from] storefront_layout::LayoutError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to watch layout: {0}")]
    Watch(#[from] notify::Error),
}

pub type PreviewResult<T> = Result<T, PreviewError>;
