use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Invalid layout JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Layout must be a JSON array of blocks")]
    NotAnArray,

    #[error("Unknown theme '{0}'")]
    UnknownTheme(String),
}

pub type LayoutResult<T> = Result<T, LayoutError>;
