//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Layout error: {0}")]
    Layout(#[from] storefront_layout::LayoutError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type EditorResult<T> = Result<T, EditorError>;
