use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Invalid prop '{prop}': {message}")]
    InvalidProp { prop: String, message: String },

    #[error("Component '{component}' failed: {message}")]
    ComponentFailed { component: String, message: String },

    #[error("Layout error: {0}")]
    Layout(String),
}

impl From<storefront_layout::LayoutError> for RenderError {
    fn from(e: storefront_layout::LayoutError) -> Self {
        RenderError::Layout(e.to_string())
    }
}

pub type RenderResult<T> = Result<T, RenderError>;
