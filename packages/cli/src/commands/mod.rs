pub mod init;
pub mod preview;
pub mod render;
pub mod validate;

pub use init::{init, InitArgs};
pub use preview::{preview, PreviewArgs};
pub use render::{render, RenderArgs};
pub use validate::{validate, ValidateArgs};
