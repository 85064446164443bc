// Service exports
pub mod completion;

pub use completion::{CompletionClient, CompletionError};
