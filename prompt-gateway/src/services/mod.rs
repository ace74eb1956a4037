pub mod completion;
pub mod providers;

pub use completion::{CompletionClient, CompletionError};
