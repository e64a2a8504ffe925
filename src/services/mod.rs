pub mod completion;
pub mod providers;
pub mod recommendations;
pub mod title_search;

pub use completion::OpenAiCompletionClient;
pub use providers::{MovieProvider, TmdbProvider};
