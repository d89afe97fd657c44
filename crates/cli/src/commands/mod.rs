//! Command handlers for the Databank CLI.

pub mod ask;
pub mod serve;
pub mod topics;

pub use ask::AskCommand;
pub use serve::ServeCommand;
pub use topics::TopicsCommand;
