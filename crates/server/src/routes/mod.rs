pub mod chat;
pub mod liveness;
