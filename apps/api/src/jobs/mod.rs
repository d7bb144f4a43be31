// Job catalog access plus the rank/explain endpoints built on top of it.

pub mod explain;
pub mod handlers;
pub mod prompts;
pub mod store;
