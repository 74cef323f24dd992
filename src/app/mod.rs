// Application layer: the client facade and the per-API services it delegates to.

pub mod client;
pub mod query;
pub mod services;
