pub mod client_config;

#[cfg(feature = "cli")]
pub mod cli;

pub use client_config::{ClientConfig, HostConfig};
