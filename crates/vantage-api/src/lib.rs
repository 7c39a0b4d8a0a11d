// vantage-api: Async Rust client for a monitoring datacenter's REST API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::{BasicAuth, SensuClient};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
