// flare-api: Async Rust client for the HPE VAN SDN controller (Flare) REST API

pub mod addr;
pub mod auth;
pub mod client;
pub mod error;
pub mod net;
pub mod of;
pub mod record;
pub mod transport;

pub use client::FlareClient;
pub use error::Error;
pub use record::Record;
pub use transport::{TlsMode, TransportConfig};
