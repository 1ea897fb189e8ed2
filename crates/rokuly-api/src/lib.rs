// rokuly-api: Async Rust client for the Roku External Control Protocol

pub mod client;
pub mod digest;
pub mod ecp;
pub mod endpoints;
pub mod error;
pub mod transport;

pub use client::{EcpClient, EcpResponse, Port, Probe, RequestBody};
pub use digest::{DeviceCredentials, DigestChallenge, DigestContext};
pub use endpoints::{Endpoint, EndpointTable, ParamValue, QueryParams, format_template};
pub use error::Error;
pub use transport::TransportConfig;
