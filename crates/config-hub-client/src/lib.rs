//! Client for ConfigHub remote configuration.
//!
//! A [`ConfigClient`] pulls a snapshot of properties and files from a
//! ConfigHub server, keeps it in memory, and serves typed reads against it.
//! Files missing from the snapshot are fetched individually on demand.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod snapshot;
pub mod transport;
pub mod value;

pub use client::ConfigClient;
pub use config::{ClientEnv, ClientOptions};
pub use error::{ClientError, RequestError};
pub use snapshot::{FileEntry, Lookup, Property, Snapshot};
pub use transport::TransportOptions;
pub use value::{ConfigValue, DecodeError, ValueType};
