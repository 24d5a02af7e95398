//! Client library for OVH's Puppet-as-a-Service lab API.
//!
//! Resources (masters, agent certificates, deploy keys) are exposed as small
//! objects that cache the last JSON snapshot fetched from the server. Reads
//! are answered from that cache; [`Resource::reload`] and the mutating
//! actions are the only operations that touch the network, so I/O always
//! shows up in a method signature, never behind a field access.
//!
//! # Configuration
//!
//! Credentials and the endpoint come from a TOML file (see [`config`]):
//!
//! ```toml
//! [auth]
//! user = "lab-robot"
//! pass = "..."
//!
//! [api]
//! endpoint = "https://ppaas.example.net/api"
//! ```
//!
//! # Example
//!
//! ```no_run
//! use ppaas::{ApiClient, Master, Resource};
//!
//! # async fn demo() -> ppaas::Result<()> {
//! let client = ApiClient::from_default_locations()?;
//!
//! for master in Master::list(&client).await? {
//!     let status = master
//!         .cached()
//!         .status
//!         .as_ref()
//!         .map(|s| s.message.as_str())
//!         .unwrap_or("-");
//!     println!("{} {} [{}]", master.id(), master.cached().name, status);
//! }
//!
//! if let Some(mut production) = Master::find_by_name(&client, "production").await? {
//!     production.refresh().await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod resource;

pub use api::client::ApiClient;
pub use config::Config;
pub use error::{Error, Result};
pub use resource::{
    ActionOutcome, Certificate, CertificateData, DeployKey, DeployKeyData, Master, MasterData,
    Resource, Status,
};

// Re-exported so callers can build a `Config` or a raw `request` without
// naming these crates themselves.
pub use reqwest::{Method, StatusCode};
pub use url::Url;
