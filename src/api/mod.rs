//! API interaction module
//!
//! Core plumbing for talking to the ppaas REST API: the HTTP layer and the
//! configured client.
//!
//! # Module Structure
//!
//! - [`client`] - Main client, combining configuration and transport
//! - [`http`] - HTTP utilities: basic auth, JSON decoding, status mapping

pub mod client;
pub mod http;
