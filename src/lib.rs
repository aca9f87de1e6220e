//! Client-side failover dispatch for groups of remote signing services.
//!
//! This crate provides:
//! - A [`Group`] that fans a single signing or info call out across an
//!   ordered list of equivalent remote endpoints
//! - Ordered-list failover: first success wins, the last failure is
//!   reported when every endpoint fails
//! - An [`Endpoint`] trait for custom transports, plus an HTTP default
//! - Per-call cancellation via `tokio_util::sync::CancellationToken`
//!
//! # Example
//!
//! ```rust,ignore
//! use signer_group::{Group, Strategy};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let remotes = vec![
//!         "https://signer-a.internal".to_string(),
//!         "https://signer-b.internal".to_string(),
//!     ];
//!     let group = Group::new(&remotes, Strategy::OrderedList)?;
//!
//!     // Tries signer-a first; signer-b only if signer-a fails.
//!     let signed = group.sign(br#"{"payload":"..."}"#).await?;
//!     println!("{} signed bytes", signed.len());
//!     Ok(())
//! }
//! ```
//!
//! # Dispatch semantics
//!
//! Endpoints are tried strictly in construction order on every call;
//! there is no sticky "last known good" endpoint, no retry of a failed
//! endpoint, and no concurrent fan-out. A fully failing call costs the
//! sum of all endpoint attempt latencies and surfaces only the last
//! endpoint's error.

mod auth;
mod config;
mod endpoint;
mod error;
mod group;
mod transport;

pub use auth::{AuthProvider, HmacTokenProvider};
pub use config::GroupConfig;
pub use endpoint::{Endpoint, InfoResponse};
pub use error::{Error, Result};
pub use group::{Group, Strategy};
pub use transport::HttpEndpoint;
