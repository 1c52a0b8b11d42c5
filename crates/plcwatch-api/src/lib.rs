//! Protocol client for G.hn powerline bridge web control panels.
//!
//! These adapters expose no management API — only the stateful web UI
//! protocol their browser frontend speaks: a session cookie, a CSRF token,
//! and a newline-delimited `KEY=VALUE` status blob. This crate implements
//! that protocol for one device:
//!
//! - [`StatusBlob`] — permissive parser for the status dump
//! - [`AuthSession`] — CSRF token + session cookie lifecycle and the
//!   challenge-response login handshake
//! - [`DeviceClient`] — status fetch, authenticate, and hardware restart
//!   against a single device endpoint
//!
//! Everything in [`protocol`] is a frozen fact of the device firmware,
//! not a design choice of this crate.

pub mod blob;
pub mod client;
pub mod error;
pub mod protocol;
pub mod session;
pub mod transport;

pub use blob::StatusBlob;
pub use client::DeviceClient;
pub use error::Error;
pub use session::AuthSession;
pub use transport::TransportConfig;
