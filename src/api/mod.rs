//! Speckle API
//!
//! # Module Structure
//!
//! - [`http`] - HTTP transport with logging and error mapping
//! - [`session`] - server root, token and logged-in principal
//! - [`client`] - [`SpeckleClient`] facade: login, registration, resource handles

pub mod client;
pub mod http;
pub mod session;

pub use client::SpeckleClient;
pub use http::format_error;
pub use session::Principal;
