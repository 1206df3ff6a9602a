//! Speckle client SDK
//!
//! Typed access to the Speckle REST API. Every resource goes through one
//! generic dispatcher; responses are decoded into typed records picked by
//! an injected [`SchemaRegistry`](schema::SchemaRegistry).
//!
//! # Module Structure
//!
//! - [`api`] - HTTP transport, session and the [`SpeckleClient`] facade
//! - [`resource`] - verb tables, resource descriptors and dispatch
//! - [`schema`] - record types, geometry and the schema registry
//! - [`cache`] - local account/token cache
//! - [`config`] - persisted client configuration
//! - [`error`] - error type shared by the library

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod resource;
pub mod schema;

pub use api::{format_error, Principal, SpeckleClient};
pub use cache::{AccountCache, CachedAccount};
pub use config::Config;
pub use error::{Error, Result};
pub use resource::{Query, RequestOptions, Resource, ResourceKind, Response, Verb};
pub use schema::{Record, SchemaKind, SchemaRegistry};
